//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `repositories/` - Store backends (in-memory, JSON files)
//! - `loader/` - Declarative model loaders (YAML)

pub mod loader;
pub mod repositories;

pub use loader::{is_valid_id, YamlModelLoader};
pub use repositories::{FileStore, MemoryStore, LABEL_FILE, RESOURCES_FILE};
