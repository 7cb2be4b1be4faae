//! Store Implementations
//!
//! Concrete implementations of the resource and status store ports.

mod file;
mod memory;

pub use file::{FileStore, LABEL_FILE, RESOURCES_FILE};
pub use memory::MemoryStore;
