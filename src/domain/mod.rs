//! Domain Layer
//!
//! The reconciliation core: the infrastructure model, persisted resource
//! records, the diff engine and the ports the engine talks through.
//!
//! ## Structure
//!
//! - `entities/` - Model tree, persisted resources, instance labels
//! - `value_objects/` - Component types and their capabilities
//! - `services/` - Diff engine, component type registry
//! - `ports/` - Store, loader and process-control interfaces
//!
//! Nothing in here touches the file system; all I/O goes through `ports`.

pub mod entities;
pub mod ports;
pub mod services;
pub mod value_objects;
