//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod model_loader;
pub mod process_control;
pub mod resource_store;

pub use model_loader::{LoadError, ModelLoader, ValidationIssue, ValidationReport};
pub use process_control::{ProcessControl, ProcessError};
pub use resource_store::{
    ResourceMap, ResourceStore, StatusStore, StoreError, StoreResult,
};
