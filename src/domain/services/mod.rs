//! Domain Services
//!
//! Pure business logic services that operate on domain entities.
//! These services have no I/O dependencies and are easily testable.

mod component_registry;
mod differ;

pub use component_registry::{ComponentFactory, ComponentRegistry, RegistryError};
pub use differ::{compute_diff, Action, Diff, ResourceChange};
