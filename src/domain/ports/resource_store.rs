//! Resource store ports
//!
//! Two capability layers: [`StatusStore`] tracks per-instance status labels,
//! [`ResourceStore`] adds per-resource CRUD on top of it. Implementations
//! are responsible for their own thread safety.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::domain::entities::{Label, ResourceState};

/// Persisted resources of one instance, keyed by resource id
pub type ResourceMap = BTreeMap<String, ResourceState>;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("instance [{instance_id}] not found")]
    InstanceNotFound { instance_id: String },

    #[error("invalid instance id '{instance_id}'")]
    InvalidInstanceId { instance_id: String },

    #[error("failed to access {path}: {message}")]
    Io { path: PathBuf, message: String },

    #[error(
        "resource file corrupted: {path}\n  → Fix: restore it from backup or delete it to start fresh\n  → Details: {message}"
    )]
    Corrupted { path: PathBuf, message: String },

    #[error("failed to serialize store contents: {message}")]
    Serialization { message: String },

    #[error("store lock poisoned by a panicked writer")]
    Poisoned,

    #[error("{message}")]
    Backend { message: String },
}

pub trait StatusStore: Send + Sync {
    /// Status label of an instance; `InstanceNotFound` if none was saved.
    fn get_status(&self, instance_id: &str) -> StoreResult<Label>;

    fn save_status(&self, instance_id: &str, label: Label) -> StoreResult<()>;

    fn list_instances(&self) -> StoreResult<Vec<String>>;
}

pub trait ResourceStore: StatusStore {
    /// All resources of an instance. An instance without resources yields an
    /// empty map, not an error.
    fn get_resources(&self, instance_id: &str) -> StoreResult<ResourceMap>;

    /// Insert or replace a resource by id.
    fn save_resource(&self, instance_id: &str, resource: ResourceState) -> StoreResult<()>;

    /// Remove a resource. Removing an absent resource is a no-op.
    fn delete_resource(&self, instance_id: &str, resource_id: &str) -> StoreResult<()>;
}

macro_rules! forward_store {
    ($wrapper:ty) => {
        impl<S: StatusStore + ?Sized> StatusStore for $wrapper {
            fn get_status(&self, instance_id: &str) -> StoreResult<Label> {
                (**self).get_status(instance_id)
            }

            fn save_status(&self, instance_id: &str, label: Label) -> StoreResult<()> {
                (**self).save_status(instance_id, label)
            }

            fn list_instances(&self) -> StoreResult<Vec<String>> {
                (**self).list_instances()
            }
        }

        impl<S: ResourceStore + ?Sized> ResourceStore for $wrapper {
            fn get_resources(&self, instance_id: &str) -> StoreResult<ResourceMap> {
                (**self).get_resources(instance_id)
            }

            fn save_resource(&self, instance_id: &str, resource: ResourceState) -> StoreResult<()> {
                (**self).save_resource(instance_id, resource)
            }

            fn delete_resource(&self, instance_id: &str, resource_id: &str) -> StoreResult<()> {
                (**self).delete_resource(instance_id, resource_id)
            }
        }
    };
}

forward_store!(Box<S>);
forward_store!(Arc<S>);
forward_store!(&S);
