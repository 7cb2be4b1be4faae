//! In-memory store
//!
//! Keeps labels and resources in process memory. Used for tests and for the
//! `memory` store backend, where nothing should touch disk.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::domain::entities::{Label, ResourceState};
use crate::domain::ports::{ResourceMap, ResourceStore, StatusStore, StoreError, StoreResult};

#[derive(Debug, Default)]
struct Inner {
    labels: BTreeMap<String, Label>,
    resources: BTreeMap<String, ResourceMap>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with resources for one instance.
    pub fn with_resources(
        mut self,
        instance_id: impl Into<String>,
        resources: impl IntoIterator<Item = ResourceState>,
    ) -> Self {
        let inner = self.inner.get_mut().unwrap_or_else(PoisonError::into_inner);
        let entry = inner.resources.entry(instance_id.into()).or_default();
        for resource in resources {
            entry.insert(resource.id.clone(), resource);
        }
        self
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Inner>> {
        self.inner.read().map_err(|_| StoreError::Poisoned)
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Inner>> {
        self.inner.write().map_err(|_| StoreError::Poisoned)
    }
}

impl StatusStore for MemoryStore {
    fn get_status(&self, instance_id: &str) -> StoreResult<Label> {
        self.read()?
            .labels
            .get(instance_id)
            .cloned()
            .ok_or_else(|| StoreError::InstanceNotFound {
                instance_id: instance_id.to_string(),
            })
    }

    fn save_status(&self, instance_id: &str, mut label: Label) -> StoreResult<()> {
        if label.instance_id.is_empty() {
            label.instance_id = instance_id.to_string();
        }
        self.write()?.labels.insert(instance_id.to_string(), label);
        Ok(())
    }

    fn list_instances(&self) -> StoreResult<Vec<String>> {
        let inner = self.read()?;
        let mut ids: Vec<String> = inner
            .labels
            .keys()
            .chain(inner.resources.keys())
            .cloned()
            .collect();
        ids.sort();
        ids.dedup();
        Ok(ids)
    }
}

impl ResourceStore for MemoryStore {
    fn get_resources(&self, instance_id: &str) -> StoreResult<ResourceMap> {
        Ok(self
            .read()?
            .resources
            .get(instance_id)
            .cloned()
            .unwrap_or_default())
    }

    fn save_resource(&self, instance_id: &str, resource: ResourceState) -> StoreResult<()> {
        self.write()?
            .resources
            .entry(instance_id.to_string())
            .or_default()
            .insert(resource.id.clone(), resource);
        Ok(())
    }

    fn delete_resource(&self, instance_id: &str, resource_id: &str) -> StoreResult<()> {
        if let Some(resources) = self.write()?.resources.get_mut(instance_id) {
            resources.remove(resource_id);
        }
        Ok(())
    }
}
