//! JSON File Store
//!
//! Persists each instance under its own working directory:
//!
//! ```text
//! <root>/<instance>/resources.json   resource id -> ResourceState, pretty JSON
//! <root>/<instance>/label.json       status label
//! ```
//!
//! Every operation is a full read-modify-write cycle under one in-process
//! mutex. Two processes sharing a working directory are not coordinated.

use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tempfile::NamedTempFile;

use crate::domain::entities::{Label, ResourceState};
use crate::domain::ports::{ResourceMap, ResourceStore, StatusStore, StoreError, StoreResult};
use crate::infrastructure::loader::is_valid_id;

pub const RESOURCES_FILE: &str = "resources.json";
pub const LABEL_FILE: &str = "label.json";

#[derive(Debug)]
pub struct FileStore {
    root: PathBuf,
    /// Instances whose working directory is not `<root>/<instance>`
    instances: BTreeMap<String, PathBuf>,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            instances: BTreeMap::new(),
            lock: Mutex::new(()),
        }
    }

    /// Pins an instance to an explicit working directory.
    pub fn with_instance(mut self, instance_id: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        self.instances.insert(instance_id.into(), dir.into());
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding an instance's state.
    ///
    /// Unconfigured instances live under the root, so their id must be a
    /// plain model id; anything else could name a path outside it.
    pub fn working_dir(&self, instance_id: &str) -> StoreResult<PathBuf> {
        if let Some(dir) = self.instances.get(instance_id) {
            return Ok(dir.clone());
        }
        if !is_valid_id(instance_id) {
            return Err(StoreError::InvalidInstanceId {
                instance_id: instance_id.to_string(),
            });
        }
        Ok(self.root.join(instance_id))
    }

    pub fn resources_path(&self, instance_id: &str) -> StoreResult<PathBuf> {
        Ok(self.working_dir(instance_id)?.join(RESOURCES_FILE))
    }

    pub fn label_path(&self, instance_id: &str) -> StoreResult<PathBuf> {
        Ok(self.working_dir(instance_id)?.join(LABEL_FILE))
    }

    fn guard(&self) -> StoreResult<MutexGuard<'_, ()>> {
        self.lock.lock().map_err(|_| StoreError::Poisoned)
    }

    fn load_resources(&self, instance_id: &str) -> StoreResult<ResourceMap> {
        Ok(read_json(&self.resources_path(instance_id)?)?.unwrap_or_default())
    }

    fn store_resources(&self, instance_id: &str, resources: &ResourceMap) -> StoreResult<()> {
        write_json(&self.resources_path(instance_id)?, resources)
    }
}

impl StatusStore for FileStore {
    fn get_status(&self, instance_id: &str) -> StoreResult<Label> {
        let _guard = self.guard()?;
        read_json(&self.label_path(instance_id)?)?.ok_or_else(|| StoreError::InstanceNotFound {
            instance_id: instance_id.to_string(),
        })
    }

    fn save_status(&self, instance_id: &str, mut label: Label) -> StoreResult<()> {
        if label.instance_id.is_empty() {
            label.instance_id = instance_id.to_string();
        }
        let _guard = self.guard()?;
        write_json(&self.label_path(instance_id)?, &label)
    }

    fn list_instances(&self) -> StoreResult<Vec<String>> {
        let _guard = self.guard()?;
        let mut ids: Vec<String> = self.instances.keys().cloned().collect();

        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => Some(entries),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => return Err(io_error(&self.root, e)),
        };
        for entry in entries.into_iter().flatten() {
            let entry = entry.map_err(|e| io_error(&self.root, e))?;
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            if !path.join(LABEL_FILE).is_file() && !path.join(RESOURCES_FILE).is_file() {
                continue;
            }
            let name = path.file_name().and_then(|n| n.to_str());
            if let Some(name) = name.filter(|n| is_valid_id(n)) {
                ids.push(name.to_string());
            }
        }

        ids.sort();
        ids.dedup();
        Ok(ids)
    }
}

impl ResourceStore for FileStore {
    fn get_resources(&self, instance_id: &str) -> StoreResult<ResourceMap> {
        let _guard = self.guard()?;
        self.load_resources(instance_id)
    }

    fn save_resource(&self, instance_id: &str, resource: ResourceState) -> StoreResult<()> {
        let _guard = self.guard()?;
        let mut resources = self.load_resources(instance_id)?;
        resources.insert(resource.id.clone(), resource);
        self.store_resources(instance_id, &resources)
    }

    fn delete_resource(&self, instance_id: &str, resource_id: &str) -> StoreResult<()> {
        let _guard = self.guard()?;
        let mut resources = self.load_resources(instance_id)?;
        if resources.remove(resource_id).is_none() {
            return Ok(());
        }
        self.store_resources(instance_id, &resources)
    }
}

/// Reads a JSON document. A missing or blank file yields `None`.
fn read_json<T: DeserializeOwned>(path: &Path) -> StoreResult<Option<T>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(io_error(path, e)),
    };
    if content.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str(&content)
        .map(Some)
        .map_err(|e| StoreError::Corrupted {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}

/// Writes a JSON document through a temp file in the same directory, then
/// renames it over the target.
fn write_json<T: Serialize>(path: &Path, value: &T) -> StoreResult<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir).map_err(|e| io_error(dir, e))?;

    let mut content = serde_json::to_string_pretty(value).map_err(|e| StoreError::Serialization {
        message: e.to_string(),
    })?;
    content.push('\n');

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| io_error(dir, e))?;
    tmp.write_all(content.as_bytes())
        .map_err(|e| io_error(tmp.path(), e))?;
    tmp.persist(path).map_err(|e| io_error(path, e.error))?;
    Ok(())
}

fn io_error(path: &Path, err: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}
