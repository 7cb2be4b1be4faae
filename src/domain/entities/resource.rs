//! Persisted resource entity
//!
//! A [`ResourceState`] records one applied host or component. Host resources
//! are keyed by host id, component resources by `<hostId>/<componentId>`.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const META_REGION_ID: &str = "regionId";
pub const META_HOST_ID: &str = "hostId";
pub const META_COMPONENT_ID: &str = "componentId";
pub const META_INSTANCE_TYPE: &str = "instanceType";
pub const META_COMPONENT_TYPE: &str = "componentType";

/// Kind of a persisted resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Host,
    Component,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Host => "host",
            ResourceKind::Component => "component",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of a persisted resource
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceStatus {
    #[default]
    Pending,
    Creating,
    Running,
    Updating,
    Deleting,
    Deleted,
    Error,
}

impl ResourceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceStatus::Pending => "pending",
            ResourceStatus::Creating => "creating",
            ResourceStatus::Running => "running",
            ResourceStatus::Updating => "updating",
            ResourceStatus::Deleting => "deleting",
            ResourceStatus::Deleted => "deleted",
            ResourceStatus::Error => "error",
        }
    }
}

impl fmt::Display for ResourceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceState {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ResourceKind,
    pub status: ResourceStatus,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: DateTime<Utc>,
}

impl ResourceState {
    /// New resource stamped with the current time.
    pub fn new(id: impl Into<String>, kind: ResourceKind, status: ResourceStatus) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            kind,
            status,
            metadata: BTreeMap::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn meta(&self, key: &str) -> Option<&str> {
        self.metadata
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Host this resource belongs to.
    ///
    /// Prefers the `hostId` metadata and falls back to the id naming convention.
    pub fn host_id(&self) -> &str {
        self.meta(META_HOST_ID)
            .unwrap_or_else(|| split_resource_id(&self.id).0)
    }

    pub fn component_id(&self) -> Option<&str> {
        match self.kind {
            ResourceKind::Host => None,
            ResourceKind::Component => self
                .meta(META_COMPONENT_ID)
                .or_else(|| split_resource_id(&self.id).1),
        }
    }
}

/// Resource id of a component: `<hostId>/<componentId>`.
pub fn component_resource_id(host_id: &str, component_id: &str) -> String {
    format!("{host_id}/{component_id}")
}

/// Splits a resource id into host id and optional component id.
pub fn split_resource_id(resource_id: &str) -> (&str, Option<&str>) {
    match resource_id.split_once('/') {
        Some((host, component)) => (host, Some(component)),
        None => (resource_id, None),
    }
}
