//! Differ Domain Service
//!
//! Computes the changes needed to move a current [`Model`] to a desired one.
//! Pure: no I/O, no side effects.
//!
//! Hosts are keyed by their model-wide id. Components are keyed by id within
//! their host. Deletions of a host list its components first, then the host.
//!
//! A host's region is not compared. Moving a host to another region emits no
//! change, so its persisted `regionId` keeps the old region until the host is
//! deleted and created again.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;

use crate::domain::entities::{
    component_resource_id, Host, Model, ResourceKind, META_COMPONENT_TYPE, META_INSTANCE_TYPE,
};
use crate::domain::value_objects::ComponentBehavior;

/// Kind of change applied to a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Create,
    Update,
    Delete,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single resource to create, update or delete
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceChange {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ResourceKind,
    pub region_id: String,
    pub host_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_id: Option<String>,
    pub action: Action,
    /// Changed field names, for updates
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub changes: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub old_metadata: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub new_metadata: BTreeMap<String, String>,
}

impl ResourceChange {
    fn host(host: &Host, action: Action) -> Self {
        Self {
            id: host.id.clone(),
            kind: ResourceKind::Host,
            region_id: host.region_id.clone(),
            host_id: host.id.clone(),
            component_id: None,
            action,
            changes: Vec::new(),
            old_metadata: BTreeMap::new(),
            new_metadata: BTreeMap::new(),
        }
    }

    fn component(host: &Host, component_id: &str, action: Action) -> Self {
        Self {
            id: component_resource_id(&host.id, component_id),
            kind: ResourceKind::Component,
            component_id: Some(component_id.to_string()),
            ..Self::host(host, action)
        }
    }

    fn with_old(mut self, key: &str, value: &str) -> Self {
        self.old_metadata.insert(key.to_string(), value.to_string());
        self
    }

    fn with_new(mut self, key: &str, value: &str) -> Self {
        self.new_metadata.insert(key.to_string(), value.to_string());
        self
    }

    fn with_changes(mut self, changes: Vec<String>) -> Self {
        self.changes = changes;
        self
    }
}

/// Ordered changes between two models
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diff {
    pub to_create: Vec<ResourceChange>,
    pub to_update: Vec<ResourceChange>,
    pub to_delete: Vec<ResourceChange>,
}

impl Diff {
    pub fn is_empty(&self) -> bool {
        self.to_create.is_empty() && self.to_update.is_empty() && self.to_delete.is_empty()
    }

    pub fn total(&self) -> usize {
        self.to_create.len() + self.to_update.len() + self.to_delete.len()
    }

    /// Distinct resource ids touched by any change.
    pub fn changed_ids(&self) -> BTreeSet<&str> {
        self.changes().map(|c| c.id.as_str()).collect()
    }

    /// All changes in apply order: creates, updates, deletes.
    pub fn changes(&self) -> impl Iterator<Item = &ResourceChange> {
        self.to_create
            .iter()
            .chain(self.to_update.iter())
            .chain(self.to_delete.iter())
    }

    fn extend(&mut self, other: Diff) {
        self.to_create.extend(other.to_create);
        self.to_update.extend(other.to_update);
        self.to_delete.extend(other.to_delete);
    }
}

/// Compute the changes that turn `current` into `desired`.
pub fn compute_diff(desired: &Model, current: &Model) -> Diff {
    let desired_hosts = collect_hosts(desired);
    let current_hosts = collect_hosts(current);

    let mut diff = Diff::default();

    for (id, desired_host) in &desired_hosts {
        match current_hosts.get(id) {
            None => {
                diff.to_create.push(
                    ResourceChange::host(desired_host, Action::Create)
                        .with_new(META_INSTANCE_TYPE, &desired_host.instance_type),
                );
                for (component_id, component) in &desired_host.components {
                    diff.to_create.push(
                        ResourceChange::component(desired_host, component_id, Action::Create)
                            .with_new(META_COMPONENT_TYPE, component.component_type.label()),
                    );
                }
            }
            Some(current_host) => {
                let changes = detect_host_changes(desired_host, current_host);
                if !changes.is_empty() {
                    diff.to_update.push(
                        ResourceChange::host(desired_host, Action::Update)
                            .with_changes(changes)
                            .with_old(META_INSTANCE_TYPE, &current_host.instance_type)
                            .with_new(META_INSTANCE_TYPE, &desired_host.instance_type),
                    );
                }
                diff.extend(compute_component_diff(desired_host, current_host));
            }
        }
    }

    for (id, current_host) in &current_hosts {
        if desired_hosts.contains_key(id) {
            continue;
        }
        for component_id in current_host.components.keys() {
            diff.to_delete.push(ResourceChange::component(
                current_host,
                component_id,
                Action::Delete,
            ));
        }
        diff.to_delete
            .push(ResourceChange::host(current_host, Action::Delete));
    }

    diff
}

/// Names of host attributes that differ.
fn detect_host_changes(desired: &Host, current: &Host) -> Vec<String> {
    let mut changes = Vec::new();
    if desired.instance_type != current.instance_type {
        changes.push(META_INSTANCE_TYPE.to_string());
    }
    changes
}

fn compute_component_diff(desired_host: &Host, current_host: &Host) -> Diff {
    let mut diff = Diff::default();

    for (component_id, desired) in &desired_host.components {
        let desired_label = desired.component_type.label();
        match current_host.components.get(component_id) {
            None => diff.to_create.push(
                ResourceChange::component(desired_host, component_id, Action::Create)
                    .with_new(META_COMPONENT_TYPE, desired_label),
            ),
            Some(current) => {
                let current_label = current.component_type.label();
                // A changed shape is updated in place, never replaced.
                if desired_label != current_label {
                    diff.to_update.push(
                        ResourceChange::component(desired_host, component_id, Action::Update)
                            .with_changes(vec![META_COMPONENT_TYPE.to_string()])
                            .with_old(META_COMPONENT_TYPE, current_label)
                            .with_new(META_COMPONENT_TYPE, desired_label),
                    );
                }
            }
        }
    }

    for component_id in current_host.components.keys() {
        if !desired_host.components.contains_key(component_id) {
            diff.to_delete.push(ResourceChange::component(
                current_host,
                component_id,
                Action::Delete,
            ));
        }
    }

    diff
}

fn collect_hosts(model: &Model) -> BTreeMap<&str, &Host> {
    model.hosts().map(|h| (h.id.as_str(), h)).collect()
}
