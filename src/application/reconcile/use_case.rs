//! Reconcile Use Case
//!
//! Orchestrates one reconciliation pass:
//! 1. Load the instance's persisted resources (a failed load counts as empty)
//! 2. Rebuild the current model from them
//! 3. Diff desired against current, plus deletes for stranded components
//! 4. Apply creates, then updates, then deletes through the store
//!
//! With `continue_on_error`, a component create is skipped when its host's
//! create failed earlier in the pass, and a host delete is skipped when one of
//! its component deletes failed. A component record never outlives its host.
//!
//! Each call runs sequentially on the caller's thread. Concurrent callers are
//! only as safe as the store they share.

use std::collections::{BTreeMap, BTreeSet};

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::domain::entities::{
    Component, Host, InstanceState, Label, Model, ResourceKind, ResourceState, ResourceStatus, DEFAULT_REGION,
    META_COMPONENT_ID, META_COMPONENT_TYPE, META_HOST_ID, META_INSTANCE_TYPE, META_REGION_ID,
};
use crate::domain::ports::{ResourceMap, ResourceStore};
use crate::domain::services::{compute_diff, Action, Diff, ResourceChange};
use crate::domain::value_objects::ComponentType;
use crate::error::StrataResult;

use super::context::ReconcileContext;
use super::options::ReconcileOptions;
use super::result::{ReconcileError, ReconcileFailure, ReconcileResult};

/// Reconciler - applies the diff between desired and persisted state
///
/// Parameterized by its store so tests can swap in failing or recording
/// implementations.
pub struct Reconciler<S>
where
    S: ResourceStore,
{
    store: S,
}

impl<S> Reconciler<S>
where
    S: ResourceStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Reconcile with default options: apply, stop at the first failure.
    pub fn reconcile(&self, ctx: &ReconcileContext) -> Result<ReconcileResult, ReconcileFailure> {
        self.reconcile_with_options(ctx, &ReconcileOptions::default())
    }

    pub fn reconcile_with_options(
        &self,
        ctx: &ReconcileContext,
        options: &ReconcileOptions,
    ) -> Result<ReconcileResult, ReconcileFailure> {
        let instance_id = ctx.instance_id();
        let persisted = self.load_persisted(instance_id);
        let diff = plan(instance_id, ctx.model(), &persisted);

        debug!(
            instance = instance_id,
            create = diff.to_create.len(),
            update = diff.to_update.len(),
            delete = diff.to_delete.len(),
            "computed diff"
        );

        let mut result = ReconcileResult::new(options.dry_run);

        if options.dry_run {
            result.created = diff.to_create.len();
            result.updated = diff.to_update.len();
            result.deleted = diff.to_delete.len();
            result.unchanged = count_unchanged(&persisted, &diff);
            info!(
                "dry-run: would create {}, update {}, delete {} resources",
                result.created, result.updated, result.deleted
            );
            return Ok(result);
        }

        // Hosts whose create, or one of whose component deletes, failed
        let mut blocked_hosts: BTreeSet<&str> = BTreeSet::new();

        for change in diff.changes() {
            let blocked = match (change.action, change.kind) {
                (Action::Create, ResourceKind::Component) => {
                    blocked_hosts.contains(change.host_id.as_str())
                }
                (Action::Delete, ResourceKind::Host) => blocked_hosts.contains(change.id.as_str()),
                _ => false,
            };
            if blocked {
                warn!(
                    instance = instance_id,
                    "skipping {} of resource [{}]: host [{}] failed earlier in this pass",
                    change.action,
                    change.id,
                    change.host_id
                );
                continue;
            }

            let outcome = match change.action {
                Action::Create | Action::Update => self
                    .store
                    .save_resource(instance_id, build_resource(change, &persisted)),
                Action::Delete => self.store.delete_resource(instance_id, &change.id),
            };

            match outcome {
                Ok(()) => {
                    match change.action {
                        Action::Create => result.created += 1,
                        Action::Update => result.updated += 1,
                        Action::Delete => result.deleted += 1,
                    }
                    if change.changes.is_empty() {
                        info!(
                            instance = instance_id,
                            "{}d resource [{}] type={}",
                            change.action,
                            change.id,
                            change.kind
                        );
                    } else {
                        info!(
                            instance = instance_id,
                            "{}d resource [{}] type={} changes={:?}",
                            change.action,
                            change.id,
                            change.kind,
                            change.changes
                        );
                    }
                }
                Err(source) => {
                    let error = ReconcileError {
                        resource_id: change.id.clone(),
                        action: change.action,
                        source,
                    };
                    warn!(instance = instance_id, "{}", error);
                    match (change.action, change.kind) {
                        (Action::Create, ResourceKind::Host)
                        | (Action::Delete, ResourceKind::Component) => {
                            blocked_hosts.insert(change.host_id.as_str());
                        }
                        _ => {}
                    }
                    result.errors.push(error.clone());
                    if !options.continue_on_error {
                        result.unchanged = count_unchanged(&persisted, &diff);
                        return Err(ReconcileFailure { result, error });
                    }
                }
            }
        }

        result.unchanged = count_unchanged(&persisted, &diff);
        Ok(result)
    }

    /// Reconcile, then record the outcome in the instance's status label.
    ///
    /// The label moves to `applied` when every change succeeded and to
    /// `failed` otherwise. A dry run leaves the label alone. A fail-fast abort
    /// comes back as `StrataError::Aborted` once the label is saved.
    pub fn reconcile_and_record(
        &self,
        ctx: &ReconcileContext,
        options: &ReconcileOptions,
    ) -> StrataResult<ReconcileResult> {
        let outcome = self.reconcile_with_options(ctx, options);
        if options.dry_run {
            return Ok(outcome?);
        }

        let instance_id = ctx.instance_id();
        let succeeded = matches!(&outcome, Ok(result) if result.is_success());
        let mut label = match &ctx.label {
            Some(label) => label.clone(),
            None => self
                .store
                .get_status(instance_id)
                .unwrap_or_else(|_| Label::new(instance_id, ctx.model.id.as_str())),
        };
        label.model_id = ctx.model.id.clone();
        let state = if succeeded {
            InstanceState::Applied
        } else {
            InstanceState::Failed
        };
        self.store.save_status(instance_id, label.transition(state))?;

        Ok(outcome?)
    }

    /// The diff a reconcile would apply, without applying it.
    pub fn get_diff(&self, ctx: &ReconcileContext) -> Diff {
        let instance_id = ctx.instance_id();
        let persisted = self.load_persisted(instance_id);
        plan(instance_id, ctx.model(), &persisted)
    }

    fn load_persisted(&self, instance_id: &str) -> ResourceMap {
        match self.store.get_resources(instance_id) {
            Ok(resources) => resources,
            Err(err) => {
                warn!(
                    "Unable to load resources for instance [{}]: {}. Assuming fresh start.",
                    instance_id, err
                );
                ResourceMap::new()
            }
        }
    }
}

/// Rebuild a model from persisted resources.
///
/// Hosts come from `host` entries, keeping their region and instance type.
/// Components come from `component` entries and attach to their host; a
/// component whose host entry is missing is skipped (see
/// [`stranded_components`]).
pub fn rebuild_model(model_id: &str, resources: &ResourceMap) -> Model {
    let mut model = Model::new(model_id);

    for resource in resources.values().filter(|r| r.kind == ResourceKind::Host) {
        let region_id = resource.meta(META_REGION_ID).unwrap_or(DEFAULT_REGION);
        let host = Host::new(resource.id.clone())
            .with_instance_type(resource.meta(META_INSTANCE_TYPE).unwrap_or_default());
        model.region_entry(region_id).insert_host(host);
    }

    for resource in resources
        .values()
        .filter(|r| r.kind == ResourceKind::Component)
    {
        let Some(component_id) = resource.component_id() else {
            warn!("component resource [{}] has no component id, ignoring", resource.id);
            continue;
        };
        let host_id = resource.host_id();
        let Some(host) = model.host_mut(host_id) else {
            warn!(
                "component resource [{}] refers to unknown host [{}], ignoring",
                resource.id, host_id
            );
            continue;
        };
        let label = resource.meta(META_COMPONENT_TYPE).unwrap_or_default();
        host.insert_component(Component::new(component_id, ComponentType::labelled(label)));
    }

    model
}

/// Component records that [`rebuild_model`] cannot attach to a host.
///
/// These are left behind when a host record is removed or never written
/// while its components were.
pub fn stranded_components(resources: &ResourceMap) -> Vec<&ResourceState> {
    resources
        .values()
        .filter(|r| r.kind == ResourceKind::Component)
        .filter(|r| match resources.get(r.host_id()) {
            Some(host) => host.kind != ResourceKind::Host || r.component_id().is_none(),
            None => true,
        })
        .collect()
}

/// Diff of desired against persisted, with stranded components the desired
/// model does not keep queued for deletion ahead of the regular deletes.
fn plan(instance_id: &str, desired: &Model, persisted: &ResourceMap) -> Diff {
    let current = rebuild_model(instance_id, persisted);
    let mut diff = compute_diff(desired, &current);

    let stranded: Vec<ResourceChange> = stranded_components(persisted)
        .into_iter()
        .filter(|resource| {
            let wanted = desired.host(resource.host_id()).zip(resource.component_id());
            !matches!(wanted, Some((host, id)) if host.components.contains_key(id))
        })
        .map(|resource| ResourceChange {
            id: resource.id.clone(),
            kind: ResourceKind::Component,
            region_id: resource
                .meta(META_REGION_ID)
                .unwrap_or(DEFAULT_REGION)
                .to_string(),
            host_id: resource.host_id().to_string(),
            component_id: resource.component_id().map(str::to_string),
            action: Action::Delete,
            changes: Vec::new(),
            old_metadata: BTreeMap::new(),
            new_metadata: BTreeMap::new(),
        })
        .collect();
    diff.to_delete.splice(0..0, stranded);
    diff
}

/// Resource record to persist for a create or update.
fn build_resource(change: &ResourceChange, persisted: &ResourceMap) -> ResourceState {
    let mut metadata = BTreeMap::from([
        (META_REGION_ID.to_string(), change.region_id.clone()),
        (META_HOST_ID.to_string(), change.host_id.clone()),
    ]);
    for (key, value) in &change.new_metadata {
        if !value.is_empty() {
            metadata.insert(key.clone(), value.clone());
        }
    }
    if let Some(component_id) = &change.component_id {
        metadata.insert(META_COMPONENT_ID.to_string(), component_id.clone());
    }

    let now = Utc::now();
    let created_at = persisted
        .get(&change.id)
        .map(|existing| existing.created_at)
        .unwrap_or(now);

    ResourceState {
        id: change.id.clone(),
        kind: change.kind,
        status: ResourceStatus::Running,
        metadata,
        created_at,
        updated_at: now,
    }
}

/// Persisted resources that no change touches.
fn count_unchanged(persisted: &ResourceMap, diff: &Diff) -> usize {
    let changed = diff.changed_ids();
    persisted
        .keys()
        .filter(|id| !changed.contains(id.as_str()))
        .count()
}
