//! Scenario: Partial Failure and Recovery
//!
//! Journey: A backend rejects writes for one host midway through a
//! reconciliation. The operator retries once the backend recovers.
//!
//! Steps:
//! 1. Reconcile a three-host model while writes for `edge-west` fail
//! 2. Inspect what was applied before (or around) the failure
//! 3. Lift the failure and reconcile again
//!
//! Success Criteria:
//! - Fail-fast stops at the first failed write and keeps earlier writes
//! - Continue-on-error records every failure and applies everything that does
//!   not hang off a failed host
//! - The retry only touches what is still missing

use std::sync::{Arc, Mutex};

use strata::domain::ports::{ResourceMap, StoreResult};
use strata::domain::services::ComponentRegistry;
use strata::{
    Label, MemoryStore, Model, ReconcileContext, ReconcileOptions, Reconciler, ResourceState,
    ResourceStore, StatusStore, StoreError, YamlModelLoader,
};

use crate::common::*;

/// Rejects every write that touches the blocked host.
struct FlakyBackend {
    inner: MemoryStore,
    blocked_host: Mutex<Option<String>>,
}

impl FlakyBackend {
    fn blocking(host: &str) -> Self {
        Self {
            inner: MemoryStore::new(),
            blocked_host: Mutex::new(Some(host.to_string())),
        }
    }

    fn recover(&self) {
        *self.blocked_host.lock().unwrap() = None;
    }

    fn check(&self, resource_id: &str) -> StoreResult<()> {
        let blocked = self.blocked_host.lock().unwrap();
        match blocked.as_deref() {
            Some(host) if resource_id == host || resource_id.starts_with(&format!("{host}/")) => {
                Err(StoreError::Backend {
                    message: format!("quota exceeded for {resource_id}"),
                })
            }
            _ => Ok(()),
        }
    }
}

impl StatusStore for FlakyBackend {
    fn get_status(&self, instance_id: &str) -> StoreResult<Label> {
        self.inner.get_status(instance_id)
    }

    fn save_status(&self, instance_id: &str, label: Label) -> StoreResult<()> {
        self.inner.save_status(instance_id, label)
    }

    fn list_instances(&self) -> StoreResult<Vec<String>> {
        self.inner.list_instances()
    }
}

impl ResourceStore for FlakyBackend {
    fn get_resources(&self, instance_id: &str) -> StoreResult<ResourceMap> {
        self.inner.get_resources(instance_id)
    }

    fn save_resource(&self, instance_id: &str, resource: ResourceState) -> StoreResult<()> {
        self.check(&resource.id)?;
        self.inner.save_resource(instance_id, resource)
    }

    fn delete_resource(&self, instance_id: &str, resource_id: &str) -> StoreResult<()> {
        self.check(resource_id)?;
        self.inner.delete_resource(instance_id, resource_id)
    }
}

fn multi_region() -> Model {
    YamlModelLoader::new(Arc::new(ComponentRegistry::with_builtins()))
        .load_str(MULTI_REGION)
        .expect("fixture should load")
}

fn stored_ids(store: &FlakyBackend) -> Vec<String> {
    store.get_resources("edge").unwrap().into_keys().collect()
}

/// SCENARIO: fail-fast stops at the first rejected write
#[test]
fn scenario_fail_fast_then_retry() {
    let reconciler = Reconciler::new(FlakyBackend::blocking("edge-west"));
    let ctx = ReconcileContext::new(multi_region());

    // Step 1: hosts are applied in id order, so ctrl and edge-east land first.
    let failure = reconciler.reconcile(&ctx).unwrap_err();
    assert_eq!(failure.result.created, 4);
    assert_eq!(failure.error.resource_id, "edge-west");
    assert!(failure.to_string().contains("quota exceeded"));

    // Step 2: nothing after the failure was written.
    assert_eq!(
        stored_ids(reconciler.store()),
        ["ctrl", "ctrl/ctrl", "edge-east", "edge-east/router"]
    );

    // Step 3: the retry picks up exactly the missing resources.
    reconciler.store().recover();
    let result = reconciler.reconcile(&ctx).unwrap();
    assert_eq!(result.created, 3);
    assert_eq!(result.unchanged, 4);
    assert_eq!(stored_ids(reconciler.store()).len(), 7);
}

/// SCENARIO: continue-on-error applies every healthy change
#[test]
fn scenario_continue_on_error_collects_failures() {
    let reconciler = Reconciler::new(FlakyBackend::blocking("edge-west"));
    let ctx = ReconcileContext::new(multi_region());
    let options = ReconcileOptions::new().with_continue_on_error(true);

    let result = reconciler.reconcile_with_options(&ctx, &options).unwrap();

    assert!(!result.is_success());
    assert_eq!(result.created, 4);
    let failed: Vec<&str> = result
        .errors
        .iter()
        .map(|e| e.resource_id.as_str())
        .collect();
    assert_eq!(failed, ["edge-west"]);
    // Components of the failed host are held back, not written host-less.
    assert_eq!(
        stored_ids(reconciler.store()),
        ["ctrl", "ctrl/ctrl", "edge-east", "edge-east/router"]
    );

    reconciler.store().recover();
    let result = reconciler.reconcile_with_options(&ctx, &options).unwrap();
    assert!(result.is_success());
    assert_eq!((result.created, result.unchanged), (3, 4));
}
