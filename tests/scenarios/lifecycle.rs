//! Scenario: Instance Lifecycle
//!
//! Journey: An operator brings an instance up, resizes a host, and tears it
//! down again, all against the same store.
//!
//! Steps:
//! 1. Reconcile a one-host model against an empty store
//! 2. Reconcile the same model again
//! 3. Change the host's instance type and reconcile
//! 4. Reconcile a model with no regions
//!
//! Success Criteria:
//! - Counts match the diff at every step
//! - Re-running an applied model changes nothing
//! - Tear-down removes the component before its host

use std::sync::Arc;

use strata::domain::services::ComponentRegistry;
use strata::{
    MemoryStore, Model, ReconcileContext, ReconcileOptions, Reconciler, ResourceStore,
    YamlModelLoader,
};

use crate::common::*;

fn load(yaml: &str) -> Model {
    YamlModelLoader::new(Arc::new(ComponentRegistry::with_builtins()))
        .load_str(yaml)
        .expect("fixture should load")
}

fn resource_ids(store: &MemoryStore, instance: &str) -> Vec<String> {
    store
        .get_resources(instance)
        .unwrap()
        .into_keys()
        .collect()
}

/// SCENARIO: create, idempotent re-run, update, delete
#[test]
fn scenario_instance_lifecycle() {
    let reconciler = Reconciler::new(MemoryStore::new());

    // Step 1: bring the instance up
    let ctx = ReconcileContext::new(load(SINGLE_HOST));
    let result = reconciler.reconcile(&ctx).unwrap();
    assert_eq!((result.created, result.updated, result.deleted), (2, 0, 0));
    assert_eq!(resource_ids(reconciler.store(), "t1"), ["h1", "h1/c1"]);

    // Step 2: nothing left to do
    let result = reconciler.reconcile(&ctx).unwrap();
    assert_eq!((result.created, result.updated, result.deleted), (0, 0, 0));
    assert_eq!(result.unchanged, 2);
    assert!(!result.has_changes());

    // Step 3: resize the host, the component stays as is
    let ctx = ReconcileContext::new(load(SINGLE_HOST_RESIZED));
    let result = reconciler.reconcile(&ctx).unwrap();
    assert_eq!((result.created, result.updated, result.deleted), (0, 1, 0));
    assert_eq!(result.unchanged, 1);
    let host = &reconciler.store().get_resources("t1").unwrap()["h1"];
    assert_eq!(host.meta("instanceType"), Some("large"));

    // Step 4: tear everything down
    let ctx = ReconcileContext::new(load(EMPTY_MODEL));
    let diff = reconciler.get_diff(&ctx);
    let order: Vec<&str> = diff.to_delete.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(order, ["h1/c1", "h1"]);

    let result = reconciler.reconcile(&ctx).unwrap();
    assert_eq!((result.created, result.updated, result.deleted), (0, 0, 2));
    assert_eq!(result.unchanged, 0);
    assert!(resource_ids(reconciler.store(), "t1").is_empty());
}

/// SCENARIO: a dry run reports the plan and leaves the store untouched
#[test]
fn scenario_dry_run_never_mutates() {
    let reconciler = Reconciler::new(MemoryStore::new());
    let ctx = ReconcileContext::new(load(MULTI_REGION));

    let result = reconciler
        .reconcile_with_options(&ctx, &ReconcileOptions::new().with_dry_run(true))
        .unwrap();

    assert!(result.dry_run);
    assert_eq!(result.created, 7);
    assert!(resource_ids(reconciler.store(), "edge").is_empty());

    // The real run applies exactly what the dry run announced.
    let applied = reconciler.reconcile(&ctx).unwrap();
    assert_eq!(applied.created, result.created);
    assert_eq!(resource_ids(reconciler.store(), "edge").len(), 7);
}

/// SCENARIO: instances never see each other's resources
#[test]
fn scenario_instances_are_isolated() {
    let reconciler = Reconciler::new(MemoryStore::new());
    reconciler
        .reconcile(&ReconcileContext::new(load(SINGLE_HOST)))
        .unwrap();
    reconciler
        .reconcile(&ReconcileContext::new(load(MULTI_REGION)))
        .unwrap();

    // Tearing down t1 leaves edge alone.
    reconciler
        .reconcile(&ReconcileContext::new(load(EMPTY_MODEL)))
        .unwrap();

    assert!(resource_ids(reconciler.store(), "t1").is_empty());
    assert_eq!(resource_ids(reconciler.store(), "edge").len(), 7);
}
