//! Property tests for reconciliation against the in-memory store.

use proptest::prelude::*;

use std::collections::BTreeSet;

use strata::application::{rebuild_model, stranded_components};
use strata::domain::ports::{ResourceMap, StoreResult};
use strata::{
    compute_diff, Label, MemoryStore, ReconcileContext, ReconcileOptions, Reconciler,
    ResourceState, ResourceStore, StatusStore, StoreError,
};

use crate::models::{arb_model, resource_ids};

fn stored_ids(reconciler: &Reconciler<MemoryStore>) -> BTreeSet<String> {
    ids_in(reconciler.store())
}

fn ids_in(store: &impl ResourceStore) -> BTreeSet<String> {
    store.get_resources("t1").unwrap().into_keys().collect()
}

/// Rejects every write to a single resource id.
struct RejectOne {
    inner: MemoryStore,
    resource_id: String,
}

impl RejectOne {
    fn check(&self, resource_id: &str) -> StoreResult<()> {
        if resource_id == self.resource_id {
            return Err(StoreError::Backend {
                message: format!("rejected {resource_id}"),
            });
        }
        Ok(())
    }
}

impl StatusStore for RejectOne {
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

impl ResourceStore for RejectOne {
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

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: the second reconcile of the same model changes nothing
    #[test]
    fn property_reconcile_is_idempotent(model in arb_model()) {
        let reconciler = Reconciler::new(MemoryStore::new());
        let ctx = ReconcileContext::new(model);

        let first = reconciler.reconcile(&ctx).unwrap();
        let second = reconciler.reconcile(&ctx).unwrap();

        prop_assert_eq!(second.created, 0);
        prop_assert_eq!(second.updated, 0);
        prop_assert_eq!(second.deleted, 0);
        prop_assert_eq!(second.unchanged, first.created);
    }

    /// PROPERTY: applying B over A leaves exactly B's resources
    #[test]
    fn property_reconcile_converges(a in arb_model(), b in arb_model()) {
        let reconciler = Reconciler::new(MemoryStore::new());
        reconciler.reconcile(&ReconcileContext::new(a)).unwrap();
        reconciler.reconcile(&ReconcileContext::new(b.clone())).unwrap();

        prop_assert_eq!(stored_ids(&reconciler), resource_ids(&b));

        let rebuilt = rebuild_model("t1", &reconciler.store().get_resources("t1").unwrap());
        prop_assert!(compute_diff(&b, &rebuilt).is_empty());
    }

    /// PROPERTY: a dry run reports the diff sizes and writes nothing
    #[test]
    fn property_dry_run_matches_diff(a in arb_model(), b in arb_model()) {
        let reconciler = Reconciler::new(MemoryStore::new());
        reconciler.reconcile(&ReconcileContext::new(a)).unwrap();
        let before = stored_ids(&reconciler);

        let ctx = ReconcileContext::new(b);
        let diff = reconciler.get_diff(&ctx);
        let result = reconciler
            .reconcile_with_options(&ctx, &ReconcileOptions::new().with_dry_run(true))
            .unwrap();

        prop_assert_eq!(result.created, diff.to_create.len());
        prop_assert_eq!(result.updated, diff.to_update.len());
        prop_assert_eq!(result.deleted, diff.to_delete.len());
        prop_assert_eq!(stored_ids(&reconciler), before);
    }

    /// PROPERTY: a pass that loses one write still converges on the next clean pass
    #[test]
    fn property_reconcile_converges_after_partial_failure(
        a in arb_model(),
        b in arb_model(),
        victim in any::<prop::sample::Index>(),
    ) {
        let seeded = MemoryStore::new();
        Reconciler::new(&seeded).reconcile(&ReconcileContext::new(a)).unwrap();

        let ctx = ReconcileContext::new(b.clone());
        let changed: Vec<String> = Reconciler::new(&seeded)
            .get_diff(&ctx)
            .changes()
            .map(|c| c.id.clone())
            .collect();
        prop_assume!(!changed.is_empty());

        let flaky = Reconciler::new(RejectOne {
            inner: seeded,
            resource_id: changed[victim.index(changed.len())].clone(),
        });
        let partial = flaky
            .reconcile_with_options(&ctx, &ReconcileOptions::new().with_continue_on_error(true))
            .unwrap();
        prop_assert_eq!(partial.errors.len(), 1);

        let store = &flaky.store().inner;
        let persisted = store.get_resources("t1").unwrap();
        prop_assert!(stranded_components(&persisted).is_empty());

        Reconciler::new(store).reconcile(&ctx).unwrap();
        prop_assert_eq!(ids_in(store), resource_ids(&b));
        let rebuilt = rebuild_model("t1", &store.get_resources("t1").unwrap());
        prop_assert!(compute_diff(&b, &rebuilt).is_empty());
    }
}
