//! Application Layer
//!
//! Use cases that orchestrate the business flow.
//! This layer:
//! - Depends on Domain layer (entities, services, ports)
//! - Does NOT contain business rules (those are in Domain)
//! - Coordinates between Infrastructure and Domain
//!
//! ## Use Cases
//!
//! - `Reconciler` - Load persisted state, diff against the desired model, apply

pub mod reconcile;

pub use reconcile::{
    rebuild_model, stranded_components, ReconcileContext, ReconcileError, ReconcileFailure,
    ReconcileOptions, ReconcileResult, Reconciler,
};
