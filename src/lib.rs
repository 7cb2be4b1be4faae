//! Strata - declarative reconciliation engine
//!
//! Strata keeps a persisted record of what has been applied for each
//! instance, diffs it against a desired region/host/component model and
//! applies the difference through a pluggable store.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod presentation;

// Re-exports for convenience
pub use application::{
    ReconcileContext, ReconcileError, ReconcileFailure, ReconcileOptions, ReconcileResult,
    Reconciler,
};
pub use config::Config;
pub use domain::entities::{Component, Host, InstanceState, Label, Model, Region, ResourceState};
pub use domain::ports::{ModelLoader, ResourceStore, StatusStore, StoreError};
pub use domain::services::{compute_diff, ComponentRegistry, Diff};
pub use error::{StrataError, StrataResult};
pub use infrastructure::{FileStore, MemoryStore, YamlModelLoader};
