//! Reconcile Module
//!
//! Converges persisted resources toward a desired model.
//!
//! ## Structure
//!
//! - `context` - What is being reconciled (`ReconcileContext`)
//! - `options` - Behavior switches (`ReconcileOptions`)
//! - `result` - Outcome types (`ReconcileResult`, `ReconcileError`, `ReconcileFailure`)
//! - `use_case` - The `Reconciler` itself
//!
//! ## Usage
//!
//! ```ignore
//! use strata::application::reconcile::{ReconcileContext, ReconcileOptions, Reconciler};
//!
//! let reconciler = Reconciler::new(store);
//! let result = reconciler.reconcile_with_options(&ReconcileContext::new(model), &options)?;
//! ```

mod context;
mod options;
mod result;
mod use_case;

pub use context::ReconcileContext;
pub use options::ReconcileOptions;
pub use result::{ReconcileError, ReconcileFailure, ReconcileResult};
pub use use_case::{rebuild_model, stranded_components, Reconciler};
