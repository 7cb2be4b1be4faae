//! Presentation Layer
//!
//! This layer handles:
//! - Creating use cases with infrastructure dependencies
//! - Output formatting (text/JSON)
//!
//! ## Structure
//!
//! - `factory` - Creates use cases with proper dependencies (dependency injection)
//! - `output` - Output rendering abstractions
//!
//! ## Usage
//!
//! ```ignore
//! use strata::presentation::factory;
//!
//! let reconciler = factory::create_reconciler(&config);
//! let result = reconciler.reconcile(&ReconcileContext::new(model));
//! ```

pub mod factory;
pub mod output;

pub use factory::{create_loader, create_reconciler, create_registry, create_store};
pub use output::{create_renderer, OutputFormat, Renderer};
