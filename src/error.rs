//! Error types for Strata
//!
//! Each layer owns its error enum; `StrataError` gathers them for library
//! entry points that cross layers, such as `Reconciler::reconcile_and_record`.
//! The binary wraps everything in `anyhow`.

use thiserror::Error;

use crate::application::reconcile::{ReconcileError, ReconcileFailure};
use crate::config::ConfigError;
use crate::domain::ports::{LoadError, ProcessError, StoreError};
use crate::domain::services::RegistryError;

/// Result type alias for Strata operations
pub type StrataResult<T> = Result<T, StrataError>;

#[derive(Error, Debug)]
pub enum StrataError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Process(#[from] ProcessError),

    #[error(transparent)]
    Reconcile(#[from] ReconcileError),

    /// A fail-fast reconcile stopped early; the partial result is kept
    #[error(transparent)]
    Aborted(#[from] Box<ReconcileFailure>),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<ReconcileFailure> for StrataError {
    fn from(failure: ReconcileFailure) -> Self {
        StrataError::Aborted(Box::new(failure))
    }
}
