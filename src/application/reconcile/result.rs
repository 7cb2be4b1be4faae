//! Reconcile Result
//!
//! Result types for reconcile operations.

use serde::Serialize;
use thiserror::Error;

use crate::domain::ports::StoreError;
use crate::domain::services::Action;

/// A store write or delete that failed while applying a change
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("failed to {action} resource [{resource_id}]: {source}")]
pub struct ReconcileError {
    pub resource_id: String,
    pub action: Action,
    #[source]
    pub source: StoreError,
}

impl Serialize for ReconcileError {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut s = serializer.serialize_struct("ReconcileError", 3)?;
        s.serialize_field("resourceId", &self.resource_id)?;
        s.serialize_field("action", &self.action)?;
        s.serialize_field("error", &self.source.to_string())?;
        s.end()
    }
}

/// Summary of one reconciliation pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileResult {
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
    pub unchanged: usize,
    pub errors: Vec<ReconcileError>,
    pub dry_run: bool,
}

impl ReconcileResult {
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Self::default()
        }
    }

    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_changes(&self) -> bool {
        self.created + self.updated + self.deleted > 0
    }

    /// Resources written or deleted (or that would be, for a dry run).
    pub fn total_changed(&self) -> usize {
        self.created + self.updated + self.deleted
    }
}

/// A fail-fast reconciliation that stopped at its first failed write.
///
/// Changes applied before the failure stay applied; `result` counts them.
#[derive(Debug, Clone, Error)]
#[error("reconciliation aborted: {error}")]
pub struct ReconcileFailure {
    pub result: ReconcileResult,
    #[source]
    pub error: ReconcileError,
}
