//! Instance label entity
//!
//! Status record of one tracked instance, kept by the status store.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstanceState {
    #[default]
    Created,
    Applied,
    Failed,
    Disposed,
}

impl fmt::Display for InstanceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InstanceState::Created => "created",
            InstanceState::Applied => "applied",
            InstanceState::Failed => "failed",
            InstanceState::Disposed => "disposed",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Label {
    #[serde(default)]
    pub instance_id: String,
    #[serde(default)]
    pub model_id: String,
    #[serde(default)]
    pub state: InstanceState,
    #[serde(default)]
    pub updated_at: DateTime<Utc>,
}

impl Label {
    pub fn new(instance_id: impl Into<String>, model_id: impl Into<String>) -> Self {
        Self {
            instance_id: instance_id.into(),
            model_id: model_id.into(),
            state: InstanceState::Created,
            updated_at: Utc::now(),
        }
    }

    /// Moves the label to `state` and refreshes its timestamp.
    pub fn transition(mut self, state: InstanceState) -> Self {
        self.state = state;
        self.updated_at = Utc::now();
        self
    }
}
