//! Reconcile Context

use crate::domain::entities::{Label, Model};

/// The desired model plus whatever the caller knows about its instance.
///
/// The instance id is the desired model's id.
#[derive(Debug, Clone)]
pub struct ReconcileContext {
    pub model: Model,
    pub label: Option<Label>,
}

impl ReconcileContext {
    pub fn new(model: Model) -> Self {
        Self { model, label: None }
    }

    pub fn with_label(mut self, label: Label) -> Self {
        self.label = Some(label);
        self
    }

    pub fn with_model(mut self, model: Model) -> Self {
        self.model = model;
        self
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn instance_id(&self) -> &str {
        &self.model.id
    }
}
