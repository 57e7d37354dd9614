//! Discovered step descriptors.

use super::Step;
use crate::core::Phase;
use std::sync::Arc;

/// A step as exposed by one definition, ready for ordering.
///
/// `definition` is the name of the definition that exposed the step (the file
/// stem for hook directories, the registration name for registries).
#[derive(Debug, Clone)]
pub struct StepDescriptor {
    /// Name of the definition exposing the step.
    pub definition: String,
    /// Phase the step belongs to.
    pub phase: Phase,
    /// Label used in diagnostics.
    pub label: String,
    /// Priority within the phase.
    pub order: i32,
    /// The step instance.
    pub step: Arc<dyn Step>,
}

impl StepDescriptor {
    /// Describes a step, taking its label and order from the step itself.
    #[must_use]
    pub fn new(phase: Phase, definition: impl Into<String>, step: Arc<dyn Step>) -> Self {
        Self {
            definition: definition.into(),
            phase,
            label: step.label().to_string(),
            order: step.order(),
            step,
        }
    }

    /// Overrides the label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Overrides the order.
    #[must_use]
    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }
}
