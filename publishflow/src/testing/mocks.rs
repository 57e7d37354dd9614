//! Mock steps for testing.

use parking_lot::Mutex;
use std::sync::Arc;

use crate::context::PublishContext;
use crate::errors::StepError;
use crate::steps::{Step, DEFAULT_ORDER};

/// Shared log of which steps ran, in call order.
#[derive(Debug, Clone, Default)]
pub struct StepJournal {
    entries: Arc<Mutex<Vec<String>>>,
}

impl StepJournal {
    /// Creates an empty journal.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a step label.
    pub fn record(&self, label: impl Into<String>) {
        self.entries.lock().push(label.into());
    }

    /// Returns the recorded labels in call order.
    #[must_use]
    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().clone()
    }

    /// Returns true if a step with this label ran.
    #[must_use]
    pub fn contains(&self, label: &str) -> bool {
        self.entries.lock().iter().any(|e| e == label)
    }

    /// Returns the number of recorded calls.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Returns true if nothing ran.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

/// A step that records its label in a journal and succeeds.
#[derive(Debug)]
pub struct RecordingStep {
    label: String,
    order: i32,
    journal: StepJournal,
}

impl RecordingStep {
    /// Creates a recording step with the default order.
    #[must_use]
    pub fn new(label: impl Into<String>, journal: &StepJournal) -> Self {
        Self {
            label: label.into(),
            order: DEFAULT_ORDER,
            journal: journal.clone(),
        }
    }

    /// Sets the order.
    #[must_use]
    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }
}

impl Step for RecordingStep {
    fn label(&self) -> &str {
        &self.label
    }

    fn order(&self) -> i32 {
        self.order
    }

    fn process(&self, _ctx: &mut PublishContext) -> Result<(), StepError> {
        self.journal.record(&self.label);
        Ok(())
    }
}

/// A step that records its label and then fails with a fixed message.
#[derive(Debug)]
pub struct FailingStep {
    label: String,
    order: i32,
    message: String,
    journal: StepJournal,
}

impl FailingStep {
    /// Creates a failing step with the default order.
    #[must_use]
    pub fn new(label: impl Into<String>, message: impl Into<String>, journal: &StepJournal) -> Self {
        Self {
            label: label.into(),
            order: DEFAULT_ORDER,
            message: message.into(),
            journal: journal.clone(),
        }
    }

    /// Sets the order.
    #[must_use]
    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }
}

impl Step for FailingStep {
    fn label(&self) -> &str {
        &self.label
    }

    fn order(&self) -> i32 {
        self.order
    }

    fn process(&self, _ctx: &mut PublishContext) -> Result<(), StepError> {
        self.journal.record(&self.label);
        Err(StepError::rejected(self.message.clone()))
    }
}

/// A step whose outcome can be changed between runs.
#[derive(Debug)]
pub struct MockStep {
    label: String,
    failure: Mutex<Option<String>>,
    call_count: Mutex<usize>,
}

impl MockStep {
    /// Creates a mock step that succeeds.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            failure: Mutex::new(None),
            call_count: Mutex::new(0),
        }
    }

    /// Makes the next calls fail with `message`.
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.failure.lock() = Some(message.into());
    }

    /// Makes the next calls succeed.
    pub fn succeed(&self) {
        *self.failure.lock() = None;
    }

    /// Returns the number of times the step was called.
    #[must_use]
    pub fn call_count(&self) -> usize {
        *self.call_count.lock()
    }
}

impl Step for MockStep {
    fn label(&self) -> &str {
        &self.label
    }

    fn process(&self, _ctx: &mut PublishContext) -> Result<(), StepError> {
        *self.call_count.lock() += 1;
        match self.failure.lock().clone() {
            Some(message) => Err(StepError::Rejected(message)),
            None => Ok(()),
        }
    }
}
