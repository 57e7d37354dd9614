//! In-memory step registry.
//!
//! Step definitions register themselves with an explicit call instead of
//! being found on disk. The registry maps each phase to the definitions
//! registered for it.

use super::StepSource;
use crate::core::Phase;
use crate::errors::PublishError;
use crate::steps::{Step, StepDescriptor};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Registry of step definitions, bucketed by phase.
#[derive(Default)]
pub struct StepRegistry {
    name: String,
    phases: RwLock<HashMap<Phase, Vec<StepDescriptor>>>,
}

impl StepRegistry {
    /// Creates a new empty registry.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phases: RwLock::new(HashMap::new()),
        }
    }

    /// Registers a step under a definition name.
    ///
    /// # Errors
    ///
    /// Returns `PublishError::DuplicateStep` if the phase already holds a
    /// definition with that name.
    pub fn register(
        &self,
        phase: Phase,
        definition: impl Into<String>,
        step: Arc<dyn Step>,
    ) -> Result<(), PublishError> {
        self.insert(StepDescriptor::new(phase, definition, step))
    }

    /// Registers a step, overriding its order.
    ///
    /// # Errors
    ///
    /// Returns `PublishError::DuplicateStep` if the phase already holds a
    /// definition with that name.
    pub fn register_with_order(
        &self,
        phase: Phase,
        definition: impl Into<String>,
        order: i32,
        step: Arc<dyn Step>,
    ) -> Result<(), PublishError> {
        self.insert(StepDescriptor::new(phase, definition, step).with_order(order))
    }

    fn insert(&self, desc: StepDescriptor) -> Result<(), PublishError> {
        let mut phases = self.phases.write();
        let bucket = phases.entry(desc.phase).or_default();

        if bucket.iter().any(|d| d.definition == desc.definition) {
            return Err(PublishError::DuplicateStep {
                phase: desc.phase,
                definition: desc.definition,
            });
        }

        tracing::debug!(
            registry = %self.name,
            phase = %desc.phase,
            definition = %desc.definition,
            order = desc.order,
            "Registered step"
        );
        bucket.push(desc);
        Ok(())
    }

    /// Removes a definition. Returns true if it was registered.
    pub fn unregister(&self, phase: Phase, definition: &str) -> bool {
        let mut phases = self.phases.write();
        let Some(bucket) = phases.get_mut(&phase) else {
            return false;
        };
        let before = bucket.len();
        bucket.retain(|d| d.definition != definition);
        bucket.len() != before
    }

    /// Lists the definition names of a phase, in registration order.
    #[must_use]
    pub fn definitions(&self, phase: Phase) -> Vec<String> {
        self.phases
            .read()
            .get(&phase)
            .map(|bucket| bucket.iter().map(|d| d.definition.clone()).collect())
            .unwrap_or_default()
    }

    /// Returns the total number of registered definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.phases.read().values().map(Vec::len).sum()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every definition.
    pub fn clear(&self) {
        self.phases.write().clear();
    }
}

impl StepSource for StepRegistry {
    fn name(&self) -> &str {
        &self.name
    }

    fn load_phase(&self, phase: Phase) -> Result<Vec<StepDescriptor>, PublishError> {
        let mut steps = self.phases.read().get(&phase).cloned().unwrap_or_default();
        steps.sort_by(|a, b| a.definition.cmp(&b.definition));
        Ok(steps)
    }
}

impl std::fmt::Debug for StepRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StepRegistry")
            .field("name", &self.name)
            .field("step_count", &self.len())
            .finish()
    }
}

// Global registry
static GLOBAL_REGISTRY: RwLock<Option<Arc<StepRegistry>>> = RwLock::new(None);

/// Gets the process-wide step registry.
pub fn global_registry() -> Arc<StepRegistry> {
    if let Some(registry) = GLOBAL_REGISTRY.read().as_ref() {
        return Arc::clone(registry);
    }

    let mut write = GLOBAL_REGISTRY.write();
    Arc::clone(write.get_or_insert_with(|| Arc::new(StepRegistry::new("global"))))
}

/// Clears the process-wide step registry.
pub fn clear_global_registry() {
    *GLOBAL_REGISTRY.write() = None;
}

/// Registers a step in the process-wide registry.
///
/// # Errors
///
/// Returns `PublishError::DuplicateStep` if the definition name is taken.
pub fn register_step(
    phase: Phase,
    definition: impl Into<String>,
    step: Arc<dyn Step>,
) -> Result<(), PublishError> {
    global_registry().register(phase, definition, step)
}
