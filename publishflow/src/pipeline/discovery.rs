//! Step discovery.

use crate::core::Phase;
use crate::errors::PublishError;
use crate::steps::StepDescriptor;
use std::collections::HashSet;

/// A place step definitions are discovered from.
///
/// Implementations return every step exposed for a phase, or an empty list
/// when the phase has no definitions. A definition that cannot be loaded is
/// an error; a definition that loads but exposes no step is left out.
pub trait StepSource: Send + Sync {
    /// Returns a name identifying the source in diagnostics.
    fn name(&self) -> &str;

    /// Loads the steps exposed for `phase`, in discovery order.
    ///
    /// Discovery order is the tie-break between steps of equal order, so it
    /// must be deterministic: lexicographic by file name for hook packages,
    /// by definition name for registries.
    fn load_phase(&self, phase: Phase) -> Result<Vec<StepDescriptor>, PublishError>;
}

/// Discovers the steps of a phase, keeping the source's discovery order.
///
/// # Errors
///
/// Propagates load errors from the source and rejects two definitions
/// sharing a name with `PublishError::DuplicateStep`.
pub fn discover_steps(
    source: &dyn StepSource,
    phase: Phase,
) -> Result<Vec<StepDescriptor>, PublishError> {
    let steps = source.load_phase(phase)?;

    let mut seen = HashSet::with_capacity(steps.len());
    for desc in &steps {
        if !seen.insert(desc.definition.as_str()) {
            return Err(PublishError::DuplicateStep {
                phase,
                definition: desc.definition.clone(),
            });
        }
    }

    tracing::debug!(
        source = source.name(),
        phase = %phase,
        count = steps.len(),
        "Discovered steps"
    );

    Ok(steps)
}
