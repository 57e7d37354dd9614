//! Run and step status enums.

use super::Phase;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of a single pipeline run.
///
/// `Completed` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RunState {
    /// The run has not executed yet.
    #[default]
    NotStarted,
    /// A step of the given phase is executing.
    Running {
        /// The current phase.
        phase: Phase,
        /// Position of the current step in the ordered phase.
        step_index: usize,
    },
    /// Every phase was applied.
    Completed,
    /// The run stopped at a failure.
    Failed {
        /// The phase that failed.
        phase: Phase,
        /// The failing step, or `None` when discovery itself failed.
        step_index: Option<usize>,
    },
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotStarted => write!(f, "not_started"),
            Self::Running { phase, step_index } => write!(f, "running({phase}, {step_index})"),
            Self::Completed => write!(f, "completed"),
            Self::Failed { phase, .. } => write!(f, "failed({phase})"),
        }
    }
}

impl RunState {
    /// Returns true if the state cannot be left.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed { .. })
    }
}

/// Outcome of one executed step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    /// `process` returned successfully.
    Completed,
    /// `process` returned an error.
    Failed,
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}
