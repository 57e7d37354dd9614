//! Diagnostic records of a pipeline run.

use crate::core::{Phase, RunState, StepStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What happened to one executed step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    /// Phase the step ran in.
    pub phase: Phase,
    /// Definition that exposed the step.
    pub definition: String,
    /// Step label.
    pub label: String,
    /// Priority the step ran with.
    pub order: i32,
    /// Outcome.
    pub status: StepStatus,
    /// Wall time spent in `process`, in milliseconds.
    pub duration_ms: f64,
    /// Error message if the step failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StepRecord {
    /// Returns true if the step succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self.status, StepStatus::Completed)
    }
}

/// Summary of a pipeline run, in execution order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Run identifier.
    pub run_id: Uuid,
    /// Name of the step source.
    pub source: String,
    /// Final (or current) state of the run.
    pub state: RunState,
    /// When the run started.
    pub started_at: Option<DateTime<Utc>>,
    /// When the run reached a terminal state.
    pub ended_at: Option<DateTime<Utc>>,
    /// Executed steps, in execution order.
    #[serde(default)]
    pub steps: Vec<StepRecord>,
}

impl RunReport {
    /// Creates an empty report.
    #[must_use]
    pub fn new(run_id: Uuid, source: impl Into<String>) -> Self {
        Self {
            run_id,
            source: source.into(),
            state: RunState::NotStarted,
            started_at: None,
            ended_at: None,
            steps: Vec::new(),
        }
    }

    /// Returns the labels of executed steps, in execution order.
    #[must_use]
    pub fn labels(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.label.as_str()).collect()
    }

    /// Returns the steps executed in a phase.
    pub fn phase_steps(&self, phase: Phase) -> impl Iterator<Item = &StepRecord> {
        self.steps.iter().filter(move |s| s.phase == phase)
    }

    /// Returns the failing step, if any.
    #[must_use]
    pub fn failed_step(&self) -> Option<&StepRecord> {
        self.steps.iter().find(|s| !s.is_success())
    }

    /// Returns the run duration in milliseconds, once finished.
    #[must_use]
    pub fn duration_ms(&self) -> Option<f64> {
        match (self.started_at, self.ended_at) {
            (Some(start), Some(end)) => Some((end - start).num_microseconds()? as f64 / 1000.0),
            _ => None,
        }
    }
}
