//! Pipeline execution.
//!
//! A run walks the four phases in their fixed order. For each phase it
//! discovers the steps afresh, orders them, and calls `process` on each one
//! in turn. The first error stops the run: no later step or phase is called
//! and nothing already done is undone.

use super::{discover_steps, order_steps, RunReport, StepRecord, StepSource};
use crate::context::PublishContext;
use crate::core::{Phase, RunState, StepStatus};
use crate::errors::PublishError;
use crate::observability::SpanTimer;
use crate::steps::StepDescriptor;
use chrono::Utc;
use tracing::{debug, error, info};
use uuid::Uuid;

/// One execution of the pipeline over a step source.
///
/// A run executes at most once. Once it reaches `Completed` or `Failed` it
/// stays there; start a new run to publish again.
pub struct PipelineRun<'a> {
    id: Uuid,
    source: &'a dyn StepSource,
    state: RunState,
    report: RunReport,
}

impl<'a> PipelineRun<'a> {
    /// Creates a run over `source`.
    #[must_use]
    pub fn new(source: &'a dyn StepSource) -> Self {
        let id = Uuid::new_v4();
        Self {
            id,
            source,
            state: RunState::NotStarted,
            report: RunReport::new(id, source.name()),
        }
    }

    /// Returns the run identifier.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Returns the report collected so far.
    #[must_use]
    pub fn report(&self) -> &RunReport {
        &self.report
    }

    /// Runs every phase against `ctx`.
    ///
    /// # Errors
    ///
    /// Returns the first discovery or step failure, or
    /// `PublishError::RunFinished` if this run already executed.
    pub fn execute(&mut self, ctx: &mut PublishContext) -> Result<RunReport, PublishError> {
        if self.state != RunState::NotStarted {
            return Err(PublishError::RunFinished { run_id: self.id });
        }

        let span = tracing::info_span!("publish", run_id = %self.id, source = self.source.name());
        let _guard = span.enter();

        self.report.started_at = Some(Utc::now());
        info!(publish = %ctx.publish_name(), "Publish started");

        for phase in Phase::ALL {
            if let Err(err) = self.run_phase(phase, ctx) {
                self.finish();
                error!(phase = %phase, error = %err, "Publish failed");
                return Err(err);
            }
        }

        self.state = RunState::Completed;
        self.finish();
        info!(
            steps = self.report.steps.len(),
            representations = ctx.representations().len(),
            "Publish completed"
        );
        Ok(self.report.clone())
    }

    fn run_phase(&mut self, phase: Phase, ctx: &mut PublishContext) -> Result<(), PublishError> {
        let steps = match discover_steps(self.source, phase) {
            Ok(steps) => order_steps(steps),
            Err(err) => {
                self.state = RunState::Failed {
                    phase,
                    step_index: None,
                };
                return Err(err);
            }
        };

        info!(phase = %phase, steps = steps.len(), "Running phase");

        for (step_index, desc) in steps.iter().enumerate() {
            self.state = RunState::Running { phase, step_index };
            if let Err(err) = self.run_step(desc, ctx) {
                self.state = RunState::Failed {
                    phase,
                    step_index: Some(step_index),
                };
                return Err(err);
            }
        }

        Ok(())
    }

    fn run_step(
        &mut self,
        desc: &StepDescriptor,
        ctx: &mut PublishContext,
    ) -> Result<(), PublishError> {
        debug!(
            phase = %desc.phase,
            definition = %desc.definition,
            label = %desc.label,
            order = desc.order,
            "Running step"
        );

        let timer = SpanTimer::start(format!("{}/{}", desc.phase, desc.definition));
        let outcome = desc.step.process(ctx);
        let duration_ms = timer.finish();

        let mut record = StepRecord {
            phase: desc.phase,
            definition: desc.definition.clone(),
            label: desc.label.clone(),
            order: desc.order,
            status: StepStatus::Completed,
            duration_ms,
            error: None,
        };

        match outcome {
            Ok(()) => {
                self.report.steps.push(record);
                Ok(())
            }
            Err(source) => {
                record.status = StepStatus::Failed;
                record.error = Some(source.to_string());
                self.report.steps.push(record);
                Err(PublishError::step(
                    desc.phase,
                    desc.definition.clone(),
                    desc.label.clone(),
                    source,
                ))
            }
        }
    }

    fn finish(&mut self) {
        self.report.state = self.state;
        self.report.ended_at = Some(Utc::now());
    }
}

impl std::fmt::Debug for PipelineRun<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineRun")
            .field("id", &self.id)
            .field("source", &self.source.name())
            .field("state", &self.state)
            .finish()
    }
}

/// Runs the full pipeline once against `ctx`.
///
/// # Errors
///
/// Returns the first discovery or step failure.
pub fn run_pipeline(
    source: &dyn StepSource,
    ctx: &mut PublishContext,
) -> Result<RunReport, PublishError> {
    PipelineRun::new(source).execute(ctx)
}
