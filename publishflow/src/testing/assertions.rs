//! Test assertions for pipeline runs.

use crate::errors::PublishError;
use crate::pipeline::RunReport;

/// Asserts that the run executed exactly these step labels, in this order.
pub fn assert_executed_in_order(report: &RunReport, expected: &[&str]) {
    assert_eq!(
        report.labels(),
        expected,
        "Unexpected execution order for run {}",
        report.run_id
    );
}

/// Asserts that the error is a step failure carrying exactly `message`.
pub fn assert_step_failed(err: &PublishError, message: &str) {
    assert_eq!(
        err.step_message().as_deref(),
        Some(message),
        "Expected step failure '{message}', got: {err}"
    );
}

/// Asserts that the error comes from loading a step definition.
pub fn assert_load_failed(err: &PublishError) {
    assert!(
        matches!(err, PublishError::Load(_)),
        "Expected a load failure, got: {err}"
    );
}
