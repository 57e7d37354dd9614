//! Testing utilities for publish pipelines.
//!
//! This module provides:
//! - Mock steps and a shared call journal
//! - Sample contexts and on-disk hook packages
//! - Assertions over run reports and errors

mod assertions;
mod fixtures;
mod mocks;

pub use assertions::{assert_executed_in_order, assert_load_failed, assert_step_failed};
pub use fixtures::{sample_context, HookPackage};
pub use mocks::{FailingStep, MockStep, RecordingStep, StepJournal};
