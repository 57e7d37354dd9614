//! Step discovery, ordering and execution.
//!
//! This module provides:
//! - Step sources: an in-memory registry and on-disk hook packages
//! - Discovery and ordering of the steps of a phase
//! - The fail-fast pipeline executor

mod discovery;
mod executor;
mod hooks;
mod ordering;
mod registry;
mod report;

pub use discovery::{discover_steps, StepSource};
pub use executor::{run_pipeline, PipelineRun};
pub use hooks::{HookDirectory, StepCatalog, StepFactory, StepManifest, STEP_TABLE};
pub use ordering::order_steps;
pub use registry::{clear_global_registry, global_registry, register_step, StepRegistry};
pub use report::{RunReport, StepRecord};
