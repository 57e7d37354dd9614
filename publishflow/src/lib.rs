//! # Publishflow
//!
//! A phased publish pipeline for asset publishing.
//!
//! A host hands the pipeline a [`PublishContext`](context::PublishContext)
//! describing what is being published. The pipeline then:
//!
//! - **Discovers** the steps of each phase from a step source, either an
//!   in-memory registry or a hook package on disk
//! - **Orders** them by priority, keeping discovery order on ties
//! - **Executes** them one at a time through the fixed phases collect,
//!   validate, extract and integrate, stopping at the first failure
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use publishflow::prelude::*;
//!
//! let registry = StepRegistry::new("natron");
//! registry.register(Phase::Validate, "check_fps", Arc::new(CheckFps))?;
//!
//! let ctx = launch_publish(&registry, None)?;
//! for rep in ctx.representations() {
//!     println!("{} -> {}", rep.name, rep.path.display());
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod config;
pub mod context;
pub mod core;
pub mod errors;
pub mod host;
pub mod observability;
pub mod pipeline;
pub mod steps;
pub mod testing;
pub mod utils;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::PipelineConfig;
    pub use crate::context::{DataBag, PublishContext, RepresentationLog, Resolution};
    pub use crate::core::{Phase, Representation, RunState, StepStatus};
    pub use crate::errors::{DataError, LoadError, PublishError, StepError};
    pub use crate::host::launch_publish;
    pub use crate::observability::{init_logging, LogConfig, LogFormat};
    pub use crate::pipeline::{
        discover_steps, order_steps, register_step, run_pipeline, HookDirectory, PipelineRun,
        RunReport, StepCatalog, StepManifest, StepRegistry, StepSource,
    };
    pub use crate::steps::{FnStep, Step, StepDescriptor, DEFAULT_ORDER};
    pub use crate::utils::{checksum_file, ensure_dir, md5sum, ChecksumAlgorithm};
}
