//! Core domain model types.
//!
//! - Pipeline phases
//! - Run and step status enums
//! - Representation records describing published artifacts

mod phase;
mod representation;
mod status;

pub use phase::Phase;
pub use representation::Representation;
pub use status::{RunState, StepStatus};
