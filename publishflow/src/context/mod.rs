//! Context threaded through a pipeline run.
//!
//! This module provides:
//! - The publish context describing the asset being published
//! - The inter-step data bag
//! - The append-only representation log

mod bags;
mod publish;

pub use bags::{DataBag, RepresentationLog};
pub use publish::{PublishContext, Resolution};
