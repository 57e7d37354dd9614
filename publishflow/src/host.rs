//! Host entry point.

use crate::context::PublishContext;
use crate::errors::PublishError;
use crate::pipeline::{run_pipeline, StepSource};

/// Publishes with the steps of `source`.
///
/// Without a context the default one is used. Returns the context as the
/// steps left it.
///
/// # Errors
///
/// Returns the first discovery or step failure.
pub fn launch_publish(
    source: &dyn StepSource,
    context: Option<PublishContext>,
) -> Result<PublishContext, PublishError> {
    let mut context = context.unwrap_or_else(|| {
        tracing::info!("No publish context given, using host defaults");
        PublishContext::default()
    });
    run_pipeline(source, &mut context)?;
    Ok(context)
}
