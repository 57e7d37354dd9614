//! Step ordering.

use crate::steps::StepDescriptor;

/// Orders discovered steps for execution.
///
/// Ascending by `order`. The sort is stable, so steps with equal order keep
/// their discovery order.
#[must_use]
pub fn order_steps(mut steps: Vec<StepDescriptor>) -> Vec<StepDescriptor> {
    steps.sort_by_key(|desc| desc.order);
    steps
}
