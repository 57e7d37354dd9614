//! Step trait and implementations.
//!
//! Steps are the units of work of a publish. The engine treats every step
//! the same way, through [`Step::order`] and [`Step::process`]; collectors,
//! validators, extractors and integrators differ only by the phase they are
//! registered in.

pub mod builtin;
mod descriptor;

pub use descriptor::StepDescriptor;

use crate::context::PublishContext;
use crate::errors::StepError;
use std::fmt::Debug;

/// Priority given to steps that do not pick one.
pub const DEFAULT_ORDER: i32 = 50;

/// Trait for publish steps.
pub trait Step: Send + Sync + Debug {
    /// Returns the human-readable name of the step, used in diagnostics.
    fn label(&self) -> &str;

    /// Returns the priority of the step within its phase. Lower runs first.
    fn order(&self) -> i32 {
        DEFAULT_ORDER
    }

    /// Processes the context in place.
    ///
    /// Returning an error halts the whole run. Changes already made to the
    /// context are kept.
    fn process(&self, ctx: &mut PublishContext) -> Result<(), StepError>;
}

/// A closure-based step.
pub struct FnStep<F>
where
    F: Fn(&mut PublishContext) -> Result<(), StepError> + Send + Sync,
{
    label: String,
    order: i32,
    func: F,
}

impl<F> FnStep<F>
where
    F: Fn(&mut PublishContext) -> Result<(), StepError> + Send + Sync,
{
    /// Creates a new closure-based step with the default order.
    pub fn new(label: impl Into<String>, func: F) -> Self {
        Self {
            label: label.into(),
            order: DEFAULT_ORDER,
            func,
        }
    }

    /// Sets the order.
    #[must_use]
    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }
}

impl<F> Debug for FnStep<F>
where
    F: Fn(&mut PublishContext) -> Result<(), StepError> + Send + Sync,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnStep")
            .field("label", &self.label)
            .field("order", &self.order)
            .finish()
    }
}

impl<F> Step for FnStep<F>
where
    F: Fn(&mut PublishContext) -> Result<(), StepError> + Send + Sync,
{
    fn label(&self) -> &str {
        &self.label
    }

    fn order(&self) -> i32 {
        self.order
    }

    fn process(&self, ctx: &mut PublishContext) -> Result<(), StepError> {
        (self.func)(ctx)
    }
}

/// A step that does nothing.
#[derive(Debug, Clone)]
pub struct NoOpStep {
    label: String,
    order: i32,
}

impl NoOpStep {
    /// Creates a new no-op step.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            order: DEFAULT_ORDER,
        }
    }

    /// Sets the order.
    #[must_use]
    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }
}

impl Step for NoOpStep {
    fn label(&self) -> &str {
        &self.label
    }

    fn order(&self) -> i32 {
        self.order
    }

    fn process(&self, _ctx: &mut PublishContext) -> Result<(), StepError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fn_step() {
        let step = FnStep::new("stash", |ctx: &mut PublishContext| {
            ctx.data.insert("seen", true);
            Ok(())
        })
        .with_order(5);

        assert_eq!(step.label(), "stash");
        assert_eq!(step.order(), 5);

        let mut ctx = PublishContext::default();
        step.process(&mut ctx).unwrap();
        assert_eq!(ctx.data.get("seen"), Some(&serde_json::json!(true)));
    }

    #[test]
    fn test_fn_step_failure() {
        let step = FnStep::new("veto", |_ctx: &mut PublishContext| {
            Err(StepError::rejected("nope"))
        });

        let mut ctx = PublishContext::default();
        let err = step.process(&mut ctx).unwrap_err();
        assert_eq!(err.to_string(), "nope");
    }

    #[test]
    fn test_noop_step_defaults() {
        let step = NoOpStep::new("noop");
        assert_eq!(step.label(), "noop");
        assert_eq!(step.order(), DEFAULT_ORDER);

        let mut ctx = PublishContext::default();
        let before = ctx.clone();
        step.process(&mut ctx).unwrap();
        assert_eq!(ctx, before);
    }
}
