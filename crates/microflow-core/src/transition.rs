use std::fmt;
use std::sync::Arc;

use crate::context::TriggerContext;
use crate::error::WorkflowResult;
use crate::workflow::Workflow;

/// Predicate deciding whether a transition may proceed.
///
/// An `Err` (typically a missing variable) fails the whole invocation.
pub type Guard<W> =
    Arc<dyn Fn(&mut TriggerContext<'_, W>) -> WorkflowResult<bool> + Send + Sync>;

/// Side-effecting callback run before or after the state is committed.
pub type Hook<W> = Arc<dyn Fn(&mut TriggerContext<'_, W>) -> WorkflowResult<()> + Send + Sync>;

/// Declarative rule binding a trigger and its source states to a target state.
///
/// Transitions are built once while the registry is configured and are only
/// read afterwards.
pub struct Transition<W: Workflow> {
    trigger: String,
    sources: Vec<W::State>,
    target: W::State,
    guard: Option<Guard<W>>,
    before: Option<Hook<W>>,
    after: Option<Hook<W>>,
}

impl<W: Workflow> Transition<W> {
    /// Transition from a single source state.
    pub fn new(trigger: impl Into<String>, source: W::State, target: W::State) -> Self {
        Self::from_any(trigger, [source], target)
    }

    /// Transition from any of several source states.
    pub fn from_any(
        trigger: impl Into<String>,
        sources: impl IntoIterator<Item = W::State>,
        target: W::State,
    ) -> Self {
        Self {
            trigger: trigger.into(),
            sources: sources.into_iter().collect(),
            target,
            guard: None,
            before: None,
            after: None,
        }
    }

    pub fn with_guard<F>(mut self, guard: F) -> Self
    where
        F: Fn(&mut TriggerContext<'_, W>) -> WorkflowResult<bool> + Send + Sync + 'static,
    {
        self.guard = Some(Arc::new(guard));
        self
    }

    pub fn before<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut TriggerContext<'_, W>) -> WorkflowResult<()> + Send + Sync + 'static,
    {
        self.before = Some(Arc::new(hook));
        self
    }

    pub fn after<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut TriggerContext<'_, W>) -> WorkflowResult<()> + Send + Sync + 'static,
    {
        self.after = Some(Arc::new(hook));
        self
    }

    pub fn trigger(&self) -> &str {
        &self.trigger
    }

    pub fn sources(&self) -> &[W::State] {
        &self.sources
    }

    pub fn target(&self) -> &W::State {
        &self.target
    }

    pub fn has_guard(&self) -> bool {
        self.guard.is_some()
    }

    pub fn before_transition(&self) -> Option<&Hook<W>> {
        self.before.as_ref()
    }

    pub fn after_transition(&self) -> Option<&Hook<W>> {
        self.after.as_ref()
    }

    /// Evaluate the guard. Transitions without a guard are always permitted.
    pub fn can_make_transition(&self, ctx: &mut TriggerContext<'_, W>) -> WorkflowResult<bool> {
        match &self.guard {
            Some(guard) => guard(ctx),
            None => Ok(true),
        }
    }

    /// True if `state` is one of the declared source states.
    pub fn leaves(&self, state: &W::State) -> bool {
        self.sources.iter().any(|s| s == state)
    }

    /// True if this transition answers `trigger` from `state`.
    pub fn matches(&self, trigger: &str, state: &W::State) -> bool {
        self.trigger == trigger && self.leaves(state)
    }
}

// Manual impls: hooks are shared through `Arc`, `W` itself need not be Clone/Debug.
impl<W: Workflow> Clone for Transition<W> {
    fn clone(&self) -> Self {
        Self {
            trigger: self.trigger.clone(),
            sources: self.sources.clone(),
            target: self.target.clone(),
            guard: self.guard.clone(),
            before: self.before.clone(),
            after: self.after.clone(),
        }
    }
}

impl<W: Workflow> fmt::Debug for Transition<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("trigger", &self.trigger)
            .field("sources", &self.sources)
            .field("target", &self.target)
            .field("guard", &self.guard.is_some())
            .field("before", &self.before.is_some())
            .field("after", &self.after.is_some())
            .finish()
    }
}
