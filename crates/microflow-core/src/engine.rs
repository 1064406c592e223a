//! Trigger execution.
//!
//! One invocation walks `resolve -> guard -> before-hook -> commit -> after-hook`
//! strictly in sequence. Business rejections end the walk early and are
//! reported through the returned [`TriggerResult`]; only configuration and
//! programming defects surface as [`WorkflowError`].
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::context::TriggerContext;
use crate::error::{WorkflowError, WorkflowResult};
use crate::registry::TransitionRegistry;
use crate::transition::Transition;
use crate::trigger::{TriggerCheck, TriggerOutcome, TriggerParam, TriggerResult};
use crate::variable::Variables;
use crate::workflow::Workflow;

/// Executes triggers against workflow instances using a frozen registry.
///
/// The engine holds no per-instance state. Invocations on different instances
/// may run in parallel; invocations on the same instance must be serialized by
/// the caller, which `fire` enforces by taking `&mut W`.
pub struct Engine<W: Workflow> {
    registry: Arc<TransitionRegistry<W>>,
    config: EngineConfig,
}

impl<W: Workflow> Engine<W> {
    pub fn new(registry: TransitionRegistry<W>) -> Self {
        Self::from_shared(Arc::new(registry))
    }

    /// Build an engine over a registry shared with other engines.
    pub fn from_shared(registry: Arc<TransitionRegistry<W>>) -> Self {
        Self {
            registry,
            config: EngineConfig::default(),
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn registry(&self) -> &TransitionRegistry<W> {
        &self.registry
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Fire `trigger` against `instance`.
    ///
    /// Returns `Err` only for configuration or programming defects, including
    /// an `Err` from a guard or hook such as a missing variable. The instance
    /// keeps its original state in that case. Denials, aborts and warnings
    /// come back inside the [`TriggerResult`]; the new state is visible on
    /// `instance` once the call returns.
    #[instrument(
        skip_all,
        fields(
            invocation = %Uuid::new_v4(),
            workflow_type = %instance.workflow_type(),
            trigger = %trigger,
        )
    )]
    pub fn fire(
        &self,
        instance: &mut W,
        trigger: &str,
        variables: Variables,
    ) -> WorkflowResult<TriggerResult<W::State>> {
        let from_state = instance.state().clone();
        let workflow_type = instance.workflow_type().to_string();
        let transition = self.resolve(&workflow_type, &from_state, trigger)?;

        let mut ctx = TriggerContext::with_variables(instance, variables);

        let allowed = match transition.can_make_transition(&mut ctx) {
            Ok(allowed) => allowed,
            Err(e) => return Err(fail(&mut ctx, &from_state, e)),
        };
        self.verify_unchanged(&mut ctx, &from_state, &workflow_type, trigger)?;
        if ctx.transition_aborted() {
            info!(errors = ?ctx.errors(), "Transition aborted by guard");
            return Ok(finish(ctx, trigger, TriggerOutcome::Aborted, from_state));
        }
        if !allowed {
            debug!(errors = ?ctx.errors(), "Transition denied by guard");
            return Ok(finish(ctx, trigger, TriggerOutcome::Denied, from_state));
        }

        if let Some(before) = transition.before_transition() {
            if let Err(e) = before(&mut ctx) {
                return Err(fail(&mut ctx, &from_state, e));
            }
            self.verify_unchanged(&mut ctx, &from_state, &workflow_type, trigger)?;
            if ctx.transition_aborted() {
                info!(errors = ?ctx.errors(), "Transition aborted before commit");
                return Ok(finish(ctx, trigger, TriggerOutcome::Aborted, from_state));
            }
        }

        ctx.instance_mut().set_state(transition.target().clone());
        debug!(from = ?from_state, to = ?transition.target(), "Transition committed");

        if let Some(after) = transition.after_transition() {
            // A hard failure undoes the commit; an abort does not.
            if let Err(e) = after(&mut ctx) {
                return Err(fail(&mut ctx, &from_state, e));
            }
            if ctx.transition_aborted() && self.config.warn_on_late_abort {
                warn!(
                    errors = ?ctx.errors(),
                    "After-transition hook aborted a committed transition; state kept"
                );
            }
        }

        Ok(finish(ctx, trigger, TriggerOutcome::Completed, from_state))
    }

    /// Fire a prepared [`TriggerParam`].
    pub fn fire_param(
        &self,
        instance: &mut W,
        param: TriggerParam,
    ) -> WorkflowResult<TriggerResult<W::State>> {
        let TriggerParam { trigger, variables } = param;
        self.fire(instance, &trigger, variables)
    }

    /// Fire against an instance shared between threads.
    ///
    /// The lock is held from resolution until the after-hook returns, so two
    /// triggers on the same instance can never both pass the guard against the
    /// same pre-transition state.
    pub fn fire_locked(
        &self,
        instance: &Mutex<W>,
        trigger: &str,
        variables: Variables,
    ) -> WorkflowResult<TriggerResult<W::State>> {
        let mut guard = instance
            .lock()
            .map_err(|_| WorkflowError::InstanceLockPoisoned)?;
        self.fire(&mut guard, trigger, variables)
    }

    /// Evaluate whether `trigger` would be allowed, without running hooks or
    /// committing.
    ///
    /// Only the guard runs. Any state change it makes is undone before this
    /// returns; host-owned fields it touches through `instance_mut` are not.
    #[instrument(skip_all, fields(workflow_type = %instance.workflow_type(), trigger = %trigger))]
    pub fn can_trigger(
        &self,
        instance: &mut W,
        trigger: &str,
        variables: Variables,
    ) -> WorkflowResult<TriggerCheck<W::State>> {
        let from_state = instance.state().clone();
        let workflow_type = instance.workflow_type().to_string();
        let transition = self.resolve(&workflow_type, &from_state, trigger)?;
        self.check(transition, instance, variables, &workflow_type, &from_state)
    }

    /// Every trigger leaving the current state, with its guard verdict.
    #[instrument(skip_all, fields(workflow_type = %instance.workflow_type()))]
    pub fn available_triggers(
        &self,
        instance: &mut W,
    ) -> WorkflowResult<Vec<TriggerCheck<W::State>>> {
        let from_state = instance.state().clone();
        let workflow_type = instance.workflow_type().to_string();
        let definition = self.registry.definition(&workflow_type)?;

        let mut checks = Vec::new();
        for transition in definition.outgoing(&from_state) {
            checks.push(self.check(
                transition,
                &mut *instance,
                Variables::new(),
                &workflow_type,
                &from_state,
            )?);
        }
        debug!(count = checks.len(), "Listed available triggers");
        Ok(checks)
    }

    fn resolve(
        &self,
        workflow_type: &str,
        state: &W::State,
        trigger: &str,
    ) -> WorkflowResult<&Transition<W>> {
        self.registry
            .resolve(workflow_type, state, trigger)
            .map_err(|e| {
                error!(error = %e, "Trigger could not be resolved");
                e
            })
    }

    fn check(
        &self,
        transition: &Transition<W>,
        instance: &mut W,
        variables: Variables,
        workflow_type: &str,
        from_state: &W::State,
    ) -> WorkflowResult<TriggerCheck<W::State>> {
        let mut ctx = TriggerContext::with_variables(instance, variables);
        let verdict = transition.can_make_transition(&mut ctx);

        // A dry run never leaves a state change behind, whatever the config says.
        let mutated = ctx.instance().state() != from_state;
        if mutated {
            ctx.instance_mut().set_state(from_state.clone());
        }
        let allowed = verdict.map_err(|e| {
            error!(error = %e, "Guard failed during dry run");
            e
        })?;
        if mutated && self.config.verify_state_unchanged {
            error!(expected = ?from_state, "Guard changed instance state during dry run");
            return Err(WorkflowError::StateMutatedBeforeCommit {
                workflow_type: workflow_type.to_string(),
                trigger: transition.trigger().to_string(),
            });
        }

        let (_, errors, aborted) = ctx.into_parts();
        Ok(TriggerCheck {
            trigger: transition.trigger().to_string(),
            target: transition.target().clone(),
            allowed: allowed && !aborted,
            aborted,
            errors,
        })
    }

    /// Undo and report a state change made ahead of the commit point.
    fn verify_unchanged(
        &self,
        ctx: &mut TriggerContext<'_, W>,
        from_state: &W::State,
        workflow_type: &str,
        trigger: &str,
    ) -> WorkflowResult<()> {
        if !self.config.verify_state_unchanged || ctx.instance().state() == from_state {
            return Ok(());
        }
        error!(
            found = ?ctx.instance().state(),
            expected = ?from_state,
            "Instance state changed before commit"
        );
        ctx.instance_mut().set_state(from_state.clone());
        Err(WorkflowError::StateMutatedBeforeCommit {
            workflow_type: workflow_type.to_string(),
            trigger: trigger.to_string(),
        })
    }
}

impl<W: Workflow> Clone for Engine<W> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            config: self.config.clone(),
        }
    }
}

impl<W: Workflow> std::fmt::Debug for Engine<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("registry", &self.registry)
            .field("config", &self.config)
            .finish()
    }
}

/// Put the instance back to `from_state` and hand the error on.
fn fail<W: Workflow>(
    ctx: &mut TriggerContext<'_, W>,
    from_state: &W::State,
    err: WorkflowError,
) -> WorkflowError {
    error!(error = %err, "Trigger failed; instance state restored");
    ctx.instance_mut().set_state(from_state.clone());
    err
}

fn finish<W: Workflow>(
    ctx: TriggerContext<'_, W>,
    trigger: &str,
    outcome: TriggerOutcome,
    from_state: W::State,
) -> TriggerResult<W::State> {
    let to_state = ctx.instance().state().clone();
    let (variables, errors, transition_aborted) = ctx.into_parts();
    TriggerResult {
        trigger: trigger.to_string(),
        outcome,
        from_state,
        to_state,
        errors,
        transition_aborted,
        variables,
    }
}
