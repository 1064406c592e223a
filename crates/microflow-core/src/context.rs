use crate::error::WorkflowResult;
use crate::variable::{Variables, WorkflowVariable};
use crate::workflow::Workflow;

/// Per-invocation scratchpad handed to every guard and hook.
///
/// Wraps the instance being transitioned together with the trigger's ad-hoc
/// variables, the validation errors collected so far, and the abort flag. A
/// fresh context is created for each trigger and dropped when it finishes.
pub struct TriggerContext<'a, W: Workflow> {
    instance: &'a mut W,
    variables: Variables,
    errors: Vec<String>,
    aborted: bool,
}

impl<'a, W: Workflow> TriggerContext<'a, W> {
    pub fn new(instance: &'a mut W) -> Self {
        Self::with_variables(instance, Variables::new())
    }

    /// Create a context seeded with the caller's initial variables.
    pub fn with_variables(instance: &'a mut W, variables: Variables) -> Self {
        Self {
            instance,
            variables,
            errors: Vec::new(),
            aborted: false,
        }
    }

    pub fn instance(&self) -> &W {
        &*self.instance
    }

    /// Mutable access to the instance for hooks that update host-owned fields.
    ///
    /// The engine is the only party that should change the state. When
    /// `EngineConfig::verify_state_unchanged` is on (the default), a guard or
    /// before-hook that calls `set_state` fails the trigger with
    /// `StateMutatedBeforeCommit`; when it is off the change is not detected.
    /// Dry runs always undo a guard's state change.
    pub fn instance_mut(&mut self) -> &mut W {
        &mut *self.instance
    }

    pub fn has_variables(&self) -> bool {
        !self.variables.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.has_variables() && self.variables.contains_key(key)
    }

    /// Insert or overwrite a variable.
    pub fn set_variable<T: WorkflowVariable>(&mut self, key: impl Into<String>, value: T) {
        self.variables.insert(key, value);
    }

    pub fn get_variable<T: WorkflowVariable>(&self, key: &str) -> WorkflowResult<&T> {
        self.variables.get(key)
    }

    pub fn variables(&self) -> &Variables {
        &self.variables
    }

    /// Record a validation finding without stopping the transition.
    pub fn add_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    /// Stop the transition and record why.
    ///
    /// Only effective from a guard or a before-hook. Once the state has been
    /// committed the flag and the reason are still recorded, but the state is
    /// not rolled back.
    pub fn abort_transition(&mut self, reason: impl Into<String>) {
        self.aborted = true;
        self.errors.push(reason.into());
    }

    pub fn transition_aborted(&self) -> bool {
        self.aborted
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Release the instance borrow, keeping what the invocation accumulated.
    pub(crate) fn into_parts(self) -> (Variables, Vec<String>, bool) {
        (self.variables, self.errors, self.aborted)
    }
}

impl<W> std::fmt::Debug for TriggerContext<'_, W>
where
    W: Workflow + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TriggerContext")
            .field("instance", &self.instance)
            .field("variables", &self.variables)
            .field("errors", &self.errors)
            .field("aborted", &self.aborted)
            .finish()
    }
}
