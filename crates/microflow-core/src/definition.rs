use tracing::trace;

use crate::error::{WorkflowError, WorkflowResult};
use crate::transition::Transition;
use crate::workflow::Workflow;

/// All transitions of one workflow type.
pub struct WorkflowDefinition<W: Workflow> {
    workflow_type: String,
    title: Option<String>,
    description: Option<String>,
    transitions: Vec<Transition<W>>,
}

impl<W: Workflow> WorkflowDefinition<W> {
    pub fn new(workflow_type: impl Into<String>) -> Self {
        Self {
            workflow_type: workflow_type.into(),
            title: None,
            description: None,
            transitions: Vec::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Append a transition.
    pub fn transition(mut self, transition: Transition<W>) -> Self {
        self.transitions.push(transition);
        self
    }

    pub fn workflow_type(&self) -> &str {
        &self.workflow_type
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn transitions(&self) -> &[Transition<W>] {
        &self.transitions
    }

    /// Distinct trigger names, in declaration order.
    pub fn triggers(&self) -> Vec<&str> {
        let mut triggers: Vec<&str> = Vec::new();
        for t in &self.transitions {
            if !triggers.contains(&t.trigger()) {
                triggers.push(t.trigger());
            }
        }
        triggers
    }

    /// Distinct states referenced as a source or a target, in declaration order.
    pub fn states(&self) -> Vec<&W::State> {
        let mut states: Vec<&W::State> = Vec::new();
        for t in &self.transitions {
            for s in t.sources().iter().chain(std::iter::once(t.target())) {
                if !states.contains(&s) {
                    states.push(s);
                }
            }
        }
        states
    }

    /// Transitions whose source set contains `state`.
    pub fn outgoing<'a>(
        &'a self,
        state: &'a W::State,
    ) -> impl Iterator<Item = &'a Transition<W>> + 'a {
        self.transitions.iter().filter(move |t| t.leaves(state))
    }

    /// Find the single transition answering `trigger` from `state`.
    pub fn resolve(&self, state: &W::State, trigger: &str) -> WorkflowResult<&Transition<W>> {
        let mut matching = self.transitions.iter().filter(|t| t.matches(trigger, state));
        let first = matching
            .next()
            .ok_or_else(|| WorkflowError::no_transition(&self.workflow_type, state, trigger))?;
        let extra = matching.count();
        if extra > 0 {
            return Err(WorkflowError::ambiguous(
                &self.workflow_type,
                state,
                trigger,
                extra + 1,
            ));
        }
        trace!(workflow_type = %self.workflow_type, trigger, target = ?first.target(), "Resolved transition");
        Ok(first)
    }

    /// Reject definitions the resolver could not serve unambiguously.
    pub fn validate(&self) -> WorkflowResult<()> {
        if self.workflow_type.trim().is_empty() {
            return Err(WorkflowError::invalid_definition(
                "workflow type must not be empty",
            ));
        }
        for (i, t) in self.transitions.iter().enumerate() {
            if t.trigger().trim().is_empty() {
                return Err(WorkflowError::invalid_definition(format!(
                    "transition #{} of '{}' has an empty trigger",
                    i, self.workflow_type
                )));
            }
            if t.sources().is_empty() {
                return Err(WorkflowError::invalid_definition(format!(
                    "transition '{}' of '{}' has no source state",
                    t.trigger(),
                    self.workflow_type
                )));
            }
            for other in &self.transitions[i + 1..] {
                if other.trigger() != t.trigger() {
                    continue;
                }
                if let Some(shared) = t.sources().iter().find(|s| other.leaves(s)) {
                    return Err(WorkflowError::invalid_definition(format!(
                        "trigger '{}' of '{}' is declared twice from state {:?}",
                        t.trigger(),
                        self.workflow_type,
                        shared
                    )));
                }
            }
        }
        Ok(())
    }
}

impl<W: Workflow> Clone for WorkflowDefinition<W> {
    fn clone(&self) -> Self {
        Self {
            workflow_type: self.workflow_type.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            transitions: self.transitions.clone(),
        }
    }
}

impl<W: Workflow> std::fmt::Debug for WorkflowDefinition<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowDefinition")
            .field("workflow_type", &self.workflow_type)
            .field("title", &self.title)
            .field("transitions", &self.transitions)
            .finish()
    }
}
