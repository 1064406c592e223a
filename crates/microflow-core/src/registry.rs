//! Immutable lookup from workflow type to its transitions.
//!
//! The registry is assembled once at startup through [`RegistryBuilder`],
//! which validates every definition, and is read-only afterwards. Sharing it
//! between threads needs no synchronization.
use std::collections::HashMap;
use tracing::debug;

use crate::definition::WorkflowDefinition;
use crate::error::{WorkflowError, WorkflowResult};
use crate::transition::Transition;
use crate::workflow::Workflow;

pub struct TransitionRegistry<W: Workflow> {
    definitions: HashMap<String, WorkflowDefinition<W>>,
}

impl<W: Workflow> TransitionRegistry<W> {
    pub fn builder() -> RegistryBuilder<W> {
        RegistryBuilder::new()
    }

    pub fn definition(&self, workflow_type: &str) -> WorkflowResult<&WorkflowDefinition<W>> {
        self.definitions
            .get(workflow_type)
            .ok_or_else(|| WorkflowError::UnknownWorkflowType(workflow_type.to_string()))
    }

    pub fn contains(&self, workflow_type: &str) -> bool {
        self.definitions.contains_key(workflow_type)
    }

    pub fn workflow_types(&self) -> impl Iterator<Item = &str> {
        self.definitions.keys().map(String::as_str)
    }

    pub fn definitions(&self) -> impl Iterator<Item = &WorkflowDefinition<W>> {
        self.definitions.values()
    }

    /// Find the transition answering `trigger` for an instance of
    /// `workflow_type` currently in `state`.
    pub fn resolve(
        &self,
        workflow_type: &str,
        state: &W::State,
        trigger: &str,
    ) -> WorkflowResult<&Transition<W>> {
        self.definition(workflow_type)?.resolve(state, trigger)
    }
}

impl<W: Workflow> std::fmt::Debug for TransitionRegistry<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.definitions.iter()).finish()
    }
}

/// Collects and validates workflow definitions before freezing them.
pub struct RegistryBuilder<W: Workflow> {
    definitions: HashMap<String, WorkflowDefinition<W>>,
}

impl<W: Workflow> RegistryBuilder<W> {
    pub fn new() -> Self {
        Self {
            definitions: HashMap::new(),
        }
    }

    /// Add a definition. Fails if it is invalid or its type is already taken.
    pub fn register(mut self, definition: WorkflowDefinition<W>) -> WorkflowResult<Self> {
        definition.validate()?;
        if self.definitions.contains_key(definition.workflow_type()) {
            return Err(WorkflowError::invalid_definition(format!(
                "workflow type '{}' registered twice",
                definition.workflow_type()
            )));
        }
        debug!(
            workflow_type = definition.workflow_type(),
            transitions = definition.transitions().len(),
            "Registered workflow definition"
        );
        self.definitions
            .insert(definition.workflow_type().to_string(), definition);
        Ok(self)
    }

    pub fn build(self) -> TransitionRegistry<W> {
        TransitionRegistry {
            definitions: self.definitions,
        }
    }
}

impl<W: Workflow> Default for RegistryBuilder<W> {
    fn default() -> Self {
        Self::new()
    }
}
