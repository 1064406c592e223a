use std::fmt::{Debug, Display};
use thiserror::Error;

/// Hard failures of a trigger invocation.
///
/// Every variant is a configuration or programming defect. Business-level
/// rejections (guard denial, explicit abort, warnings) never show up here;
/// they are reported through [`TriggerResult`](crate::trigger::TriggerResult).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    /// No definition is registered for the instance's workflow type.
    #[error("Unknown workflow type: {0}")]
    UnknownWorkflowType(String),

    /// No transition of the workflow responds to the trigger from the current state.
    #[error("No transition for trigger '{trigger}' from state {state} in workflow '{workflow_type}'")]
    NoApplicableTransition {
        workflow_type: String,
        state: String,
        trigger: String,
    },

    /// More than one transition responds to the trigger from the current state.
    #[error("{count} transitions match trigger '{trigger}' from state {state} in workflow '{workflow_type}'")]
    AmbiguousTransition {
        workflow_type: String,
        state: String,
        trigger: String,
        count: usize,
    },

    /// A workflow definition failed validation while the registry was built.
    #[error("Invalid workflow definition: {0}")]
    InvalidDefinition(String),

    /// A guard or hook asked for a variable that was never set.
    #[error("Key '{0}' not found!")]
    VariableNotFound(String),

    /// A variable exists but holds a different type than requested.
    #[error("Variable '{key}' is not a {expected}")]
    VariableTypeMismatch { key: String, expected: &'static str },

    /// A guard or before-hook changed the instance state ahead of the commit.
    #[error("State of workflow '{workflow_type}' changed before trigger '{trigger}' was committed")]
    StateMutatedBeforeCommit {
        workflow_type: String,
        trigger: String,
    },

    /// The mutex guarding a shared instance was poisoned by a panicking holder.
    #[error("Workflow instance lock poisoned")]
    InstanceLockPoisoned,

    /// Variables could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// A specialized Result type for microflow operations
pub type WorkflowResult<T> = Result<T, WorkflowError>;

impl WorkflowError {
    /// Create a new no-applicable-transition error
    pub fn no_transition(
        workflow_type: impl Display,
        state: &impl Debug,
        trigger: impl Display,
    ) -> Self {
        Self::NoApplicableTransition {
            workflow_type: workflow_type.to_string(),
            state: format!("{:?}", state),
            trigger: trigger.to_string(),
        }
    }

    /// Create a new ambiguous-transition error
    pub fn ambiguous(
        workflow_type: impl Display,
        state: &impl Debug,
        trigger: impl Display,
        count: usize,
    ) -> Self {
        Self::AmbiguousTransition {
            workflow_type: workflow_type.to_string(),
            state: format!("{:?}", state),
            trigger: trigger.to_string(),
            count,
        }
    }

    /// Create a new invalid-definition error
    pub fn invalid_definition(message: impl Display) -> Self {
        Self::InvalidDefinition(message.to_string())
    }

    /// True for errors that stem from how transitions were configured.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::UnknownWorkflowType(_)
                | Self::NoApplicableTransition { .. }
                | Self::AmbiguousTransition { .. }
                | Self::InvalidDefinition(_)
        )
    }
}

impl From<serde_json::Error> for WorkflowError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_transition_message_includes_state_and_trigger() {
        let err = WorkflowError::no_transition("document", &"Draft", "approve");
        let msg = err.to_string();
        assert!(msg.contains("approve"));
        assert!(msg.contains("\"Draft\""));
        assert!(msg.contains("document"));
        assert!(err.is_configuration());
    }

    #[test]
    fn test_variable_errors_are_not_configuration() {
        assert!(!WorkflowError::VariableNotFound("approver".into()).is_configuration());
        assert_eq!(
            WorkflowError::VariableNotFound("approver".into()).to_string(),
            "Key 'approver' not found!"
        );
    }
}
