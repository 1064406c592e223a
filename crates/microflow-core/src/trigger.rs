use serde::{Deserialize, Serialize};

use crate::variable::{Variables, WorkflowVariable};

/// A trigger request: the trigger name plus initial variables.
#[derive(Debug, Default)]
pub struct TriggerParam {
    pub trigger: String,
    pub variables: Variables,
}

impl TriggerParam {
    pub fn new(trigger: impl Into<String>) -> Self {
        Self {
            trigger: trigger.into(),
            variables: Variables::new(),
        }
    }

    pub fn with_variable<T: WorkflowVariable>(mut self, key: impl Into<String>, value: T) -> Self {
        self.variables.insert(key, value);
        self
    }
}

/// How a trigger invocation terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerOutcome {
    /// The state was committed and the hooks ran.
    Completed,
    /// The guard rejected the trigger. Nothing changed.
    Denied,
    /// A guard or before-hook aborted the transition. Nothing changed.
    Aborted,
}

/// Everything a trigger invocation reports back to its caller.
#[derive(Debug)]
pub struct TriggerResult<S> {
    pub trigger: String,
    pub outcome: TriggerOutcome,
    /// State before the trigger.
    pub from_state: S,
    /// State after the trigger; equal to `from_state` unless completed.
    pub to_state: S,
    pub errors: Vec<String>,
    /// Abort flag of the context. Can be set on a completed transition when
    /// the after-hook aborted; the committed state is kept in that case.
    pub transition_aborted: bool,
    pub variables: Variables,
}

impl<S> TriggerResult<S> {
    pub fn is_completed(&self) -> bool {
        self.outcome == TriggerOutcome::Completed
    }

    pub fn is_denied(&self) -> bool {
        self.outcome == TriggerOutcome::Denied
    }

    pub fn is_aborted(&self) -> bool {
        self.outcome == TriggerOutcome::Aborted
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Guard verdict for a trigger, produced without committing anything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerCheck<S> {
    pub trigger: String,
    pub target: S,
    pub allowed: bool,
    pub aborted: bool,
    pub errors: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_serializes_snake_case() {
        let json = serde_json::to_string(&TriggerOutcome::Denied).unwrap();
        assert_eq!(json, "\"denied\"");
    }

    #[test]
    fn test_param_collects_variables() {
        let param = TriggerParam::new("approve")
            .with_variable("approver", "alice".to_string())
            .with_variable("approver", "bob".to_string());
        assert_eq!(param.trigger, "approve");
        assert_eq!(param.variables.len(), 1);
        assert_eq!(param.variables.get::<String>("approver").unwrap(), "bob");
    }

    #[test]
    fn test_check_round_trips_through_json() {
        let check = TriggerCheck {
            trigger: "approve".to_string(),
            target: 3_u8,
            allowed: false,
            aborted: false,
            errors: vec!["approver missing".to_string()],
        };
        let json = serde_json::to_value(&check).unwrap();
        assert_eq!(json["allowed"], false);
        let back: TriggerCheck<u8> = serde_json::from_value(json).unwrap();
        assert_eq!(back, check);
    }
}
