#![allow(dead_code)]

use microflow_core::{Transition, TransitionRegistry, Workflow, WorkflowDefinition};
use std::sync::Once;
use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        fmt().with_env_filter(filter).with_test_writer().init();
    });
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentState {
    Draft,
    Submitted,
    Approved,
    Rejected,
}

#[derive(Debug)]
pub struct Document {
    pub title: String,
    pub state: DocumentState,
    pub approved_by: Option<String>,
}

impl Document {
    pub fn draft(title: &str) -> Self {
        Self {
            title: title.to_string(),
            state: DocumentState::Draft,
            approved_by: None,
        }
    }
}

impl Workflow for Document {
    type State = DocumentState;

    fn workflow_type(&self) -> &str {
        "document"
    }

    fn state(&self) -> &DocumentState {
        &self.state
    }

    fn set_state(&mut self, state: DocumentState) {
        self.state = state;
    }
}

/// Draft -> Submitted -> Approved | Rejected, Rejected -> Draft.
pub fn document_definition(submit: Transition<Document>) -> WorkflowDefinition<Document> {
    use DocumentState::*;

    WorkflowDefinition::new("document")
        .with_title("Document review")
        .with_description("Submit a draft and have it approved or rejected")
        .transition(submit)
        .transition(
            Transition::<Document>::new("approve", Submitted, Approved)
                .with_guard(|ctx| Ok(ctx.contains_key("approver")))
                .after(|ctx| {
                    let approver = ctx.get_variable::<String>("approver")?.clone();
                    ctx.instance_mut().approved_by = Some(approver);
                    Ok(())
                }),
        )
        .transition(Transition::<Document>::new("reject", Submitted, Rejected))
        .transition(Transition::<Document>::new("revise", Rejected, Draft))
}

pub fn plain_submit() -> Transition<Document> {
    Transition::new("submit", DocumentState::Draft, DocumentState::Submitted)
}

pub fn registry_with(submit: Transition<Document>) -> TransitionRegistry<Document> {
    TransitionRegistry::builder()
        .register(document_definition(submit))
        .expect("document workflow is valid")
        .build()
}
