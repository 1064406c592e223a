//! Shared fixtures for the microflow benchmarks.
use microflow_core::{Transition, TransitionRegistry, Workflow, WorkflowDefinition};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    Done,
}

#[derive(Debug)]
pub struct Job {
    pub phase: Phase,
}

impl Workflow for Job {
    type State = Phase;

    fn workflow_type(&self) -> &str {
        "job"
    }

    fn state(&self) -> &Phase {
        &self.phase
    }

    fn set_state(&mut self, state: Phase) {
        self.phase = state;
    }
}

/// A small cyclic job workflow with a guard and both hooks on every edge.
pub fn job_registry() -> TransitionRegistry<Job> {
    let definition = WorkflowDefinition::new("job")
        .transition(
            Transition::<Job>::new("start", Phase::Idle, Phase::Running)
                .with_guard(|ctx| Ok(ctx.contains_key("worker")))
                .before(|ctx| {
                    ctx.set_variable("attempt", 1_u32);
                    Ok(())
                })
                .after(|ctx| {
                    ctx.add_error("started");
                    Ok(())
                }),
        )
        .transition(Transition::<Job>::new("finish", Phase::Running, Phase::Done))
        .transition(Transition::<Job>::new("restart", Phase::Done, Phase::Idle));
    match TransitionRegistry::builder().register(definition) {
        Ok(builder) => builder.build(),
        Err(e) => panic!("invalid benchmark workflow: {}", e),
    }
}
