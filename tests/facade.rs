use std::sync::Arc;

use microflow::{
    Engine, Guard, Hook, RegistryBuilder, Transition, TriggerCheck, TriggerContext,
    TriggerParam, Workflow, WorkflowDefinition, WorkflowError, WorkflowResult,
};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Door {
    Closed,
    Open,
}

struct Entrance {
    door: Door,
    opened_by: Option<String>,
}

impl Workflow for Entrance {
    type State = Door;

    fn workflow_type(&self) -> &str {
        "entrance"
    }

    fn state(&self) -> &Door {
        &self.door
    }

    fn set_state(&mut self, state: Door) {
        self.door = state;
    }
}

fn badge_guard(ctx: &mut TriggerContext<'_, Entrance>) -> WorkflowResult<bool> {
    Ok(!ctx.get_variable::<String>("badge")?.is_empty())
}

fn record_badge(ctx: &mut TriggerContext<'_, Entrance>) -> WorkflowResult<()> {
    let badge = ctx.get_variable::<String>("badge")?.clone();
    ctx.instance_mut().opened_by = Some(badge);
    Ok(())
}

fn engine() -> Engine<Entrance> {
    let guard: Guard<Entrance> = Arc::new(badge_guard);
    let hook: Hook<Entrance> = Arc::new(record_badge);
    let open = Transition::<Entrance>::new("open", Door::Closed, Door::Open)
        .with_guard(move |ctx| guard(ctx))
        .after(move |ctx| hook(ctx));
    let definition = WorkflowDefinition::new("entrance")
        .transition(open)
        .transition(Transition::new("close", Door::Open, Door::Closed));

    let builder: RegistryBuilder<Entrance> = microflow::TransitionRegistry::builder();
    match builder.register(definition) {
        Ok(builder) => Engine::new(builder.build()),
        Err(e) => panic!("invalid entrance workflow: {}", e),
    }
}

#[test]
fn facade_exposes_the_full_trigger_api() {
    let engine = engine();
    let mut entrance = Entrance {
        door: Door::Closed,
        opened_by: None,
    };

    let check: TriggerCheck<Door> = engine
        .can_trigger(
            &mut entrance,
            "open",
            TriggerParam::new("open")
                .with_variable("badge", "b-42".to_string())
                .variables,
        )
        .unwrap();
    assert!(check.allowed);
    assert_eq!(entrance.door, Door::Closed);

    let param = TriggerParam::new("open").with_variable("badge", "b-42".to_string());
    let result = engine.fire_param(&mut entrance, param).unwrap();
    assert!(result.is_completed());
    assert_eq!(entrance.door, Door::Open);
    assert_eq!(entrance.opened_by.as_deref(), Some("b-42"));
}

#[test]
fn facade_guard_error_surfaces_as_workflow_error() {
    let engine = engine();
    let mut entrance = Entrance {
        door: Door::Closed,
        opened_by: None,
    };

    let err = engine
        .fire_param(&mut entrance, TriggerParam::new("open"))
        .unwrap_err();
    assert_eq!(err, WorkflowError::VariableNotFound("badge".into()));
    assert_eq!(entrance.door, Door::Closed);
}
