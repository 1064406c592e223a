//! # microflow-core
//!
//! Transition and trigger execution engine of the microflow state machine.
//!
//! A [`TransitionRegistry`] maps each workflow type to its [`WorkflowDefinition`].
//! The [`Engine`] resolves a trigger against an instance's current state, runs
//! the guard and hooks with a fresh [`TriggerContext`] and commits the target
//! state. Guard denials and explicit aborts are ordinary outcomes reported in
//! the [`TriggerResult`]; [`WorkflowError`] is reserved for configuration and
//! programming defects.
pub mod config;
pub mod context;
pub mod definition;
pub mod engine;
pub mod error;
pub mod registry;
pub mod transition;
pub mod trigger;
pub mod variable;
pub mod workflow;


pub use config::EngineConfig;
pub use context::TriggerContext;
pub use definition::WorkflowDefinition;
pub use engine::Engine;
pub use error::{WorkflowError, WorkflowResult};
pub use registry::{RegistryBuilder, TransitionRegistry};
pub use transition::{Guard, Hook, Transition};
pub use trigger::{TriggerCheck, TriggerOutcome, TriggerParam, TriggerResult};
pub use variable::{Variables, WorkflowVariable};
pub use workflow::Workflow;
