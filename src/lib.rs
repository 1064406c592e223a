//! # Microflow - A lightweight finite-state-machine workflow engine in Rust
//!
//! Given a workflow instance, a trigger and a registry of declared transitions,
//! microflow decides whether the transition is permitted, runs its guard and
//! hooks and commits the new state. Validation errors and explicit aborts are
//! returned to the caller instead of being raised.
//!
//! ## Usage
//!
//! ```toml
//! [dependencies]
//! microflow = "0.3"
//! ```
//!
//! The engine is synchronous and in-process. Persistence, HTTP exposure and
//! per-instance locking across processes belong to the host application.

use tracing_subscriber::EnvFilter;

/// Initialize the framework with default settings.
///
/// Installs a `tracing` fmt subscriber filtered by `RUST_LOG`, defaulting to
/// `info`.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

// Re-export the core module
pub use microflow_core as core;
pub use microflow_core::{
    Engine, EngineConfig, Guard, Hook, RegistryBuilder, Transition, TransitionRegistry,
    TriggerCheck, TriggerContext, TriggerOutcome, TriggerParam, TriggerResult, Variables,
    Workflow, WorkflowDefinition, WorkflowError, WorkflowResult, WorkflowVariable,
};
