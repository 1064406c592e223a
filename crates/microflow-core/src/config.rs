//! Engine configuration.

/// Tunables for [`Engine`](crate::engine::Engine).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Fail with `StateMutatedBeforeCommit` when a guard or before-hook
    /// changed the instance state.
    pub verify_state_unchanged: bool,
    /// Log a warning when an after-hook aborts a transition that is already
    /// committed.
    pub warn_on_late_abort: bool,
}

impl EngineConfig {
    /// Create a configuration with the default settings.
    pub fn new() -> Self {
        Self {
            verify_state_unchanged: true,
            warn_on_late_abort: true,
        }
    }

    /// Enable or disable the pre-commit state check.
    pub fn with_verify_state_unchanged(mut self, verify: bool) -> Self {
        self.verify_state_unchanged = verify;
        self
    }

    /// Enable or disable the late-abort warning.
    pub fn with_warn_on_late_abort(mut self, warn: bool) -> Self {
        self.warn_on_late_abort = warn;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}
