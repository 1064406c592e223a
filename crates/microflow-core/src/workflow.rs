use std::fmt::Debug;

/// A workflow instance owned by the host application.
///
/// The engine only reads [`workflow_type`](Workflow::workflow_type) to pick the
/// applicable definition and reads/writes the current state. Persistence and
/// every other field belong to the host.
///
/// Firing a trigger borrows the instance mutably for the whole invocation, so
/// two triggers cannot race on the same instance through safe code. Hosts that
/// share an instance across threads must serialize access themselves, for
/// example with [`Engine::fire_locked`](crate::engine::Engine::fire_locked).
pub trait Workflow: Send + 'static {
    /// Comparable state value, typically an enum or a state code.
    type State: Clone + PartialEq + Debug + Send + Sync + 'static;

    /// Discriminator used to select the applicable transitions.
    fn workflow_type(&self) -> &str;

    fn state(&self) -> &Self::State;

    fn set_state(&mut self, state: Self::State);
}
