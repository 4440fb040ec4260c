//! Reducer trait for state machines.

use super::event::Event;
use super::state::State;

/// Reducer transforms state based on events.
///
/// The reducer is the only place where state transitions happen.
/// It must be a pure function: (State, Event) -> State
pub trait Reducer {
    /// The state type this reducer operates on.
    type State: State;

    /// The event type this reducer handles.
    type Event: Event;

    /// Process an event and return the new state.
    ///
    /// This should be a pure function with no side effects.
    fn reduce(state: Self::State, event: Self::Event) -> Self::State;
}
