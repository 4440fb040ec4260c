//! Connection lifecycle state machine.
//!
//! All session callbacks and visibility changes are translated into
//! named events; the reducer is the only place transitions happen.

use crate::fsm::{Event, Reducer, State};

/// Lifecycle of the consumer's transport session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Suspended,
    Failed,
}

impl State for ConnectionState {}

/// Discrete events driving the connection machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncEvent {
    BecameVisible,
    BecameHidden,
    ConnectSucceeded,
    ConnectFailed,
    SessionSuspended,
}

impl Event for SyncEvent {}

/// Reducer for the connection lifecycle.
pub struct ConnectionReducer;

impl Reducer for ConnectionReducer {
    type State = ConnectionState;
    type Event = SyncEvent;

    fn reduce(state: Self::State, event: Self::Event) -> Self::State {
        match event {
            SyncEvent::BecameVisible => match state {
                ConnectionState::Disconnected | ConnectionState::Failed => {
                    ConnectionState::Connecting
                }
                other => other,
            },

            // Visibility loss tears the session down from any state.
            SyncEvent::BecameHidden => ConnectionState::Disconnected,

            SyncEvent::ConnectSucceeded => match state {
                ConnectionState::Connecting | ConnectionState::Suspended => {
                    ConnectionState::Connected
                }
                other => other,
            },

            SyncEvent::ConnectFailed => match state {
                ConnectionState::Connecting | ConnectionState::Connected => {
                    ConnectionState::Failed
                }
                other => other,
            },

            SyncEvent::SessionSuspended => match state {
                ConnectionState::Connected => ConnectionState::Suspended,
                other => other,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reduce(state: ConnectionState, event: SyncEvent) -> ConnectionState {
        ConnectionReducer::reduce(state, event)
    }

    // -- the happy path ----------------------------------------------------

    #[test]
    fn visible_then_connect_reaches_connected() {
        let state = reduce(ConnectionState::Disconnected, SyncEvent::BecameVisible);
        assert_eq!(state, ConnectionState::Connecting);
        let state = reduce(state, SyncEvent::ConnectSucceeded);
        assert_eq!(state, ConnectionState::Connected);
    }

    // -- teardown ----------------------------------------------------------

    #[test]
    fn hidden_disconnects_from_every_state() {
        for state in [
            ConnectionState::Disconnected,
            ConnectionState::Connecting,
            ConnectionState::Connected,
            ConnectionState::Suspended,
            ConnectionState::Failed,
        ] {
            assert_eq!(
                reduce(state, SyncEvent::BecameHidden),
                ConnectionState::Disconnected
            );
        }
    }

    // -- failure and retry -------------------------------------------------

    #[test]
    fn connect_failure_marks_failed() {
        let state = reduce(ConnectionState::Connecting, SyncEvent::ConnectFailed);
        assert_eq!(state, ConnectionState::Failed);
        let state = reduce(ConnectionState::Connected, SyncEvent::ConnectFailed);
        assert_eq!(state, ConnectionState::Failed);
    }

    #[test]
    fn failed_retries_on_next_visibility() {
        let state = reduce(ConnectionState::Failed, SyncEvent::BecameVisible);
        assert_eq!(state, ConnectionState::Connecting);
    }

    // -- suspension --------------------------------------------------------

    #[test]
    fn suspension_only_applies_while_connected() {
        assert_eq!(
            reduce(ConnectionState::Connected, SyncEvent::SessionSuspended),
            ConnectionState::Suspended
        );
        assert_eq!(
            reduce(ConnectionState::Connecting, SyncEvent::SessionSuspended),
            ConnectionState::Connecting
        );
    }

    #[test]
    fn suspended_session_can_resume() {
        let state = reduce(ConnectionState::Suspended, SyncEvent::ConnectSucceeded);
        assert_eq!(state, ConnectionState::Connected);
    }

    #[test]
    fn stray_events_do_not_invent_transitions() {
        assert_eq!(
            reduce(ConnectionState::Disconnected, SyncEvent::ConnectSucceeded),
            ConnectionState::Disconnected
        );
        assert_eq!(
            reduce(ConnectionState::Connected, SyncEvent::BecameVisible),
            ConnectionState::Connected
        );
        assert_eq!(
            reduce(ConnectionState::Disconnected, SyncEvent::ConnectFailed),
            ConnectionState::Disconnected
        );
    }
}
