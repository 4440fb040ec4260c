//! Session lifecycle coordination.
//!
//! Translates visibility changes and session callbacks into connection
//! state transitions, keeps the change listener registered exactly while
//! connected, and runs the request-update protocol once per connection
//! epoch until the first update has been received.

use crate::consumer::connection::{ConnectionReducer, ConnectionState, SyncEvent};
use crate::fsm::Reducer;
use crate::protocol::{SEND_UPDATE_MSG, SEND_UPDATE_PATH};
use crate::transport::{SessionEvent, SessionHandle};

/// Drives the consumer's session around visibility transitions.
pub struct SyncCoordinator {
    session: SessionHandle,
    state: ConnectionState,
    /// Guard: the request-update protocol runs at most once per
    /// connection epoch. A new epoch starts with each connect attempt.
    requested_this_epoch: bool,
}

impl SyncCoordinator {
    pub fn new(session: SessionHandle) -> Self {
        Self {
            session,
            state: ConnectionState::default(),
            requested_this_epoch: false,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Visibility callback from the device.
    ///
    /// Becoming visible opens a session; becoming hidden tears it down
    /// explicitly (listener unregistered, session disconnected).
    pub fn on_visibility_changed(&mut self, visible: bool) {
        if visible {
            self.apply(SyncEvent::BecameVisible);
            if self.state == ConnectionState::Connecting {
                self.requested_this_epoch = false;
                let session = self.session.clone();
                tokio::spawn(async move {
                    if let Err(err) = session.connect().await {
                        tracing::warn!(error = %err, "connect attempt could not start");
                    }
                });
            }
        } else {
            self.apply(SyncEvent::BecameHidden);
            self.session.unregister_listener();
            self.session.disconnect();
        }
    }

    /// Session lifecycle callback.
    ///
    /// `has_first_update` gates the request-update protocol: once any
    /// update has been received, reconnects stay silent.
    pub fn on_session_event(&mut self, event: &SessionEvent, has_first_update: bool) {
        match event {
            SessionEvent::Connected => {
                self.apply(SyncEvent::ConnectSucceeded);
                if self.state != ConnectionState::Connected {
                    return;
                }
                self.session.register_listener();
                if !has_first_update && !self.requested_this_epoch {
                    self.requested_this_epoch = true;
                    tokio::spawn(request_update_from_peers(self.session.clone()));
                }
            }
            SessionEvent::ConnectionFailed { reason } => {
                tracing::warn!(reason = %reason, "session connect failed");
                self.apply(SyncEvent::ConnectFailed);
                self.session.unregister_listener();
            }
            SessionEvent::Suspended => {
                tracing::debug!("session suspended");
                self.apply(SyncEvent::SessionSuspended);
                self.session.unregister_listener();
            }
            SessionEvent::DataChanged(_) | SessionEvent::Message { .. } => {}
        }
    }

    fn apply(&mut self, event: SyncEvent) {
        let next = ConnectionReducer::reduce(self.state, event);
        if next != self.state {
            tracing::debug!(from = ?self.state, to = ?next, event = ?event, "connection transition");
            self.state = next;
        }
    }
}

/// Discover connected peers and send each the fixed trigger message.
///
/// Runs off the render context; discovery is a blocking enumeration from
/// the transport's point of view. Failures are logged and never retried;
/// the next visibility cycle is the retry path.
async fn request_update_from_peers(session: SessionHandle) {
    let peers = match session.connected_peers().await {
        Ok(peers) => peers,
        Err(err) => {
            tracing::warn!(error = %err, "peer discovery failed");
            return;
        }
    };
    for peer in peers {
        tracing::info!(peer = %peer, "requesting update");
        if let Err(err) = session
            .send_message(&peer, SEND_UPDATE_PATH, SEND_UPDATE_MSG)
            .await
        {
            tracing::warn!(peer = %peer, error = %err, "update request failed");
        }
    }
}
