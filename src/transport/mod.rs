//! Session interface to the peer-to-peer transport.
//!
//! The transport itself is an external collaborator: it owns connection
//! management, the replicated data-item store, point-to-point messaging,
//! and binary asset delivery. This module specifies that surface as a
//! cloneable [`SessionHandle`] plus an owned [`SessionEvents`] stream of
//! lifecycle and data callbacks, and provides an in-process loopback
//! implementation for tests and the demo binary.

mod loopback;

pub use loopback::{pair, LoopbackHub, SentMessage, SessionHandle};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Identifier of a peer device on the transport.
pub type PeerId = String;

/// Opaque reference to a binary payload resolved via a separate fetch,
/// rather than inlined in a data item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetHandle(Uuid);

impl AssetHandle {
    /// A handle that no transport will ever resolve. Fetching it fails.
    pub fn dangling() -> Self {
        Self(Uuid::new_v4())
    }

    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for AssetHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Kind of a data-item change event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataEventKind {
    Changed,
    Deleted,
}

/// One data-item change observed by a registered listener.
#[derive(Debug, Clone)]
pub struct DataEvent {
    pub kind: DataEventKind,
    /// Logical key path of the record, e.g. `/weather-update`.
    pub path: String,
    /// Record bytes. Empty for `Deleted` events.
    pub payload: Vec<u8>,
}

/// Callbacks delivered by the transport session.
///
/// All session callbacks arrive through one stream so the owner can fold
/// them into explicit state transitions instead of ad hoc flags.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// The session connected successfully.
    Connected,
    /// A connect attempt failed.
    ConnectionFailed { reason: String },
    /// The session was suspended by the transport; it may resume later.
    Suspended,
    /// A batch of data-item changes, delivered only while a listener is
    /// registered.
    DataChanged(Vec<DataEvent>),
    /// A point-to-point message from another peer.
    Message {
        from: PeerId,
        path: String,
        payload: Vec<u8>,
    },
}

/// Errors surfaced by session operations.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("session is not connected")]
    NotConnected,

    #[error("peer '{peer}' is not reachable")]
    PeerUnavailable { peer: PeerId },

    #[error("asset handle did not resolve to a payload")]
    UnknownAsset,

    #[error("transport has shut down")]
    SessionClosed,
}

/// Receiving side of a session's callback stream.
///
/// Owned by exactly one event loop; the cloneable [`SessionHandle`] is
/// what background tasks hold.
pub struct SessionEvents {
    rx: tokio::sync::mpsc::UnboundedReceiver<SessionEvent>,
}

impl SessionEvents {
    pub(crate) fn new(rx: tokio::sync::mpsc::UnboundedReceiver<SessionEvent>) -> Self {
        Self { rx }
    }

    /// Receive the next session callback. Returns `None` once the
    /// transport has shut down.
    pub async fn recv(&mut self) -> Option<SessionEvent> {
        self.rx.recv().await
    }
}
