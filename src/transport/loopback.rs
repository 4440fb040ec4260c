//! In-process loopback transport.
//!
//! Routes data-item writes, messages, and asset fetches between peers
//! attached to one shared hub. Used by the integration tests and the
//! `demo` subcommand; a real deployment would back [`SessionHandle`]
//! with an actual device-to-device transport.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;

use super::{
    AssetHandle, DataEvent, DataEventKind, PeerId, SessionEvent, SessionEvents, TransportError,
};

/// Shared routing state for a set of loopback peers.
#[derive(Clone)]
pub struct LoopbackHub {
    inner: Arc<Mutex<HubState>>,
}

struct PeerSlot {
    connected: bool,
    listening: bool,
    fail_next_connect: bool,
    events: mpsc::UnboundedSender<SessionEvent>,
}

#[derive(Default)]
struct HubState {
    records: HashMap<String, Vec<u8>>,
    assets: HashMap<AssetHandle, Vec<u8>>,
    peers: HashMap<PeerId, PeerSlot>,
    sent: Vec<SentMessage>,
    urgent_puts: u64,
}

/// Log entry for one point-to-point message, kept for observability.
#[derive(Debug, Clone)]
pub struct SentMessage {
    pub from: PeerId,
    pub to: PeerId,
    pub path: String,
}

impl LoopbackHub {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(HubState::default())),
        }
    }

    /// Attach a named peer to the hub.
    ///
    /// The returned handle starts disconnected; the session lifecycle is
    /// driven through [`SessionHandle::connect`] and friends.
    pub fn attach(&self, peer: &str) -> (SessionHandle, SessionEvents) {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut state = self.inner.lock();
        state.peers.insert(
            peer.to_string(),
            PeerSlot {
                connected: false,
                listening: false,
                fail_next_connect: false,
                events: tx,
            },
        );
        let handle = SessionHandle {
            peer: peer.to_string(),
            hub: self.clone(),
        };
        (handle, SessionEvents::new(rx))
    }

    /// Make the next connect attempt of `peer` fail with a callback.
    pub fn inject_connect_failure(&self, peer: &str) {
        let mut state = self.inner.lock();
        if let Some(slot) = state.peers.get_mut(peer) {
            slot.fail_next_connect = true;
        }
    }

    /// Deliver a `Suspended` callback to a connected peer.
    pub fn suspend(&self, peer: &str) {
        let state = self.inner.lock();
        if let Some(slot) = state.peers.get(peer) {
            if slot.connected {
                let _ = slot.events.send(SessionEvent::Suspended);
            }
        }
    }

    /// Messages sent through the hub so far.
    pub fn sent_messages(&self) -> Vec<SentMessage> {
        self.inner.lock().sent.clone()
    }

    /// How many record writes were tagged urgent.
    pub fn urgent_put_count(&self) -> u64 {
        self.inner.lock().urgent_puts
    }

    /// Current record bytes at a key path.
    pub fn record(&self, path: &str) -> Option<Vec<u8>> {
        self.inner.lock().records.get(path).cloned()
    }

    /// Drop a stored asset, leaving any handle to it dangling.
    pub fn evict_asset(&self, handle: AssetHandle) {
        self.inner.lock().assets.remove(&handle);
    }
}

impl Default for LoopbackHub {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a hub with two attached peers.
pub fn pair(
    a: &str,
    b: &str,
) -> (
    LoopbackHub,
    (SessionHandle, SessionEvents),
    (SessionHandle, SessionEvents),
) {
    let hub = LoopbackHub::new();
    let first = hub.attach(a);
    let second = hub.attach(b);
    (hub, first, second)
}

/// Cloneable handle to one peer's transport session.
///
/// Mirrors the session surface the rest of the crate is allowed to
/// depend on: lifecycle, listener registration, data-item writes,
/// messaging, peer discovery, and asset staging/fetching.
#[derive(Clone)]
pub struct SessionHandle {
    peer: PeerId,
    hub: LoopbackHub,
}

impl SessionHandle {
    /// This peer's own identifier.
    pub fn peer_id(&self) -> &PeerId {
        &self.peer
    }

    /// Start a connect attempt. The outcome arrives as a
    /// [`SessionEvent::Connected`] or [`SessionEvent::ConnectionFailed`]
    /// callback; connecting an already-connected session is a no-op.
    pub async fn connect(&self) -> Result<(), TransportError> {
        let mut guard = self.hub.inner.lock();
        let state = &mut *guard;
        let slot = state
            .peers
            .get_mut(&self.peer)
            .ok_or(TransportError::SessionClosed)?;
        if slot.connected {
            return Ok(());
        }
        if slot.fail_next_connect {
            slot.fail_next_connect = false;
            let _ = slot.events.send(SessionEvent::ConnectionFailed {
                reason: "connect refused by transport".to_string(),
            });
            return Ok(());
        }
        slot.connected = true;
        let _ = slot.events.send(SessionEvent::Connected);
        Ok(())
    }

    /// Tear the session down. Drops the listener registration; no
    /// callback is delivered for a local disconnect.
    pub fn disconnect(&self) {
        let mut state = self.hub.inner.lock();
        if let Some(slot) = state.peers.get_mut(&self.peer) {
            slot.connected = false;
            slot.listening = false;
        }
    }

    pub fn is_connected(&self) -> bool {
        let state = self.hub.inner.lock();
        state
            .peers
            .get(&self.peer)
            .map(|slot| slot.connected)
            .unwrap_or(false)
    }

    /// Start receiving `DataChanged` callbacks.
    pub fn register_listener(&self) {
        let mut state = self.hub.inner.lock();
        if let Some(slot) = state.peers.get_mut(&self.peer) {
            if slot.connected {
                slot.listening = true;
            }
        }
    }

    /// Stop receiving `DataChanged` callbacks.
    pub fn unregister_listener(&self) {
        let mut state = self.hub.inner.lock();
        if let Some(slot) = state.peers.get_mut(&self.peer) {
            slot.listening = false;
        }
    }

    /// Write a data item. A single put is atomic: listeners observe all
    /// fields of the record together, never a partial write.
    pub async fn put_record(
        &self,
        path: &str,
        payload: Vec<u8>,
        urgent: bool,
    ) -> Result<(), TransportError> {
        let mut guard = self.hub.inner.lock();
        let state = &mut *guard;
        let slot = state
            .peers
            .get(&self.peer)
            .ok_or(TransportError::SessionClosed)?;
        if !slot.connected {
            return Err(TransportError::NotConnected);
        }
        state.records.insert(path.to_string(), payload.clone());
        if urgent {
            state.urgent_puts += 1;
        }
        let event = DataEvent {
            kind: DataEventKind::Changed,
            path: path.to_string(),
            payload,
        };
        broadcast(state, &self.peer, event);
        Ok(())
    }

    /// Delete a data item, notifying listeners with a `Deleted` event.
    pub async fn delete_record(&self, path: &str) -> Result<(), TransportError> {
        let mut guard = self.hub.inner.lock();
        let state = &mut *guard;
        let slot = state
            .peers
            .get(&self.peer)
            .ok_or(TransportError::SessionClosed)?;
        if !slot.connected {
            return Err(TransportError::NotConnected);
        }
        state.records.remove(path);
        let event = DataEvent {
            kind: DataEventKind::Deleted,
            path: path.to_string(),
            payload: Vec::new(),
        };
        broadcast(state, &self.peer, event);
        Ok(())
    }

    /// Send a point-to-point message to one peer.
    pub async fn send_message(
        &self,
        to: &PeerId,
        path: &str,
        payload: &[u8],
    ) -> Result<(), TransportError> {
        let mut guard = self.hub.inner.lock();
        let state = &mut *guard;
        let slot = state
            .peers
            .get(&self.peer)
            .ok_or(TransportError::SessionClosed)?;
        if !slot.connected {
            return Err(TransportError::NotConnected);
        }
        let target = state
            .peers
            .get(to)
            .filter(|slot| slot.connected)
            .ok_or_else(|| TransportError::PeerUnavailable { peer: to.clone() })?;
        let _ = target.events.send(SessionEvent::Message {
            from: self.peer.clone(),
            path: path.to_string(),
            payload: payload.to_vec(),
        });
        state.sent.push(SentMessage {
            from: self.peer.clone(),
            to: to.clone(),
            path: path.to_string(),
        });
        Ok(())
    }

    /// Enumerate the other currently-connected peers.
    pub async fn connected_peers(&self) -> Result<Vec<PeerId>, TransportError> {
        let state = self.hub.inner.lock();
        let slot = state
            .peers
            .get(&self.peer)
            .ok_or(TransportError::SessionClosed)?;
        if !slot.connected {
            return Err(TransportError::NotConnected);
        }
        Ok(state
            .peers
            .iter()
            .filter(|(id, slot)| **id != self.peer && slot.connected)
            .map(|(id, _)| id.clone())
            .collect())
    }

    /// Stage a binary payload, producing a handle other peers can fetch.
    pub async fn create_asset(&self, bytes: Vec<u8>) -> AssetHandle {
        let handle = AssetHandle::generate();
        self.hub.inner.lock().assets.insert(handle, bytes);
        handle
    }

    /// Resolve an asset handle to its payload.
    ///
    /// Deliberately usable without a live connection: an in-flight fetch
    /// is allowed to complete after the session disconnected.
    pub async fn fetch_asset(&self, handle: AssetHandle) -> Result<Vec<u8>, TransportError> {
        self.hub
            .inner
            .lock()
            .assets
            .get(&handle)
            .cloned()
            .ok_or(TransportError::UnknownAsset)
    }
}

fn broadcast(state: &mut HubState, from: &PeerId, event: DataEvent) {
    for (id, slot) in &state.peers {
        if id != from && slot.connected && slot.listening {
            let _ = slot
                .events
                .send(SessionEvent::DataChanged(vec![event.clone()]));
        }
    }
}
