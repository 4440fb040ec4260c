//! Producer-side message handler.
//!
//! Any message arriving on the trigger path maps directly to one publish
//! attempt; the payload body is discarded. Publish failures are logged
//! and not retried; the next trigger retries implicitly.

use crate::producer::publisher::SummaryPublisher;
use crate::protocol::SEND_UPDATE_PATH;
use crate::transport::{SessionEvent, SessionEvents};

/// Event loop answering update requests from consumers.
pub struct ProducerService {
    publisher: SummaryPublisher,
    events: SessionEvents,
}

impl ProducerService {
    pub fn new(publisher: SummaryPublisher, events: SessionEvents) -> Self {
        Self { publisher, events }
    }

    /// Run until the transport shuts down.
    pub async fn run(mut self) {
        while let Some(event) = self.events.recv().await {
            match event {
                SessionEvent::Message { from, path, .. } => {
                    if path != SEND_UPDATE_PATH {
                        tracing::trace!(path = %path, "ignoring message on unknown path");
                        continue;
                    }
                    tracing::debug!(peer = %from, "update requested");
                    if let Err(err) = self.publisher.publish().await {
                        tracing::warn!(error = %err, "publish failed");
                    }
                }
                SessionEvent::Connected => {
                    tracing::debug!("producer session connected");
                }
                SessionEvent::ConnectionFailed { reason } => {
                    tracing::warn!(reason = %reason, "producer session connect failed");
                }
                SessionEvent::Suspended | SessionEvent::DataChanged(_) => {}
            }
        }
    }
}
