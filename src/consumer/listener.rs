//! Update listener.
//!
//! Translates data-item change batches into render actions. This path
//! must never block: scalar fields are decoded synchronously (cheap),
//! while icon resolution is deferred entirely to the stager.

use crate::protocol::{WeatherRecord, WEATHER_UPDATE_PATH};
use crate::transport::{AssetHandle, DataEvent, DataEventKind};

/// Actions the render context applies after a change batch.
#[derive(Debug, Clone, PartialEq)]
pub enum ListenerAction {
    /// Store the scalar fields and latch the first-update flag.
    ApplyScalars { max_temp: String, min_temp: String },
    /// Kick off an asynchronous icon stage.
    StageIcon(AssetHandle),
}

/// Process one change-notification batch.
///
/// Unrelated keys are ignored; `Deleted` events for the weather key are
/// accepted but deliberately perform nothing; undecodable records are
/// logged and skipped.
pub fn process_batch(batch: &[DataEvent]) -> Vec<ListenerAction> {
    let mut actions = Vec::new();
    for event in batch {
        if event.path != WEATHER_UPDATE_PATH {
            continue;
        }
        match event.kind {
            DataEventKind::Deleted => {
                // No clear-display policy: keep showing the last state.
                tracing::trace!("weather record deleted; keeping current display");
            }
            DataEventKind::Changed => match WeatherRecord::decode(&event.payload) {
                Ok(record) => {
                    actions.push(ListenerAction::ApplyScalars {
                        max_temp: record.max_temp,
                        min_temp: record.min_temp,
                    });
                    actions.push(ListenerAction::StageIcon(record.icon));
                }
                Err(err) => {
                    tracing::warn!(error = %err, "undecodable weather record; skipping");
                }
            },
        }
    }
    actions
}
