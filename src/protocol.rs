//! Wire formats shared by both peers.
//!
//! Two surfaces exist between the devices: a pure trigger message asking
//! the producer to publish, and the weather record written as a single
//! atomic data item. The record inlines only cheap scalar fields; the
//! icon travels as an asset handle resolved by a separate fetch.

use serde::{Deserialize, Serialize};

use crate::transport::AssetHandle;

/// Message path of the update-request trigger.
pub const SEND_UPDATE_PATH: &str = "/send-updates";

/// Fixed trigger payload. The receiver never parses it; the message is a
/// pure signal.
pub const SEND_UPDATE_MSG: &[u8] = b"/send-updates";

/// Key path of the weather record data item.
pub const WEATHER_UPDATE_PATH: &str = "/weather-update";

/// The weather summary record, immutable once published. A new publish
/// fully replaces the prior value at [`WEATHER_UPDATE_PATH`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherRecord {
    /// Formatted high temperature, e.g. `"25°"`.
    #[serde(rename = "max-temp")]
    pub max_temp: String,
    /// Formatted low temperature, e.g. `"14°"`.
    #[serde(rename = "min-temp")]
    pub min_temp: String,
    /// Handle of the PNG-encoded condition icon.
    #[serde(rename = "image")]
    pub icon: AssetHandle,
    /// Publish time in epoch milliseconds. Also serves to make every
    /// publish a distinct record value, so re-publishing identical
    /// temperatures still raises a change event.
    #[serde(rename = "timestamp")]
    pub timestamp_ms: i64,
}

impl WeatherRecord {
    pub fn encode(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_roundtrip_preserves_fields_exactly() {
        let record = WeatherRecord {
            max_temp: "25°".to_string(),
            min_temp: "14°".to_string(),
            icon: AssetHandle::dangling(),
            timestamp_ms: 1_722_945_600_123,
        };
        let decoded =
            WeatherRecord::decode(&record.encode().expect("encode")).expect("decode");
        assert_eq!(decoded, record);
    }

    #[test]
    fn record_uses_wire_field_names() {
        let record = WeatherRecord {
            max_temp: "3°".to_string(),
            min_temp: "-2°".to_string(),
            icon: AssetHandle::dangling(),
            timestamp_ms: 0,
        };
        let json: serde_json::Value =
            serde_json::from_slice(&record.encode().expect("encode")).expect("json");
        assert!(json.get("max-temp").is_some());
        assert!(json.get("min-temp").is_some());
        assert!(json.get("image").is_some());
        assert!(json.get("timestamp").is_some());
    }

    #[test]
    fn trigger_payload_matches_path() {
        assert_eq!(SEND_UPDATE_MSG, SEND_UPDATE_PATH.as_bytes());
    }
}
