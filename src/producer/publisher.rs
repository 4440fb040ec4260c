//! Builds and publishes the weather summary record.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;

use crate::producer::icons::{encode_png, render_icon, IconKind};
use crate::producer::store::WeatherStore;
use crate::protocol::{WeatherRecord, WEATHER_UPDATE_PATH};
use crate::transport::{SessionHandle, TransportError};

/// Errors that can occur while publishing a summary.
#[derive(Debug, Error)]
pub enum PublishError {
    /// The authoritative store holds no row; nothing is written.
    #[error("no weather data available")]
    NoData,

    /// The condition code maps to no known icon.
    #[error("unrecognized condition code {code}")]
    UnknownCondition { code: u16 },

    #[error("icon encoding failed: {0}")]
    IconEncode(#[from] image::ImageError),

    #[error("record serialization failed: {0}")]
    Encode(#[from] serde_json::Error),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Receipt for one successful publish.
#[derive(Debug, Clone)]
pub struct Ack {
    pub path: &'static str,
    pub timestamp_ms: i64,
}

/// Publishes the latest authoritative weather row as a single urgent
/// data-item write.
pub struct SummaryPublisher {
    store: Arc<dyn WeatherStore>,
    session: SessionHandle,
}

impl SummaryPublisher {
    pub fn new(store: Arc<dyn WeatherStore>, session: SessionHandle) -> Self {
        Self { store, session }
    }

    /// Query the store, build the record, and write it.
    ///
    /// Performs exactly one store write per invocation and never retries:
    /// the caller logs failures, and the next update request retries
    /// implicitly.
    pub async fn publish(&self) -> Result<Ack, PublishError> {
        let row = self.store.latest().ok_or(PublishError::NoData)?;
        let kind = IconKind::for_condition(row.weather_id)
            .ok_or(PublishError::UnknownCondition {
                code: row.weather_id,
            })?;

        let png = encode_png(&render_icon(kind))?;
        let icon = self.session.create_asset(png).await;
        let timestamp_ms = epoch_ms();
        let record = WeatherRecord {
            max_temp: format_temperature(row.max_temp),
            min_temp: format_temperature(row.min_temp),
            icon,
            timestamp_ms,
        };

        self.session
            .put_record(WEATHER_UPDATE_PATH, record.encode()?, true)
            .await?;

        tracing::info!(
            weather_id = row.weather_id,
            max = %record.max_temp,
            min = %record.min_temp,
            "published weather update"
        );

        Ok(Ack {
            path: WEATHER_UPDATE_PATH,
            timestamp_ms,
        })
    }
}

/// Format a temperature the way the display expects it: rounded to the
/// nearest whole degree with a degree sign.
pub fn format_temperature(degrees: f64) -> String {
    format!("{}°", degrees.round() as i64)
}

fn epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::producer::store::{MemoryWeatherStore, WeatherRow};
    use crate::transport::pair;

    // -- formatting --------------------------------------------------------

    #[test]
    fn temperature_formatting_rounds_to_whole_degrees() {
        assert_eq!(format_temperature(25.0), "25°");
        assert_eq!(format_temperature(14.4), "14°");
        assert_eq!(format_temperature(14.5), "15°");
        assert_eq!(format_temperature(-0.4), "0°");
        assert_eq!(format_temperature(-3.6), "-4°");
    }

    // -- publish -----------------------------------------------------------

    #[tokio::test]
    async fn empty_store_skips_the_write() {
        let (hub, (session, _events), _consumer) = pair("phone", "watch");
        session.connect().await.expect("connect");
        let publisher = SummaryPublisher::new(Arc::new(MemoryWeatherStore::empty()), session);

        let err = publisher.publish().await.expect_err("publish must fail");
        assert!(matches!(err, PublishError::NoData));
        assert!(hub.record(WEATHER_UPDATE_PATH).is_none());
    }

    #[tokio::test]
    async fn unknown_condition_skips_the_write() {
        let (hub, (session, _events), _consumer) = pair("phone", "watch");
        session.connect().await.expect("connect");
        let store = MemoryWeatherStore::with_row(WeatherRow {
            weather_id: 42,
            max_temp: 10.0,
            min_temp: 5.0,
        });
        let publisher = SummaryPublisher::new(Arc::new(store), session);

        let err = publisher.publish().await.expect_err("publish must fail");
        assert!(matches!(err, PublishError::UnknownCondition { code: 42 }));
        assert!(hub.record(WEATHER_UPDATE_PATH).is_none());
    }

    #[tokio::test]
    async fn publish_writes_one_urgent_decodable_record() {
        let (hub, (session, _events), _consumer) = pair("phone", "watch");
        session.connect().await.expect("connect");
        let store = MemoryWeatherStore::with_row(WeatherRow {
            weather_id: 800,
            max_temp: 25.0,
            min_temp: 14.0,
        });
        let publisher = SummaryPublisher::new(Arc::new(store), session.clone());

        let ack = publisher.publish().await.expect("publish");
        assert_eq!(ack.path, WEATHER_UPDATE_PATH);
        assert_eq!(hub.urgent_put_count(), 1);

        let bytes = hub.record(WEATHER_UPDATE_PATH).expect("record stored");
        let record = WeatherRecord::decode(&bytes).expect("decode");
        assert_eq!(record.max_temp, "25°");
        assert_eq!(record.min_temp, "14°");
        assert_eq!(record.timestamp_ms, ack.timestamp_ms);

        // The icon handle resolves to valid PNG bytes.
        let png = session.fetch_asset(record.icon).await.expect("asset");
        assert!(image::load_from_memory(&png).is_ok());
    }
}
