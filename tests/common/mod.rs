//! Shared test utilities.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use skyglance::config::Config;
use skyglance::producer::{MemoryWeatherStore, ProducerService, SummaryPublisher, WeatherRow};
use skyglance::transport::{LoopbackHub, SessionEvents, SessionHandle};
use tokio::task::JoinHandle;

/// The demo row used across tests.
pub fn seed_row() -> WeatherRow {
    WeatherRow {
        weather_id: 800,
        max_temp: 25.0,
        min_temp: 14.0,
    }
}

/// Connect a producer session and spawn a service answering triggers
/// from the given store row.
pub async fn spawn_producer(
    session: SessionHandle,
    events: SessionEvents,
    row: WeatherRow,
) -> JoinHandle<()> {
    session.connect().await.expect("producer connect");
    let store = Arc::new(MemoryWeatherStore::with_row(row));
    let publisher = SummaryPublisher::new(store, session);
    tokio::spawn(ProducerService::new(publisher, events).run())
}

/// Poll until `predicate` holds or the timeout elapses.
pub async fn wait_until(timeout: Duration, mut predicate: impl FnMut() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if predicate() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    predicate()
}

/// Number of trigger messages the hub has routed.
pub fn trigger_count(hub: &LoopbackHub) -> usize {
    hub.sent_messages()
        .iter()
        .filter(|m| m.path == skyglance::protocol::SEND_UPDATE_PATH)
        .count()
}

/// A default config with a short demo run.
pub fn test_config() -> Config {
    Config::default()
}
