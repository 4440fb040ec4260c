//! Producer side: answers update requests by publishing the current
//! weather summary as an urgent data item.

mod icons;
mod publisher;
mod service;
mod store;

pub use icons::{encode_png, render_icon, IconKind, ICON_RASTER_SIZE};
pub use publisher::{format_temperature, Ack, PublishError, SummaryPublisher};
pub use service::ProducerService;
pub use store::{MemoryWeatherStore, WeatherRow, WeatherStore};
