use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tokio::time::sleep;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

use skyglance::config::Config;
use skyglance::consumer::draw::RecordingCanvas;
use skyglance::consumer::runtime::FaceRuntime;
use skyglance::consumer::state::DisplayMode;
use skyglance::producer::{MemoryWeatherStore, ProducerService, SummaryPublisher, WeatherRow};
use skyglance::transport::pair;

#[derive(Parser)]
#[command(
    name = "skyglance",
    about = "Weather summary sync between a producer device and a watch face"
)]
struct Cli {
    /// Path to the config file. Defaults to the platform config dir.
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run both peers over an in-process transport and print the frames
    /// the face would draw.
    Demo,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    match cli.command {
        Command::Demo => run_demo(config).await,
    }
}

/// Initialize tracing to stderr.
///
/// Filter defaults to `info`; override with `RUST_LOG`.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .init();
}

async fn run_demo(config: Config) -> anyhow::Result<()> {
    let (hub, (producer_session, producer_events), (consumer_session, consumer_events)) =
        pair("phone", "watch");

    // Producer: authoritative store seeded from config, answering
    // triggers for as long as the demo runs.
    let store = Arc::new(MemoryWeatherStore::with_row(WeatherRow {
        weather_id: config.demo.weather_id,
        max_temp: config.demo.max_temp,
        min_temp: config.demo.min_temp,
    }));
    producer_session.connect().await?;
    let publisher = SummaryPublisher::new(store, producer_session.clone());
    let producer_task = tokio::spawn(ProducerService::new(publisher, producer_events).run());

    // Consumer: headless canvas, event loop, scripted device callbacks.
    let canvas = RecordingCanvas::new(config.display.width as f32, config.display.height as f32);
    let runtime = FaceRuntime::new(canvas, consumer_session, consumer_events, &config);
    let handle = runtime.handle();
    let face_task = tokio::spawn(runtime.run());

    handle.set_visible(true);
    sleep(Duration::from_secs(config.demo.run_seconds.max(1))).await;

    tracing::info!("entering ambient mode");
    handle.set_mode(DisplayMode::Ambient);
    sleep(Duration::from_secs(1)).await;

    tracing::info!("back to interactive mode");
    handle.set_mode(DisplayMode::Interactive);
    sleep(Duration::from_secs(1)).await;

    handle.shutdown();
    let canvas = face_task.await?;
    producer_task.abort();

    tracing::info!(
        frames = canvas.frames(),
        trigger_messages = hub.sent_messages().len(),
        "demo finished"
    );
    println!("final frame ({} frames drawn):", canvas.frames());
    for op in canvas.ops() {
        println!("  {:?}", op);
    }
    Ok(())
}
