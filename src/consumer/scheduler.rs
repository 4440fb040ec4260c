//! Redraw timer.
//!
//! The timer runs iff the face is visible and in interactive mode. Each
//! tick schedules the next fire for the upcoming second boundary rather
//! than a fixed offset from "now", so the displayed seconds field does
//! not drift when a tick itself is delayed.
//!
//! Fires are tagged with a generation token owned by the timer; after a
//! stop, queued fires from the old generation are no-ops.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::consumer::runtime::FaceEvent;
use crate::consumer::state::DisplayMode;

/// Update rate in interactive mode. Once a second, since seconds are
/// part of the rendered time.
pub const INTERACTIVE_TICK: Duration = Duration::from_millis(1000);

/// Whether the redraw timer should be running at all.
pub fn should_timer_run(visible: bool, mode: DisplayMode) -> bool {
    visible && mode == DisplayMode::Interactive
}

/// Delay from `now_ms` to the next tick boundary.
///
/// `interval - (now mod interval)`: a tick that fired late still lands
/// the next fire on the boundary.
pub fn delay_to_next_boundary(now_ms: u64, interval: Duration) -> Duration {
    let interval_ms = interval.as_millis() as u64;
    Duration::from_millis(interval_ms - (now_ms % interval_ms))
}

/// Owns the tick task and its generation token.
pub struct RedrawTimer {
    events: mpsc::UnboundedSender<FaceEvent>,
    generation: u64,
    task: Option<JoinHandle<()>>,
}

impl RedrawTimer {
    pub fn new(events: mpsc::UnboundedSender<FaceEvent>) -> Self {
        Self {
            events,
            generation: 0,
            task: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.is_some()
    }

    /// True if a tick carrying `generation` is from the live timer.
    pub fn is_current(&self, generation: u64) -> bool {
        self.task.is_some() && generation == self.generation
    }

    /// Recompute whether the timer should run and start/stop it
    /// accordingly. Idempotent: re-syncing an unchanged answer is a
    /// no-op.
    pub fn sync(&mut self, visible: bool, mode: DisplayMode) {
        let should_run = should_timer_run(visible, mode);
        if should_run == self.is_running() {
            return;
        }
        if should_run {
            self.start();
        } else {
            self.stop();
        }
    }

    fn start(&mut self) {
        self.generation += 1;
        let generation = self.generation;
        let events = self.events.clone();
        self.task = Some(tokio::spawn(async move {
            // Fire immediately on start, then align to boundaries.
            loop {
                if events.send(FaceEvent::Tick { generation }).is_err() {
                    break;
                }
                let delay = delay_to_next_boundary(epoch_ms(), INTERACTIVE_TICK);
                tokio::time::sleep(delay).await;
            }
        }));
    }

    fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        // Invalidate the token so already-queued fires become no-ops.
        self.generation += 1;
    }
}

impl Drop for RedrawTimer {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

fn epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
