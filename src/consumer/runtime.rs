//! The render context.
//!
//! One event loop serializes everything that touches the render state:
//! timer ticks, visibility and mode callbacks, session callbacks, and
//! the results of background operations. Background work (peer
//! discovery, asset staging) runs on spawned tasks and marshals results
//! back through the face-event channel; nothing here blocks.

use chrono::Local;
use tokio::sync::mpsc;

use crate::config::Config;
use crate::consumer::coordinator::SyncCoordinator;
use crate::consumer::draw::{draw_face, format_time, Canvas};
use crate::consumer::layout::FaceMetrics;
use crate::consumer::listener::{process_batch, ListenerAction};
use crate::consumer::scheduler::RedrawTimer;
use crate::consumer::stager::stage;
use crate::consumer::state::{
    DisplayMode, RenderEvent, RenderReducer, RenderState, StagedIcon,
};
use crate::fsm::Reducer;
use crate::transport::{SessionEvent, SessionEvents, SessionHandle};

/// Events processed by the render context.
#[derive(Debug)]
pub enum FaceEvent {
    /// Redraw tick from the scheduler, tagged with its generation so
    /// fires queued before a stop become no-ops.
    Tick { generation: u64 },
    /// Immediate redraw request.
    Invalidate,
    /// Device visibility callback.
    SetVisible(bool),
    /// Device power-mode callback.
    SetMode(DisplayMode),
    /// Device properties callback.
    SetProperties { low_bit_ambient: bool },
    /// A background icon stage completed.
    IconStaged(StagedIcon),
    /// Stop the event loop.
    Shutdown,
}

/// Cloneable sender for driving the render context from outside.
#[derive(Clone)]
pub struct FaceHandle {
    tx: mpsc::UnboundedSender<FaceEvent>,
}

impl FaceHandle {
    pub fn set_visible(&self, visible: bool) {
        let _ = self.tx.send(FaceEvent::SetVisible(visible));
    }

    pub fn set_mode(&self, mode: DisplayMode) {
        let _ = self.tx.send(FaceEvent::SetMode(mode));
    }

    pub fn set_properties(&self, low_bit_ambient: bool) {
        let _ = self.tx.send(FaceEvent::SetProperties { low_bit_ambient });
    }

    pub fn invalidate(&self) {
        let _ = self.tx.send(FaceEvent::Invalidate);
    }

    pub fn shutdown(&self) {
        let _ = self.tx.send(FaceEvent::Shutdown);
    }
}

/// Generic state dispatch: takes current state, runs the reducer,
/// stores the result.
macro_rules! dispatch_render {
    ($self:expr, $event:expr) => {
        $self.state = RenderReducer::reduce(std::mem::take(&mut $self.state), $event);
    };
}

/// The consumer's event loop.
pub struct FaceRuntime<C: Canvas> {
    canvas: C,
    state: RenderState,
    coordinator: SyncCoordinator,
    timer: RedrawTimer,
    metrics: FaceMetrics,
    icon_size: u32,
    session: SessionHandle,
    session_events: SessionEvents,
    session_open: bool,
    events_tx: mpsc::UnboundedSender<FaceEvent>,
    events_rx: mpsc::UnboundedReceiver<FaceEvent>,
}

impl<C: Canvas> FaceRuntime<C> {
    pub fn new(
        canvas: C,
        session: SessionHandle,
        session_events: SessionEvents,
        config: &Config,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let state = RenderReducer::reduce(
            RenderState::default(),
            RenderEvent::PropertiesChanged {
                low_bit_ambient: config.display.low_bit_ambient,
            },
        );
        Self {
            canvas,
            state,
            coordinator: SyncCoordinator::new(session.clone()),
            timer: RedrawTimer::new(events_tx.clone()),
            metrics: FaceMetrics::from_config(&config.display),
            icon_size: config.display.icon_size,
            session,
            session_events,
            session_open: true,
            events_tx,
            events_rx,
        }
    }

    pub fn handle(&self) -> FaceHandle {
        FaceHandle {
            tx: self.events_tx.clone(),
        }
    }

    pub fn state(&self) -> &RenderState {
        &self.state
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    /// Run until shutdown, then hand the canvas back.
    pub async fn run(mut self) -> C {
        loop {
            tokio::select! {
                maybe_event = self.events_rx.recv() => {
                    match maybe_event {
                        Some(FaceEvent::Shutdown) | None => break,
                        Some(event) => self.on_face_event(event),
                    }
                }
                maybe_event = self.session_events.recv(), if self.session_open => {
                    match maybe_event {
                        Some(event) => self.on_session_event(event),
                        None => self.session_open = false,
                    }
                }
            }
        }
        self.canvas
    }

    fn on_face_event(&mut self, event: FaceEvent) {
        match event {
            FaceEvent::Tick { generation } => {
                if self.timer.is_current(generation) {
                    self.redraw();
                }
            }
            FaceEvent::Invalidate => self.redraw(),
            FaceEvent::SetVisible(visible) => {
                dispatch_render!(self, RenderEvent::VisibilityChanged(visible));
                self.coordinator.on_visibility_changed(visible);
                self.timer.sync(visible, self.state.mode);
            }
            FaceEvent::SetMode(mode) => {
                let changed = self.state.mode != mode;
                dispatch_render!(self, RenderEvent::ModeChanged(mode));
                if changed {
                    self.redraw();
                }
                self.timer.sync(self.state.visible, self.state.mode);
            }
            FaceEvent::SetProperties { low_bit_ambient } => {
                dispatch_render!(self, RenderEvent::PropertiesChanged { low_bit_ambient });
            }
            FaceEvent::IconStaged(icon) => {
                dispatch_render!(self, RenderEvent::IconStaged(icon));
                self.redraw();
            }
            FaceEvent::Shutdown => {}
        }
    }

    fn on_session_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::DataChanged(batch) => {
                let mut redraw = false;
                for action in process_batch(&batch) {
                    match action {
                        ListenerAction::ApplyScalars { max_temp, min_temp } => {
                            dispatch_render!(
                                self,
                                RenderEvent::UpdateReceived { max_temp, min_temp }
                            );
                            redraw = true;
                        }
                        ListenerAction::StageIcon(handle) => {
                            let session = self.session.clone();
                            let events = self.events_tx.clone();
                            let icon_size = self.icon_size;
                            tokio::spawn(async move {
                                match stage(&session, handle, icon_size).await {
                                    Ok(icon) => {
                                        let _ = events.send(FaceEvent::IconStaged(icon));
                                    }
                                    Err(err) => {
                                        tracing::warn!(
                                            error = %err,
                                            "icon stage failed; keeping previous icon"
                                        );
                                    }
                                }
                            });
                        }
                    }
                }
                if redraw {
                    self.redraw();
                }
            }
            SessionEvent::Message { path, .. } => {
                tracing::trace!(path = %path, "ignoring message on consumer");
            }
            lifecycle => {
                self.coordinator
                    .on_session_event(&lifecycle, self.state.has_received_first_update);
            }
        }
    }

    fn redraw(&mut self) {
        if !self.state.visible {
            return;
        }
        let time_text = format_time(Local::now());
        draw_face(&mut self.canvas, &self.state, &self.metrics, &time_text);
    }
}
