//! Render state of the watch face.
//!
//! Owned and mutated only by the render context's event loop; background
//! operations hand it new values through events but never draw with it.

use std::sync::Arc;

use image::RgbaImage;

use crate::fsm::{Event, Reducer, State};

/// Display power mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    #[default]
    Interactive,
    Ambient,
}

/// A decoded, display-sized icon ready to draw.
///
/// Cheap to clone; equality is identity, which is what transition
/// detection needs (two separately staged icons are distinct even if
/// their pixels happen to match).
#[derive(Debug, Clone)]
pub struct StagedIcon(Arc<RgbaImage>);

impl StagedIcon {
    pub fn new(image: RgbaImage) -> Self {
        Self(Arc::new(image))
    }

    pub fn image(&self) -> &RgbaImage {
        &self.0
    }
}

impl PartialEq for StagedIcon {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Everything the draw call needs, plus the flags that gate it.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderState {
    /// Formatted high temperature from the most recent update.
    pub max_temp: String,
    /// Formatted low temperature from the most recent update.
    pub min_temp: String,
    /// Most recently staged icon; absent until the first successful
    /// decode and drawn as "no icon" rather than blocking the draw.
    pub icon: Option<StagedIcon>,
    /// Latches true on the first received update and never reverts.
    pub has_received_first_update: bool,
    pub mode: DisplayMode,
    pub visible: bool,
    /// Device property: fewer bits per color in ambient mode.
    pub low_bit_ambient: bool,
    /// Anti-aliasing flag for the time text. Toggled by mode changes on
    /// low-bit displays.
    pub time_antialias: bool,
}

impl Default for RenderState {
    fn default() -> Self {
        Self {
            max_temp: String::new(),
            min_temp: String::new(),
            icon: None,
            has_received_first_update: false,
            mode: DisplayMode::Interactive,
            visible: false,
            low_bit_ambient: false,
            time_antialias: true,
        }
    }
}

impl State for RenderState {}

/// Events that mutate the render state.
#[derive(Debug, Clone)]
pub enum RenderEvent {
    /// Scalar fields of a received update. Decoded synchronously on the
    /// notification path; the icon arrives separately via `IconStaged`.
    UpdateReceived { max_temp: String, min_temp: String },
    /// A staged icon finished decoding. Last completion wins.
    IconStaged(StagedIcon),
    ModeChanged(DisplayMode),
    VisibilityChanged(bool),
    PropertiesChanged { low_bit_ambient: bool },
}

impl Event for RenderEvent {}

/// Reducer for the render state.
///
/// Pure function; redraw requests and timer updates are handled by the
/// caller around the dispatch call.
pub struct RenderReducer;

impl Reducer for RenderReducer {
    type State = RenderState;
    type Event = RenderEvent;

    fn reduce(mut state: Self::State, event: Self::Event) -> Self::State {
        match event {
            RenderEvent::UpdateReceived { max_temp, min_temp } => {
                state.max_temp = max_temp;
                state.min_temp = min_temp;
                state.has_received_first_update = true;
                state
            }
            RenderEvent::IconStaged(icon) => {
                state.icon = Some(icon);
                state
            }
            RenderEvent::ModeChanged(mode) => {
                if state.mode != mode {
                    state.mode = mode;
                    if state.low_bit_ambient {
                        state.time_antialias = mode != DisplayMode::Ambient;
                    }
                }
                state
            }
            RenderEvent::VisibilityChanged(visible) => {
                state.visible = visible;
                state
            }
            RenderEvent::PropertiesChanged { low_bit_ambient } => {
                state.low_bit_ambient = low_bit_ambient;
                state
            }
        }
    }
}
