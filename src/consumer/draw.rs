//! Drawing the face.
//!
//! Actual drawing primitives (surfaces, paints, styling constants) are
//! external collaborators behind the [`Canvas`] trait. [`draw_face`]
//! owns what gets drawn: the time field always, the temperature block
//! only after the first update, the icon only in interactive mode.

use chrono::Timelike;

use crate::consumer::layout::{temp_zone, time_position, Bounds, FaceMetrics};
use crate::consumer::state::{DisplayMode, RenderState};

/// Seam to the platform's drawing primitives.
///
/// Implementations own colors, fonts, and pixel access; callers pass
/// semantic hints (`antialias`, `faded`) instead of styling constants.
pub trait Canvas {
    fn bounds(&self) -> Bounds;

    /// Fill the background. Ambient mode paints black.
    fn clear(&mut self, ambient: bool);

    /// Measured width of `text` at `size` under the current paint.
    fn text_width(&self, text: &str, size: f32) -> f32;

    /// Draw left-anchored text at a baseline position.
    fn draw_text(&mut self, text: &str, x: f32, y: f32, size: f32, antialias: bool, faded: bool);

    /// Blit a decoded image with its top-left corner at (x, y).
    fn draw_image(&mut self, image: &image::RgbaImage, x: f32, y: f32);
}

/// Format the time field: hours without a leading zero, minutes padded.
pub fn format_time(now: impl Timelike) -> String {
    format!("{}:{:02}", now.hour(), now.minute())
}

/// Draw one frame from the current render state.
///
/// Layout is recomputed from current text metrics on every call.
pub fn draw_face(
    canvas: &mut dyn Canvas,
    state: &RenderState,
    metrics: &FaceMetrics,
    time_text: &str,
) {
    let bounds = canvas.bounds();
    let ambient = state.mode == DisplayMode::Ambient;

    canvas.clear(ambient);

    let (time_x, time_y) = time_position(bounds, metrics);
    let time_width = canvas.text_width(time_text, metrics.time_text_size);
    canvas.draw_text(
        time_text,
        time_x - time_width / 2.0,
        time_y,
        metrics.time_text_size,
        state.time_antialias,
        false,
    );

    if !state.has_received_first_update {
        return;
    }

    let max_temp_width = canvas.text_width(&state.max_temp, metrics.weather_text_size);
    let min_temp_width = canvas.text_width(&state.min_temp, metrics.weather_text_size);
    let zone = temp_zone(bounds, metrics, max_temp_width, min_temp_width, ambient);

    if let Some((icon_x, icon_y)) = zone.icon_pos {
        if let Some(icon) = &state.icon {
            canvas.draw_image(icon.image(), icon_x, icon_y);
        }
    }

    canvas.draw_text(
        &state.max_temp,
        zone.max_temp_pos.0,
        zone.max_temp_pos.1,
        metrics.weather_text_size,
        true,
        false,
    );
    canvas.draw_text(
        &state.min_temp,
        zone.min_temp_pos.0,
        zone.min_temp_pos.1,
        metrics.weather_text_size,
        true,
        true,
    );
}

/// One recorded drawing operation.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Clear {
        ambient: bool,
    },
    Text {
        text: String,
        x: f32,
        y: f32,
        size: f32,
        antialias: bool,
        faded: bool,
    },
    Image {
        x: f32,
        y: f32,
        width: u32,
        height: u32,
    },
}

/// Headless canvas that records operations instead of rasterizing.
///
/// Used by the demo binary and by tests to observe what a frame would
/// have drawn. Text widths use a fixed per-character advance.
pub struct RecordingCanvas {
    bounds: Bounds,
    ops: Vec<DrawOp>,
    frames: u64,
}

impl RecordingCanvas {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            bounds: Bounds { width, height },
            ops: Vec::new(),
            frames: 0,
        }
    }

    /// Operations of the most recent frame.
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// How many frames have been drawn in total.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Canvas for RecordingCanvas {
    fn bounds(&self) -> Bounds {
        self.bounds
    }

    fn clear(&mut self, ambient: bool) {
        // A frame starts at its clear; drop the previous frame's ops so
        // `ops()` always describes the latest frame.
        self.ops.clear();
        self.frames += 1;
        self.ops.push(DrawOp::Clear { ambient });
    }

    fn text_width(&self, text: &str, size: f32) -> f32 {
        text.chars().count() as f32 * size * 0.55
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, size: f32, antialias: bool, faded: bool) {
        self.ops.push(DrawOp::Text {
            text: text.to_string(),
            x,
            y,
            size,
            antialias,
            faded,
        });
    }

    fn draw_image(&mut self, image: &image::RgbaImage, x: f32, y: f32) {
        self.ops.push(DrawOp::Image {
            x,
            y,
            width: image.width(),
            height: image.height(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consumer::state::{RenderEvent, RenderReducer, StagedIcon};
    use crate::fsm::Reducer;
    use chrono::NaiveTime;

    fn metrics() -> FaceMetrics {
        FaceMetrics {
            time_text_size: 42.0,
            weather_text_size: 20.0,
            icon_size: 48.0,
            weather_spacing: 8.0,
            weather_text_spacing: 6.0,
        }
    }

    fn updated_state() -> RenderState {
        RenderReducer::reduce(
            RenderState::default(),
            RenderEvent::UpdateReceived {
                max_temp: "25°".to_string(),
                min_temp: "14°".to_string(),
            },
        )
    }

    fn texts(ops: &[DrawOp]) -> Vec<&str> {
        ops.iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    // -- time formatting ---------------------------------------------------

    #[test]
    fn time_has_no_leading_hour_zero() {
        let t = NaiveTime::from_hms_opt(9, 5, 30).expect("valid time");
        assert_eq!(format_time(t), "9:05");
        let t = NaiveTime::from_hms_opt(23, 59, 0).expect("valid time");
        assert_eq!(format_time(t), "23:59");
        let t = NaiveTime::from_hms_opt(0, 0, 0).expect("valid time");
        assert_eq!(format_time(t), "0:00");
    }

    // -- what gets drawn ---------------------------------------------------

    #[test]
    fn before_first_update_only_time_is_drawn() {
        let mut canvas = RecordingCanvas::new(320.0, 320.0);
        draw_face(&mut canvas, &RenderState::default(), &metrics(), "9:41");
        assert_eq!(texts(canvas.ops()), vec!["9:41"]);
        assert!(!canvas
            .ops()
            .iter()
            .any(|op| matches!(op, DrawOp::Image { .. })));
    }

    #[test]
    fn after_first_update_temperatures_are_drawn() {
        let mut canvas = RecordingCanvas::new(320.0, 320.0);
        draw_face(&mut canvas, &updated_state(), &metrics(), "9:41");
        assert_eq!(texts(canvas.ops()), vec!["9:41", "25°", "14°"]);
    }

    #[test]
    fn icon_is_drawn_only_in_interactive_mode() {
        let mut state = updated_state();
        state = RenderReducer::reduce(
            state,
            RenderEvent::IconStaged(StagedIcon::new(image::RgbaImage::new(48, 48))),
        );

        let mut canvas = RecordingCanvas::new(320.0, 320.0);
        draw_face(&mut canvas, &state, &metrics(), "9:41");
        assert!(canvas
            .ops()
            .iter()
            .any(|op| matches!(op, DrawOp::Image { .. })));

        let state = RenderReducer::reduce(state, RenderEvent::ModeChanged(DisplayMode::Ambient));
        draw_face(&mut canvas, &state, &metrics(), "9:41");
        assert!(!canvas
            .ops()
            .iter()
            .any(|op| matches!(op, DrawOp::Image { .. })));
        // Ambient background is black.
        assert_eq!(canvas.ops()[0], DrawOp::Clear { ambient: true });
    }

    #[test]
    fn absent_icon_does_not_block_the_temperature_block() {
        let mut canvas = RecordingCanvas::new(320.0, 320.0);
        draw_face(&mut canvas, &updated_state(), &metrics(), "9:41");
        // No image op, but both temperatures drawn.
        assert!(!canvas
            .ops()
            .iter()
            .any(|op| matches!(op, DrawOp::Image { .. })));
        assert_eq!(texts(canvas.ops()).len(), 3);
    }

    #[test]
    fn min_temp_is_drawn_faded() {
        let mut canvas = RecordingCanvas::new(320.0, 320.0);
        draw_face(&mut canvas, &updated_state(), &metrics(), "9:41");
        let faded: Vec<&str> = canvas
            .ops()
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, faded: true, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(faded, vec!["14°"]);
    }

    #[test]
    fn low_bit_ambient_draws_time_without_antialias() {
        let state = RenderReducer::reduce(
            updated_state(),
            RenderEvent::PropertiesChanged {
                low_bit_ambient: true,
            },
        );
        let state = RenderReducer::reduce(state, RenderEvent::ModeChanged(DisplayMode::Ambient));

        let mut canvas = RecordingCanvas::new(320.0, 320.0);
        draw_face(&mut canvas, &state, &metrics(), "9:41");
        match &canvas.ops()[1] {
            DrawOp::Text { text, antialias, .. } => {
                assert_eq!(text, "9:41");
                assert!(!antialias);
            }
            other => panic!("expected time text, got {:?}", other),
        }
    }
}
