//! Per-draw layout math.
//!
//! Positions are recomputed from the current text metrics on every draw;
//! nothing here is cached. In ambient mode the icon and its spacing drop
//! out of the temperature zone entirely.

use crate::config::DisplayConfig;

/// Drawable area of the face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

/// Sizing inputs to the layout, taken from configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceMetrics {
    pub time_text_size: f32,
    pub weather_text_size: f32,
    pub icon_size: f32,
    pub weather_spacing: f32,
    pub weather_text_spacing: f32,
}

impl FaceMetrics {
    pub fn from_config(display: &DisplayConfig) -> Self {
        Self {
            time_text_size: display.time_text_size,
            weather_text_size: display.weather_text_size,
            icon_size: display.icon_size as f32,
            weather_spacing: display.weather_spacing,
            weather_text_spacing: display.weather_text_spacing,
        }
    }
}

/// Computed positions for the temperature zone of one draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TempZone {
    /// Total width of the zone: both temperature texts, their spacing,
    /// and (interactive only) the icon and its gap.
    pub width: f32,
    /// Top-left corner of the icon; `None` in ambient mode.
    pub icon_pos: Option<(f32, f32)>,
    pub max_temp_pos: (f32, f32),
    pub min_temp_pos: (f32, f32),
}

/// Anchor of the centered time text.
pub fn time_position(bounds: Bounds, metrics: &FaceMetrics) -> (f32, f32) {
    (
        bounds.width / 2.0,
        bounds.height / 4.0 + metrics.time_text_size / 2.0,
    )
}

/// Lay out the temperature zone for one draw.
///
/// `max_temp_width`/`min_temp_width` are the measured widths of the two
/// temperature texts under the current paint.
pub fn temp_zone(
    bounds: Bounds,
    metrics: &FaceMetrics,
    max_temp_width: f32,
    min_temp_width: f32,
    ambient: bool,
) -> TempZone {
    let icon_contribution = if ambient {
        0.0
    } else {
        metrics.icon_size + metrics.weather_spacing
    };
    let width =
        max_temp_width + min_temp_width + icon_contribution + metrics.weather_text_spacing;

    let (icon_pos, max_temp_pos) = if ambient {
        let max_x = 0.5 * bounds.width - 0.5 * width;
        let max_y = 0.6 * bounds.height;
        (None, (max_x, max_y))
    } else {
        let icon_x = 0.5 * bounds.width - 0.5 * width;
        let icon_y = 0.6 * bounds.height - 0.5 * metrics.icon_size;
        let max_x = icon_x + metrics.icon_size + metrics.weather_spacing;
        let max_y = icon_y + 0.5 * metrics.icon_size + 0.3 * metrics.weather_text_size;
        (Some((icon_x, icon_y)), (max_x, max_y))
    };

    let min_temp_pos = (
        max_temp_pos.0 + max_temp_width + metrics.weather_text_spacing,
        max_temp_pos.1,
    );

    TempZone {
        width,
        icon_pos,
        max_temp_pos,
        min_temp_pos,
    }
}
