use serde::{Deserialize, Serialize};

/// Root configuration container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub demo: DemoConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            display: DisplayConfig::default(),
            demo: DemoConfig::default(),
        }
    }
}

/// Display geometry and text sizing for the watch face.
///
/// The layout math recomputes positions from these on every draw; nothing
/// derived from them is cached between draws.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Face width in pixels.
    #[serde(default = "default_face_width")]
    pub width: u32,
    /// Face height in pixels.
    #[serde(default = "default_face_height")]
    pub height: u32,
    /// Edge length the decoded weather icon is scaled to.
    #[serde(default = "default_icon_size")]
    pub icon_size: u32,
    /// Text size of the time field.
    #[serde(default = "default_time_text_size")]
    pub time_text_size: f32,
    /// Text size of the temperature fields.
    #[serde(default = "default_weather_text_size")]
    pub weather_text_size: f32,
    /// Gap between the icon and the max-temp text.
    #[serde(default = "default_weather_spacing")]
    pub weather_spacing: f32,
    /// Gap between the max-temp and min-temp texts.
    #[serde(default = "default_weather_text_spacing")]
    pub weather_text_spacing: f32,
    /// Whether the display supports fewer bits per color in ambient mode.
    /// When true, anti-aliasing on the time text is disabled in ambient.
    #[serde(default)]
    pub low_bit_ambient: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: default_face_width(),
            height: default_face_height(),
            icon_size: default_icon_size(),
            time_text_size: default_time_text_size(),
            weather_text_size: default_weather_text_size(),
            weather_spacing: default_weather_spacing(),
            weather_text_spacing: default_weather_text_spacing(),
            low_bit_ambient: false,
        }
    }
}

/// Seed data and run length for the `demo` subcommand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoConfig {
    /// Condition code seeded into the producer's weather store.
    #[serde(default = "default_weather_id")]
    pub weather_id: u16,
    /// High temperature seeded into the producer's weather store.
    #[serde(default = "default_max_temp")]
    pub max_temp: f64,
    /// Low temperature seeded into the producer's weather store.
    #[serde(default = "default_min_temp")]
    pub min_temp: f64,
    /// How long the demo keeps the face visible, in seconds.
    #[serde(default = "default_run_seconds")]
    pub run_seconds: u64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            weather_id: default_weather_id(),
            max_temp: default_max_temp(),
            min_temp: default_min_temp(),
            run_seconds: default_run_seconds(),
        }
    }
}

fn default_face_width() -> u32 {
    320
}

fn default_face_height() -> u32 {
    320
}

fn default_icon_size() -> u32 {
    48
}

fn default_time_text_size() -> f32 {
    42.0
}

fn default_weather_text_size() -> f32 {
    20.0
}

fn default_weather_spacing() -> f32 {
    8.0
}

fn default_weather_text_spacing() -> f32 {
    6.0
}

fn default_weather_id() -> u16 {
    800
}

fn default_max_temp() -> f64 {
    25.0
}

fn default_min_temp() -> f64 {
    14.0
}

fn default_run_seconds() -> u64 {
    3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config: Config = toml::from_str("").expect("empty config should parse");
        assert_eq!(config.display.icon_size, 48);
        assert_eq!(config.display.width, 320);
        assert!(!config.display.low_bit_ambient);
        assert_eq!(config.demo.weather_id, 800);
    }

    #[test]
    fn partial_section_fills_remaining_fields() {
        let config: Config = toml::from_str(
            r#"
            [display]
            icon_size = 64
            low_bit_ambient = true
            "#,
        )
        .expect("partial config should parse");
        assert_eq!(config.display.icon_size, 64);
        assert!(config.display.low_bit_ambient);
        assert_eq!(config.display.height, 320);
    }
}
