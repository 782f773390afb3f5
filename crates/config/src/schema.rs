use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use vibe_core::{SamplePolicy, SeriesSource};

/// Root configuration structure parsed from `vibe.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VibeConfig {
    /// Where readings come from.
    pub sensor: SensorConfig,
    /// Rolling chart shape and sample handling.
    pub chart: ChartConfig,
    /// Theme / visual settings.
    pub theme: ThemeConfig,
}

/// Reading source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SensorSource {
    /// Random readings, no hardware needed.
    #[default]
    Mock,
    /// Line protocol on a serial port.
    Serial,
    /// `dataUpdated` JSON events, one per line on stdin.
    Events,
}

/// Sensor feed settings.
///
/// Hashable so the dashboard can key its feed subscription on it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    pub source: SensorSource,
    /// Serial device path.
    pub serial_port: String,
    /// Serial line speed.
    pub baudrate: u32,
    /// How often the provider is polled (mock / serial sources).
    pub poll_interval_ms: u64,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            source:           SensorSource::Mock,
            serial_port:      "/dev/ttyACM0".to_string(),
            baudrate:         9600,
            poll_interval_ms: 1_000,
        }
    }
}

/// Rolling chart settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Samples kept in the window.
    pub capacity: usize,
    /// Tracked series, in legend order.
    pub series: Vec<SeriesSource>,
    /// How non-finite samples are handled.
    pub samples: SamplePolicy,
    /// Optional JSON file with previously recorded samples.
    pub seed_file: Option<PathBuf>,
    /// Window and chart heading.
    pub title: String,
    pub y_min: f64,
    pub y_max: f64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            capacity:  120,
            series:    vec![SeriesSource::Vibration, SeriesSource::Relay],
            samples:   SamplePolicy::Strict,
            seed_file: None,
            title:     "Vibration monitor".to_string(),
            y_min:     0.0,
            y_max:     1.0,
        }
    }
}

/// Theme / styling configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Window background color (hex, e.g. `"#1e1e2e"`).
    pub background: String,
    /// Text and axis color.
    pub foreground: String,
    /// Grid line color.
    pub grid: String,
    /// One line color per series; reused cyclically.
    pub series: Vec<String>,
    /// Font size in points.
    pub font_size: f32,
    /// Line width of series strokes (pixels).
    pub line_width: f32,
    /// Outer padding (pixels).
    pub padding: u16,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            background: "#1e1e2e".to_string(), // Catppuccin Mocha — base
            foreground: "#cdd6f4".to_string(), // Catppuccin Mocha — text
            grid:       "#45475a".to_string(), // Catppuccin Mocha — surface1
            series:     vec![
                "#f38ba8".to_string(), // red
                "#89b4fa".to_string(), // blue
            ],
            font_size:  14.0,
            line_width: 2.0,
            padding:    12,
        }
    }
}
