pub mod schema;

pub use schema::{ChartConfig, SensorConfig, SensorSource, ThemeConfig, VibeConfig};

use std::path::{Path, PathBuf};
use vibe_core::{Result, VibeError};

/// Env var overriding `sensor.serial_port`.
pub const ENV_SERIAL_PORT: &str = "VIBE_SERIAL_PORT";
/// Env var overriding `sensor.baudrate`.
pub const ENV_SERIAL_BAUDRATE: &str = "VIBE_SERIAL_BAUDRATE";

/// Load configuration from a TOML file, then apply environment overrides.
/// Returns defaults if the file doesn't exist.
pub fn load(path: impl AsRef<Path>) -> Result<VibeConfig> {
    let mut config = load_file(path)?;
    apply_overrides(&mut config, |key| std::env::var(key).ok());
    validate(&config)?;
    Ok(config)
}

fn load_file(path: impl AsRef<Path>) -> Result<VibeConfig> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::warn!(
            "Config file not found at '{}'; using defaults.",
            path.display()
        );
        return Ok(VibeConfig::default());
    }

    let raw = std::fs::read_to_string(path)
        .map_err(|e| VibeError::Config(format!("cannot read '{}': {e}", path.display())))?;

    parse(&raw)
}

/// Parse a TOML document into a config.
pub fn parse(raw: &str) -> Result<VibeConfig> {
    toml::from_str(raw).map_err(|e| VibeError::Config(format!("TOML parse error: {e}")))
}

/// Apply `VIBE_SERIAL_*` overrides looked up through `lookup`.
///
/// A baud rate that is not a positive integer is ignored.
pub fn apply_overrides(config: &mut VibeConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(port) = lookup(ENV_SERIAL_PORT).filter(|p| !p.trim().is_empty()) {
        config.sensor.serial_port = port.trim().to_string();
    }

    if let Some(raw) = lookup(ENV_SERIAL_BAUDRATE) {
        match raw.trim().parse::<u32>() {
            Ok(baud) if baud > 0 => config.sensor.baudrate = baud,
            _ => tracing::warn!("Ignoring {ENV_SERIAL_BAUDRATE}={raw:?}"),
        }
    }
}

/// Reject configurations the chart cannot be built from.
pub fn validate(config: &VibeConfig) -> Result<()> {
    let chart = &config.chart;
    if chart.capacity == 0 {
        return Err(VibeError::Config("chart.capacity must be at least 1".into()));
    }
    if chart.series.is_empty() {
        return Err(VibeError::Config("chart.series must name at least one series".into()));
    }
    let ordered = chart.y_min < chart.y_max;
    if !ordered {
        return Err(VibeError::Config(format!(
            "chart.y_min ({}) must be below chart.y_max ({})",
            chart.y_min, chart.y_max
        )));
    }
    if config.sensor.poll_interval_ms == 0 {
        return Err(VibeError::Config("sensor.poll_interval_ms must be positive".into()));
    }
    Ok(())
}

/// Return the default config path, honouring `$XDG_CONFIG_HOME`.
pub fn default_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("vibe-monitor").join("vibe.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use vibe_core::{SamplePolicy, SeriesSource};

    #[test]
    fn empty_document_gives_defaults() {
        let config = parse("").unwrap();
        assert_eq!(config, VibeConfig::default());
        assert_eq!(config.chart.capacity, 120);
        assert_eq!(config.sensor.baudrate, 9600);
    }

    #[test]
    fn single_series_permissive_chart() {
        let config = parse(
            r#"
            [sensor]
            source = "events"

            [chart]
            capacity = 60
            series = ["vibration"]
            samples = "permissive"
            "#,
        )
        .unwrap();

        assert_eq!(config.sensor.source, SensorSource::Events);
        assert_eq!(config.chart.capacity, 60);
        assert_eq!(config.chart.series, vec![SeriesSource::Vibration]);
        assert_eq!(config.chart.samples, SamplePolicy::Permissive);
        assert_eq!(config.chart.y_max, 1.0);
    }

    #[test]
    fn unknown_series_is_a_parse_error() {
        assert!(parse("[chart]\nseries = [\"humidity\"]").is_err());
    }

    #[test]
    fn env_overrides_port_and_baudrate() {
        let mut config = VibeConfig::default();
        apply_overrides(&mut config, |key| match key {
            ENV_SERIAL_PORT => Some("/dev/ttyUSB1".into()),
            ENV_SERIAL_BAUDRATE => Some("115200".into()),
            _ => None,
        });
        assert_eq!(config.sensor.serial_port, "/dev/ttyUSB1");
        assert_eq!(config.sensor.baudrate, 115_200);
    }

    #[test]
    fn bad_baudrate_override_is_ignored() {
        let mut config = VibeConfig::default();
        apply_overrides(&mut config, |key| {
            (key == ENV_SERIAL_BAUDRATE).then(|| "0".to_string())
        });
        assert_eq!(config.sensor.baudrate, 9600);
    }

    #[test]
    fn validate_rejects_degenerate_charts() {
        let mut config = VibeConfig::default();
        config.chart.capacity = 0;
        assert!(validate(&config).is_err());

        let mut config = VibeConfig::default();
        config.chart.series.clear();
        assert!(validate(&config).is_err());

        let mut config = VibeConfig::default();
        config.chart.y_min = 1.0;
        assert!(validate(&config).is_err());
    }
}
