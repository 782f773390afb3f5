use thiserror::Error;

/// Top-level error type used across the entire application.
#[derive(Debug, Error)]
pub enum VibeError {
    #[error("config error: {0}")]
    Config(String),

    #[error("sensor error: {0}")]
    Sensor(String),

    #[error("event error: {0}")]
    Event(String),

    #[error("UI error: {0}")]
    Ui(String),

    /// A window needs at least one slot and at least one series.
    #[error("invalid window shape: capacity {capacity}, {series} series")]
    InvalidShape { capacity: usize, series: usize },

    /// A seed was supplied whose length differs from the window capacity.
    #[error("seed for series {series} has {actual} values, expected {expected}")]
    SeedLengthMismatch {
        series:   usize,
        expected: usize,
        actual:   usize,
    },

    /// `append` was called with the wrong number of values.
    #[error("expected {expected} sample values, got {actual}")]
    SampleArity { expected: usize, actual: usize },

    /// A sample value did not coerce to a finite number.
    #[error("sample for series {series} is not a finite number: {value}")]
    InvalidSample { series: usize, value: f64 },

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

pub type Result<T, E = VibeError> = std::result::Result<T, E>;
