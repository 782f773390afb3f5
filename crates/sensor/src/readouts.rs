//! Serial line protocol.
//!
//! The board prints one reading per line as eight whitespace-separated
//! fields: `h1 t1 h2 t2 h3 t3 vibration relay`. Flags are `1` for set.

use thiserror::Error;
use vibe_core::SensorReadouts;

/// Fields per line.
pub const FIELD_COUNT: usize = 8;

/// Why a serial line did not yield a reading.
#[derive(Debug, Error, PartialEq)]
pub enum LineError {
    /// The board occasionally emits blank lines.
    #[error("empty line")]
    Empty,

    #[error("expected 8 fields, got {0}")]
    FieldCount(usize),

    #[error("field {index} is not a number: {raw:?}")]
    Number { index: usize, raw: String },
}

/// Parse one line of the serial protocol.
pub fn parse_line(line: &str) -> Result<SensorReadouts, LineError> {
    let fields: Vec<&str> = line.split_whitespace().collect();

    if fields.is_empty() {
        return Err(LineError::Empty);
    }
    if fields.len() != FIELD_COUNT {
        return Err(LineError::FieldCount(fields.len()));
    }

    let number = |index: usize| -> Result<f64, LineError> {
        fields[index].parse().map_err(|_| LineError::Number {
            index,
            raw: fields[index].to_string(),
        })
    };

    Ok(SensorReadouts {
        humidity_one:       number(0)?,
        temperature_one:    number(1)?,
        humidity_two:       number(2)?,
        temperature_two:    number(3)?,
        humidity_three:     number(4)?,
        temperature_three:  number(5)?,
        has_vibration:      fields[6] == "1",
        is_relay_activated: fields[7] == "1",
    })
}
