use crate::error::{Result, VibeError};
use crate::state::SensorReadouts;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Name of the event that carries a fresh sensor detail record.
pub const DATA_UPDATED: &str = "dataUpdated";

/// All messages (events) that can flow through the application event bus.
///
/// Sources:
/// - Sensor feed task → `DataUpdated`, `FeedStopped`
#[derive(Debug, Clone)]
pub enum Message {
    /// A `dataUpdated` notification; each one advances the chart by one sample.
    DataUpdated(DataEvent),
    /// The feed task ended (stdin closed, serial stream ran dry).
    FeedStopped,
}

/// Which detail field feeds a chart series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesSource {
    Vibration,
    Relay,
}

impl SeriesSource {
    /// Key of this series in the event detail record.
    pub fn key(self) -> &'static str {
        match self {
            Self::Vibration => "has_vibration",
            Self::Relay     => "is_relay_activated",
        }
    }

    /// Legend label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Vibration => "Vibration",
            Self::Relay     => "Spraying",
        }
    }
}

/// Detail record of a `dataUpdated` notification.
///
/// Values are kept as raw JSON; numeric interpretation happens per field
/// through [`coerce`], so a record may carry strings, booleans or nulls.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataEvent {
    detail: Map<String, Value>,
}

impl DataEvent {
    pub fn new(detail: Map<String, Value>) -> Self {
        Self { detail }
    }

    /// Build the detail record the sensor side publishes for one readout.
    pub fn from_readouts(readouts: &SensorReadouts) -> Self {
        match serde_json::to_value(readouts) {
            Ok(Value::Object(detail)) => Self { detail },
            _ => Self::default(),
        }
    }

    /// Parse one event line.
    ///
    /// Accepts either the trigger form `{"dataUpdated": {...}}` or a bare
    /// detail object.
    pub fn parse(line: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(line)
            .map_err(|e| VibeError::Event(format!("invalid JSON: {e}")))?;

        let Value::Object(mut map) = value else {
            return Err(VibeError::Event("event must be a JSON object".into()));
        };

        match map.remove(DATA_UPDATED) {
            Some(Value::Object(detail)) => Ok(Self { detail }),
            Some(other) => Err(VibeError::Event(format!(
                "`{DATA_UPDATED}` must carry an object, got {other}"
            ))),
            None => Ok(Self { detail: map }),
        }
    }

    pub fn detail(&self) -> &Map<String, Value> {
        &self.detail
    }

    /// Numeric value of `key`; a missing key coerces to NaN.
    pub fn number(&self, key: &str) -> f64 {
        self.detail.get(key).map_or(f64::NAN, coerce)
    }

    /// One coerced value per source, in the given order.
    pub fn sample(&self, sources: &[SeriesSource]) -> Vec<f64> {
        sources.iter().map(|s| self.number(s.key())).collect()
    }

    /// The full readout, when the record carries every sensor field.
    pub fn readouts(&self) -> Option<SensorReadouts> {
        serde_json::from_value(Value::Object(self.detail.clone())).ok()
    }
}

/// Standard numeric coercion of a detail value.
///
/// Booleans become 0/1, `null` and blank strings become 0. Strings hold
/// decimal text, `Infinity`, or unsigned `0x`/`0o`/`0b` integers. A one-item
/// array coerces as its item and an empty one as 0. Everything else is NaN.
pub fn coerce(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::Bool(b)   => f64::from(u8::from(*b)),
        Value::Null      => 0.0,
        Value::String(s) => parse_number(s),
        Value::Array(items) => match items.as_slice() {
            [] | [Value::Null] => 0.0,
            [item @ (Value::Number(_) | Value::String(_) | Value::Array(_))] => coerce(item),
            _ => f64::NAN,
        },
        Value::Object(_) => f64::NAN,
    }
}

fn parse_number(text: &str) -> f64 {
    let text = text.trim();

    match text {
        "" => return 0.0,
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    let radix = match text.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        return parse_radix(&text[2..], radix);
    }

    // `str::parse` also takes `inf`, `infinity` and `nan` in any case.
    if text.bytes().any(|b| b.is_ascii_alphabetic() && !matches!(b, b'e' | b'E')) {
        return f64::NAN;
    }
    text.parse().unwrap_or(f64::NAN)
}

fn parse_radix(digits: &str, radix: u32) -> f64 {
    if digits.is_empty() {
        return f64::NAN;
    }
    digits
        .chars()
        .try_fold(0.0, |acc: f64, c| {
            c.to_digit(radix).map(|d| acc * f64::from(radix) + f64::from(d))
        })
        .unwrap_or(f64::NAN)
}
