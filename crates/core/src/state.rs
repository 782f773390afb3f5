use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Central dashboard state read by the readouts panel.
///
/// The rolling chart lives next to this in the dashboard; this struct only
/// carries what the text widgets display.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Most recent full readout, `None` until the first one arrives or when
    /// the feed only delivers partial event records.
    pub readouts: Option<SensorReadouts>,
    /// Local time of the last accepted event.
    pub last_update: Option<DateTime<Local>>,
    /// Number of events whose samples were rejected.
    pub rejected: u64,
}

impl AppState {
    /// Record an accepted event, replacing the readouts when one is present.
    pub fn record(&mut self, readouts: Option<SensorReadouts>, at: DateTime<Local>) {
        if readouts.is_some() {
            self.readouts = readouts;
        }
        self.last_update = Some(at);
    }
}

/// One reading of every sensor on the board.
///
/// Field names double as the keys of the `dataUpdated` event detail record.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SensorReadouts {
    pub humidity_one:    f64,
    pub temperature_one: f64,

    pub humidity_two:    f64,
    pub temperature_two: f64,

    pub humidity_three:    f64,
    pub temperature_three: f64,

    pub has_vibration:      bool,
    pub is_relay_activated: bool,
}

impl SensorReadouts {
    /// Humidity/temperature pairs in sensor order.
    pub fn climate(&self) -> [(f64, f64); 3] {
        [
            (self.humidity_one, self.temperature_one),
            (self.humidity_two, self.temperature_two),
            (self.humidity_three, self.temperature_three),
        ]
    }
}
