use chrono::{DateTime, Local};
use iced::widget::{row, text, Column};
use iced::Element;
use vibe_core::{event::Message, state::AppState};
use vibe_theme::Theme;

/// Current humidity/temperature per sensor plus the vibration and relay flags.
#[derive(Debug, Default)]
pub struct ReadoutsWidget;

impl ReadoutsWidget {
    pub fn new() -> Self {
        Self
    }

    pub fn view<'a>(&'a self, state: &'a AppState, theme: &'a Theme) -> Element<'a, Message> {
        let size = theme.font_size;
        let dim  = iced::Color::from(theme.dim);

        let Some(readouts) = state.readouts else {
            return text(waiting_label(state.last_update))
                .size(size)
                .color(dim)
                .into();
        };

        let climate = readouts
            .climate()
            .into_iter()
            .enumerate()
            .map(|(i, (humidity, temperature))| -> Element<'a, Message> {
                text(climate_label(i + 1, humidity, temperature)).size(size).into()
            });

        let flags = row![
            text(flag_label("Vibration", readouts.has_vibration)).size(size),
            text(flag_label("Spraying", readouts.is_relay_activated)).size(size),
        ]
        .spacing(f32::from(theme.padding) * 2.0);

        let mut status = updated_label(state.last_update);
        if state.rejected > 0 {
            status.push_str(&format!("  ·  {} rejected", state.rejected));
        }

        Column::with_children(climate)
            .push(flags)
            .push(text(status).size(size * 0.8).color(dim))
            .spacing(4.0)
            .into()
    }
}

fn climate_label(sensor: usize, humidity: f64, temperature: f64) -> String {
    format!("Sensor {sensor}: {humidity:.1} %RH  {temperature:.1} °C")
}

fn flag_label(name: &str, on: bool) -> String {
    format!("{name}: {}", if on { "on" } else { "off" })
}

fn updated_label(at: Option<DateTime<Local>>) -> String {
    match at {
        Some(t) => format!("Updated {}", t.format("%H:%M:%S")),
        None    => "No data yet".to_string(),
    }
}

fn waiting_label(at: Option<DateTime<Local>>) -> String {
    match at {
        Some(_) => "Waiting for a full sensor readout…".to_string(),
        None    => "Waiting for sensor data…".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn climate_label_rounds_to_one_decimal() {
        assert_eq!(climate_label(2, 51.26, 24.94), "Sensor 2: 51.3 %RH  24.9 °C");
    }

    #[test]
    fn flag_label_on_off() {
        assert_eq!(flag_label("Vibration", true), "Vibration: on");
        assert_eq!(flag_label("Spraying", false), "Spraying: off");
    }

    #[test]
    fn updated_label_formats_time() {
        let t = Local.with_ymd_and_hms(2024, 5, 1, 9, 3, 7).unwrap();
        assert_eq!(updated_label(Some(t)), "Updated 09:03:07");
        assert_eq!(updated_label(None), "No data yet");
    }
}
