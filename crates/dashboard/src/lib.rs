//! Dashboard window for `vibe-monitor`.
//!
//! Owns the Iced application loop and wires together:
//! - the sensor feed (mock readings, serial port or stdin events)
//! - the rolling vibration chart
//! - the current readouts panel

use chrono::Local;
use futures::channel::mpsc::Sender;
use futures::SinkExt;
use iced::{
    widget::{column, container, text},
    Element, Length, Size, Subscription, Task,
};
use std::time::Duration;
use tracing::{error, info, warn};
use vibe_config::{default_path, load as load_config, ChartConfig, SensorConfig, VibeConfig};
use vibe_core::{
    event::Message as AppMessage, AppState, Chart, DataEvent, HistoricData, Result,
    SlidingSeriesBuffer, VibeError,
};
use vibe_theme::Theme;
use vibe_widgets::{ChartSurface, ChartWidget, ReadoutsWidget};

// ── Entry point ───────────────────────────────────────────────────────────────

/// Load the config, build the chart and open the dashboard window.
///
/// An invalid config or seed file is reported before any window opens.
pub fn run() -> Result<()> {
    let config = load_config(default_path())?;
    let window = build_window(&config.chart)?;

    info!(
        "Chart: {} samples × {} series ({:?} samples)",
        window.capacity(),
        window.series_count(),
        window.policy()
    );

    iced::application(
        move || Dashboard::new(config.clone(), window.clone()),
        Dashboard::update,
        Dashboard::view,
    )
    .title(Dashboard::title)
    .subscription(Dashboard::subscription)
    .style(Dashboard::style)
    .window_size(Size::new(960.0, 600.0))
    .run()
    .map_err(|e| VibeError::Ui(e.to_string()))
}

/// Sliding window for `chart`, seeded from `chart.seed_file` when set.
pub fn build_window(chart: &ChartConfig) -> Result<SlidingSeriesBuffer> {
    let seeds = match &chart.seed_file {
        Some(path) => {
            info!("Seeding chart from {}", path.display());
            HistoricData::load(path)?.seeds(&chart.series)
        }
        None => vec![None; chart.series.len()],
    };

    Ok(SlidingSeriesBuffer::with_seeds(chart.capacity, seeds)?.with_policy(chart.samples))
}

// ── Message ───────────────────────────────────────────────────────────────────

/// Top-level application messages.
#[derive(Debug, Clone)]
pub enum Message {
    /// Propagate a core event-bus message.
    App(AppMessage),
}

// ── State ─────────────────────────────────────────────────────────────────────

struct Dashboard {
    state:    AppState,
    config:   VibeConfig,
    theme:    Theme,
    chart:    Chart<ChartSurface>,
    // Widgets
    readouts: ReadoutsWidget,
    plot:     ChartWidget,
}

impl Dashboard {
    fn new(config: VibeConfig, window: SlidingSeriesBuffer) -> (Self, Task<Message>) {
        let theme = Theme::from_config(&config.theme);

        let dashboard = Self {
            state:    AppState::default(),
            chart:    Chart::new(window, ChartSurface::new()),
            config,
            theme,
            readouts: ReadoutsWidget::new(),
            plot:     ChartWidget::new(),
        };

        (dashboard, Task::none())
    }

    fn title(&self) -> String {
        self.config.chart.title.clone()
    }

    // ── Update ────────────────────────────────────────────────────────────────

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::App(msg) => self.handle_app(msg),
        }
    }

    fn handle_app(&mut self, msg: AppMessage) -> Task<Message> {
        match msg {
            AppMessage::DataUpdated(event) => self.apply(&event),
            AppMessage::FeedStopped => warn!("Sensor feed stopped; chart is frozen"),
        }
        Task::none()
    }

    /// One event, one append. A rejected sample leaves chart and readouts as they were.
    fn apply(&mut self, event: &DataEvent) {
        let sample = event.sample(&self.config.chart.series);

        match self.chart.append(&sample) {
            Ok(()) => self.state.record(event.readouts(), Local::now()),
            Err(e) => {
                self.state.rejected += 1;
                warn!("Rejected dataUpdated event {:?}: {e}", event.detail());
            }
        }
    }

    // ── View ──────────────────────────────────────────────────────────────────

    fn view(&self) -> Element<'_, Message> {
        let pad  = self.theme.padding;
        let size = self.theme.font_size;

        let heading  = text(&self.config.chart.title).size(size * 1.4);
        let readouts = self.readouts.view(&self.state, &self.theme).map(Message::App);
        let chart    = self
            .plot
            .view(
                &self.chart,
                &self.config.chart.series,
                (self.config.chart.y_min, self.config.chart.y_max),
                &self.theme,
            )
            .map(Message::App);

        let body = column![heading, readouts, chart]
            .spacing(f32::from(pad))
            .width(Length::Fill)
            .height(Length::Fill);

        container(body)
            .padding(pad)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    // ── Subscriptions ─────────────────────────────────────────────────────────

    fn subscription(&self) -> Subscription<Message> {
        Subscription::run_with(self.config.sensor.clone(), feed_stream)
    }

    // ── Style ─────────────────────────────────────────────────────────────────

    fn style(&self, _theme: &iced::Theme) -> iced::theme::Style {
        iced::theme::Style {
            background_color: self.theme.background.into(),
            text_color: self.theme.foreground.into(),
        }
    }
}

// ── Subscription streams ──────────────────────────────────────────────────────
//
// The sensor settings passed to `Subscription::run_with` key the stream, so
// the feed is started from the same config the window was built from.

/// Starts the configured sensor feed and forwards every event, in order.
fn feed_stream(sensor: &SensorConfig) -> impl iced::futures::Stream<Item = Message> {
    let sensor = sensor.clone();

    iced::stream::channel(16, move |mut sender: Sender<Message>| async move {
        match vibe_sensor::spawn_feed(&sensor).await {
            Ok(mut rx) => {
                while let Some(event) = rx.recv().await {
                    // `send` waits for room so no event is ever dropped.
                    if sender.send(Message::App(AppMessage::DataUpdated(event))).await.is_err() {
                        return;
                    }
                }
                let _ = sender.send(Message::App(AppMessage::FeedStopped)).await;
            }
            Err(e) => error!("Sensor feed unavailable: {e}"),
        }

        // Feed is gone; stall rather than end the subscription.
        loop {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use vibe_core::{SamplePolicy, SeriesSource};

    fn dashboard(series: Vec<SeriesSource>, capacity: usize, policy: SamplePolicy) -> Dashboard {
        let mut config = VibeConfig::default();
        config.chart.series = series;
        config.chart.capacity = capacity;
        config.chart.samples = policy;

        let window = build_window(&config.chart).unwrap();
        Dashboard::new(config, window).0
    }

    fn event(line: &str) -> DataEvent {
        DataEvent::parse(line).unwrap()
    }

    fn series(d: &Dashboard, index: usize) -> Vec<f64> {
        d.chart.window().series(index).unwrap().iter().copied().collect()
    }

    #[test]
    fn events_drive_both_series() {
        let mut d = dashboard(
            vec![SeriesSource::Vibration, SeriesSource::Relay],
            3,
            SamplePolicy::Strict,
        );

        d.apply(&event(r#"{"dataUpdated": {"has_vibration": true, "is_relay_activated": false}}"#));
        d.apply(&event(r#"{"dataUpdated": {"has_vibration": false, "is_relay_activated": true}}"#));

        assert_eq!(series(&d, 0), vec![0.0, 1.0, 0.0]);
        assert_eq!(series(&d, 1), vec![0.0, 0.0, 1.0]);
        assert_eq!(d.chart.surface().redraws(), 3);
        assert!(d.state.last_update.is_some());
        assert_eq!(d.state.readouts, None);
    }

    #[test]
    fn strict_dashboard_rejects_uncoercible_events() {
        let mut d = dashboard(vec![SeriesSource::Vibration], 2, SamplePolicy::Strict);

        d.apply(&event(r#"{"has_vibration": "maybe"}"#));
        d.apply(&event(r#"{"is_relay_activated": 1}"#));

        assert_eq!(series(&d, 0), vec![0.0, 0.0]);
        assert_eq!(d.chart.window().last_label(), 1);
        assert_eq!(d.state.rejected, 2);
        assert!(d.state.last_update.is_none());
    }

    #[test]
    fn permissive_dashboard_keeps_nan() {
        let mut d = dashboard(vec![SeriesSource::Vibration], 2, SamplePolicy::Permissive);

        d.apply(&event(r#"{"has_vibration": "maybe"}"#));

        assert!(d.chart.window().latest(0).unwrap().is_nan());
        assert_eq!(d.state.rejected, 0);
    }

    #[test]
    fn full_readouts_reach_the_panel() {
        let mut d = dashboard(vec![SeriesSource::Vibration], 4, SamplePolicy::Strict);
        let readouts = vibe_core::SensorReadouts {
            humidity_two: 48.5,
            has_vibration: true,
            ..Default::default()
        };

        d.apply(&DataEvent::from_readouts(&readouts));

        assert_eq!(d.state.readouts, Some(readouts));
        assert_eq!(d.chart.window().latest(0), Some(1.0));
    }

    #[tokio::test]
    async fn feed_stream_uses_the_given_sensor_settings() {
        use futures::StreamExt;

        let sensor = SensorConfig { poll_interval_ms: 5, ..Default::default() };
        let mut stream = Box::pin(feed_stream(&sensor));

        let first = stream.next().await.unwrap();
        assert!(matches!(
            first,
            Message::App(AppMessage::DataUpdated(ref event)) if event.readouts().is_some()
        ));
    }

    #[test]
    fn seed_file_with_wrong_length_fails_fast() {
        let path = std::env::temp_dir().join(format!("vibe-seed-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"vibration": [1, 0, 1]}"#).unwrap();

        let mut chart = ChartConfig::default();
        chart.capacity = 4;
        chart.seed_file = Some(path.clone());

        let err = build_window(&chart).unwrap_err();
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(err, VibeError::SeedLengthMismatch { actual: 3, .. }));
    }

    #[test]
    fn seed_file_is_rendered_as_is() {
        let path = std::env::temp_dir().join(format!("vibe-seed-ok-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"vibration": [1, 0], "relay": [0, 1]}"#).unwrap();

        let mut chart = ChartConfig::default();
        chart.capacity = 2;
        chart.seed_file = Some(path.clone());

        let window = build_window(&chart).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(window.series(0).unwrap().iter().copied().collect::<Vec<_>>(), vec![1.0, 0.0]);
        assert_eq!(window.series(1).unwrap().iter().copied().collect::<Vec<_>>(), vec![0.0, 1.0]);
    }
}
