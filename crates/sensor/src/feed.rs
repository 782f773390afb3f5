use crate::provider::{MockProvider, ReadoutProvider, SerialProvider};
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::time;
use tracing::{info, warn};
use vibe_config::{SensorConfig, SensorSource};
use vibe_core::{DataEvent, Result};

/// Start the feed described by `config` and return its event stream.
///
/// Events arrive in production order, one per poll or input line. Every
/// task stops when the receiver is dropped.
pub async fn spawn_feed(config: &SensorConfig) -> Result<mpsc::Receiver<DataEvent>> {
    let interval = Duration::from_millis(config.poll_interval_ms);

    match config.source {
        SensorSource::Mock => {
            info!("Using mock sensor readings");
            Ok(spawn_polling(MockProvider::new(), interval))
        }
        SensorSource::Serial => {
            let provider = SerialProvider::open(&config.serial_port, config.baudrate).await?;
            Ok(spawn_polling(provider, interval))
        }
        SensorSource::Events => {
            info!("Reading dataUpdated events from stdin");
            Ok(spawn_event_reader(BufReader::new(tokio::io::stdin())))
        }
    }
}

/// Poll `provider` every `interval` and forward each readout as a `DataEvent`.
///
/// The first poll happens immediately. The stream closes once the provider
/// runs dry.
pub fn spawn_polling<P>(mut provider: P, interval: Duration) -> mpsc::Receiver<DataEvent>
where
    P: ReadoutProvider + Send + 'static,
{
    let (tx, rx) = mpsc::channel(4);

    tokio::spawn(async move {
        let mut ticker = time::interval(interval);

        loop {
            ticker.tick().await;
            let Some(readouts) = provider.current_readouts() else {
                info!("Sensor provider has no more readings");
                break;
            };

            if tx.send(DataEvent::from_readouts(&readouts)).await.is_err() {
                break; // all receivers dropped
            }
        }
    });

    rx
}

/// Forward one `DataEvent` per line of `reader`; malformed lines are skipped.
///
/// The stream closes when the input ends.
pub fn spawn_event_reader<R>(reader: R) -> mpsc::Receiver<DataEvent>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::channel(16);

    tokio::spawn(async move {
        let mut lines = reader.lines();

        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    warn!("Event input failed: {e}");
                    break;
                }
            };

            if line.trim().is_empty() {
                continue;
            }

            match DataEvent::parse(&line) {
                Ok(event) => {
                    if tx.send(event).await.is_err() {
                        return; // all receivers dropped
                    }
                }
                Err(e) => warn!("Skipping event line: {e}"),
            }
        }

        info!("Event input closed");
    });

    rx
}
