use crate::readouts::{parse_line, LineError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use vibe_core::{Result, SensorReadouts, VibeError};

/// Something that can be asked for the current sensor readings.
pub trait ReadoutProvider {
    /// `None` once the provider can produce no further readings.
    fn current_readouts(&mut self) -> Option<SensorReadouts>;
}

// ── Mock ──────────────────────────────────────────────────────────────────────

/// Random readings around fixed baselines, for running without hardware.
#[derive(Debug)]
pub struct MockProvider {
    rng: StdRng,
}

impl MockProvider {
    pub fn new() -> Self {
        Self { rng: StdRng::from_os_rng() }
    }

    /// Deterministic provider for tests and demos.
    pub fn seeded(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }

    /// Uniform ±10, rounded to two decimals.
    fn variation(&mut self) -> f64 {
        let v: f64 = self.rng.random_range(-10.0..=10.0);
        (v * 100.0).round() / 100.0
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadoutProvider for MockProvider {
    fn current_readouts(&mut self) -> Option<SensorReadouts> {
        Some(SensorReadouts {
            humidity_one:       50.0 + self.variation(),
            temperature_one:    25.0 + self.variation(),
            humidity_two:       52.0 + self.variation(),
            temperature_two:    25.0 + self.variation(),
            humidity_three:     53.0 + self.variation(),
            temperature_three:  27.0 + self.variation(),
            has_vibration:      self.rng.random_bool(0.5),
            is_relay_activated: self.rng.random_bool(0.5),
        })
    }
}

// ── Serial ────────────────────────────────────────────────────────────────────

/// Last line seen on the port plus the vibration latch.
///
/// The board reports vibration only on the line where it happens, while the
/// port is read much faster than it is polled. A vibration seen on any line
/// stays set until the next poll takes it; a poll with no new line since the
/// previous one reports no vibration.
#[derive(Debug, Default)]
struct Latch {
    readouts:          SensorReadouts,
    vibration_pending: bool,
    /// A line arrived since the last `take`.
    fresh:             bool,
}

impl Latch {
    fn observe(&mut self, mut readouts: SensorReadouts) {
        self.vibration_pending |= readouts.has_vibration;
        readouts.has_vibration = self.vibration_pending;
        self.readouts = readouts;
        self.fresh = true;
    }

    fn take(&mut self) -> SensorReadouts {
        let taken = self.readouts;
        self.vibration_pending = false;
        self.readouts.has_vibration = false;
        self.fresh = false;
        taken
    }
}

fn lock(latch: &Mutex<Latch>) -> MutexGuard<'_, Latch> {
    // The latch holds plain data; a panic mid-update cannot leave it invalid.
    match latch.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Reads the line protocol from a serial device in a background task.
///
/// The task stops when the provider is dropped.
#[derive(Debug)]
pub struct SerialProvider {
    latch:  Arc<Mutex<Latch>>,
    reader: JoinHandle<()>,
}

impl SerialProvider {
    /// Configure `port` for `baudrate` and start reading from it.
    pub async fn open(port: &str, baudrate: u32) -> Result<Self> {
        configure_port(port, baudrate).await;

        let file = tokio::fs::File::open(port)
            .await
            .map_err(|e| VibeError::Sensor(format!("cannot open '{port}': {e}")))?;

        info!("Reading sensors from {port} at {baudrate} baud");
        Ok(Self::from_reader(BufReader::new(file)))
    }

    /// Start reading the line protocol from any buffered byte stream.
    pub fn from_reader<R>(reader: R) -> Self
    where
        R: AsyncBufRead + Unpin + Send + 'static,
    {
        let latch = Arc::new(Mutex::new(Latch::default()));
        let reader = tokio::spawn(read_lines(reader, Arc::clone(&latch)));
        Self { latch, reader }
    }

    /// `true` once the underlying stream has ended.
    pub fn is_finished(&self) -> bool {
        self.reader.is_finished()
    }
}

impl ReadoutProvider for SerialProvider {
    /// After the stream ends, lines read before the end are still handed out
    /// once; then the provider is exhausted.
    fn current_readouts(&mut self) -> Option<SensorReadouts> {
        let finished = self.is_finished();
        let mut latch = lock(&self.latch);

        if finished && !latch.fresh {
            return None;
        }
        Some(latch.take())
    }
}

impl Drop for SerialProvider {
    fn drop(&mut self) {
        self.reader.abort();
    }
}

/// Set line speed and raw mode with `stty`. Failure is logged, not fatal:
/// the device may already be configured or not be a tty at all.
async fn configure_port(port: &str, baudrate: u32) {
    let status = tokio::process::Command::new("stty")
        .arg("-F")
        .arg(port)
        .arg(baudrate.to_string())
        .args(["raw", "-echo"])
        .status()
        .await;

    match status {
        Ok(s) if s.success() => debug!("Configured {port} for {baudrate} baud"),
        Ok(s) => warn!("stty exited with {s} for {port}; using current port settings"),
        Err(e) => warn!("Cannot run stty for {port}: {e}; using current port settings"),
    }
}

async fn read_lines<R>(mut reader: R, latch: Arc<Mutex<Latch>>)
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => {
                warn!("Serial stream ended");
                return;
            }
            Ok(_) => {}
            Err(e) => {
                warn!("Serial read failed: {e}");
                return;
            }
        }

        let line = String::from_utf8_lossy(&buf);
        debug!("got a packed line {:?}", line.trim_end());

        match parse_line(&line) {
            Ok(readouts) => lock(&latch).observe(readouts),
            Err(LineError::Empty) => {}
            Err(e) => debug!("Skipping serial line: {e}"),
        }
    }
}
