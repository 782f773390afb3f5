//! Plot geometry for the rolling chart.
//!
//! Everything here is plain arithmetic on screen coordinates so it can be
//! tested without a window; the canvas widget turns the results into paths.

use std::ops::Range;
use vibe_core::SlidingSeriesBuffer;

/// A position in logical pixels, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

/// Rectangle the series are drawn into, excluding axis labels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotArea {
    pub x:      f32,
    pub y:      f32,
    pub width:  f32,
    pub height: f32,
}

impl PlotArea {
    /// Shrink a `width × height` canvas by the given margins.
    pub fn inset(width: f32, height: f32, left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            x:      left,
            y:      top,
            width:  (width - left - right).max(0.0),
            height: (height - top - bottom).max(0.0),
        }
    }

    /// Horizontal position of slot `index` out of `len` evenly spread slots.
    pub fn x_at(&self, index: usize, len: usize) -> f32 {
        if len <= 1 {
            return self.x + self.width / 2.0;
        }
        self.x + self.width * index as f32 / (len - 1) as f32
    }

    /// Vertical position of `value` on a fixed `y_range`; values outside
    /// the range are pinned to the nearest edge.
    pub fn y_at(&self, value: f64, y_range: (f64, f64)) -> f32 {
        let (min, max) = y_range;
        let t = ((value.clamp(min, max) - min) / (max - min)) as f32;
        self.y + self.height * (1.0 - t)
    }
}

/// Polyline pieces for one series. Non-finite values break the line.
pub fn polylines<I>(area: &PlotArea, values: I, y_range: (f64, f64)) -> Vec<Vec<Point>>
where
    I: ExactSizeIterator<Item = f64>,
{
    let len = values.len();
    let mut lines = Vec::new();
    let mut current = Vec::new();

    for (index, value) in values.enumerate() {
        if value.is_finite() {
            current.push(Point { x: area.x_at(index, len), y: area.y_at(value, y_range) });
        } else if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

/// Polylines for every series of `window`, in series order.
pub fn window_polylines(
    area: &PlotArea,
    window: &SlidingSeriesBuffer,
    y_range: (f64, f64),
) -> Vec<Vec<Vec<Point>>> {
    (0..window.series_count())
        .filter_map(|i| window.series(i))
        .map(|series| polylines(area, series.iter().copied(), y_range))
        .collect()
}

/// At most `max_ticks` evenly spaced `(slot index, label)` pairs, always
/// including the newest label.
pub fn label_ticks(labels: Range<u64>, max_ticks: usize) -> Vec<(usize, u64)> {
    let len = (labels.end - labels.start) as usize;
    if len == 0 || max_ticks == 0 {
        return Vec::new();
    }

    let step = len.div_ceil(max_ticks).max(1);
    let last = len - 1;

    // Count back from the newest slot so the right edge is always labelled.
    let mut ticks: Vec<(usize, u64)> = (0..len)
        .rev()
        .step_by(step)
        .map(|index| (index, labels.start + index as u64))
        .collect();
    ticks.reverse();

    debug_assert_eq!(ticks.last().map(|t| t.0), Some(last));
    ticks
}

/// `divisions + 1` evenly spaced values covering `y_range`, bottom first.
pub fn value_ticks(y_range: (f64, f64), divisions: usize) -> Vec<f64> {
    let (min, max) = y_range;
    let divisions = divisions.max(1);
    (0..=divisions)
        .map(|i| min + (max - min) * i as f64 / divisions as f64)
        .collect()
}
