use crate::error::{Result, VibeError};
use crate::event::SeriesSource;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::ops::Range;
use std::path::Path;

/// What `append` does with values that are not finite numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SamplePolicy {
    /// Reject the whole update with [`VibeError::InvalidSample`].
    #[default]
    Strict,
    /// Push NaN/infinite values unchanged; the chart shows a gap.
    Permissive,
}

/// Fixed-length trailing history of one or more series plus the label axis.
///
/// Every series always holds exactly `capacity` values. Labels are not
/// stored: they are the contiguous range ending at [`last_label`], which
/// moves forward by one on every append.
///
/// [`last_label`]: SlidingSeriesBuffer::last_label
#[derive(Debug, Clone, PartialEq)]
pub struct SlidingSeriesBuffer {
    series:      Vec<VecDeque<f64>>,
    capacity:    usize,
    first_label: u64,
    policy:      SamplePolicy,
}

impl SlidingSeriesBuffer {
    /// Zero-filled window with labels `0..capacity`.
    pub fn new(capacity: usize, series_count: usize) -> Result<Self> {
        Self::with_seeds(capacity, vec![None; series_count])
    }

    /// Window seeded per series; `None` seeds a series with zeros.
    ///
    /// Fails with [`VibeError::SeedLengthMismatch`] when a seed is not
    /// exactly `capacity` long.
    pub fn with_seeds(capacity: usize, seeds: Vec<Option<Vec<f64>>>) -> Result<Self> {
        if capacity == 0 || seeds.is_empty() {
            return Err(VibeError::InvalidShape { capacity, series: seeds.len() });
        }

        let series = seeds
            .into_iter()
            .enumerate()
            .map(|(index, seed)| match seed {
                Some(values) if values.len() != capacity => Err(VibeError::SeedLengthMismatch {
                    series:   index,
                    expected: capacity,
                    actual:   values.len(),
                }),
                Some(values) => Ok(VecDeque::from(values)),
                None => Ok(VecDeque::from(vec![0.0; capacity])),
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            series,
            capacity,
            first_label: 0,
            policy: SamplePolicy::default(),
        })
    }

    #[must_use]
    pub fn with_policy(mut self, policy: SamplePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn series_count(&self) -> usize {
        self.series.len()
    }

    pub fn policy(&self) -> SamplePolicy {
        self.policy
    }

    /// X-axis labels, oldest first.
    pub fn labels(&self) -> Range<u64> {
        self.first_label..self.first_label + self.capacity as u64
    }

    pub fn last_label(&self) -> u64 {
        self.first_label + self.capacity as u64 - 1
    }

    /// Values of series `index`, oldest first.
    pub fn series(&self, index: usize) -> Option<&VecDeque<f64>> {
        self.series.get(index)
    }

    /// Newest value of series `index`.
    pub fn latest(&self, index: usize) -> Option<f64> {
        self.series.get(index).and_then(|s| s.back().copied())
    }

    /// Advance the window by one sample: one value per series, in series order.
    ///
    /// The oldest value of every series and the oldest label are evicted.
    /// On error the window is left untouched.
    pub fn append(&mut self, values: &[f64]) -> Result<()> {
        if values.len() != self.series.len() {
            return Err(VibeError::SampleArity {
                expected: self.series.len(),
                actual:   values.len(),
            });
        }

        if self.policy == SamplePolicy::Strict {
            if let Some((series, &value)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
                return Err(VibeError::InvalidSample { series, value });
            }
        }

        for (series, &value) in self.series.iter_mut().zip(values) {
            series.push_back(value);
            series.pop_front();
        }
        self.first_label += 1;

        Ok(())
    }
}

/// Surface a [`Chart`] draws onto; told to redraw after every mutation.
pub trait RenderSurface {
    fn redraw(&mut self, window: &SlidingSeriesBuffer);
}

/// No surface bound: redraws are no-ops.
impl RenderSurface for () {
    fn redraw(&mut self, _window: &SlidingSeriesBuffer) {}
}

/// A sliding window bound to the surface that displays it.
#[derive(Debug)]
pub struct Chart<S = ()> {
    window:  SlidingSeriesBuffer,
    surface: S,
}

impl<S: RenderSurface> Chart<S> {
    /// Bind `window` to `surface` and draw the initial state.
    pub fn new(window: SlidingSeriesBuffer, mut surface: S) -> Self {
        surface.redraw(&window);
        Self { window, surface }
    }

    pub fn window(&self) -> &SlidingSeriesBuffer {
        &self.window
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Append one sample and redraw. Nothing is redrawn when the sample is rejected.
    pub fn append(&mut self, values: &[f64]) -> Result<()> {
        self.window.append(values)?;
        self.surface.redraw(&self.window);
        Ok(())
    }
}

/// Previously recorded samples used to seed the chart at startup.
///
/// JSON shape: `{"vibration": [...], "relay": [...]}`; either key may be
/// absent, in which case that series starts at zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoricData {
    #[serde(default)]
    pub vibration: Option<Vec<f64>>,
    #[serde(default)]
    pub relay: Option<Vec<f64>>,
}

impl HistoricData {
    /// Read a seed file written in the JSON shape above.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| VibeError::Config(format!("cannot read seed '{}': {e}", path.display())))?;

        serde_json::from_str(&raw)
            .map_err(|e| VibeError::Config(format!("seed '{}': {e}", path.display())))
    }

    /// Per-series seeds in the order of `sources`.
    pub fn seeds(&self, sources: &[SeriesSource]) -> Vec<Option<Vec<f64>>> {
        sources
            .iter()
            .map(|source| match source {
                SeriesSource::Vibration => self.vibration.clone(),
                SeriesSource::Relay     => self.relay.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(buf: &SlidingSeriesBuffer, index: usize) -> Vec<f64> {
        buf.series(index).unwrap().iter().copied().collect()
    }

    fn labels(buf: &SlidingSeriesBuffer) -> Vec<u64> {
        buf.labels().collect()
    }

    #[test]
    fn new_window_is_zero_filled_with_leading_labels() {
        let buf = SlidingSeriesBuffer::new(4, 2).unwrap();
        assert_eq!(values(&buf, 0), vec![0.0; 4]);
        assert_eq!(values(&buf, 1), vec![0.0; 4]);
        assert_eq!(labels(&buf), vec![0, 1, 2, 3]);
    }

    #[test]
    fn three_appends_to_capacity_five() {
        let mut buf = SlidingSeriesBuffer::new(5, 1).unwrap();
        for v in [0.2, 0.9, 0.4] {
            buf.append(&[v]).unwrap();
        }
        assert_eq!(values(&buf, 0), vec![0.0, 0.0, 0.2, 0.9, 0.4]);
        assert_eq!(labels(&buf), vec![3, 4, 5, 6, 7]);
    }

    #[test]
    fn two_series_shift_independently() {
        let mut buf = SlidingSeriesBuffer::new(3, 2).unwrap();
        buf.append(&[1.0, 0.0]).unwrap();
        buf.append(&[0.0, 1.0]).unwrap();
        assert_eq!(values(&buf, 0), vec![0.0, 1.0, 0.0]);
        assert_eq!(values(&buf, 1), vec![0.0, 0.0, 1.0]);
    }

    #[test]
    fn lengths_and_labels_hold_for_many_appends() {
        for capacity in 1..=7 {
            let mut buf = SlidingSeriesBuffer::new(capacity, 2).unwrap();
            let initial_last = buf.last_label();
            for n in 1..=20u64 {
                buf.append(&[n as f64 / 20.0, 1.0]).unwrap();

                assert_eq!(buf.series(0).unwrap().len(), capacity);
                assert_eq!(buf.series(1).unwrap().len(), capacity);
                assert_eq!(buf.labels().count(), capacity);

                let labels = labels(&buf);
                assert_eq!(*labels.last().unwrap(), initial_last + n);
                assert!(labels.windows(2).all(|w| w[1] == w[0] + 1));
            }
        }
    }

    #[test]
    fn partial_fill_keeps_leading_zeros() {
        let mut buf = SlidingSeriesBuffer::new(6, 1).unwrap();
        let samples = [0.1, 0.5, 0.7];
        for v in samples {
            buf.append(&[v]).unwrap();
        }
        assert_eq!(values(&buf, 0), vec![0.0, 0.0, 0.0, 0.1, 0.5, 0.7]);
    }

    #[test]
    fn capacity_appends_replace_everything() {
        let seed = vec![0.9, 0.8, 0.7];
        let mut buf = SlidingSeriesBuffer::with_seeds(3, vec![Some(seed)]).unwrap();
        for v in [0.1, 0.2, 0.3] {
            buf.append(&[v]).unwrap();
        }
        assert_eq!(values(&buf, 0), vec![0.1, 0.2, 0.3]);
    }

    #[test]
    fn full_seed_is_reproduced_exactly() {
        let seed = vec![1.0, 0.0, 1.0, 1.0];
        let buf = SlidingSeriesBuffer::with_seeds(4, vec![Some(seed.clone()), None]).unwrap();
        assert_eq!(values(&buf, 0), seed);
        assert_eq!(values(&buf, 1), vec![0.0; 4]);
        assert_eq!(labels(&buf), vec![0, 1, 2, 3]);
    }

    #[test]
    fn short_seed_fails_fast() {
        let err = SlidingSeriesBuffer::with_seeds(4, vec![None, Some(vec![1.0; 3])]).unwrap_err();
        assert!(matches!(
            err,
            VibeError::SeedLengthMismatch { series: 1, expected: 4, actual: 3 }
        ));
    }

    #[test]
    fn empty_shape_is_rejected() {
        assert!(matches!(
            SlidingSeriesBuffer::new(0, 1),
            Err(VibeError::InvalidShape { .. })
        ));
        assert!(matches!(
            SlidingSeriesBuffer::new(3, 0),
            Err(VibeError::InvalidShape { .. })
        ));
    }

    #[test]
    fn wrong_arity_leaves_window_unchanged() {
        let mut buf = SlidingSeriesBuffer::new(3, 2).unwrap();
        let before = buf.clone();
        assert!(matches!(
            buf.append(&[1.0]),
            Err(VibeError::SampleArity { expected: 2, actual: 1 })
        ));
        assert_eq!(buf, before);
    }

    #[test]
    fn strict_policy_rejects_non_finite() {
        let mut buf = SlidingSeriesBuffer::new(3, 2).unwrap();
        buf.append(&[1.0, 1.0]).unwrap();
        let before = buf.clone();

        let err = buf.append(&[0.0, f64::NAN]).unwrap_err();
        assert!(matches!(err, VibeError::InvalidSample { series: 1, .. }));
        assert_eq!(buf, before);
        assert_eq!(buf.last_label(), 3);
    }

    #[test]
    fn permissive_policy_keeps_nan() {
        let mut buf = SlidingSeriesBuffer::new(2, 1)
            .unwrap()
            .with_policy(SamplePolicy::Permissive);
        buf.append(&[f64::NAN]).unwrap();
        assert!(buf.latest(0).unwrap().is_nan());
        assert_eq!(buf.series(0).unwrap().len(), 2);
    }

    #[derive(Default)]
    struct CountingSurface {
        redraws: usize,
        last_seen: Option<u64>,
    }

    impl RenderSurface for CountingSurface {
        fn redraw(&mut self, window: &SlidingSeriesBuffer) {
            self.redraws += 1;
            self.last_seen = Some(window.last_label());
        }
    }

    #[test]
    fn chart_redraws_after_each_accepted_append() {
        let window = SlidingSeriesBuffer::new(3, 1).unwrap();
        let mut chart = Chart::new(window, CountingSurface::default());
        assert_eq!(chart.surface().redraws, 1);

        chart.append(&[0.5]).unwrap();
        chart.append(&[0.6]).unwrap();
        assert!(chart.append(&[f64::INFINITY]).is_err());

        assert_eq!(chart.surface().redraws, 3);
        assert_eq!(chart.surface().last_seen, Some(4));
    }

    #[test]
    fn unbound_chart_still_appends() {
        let mut chart = Chart::new(SlidingSeriesBuffer::new(2, 1).unwrap(), ());
        chart.append(&[0.3]).unwrap();
        assert_eq!(chart.window().latest(0), Some(0.3));
    }

    #[test]
    fn historic_seeds_follow_series_order() {
        let data: HistoricData =
            serde_json::from_str(r#"{"vibration": [1, 0], "relay": [0, 1]}"#).unwrap();
        let seeds = data.seeds(&[SeriesSource::Relay, SeriesSource::Vibration]);
        assert_eq!(seeds, vec![Some(vec![0.0, 1.0]), Some(vec![1.0, 0.0])]);
    }

    #[test]
    fn historic_without_relay_seeds_zeros() {
        let data: HistoricData = serde_json::from_str(r#"{"vibration": [1, 1]}"#).unwrap();
        let buf = SlidingSeriesBuffer::with_seeds(
            2,
            data.seeds(&[SeriesSource::Vibration, SeriesSource::Relay]),
        )
        .unwrap();
        assert_eq!(values(&buf, 0), vec![1.0, 1.0]);
        assert_eq!(values(&buf, 1), vec![0.0, 0.0]);
    }
}
