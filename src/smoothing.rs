//! Per-metric rolling-mean smoothing.
//!
//! Each metric owns a bounded FIFO window of its most recent raw samples:
//!
//! - **Bounded**: a window never holds more than its capacity
//! - **FIFO**: once full, the oldest sample is evicted first
//! - **Mean of contents**: before the window fills, the mean covers only what
//!   has arrived so far
//!
//! State belongs to one session (one [`PostureAnalyzer`](crate::analyzer::PostureAnalyzer));
//! nothing here is global.

use crate::metric::Metric;
use std::collections::VecDeque;
use trueno::Vector;

/// A fixed-capacity window of raw samples for one metric.
#[derive(Debug, Clone)]
pub struct SmoothingWindow {
    samples: VecDeque<f32>,
    capacity: usize,
}

impl SmoothingWindow {
    /// Creates an empty window.
    ///
    /// # Panics
    ///
    /// Panics if capacity is 0.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "smoothing window capacity must be greater than 0");
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends a sample, evicting the oldest one when full, and returns the
    /// mean of the window after the push.
    pub fn push(&mut self, value: f32) -> f32 {
        if self.samples.len() >= self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(value);
        self.mean().unwrap_or(value)
    }

    /// Arithmetic mean of the current contents, `None` when empty.
    #[must_use]
    pub fn mean(&self) -> Option<f32> {
        if self.samples.is_empty() {
            return None;
        }
        let values: Vec<f32> = self.samples.iter().copied().collect();
        Vector::from_vec(values).mean().ok()
    }

    /// Number of samples currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True when no sample has been pushed since creation or the last reset.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Maximum number of samples held.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Samples from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &f32> {
        self.samples.iter()
    }

    /// Drops all samples.
    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

/// One smoothing window per [`Metric`].
#[derive(Debug, Clone)]
pub struct SmoothingState {
    windows: [SmoothingWindow; Metric::COUNT],
}

impl SmoothingState {
    /// Creates empty windows of the given capacity for every metric.
    ///
    /// # Panics
    ///
    /// Panics if capacity is 0.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            windows: std::array::from_fn(|_| SmoothingWindow::new(capacity)),
        }
    }

    /// Feeds a raw sample into the metric's window and returns the smoothed value.
    pub fn smooth(&mut self, metric: Metric, raw: f32) -> f32 {
        self.windows[metric.index()].push(raw)
    }

    /// The window backing a metric.
    #[must_use]
    pub fn window(&self, metric: Metric) -> &SmoothingWindow {
        &self.windows[metric.index()]
    }

    /// Empties every window, e.g. when a new subject steps in.
    pub fn reset(&mut self) {
        self.windows.iter_mut().for_each(SmoothingWindow::clear);
    }
}

impl Default for SmoothingState {
    /// Five-frame windows.
    fn default() -> Self {
        Self::new(5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_single_push_returns_value() {
        let mut window = SmoothingWindow::new(5);
        assert_eq!(window.push(42.5), 42.5);
        assert_eq!(window.len(), 1);
    }

    #[test]
    fn test_mean_before_full_covers_received_samples() {
        let mut window = SmoothingWindow::new(5);
        window.push(10.0);
        let mean = window.push(20.0);
        assert_relative_eq!(mean, 15.0, epsilon = 1e-5);
    }

    #[test]
    fn test_fifo_eviction() {
        let mut window = SmoothingWindow::new(5);
        for v in 1..=7 {
            window.push(v as f32);
        }

        let values: Vec<f32> = window.iter().copied().collect();
        assert_eq!(values, vec![3.0, 4.0, 5.0, 6.0, 7.0]);
        assert_relative_eq!(window.mean().unwrap(), 5.0, epsilon = 1e-5);
    }

    #[test]
    fn test_never_exceeds_capacity() {
        let mut window = SmoothingWindow::new(5);
        for i in 0..100 {
            window.push(i as f32);
            assert!(window.len() <= 5);
        }
        assert_eq!(window.capacity(), 5);
    }

    #[test]
    fn test_empty_window_has_no_mean() {
        let window = SmoothingWindow::new(3);
        assert!(window.is_empty());
        assert_eq!(window.mean(), None);
    }

    #[test]
    #[should_panic(expected = "capacity must be greater than 0")]
    fn test_zero_capacity_panics() {
        let _window = SmoothingWindow::new(0);
    }

    #[test]
    fn test_state_keeps_metrics_apart() {
        let mut state = SmoothingState::default();
        state.smooth(Metric::NeckFlex, 30.0);
        state.smooth(Metric::HeadForward, 2.0);
        let neck = state.smooth(Metric::NeckFlex, 10.0);

        assert_relative_eq!(neck, 20.0, epsilon = 1e-5);
        assert_eq!(state.window(Metric::HeadForward).len(), 1);
        assert!(state.window(Metric::TorsoLean).is_empty());
    }

    #[test]
    fn test_identical_samples_converge_within_window() {
        let mut state = SmoothingState::new(5);
        for v in [90.0, 80.0, 70.0, 60.0, 50.0] {
            state.smooth(Metric::TorsoLean, v);
        }
        let mut last = 0.0;
        for _ in 0..5 {
            last = state.smooth(Metric::TorsoLean, 12.0);
        }
        assert_relative_eq!(last, 12.0, epsilon = 1e-4);
    }

    #[test]
    fn test_reset() {
        let mut state = SmoothingState::default();
        for metric in Metric::ALL {
            state.smooth(metric, 1.0);
        }
        state.reset();
        assert!(Metric::ALL.iter().all(|m| state.window(*m).is_empty()));
    }
}
