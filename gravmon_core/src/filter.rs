//! Moving-average denoiser for the scalar projection stream.

use std::collections::VecDeque;

/// Online moving average over the most recent `window` readings.
///
/// A window of 0 disables smoothing entirely: `filter` returns its input
/// unchanged and keeps no history. The window size is fixed for the
/// lifetime of the filter. O(1) amortized update, space proportional to the
/// window.
///
/// There is no clamping and no NaN/Inf handling: a non-finite input
/// poisons the running sum and propagates through every output until the
/// next `reset`.
#[derive(Debug)]
pub struct MovingAverage {
    window: usize,
    history: VecDeque<f64>,
    sum: f64,
}

impl MovingAverage {
    pub fn new(window: usize) -> Self {
        Self {
            window,
            history: VecDeque::with_capacity(window),
            sum: 0.0,
        }
    }

    /// Configured window size.
    pub fn window(&self) -> usize {
        self.window
    }

    /// Number of readings currently held.
    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Feed one reading and return the average of the readings seen so far,
    /// capped at the last `window` of them. Early on the average covers
    /// however many readings have arrived, not a zero-padded window.
    pub fn filter(&mut self, value: f64) -> f64 {
        if self.window == 0 {
            return value;
        }
        while self.history.len() >= self.window {
            if let Some(oldest) = self.history.pop_front() {
                self.sum -= oldest;
            }
        }
        self.history.push_back(value);
        self.sum += value;
        self.sum / self.history.len() as f64
    }

    /// Drop all history and zero the running sum. Idempotent.
    pub fn reset(&mut self) {
        self.history.clear();
        self.sum = 0.0;
    }
}
