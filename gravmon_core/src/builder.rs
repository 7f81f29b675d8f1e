//! Type-state builder for `MotionMonitor`.
//!
//! The builder enforces at compile time that a source is provided before
//! `build()` is available; the remaining knobs carry defaults and are
//! validated on `build()`.

use std::sync::Arc;

use gravmon_traits::MotionSource;
use gravmon_traits::clock::{Clock, MonotonicClock};

use crate::config::{FilterCfg, SamplerCfg};
use crate::error::BuildError;
use crate::monitor::MotionMonitor;

/// Marker for a builder with no source yet.
pub struct Missing;

pub struct MotionMonitorBuilder<S> {
    source: S,
    sampler: SamplerCfg,
    filter: FilterCfg,
    clock: Option<Arc<dyn Clock + Send + Sync>>,
}

impl Default for MotionMonitorBuilder<Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl MotionMonitorBuilder<Missing> {
    pub fn new() -> Self {
        Self {
            source: Missing,
            sampler: SamplerCfg::default(),
            filter: FilterCfg::default(),
            clock: None,
        }
    }
}

impl<S> MotionMonitorBuilder<S> {
    /// Provide the motion source; unlocks `build()`.
    pub fn with_source<T: MotionSource>(self, source: T) -> MotionMonitorBuilder<T> {
        MotionMonitorBuilder {
            source,
            sampler: self.sampler,
            filter: self.filter,
            clock: self.clock,
        }
    }

    /// Replace the whole sampler configuration (config-file path).
    pub fn with_sampler(mut self, sampler: SamplerCfg) -> Self {
        self.sampler = sampler;
        self
    }

    /// Replace the whole filter configuration (config-file path).
    pub fn with_filter(mut self, filter: FilterCfg) -> Self {
        self.filter = filter;
        self
    }

    /// Target sampling rate in frames per second.
    pub fn with_fps(mut self, fps: u32) -> Self {
        self.sampler.fps = fps;
        self
    }

    /// Half-width of the snap-to-zero band.
    pub fn with_deadband(mut self, deadband: f64) -> Self {
        self.sampler.deadband = deadband;
        self
    }

    /// Moving-average window size (0 disables smoothing).
    pub fn with_filter_window(mut self, window: usize) -> Self {
        self.filter.window = window;
        self
    }

    /// Override the clock (deterministic time in tests).
    pub fn with_clock(mut self, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        self.clock = Some(clock);
        self
    }
}

impl<S: MotionSource> MotionMonitorBuilder<S> {
    pub fn build(self) -> Result<MotionMonitor<S>, BuildError> {
        if self.sampler.fps == 0 {
            return Err(BuildError::InvalidConfig("sampler.fps must be > 0"));
        }
        if !self.sampler.deadband.is_finite() || self.sampler.deadband < 0.0 {
            return Err(BuildError::InvalidConfig(
                "sampler.deadband must be finite and >= 0",
            ));
        }
        let clock = self
            .clock
            .unwrap_or_else(|| Arc::new(MonotonicClock::new()));
        Ok(MotionMonitor::from_parts(
            self.source,
            self.sampler,
            self.filter,
            clock,
        ))
    }
}
