//! Motion source implementations for the gravmon pipeline.
//!
//! `SimulatedMotion` generates a deterministic vertical bounce for demos
//! and tests; `ReplayMotion` plays back a recorded trace. Both deliver from
//! a paced thread that is joined on unsubscribe. The `iio` feature adds a
//! Linux sysfs accelerometer backend.

pub mod error;
#[cfg(feature = "iio")]
pub mod iio;
mod pacer;

pub use error::SourceError;

use gravmon_traits::clock::{Clock, MonotonicClock};
use gravmon_traits::{MotionSample, MotionSource, SampleSink, Vec3};
use std::f64::consts::TAU;
use std::sync::Arc;
use std::time::Duration;

use crate::pacer::Pacer;

/// Tiny xorshift PRNG; deterministic per seed.
struct XorShift32 {
    state: u32,
}

impl XorShift32 {
    fn new(seed: u32) -> Self {
        Self {
            state: seed.max(1),
        }
    }

    /// Uniform in [0, 1).
    fn next_unit(&mut self) -> f64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        f64::from(x) / (f64::from(u32::MAX) + 1.0)
    }

    /// Uniform in [-1, 1).
    fn centered(&mut self) -> f64 {
        self.next_unit() * 2.0 - 1.0
    }
}

/// Waveform parameters for the simulated device.
#[derive(Debug, Clone)]
pub struct WaveCfg {
    /// Peak user acceleration along gravity (g)
    pub amplitude_g: f64,
    /// Bounce frequency (Hz)
    pub frequency_hz: f64,
    /// Uniform noise amplitude added per axis (g)
    pub noise_g: f64,
    /// PRNG seed for the noise term
    pub seed: u32,
    /// Deliver an absent reading every Nth sample (0 = never), modeling a
    /// transient sensor glitch
    pub dropout_every: u64,
}

impl Default for WaveCfg {
    fn default() -> Self {
        Self {
            amplitude_g: 0.25,
            frequency_hz: 1.2,
            noise_g: 0.02,
            seed: 0x00AC_CE17,
            dropout_every: 0,
        }
    }
}

/// Simulated device: a phone bouncing gently along the gravity axis.
///
/// Always available. Delivery is paced by the subscriber's requested
/// interval and is fully deterministic for a given seed and rate.
pub struct SimulatedMotion {
    wave: WaveCfg,
    clock: Arc<dyn Clock + Send + Sync>,
    pacer: Option<Pacer>,
}

impl Default for SimulatedMotion {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedMotion {
    pub fn new() -> Self {
        Self::with_wave(WaveCfg::default())
    }

    pub fn with_wave(wave: WaveCfg) -> Self {
        Self {
            wave,
            clock: Arc::new(MonotonicClock::new()),
            pacer: None,
        }
    }

    pub fn with_clock(wave: WaveCfg, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        Self {
            wave,
            clock,
            pacer: None,
        }
    }
}

impl MotionSource for SimulatedMotion {
    fn is_available(&self) -> bool {
        true
    }

    fn is_active(&self) -> bool {
        self.pacer.is_some()
    }

    fn subscribe(
        &mut self,
        interval: Duration,
        mut sink: SampleSink,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if self.pacer.is_some() {
            return Err(Box::new(SourceError::Busy));
        }
        let wave = self.wave.clone();
        let dt = interval.as_secs_f64();
        let mut rng = XorShift32::new(wave.seed);
        let mut n: u64 = 0;
        let pacer = Pacer::spawn(interval, Arc::clone(&self.clock), move || {
            n += 1;
            if wave.dropout_every > 0 && n % wave.dropout_every == 0 {
                sink(None);
                return true;
            }
            let t = (n - 1) as f64 * dt;
            let vertical = wave.amplitude_g * (TAU * wave.frequency_hz * t).sin();
            let gravity = Vec3::new(0.0, 0.0, -1.0);
            let user_accel = Vec3::new(
                rng.centered() * wave.noise_g,
                rng.centered() * wave.noise_g,
                -vertical + rng.centered() * wave.noise_g,
            );
            sink(Some(MotionSample::new(gravity, user_accel)));
            true
        });
        self.pacer = Some(pacer);
        tracing::debug!(interval_us = interval.as_micros() as u64, "simulated motion subscribed");
        Ok(())
    }

    fn unsubscribe(&mut self) {
        // Dropping the pacer joins its thread; no sink call can occur after
        // this returns.
        self.pacer = None;
    }
}

/// Replays a recorded trace at the subscriber's requested interval.
///
/// Once the trace is exhausted delivery silently stops; the subscription
/// stays active until unsubscribed. An empty trace reports the device as
/// unavailable.
pub struct ReplayMotion {
    samples: Arc<[MotionSample]>,
    clock: Arc<dyn Clock + Send + Sync>,
    pacer: Option<Pacer>,
}

impl ReplayMotion {
    pub fn new(samples: Vec<MotionSample>) -> Self {
        Self {
            samples: samples.into(),
            clock: Arc::new(MonotonicClock::new()),
            pacer: None,
        }
    }

    pub fn with_clock(samples: Vec<MotionSample>, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        Self {
            samples: samples.into(),
            clock,
            pacer: None,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl MotionSource for ReplayMotion {
    fn is_available(&self) -> bool {
        !self.samples.is_empty()
    }

    fn is_active(&self) -> bool {
        self.pacer.is_some()
    }

    fn subscribe(
        &mut self,
        interval: Duration,
        mut sink: SampleSink,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if self.pacer.is_some() {
            return Err(Box::new(SourceError::Busy));
        }
        if self.samples.is_empty() {
            return Err(Box::new(SourceError::Unavailable));
        }
        let samples = Arc::clone(&self.samples);
        let mut idx = 0usize;
        let pacer = Pacer::spawn(interval, Arc::clone(&self.clock), move || {
            let Some(sample) = samples.get(idx).copied() else {
                return false;
            };
            idx += 1;
            sink(Some(sample));
            true
        });
        self.pacer = Some(pacer);
        tracing::debug!(samples = self.samples.len(), "trace replay subscribed");
        Ok(())
    }

    fn unsubscribe(&mut self) {
        self.pacer = None;
    }
}
