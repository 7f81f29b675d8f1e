//! Linux IIO sysfs accelerometer backend.
//!
//! Reads `in_accel_{x,y,z}_raw` and `in_accel_scale` from an IIO device
//! directory. Accelerometer-only devices report total acceleration, so the
//! gravity component is estimated with a per-axis exponential low-pass and
//! user acceleration is the remainder.

use crate::error::SourceError;
use crate::pacer::Pacer;
use gravmon_traits::clock::{Clock, MonotonicClock};
use gravmon_traits::{MotionSample, MotionSource, SampleSink, Vec3};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Standard gravity in m/s^2; scaled IIO accel channels are m/s^2.
const STANDARD_GRAVITY: f64 = 9.806_65;

const SYSFS_IIO_ROOT: &str = "/sys/bus/iio/devices";

pub struct IioAccel {
    dev_dir: PathBuf,
    /// Low-pass coefficient for the gravity estimate, in (0, 1].
    gravity_alpha: f64,
    clock: Arc<dyn Clock + Send + Sync>,
    pacer: Option<Pacer>,
}

impl IioAccel {
    pub fn new(dev_dir: impl Into<PathBuf>) -> Self {
        Self {
            dev_dir: dev_dir.into(),
            gravity_alpha: 0.05,
            clock: Arc::new(MonotonicClock::new()),
            pacer: None,
        }
    }

    /// First device under `/sys/bus/iio/devices` exposing accel channels.
    pub fn autodetect() -> crate::error::Result<Self> {
        for entry in fs::read_dir(SYSFS_IIO_ROOT)? {
            let dir = entry?.path();
            if dir.join("in_accel_x_raw").exists() {
                tracing::info!(dev = %dir.display(), "IIO accelerometer found");
                return Ok(Self::new(dir));
            }
        }
        Err(SourceError::Unavailable)
    }

    /// Tune the gravity low-pass (smaller = steadier, slower estimate).
    pub fn with_gravity_alpha(mut self, alpha: f64) -> Self {
        self.gravity_alpha = alpha.clamp(0.001, 1.0);
        self
    }

    fn read_value(path: &Path) -> crate::error::Result<f64> {
        let text = fs::read_to_string(path)?;
        text.trim()
            .parse::<f64>()
            .map_err(|e| SourceError::Parse(format!("{}: {e}", path.display())))
    }

    /// Total acceleration in g, already scaled.
    fn read_accel_g(dir: &Path) -> crate::error::Result<Vec3> {
        // Devices without an explicit scale report raw values already in
        // their final unit.
        let scale_path = dir.join("in_accel_scale");
        let scale = if scale_path.exists() {
            Self::read_value(&scale_path)?
        } else {
            1.0
        };
        let axis = |name: &str| -> crate::error::Result<f64> {
            let raw = Self::read_value(&dir.join(format!("in_accel_{name}_raw")))?;
            Ok(raw * scale / STANDARD_GRAVITY)
        };
        Ok(Vec3::new(axis("x")?, axis("y")?, axis("z")?))
    }
}

impl MotionSource for IioAccel {
    fn is_available(&self) -> bool {
        self.dev_dir.join("in_accel_x_raw").exists()
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
        if !self.is_available() {
            return Err(Box::new(SourceError::Unavailable));
        }
        let dir = self.dev_dir.clone();
        let alpha = self.gravity_alpha;
        let mut gravity_est: Option<Vec3> = None;
        let pacer = Pacer::spawn(interval, Arc::clone(&self.clock), move || {
            match Self::read_accel_g(&dir) {
                Ok(total) => {
                    let est = match gravity_est {
                        // Seed with the first reading instead of ramping up
                        // from zero.
                        None => total,
                        Some(prev) => Vec3::new(
                            prev.x + alpha * (total.x - prev.x),
                            prev.y + alpha * (total.y - prev.y),
                            prev.z + alpha * (total.z - prev.z),
                        ),
                    };
                    gravity_est = Some(est);
                    let user =
                        Vec3::new(total.x - est.x, total.y - est.y, total.z - est.z);
                    sink(Some(MotionSample::new(est, user)));
                }
                Err(e) => {
                    // Surfaced as an empty reading, not an error; the
                    // consumer skips it.
                    tracing::warn!(error = %e, "IIO read failed");
                    sink(None);
                }
            }
            true
        });
        self.pacer = Some(pacer);
        tracing::debug!(dev = %self.dev_dir.display(), "IIO accelerometer subscribed");
        Ok(())
    }

    fn unsubscribe(&mut self) {
        self.pacer = None;
    }
}
