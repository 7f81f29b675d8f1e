//! Common time/period helpers for gravmon_core.

use std::time::Duration;

/// Number of microseconds in one second.
pub const MICROS_PER_SEC: u64 = 1_000_000;

/// Sampling interval for a target rate in frames per second.
/// - Clamps `fps` to at least 1 to avoid division by zero.
/// - Ensures the result is at least 1 microsecond.
#[inline]
pub fn interval_from_fps(fps: u32) -> Duration {
    Duration::from_micros((MICROS_PER_SEC / u64::from(fps.max(1))).max(1))
}
