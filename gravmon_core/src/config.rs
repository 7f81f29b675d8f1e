//! Runtime configuration for the sampling pipeline.
//!
//! These are the structs the monitor is built from. They are separate from
//! the TOML-deserialized schema in `gravmon_config`.

/// Sampler configuration.
#[derive(Debug, Clone)]
pub struct SamplerCfg {
    /// Target sampling rate in frames per second. The source is asked for
    /// one reading every `1/fps` seconds.
    pub fps: u32,
    /// Half-width of the snap-to-zero band applied after smoothing. Values
    /// strictly inside `(-deadband, +deadband)` publish as 0; the bounds
    /// themselves pass through.
    pub deadband: f64,
}

impl Default for SamplerCfg {
    fn default() -> Self {
        Self {
            fps: 60,
            deadband: 0.01,
        }
    }
}

/// Filter configuration.
#[derive(Debug, Clone, Default)]
pub struct FilterCfg {
    /// Moving-average window size (0 = smoothing disabled).
    pub window: usize,
}
