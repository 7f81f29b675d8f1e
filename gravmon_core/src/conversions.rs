//! Mappings from the TOML-deserialized schema to runtime config structs.

use crate::config::{FilterCfg, SamplerCfg};

impl From<&gravmon_config::SamplerCfg> for SamplerCfg {
    fn from(c: &gravmon_config::SamplerCfg) -> Self {
        Self {
            fps: c.fps,
            deadband: c.deadband,
        }
    }
}

impl From<&gravmon_config::FilterCfg> for FilterCfg {
    fn from(c: &gravmon_config::FilterCfg) -> Self {
        Self { window: c.window }
    }
}
