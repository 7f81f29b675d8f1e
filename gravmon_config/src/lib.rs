#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schema and motion-trace parsing for the gravmon pipeline.
//!
//! - `Config` and sub-structs are deserialized from TOML and validated.
//! - The trace CSV loader enforces headers and strictly increasing
//!   timestamps before handing rows to replay.
use serde::Deserialize;

/// Recorded motion-trace CSV schema.
///
/// Expected headers:
/// t_s,gx,gy,gz,ax,ay,az
///
/// Example:
/// t_s,gx,gy,gz,ax,ay,az
/// 0.000,0.0,0.0,-1.0,0.0,0.0,0.02
/// 0.016,0.0,0.0,-1.0,0.0,0.0,0.05
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct TraceRow {
    pub t_s: f64,
    pub gx: f64,
    pub gy: f64,
    pub gz: f64,
    pub ax: f64,
    pub ay: f64,
    pub az: f64,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SamplerCfg {
    /// Target sampling rate in frames per second
    pub fps: u32,
    /// Snap-to-zero half-width applied after smoothing (g)
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

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FilterCfg {
    /// Moving-average window size (0 disables smoothing)
    pub window: usize,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub sampler: SamplerCfg,
    pub filter: FilterCfg,
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Sampler
        if self.sampler.fps == 0 {
            eyre::bail!("sampler.fps must be > 0");
        }
        if self.sampler.fps > 1000 {
            eyre::bail!("sampler.fps is unreasonably large (>1000)");
        }
        if !self.sampler.deadband.is_finite() {
            eyre::bail!("sampler.deadband must be finite");
        }
        if self.sampler.deadband < 0.0 {
            eyre::bail!("sampler.deadband must be >= 0");
        }
        if self.sampler.deadband >= 1.0 {
            eyre::bail!("sampler.deadband must be < 1.0 g");
        }

        // Filter
        if self.filter.window > 4096 {
            eyre::bail!("filter.window is unreasonably large (>4096)");
        }

        Ok(())
    }
}

pub fn load_trace_csv(path: &std::path::Path) -> eyre::Result<Vec<TraceRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|e| eyre::eyre!("open trace CSV {:?}: {}", path, e))?;

    // Enforce exact headers
    let headers = rdr
        .headers()
        .map_err(|e| eyre::eyre!("read CSV headers {:?}: {}", path, e))?
        .clone();
    let expected = ["t_s", "gx", "gy", "gz", "ax", "ay", "az"];
    let actual: Vec<String> = headers.iter().map(|s| s.to_string()).collect();
    if actual != expected {
        eyre::bail!(
            "trace CSV must have headers 't_s,gx,gy,gz,ax,ay,az', got: {}",
            actual.join(",")
        );
    }

    let mut rows: Vec<TraceRow> = Vec::new();
    for (idx, rec) in rdr.deserialize::<TraceRow>().enumerate() {
        match rec {
            Ok(row) => {
                if !row.t_s.is_finite() {
                    eyre::bail!("invalid CSV row {}: non-finite timestamp", idx + 2);
                }
                if let Some(prev) = rows.last() {
                    if row.t_s <= prev.t_s {
                        eyre::bail!(
                            "trace timestamps must be strictly increasing (row {})",
                            idx + 2
                        );
                    }
                }
                rows.push(row);
            }
            Err(e) => {
                eyre::bail!("invalid CSV row {}: {}", idx + 2, e);
            }
        }
    }

    if rows.is_empty() {
        eyre::bail!("trace CSV {:?} has no data rows", path);
    }

    Ok(rows)
}
