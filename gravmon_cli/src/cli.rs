//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured summaries).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "gravmon", version, about = "Vertical-acceleration monitor CLI")]
pub struct Cli {
    /// Path to config TOML (typed)
    #[arg(long, value_name = "FILE", default_value = "etc/gravmon.toml")]
    pub config: PathBuf,

    /// Emit readings and summaries as JSON lines instead of plain text
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace)
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    pub log_level: String,

    /// Write logs to this file instead of stderr
    #[arg(long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

/// Which motion source backs the pipeline.
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum SourceKind {
    /// Deterministic simulated bounce
    Sim,
    /// Linux IIO accelerometer (requires the `iio` build feature)
    Iio,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Stream vertical-acceleration readings to stdout
    Monitor {
        /// Which motion source to use
        #[arg(long, value_enum, default_value = "sim")]
        source: SourceKind,
        /// Override sampler.fps from the config
        #[arg(long, value_name = "FPS")]
        fps: Option<u32>,
        /// Override filter.window from the config
        #[arg(long, value_name = "N")]
        window: Option<usize>,
        /// Override sampler.deadband from the config
        #[arg(long, value_name = "G")]
        deadband: Option<f64>,
        /// Stop after this many seconds (default: run until ctrl-c)
        #[arg(long, value_name = "SECS")]
        duration_s: Option<f64>,
    },
    /// Replay a recorded motion trace CSV through the pipeline
    Replay {
        /// Trace CSV with headers t_s,gx,gy,gz,ax,ay,az
        #[arg(value_name = "FILE")]
        trace: PathBuf,
        /// Override sampler.fps from the config
        #[arg(long, value_name = "FPS")]
        fps: Option<u32>,
        /// Override filter.window from the config
        #[arg(long, value_name = "N")]
        window: Option<usize>,
        /// Override sampler.deadband from the config
        #[arg(long, value_name = "G")]
        deadband: Option<f64>,
    },
}
