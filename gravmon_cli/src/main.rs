//! gravmon binary: stream gravity-aligned acceleration readings.

mod cli;
mod output;
mod run;

use clap::Parser;
use cli::{Cli, Commands, FILE_GUARD, JSON_MODE};
use eyre::WrapErr;
use run::RunOpts;
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn init_tracing(cli: &Cli) {
    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    if let Some(path) = &cli.log_file {
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let file_name = path
            .file_name()
            .map_or_else(|| "gravmon.log".into(), |n| n.to_os_string());
        let appender = tracing_appender::rolling::never(dir, file_name);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let _ = FILE_GUARD.set(guard);
        if cli.json {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .json()
                .init();
        } else {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .init();
        }
    } else {
        // Logs go to stderr; stdout carries only readings.
        if cli.json {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .json()
                .init();
        } else {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

fn load_config(path: &Path) -> eyre::Result<gravmon_config::Config> {
    if path.exists() {
        let text = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("reading config {}", path.display()))?;
        gravmon_config::load_toml(&text)
            .map_err(|e| eyre::eyre!("parsing config {}: {}", path.display(), e))
    } else {
        // The default path is optional; running without a config file just
        // means built-in defaults.
        tracing::debug!(path = %path.display(), "config file not found, using defaults");
        Ok(gravmon_config::Config::default())
    }
}

fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);
    init_tracing(&cli);

    let cfg = load_config(&cli.config)?;
    cfg.validate().wrap_err("invalid config")?;

    match &cli.cmd {
        Commands::Monitor {
            source,
            fps,
            window,
            deadband,
            duration_s,
        } => {
            let opts = RunOpts {
                fps: *fps,
                window: *window,
                deadband: *deadband,
                duration_s: *duration_s,
                json: cli.json,
            };
            run::run_monitor(&cfg, *source, &opts)
        }
        Commands::Replay {
            trace,
            fps,
            window,
            deadband,
        } => {
            let opts = RunOpts {
                fps: *fps,
                window: *window,
                deadband: *deadband,
                duration_s: None,
                json: cli.json,
            };
            run::run_replay(&cfg, trace, &opts)
        }
    }
}
