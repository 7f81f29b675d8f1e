//! Config mapping and pipeline execution for both subcommands.

use crate::cli::{JSON_MODE, SourceKind};
use crate::output::StdoutPrinter;
use eyre::WrapErr;
use gravmon_core::{FilterCfg, MotionMonitorBuilder, SamplerCfg};
use gravmon_sensors::{ReplayMotion, SimulatedMotion};
use gravmon_traits::{MotionSample, MotionSource, Vec3};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

pub struct RunOpts {
    pub fps: Option<u32>,
    pub window: Option<usize>,
    pub deadband: Option<f64>,
    pub duration_s: Option<f64>,
    pub json: bool,
}

/// Merge the config file with CLI overrides (flags take precedence).
fn resolve(cfg: &gravmon_config::Config, opts: &RunOpts) -> (SamplerCfg, FilterCfg) {
    let mut sampler: SamplerCfg = (&cfg.sampler).into();
    let mut filter: FilterCfg = (&cfg.filter).into();
    if let Some(fps) = opts.fps {
        sampler.fps = fps;
    }
    if let Some(deadband) = opts.deadband {
        sampler.deadband = deadband;
    }
    if let Some(window) = opts.window {
        filter.window = window;
    }
    (sampler, filter)
}

pub fn run_monitor(
    cfg: &gravmon_config::Config,
    kind: SourceKind,
    opts: &RunOpts,
) -> eyre::Result<()> {
    match kind {
        SourceKind::Sim => run_pipeline(SimulatedMotion::new(), cfg, opts, opts.duration_s),
        SourceKind::Iio => {
            #[cfg(feature = "iio")]
            {
                let source = gravmon_sensors::iio::IioAccel::autodetect()
                    .wrap_err("detecting IIO accelerometer")?;
                run_pipeline(source, cfg, opts, opts.duration_s)
            }
            #[cfg(not(feature = "iio"))]
            {
                let _ = (cfg, opts); // silence unused
                eyre::bail!("this build has no IIO support; rebuild with --features iio")
            }
        }
    }
}

pub fn run_replay(
    cfg: &gravmon_config::Config,
    trace: &Path,
    opts: &RunOpts,
) -> eyre::Result<()> {
    let rows = gravmon_config::load_trace_csv(trace)?;
    let samples: Vec<MotionSample> = rows
        .iter()
        .map(|r| MotionSample::new(Vec3::new(r.gx, r.gy, r.gz), Vec3::new(r.ax, r.ay, r.az)))
        .collect();
    tracing::info!(trace = %trace.display(), samples = samples.len(), "replaying trace");

    // A finite trace ends on its own; cap the run at its nominal length
    // plus slack so an exhausted replay doesn't wait for ctrl-c.
    let (sampler, _) = resolve(cfg, opts);
    let nominal_s = samples.len() as f64 / f64::from(sampler.fps.max(1));
    let duration = Some(opts.duration_s.unwrap_or(nominal_s + 0.5));

    run_pipeline(ReplayMotion::new(samples), cfg, opts, duration)
}

fn run_pipeline<S: MotionSource>(
    source: S,
    cfg: &gravmon_config::Config,
    opts: &RunOpts,
    duration_s: Option<f64>,
) -> eyre::Result<()> {
    let (sampler, filter) = resolve(cfg, opts);
    let mut monitor = MotionMonitorBuilder::new()
        .with_source(source)
        .with_sampler(sampler)
        .with_filter(filter)
        .build()
        .map_err(eyre::Report::new)
        .wrap_err("building motion monitor")?;

    let printer = StdoutPrinter::new(opts.json);
    monitor.add_observer(&printer);

    let stop = Arc::new(AtomicBool::new(false));
    {
        let stop = Arc::clone(&stop);
        ctrlc::set_handler(move || {
            stop.store(true, Ordering::SeqCst);
        })
        .wrap_err("installing ctrl-c handler")?;
    }

    monitor.start().wrap_err("starting motion monitor")?;

    let started = Instant::now();
    let deadline = duration_s.map(|s| started + Duration::from_secs_f64(s.max(0.0)));
    while !stop.load(Ordering::SeqCst) {
        if let Some(deadline) = deadline {
            if Instant::now() >= deadline {
                break;
            }
        }
        std::thread::sleep(Duration::from_millis(20));
    }

    monitor.stop();

    let processed = monitor.samples_processed();
    let dropped = monitor.samples_dropped();
    tracing::info!(processed, dropped, "monitor stopped");
    if *JSON_MODE.get().unwrap_or(&false) {
        println!(
            "{}",
            serde_json::json!({
                "event": "summary",
                "processed": processed,
                "dropped": dropped,
            })
        );
    }
    Ok(())
}
