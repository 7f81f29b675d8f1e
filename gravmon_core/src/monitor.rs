//! Motion pipeline orchestrator.
//!
//! `MotionMonitor` owns its source subscription, a moving-average filter,
//! and the observer registry. While running, a dedicated worker thread
//! drains a depth-1 bounded channel fed by the source callback, computes
//! the gravity-aligned acceleration scalar, smooths it, applies the
//! deadband, and fans the result out to observers in registration order.
//!
//! Safety: each running monitor owns exactly one worker thread, shut down
//! and joined when the monitor stops or is dropped, so threads never leak.

use crossbeam_channel as xch;
use gravmon_traits::clock::{Clock, MonotonicClock};
use gravmon_traits::{MotionSample, MotionSource, SampleSink};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};
use std::time::{Duration, Instant};

use crate::config::{FilterCfg, SamplerCfg};
use crate::error::{MonitorError, Result};
use crate::filter::MovingAverage;
use crate::observer::{MotionObserver, ObserverRegistry};
use crate::util;
use eyre::WrapErr;

/// Counters published by the delivery worker and the source callback.
#[derive(Debug, Default)]
struct PipelineCounters {
    processed: AtomicU64,
    dropped: AtomicU64,
    last_ok_ms: AtomicU64,
}

/// State shared with the delivery worker thread.
struct WorkerShared {
    filter: Arc<Mutex<MovingAverage>>,
    observers: Arc<ObserverRegistry>,
    clock: Arc<dyn Clock + Send + Sync>,
    counters: Arc<PipelineCounters>,
    epoch: Instant,
    deadband: f64,
}

/// Snap values strictly inside `(-deadband, +deadband)` to zero. The
/// bounds themselves pass through.
#[inline]
fn apply_deadband(value: f64, deadband: f64) -> f64 {
    if value < deadband && value > -deadband {
        0.0
    } else {
        value
    }
}

struct DeliveryWorker {
    /// Shutdown flag for immediate response (atomic for lock-free check)
    shutdown: Arc<AtomicBool>,
    /// Join handle for graceful thread cleanup
    join_handle: Option<std::thread::JoinHandle<()>>,
}

impl DeliveryWorker {
    fn spawn(rx: xch::Receiver<MotionSample>, tick: Duration, shared: WorkerShared) -> Self {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_flag = Arc::clone(&shutdown);

        let join_handle = std::thread::spawn(move || {
            loop {
                if shutdown_flag.load(Ordering::Relaxed) {
                    tracing::debug!("delivery worker received shutdown signal");
                    break;
                }
                match rx.recv_timeout(tick) {
                    Ok(sample) => {
                        let raw = sample.gravity.dot(&sample.user_accel);
                        let smoothed = match shared.filter.lock() {
                            Ok(mut filter) => filter.filter(raw),
                            // A poisoned filter means a prior panic mid-run;
                            // stop publishing rather than corrupt the average.
                            Err(_) => break,
                        };
                        let value = apply_deadband(smoothed, shared.deadband);
                        for observer in shared.observers.snapshot() {
                            observer.on_vertical_acceleration(value);
                        }
                        shared.counters.processed.fetch_add(1, Ordering::Relaxed);
                        let now = shared.clock.ms_since(shared.epoch);
                        shared.counters.last_ok_ms.store(now, Ordering::Relaxed);
                        tracing::trace!(raw, value, "sample published");
                    }
                    Err(xch::RecvTimeoutError::Timeout) => {
                        // No sample this tick; loop to re-check shutdown.
                    }
                    Err(xch::RecvTimeoutError::Disconnected) => {
                        tracing::debug!("sample producer disconnected, exiting worker");
                        break;
                    }
                }
            }
            tracing::trace!("delivery worker exiting cleanly");
        });

        Self {
            shutdown,
            join_handle: Some(join_handle),
        }
    }
}

impl Drop for DeliveryWorker {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        // The thread exits at the next tick boundary or queued sample,
        // whichever comes first.
        if let Some(handle) = self.join_handle.take() {
            match handle.join() {
                Ok(()) => {
                    tracing::trace!("delivery worker joined successfully");
                }
                Err(e) => {
                    // Thread panicked; log but don't propagate (we're in Drop)
                    tracing::warn!(?e, "delivery worker panicked during shutdown");
                }
            }
        }
    }
}

/// Bounded-rate motion sampler: computes the component of user acceleration
/// along gravity per sample, smooths it, and publishes to observers.
///
/// Two states, idle and running, transitioned only by `start`/`stop`, both
/// idempotent. `is_running` is derived from the source's own active flag so
/// the two can never diverge.
pub struct MotionMonitor<S: MotionSource> {
    source: S,
    sampler: SamplerCfg,
    filter: Arc<Mutex<MovingAverage>>,
    observers: Arc<ObserverRegistry>,
    clock: Arc<dyn Clock + Send + Sync>,
    counters: Arc<PipelineCounters>,
    epoch: Instant,
    worker: Option<DeliveryWorker>,
}

impl<S: MotionSource> std::fmt::Debug for MotionMonitor<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MotionMonitor")
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}

impl<S: MotionSource> MotionMonitor<S> {
    /// Build with defaults: 60 fps, deadband 0.01, smoothing disabled.
    pub fn new(source: S) -> Self {
        Self::from_parts(
            source,
            SamplerCfg::default(),
            FilterCfg::default(),
            Arc::new(MonotonicClock::new()),
        )
    }

    pub(crate) fn from_parts(
        source: S,
        sampler: SamplerCfg,
        filter: FilterCfg,
        clock: Arc<dyn Clock + Send + Sync>,
    ) -> Self {
        let epoch = clock.now();
        Self {
            source,
            sampler,
            filter: Arc::new(Mutex::new(MovingAverage::new(filter.window))),
            observers: Arc::new(ObserverRegistry::default()),
            clock,
            counters: Arc::new(PipelineCounters::default()),
            epoch,
            worker: None,
        }
    }

    /// Subscribe to the source and begin publishing.
    ///
    /// No-op when already running (exactly one live subscription). Fails
    /// with [`MonitorError::Unavailable`] when the device cannot sense
    /// motion; `is_running` stays false in that case.
    pub fn start(&mut self) -> Result<()> {
        if self.source.is_active() {
            tracing::debug!("monitor already running; start is a no-op");
            return Ok(());
        }
        if !self.source.is_available() {
            return Err(eyre::Report::new(MonitorError::Unavailable));
        }

        let interval = util::interval_from_fps(self.sampler.fps);
        let (tx, rx) = xch::bounded::<MotionSample>(1);
        let counters = Arc::clone(&self.counters);
        let sink: SampleSink = Box::new(move |reading| {
            // Absent reading: transient delivery skip, nothing reaches the
            // filter and no observer hears about it.
            let Some(sample) = reading else { return };
            // Worker still busy with the previous sample: drop the newest.
            if tx.try_send(sample).is_err() {
                counters.dropped.fetch_add(1, Ordering::Relaxed);
            }
        });

        // Spawn before subscribing so the first accepted sample never counts
        // as a drop.
        let worker = DeliveryWorker::spawn(
            rx,
            interval,
            WorkerShared {
                filter: Arc::clone(&self.filter),
                observers: Arc::clone(&self.observers),
                clock: Arc::clone(&self.clock),
                counters: Arc::clone(&self.counters),
                epoch: self.epoch,
                deadband: self.sampler.deadband,
            },
        );

        if let Err(e) = self.source.subscribe(interval, sink) {
            drop(worker);
            return Err(eyre::Report::new(MonitorError::Source(e.to_string())))
                .wrap_err("subscribing to motion source");
        }
        self.worker = Some(worker);
        tracing::info!(fps = self.sampler.fps, "motion monitor started");
        Ok(())
    }

    /// Unsubscribe, drain the worker, and clear smoothing history.
    ///
    /// No-op when idle. After `stop` returns, no sample can be processed
    /// and a future `start` begins a fresh average rather than blending
    /// with stale readings.
    pub fn stop(&mut self) {
        if !self.source.is_active() {
            return;
        }
        // Unsubscribe first: the source contract says the sink cannot fire
        // once this returns.
        self.source.unsubscribe();
        // Join the worker so no delivery is in flight past this point.
        self.worker = None;
        if let Ok(mut filter) = self.filter.lock() {
            filter.reset();
        }
        tracing::info!("motion monitor stopped");
    }

    /// Whether the source subscription is active. Derived, never tracked
    /// separately, so it cannot diverge from the source's own state.
    pub fn is_running(&self) -> bool {
        self.source.is_active()
    }

    /// Register an observer. The monitor holds it weakly and never extends
    /// its lifetime; safe while running.
    pub fn add_observer<O>(&self, observer: &Arc<O>)
    where
        O: MotionObserver + 'static,
    {
        let observer: Arc<dyn MotionObserver> = observer.clone();
        let handle: Weak<dyn MotionObserver> = Arc::downgrade(&observer);
        self.observers.add(handle);
    }

    /// Unregister an observer by identity; safe while running. Removing an
    /// observer that was never added is a no-op.
    pub fn remove_observer<O>(&self, observer: &Arc<O>)
    where
        O: MotionObserver + 'static,
    {
        let observer: Arc<dyn MotionObserver> = observer.clone();
        let handle: Weak<dyn MotionObserver> = Arc::downgrade(&observer);
        self.observers.remove(&handle);
    }

    /// Number of currently live registered observers.
    pub fn observer_count(&self) -> usize {
        self.observers.live_count()
    }

    /// Samples fully processed and published since construction.
    pub fn samples_processed(&self) -> u64 {
        self.counters.processed.load(Ordering::Relaxed)
    }

    /// Samples dropped because the worker was still busy with the previous
    /// one (backpressure, drop-newest policy).
    pub fn samples_dropped(&self) -> u64 {
        self.counters.dropped.load(Ordering::Relaxed)
    }

    /// Milliseconds since the last published sample (since construction if
    /// none yet). Observation only; nothing in the pipeline recovers from a
    /// source that silently stops delivering.
    pub fn stalled_for_ms(&self) -> u64 {
        let now = self.clock.ms_since(self.epoch);
        now.saturating_sub(self.counters.last_ok_ms.load(Ordering::Relaxed))
    }
}

impl<S: MotionSource> Drop for MotionMonitor<S> {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::apply_deadband;

    #[test]
    fn deadband_is_an_open_interval() {
        assert_eq!(apply_deadband(0.005, 0.01), 0.0);
        assert_eq!(apply_deadband(-0.0099, 0.01), 0.0);
        assert_eq!(apply_deadband(0.01, 0.01), 0.01);
        assert_eq!(apply_deadband(-0.01, 0.01), -0.01);
        assert_eq!(apply_deadband(0.02, 0.01), 0.02);
    }

    #[test]
    fn zero_deadband_passes_everything() {
        assert_eq!(apply_deadband(0.0, 0.0), 0.0);
        assert_eq!(apply_deadband(1e-12, 0.0), 1e-12);
    }
}
