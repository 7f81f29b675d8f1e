//! Delivery-pacing thread shared by the source implementations.
//!
//! Safety: each `Pacer` owns exactly one thread that is signalled and
//! joined on drop, so `unsubscribe` returning implies no further sink
//! invocation can occur.

use gravmon_traits::clock::Clock;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

pub(crate) struct Pacer {
    /// Shutdown flag for immediate response (atomic for lock-free check)
    shutdown: Arc<AtomicBool>,
    join_handle: Option<std::thread::JoinHandle<()>>,
}

impl Pacer {
    /// Run `tick` once per interval until it returns false or the pacer is
    /// dropped.
    pub fn spawn<F>(interval: Duration, clock: Arc<dyn Clock + Send + Sync>, mut tick: F) -> Self
    where
        F: FnMut() -> bool + Send + 'static,
    {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_flag = Arc::clone(&shutdown);

        let join_handle = std::thread::spawn(move || {
            loop {
                if shutdown_flag.load(Ordering::Relaxed) {
                    tracing::debug!("pacer received shutdown signal");
                    break;
                }
                if !tick() {
                    tracing::debug!("source exhausted, pacer exiting");
                    break;
                }
                // Check shutdown before sleep to avoid unnecessary delay
                if shutdown_flag.load(Ordering::Relaxed) {
                    break;
                }
                clock.sleep(interval);
            }
            tracing::trace!("pacer thread exiting cleanly");
        });

        Self {
            shutdown,
            join_handle: Some(join_handle),
        }
    }
}

impl Drop for Pacer {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(handle) = self.join_handle.take() {
            match handle.join() {
                Ok(()) => {
                    tracing::trace!("pacer thread joined successfully");
                }
                Err(e) => {
                    // Thread panicked; log but don't propagate (we're in Drop)
                    tracing::warn!(?e, "pacer thread panicked during shutdown");
                }
            }
        }
    }
}
