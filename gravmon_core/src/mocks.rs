//! Test and helper mocks for gravmon_core

use std::sync::{Arc, Mutex};
use std::time::Duration;

use gravmon_traits::{MotionSample, MotionSource, SampleSink};

#[derive(Default)]
struct ScriptedInner {
    available: bool,
    sink: Option<SampleSink>,
    subscribe_calls: u32,
}

/// A source the tests drive by hand: `ScriptedHandle::deliver` pushes one
/// reading through the registered sink on the caller's thread, standing in
/// for the provider's own delivery context.
pub struct ScriptedSource {
    inner: Arc<Mutex<ScriptedInner>>,
}

/// Cloneable driver for a [`ScriptedSource`] owned by a monitor.
#[derive(Clone)]
pub struct ScriptedHandle {
    inner: Arc<Mutex<ScriptedInner>>,
}

impl ScriptedSource {
    pub fn available() -> (Self, ScriptedHandle) {
        Self::with_availability(true)
    }

    /// A device that cannot sense motion; `subscribe` always fails.
    pub fn unavailable() -> (Self, ScriptedHandle) {
        Self::with_availability(false)
    }

    fn with_availability(available: bool) -> (Self, ScriptedHandle) {
        let inner = Arc::new(Mutex::new(ScriptedInner {
            available,
            sink: None,
            subscribe_calls: 0,
        }));
        (
            Self {
                inner: Arc::clone(&inner),
            },
            ScriptedHandle { inner },
        )
    }
}

impl ScriptedHandle {
    /// Push one reading through the sink, if subscribed. `None` models a
    /// provider delivery failure.
    pub fn deliver(&self, reading: Option<MotionSample>) {
        if let Ok(mut inner) = self.inner.lock() {
            if let Some(sink) = inner.sink.as_mut() {
                sink(reading);
            }
        }
    }

    pub fn subscribe_calls(&self) -> u32 {
        self.inner.lock().map(|i| i.subscribe_calls).unwrap_or(0)
    }

    pub fn is_subscribed(&self) -> bool {
        self.inner.lock().map(|i| i.sink.is_some()).unwrap_or(false)
    }
}

impl MotionSource for ScriptedSource {
    fn is_available(&self) -> bool {
        self.inner.lock().map(|i| i.available).unwrap_or(false)
    }

    fn is_active(&self) -> bool {
        self.inner.lock().map(|i| i.sink.is_some()).unwrap_or(false)
    }

    fn subscribe(
        &mut self,
        _interval: Duration,
        sink: SampleSink,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| "scripted source poisoned")?;
        if !inner.available {
            return Err("motion sensing unavailable".into());
        }
        inner.subscribe_calls += 1;
        inner.sink = Some(sink);
        Ok(())
    }

    fn unsubscribe(&mut self) {
        // Dropping the sink under the lock means no delivery can race past
        // this point; `deliver` holds the same lock.
        if let Ok(mut inner) = self.inner.lock() {
            inner.sink = None;
        }
    }
}
