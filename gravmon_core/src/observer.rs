//! Observer seam and the non-owning registry behind fan-out.

use std::sync::{Arc, Mutex, Weak};

/// Receives every published vertical-acceleration value while registered.
///
/// Values arrive synchronously on the monitor's delivery context. An
/// observer that must touch another execution context (a UI thread, say)
/// re-dispatches itself; the pipeline makes no assumption about where its
/// listeners run.
pub trait MotionObserver: Send + Sync {
    fn on_vertical_acceleration(&self, value: f64);
}

/// Insertion-ordered collection of non-owning observer handles.
///
/// Entries are `Weak`, so the registry never extends an observer's
/// lifetime; handles whose owner has dropped them are pruned during
/// registration and skipped during fan-out. Removal is by identity, not
/// value.
#[derive(Default)]
pub(crate) struct ObserverRegistry {
    entries: Mutex<Vec<Weak<dyn MotionObserver>>>,
}

impl ObserverRegistry {
    pub fn add(&self, handle: Weak<dyn MotionObserver>) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.retain(|w| w.strong_count() > 0);
            entries.push(handle);
        }
    }

    pub fn remove(&self, handle: &Weak<dyn MotionObserver>) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.retain(|w| w.strong_count() > 0 && !Weak::ptr_eq(w, handle));
        }
    }

    /// Stable snapshot for fan-out: live handles in registration order.
    /// Iterating the copy keeps a concurrent add/remove from racing a
    /// delivery already in flight.
    pub fn snapshot(&self) -> Vec<Arc<dyn MotionObserver>> {
        match self.entries.lock() {
            Ok(entries) => entries.iter().filter_map(Weak::upgrade).collect(),
            Err(_) => Vec::new(),
        }
    }

    pub fn live_count(&self) -> usize {
        match self.entries.lock() {
            Ok(entries) => entries.iter().filter(|w| w.strong_count() > 0).count(),
            Err(_) => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting(AtomicUsize);
    impl MotionObserver for Counting {
        fn on_vertical_acceleration(&self, _value: f64) {
            self.0.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn handle(observer: &Arc<Counting>) -> Weak<dyn MotionObserver> {
        let observer: Arc<dyn MotionObserver> = observer.clone();
        let weak: Weak<dyn MotionObserver> = Arc::downgrade(&observer);
        weak
    }

    #[test]
    fn snapshot_preserves_registration_order() {
        let registry = ObserverRegistry::default();
        let a = Arc::new(Counting(AtomicUsize::new(0)));
        let b = Arc::new(Counting(AtomicUsize::new(0)));
        registry.add(handle(&a));
        registry.add(handle(&b));
        let snap = registry.snapshot();
        assert_eq!(snap.len(), 2);
        let first: Arc<dyn MotionObserver> = a.clone();
        assert!(Arc::ptr_eq(&snap[0], &first));
    }

    #[test]
    fn remove_is_identity_based() {
        let registry = ObserverRegistry::default();
        let a = Arc::new(Counting(AtomicUsize::new(0)));
        let b = Arc::new(Counting(AtomicUsize::new(0)));
        registry.add(handle(&a));
        registry.add(handle(&b));
        registry.remove(&handle(&a));
        assert_eq!(registry.live_count(), 1);
        let snap = registry.snapshot();
        let remaining: Arc<dyn MotionObserver> = b.clone();
        assert!(Arc::ptr_eq(&snap[0], &remaining));
    }

    #[test]
    fn dropped_observers_vanish_from_snapshots() {
        let registry = ObserverRegistry::default();
        let a = Arc::new(Counting(AtomicUsize::new(0)));
        registry.add(handle(&a));
        drop(a);
        assert!(registry.snapshot().is_empty());
        assert_eq!(registry.live_count(), 0);
    }
}
