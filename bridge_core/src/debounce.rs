//! # Per-field Debouncing
//!
//! Live validation waits for a quiet period after the last keystroke in a
//! field. Each field owns at most one pending timer; a new keystroke cancels
//! it and arms a replacement. Timers never interact across fields.
//!
//! The debouncer only tracks cancellation handles. Whoever runs the timers
//! (a Tokio task, an Iced task) hands its handle over through [`Cancel`].

use std::collections::HashMap;
use std::hash::Hash;

/// Something that can stop a scheduled task before it fires
pub trait Cancel {
    fn cancel(&self);
}

impl Cancel for tokio::task::AbortHandle {
    fn cancel(&self) {
        self.abort();
    }
}

/// Map from field key to the handle of its pending settle timer
pub struct Debouncer<K> {
    pending: HashMap<K, Box<dyn Cancel + Send>>,
}

impl<K: Eq + Hash> Debouncer<K> {
    pub fn new() -> Self {
        Debouncer {
            pending: HashMap::new(),
        }
    }

    /// Track a freshly scheduled timer, cancelling the one it replaces
    pub fn arm(&mut self, key: K, handle: Box<dyn Cancel + Send>) {
        if let Some(previous) = self.pending.insert(key, handle) {
            previous.cancel();
        }
    }

    /// Forget a timer that has fired.
    ///
    /// Returns `false` when nothing was pending for the key.
    pub fn settle(&mut self, key: &K) -> bool {
        self.pending.remove(key).is_some()
    }

    /// Cancel the pending timer for one key
    pub fn cancel(&mut self, key: &K) {
        if let Some(handle) = self.pending.remove(key) {
            handle.cancel();
        }
    }

    /// Cancel every pending timer
    pub fn cancel_all(&mut self) {
        for (_, handle) in self.pending.drain() {
            handle.cancel();
        }
    }

    pub fn is_pending(&self, key: &K) -> bool {
        self.pending.contains_key(key)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

impl<K: Eq + Hash> Default for Debouncer<K> {
    fn default() -> Self {
        Debouncer::new()
    }
}

impl<K> std::fmt::Debug for Debouncer<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debouncer").field("pending", &self.pending.len()).finish()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    /// Handle that records whether it was cancelled
    #[derive(Clone, Default)]
    pub(crate) struct FlagHandle(pub Arc<AtomicBool>);

    impl FlagHandle {
        pub(crate) fn cancelled(&self) -> bool {
            self.0.load(Ordering::SeqCst)
        }
    }

    impl Cancel for FlagHandle {
        fn cancel(&self) {
            self.0.store(true, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_rearm_cancels_previous_timer() {
        let mut debouncer = Debouncer::new();
        let first = FlagHandle::default();
        let second = FlagHandle::default();

        debouncer.arm("SCALE1", Box::new(first.clone()));
        debouncer.arm("SCALE1", Box::new(second.clone()));

        assert!(first.cancelled());
        assert!(!second.cancelled());
        assert_eq!(debouncer.pending_count(), 1);
    }

    #[test]
    fn test_timers_are_field_scoped() {
        let mut debouncer = Debouncer::new();
        let a = FlagHandle::default();
        let b = FlagHandle::default();

        debouncer.arm("TOPRL", Box::new(a.clone()));
        debouncer.arm("SOFL", Box::new(b.clone()));

        assert!(!a.cancelled());
        assert!(!b.cancelled());
        assert_eq!(debouncer.pending_count(), 2);

        assert!(debouncer.settle(&"TOPRL"));
        assert!(!debouncer.settle(&"TOPRL"));
        assert!(debouncer.is_pending(&"SOFL"));
    }

    #[test]
    fn test_cancel_all() {
        let mut debouncer = Debouncer::new();
        let a = FlagHandle::default();
        let b = FlagHandle::default();
        debouncer.arm(1, Box::new(a.clone()));
        debouncer.arm(2, Box::new(b.clone()));

        debouncer.cancel_all();
        assert!(a.cancelled() && b.cancelled());
        assert_eq!(debouncer.pending_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_abort_handle_stops_timer() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let mut debouncer = Debouncer::new();

        for value in ["1", "12", "123"] {
            let tx = tx.clone();
            let task = tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(500)).await;
                let _ = tx.send(value);
            });
            debouncer.arm("NSPAN", Box::new(task.abort_handle()));
            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(rx.try_recv().ok(), Some("123"));
        assert!(rx.try_recv().is_err());
    }
}
