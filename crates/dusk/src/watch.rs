//! Batched observation of nodes inserted after the initial pass.
//!
//! Insertions are queued and a single timer is armed for the batch window.
//! Further insertions while the timer is pending only extend the queue, so
//! however many nodes arrive, at most one rescan happens per window. When the
//! timer fires, the whole queue is handed back as one batch.
//!
//! The timer fires whether or not insertions continued during the window, so
//! the last burst is always processed.

use std::mem;
use std::time::Duration;

use log::trace;

use crate::host::{EventLoop, TimerId};

/// Insertion queue plus the pending batch timer.
#[derive(Debug)]
pub struct Watcher<N> {
    window: Duration,
    pending: Option<TimerId>,
    inserted: Vec<N>,
}

impl<N> Watcher<N> {
    /// Connects the host's insertion observer.
    pub fn start<E: EventLoop + ?Sized>(host: &mut E, window: Duration) -> Self {
        host.observe_insertions();
        Self {
            window,
            pending: None,
            inserted: Vec::new(),
        }
    }

    /// Queues inserted nodes, arming the batch timer if none is pending.
    pub fn record<E, I>(&mut self, host: &mut E, nodes: I)
    where
        E: EventLoop + ?Sized,
        I: IntoIterator<Item = N>,
    {
        let before = self.inserted.len();
        self.inserted.extend(nodes);
        if self.inserted.len() == before || self.pending.is_some() {
            return;
        }
        let timer = host.set_timeout(self.window);
        trace!("armed batch timer {:?} for {:?}", timer, self.window);
        self.pending = Some(timer);
    }

    /// Claims the queued nodes if `timer` is this watcher's pending timer.
    ///
    /// Returns `None` for stale or foreign timers.
    pub fn take_batch(&mut self, timer: TimerId) -> Option<Vec<N>> {
        if self.pending != Some(timer) {
            return None;
        }
        self.pending = None;
        Some(mem::take(&mut self.inserted))
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn queued(&self) -> usize {
        self.inserted.len()
    }

    /// Cancels any pending timer, drops the queue and disconnects the observer.
    pub fn stop<E: EventLoop + ?Sized>(mut self, host: &mut E) {
        if let Some(timer) = self.pending.take() {
            host.clear_timeout(timer);
        }
        self.inserted.clear();
        host.disconnect_observer();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records calls instead of scheduling anything.
    #[derive(Default)]
    struct Recorder {
        observing: bool,
        next: u64,
        armed: Vec<TimerId>,
        cleared: Vec<TimerId>,
    }

    impl EventLoop for Recorder {
        fn observe_insertions(&mut self) {
            self.observing = true;
        }

        fn disconnect_observer(&mut self) {
            self.observing = false;
        }

        fn set_timeout(&mut self, _delay: Duration) -> TimerId {
            self.next += 1;
            let id = TimerId(self.next);
            self.armed.push(id);
            id
        }

        fn clear_timeout(&mut self, timer: TimerId) {
            self.cleared.push(timer);
        }
    }

    fn window() -> Duration {
        Duration::from_millis(500)
    }

    #[test]
    fn burst_arms_one_timer() {
        let mut host = Recorder::default();
        let mut watcher = Watcher::start(&mut host, window());
        assert!(host.observing);

        for n in 0..1000u32 {
            watcher.record(&mut host, [n]);
        }
        assert_eq!(host.armed.len(), 1);
        assert_eq!(watcher.queued(), 1000);
    }

    #[test]
    fn empty_insertions_do_not_arm() {
        let mut host = Recorder::default();
        let mut watcher: Watcher<u32> = Watcher::start(&mut host, window());
        watcher.record(&mut host, []);
        assert!(!watcher.is_pending());
        assert!(host.armed.is_empty());
    }

    #[test]
    fn take_batch_drains_and_rearms_later() {
        let mut host = Recorder::default();
        let mut watcher = Watcher::start(&mut host, window());
        watcher.record(&mut host, [1, 2]);
        let timer = host.armed[0];

        assert_eq!(watcher.take_batch(timer), Some(vec![1, 2]));
        assert!(!watcher.is_pending());

        watcher.record(&mut host, [3]);
        assert_eq!(host.armed.len(), 2);
    }

    #[test]
    fn stale_timer_is_ignored() {
        let mut host = Recorder::default();
        let mut watcher = Watcher::start(&mut host, window());
        watcher.record(&mut host, [1]);
        assert_eq!(watcher.take_batch(TimerId(99)), None);
        assert_eq!(watcher.queued(), 1);
    }

    #[test]
    fn stop_cancels_pending_timer() {
        let mut host = Recorder::default();
        let mut watcher = Watcher::start(&mut host, window());
        watcher.record(&mut host, [1]);
        let timer = host.armed[0];

        watcher.stop(&mut host);
        assert_eq!(host.cleared, vec![timer]);
        assert!(!host.observing);
    }
}
