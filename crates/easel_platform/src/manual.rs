//! Hand-driven time source
//!
//! Time only moves when the host calls [`ManualTimeSource::advance`]. Tests use
//! it to step the scheduler frame by frame; embedders with their own frame
//! pump can forward their refresh signal through it.

use std::cell::Cell;

use crate::source::{FrameCallback, TimeSource};
use crate::timer::TimerQueue;

/// A [`TimeSource`] whose clock is advanced explicitly
pub struct ManualTimeSource {
    now_ms: Cell<f64>,
    refresh: bool,
    pending: TimerQueue,
}

impl ManualTimeSource {
    /// A source with refresh-callback support, clock starting at 0
    pub fn new() -> Self {
        Self {
            now_ms: Cell::new(0.0),
            refresh: true,
            pending: TimerQueue::default(),
        }
    }

    /// A source that only offers timers, like a host without a refresh signal
    pub fn timer_only() -> Self {
        Self {
            refresh: false,
            ..Self::new()
        }
    }

    /// Start the clock at `ms` instead of 0
    pub fn starting_at(self, ms: f64) -> Self {
        self.now_ms.set(ms);
        self
    }

    /// Move the clock forward by `ms` and fire every callback now due
    ///
    /// Each callback receives the new clock value. Callbacks requested while
    /// firing wait for the next call. Returns the number of callbacks fired.
    pub fn advance(&self, ms: f64) -> usize {
        let now = self.now_ms.get() + ms.max(0.0);
        self.now_ms.set(now);

        let due = self.pending.take_due(now);
        let fired = due.len();
        for callback in due {
            callback(now);
        }

        tracing::trace!(now, fired, "ManualTimeSource: advanced");
        fired
    }

    /// Number of callbacks waiting to fire
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn now(&self) -> f64 {
        self.now_ms.get()
    }
}

impl Default for ManualTimeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for ManualTimeSource {
    fn now_ms(&self) -> f64 {
        self.now_ms.get()
    }

    fn supports_refresh(&self) -> bool {
        self.refresh
    }

    fn request_refresh(&self, callback: FrameCallback) {
        if self.refresh {
            self.pending.push(self.now_ms.get(), callback);
        } else {
            self.set_timeout(0.0, callback);
        }
    }

    fn set_timeout(&self, delay_ms: f64, callback: FrameCallback) {
        self.pending
            .push(self.now_ms.get() + delay_ms.max(0.0), callback);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_refresh_fires_on_next_advance() {
        let source = ManualTimeSource::new();
        let hits = Rc::new(Cell::new(0));

        let h = hits.clone();
        source.request_refresh(Box::new(move |_| h.set(h.get() + 1)));
        assert_eq!(source.pending(), 1);

        assert_eq!(source.advance(1.0), 1);
        assert_eq!(hits.get(), 1);
        assert_eq!(source.advance(1.0), 0);
    }

    #[test]
    fn test_timeout_waits_for_delay() {
        let source = ManualTimeSource::timer_only().starting_at(100.0);
        let fired = Rc::new(RefCell::new(Vec::new()));

        let f = fired.clone();
        source.set_timeout(20.0, Box::new(move |now| f.borrow_mut().push(now)));

        source.advance(10.0);
        assert!(fired.borrow().is_empty());

        source.advance(10.0);
        assert_eq!(*fired.borrow(), vec![120.0]);
    }

    #[test]
    fn test_callbacks_requested_while_firing_wait() {
        let source = Rc::new(ManualTimeSource::new());
        let count = Rc::new(Cell::new(0));

        let s = source.clone();
        let c = count.clone();
        source.request_refresh(Box::new(move |_| {
            c.set(c.get() + 1);
            let c = c.clone();
            s.request_refresh(Box::new(move |_| c.set(c.get() + 1)));
        }));

        assert_eq!(source.advance(16.0), 1);
        assert_eq!(count.get(), 1);
        assert_eq!(source.advance(16.0), 1);
        assert_eq!(count.get(), 2);
    }
}
