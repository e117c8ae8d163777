//! Pending callback storage shared by the bundled time sources

use std::cell::{Cell, RefCell};

use crate::source::FrameCallback;

struct Pending {
    due_ms: f64,
    seq: u64,
    callback: FrameCallback,
}

/// Callbacks ordered by due time, then by request order
#[derive(Default)]
pub(crate) struct TimerQueue {
    entries: RefCell<Vec<Pending>>,
    next_seq: Cell<u64>,
}

impl TimerQueue {
    pub(crate) fn push(&self, due_ms: f64, callback: FrameCallback) {
        let seq = self.next_seq.get();
        self.next_seq.set(seq + 1);
        self.entries.borrow_mut().push(Pending {
            due_ms,
            seq,
            callback,
        });
    }

    /// Remove and return every callback due at `now_ms`, in firing order
    ///
    /// The queue is not borrowed once this returns, so the callbacks are free
    /// to schedule more work.
    pub(crate) fn take_due(&self, now_ms: f64) -> Vec<FrameCallback> {
        let mut entries = self.entries.borrow_mut();
        let (mut due, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut *entries)
            .into_iter()
            .partition(|p| p.due_ms <= now_ms);
        *entries = rest;

        due.sort_by(|a, b| a.due_ms.total_cmp(&b.due_ms).then(a.seq.cmp(&b.seq)));
        due.into_iter().map(|p| p.callback).collect()
    }

    pub(crate) fn next_due(&self) -> Option<f64> {
        self.entries
            .borrow()
            .iter()
            .map(|p| p.due_ms)
            .min_by(|a, b| a.total_cmp(b))
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.borrow().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn test_take_due_orders_by_time_then_request() {
        let queue = TimerQueue::default();
        let order = Rc::new(RefCell::new(Vec::new()));

        for (due, tag) in [(5.0, "b"), (1.0, "a"), (5.0, "c"), (9.0, "late")] {
            let order = order.clone();
            queue.push(due, Box::new(move |_| order.borrow_mut().push(tag)));
        }

        for cb in queue.take_due(5.0) {
            cb(5.0);
        }

        assert_eq!(*order.borrow(), vec!["a", "b", "c"]);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.next_due(), Some(9.0));
    }
}
