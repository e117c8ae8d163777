//! Headless real-time loop
//!
//! [`RunLoop`] keeps a list of timers and, while running, sleeps the current
//! thread until the earliest one is due. By default it has no refresh signal,
//! which is the fixed-delay fallback path a scheduler takes on hosts without
//! vsync. [`RunLoop::with_refresh_rate`] adds a simulated display refresh.

use std::thread;
use std::time::{Duration, Instant};

use crate::source::{FrameCallback, TimeSource};
use crate::timer::TimerQueue;

/// [`TimeSource`] driven on the current thread
pub struct RunLoop {
    origin: Instant,
    timers: TimerQueue,
    refresh_period_ms: Option<f64>,
}

impl RunLoop {
    /// A timer-only loop
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            timers: TimerQueue::default(),
            refresh_period_ms: None,
        }
    }

    /// A loop whose refresh requests fire on the next boundary of a `hz`
    /// display clock
    ///
    /// Non-positive or non-finite rates give a timer-only loop.
    pub fn with_refresh_rate(hz: f64) -> Self {
        let refresh_period_ms = (hz.is_finite() && hz > 0.0).then(|| 1000.0 / hz);
        Self {
            refresh_period_ms,
            ..Self::new()
        }
    }

    /// Run timers until none are pending or `limit` has elapsed
    ///
    /// Returns the number of callbacks fired.
    pub fn run_until_idle(&self, limit: Duration) -> usize {
        self.run_until(limit, || false)
    }

    /// Run timers until `done` returns `true`, none are pending, or `limit`
    /// has elapsed
    ///
    /// `done` is checked after every batch of callbacks. Returns the number
    /// of callbacks fired.
    pub fn run_until(&self, limit: Duration, mut done: impl FnMut() -> bool) -> usize {
        let deadline = self.now_ms() + limit.as_secs_f64() * 1000.0;
        let mut fired = 0;

        while let Some(due) = self.timers.next_due() {
            if due > deadline {
                tracing::debug!(
                    pending = self.timers.len(),
                    "RunLoop: stopping at deadline with timers pending"
                );
                break;
            }

            let wait = due - self.now_ms();
            if wait > 0.0 {
                thread::sleep(Duration::from_secs_f64(wait / 1000.0));
            }

            let now = self.now_ms();
            for callback in self.timers.take_due(now) {
                callback(now);
                fired += 1;
            }

            if done() {
                break;
            }
        }

        fired
    }

    /// Run timers for exactly `duration`, sleeping through idle stretches
    pub fn run_for(&self, duration: Duration) -> usize {
        let start = Instant::now();
        let fired = self.run_until_idle(duration);

        if let Some(rest) = duration.checked_sub(start.elapsed()) {
            thread::sleep(rest);
        }
        fired
    }

    /// Number of timers waiting to fire
    pub fn pending(&self) -> usize {
        self.timers.len()
    }
}

impl Default for RunLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for RunLoop {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }

    fn supports_refresh(&self) -> bool {
        self.refresh_period_ms.is_some()
    }

    fn request_refresh(&self, callback: FrameCallback) {
        match self.refresh_period_ms {
            Some(period) => {
                let now = self.now_ms();
                let next = ((now / period).floor() + 1.0) * period;
                self.timers.push(next, callback);
            }
            None => self.set_timeout(0.0, callback),
        }
    }

    fn set_timeout(&self, delay_ms: f64, callback: FrameCallback) {
        self.timers.push(self.now_ms() + delay_ms.max(0.0), callback);
    }
}
