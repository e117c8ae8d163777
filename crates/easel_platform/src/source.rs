//! Time source trait

/// One-shot callback receiving the current time in milliseconds
pub type FrameCallback = Box<dyn FnOnce(f64)>;

/// Time source abstraction
///
/// Implemented by each host to give the scheduler a way to be called back
/// "soon". Hosts with a display refresh signal (vsync, `requestAnimationFrame`)
/// report [`supports_refresh`](TimeSource::supports_refresh); all others only
/// provide fixed-delay timers and the scheduler throttles itself on top of them.
pub trait TimeSource {
    /// Monotonic wall-clock time in milliseconds
    fn now_ms(&self) -> f64;

    /// Whether [`request_refresh`](TimeSource::request_refresh) is backed by a
    /// real per-refresh signal
    fn supports_refresh(&self) -> bool {
        false
    }

    /// Invoke `callback` once, at the next display refresh
    ///
    /// Hosts without a refresh signal fall back to an immediate timer.
    fn request_refresh(&self, callback: FrameCallback) {
        self.set_timeout(0.0, callback);
    }

    /// Invoke `callback` once, after at least `delay_ms` milliseconds
    fn set_timeout(&self, delay_ms: f64, callback: FrameCallback);
}
