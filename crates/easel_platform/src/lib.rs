//! Easel Platform Time Sources
//!
//! The scheduler never reads a clock or arms a timer itself. It talks to a
//! [`TimeSource`], which the host platform implements:
//!
//! - [`TimeSource`] - refresh callbacks, fixed-delay timers, wall-clock reads
//! - [`ManualTimeSource`] - a hand-driven clock for tests and deterministic hosts
//! - [`RunLoop`] - a headless loop running on the current thread, timer-only or
//!   with a simulated display refresh
//!
//! # Example
//!
//! ```rust
//! use easel_platform::{ManualTimeSource, TimeSource};
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let source = ManualTimeSource::new();
//! let fired_at = Rc::new(Cell::new(None));
//!
//! let slot = fired_at.clone();
//! source.request_refresh(Box::new(move |now| slot.set(Some(now))));
//!
//! source.advance(16.0);
//! assert_eq!(fired_at.get(), Some(16.0));
//! ```

mod manual;
mod run_loop;
mod source;
mod timer;

pub use manual::ManualTimeSource;
pub use run_loop::RunLoop;
pub use source::{FrameCallback, TimeSource};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::manual::ManualTimeSource;
    pub use crate::run_loop::RunLoop;
    pub use crate::source::{FrameCallback, TimeSource};
}
