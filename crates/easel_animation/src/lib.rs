//! Easel Animation Engine
//!
//! Frame scheduling and property animation for a retained-mode 2D scene graph.
//!
//! # Features
//!
//! - **Scheduler**: one frame loop per application, running only while there
//!   are tick subscriptions or pending redraws
//! - **Tick Subscriptions**: priority-ordered periodic callbacks
//! - **Redraw Queue**: de-duplicated, stage-first invalidation of scene nodes
//! - **Animate**: tweened scalar and vector properties with easing and looping
//! - **AnimateQueue**: sequential playback of animations
//! - **Animated**: per-node `animate(...)` chaining over a lazily created queue
//!
//! # Example
//!
//! ```rust
//! use easel_animation::{Animate, AnimateConfig, Easing, Scheduler};
//! use easel_core::PropertyBag;
//! use easel_platform::ManualTimeSource;
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let source = Rc::new(ManualTimeSource::new());
//! let scheduler = Scheduler::new(source.clone());
//!
//! let target = Rc::new(RefCell::new(PropertyBag::new().with("alpha", 0.0)));
//! let fade = Animate::new(
//!     &scheduler.handle(),
//!     AnimateConfig::new(&target)
//!         .to("alpha", 1.0)
//!         .duration(0.25)
//!         .easing(Easing::QuadOut),
//! );
//! fade.play();
//!
//! for _ in 0..30 {
//!     source.advance(1000.0 / 60.0);
//! }
//! assert_eq!(target.borrow().scalar("alpha"), Some(1.0));
//! assert!(!scheduler.is_loop_enabled());
//! ```

pub mod animate;
pub mod config;
pub mod easing;
pub mod facet;
pub mod queue;
pub mod scheduler;
pub mod ticked;

pub use animate::{
    Animate, AnimateConfig, CompleteFn, CompletionListener, TargetRef, UpdateFn,
};
pub use config::{ConfigError, SchedulerConfig};
pub use easing::{Easing, ParseEasingError};
pub use facet::{AnimationFacet, Animated};
pub use queue::{AnimateQueue, QueueCompleteFn};
pub use scheduler::{FrameInfo, Scheduler, SchedulerHandle};
pub use ticked::{SubscriptionId, TickCallback, TickedSubscription};
