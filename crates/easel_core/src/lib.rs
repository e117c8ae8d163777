//! Easel Core
//!
//! Contracts shared between the Easel scheduling engine and the scene graph
//! that consumes it:
//!
//! - **Property Values**: scalar and 2-component vector values that animations
//!   interpolate
//! - **Animation Targets**: objects exposing named, writable numeric properties
//! - **Redraw Invalidation**: per-node dirty flags and the `Drawable` contract
//!   drained by the scheduler's redraw queue
//!
//! # Example
//!
//! ```rust
//! use easel_core::{AnimationTarget, PropertyBag, PropertyValue, Vec2};
//!
//! let mut bag = PropertyBag::new()
//!     .with("alpha", 1.0)
//!     .with("position", Vec2::new(10.0, 20.0));
//!
//! bag.set_property("alpha", PropertyValue::Scalar(0.5)).unwrap();
//! assert_eq!(bag.property("alpha"), Some(PropertyValue::Scalar(0.5)));
//! ```

pub mod draw;
pub mod target;
pub mod value;

pub use draw::{DirtyFlag, Drawable};
pub use target::{AnimationTarget, PropertyBag};
pub use value::{PropertyError, PropertyKind, PropertyValue, Vec2};
