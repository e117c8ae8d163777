//! Redraw invalidation contract
//!
//! Drawable nodes own a [`DirtyFlag`]. The scheduler sets it when the node is
//! queued for redraw and clears it when the queue is drained, which is what
//! keeps a node from being queued twice between two drains.

use std::cell::Cell;

/// Per-node "pending redraw" marker
#[derive(Debug, Default)]
pub struct DirtyFlag(Cell<bool>);

impl DirtyFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the flag, returning `true` if it was previously clear
    pub fn mark(&self) -> bool {
        !self.0.replace(true)
    }

    pub fn clear(&self) {
        self.0.set(false);
    }

    pub fn is_set(&self) -> bool {
        self.0.get()
    }
}

/// A node the scheduler can redraw
///
/// Each node draws only itself, so the order nodes are drained in does not
/// change the rendered result.
pub trait Drawable {
    /// The node's pending-redraw marker
    fn redraw_flag(&self) -> &DirtyFlag;

    /// Whether this node is the root of its scene (drained first)
    fn is_stage(&self) -> bool {
        false
    }

    /// Whether the node is still part of a scene and may be drawn
    ///
    /// A node can be detached between being queued and the queue draining;
    /// detached nodes are dropped from the drain without drawing.
    fn is_attached(&self) -> bool {
        true
    }

    fn draw(&self);
}
