//! Animation targets
//!
//! Anything with named numeric properties can be animated. Scene nodes
//! implement [`AnimationTarget`] over their own fields; [`PropertyBag`] is a
//! free-form implementation for loose state and tests.

use rustc_hash::FxHashMap;

use crate::value::{PropertyError, PropertyValue};

/// An object whose named properties can be read and written by animations
pub trait AnimationTarget {
    /// Current value of a property, `None` if the target does not define it
    fn property(&self, name: &str) -> Option<PropertyValue>;

    /// Write a property
    ///
    /// Targets with a fixed set of properties should return
    /// [`PropertyError::Unknown`] for names they do not have.
    fn set_property(&mut self, name: &str, value: PropertyValue) -> Result<(), PropertyError>;

    /// Invalidate whatever renders this target
    ///
    /// Called by shape-aware animations after every update. Targets that are
    /// not drawn keep the default no-op.
    fn mark_for_redraw(&mut self) {}
}

/// Dynamic property storage implementing [`AnimationTarget`]
///
/// Unknown names are created on write; writing a value of a different kind
/// over an existing property is rejected.
#[derive(Clone, Debug, Default)]
pub struct PropertyBag {
    values: FxHashMap<String, PropertyValue>,
    redraw_requests: u32,
}

impl PropertyBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<PropertyValue> {
        self.values.get(name).copied()
    }

    pub fn scalar(&self, name: &str) -> Option<f32> {
        self.get(name).and_then(|v| v.as_scalar())
    }

    /// Number of times [`AnimationTarget::mark_for_redraw`] was called
    pub fn redraw_requests(&self) -> u32 {
        self.redraw_requests
    }
}

impl AnimationTarget for PropertyBag {
    fn property(&self, name: &str) -> Option<PropertyValue> {
        self.get(name)
    }

    fn set_property(&mut self, name: &str, value: PropertyValue) -> Result<(), PropertyError> {
        match self.values.get_mut(name) {
            Some(existing) if existing.kind() != value.kind() => {
                Err(PropertyError::KindMismatch {
                    name: name.to_string(),
                    expected: existing.kind(),
                    found: value.kind(),
                })
            }
            Some(existing) => {
                *existing = value;
                Ok(())
            }
            None => {
                self.values.insert(name.to_string(), value);
                Ok(())
            }
        }
    }

    fn mark_for_redraw(&mut self) {
        self.redraw_requests += 1;
    }
}
