//! Animatable property values
//!
//! A property is either a plain scalar or a 2-component vector (positions,
//! scales, offsets). The kind of a property is decided once, when an animation
//! is built, so interpolation never has to guess at update time.

use std::fmt;

use thiserror::Error;

/// 2D vector
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };
    pub const ONE: Vec2 = Vec2 { x: 1.0, y: 1.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<(f32, f32)> for Vec2 {
    fn from((x, y): (f32, f32)) -> Self {
        Self::new(x, y)
    }
}

/// Kind tag of a [`PropertyValue`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    Scalar,
    Vec2,
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyKind::Scalar => f.write_str("scalar"),
            PropertyKind::Vec2 => f.write_str("vec2"),
        }
    }
}

/// A value an animation can read from and write to a target
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PropertyValue {
    Scalar(f32),
    Vec2(Vec2),
}

impl PropertyValue {
    pub fn kind(&self) -> PropertyKind {
        match self {
            PropertyValue::Scalar(_) => PropertyKind::Scalar,
            PropertyValue::Vec2(_) => PropertyKind::Vec2,
        }
    }

    pub fn as_scalar(&self) -> Option<f32> {
        match self {
            PropertyValue::Scalar(v) => Some(*v),
            PropertyValue::Vec2(_) => None,
        }
    }

    pub fn as_vec2(&self) -> Option<Vec2> {
        match self {
            PropertyValue::Vec2(v) => Some(*v),
            PropertyValue::Scalar(_) => None,
        }
    }

    /// Apply `f(start, delta)` per component, pairing `self` (start) with `end`
    ///
    /// Returns `None` when the two values are of different kinds.
    pub fn combine(
        &self,
        end: &PropertyValue,
        mut f: impl FnMut(f32, f32) -> f32,
    ) -> Option<PropertyValue> {
        match (self, end) {
            (PropertyValue::Scalar(b), PropertyValue::Scalar(e)) => {
                Some(PropertyValue::Scalar(f(*b, e - b)))
            }
            (PropertyValue::Vec2(b), PropertyValue::Vec2(e)) => Some(PropertyValue::Vec2(
                Vec2::new(f(b.x, e.x - b.x), f(b.y, e.y - b.y)),
            )),
            _ => None,
        }
    }
}

impl From<f32> for PropertyValue {
    fn from(value: f32) -> Self {
        PropertyValue::Scalar(value)
    }
}

impl From<Vec2> for PropertyValue {
    fn from(value: Vec2) -> Self {
        PropertyValue::Vec2(value)
    }
}

/// Errors reported by an [`AnimationTarget`](crate::AnimationTarget) when a
/// property cannot be written
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PropertyError {
    /// The target has no property with this name
    #[error("unknown property `{0}`")]
    Unknown(String),

    /// The property exists but holds a different kind of value
    #[error("property `{name}` is a {expected}, got a {found}")]
    KindMismatch {
        name: String,
        expected: PropertyKind,
        found: PropertyKind,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combine_scalar() {
        let start = PropertyValue::Scalar(2.0);
        let end = PropertyValue::Scalar(6.0);
        let mid = start.combine(&end, |b, c| b + c * 0.5).unwrap();
        assert_eq!(mid, PropertyValue::Scalar(4.0));
    }

    #[test]
    fn test_combine_vec2_per_component() {
        let start = PropertyValue::Vec2(Vec2::new(0.0, 10.0));
        let end = PropertyValue::Vec2(Vec2::new(10.0, 0.0));
        let v = start.combine(&end, |b, c| b + c).unwrap();
        assert_eq!(v, PropertyValue::Vec2(Vec2::new(10.0, 0.0)));
    }

    #[test]
    fn test_combine_kind_mismatch() {
        let start = PropertyValue::Scalar(0.0);
        let end = PropertyValue::Vec2(Vec2::ONE);
        assert!(start.combine(&end, |b, _| b).is_none());
    }

    #[test]
    fn test_error_display() {
        let err = PropertyError::KindMismatch {
            name: "position".into(),
            expected: PropertyKind::Vec2,
            found: PropertyKind::Scalar,
        };
        assert_eq!(err.to_string(), "property `position` is a vec2, got a scalar");
    }
}
