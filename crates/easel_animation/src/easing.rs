//! Easing functions
//!
//! An easing maps normalized progress `t` in `[0, 1]`, a start value `b` and a
//! total change `c` to the current value. Every curve satisfies
//! `apply(0, b, c) == b` and `apply(1, b, c) == b + c`.
//!
//! ```
//! use easel_animation::Easing;
//!
//! assert_eq!(Easing::Linear.apply(0.5, 10.0, 20.0), 20.0);
//! assert_eq!("quad-in".parse::<Easing>().unwrap().apply(0.5, 0.0, 1.0), 0.25);
//! ```

use std::f32::consts::{FRAC_PI_2, PI};
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Easing curve
#[derive(Clone, Copy, Debug, Default)]
pub enum Easing {
    #[default]
    Linear,
    QuadIn,
    QuadOut,
    QuadInOut,
    SineIn,
    SineOut,
    SineInOut,
    CubicIn,
    CubicOut,
    CubicInOut,
    /// User-supplied `(t, b, c) -> value`
    Custom(fn(f32, f32, f32) -> f32),
}

impl Easing {
    /// Every built-in curve with its canonical name
    pub const NAMED: [(&'static str, Easing); 10] = [
        ("linear", Easing::Linear),
        ("quad-in", Easing::QuadIn),
        ("quad-out", Easing::QuadOut),
        ("quad-in-out", Easing::QuadInOut),
        ("sine-in", Easing::SineIn),
        ("sine-out", Easing::SineOut),
        ("sine-in-out", Easing::SineInOut),
        ("cubic-in", Easing::CubicIn),
        ("cubic-out", Easing::CubicOut),
        ("cubic-in-out", Easing::CubicInOut),
    ];

    /// Current value at progress `t` for start `b` and change `c`
    pub fn apply(&self, t: f32, b: f32, c: f32) -> f32 {
        match self {
            Easing::Linear => c * t + b,
            Easing::QuadIn => c * t * t + b,
            Easing::QuadOut => -c * t * (t - 2.0) + b,
            Easing::QuadInOut => {
                if t < 0.5 {
                    2.0 * c * t * t + b
                } else {
                    let u = 2.0 * t - 1.0;
                    -c / 2.0 * (u * (u - 2.0) - 1.0) + b
                }
            }
            Easing::SineIn => -c * (t * FRAC_PI_2).cos() + c + b,
            Easing::SineOut => c * (t * FRAC_PI_2).sin() + b,
            Easing::SineInOut => -c / 2.0 * ((PI * t).cos() - 1.0) + b,
            Easing::CubicIn => c * t * t * t + b,
            Easing::CubicOut => {
                let u = t - 1.0;
                c * (u * u * u + 1.0) + b
            }
            Easing::CubicInOut => {
                let u = 2.0 * t;
                if u < 1.0 {
                    c / 2.0 * u * u * u + b
                } else {
                    let u = u - 2.0;
                    c / 2.0 * (u * u * u + 2.0) + b
                }
            }
            Easing::Custom(f) => f(t, b, c),
        }
    }

    /// Canonical name, `None` for custom curves
    pub fn name(&self) -> Option<&'static str> {
        let index = match self {
            Easing::Linear => 0,
            Easing::QuadIn => 1,
            Easing::QuadOut => 2,
            Easing::QuadInOut => 3,
            Easing::SineIn => 4,
            Easing::SineOut => 5,
            Easing::SineInOut => 6,
            Easing::CubicIn => 7,
            Easing::CubicOut => 8,
            Easing::CubicInOut => 9,
            Easing::Custom(_) => return None,
        };
        Some(Self::NAMED[index].0)
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name().unwrap_or("custom"))
    }
}

/// Returned when parsing an unknown easing name
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown easing `{0}`")]
pub struct ParseEasingError(pub String);

impl FromStr for Easing {
    type Err = ParseEasingError;

    /// Accepts `quad-in`, `quad_in`, `quadIn`, `QuadIn`, ...
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();

        Self::NAMED
            .iter()
            .find(|(name, _)| name.replace('-', "") == wanted)
            .map(|(_, easing)| *easing)
            .ok_or_else(|| ParseEasingError(s.to_string()))
    }
}
