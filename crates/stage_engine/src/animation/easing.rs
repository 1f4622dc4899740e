//! Easing curves
//!
//! Pure mappings from linear progress `t ∈ [0, 1]` to eased progress. Every
//! built-in curve maps `0 → 0` and `1 → 1` and stays inside `[0, 1]`.

use serde::{Serialize, Deserialize};

use crate::foundation::math::constants::{HALF_PI, PI};

/// Easing curve applied to animation progress
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum Easing {
    /// No easing
    #[default]
    Linear,
    /// Quadratic acceleration
    EaseInQuad,
    /// Quadratic deceleration
    EaseOutQuad,
    /// Quadratic acceleration then deceleration
    EaseInOutQuad,
    /// Cubic acceleration
    EaseInCubic,
    /// Cubic deceleration
    EaseOutCubic,
    /// Cubic acceleration then deceleration
    EaseInOutCubic,
    /// Quartic acceleration
    EaseInQuart,
    /// Quartic deceleration
    EaseOutQuart,
    /// Quartic acceleration then deceleration
    EaseInOutQuart,
    /// Quintic acceleration
    EaseInQuint,
    /// Quintic deceleration
    EaseOutQuint,
    /// Quintic acceleration then deceleration
    EaseInOutQuint,
    /// Sinusoidal acceleration
    EaseInSine,
    /// Sinusoidal deceleration
    EaseOutSine,
    /// Sinusoidal acceleration then deceleration
    EaseInOutSine,
    /// Exponential acceleration
    EaseInExpo,
    /// Exponential deceleration
    EaseOutExpo,
    /// Exponential acceleration then deceleration
    EaseInOutExpo,
    /// Circular acceleration
    EaseInCirc,
    /// Circular deceleration
    EaseOutCirc,
    /// Circular acceleration then deceleration
    EaseInOutCirc,
    /// Caller-supplied curve; not serializable
    #[serde(skip)]
    Custom(fn(f32) -> f32),
}

impl Easing {
    /// Apply the curve to `t`, which is clamped into `[0, 1]` first
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseInQuad => t * t,
            Self::EaseOutQuad => 1.0 - (1.0 - t).powi(2),
            Self::EaseInOutQuad => in_out(t, |t| t * t),
            Self::EaseInCubic => t.powi(3),
            Self::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Self::EaseInOutCubic => in_out(t, |t| t.powi(3)),
            Self::EaseInQuart => t.powi(4),
            Self::EaseOutQuart => 1.0 - (1.0 - t).powi(4),
            Self::EaseInOutQuart => in_out(t, |t| t.powi(4)),
            Self::EaseInQuint => t.powi(5),
            Self::EaseOutQuint => 1.0 - (1.0 - t).powi(5),
            Self::EaseInOutQuint => in_out(t, |t| t.powi(5)),
            Self::EaseInSine => 1.0 - (t * HALF_PI).cos(),
            Self::EaseOutSine => (t * HALF_PI).sin(),
            Self::EaseInOutSine => -((PI * t).cos() - 1.0) / 2.0,
            Self::EaseInExpo => ease_in_expo(t),
            Self::EaseOutExpo => 1.0 - ease_in_expo(1.0 - t),
            Self::EaseInOutExpo => in_out(t, ease_in_expo),
            Self::EaseInCirc => 1.0 - (1.0 - t * t).sqrt(),
            Self::EaseOutCirc => (1.0 - (t - 1.0).powi(2)).sqrt(),
            Self::EaseInOutCirc => in_out(t, |t| 1.0 - (1.0 - t * t).sqrt()),
            Self::Custom(curve) => curve(t),
        }
    }
}

/// Build a symmetric in-out curve from an ease-in curve
fn in_out(t: f32, ease_in: impl Fn(f32) -> f32) -> f32 {
    if t < 0.5 {
        ease_in(t * 2.0) / 2.0
    } else {
        1.0 - ease_in((1.0 - t) * 2.0) / 2.0
    }
}

fn ease_in_expo(t: f32) -> f32 {
    if t <= 0.0 {
        0.0
    } else {
        2.0_f32.powf(10.0 * t - 10.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const ALL: [Easing; 22] = [
        Easing::Linear,
        Easing::EaseInQuad, Easing::EaseOutQuad, Easing::EaseInOutQuad,
        Easing::EaseInCubic, Easing::EaseOutCubic, Easing::EaseInOutCubic,
        Easing::EaseInQuart, Easing::EaseOutQuart, Easing::EaseInOutQuart,
        Easing::EaseInQuint, Easing::EaseOutQuint, Easing::EaseInOutQuint,
        Easing::EaseInSine, Easing::EaseOutSine, Easing::EaseInOutSine,
        Easing::EaseInExpo, Easing::EaseOutExpo, Easing::EaseInOutExpo,
        Easing::EaseInCirc, Easing::EaseOutCirc, Easing::EaseInOutCirc,
    ];

    #[test]
    fn test_endpoints_are_fixed() {
        for easing in ALL {
            assert_relative_eq!(easing.apply(0.0), 0.0, epsilon = 1e-3);
            assert_relative_eq!(easing.apply(1.0), 1.0, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_curves_stay_in_unit_range() {
        for easing in ALL {
            for step in 0..=100 {
                let value = easing.apply(step as f32 / 100.0);
                assert!((-1e-6..=1.0 + 1e-6).contains(&value), "{easing:?} left [0,1]: {value}");
            }
        }
    }

    #[test]
    fn test_in_out_curves_pass_through_midpoint() {
        assert_relative_eq!(Easing::EaseInOutQuad.apply(0.5), 0.5, epsilon = 1e-6);
        assert_relative_eq!(Easing::EaseInOutCubic.apply(0.5), 0.5, epsilon = 1e-6);
        assert_relative_eq!(Easing::EaseInOutSine.apply(0.5), 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_input_is_clamped() {
        assert_relative_eq!(Easing::EaseInQuad.apply(2.0), 1.0);
        assert_relative_eq!(Easing::Custom(|t| t * 0.5).apply(-3.0), 0.0);
    }
}
