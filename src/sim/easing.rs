//! Easing curves for petal animation
//!
//! Pure stateless maps from normalized time to normalized progress. Every
//! function clamps its input to [0, 1] before evaluating, so callers can feed
//! raw (possibly overshooting) progress values.

use std::f32::consts::PI;

/// Cubic ease-out - fast start, slow finish
#[inline]
pub fn ease_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// Cubic ease-in-out
#[inline]
pub fn ease_in_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Elastic ease-out - overshoots and springs back like a real petal
pub fn ease_out_elastic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t == 0.0 {
        0.0
    } else if t == 1.0 {
        1.0
    } else {
        let c4 = (2.0 * PI) / 3.0;
        2.0_f32.powf(-10.0 * t) * ((t * 10.0 - 0.75) * c4).sin() + 1.0
    }
}

/// Back ease-out - slight overshoot past the target before settling
#[inline]
pub fn ease_out_back(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    const C1: f32 = 1.70158;
    const C3: f32 = C1 + 1.0;
    1.0 + C3 * (t - 1.0).powi(3) + C1 * (t - 1.0).powi(2)
}

/// Sine ease-in-out
#[inline]
pub fn ease_in_out_sine(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    -((PI * t).cos() - 1.0) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn test_endpoints() {
        for f in [
            ease_out_cubic,
            ease_in_out_cubic,
            ease_out_elastic,
            ease_out_back,
            ease_in_out_sine,
        ] {
            assert!(f(0.0).abs() < EPS);
            assert!((f(1.0) - 1.0).abs() < EPS);
        }
    }

    #[test]
    fn test_out_of_range_clamped() {
        assert!((ease_out_cubic(-3.0)).abs() < EPS);
        assert!((ease_out_cubic(7.0) - 1.0).abs() < EPS);
        assert!((ease_out_elastic(-0.5)).abs() < EPS);
        assert!((ease_out_back(2.0) - 1.0).abs() < EPS);
    }

    #[test]
    fn test_cubic_monotonic() {
        let mut prev = 0.0;
        for i in 1..=100 {
            let v = ease_out_cubic(i as f32 / 100.0);
            assert!(v >= prev);
            prev = v;
        }
    }

    proptest! {
        #[test]
        fn prop_cubic_in_unit_range(t in -2.0f32..3.0) {
            let v = ease_out_cubic(t);
            prop_assert!((0.0..=1.0).contains(&v));
            let v = ease_in_out_cubic(t);
            prop_assert!((0.0..=1.0).contains(&v));
            let v = ease_in_out_sine(t);
            prop_assert!((0.0..=1.0).contains(&v));
        }

        // Elastic and back overshoot by design, but stay bounded
        #[test]
        fn prop_overshoot_bounded(t in -2.0f32..3.0) {
            prop_assert!((-0.5..=1.5).contains(&ease_out_elastic(t)));
            prop_assert!((-0.5..=1.5).contains(&ease_out_back(t)));
        }
    }
}
