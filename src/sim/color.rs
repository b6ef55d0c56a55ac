//! RGB color type and linear interpolation

use serde::{Deserialize, Serialize};

/// An 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Linear per-channel blend toward `other`. The parameter is clamped to
    /// [0, 1]; t=0 returns `self` exactly and t=1 returns `other` exactly.
    pub fn lerp(self, other: Rgb, t: f32) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let blend = |a: u8, b: u8| (a as f32 * (1.0 - t) + b as f32 * t) as u8;
        Rgb {
            r: blend(self.r, other.r),
            g: blend(self.g, other.g),
            b: blend(self.b, other.b),
        }
    }

    /// Halve every channel (used for the wither darkening ramp)
    pub const fn darkened(self) -> Rgb {
        Rgb {
            r: self.r / 2,
            g: self.g / 2,
            b: self.b / 2,
        }
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Rgb::new(r, g, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_lerp_endpoints_exact() {
        let a = Rgb::new(34, 79, 23);
        let b = Rgb::new(255, 182, 193);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
    }

    #[test]
    fn test_lerp_clamps_parameter() {
        let a = Rgb::new(10, 20, 30);
        let b = Rgb::new(200, 210, 220);
        assert_eq!(a.lerp(b, -1.0), a);
        assert_eq!(a.lerp(b, 2.5), b);
    }

    #[test]
    fn test_darkened() {
        assert_eq!(Rgb::new(255, 20, 147).darkened(), Rgb::new(127, 10, 73));
    }

    proptest! {
        #[test]
        fn prop_lerp_channels_between(
            (r1, g1, b1) in (0u8.., 0u8.., 0u8..),
            (r2, g2, b2) in (0u8.., 0u8.., 0u8..),
            t in 0.0f32..=1.0,
        ) {
            let a = Rgb::new(r1, g1, b1);
            let b = Rgb::new(r2, g2, b2);
            let m = a.lerp(b, t);
            for (lo, hi, v) in [
                (r1.min(r2), r1.max(r2), m.r),
                (g1.min(g2), g1.max(g2), m.g),
                (b1.min(b2), b1.max(b2), m.b),
            ] {
                prop_assert!(v >= lo && v <= hi);
            }
        }
    }
}
