//! Seasonal color palettes
//!
//! Each season maps to a fixed set of five reference colors. The table is a
//! process-wide constant; petals and particles only ever read from it.

use serde::{Deserialize, Serialize};

use super::color::Rgb;

/// Display/palette category, derived one-to-one from the lifecycle stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Autumn => "autumn",
            Season::Winter => "winter",
        }
    }

    /// Reference colors for this season
    pub const fn colors(self) -> &'static SeasonColors {
        match self {
            Season::Spring => &SPRING,
            Season::Summer => &SUMMER,
            Season::Autumn => &AUTUMN,
            Season::Winter => &WINTER,
        }
    }
}

/// The five reference colors of one season
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeasonColors {
    /// Dark inner-petal base tone
    pub bud_deep: Rgb,
    /// Lighter outer-petal base tone
    pub bud_light: Rgb,
    /// Full-bloom petal color
    pub bloom: Rgb,
    /// Glow / highlight color
    pub glow: Rgb,
    /// Scene background
    pub background: Rgb,
}

const SPRING: SeasonColors = SeasonColors {
    bud_deep: Rgb::new(34, 79, 23),
    bud_light: Rgb::new(85, 107, 47),
    bloom: Rgb::new(255, 182, 193),
    glow: Rgb::new(255, 240, 245),
    background: Rgb::new(240, 255, 240),
};

const SUMMER: SeasonColors = SeasonColors {
    bud_deep: Rgb::new(139, 0, 0),
    bud_light: Rgb::new(165, 42, 42),
    bloom: Rgb::new(255, 20, 147),
    glow: Rgb::new(255, 105, 180),
    background: Rgb::new(255, 250, 240),
};

const AUTUMN: SeasonColors = SeasonColors {
    bud_deep: Rgb::new(139, 69, 19),
    bud_light: Rgb::new(160, 82, 45),
    bloom: Rgb::new(255, 140, 0),
    glow: Rgb::new(255, 215, 0),
    background: Rgb::new(255, 248, 220),
};

const WINTER: SeasonColors = SeasonColors {
    bud_deep: Rgb::new(105, 105, 105),
    bud_light: Rgb::new(128, 128, 128),
    bloom: Rgb::new(176, 196, 222),
    glow: Rgb::new(240, 248, 255),
    background: Rgb::new(240, 248, 255),
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_lookup() {
        assert_eq!(Season::Spring.colors().bloom, Rgb::new(255, 182, 193));
        assert_eq!(Season::Summer.colors().bud_deep, Rgb::new(139, 0, 0));
        assert_eq!(Season::Autumn.colors().glow, Rgb::new(255, 215, 0));
        assert_eq!(
            Season::Winter.colors().background,
            Season::Winter.colors().glow
        );
    }

    #[test]
    fn test_season_names() {
        assert_eq!(Season::Autumn.as_str(), "autumn");
    }
}
