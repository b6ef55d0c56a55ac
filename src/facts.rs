//! Real-world rose growth data
//!
//! A static per-season reference table consumed read-only by drivers for
//! informational overlays. Not part of the animation core.

use crate::sim::Season;

/// Documented growth data for one season
#[derive(Debug, Clone, Copy)]
pub struct SeasonFacts {
    pub season_name: &'static str,
    pub months: &'static str,
    pub temperature_range: &'static str,
    /// Days of active blooming; zero during dormancy
    pub bloom_period_days: u32,
    pub growth_phase: &'static str,
    pub humidity: &'static str,
    pub sunlight_hours: &'static str,
    pub description: &'static str,
}

/// Look up the reference data for a season
pub fn for_season(season: Season) -> &'static SeasonFacts {
    match season {
        Season::Spring => &SPRING,
        Season::Summer => &SUMMER,
        Season::Autumn => &AUTUMN,
        Season::Winter => &WINTER,
    }
}

static SPRING: SeasonFacts = SeasonFacts {
    season_name: "Spring",
    months: "Mar-May",
    temperature_range: "15-25°C",
    bloom_period_days: 25,
    growth_phase: "Budding to Early Bloom",
    humidity: "60-70%",
    sunlight_hours: "6-8 hrs/day",
    description: "Rose budding, leaf development, bud formation, first blooming",
};

static SUMMER: SeasonFacts = SeasonFacts {
    season_name: "Summer",
    months: "Jun-Aug",
    temperature_range: "25-35°C",
    bloom_period_days: 40,
    growth_phase: "Peak Blooming",
    humidity: "70-80%",
    sunlight_hours: "8-10 hrs/day",
    description: "Rose enters peak blooming period, most abundant flowering",
};

static AUTUMN: SeasonFacts = SeasonFacts {
    season_name: "Autumn",
    months: "Sep-Nov",
    temperature_range: "10-20°C",
    bloom_period_days: 30,
    growth_phase: "Second Blooming",
    humidity: "50-60%",
    sunlight_hours: "5-7 hrs/day",
    description: "Rose second blooming period, more vivid flower colors",
};

static WINTER: SeasonFacts = SeasonFacts {
    season_name: "Winter",
    months: "Dec-Feb",
    temperature_range: "-5-10°C",
    bloom_period_days: 0,
    growth_phase: "Dormancy",
    humidity: "40-50%",
    sunlight_hours: "3-5 hrs/day",
    description: "Rose enters dormancy, preparing for next year's growth",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_season_has_facts() {
        for season in [Season::Spring, Season::Summer, Season::Autumn, Season::Winter] {
            let facts = for_season(season);
            assert!(!facts.months.is_empty());
            assert!(!facts.description.is_empty());
        }
        assert_eq!(for_season(Season::Winter).bloom_period_days, 0);
        assert_eq!(for_season(Season::Summer).growth_phase, "Peak Blooming");
    }
}
