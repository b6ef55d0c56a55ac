//! Cyclic lifecycle state machine
//!
//! Owns the frame counter and the stage duration table. Stage, per-stage
//! progress, and season are a pure function of the counter, so an N-frame
//! jump and N sequential ticks agree on all of them. The ambient glow decay
//! is per-tick state; the animator's skip replays ticks, which keeps it (and
//! the petal falling state) well defined across jumps.

use serde::{Deserialize, Serialize};

use super::palette::Season;
use crate::config::ConfigError;

/// One of the six cyclic life phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    Bud,
    Bloom,
    Maintain,
    Wither,
    Dead,
    Reset,
}

impl Stage {
    /// All stages in cycle order
    pub const ALL: [Stage; 6] = [
        Stage::Bud,
        Stage::Bloom,
        Stage::Maintain,
        Stage::Wither,
        Stage::Dead,
        Stage::Reset,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Bud => "bud",
            Stage::Bloom => "bloom",
            Stage::Maintain => "maintain",
            Stage::Wither => "wither",
            Stage::Dead => "dead",
            Stage::Reset => "reset",
        }
    }

    /// The display season for this stage
    pub fn season(self) -> Season {
        match self {
            Stage::Bloom => Season::Spring,
            Stage::Maintain => Season::Summer,
            Stage::Wither => Season::Autumn,
            Stage::Bud | Stage::Dead | Stage::Reset => Season::Winter,
        }
    }
}

/// Per-stage durations in frames
///
/// A zero duration is legal and skips the stage entirely (the default table
/// skips Bud). The total must be positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageDurations {
    pub bud: u32,
    pub bloom: u32,
    pub maintain: u32,
    pub wither: u32,
    pub dead: u32,
    pub reset: u32,
}

impl Default for StageDurations {
    fn default() -> Self {
        Self {
            bud: 0,
            bloom: 120,
            maintain: 180,
            wither: 120,
            dead: 60,
            reset: 20,
        }
    }
}

impl StageDurations {
    /// Duration of a single stage
    pub fn of(&self, stage: Stage) -> u32 {
        match stage {
            Stage::Bud => self.bud,
            Stage::Bloom => self.bloom,
            Stage::Maintain => self.maintain,
            Stage::Wither => self.wither,
            Stage::Dead => self.dead,
            Stage::Reset => self.reset,
        }
    }

    /// Total cycle length in frames
    pub fn total(&self) -> u64 {
        Stage::ALL.iter().map(|&s| self.of(s) as u64).sum()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.total() == 0 {
            return Err(ConfigError::EmptyCycle);
        }
        Ok(())
    }

    /// Resolve a cycle position into (stage, stage_progress)
    ///
    /// Exactly one stage is active for any position in [0, total); stages
    /// with zero duration are never selected.
    fn stage_at(&self, cycle_position: u64) -> (Stage, f32) {
        let mut start = 0u64;
        for &stage in &Stage::ALL {
            let dur = self.of(stage) as u64;
            if cycle_position < start + dur {
                return (stage, (cycle_position - start) as f32 / dur as f32);
            }
            start += dur;
        }
        // Unreachable for cycle_position < total (validated at construction)
        (Stage::Reset, 0.0)
    }
}

/// Owns the frame counter and broadcasts (stage, progress, season) per frame
#[derive(Debug, Clone)]
pub struct LifecycleController {
    frame_count: u64,
    durations: StageDurations,
    stage: Stage,
    stage_progress: f32,
    season: Season,
    total_progress: f32,
    glow_intensity: f32,
}

impl LifecycleController {
    pub fn new(durations: StageDurations) -> Result<Self, ConfigError> {
        durations.validate()?;
        let mut controller = Self {
            frame_count: 0,
            durations,
            stage: Stage::Bud,
            stage_progress: 0.0,
            season: Season::Winter,
            total_progress: 0.0,
            glow_intensity: 0.0,
        };
        controller.recompute();
        Ok(controller)
    }

    /// Advance one frame
    pub fn tick(&mut self) {
        self.advance(1);
    }

    /// Advance `delta` frames at once
    pub fn advance(&mut self, delta: u64) {
        self.frame_count += delta;
        self.recompute();
        self.update_glow(delta);
    }

    fn recompute(&mut self) {
        let total = self.durations.total();
        let cycle_position = self.frame_count % total;
        self.total_progress = cycle_position as f32 / total as f32;
        let (stage, progress) = self.durations.stage_at(cycle_position);
        self.stage = stage;
        self.stage_progress = progress;
        self.season = stage.season();
    }

    /// Ambient glow: ramps through Bloom, breathes through Maintain, decays
    /// toward zero everywhere else.
    fn update_glow(&mut self, delta: u64) {
        self.glow_intensity = match self.stage {
            Stage::Bloom => self.stage_progress * 0.6,
            Stage::Maintain => 0.8 + 0.2 * (self.frame_count as f32 * 0.2).sin(),
            _ => (self.glow_intensity - 0.02 * delta as f32).max(0.0),
        };
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn durations(&self) -> &StageDurations {
        &self.durations
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Normalized position within the current stage, always in [0, 1)
    pub fn stage_progress(&self) -> f32 {
        self.stage_progress
    }

    pub fn season(&self) -> Season {
        self.season
    }

    /// Normalized position within the whole cycle, in [0, 1)
    pub fn total_progress(&self) -> f32 {
        self.total_progress
    }

    pub fn glow_intensity(&self) -> f32 {
        self.glow_intensity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_frame_zero_is_bloom_spring() {
        let c = LifecycleController::new(StageDurations::default()).unwrap();
        assert_eq!(c.stage(), Stage::Bloom);
        assert_eq!(c.stage_progress(), 0.0);
        assert_eq!(c.season(), Season::Spring);
    }

    #[test]
    fn test_stage_boundaries() {
        let mut c = LifecycleController::new(StageDurations::default()).unwrap();
        c.advance(119);
        assert_eq!(c.stage(), Stage::Bloom);
        assert!((c.stage_progress() - 119.0 / 120.0).abs() < 1e-4);

        c.advance(1);
        assert_eq!(c.stage(), Stage::Maintain);
        assert_eq!(c.stage_progress(), 0.0);
        assert_eq!(c.season(), Season::Summer);
    }

    #[test]
    fn test_cyclic_identity() {
        let durations = StageDurations::default();
        assert_eq!(durations.total(), 500);

        let mut c = LifecycleController::new(durations).unwrap();
        c.advance(durations.total());
        assert_eq!(c.stage(), Stage::Bloom);
        assert_eq!(c.stage_progress(), 0.0);
        assert_eq!(c.total_progress(), 0.0);
        assert_eq!(c.season(), Season::Spring);
    }

    #[test]
    fn test_jump_equals_sequential_for_stage_state() {
        let mut jumped = LifecycleController::new(StageDurations::default()).unwrap();
        let mut stepped = LifecycleController::new(StageDurations::default()).unwrap();

        jumped.advance(437);
        for _ in 0..437 {
            stepped.tick();
        }

        assert_eq!(jumped.stage(), stepped.stage());
        assert_eq!(jumped.season(), stepped.season());
        assert!((jumped.stage_progress() - stepped.stage_progress()).abs() < 1e-6);
    }

    #[test]
    fn test_empty_cycle_rejected() {
        let durations = StageDurations {
            bud: 0,
            bloom: 0,
            maintain: 0,
            wither: 0,
            dead: 0,
            reset: 0,
        };
        assert!(LifecycleController::new(durations).is_err());
    }

    #[test]
    fn test_glow_ramps_and_decays() {
        let mut c = LifecycleController::new(StageDurations::default()).unwrap();
        c.advance(60);
        assert!((c.glow_intensity() - 0.5 * 0.6).abs() < 1e-4);

        // Wither starts at frame 300; glow decays from there
        c.advance(240);
        assert_eq!(c.stage(), Stage::Wither);
        let g0 = c.glow_intensity();
        c.tick();
        assert!(c.glow_intensity() <= g0);

        // Deep into Dead the floor holds
        c.advance(150);
        assert_eq!(c.stage(), Stage::Dead);
        assert_eq!(c.glow_intensity(), 0.0);
    }

    proptest! {
        #[test]
        fn prop_exactly_one_stage_and_progress_in_range(
            frame in 0u64..100_000,
            bloom in 0u32..300,
            maintain in 1u32..300,
            wither in 0u32..300,
            dead in 0u32..100,
            reset in 0u32..50,
        ) {
            let durations = StageDurations {
                bud: 0,
                bloom,
                maintain,
                wither,
                dead,
                reset,
            };
            let mut c = LifecycleController::new(durations).unwrap();
            c.advance(frame);

            prop_assert!(c.stage_progress() >= 0.0 && c.stage_progress() < 1.0);
            prop_assert!(c.total_progress() >= 0.0 && c.total_progress() < 1.0);
            // The selected stage must have a nonzero duration
            prop_assert!(durations.of(c.stage()) > 0);

            // Cyclic identity
            let mut wrapped = LifecycleController::new(durations).unwrap();
            wrapped.advance(frame + durations.total());
            prop_assert_eq!(c.stage(), wrapped.stage());
            prop_assert!((c.stage_progress() - wrapped.stage_progress()).abs() < 1e-6);
        }
    }
}
