//! Composition root
//!
//! One lifecycle controller, one petal ensemble, one particle system,
//! advanced strictly in that order by `tick()` so the ensemble and particles
//! always see the frame's finalized stage broadcast.

use glam::Vec2;

use super::color::Rgb;
use super::lifecycle::{LifecycleController, Stage};
use super::palette::{Season, SeasonColors};
use super::particle::{Particle, ParticleSystem};
use super::petal::PetalEnsemble;
use crate::config::{ConfigError, RoseConfig};
use crate::screen_center;

/// The glowing disc at the flower's heart. Eases toward a per-stage target
/// rather than snapping, so stage boundaries read smoothly.
#[derive(Debug, Clone)]
pub struct FlowerCenter {
    pub size: f32,
    pub glow: f32,
    pub pulse: f32,
}

impl FlowerCenter {
    fn new() -> Self {
        Self {
            size: 10.0,
            glow: 0.5,
            pulse: 0.0,
        }
    }

    fn update(&mut self, stage: Stage, stage_progress: f32) {
        let (target_size, target_glow) = match stage {
            Stage::Bloom => (20.0 * stage_progress, stage_progress),
            Stage::Maintain => {
                self.pulse += 0.2;
                (20.0, 1.0)
            }
            Stage::Wither => {
                let fade = 1.0 - stage_progress;
                (20.0 * fade, fade)
            }
            _ => (0.0, 0.0),
        };
        self.size += (target_size - self.size) * 0.1;
        self.glow += (target_glow - self.glow) * 0.1;
    }
}

/// The whole animated flower: drives the lifecycle, petals, particles, and
/// center glow one frame per `tick()`, and exposes read-only queries for a
/// rendering layer.
#[derive(Debug, Clone)]
pub struct RoseAnimator {
    lifecycle: LifecycleController,
    petals: PetalEnsemble,
    particles: ParticleSystem,
    center: FlowerCenter,
    center_pos: Vec2,
}

impl RoseAnimator {
    pub fn new(config: &RoseConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let center_pos = screen_center();
        let lifecycle = LifecycleController::new(config.stage_durations)?;
        let petals = PetalEnsemble::new(
            &config.layer_counts,
            config.seed,
            center_pos,
            config.fall_threshold,
        )?;
        // Decorrelated RNG stream for the particle system
        let particle_seed = config.seed.wrapping_mul(2654435761).wrapping_add(1);
        let particles = ParticleSystem::new(particle_seed, center_pos, config.max_particles);

        log::info!(
            "animator ready: {} petals, cycle {} frames, seed {}",
            petals.len(),
            config.stage_durations.total(),
            config.seed
        );

        let mut animator = Self {
            lifecycle,
            petals,
            particles,
            center: FlowerCenter::new(),
            center_pos,
        };
        // Petals observe frame 0 before the first external tick
        animator.broadcast();
        Ok(animator)
    }

    /// Advance the whole animation by one frame
    pub fn tick(&mut self) {
        self.lifecycle.tick();
        self.broadcast();
    }

    /// Skip ahead by replaying `frames` single ticks.
    ///
    /// Replay keeps the petal falling sub-state well defined across the jump:
    /// the falling-activation threshold and the Reset clearing rule are both
    /// evaluated at every intermediate frame, exactly as if the frames had
    /// played out normally.
    pub fn skip(&mut self, frames: u64) {
        log::info!("skipping {frames} frames (replay)");
        for _ in 0..frames {
            self.tick();
        }
    }

    fn broadcast(&mut self) {
        let stage = self.lifecycle.stage();
        let progress = self.lifecycle.stage_progress();
        let season = self.lifecycle.season();
        self.center.update(stage, progress);
        self.petals.update(stage, progress);
        self.particles
            .update(stage, progress, season, season.colors());
    }

    // Global per-frame queries

    pub fn frame_count(&self) -> u64 {
        self.lifecycle.frame_count()
    }

    pub fn stage(&self) -> Stage {
        self.lifecycle.stage()
    }

    pub fn season(&self) -> Season {
        self.lifecycle.season()
    }

    pub fn stage_progress(&self) -> f32 {
        self.lifecycle.stage_progress()
    }

    pub fn total_progress(&self) -> f32 {
        self.lifecycle.total_progress()
    }

    /// Ambient glow intensity for scene-wide lighting
    pub fn glow_intensity(&self) -> f32 {
        self.lifecycle.glow_intensity()
    }

    /// Reference colors for the current season
    pub fn palette(&self) -> &'static SeasonColors {
        self.lifecycle.season().colors()
    }

    /// Scene background color for the current season
    pub fn background(&self) -> Rgb {
        self.palette().background
    }

    pub fn flower_center(&self) -> &FlowerCenter {
        &self.center
    }

    pub fn center_pos(&self) -> Vec2 {
        self.center_pos
    }

    pub fn petals(&self) -> &PetalEnsemble {
        &self.petals
    }

    pub fn particles(&self) -> &[Particle] {
        self.particles.particles()
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }
}
