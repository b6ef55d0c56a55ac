//! Typed particle system
//!
//! A variable population of short-lived visual entities. Every frame the
//! system culls dead particles, advances survivors per their type's motion
//! rule, then applies the stage/season spawn policy under a global population
//! cap and per-type weather sub-caps.
//!
//! Liveness and decay are type-agnostic: `life` drops by the per-particle
//! decay rate every update and rendered size/alpha scale with the remaining
//! life fraction.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::color::Rgb;
use super::lifecycle::Stage;
use super::palette::{Season, SeasonColors};
use crate::consts::{MIN_PARTICLE_SIZE, OFFSCREEN_MARGIN, SCREEN_HEIGHT, SCREEN_WIDTH};

/// Weather population sub-caps, per season
const RAIN_CAP: usize = 15;
const LIGHT_ORB_CAP: usize = 12;
const WIND_STREAK_CAP: usize = 8;
const SNOW_CAP: usize = 20;

/// Frames between burst batches while late-bloom bursting is active
const BURST_INTERVAL: u32 = 30;

/// Particle type tag: selects motion, color, decay, and the draw routine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleKind {
    Sparkle,
    /// Not emitted by the built-in spawn policy; available to embedders
    /// through [`Particle::spawn`]
    Pollen,
    Glow,
    FallingPetal,
    Blossom,
    Firefly,
    Leaf,
    Snow,
    Rain,
    LightOrb,
    WindStreak,
    Magic,
}

/// Variant-specific motion payload. Only the kinds that need extra phase
/// state carry any; the variant always matches the particle's kind.
#[derive(Debug, Clone)]
enum PhaseState {
    None,
    /// Blossom flutter
    Flutter { phase: f32, speed: f32 },
    /// Firefly orbit around the spawn anchor, plus blink
    Orbit {
        angle: f32,
        speed: f32,
        radius: f32,
        blink_phase: f32,
        blink_speed: f32,
    },
    /// Leaf lateral swing and tumble
    Swing {
        swing_phase: f32,
        swing_speed: f32,
        flutter_phase: f32,
        flutter_speed: f32,
    },
    /// Snow drift
    Drift { phase: f32 },
}

/// A single short-lived visual entity
#[derive(Debug, Clone)]
pub struct Particle {
    pub kind: ParticleKind,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Spawn point; the orbit anchor for fireflies
    origin: Vec2,
    pub size: f32,
    pub max_size: f32,
    /// Remaining life in [0, 1]; strictly decreasing while alive
    pub life: f32,
    pub life_decay: f32,
    pub color: Rgb,
    pub rotation: f32,
    rotation_speed: f32,
    shimmer_phase: f32,
    pulse_speed: f32,
    phase: PhaseState,
}

impl Particle {
    /// Spawn one particle of `kind` at `pos`, drawing its velocity, size,
    /// decay, color, and phase state from the type's distributions.
    pub fn spawn(kind: ParticleKind, pos: Vec2, colors: &SeasonColors, rng: &mut Pcg32) -> Self {
        let radial = |rng: &mut Pcg32, lo: f32, hi: f32| {
            let angle = rng.random_range(0.0..TAU);
            let speed = rng.random_range(lo..hi);
            Vec2::new(angle.cos(), angle.sin()) * speed
        };

        let (vel, phase) = match kind {
            ParticleKind::Pollen => (radial(rng, 1.0, 4.0) - Vec2::new(0.0, 1.0), PhaseState::None),
            ParticleKind::Sparkle => (radial(rng, 3.0, 8.0), PhaseState::None),
            ParticleKind::Glow => (
                Vec2::new(rng.random_range(-0.5..0.5), rng.random_range(-2.0..0.0)),
                PhaseState::None,
            ),
            ParticleKind::FallingPetal => (
                Vec2::new(rng.random_range(-1.0..1.0), rng.random_range(1.0..3.0)),
                PhaseState::None,
            ),
            ParticleKind::Blossom => (
                radial(rng, 1.0, 3.0) - Vec2::new(0.0, 0.5),
                PhaseState::Flutter {
                    phase: rng.random_range(0.0..TAU),
                    speed: rng.random_range(0.1..0.4),
                },
            ),
            ParticleKind::Firefly => (
                Vec2::new(rng.random_range(-1.0..1.0), rng.random_range(-1.0..1.0)),
                PhaseState::Orbit {
                    angle: rng.random_range(0.0..TAU),
                    speed: rng.random_range(0.05..0.15),
                    radius: rng.random_range(10.0..30.0),
                    blink_phase: rng.random_range(0.0..TAU),
                    blink_speed: rng.random_range(0.2..0.5),
                },
            ),
            ParticleKind::Leaf => (
                Vec2::new(rng.random_range(-2.0..2.0), rng.random_range(1.0..4.0)),
                PhaseState::Swing {
                    swing_phase: rng.random_range(0.0..TAU),
                    swing_speed: rng.random_range(0.1..0.3),
                    flutter_phase: rng.random_range(0.0..TAU),
                    flutter_speed: rng.random_range(0.1..0.4),
                },
            ),
            ParticleKind::Snow => (
                Vec2::new(rng.random_range(-0.5..0.5), rng.random_range(0.5..2.0)),
                PhaseState::Drift {
                    phase: rng.random_range(0.0..TAU),
                },
            ),
            ParticleKind::Rain => (
                Vec2::new(rng.random_range(-0.5..0.5), rng.random_range(8.0..15.0)),
                PhaseState::None,
            ),
            ParticleKind::LightOrb => (radial(rng, 0.5, 2.0), PhaseState::None),
            ParticleKind::WindStreak => (
                Vec2::new(rng.random_range(3.0..8.0), rng.random_range(-1.0..1.0)),
                PhaseState::None,
            ),
            ParticleKind::Magic => (radial(rng, 2.0, 6.0), PhaseState::None),
        };

        let size = match kind {
            ParticleKind::Blossom | ParticleKind::Leaf => rng.random_range(3.0..8.0),
            ParticleKind::Firefly | ParticleKind::Snow => rng.random_range(2.0..5.0),
            ParticleKind::Rain => rng.random_range(1.0..3.0),
            ParticleKind::LightOrb => rng.random_range(5.0..12.0),
            ParticleKind::WindStreak => rng.random_range(1.0..2.0),
            _ => rng.random_range(1.0..5.0),
        };

        let life_decay = match kind {
            ParticleKind::Rain | ParticleKind::WindStreak => rng.random_range(0.02..0.05),
            ParticleKind::Firefly | ParticleKind::Snow => rng.random_range(0.003..0.008),
            ParticleKind::Blossom | ParticleKind::Leaf => rng.random_range(0.005..0.015),
            _ => rng.random_range(0.005..0.02),
        };

        let color = match kind {
            ParticleKind::Pollen | ParticleKind::Magic => colors.glow,
            ParticleKind::Sparkle => Rgb::new(255, 255, 255),
            ParticleKind::Glow => colors.bloom,
            ParticleKind::FallingPetal => colors.bud_light,
            ParticleKind::Blossom => Rgb::new(255, 182, 193),
            ParticleKind::Firefly => {
                if rng.random::<f32>() > 0.5 {
                    Rgb::new(255, 255, 140)
                } else {
                    Rgb::new(144, 238, 144)
                }
            }
            ParticleKind::Leaf => {
                const LEAF_COLORS: [Rgb; 4] = [
                    Rgb::new(255, 140, 0),
                    Rgb::new(255, 69, 0),
                    Rgb::new(218, 165, 32),
                    Rgb::new(139, 69, 19),
                ];
                LEAF_COLORS[rng.random_range(0..LEAF_COLORS.len())]
            }
            ParticleKind::Snow => Rgb::new(240, 248, 255),
            ParticleKind::Rain => Rgb::new(173, 216, 230),
            ParticleKind::LightOrb => Rgb::new(255, 255, 224),
            ParticleKind::WindStreak => Rgb::new(210, 180, 140),
        };

        Self {
            kind,
            pos,
            vel,
            origin: pos,
            size,
            max_size: size,
            life: 1.0,
            life_decay,
            color,
            rotation: 0.0,
            rotation_speed: rng.random_range(-0.1..0.1),
            shimmer_phase: rng.random_range(0.0..TAU),
            pulse_speed: rng.random_range(0.1..0.3),
            phase,
        }
    }

    /// Advance one frame: integrate position, apply the per-type motion rule,
    /// then the type-agnostic decay.
    pub fn update(&mut self, rng: &mut Pcg32) {
        self.pos += self.vel;

        match (self.kind, &mut self.phase) {
            (ParticleKind::Pollen, _) => {
                self.vel.y += 0.02;
                self.vel.x += (rng.random::<f32>() - 0.5) * 0.1;
            }
            (ParticleKind::Sparkle, _) => {
                self.vel.y += 0.1;
                self.vel *= 0.99;
            }
            (ParticleKind::FallingPetal, _) => {
                self.vel.y += 0.1;
                self.vel.x += (self.pos.y * 0.01).sin() * 0.1;
            }
            (ParticleKind::Glow, _) => {
                self.vel.y += 0.05;
            }
            (ParticleKind::Magic, _) => {
                self.rotation += self.rotation_speed;
            }
            (ParticleKind::Blossom, PhaseState::Flutter { phase, speed }) => {
                *phase += *speed;
                self.vel.y += 0.03;
                self.vel.x += phase.sin() * 0.2;
                self.vel.y += (*phase * 0.7).cos() * 0.1;
            }
            (
                ParticleKind::Firefly,
                PhaseState::Orbit {
                    angle,
                    speed,
                    radius,
                    blink_phase,
                    blink_speed,
                },
            ) => {
                *angle += *speed;
                let anchor = self.origin
                    + Vec2::new(angle.cos() * *radius, angle.sin() * *radius * 0.5);
                self.pos += (anchor - self.pos) * 0.1;
                *blink_phase += *blink_speed;
            }
            (
                ParticleKind::Leaf,
                PhaseState::Swing {
                    swing_phase,
                    swing_speed,
                    flutter_phase,
                    flutter_speed,
                },
            ) => {
                self.vel.y += 0.08;
                *swing_phase += *swing_speed;
                self.vel.x += swing_phase.sin() * 0.3;
                *flutter_phase += *flutter_speed;
                self.rotation += flutter_phase.sin() * 0.1;
            }
            (ParticleKind::Snow, PhaseState::Drift { phase }) => {
                self.vel.y += 0.02;
                *phase += 0.05;
                self.vel.x += phase.sin() * 0.05;
                self.rotation += 0.02;
            }
            (ParticleKind::Rain, _) => {
                self.vel.y += 0.2;
                self.vel.x *= 0.98;
            }
            (ParticleKind::LightOrb, _) => {
                self.vel *= 0.95;
                self.shimmer_phase += self.pulse_speed;
            }
            (ParticleKind::WindStreak, _) => {
                self.vel.x *= 0.98;
                self.vel.y += rng.random_range(-0.1..0.1);
                self.pos += Vec2::new(self.rotation.cos(), self.rotation.sin()) * 2.0;
            }
            // Payload is constructed alongside the kind; mismatches can't
            // happen through `spawn`
            _ => {}
        }

        self.life -= self.life_decay;
        self.size = self.max_size * self.life.max(0.0);
        self.shimmer_phase += self.pulse_speed;
        self.rotation += self.rotation_speed;
    }

    /// The liveness predicate: alive until life runs out, the particle
    /// shrinks away, or it leaves the screen past a generous margin
    pub fn is_alive(&self) -> bool {
        self.life > 0.0
            && self.size > MIN_PARTICLE_SIZE
            && self.pos.y < SCREEN_HEIGHT + OFFSCREEN_MARGIN
    }

    /// Render alpha, the remaining life fraction
    pub fn alpha(&self) -> f32 {
        self.life.clamp(0.0, 1.0)
    }

    /// Blink modulation for fireflies, shimmer for light orbs, 1.0 otherwise
    pub fn glow_modulation(&self) -> f32 {
        match &self.phase {
            PhaseState::Orbit { blink_phase, .. } => 0.5 + 0.5 * blink_phase.sin(),
            _ if self.kind == ParticleKind::LightOrb => 0.7 + 0.3 * self.shimmer_phase.sin(),
            _ => 1.0,
        }
    }
}

/// Owns and advances the live particle set
#[derive(Debug, Clone)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    rng: Pcg32,
    center: Vec2,
    max_particles: usize,
    burst_timer: u32,
}

impl ParticleSystem {
    pub fn new(seed: u64, center: Vec2, max_particles: usize) -> Self {
        Self {
            particles: Vec::with_capacity(max_particles),
            rng: Pcg32::seed_from_u64(seed),
            center,
            max_particles,
            burst_timer: 0,
        }
    }

    /// One frame: cull, advance survivors, then spawn per policy
    pub fn update(
        &mut self,
        stage: Stage,
        stage_progress: f32,
        season: Season,
        colors: &SeasonColors,
    ) {
        self.particles.retain(|p| p.is_alive());
        for particle in &mut self.particles {
            particle.update(&mut self.rng);
        }

        if self.particles.len() < self.max_particles {
            self.spawn_stage_particles(stage, season, colors);
            self.spawn_weather(season, colors);
        }

        // Late-bloom bursts run on their own clock, outside the cap
        if stage == Stage::Bloom && stage_progress > 0.8 {
            self.burst_timer += 1;
            if self.burst_timer.is_multiple_of(BURST_INTERVAL) {
                self.spawn_burst(season, colors);
            }
        }
    }

    /// Flower-local ambience conditioned on the lifecycle stage
    fn spawn_stage_particles(&mut self, stage: Stage, season: Season, colors: &SeasonColors) {
        match stage {
            Stage::Bloom if self.chance(0.18) => {
                let kind = *self.pick(&[ParticleKind::Sparkle, ParticleKind::Blossom]);
                let pos = self.center + self.jitter(30.0, 30.0);
                self.push(kind, pos, colors);
            }
            Stage::Maintain if self.chance(0.15) => {
                let kind = if season == Season::Summer {
                    *self.pick(&[
                        ParticleKind::Glow,
                        ParticleKind::Firefly,
                        ParticleKind::LightOrb,
                    ])
                } else {
                    ParticleKind::Glow
                };
                let pos = self.center + self.jitter(40.0, 40.0);
                self.push(kind, pos, colors);
            }
            Stage::Wither if self.chance(0.10) => {
                let kind = if season == Season::Autumn {
                    *self.pick(&[ParticleKind::FallingPetal, ParticleKind::Leaf])
                } else {
                    ParticleKind::FallingPetal
                };
                let pos = self.center + self.jitter(80.0, 60.0);
                self.push(kind, pos, colors);
            }
            _ => {}
        }
    }

    /// Low-probability ambient weather, independent of stage, each type
    /// bounded by its own sub-cap
    fn spawn_weather(&mut self, season: Season, colors: &SeasonColors) {
        match season {
            Season::Spring
                if self.chance(0.03) && self.count_of(ParticleKind::Rain) < RAIN_CAP =>
            {
                for _ in 0..self.rng.random_range(1..=4) {
                    let pos = Vec2::new(self.rng.random_range(0.0..SCREEN_WIDTH), -10.0);
                    self.push(ParticleKind::Rain, pos, colors);
                }
            }
            Season::Summer
                if self.chance(0.06) && self.count_of(ParticleKind::LightOrb) < LIGHT_ORB_CAP =>
            {
                let pos = Vec2::new(
                    self.rng.random_range(100.0..SCREEN_WIDTH - 100.0),
                    self.rng.random_range(100.0..SCREEN_HEIGHT - 100.0),
                );
                self.push(ParticleKind::LightOrb, pos, colors);
            }
            Season::Autumn
                if self.chance(0.04)
                    && self.count_of(ParticleKind::WindStreak) < WIND_STREAK_CAP =>
            {
                for _ in 0..self.rng.random_range(1..=3) {
                    let pos = Vec2::new(
                        -10.0,
                        self.rng
                            .random_range(SCREEN_HEIGHT / 3.0..2.0 * SCREEN_HEIGHT / 3.0),
                    );
                    self.push(ParticleKind::WindStreak, pos, colors);
                }
            }
            Season::Winter
                if self.chance(0.05) && self.count_of(ParticleKind::Snow) < SNOW_CAP =>
            {
                for _ in 0..self.rng.random_range(1..=4) {
                    let pos = Vec2::new(self.rng.random_range(0.0..SCREEN_WIDTH), -10.0);
                    self.push(ParticleKind::Snow, pos, colors);
                }
            }
            _ => {}
        }
    }

    /// Season-specific batch from the flower's center
    fn spawn_burst(&mut self, season: Season, colors: &SeasonColors) {
        log::debug!("particle burst ({})", season.as_str());
        match season {
            Season::Spring => {
                for _ in 0..7 {
                    self.push(ParticleKind::Blossom, self.center, colors);
                }
            }
            Season::Summer => {
                for _ in 0..6 {
                    let kind = *self.pick(&[ParticleKind::Firefly, ParticleKind::Magic]);
                    self.push(kind, self.center, colors);
                }
            }
            Season::Autumn => {
                for _ in 0..8 {
                    self.push(ParticleKind::Leaf, self.center, colors);
                }
            }
            Season::Winter => {
                for _ in 0..10 {
                    self.push(ParticleKind::Snow, self.center, colors);
                }
            }
        }
    }

    fn push(&mut self, kind: ParticleKind, pos: Vec2, colors: &SeasonColors) {
        self.particles
            .push(Particle::spawn(kind, pos, colors, &mut self.rng));
    }

    fn chance(&mut self, p: f32) -> bool {
        self.rng.random::<f32>() < p
    }

    fn pick<'a, T>(&mut self, options: &'a [T]) -> &'a T {
        &options[self.rng.random_range(0..options.len())]
    }

    fn jitter(&mut self, x: f32, y: f32) -> Vec2 {
        Vec2::new(self.rng.random_range(-x..x), self.rng.random_range(-y..y))
    }

    fn count_of(&self, kind: ParticleKind) -> usize {
        self.particles.iter().filter(|p| p.kind == kind).count()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}
