//! Deterministic animation module
//!
//! All animation logic lives here. This module must be pure and deterministic:
//! - Frame-stepped only (one `tick()` per render frame)
//! - Seeded RNG only, threaded explicitly through constructors
//! - Stable iteration order (petals in construction order)
//! - No rendering or platform dependencies
//!
//! Within one tick the three components advance strictly in order:
//! lifecycle controller, then petal ensemble, then particle system, so petals
//! and particles always observe a single finalized (stage, progress, season)
//! for the frame.

pub mod animator;
pub mod color;
pub mod easing;
pub mod lifecycle;
pub mod palette;
pub mod particle;
pub mod petal;

pub use animator::RoseAnimator;
pub use color::Rgb;
pub use easing::{
    ease_in_out_cubic, ease_in_out_sine, ease_out_back, ease_out_cubic, ease_out_elastic,
};
pub use lifecycle::{LifecycleController, Stage, StageDurations};
pub use palette::{Season, SeasonColors};
pub use particle::{Particle, ParticleKind, ParticleSystem};
pub use petal::{Petal, PetalEnsemble};
