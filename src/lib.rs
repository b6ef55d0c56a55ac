//! Rose Cycle - A procedural seasonal rose animation engine
//!
//! Core modules:
//! - `sim`: Deterministic animation core (lifecycle, petals, particles)
//! - `config`: Data-driven animation configuration (JSON)
//! - `facts`: Static real-world seasonal rose data for overlays
//!
//! The engine is purely computational: an external driver calls
//! [`sim::RoseAnimator::tick`] once per render frame and reads geometry and
//! color back out. No pixel I/O happens here.

pub mod config;
pub mod facts;
pub mod sim;

pub use config::{ConfigError, RoseConfig};
pub use sim::RoseAnimator;

use glam::Vec2;

/// Animation constants shared by the core and its drivers
pub mod consts {
    /// Target frame rate the stage duration tables are authored against
    pub const TARGET_FPS: u32 = 60;

    /// Logical canvas dimensions (the core is resolution-agnostic apart from
    /// weather spawn edges and the off-screen cull margin)
    pub const SCREEN_WIDTH: f32 = 1200.0;
    pub const SCREEN_HEIGHT: f32 = 800.0;

    /// Particles falling below `SCREEN_HEIGHT + OFFSCREEN_MARGIN` are culled
    pub const OFFSCREEN_MARGIN: f32 = 100.0;

    /// Global live-particle population cap
    pub const MAX_PARTICLES: usize = 120;

    /// Particles smaller than this are considered dead
    pub const MIN_PARTICLE_SIZE: f32 = 0.1;
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Logical canvas center, where the flower sits
#[inline]
pub fn screen_center() -> Vec2 {
    Vec2::new(consts::SCREEN_WIDTH / 2.0, consts::SCREEN_HEIGHT / 2.0)
}
