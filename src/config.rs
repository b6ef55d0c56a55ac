//! Animation configuration
//!
//! Persisted as JSON next to the binary. Everything tunable about the
//! animation lives here; the defaults reproduce the canonical flower.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts;
use crate::sim::StageDurations;

/// Configuration errors, all surfaced at construction/load time
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("stage duration table sums to zero frames")]
    EmptyCycle,
    #[error("petal layer table is empty")]
    NoLayers,
    #[error("petal layer {0} has zero petals")]
    EmptyLayer(usize),
    #[error("fall threshold {0} is outside [0, 1)")]
    InvalidFallThreshold(f32),
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Tunable animation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoseConfig {
    /// Seed for all petal jitter and particle spawning
    pub seed: u64,
    /// Frames per lifecycle stage
    pub stage_durations: StageDurations,
    /// Petals per layer, innermost first
    pub layer_counts: Vec<u32>,
    /// Wither progress at which a petal detaches and starts falling
    pub fall_threshold: f32,
    /// Global live-particle cap
    pub max_particles: usize,
    /// Frame rate the driver should target
    pub target_fps: u32,
}

impl Default for RoseConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            stage_durations: StageDurations::default(),
            layer_counts: vec![8, 12, 16, 20, 16, 12],
            fall_threshold: 0.3,
            max_particles: consts::MAX_PARTICLES,
            target_fps: consts::TARGET_FPS,
        }
    }
}

impl RoseConfig {
    /// Fail fast on anything that would later divide by zero or degenerate
    /// the petal layout
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.stage_durations.validate()?;
        if self.layer_counts.is_empty() {
            return Err(ConfigError::NoLayers);
        }
        if let Some(layer) = self.layer_counts.iter().position(|&c| c == 0) {
            return Err(ConfigError::EmptyLayer(layer));
        }
        if !(0.0..1.0).contains(&self.fall_threshold) {
            return Err(ConfigError::InvalidFallThreshold(self.fall_threshold));
        }
        Ok(())
    }

    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file, falling back to defaults when it is missing or
    /// malformed
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => {
                log::info!("loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("using default config ({e})");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let data = serde_json::to_string_pretty(self)?;
        fs::write(path, data)?;
        Ok(())
    }

    /// Total petal count across all layers
    pub fn petal_count(&self) -> u32 {
        self.layer_counts.iter().sum()
    }
}
