//! Start pose planning for each episode.

use autopark_core::config::SpawnConfig;
use autopark_core::geometry::forward_from_yaw;
use autopark_core::seed::SeedHierarchy;
use bevy::math::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Command for the physics layer: teleport the vehicle and optionally stop it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Reposition {
    pub position: Vec3,
    /// Yaw in radians, `atan2(x, z)` convention.
    pub heading: f32,
    pub zero_velocity: bool,
}

impl Reposition {
    /// Unit forward vector of the target heading.
    pub fn forward(&self) -> Vec3 {
        forward_from_yaw(self.heading)
    }
}

// ---------------------------------------------------------------------------
// SpawnPlanner
// ---------------------------------------------------------------------------

/// Chooses the vehicle start pose for every episode.
///
/// The per-episode RNG is derived from the configured seed, the environment
/// index and the episode number, so a given episode always spawns in the
/// same place.
#[derive(Clone, Debug)]
pub struct SpawnPlanner {
    config: SpawnConfig,
    seeds: SeedHierarchy,
}

impl SpawnPlanner {
    pub const fn new(config: SpawnConfig) -> Self {
        let seeds = SeedHierarchy::new(config.seed);
        Self { config, seeds }
    }

    pub const fn config(&self) -> &SpawnConfig {
        &self.config
    }

    /// Plan the start pose for `episode_number`.
    pub fn plan(&self, episode_number: u64) -> Reposition {
        let cfg = &self.config;
        let mut rng = self.seeds.episode_rng(cfg.env_index, episode_number);
        let start = Vec3::from_array(cfg.start_position);

        if !cfg.random_position {
            return Reposition {
                position: start,
                heading: cfg.start_heading_deg.to_radians(),
                zero_velocity: true,
            };
        }

        let mut position = start;
        if cfg.random_x {
            position.x = rng.gen_range(cfg.region_min[0]..cfg.region_max[0]);
        }
        if cfg.random_z {
            position.z = rng.gen_range(cfg.region_min[1]..cfg.region_max[1]);
        }

        let heading_deg = if cfg.random_heading {
            rng.gen_range(0.0_f32..360.0)
        } else if cfg.flip_direction {
            if rng.gen_bool(0.5) { 180.0 } else { 0.0 }
        } else {
            cfg.start_heading_deg
        };

        Reposition {
            position,
            heading: heading_deg.to_radians(),
            zero_velocity: true,
        }
    }
}

impl Default for SpawnPlanner {
    fn default() -> Self {
        Self::new(SpawnConfig::default())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
