//! autopark-core: types, geometry, reward curves, config, time and errors for
//! the autonomous parking environment.

pub mod config;
pub mod error;
pub mod geometry;
pub mod perception;
pub mod rewards;
pub mod seed;
pub mod time;
pub mod types;

use bevy::prelude::*;

// ---------------------------------------------------------------------------
// AutoparkSet
// ---------------------------------------------------------------------------

/// Per-frame phases of the parking environment, chained in `Update`.
///
/// All contact notifications for a frame are applied in [`Contacts`] before
/// the tick is evaluated in [`Evaluate`].
///
/// [`Contacts`]: AutoparkSet::Contacts
/// [`Evaluate`]: AutoparkSet::Evaluate
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AutoparkSet {
    /// Episode begin: state reset, reposition, lot reset.
    Begin,
    /// Collision enter/stay/exit classification.
    Contacts,
    /// Decision-rate penalties (time, offroad).
    Decide,
    /// Physics-rate reward shaping and termination.
    Evaluate,
    /// Episode end handling and auto-reset.
    Reset,
}

// ---------------------------------------------------------------------------
// AutoparkCorePlugin
// ---------------------------------------------------------------------------

/// Registers the [`AutoparkSet`] ordering and the default [`EpisodeConfig`].
///
/// [`EpisodeConfig`]: config::EpisodeConfig
pub struct AutoparkCorePlugin;

impl Plugin for AutoparkCorePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<config::EpisodeConfig>()
            .configure_sets(
                Update,
                (
                    AutoparkSet::Begin,
                    AutoparkSet::Contacts,
                    AutoparkSet::Decide,
                    AutoparkSet::Evaluate,
                    AutoparkSet::Reset,
                )
                    .chain(),
            );
    }
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        AutoparkCorePlugin, AutoparkSet,
        config::{EpisodeConfig, LotConfig, PenaltyConfig, RewardConfig, SceneConfig, SpawnConfig},
        error::{AutoparkError, ConfigError, SimError},
        geometry::{goal_distance, goal_heading_delta, is_within_goal},
        perception::{GoalPerception, RayHit, RayScan},
        rewards::RewardTerm,
        seed::SeedHierarchy,
        time::SimTime,
        types::{Aabb, ContactEvent, ContactPhase, Observation, Outcome, Pose, ResultMarker, SurfaceTag},
    };
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
