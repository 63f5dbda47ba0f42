//! Top-level Bevy plugin and host glue for the autopark parking lot.
//!
//! [`AutoparkSimPlugin`] is a convenience meta-plugin that adds the core and
//! environment plugins in one call, plus a kinematic stand-in for the
//! physics layer and episode statistics tracking.
//!
//! # Example
//!
//! ```no_run
//! use bevy::prelude::*;
//! use autopark_sim::AutoparkSimPlugin;
//!
//! App::new()
//!     .add_plugins(AutoparkSimPlugin)
//!     .run();
//! ```

pub mod builder;
pub mod drive;
pub mod lot;
pub mod stats;

#[cfg(test)]
mod integration;

use autopark_core::AutoparkSet;
use autopark_env::systems::begin_episode_system;
use bevy::prelude::*;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

pub use builder::{SceneBuilder, SpawnedScene};
pub use stats::EpisodeStats;

// ---------------------------------------------------------------------------
// AutoparkSimPlugin
// ---------------------------------------------------------------------------

/// Meta-plugin that adds the full autopark simulation stack.
///
/// Includes:
/// - [`AutoparkCorePlugin`](autopark_core::AutoparkCorePlugin): system ordering and `EpisodeConfig`
/// - [`ParkingEnvPlugin`](autopark_env::ParkingEnvPlugin): episode engine and messages
/// - reposition, lot reset, kinematic drive, goal sensor and contact
///   detection in the `Begin` phase, after the episode begins
/// - [`EpisodeStats`] resource and tracking system
pub struct AutoparkSimPlugin;

impl Plugin for AutoparkSimPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(autopark_core::AutoparkCorePlugin)
            .add_plugins(autopark_env::ParkingEnvPlugin)
            .init_resource::<EpisodeStats>()
            .init_resource::<drive::ContactTracker>()
            .add_systems(
                Update,
                (
                    lot::apply_reposition_system,
                    lot::reset_lot_system,
                    drive::integrate_drive_system,
                    drive::scan_system,
                    drive::detect_contacts_system,
                )
                    .chain()
                    .after(begin_episode_system)
                    .in_set(AutoparkSet::Begin),
            )
            .add_systems(
                Update,
                stats::episode_stats_system.in_set(AutoparkSet::Reset),
            );
    }
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        AutoparkSimPlugin, EpisodeStats, SceneBuilder, SpawnedScene,
        drive::{ConeSensor, ContactTracker, DriveCommand},
        lot::{Footprint, Surface},
    };
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
