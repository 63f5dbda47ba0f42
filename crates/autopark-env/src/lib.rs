//! Episode lifecycle, reward engine and ECS integration for the autopark
//! parking environment.
//!
//! The engine itself ([`engine::ParkingEpisode`]) is plain Rust and can be
//! driven directly. [`ParkingEnvPlugin`] wires it into a Bevy app: the host
//! keeps [`components::ActorPose`] and [`components::RaySensor`] current and
//! writes contact and decision messages; the plugin answers with reposition
//! and episode-ended messages.
//!
//! # Example
//!
//! ```no_run
//! use bevy::prelude::*;
//! use autopark_env::prelude::*;
//!
//! App::new()
//!     .add_plugins(autopark_core::AutoparkCorePlugin)
//!     .add_plugins(ParkingEnvPlugin)
//!     .run();
//! ```

pub mod collision;
pub mod components;
pub mod contacts;
pub mod engine;
pub mod episode;
pub mod messages;
pub mod observation;
pub mod spawn;
pub mod systems;
pub mod telemetry;

use autopark_core::AutoparkSet;
use autopark_core::config::{EpisodeConfig, SpawnConfig};
use bevy::prelude::*;

use crate::engine::ParkingEpisode;
use crate::messages::{
    BeginEpisode, ContactMessage, DecisionStep, EpisodeBegan, EpisodeEnded, RepositionVehicle,
};
use crate::systems::{AgentObservation, LastTick, StepReward, TelemetrySnapshot};

// ---------------------------------------------------------------------------
// ParkingEnvPlugin
// ---------------------------------------------------------------------------

/// Bevy plugin running the parking episode.
///
/// Builds [`ParkingEpisode`] from the [`EpisodeConfig`] and [`SpawnConfig`]
/// resources present at build time (defaults otherwise) unless a
/// `ParkingEpisode` was inserted already. Requests the first episode at
/// startup.
pub struct ParkingEnvPlugin;

impl Plugin for ParkingEnvPlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<ParkingEpisode>() {
            let config = app
                .world()
                .get_resource::<EpisodeConfig>()
                .cloned()
                .unwrap_or_default();
            let spawn = app
                .world()
                .get_resource::<SpawnConfig>()
                .cloned()
                .unwrap_or_default();
            app.insert_resource(ParkingEpisode::new(config, spawn));
        }

        app.add_message::<ContactMessage>()
            .add_message::<DecisionStep>()
            .add_message::<BeginEpisode>()
            .add_message::<RepositionVehicle>()
            .add_message::<EpisodeBegan>()
            .add_message::<EpisodeEnded>()
            .init_resource::<StepReward>()
            .init_resource::<LastTick>()
            .init_resource::<AgentObservation>()
            .init_resource::<TelemetrySnapshot>()
            .add_systems(Startup, systems::request_first_episode)
            .add_systems(
                Update,
                systems::begin_episode_system.in_set(AutoparkSet::Begin),
            )
            .add_systems(Update, systems::contact_system.in_set(AutoparkSet::Contacts))
            .add_systems(
                Update,
                (systems::decision_penalty_system, systems::observe_system)
                    .in_set(AutoparkSet::Decide),
            )
            .add_systems(Update, systems::evaluate_system.in_set(AutoparkSet::Evaluate))
            .add_systems(
                Update,
                (systems::telemetry_system, systems::auto_reset_system)
                    .chain()
                    .in_set(AutoparkSet::Reset),
            );
    }
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        ParkingEnvPlugin,
        collision::{ContactEffect, classify},
        components::{ActorPose, LotHome, ParkedCar, ParkingGoal, RaySensor, Vehicle},
        contacts::TouchTracker,
        engine::{ParkingEpisode, RewardDelta},
        episode::{EpisodeFlags, EpisodeState, Latch},
        messages::{
            BeginEpisode, ContactMessage, DecisionStep, EpisodeBegan, EpisodeEnded,
            RepositionVehicle,
        },
        observation::{OBSERVATION_DIM, build_observation},
        spawn::{Reposition, SpawnPlanner},
        systems::{AgentObservation, LastTick, StepReward, TelemetrySnapshot},
        telemetry::Telemetry,
    };
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
