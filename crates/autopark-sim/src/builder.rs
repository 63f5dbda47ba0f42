//! Scene builder for constructing a fully configured Bevy [`App`].
//!
//! [`SceneBuilder`] composes a parking lot from a [`SceneConfig`]: the goal
//! bay, the road, parked cars, the agent's vehicle, and the full plugin
//! stack.
//!
//! # Example
//!
//! ```no_run
//! use autopark_sim::SceneBuilder;
//!
//! let scene = SceneBuilder::new()
//!     .with_max_episode_steps(500)
//!     .build()
//!     .unwrap();
//! ```

use autopark_core::config::{EpisodeConfig, LotConfig, SceneConfig, SpawnConfig};
use autopark_core::error::ConfigError;
use autopark_core::geometry::oriented_pose;
use autopark_core::types::{Pose, SurfaceTag};
use autopark_env::components::{ActorPose, LotHome, ParkedCar, ParkingGoal, RaySensor, Vehicle};
use bevy::prelude::*;

use crate::AutoparkSimPlugin;
use crate::drive::{ConeSensor, DriveCommand};
use crate::lot::{Footprint, Surface};

/// Half height given to flat surfaces (goal bay and road).
const SURFACE_HALF_HEIGHT: f32 = 0.05;

// ---------------------------------------------------------------------------
// SpawnedScene
// ---------------------------------------------------------------------------

/// Result of building a scene: the Bevy app plus handles to its actors.
pub struct SpawnedScene {
    pub app: App,
    pub vehicle: Entity,
    pub goal: Entity,
    pub road: Entity,
    pub parked_cars: Vec<Entity>,
}

impl SpawnedScene {
    /// Current pose of the vehicle.
    pub fn vehicle_pose(&self) -> Option<Pose> {
        self.app.world().get::<ActorPose>(self.vehicle).map(|p| p.0)
    }

    /// Set the vehicle's drive command for the following frames.
    pub fn drive(&mut self, command: DriveCommand) {
        if let Some(mut drive) = self.app.world_mut().get_mut::<DriveCommand>(self.vehicle) {
            *drive = command;
        }
    }
}

// ---------------------------------------------------------------------------
// SceneBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for a complete parking simulation.
pub struct SceneBuilder {
    scene: Option<SceneConfig>,
    episode_config: Option<EpisodeConfig>,
    spawn_config: Option<SpawnConfig>,
}

impl Default for SceneBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneBuilder {
    /// Create a new scene builder with the default lot.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            scene: None,
            episode_config: None,
            spawn_config: None,
        }
    }

    /// Start from a loaded scene file. Later `with_*` calls override its
    /// episode and spawn sections.
    #[must_use]
    pub fn with_scene(mut self, scene: SceneConfig) -> Self {
        self.scene = Some(scene);
        self
    }

    /// Set the episode configuration.
    #[must_use]
    pub fn with_episode_config(mut self, config: EpisodeConfig) -> Self {
        self.episode_config = Some(config);
        self
    }

    /// Set the spawn configuration.
    #[must_use]
    pub fn with_spawn_config(mut self, config: SpawnConfig) -> Self {
        self.spawn_config = Some(config);
        self
    }

    /// Set the maximum episode steps (convenience for common case).
    #[must_use]
    pub fn with_max_episode_steps(mut self, max_steps: u32) -> Self {
        let base = self
            .episode_config
            .take()
            .or_else(|| self.scene.as_ref().map(|s| s.episode.clone()))
            .unwrap_or_default();
        self.episode_config = Some(base.with_max_steps(max_steps));
        self
    }

    /// Resolved scene after overrides.
    fn resolve(self) -> SceneConfig {
        let mut scene = self.scene.unwrap_or_default();
        if let Some(episode) = self.episode_config {
            scene.episode = episode;
        }
        if let Some(spawn) = self.spawn_config {
            scene.spawn = spawn;
        }
        scene
    }

    /// Build the Bevy [`App`] with all plugins and spawned actors.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the resolved scene fails validation.
    pub fn build(self) -> Result<SpawnedScene, ConfigError> {
        self.build_with(|_| {})
    }

    /// Like [`build`](Self::build), running `setup` after the simulation
    /// plugins are added and before plugin setup is finalized. Extra
    /// plugins must be added here.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the resolved scene fails validation.
    pub fn build_with(self, setup: impl FnOnce(&mut App)) -> Result<SpawnedScene, ConfigError> {
        let scene = self.resolve();
        scene.validate()?;

        let mut app = App::new();
        // Inserted before the plugins so the engine is built from them.
        app.insert_resource(scene.episode.clone());
        app.insert_resource(scene.spawn.clone());
        app.add_plugins(AutoparkSimPlugin);
        setup(&mut app);

        // Finalize plugin setup before spawning entities.
        app.finish();
        app.cleanup();

        let lot = &scene.lot;
        let world = app.world_mut();

        let goal_pose = goal_pose(lot);
        let goal = world
            .spawn((
                ParkingGoal,
                Surface(SurfaceTag::ParkingGoal),
                ActorPose(goal_pose),
                LotHome(goal_pose),
            ))
            .id();

        let road = world
            .spawn((Surface(SurfaceTag::Road), ActorPose(road_pose(lot))))
            .id();

        let car_half = Vec3::from_array(lot.vehicle_half_extents());
        let parked_cars = lot
            .parked_cars
            .iter()
            .map(|car| {
                let pose = oriented_pose(
                    Vec3::from_array(car.position),
                    car.heading_deg.to_radians(),
                    car_half,
                );
                world
                    .spawn((ParkedCar, Surface(SurfaceTag::ParkedCar), ActorPose(pose), LotHome(pose)))
                    .id()
            })
            .collect();

        let start = oriented_pose(
            Vec3::from_array(scene.spawn.start_position),
            scene.spawn.start_heading_deg.to_radians(),
            car_half,
        );
        let vehicle = world
            .spawn((
                Vehicle,
                ActorPose(start),
                Footprint(car_half),
                DriveCommand::default(),
                ConeSensor::default(),
                RaySensor::default(),
            ))
            .id();

        Ok(SpawnedScene {
            app,
            vehicle,
            goal,
            road,
            parked_cars,
        })
    }
}

fn goal_pose(lot: &LotConfig) -> Pose {
    let goal = &lot.goal;
    oriented_pose(
        Vec3::from_array(goal.position),
        goal.heading_deg.to_radians(),
        Vec3::new(goal.size[0] / 2.0, SURFACE_HALF_HEIGHT, goal.size[1] / 2.0),
    )
}

fn road_pose(lot: &LotConfig) -> Pose {
    let road = &lot.road;
    Pose::new(
        Vec3::new(road.center[0], 0.0, road.center[1]),
        Vec3::Z,
        Vec3::new(road.size[0] / 2.0, SURFACE_HALF_HEIGHT, road.size[1] / 2.0),
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
