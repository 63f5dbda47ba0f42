//! Pose fixtures and scene spawning for tests.
//!
//! The default bay is 3 m wide and 6 m long, centred on the origin and
//! facing `+Z`. The default car is 2 m wide and 4.5 m long.

use autopark_core::perception::{RayHit, RayScan};
use autopark_core::types::{Pose, SurfaceTag};
use autopark_env::components::{ActorPose, ParkingGoal, RaySensor, Vehicle};
use bevy::prelude::*;

pub const GOAL_HALF_EXTENTS: Vec3 = Vec3::new(1.5, 0.05, 3.0);
pub const CAR_HALF_EXTENTS: Vec3 = Vec3::new(1.0, 0.75, 2.25);

/// The parking bay at the origin.
pub fn goal_pose() -> Pose {
    Pose::new(Vec3::ZERO, Vec3::Z, GOAL_HALF_EXTENTS)
}

/// A stationary car at `(x, z)` facing `+Z`.
pub fn car_pose(x: f32, z: f32) -> Pose {
    Pose::new(Vec3::new(x, 0.5, z), Vec3::Z, CAR_HALF_EXTENTS)
}

/// One sensor with a single ray hitting the goal at `fraction`.
pub fn goal_scan(fraction: f32) -> RaySensor {
    RaySensor(RayScan::new(vec![RayHit::hit(SurfaceTag::ParkingGoal, fraction)]))
}

/// Spawn the default goal and a vehicle at `vehicle`. Returns the vehicle.
pub fn spawn_scene(app: &mut App, vehicle: Pose) -> Entity {
    app.world_mut().spawn((ParkingGoal, ActorPose(goal_pose())));
    app.world_mut().spawn((Vehicle, ActorPose(vehicle))).id()
}

/// Spawn a scene whose vehicle is beyond the default allowed distance, so
/// every tick ends the episode in failure.
pub fn spawn_far_scene(app: &mut App) -> Entity {
    spawn_scene(app, car_pose(0.0, -30.0))
}
