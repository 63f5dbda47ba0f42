//! Minimal kinematic host: integrates the vehicle, fills its goal sensor and
//! turns horizontal overlaps into contact messages.
//!
//! This stands in for a physics engine in headless runs and tests. A host
//! with real physics replaces these systems and keeps the rest of the stack.

use autopark_core::config::EpisodeConfig;
use autopark_core::geometry::{forward_from_yaw, heading, horizontal_distance, oriented_pose, overlaps};
use autopark_core::perception::{RayHit, RayScan};
use autopark_core::types::SurfaceTag;
use autopark_env::components::{ActorPose, ParkingGoal, RaySensor, Vehicle};
use autopark_env::contacts::TouchTracker;
use autopark_env::messages::{ContactMessage, EpisodeBegan};
use bevy::prelude::*;

use crate::lot::{Footprint, Surface};

// ---------------------------------------------------------------------------
// Components and resources
// ---------------------------------------------------------------------------

/// Speed along the vehicle's forward axis and turn rate, both per second.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct DriveCommand {
    pub speed: f32,
    /// Radians per second, positive turns from `+Z` towards `+X`.
    pub yaw_rate: f32,
}

/// Forward-facing sensor that reports the goal when its centre lies inside
/// a horizontal cone.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct ConeSensor {
    pub range: f32,
    /// Half opening angle in radians.
    pub half_angle: f32,
}

impl Default for ConeSensor {
    fn default() -> Self {
        Self {
            range: 25.0,
            half_angle: 60_f32.to_radians(),
        }
    }
}

impl ConeSensor {
    /// Single-ray scan from `origin` facing `forward` towards `target`.
    pub fn scan(&self, origin: Vec3, forward: Vec3, target: Vec3) -> RayScan {
        let distance = horizontal_distance(origin, target);
        let offset = target - origin;
        let bearing = (heading(offset) - heading(forward) + std::f32::consts::PI)
            .rem_euclid(std::f32::consts::TAU)
            - std::f32::consts::PI;
        let ray = if distance <= self.range && bearing.abs() <= self.half_angle {
            RayHit::hit(SurfaceTag::ParkingGoal, distance / self.range)
        } else {
            RayHit::miss()
        };
        RayScan::new(vec![ray])
    }
}

/// Vehicle overlaps seen on the previous frame.
#[derive(Resource, Debug, Default)]
pub struct ContactTracker(pub TouchTracker<Entity>);

// ---------------------------------------------------------------------------
// Systems
// ---------------------------------------------------------------------------

/// Advances every driven vehicle by one tick.
#[allow(clippy::needless_pass_by_value)]
pub fn integrate_drive_system(
    config: Res<EpisodeConfig>,
    mut vehicles: Query<(&mut ActorPose, &DriveCommand, &Footprint), With<Vehicle>>,
) {
    #[allow(clippy::cast_possible_truncation)]
    let dt = config.tick_seconds as f32;
    for (mut pose, drive, footprint) in &mut vehicles {
        let yaw = heading(pose.0.forward) + drive.yaw_rate * dt;
        let forward = forward_from_yaw(yaw);
        let velocity = forward * drive.speed;
        let position = pose.0.position + velocity * dt;
        pose.0 = oriented_pose(position, yaw, footprint.0).with_velocity(velocity);
    }
}

/// Refreshes each vehicle's [`RaySensor`] from its [`ConeSensor`].
pub fn scan_system(
    mut sensors: Query<(&ActorPose, &ConeSensor, &mut RaySensor), With<Vehicle>>,
    goals: Query<&ActorPose, With<ParkingGoal>>,
) {
    let Ok(goal) = goals.single() else {
        return;
    };
    let target = goal.0.bounds.center();
    for (pose, cone, mut sensor) in &mut sensors {
        sensor.0 = cone.scan(pose.0.position, pose.0.forward, target);
    }
}

/// Emits enter, stay and exit contacts for every tagged surface the vehicle
/// overlaps. The tracker is cleared when an episode begins so the new
/// episode starts from fresh enters.
pub fn detect_contacts_system(
    mut tracker: ResMut<ContactTracker>,
    mut began: MessageReader<EpisodeBegan>,
    mut contacts: MessageWriter<ContactMessage>,
    vehicles: Query<&ActorPose, With<Vehicle>>,
    surfaces: Query<(Entity, &ActorPose, &Surface), Without<Vehicle>>,
) {
    if began.read().count() > 0 {
        tracker.0.clear();
    }
    let Ok(vehicle) = vehicles.single() else {
        return;
    };
    let touching = surfaces
        .iter()
        .filter(|(_, pose, _)| overlaps(&vehicle.0.bounds, &pose.0.bounds))
        .map(|(entity, _, surface)| (entity, surface.0));
    for event in tracker.0.update(touching) {
        contacts.write(ContactMessage::from(event));
    }
}
