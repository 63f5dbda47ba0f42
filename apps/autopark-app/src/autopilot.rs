//! Scripted driver for headless runs: steers at the bay centre, slows on
//! approach and stops inside. Requests a decision every few frames the way
//! a learning agent would.

use autopark_core::geometry::{heading, horizontal_distance};
use autopark_env::components::{ActorPose, ParkingGoal, Vehicle};
use autopark_env::messages::DecisionStep;
use autopark_sim::drive::DriveCommand;
use bevy::prelude::*;

const MAX_SPEED: f32 = 4.0;
const SPEED_GAIN: f32 = 1.5;
const STEER_GAIN: f32 = 2.0;
const MAX_YAW_RATE: f32 = 1.5;
/// Closer than this the car holds still.
const STOP_RADIUS: f32 = 0.05;

/// Autopilot settings and frame counter.
#[derive(Resource, Debug, Clone)]
pub struct Autopilot {
    /// Frames between two decision steps.
    pub decision_interval: u32,
    frame: u32,
}

impl Autopilot {
    pub const fn new(decision_interval: u32) -> Self {
        Self {
            decision_interval,
            frame: 0,
        }
    }
}

/// Command that drives from `vehicle` towards `target`.
pub fn steer(vehicle: &ActorPose, target: Vec3) -> DriveCommand {
    let position = vehicle.0.position;
    let distance = horizontal_distance(position, target);
    if distance < STOP_RADIUS {
        return DriveCommand::default();
    }
    let error = (heading(target - position) - heading(vehicle.0.forward) + std::f32::consts::PI)
        .rem_euclid(std::f32::consts::TAU)
        - std::f32::consts::PI;
    // turn in place-ish when facing away, full speed only when lined up
    let lined_up = error.cos().max(0.0);
    DriveCommand {
        speed: (SPEED_GAIN * distance).min(MAX_SPEED) * lined_up,
        yaw_rate: (STEER_GAIN * error).clamp(-MAX_YAW_RATE, MAX_YAW_RATE),
    }
}

/// Sets the vehicle's drive command and paces decision steps.
pub fn autopilot_system(
    mut pilot: ResMut<Autopilot>,
    mut decisions: MessageWriter<DecisionStep>,
    mut vehicles: Query<(&ActorPose, &mut DriveCommand), With<Vehicle>>,
    goals: Query<&ActorPose, With<ParkingGoal>>,
) {
    let Ok(goal) = goals.single() else {
        return;
    };
    pilot.frame = pilot.frame.wrapping_add(1);
    if pilot.decision_interval > 0 && pilot.frame % pilot.decision_interval == 0 {
        decisions.write(DecisionStep);
    }
    let target = goal.0.bounds.center();
    for (pose, mut drive) in &mut vehicles {
        *drive = steer(pose, target);
    }
}
