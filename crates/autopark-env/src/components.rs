//! ECS components the host attaches to the parking scene.
//!
//! The host physics layer keeps [`ActorPose`] and [`RaySensor`] current
//! every frame; the episode systems only read them.

use autopark_core::perception::RayScan;
use autopark_core::types::Pose;
use bevy::prelude::*;

/// Marks the agent's car. Exactly one per world.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Vehicle;

/// Marks the parking bay. Exactly one per world.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct ParkingGoal;

/// Marks a parked car occupying a neighbouring bay.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct ParkedCar;

/// Current pose, bounds and velocity of an actor.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct ActorPose(pub Pose);

/// Latest ray-cast results of one forward-facing sensor.
#[derive(Component, Debug, Clone, Default, PartialEq)]
pub struct RaySensor(pub RayScan);

/// Pose an actor returns to on every episode begin.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct LotHome(pub Pose);
