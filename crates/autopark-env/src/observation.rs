//! Observation vector handed to the learning agent each decision.

use autopark_core::geometry::goal_heading_delta;
use autopark_core::types::{Observation, Pose};

/// Length of the vector produced by [`build_observation`].
pub const OBSERVATION_DIM: usize = 7;

/// `[vx, vy, vz, gx - px, gy - py, gz - pz, heading_delta]`.
///
/// The heading delta is the raw signed, unwrapped value.
pub fn build_observation(vehicle: &Pose, goal: &Pose) -> Observation {
    let offset = goal.position - vehicle.position;
    Observation::new(vec![
        vehicle.velocity.x,
        vehicle.velocity.y,
        vehicle.velocity.z,
        offset.x,
        offset.y,
        offset.z,
        goal_heading_delta(vehicle, goal),
    ])
}
