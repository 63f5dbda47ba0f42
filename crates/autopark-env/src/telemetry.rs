//! Read-only snapshot of the episode for dashboards and logs.

use autopark_core::geometry::{acute_degrees, goal_distance, goal_heading_delta, is_within_goal};
use autopark_core::perception::GoalPerception;
use autopark_core::rewards::{alignment_reward, proximity_reward, velocity_reward};
use autopark_core::types::{Outcome, Pose, ResultMarker};
use serde::{Deserialize, Serialize};

use crate::engine::ParkingEpisode;

/// Everything a telemetry panel shows for the current tick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Telemetry {
    pub episode: u64,
    pub outcome: Outcome,
    /// Result of the last finished episode, kept until the next one ends.
    pub marker: ResultMarker,
    pub cumulative_reward: f32,
    pub last_episode_reward: f32,
    pub step_count: u32,
    /// Seconds.
    pub parking_timer: f32,
    pub has_spotted_goal: bool,
    pub has_entered_goal: bool,
    pub has_been_within_bounds: bool,
    pub is_entering_goal: bool,
    pub is_offroad: bool,
    pub is_spotting_goal: bool,
    pub is_within_bounds: bool,
    pub goal_distance: f32,
    /// Precision reward the vehicle would earn at its current distance.
    pub precision_reward: f32,
    /// Heading delta folded into `[0°, 90°]`.
    pub angle_deg: f32,
    pub alignment_reward: f32,
    pub speed: f32,
    pub velocity_reward: f32,
    pub stay_in_goal_reward: f32,
}

impl ParkingEpisode {
    /// Snapshot of the episode against the current poses.
    pub fn telemetry(
        &self,
        vehicle: &Pose,
        goal: &Pose,
        perception: &(impl GoalPerception + ?Sized),
    ) -> Telemetry {
        let cfg = self.config();
        let state = self.state();
        let flags = state.flags();
        let distance = goal_distance(vehicle, goal);
        let angle = goal_heading_delta(vehicle, goal);
        let outcome = state.outcome();

        Telemetry {
            episode: self.episode_number(),
            outcome,
            marker: self.last_marker(),
            cumulative_reward: state.cumulative_reward(),
            last_episode_reward: self.last_episode_reward(),
            step_count: state.step_count(),
            parking_timer: state.valid_parking_timer().secs_f32(),
            has_spotted_goal: flags.has_spotted_goal(),
            has_entered_goal: flags.has_entered_goal(),
            has_been_within_bounds: flags.has_been_within_bounds(),
            is_entering_goal: flags.is_entering_goal,
            is_offroad: flags.is_offroad,
            is_spotting_goal: perception.sees_goal(),
            is_within_bounds: is_within_goal(vehicle, goal),
            goal_distance: distance,
            precision_reward: proximity_reward(
                cfg.rewards.threshold_precision,
                cfg.rewards.max_precision_reward,
                distance,
            ),
            angle_deg: acute_degrees(angle),
            alignment_reward: alignment_reward(cfg.rewards.max_alignment_reward, angle),
            speed: vehicle.speed(),
            velocity_reward: velocity_reward(
                vehicle.speed(),
                cfg.rewards.max_velocity_reward,
                cfg.rewards.threshold_velocity,
                cfg.max_steps,
            ),
            stay_in_goal_reward: state.stay_in_goal_reward(),
        }
    }
}
