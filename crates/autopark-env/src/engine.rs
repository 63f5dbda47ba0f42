//! The episode state machine and reward engine.
//!
//! [`ParkingEpisode`] is driven by the host through four entry points:
//!
//! - [`on_episode_begin`](ParkingEpisode::on_episode_begin) at every episode
//!   boundary, returning where to put the vehicle.
//! - [`on_contact`](ParkingEpisode::on_contact) for each collision
//!   enter/stay/exit notification.
//! - [`on_tick`](ParkingEpisode::on_tick) once per physics tick, after that
//!   tick's contacts.
//! - [`on_decision_step`](ParkingEpisode::on_decision_step) once per agent
//!   decision, for the time and offroad penalties.
//!
//! Once the outcome leaves `Running`, none of these mutate the episode until
//! the next `on_episode_begin`.

use autopark_core::config::{EpisodeConfig, SpawnConfig};
use autopark_core::geometry::{goal_distance, goal_heading_delta, is_within_goal};
use autopark_core::perception::GoalPerception;
use autopark_core::rewards::{
    RewardTerm, alignment_reward, per_step, proximity_reward, staying_in_goal_reward,
    velocity_reward,
};
use autopark_core::types::{ContactEvent, Outcome, Pose, ResultMarker};
use bevy::prelude::Resource;
use serde::Serialize;
use tracing::{debug, info};

use crate::collision::{ContactEffect, classify};
use crate::episode::{EpisodeFlags, EpisodeState, Latch};
use crate::spawn::{Reposition, SpawnPlanner};

// ---------------------------------------------------------------------------
// RewardDelta
// ---------------------------------------------------------------------------

/// Rewards applied by one engine call, itemised per term.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RewardDelta {
    terms: Vec<(RewardTerm, f32)>,
    outcome: Outcome,
    ended: bool,
}

impl RewardDelta {
    const fn with_outcome(outcome: Outcome) -> Self {
        Self {
            terms: Vec::new(),
            outcome,
            ended: false,
        }
    }

    fn push(&mut self, term: RewardTerm, value: f32) {
        self.terms.push((term, value));
    }

    /// Sum of every applied term.
    pub fn total(&self) -> f32 {
        self.terms.iter().map(|(_, v)| v).sum()
    }

    /// Sum of the values applied for `term`, zero if it was not applied.
    pub fn get(&self, term: RewardTerm) -> f32 {
        self.terms
            .iter()
            .filter(|(t, _)| *t == term)
            .map(|(_, v)| v)
            .sum()
    }

    pub fn contains(&self, term: RewardTerm) -> bool {
        self.terms.iter().any(|(t, _)| *t == term)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(RewardTerm, f32)> {
        self.terms.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Outcome after the call that produced this delta.
    pub const fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Whether this call moved the episode out of `Running`.
    pub const fn ended_episode(&self) -> bool {
        self.ended
    }
}

// ---------------------------------------------------------------------------
// ParkingEpisode
// ---------------------------------------------------------------------------

/// Owns the episode state and applies the reward rules to it.
#[derive(Resource, Clone, Debug)]
pub struct ParkingEpisode {
    config: EpisodeConfig,
    spawn: SpawnPlanner,
    state: EpisodeState,
    episode_number: u64,
    last_episode_reward: f32,
    last_marker: ResultMarker,
    just_ended: bool,
}

impl Default for ParkingEpisode {
    fn default() -> Self {
        Self::new(EpisodeConfig::default(), SpawnConfig::default())
    }
}

impl ParkingEpisode {
    /// Engine for `config`. Both configs are assumed validated.
    pub fn new(config: EpisodeConfig, spawn: SpawnConfig) -> Self {
        Self {
            config,
            spawn: SpawnPlanner::new(spawn),
            state: EpisodeState::default(),
            episode_number: 0,
            last_episode_reward: 0.0,
            last_marker: ResultMarker::Neutral,
            just_ended: false,
        }
    }

    // -- accessors --

    pub const fn config(&self) -> &EpisodeConfig {
        &self.config
    }

    pub const fn spawn_planner(&self) -> &SpawnPlanner {
        &self.spawn
    }

    pub const fn state(&self) -> &EpisodeState {
        &self.state
    }

    pub const fn cumulative_reward(&self) -> f32 {
        self.state.cumulative_reward
    }

    pub const fn outcome(&self) -> Outcome {
        self.state.outcome
    }

    pub const fn flags(&self) -> EpisodeFlags {
        self.state.flags
    }

    pub const fn step_count(&self) -> u32 {
        self.state.step_count
    }

    /// Episodes started so far; the first begin makes this 1.
    pub const fn episode_number(&self) -> u64 {
        self.episode_number
    }

    /// Cumulative reward recorded when the previous episode ended.
    pub const fn last_episode_reward(&self) -> f32 {
        self.last_episode_reward
    }

    /// Marker of the most recent terminal outcome. Survives episode begins
    /// and only changes when another episode ends.
    pub const fn last_marker(&self) -> ResultMarker {
        self.last_marker
    }

    /// Whether an episode has ended and no begin has followed yet.
    pub const fn reset_requested(&self) -> bool {
        self.just_ended
    }

    // -- entry points --

    /// Reset the episode and plan the vehicle's start pose.
    pub fn on_episode_begin(&mut self) -> Reposition {
        self.state.reset();
        self.episode_number += 1;
        self.just_ended = false;
        let reposition = self.spawn.plan(self.episode_number);
        debug!(
            episode = self.episode_number,
            x = reposition.position.x,
            z = reposition.position.z,
            heading = reposition.heading.to_degrees(),
            "episode begin"
        );
        reposition
    }

    /// Apply one collision notification. Ignored once the episode is over.
    pub fn on_contact(&mut self, event: ContactEvent, vehicle: &Pose, goal: &Pose) -> RewardDelta {
        let mut delta = RewardDelta::with_outcome(self.state.outcome);
        if self.state.is_terminal() {
            return delta;
        }
        self.apply_contact(event, is_within_goal(vehicle, goal), &mut delta);
        self.state.cumulative_reward += delta.total();
        delta
    }

    /// Physics-rate update: apply `contacts`, then shaping, the parking timer
    /// and the termination check.
    pub fn on_tick(
        &mut self,
        vehicle: &Pose,
        goal: &Pose,
        perception: &(impl GoalPerception + ?Sized),
        contacts: &[ContactEvent],
    ) -> RewardDelta {
        let mut delta = RewardDelta::with_outcome(self.state.outcome);
        if self.state.is_terminal() {
            return delta;
        }

        let contained = is_within_goal(vehicle, goal);
        for event in contacts {
            self.apply_contact(*event, contained, &mut delta);
        }

        self.state.advance(self.config.tick());
        let distance = goal_distance(vehicle, goal);
        let angle = goal_heading_delta(vehicle, goal);
        let cfg = &self.config;
        let rewards = &cfg.rewards;

        if rewards.enable_velocity {
            let value = velocity_reward(
                vehicle.speed(),
                rewards.max_velocity_reward,
                rewards.threshold_velocity,
                cfg.max_steps,
            );
            delta.push(RewardTerm::Velocity, value);
        }

        if rewards.enable_proximity {
            let value = per_step(
                proximity_reward(
                    rewards.threshold_proximity,
                    rewards.max_proximity_reward,
                    distance,
                ),
                cfg.max_steps,
            );
            delta.push(RewardTerm::Proximity, value);
        }

        if rewards.enable_spotted_goal
            && !self.state.flags.has_spotted_goal()
            && perception.sees_goal()
        {
            self.state.flags.latch(Latch::SpottedGoal);
            debug!(reward = rewards.spotted_goal_reward, "spotted goal");
            delta.push(RewardTerm::SpottedGoal, rewards.spotted_goal_reward);
        }

        if rewards.enable_staying_in_goal {
            self.state.stay_in_goal_reward = if contained {
                staying_in_goal_reward(
                    rewards.max_staying_in_goal_reward,
                    rewards.threshold_precision,
                    distance,
                    angle,
                    cfg.max_steps,
                )
            } else {
                0.0
            };
            if contained {
                delta.push(RewardTerm::StayingInGoal, self.state.stay_in_goal_reward);
            }
        }

        self.state
            .update_parking_timer(contained, self.config.tick());

        if self.state.valid_parking_timer > self.config.required_parking_time() {
            self.state.outcome = Outcome::Success;
            let rewards = &self.config.rewards;
            delta.push(
                RewardTerm::Precision,
                proximity_reward(
                    rewards.threshold_precision,
                    rewards.max_precision_reward,
                    distance,
                ),
            );
            delta.push(
                RewardTerm::Alignment,
                alignment_reward(rewards.max_alignment_reward, angle),
            );
        } else if self.state.step_count >= self.config.max_steps
            || distance > self.config.max_allowed_distance
        {
            self.state.outcome = Outcome::Failure;
            if distance > self.config.max_allowed_distance {
                delta.push(
                    RewardTerm::ExceedDistance,
                    -self.config.penalties.exceed_distance_penalty,
                );
            }
        }

        self.state.cumulative_reward += delta.total();
        delta.outcome = self.state.outcome;
        if self.state.is_terminal() {
            delta.ended = true;
            self.finish_episode(distance);
        }
        delta
    }

    /// Decision-rate update: per-step time penalty plus the offroad penalty
    /// while offroad, both spread over `max_steps`.
    pub fn on_decision_step(&mut self) -> RewardDelta {
        let mut delta = RewardDelta::with_outcome(self.state.outcome);
        if self.state.is_terminal() {
            return delta;
        }
        let penalties = &self.config.penalties;
        if self.state.flags.is_offroad {
            delta.push(
                RewardTerm::OffroadPenalty,
                -per_step(penalties.max_offroad_penalty, self.config.max_steps),
            );
        }
        delta.push(
            RewardTerm::TimePenalty,
            -per_step(penalties.max_time_penalty, self.config.max_steps),
        );
        self.state.cumulative_reward += delta.total();
        delta
    }

    // -- internals --

    fn apply_contact(&mut self, event: ContactEvent, contained: bool, delta: &mut RewardDelta) {
        let Some(effect) = classify(event, &mut self.state.flags, contained) else {
            return;
        };
        let (term, value) = match effect {
            ContactEffect::EnteredGoal => {
                debug!(reward = self.config.rewards.entered_goal_reward, "entered goal");
                (RewardTerm::EnteredGoal, self.config.rewards.entered_goal_reward)
            }
            ContactEffect::Collision(tag) => {
                debug!(%tag, penalty = self.config.penalties.collision_penalty, "collision");
                (RewardTerm::Collision, -self.config.penalties.collision_penalty)
            }
            ContactEffect::LeftParking => {
                debug!(
                    penalty = self.config.penalties.leave_parking_penalty,
                    "left parking area"
                );
                (RewardTerm::LeftParking, -self.config.penalties.leave_parking_penalty)
            }
        };
        delta.push(term, value);
    }

    fn finish_episode(&mut self, distance: f32) {
        self.last_episode_reward = self.state.cumulative_reward;
        self.last_marker = self.state.outcome.into();
        self.just_ended = true;
        info!(
            episode = self.episode_number,
            outcome = ?self.state.outcome,
            steps = self.state.step_count,
            reward = self.state.cumulative_reward,
            distance,
            "episode ended"
        );
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
