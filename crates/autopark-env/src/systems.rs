//! Bevy systems that drive [`ParkingEpisode`] from ECS state and messages.
//!
//! Systems that need the vehicle or goal return a Bevy `Result`, so a world
//! missing either entity, or holding a non-finite pose, fails fast through
//! Bevy's error handler instead of feeding garbage into the reward math.

use autopark_core::error::SimError;
use autopark_core::perception::GoalPerception;
use autopark_core::types::{Observation, Pose, ResultMarker};
use bevy::ecs::query::QueryFilter;
use bevy::prelude::*;
use tracing::warn;

use crate::components::{ActorPose, ParkingGoal, RaySensor, Vehicle};
use crate::engine::{ParkingEpisode, RewardDelta};
use crate::messages::{
    BeginEpisode, ContactMessage, DecisionStep, EpisodeBegan, EpisodeEnded, RepositionVehicle,
};
use crate::observation::{OBSERVATION_DIM, build_observation};
use crate::telemetry::Telemetry;

// ---------------------------------------------------------------------------
// Resources
// ---------------------------------------------------------------------------

/// Reward applied during the current frame, across contacts, decision
/// penalties and the tick. Cleared in the `Begin` phase.
#[derive(Resource, Clone, Debug, Default)]
pub struct StepReward(pub f32);

/// Itemised result of the most recent tick.
#[derive(Resource, Clone, Debug, Default)]
pub struct LastTick(pub RewardDelta);

/// Observation for the agent's next decision.
#[derive(Resource, Clone, Debug)]
pub struct AgentObservation(pub Observation);

impl Default for AgentObservation {
    fn default() -> Self {
        Self(Observation::zeros(OBSERVATION_DIM))
    }
}

/// Latest telemetry snapshot, refreshed every frame once an episode runs.
#[derive(Resource, Clone, Debug, Default)]
pub struct TelemetrySnapshot(pub Option<Telemetry>);

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// The single pose matching `F`, validated finite.
pub fn actor_pose<F: QueryFilter>(
    query: &Query<&ActorPose, F>,
    label: &str,
) -> Result<Pose, SimError> {
    let pose = query
        .single()
        .map_err(|_| SimError::EntityNotFound(label.to_string()))?
        .0;
    pose.validate(label)?;
    Ok(pose)
}

// ---------------------------------------------------------------------------
// Begin
// ---------------------------------------------------------------------------

/// Asks for the first episode. Runs once at startup.
pub fn request_first_episode(mut begin: MessageWriter<BeginEpisode>) {
    begin.write(BeginEpisode);
}

/// Starts a new episode if one was requested, however many requests arrived.
pub fn begin_episode_system(
    mut requests: MessageReader<BeginEpisode>,
    mut episode: ResMut<ParkingEpisode>,
    mut step_reward: ResMut<StepReward>,
    mut reposition: MessageWriter<RepositionVehicle>,
    mut began: MessageWriter<EpisodeBegan>,
) {
    step_reward.0 = 0.0;
    if requests.read().count() == 0 {
        return;
    }
    let target = episode.on_episode_begin();
    reposition.write(RepositionVehicle(target));
    began.write(EpisodeBegan {
        episode: episode.episode_number(),
    });
}

// ---------------------------------------------------------------------------
// Contacts
// ---------------------------------------------------------------------------

/// Feeds this frame's collision notifications to the engine.
pub fn contact_system(
    mut contacts: MessageReader<ContactMessage>,
    mut episode: ResMut<ParkingEpisode>,
    mut step_reward: ResMut<StepReward>,
    vehicles: Query<&ActorPose, With<Vehicle>>,
    goals: Query<&ActorPose, With<ParkingGoal>>,
) -> Result {
    if contacts.is_empty() {
        return Ok(());
    }
    let vehicle = actor_pose(&vehicles, "vehicle")?;
    let goal = actor_pose(&goals, "parking goal")?;
    for msg in contacts.read() {
        let event = msg.to_event();
        if event.tag.is_none() {
            warn!(tag = %msg.tag, "ignoring contact with unrecognised collider tag");
            continue;
        }
        step_reward.0 += episode.on_contact(event, &vehicle, &goal).total();
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Decide
// ---------------------------------------------------------------------------

/// Applies the time and offroad penalties once per decision.
pub fn decision_penalty_system(
    mut decisions: MessageReader<DecisionStep>,
    mut episode: ResMut<ParkingEpisode>,
    mut step_reward: ResMut<StepReward>,
) {
    for _ in decisions.read() {
        step_reward.0 += episode.on_decision_step().total();
    }
}

/// Refreshes the agent's observation from the current poses.
pub fn observe_system(
    mut observation: ResMut<AgentObservation>,
    vehicles: Query<&ActorPose, With<Vehicle>>,
    goals: Query<&ActorPose, With<ParkingGoal>>,
) -> Result {
    let vehicle = actor_pose(&vehicles, "vehicle")?;
    let goal = actor_pose(&goals, "parking goal")?;
    observation.0 = build_observation(&vehicle, &goal);
    Ok(())
}

// ---------------------------------------------------------------------------
// Evaluate
// ---------------------------------------------------------------------------

/// One physics tick: shaping rewards, parking timer and termination.
pub fn evaluate_system(
    mut episode: ResMut<ParkingEpisode>,
    mut step_reward: ResMut<StepReward>,
    mut last_tick: ResMut<LastTick>,
    mut ended: MessageWriter<EpisodeEnded>,
    vehicles: Query<&ActorPose, With<Vehicle>>,
    goals: Query<&ActorPose, With<ParkingGoal>>,
    sensors: Query<&RaySensor>,
) -> Result {
    if episode.episode_number() == 0 {
        return Ok(());
    }
    let vehicle = actor_pose(&vehicles, "vehicle")?;
    let goal = actor_pose(&goals, "parking goal")?;
    let sees_goal = sensors.iter().any(|s| s.0.sees_goal());

    let delta = episode.on_tick(&vehicle, &goal, &sees_goal, &[]);
    step_reward.0 += delta.total();
    if delta.ended_episode() {
        ended.write(EpisodeEnded {
            episode: episode.episode_number(),
            outcome: delta.outcome(),
            cumulative_reward: episode.cumulative_reward(),
            steps: episode.step_count(),
            marker: ResultMarker::from(delta.outcome()),
        });
    }
    last_tick.0 = delta;
    Ok(())
}

// ---------------------------------------------------------------------------
// Reset
// ---------------------------------------------------------------------------

/// Captures telemetry for the frame.
pub fn telemetry_system(
    episode: Res<ParkingEpisode>,
    mut snapshot: ResMut<TelemetrySnapshot>,
    vehicles: Query<&ActorPose, With<Vehicle>>,
    goals: Query<&ActorPose, With<ParkingGoal>>,
    sensors: Query<&RaySensor>,
) -> Result {
    if episode.episode_number() == 0 {
        return Ok(());
    }
    let vehicle = actor_pose(&vehicles, "vehicle")?;
    let goal = actor_pose(&goals, "parking goal")?;
    let sees_goal = sensors.iter().any(|s| s.0.sees_goal());
    snapshot.0 = Some(episode.telemetry(&vehicle, &goal, &sees_goal));
    Ok(())
}

/// Requests the next episode after one ends, when auto-reset is on.
#[allow(clippy::needless_pass_by_value)]
pub fn auto_reset_system(episode: Res<ParkingEpisode>, mut begin: MessageWriter<BeginEpisode>) {
    if episode.config().auto_reset && episode.reset_requested() {
        begin.write(BeginEpisode);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
