//! Episode statistics tracking.
//!
//! [`EpisodeStats`] accumulates results across episodes: counts per outcome,
//! total steps, and per-episode step and reward history.

use autopark_core::types::Outcome;
use autopark_env::messages::EpisodeEnded;
use bevy::prelude::*;

// ---------------------------------------------------------------------------
// EpisodeStats
// ---------------------------------------------------------------------------

/// Bevy resource that tracks cumulative statistics across episodes.
#[derive(Resource, Clone, Debug)]
pub struct EpisodeStats {
    /// Total number of completed episodes.
    pub episodes_completed: u32,
    pub successes: u32,
    pub failures: u32,
    /// Total steps across all episodes.
    pub total_steps: u64,
    /// Steps per completed episode.
    pub step_history: Vec<u32>,
    /// Cumulative reward per completed episode.
    pub reward_history: Vec<f32>,
    pub outcome_history: Vec<Outcome>,
}

impl Default for EpisodeStats {
    fn default() -> Self {
        Self::new()
    }
}

impl EpisodeStats {
    /// Create empty stats.
    pub const fn new() -> Self {
        Self {
            episodes_completed: 0,
            successes: 0,
            failures: 0,
            total_steps: 0,
            step_history: Vec::new(),
            reward_history: Vec::new(),
            outcome_history: Vec::new(),
        }
    }

    /// Fold one finished episode into the totals.
    pub fn record(&mut self, ended: &EpisodeEnded) {
        self.episodes_completed += 1;
        match ended.outcome {
            Outcome::Success => self.successes += 1,
            Outcome::Failure => self.failures += 1,
            Outcome::Running => {}
        }
        self.total_steps += u64::from(ended.steps);
        self.step_history.push(ended.steps);
        self.reward_history.push(ended.cumulative_reward);
        self.outcome_history.push(ended.outcome);
    }

    /// Fraction of completed episodes that ended in success.
    pub fn success_rate(&self) -> Option<f32> {
        if self.episodes_completed == 0 {
            return None;
        }
        #[allow(clippy::cast_precision_loss)]
        Some(self.successes as f32 / self.episodes_completed as f32)
    }

    /// Average episode length (steps) across all completed episodes.
    pub fn mean_episode_length(&self) -> Option<f32> {
        if self.step_history.is_empty() {
            return None;
        }
        #[allow(clippy::cast_precision_loss)]
        let sum: f32 = self.step_history.iter().map(|&s| s as f32).sum();
        #[allow(clippy::cast_precision_loss)]
        Some(sum / self.step_history.len() as f32)
    }

    pub fn mean_reward(&self) -> Option<f32> {
        if self.reward_history.is_empty() {
            return None;
        }
        #[allow(clippy::cast_precision_loss)]
        Some(self.reward_history.iter().sum::<f32>() / self.reward_history.len() as f32)
    }

    pub fn last_reward(&self) -> Option<f32> {
        self.reward_history.last().copied()
    }

    /// Reset all statistics.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

// ---------------------------------------------------------------------------
// System
// ---------------------------------------------------------------------------

/// Records every [`EpisodeEnded`] message written this frame.
pub fn episode_stats_system(
    mut ended: MessageReader<EpisodeEnded>,
    mut stats: ResMut<EpisodeStats>,
) {
    for msg in ended.read() {
        stats.record(msg);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
