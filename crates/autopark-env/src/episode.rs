//! Per-episode mutable state: step count, reward sum, parking timer, flags
//! and outcome.
//!
//! One-shot flags are kept as a private bitmask inside [`EpisodeFlags`] so
//! they can only be latched, never cleared, until the whole state is reset
//! at episode start.

use autopark_core::time::SimTime;
use autopark_core::types::Outcome;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Latch
// ---------------------------------------------------------------------------

/// One-way flags that flip false → true at most once per episode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Latch {
    /// A sensor ray has hit the parking goal.
    SpottedGoal,
    /// The vehicle has touched the goal surface.
    EnteredGoal,
    /// The vehicle's bounds have been fully inside the goal's bounds.
    WithinBounds,
}

impl Latch {
    pub const ALL: [Self; 3] = [Self::SpottedGoal, Self::EnteredGoal, Self::WithinBounds];

    const fn bit(self) -> u8 {
        match self {
            Self::SpottedGoal => 1,
            Self::EnteredGoal => 1 << 1,
            Self::WithinBounds => 1 << 2,
        }
    }
}

// ---------------------------------------------------------------------------
// EpisodeFlags
// ---------------------------------------------------------------------------

/// Latches plus the two contact-driven toggles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EpisodeFlags {
    latches: u8,
    /// Touching the goal surface. Toggles with goal enter/stay/exit.
    pub is_entering_goal: bool,
    /// Not touching road or goal. Toggles with road/goal contacts.
    pub is_offroad: bool,
}

impl EpisodeFlags {
    pub const fn is_set(&self, latch: Latch) -> bool {
        self.latches & latch.bit() != 0
    }

    /// Latch `latch`. Returns `true` only on the call that flipped it.
    pub const fn latch(&mut self, latch: Latch) -> bool {
        let was_set = self.is_set(latch);
        self.latches |= latch.bit();
        !was_set
    }

    pub const fn has_spotted_goal(&self) -> bool {
        self.is_set(Latch::SpottedGoal)
    }

    pub const fn has_entered_goal(&self) -> bool {
        self.is_set(Latch::EnteredGoal)
    }

    pub const fn has_been_within_bounds(&self) -> bool {
        self.is_set(Latch::WithinBounds)
    }
}

// ---------------------------------------------------------------------------
// EpisodeState
// ---------------------------------------------------------------------------

/// Mutable state of the running episode. Reset wholesale at episode start.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EpisodeState {
    pub(crate) step_count: u32,
    pub(crate) cumulative_reward: f32,
    pub(crate) valid_parking_timer: SimTime,
    pub(crate) elapsed: SimTime,
    pub(crate) flags: EpisodeFlags,
    pub(crate) outcome: Outcome,
    /// Staying-in-goal reward granted on the most recent tick.
    pub(crate) stay_in_goal_reward: f32,
}

impl EpisodeState {
    /// Clear everything back to a fresh, running episode.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub const fn step_count(&self) -> u32 {
        self.step_count
    }

    pub const fn cumulative_reward(&self) -> f32 {
        self.cumulative_reward
    }

    /// Time continuously spent fully inside the goal.
    pub const fn valid_parking_timer(&self) -> SimTime {
        self.valid_parking_timer
    }

    /// Time since episode start.
    pub const fn elapsed(&self) -> SimTime {
        self.elapsed
    }

    pub const fn flags(&self) -> EpisodeFlags {
        self.flags
    }

    pub const fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub const fn stay_in_goal_reward(&self) -> f32 {
        self.stay_in_goal_reward
    }

    pub const fn is_terminal(&self) -> bool {
        self.outcome.is_terminal()
    }

    /// Advance the step counter and the episode clock by one tick.
    pub(crate) const fn advance(&mut self, tick: SimTime) {
        self.step_count = self.step_count.saturating_add(1);
        self.elapsed.advance(tick);
    }

    /// Grow the parking timer while contained, zero it the instant
    /// containment is lost.
    pub(crate) const fn update_parking_timer(&mut self, contained: bool, tick: SimTime) {
        if contained {
            self.valid_parking_timer.advance(tick);
        } else {
            self.valid_parking_timer.reset();
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
