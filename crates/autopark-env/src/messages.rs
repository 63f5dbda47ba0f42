//! Messages exchanged between the host and the episode systems.

use autopark_core::types::{ContactEvent, ContactPhase, Outcome, ResultMarker, SurfaceTag};
use bevy::prelude::*;

use crate::spawn::Reposition;

// ---------------------------------------------------------------------------
// Host -> episode
// ---------------------------------------------------------------------------

/// A collision notification with the collider's raw tag.
#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub struct ContactMessage {
    pub phase: ContactPhase,
    pub tag: String,
}

impl ContactMessage {
    pub fn new(phase: ContactPhase, tag: impl Into<String>) -> Self {
        Self {
            phase,
            tag: tag.into(),
        }
    }

    pub fn tagged(phase: ContactPhase, tag: SurfaceTag) -> Self {
        Self::new(phase, tag.as_str())
    }

    pub fn to_event(&self) -> ContactEvent {
        ContactEvent::from_raw(self.phase, &self.tag)
    }
}

impl From<ContactEvent> for ContactMessage {
    fn from(event: ContactEvent) -> Self {
        let tag = event.tag.map_or("", SurfaceTag::as_str);
        Self::new(event.phase, tag)
    }
}

/// The agent took a decision this frame.
#[derive(Message, Debug, Clone, Copy, Default)]
pub struct DecisionStep;

/// Start a new episode at the next `Begin` phase.
#[derive(Message, Debug, Clone, Copy, Default)]
pub struct BeginEpisode;

// ---------------------------------------------------------------------------
// Episode -> host
// ---------------------------------------------------------------------------

/// Teleport the vehicle. Emitted once per episode begin.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct RepositionVehicle(pub Reposition);

/// A new episode has started.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpisodeBegan {
    pub episode: u64,
}

/// The running episode reached a terminal outcome.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct EpisodeEnded {
    pub episode: u64,
    pub outcome: Outcome,
    pub cumulative_reward: f32,
    pub steps: u32,
    pub marker: ResultMarker,
}
