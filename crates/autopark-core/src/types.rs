use bevy::math::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::SimError;

// ---------------------------------------------------------------------------
// Aabb
// ---------------------------------------------------------------------------

/// World-space axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Box centred on `center` extending `half_extents` along each axis.
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        let half = half_extents.abs();
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    /// Same box moved so that its centre sits at `center`.
    #[must_use]
    pub fn recentered(&self, center: Vec3) -> Self {
        Self::from_center_half_extents(center, self.size() * 0.5)
    }
}

// ---------------------------------------------------------------------------
// Pose
// ---------------------------------------------------------------------------

/// Snapshot of one actor (vehicle or goal region) as reported by the host
/// physics layer. Read-only to the episode engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    /// Unit forward vector. Only its horizontal components matter.
    pub forward: Vec3,
    pub bounds: Aabb,
    pub velocity: Vec3,
}

impl Pose {
    /// Stationary actor at `position` facing `forward` with bounds of the
    /// given half extents.
    pub fn new(position: Vec3, forward: Vec3, half_extents: Vec3) -> Self {
        Self {
            position,
            forward,
            bounds: Aabb::from_center_half_extents(position, half_extents),
            velocity: Vec3::ZERO,
        }
    }

    /// Builder: set the linear velocity.
    #[must_use]
    pub const fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    /// Move the actor, carrying its bounds along.
    #[must_use]
    pub fn moved_to(mut self, position: Vec3) -> Self {
        self.bounds = self.bounds.recentered(position);
        self.position = position;
        self
    }

    /// Scalar speed.
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// Reject poses that would push NaN or Inf through the reward math.
    pub fn validate(&self, label: &str) -> Result<(), SimError> {
        if self.position.is_finite()
            && self.forward.is_finite()
            && self.velocity.is_finite()
            && self.bounds.is_finite()
        {
            Ok(())
        } else {
            Err(SimError::NonFiniteState(format!("{label} pose")))
        }
    }
}

// ---------------------------------------------------------------------------
// SurfaceTag
// ---------------------------------------------------------------------------

/// Collider tags the episode engine reacts to. Any other tag is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SurfaceTag {
    ParkingGoal,
    ParkedCar,
    Road,
    OffRoad,
    Edge,
}

impl SurfaceTag {
    pub const ALL: [Self; 5] = [
        Self::ParkingGoal,
        Self::ParkedCar,
        Self::Road,
        Self::OffRoad,
        Self::Edge,
    ];

    /// Parse a raw collider tag. Unrecognised tags yield `None`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == tag)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ParkingGoal => "ParkingGoal",
            Self::ParkedCar => "ParkedCar",
            Self::Road => "Road",
            Self::OffRoad => "OffRoad",
            Self::Edge => "Edge",
        }
    }
}

impl std::fmt::Display for SurfaceTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ContactEvent
// ---------------------------------------------------------------------------

/// Lifecycle phase of a contact between the vehicle and another collider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContactPhase {
    Enter,
    Stay,
    Exit,
}

/// A tagged contact notification from the physics layer.
///
/// `tag` is `None` when the collider carried a tag outside [`SurfaceTag`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContactEvent {
    pub phase: ContactPhase,
    pub tag: Option<SurfaceTag>,
}

impl ContactEvent {
    pub const fn new(phase: ContactPhase, tag: SurfaceTag) -> Self {
        Self {
            phase,
            tag: Some(tag),
        }
    }

    /// Build from a raw collider tag string.
    pub fn from_raw(phase: ContactPhase, tag: &str) -> Self {
        Self {
            phase,
            tag: SurfaceTag::from_tag(tag),
        }
    }

    pub const fn enter(tag: SurfaceTag) -> Self {
        Self::new(ContactPhase::Enter, tag)
    }

    pub const fn stay(tag: SurfaceTag) -> Self {
        Self::new(ContactPhase::Stay, tag)
    }

    pub const fn exit(tag: SurfaceTag) -> Self {
        Self::new(ContactPhase::Exit, tag)
    }
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// Result of an episode. Terminal once it leaves `Running`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Outcome {
    #[default]
    Running,
    Success,
    Failure,
}

impl Outcome {
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Success | Self::Failure)
    }

    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }
}

/// Visual marker the host shows for the most recent episode result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ResultMarker {
    #[default]
    Neutral,
    Success,
    Failure,
}

impl From<Outcome> for ResultMarker {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Running => Self::Neutral,
            Outcome::Success => Self::Success,
            Outcome::Failure => Self::Failure,
        }
    }
}

// ---------------------------------------------------------------------------
// Observation
// ---------------------------------------------------------------------------

/// Flat f32 vector handed to the learning agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    data: Vec<f32>,
}

impl Observation {
    pub const fn new(data: Vec<f32>) -> Self {
        Self { data }
    }

    pub fn zeros(len: usize) -> Self {
        Self {
            data: vec![0.0; len],
        }
    }

    pub const fn len(&self) -> usize {
        self.data.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }
}

impl std::ops::Index<usize> for Observation {
    type Output = f32;
    fn index(&self, i: usize) -> &f32 {
        &self.data[i]
    }
}

impl From<Vec<f32>> for Observation {
    fn from(data: Vec<f32>) -> Self {
        Self::new(data)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
