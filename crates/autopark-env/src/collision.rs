//! Maps tagged contact events onto episode flags and reward effects.
//!
//! | Phase | Tag | Flags | Effect |
//! |---|---|---|---|
//! | Enter | `ParkingGoal` | first time only: latch entered, entering, on road | [`ContactEffect::EnteredGoal`] |
//! | Enter | `ParkedCar`, `Edge` | | [`ContactEffect::Collision`] |
//! | Enter/Stay | `Road` | on road | |
//! | Stay | `ParkingGoal` | entering, on road, latch within-bounds if contained | |
//! | Exit | `ParkingGoal` | not entering, offroad | [`ContactEffect::LeftParking`] if within-bounds latched |
//! | Exit | `Road` | offroad | |
//!
//! Everything else, including the `OffRoad` tag and unrecognised tags, is a
//! no-op.

use autopark_core::types::{ContactEvent, ContactPhase, SurfaceTag};

use crate::episode::{EpisodeFlags, Latch};

/// Reward-bearing outcome of a single contact event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContactEffect {
    /// First contact with the goal this episode.
    EnteredGoal,
    /// Hit a parked car or an edge. Repeatable.
    Collision(SurfaceTag),
    /// Left the goal after having been fully inside it. Repeatable.
    LeftParking,
}

/// Apply `event` to `flags`.
///
/// `contained` is the current strict containment of the vehicle inside the
/// goal; it only matters for goal `Stay` events.
pub fn classify(
    event: ContactEvent,
    flags: &mut EpisodeFlags,
    contained: bool,
) -> Option<ContactEffect> {
    let tag = event.tag?;
    match (event.phase, tag) {
        (ContactPhase::Enter, SurfaceTag::ParkingGoal) => {
            if flags.latch(Latch::EnteredGoal) {
                flags.is_entering_goal = true;
                flags.is_offroad = false;
                Some(ContactEffect::EnteredGoal)
            } else {
                None
            }
        }
        (ContactPhase::Enter, SurfaceTag::ParkedCar | SurfaceTag::Edge) => {
            Some(ContactEffect::Collision(tag))
        }
        (ContactPhase::Enter | ContactPhase::Stay, SurfaceTag::Road) => {
            flags.is_offroad = false;
            None
        }
        (ContactPhase::Stay, SurfaceTag::ParkingGoal) => {
            flags.is_entering_goal = true;
            flags.is_offroad = false;
            if contained {
                flags.latch(Latch::WithinBounds);
            }
            None
        }
        (ContactPhase::Exit, SurfaceTag::ParkingGoal) => {
            flags.is_entering_goal = false;
            flags.is_offroad = true;
            flags
                .has_been_within_bounds()
                .then_some(ContactEffect::LeftParking)
        }
        (ContactPhase::Exit, SurfaceTag::Road) => {
            flags.is_offroad = true;
            None
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
