//! Derives enter/stay/exit contact events from per-tick overlap sets.
//!
//! Hosts whose physics layer only reports "what is touching the vehicle
//! right now" feed that set to a [`TouchTracker`] once per tick and get the
//! event stream the collision classifier expects.

use std::collections::BTreeMap;

use autopark_core::types::{ContactEvent, ContactPhase, SurfaceTag};

/// Remembers last tick's overlaps, keyed by collider id.
#[derive(Clone, Debug)]
pub struct TouchTracker<K: Ord> {
    previous: BTreeMap<K, SurfaceTag>,
}

impl<K: Ord> Default for TouchTracker<K> {
    fn default() -> Self {
        Self {
            previous: BTreeMap::new(),
        }
    }
}

impl<K: Ord> TouchTracker<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Diff `current` against the previous tick.
    ///
    /// Events come out as all exits, then all enters, then all stays, each
    /// group ordered by collider id. Surfaces still being touched are always
    /// reported after the ones that were left.
    pub fn update(&mut self, current: impl IntoIterator<Item = (K, SurfaceTag)>) -> Vec<ContactEvent> {
        let current: BTreeMap<K, SurfaceTag> = current.into_iter().collect();

        let exits = self
            .previous
            .iter()
            .filter(|(id, _)| !current.contains_key(*id))
            .map(|(_, tag)| ContactEvent::exit(*tag));
        let enters = current
            .iter()
            .filter(|(id, _)| !self.previous.contains_key(*id))
            .map(|(_, tag)| ContactEvent::enter(*tag));
        let stays = current
            .iter()
            .filter(|(id, _)| self.previous.contains_key(*id))
            .map(|(_, tag)| ContactEvent::stay(*tag));

        let events: Vec<ContactEvent> = exits.chain(enters).chain(stays).collect();
        self.previous = current;
        events
    }

    /// Forget all overlaps without emitting exits.
    pub fn clear(&mut self) {
        self.previous.clear();
    }

    /// Number of colliders touched on the last update.
    pub fn touching(&self) -> usize {
        self.previous.len()
    }
}

/// Keep only events of `phase`.
pub fn of_phase(events: &[ContactEvent], phase: ContactPhase) -> impl Iterator<Item = &ContactEvent> {
    events.iter().filter(move |e| e.phase == phase)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_update_enters_everything() {
        let mut tracker = TouchTracker::new();
        let events = tracker.update([(1_u64, SurfaceTag::Road), (2, SurfaceTag::ParkedCar)]);
        assert_eq!(
            events,
            vec![
                ContactEvent::enter(SurfaceTag::Road),
                ContactEvent::enter(SurfaceTag::ParkedCar),
            ]
        );
        assert_eq!(tracker.touching(), 2);
    }

    #[test]
    fn transitions_between_ticks() {
        let mut tracker = TouchTracker::new();
        tracker.update([(1_u64, SurfaceTag::Road), (3, SurfaceTag::ParkingGoal)]);
        let events = tracker.update([(3_u64, SurfaceTag::ParkingGoal), (5, SurfaceTag::Edge)]);
        assert_eq!(
            events,
            vec![
                ContactEvent::exit(SurfaceTag::Road),
                ContactEvent::enter(SurfaceTag::Edge),
                ContactEvent::stay(SurfaceTag::ParkingGoal),
            ]
        );
    }

    #[test]
    fn same_tag_on_two_colliders_is_tracked_separately() {
        let mut tracker = TouchTracker::new();
        tracker.update([(10_u32, SurfaceTag::ParkedCar)]);
        let events = tracker.update([(10_u32, SurfaceTag::ParkedCar), (11, SurfaceTag::ParkedCar)]);
        assert_eq!(of_phase(&events, ContactPhase::Enter).count(), 1);
        assert_eq!(of_phase(&events, ContactPhase::Stay).count(), 1);
    }

    #[test]
    fn empty_update_exits_everything() {
        let mut tracker = TouchTracker::new();
        tracker.update([(1_u8, SurfaceTag::Road)]);
        let events = tracker.update(std::iter::empty());
        assert_eq!(events, vec![ContactEvent::exit(SurfaceTag::Road)]);
        assert_eq!(tracker.touching(), 0);
    }

    #[test]
    fn clear_forgets_without_exits() {
        let mut tracker = TouchTracker::new();
        tracker.update([(1_u8, SurfaceTag::Road)]);
        tracker.clear();
        let events = tracker.update([(1_u8, SurfaceTag::Road)]);
        assert_eq!(events, vec![ContactEvent::enter(SurfaceTag::Road)]);
    }
}
