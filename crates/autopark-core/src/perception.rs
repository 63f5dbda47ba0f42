//! Ray-cast perception: answers "is the parking goal currently visible".
//!
//! The host fills one [`RayScan`] per forward-facing sensor each tick. The
//! engine only consumes the [`GoalPerception`] predicate, so hosts with a
//! different sensor model can implement the trait directly.

use crate::types::SurfaceTag;

/// One ray of a ray-cast sensor.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RayHit {
    pub has_hit: bool,
    /// Tag of the collider that was hit, if any and if recognised.
    pub tag: Option<SurfaceTag>,
    /// Fraction of the ray length at which the hit occurred, in `[0, 1]`.
    pub hit_fraction: f32,
}

impl RayHit {
    /// A ray that hit a collider tagged `tag` at `hit_fraction`.
    pub const fn hit(tag: SurfaceTag, hit_fraction: f32) -> Self {
        Self {
            has_hit: true,
            tag: Some(tag),
            hit_fraction,
        }
    }

    /// A ray that hit nothing within range.
    pub const fn miss() -> Self {
        Self {
            has_hit: false,
            tag: None,
            hit_fraction: 1.0,
        }
    }

    pub fn sees(&self, tag: SurfaceTag) -> bool {
        self.has_hit && self.tag == Some(tag)
    }
}

/// All rays of one sensor for the current tick.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RayScan {
    pub rays: Vec<RayHit>,
}

impl RayScan {
    pub const fn new(rays: Vec<RayHit>) -> Self {
        Self { rays }
    }

    /// Nearest hit fraction on the goal, if any ray sees it.
    pub fn nearest_goal_fraction(&self) -> Option<f32> {
        self.rays
            .iter()
            .filter(|r| r.sees(SurfaceTag::ParkingGoal))
            .map(|r| r.hit_fraction)
            .reduce(f32::min)
    }
}

// ---------------------------------------------------------------------------
// GoalPerception
// ---------------------------------------------------------------------------

/// Pure predicate consumed once per tick to latch "has spotted goal".
pub trait GoalPerception {
    /// `true` iff any ray currently reports a hit on the parking goal.
    fn sees_goal(&self) -> bool;
}

impl GoalPerception for RayScan {
    fn sees_goal(&self) -> bool {
        self.rays.iter().any(|r| r.sees(SurfaceTag::ParkingGoal))
    }
}

impl GoalPerception for [RayScan] {
    fn sees_goal(&self) -> bool {
        self.iter().any(GoalPerception::sees_goal)
    }
}

impl GoalPerception for Vec<RayScan> {
    fn sees_goal(&self) -> bool {
        self.as_slice().sees_goal()
    }
}

/// Hosts that resolve visibility themselves pass the answer straight through.
impl GoalPerception for bool {
    fn sees_goal(&self) -> bool {
        *self
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_scan_sees_nothing() {
        assert!(!RayScan::default().sees_goal());
        let none: Vec<RayScan> = Vec::new();
        assert!(!none.sees_goal());
    }

    #[test]
    fn scan_sees_goal_hit() {
        let scan = RayScan::new(vec![
            RayHit::miss(),
            RayHit::hit(SurfaceTag::Road, 0.2),
            RayHit::hit(SurfaceTag::ParkingGoal, 0.7),
        ]);
        assert!(scan.sees_goal());
    }

    #[test]
    fn other_tags_do_not_count() {
        let scan = RayScan::new(vec![
            RayHit::hit(SurfaceTag::ParkedCar, 0.1),
            RayHit::hit(SurfaceTag::Edge, 0.9),
        ]);
        assert!(!scan.sees_goal());
    }

    #[test]
    fn goal_tag_without_hit_flag_does_not_count() {
        let ray = RayHit {
            has_hit: false,
            tag: Some(SurfaceTag::ParkingGoal),
            hit_fraction: 0.5,
        };
        assert!(!RayScan::new(vec![ray]).sees_goal());
    }

    #[test]
    fn any_sensor_is_enough() {
        let sensors = vec![
            RayScan::new(vec![RayHit::miss()]),
            RayScan::new(vec![RayHit::hit(SurfaceTag::ParkingGoal, 0.3)]),
        ];
        assert!(sensors.sees_goal());
        assert!(sensors[..].sees_goal());
    }

    #[test]
    fn nearest_goal_fraction_picks_minimum() {
        let scan = RayScan::new(vec![
            RayHit::hit(SurfaceTag::ParkingGoal, 0.7),
            RayHit::hit(SurfaceTag::ParkingGoal, 0.4),
            RayHit::hit(SurfaceTag::Road, 0.1),
        ]);
        assert_eq!(scan.nearest_goal_fraction(), Some(0.4));
        assert_eq!(RayScan::default().nearest_goal_fraction(), None);
    }

    #[test]
    fn bool_passthrough() {
        assert!(true.sees_goal());
        assert!(!false.sees_goal());
    }
}
