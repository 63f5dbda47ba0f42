//! Reward shaping curves and the named terms built from them.
//!
//! Two curves are reused across several terms:
//!
//! - [`proximity_reward`]: a clamped cubic that saturates at `max_reward` as
//!   the distance approaches 0 and falls to 0 at `distance >= threshold`.
//! - [`alignment_reward`]: `|cos(Δ) · max_reward|`, equal for nose-in and
//!   reversed parking.

use serde::{Deserialize, Serialize};

/// Cubic proximity reward `-max · (d/threshold - 1)^3`, clamped to `[0, max]`.
///
/// `threshold` must be positive; config validation rejects anything else.
pub fn proximity_reward(threshold: f32, max_reward: f32, distance: f32) -> f32 {
    let reward = -max_reward * ((distance / threshold) - 1.0).powi(3);
    reward.clamp(0.0, max_reward)
}

/// Alignment reward `|cos(Δ) · max|`.
///
/// `angle_delta` is the raw, unwrapped heading delta; cosine is insensitive to
/// sign and period so no normalisation is applied here.
pub fn alignment_reward(max_reward: f32, angle_delta: f32) -> f32 {
    (angle_delta.cos() * max_reward).abs()
}

/// Per-tick velocity reward, capped so a full episode at or above
/// `threshold_velocity` earns exactly `max_reward`.
#[allow(clippy::cast_precision_loss)]
pub fn velocity_reward(speed: f32, max_reward: f32, threshold_velocity: f32, max_steps: u32) -> f32 {
    let steps = max_steps as f32;
    let multiplier = max_reward / (threshold_velocity * steps);
    (max_reward / steps).min(speed * multiplier)
}

/// Per-tick reward for sitting inside the goal, split evenly between centring
/// and alignment and spread over `max_steps`.
#[allow(clippy::cast_precision_loss)]
pub fn staying_in_goal_reward(
    max_reward: f32,
    threshold_precision: f32,
    distance: f32,
    angle_delta: f32,
    max_steps: u32,
) -> f32 {
    let centring = proximity_reward(0.5 * threshold_precision, 0.5, distance);
    let alignment = alignment_reward(0.5, angle_delta);
    max_reward * (centring + alignment) / max_steps as f32
}

/// Spread a per-episode magnitude evenly over `max_steps`.
#[allow(clippy::cast_precision_loss)]
pub fn per_step(magnitude: f32, max_steps: u32) -> f32 {
    magnitude / max_steps as f32
}

// ---------------------------------------------------------------------------
// RewardTerm
// ---------------------------------------------------------------------------

/// Every reward or penalty the episode engine can apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RewardTerm {
    Velocity,
    Proximity,
    SpottedGoal,
    StayingInGoal,
    EnteredGoal,
    Collision,
    LeftParking,
    TimePenalty,
    OffroadPenalty,
    Precision,
    Alignment,
    ExceedDistance,
}

impl RewardTerm {
    /// Human-readable name for this term.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Velocity => "velocity",
            Self::Proximity => "proximity",
            Self::SpottedGoal => "spotted_goal",
            Self::StayingInGoal => "staying_in_goal",
            Self::EnteredGoal => "entered_goal",
            Self::Collision => "collision",
            Self::LeftParking => "left_parking",
            Self::TimePenalty => "time_penalty",
            Self::OffroadPenalty => "offroad_penalty",
            Self::Precision => "precision",
            Self::Alignment => "alignment",
            Self::ExceedDistance => "exceed_distance",
        }
    }

    /// Whether this term is granted at most once per episode.
    pub const fn is_one_shot(self) -> bool {
        matches!(
            self,
            Self::SpottedGoal
                | Self::EnteredGoal
                | Self::Precision
                | Self::Alignment
                | Self::ExceedDistance
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_3, PI};

    const TOL: f32 = 1e-5;

    // -- proximity_reward --

    #[test]
    fn proximity_saturates_at_zero_distance() {
        assert!((proximity_reward(10.0, 2.5, 0.0) - 2.5).abs() < TOL);
    }

    #[test]
    fn proximity_is_zero_at_and_beyond_threshold() {
        assert!(proximity_reward(10.0, 2.5, 10.0).abs() < TOL);
        assert!(proximity_reward(10.0, 2.5, 15.0).abs() < TOL);
        assert!(proximity_reward(10.0, 2.5, 1000.0).abs() < TOL);
    }

    #[test]
    fn proximity_midpoint_value() {
        // -(0.5 - 1)^3 = 0.125
        assert!((proximity_reward(10.0, 8.0, 5.0) - 1.0).abs() < TOL);
    }

    #[test]
    fn proximity_rises_as_distance_shrinks() {
        let mut last = proximity_reward(4.0, 1.0, 4.0);
        for i in (0..40).rev() {
            #[allow(clippy::cast_precision_loss)]
            let r = proximity_reward(4.0, 1.0, i as f32 * 0.1);
            assert!(r >= last);
            last = r;
        }
    }

    #[test]
    fn proximity_is_bounded() {
        for threshold in [0.1_f32, 0.5, 1.0, 10.0, 250.0] {
            for max in [0.01_f32, 1.0, 5.0, 100.0] {
                for step in 0..200 {
                    #[allow(clippy::cast_precision_loss)]
                    let distance = step as f32 * 0.37;
                    let r = proximity_reward(threshold, max, distance);
                    assert!((0.0..=max).contains(&r), "r={r} t={threshold} m={max} d={distance}");
                }
            }
        }
    }

    // -- alignment_reward --

    #[test]
    fn alignment_max_when_parallel_or_reversed() {
        assert!((alignment_reward(2.5, 0.0) - 2.5).abs() < TOL);
        assert!((alignment_reward(2.5, PI) - 2.5).abs() < TOL);
    }

    #[test]
    fn alignment_zero_when_perpendicular() {
        assert!(alignment_reward(2.5, FRAC_PI_2).abs() < TOL);
    }

    #[test]
    fn alignment_symmetry() {
        for i in -50..50 {
            #[allow(clippy::cast_precision_loss)]
            let theta = i as f32 * 0.13;
            let base = alignment_reward(3.0, theta);
            assert!((base - alignment_reward(3.0, -theta)).abs() < 1e-4);
            assert!((base - alignment_reward(3.0, theta + PI)).abs() < 1e-4);
        }
    }

    #[test]
    fn alignment_accepts_unwrapped_angles() {
        let wrapped = alignment_reward(1.0, FRAC_PI_3);
        let unwrapped = alignment_reward(1.0, FRAC_PI_3 - 2.0 * PI);
        assert!((wrapped - unwrapped).abs() < 1e-4);
    }

    // -- velocity_reward --

    #[test]
    fn velocity_reward_scales_linearly_below_threshold() {
        // max 1, threshold 3, 100 steps: multiplier = 1/300
        let r = velocity_reward(1.5, 1.0, 3.0, 100);
        assert!((r - 0.005).abs() < TOL);
    }

    #[test]
    fn velocity_reward_caps_at_threshold() {
        let r = velocity_reward(30.0, 1.0, 3.0, 100);
        assert!((r - 0.01).abs() < TOL);
    }

    #[test]
    fn velocity_reward_zero_when_stopped() {
        assert!(velocity_reward(0.0, 1.0, 3.0, 100).abs() < TOL);
    }

    // -- staying_in_goal_reward --

    #[test]
    fn staying_in_goal_perfect_parking() {
        // centring 0.5 + alignment 0.5 = 1.0, * 5 / 100
        let r = staying_in_goal_reward(5.0, 1.0, 0.0, 0.0, 100);
        assert!((r - 0.05).abs() < TOL);
    }

    #[test]
    fn staying_in_goal_off_centre_and_sideways() {
        // distance beyond 0.5 * precision: centring 0; perpendicular: alignment 0
        let r = staying_in_goal_reward(5.0, 1.0, 0.6, FRAC_PI_2, 100);
        assert!(r.abs() < TOL);
    }

    #[test]
    fn per_step_divides() {
        assert!((per_step(2.5, 5000) - 0.0005).abs() < TOL);
    }

    // -- RewardTerm --

    #[test]
    fn reward_term_names_are_unique() {
        use std::collections::HashSet;
        let terms = [
            RewardTerm::Velocity,
            RewardTerm::Proximity,
            RewardTerm::SpottedGoal,
            RewardTerm::StayingInGoal,
            RewardTerm::EnteredGoal,
            RewardTerm::Collision,
            RewardTerm::LeftParking,
            RewardTerm::TimePenalty,
            RewardTerm::OffroadPenalty,
            RewardTerm::Precision,
            RewardTerm::Alignment,
            RewardTerm::ExceedDistance,
        ];
        let names: HashSet<_> = terms.iter().map(|t| t.name()).collect();
        assert_eq!(names.len(), terms.len());
    }

    #[test]
    fn reward_term_one_shot() {
        assert!(RewardTerm::SpottedGoal.is_one_shot());
        assert!(RewardTerm::EnteredGoal.is_one_shot());
        assert!(!RewardTerm::Collision.is_one_shot());
        assert!(!RewardTerm::StayingInGoal.is_one_shot());
    }
}
