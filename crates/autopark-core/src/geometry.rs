//! Horizontal-plane geometry between the vehicle and the parking goal.
//!
//! The vertical axis is `y`. Headings follow the `atan2(x, z)` convention:
//! a forward vector of `+Z` has heading 0 and `+X` has heading `π/2`.

use bevy::math::{Vec2, Vec3};

use crate::types::{Aabb, Pose};

/// Euclidean distance between `a` and `b` projected onto the `xz` plane.
pub fn horizontal_distance(a: Vec3, b: Vec3) -> f32 {
    Vec2::new(a.x, a.z).distance(Vec2::new(b.x, b.z))
}

/// Horizontal heading of a forward vector in radians.
pub fn heading(forward: Vec3) -> f32 {
    forward.x.atan2(forward.z)
}

/// Signed difference `heading(a) - heading(b)` in radians.
///
/// Not wrapped: the result lies in `(-2π, 2π)`. Consumers that display the
/// angle fold it themselves.
pub fn heading_delta(a: Vec3, b: Vec3) -> f32 {
    heading(a) - heading(b)
}

/// Unit forward vector for a yaw angle given in radians.
pub fn forward_from_yaw(yaw: f32) -> Vec3 {
    Vec3::new(yaw.sin(), 0.0, yaw.cos())
}

/// Half extents of the axis-aligned box enclosing a box of `half_extents`
/// rotated by `yaw` about the vertical axis.
pub fn yawed_half_extents(half_extents: Vec3, yaw: f32) -> Vec3 {
    let (sin, cos) = (yaw.sin().abs(), yaw.cos().abs());
    Vec3::new(
        cos * half_extents.x + sin * half_extents.z,
        half_extents.y,
        sin * half_extents.x + cos * half_extents.z,
    )
}

/// Stationary pose at `position` facing `yaw`, with world bounds enclosing
/// a box of `half_extents` in the actor's local frame.
pub fn oriented_pose(position: Vec3, yaw: f32, half_extents: Vec3) -> Pose {
    Pose::new(
        position,
        forward_from_yaw(yaw),
        yawed_half_extents(half_extents, yaw),
    )
}

/// Strict horizontal containment of `inner` inside `outer`.
///
/// Touching edges do not count. Height and rotation are ignored.
pub fn is_contained(inner: &Aabb, outer: &Aabb) -> bool {
    outer.min.x < inner.min.x
        && outer.max.x > inner.max.x
        && outer.min.z < inner.min.z
        && outer.max.z > inner.max.z
}

/// Whether two boxes overlap on the horizontal plane. Touching edges do not
/// count.
pub fn overlaps(a: &Aabb, b: &Aabb) -> bool {
    a.min.x < b.max.x && a.max.x > b.min.x && a.min.z < b.max.z && a.max.z > b.min.z
}

/// Distance between the centres of the vehicle and goal bounds.
pub fn goal_distance(vehicle: &Pose, goal: &Pose) -> f32 {
    horizontal_distance(vehicle.bounds.center(), goal.bounds.center())
}

/// Heading of the vehicle relative to the goal's axis.
pub fn goal_heading_delta(vehicle: &Pose, goal: &Pose) -> f32 {
    heading_delta(vehicle.forward, goal.forward)
}

/// Whether the vehicle's bounds lie strictly inside the goal's bounds.
pub fn is_within_goal(vehicle: &Pose, goal: &Pose) -> bool {
    is_contained(&vehicle.bounds, &goal.bounds)
}

/// Fold a raw heading delta into `[0°, 90°]` for display.
pub fn acute_degrees(delta: f32) -> f32 {
    let deg = delta.to_degrees().rem_euclid(180.0);
    if deg > 90.0 { 180.0 - deg } else { deg }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
