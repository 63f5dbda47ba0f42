//! Shared test fixtures and utilities for autopark crates.
//!
//! Provides reusable helpers for building Bevy test apps, spawning a goal and
//! vehicle, and feeding contacts and decisions.

pub mod app;
pub mod episodes;
pub mod fixtures;

// ---------------------------------------------------------------------------
// Re-exports for convenience
// ---------------------------------------------------------------------------

pub use app::{full_test_app, full_test_app_with, minimal_test_app};
pub use episodes::{
    drain_messages, episode_snapshot, run_until_episode_ends, send_contact, send_decisions, step_n,
};
pub use fixtures::{car_pose, goal_pose, goal_scan, spawn_far_scene, spawn_scene};
