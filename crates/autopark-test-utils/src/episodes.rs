//! Episode lifecycle helpers for tests.
//!
//! Thin wrappers around message plumbing that reduce boilerplate in
//! integration tests.

use autopark_core::types::{ContactPhase, SurfaceTag};
use autopark_env::engine::ParkingEpisode;
use autopark_env::messages::{ContactMessage, DecisionStep, EpisodeEnded};
use bevy::prelude::*;

/// Run `n` frames (calls `app.update()` `n` times).
pub fn step_n(app: &mut App, n: usize) {
    for _ in 0..n {
        app.update();
    }
}

/// Queue a contact for the next frame.
pub fn send_contact(app: &mut App, phase: ContactPhase, tag: SurfaceTag) {
    app.world_mut().write_message(ContactMessage::tagged(phase, tag));
}

/// Queue `n` decision steps for the next frame.
pub fn send_decisions(app: &mut App, n: usize) {
    for _ in 0..n {
        app.world_mut().write_message(DecisionStep);
    }
}

/// Every `M` still buffered in the world, oldest first.
pub fn drain_messages<M: Message + Clone>(app: &App) -> Vec<M> {
    let messages = app.world().resource::<Messages<M>>();
    messages.get_cursor().read(messages).cloned().collect()
}

/// Run until an [`EpisodeEnded`] message appears or `max_frames` pass.
///
/// Returns the first ended message seen.
pub fn run_until_episode_ends(app: &mut App, max_frames: usize) -> Option<EpisodeEnded> {
    for _ in 0..max_frames {
        app.update();
        if let Some(ended) = drain_messages::<EpisodeEnded>(app).into_iter().next() {
            return Some(ended);
        }
    }
    None
}

/// `(episode, step_count, cumulative_reward)` of the running engine.
pub fn episode_snapshot(app: &App) -> (u64, u32, f32) {
    let ep = app.world().resource::<ParkingEpisode>();
    (ep.episode_number(), ep.step_count(), ep.cumulative_reward())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
