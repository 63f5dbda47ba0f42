//! Bevy test app builders with various plugin combinations.

use autopark_core::config::EpisodeConfig;
use bevy::prelude::*;

/// Create a minimal test app with only the core plugin.
///
/// Provides `AutoparkSet` system ordering and the default `EpisodeConfig`
/// but no episode systems.
pub fn minimal_test_app() -> App {
    let mut app = App::new();
    app.add_plugins(autopark_core::AutoparkCorePlugin);
    app.finish();
    app.cleanup();
    app
}

/// Create a test app with the core and environment plugins and default
/// episode settings.
///
/// No actors are spawned; use [`crate::fixtures::spawn_scene`] before the
/// first update.
pub fn full_test_app() -> App {
    full_test_app_with(EpisodeConfig::default())
}

/// Like [`full_test_app`], with the engine built from `config`.
pub fn full_test_app_with(config: EpisodeConfig) -> App {
    let mut app = App::new();
    app.insert_resource(config);
    app.add_plugins(autopark_core::AutoparkCorePlugin);
    app.add_plugins(autopark_env::ParkingEnvPlugin);
    app.finish();
    app.cleanup();
    app
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
