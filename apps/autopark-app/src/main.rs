//! Autopark parking environment CLI.
//!
//! Provides two modes of operation:
//! - `headless`: Run N scripted episodes locally and print statistics
//! - `info`: Print the effective scene configuration

mod autopilot;

use std::path::PathBuf;
use std::process::ExitCode;

use autopark_core::AutoparkSet;
use autopark_core::config::SceneConfig;
use autopark_core::error::AutoparkError;
use autopark_sim::{EpisodeStats, SceneBuilder};
use bevy::log::LogPlugin;
use bevy::prelude::*;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;

use crate::autopilot::{Autopilot, autopilot_system};

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

/// Autonomous-parking episode runner.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Scene file (TOML). Built-in defaults when omitted.
    #[arg(long, global = true)]
    scene: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run episodes locally with the scripted driver and print statistics.
    Headless {
        /// Number of episodes to run.
        #[arg(short = 'n', long, default_value_t = 1)]
        episodes: u32,

        /// Stop after this many frames even if episodes remain.
        #[arg(long, default_value_t = 100_000)]
        max_frames: u64,

        /// Maximum steps per episode, overriding the scene.
        #[arg(short, long)]
        max_steps: Option<u32>,

        /// Spawn seed, overriding the scene.
        #[arg(short, long)]
        seed: Option<u64>,

        /// Frames between two decision steps.
        #[arg(long, default_value_t = 5)]
        decision_interval: u32,
    },

    /// Print the effective scene configuration.
    Info {
        #[arg(long, value_enum, default_value_t = Format::Toml)]
        format: Format,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Toml,
    Json,
}

// ---------------------------------------------------------------------------
// Mode implementations
// ---------------------------------------------------------------------------

fn load_scene(path: Option<&PathBuf>) -> Result<SceneConfig, AutoparkError> {
    match path {
        Some(path) => Ok(SceneConfig::from_file(path)?),
        None => Ok(SceneConfig::default()),
    }
}

fn run_headless(
    mut scene: SceneConfig,
    episodes: u32,
    max_frames: u64,
    max_steps: Option<u32>,
    seed: Option<u64>,
    decision_interval: u32,
) -> Result<(), AutoparkError> {
    if let Some(steps) = max_steps {
        scene.episode.max_steps = steps;
    }
    if let Some(seed) = seed {
        scene.spawn.seed = seed;
    }
    // Headless runs always chain episodes.
    scene.episode.auto_reset = true;

    let name = scene.meta.name.clone();
    let mut spawned = SceneBuilder::new().with_scene(scene).build_with(|app| {
        app.add_plugins(LogPlugin::default())
            .insert_resource(Autopilot::new(decision_interval))
            .add_systems(Update, autopilot_system.before(AutoparkSet::Begin));
    })?;
    let app = &mut spawned.app;

    info!(scene = %name, episodes, "starting headless run");

    let mut frames = 0_u64;
    let mut reported = 0_usize;
    while frames < max_frames {
        app.update();
        frames += 1;

        let stats = app.world().resource::<EpisodeStats>();
        for i in reported..stats.step_history.len() {
            println!(
                "episode {}: outcome={:?}, steps={}, reward={:.3}",
                i + 1,
                stats.outcome_history[i],
                stats.step_history[i],
                stats.reward_history[i]
            );
        }
        reported = stats.step_history.len();
        if stats.episodes_completed >= episodes {
            break;
        }
    }

    let stats = app.world().resource::<EpisodeStats>();
    println!(
        "\ntotal: episodes={}, successes={}, failures={}, steps={}, frames={frames}",
        stats.episodes_completed, stats.successes, stats.failures, stats.total_steps
    );
    if let Some(rate) = stats.success_rate() {
        println!("success rate: {:.1}%", rate * 100.0);
    }
    if let Some(mean) = stats.mean_reward() {
        println!("mean reward: {mean:.3}");
    }
    Ok(())
}

fn run_info(scene: &SceneConfig, format: Format) -> Result<(), String> {
    println!("autopark v{}", env!("CARGO_PKG_VERSION"));
    println!();
    let rendered = match format {
        Format::Toml => toml::to_string_pretty(scene).map_err(|e| e.to_string())?,
        Format::Json => serde_json::to_string_pretty(scene).map_err(|e| e.to_string())?,
    };
    println!("{rendered}");
    Ok(())
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    let cli = Cli::parse();

    let scene = match load_scene(cli.scene.as_ref()) {
        Ok(scene) => scene,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let result = match cli.command {
        Some(Commands::Headless {
            episodes,
            max_frames,
            max_steps,
            seed,
            decision_interval,
        }) => run_headless(scene, episodes, max_frames, max_steps, seed, decision_interval)
            .map_err(|e| e.to_string()),
        Some(Commands::Info { format }) => run_info(&scene, format),
        None => run_headless(scene, 1, 100_000, None, None, 5).map_err(|e| e.to_string()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
