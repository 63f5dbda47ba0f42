//! End-to-end tests for the full stack: scene construction, kinematic
//! driving, overlap contacts, episode lifecycle and statistics.

#[cfg(test)]
mod tests {
    use autopark_core::config::{EpisodeConfig, ParkedCarConfig, SceneConfig};
    use autopark_core::types::Outcome;
    use autopark_env::engine::ParkingEpisode;
    use autopark_env::systems::TelemetrySnapshot;

    use crate::builder::{SceneBuilder, SpawnedScene};
    use crate::drive::DriveCommand;
    use crate::stats::EpisodeStats;

    fn forward(speed: f32) -> DriveCommand {
        DriveCommand {
            speed,
            yaw_rate: 0.0,
        }
    }

    fn run(scene: &mut SpawnedScene, frames: usize) {
        for _ in 0..frames {
            scene.app.update();
        }
    }

    fn episode(scene: &SpawnedScene) -> &ParkingEpisode {
        scene.app.world().resource::<ParkingEpisode>()
    }

    // -----------------------------------------------------------------------
    // Parking
    // -----------------------------------------------------------------------

    #[test]
    fn drive_into_bay_and_park() {
        let mut scene = SceneBuilder::new().build().unwrap();
        scene.app.update();
        assert!(episode(&scene).flags().has_spotted_goal());

        // 100 ticks at 5 m/s with 0.02 s ticks covers the 10 m to the bay
        scene.drive(forward(5.0));
        run(&mut scene, 100);
        scene.drive(DriveCommand::default());
        let parked = scene.vehicle_pose().unwrap();
        assert!((parked.position.z - 10.0).abs() < 0.01);
        assert!(episode(&scene).flags().has_entered_goal());

        // 5 s of 0.02 s ticks, plus the tick that crosses the threshold
        run(&mut scene, 252);

        let stats = scene.app.world().resource::<EpisodeStats>();
        assert_eq!(stats.successes, 1, "outcome: {:?}", episode(&scene).outcome());
        assert_eq!(stats.failures, 0);
        let reward = stats.last_reward().unwrap();
        // spotted 2.5 + entered 10 + precision and alignment near their maxima
        assert!(reward > 15.0, "episode reward {reward}");
    }

    #[test]
    fn auto_reset_returns_vehicle_to_start() {
        let mut scene = SceneBuilder::new().build().unwrap();
        scene.app.update();

        // reversing past the allowed distance from the goal
        scene.drive(forward(-10.0));
        run(&mut scene, 60);

        let stats = scene.app.world().resource::<EpisodeStats>();
        assert_eq!(stats.failures, 1);
        assert!(episode(&scene).episode_number() >= 2);

        let pose = scene.vehicle_pose().unwrap();
        assert!(pose.position.z.abs() < 1e-6);
        assert!(pose.speed().abs() < f32::EPSILON);
        assert_eq!(
            scene.app.world().get::<DriveCommand>(scene.vehicle),
            Some(&DriveCommand::default())
        );
    }

    #[test]
    fn hitting_parked_car_costs_collision_penalty() {
        let mut file = SceneConfig::default();
        file.lot.parked_cars = vec![ParkedCarConfig {
            position: [0.0, 0.5, 6.0],
            heading_deg: 0.0,
        }];
        let mut scene = SceneBuilder::new().with_scene(file).build().unwrap();
        scene.app.update();
        let before = episode(&scene).cumulative_reward();

        // gap between the bumpers is 1.5 m
        scene.drive(forward(5.0));
        run(&mut scene, 20);

        let ep = episode(&scene);
        assert_eq!(ep.outcome(), Outcome::Running);
        assert!(ep.cumulative_reward() - before < -9.0);
    }

    #[test]
    fn max_steps_truncates_idle_episode() {
        let mut scene = SceneBuilder::new()
            .with_episode_config(EpisodeConfig::default().with_max_steps(5))
            .build()
            .unwrap();
        run(&mut scene, 5);

        let stats = scene.app.world().resource::<EpisodeStats>();
        assert_eq!(stats.episodes_completed, 1);
        assert_eq!(stats.step_history, vec![5]);
        assert_eq!(stats.failures, 1);
    }

    #[test]
    fn telemetry_follows_vehicle() {
        let mut scene = SceneBuilder::new().build().unwrap();
        scene.app.update();
        scene.drive(forward(5.0));
        run(&mut scene, 10);

        let telemetry = scene
            .app
            .world()
            .resource::<TelemetrySnapshot>()
            .0
            .clone()
            .unwrap();
        assert_eq!(telemetry.episode, 1);
        assert!((telemetry.speed - 5.0).abs() < 1e-4);
        assert!((telemetry.goal_distance - 9.0).abs() < 0.01);
        assert!(telemetry.is_spotting_goal);
        assert!(!telemetry.is_offroad);
    }

    // -----------------------------------------------------------------------
    // Scene files
    // -----------------------------------------------------------------------

    #[test]
    fn shipped_scene_builds_and_randomises_spawn() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../scenes/side_bays.toml");
        let file = SceneConfig::from_file(path).unwrap();
        let mut scene = SceneBuilder::new().with_scene(file).build().unwrap();
        assert_eq!(scene.parked_cars.len(), 2);

        scene.app.update();
        let start = scene.vehicle_pose().unwrap();
        assert!((-2.0..2.0).contains(&start.position.x));
        assert!((start.position.z + 6.0).abs() < f32::EPSILON);
        assert!(episode(&scene).config().rewards.enable_velocity);
    }
}
