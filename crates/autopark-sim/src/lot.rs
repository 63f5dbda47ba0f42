//! Lot bookkeeping on episode begin: teleport the vehicle and put every
//! movable prop back where the scene placed it.

use autopark_core::geometry::oriented_pose;
use autopark_core::types::SurfaceTag;
use autopark_env::components::{ActorPose, LotHome, Vehicle};
use autopark_env::messages::{EpisodeBegan, RepositionVehicle};
use bevy::prelude::*;
use tracing::debug;

use crate::drive::DriveCommand;

// ---------------------------------------------------------------------------
// Components
// ---------------------------------------------------------------------------

/// Half extents of an actor in its local frame (`x` width, `z` length).
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Footprint(pub Vec3);

/// Collider tag reported when the vehicle overlaps this actor.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Surface(pub SurfaceTag);

// ---------------------------------------------------------------------------
// Systems
// ---------------------------------------------------------------------------

/// Applies the episode's reposition command to the vehicle.
pub fn apply_reposition_system(
    mut requests: MessageReader<RepositionVehicle>,
    mut vehicles: Query<(&mut ActorPose, &Footprint, Option<&mut DriveCommand>), With<Vehicle>>,
) {
    let Some(RepositionVehicle(target)) = requests.read().last().copied() else {
        return;
    };
    for (mut pose, footprint, drive) in &mut vehicles {
        let mut moved = oriented_pose(target.position, target.heading, footprint.0);
        if !target.zero_velocity {
            moved = moved.with_velocity(pose.0.velocity);
        }
        pose.0 = moved;
        if target.zero_velocity
            && let Some(mut drive) = drive
        {
            *drive = DriveCommand::default();
        }
    }
    debug!(position = ?target.position, heading = target.heading, "vehicle repositioned");
}

/// Returns every [`LotHome`] actor to its home pose when an episode begins.
pub fn reset_lot_system(
    mut began: MessageReader<EpisodeBegan>,
    mut props: Query<(&mut ActorPose, &LotHome)>,
) {
    if began.read().count() == 0 {
        return;
    }
    for (mut pose, home) in &mut props {
        pose.0 = home.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autopark_core::types::Pose;
    use autopark_env::spawn::Reposition;

    fn app() -> App {
        let mut app = App::new();
        app.add_message::<RepositionVehicle>()
            .add_message::<EpisodeBegan>()
            .add_systems(Update, (apply_reposition_system, reset_lot_system));
        app
    }

    #[test]
    fn reposition_moves_and_stops_vehicle() {
        let mut app = app();
        let half = Vec3::new(1.0, 0.75, 2.25);
        let start = Pose::new(Vec3::new(5.0, 0.5, 5.0), Vec3::Z, half)
            .with_velocity(Vec3::new(0.0, 0.0, 3.0));
        let car = app
            .world_mut()
            .spawn((
                Vehicle,
                ActorPose(start),
                Footprint(half),
                DriveCommand {
                    speed: 3.0,
                    yaw_rate: 0.2,
                },
            ))
            .id();

        app.world_mut().write_message(RepositionVehicle(Reposition {
            position: Vec3::new(0.0, 0.5, -8.0),
            heading: std::f32::consts::FRAC_PI_2,
            zero_velocity: true,
        }));
        app.update();

        let pose = app.world().get::<ActorPose>(car).unwrap().0;
        assert!((pose.position - Vec3::new(0.0, 0.5, -8.0)).length() < 1e-6);
        assert!((pose.forward - Vec3::X).length() < 1e-5);
        assert!(pose.speed().abs() < f32::EPSILON);
        // rotated a quarter turn: length now runs along x
        assert!((pose.bounds.size().x - 4.5).abs() < 1e-4);
        let drive = app.world().get::<DriveCommand>(car).unwrap();
        assert_eq!(*drive, DriveCommand::default());
    }

    #[test]
    fn lot_props_return_home_on_begin() {
        let mut app = app();
        let home = Pose::new(Vec3::new(4.0, 0.5, 10.0), Vec3::Z, Vec3::ONE);
        let prop = app
            .world_mut()
            .spawn((ActorPose(home.moved_to(Vec3::new(9.0, 0.5, 3.0))), LotHome(home)))
            .id();

        app.update();
        assert!((app.world().get::<ActorPose>(prop).unwrap().0.position.x - 9.0).abs() < 1e-6);

        app.world_mut().write_message(EpisodeBegan { episode: 1 });
        app.update();
        assert_eq!(app.world().get::<ActorPose>(prop).unwrap().0, home);
    }
}
