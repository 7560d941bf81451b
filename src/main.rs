//! Tip Points - Needle Demo
//!
//! A swaying cantilever needle. Press S to drop a point at the needle tip,
//! L to remove the last one.

use bevy::prelude::*;
use tip_points::resources::{BeamState, MechanicalState};
use tip_points::simulation::scenarios::{setup_needle_scene, sway_beam};
use tip_points::simulation::{PointsSet, TipPointsPlugin, TopologyChanged};

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Tip Points".into(),
                resolution: (1280.0, 720.0).into(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(TipPointsPlugin)
        .add_systems(Startup, (setup_camera, setup_needle_scene))
        .add_systems(Update, sway_beam.before(PointsSet::Apply))
        .add_systems(Update, (draw_beams, log_topology_changes, log_frame))
        .run();
}

/// Set up a 3D camera looking at the needle
fn setup_camera(mut commands: Commands) {
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(5.0, 2.0, 18.0).looking_at(Vec3::new(5.0, 0.0, 0.0), Vec3::Y),
    ));
    commands.insert_resource(FrameCounter(0));
}

/// Draw beam centrelines as polylines
fn draw_beams(mut gizmos: Gizmos, beams: Query<&BeamState>) {
    for beam in &beams {
        gizmos.linestrip(beam.positions.iter().copied(), Color::srgb(0.8, 0.8, 0.8));
    }
}

fn log_topology_changes(
    mut changed: EventReader<TopologyChanged>,
    states: Query<&MechanicalState>,
) {
    for event in changed.read() {
        let count = states.get(event.entity).map_or(0, |state| state.len());
        debug!("{:?} on {} ({} points)", event.change, event.entity, count);
    }
}

/// Frame counter for logging
#[derive(Resource)]
struct FrameCounter(u32);

/// Log every N frames
fn log_frame(mut counter: ResMut<FrameCounter>, states: Query<&MechanicalState>) {
    counter.0 += 1;
    if counter.0 % 60 == 0 {
        let points: usize = states.iter().map(|state| state.len()).sum();
        info!("Frame {}: {} tip points", counter.0, points);
    }
}
