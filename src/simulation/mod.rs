//! Simulation module - tip point set management for deforming beams.

mod host;
mod input;
mod manager;
mod points_config;
pub mod scenarios;
mod setup;
mod systems;

use bevy::prelude::*;

pub use host::{BeamSource, PointSink, StateContainer, TopologyProvider};
pub use input::{handle_points_input, PointsCommand};
pub use manager::{
    Collaborator, CollaboratorProbe, InitError, ManagerStatus, PointEdit, PointsError,
    PointsManager,
};
pub use points_config::{defaults, KeyBindings, PointsManagerConfig};
pub use setup::resolve_collaborators;
pub use systems::{apply_points_commands, propagate_topology_changes, TopologyChanged};

/// Ordered stages of point management within `Update`.
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone, Copy)]
pub enum PointsSet {
    Resolve,
    Input,
    Apply,
    Propagate,
}

/// Plugin that keeps tip point sets in step with their beams.
pub struct TipPointsPlugin;

impl Plugin for TipPointsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<KeyBindings>()
            .add_event::<PointsCommand>()
            .add_event::<TopologyChanged>()
            .configure_sets(
                Update,
                (
                    PointsSet::Resolve,
                    PointsSet::Input,
                    PointsSet::Apply,
                    PointsSet::Propagate,
                )
                    .chain(),
            )
            .add_systems(Update, resolve_collaborators.in_set(PointsSet::Resolve))
            .add_systems(Update, handle_points_input.in_set(PointsSet::Input))
            .add_systems(Update, apply_points_commands.in_set(PointsSet::Apply))
            .add_systems(Update, propagate_topology_changes.in_set(PointsSet::Propagate));
    }
}
