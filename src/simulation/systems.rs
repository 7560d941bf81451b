//! Systems applying point commands and publishing topology changes.
//!
//! Stages, in order within a frame:
//! 1. Resolve collaborators of new managers
//! 2. Map input to commands
//! 3. Apply commands to every manager
//! 4. Publish committed topology changes

use bevy::prelude::*;

use crate::resources::{
    BeamState, MechanicalState, PointSetTopology, TopologyChange, TopologyHandle, TopologyModifier,
};

use super::input::PointsCommand;
use super::manager::{PointEdit, PointsManager};

/// A committed topology edit on the point set of `entity`.
#[derive(Event, Clone, Debug, PartialEq, Eq)]
pub struct TopologyChanged {
    pub entity: Entity,
    pub change: TopologyChange,
}

/// Apply this frame's commands to every manager.
///
/// Commands are applied in the order they were sent. A manager that is not
/// ready, or an edit that fails its preconditions, logs and changes nothing.
pub fn apply_points_commands(
    mut commands: EventReader<PointsCommand>,
    mut managers: Query<(
        Entity,
        &PointsManager,
        Option<&mut PointSetTopology>,
        Option<&mut MechanicalState>,
        Option<&mut TopologyModifier>,
    )>,
    beams: Query<&BeamState>,
) {
    let pending: Vec<PointsCommand> = commands
        .read()
        .copied()
        .filter(|command| *command != PointsCommand::Other)
        .collect();
    if pending.is_empty() {
        return;
    }

    for (entity, manager, topology, state, modifier) in &mut managers {
        let (Some(mut topology), Some(mut state), Some(mut modifier)) = (topology, state, modifier)
        else {
            warn!("points manager {} has no point set to edit", entity);
            continue;
        };
        let beam = manager.beam().and_then(|beam| beams.get(beam).ok());

        let mut handle = TopologyHandle {
            topology: &mut *topology,
            modifier: &mut *modifier,
        };
        for command in &pending {
            match manager.handle_command(*command, &mut handle, &mut *state, beam) {
                Ok(Some(PointEdit::Added { index, position })) => {
                    info!("points manager {}: point {} created at {}", entity, index, position);
                }
                Ok(Some(PointEdit::Removed { index })) => {
                    info!("points manager {}: point {} removed", entity, index);
                }
                Ok(None) => {}
                Err(err) => warn!("points manager {}: {:?} refused: {}", entity, command, err),
            }
        }
    }
}

/// Drain committed changes from every modifier into [`TopologyChanged`] events.
pub fn propagate_topology_changes(
    mut modifiers: Query<(Entity, &mut TopologyModifier)>,
    mut changed: EventWriter<TopologyChanged>,
) {
    for (entity, mut modifier) in &mut modifiers {
        // Skip empty modifiers to keep change detection quiet
        if !modifier.has_committed() {
            continue;
        }
        for change in modifier.drain_committed() {
            changed.send(TopologyChanged { entity, change });
        }
    }
}
