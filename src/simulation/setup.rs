//! Collaborator resolution for newly added points managers.

use bevy::prelude::*;

use crate::resources::{BeamState, MechanicalState, PointSetTopology, TopologyModifier};

use super::manager::{CollaboratorProbe, ManagerStatus, PointsManager};

/// Resolve collaborators of every manager that has not been initialized.
///
/// Topology, mechanical state and modifier must sit on the manager's own
/// entity; the beam is the entity whose `Name` matches `beam_path`. When
/// several beams share that name, the first one the query yields wins and
/// a warning is logged.
/// Failures are logged and leave the manager degraded for good.
pub fn resolve_collaborators(
    mut managers: Query<(
        Entity,
        &mut PointsManager,
        Has<PointSetTopology>,
        Has<MechanicalState>,
        Has<TopologyModifier>,
    )>,
    beams: Query<(Entity, &Name), With<BeamState>>,
) {
    for (entity, mut manager, topology, mechanical_state, modifier) in &mut managers {
        if *manager.status() != ManagerStatus::Unresolved {
            continue;
        }

        let path = manager.config().beam_path.as_str();
        let mut matches = beams
            .iter()
            .filter(|(_, name)| name.as_str() == path)
            .map(|(beam, _)| beam);
        // Query order is not stable, so a shared name resolves to any one of them
        let beam = matches.next();
        let others = matches.count();
        if others > 0 {
            warn!(
                "points manager {}: {} beams named '{}', following {:?}",
                entity,
                others + 1,
                path,
                beam
            );
        }

        let probe = CollaboratorProbe {
            topology,
            mechanical_state,
            modifier,
            beam,
        };
        match manager.init(probe) {
            Ok(beam) => info!("points manager {} following beam {}", entity, beam),
            Err(err) => {
                for missing in &err.missing {
                    error!("points manager {}: cannot find {}", entity, missing);
                }
            }
        }
    }
}
