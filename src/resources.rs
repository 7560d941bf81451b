//! Host-side state containers for the tip point set.
//!
//! These are the collaborators a `PointsManager` works against: the
//! mechanical state holding both position layers, the point-set topology,
//! the topology modifier, and the beam whose tip is sampled. They live as
//! components on scene entities and are owned by the app, not the manager.

use bevy::prelude::*;

use crate::simulation::{BeamSource, PointSink, StateContainer, TopologyProvider};

/// Semantic identifier of a position layer in a [`MechanicalState`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VecId {
    /// Constrained position, as seen by collision and constraint solving
    Position,
    /// Unconstrained position, advanced by the free-motion step
    FreePosition,
}

/// Mechanical state of the point set.
///
/// `position` and `free_position` always have the same length; every
/// edit goes through [`StateContainer`] and resizes both together.
#[derive(Component, Clone, Debug, Default, PartialEq)]
pub struct MechanicalState {
    pub position: Vec<Vec3>,
    pub free_position: Vec<Vec3>,
}

impl MechanicalState {
    /// Create a state with both layers initialised to `points`.
    pub fn from_points(points: Vec<Vec3>) -> Self {
        Self {
            free_position: points.clone(),
            position: points,
        }
    }

    /// Number of points, taken from the constrained layer
    pub fn len(&self) -> usize {
        self.position.len()
    }

    pub fn is_empty(&self) -> bool {
        self.position.is_empty()
    }

    /// True when both layers agree in length.
    pub fn is_consistent(&self) -> bool {
        self.position.len() == self.free_position.len()
    }
}

impl StateContainer for MechanicalState {
    fn read(&self, id: VecId) -> &[Vec3] {
        match id {
            VecId::Position => &self.position,
            VecId::FreePosition => &self.free_position,
        }
    }

    fn write(&mut self, id: VecId) -> &mut Vec<Vec3> {
        match id {
            VecId::Position => &mut self.position,
            VecId::FreePosition => &mut self.free_position,
        }
    }
}

/// Discretised beam centreline. The last position is the tip.
#[derive(Component, Clone, Debug, Default, PartialEq)]
pub struct BeamState {
    pub positions: Vec<Vec3>,
}

impl BeamState {
    pub fn new(positions: Vec<Vec3>) -> Self {
        Self { positions }
    }
}

impl BeamSource for BeamState {
    fn read_positions(&self) -> &[Vec3] {
        &self.positions
    }
}

/// Point-set topology container: only the point count is tracked.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PointSetTopology {
    pub nb_points: usize,
}

impl PointSetTopology {
    pub fn with_points(nb_points: usize) -> Self {
        Self { nb_points }
    }
}

impl TopologyProvider for PointSetTopology {
    fn nb_points(&self) -> usize {
        self.nb_points
    }
}

/// A single topology edit, as seen by listeners.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TopologyChange {
    /// `count` points appended at the end, starting at index `first`
    PointsAdded { first: usize, count: usize },
    /// Points removed, highest index first
    PointsRemoved { indices: Vec<usize> },
    /// A batch of edits is complete
    EndingEvent,
}

/// Topology modifier for a [`PointSetTopology`].
///
/// Edits with `notify` set are buffered as pending changes; the ending
/// event commits them so they can be published in one batch.
#[derive(Component, Clone, Debug, Default)]
pub struct TopologyModifier {
    pending: Vec<TopologyChange>,
    committed: Vec<TopologyChange>,
}

impl TopologyModifier {
    pub fn add_points(&mut self, topology: &mut PointSetTopology, count: usize, notify: bool) {
        let first = topology.nb_points;
        topology.nb_points += count;
        if notify {
            self.pending.push(TopologyChange::PointsAdded { first, count });
        }
    }

    /// Remove points by index. Indices past the end are ignored.
    pub fn remove_points(
        &mut self,
        topology: &mut PointSetTopology,
        indices: &[usize],
        notify: bool,
    ) {
        let mut valid: Vec<usize> = indices
            .iter()
            .copied()
            .filter(|&i| i < topology.nb_points)
            .collect();
        valid.sort_unstable_by(|a, b| b.cmp(a));
        valid.dedup();
        topology.nb_points -= valid.len();
        if notify && !valid.is_empty() {
            self.pending.push(TopologyChange::PointsRemoved { indices: valid });
        }
    }

    pub fn notify_ending_event(&mut self) {
        self.committed.append(&mut self.pending);
        self.committed.push(TopologyChange::EndingEvent);
    }

    /// Changes recorded but not yet committed by an ending event
    pub fn pending(&self) -> &[TopologyChange] {
        &self.pending
    }

    pub fn has_committed(&self) -> bool {
        !self.committed.is_empty()
    }

    /// Take every committed change, oldest first.
    pub fn drain_committed(&mut self) -> Vec<TopologyChange> {
        std::mem::take(&mut self.committed)
    }
}

/// Borrowed pairing of a modifier with the topology it edits.
///
/// This is the topology handle handed to `PointsManager`: it exposes the
/// current count and routes edits through the modifier.
pub struct TopologyHandle<'a> {
    pub topology: &'a mut PointSetTopology,
    pub modifier: &'a mut TopologyModifier,
}

impl TopologyProvider for TopologyHandle<'_> {
    fn nb_points(&self) -> usize {
        self.topology.nb_points
    }
}

impl PointSink for TopologyHandle<'_> {
    fn add_points(&mut self, count: usize, notify: bool) {
        self.modifier.add_points(self.topology, count, notify);
    }

    fn remove_points(&mut self, indices: &[usize], notify: bool) {
        self.modifier.remove_points(self.topology, indices, notify);
    }

    fn notify_ending_event(&mut self) {
        self.modifier.notify_ending_event();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn beam_tip_is_last_position() {
        let beam = BeamState::new(vec![Vec3::ZERO, Vec3::X, Vec3::new(2.0, 0.5, 0.0)]);
        assert_eq!(beam.tip(), Some(Vec3::new(2.0, 0.5, 0.0)));
        assert_eq!(BeamState::default().tip(), None);
    }

    #[test]
    fn modifier_commits_pending_on_ending_event() {
        let mut topology = PointSetTopology::with_points(2);
        let mut modifier = TopologyModifier::default();

        modifier.add_points(&mut topology, 1, true);
        assert_eq!(topology.nb_points, 3);
        assert_eq!(modifier.pending().len(), 1);
        assert!(modifier.drain_committed().is_empty());

        modifier.notify_ending_event();
        assert!(modifier.pending().is_empty());
        assert_eq!(
            modifier.drain_committed(),
            vec![
                TopologyChange::PointsAdded { first: 2, count: 1 },
                TopologyChange::EndingEvent,
            ]
        );
    }

    #[test]
    fn modifier_ignores_out_of_range_removals() {
        let mut topology = PointSetTopology::with_points(3);
        let mut modifier = TopologyModifier::default();

        modifier.remove_points(&mut topology, &[7, 2, 2], true);
        assert_eq!(topology.nb_points, 2);
        assert_eq!(
            modifier.pending(),
            &[TopologyChange::PointsRemoved { indices: vec![2] }]
        );
    }

    #[test]
    fn silent_edits_are_not_recorded() {
        let mut topology = PointSetTopology::default();
        let mut modifier = TopologyModifier::default();
        modifier.add_points(&mut topology, 4, false);
        assert_eq!(topology.nb_points, 4);
        assert!(modifier.pending().is_empty());
    }

    #[test]
    fn state_container_layers() {
        let mut state = MechanicalState::from_points(vec![Vec3::Y]);
        state.write(VecId::FreePosition).push(Vec3::Z);
        assert!(!state.is_consistent());
        assert_eq!(state.read(VecId::Position), &[Vec3::Y]);
        assert_eq!(state.read(VecId::FreePosition), &[Vec3::Y, Vec3::Z]);
    }
}
