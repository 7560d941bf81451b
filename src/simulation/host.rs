//! Capabilities a points manager needs from its host.
//!
//! The manager never looks collaborators up on its own; the ECS layer
//! borrows them from the scene and passes them in through these traits.

use bevy::math::Vec3;

use crate::resources::VecId;

/// Read access to the current point count of a topology.
pub trait TopologyProvider {
    fn nb_points(&self) -> usize;
}

/// Incremental topology edits with change notification.
pub trait PointSink {
    /// Append `count` points at the end of the topology.
    fn add_points(&mut self, count: usize, notify: bool);
    /// Remove the points at `indices`.
    fn remove_points(&mut self, indices: &[usize], notify: bool);
    /// Signal that the current batch of edits is complete.
    fn notify_ending_event(&mut self);
}

/// Typed access to position layers by semantic identifier.
pub trait StateContainer {
    fn read(&self, id: VecId) -> &[Vec3];
    fn write(&mut self, id: VecId) -> &mut Vec<Vec3>;
}

/// Read-only beam centreline.
pub trait BeamSource {
    fn read_positions(&self) -> &[Vec3];

    /// Last position of the centreline, if any
    fn tip(&self) -> Option<Vec3> {
        self.read_positions().last().copied()
    }
}
