//! Points manager: keeps a point set in step with a beam tip.
//!
//! A manager appends a point at the current beam tip or removes the last
//! point, editing the topology and both position layers together. It holds
//! no collaborators itself; they are checked once at initialization and
//! then borrowed per edit.

use std::fmt;

use bevy::prelude::*;

use super::host::{BeamSource, PointSink, StateContainer, TopologyProvider};
use super::input::PointsCommand;
use super::points_config::PointsManagerConfig;
use crate::resources::VecId;

/// A collaborator a manager depends on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Collaborator {
    Topology,
    MechanicalState,
    /// Beam state, looked up by entity name
    Beam { path: String },
    Modifier,
}

impl fmt::Display for Collaborator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Collaborator::Topology => write!(f, "point set topology"),
            Collaborator::MechanicalState => write!(f, "mechanical state"),
            Collaborator::Beam { path } => write!(f, "beam state at '{}'", path),
            Collaborator::Modifier => write!(f, "topology modifier"),
        }
    }
}

/// Initialization failed: at least one collaborator is missing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InitError {
    pub missing: Vec<Collaborator>,
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot find ")?;
        for (i, collaborator) in self.missing.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", collaborator)?;
        }
        Ok(())
    }
}

impl std::error::Error for InitError {}

/// Errors from point edits. A failed edit leaves all state untouched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PointsError {
    /// Initialization has not run yet, or it failed
    NotReady,
    /// A collaborator was not supplied for this edit
    MissingCollaborator(Collaborator),
    /// The beam has no positions, so there is no tip
    EmptyBeam,
    /// There is no point to remove
    EmptyPointSet,
    /// The configured point limit is reached
    PointLimitReached { limit: usize },
}

impl fmt::Display for PointsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointsError::NotReady => write!(f, "points manager is not initialized"),
            PointsError::MissingCollaborator(c) => write!(f, "missing {}", c),
            PointsError::EmptyBeam => write!(f, "beam has no positions"),
            PointsError::EmptyPointSet => write!(f, "point set is empty"),
            PointsError::PointLimitReached { limit } => {
                write!(f, "point limit of {} reached", limit)
            }
        }
    }
}

impl std::error::Error for PointsError {}

/// What an edit did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointEdit {
    Added { index: usize, position: Vec3 },
    Removed { index: usize },
}

/// Presence of each collaborator, as found by the host.
#[derive(Clone, Copy, Debug, Default)]
pub struct CollaboratorProbe {
    pub topology: bool,
    pub mechanical_state: bool,
    pub modifier: bool,
    pub beam: Option<Entity>,
}

/// Readiness of a manager.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ManagerStatus {
    /// Collaborators not looked up yet
    #[default]
    Unresolved,
    Ready { beam: Entity },
    /// Initialization failed; edits are refused
    Degraded(InitError),
}

/// Grows and shrinks a point set at the tip of a beam.
#[derive(Component, Clone, Debug, Default)]
pub struct PointsManager {
    config: PointsManagerConfig,
    status: ManagerStatus,
}

impl PointsManager {
    pub fn new(config: PointsManagerConfig) -> Self {
        Self {
            config,
            status: ManagerStatus::Unresolved,
        }
    }

    pub fn config(&self) -> &PointsManagerConfig {
        &self.config
    }

    pub fn status(&self) -> &ManagerStatus {
        &self.status
    }

    /// Beam entity once initialization succeeded
    pub fn beam(&self) -> Option<Entity> {
        match self.status {
            ManagerStatus::Ready { beam } => Some(beam),
            _ => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.status, ManagerStatus::Ready { .. })
    }

    /// Check collaborators and record the outcome.
    ///
    /// Every missing collaborator is reported, not only the first.
    pub fn init(&mut self, probe: CollaboratorProbe) -> Result<Entity, InitError> {
        let mut missing = Vec::new();
        if !probe.topology {
            missing.push(Collaborator::Topology);
        }
        if !probe.mechanical_state {
            missing.push(Collaborator::MechanicalState);
        }
        if probe.beam.is_none() {
            missing.push(Collaborator::Beam {
                path: self.config.beam_path.clone(),
            });
        }
        if !probe.modifier {
            missing.push(Collaborator::Modifier);
        }

        match probe.beam {
            Some(beam) if missing.is_empty() => {
                self.status = ManagerStatus::Ready { beam };
                Ok(beam)
            }
            _ => {
                let err = InitError { missing };
                self.status = ManagerStatus::Degraded(err.clone());
                Err(err)
            }
        }
    }

    fn ensure_ready(&self) -> Result<(), PointsError> {
        if self.is_ready() {
            Ok(())
        } else {
            Err(PointsError::NotReady)
        }
    }

    /// Append one point at the beam tip.
    ///
    /// Both position layers are resized to the new topology count and the
    /// tip is written to the new last slot of each.
    pub fn add_new_point_to_state<T, S, B>(
        &self,
        topology: &mut T,
        state: &mut S,
        beam: &B,
    ) -> Result<PointEdit, PointsError>
    where
        T: TopologyProvider + PointSink + ?Sized,
        S: StateContainer + ?Sized,
        B: BeamSource + ?Sized,
    {
        self.ensure_ready()?;

        let nb_points = topology.nb_points();
        if !self.config.allows_append(nb_points) {
            // allows_append only refuses when a limit is set
            let limit = self.config.max_points.unwrap_or(nb_points);
            return Err(PointsError::PointLimitReached { limit });
        }
        let tip = beam.tip().ok_or(PointsError::EmptyBeam)?;

        let stored = state.read(VecId::Position).len();
        if stored != nb_points {
            warn!(
                "state holds {} points but topology has {}, resizing to topology",
                stored, nb_points
            );
        }

        topology.add_points(1, true);
        for id in [VecId::Position, VecId::FreePosition] {
            let layer = state.write(id);
            layer.resize(nb_points + 1, Vec3::ZERO);
            layer[nb_points] = tip;
        }
        topology.notify_ending_event();

        debug!("point {} added at beam tip {}", nb_points, tip);
        Ok(PointEdit::Added {
            index: nb_points,
            position: tip,
        })
    }

    /// Remove the highest-indexed point.
    pub fn remove_last_point_from_state<T, S>(
        &self,
        topology: &mut T,
        state: &mut S,
    ) -> Result<PointEdit, PointsError>
    where
        T: TopologyProvider + PointSink + ?Sized,
        S: StateContainer + ?Sized,
    {
        self.ensure_ready()?;

        let nb_points = topology.nb_points();
        if nb_points == 0 {
            return Err(PointsError::EmptyPointSet);
        }
        let last = nb_points - 1;

        topology.remove_points(&[last], true);
        for id in [VecId::Position, VecId::FreePosition] {
            state.write(id).resize(last, Vec3::ZERO);
        }
        topology.notify_ending_event();

        debug!("point {} removed", last);
        Ok(PointEdit::Removed { index: last })
    }

    /// Dispatch a command. `Other` is a no-op and returns `Ok(None)`;
    /// edits on a manager that is not ready fail with `NotReady`.
    pub fn handle_command<T, S, B>(
        &self,
        command: PointsCommand,
        topology: &mut T,
        state: &mut S,
        beam: Option<&B>,
    ) -> Result<Option<PointEdit>, PointsError>
    where
        T: TopologyProvider + PointSink + ?Sized,
        S: StateContainer + ?Sized,
        B: BeamSource + ?Sized,
    {
        if command == PointsCommand::Other {
            return Ok(None);
        }
        self.ensure_ready()?;

        match command {
            PointsCommand::Append => {
                let beam = beam.ok_or_else(|| {
                    PointsError::MissingCollaborator(Collaborator::Beam {
                        path: self.config.beam_path.clone(),
                    })
                })?;
                self.add_new_point_to_state(topology, state, beam).map(Some)
            }
            PointsCommand::Remove => self.remove_last_point_from_state(topology, state).map(Some),
            PointsCommand::Other => Ok(None),
        }
    }
}
