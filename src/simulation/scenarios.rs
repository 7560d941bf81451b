//! Scenes for the tip points simulation
//!
//! A needle is modelled as a cantilever beam clamped at the origin and
//! pointing along +X. Its tip sways under a periodic load so that points
//! appended over time trace the tip path.

use bevy::prelude::*;
use rand::Rng;

use crate::resources::{BeamState, MechanicalState, PointSetTopology, TopologyModifier};

use super::manager::PointsManager;
use super::points_config::PointsManagerConfig;

// ==================== SCENARIO CONFIGS ====================

pub mod config {
    /// Name the points manager uses to find the needle
    pub const BEAM_NAME: &str = "needle";
    pub const BEAM_LENGTH: f32 = 10.0;
    /// Number of frames along the centreline, clamp included
    pub const BEAM_FRAMES: usize = 16;

    // Sway Configuration
    pub const SWAY_AMPLITUDE: f32 = 2.0;
    /// Oscillations per second
    pub const SWAY_FREQUENCY: f32 = 0.25;
    /// Random tip noise, as a fraction of the amplitude
    pub const SWAY_JITTER: f32 = 0.05;
}

// ==================== BEAM SHAPES ====================

/// Centreline of a cantilever deflected by a tip load.
///
/// Uses the Euler-Bernoulli tip-load shape
/// `y(x) = d * x² (3L - x) / (2L³)`, so the last frame sits exactly at
/// `(length, tip_deflection, 0)`. `frames` below 2 yields a single point
/// at the clamp.
pub fn cantilever_beam(frames: usize, length: f32, tip_deflection: f32) -> Vec<Vec3> {
    if frames < 2 {
        return vec![Vec3::ZERO];
    }

    let segments = (frames - 1) as f32;
    (0..frames)
        .map(|i| {
            let x = length * i as f32 / segments;
            let y = tip_deflection * x * x * (3.0 * length - x) / (2.0 * length.powi(3));
            Vec3::new(x, y, 0.0)
        })
        .collect()
}

/// Cantilever with noise on the tip deflection, in the range `±jitter`.
pub fn jittered_cantilever<R: Rng>(
    frames: usize,
    length: f32,
    tip_deflection: f32,
    jitter: f32,
    rng: &mut R,
) -> Vec<Vec3> {
    let noise = if jitter > 0.0 {
        rng.gen_range(-jitter..jitter)
    } else {
        0.0
    };
    cantilever_beam(frames, length, tip_deflection + noise)
}

// ==================== SCENES ====================

/// Marker for beams driven by [`sway_beam`].
#[derive(Component, Debug, Clone, Copy)]
pub struct Swaying {
    pub amplitude: f32,
    pub frequency: f32,
}

impl Default for Swaying {
    fn default() -> Self {
        Self {
            amplitude: config::SWAY_AMPLITUDE,
            frequency: config::SWAY_FREQUENCY,
        }
    }
}

/// Spawn the needle and an empty tip point set following it.
///
/// Returns `(needle, point_set)`.
pub fn spawn_needle_scene(commands: &mut Commands) -> (Entity, Entity) {
    use config::*;

    let needle = commands
        .spawn((
            Name::new(BEAM_NAME),
            BeamState::new(cantilever_beam(BEAM_FRAMES, BEAM_LENGTH, 0.0)),
            Swaying::default(),
        ))
        .id();

    let point_set = commands
        .spawn((
            Name::new("tip points"),
            PointsManager::new(PointsManagerConfig::for_beam(BEAM_NAME)),
            PointSetTopology::default(),
            MechanicalState::default(),
            TopologyModifier::default(),
        ))
        .id();

    (needle, point_set)
}

/// Startup system form of [`spawn_needle_scene`].
pub fn setup_needle_scene(mut commands: Commands) {
    let (needle, point_set) = spawn_needle_scene(&mut commands);
    info!("needle scene: beam {} with point set {}", needle, point_set);
}

/// Bend swaying beams with a periodic tip load.
pub fn sway_beam(time: Res<Time>, mut beams: Query<(&mut BeamState, &Swaying)>) {
    let mut rng = rand::thread_rng();
    let t = time.elapsed_secs();

    for (mut beam, sway) in &mut beams {
        let frames = beam.positions.len().max(2);
        let length = beam
            .positions
            .last()
            .map(|tip| tip.x)
            .filter(|&x| x > 0.0)
            .unwrap_or(config::BEAM_LENGTH);
        let deflection = sway.amplitude * (std::f32::consts::TAU * sway.frequency * t).sin();
        beam.positions = jittered_cantilever(
            frames,
            length,
            deflection,
            sway.amplitude * config::SWAY_JITTER,
            &mut rng,
        );
    }
}
