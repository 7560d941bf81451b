//! Configuration for points managers.
//!
//! Everything a scene author can set on a manager lives here, with the
//! defaults the component has always shipped with.

use bevy::prelude::*;

/// Default values for [`PointsManagerConfig`].
pub mod defaults {
    /// Sphere radius used when point spheres are drawn
    pub const RADIUS: f64 = 1.0;
    /// RGBA, opaque red
    pub const COLOR: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
}

/// Keys that trigger point edits, shared by every manager in the app.
#[derive(Resource, Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyBindings {
    /// Append a point at the beam tip
    pub append: KeyCode,
    /// Remove the last point
    pub remove: KeyCode,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            append: KeyCode::KeyS,
            remove: KeyCode::KeyL,
        }
    }
}

/// Settings of a single points manager.
#[derive(Clone, Debug, PartialEq)]
pub struct PointsManagerConfig {
    /// Beam tip placeholder. Not read by any edit; the tip is always
    /// sampled from the resolved beam.
    pub beam_tip: Vec3,
    /// Sphere radius for point display
    pub radius: f64,
    /// RGBA display color
    pub color: [f32; 4],
    /// `Name` of the entity carrying the beam state
    pub beam_path: String,
    /// Upper bound on the number of points, `None` for unbounded growth
    pub max_points: Option<usize>,
}

impl Default for PointsManagerConfig {
    fn default() -> Self {
        Self {
            beam_tip: Vec3::ZERO,
            radius: defaults::RADIUS,
            color: defaults::COLOR,
            beam_path: String::new(),
            max_points: None,
        }
    }
}

impl PointsManagerConfig {
    /// Default config following the beam named `beam_path`.
    pub fn for_beam(beam_path: impl Into<String>) -> Self {
        Self {
            beam_path: beam_path.into(),
            ..Default::default()
        }
    }

    pub fn with_max_points(mut self, limit: usize) -> Self {
        self.max_points = Some(limit);
        self
    }

    /// True when a set of `nb_points` may still grow by one.
    pub fn allows_append(&self, nb_points: usize) -> bool {
        self.max_points.map_or(true, |limit| nb_points < limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_component_fields() {
        let config = PointsManagerConfig::default();
        assert_eq!(config.radius, 1.0);
        assert_eq!(config.color, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(config.beam_tip, Vec3::ZERO);
        assert!(config.beam_path.is_empty());
        assert_eq!(config.max_points, None);
    }

    #[test]
    fn default_keys() {
        let keys = KeyBindings::default();
        assert_eq!(keys.append, KeyCode::KeyS);
        assert_eq!(keys.remove, KeyCode::KeyL);
    }

    #[test]
    fn unbounded_by_default() {
        let config = PointsManagerConfig::for_beam("needle");
        assert!(config.allows_append(usize::MAX - 1));
    }

    #[test]
    fn limit_blocks_append_at_capacity() {
        let config = PointsManagerConfig::for_beam("needle").with_max_points(2);
        assert!(config.allows_append(1));
        assert!(!config.allows_append(2));
        assert!(!config.allows_append(3));
    }
}
