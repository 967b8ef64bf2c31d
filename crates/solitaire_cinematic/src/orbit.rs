// SPDX-License-Identifier: MIT OR Apache-2.0
//! Orbit camera driven by pointer drags in interactive mode.

use crate::config::{checked, checked_positive};
use crate::scene::CanonicalPose;
use serde::{Deserialize, Serialize};

/// Orbit sensitivity and limits
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitSettings {
    /// Radians per pixel of drag
    pub rotate_speed: f32,
    /// Fraction of distance per unit of zoom
    pub zoom_speed: f32,
    /// Closest allowed distance
    pub min_distance: f32,
    /// Farthest allowed distance
    pub max_distance: f32,
}

impl Default for OrbitSettings {
    fn default() -> Self {
        Self {
            rotate_speed: 0.01,
            zoom_speed: 0.1,
            min_distance: 1.5,
            max_distance: 12.0,
        }
    }
}

impl OrbitSettings {
    /// Replace speeds and limits that would break the orbit
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let min_distance = checked_positive("orbit.min_distance", self.min_distance, defaults.min_distance);
        Self {
            rotate_speed: checked("orbit.rotate_speed", self.rotate_speed, f32::MIN, defaults.rotate_speed),
            zoom_speed: checked("orbit.zoom_speed", self.zoom_speed, 0.0, defaults.zoom_speed),
            min_distance,
            max_distance: checked(
                "orbit.max_distance",
                self.max_distance,
                min_distance,
                defaults.max_distance.max(min_distance),
            ),
        }
    }
}

/// Yaw/pitch/distance camera around a target
#[derive(Debug, Clone)]
pub struct OrbitController {
    /// Orbit target
    pub target: [f32; 3],
    /// Distance from target
    pub distance: f32,
    /// Yaw in radians, measured from +Z towards +X
    pub yaw: f32,
    /// Pitch in radians above the horizontal
    pub pitch: f32,
    settings: OrbitSettings,
    home: CanonicalPose,
}

impl OrbitController {
    const PITCH_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

    /// Create an orbit that starts at the pose's camera
    pub fn new(settings: OrbitSettings, home: CanonicalPose) -> Self {
        let mut orbit = Self {
            target: home.camera_target,
            distance: 1.0,
            yaw: 0.0,
            pitch: 0.0,
            settings: settings.sanitized(),
            home,
        };
        orbit.reset();
        orbit
    }

    /// Return to the home pose
    pub fn reset(&mut self) {
        let target = self.home.camera_target;
        let position = self.home.camera_position;
        let offset = [
            position[0] - target[0],
            position[1] - target[1],
            position[2] - target[2],
        ];
        let horizontal = offset[0].hypot(offset[2]);

        self.target = target;
        self.distance = (horizontal.hypot(offset[1])).max(f32::EPSILON);
        self.yaw = offset[0].atan2(offset[2]);
        self.pitch = offset[1].atan2(horizontal).clamp(-Self::PITCH_LIMIT, Self::PITCH_LIMIT);
    }

    /// Orbit around the target by a pointer delta
    pub fn drag(&mut self, delta_x: f32, delta_y: f32) {
        self.yaw -= delta_x * self.settings.rotate_speed;
        self.pitch = (self.pitch + delta_y * self.settings.rotate_speed)
            .clamp(-Self::PITCH_LIMIT, Self::PITCH_LIMIT);
    }

    /// Move towards (positive) or away from (negative) the target
    pub fn zoom(&mut self, delta: f32) {
        self.distance = (self.distance * (1.0 - delta * self.settings.zoom_speed))
            .clamp(self.settings.min_distance, self.settings.max_distance);
    }

    /// Current camera position
    pub fn position(&self) -> [f32; 3] {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();

        [self.target[0] + x, self.target[1] + y, self.target[2] + z]
    }
}

impl Default for OrbitController {
    fn default() -> Self {
        Self::new(OrbitSettings::default(), CanonicalPose::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: [f32; 3], b: [f32; 3]) {
        for i in 0..3 {
            assert!((a[i] - b[i]).abs() < 1e-4, "{a:?} != {b:?}");
        }
    }

    #[test]
    fn test_home_pose_round_trips() {
        let orbit = OrbitController::default();
        assert_close(orbit.position(), [0.0, 2.0, 6.0]);
        assert_close(orbit.target, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_drag_keeps_distance_and_clamps_pitch() {
        let mut orbit = OrbitController::default();
        let distance = orbit.distance;
        orbit.drag(120.0, 0.0);
        let p = orbit.position();
        let d = (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]).sqrt();
        assert!((d - distance).abs() < 1e-4);

        orbit.drag(0.0, 10_000.0);
        assert!(orbit.pitch < std::f32::consts::FRAC_PI_2);
        orbit.drag(0.0, -20_000.0);
        assert!(orbit.pitch > -std::f32::consts::FRAC_PI_2);
    }

    #[test]
    fn test_zoom_limits() {
        let mut orbit = OrbitController::default();
        for _ in 0..100 {
            orbit.zoom(1.0);
        }
        assert_eq!(orbit.distance, OrbitSettings::default().min_distance);
        for _ in 0..100 {
            orbit.zoom(-1.0);
        }
        assert_eq!(orbit.distance, OrbitSettings::default().max_distance);
    }

    #[test]
    fn test_reset_after_drag() {
        let mut orbit = OrbitController::default();
        orbit.drag(300.0, 50.0);
        orbit.zoom(2.0);
        orbit.reset();
        assert_close(orbit.position(), [0.0, 2.0, 6.0]);
    }

    #[test]
    fn test_inverted_limits_fall_back() {
        let settings = OrbitSettings {
            zoom_speed: f32::NAN,
            min_distance: -2.0,
            max_distance: 0.5,
            ..OrbitSettings::default()
        };
        let mut orbit = OrbitController::new(settings, CanonicalPose::default());
        orbit.zoom(1.0);
        assert!(orbit.distance.is_finite());
        for _ in 0..100 {
            orbit.zoom(1.0);
        }
        assert_eq!(orbit.distance, OrbitSettings::default().min_distance);
    }
}
