// SPDX-License-Identifier: MIT OR Apache-2.0
//! Scene collaborator interface and the values written through it.
//!
//! The cinematic core never owns a renderer. It writes absolute camera,
//! object and light values into a [`Scene`] every frame and never reads
//! them back, so any frame can be recomputed from scratch.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::f32::consts::PI;

/// Objects the core animates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectId {
    /// The whole ring: band, head, prongs and stone
    JewelryGroup,
    /// The stone on its own (spins inside the group)
    Diamond,
}

/// Lights in the showcase rig
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LightId {
    /// Ambient fill
    Ambient,
    /// Directional key light
    Key,
    /// Directional fill light
    Fill,
    /// Directional rim light
    Rim,
    /// First sparkle point light
    Sparkle1,
    /// Second sparkle point light
    Sparkle2,
}

impl LightId {
    /// All lights in the rig
    pub fn all() -> &'static [LightId] {
        &[
            LightId::Ambient,
            LightId::Key,
            LightId::Fill,
            LightId::Rim,
            LightId::Sparkle1,
            LightId::Sparkle2,
        ]
    }

    /// Intensity the rig starts with
    pub fn default_intensity(self) -> f32 {
        match self {
            Self::Ambient => 0.4,
            Self::Key => 1.5,
            Self::Fill => 0.8,
            Self::Rim => 0.6,
            Self::Sparkle1 | Self::Sparkle2 => 0.5,
        }
    }

    /// Position the rig starts with (ambient has none)
    pub fn default_position(self) -> Option<[f32; 3]> {
        match self {
            Self::Ambient => None,
            Self::Key => Some([5.0, 10.0, 5.0]),
            Self::Fill => Some([-5.0, 5.0, -5.0]),
            Self::Rim => Some([0.0, -5.0, -10.0]),
            Self::Sparkle1 => Some([3.0, 3.0, 3.0]),
            Self::Sparkle2 => Some([-3.0, 3.0, -3.0]),
        }
    }

    /// Get the display name
    pub fn name(self) -> &'static str {
        match self {
            Self::Ambient => "Ambient",
            Self::Key => "Key",
            Self::Fill => "Fill",
            Self::Rim => "Rim",
            Self::Sparkle1 => "Sparkle 1",
            Self::Sparkle2 => "Sparkle 2",
        }
    }
}

/// External scene: camera, objects and lights.
///
/// Setters take absolute values. Implementations must not expect any
/// particular call order within a frame; `render` is called last.
pub trait Scene {
    /// Place the camera
    fn set_camera_position(&mut self, position: [f32; 3]);

    /// Point the camera at a target
    fn set_camera_look_at(&mut self, target: [f32; 3]);

    /// Set an object's Euler rotation (XYZ order, radians)
    fn set_object_rotation(&mut self, object: ObjectId, rotation: [f32; 3]);

    /// Set an object's uniform scale
    fn set_object_scale(&mut self, object: ObjectId, scale: f32);

    /// Set a light's intensity
    fn set_light_intensity(&mut self, light: LightId, intensity: f32);

    /// Move a light
    fn set_light_position(&mut self, light: LightId, position: [f32; 3]);

    /// Draw the frame
    fn render(&mut self);
}

/// Full camera/object state produced by a phase animator
#[derive(Debug, Clone, PartialEq)]
pub struct SceneDelta {
    /// Camera position
    pub camera_position: [f32; 3],
    /// Camera look-at target
    pub camera_target: [f32; 3],
    /// Jewelry group rotation (Euler XYZ)
    pub jewelry_rotation: [f32; 3],
    /// Light intensities this phase overrides
    pub lights: Vec<(LightId, f32)>,
}

impl SceneDelta {
    /// Create a delta without light overrides
    pub fn new(camera_position: [f32; 3], camera_target: [f32; 3], jewelry_rotation: [f32; 3]) -> Self {
        Self {
            camera_position,
            camera_target,
            jewelry_rotation,
            lights: Vec::new(),
        }
    }

    /// Override a light's intensity
    pub fn with_light(mut self, light: LightId, intensity: f32) -> Self {
        self.lights.push((light, intensity));
        self
    }

    /// Intensity written for `light`, if any
    pub fn light(&self, light: LightId) -> Option<f32> {
        self.lights.iter().rev().find(|(id, _)| *id == light).map(|(_, v)| *v)
    }

    /// Write this delta into the scene
    pub fn apply(&self, scene: &mut dyn Scene) {
        scene.set_camera_position(self.camera_position);
        scene.set_camera_look_at(self.camera_target);
        scene.set_object_rotation(ObjectId::JewelryGroup, self.jewelry_rotation);
        for (light, intensity) in &self.lights {
            scene.set_light_intensity(*light, *intensity);
        }
    }
}

/// Fixed pose restored when the user takes control
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanonicalPose {
    /// Jewelry group rotation (Euler XYZ)
    pub jewelry_rotation: [f32; 3],
    /// Camera position
    pub camera_position: [f32; 3],
    /// Camera look-at target
    pub camera_target: [f32; 3],
}

impl Default for CanonicalPose {
    fn default() -> Self {
        Self {
            jewelry_rotation: [0.15 * PI, 0.0, 0.1 * PI],
            camera_position: [0.0, 2.0, 6.0],
            camera_target: [0.0, 0.0, 0.0],
        }
    }
}

/// Scene that only remembers the last value written to each channel.
///
/// Used for headless runs and tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingScene {
    /// Last camera position
    pub camera_position: Option<[f32; 3]>,
    /// Last camera target
    pub camera_target: Option<[f32; 3]>,
    /// Last rotation per object
    pub rotations: HashMap<ObjectId, [f32; 3]>,
    /// Last scale per object
    pub scales: HashMap<ObjectId, f32>,
    /// Last intensity per light
    pub intensities: HashMap<LightId, f32>,
    /// Last position per light
    pub light_positions: HashMap<LightId, [f32; 3]>,
    /// Number of rendered frames
    pub frames_rendered: u64,
}

impl RecordingScene {
    /// Create an empty recording
    pub fn new() -> Self {
        Self::default()
    }

    /// Last rotation written for an object
    pub fn rotation(&self, object: ObjectId) -> Option<[f32; 3]> {
        self.rotations.get(&object).copied()
    }

    /// Last scale written for an object
    pub fn scale(&self, object: ObjectId) -> Option<f32> {
        self.scales.get(&object).copied()
    }

    /// Last intensity written for a light
    pub fn intensity(&self, light: LightId) -> Option<f32> {
        self.intensities.get(&light).copied()
    }
}

impl Scene for RecordingScene {
    fn set_camera_position(&mut self, position: [f32; 3]) {
        self.camera_position = Some(position);
    }

    fn set_camera_look_at(&mut self, target: [f32; 3]) {
        self.camera_target = Some(target);
    }

    fn set_object_rotation(&mut self, object: ObjectId, rotation: [f32; 3]) {
        self.rotations.insert(object, rotation);
    }

    fn set_object_scale(&mut self, object: ObjectId, scale: f32) {
        self.scales.insert(object, scale);
    }

    fn set_light_intensity(&mut self, light: LightId, intensity: f32) {
        self.intensities.insert(light, intensity);
    }

    fn set_light_position(&mut self, light: LightId, position: [f32; 3]) {
        self.light_positions.insert(light, position);
    }

    fn render(&mut self) {
        self.frames_rendered += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delta_apply() {
        let delta = SceneDelta::new([1.0, 2.0, 3.0], [0.0, 0.5, 0.0], [0.1, 0.2, 0.3])
            .with_light(LightId::Key, 2.0);
        let mut scene = RecordingScene::new();
        delta.apply(&mut scene);

        assert_eq!(scene.camera_position, Some([1.0, 2.0, 3.0]));
        assert_eq!(scene.camera_target, Some([0.0, 0.5, 0.0]));
        assert_eq!(scene.rotation(ObjectId::JewelryGroup), Some([0.1, 0.2, 0.3]));
        assert_eq!(scene.intensity(LightId::Key), Some(2.0));
        assert_eq!(scene.intensity(LightId::Fill), None);
        assert_eq!(scene.frames_rendered, 0);
    }

    #[test]
    fn test_light_lookup_prefers_last_write() {
        let delta = SceneDelta::new([0.0; 3], [0.0; 3], [0.0; 3])
            .with_light(LightId::Sparkle1, 0.5)
            .with_light(LightId::Sparkle1, 1.5);
        assert_eq!(delta.light(LightId::Sparkle1), Some(1.5));
        assert_eq!(delta.light(LightId::Rim), None);
    }

    #[test]
    fn test_rig_defaults() {
        for light in LightId::all() {
            assert!(light.default_intensity() > 0.0);
        }
        assert!(LightId::Ambient.default_position().is_none());
        assert_eq!(LightId::Key.default_position(), Some([5.0, 10.0, 5.0]));
    }
}
