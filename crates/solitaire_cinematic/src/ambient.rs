// SPDX-License-Identifier: MIT OR Apache-2.0
//! Idle animation that runs underneath both interaction modes.
//!
//! Once the intro starts the ring shrinks from its oversized entrance scale,
//! the stone spins and the two sparkle lights flicker and drift. All of it is
//! a function of the time since the intro started.

use crate::easing::ease_out_cubic;
use crate::scene::{LightId, ObjectId, Scene};

/// Scale of the ring before the intro starts
pub const ENTRANCE_SCALE: f32 = 8.0;
/// Seconds the entrance zoom-out takes
pub const ZOOM_OUT_DURATION: f32 = 3.0;

/// Ambient state at one moment
#[derive(Debug, Clone, PartialEq)]
pub struct AmbientState {
    /// Uniform scale of the jewelry group
    pub jewelry_scale: f32,
    /// Idle drift of the jewelry group (Euler XYZ)
    pub idle_rotation: [f32; 3],
    /// Stone rotation inside the group (Euler XYZ)
    pub diamond_rotation: [f32; 3],
    /// Sparkle light intensities
    pub sparkle_intensity: [f32; 2],
    /// Sparkle light positions
    pub sparkle_position: [[f32; 3]; 2],
}

impl AmbientState {
    /// Sample the idle animation `t` seconds after the intro started
    pub fn sample(t: f32) -> Self {
        let t = t.max(0.0);
        let zoom = (t / ZOOM_OUT_DURATION).min(1.0);

        Self {
            jewelry_scale: ENTRANCE_SCALE - (ENTRANCE_SCALE - 1.0) * ease_out_cubic(zoom),
            idle_rotation: [(t * 0.5).sin() * 0.1, t * 0.3, (t * 0.3).cos() * 0.05],
            diamond_rotation: [0.0, t * 2.0, 0.0],
            sparkle_intensity: [0.5 + (t * 3.0).sin() * 0.3, 0.5 + (t * 2.5).cos() * 0.3],
            sparkle_position: [
                [3.0 + t.sin() * 0.5, 3.0 + (t * 1.2).cos() * 0.5, 3.0],
                [-3.0 + (t * 0.8).cos() * 0.5, 3.0, -3.0 + (t * 0.9).sin() * 0.5],
            ],
        }
    }

    /// State before the intro: full entrance scale, everything at rest
    pub fn entrance() -> Self {
        Self {
            jewelry_scale: ENTRANCE_SCALE,
            idle_rotation: [0.0; 3],
            diamond_rotation: [0.0; 3],
            sparkle_intensity: [
                LightId::Sparkle1.default_intensity(),
                LightId::Sparkle2.default_intensity(),
            ],
            sparkle_position: [[3.0, 3.0, 3.0], [-3.0, 3.0, -3.0]],
        }
    }

    /// Write scale, stone spin and sparkle lights.
    ///
    /// The idle drift of the whole group is left to the caller, since only
    /// some modes want it.
    pub fn apply(&self, scene: &mut dyn Scene) {
        scene.set_object_scale(ObjectId::JewelryGroup, self.jewelry_scale);
        scene.set_object_rotation(ObjectId::Diamond, self.diamond_rotation);

        let sparkles = [LightId::Sparkle1, LightId::Sparkle2];
        for (i, light) in sparkles.into_iter().enumerate() {
            scene.set_light_intensity(light, self.sparkle_intensity[i]);
            scene.set_light_position(light, self.sparkle_position[i]);
        }
    }
}
