// SPDX-License-Identifier: MIT OR Apache-2.0
//! Easing curves and interpolation helpers.
//!
//! All curves take a progress value in `[0, 1]` and return an eased value in
//! `[0, 1]`. Inputs outside that range are not checked; callers clamp first.

use serde::{Deserialize, Serialize};

/// `1 - (1 - t)^3`
pub fn ease_out_cubic(t: f32) -> f32 {
    1.0 - (1.0 - t).powi(3)
}

/// Cubic ease-in for the first half, ease-out for the second.
pub fn ease_in_out_cubic(t: f32) -> f32 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Quartic ease-in for the first half, ease-out for the second.
pub fn ease_in_out_quart(t: f32) -> f32 {
    if t < 0.5 {
        8.0 * t * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(4) / 2.0
    }
}

/// Named easing curve, so schedules and config can refer to one as data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Easing {
    /// No easing
    #[default]
    Linear,
    /// [`ease_out_cubic`]
    OutCubic,
    /// [`ease_in_out_cubic`]
    InOutCubic,
    /// [`ease_in_out_quart`]
    InOutQuart,
}

impl Easing {
    /// Apply the curve to a progress value
    pub fn apply(self, t: f32) -> f32 {
        match self {
            Self::Linear => t,
            Self::OutCubic => ease_out_cubic(t),
            Self::InOutCubic => ease_in_out_cubic(t),
            Self::InOutQuart => ease_in_out_quart(t),
        }
    }

    /// Get the display name
    pub fn name(self) -> &'static str {
        match self {
            Self::Linear => "Linear",
            Self::OutCubic => "Ease Out Cubic",
            Self::InOutCubic => "Ease In/Out Cubic",
            Self::InOutQuart => "Ease In/Out Quart",
        }
    }
}

/// Interpolation utilities
pub struct Interpolation;

impl Interpolation {
    /// Linear interpolation between two floats
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }

    /// Interpolate Vec3
    pub fn lerp_vec3(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
        [
            Self::lerp(a[0], b[0], t),
            Self::lerp(a[1], b[1], t),
            Self::lerp(a[2], b[2], t),
        ]
    }

    /// Point on a horizontal circle around `center`, `angle` measured from +Z towards +X
    pub fn orbit_point(center: [f32; 3], radius: f32, height: f32, angle: f32) -> [f32; 3] {
        [
            center[0] + radius * angle.sin(),
            center[1] + height,
            center[2] + radius * angle.cos(),
        ]
    }
}
