// SPDX-License-Identifier: MIT OR Apache-2.0
//! Frame clock.

use crate::config::checked_positive;
use serde::{Deserialize, Serialize};

/// Nominal per-frame step (60 fps)
pub const NOMINAL_FRAME_STEP: f32 = 0.016;

/// Clock settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockSettings {
    /// Advance by this fixed step every frame, ignoring the driver's delta.
    /// `None` uses the measured delta.
    pub fixed_step: Option<f32>,
    /// Upper bound applied to measured deltas (e.g. after the window was hidden)
    pub max_step: f32,
}

impl Default for ClockSettings {
    fn default() -> Self {
        Self {
            fixed_step: Some(NOMINAL_FRAME_STEP),
            max_step: 0.1,
        }
    }
}

impl ClockSettings {
    /// Replace steps that would stall the clock or run it backwards
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        Self {
            fixed_step: self.fixed_step.map(|step| {
                checked_positive("clock.fixed_step", step, NOMINAL_FRAME_STEP)
            }),
            max_step: checked_positive("clock.max_step", self.max_step, defaults.max_step),
        }
    }
}

/// Monotonic scene clock, advanced once per frame
#[derive(Debug, Clone)]
pub struct Clock {
    settings: ClockSettings,
    now: f32,
    frame_count: u64,
}

impl Clock {
    /// Create a clock at time zero
    pub fn new(settings: ClockSettings) -> Self {
        Self {
            settings: settings.sanitized(),
            now: 0.0,
            frame_count: 0,
        }
    }

    /// Advance by one frame and return the step that was applied
    pub fn advance(&mut self, delta_time: f32) -> f32 {
        let step = match self.settings.fixed_step {
            Some(step) => step,
            None if delta_time.is_finite() => delta_time.clamp(0.0, self.settings.max_step),
            None => 0.0,
        };
        self.now += step;
        self.frame_count += 1;
        step
    }

    /// Seconds since the clock started
    pub fn now(&self) -> f32 {
        self.now
    }

    /// Frames advanced so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new(ClockSettings::default())
    }
}
