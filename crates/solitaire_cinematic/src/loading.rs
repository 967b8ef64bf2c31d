// SPDX-License-Identifier: MIT OR Apache-2.0
//! Simulated loading screen.
//!
//! Progress climbs by a random amount at a fixed interval until it reaches
//! 100%, then the overlay is held for a short reveal delay before the scene
//! is shown. Everything is driven by frame time, there are no timers.

use crate::config::{checked, checked_positive};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Loading simulation parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadingSettings {
    /// Run the simulation at all; when off the scene is revealed on the first frame
    pub enabled: bool,
    /// Seconds between progress steps
    pub interval: f32,
    /// Largest progress step, in percent
    pub max_step: f32,
    /// Seconds the full bar stays up before the reveal
    pub reveal_delay: f32,
    /// Random seed, so runs are reproducible
    pub seed: u64,
}

impl Default for LoadingSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            interval: 0.2,
            max_step: 15.0,
            reveal_delay: 0.5,
            seed: 0x5011_7A1E,
        }
    }
}

impl LoadingSettings {
    /// Replace intervals and delays that would stall the loading screen
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        Self {
            interval: checked_positive("loading.interval", self.interval, defaults.interval),
            max_step: checked_positive("loading.max_step", self.max_step, defaults.max_step),
            reveal_delay: checked("loading.reveal_delay", self.reveal_delay, 0.0, defaults.reveal_delay),
            ..self
        }
    }
}

/// Where the loading screen is
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoadingState {
    /// Bar is filling
    Loading {
        /// Percent complete
        progress: f32,
    },
    /// Bar is full, waiting to reveal
    Revealing {
        /// Seconds left
        remaining: f32,
    },
    /// Overlay is gone
    Ready,
}

/// Something the loading screen did this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoadingEvent {
    /// Progress moved
    Progress(f32),
    /// The scene was revealed; the intro starts now
    Revealed,
}

/// The loading screen state machine
#[derive(Debug, Clone)]
pub struct LoadingSequence {
    settings: LoadingSettings,
    state: LoadingState,
    accumulated: f32,
    rng: StdRng,
}

impl LoadingSequence {
    /// Create a sequence at 0%
    pub fn new(settings: LoadingSettings) -> Self {
        let settings = settings.sanitized();
        let state = if settings.enabled {
            LoadingState::Loading { progress: 0.0 }
        } else {
            LoadingState::Revealing { remaining: 0.0 }
        };

        Self {
            settings,
            state,
            accumulated: 0.0,
            rng: StdRng::seed_from_u64(settings.seed),
        }
    }

    /// Advance by one frame
    pub fn advance(&mut self, delta_time: f32) -> Option<LoadingEvent> {
        match self.state {
            LoadingState::Ready => None,
            LoadingState::Loading { mut progress } => {
                let interval = self.settings.interval.max(1e-3);
                let max_step = self.settings.max_step.max(1.0);
                let mut changed = false;

                self.accumulated += delta_time;
                while self.accumulated >= interval && progress < 100.0 {
                    self.accumulated -= interval;
                    progress = (progress + self.rng.gen::<f32>() * max_step).min(100.0);
                    changed = true;
                }

                if progress >= 100.0 {
                    tracing::debug!("Loading complete, revealing in {}s", self.settings.reveal_delay);
                    self.state = LoadingState::Revealing {
                        remaining: self.settings.reveal_delay,
                    };
                    Some(LoadingEvent::Progress(100.0))
                } else {
                    self.state = LoadingState::Loading { progress };
                    changed.then_some(LoadingEvent::Progress(progress))
                }
            }
            LoadingState::Revealing { remaining } => {
                let remaining = remaining - delta_time;
                if remaining <= 0.0 {
                    self.state = LoadingState::Ready;
                    Some(LoadingEvent::Revealed)
                } else {
                    self.state = LoadingState::Revealing { remaining };
                    None
                }
            }
        }
    }

    /// Current state
    pub fn state(&self) -> LoadingState {
        self.state
    }

    /// Percent complete
    pub fn progress(&self) -> f32 {
        match self.state {
            LoadingState::Loading { progress } => progress,
            LoadingState::Revealing { .. } | LoadingState::Ready => 100.0,
        }
    }

    /// Whether the overlay is gone
    pub fn is_ready(&self) -> bool {
        self.state == LoadingState::Ready
    }

    /// Text for the progress label
    pub fn label(&self) -> String {
        format!("Loading... {}%", self.progress().round() as u32)
    }
}

impl Default for LoadingSequence {
    fn default() -> Self {
        Self::new(LoadingSettings::default())
    }
}
