// SPDX-License-Identifier: MIT OR Apache-2.0
//! Cinematic sequencing for the Solitaire jewelry showcase.
//!
//! This crate drives a rendered scene with:
//! - A frame clock
//! - Easing curves and interpolation helpers
//! - A phase timeline resolved from cinematic time
//! - One animator per phase
//! - A mode controller arbitrating between the timeline and orbit input
//!
//! ## Architecture
//!
//! The renderer is abstracted behind the [`Scene`] trait. Each frame the
//! driver calls [`ModeController::tick`], which writes absolute camera,
//! jewelry and light state into the scene and then asks it to render.
//! Input reaches the controller through an [`InputSender`] queue.

pub mod ambient;
pub mod animator;
pub mod clock;
pub mod config;
pub mod controller;
pub mod easing;
pub mod input;
pub mod loading;
pub mod orbit;
pub mod scene;
pub mod timeline;
pub mod ui;

pub use ambient::AmbientState;
pub use animator::{showcase_timeline, AnimatorTable, PhaseAnimator, SHOWCASE_LOOP_DURATION};
pub use clock::{Clock, ClockSettings, NOMINAL_FRAME_STEP};
pub use config::{CinematicSettings, ConfigError, ShowcaseConfig, CONFIG_FORMAT_VERSION};
pub use controller::{InteractionMode, ModeController};
pub use easing::{Easing, Interpolation};
pub use input::{InputEvent, InputQueue, InputSender};
pub use loading::{LoadingEvent, LoadingSequence, LoadingSettings, LoadingState};
pub use orbit::{OrbitController, OrbitSettings};
pub use scene::{CanonicalPose, LightId, ObjectId, RecordingScene, Scene, SceneDelta};
pub use timeline::{Phase, ResolvedPhase, Timeline, TimelineIssue};
pub use ui::{TimelineScale, TimelineStrip};
