// SPDX-License-Identifier: MIT OR Apache-2.0
//! Phase animators and the showcase schedule.
//!
//! Each animator pairs an easing curve with a pure pose function. The pose
//! is the complete camera/jewelry state at the eased progress, so the output
//! for a given progress never depends on earlier frames.
//!
//! The default schedule chains the phases so each one starts where the
//! previous one ended, and `finale` lands back on the establishing shot
//! `intro` starts from.

use crate::easing::{Easing, Interpolation};
use crate::scene::{LightId, SceneDelta};
use crate::timeline::{ResolvedPhase, Timeline};
use indexmap::IndexMap;
use std::f32::consts::{PI, TAU};

/// Establishing shot: sweep in towards the ring
pub const INTRO: &str = "intro";
/// Push in on the stone
pub const CLOSEUP: &str = "closeup";
/// Full orbit around the stone
pub const ROTATION: &str = "rotation";
/// Hold while the sparkle lights pulse
pub const SPARKLE: &str = "sparkle";
/// Pull back to the establishing shot
pub const FINALE: &str = "finale";

/// Loop length of the showcase schedule
pub const SHOWCASE_LOOP_DURATION: f32 = 16.0;

const ORIGIN: [f32; 3] = [0.0, 0.0, 0.0];
const ESTABLISHING_CAMERA: [f32; 3] = [0.0, 2.0, 6.0];
const APPROACH_CAMERA: [f32; 3] = [0.0, 1.2, 4.0];
const APPROACH_TARGET: [f32; 3] = [0.0, 0.2, 0.0];
const CLOSEUP_CAMERA: [f32; 3] = [1.0, 0.8, 1.8];
const DIAMOND_FOCUS: [f32; 3] = [0.0, 0.35, 0.0];

const KEY_RESTING: f32 = 1.5;
const KEY_SPOTLIT: f32 = 2.2;
const SPARKLE_RESTING: f32 = 0.5;
const SPARKLE_PEAK_GAIN: f32 = 1.5;

const POSE_ESTABLISHING: [f32; 3] = [0.15 * PI, 0.0, 0.1 * PI];
const POSE_APPROACH: [f32; 3] = [0.1 * PI, 0.5 * PI, 0.05 * PI];
const POSE_CLOSEUP: [f32; 3] = [0.0, 0.75 * PI, 0.0];
const POSE_ORBITED: [f32; 3] = [0.0, 1.25 * PI, 0.0];
const POSE_SPARKLED: [f32; 3] = [0.0, 1.5 * PI, 0.0];
const POSE_FINALE: [f32; 3] = [0.15 * PI, TAU, 0.1 * PI];

/// Animator for one phase: an easing curve and the pose it drives
#[derive(Debug, Clone, Copy)]
pub struct PhaseAnimator {
    /// Curve applied to local progress before sampling
    pub easing: Easing,
    /// Full scene state at an eased progress
    pub sample: fn(f32) -> SceneDelta,
}

impl PhaseAnimator {
    /// Camera sweeps in from the establishing shot while the ring turns a quarter.
    pub const INTRO: Self = Self::new(Easing::InOutCubic, intro_pose);
    /// Camera pushes in on the stone and the key light comes up.
    pub const CLOSEUP: Self = Self::new(Easing::InOutQuart, closeup_pose);
    /// Camera makes one full, constant-speed revolution around the stone.
    pub const ROTATION: Self = Self::new(Easing::Linear, rotation_pose);
    /// Camera holds on the stone while both sparkle lights pulse out of phase.
    pub const SPARKLE: Self = Self::new(Easing::Linear, sparkle_pose);
    /// Camera pulls back to the establishing shot and the lights settle.
    pub const FINALE: Self = Self::new(Easing::OutCubic, finale_pose);

    /// Pair a pose function with its easing
    pub const fn new(easing: Easing, sample: fn(f32) -> SceneDelta) -> Self {
        Self { easing, sample }
    }

    /// Scene state at local progress `progress` (0..=1, before easing)
    pub fn animate(&self, progress: f32) -> SceneDelta {
        (self.sample)(self.easing.apply(progress))
    }
}

fn intro_pose(t: f32) -> SceneDelta {
    SceneDelta::new(
        Interpolation::lerp_vec3(ESTABLISHING_CAMERA, APPROACH_CAMERA, t),
        Interpolation::lerp_vec3(ORIGIN, APPROACH_TARGET, t),
        Interpolation::lerp_vec3(POSE_ESTABLISHING, POSE_APPROACH, t),
    )
}

fn closeup_pose(t: f32) -> SceneDelta {
    SceneDelta::new(
        Interpolation::lerp_vec3(APPROACH_CAMERA, CLOSEUP_CAMERA, t),
        Interpolation::lerp_vec3(APPROACH_TARGET, DIAMOND_FOCUS, t),
        Interpolation::lerp_vec3(POSE_APPROACH, POSE_CLOSEUP, t),
    )
    .with_light(LightId::Key, Interpolation::lerp(KEY_RESTING, KEY_SPOTLIT, t))
}

fn rotation_pose(t: f32) -> SceneDelta {
    let offset = [
        CLOSEUP_CAMERA[0] - DIAMOND_FOCUS[0],
        CLOSEUP_CAMERA[1] - DIAMOND_FOCUS[1],
        CLOSEUP_CAMERA[2] - DIAMOND_FOCUS[2],
    ];
    let radius = offset[0].hypot(offset[2]);
    let start_angle = offset[0].atan2(offset[2]);

    SceneDelta::new(
        Interpolation::orbit_point(DIAMOND_FOCUS, radius, offset[1], start_angle + TAU * t),
        DIAMOND_FOCUS,
        Interpolation::lerp_vec3(POSE_CLOSEUP, POSE_ORBITED, t),
    )
    .with_light(LightId::Key, KEY_SPOTLIT)
}

/// The pulse envelope starts and ends at the resting intensity
fn sparkle_pose(t: f32) -> SceneDelta {
    let envelope = (PI * t).sin() * SPARKLE_PEAK_GAIN;
    let flicker = 4.0 * PI * t;

    SceneDelta::new(
        CLOSEUP_CAMERA,
        DIAMOND_FOCUS,
        Interpolation::lerp_vec3(POSE_ORBITED, POSE_SPARKLED, t),
    )
    .with_light(LightId::Key, KEY_SPOTLIT)
    .with_light(LightId::Sparkle1, SPARKLE_RESTING + envelope * flicker.sin().abs())
    .with_light(LightId::Sparkle2, SPARKLE_RESTING + envelope * flicker.cos().abs())
}

fn finale_pose(t: f32) -> SceneDelta {
    SceneDelta::new(
        Interpolation::lerp_vec3(CLOSEUP_CAMERA, ESTABLISHING_CAMERA, t),
        Interpolation::lerp_vec3(DIAMOND_FOCUS, ORIGIN, t),
        Interpolation::lerp_vec3(POSE_SPARKLED, POSE_FINALE, t),
    )
    .with_light(LightId::Key, Interpolation::lerp(KEY_SPOTLIT, KEY_RESTING, t))
    .with_light(LightId::Sparkle1, SPARKLE_RESTING)
    .with_light(LightId::Sparkle2, SPARKLE_RESTING)
}

/// The five-phase showcase schedule
pub fn showcase_timeline() -> Timeline {
    Timeline::default()
        .with_phase(INTRO, 0.0, 4.0)
        .with_phase(CLOSEUP, 4.0, 3.0)
        .with_phase(ROTATION, 7.0, 4.0)
        .with_phase(SPARKLE, 11.0, 3.0)
        .with_phase(FINALE, 14.0, 2.0)
}

/// Animators keyed by phase name
#[derive(Debug, Clone, Default)]
pub struct AnimatorTable {
    animators: IndexMap<String, PhaseAnimator>,
}

impl AnimatorTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Table with an animator for every phase of [`showcase_timeline`]
    pub fn showcase() -> Self {
        Self::new()
            .with(INTRO, PhaseAnimator::INTRO)
            .with(CLOSEUP, PhaseAnimator::CLOSEUP)
            .with(ROTATION, PhaseAnimator::ROTATION)
            .with(SPARKLE, PhaseAnimator::SPARKLE)
            .with(FINALE, PhaseAnimator::FINALE)
    }

    /// Register an animator, builder style
    pub fn with(mut self, name: impl Into<String>, animator: PhaseAnimator) -> Self {
        self.insert(name, animator);
        self
    }

    /// Register an animator, returning the one it replaced
    pub fn insert(&mut self, name: impl Into<String>, animator: PhaseAnimator) -> Option<PhaseAnimator> {
        self.animators.insert(name.into(), animator)
    }

    /// Look up the animator for a phase
    pub fn get(&self, name: &str) -> Option<PhaseAnimator> {
        self.animators.get(name).copied()
    }

    /// Easing the phase's animator applies
    pub fn easing(&self, name: &str) -> Option<Easing> {
        self.animators.get(name).map(|animator| animator.easing)
    }

    /// Run the animator for a resolved phase
    pub fn animate(&self, resolved: &ResolvedPhase<'_>) -> Option<SceneDelta> {
        self.animators
            .get(&resolved.phase.name)
            .map(|animator| animator.animate(resolved.local_progress))
    }

    /// Registered phase names, in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.animators.keys().map(String::as_str)
    }

    /// Phases of `timeline` that have no animator
    pub fn missing_for<'a>(&self, timeline: &'a Timeline) -> Vec<&'a str> {
        timeline
            .phases()
            .iter()
            .filter(|phase| !self.animators.contains_key(&phase.name))
            .map(|phase| phase.name.as_str())
            .collect()
    }
}
