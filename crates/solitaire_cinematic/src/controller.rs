// SPDX-License-Identifier: MIT OR Apache-2.0
//! Interaction mode controller.
//!
//! The controller is the single owner of every piece of mutable showcase
//! state: the clock, the loading screen, the cinematic elapsed time, the
//! current mode and the orbit camera. The driver calls [`ModeController::tick`]
//! once per frame; input from anywhere else goes through the queue and is
//! applied at the start of the next tick.

use crate::ambient::AmbientState;
use crate::animator::AnimatorTable;
use crate::clock::Clock;
use crate::config::ShowcaseConfig;
use crate::input::{InputEvent, InputQueue, InputSender};
use crate::loading::{LoadingEvent, LoadingSequence};
use crate::orbit::OrbitController;
use crate::scene::{CanonicalPose, LightId, ObjectId, Scene};
use crate::timeline::{Phase, Timeline};
use std::collections::HashSet;

/// Who controls the camera
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionMode {
    /// The user orbits the camera; the timeline is idle
    #[default]
    Interactive,
    /// The timeline drives camera, jewelry and lights
    Cinematic,
}

impl InteractionMode {
    /// Get the display name
    pub fn name(self) -> &'static str {
        match self {
            Self::Interactive => "Interactive",
            Self::Cinematic => "Cinematic",
        }
    }

    /// The other mode
    pub fn toggled(self) -> Self {
        match self {
            Self::Interactive => Self::Cinematic,
            Self::Cinematic => Self::Interactive,
        }
    }
}

/// State of the one-shot automatic switch into cinematic mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AutoTransition {
    Pending,
    Done,
}

/// Owns showcase state and arbitrates between timeline and user input
#[derive(Debug)]
pub struct ModeController {
    timeline: Timeline,
    animators: AnimatorTable,
    loop_duration: f32,
    auto_cinematic_delay: Option<f32>,
    pose: CanonicalPose,
    clock: Clock,
    loading: LoadingSequence,
    orbit: OrbitController,
    mode: InteractionMode,
    cinematic_elapsed: f32,
    intro_started_at: Option<f32>,
    auto_transition: AutoTransition,
    /// Idle drift of the ring until the first mode change
    idle_drift: bool,
    /// (phase index, local progress) resolved on the last cinematic frame
    active_phase: Option<(usize, f32)>,
    /// Phases already reported as having no animator
    unanimated: HashSet<String>,
    input: InputQueue,
    sender: InputSender,
}

impl ModeController {
    /// Create a controller from config and an animator table
    pub fn new(config: &ShowcaseConfig, animators: AnimatorTable) -> Self {
        let cinematic = config.cinematic.clone().sanitized();
        let timeline = cinematic.phases;

        for issue in timeline.validate() {
            tracing::warn!("Timeline: {issue}");
        }
        let unanimated: HashSet<String> = animators
            .missing_for(&timeline)
            .into_iter()
            .map(|name| {
                tracing::warn!("Timeline: phase '{name}' has no animator and will hold the previous frame");
                name.to_owned()
            })
            .collect();

        let loop_duration = cinematic.loop_duration.unwrap_or_else(|| timeline.total_duration());
        let (sender, input) = InputQueue::new();

        Self {
            timeline,
            animators,
            loop_duration,
            auto_cinematic_delay: cinematic.auto_start_delay,
            pose: config.pose,
            clock: Clock::new(config.clock),
            loading: LoadingSequence::new(config.loading),
            orbit: OrbitController::new(config.orbit, config.pose),
            mode: InteractionMode::Interactive,
            cinematic_elapsed: 0.0,
            intro_started_at: None,
            auto_transition: AutoTransition::Pending,
            idle_drift: true,
            active_phase: None,
            unanimated,
            input,
            sender,
        }
    }

    /// Controller for the default showcase
    pub fn showcase() -> Self {
        Self::new(&ShowcaseConfig::default(), AnimatorTable::showcase())
    }

    /// A handle for queueing input
    pub fn input_sender(&self) -> InputSender {
        self.sender.clone()
    }

    /// Advance one frame and write the resulting state into `scene`
    pub fn tick(&mut self, delta_time: f32, scene: &mut dyn Scene) {
        for event in self.input.drain() {
            self.handle_event(event);
        }

        let step = self.clock.advance(delta_time);

        if let Some(LoadingEvent::Revealed) = self.loading.advance(step) {
            self.intro_started_at = Some(self.clock.now());
            tracing::info!("Scene revealed at {:.2}s, starting intro", self.clock.now());
        }

        self.check_auto_transition();

        let ambient = match self.intro_time() {
            Some(t) => AmbientState::sample(t),
            None => AmbientState::entrance(),
        };
        self.apply_rig(scene);
        ambient.apply(scene);

        match self.mode {
            InteractionMode::Cinematic => self.drive_cinematic(step, scene),
            InteractionMode::Interactive => self.drive_interactive(&ambient, scene),
        }

        scene.render();
    }

    /// Switch to cinematic mode, restarting the timeline.
    /// Returns `false` if already cinematic.
    pub fn request_cinematic(&mut self) -> bool {
        if self.mode == InteractionMode::Cinematic {
            tracing::debug!("Cinematic mode requested while already cinematic");
            return false;
        }

        self.enter_cinematic();
        true
    }

    /// Switch to `mode`. Returns `false` if already in it.
    pub fn request_mode(&mut self, mode: InteractionMode) -> bool {
        match mode {
            InteractionMode::Interactive => self.request_interactive(),
            InteractionMode::Cinematic => self.request_cinematic(),
        }
    }

    /// Switch to interactive mode at the canonical pose.
    /// Returns `false` if already interactive.
    pub fn request_interactive(&mut self) -> bool {
        if self.mode == InteractionMode::Interactive {
            tracing::debug!("Interactive mode requested while already interactive");
            return false;
        }

        self.mode = InteractionMode::Interactive;
        self.auto_transition = AutoTransition::Done;
        self.idle_drift = false;
        self.active_phase = None;
        self.orbit.reset();
        tracing::info!("Entered interactive mode");
        true
    }

    fn enter_cinematic(&mut self) {
        self.mode = InteractionMode::Cinematic;
        self.auto_transition = AutoTransition::Done;
        self.idle_drift = false;
        self.cinematic_elapsed = 0.0;
        self.active_phase = None;
        tracing::info!("Entered cinematic mode");
    }

    fn handle_event(&mut self, event: InputEvent) {
        match event {
            InputEvent::RequestCinematic => {
                self.request_cinematic();
            }
            InputEvent::RequestInteractive => {
                self.request_interactive();
            }
            InputEvent::ToggleMode => {
                self.request_mode(self.mode.toggled());
            }
            InputEvent::OrbitDrag { dx, dy } => {
                if self.mode == InteractionMode::Interactive {
                    self.orbit.drag(dx, dy);
                }
            }
            InputEvent::OrbitZoom { delta } => {
                if self.mode == InteractionMode::Interactive {
                    self.orbit.zoom(delta);
                }
            }
            InputEvent::SeekCinematic { time } => {
                if self.mode == InteractionMode::Cinematic && time.is_finite() {
                    self.cinematic_elapsed = time.max(0.0);
                }
            }
        }
    }

    fn check_auto_transition(&mut self) {
        if self.auto_transition != AutoTransition::Pending {
            return;
        }
        let (Some(delay), Some(t)) = (self.auto_cinematic_delay, self.intro_time()) else {
            return;
        };

        if t >= delay {
            self.auto_transition = AutoTransition::Done;
            if self.mode == InteractionMode::Interactive {
                tracing::info!("Starting cinematic {delay}s after intro");
                self.enter_cinematic();
            }
        }
    }

    /// Base intensities for the lights ambient animation does not touch
    fn apply_rig(&self, scene: &mut dyn Scene) {
        for light in [LightId::Ambient, LightId::Key, LightId::Fill, LightId::Rim] {
            scene.set_light_intensity(light, light.default_intensity());
        }
    }

    fn drive_cinematic(&mut self, step: f32, scene: &mut dyn Scene) {
        self.cinematic_elapsed = Timeline::wrap(self.cinematic_elapsed, self.loop_duration);

        match self.timeline.resolve(self.cinematic_elapsed) {
            Some(resolved) => {
                if self.active_phase.map(|(index, _)| index) != Some(resolved.index) {
                    tracing::debug!(
                        "Phase '{}' at {:.2}s",
                        resolved.phase.name,
                        self.cinematic_elapsed
                    );
                }
                self.active_phase = Some((resolved.index, resolved.local_progress));

                match self.animators.animate(&resolved) {
                    Some(delta) => delta.apply(scene),
                    None => {
                        if self.unanimated.insert(resolved.phase.name.clone()) {
                            tracing::warn!("No animator for phase '{}'", resolved.phase.name);
                        }
                    }
                }
            }
            None => self.active_phase = None,
        }

        self.cinematic_elapsed += step;
    }

    fn drive_interactive(&self, ambient: &AmbientState, scene: &mut dyn Scene) {
        scene.set_camera_position(self.orbit.position());
        scene.set_camera_look_at(self.orbit.target);

        let rotation = if self.idle_drift {
            ambient.idle_rotation
        } else {
            self.pose.jewelry_rotation
        };
        scene.set_object_rotation(ObjectId::JewelryGroup, rotation);
    }

    /// Current mode
    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    /// Cinematic time for the next frame
    pub fn cinematic_elapsed(&self) -> f32 {
        self.cinematic_elapsed
    }

    /// Loop length of the cinematic timeline
    pub fn loop_duration(&self) -> f32 {
        self.loop_duration
    }

    /// Phase and local progress resolved on the last cinematic frame
    pub fn active_phase(&self) -> Option<(&Phase, f32)> {
        let (index, progress) = self.active_phase?;
        self.timeline.phases().get(index).map(|phase| (phase, progress))
    }

    /// Seconds since the intro started, if it has
    pub fn intro_time(&self) -> Option<f32> {
        self.intro_started_at.map(|start| self.clock.now() - start)
    }

    /// The phase schedule
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Animators driving the phases
    pub fn animators(&self) -> &AnimatorTable {
        &self.animators
    }

    /// The loading screen
    pub fn loading(&self) -> &LoadingSequence {
        &self.loading
    }

    /// The orbit camera
    pub fn orbit(&self) -> &OrbitController {
        &self.orbit
    }

    /// The frame clock
    pub fn clock(&self) -> &Clock {
        &self.clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animator::{PhaseAnimator, CLOSEUP, INTRO};
    use crate::clock::NOMINAL_FRAME_STEP;
    use crate::loading::LoadingSettings;
    use crate::scene::RecordingScene;
    use std::f32::consts::PI;

    fn instant_config() -> ShowcaseConfig {
        ShowcaseConfig {
            loading: LoadingSettings {
                enabled: false,
                ..LoadingSettings::default()
            },
            ..ShowcaseConfig::default()
        }
    }

    fn controller() -> ModeController {
        ModeController::new(&instant_config(), AnimatorTable::showcase())
    }

    fn tick_n(controller: &mut ModeController, scene: &mut RecordingScene, frames: usize) {
        for _ in 0..frames {
            controller.tick(NOMINAL_FRAME_STEP, scene);
        }
    }

    #[test]
    fn test_starts_interactive() {
        let mut controller = controller();
        let mut scene = RecordingScene::new();
        assert_eq!(controller.mode(), InteractionMode::Interactive);

        controller.tick(NOMINAL_FRAME_STEP, &mut scene);
        assert_eq!(controller.mode(), InteractionMode::Interactive);
        assert!(controller.active_phase().is_none());
        assert_eq!(scene.frames_rendered, 1);
        assert_eq!(controller.intro_time(), Some(0.0));
    }

    #[test]
    fn test_auto_cinematic_after_delay() {
        let mut controller = controller();
        let mut scene = RecordingScene::new();

        // Reveal frame, then 3.488s of intro
        tick_n(&mut controller, &mut scene, 1 + 218);
        assert_eq!(controller.mode(), InteractionMode::Interactive);

        tick_n(&mut controller, &mut scene, 1);
        assert_eq!(controller.mode(), InteractionMode::Cinematic);
        let (phase, progress) = controller.active_phase().unwrap();
        assert_eq!(phase.name, INTRO);
        assert_eq!(progress, 0.0);
    }

    #[test]
    fn test_auto_cinematic_counts_from_reveal() {
        let mut controller = ModeController::showcase();
        let mut scene = RecordingScene::new();

        let mut frames = 0;
        while controller.intro_time().is_none() {
            controller.tick(NOMINAL_FRAME_STEP, &mut scene);
            frames += 1;
            assert!(frames < 10_000, "loading never finished");
        }
        let revealed_at = controller.clock().now();
        assert!(frames > 1);
        assert!(revealed_at > 0.5);

        tick_n(&mut controller, &mut scene, 218);
        assert_eq!(controller.mode(), InteractionMode::Interactive);

        tick_n(&mut controller, &mut scene, 1);
        assert_eq!(controller.mode(), InteractionMode::Cinematic);
        assert!((controller.clock().now() - revealed_at - 219.0 * NOMINAL_FRAME_STEP).abs() < 1e-3);
    }

    #[test]
    fn test_auto_cinematic_fires_once() {
        let mut controller = controller();
        let mut scene = RecordingScene::new();
        tick_n(&mut controller, &mut scene, 300);
        assert_eq!(controller.mode(), InteractionMode::Cinematic);

        controller.input_sender().send(InputEvent::RequestInteractive);
        tick_n(&mut controller, &mut scene, 600);
        assert_eq!(controller.mode(), InteractionMode::Interactive);
    }

    #[test]
    fn test_waits_for_loading_before_auto_cinematic() {
        let mut controller = ModeController::showcase();
        let mut scene = RecordingScene::new();
        controller.tick(NOMINAL_FRAME_STEP, &mut scene);
        assert!(controller.intro_time().is_none());
        assert!(!controller.loading().is_ready());

        let mut frames = 0;
        while controller.intro_time().is_none() {
            controller.tick(NOMINAL_FRAME_STEP, &mut scene);
            frames += 1;
            assert!(frames < 10_000, "loading never finished");
        }
        assert_eq!(controller.mode(), InteractionMode::Interactive);
        assert_eq!(scene.scale(ObjectId::JewelryGroup), Some(8.0));
    }

    #[test]
    fn test_explicit_request_cancels_auto() {
        let mut controller = controller();
        let mut scene = RecordingScene::new();
        let input = controller.input_sender();

        input.send(InputEvent::RequestCinematic);
        tick_n(&mut controller, &mut scene, 10);
        input.send(InputEvent::RequestInteractive);
        tick_n(&mut controller, &mut scene, 400);

        assert_eq!(controller.mode(), InteractionMode::Interactive);
    }

    #[test]
    fn test_cinematic_resolves_timeline() {
        let mut controller = controller();
        let mut scene = RecordingScene::new();
        let input = controller.input_sender();

        input.send(InputEvent::RequestCinematic);
        input.send(InputEvent::SeekCinematic { time: 5.5 });
        controller.tick(NOMINAL_FRAME_STEP, &mut scene);

        let (phase, progress) = controller.active_phase().unwrap();
        assert_eq!(phase.name, CLOSEUP);
        assert!((progress - 0.5).abs() < 1e-6);

        let expected = PhaseAnimator::CLOSEUP.animate(0.5);
        assert_eq!(scene.camera_position, Some(expected.camera_position));
        assert_eq!(scene.rotation(ObjectId::JewelryGroup), Some(expected.jewelry_rotation));
        assert_eq!(scene.intensity(LightId::Key), expected.light(LightId::Key));
    }

    #[test]
    fn test_loop_wraps_elapsed() {
        let mut controller = controller();
        let mut scene = RecordingScene::new();
        let input = controller.input_sender();

        input.send(InputEvent::RequestCinematic);
        input.send(InputEvent::SeekCinematic { time: 16.5 });
        controller.tick(NOMINAL_FRAME_STEP, &mut scene);

        let (phase, progress) = controller.active_phase().unwrap();
        assert_eq!(phase.name, INTRO);
        assert!((progress - 0.5 / 4.0).abs() < 1e-5);
        assert!((controller.cinematic_elapsed() - (0.5 + NOMINAL_FRAME_STEP)).abs() < 1e-5);
    }

    #[test]
    fn test_return_to_interactive_restores_canonical_pose() {
        let mut controller = controller();
        let mut scene = RecordingScene::new();
        let input = controller.input_sender();

        input.send(InputEvent::RequestCinematic);
        input.send(InputEvent::SeekCinematic { time: 9.0 });
        tick_n(&mut controller, &mut scene, 5);
        assert_eq!(controller.mode(), InteractionMode::Cinematic);

        input.send(InputEvent::RequestInteractive);
        controller.tick(NOMINAL_FRAME_STEP, &mut scene);

        assert_eq!(controller.mode(), InteractionMode::Interactive);
        assert_eq!(
            scene.rotation(ObjectId::JewelryGroup),
            Some([0.15 * PI, 0.0, 0.1 * PI])
        );
        let camera = scene.camera_position.unwrap();
        assert!((camera[1] - 2.0).abs() < 1e-4 && (camera[2] - 6.0).abs() < 1e-4);
        assert_eq!(scene.intensity(LightId::Key), Some(LightId::Key.default_intensity()));

        // Timeline is no longer advanced
        let frozen = controller.cinematic_elapsed();
        tick_n(&mut controller, &mut scene, 30);
        assert_eq!(controller.cinematic_elapsed(), frozen);
        assert!(controller.active_phase().is_none());
        assert_eq!(
            scene.rotation(ObjectId::JewelryGroup),
            Some([0.15 * PI, 0.0, 0.1 * PI])
        );
    }

    #[test]
    fn test_redundant_requests_are_noops() {
        let mut controller = controller();
        assert!(!controller.request_interactive());
        assert!(controller.request_cinematic());

        let mut scene = RecordingScene::new();
        tick_n(&mut controller, &mut scene, 50);
        let elapsed = controller.cinematic_elapsed();

        // Does not restart the timeline
        assert!(!controller.request_cinematic());
        assert_eq!(controller.cinematic_elapsed(), elapsed);
        assert_eq!(controller.mode(), InteractionMode::Cinematic);
    }

    #[test]
    fn test_redundant_interactive_keeps_orbit() {
        let mut controller = controller();
        let mut scene = RecordingScene::new();
        let input = controller.input_sender();

        input.send(InputEvent::OrbitDrag { dx: 80.0, dy: 20.0 });
        input.send(InputEvent::OrbitZoom { delta: 2.0 });
        controller.tick(NOMINAL_FRAME_STEP, &mut scene);
        let (yaw, pitch, distance) = (controller.orbit().yaw, controller.orbit().pitch, controller.orbit().distance);

        assert!(!controller.request_interactive());
        input.send(InputEvent::RequestInteractive);
        controller.tick(NOMINAL_FRAME_STEP, &mut scene);

        assert_eq!(controller.mode(), InteractionMode::Interactive);
        assert_eq!(controller.orbit().yaw, yaw);
        assert_eq!(controller.orbit().pitch, pitch);
        assert_eq!(controller.orbit().distance, distance);
    }

    #[test]
    fn test_toggle_switches_both_ways() {
        let mut controller = controller();
        let mut scene = RecordingScene::new();
        let input = controller.input_sender();

        input.send(InputEvent::ToggleMode);
        controller.tick(NOMINAL_FRAME_STEP, &mut scene);
        assert_eq!(controller.mode(), InteractionMode::Cinematic);

        input.send(InputEvent::ToggleMode);
        controller.tick(NOMINAL_FRAME_STEP, &mut scene);
        assert_eq!(controller.mode(), InteractionMode::Interactive);
        assert!(!controller.request_mode(InteractionMode::Interactive));
    }

    #[test]
    fn test_orbit_input_only_in_interactive() {
        let mut controller = controller();
        let mut scene = RecordingScene::new();
        let input = controller.input_sender();

        input.send(InputEvent::OrbitDrag { dx: 100.0, dy: 0.0 });
        controller.tick(NOMINAL_FRAME_STEP, &mut scene);
        let yaw = controller.orbit().yaw;
        assert!(yaw.abs() > 0.5);

        input.send(InputEvent::ToggleMode);
        input.send(InputEvent::OrbitDrag { dx: 100.0, dy: 0.0 });
        input.send(InputEvent::OrbitZoom { delta: 3.0 });
        let distance = controller.orbit().distance;
        controller.tick(NOMINAL_FRAME_STEP, &mut scene);

        assert_eq!(controller.mode(), InteractionMode::Cinematic);
        assert_eq!(controller.orbit().yaw, yaw);
        assert_eq!(controller.orbit().distance, distance);
    }

    #[test]
    fn test_empty_timeline_fails_open() {
        let mut config = instant_config();
        config.cinematic.phases = Timeline::default();
        config.cinematic.loop_duration = None;
        let mut controller = ModeController::new(&config, AnimatorTable::showcase());
        let mut scene = RecordingScene::new();

        assert!(controller.request_cinematic());
        tick_n(&mut controller, &mut scene, 10);
        assert!(controller.active_phase().is_none());
        assert_eq!(scene.frames_rendered, 10);
    }

    #[test]
    fn test_unanimated_phase_keeps_running() {
        let mut config = instant_config();
        config.cinematic.phases = Timeline::default()
            .with_phase("mystery", 0.0, 1.0)
            .with_phase(CLOSEUP, 1.0, 1.0);
        config.cinematic.loop_duration = None;
        let mut controller = ModeController::new(&config, AnimatorTable::showcase());
        let mut scene = RecordingScene::new();

        controller.request_cinematic();
        tick_n(&mut controller, &mut scene, 100);
        let (phase, _) = controller.active_phase().unwrap();
        assert_eq!(phase.name, CLOSEUP);
        assert!(scene.camera_position.is_some());
    }

    #[test]
    fn test_mode_names() {
        assert_eq!(InteractionMode::default().name(), "Interactive");
        assert_eq!(InteractionMode::Interactive.toggled(), InteractionMode::Cinematic);
    }
}
