// SPDX-License-Identifier: MIT OR Apache-2.0
//! Run the showcase without a window.

use solitaire_cinematic::{
    AnimatorTable, InteractionMode, ModeController, RecordingScene, ShowcaseConfig, NOMINAL_FRAME_STEP,
};

/// What happened during a headless run
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessReport {
    /// Frames ticked
    pub frames: u64,
    /// Frame on which the scene was revealed
    pub revealed_at: Option<u64>,
    /// Number of mode transitions
    pub mode_changes: u32,
    /// Mode after the last frame
    pub mode: InteractionMode,
    /// Phase active on the last frame
    pub phase: Option<String>,
}

/// Tick the controller `frames` times against a recording scene
pub fn run(config: &ShowcaseConfig, frames: u64) -> HeadlessReport {
    let mut controller = ModeController::new(config, AnimatorTable::showcase());
    let mut scene = RecordingScene::new();

    let mut report = HeadlessReport {
        frames,
        revealed_at: None,
        mode_changes: 0,
        mode: controller.mode(),
        phase: None,
    };

    for frame in 0..frames {
        controller.tick(NOMINAL_FRAME_STEP, &mut scene);

        if report.revealed_at.is_none() && controller.intro_time().is_some() {
            report.revealed_at = Some(frame);
        }

        if controller.mode() != report.mode {
            tracing::info!("frame {frame}: {} -> {}", report.mode.name(), controller.mode().name());
            report.mode = controller.mode();
            report.mode_changes += 1;
        }

        let phase = controller.active_phase().map(|(phase, _)| phase.name.clone());
        if phase != report.phase {
            if let Some(name) = &phase {
                tracing::info!("frame {frame}: phase '{name}' at {:.2}s", controller.cinematic_elapsed());
            }
            report.phase = phase;
        }
    }

    tracing::info!(
        "Headless run finished: {} frames, {} mode changes, {} rendered, ending {} in {:?}",
        report.frames,
        report.mode_changes,
        scene.frames_rendered,
        report.mode.name(),
        report.phase
    );

    report
}
