// SPDX-License-Identifier: MIT OR Apache-2.0
//! Timeline strip UI.
//!
//! Features:
//! - Mode buttons
//! - Time ruler with phase bars
//! - Playhead with drag-to-seek while cinematic

use crate::controller::{InteractionMode, ModeController};
use crate::input::{InputEvent, InputSender};
use crate::timeline::Timeline;
use egui::{Color32, Pos2, Rect, Sense, Stroke, Vec2};

const LABEL_WIDTH: f32 = 96.0;
const RULER_HEIGHT: f32 = 20.0;
const PHASE_ROW_HEIGHT: f32 = 24.0;
const PLAYHEAD_WIDTH: f32 = 2.0;
const PLAYHEAD_COLOR: Color32 = Color32::from_rgb(255, 100, 100);

const PHASE_COLORS: [Color32; 5] = [
    Color32::from_rgb(86, 120, 168),
    Color32::from_rgb(168, 120, 86),
    Color32::from_rgb(96, 150, 110),
    Color32::from_rgb(180, 160, 80),
    Color32::from_rgb(140, 100, 160),
];

/// Maps between timeline seconds and screen x
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineScale {
    /// Screen x of time zero
    pub origin_x: f32,
    /// Horizontal zoom (pixels per second)
    pub pixels_per_second: f32,
}

impl TimelineScale {
    /// Fit `duration` seconds into `width` pixels starting at `origin_x`
    pub fn fit(origin_x: f32, width: f32, duration: f32) -> Self {
        let duration = if duration > 0.0 { duration } else { 1.0 };
        Self {
            origin_x,
            pixels_per_second: (width / duration).max(1.0),
        }
    }

    /// Convert time to x position
    pub fn time_to_x(&self, time: f32) -> f32 {
        self.origin_x + time * self.pixels_per_second
    }

    /// Convert x position to time, never negative
    pub fn x_to_time(&self, x: f32) -> f32 {
        ((x - self.origin_x) / self.pixels_per_second).max(0.0)
    }

    /// Ruler tick spacing in seconds for the current zoom
    pub fn tick_interval(&self) -> f32 {
        if self.pixels_per_second > 200.0 {
            0.1
        } else if self.pixels_per_second > 100.0 {
            0.5
        } else if self.pixels_per_second > 20.0 {
            1.0
        } else {
            5.0
        }
    }
}

/// Bottom panel showing the cinematic timeline
#[derive(Debug, Default)]
pub struct TimelineStrip {
    scrubbing: bool,
}

impl TimelineStrip {
    /// Create a new strip
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the playhead is being dragged
    pub fn is_scrubbing(&self) -> bool {
        self.scrubbing
    }

    /// Render the strip. Mode changes and seeks are queued on `input`.
    pub fn ui(&mut self, ui: &mut egui::Ui, controller: &ModeController, input: &InputSender) {
        self.render_toolbar(ui, controller, input);
        ui.separator();

        let width = ui.available_width();
        let (rect, _) = ui.allocate_exact_size(
            Vec2::new(width, RULER_HEIGHT + PHASE_ROW_HEIGHT),
            Sense::hover(),
        );
        let scale = TimelineScale::fit(
            rect.min.x + LABEL_WIDTH,
            rect.width() - LABEL_WIDTH,
            controller.loop_duration().max(controller.timeline().total_duration()),
        );

        let ruler_rect = Rect::from_min_size(rect.min, Vec2::new(rect.width(), RULER_HEIGHT));
        let row_rect = Rect::from_min_max(Pos2::new(rect.min.x, ruler_rect.max.y), rect.max);

        self.render_ruler(ui, ruler_rect, &scale, controller, input);
        let active = controller.active_phase().map(|(phase, _)| phase.name.as_str());
        render_phases(ui, row_rect, &scale, controller.timeline(), active);

        if controller.mode() == InteractionMode::Cinematic {
            let x = scale.time_to_x(controller.cinematic_elapsed());
            if x >= scale.origin_x && x <= rect.max.x {
                ui.painter_at(rect).line_segment(
                    [Pos2::new(x, ruler_rect.max.y), Pos2::new(x, rect.max.y)],
                    Stroke::new(PLAYHEAD_WIDTH, PLAYHEAD_COLOR),
                );
            }
        }
    }

    fn render_toolbar(&self, ui: &mut egui::Ui, controller: &ModeController, input: &InputSender) {
        ui.horizontal(|ui| {
            for mode in [InteractionMode::Interactive, InteractionMode::Cinematic] {
                let selected = controller.mode() == mode;
                if ui.selectable_label(selected, mode.name()).clicked() && !selected {
                    input.send(match mode {
                        InteractionMode::Interactive => InputEvent::RequestInteractive,
                        InteractionMode::Cinematic => InputEvent::RequestCinematic,
                    });
                }
            }

            ui.separator();

            let time = controller.cinematic_elapsed();
            ui.monospace(format!("{:05.2}s / {:.1}s", time, controller.loop_duration()));

            if let Some((phase, progress)) = controller.active_phase() {
                ui.separator();
                let label = ui.label(format!("{} {:>3.0}%", phase.name, progress * 100.0));
                if let Some(easing) = controller.animators().easing(&phase.name) {
                    label.on_hover_text(easing.name());
                }
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!(
                    "{} phases | frame {}",
                    controller.timeline().len(),
                    controller.clock().frame_count()
                ));
            });
        });
    }

    fn render_ruler(
        &mut self,
        ui: &mut egui::Ui,
        rect: Rect,
        scale: &TimelineScale,
        controller: &ModeController,
        input: &InputSender,
    ) {
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, Color32::from_gray(40));

        let tick_interval = scale.tick_interval();
        let end = scale.x_to_time(rect.max.x);

        let mut step = 0;
        loop {
            let time = step as f32 * tick_interval;
            if time > end {
                break;
            }
            let x = scale.time_to_x(time);
            let is_major = step % 5 == 0;
            let tick_height = if is_major { 10.0 } else { 5.0 };
            let tick_color = if is_major {
                Color32::from_gray(180)
            } else {
                Color32::from_gray(100)
            };

            painter.line_segment(
                [Pos2::new(x, rect.max.y - tick_height), Pos2::new(x, rect.max.y)],
                Stroke::new(1.0, tick_color),
            );
            if is_major {
                let label = if tick_interval < 1.0 {
                    format!("{time:.1}s")
                } else {
                    format!("{time:.0}s")
                };
                painter.text(
                    Pos2::new(x + 2.0, rect.min.y + 2.0),
                    egui::Align2::LEFT_TOP,
                    label,
                    egui::FontId::monospace(10.0),
                    Color32::from_gray(180),
                );
            }

            step += 1;
        }

        if controller.mode() == InteractionMode::Cinematic {
            let x = scale.time_to_x(controller.cinematic_elapsed());
            let triangle = vec![
                Pos2::new(x, rect.max.y - 8.0),
                Pos2::new(x - 6.0, rect.max.y),
                Pos2::new(x + 6.0, rect.max.y),
            ];
            painter.add(egui::Shape::convex_polygon(triangle, PLAYHEAD_COLOR, Stroke::NONE));
        }

        let response = ui.interact(rect, ui.id().with("timeline_ruler"), Sense::click_and_drag());
        if response.drag_started() {
            self.scrubbing = controller.mode() == InteractionMode::Cinematic;
        }
        if (self.scrubbing && response.dragged()) || response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                input.send(InputEvent::SeekCinematic {
                    time: scale.x_to_time(pos.x),
                });
            }
        }
        if response.drag_stopped() {
            self.scrubbing = false;
        }
    }
}

fn render_phases(
    ui: &egui::Ui,
    rect: Rect,
    scale: &TimelineScale,
    timeline: &Timeline,
    active: Option<&str>,
) {
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 0.0, Color32::from_gray(30));

    let label_rect = Rect::from_min_size(rect.min, Vec2::new(LABEL_WIDTH, rect.height()));
    painter.rect_filled(label_rect, 0.0, Color32::from_gray(35));
    painter.text(
        Pos2::new(label_rect.min.x + 6.0, label_rect.center().y),
        egui::Align2::LEFT_CENTER,
        "Phases",
        egui::FontId::proportional(12.0),
        Color32::from_gray(200),
    );

    for (index, phase) in timeline.phases().iter().enumerate() {
        let start_x = scale.time_to_x(phase.start_offset.max(0.0));
        let end_x = scale.time_to_x(phase.end().max(phase.start_offset)).min(rect.max.x);
        let bar = Rect::from_min_max(
            Pos2::new(start_x, rect.min.y + 3.0),
            Pos2::new(end_x.max(start_x + 2.0), rect.max.y - 3.0),
        );

        let color = PHASE_COLORS[index % PHASE_COLORS.len()];
        let is_active = active == Some(phase.name.as_str());
        painter.rect_filled(bar, 3.0, if is_active { color } else { color.gamma_multiply(0.6) });
        if is_active {
            painter.rect_stroke(bar, 3.0, Stroke::new(1.0, Color32::WHITE));
        }

        painter.text(
            Pos2::new(bar.min.x + 4.0, bar.center().y),
            egui::Align2::LEFT_CENTER,
            &phase.name,
            egui::FontId::proportional(11.0),
            Color32::WHITE,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_round_trip() {
        let scale = TimelineScale::fit(100.0, 800.0, 16.0);
        assert_eq!(scale.pixels_per_second, 50.0);
        assert_eq!(scale.time_to_x(4.0), 300.0);
        assert_eq!(scale.x_to_time(300.0), 4.0);
    }

    #[test]
    fn test_x_before_origin_clamps() {
        let scale = TimelineScale::fit(100.0, 800.0, 16.0);
        assert_eq!(scale.x_to_time(20.0), 0.0);
    }

    #[test]
    fn test_fit_empty_timeline() {
        let scale = TimelineScale::fit(0.0, 400.0, 0.0);
        assert_eq!(scale.pixels_per_second, 400.0);
    }

    #[test]
    fn test_tick_interval() {
        assert_eq!(TimelineScale::fit(0.0, 800.0, 16.0).tick_interval(), 1.0);
        assert_eq!(TimelineScale::fit(0.0, 3000.0, 10.0).tick_interval(), 0.1);
        assert_eq!(TimelineScale::fit(0.0, 100.0, 16.0).tick_interval(), 5.0);
    }
}
