// SPDX-License-Identifier: MIT OR Apache-2.0
//! Wireframe preview of the ring.
//!
//! The controller writes into [`PreviewScene`] like into any other scene;
//! the viewer then paints the latest state as projected line segments.

use egui::{Color32, Pos2, Rect, Stroke};
use solitaire_cinematic::{LightId, ObjectId, Scene};
use std::collections::HashMap;
use std::f32::consts::{FRAC_PI_4, TAU};

type Vec3 = [f32; 3];

/// Vertical field of view
const FOV_Y: f32 = FRAC_PI_4;
const NEAR: f32 = 0.05;
/// Stone position inside the jewelry group
const DIAMOND_OFFSET: Vec3 = [0.0, 0.35, 0.0];

const BACKGROUND: Color32 = Color32::from_rgb(10, 10, 14);
const GOLD: Color32 = Color32::from_rgb(255, 219, 88);
const STONE: Color32 = Color32::from_rgb(210, 230, 255);

fn add(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

fn sub(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn scale(v: Vec3, s: f32) -> Vec3 {
    [v[0] * s, v[1] * s, v[2] * s]
}

fn dot(a: Vec3, b: Vec3) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn cross(a: Vec3, b: Vec3) -> Vec3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn normalize(v: Vec3) -> Option<Vec3> {
    let length = dot(v, v).sqrt();
    (length > 1e-6).then(|| scale(v, 1.0 / length))
}

/// Rotate by Euler angles in XYZ order (the matrix is `Rx * Ry * Rz`)
pub fn rotate_euler_xyz(v: Vec3, rotation: Vec3) -> Vec3 {
    let (sx, cx) = rotation[0].sin_cos();
    let (sy, cy) = rotation[1].sin_cos();
    let (sz, cz) = rotation[2].sin_cos();

    let v = [v[0] * cz - v[1] * sz, v[0] * sz + v[1] * cz, v[2]];
    let v = [v[0] * cy + v[2] * sy, v[1], -v[0] * sy + v[2] * cy];
    [v[0], v[1] * cx - v[2] * sx, v[1] * sx + v[2] * cx]
}

/// Pinhole camera looking from `eye` at `target`, Y up
#[derive(Debug, Clone, Copy)]
pub struct PreviewCamera {
    /// Camera position
    pub eye: Vec3,
    /// Look-at point
    pub target: Vec3,
}

impl PreviewCamera {
    /// Project a world point into `rect`. `None` if behind the near plane.
    pub fn project(&self, point: Vec3, rect: Rect) -> Option<Pos2> {
        let forward = normalize(sub(self.target, self.eye))?;
        let right = normalize(cross(forward, [0.0, 1.0, 0.0]))
            .or_else(|| normalize(cross(forward, [0.0, 0.0, -1.0])))?;
        let up = cross(right, forward);

        let relative = sub(point, self.eye);
        let depth = dot(relative, forward);
        if depth < NEAR {
            return None;
        }

        let focal = rect.height() * 0.5 / (FOV_Y * 0.5).tan();
        let center = rect.center();
        Some(Pos2::new(
            center.x + dot(relative, right) / depth * focal,
            center.y - dot(relative, up) / depth * focal,
        ))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Part {
    Band,
    Setting,
    Stone,
}

fn circle_xy(center: Vec3, radius: f32, segments: usize) -> Vec<Vec3> {
    (0..segments)
        .map(|i| {
            let angle = TAU * i as f32 / segments as f32;
            [center[0] + radius * angle.cos(), center[1] + radius * angle.sin(), center[2]]
        })
        .collect()
}

fn circle_xz(center: Vec3, radius: f32, segments: usize) -> Vec<Vec3> {
    (0..segments)
        .map(|i| {
            let angle = TAU * i as f32 / segments as f32;
            [center[0] + radius * angle.cos(), center[1], center[2] + radius * angle.sin()]
        })
        .collect()
}

fn push_loop(segments: &mut Vec<(Part, Vec3, Vec3)>, part: Part, points: &[Vec3]) {
    for (i, &a) in points.iter().enumerate() {
        segments.push((part, a, points[(i + 1) % points.len()]));
    }
}

/// Line segments of the ring in group space; stone segments in stone space
fn ring_segments() -> Vec<(Part, Vec3, Vec3)> {
    let mut segments = Vec::new();

    for z in [-0.08, 0.08] {
        push_loop(&mut segments, Part::Band, &circle_xy([0.0, 0.0, z], 1.0, 48));
    }

    let head_top = circle_xz([0.0, 0.1, 0.0], 0.22, 16);
    let head_bottom = circle_xz([0.0, 0.0, 0.0], 0.16, 16);
    push_loop(&mut segments, Part::Setting, &head_top);
    push_loop(&mut segments, Part::Setting, &head_bottom);
    push_loop(&mut segments, Part::Setting, &circle_xz([0.0, 0.15, 0.0], 0.18, 16));

    for i in 0..6 {
        let angle = TAU * i as f32 / 6.0;
        let (x, z) = (angle.cos() * 0.15, angle.sin() * 0.15);
        segments.push((Part::Setting, [x, 0.1, z], [x, 0.4, z]));
    }

    let table = circle_xz([0.0, 0.08, 0.0], 0.07, 8);
    let girdle = circle_xz([0.0, 0.0, 0.0], 0.12, 8);
    let culet = [0.0, -0.17, 0.0];
    push_loop(&mut segments, Part::Stone, &table);
    push_loop(&mut segments, Part::Stone, &girdle);
    for (top, edge) in table.iter().zip(&girdle) {
        segments.push((Part::Stone, *top, *edge));
        segments.push((Part::Stone, *edge, culet));
    }

    segments
}

fn shade(color: Color32, factor: f32) -> Color32 {
    let channel = |c: u8| (f32::from(c) * factor).clamp(0.0, 255.0) as u8;
    Color32::from_rgb(channel(color.r()), channel(color.g()), channel(color.b()))
}

#[derive(Debug, Clone, Copy)]
struct LightState {
    intensity: f32,
    position: Option<Vec3>,
}

/// Scene that paints a wireframe of the ring
#[derive(Debug, Clone)]
pub struct PreviewScene {
    camera: PreviewCamera,
    rotations: HashMap<ObjectId, Vec3>,
    scales: HashMap<ObjectId, f32>,
    lights: HashMap<LightId, LightState>,
}

impl PreviewScene {
    /// Create a preview with the default light rig
    pub fn new() -> Self {
        let lights = LightId::all()
            .iter()
            .map(|&light| {
                let state = LightState {
                    intensity: light.default_intensity(),
                    position: light.default_position(),
                };
                (light, state)
            })
            .collect();

        Self {
            camera: PreviewCamera {
                eye: [0.0, 2.0, 6.0],
                target: [0.0, 0.0, 0.0],
            },
            rotations: HashMap::new(),
            scales: HashMap::new(),
            lights,
        }
    }

    fn rotation(&self, object: ObjectId) -> Vec3 {
        self.rotations.get(&object).copied().unwrap_or_default()
    }

    fn intensity(&self, light: LightId) -> f32 {
        self.lights.get(&light).map_or(0.0, |state| state.intensity)
    }

    /// Map a point from group space to world space
    fn group_to_world(&self, point: Vec3) -> Vec3 {
        let group_scale = self.scales.get(&ObjectId::JewelryGroup).copied().unwrap_or(1.0);
        rotate_euler_xyz(scale(point, group_scale), self.rotation(ObjectId::JewelryGroup))
    }

    fn to_world(&self, part: Part, point: Vec3) -> Vec3 {
        match part {
            Part::Band | Part::Setting => self.group_to_world(point),
            Part::Stone => {
                let in_group = add(rotate_euler_xyz(point, self.rotation(ObjectId::Diamond)), DIAMOND_OFFSET);
                self.group_to_world(in_group)
            }
        }
    }

    /// Paint the current state into `rect`
    pub fn paint(&self, painter: &egui::Painter, rect: Rect) {
        painter.rect_filled(rect, 0.0, BACKGROUND);

        let rig = LightId::Ambient.default_intensity()
            + LightId::Key.default_intensity()
            + LightId::Fill.default_intensity();
        let lit = (self.intensity(LightId::Ambient) + self.intensity(LightId::Key) + self.intensity(LightId::Fill))
            / rig;
        let rim = 0.5 + self.intensity(LightId::Rim);

        for (part, a, b) in ring_segments() {
            let (Some(a), Some(b)) = (
                self.camera.project(self.to_world(part, a), rect),
                self.camera.project(self.to_world(part, b), rect),
            ) else {
                continue;
            };

            let stroke = match part {
                Part::Band => Stroke::new(1.5, shade(GOLD, lit * 0.9)),
                Part::Setting => Stroke::new(1.0, shade(GOLD, lit)),
                Part::Stone => Stroke::new(1.0, shade(STONE, lit * rim)),
            };
            painter.line_segment([a, b], stroke);
        }

        for light in [LightId::Sparkle1, LightId::Sparkle2] {
            let Some(state) = self.lights.get(&light) else {
                continue;
            };
            let Some(position) = state.position.and_then(|p| self.camera.project(p, rect)) else {
                continue;
            };
            let alpha = (state.intensity.clamp(0.0, 1.0) * 160.0) as u8;
            painter.circle_filled(
                position,
                2.0 + state.intensity.max(0.0) * 8.0,
                Color32::from_rgba_unmultiplied(255, 255, 255, alpha),
            );
        }
    }
}

impl Default for PreviewScene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene for PreviewScene {
    fn set_camera_position(&mut self, position: [f32; 3]) {
        self.camera.eye = position;
    }

    fn set_camera_look_at(&mut self, target: [f32; 3]) {
        self.camera.target = target;
    }

    fn set_object_rotation(&mut self, object: ObjectId, rotation: [f32; 3]) {
        self.rotations.insert(object, rotation);
    }

    fn set_object_scale(&mut self, object: ObjectId, scale: f32) {
        self.scales.insert(object, scale);
    }

    fn set_light_intensity(&mut self, light: LightId, intensity: f32) {
        self.lights
            .entry(light)
            .or_insert(LightState {
                intensity,
                position: None,
            })
            .intensity = intensity;
    }

    fn set_light_position(&mut self, light: LightId, position: [f32; 3]) {
        self.lights
            .entry(light)
            .or_insert(LightState {
                intensity: light.default_intensity(),
                position: None,
            })
            .position = Some(position);
    }

    /// Painting happens later, in the egui pass
    fn render(&mut self) {}
}
