//! Painter overlays drawn on top of the GL viewport: label billboards,
//! axis labels, camera info and the no-GL fallback.

use egui::{Color32, Painter, Rect};
use glam::Vec3;

use crate::annotation::{AnnotationRenderer, LabelBillboard};

use super::camera::ArcBallCamera;

/// Draw axis labels in the viewport
pub fn draw_axis_labels(painter: &Painter, rect: Rect, camera: &ArcBallCamera, length: f32) {
    let tip = length + 0.1;
    let labels = [
        (Vec3::new(tip, 0.0, 0.0), "X", Color32::from_rgb(220, 70, 70)),
        (Vec3::new(0.0, tip, 0.0), "Y", Color32::from_rgb(70, 200, 70)),
        (Vec3::new(0.0, 0.0, tip), "Z", Color32::from_rgb(70, 110, 220)),
    ];

    for (pos, label, color) in labels {
        if let Some(screen) = camera.project(pos, rect) {
            if rect.contains(screen) {
                painter.text(
                    screen,
                    egui::Align2::LEFT_BOTTOM,
                    label,
                    egui::FontId::monospace(12.0),
                    color,
                );
            }
        }
    }
}

/// Screen rectangle of a billboard, or `None` when it is behind the camera.
///
/// The quad always faces the camera, so its on-screen width is the projected
/// length of half the world width along the camera's right vector, doubled.
pub fn billboard_rect(label: &LabelBillboard, camera: &ArcBallCamera, rect: Rect) -> Option<Rect> {
    let center = camera.project(label.center, rect)?;
    let edge = label.center + camera.right_vector() * (label.world_size.x * 0.5);
    let edge = camera.project(edge, rect)?;
    let width = 2.0 * (edge - center).length();
    let height = width * label.world_size.y / label.world_size.x;
    Some(Rect::from_center_size(center, egui::vec2(width, height)))
}

/// Paint every label billboard that has an uploaded texture.
///
/// Farther labels are painted first so nearer ones overlap them.
pub fn draw_billboards(
    painter: &Painter,
    rect: Rect,
    camera: &ArcBallCamera,
    renderer: &AnnotationRenderer,
) {
    let eye = camera.eye_position();
    let mut visible: Vec<(f32, Rect, egui::TextureId)> = renderer
        .groups()
        .filter_map(|(_, group)| {
            let label = group.label.as_ref()?;
            let texture = label.texture.as_ref()?;
            let screen = billboard_rect(label, camera, rect)?;
            Some((eye.distance(label.center), screen, texture.id()))
        })
        .collect();
    visible.sort_by(|a, b| b.0.total_cmp(&a.0));

    let uv = Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
    for (_, screen, texture) in visible {
        painter.image(texture, screen, uv, Color32::WHITE);
    }
}

/// Without a GL context: marker dots and leader segments only.
pub fn draw_fallback_annotations(
    painter: &Painter,
    rect: Rect,
    camera: &ArcBallCamera,
    renderer: &AnnotationRenderer,
) {
    let marker = Color32::from_rgb(
        (renderer.marker_color[0] * 255.0) as u8,
        (renderer.marker_color[1] * 255.0) as u8,
        (renderer.marker_color[2] * 255.0) as u8,
    );
    let [r, g, b, a] = renderer.leader_color.map(|c| (c * 255.0) as u8);
    let leader = egui::Stroke::new(1.0, Color32::from_rgba_unmultiplied(r, g, b, a));

    for (_, group) in renderer.groups() {
        for (from, to) in group.leader.segments() {
            if let (Some(a), Some(b)) = (camera.project(from, rect), camera.project(to, rect)) {
                painter.line_segment([a, b], leader);
            }
        }
        if let Some(p) = camera.project(group.anchor, rect) {
            painter.circle_filled(p, 3.0, marker);
        }
    }
}

/// Small box in the top-right corner with orbit distance and angles
pub fn draw_camera_info(painter: &Painter, rect: Rect, camera: &ArcBallCamera) {
    let overlay_rect = Rect::from_min_size(
        egui::pos2(rect.right() - 140.0, rect.top() + 4.0),
        egui::vec2(136.0, 44.0),
    );
    painter.rect_filled(
        overlay_rect,
        4.0,
        Color32::from_rgba_premultiplied(0, 0, 0, 140),
    );
    painter.text(
        overlay_rect.min + egui::vec2(6.0, 4.0),
        egui::Align2::LEFT_TOP,
        format!(
            "Dist: {:.1}\nYaw: {:.0}  Pitch: {:.0}",
            camera.distance,
            camera.yaw.to_degrees(),
            camera.pitch.to_degrees(),
        ),
        egui::FontId::monospace(10.0),
        Color32::from_rgb(160, 160, 170),
    );
}

/// Centered hint at the bottom of the viewport
pub fn draw_hint(painter: &Painter, rect: Rect, text: &str) {
    painter.text(
        egui::pos2(rect.center().x, rect.bottom() - 20.0),
        egui::Align2::CENTER_BOTTOM,
        text,
        egui::FontId::proportional(11.0),
        Color32::from_rgb(100, 100, 110),
    );
}
