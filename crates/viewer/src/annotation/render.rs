use std::collections::BTreeMap;

use glam::{Vec2, Vec3};
use image::RgbaImage;
use shared::{Annotation, AnnotationId};
use tracing::debug;

use crate::viewport::mesh::{self, LineMeshData, MeshData};

/// Marker sphere radius in world units
pub const MARKER_RADIUS: f32 = 0.05;
pub const MARKER_SEGMENTS: u32 = 16;
/// #ff4444
pub const MARKER_COLOR: [f32; 3] = [1.0, 0x44 as f32 / 255.0, 0x44 as f32 / 255.0];
pub const LEADER_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
/// Billboard size in world units (4:1, same aspect as the label canvas)
pub const BILLBOARD_SIZE: Vec2 = Vec2::new(1.0, 0.25);

/// Camera-facing label quad centered on the leader end
pub struct LabelBillboard {
    pub center: Vec3,
    pub world_size: Vec2,
    pub image: RgbaImage,
    /// Uploaded lazily by [`AnnotationRenderer::prepare_textures`]; freed on drop
    pub texture: Option<egui::TextureHandle>,
}

impl LabelBillboard {
    pub fn new(center: Vec3, image: RgbaImage) -> Self {
        Self {
            center,
            world_size: BILLBOARD_SIZE,
            image,
            texture: None,
        }
    }

    /// Replace the image. The old texture is dropped and re-uploaded on the next frame.
    pub fn set_image(&mut self, image: RgbaImage) {
        self.image = image;
        self.texture = None;
    }
}

/// Everything drawn for one annotation
pub struct VisualGroup {
    pub anchor: Vec3,
    pub marker: MeshData,
    pub leader: LineMeshData,
    pub label: Option<LabelBillboard>,
}

/// Owns the drawables of every annotation, keyed by id.
///
/// All mutation happens on the UI thread between frames; `version` changes
/// whenever the set of groups or their geometry changes so GPU-side caches
/// know to resync.
pub struct AnnotationRenderer {
    groups: BTreeMap<AnnotationId, VisualGroup>,
    version: u64,
    pub marker_color: [f32; 3],
    pub leader_color: [f32; 4],
}

impl Default for AnnotationRenderer {
    fn default() -> Self {
        Self {
            groups: BTreeMap::new(),
            version: 0,
            marker_color: MARKER_COLOR,
            leader_color: LEADER_COLOR,
        }
    }
}

impl AnnotationRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Builders ────────────────────────────────────────────

    /// Small sphere at the anchor point
    pub fn show_marker(&self, point: Vec3) -> MeshData {
        mesh::sphere(MARKER_RADIUS, MARKER_SEGMENTS, MARKER_SEGMENTS, self.marker_color)
            .translated(point)
    }

    /// Diagonal segment to the bend point, then horizontal to the leader end
    pub fn show_leader_line(&self, anchor: Vec3, leader_end: Vec3) -> LineMeshData {
        let bend = Vec3::from(shared::leader_bend(anchor.to_array()));
        mesh::leader_lines(anchor, bend, leader_end, self.leader_color)
    }

    pub fn show_label(&self, leader_end: Vec3, image: RgbaImage) -> LabelBillboard {
        LabelBillboard::new(leader_end, image)
    }

    // ── Group lifecycle ─────────────────────────────────────

    /// Build and register the full group for an annotation, replacing any previous one.
    pub fn add_group(&mut self, annotation: &Annotation, label: Option<RgbaImage>) {
        let anchor = Vec3::from(annotation.anchor_point);
        let end = Vec3::from(annotation.leader_end);
        let group = VisualGroup {
            anchor,
            marker: self.show_marker(anchor),
            leader: self.show_leader_line(anchor, end),
            label: label.map(|image| self.show_label(end, image)),
        };
        self.groups.insert(annotation.id, group);
        self.version += 1;
        debug!("Visual group added for {}", annotation.id);
    }

    /// Swap only the billboard image; marker and leader stay as they are.
    /// Returns false if the id has no group.
    pub fn update_label(&mut self, id: AnnotationId, image: RgbaImage) -> bool {
        let Some(group) = self.groups.get_mut(&id) else {
            return false;
        };
        match &mut group.label {
            Some(label) => label.set_image(image),
            None => {
                let end = Vec3::from(shared::leader_end(group.anchor.to_array()));
                group.label = Some(LabelBillboard::new(end, image));
            }
        }
        self.version += 1;
        true
    }

    /// Dispose the whole group. Unknown ids are a no-op.
    pub fn remove(&mut self, id: AnnotationId) -> bool {
        let removed = self.groups.remove(&id).is_some();
        if removed {
            self.version += 1;
            debug!("Visual group disposed for {id}");
        }
        removed
    }

    /// Dispose every group; returns how many were dropped.
    pub fn clear(&mut self) -> usize {
        let count = self.groups.len();
        self.groups.clear();
        if count > 0 {
            self.version += 1;
        }
        count
    }

    // ── Queries ─────────────────────────────────────────────

    pub fn live_groups(&self) -> usize {
        self.groups.len()
    }

    pub fn group(&self, id: AnnotationId) -> Option<&VisualGroup> {
        self.groups.get(&id)
    }

    pub fn groups(&self) -> impl Iterator<Item = (&AnnotationId, &VisualGroup)> {
        self.groups.iter()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Upload label images that have no texture yet.
    pub fn prepare_textures(&mut self, ctx: &egui::Context) {
        for (id, group) in &mut self.groups {
            let Some(label) = &mut group.label else {
                continue;
            };
            if label.texture.is_some() {
                continue;
            }
            let size = [label.image.width() as usize, label.image.height() as usize];
            let image = egui::ColorImage::from_rgba_unmultiplied(size, label.image.as_raw());
            label.texture = Some(ctx.load_texture(
                format!("annotation-label-{}", id.0),
                image,
                egui::TextureOptions::LINEAR,
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn annotation(id: u64, anchor: [f32; 3]) -> Annotation {
        Annotation::new(AnnotationId(id), anchor)
    }

    fn blank() -> RgbaImage {
        RgbaImage::new(4, 1)
    }

    #[test]
    fn test_marker_centered_on_anchor() {
        let r = AnnotationRenderer::new();
        let anchor = Vec3::new(0.12, 0.5, -0.3);
        let marker = r.show_marker(anchor);
        for i in 0..marker.vertex_count() {
            assert!(((marker.position(i) - anchor).length() - MARKER_RADIUS).abs() < 1e-5);
        }
    }

    #[test]
    fn test_leader_line_shape() {
        let r = AnnotationRenderer::new();
        let a = annotation(1, [0.0, 0.0, 0.0]);
        let lines = r.show_leader_line(Vec3::from(a.anchor_point), Vec3::from(a.leader_end));
        let segs = lines.segments();
        assert_eq!(segs.len(), 2);
        assert_eq!(segs[0].1, Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(segs[1].1, Vec3::new(1.5, 1.0, 0.0));
    }

    #[test]
    fn test_add_and_remove_group() {
        let mut r = AnnotationRenderer::new();
        r.add_group(&annotation(1, [0.0; 3]), Some(blank()));
        r.add_group(&annotation(2, [1.0; 3]), None);
        assert_eq!(r.live_groups(), 2);

        assert!(r.remove(AnnotationId(1)));
        assert!(!r.remove(AnnotationId(1)));
        assert_eq!(r.live_groups(), 1);
    }

    #[test]
    fn test_update_label_preserves_geometry() {
        let mut r = AnnotationRenderer::new();
        let a = annotation(5, [0.0, 2.0, 0.0]);
        r.add_group(&a, Some(blank()));
        let marker_before = r.group(a.id).unwrap().marker.vertices.clone();
        let version = r.version();

        assert!(r.update_label(a.id, RgbaImage::new(8, 2)));
        let group = r.group(a.id).unwrap();
        assert_eq!(group.marker.vertices, marker_before);
        let label = group.label.as_ref().unwrap();
        assert_eq!(label.image.dimensions(), (8, 2));
        assert_eq!(label.center, Vec3::from(a.leader_end));
        assert!(r.version() > version);
    }

    #[test]
    fn test_update_label_creates_missing_billboard() {
        let mut r = AnnotationRenderer::new();
        let a = annotation(3, [1.0, 0.0, 0.0]);
        r.add_group(&a, None);
        assert!(r.update_label(a.id, blank()));
        let label = r.group(a.id).unwrap().label.as_ref().unwrap();
        assert_eq!(label.center, Vec3::from(a.leader_end));
        assert_eq!(label.world_size, BILLBOARD_SIZE);
    }

    #[test]
    fn test_update_label_unknown_id() {
        let mut r = AnnotationRenderer::new();
        assert!(!r.update_label(AnnotationId(9), blank()));
    }

    #[test]
    fn test_clear_disposes_everything() {
        let mut r = AnnotationRenderer::new();
        for i in 1..=3 {
            r.add_group(&annotation(i, [0.0; 3]), Some(blank()));
        }
        assert_eq!(r.clear(), 3);
        assert_eq!(r.live_groups(), 0);
        assert_eq!(r.clear(), 0);
    }

    #[test]
    fn test_prepare_textures_uploads_once() {
        let ctx = egui::Context::default();
        let mut r = AnnotationRenderer::new();
        let a = annotation(1, [0.0; 3]);
        r.add_group(&a, Some(blank()));

        r.prepare_textures(&ctx);
        let id_before = r.group(a.id).unwrap().label.as_ref().unwrap().texture.as_ref().unwrap().id();
        r.prepare_textures(&ctx);
        let id_after = r.group(a.id).unwrap().label.as_ref().unwrap().texture.as_ref().unwrap().id();
        assert_eq!(id_before, id_after);

        r.update_label(a.id, blank());
        assert!(r.group(a.id).unwrap().label.as_ref().unwrap().texture.is_none());
    }
}
