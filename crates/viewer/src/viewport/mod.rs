//! 3D viewport panel with OpenGL rendering

mod gl_renderer;
mod overlays;
pub use anatomy_viewer_lib::viewport::{camera, host, mesh, picking};

use std::sync::{Arc, Mutex};

use egui::Ui;
use tracing::debug;

use crate::annotation::PlacementOutcome;
use crate::i18n::t;
use crate::state::{AppState, ModelStatus};
use camera::ArcBallCamera;
use gl_renderer::{AnnotationGeometry, GlRenderer};
use mesh::MeshData;
use picking::Aabb;

/// 3D viewport panel with OpenGL rendering
pub struct ViewportPanel {
    camera: ArcBallCamera,
    gl_renderer: Option<Arc<Mutex<GlRenderer>>>,
    /// Part meshes of the mounted model, shared with the paint callback
    model_meshes: Arc<Vec<MeshData>>,
    model_version: u64,
    /// Marker and leader geometry, rebuilt when the annotation renderer changes
    annotation_geometry: Arc<Vec<AnnotationGeometry>>,
    annotation_version: u64,
}

impl ViewportPanel {
    pub fn new(min_distance: f32, max_distance: f32) -> Self {
        Self {
            camera: ArcBallCamera::new().with_limits(min_distance, max_distance),
            gl_renderer: None,
            model_meshes: Arc::new(Vec::new()),
            model_version: 0,
            annotation_geometry: Arc::new(Vec::new()),
            annotation_version: 0,
        }
    }

    /// Initialize GL renderer (must be called with a GL context)
    pub fn init_gl(&mut self, gl: &glow::Context, axes_length: f32) {
        let renderer = GlRenderer::new(gl, axes_length);
        self.gl_renderer = Some(Arc::new(Mutex::new(renderer)));
    }

    /// Release GPU resources. The annotation session must already be torn down.
    pub fn destroy_gl(&mut self, gl: &glow::Context) {
        if let Some(renderer) = self.gl_renderer.take() {
            if let Ok(mut r) = renderer.lock() {
                debug!("Destroying GL renderer ({} annotation groups left)", r.annotation_count());
                r.destroy(gl);
            }
        }
    }

    pub fn set_limits(&mut self, min_distance: f32, max_distance: f32) {
        self.camera = self.camera.with_limits(min_distance, max_distance);
    }

    /// Default view, framed on `bounds` when a model is mounted
    pub fn reset_camera(&mut self, bounds: Option<&Aabb>) {
        self.camera = ArcBallCamera::new().with_limits(self.camera.min_distance, self.camera.max_distance);
        if let Some(bounds) = bounds {
            self.camera.frame_model(bounds);
        }
    }

    pub fn frame(&mut self, bounds: &Aabb) {
        self.camera.frame_model(bounds);
    }

    pub fn show(&mut self, ui: &mut Ui, state: &mut AppState) {
        let (rect, response) =
            ui.allocate_exact_size(ui.available_size(), egui::Sense::click_and_drag());

        self.handle_camera(&response, ui);
        self.handle_double_click(&response, rect, state);

        state.viewer.annotations.renderer_mut().prepare_textures(ui.ctx());

        if !ui.is_rect_visible(rect) {
            return;
        }

        self.render_gl(ui, rect, state);
        self.draw_overlays(ui, rect, state);
    }

    fn handle_camera(&mut self, response: &egui::Response, ui: &Ui) {
        if response.dragged_by(egui::PointerButton::Primary)
            || response.dragged_by(egui::PointerButton::Middle)
        {
            let delta = response.drag_delta();
            self.camera.rotate(delta.x * 0.5, delta.y * 0.5);
        }

        if response.dragged_by(egui::PointerButton::Secondary) {
            let delta = response.drag_delta();
            self.camera.pan(-delta.x * 0.01, delta.y * 0.01);
        }

        if response.hovered() {
            let scroll = ui.input(|i| i.smooth_scroll_delta.y);
            if scroll.abs() > 0.1 {
                self.camera.zoom(scroll * 0.01);
            }
        }
    }

    fn handle_double_click(&mut self, response: &egui::Response, rect: egui::Rect, state: &mut AppState) {
        if !response.double_clicked() {
            return;
        }
        let Some(pos) = response.interact_pointer_pos() else {
            return;
        };
        if let PlacementOutcome::Placed { .. } = state.viewer.double_click(&self.camera, rect, pos) {
            state.edit_text.clear();
        }
    }

    /// Refresh the geometry snapshots handed to the paint callback
    fn refresh_geometry(&mut self, state: &AppState) {
        let model_version = state.viewer.model_version();
        if model_version != self.model_version {
            let meshes = state
                .viewer
                .model()
                .map(|m| m.parts().into_iter().map(|p| p.mesh.clone()).collect())
                .unwrap_or_default();
            self.model_meshes = Arc::new(meshes);
            self.model_version = model_version;
        }

        let renderer = state.viewer.annotations.renderer();
        if renderer.version() != self.annotation_version {
            self.annotation_geometry = gl_renderer::annotation_geometry(renderer);
            self.annotation_version = renderer.version();
        }
    }

    fn render_gl(&mut self, ui: &mut Ui, rect: egui::Rect, state: &AppState) {
        let Some(gl_renderer) = self.gl_renderer.clone() else {
            // Fallback: painter-only annotations
            let painter = ui.painter_at(rect);
            painter.rect_filled(rect, 0.0, bg_color32(state.settings.viewport.background_color));
            overlays::draw_fallback_annotations(
                &painter,
                rect,
                &self.camera,
                state.viewer.annotations.renderer(),
            );
            return;
        };

        self.refresh_geometry(state);

        let camera = self.camera;
        let model_meshes = self.model_meshes.clone();
        let model_version = self.model_version;
        let annotations = self.annotation_geometry.clone();
        let annotation_version = self.annotation_version;

        let viewport_settings = state.settings.viewport.clone();

        let callback = egui::PaintCallback {
            rect,
            callback: Arc::new(eframe::egui_glow::CallbackFn::new(move |info, painter| {
                let gl = painter.gl();

                let clip = info.clip_rect_in_pixels();
                let viewport = [
                    clip.left_px as f32,
                    clip.from_bottom_px as f32,
                    clip.width_px as f32,
                    clip.height_px as f32,
                ];

                if let Ok(mut r) = gl_renderer.lock() {
                    r.update_axes(gl, viewport_settings.axes_length);
                    r.sync_model(gl, &model_meshes, model_version);
                    r.sync_annotations(gl, &annotations, annotation_version);

                    let render_params = gl_renderer::RenderParams {
                        viewport,
                        axes_visible: viewport_settings.axes_visible,
                        bg_color: viewport_settings.background_color,
                    };
                    r.paint(gl, &camera, &render_params);
                }
            })),
        };

        ui.painter().add(callback);
    }

    fn draw_overlays(&self, ui: &mut Ui, rect: egui::Rect, state: &AppState) {
        let painter = ui.painter_at(rect);
        let renderer = state.viewer.annotations.renderer();

        if self.gl_renderer.is_some() {
            overlays::draw_billboards(&painter, rect, &self.camera, renderer);
        }

        if state.settings.viewport.axes_visible {
            overlays::draw_axis_labels(&painter, rect, &self.camera, state.settings.viewport.axes_length);
        }

        overlays::draw_camera_info(&painter, rect, &self.camera);

        match state.viewer.status() {
            ModelStatus::Loading(_) => overlays::draw_hint(&painter, rect, t("status.loading")),
            ModelStatus::Empty | ModelStatus::Failed(_) => {
                overlays::draw_hint(&painter, rect, t("status.no_model"))
            }
            ModelStatus::Ready { .. } if renderer.live_groups() == 0 => {
                overlays::draw_hint(&painter, rect, t("panel.hint"))
            }
            ModelStatus::Ready { .. } => {}
        }
    }
}

fn bg_color32(rgb: [u8; 3]) -> egui::Color32 {
    egui::Color32::from_rgb(rgb[0], rgb[1], rgb[2])
}
