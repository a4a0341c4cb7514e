//! Headless test harness for driving an annotation session without a window.
//!
//! Uses a real arc-ball camera over a fixed 800x600 viewport, so pixel
//! coordinates go through the same ray casting as the GUI.

use egui::{Pos2, Rect};
use glam::Vec3;
use shared::{Annotation, AnnotationId};

use crate::annotation::{CommitOutcome, EditState, PlacementOutcome};
use crate::model::{self, LoadedModel};
use crate::state::ViewerSession;
use crate::viewport::camera::ArcBallCamera;

pub const VIEWPORT_WIDTH: f32 = 800.0;
pub const VIEWPORT_HEIGHT: f32 = 600.0;

/// Headless harness: viewer session + camera + viewport rect
pub struct TestHarness {
    pub session: ViewerSession,
    pub camera: ArcBallCamera,
    pub rect: Rect,
}

impl TestHarness {
    /// Harness with no model mounted.
    ///
    /// # Panics
    /// If the built-in label font cannot be parsed.
    pub fn new() -> Self {
        Self {
            session: ViewerSession::new().expect("built-in label font"),
            camera: ArcBallCamera::new(),
            rect: Rect::from_min_size(Pos2::ZERO, egui::vec2(VIEWPORT_WIDTH, VIEWPORT_HEIGHT)),
        }
    }

    /// Harness with the procedural demo specimen mounted and framed.
    pub fn with_demo_specimen() -> Self {
        let mut h = Self::new();
        h.mount(model::demo_specimen());
        h
    }

    /// Mount a model and frame the camera on it.
    pub fn mount(&mut self, model: LoadedModel) {
        let model = self.session.mount(model);
        self.camera.frame_model(&model.bounds);
    }

    // ── Events ────────────────────────────────────────────────

    pub fn double_click(&mut self, x: f32, y: f32) -> PlacementOutcome {
        self.session
            .double_click(&self.camera, self.rect, Pos2::new(x, y))
    }

    /// Double-click at the viewport center
    pub fn double_click_center(&mut self) -> PlacementOutcome {
        let c = self.rect.center();
        self.double_click(c.x, c.y)
    }

    /// Confirm the annotation being edited. `None` when nothing is being edited.
    pub fn confirm(&mut self, text: &str) -> Option<CommitOutcome> {
        let id = self.editing()?;
        Some(self.session.annotations.on_edit_confirm(id, text))
    }

    /// Cancel the annotation being edited
    pub fn cancel(&mut self) -> bool {
        match self.editing() {
            Some(id) => self.session.annotations.on_edit_cancel(id),
            None => false,
        }
    }

    pub fn delete(&mut self, id: AnnotationId) -> bool {
        self.session.annotations.on_delete_request(id)
    }

    pub fn teardown(&mut self) -> usize {
        self.session.teardown()
    }

    // ── Inspection ────────────────────────────────────────────

    pub fn editing(&self) -> Option<AnnotationId> {
        self.session.annotations.editing()
    }

    pub fn state(&self) -> EditState {
        self.session.annotations.state()
    }

    pub fn list(&self) -> Vec<Annotation> {
        self.session.annotations.current_annotations().to_vec()
    }

    pub fn annotation_count(&self) -> usize {
        self.session.annotations.current_annotations().len()
    }

    pub fn live_visual_groups(&self) -> usize {
        self.session.annotations.renderer().live_groups()
    }

    /// Viewport pixel of a world point under the current camera
    pub fn project(&self, point: Vec3) -> Option<Pos2> {
        self.camera.project(point, self.rect)
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
