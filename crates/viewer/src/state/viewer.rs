//! Viewer session: the loaded model, the picking engine and the annotation
//! session, created on mount and torn down before the model or the render
//! surface goes away.

use std::path::PathBuf;
use std::sync::Arc;

use egui::{Pos2, Rect};
use tracing::info;

use crate::annotation::{AnnotationSession, LabelFontError, PlacementOutcome};
use crate::model::{LoadedModel, ModelLoadError};
use crate::state::settings::AnnotationSettings;
use crate::viewport::camera::ArcBallCamera;
use crate::viewport::host::ViewportHost;
use crate::viewport::picking::PickingEngine;

/// Where the model currently stands
#[derive(Clone, Debug, PartialEq)]
pub enum ModelStatus {
    Empty,
    Loading(PathBuf),
    Ready { name: String, triangles: usize },
    Failed(String),
}

pub struct ViewerSession {
    pub picking: PickingEngine,
    pub annotations: AnnotationSession,
    model: Option<Arc<LoadedModel>>,
    /// Bumped on every mount/teardown so GPU caches can resync
    model_version: u64,
    status: ModelStatus,
}

impl ViewerSession {
    pub fn new() -> Result<Self, LabelFontError> {
        Ok(Self {
            picking: PickingEngine::new(),
            annotations: AnnotationSession::new()?,
            model: None,
            model_version: 0,
            status: ModelStatus::Empty,
        })
    }

    /// Replace the current model. Existing annotations are torn down first.
    pub fn mount(&mut self, model: LoadedModel) -> Arc<LoadedModel> {
        self.teardown();
        let model = Arc::new(model);
        self.picking.attach(model.clone());
        self.status = ModelStatus::Ready {
            name: model.name.clone(),
            triangles: model.triangle_count(),
        };
        self.model = Some(model.clone());
        self.model_version += 1;
        info!("Model {} mounted", model.name);
        model
    }

    /// Tear down and wait for a background load of `path`.
    pub fn begin_loading(&mut self, path: PathBuf) {
        self.teardown();
        self.status = ModelStatus::Loading(path);
    }

    pub fn load_failed(&mut self, error: &ModelLoadError) {
        self.status = ModelStatus::Failed(error.to_string());
    }

    /// Dispose annotation visuals, then release the model from picking.
    pub fn teardown(&mut self) -> usize {
        let disposed = self.annotations.teardown();
        self.picking.release();
        if self.model.take().is_some() {
            self.model_version += 1;
        }
        self.status = ModelStatus::Empty;
        disposed
    }

    pub fn double_click(&mut self, camera: &ArcBallCamera, rect: Rect, pixel: Pos2) -> PlacementOutcome {
        let host = ViewportHost::new(camera, rect, &self.picking);
        self.annotations.on_double_click(&host, pixel)
    }

    /// Colors apply to groups created from now on.
    pub fn apply_settings(&mut self, settings: &AnnotationSettings) {
        let renderer = self.annotations.renderer_mut();
        renderer.marker_color = settings.marker_rgb();
        renderer.leader_color = settings.leader_rgba();
    }

    pub fn model(&self) -> Option<&Arc<LoadedModel>> {
        self.model.as_ref()
    }

    pub fn model_version(&self) -> u64 {
        self.model_version
    }

    pub fn status(&self) -> &ModelStatus {
        &self.status
    }
}
