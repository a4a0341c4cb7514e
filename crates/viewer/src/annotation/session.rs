use egui::Pos2;
use glam::Vec3;
use shared::{Annotation, AnnotationId};
use tracing::{debug, info};

use super::label::{LabelFontError, LabelRasterizer};
use super::render::AnnotationRenderer;
use super::store::{AnnotationStore, TextCommit};
use crate::viewport::picking::PickResult;

/// What the annotation core needs from the 3D view.
pub trait SceneHost {
    /// World point → viewport pixel, `None` when behind the camera
    fn project(&self, point: Vec3) -> Option<Pos2>;
    /// Nearest model surface under a viewport pixel
    fn cast_ray(&self, pixel: Pos2) -> PickResult;
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum EditState {
    #[default]
    Idle,
    /// One annotation mid-edit. `edit_anchor` is the projected leader end at
    /// creation time and is not updated when the camera moves.
    Editing {
        id: AnnotationId,
        edit_anchor: Option<Pos2>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IgnoreReason {
    PickMiss,
    ModelNotReady,
    ConcurrentEdit,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PlacementOutcome {
    Placed {
        id: AnnotationId,
        edit_anchor: Option<Pos2>,
    },
    Ignored(IgnoreReason),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommitOutcome {
    Committed { id: AnnotationId, text: String },
    Deleted(AnnotationId),
    /// The id was not the one being edited
    Ignored,
}

/// Placement/edit state machine over the store, renderer and label rasterizer.
pub struct AnnotationSession {
    store: AnnotationStore,
    renderer: AnnotationRenderer,
    labels: LabelRasterizer,
    state: EditState,
}

impl AnnotationSession {
    pub fn new() -> Result<Self, LabelFontError> {
        Ok(Self::with_rasterizer(LabelRasterizer::new()?))
    }

    pub fn with_rasterizer(labels: LabelRasterizer) -> Self {
        Self {
            store: AnnotationStore::new(),
            renderer: AnnotationRenderer::new(),
            labels,
            state: EditState::Idle,
        }
    }

    pub fn state(&self) -> EditState {
        self.state
    }

    pub fn editing(&self) -> Option<AnnotationId> {
        match self.state {
            EditState::Editing { id, .. } => Some(id),
            EditState::Idle => None,
        }
    }

    pub fn renderer(&self) -> &AnnotationRenderer {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut AnnotationRenderer {
        &mut self.renderer
    }

    pub fn current_annotations(&self) -> &[Annotation] {
        self.store.list()
    }

    pub fn annotation(&self, id: AnnotationId) -> Option<&Annotation> {
        self.store.get(id)
    }

    // ── Events from the host UI ─────────────────────────────

    pub fn on_double_click(&mut self, host: &impl SceneHost, pixel: Pos2) -> PlacementOutcome {
        if let EditState::Editing { id, .. } = self.state {
            debug!("Double click ignored: {id} is being edited");
            return PlacementOutcome::Ignored(IgnoreReason::ConcurrentEdit);
        }

        let hit = match host.cast_ray(pixel) {
            PickResult::Hit(hit) => hit,
            PickResult::Miss => {
                debug!("Double click at {pixel:?} missed the model");
                return PlacementOutcome::Ignored(IgnoreReason::PickMiss);
            }
            PickResult::ModelNotReady => {
                debug!("Double click at {pixel:?} before the model is ready");
                return PlacementOutcome::Ignored(IgnoreReason::ModelNotReady);
            }
        };

        let Some(annotation) = self.store.create(hit.point.to_array()).cloned() else {
            return PlacementOutcome::Ignored(IgnoreReason::ConcurrentEdit);
        };

        self.renderer
            .add_group(&annotation, Some(self.labels.rasterize(&annotation.text)));
        let edit_anchor = host.project(Vec3::from(annotation.leader_end));
        self.state = EditState::Editing {
            id: annotation.id,
            edit_anchor,
        };

        info!(
            "Annotation {} placed on {} at {:?}",
            annotation.id, hit.part, annotation.anchor_point
        );
        self.check_parity();
        PlacementOutcome::Placed {
            id: annotation.id,
            edit_anchor,
        }
    }

    pub fn on_edit_confirm(&mut self, id: AnnotationId, text: &str) -> CommitOutcome {
        if self.editing() != Some(id) {
            debug!("Confirm for {id} ignored: not being edited");
            return CommitOutcome::Ignored;
        }
        self.state = EditState::Idle;

        let outcome = match self.store.set_text(id, text) {
            TextCommit::Updated(text) => {
                self.renderer.update_label(id, self.labels.rasterize(&text));
                info!("Annotation {id} committed: {text}");
                CommitOutcome::Committed { id, text }
            }
            TextCommit::Deleted => {
                self.renderer.remove(id);
                info!("Annotation {id} discarded (empty text)");
                CommitOutcome::Deleted(id)
            }
            // The editing guard above keeps the id in the store
            TextCommit::Unknown => {
                self.renderer.remove(id);
                debug!("Confirm for {id} ignored: no longer stored");
                CommitOutcome::Ignored
            }
        };
        self.check_parity();
        outcome
    }

    /// Cancel the edit in progress, deleting its annotation.
    pub fn on_edit_cancel(&mut self, id: AnnotationId) -> bool {
        if self.editing() != Some(id) {
            debug!("Cancel for {id} ignored: not being edited");
            return false;
        }
        self.state = EditState::Idle;
        self.store.delete(id);
        self.renderer.remove(id);
        info!("Annotation {id} cancelled");
        self.check_parity();
        true
    }

    /// Delete any annotation. Unknown ids are a no-op.
    pub fn on_delete_request(&mut self, id: AnnotationId) -> bool {
        if self.editing() == Some(id) {
            self.state = EditState::Idle;
        }
        let removed = self.store.delete(id);
        self.renderer.remove(id);
        if removed {
            info!("Annotation {id} deleted");
        }
        self.check_parity();
        removed
    }

    /// Dispose every visual and forget all annotations; returns disposed group count.
    pub fn teardown(&mut self) -> usize {
        let disposed = self.renderer.clear();
        self.store.clear();
        self.state = EditState::Idle;
        info!("Annotation session torn down ({disposed} visual groups disposed)");
        disposed
    }

    fn check_parity(&self) {
        debug_assert_eq!(
            self.store.len(),
            self.renderer.live_groups(),
            "every annotation has exactly one visual group"
        );
        debug_assert_eq!(self.store.editing(), self.editing());
    }
}
