//! Surface annotations: store, label rasterizer, visual groups and the
//! placement/edit state machine that ties them together.

pub mod label;
pub mod render;
pub mod session;
pub mod store;

pub use label::{LabelFontError, LabelRasterizer};
pub use render::{AnnotationRenderer, LabelBillboard, VisualGroup};
pub use session::{
    AnnotationSession, CommitOutcome, EditState, IgnoreReason, PlacementOutcome, SceneHost,
};
pub use store::{AnnotationStore, TextCommit};
