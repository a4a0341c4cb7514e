// Library crate: the headless annotation core, exposed for integration tests and the command interface.
// GUI-specific modules (app, ui, GL renderer, painter overlays) remain in the binary crate.

pub mod annotation;
pub mod command;
pub mod harness;
pub mod i18n;
pub mod model;
pub mod state;

/// Viewport types that do not need a GL context (camera, meshes, picking).
/// The GL renderer and egui overlays stay in the binary crate.
pub mod viewport {
    pub mod camera;
    pub mod host;
    pub mod mesh;
    pub mod picking;
}
