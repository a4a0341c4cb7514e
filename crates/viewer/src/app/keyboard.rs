//! Keyboard shortcut handling

use eframe::egui;

use crate::state::AppState;
use crate::viewport::ViewportPanel;

/// Handle keyboard shortcuts for the application
pub fn handle_keyboard(ctx: &egui::Context, state: &mut AppState, viewport: &mut ViewportPanel) {
    // The inline editor handles its own keys
    if ctx.memory(|m| m.focused().is_some()) {
        return;
    }

    ctx.input(|i| {
        // Escape: drop the annotation being edited
        if i.key_pressed(egui::Key::Escape) {
            if let Some(id) = state.viewer.annotations.editing() {
                state.edit_text.clear();
                state.viewer.annotations.on_edit_cancel(id);
            }
        }
        // Home: back to the framing view
        if i.key_pressed(egui::Key::Home) {
            let bounds = state.viewer.model().map(|m| m.bounds);
            viewport.reset_camera(bounds.as_ref());
        }
    });
}
