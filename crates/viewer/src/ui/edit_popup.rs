//! Inline text editor for the annotation being edited.
//!
//! Shown at the projected leader end captured when the annotation was
//! placed, centered horizontally and sitting above that point. Enter or
//! losing focus confirms, Escape cancels.

use egui::{Context, Rect};
use shared::AnnotationId;

use crate::annotation::EditState;
use crate::i18n::t;
use crate::state::AppState;

enum EditAction {
    Confirm,
    Cancel,
}

#[derive(Default)]
pub struct EditPopup {
    /// Annotation the editor was last shown for; focus is requested when it changes
    shown_for: Option<AnnotationId>,
}

impl EditPopup {
    /// `keep_focus` is a screen region (the side panel) whose clicks must not
    /// commit the edit, so catalog entries can fill the field.
    pub fn show(&mut self, ctx: &Context, state: &mut AppState, keep_focus: Option<Rect>) {
        let EditState::Editing { id, edit_anchor } = state.viewer.annotations.state() else {
            self.shown_for = None;
            return;
        };
        let first_frame = self.shown_for != Some(id);
        self.shown_for = Some(id);
        let anchor = edit_anchor.unwrap_or_else(|| ctx.screen_rect().center());

        let mut action = None;
        egui::Area::new(egui::Id::new(("annotation_editor", id.0)))
            .order(egui::Order::Foreground)
            .fixed_pos(anchor)
            .pivot(egui::Align2::CENTER_BOTTOM)
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.horizontal(|ui| {
                        let response = ui.add(
                            egui::TextEdit::singleline(&mut state.edit_text)
                                .hint_text(t("editor.placeholder"))
                                .desired_width(180.0),
                        );
                        if first_frame {
                            response.request_focus();
                        }

                        if ui.button(t("editor.ok")).clicked() {
                            action = Some(EditAction::Confirm);
                        } else if response.lost_focus() {
                            let escape = ui.input(|i| i.key_pressed(egui::Key::Escape));
                            let pointer_kept = keep_focus.is_some_and(|r| {
                                ui.input(|i| i.pointer.interact_pos())
                                    .is_some_and(|p| r.contains(p))
                            });
                            if escape {
                                action = Some(EditAction::Cancel);
                            } else if pointer_kept {
                                response.request_focus();
                            } else {
                                action = Some(EditAction::Confirm);
                            }
                        }
                    });
                });
            });

        match action {
            Some(EditAction::Confirm) => {
                let text = std::mem::take(&mut state.edit_text);
                state.viewer.annotations.on_edit_confirm(id, &text);
            }
            Some(EditAction::Cancel) => {
                state.edit_text.clear();
                state.viewer.annotations.on_edit_cancel(id);
            }
            None => {}
        }
    }
}
