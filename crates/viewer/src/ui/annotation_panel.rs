//! Side panel: bone reference catalog and the list of placed labels

use egui::Ui;
use shared::{AnnotationId, BONE_CATALOG};

use crate::i18n::t;
use crate::state::AppState;

pub fn show(ui: &mut Ui, state: &mut AppState) {
    let editing = state.viewer.annotations.editing();

    egui::CollapsingHeader::new(t("panel.bones"))
        .default_open(true)
        .show(ui, |ui| {
            egui::ScrollArea::vertical()
                .id_salt("bone_catalog_scroll")
                .max_height(ui.available_height() * 0.5)
                .show(ui, |ui| {
                    for bone in BONE_CATALOG {
                        let response =
                            ui.selectable_label(false, format!("{} ({})", bone.ru, bone.lat));
                        let response = if editing.is_some() {
                            response.on_hover_text(t("panel.fill_term"))
                        } else {
                            response
                        };
                        // Only fills the editor; never commits on its own
                        if editing.is_some() && response.clicked() {
                            state.edit_text = bone.lat.to_string();
                        }
                    }
                });
        });

    ui.add_space(4.0);
    ui.separator();

    let count = state.viewer.annotations.current_annotations().len();
    ui.horizontal(|ui| {
        ui.heading(t("panel.labels"));
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.weak(format!("({count})"));
        });
    });
    ui.separator();

    if count == 0 {
        ui.add_space(12.0);
        ui.vertical_centered(|ui| {
            ui.weak(t("panel.no_labels"));
            ui.add_space(4.0);
            ui.weak(t("panel.hint"));
        });
        return;
    }

    // Collect rows first; deleting mutates the session
    let rows: Vec<(AnnotationId, String)> = state
        .viewer
        .annotations
        .current_annotations()
        .iter()
        .map(|a| {
            let name = if a.has_text() {
                a.text.clone()
            } else {
                t("panel.untitled").to_string()
            };
            (a.id, name)
        })
        .collect();

    let mut to_delete = None;
    egui::ScrollArea::vertical()
        .id_salt("annotation_list_scroll")
        .show(ui, |ui| {
            for (id, name) in &rows {
                ui.horizontal(|ui| {
                    let is_editing = editing == Some(*id);
                    let text = egui::RichText::new(name);
                    let text = if is_editing { text.italics() } else { text };
                    ui.label(text);
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.small_button("🗑").on_hover_text(t("panel.delete")).clicked() {
                            to_delete = Some(*id);
                        }
                    });
                });
            }
        });

    if let Some(id) = to_delete {
        state.viewer.annotations.on_delete_request(id);
    }
}
