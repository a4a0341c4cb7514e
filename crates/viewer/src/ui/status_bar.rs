use egui::Ui;

use crate::i18n::t;
use crate::state::{AppState, ModelStatus};

pub fn show(ui: &mut Ui, state: &AppState) {
    ui.horizontal(|ui| {
        match state.viewer.status() {
            ModelStatus::Empty => {
                ui.weak(t("status.no_model"));
            }
            ModelStatus::Loading(path) => {
                ui.spinner();
                ui.label(format!("{} {}", t("status.loading"), path.display()));
            }
            ModelStatus::Ready { name, triangles } => {
                ui.label(name.as_str());
                ui.separator();
                ui.weak(format!("{}: {triangles}", t("status.triangles")));
            }
            ModelStatus::Failed(message) => {
                ui.colored_label(
                    egui::Color32::from_rgb(230, 90, 90),
                    format!("{}: {message}", t("status.load_error")),
                );
            }
        }

        ui.separator();
        let labels = state.viewer.annotations.current_annotations().len();
        ui.weak(format!("{}: {labels}", t("status.labels")));

        if let Some(id) = state.viewer.annotations.editing() {
            ui.separator();
            ui.colored_label(egui::Color32::YELLOW, format!("{} {id}", t("status.editing")));
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.weak(concat!("anatomy-viewer v", env!("CARGO_PKG_VERSION")));
        });
    });
}
