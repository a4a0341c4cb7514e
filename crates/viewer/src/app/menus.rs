//! Application menu bar and settings window

use eframe::egui;
use tokio::runtime::Handle;

use crate::i18n::{lang, set_lang, t, Lang};
use crate::model;
use crate::state::settings::AppSettings;
use crate::state::AppState;
use crate::viewport::ViewportPanel;

/// Show the file menu
pub fn file_menu(
    ui: &mut egui::Ui,
    state: &mut AppState,
    viewport: &mut ViewportPanel,
    handle: &Handle,
) {
    ui.menu_button(t("menu.file"), |ui| {
        if ui
            .add_enabled(!state.is_loading(), egui::Button::new(t("menu.open_model")))
            .clicked()
        {
            ui.close_menu();
            if let Some(path) = rfd::FileDialog::new()
                .set_title(t("menu.open_model_title"))
                .add_filter("Wavefront OBJ", &["obj"])
                .pick_file()
            {
                state.open_model(handle, path);
            }
        }
        if ui
            .add_enabled(!state.is_loading(), egui::Button::new(t("menu.demo_model")))
            .clicked()
        {
            state.edit_text.clear();
            let specimen = state.viewer.mount(model::demo_specimen());
            viewport.frame(&specimen.bounds);
            ui.close_menu();
        }
        ui.separator();
        if ui.button(t("menu.quit")).clicked() {
            // Goes through on_exit so the session is torn down before the GL context
            ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
            ui.close_menu();
        }
    });
}

/// Show the view menu
pub fn view_menu(ui: &mut egui::Ui, state: &mut AppState, viewport: &mut ViewportPanel) {
    ui.menu_button(t("menu.view"), |ui| {
        ui.checkbox(&mut state.panels.side_panel, t("menu.side_panel"));
        ui.checkbox(
            &mut state.settings.viewport.axes_visible,
            t("settings.axes_visible"),
        );
        ui.separator();
        if ui.button(t("menu.reset_camera")).clicked() {
            let bounds = state.viewer.model().map(|m| m.bounds);
            viewport.reset_camera(bounds.as_ref());
            ui.close_menu();
        }
        ui.separator();
        ui.menu_button(t("menu.language"), |ui| {
            for (l, name) in [(Lang::Ru, "Русский"), (Lang::En, "English")] {
                if ui.selectable_label(lang() == l, name).clicked() {
                    set_lang(l);
                    state.settings.ui.language = l;
                    ui.close_menu();
                }
            }
        });
        ui.separator();
        if ui.button(t("menu.settings")).clicked() {
            state.show_settings_window = true;
            ui.close_menu();
        }
    });
}

/// Show the settings window
pub fn settings_window(ctx: &egui::Context, state: &mut AppState) {
    let mut open = state.show_settings_window;
    egui::Window::new(t("settings.title"))
        .open(&mut open)
        .resizable(true)
        .default_width(360.0)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                show_viewport_settings(ui, &mut state.settings);
                show_annotation_settings(ui, &mut state.settings);
                show_camera_settings(ui, &mut state.settings);
                show_ui_settings(ui, &mut state.settings);
                show_settings_buttons(ui, state);
            });
        });
    state.show_settings_window = open && state.show_settings_window;
}

fn rgb_edit(ui: &mut egui::Ui, label: &str, rgb: &mut [u8; 3]) {
    ui.horizontal(|ui| {
        ui.label(label);
        let mut color = egui::Color32::from_rgb(rgb[0], rgb[1], rgb[2]);
        if ui.color_edit_button_srgba(&mut color).changed() {
            *rgb = [color.r(), color.g(), color.b()];
        }
    });
}

fn show_viewport_settings(ui: &mut egui::Ui, settings: &mut AppSettings) {
    ui.heading(t("settings.viewport"));
    rgb_edit(ui, t("settings.bg_color"), &mut settings.viewport.background_color);
    ui.checkbox(&mut settings.viewport.axes_visible, t("settings.axes_visible"));
    ui.add_space(10.0);
}

fn show_annotation_settings(ui: &mut egui::Ui, settings: &mut AppSettings) {
    ui.heading(t("settings.annotations"));
    rgb_edit(ui, t("settings.marker_color"), &mut settings.annotations.marker_color);
    rgb_edit(ui, t("settings.leader_color"), &mut settings.annotations.leader_color);
    ui.add_space(10.0);
}

fn show_camera_settings(ui: &mut egui::Ui, settings: &mut AppSettings) {
    ui.heading(t("settings.camera"));
    let max = settings.camera.max_distance;
    ui.horizontal(|ui| {
        ui.label(t("settings.min_distance"));
        ui.add(
            egui::DragValue::new(&mut settings.camera.min_distance)
                .speed(0.1)
                .range(0.5..=max),
        );
    });
    let min = settings.camera.min_distance;
    ui.horizontal(|ui| {
        ui.label(t("settings.max_distance"));
        ui.add(
            egui::DragValue::new(&mut settings.camera.max_distance)
                .speed(0.5)
                .range(min..=200.0),
        );
    });
    ui.add_space(10.0);
}

fn show_ui_settings(ui: &mut egui::Ui, settings: &mut AppSettings) {
    ui.heading(t("settings.ui"));
    ui.horizontal(|ui| {
        ui.label(t("settings.font_size"));
        ui.add(
            egui::DragValue::new(&mut settings.ui.font_size)
                .speed(0.5)
                .range(8.0..=24.0)
                .suffix(" pt"),
        );
    });
    ui.add_space(10.0);
}

fn show_settings_buttons(ui: &mut egui::Ui, state: &mut AppState) {
    ui.separator();
    ui.horizontal(|ui| {
        if ui.button(t("settings.apply")).clicked() {
            state.settings.save();
        }
        if ui.button(t("settings.reset")).clicked() {
            let language = state.settings.ui.language;
            state.settings = AppSettings::default();
            state.settings.ui.language = language;
        }
        if ui.button(t("settings.close")).clicked() {
            state.show_settings_window = false;
        }
    });
}
