//! Main application module

mod keyboard;
mod menus;
mod styles;

use std::path::PathBuf;

use eframe::egui;
use tokio::runtime::Runtime;
use tracing::info;

use crate::annotation::LabelFontError;
use crate::i18n::set_lang;
use crate::model;
use crate::state::settings::AppSettings;
use crate::state::AppState;
use crate::ui::edit_popup::EditPopup;
use crate::ui::{annotation_panel, status_bar};
use crate::viewport::ViewportPanel;

/// Main application
pub struct AnatomyApp {
    state: AppState,
    viewport: ViewportPanel,
    edit_popup: EditPopup,
    /// Worker pool for model loading
    runtime: Runtime,
    /// Settings as last applied to the session and viewport
    applied_settings: AppSettings,
}

impl AnatomyApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        runtime: Runtime,
        initial_model: Option<PathBuf>,
    ) -> Result<Self, LabelFontError> {
        let settings = AppSettings::load();
        set_lang(settings.ui.language);
        styles::configure_styles(&cc.egui_ctx, settings.ui.font_size);

        let mut viewport =
            ViewportPanel::new(settings.camera.min_distance, settings.camera.max_distance);

        // Initialize GL renderer if glow context is available
        if let Some(gl) = cc.gl.as_ref() {
            viewport.init_gl(gl, settings.viewport.axes_length);
        }

        let mut state = AppState::new(settings.clone())?;
        match initial_model {
            Some(path) => state.open_model(runtime.handle(), path),
            None => {
                let specimen = state.viewer.mount(model::demo_specimen());
                viewport.frame(&specimen.bounds);
            }
        }

        Ok(Self {
            state,
            viewport,
            edit_popup: EditPopup::default(),
            runtime,
            applied_settings: settings,
        })
    }

    /// Push edited settings into the live session and viewport
    fn apply_settings(&mut self, ctx: &egui::Context) {
        let settings = &self.state.settings;
        if *settings == self.applied_settings {
            return;
        }
        if settings.ui.font_size != self.applied_settings.ui.font_size {
            styles::apply_font_size(ctx, settings.ui.font_size);
        }
        if settings.ui.language != self.applied_settings.ui.language {
            set_lang(settings.ui.language);
        }
        if settings.camera != self.applied_settings.camera {
            self.viewport
                .set_limits(settings.camera.min_distance, settings.camera.max_distance);
        }
        self.state.viewer.apply_settings(&settings.annotations);
        self.applied_settings = settings.clone();
    }
}

impl eframe::App for AnatomyApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.apply_settings(ctx);

        if let Some(bounds) = self.state.poll_model_load() {
            self.viewport.frame(&bounds);
        }
        if self.state.is_loading() {
            ctx.request_repaint_after(std::time::Duration::from_millis(50));
        }

        keyboard::handle_keyboard(ctx, &mut self.state, &mut self.viewport);

        // ── Menu bar ──────────────────────────────────────────
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                menus::file_menu(ui, &mut self.state, &mut self.viewport, self.runtime.handle());
                menus::view_menu(ui, &mut self.state, &mut self.viewport);
            });
        });

        // ── Settings window ──────────────────────────────────
        menus::settings_window(ctx, &mut self.state);

        // ── Status bar ───────────────────────────────────────
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(22.0)
            .frame(
                egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(8, 2)),
            )
            .show(ctx, |ui| {
                status_bar::show(ui, &self.state);
            });

        // ── Left panel: bones and labels ─────────────────────
        let side_panel_rect = self.state.panels.side_panel.then(|| {
            egui::SidePanel::left("annotation_panel")
                .default_width(240.0)
                .width_range(160.0..=420.0)
                .resizable(true)
                .frame(
                    egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::same(6)),
                )
                .show(ctx, |ui| {
                    annotation_panel::show(ui, &mut self.state);
                })
                .response
                .rect
        });

        // ── Central panel: 3D viewport ───────────────────────
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                self.viewport.show(ui, &mut self.state);
            });

        // ── Inline label editor ──────────────────────────────
        self.edit_popup.show(ctx, &mut self.state, side_panel_rect);
    }

    /// Annotation visuals and the model go first, then the GL objects that drew them.
    fn on_exit(&mut self, gl: Option<&glow::Context>) {
        let disposed = self.state.viewer.teardown();
        info!("Viewer closed, {disposed} annotations discarded");
        if let Some(gl) = gl {
            self.viewport.destroy_gl(gl);
        }
        self.state.settings.save();
    }
}
