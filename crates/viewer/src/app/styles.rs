//! Dark theme and font sizes

use eframe::egui;

const PANEL_FILL: egui::Color32 = egui::Color32::from_rgb(30, 30, 34);
const WINDOW_FILL: egui::Color32 = egui::Color32::from_rgb(35, 35, 40);
/// Warm accent, close to the marker color
const ACCENT: egui::Color32 = egui::Color32::from_rgb(140, 60, 50);

/// Configure initial application styles with given font size
pub fn configure_styles(ctx: &egui::Context, font_size: f32) {
    ctx.style_mut(|style| {
        let mut visuals = egui::Visuals::dark();
        visuals.window_corner_radius = egui::CornerRadius::same(6);
        visuals.menu_corner_radius = egui::CornerRadius::same(4);
        for widget in [
            &mut visuals.widgets.noninteractive,
            &mut visuals.widgets.inactive,
            &mut visuals.widgets.hovered,
            &mut visuals.widgets.active,
        ] {
            widget.corner_radius = egui::CornerRadius::same(3);
        }
        visuals.panel_fill = PANEL_FILL;
        visuals.window_fill = WINDOW_FILL;
        visuals.selection.bg_fill = ACCENT;
        visuals.text_cursor.stroke = egui::Stroke::new(2.0, egui::Color32::from_rgb(255, 110, 90));
        style.visuals = visuals;

        style.spacing.item_spacing = egui::vec2(6.0, 4.0);
        style.spacing.button_padding = egui::vec2(6.0, 3.0);
        style.spacing.menu_margin = egui::Margin::same(4);

        apply_text_styles(style, font_size);
    });
}

/// Apply font size to all text styles
pub fn apply_font_size(ctx: &egui::Context, font_size: f32) {
    ctx.style_mut(|style| apply_text_styles(style, font_size));
}

fn apply_text_styles(style: &mut egui::Style, font_size: f32) {
    let sizes = [
        (egui::TextStyle::Body, egui::FontId::proportional(font_size)),
        (egui::TextStyle::Button, egui::FontId::proportional(font_size)),
        (egui::TextStyle::Small, egui::FontId::proportional(font_size * 0.85)),
        (egui::TextStyle::Heading, egui::FontId::proportional(font_size * 1.3)),
        (egui::TextStyle::Monospace, egui::FontId::monospace(font_size)),
    ];
    for (text_style, font) in sizes {
        style.text_styles.insert(text_style, font);
    }
}
