//! Top menu bar.

use eframe::egui::{self, RichText};

use crate::app::VectorizerApp;
use crate::ui::{colors, visuals_for};

/// Render the top menu bar.
pub fn render(app: &mut VectorizerApp, ui: &mut egui::Ui, ctx: &egui::Context) {
    let has_image = app.session.has_image();
    let has_result = app.session.result().is_some();

    egui::menu::bar(ui, |ui| {
        ui.label(RichText::new("Image Vectorizer").strong().size(15.0));
        ui.separator();

        // File menu
        ui.menu_button("File", |ui| {
            if ui.button("Open Image...").clicked() {
                app.open_image_dialog();
                ui.close_menu();
            }

            if ui.button("Paste Image").clicked() {
                app.paste_from_clipboard();
                ui.close_menu();
            }

            ui.separator();

            if ui
                .add_enabled(has_result, egui::Button::new("Save SVG..."))
                .clicked()
            {
                app.save_svg_dialog();
                ui.close_menu();
            }

            if ui
                .add_enabled(has_result, egui::Button::new("Copy SVG"))
                .clicked()
            {
                app.copy_svg(ctx);
                ui.close_menu();
            }

            ui.separator();

            if ui
                .add_enabled(has_image, egui::Button::new("New Image"))
                .clicked()
            {
                app.reset();
                ui.close_menu();
            }

            if ui.button("Quit").clicked() {
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
        });

        // Edit menu
        ui.menu_button("Edit", |ui| {
            if ui.button("Settings...").clicked() {
                app.open_settings();
                ui.close_menu();
            }
        });

        // View menu
        ui.menu_button("View", |ui| {
            let dark_mode = app.settings.theme == vectorizer_core::Theme::Dark;

            if ui.checkbox(&mut { dark_mode }, "Dark Mode").changed() {
                app.settings.theme = app.settings.theme.toggled();
                ctx.set_visuals(visuals_for(app.settings.theme));
                app.save_settings();
            }

            ui.separator();

            if ui.button("Reset Zoom").clicked() {
                app.preview.viewport.reset();
                ui.close_menu();
            }
        });

        // Right-aligned status
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if app.session.is_loading() {
                ui.spinner();
                ui.label(
                    RichText::new("Vectorizing...")
                        .color(colors::ACCENT)
                        .size(12.0),
                );
            } else if has_result {
                ui.label(RichText::new("Ready").color(colors::SUCCESS).size(12.0));
            } else if app.session.error().is_some() {
                ui.label(RichText::new("Failed").color(colors::ERROR).size(12.0));
            }
        });
    });
}
