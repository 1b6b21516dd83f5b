//! Status bar at the bottom of the window.

use eframe::egui::{self, RichText};

use crate::app::VectorizerApp;
use crate::ui::colors;
use crate::ui::controls::format_size;

/// Render the status bar.
pub fn render(app: &VectorizerApp, ui: &mut egui::Ui) {
    let muted = colors::muted(ui.visuals());

    ui.horizontal(|ui| {
        // Status message
        if let Some((msg, _)) = &app.status_message {
            ui.label(RichText::new(msg).size(11.0).color(muted));
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if let Some(svg) = app.session.result() {
                ui.label(
                    RichText::new(format!("SVG {}", format_size(svg.len())))
                        .size(11.0)
                        .color(muted),
                );
                ui.separator();
            }

            if app.session.has_image() {
                ui.label(
                    RichText::new(app.session.selection().display_name())
                        .size(11.0)
                        .color(muted),
                );
                ui.separator();
            }

            ui.label(
                RichText::new(format!("Tracer: {}", app.settings.tracer.command))
                    .size(11.0)
                    .color(muted),
            );
        });
    });
}
