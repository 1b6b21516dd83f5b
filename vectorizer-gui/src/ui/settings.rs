//! Settings dialog.

use eframe::egui::{self, RichText, Rounding, Vec2};
use vectorizer_core::{RenderMode, Theme, DEFAULT_TRACER_COMMAND};

use crate::app::VectorizerApp;
use crate::ui::{colors, visuals_for};

/// Active tab in the settings dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SettingsTab {
    #[default]
    Tracer,
    Appearance,
}

/// Render the settings dialog.
pub fn render(app: &mut VectorizerApp, ctx: &egui::Context) {
    egui::Window::new("Settings")
        .collapsible(false)
        .resizable(false)
        .default_width(460.0)
        .anchor(egui::Align2::CENTER_CENTER, Vec2::ZERO)
        .show(ctx, |ui| {
            let muted = colors::muted(ui.visuals());

            ui.spacing_mut().item_spacing = Vec2::new(8.0, 12.0);

            // -----------------------------------------------------------------
            // Tabs
            // -----------------------------------------------------------------
            ui.horizontal(|ui| {
                ui.spacing_mut().item_spacing.x = 0.0;
                for (tab, label) in [
                    (SettingsTab::Tracer, "  Tracer  "),
                    (SettingsTab::Appearance, "  Appearance  "),
                ] {
                    let selected = app.settings_tab == tab;
                    if ui
                        .selectable_label(selected, RichText::new(label).size(14.0))
                        .clicked()
                    {
                        app.settings_tab = tab;
                    }
                }
            });
            ui.separator();

            match app.settings_tab {
                SettingsTab::Tracer => render_tracer_tab(app, ui, muted),
                SettingsTab::Appearance => render_appearance_tab(app, ui, ctx, muted),
            }

            // -----------------------------------------------------------------
            // Footer
            // -----------------------------------------------------------------
            ui.add_space(16.0);
            ui.separator();

            ui.horizontal(|ui| {
                if ui
                    .add_sized(
                        Vec2::new(100.0, 30.0),
                        egui::Button::new(RichText::new("Save").strong())
                            .fill(colors::ACCENT)
                            .rounding(Rounding::same(8.0)),
                    )
                    .clicked()
                {
                    app.commit_settings();
                    app.show_settings = false;
                }

                if ui
                    .add_sized(
                        Vec2::new(100.0, 30.0),
                        egui::Button::new("Cancel").rounding(Rounding::same(8.0)),
                    )
                    .clicked()
                {
                    // Reload settings to discard changes
                    app.settings = vectorizer_core::Settings::load(&app.db);
                    ctx.set_visuals(visuals_for(app.settings.theme));
                    app.show_settings = false;
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(
                        RichText::new(format!("v{}", vectorizer_core::VERSION))
                            .size(11.0)
                            .color(muted),
                    );
                });
            });
        });
}

fn render_tracer_tab(app: &mut VectorizerApp, ui: &mut egui::Ui, muted: egui::Color32) {
    ui.heading("External Tracer");

    ui.label("Command");
    ui.add(
        egui::TextEdit::singleline(&mut app.settings.tracer.command)
            .hint_text(DEFAULT_TRACER_COMMAND)
            .desired_width(f32::INFINITY),
    );
    ui.label(
        RichText::new("Executable name on PATH, or a full path")
            .size(11.0)
            .color(muted)
            .italics(),
    );

    ui.label("Arguments");
    ui.add(
        egui::TextEdit::singleline(&mut app.tracer_args_draft)
            .hint_text("none")
            .desired_width(f32::INFINITY),
    );
    ui.label(
        RichText::new("Separated by spaces. The request is written to stdin as JSON.")
            .size(11.0)
            .color(muted)
            .italics(),
    );

    ui.horizontal(|ui| {
        ui.label("Timeout");
        ui.add(
            egui::DragValue::new(&mut app.settings.tracer.timeout_secs)
                .range(1..=3600)
                .suffix(" s"),
        );
    });
}

fn render_appearance_tab(
    app: &mut VectorizerApp,
    ui: &mut egui::Ui,
    ctx: &egui::Context,
    muted: egui::Color32,
) {
    ui.heading("Theme");
    ui.horizontal(|ui| {
        for theme in Theme::all() {
            if ui
                .selectable_label(app.settings.theme == *theme, theme.to_string())
                .clicked()
            {
                app.settings.theme = *theme;
                ctx.set_visuals(visuals_for(*theme));
            }
        }
    });

    ui.add_space(8.0);
    ui.heading("Rendering");
    ui.horizontal(|ui| {
        for (mode, label) in [
            (RenderMode::Auto, "Hardware (auto)"),
            (RenderMode::Software, "Software"),
        ] {
            if ui
                .selectable_label(app.settings.render_mode == mode, label)
                .clicked()
            {
                app.settings.render_mode = mode;
            }
        }
    });
    ui.label(
        RichText::new("Takes effect after restart")
            .size(11.0)
            .color(muted)
            .italics(),
    );
}
