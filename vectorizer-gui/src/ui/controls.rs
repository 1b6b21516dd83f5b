//! Right-hand control panel: presets, Basic/Advanced option tabs, export.

use eframe::egui::{self, RichText, Rounding, Vec2};
use vectorizer_core::{
    controls_in, ColorSampling, ControlGroup, ControlId, ControlKind, ControlSpec, ControlValue,
    Preset, PresetSelection, TraceOptions,
};

use crate::app::VectorizerApp;
use crate::ui::colors;

/// What the user asked for this frame. Applied after the panel is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
enum PanelAction {
    NewImage,
    Preset(Preset),
    Edit(ControlId, ControlValue),
    Download,
    Copy,
}

/// Render the control panel.
pub fn render(app: &mut VectorizerApp, ui: &mut egui::Ui) {
    let muted = colors::muted(ui.visuals());
    let has_image = app.session.has_image();
    let has_result = app.session.result().is_some();
    let mut action = None;

    ui.spacing_mut().item_spacing = Vec2::new(8.0, 10.0);
    ui.add_space(8.0);

    // -------------------------------------------------------------------------
    // Image
    // -------------------------------------------------------------------------
    ui.horizontal(|ui| {
        ui.heading("Image");
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui
                .add_enabled(has_image, egui::Button::new("New image"))
                .on_hover_text("Discard this image and start over")
                .clicked()
            {
                action = Some(PanelAction::NewImage);
            }
        });
    });

    match app.session.image() {
        Some(image) => {
            ui.label(RichText::new(&image.name).strong());
            ui.label(
                RichText::new(format!("{} · {}", image.mime, format_size(image.len())))
                    .size(11.0)
                    .color(muted),
            );
        }
        None => {
            ui.label(RichText::new("No image loaded").color(muted).italics());
        }
    }

    ui.separator();

    // -------------------------------------------------------------------------
    // Presets
    // -------------------------------------------------------------------------
    ui.heading("Preset");
    ui.add_enabled_ui(has_image, |ui| {
        let selection = app.session.selection();
        egui::ComboBox::from_id_salt("preset_select")
            .selected_text(selection.display_name())
            .width(ui.available_width())
            .show_ui(ui, |ui| {
                for preset in Preset::all() {
                    let selected = selection == PresetSelection::Named(*preset);
                    if ui
                        .selectable_label(selected, preset.display_name())
                        .clicked()
                    {
                        action = Some(PanelAction::Preset(*preset));
                    }
                }
                // Custom is reached by editing a control, never picked directly
                ui.add_enabled(
                    false,
                    egui::SelectableLabel::new(selection.is_custom(), "Custom"),
                );
            });
    });

    ui.separator();

    // -------------------------------------------------------------------------
    // Option tabs
    // -------------------------------------------------------------------------
    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 0.0;
        for group in ControlGroup::all() {
            let selected = app.control_tab == *group;
            let label = RichText::new(format!("  {}  ", group.label())).size(14.0);
            if ui.selectable_label(selected, label).clicked() {
                app.control_tab = *group;
            }
        }
    });

    ui.add_enabled_ui(has_image, |ui| {
        let options = app.session.options();
        for spec in controls_in(app.control_tab) {
            if let Some(value) = render_control(ui, spec, options) {
                action = Some(PanelAction::Edit(spec.id, value));
            }
        }
    });

    if !has_image {
        ui.label(
            RichText::new("Load an image to adjust settings")
                .size(11.0)
                .color(muted)
                .italics(),
        );
    }

    ui.separator();

    // -------------------------------------------------------------------------
    // Export
    // -------------------------------------------------------------------------
    ui.add_enabled_ui(has_result, |ui| {
        let button_size = Vec2::new(ui.available_width(), 32.0);
        if ui
            .add_sized(
                button_size,
                egui::Button::new(RichText::new("Download SVG").strong())
                    .fill(colors::ACCENT)
                    .rounding(Rounding::same(8.0)),
            )
            .clicked()
        {
            action = Some(PanelAction::Download);
        }

        let copy_label = if app.copied_recently() {
            RichText::new("Copied!").color(colors::SUCCESS)
        } else {
            RichText::new("Copy SVG")
        };
        if ui
            .add_sized(
                button_size,
                egui::Button::new(copy_label).rounding(Rounding::same(8.0)),
            )
            .clicked()
        {
            action = Some(PanelAction::Copy);
        }
    });

    if let Some(action) = action {
        apply(app, ui.ctx(), action);
    }
}

/// Draw one control. Returns the new value when the user changed it.
fn render_control(
    ui: &mut egui::Ui,
    spec: &ControlSpec,
    options: &TraceOptions,
) -> Option<ControlValue> {
    let current = spec.id.read(options);

    match (spec.kind, current) {
        (ControlKind::Slider { min, max, step }, ControlValue::Number(mut value)) => {
            ui.label(spec.label).on_hover_text(spec.tooltip);
            let decimals = if step < 1.0 { 1 } else { 0 };
            let response = ui
                .add(
                    egui::Slider::new(&mut value, min..=max)
                        .step_by(step as f64)
                        .fixed_decimals(decimals),
                )
                .on_hover_text(spec.tooltip);
            response.changed().then_some(ControlValue::Number(value))
        }
        (ControlKind::Toggle, ControlValue::Flag(mut flag)) => ui
            .checkbox(&mut flag, spec.label)
            .on_hover_text(spec.tooltip)
            .changed()
            .then_some(ControlValue::Flag(flag)),
        (ControlKind::Sampling, ControlValue::Sampling(mode)) => {
            ui.label(spec.label).on_hover_text(spec.tooltip);
            let mut picked = None;
            ui.horizontal(|ui| {
                for candidate in ColorSampling::all() {
                    if ui
                        .selectable_label(mode == *candidate, candidate.label())
                        .clicked()
                        && mode != *candidate
                    {
                        picked = Some(ControlValue::Sampling(*candidate));
                    }
                }
            });
            picked
        }
        _ => None,
    }
}

fn apply(app: &mut VectorizerApp, ctx: &egui::Context, action: PanelAction) {
    match action {
        PanelAction::NewImage => app.reset(),
        PanelAction::Preset(preset) => app.apply_preset(preset),
        PanelAction::Edit(id, value) => app.edit_option(id, value),
        PanelAction::Download => app.save_svg_dialog(),
        PanelAction::Copy => app.copy_svg(ctx),
    }
}

/// Human-readable byte count.
pub fn format_size(bytes: usize) -> String {
    const KIB: f64 = 1024.0;
    let bytes = bytes as f64;
    if bytes < KIB {
        format!("{} B", bytes)
    } else if bytes < KIB * KIB {
        format!("{:.1} KB", bytes / KIB)
    } else {
        format!("{:.1} MB", bytes / (KIB * KIB))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(3 * 1024 * 1024 + 512 * 1024), "3.5 MB");
    }
}
