//! UI components for the vectorizer window.

pub mod controls;
pub mod dropzone;
pub mod menu;
pub mod preview;
pub mod settings;
pub mod status;
pub mod viewport;

use eframe::egui;
use vectorizer_core::Theme;

/// Visuals for a theme.
pub fn visuals_for(theme: Theme) -> egui::Visuals {
    match theme {
        Theme::Dark => egui::Visuals::dark(),
        Theme::Light => egui::Visuals::light(),
    }
}

// Theme-aware colors for the UI
pub mod colors {
    use eframe::egui::{Color32, Visuals};

    /// Accent for primary buttons and highlights (same for both themes)
    pub const ACCENT: Color32 = Color32::from_rgb(59, 130, 246); // Blue

    /// Success green
    pub const SUCCESS: Color32 = Color32::from_rgb(34, 197, 94);

    /// Error red
    pub const ERROR: Color32 = Color32::from_rgb(239, 68, 68);

    /// Get muted text color based on theme
    pub fn muted(visuals: &Visuals) -> Color32 {
        if visuals.dark_mode {
            Color32::from_rgb(156, 163, 175)
        } else {
            Color32::from_rgb(100, 100, 110)
        }
    }

    /// Background behind the preview image
    pub fn canvas_bg(visuals: &Visuals) -> Color32 {
        if visuals.dark_mode {
            Color32::from_rgb(30, 30, 35)
        } else {
            Color32::from_rgb(245, 245, 250)
        }
    }

    /// Drop zone fill, brighter while files hover over the window
    pub fn dropzone_bg(visuals: &Visuals, hovering: bool) -> Color32 {
        match (visuals.dark_mode, hovering) {
            (true, false) => Color32::from_rgb(40, 40, 45),
            (true, true) => Color32::from_rgb(35, 50, 75),
            (false, false) => Color32::from_rgb(240, 240, 245),
            (false, true) => Color32::from_rgb(225, 235, 252),
        }
    }

    /// Get border color based on theme
    pub fn border(visuals: &Visuals) -> Color32 {
        if visuals.dark_mode {
            Color32::from_rgb(70, 70, 75)
        } else {
            Color32::from_rgb(200, 200, 210)
        }
    }
}
