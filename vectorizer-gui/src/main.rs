//! Image Vectorizer GUI Application
//!
//! Turns raster images into SVG through an external tracer, with a live
//! preview and tunable tracing options.

mod app;
mod ui;

use eframe::egui;
use tracing_subscriber::EnvFilter;
use vectorizer_core::{Database, RenderMode, Settings};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("vectorizer=debug".parse()?)
                .add_directive("vectorizer_core=debug".parse()?)
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("Starting Image Vectorizer v{}", vectorizer_core::VERSION);

    // Hardware acceleration is fixed at window creation, so the render
    // mode has to be read before eframe starts.
    let render_mode = load_render_mode();
    let hardware_acceleration = match render_mode {
        RenderMode::Auto => eframe::HardwareAcceleration::Preferred,
        RenderMode::Software => eframe::HardwareAcceleration::Off,
    };
    tracing::info!(?render_mode, "Render mode configured");

    // Tokio runtime for conversions and dialogs
    let runtime = tokio::runtime::Runtime::new()?;

    // Window configuration
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([800.0, 600.0])
            .with_drag_and_drop(true)
            .with_title("Image Vectorizer"),
        hardware_acceleration,
        renderer: eframe::Renderer::Glow,
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Image Vectorizer",
        options,
        Box::new(|cc| Ok(Box::new(app::VectorizerApp::new(cc, runtime)?))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run window: {e}"))
}

/// Load only the render mode from persisted settings.
///
/// Opens a temporary DB connection just to read the setting, then drops it.
fn load_render_mode() -> RenderMode {
    match Database::open() {
        Ok(db) => {
            if let Err(e) = db.migrate() {
                tracing::warn!("Failed to migrate DB for render mode: {e}");
            }
            Settings::load(&db).render_mode
        }
        Err(e) => {
            tracing::warn!("Failed to open DB for render mode: {e}, using Auto");
            RenderMode::Auto
        }
    }
}
