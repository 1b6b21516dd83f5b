//! Main application state and update loop.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use eframe::egui;
use tokio::runtime::Runtime;
use tokio::sync::oneshot::{self, error::TryRecvError};
use tracing::{debug, error, info, warn};

use vectorizer_core::ingest::image_extensions;
use vectorizer_core::{
    event_channel, run_conversion, write_svg, Completion, ControlGroup, ControlId, ControlValue,
    ConversionEvent, ConversionTicket, Database, EventReceiver, EventSender, IngestError, Preset,
    ProcessTracer, Session, Settings, SourceImage, Tracer, TracerSettings, DEFAULT_FILENAME,
};

use crate::ui;
use crate::ui::dropzone::{self, PasteRequest, PasteTracker};
use crate::ui::preview::{PreviewState, ViewMode};
use crate::ui::settings::SettingsTab;

/// Shown when something other than an image is dropped, pasted or opened.
const NOT_AN_IMAGE_MESSAGE: &str = "Only image files are supported";

/// How long the copy button reads "Copied!".
const COPIED_FEEDBACK_MS: i64 = 2000;

/// Width of the control panel.
const CONTROL_PANEL_WIDTH: f32 = 300.0;

/// A save dialog in flight, with the markup captured when it was opened.
struct PendingSave {
    svg: String,
    rx: oneshot::Receiver<Option<PathBuf>>,
}

// =============================================================================
// Application State
// =============================================================================

/// Main application state.
pub struct VectorizerApp {
    /// Tokio runtime for conversions and dialogs.
    pub runtime: Runtime,

    /// Database connection.
    pub db: Database,

    /// User settings.
    pub settings: Settings,

    // -------------------------------------------------------------------------
    // Conversion
    // -------------------------------------------------------------------------
    /// Image, options and result.
    pub session: Session,

    /// Backend that turns images into SVG.
    tracer: Arc<dyn Tracer>,

    /// Settings the current tracer was built from.
    active_tracer: TracerSettings,

    /// Sender cloned into every conversion task.
    event_tx: EventSender,

    /// Conversion events, drained every frame.
    event_rx: EventReceiver,

    /// Handle to the latest conversion task.
    conversion_handle: Option<tokio::task::JoinHandle<()>>,

    // -------------------------------------------------------------------------
    // UI State
    // -------------------------------------------------------------------------
    /// Preview mode, viewport and registered image bytes.
    pub preview: PreviewState,

    /// Visible tab of the control panel.
    pub control_tab: ControlGroup,

    /// Show settings dialog.
    pub show_settings: bool,

    /// Visible tab of the settings dialog.
    pub settings_tab: SettingsTab,

    /// Tracer arguments as typed in the settings dialog.
    pub tracer_args_draft: String,

    /// Status message.
    pub status_message: Option<(String, chrono::DateTime<chrono::Utc>)>,

    /// When the SVG was last copied.
    copied_at: Option<chrono::DateTime<chrono::Utc>>,

    /// Pending open dialog result receiver.
    open_result_rx: Option<oneshot::Receiver<Option<PathBuf>>>,

    /// Pending save dialog.
    pending_save: Option<PendingSave>,

    /// Paste shortcut state across frames
    paste_tracker: PasteTracker,
}

impl VectorizerApp {
    /// Create a new application instance.
    pub fn new(cc: &eframe::CreationContext<'_>, runtime: Runtime) -> anyhow::Result<Self> {
        info!("Initializing VectorizerApp");

        // Open database
        let db = match Database::open() {
            Ok(db) => {
                if let Err(e) = db.migrate() {
                    error!("Failed to migrate database: {}", e);
                }
                db
            }
            Err(e) => {
                error!("Failed to open database: {}", e);
                // Settings will not survive a restart
                let db = Database::open_at(PathBuf::from(":memory:"))?;
                db.migrate()?;
                db
            }
        };

        // Load settings
        let settings = Settings::load(&db);
        debug!(?settings, "Loaded settings");

        let tracer: Arc<dyn Tracer> = Arc::new(ProcessTracer::from_settings(&settings.tracer));
        info!(tracer = tracer.name(), "Tracer configured");

        // Image loaders for the preview, including SVG
        egui_extras::install_image_loaders(&cc.egui_ctx);

        // Apply theme
        cc.egui_ctx.set_visuals(ui::visuals_for(settings.theme));

        let mut style = (*cc.egui_ctx.style()).clone();
        style.spacing.item_spacing = egui::vec2(8.0, 6.0);
        cc.egui_ctx.set_style(style);

        let (event_tx, event_rx) = event_channel();

        Ok(Self {
            runtime,
            db,
            active_tracer: settings.tracer.clone(),
            settings,
            session: Session::new(),
            tracer,
            event_tx,
            event_rx,
            conversion_handle: None,
            preview: PreviewState::default(),
            control_tab: ControlGroup::default(),
            show_settings: false,
            settings_tab: SettingsTab::default(),
            tracer_args_draft: String::new(),
            status_message: None,
            copied_at: None,
            open_result_rx: None,
            pending_save: None,
            paste_tracker: PasteTracker::default(),
        })
    }

    // -------------------------------------------------------------------------
    // Conversion
    // -------------------------------------------------------------------------

    /// Spawn a conversion for `ticket`, aborting the one it supersedes.
    fn start_conversion(&mut self, ticket: Option<ConversionTicket>) {
        let Some(ticket) = ticket else {
            return;
        };

        if let Some(handle) = self.conversion_handle.take() {
            handle.abort();
        }

        debug!(seq = ticket.seq, "Spawning conversion");
        let handle = self.runtime.spawn(run_conversion(
            self.tracer.clone(),
            ticket,
            self.event_tx.clone(),
        ));
        self.conversion_handle = Some(handle);
    }

    /// Process events from conversion tasks.
    pub fn process_events(&mut self, ctx: &egui::Context) {
        while let Ok(event) = self.event_rx.try_recv() {
            match event {
                ConversionEvent::Started { seq } => {
                    debug!(seq, "Conversion started");
                }

                ConversionEvent::Finished { seq, result } => {
                    let succeeded = result.is_ok();
                    match self.session.complete(seq, result) {
                        Completion::Applied => {
                            self.conversion_handle = None;
                            if !succeeded {
                                self.set_status("Vectorization failed");
                            }
                            ctx.request_repaint();
                        }
                        Completion::Stale => {
                            debug!(seq, "Ignoring stale conversion result");
                        }
                    }
                }
            }
        }
    }

    /// Replace the session image and start converting it.
    pub fn load_image(&mut self, image: SourceImage) {
        info!(name = %image.name, mime = %image.mime, size = image.len(), "Image loaded");
        self.set_status(&format!("Loaded {}", image.name));
        self.preview.mode = ViewMode::Vector;
        let ticket = self.session.load_image(image);
        self.start_conversion(ticket);
    }

    /// Edit one option and reconvert.
    pub fn edit_option(&mut self, control: ControlId, value: ControlValue) {
        let ticket = self.session.edit(control, value);
        self.start_conversion(ticket);
    }

    /// Switch to a preset and reconvert.
    pub fn apply_preset(&mut self, preset: Preset) {
        info!(preset = preset.key(), "Applying preset");
        let ticket = self.session.apply_preset(preset);
        self.start_conversion(ticket);
    }

    /// Drop the image and start over with default options.
    pub fn reset(&mut self) {
        info!("Resetting session");
        if let Some(handle) = self.conversion_handle.take() {
            handle.abort();
        }
        self.session.reset();
        self.preview.mode = ViewMode::default();
        self.copied_at = None;
    }

    // -------------------------------------------------------------------------
    // Ingestion
    // -------------------------------------------------------------------------

    fn handle_ingest(&mut self, result: Result<SourceImage, IngestError>) {
        match result {
            Ok(image) => self.load_image(image),
            Err(IngestError::NotAnImage(what)) => {
                warn!(input = %what, "Rejected non-image input");
                self.set_status(NOT_AN_IMAGE_MESSAGE);
            }
            Err(e) => {
                warn!(error = %e, "Failed to load image");
                self.set_status(&format!("Failed to load image: {}", e));
            }
        }
    }

    /// Handle files dropped onto the window.
    pub fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped_files: Vec<_> = ctx.input(|i| i.raw.dropped_files.clone());

        // One image at a time; the first file wins
        let Some(file) = dropped_files.first() else {
            return;
        };
        if dropped_files.len() > 1 {
            debug!(count = dropped_files.len(), "Multiple files dropped, using the first");
        }
        self.handle_ingest(dropzone::image_from_dropped(file));
    }

    /// Handle a paste while no text field has focus.
    pub fn handle_paste(&mut self, ctx: &egui::Context) {
        if ctx.memory(|m| m.focused().is_some()) {
            self.paste_tracker.reset();
            return;
        }

        let request = ctx.input(|i| self.paste_tracker.take(&i.events));
        match request {
            // A path or data URL in the clipboard, otherwise raw pixels
            Some(PasteRequest::Text(text)) => match dropzone::image_from_text(&text) {
                Some(result) => self.handle_ingest(result),
                None => self.paste_from_clipboard(),
            },
            Some(PasteRequest::Pixels) => self.paste_from_clipboard(),
            None => {}
        }
    }

    pub fn paste_from_clipboard(&mut self) {
        match dropzone::image_from_clipboard() {
            Ok(Some(image)) => self.load_image(image),
            Ok(None) => {
                warn!("Paste did not contain an image");
                self.set_status(NOT_AN_IMAGE_MESSAGE);
            }
            Err(e) => {
                warn!(error = %e, "Failed to read clipboard");
                self.set_status("Failed to read clipboard");
            }
        }
    }

    /// Open an image selection dialog asynchronously.
    pub fn open_image_dialog(&mut self) {
        // Don't open another dialog if one is pending
        if self.open_result_rx.is_some() {
            return;
        }

        let (tx, rx) = oneshot::channel();
        self.open_result_rx = Some(rx);

        let extensions: Vec<&'static str> = image_extensions().collect();
        self.runtime.spawn(async move {
            let file = rfd::AsyncFileDialog::new()
                .add_filter("Images", extensions.as_slice())
                .pick_file()
                .await
                .map(|f| f.path().to_path_buf());
            let _ = tx.send(file);
        });
    }

    /// Check for image selection completion.
    fn check_open_dialog(&mut self) {
        if let Some(mut rx) = self.open_result_rx.take() {
            match rx.try_recv() {
                Ok(Some(path)) => {
                    debug!(path = %path.display(), "Image selected");
                    self.handle_ingest(SourceImage::from_path(&path));
                }
                Ok(None) => {
                    // User cancelled the dialog
                    debug!("Image selection cancelled");
                }
                Err(TryRecvError::Empty) => {
                    // Still waiting
                    self.open_result_rx = Some(rx);
                }
                Err(TryRecvError::Closed) => {
                    warn!("Image selection channel closed unexpectedly");
                }
            }
        }
    }

    // -------------------------------------------------------------------------
    // Export
    // -------------------------------------------------------------------------

    /// Put the SVG markup on the clipboard.
    pub fn copy_svg(&mut self, ctx: &egui::Context) {
        let Some(svg) = self.session.result() else {
            return;
        };
        let svg = svg.to_string();
        info!(bytes = svg.len(), "Copying SVG to clipboard");
        ctx.output_mut(|o| o.copied_text = svg);
        self.copied_at = Some(chrono::Utc::now());
        self.set_status("SVG copied to clipboard");
    }

    /// Whether the copy confirmation should still be shown.
    pub fn copied_recently(&self) -> bool {
        self.copied_at.is_some_and(|at| {
            chrono::Utc::now() - at < chrono::Duration::milliseconds(COPIED_FEEDBACK_MS)
        })
    }

    /// Ask where to save the SVG, asynchronously.
    pub fn save_svg_dialog(&mut self) {
        if self.pending_save.is_some() {
            return;
        }
        let Some(svg) = self.session.result() else {
            return;
        };

        let (tx, rx) = oneshot::channel();
        self.pending_save = Some(PendingSave {
            svg: svg.to_string(),
            rx,
        });

        self.runtime.spawn(async move {
            let file = rfd::AsyncFileDialog::new()
                .set_file_name(DEFAULT_FILENAME)
                .add_filter("SVG image", &["svg"])
                .save_file()
                .await
                .map(|f| f.path().to_path_buf());
            let _ = tx.send(file);
        });
    }

    /// Check for save dialog completion and write the file.
    fn check_save_dialog(&mut self) {
        if let Some(mut pending) = self.pending_save.take() {
            match pending.rx.try_recv() {
                Ok(Some(path)) => match write_svg(&path, Some(&pending.svg)) {
                    Ok(written) => {
                        self.set_status(&format!("Saved {}", written.display()));
                    }
                    Err(e) => {
                        error!(error = %e, "Failed to save SVG");
                        self.set_status(&format!("Failed to save: {}", e));
                    }
                },
                Ok(None) => {
                    debug!("Save cancelled");
                }
                Err(TryRecvError::Empty) => {
                    self.pending_save = Some(pending);
                }
                Err(TryRecvError::Closed) => {
                    warn!("Save dialog channel closed unexpectedly");
                }
            }
        }
    }

    // -------------------------------------------------------------------------
    // Settings
    // -------------------------------------------------------------------------

    /// Show the settings dialog with the current values.
    pub fn open_settings(&mut self) {
        self.tracer_args_draft = self.settings.tracer.args.join(" ");
        self.show_settings = true;
    }

    /// Apply the settings dialog: persist, and rebuild the tracer if its
    /// launch settings changed.
    pub fn commit_settings(&mut self) {
        self.settings.tracer.args = self
            .tracer_args_draft
            .split_whitespace()
            .map(str::to_string)
            .collect();
        self.settings.validate();
        self.save_settings();

        if self.settings.tracer != self.active_tracer {
            info!(command = %self.settings.tracer.command, "Tracer settings changed");
            self.active_tracer = self.settings.tracer.clone();
            self.tracer = Arc::new(ProcessTracer::from_settings(&self.active_tracer));

            // Redo the current image with the new backend
            let ticket = self.session.begin_conversion();
            self.start_conversion(ticket);
        }
    }

    /// Save settings to the database.
    pub fn save_settings(&mut self) {
        if let Err(e) = self.settings.save(&self.db) {
            error!("Failed to save settings: {}", e);
            self.set_status("Failed to save settings");
        } else {
            self.set_status("Settings saved");
        }
    }

    // -------------------------------------------------------------------------
    // Status
    // -------------------------------------------------------------------------

    /// Set a status message.
    pub fn set_status(&mut self, msg: &str) {
        self.status_message = Some((msg.to_string(), chrono::Utc::now()));
    }

    /// Clear old status messages and the copy confirmation.
    pub fn clear_old_status(&mut self) {
        if let Some((_, time)) = &self.status_message {
            if chrono::Utc::now() - *time > chrono::Duration::seconds(5) {
                self.status_message = None;
            }
        }
        if !self.copied_recently() {
            self.copied_at = None;
        }
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        let (open, save) = ctx.input_mut(|i| {
            (
                i.consume_key(egui::Modifiers::COMMAND, egui::Key::O),
                i.consume_key(egui::Modifiers::COMMAND, egui::Key::S),
            )
        });
        if open {
            self.open_image_dialog();
        }
        if save {
            self.save_svg_dialog();
        }
    }
}

impl eframe::App for VectorizerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for async completions
        self.check_open_dialog();
        self.check_save_dialog();

        // Incoming images
        self.handle_dropped_files(ctx);
        self.handle_paste(ctx);
        self.handle_shortcuts(ctx);

        // Conversion results
        self.process_events(ctx);
        self.preview.sync(ctx, &self.session);
        self.clear_old_status();

        // Top panel with menu
        egui::TopBottomPanel::top("menu_panel").show(ctx, |ui| {
            ui::menu::render(self, ui, ctx);
        });

        // Status bar at bottom
        egui::TopBottomPanel::bottom("status_panel")
            .max_height(24.0)
            .show(ctx, |ui| {
                ui::status::render(self, ui);
            });

        // Controls on the right
        egui::SidePanel::right("controls_panel")
            .resizable(false)
            .exact_width(CONTROL_PANEL_WIDTH)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    ui::controls::render(self, ui);
                });
            });

        // Settings modal if open
        if self.show_settings {
            ui::settings::render(self, ctx);
        }

        // Drop zone or preview (fills remaining space)
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.session.has_image() {
                ui::preview::render(self, ui);
            } else {
                ui::dropzone::render(self, ui);
            }
        });

        // Keep polling while work is in flight
        if self.session.is_loading() || self.open_result_rx.is_some() || self.pending_save.is_some()
        {
            ctx.request_repaint_after(Duration::from_millis(50));
        } else if self.copied_at.is_some() || self.status_message.is_some() {
            ctx.request_repaint_after(Duration::from_millis(500));
        }
    }
}
