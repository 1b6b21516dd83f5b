//! Image Vectorizer Core Library
//!
//! This crate provides everything behind the Image Vectorizer window
//! except the widgets themselves:
//!
//! - Tracing options and named presets
//! - Control descriptors with range and step enforcement
//! - Image ingestion (files, dropped bytes, data URLs)
//! - The session state machine with sequence-tokened conversions
//! - The boundary to the external tracer and a subprocess backend
//! - Background conversion tasks reporting over a channel
//! - SVG export helpers
//! - Settings persistence in SQLite

pub mod config;
pub mod controls;
pub mod converter;
pub mod db;
pub mod export;
pub mod ingest;
pub mod options;
pub mod presets;
pub mod session;
pub mod tracer;

// Re-exports for convenience
pub use config::{RenderMode, Settings, Theme, TracerSettings, DEFAULT_TRACER_COMMAND};
pub use db::Database;

pub use controls::{
    all_controls, controls_in, ControlGroup, ControlId, ControlKind, ControlSpec, ControlValue,
};
pub use converter::{event_channel, run_conversion, ConversionEvent, EventReceiver, EventSender};
pub use export::{write_svg, ExportError, DEFAULT_FILENAME};
pub use ingest::{IngestError, SourceImage};
pub use options::{ColorSampling, TraceOptions};
pub use presets::{Preset, PresetSelection};
pub use session::{Completion, ConversionTicket, Session, CONVERSION_FAILED_MESSAGE};
pub use tracer::{ProcessTracer, TraceError, Tracer};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
