//! Configuration module.
//!
//! Manages application settings stored in SQLite.

mod settings;

pub use settings::{RenderMode, Settings, Theme, TracerSettings, DEFAULT_TRACER_COMMAND};
