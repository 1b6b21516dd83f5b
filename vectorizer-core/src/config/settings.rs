//! Application settings.
//!
//! Settings are persisted to the SQLite database as JSON.

use serde::{Deserialize, Serialize};

// =============================================================================
// Theme Selection
// =============================================================================

/// App theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    /// Get all available themes.
    pub fn all() -> &'static [Theme] {
        &[Self::Dark, Self::Light]
    }

    /// The other theme.
    pub fn toggled(&self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dark => write!(f, "Dark"),
            Self::Light => write!(f, "Light"),
        }
    }
}

// =============================================================================
// Render Mode
// =============================================================================

/// How the window is rendered. Read once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RenderMode {
    /// Prefer GPU acceleration.
    #[default]
    Auto,
    /// CPU rendering for machines without a usable GPU.
    Software,
}

// =============================================================================
// Tracer
// =============================================================================

/// Default tracer executable, looked up on `PATH`.
pub const DEFAULT_TRACER_COMMAND: &str = "imagetracer";

const DEFAULT_TRACER_TIMEOUT_SECS: u64 = 120;
const MAX_TRACER_TIMEOUT_SECS: u64 = 3600;

/// How to launch the external tracer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TracerSettings {
    /// Executable name or path.
    pub command: String,
    /// Extra arguments passed before the request is piped in.
    #[serde(default)]
    pub args: Vec<String>,
    /// Give up on a conversion after this many seconds.
    pub timeout_secs: u64,
}

impl Default for TracerSettings {
    fn default() -> Self {
        Self {
            command: DEFAULT_TRACER_COMMAND.to_string(),
            args: Vec::new(),
            timeout_secs: DEFAULT_TRACER_TIMEOUT_SECS,
        }
    }
}

// =============================================================================
// Application Settings
// =============================================================================

/// Application settings - persisted to database as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Settings {
    /// UI theme.
    #[serde(default)]
    pub theme: Theme,

    /// Rendering backend preference (requires restart).
    #[serde(default)]
    pub render_mode: RenderMode,

    /// External tracer launch settings.
    #[serde(default)]
    pub tracer: TracerSettings,
}

impl Settings {
    /// Load settings from database, using defaults for missing values.
    ///
    /// If settings don't exist or can't be parsed, returns defaults.
    pub fn load(db: &crate::db::Database) -> Self {
        let mut settings = Self::default();

        if let Ok(Some(json)) = db.get_setting("settings") {
            match serde_json::from_str::<Settings>(&json) {
                Ok(loaded) => settings = loaded,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to parse settings, using defaults");
                }
            }
        }

        settings.validate();
        settings
    }

    /// Save settings to database.
    pub fn save(&self, db: &crate::db::Database) -> anyhow::Result<()> {
        let json = serde_json::to_string(self)?;
        db.set_setting("settings", &json)?;
        Ok(())
    }

    /// Validate and clamp settings to valid ranges.
    pub fn validate(&mut self) {
        self.tracer.timeout_secs = self.tracer.timeout_secs.clamp(1, MAX_TRACER_TIMEOUT_SECS);

        let command = self.tracer.command.trim();
        if command.is_empty() {
            self.tracer.command = DEFAULT_TRACER_COMMAND.to_string();
        } else if command.len() != self.tracer.command.len() {
            self.tracer.command = command.to_string();
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
