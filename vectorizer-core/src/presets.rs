//! Named option presets.

use serde::{Deserialize, Serialize};

use crate::options::{ColorSampling, TraceOptions};

/// A named, immutable snapshot of a full option set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum Preset {
    #[default]
    Default,
    BlackAndWhite,
    Illustration,
    Detailed,
}

impl Preset {
    /// All presets in menu order.
    pub fn all() -> &'static [Preset] {
        &[
            Self::Default,
            Self::BlackAndWhite,
            Self::Illustration,
            Self::Detailed,
        ]
    }

    /// Identifier as used in saved data.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::BlackAndWhite => "blackAndWhite",
            Self::Illustration => "illustration",
            Self::Detailed => "detailed",
        }
    }

    /// Human-readable name: the key split on camel case, first letter capitalised.
    pub fn display_name(&self) -> String {
        let key = self.key();
        let mut name = String::with_capacity(key.len() + 4);
        for (idx, c) in key.chars().enumerate() {
            if idx == 0 {
                name.extend(c.to_uppercase());
            } else if c.is_ascii_uppercase() {
                name.push(' ');
                name.push(c);
            } else {
                name.push(c);
            }
        }
        name
    }

    /// The complete option snapshot for this preset.
    pub fn options(&self) -> TraceOptions {
        let base = TraceOptions::default();
        match self {
            Self::Default => base,
            Self::BlackAndWhite => TraceOptions {
                numberofcolors: 2,
                colorsampling: ColorSampling::Off,
                blurradius: 0.0,
                ..base
            },
            Self::Illustration => TraceOptions {
                numberofcolors: 16,
                blurradius: 0.5,
                pathomit: 10,
                ..base
            },
            Self::Detailed => TraceOptions {
                numberofcolors: 64,
                blurradius: 0.0,
                pathomit: 4,
                ltres: 0.5,
                qtres: 0.5,
                roundcoords: 2,
                ..base
            },
        }
    }
}

impl std::fmt::Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Which preset the current options came from.
///
/// `Custom` marks options the user has edited away from any named preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PresetSelection {
    Named(Preset),
    Custom,
}

impl PresetSelection {
    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Custom)
    }

    pub fn display_name(&self) -> String {
        match self {
            Self::Named(preset) => preset.display_name(),
            Self::Custom => "Custom".to_string(),
        }
    }
}

impl Default for PresetSelection {
    fn default() -> Self {
        Self::Named(Preset::Default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_preset_matches_default_options() {
        assert_eq!(Preset::Default.options(), TraceOptions::default());
    }

    #[test]
    fn test_black_and_white_overrides() {
        let opts = Preset::BlackAndWhite.options();
        assert_eq!(opts.numberofcolors, 2);
        assert_eq!(opts.colorsampling, ColorSampling::Off);
        assert_eq!(opts.blurradius, 0.0);
        // Untouched fields stay at their defaults
        assert_eq!(opts.pathomit, 8);
        assert_eq!(opts.blurdelta, 20.0);
    }

    #[test]
    fn test_detailed_overrides() {
        let opts = Preset::Detailed.options();
        assert_eq!(opts.numberofcolors, 64);
        assert_eq!(opts.pathomit, 4);
        assert_eq!(opts.ltres, 0.5);
        assert_eq!(opts.qtres, 0.5);
        assert_eq!(opts.roundcoords, 2);
        assert_eq!(opts.colorsampling, ColorSampling::Deterministic);
    }

    #[test]
    fn test_illustration_overrides() {
        let opts = Preset::Illustration.options();
        assert_eq!(opts.blurradius, 0.5);
        assert_eq!(opts.pathomit, 10);
        assert_eq!(opts.numberofcolors, 16);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(Preset::Default.display_name(), "Default");
        assert_eq!(Preset::BlackAndWhite.display_name(), "Black And White");
        assert_eq!(Preset::Detailed.to_string(), "Detailed");
        assert_eq!(PresetSelection::Custom.display_name(), "Custom");
    }

    #[test]
    fn test_preset_serialization_uses_keys() {
        let json = serde_json::to_string(&Preset::BlackAndWhite).unwrap();
        assert_eq!(json, "\"blackAndWhite\"");
        let parsed: Preset = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, Preset::BlackAndWhite);
    }

    #[test]
    fn test_selection_default_is_named_default() {
        assert_eq!(
            PresetSelection::default(),
            PresetSelection::Named(Preset::Default)
        );
        assert!(!PresetSelection::default().is_custom());
    }
}
