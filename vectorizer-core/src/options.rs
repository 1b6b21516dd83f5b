//! Tracing options handed to the external tracer.
//!
//! Field names match the tracer's option keys exactly, so the struct
//! serializes straight into the request payload.

use serde::{Deserialize, Serialize};

// =============================================================================
// Color Sampling
// =============================================================================

/// Palette sampling mode used during color quantization.
///
/// Serialized as the tracer's integer code (0, 1, 2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(into = "u8", try_from = "u8")]
pub enum ColorSampling {
    /// Generate the palette without sampling.
    Off,
    /// Sample palette colors at random.
    Random,
    /// Sample palette colors on a fixed grid.
    #[default]
    Deterministic,
}

impl ColorSampling {
    /// All modes, in code order.
    pub fn all() -> &'static [ColorSampling] {
        &[Self::Off, Self::Random, Self::Deterministic]
    }

    /// Short label for UI buttons.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Off => "Off",
            Self::Random => "Random",
            Self::Deterministic => "Deterministic",
        }
    }
}

impl From<ColorSampling> for u8 {
    fn from(mode: ColorSampling) -> Self {
        match mode {
            ColorSampling::Off => 0,
            ColorSampling::Random => 1,
            ColorSampling::Deterministic => 2,
        }
    }
}

impl TryFrom<u8> for ColorSampling {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Off),
            1 => Ok(Self::Random),
            2 => Ok(Self::Deterministic),
            other => Err(format!("Unknown color sampling mode: {}", other)),
        }
    }
}

impl std::fmt::Display for ColorSampling {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

// =============================================================================
// Trace Options
// =============================================================================

/// Complete option set for one tracer invocation.
///
/// Every field is always serialized; the tracer rejects partial payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceOptions {
    // Tracing
    /// Error threshold for straight lines.
    pub ltres: f32,
    /// Error threshold for quadratic splines.
    pub qtres: f32,
    /// Paths with fewer edge nodes than this are dropped.
    pub pathomit: u32,
    pub rightangleenhance: bool,
    pub corsenabled: bool,

    // Color quantization
    pub colorsampling: ColorSampling,
    pub numberofcolors: u32,
    pub mincolorratio: f32,
    pub colorquantcycles: u32,

    // SVG rendering
    pub strokewidth: f32,
    pub linefilter: bool,
    pub scale: f32,
    /// Decimal places kept in path coordinates.
    pub roundcoords: u32,
    pub viewbox: bool,
    pub desc: bool,
    pub lcpr: f32,
    pub qcpr: f32,

    // Blur
    pub blurradius: f32,
    pub blurdelta: f32,
}

impl Default for TraceOptions {
    fn default() -> Self {
        Self {
            ltres: 1.0,
            qtres: 1.0,
            pathomit: 8,
            rightangleenhance: true,
            corsenabled: true,

            colorsampling: ColorSampling::Deterministic,
            numberofcolors: 16,
            mincolorratio: 0.0,
            colorquantcycles: 3,

            strokewidth: 1.0,
            linefilter: false,
            scale: 1.0,
            roundcoords: 1,
            viewbox: true,
            desc: false,
            lcpr: 0.0,
            qcpr: 0.0,

            blurradius: 0.0,
            blurdelta: 20.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_sampling_default_is_deterministic() {
        assert_eq!(ColorSampling::default(), ColorSampling::Deterministic);
    }

    #[test]
    fn test_color_sampling_serializes_as_code() {
        assert_eq!(serde_json::to_string(&ColorSampling::Off).unwrap(), "0");
        assert_eq!(serde_json::to_string(&ColorSampling::Random).unwrap(), "1");
        assert_eq!(
            serde_json::to_string(&ColorSampling::Deterministic).unwrap(),
            "2"
        );
    }

    #[test]
    fn test_color_sampling_rejects_unknown_code() {
        assert!(serde_json::from_str::<ColorSampling>("3").is_err());
        assert_eq!(
            serde_json::from_str::<ColorSampling>("1").unwrap(),
            ColorSampling::Random
        );
    }

    #[test]
    fn test_payload_uses_tracer_keys() {
        let value = serde_json::to_value(TraceOptions::default()).unwrap();
        let object = value.as_object().unwrap();

        for key in [
            "ltres",
            "qtres",
            "pathomit",
            "rightangleenhance",
            "corsenabled",
            "colorsampling",
            "numberofcolors",
            "mincolorratio",
            "colorquantcycles",
            "strokewidth",
            "linefilter",
            "scale",
            "roundcoords",
            "viewbox",
            "desc",
            "lcpr",
            "qcpr",
            "blurradius",
            "blurdelta",
        ] {
            assert!(object.contains_key(key), "missing option key {key}");
        }
        assert_eq!(object.len(), 19);
        assert_eq!(object["colorsampling"], 2);
        assert_eq!(object["numberofcolors"], 16);
    }

    #[test]
    fn test_missing_field_fails_to_parse() {
        let mut value = serde_json::to_value(TraceOptions::default()).unwrap();
        value.as_object_mut().unwrap().remove("pathomit");
        assert!(serde_json::from_value::<TraceOptions>(value).is_err());
    }
}
