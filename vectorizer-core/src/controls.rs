//! Editable controls over [`TraceOptions`].
//!
//! Each control owns one option field, its UI group, and its value range.
//! Writes always go through [`ControlId::apply`] so the range and step are
//! enforced in one place.

use crate::options::{ColorSampling, TraceOptions};

/// Which tab of the control panel a control lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ControlGroup {
    #[default]
    Basic,
    Advanced,
}

impl ControlGroup {
    pub fn all() -> &'static [ControlGroup] {
        &[Self::Basic, Self::Advanced]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Basic => "Basic",
            Self::Advanced => "Advanced",
        }
    }
}

/// Identifies one editable control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlId {
    /// Inverse of `pathomit`: higher means more, smaller paths survive.
    DetailLevel,
    NumberOfColors,
    Blur,
    LineThreshold,
    CurveThreshold,
    StrokeWidth,
    RightAngleEnhance,
    CoordinatePrecision,
    ColorSampling,
}

/// The shape of a control's value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlKind {
    Slider { min: f32, max: f32, step: f32 },
    Toggle,
    Sampling,
}

/// A value read from or written to a control.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlValue {
    Number(f32),
    Flag(bool),
    Sampling(ColorSampling),
}

/// Static description of a control.
#[derive(Debug, Clone, Copy)]
pub struct ControlSpec {
    pub id: ControlId,
    pub label: &'static str,
    pub tooltip: &'static str,
    pub group: ControlGroup,
    pub kind: ControlKind,
}

/// Offset used to map the detail level onto `pathomit`.
const DETAIL_INVERSION: i64 = 51;

const CONTROLS: &[ControlSpec] = &[
    ControlSpec {
        id: ControlId::DetailLevel,
        label: "Detail level",
        tooltip: "Higher values mean more detail and more paths.",
        group: ControlGroup::Basic,
        kind: ControlKind::Slider { min: 1.0, max: 50.0, step: 1.0 },
    },
    ControlSpec {
        id: ControlId::NumberOfColors,
        label: "Number of colors",
        tooltip: "Reduces the image to this many colors.",
        group: ControlGroup::Basic,
        kind: ControlKind::Slider { min: 2.0, max: 64.0, step: 1.0 },
    },
    ControlSpec {
        id: ControlId::Blur,
        label: "Blur",
        tooltip: "Applies a blur before vectorizing to smooth edges.",
        group: ControlGroup::Basic,
        kind: ControlKind::Slider { min: 0.0, max: 5.0, step: 0.1 },
    },
    ControlSpec {
        id: ControlId::LineThreshold,
        label: "Line threshold",
        tooltip: "Error threshold for straight lines.",
        group: ControlGroup::Advanced,
        kind: ControlKind::Slider { min: 0.1, max: 5.0, step: 0.1 },
    },
    ControlSpec {
        id: ControlId::CurveThreshold,
        label: "Curve threshold",
        tooltip: "Error threshold for quadratic splines.",
        group: ControlGroup::Advanced,
        kind: ControlKind::Slider { min: 0.1, max: 5.0, step: 0.1 },
    },
    ControlSpec {
        id: ControlId::StrokeWidth,
        label: "Stroke width",
        tooltip: "Width of the path strokes.",
        group: ControlGroup::Advanced,
        kind: ControlKind::Slider { min: 0.0, max: 5.0, step: 0.1 },
    },
    ControlSpec {
        id: ControlId::RightAngleEnhance,
        label: "Enhance right angles",
        tooltip: "Enhances right angles in the tracing.",
        group: ControlGroup::Advanced,
        kind: ControlKind::Toggle,
    },
    ControlSpec {
        id: ControlId::CoordinatePrecision,
        label: "Coordinate precision",
        tooltip: "Number of decimal places for coordinates. Fewer decimals means smaller file size.",
        group: ControlGroup::Advanced,
        kind: ControlKind::Slider { min: 0.0, max: 8.0, step: 1.0 },
    },
    ControlSpec {
        id: ControlId::ColorSampling,
        label: "Color sampling",
        tooltip: "How the initial palette is sampled from the image.",
        group: ControlGroup::Advanced,
        kind: ControlKind::Sampling,
    },
];

/// All controls, in panel order.
pub fn all_controls() -> &'static [ControlSpec] {
    CONTROLS
}

/// Controls belonging to one panel tab.
pub fn controls_in(group: ControlGroup) -> impl Iterator<Item = &'static ControlSpec> {
    CONTROLS.iter().filter(move |spec| spec.group == group)
}

/// Clamp `value` into `[min, max]` and snap it onto the step grid anchored at `min`.
pub fn clamp_to_step(value: f32, min: f32, max: f32, step: f32) -> f32 {
    if !value.is_finite() {
        return min;
    }
    let clamped = value.clamp(min, max);
    if step <= 0.0 {
        return clamped;
    }
    let steps = ((clamped - min) / step).round();
    let snapped = (min + steps * step).clamp(min, max);
    // Strip float noise such as 0.30000001 for decimal steps
    let decimals = step_decimals(step);
    let factor = 10f32.powi(decimals);
    (snapped * factor).round() / factor
}

fn step_decimals(step: f32) -> i32 {
    let mut decimals = 0;
    let mut scaled = step;
    while decimals < 6 && (scaled - scaled.round()).abs() > 1e-4 {
        scaled *= 10.0;
        decimals += 1;
    }
    decimals
}

impl ControlId {
    /// Static description for this control.
    pub fn spec(&self) -> &'static ControlSpec {
        CONTROLS
            .iter()
            .find(|spec| spec.id == *self)
            .unwrap_or(&CONTROLS[0])
    }

    /// Current value of this control as shown in the panel.
    pub fn read(&self, options: &TraceOptions) -> ControlValue {
        match self {
            Self::DetailLevel => {
                let level = (DETAIL_INVERSION - options.pathomit as i64).clamp(1, 50);
                ControlValue::Number(level as f32)
            }
            Self::NumberOfColors => ControlValue::Number(options.numberofcolors as f32),
            Self::Blur => ControlValue::Number(options.blurradius),
            Self::LineThreshold => ControlValue::Number(options.ltres),
            Self::CurveThreshold => ControlValue::Number(options.qtres),
            Self::StrokeWidth => ControlValue::Number(options.strokewidth),
            Self::RightAngleEnhance => ControlValue::Flag(options.rightangleenhance),
            Self::CoordinatePrecision => ControlValue::Number(options.roundcoords as f32),
            Self::ColorSampling => ControlValue::Sampling(options.colorsampling),
        }
    }

    /// Write `value` into the one field this control owns.
    ///
    /// Numbers are clamped and snapped to the control's range first.
    /// Returns `false` when the value kind does not fit the control.
    pub fn apply(&self, options: &mut TraceOptions, value: ControlValue) -> bool {
        match (self, value) {
            (Self::RightAngleEnhance, ControlValue::Flag(flag)) => {
                options.rightangleenhance = flag;
                true
            }
            (Self::ColorSampling, ControlValue::Sampling(mode)) => {
                options.colorsampling = mode;
                true
            }
            (_, ControlValue::Number(raw)) => {
                let ControlKind::Slider { min, max, step } = self.spec().kind else {
                    return false;
                };
                let v = clamp_to_step(raw, min, max, step);
                match self {
                    Self::DetailLevel => {
                        options.pathomit = (DETAIL_INVERSION - v.round() as i64) as u32;
                    }
                    Self::NumberOfColors => options.numberofcolors = v.round() as u32,
                    Self::Blur => options.blurradius = v,
                    Self::LineThreshold => options.ltres = v,
                    Self::CurveThreshold => options.qtres = v,
                    Self::StrokeWidth => options.strokewidth = v,
                    Self::CoordinatePrecision => options.roundcoords = v.round() as u32,
                    Self::RightAngleEnhance | Self::ColorSampling => return false,
                }
                true
            }
            _ => false,
        }
    }
}
