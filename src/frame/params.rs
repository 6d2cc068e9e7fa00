//! Frame parameters and the normalizer that repairs raw input.
//!
//! Numeric input is never rejected. Anything missing, non-finite or below the
//! field minimum falls back to the field default, anything above
//! [`MAX_DIMENSION`] is clamped to it, and the lip is shrunk until it fits
//! inside the rail section.

use serde::{Deserialize, Serialize};

use super::style::FrameStyle;

pub const DEFAULT_WIDTH: f64 = 600.0;
pub const DEFAULT_HEIGHT: f64 = 400.0;
pub const DEFAULT_FACE_WIDTH: f64 = 20.0;
pub const DEFAULT_PROFILE_DEPTH: f64 = 14.0;
pub const DEFAULT_LIP_WIDTH: f64 = 4.0;
pub const DEFAULT_LIP_DEPTH: f64 = 4.0;
pub const DEFAULT_CLEARANCE: f64 = 0.4;

const LIP_WIDTH_FALLBACK_RATIO: f64 = 0.45;
const LIP_DEPTH_FALLBACK_RATIO: f64 = 0.35;
const LIP_MIN: f64 = 2.0;

/// Smallest accepted face width or profile depth. The fitted lip of such a
/// section is still well above [`MIN_DIMENSION`].
pub const MIN_SECTION: f64 = 0.1;
/// Smallest accepted opening size or lip dimension.
pub const MIN_DIMENSION: f64 = 0.01;
/// Largest accepted length, 1 km. Keeps every coordinate exact in an `f32`
/// STL record.
pub const MAX_DIMENSION: f64 = 1e6;

/// Dimensions of a frame in millimetres plus its style.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameParameters {
    pub width: f64,
    pub height: f64,
    pub face_width: f64,
    pub profile_depth: f64,
    pub lip_width: f64,
    pub lip_depth: f64,
    pub clearance: f64,
    pub style: FrameStyle,
}

impl Default for FrameParameters {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            face_width: DEFAULT_FACE_WIDTH,
            profile_depth: DEFAULT_PROFILE_DEPTH,
            lip_width: DEFAULT_LIP_WIDTH,
            lip_depth: DEFAULT_LIP_DEPTH,
            clearance: DEFAULT_CLEARANCE,
            style: FrameStyle::default(),
        }
    }
}

impl FrameParameters {
    #[must_use]
    pub fn normalized(self) -> Self {
        normalize(self)
    }

    #[must_use]
    pub fn dimensions(&self) -> FrameDimensions {
        FrameDimensions::from_parameters(self)
    }

    /// True when every field already satisfies the normalizer's invariants.
    #[must_use]
    pub fn is_normalized(&self) -> bool {
        let within = |v: f64, min: f64| (min..=MAX_DIMENSION).contains(&v);
        within(self.width, MIN_DIMENSION)
            && within(self.height, MIN_DIMENSION)
            && within(self.face_width, MIN_SECTION)
            && within(self.profile_depth, MIN_SECTION)
            && within(self.lip_width, MIN_DIMENSION)
            && within(self.lip_depth, MIN_DIMENSION)
            && within(self.clearance, f64::MIN_POSITIVE)
            && self.lip_width < self.face_width
            && self.lip_depth < self.profile_depth
    }
}

/// Repair a parameter set. Total and idempotent on already valid input.
#[must_use]
pub fn normalize(raw: FrameParameters) -> FrameParameters {
    let defaults = FrameParameters::default();

    let mut params = FrameParameters {
        width: bounded_or(raw.width, MIN_DIMENSION, defaults.width, "width"),
        height: bounded_or(raw.height, MIN_DIMENSION, defaults.height, "height"),
        face_width: bounded_or(raw.face_width, MIN_SECTION, defaults.face_width, "faceWidth"),
        profile_depth: bounded_or(
            raw.profile_depth,
            MIN_SECTION,
            defaults.profile_depth,
            "profileDepth",
        ),
        lip_width: bounded_or(raw.lip_width, MIN_DIMENSION, defaults.lip_width, "lipWidth"),
        lip_depth: bounded_or(raw.lip_depth, MIN_DIMENSION, defaults.lip_depth, "lipDepth"),
        clearance: bounded_or(raw.clearance, f64::MIN_POSITIVE, defaults.clearance, "clearance"),
        style: raw.style,
    };

    params.lip_width = fit_lip(params.lip_width, params.face_width, LIP_WIDTH_FALLBACK_RATIO, "lipWidth");
    params.lip_depth = fit_lip(
        params.lip_depth,
        params.profile_depth,
        LIP_DEPTH_FALLBACK_RATIO,
        "lipDepth",
    );

    params
}

fn bounded_or(value: f64, min: f64, default: f64, field: &str) -> f64 {
    if !value.is_finite() || value < min {
        log::debug!("{field}: {value} replaced by default {default}");
        return default;
    }
    if value > MAX_DIMENSION {
        log::debug!("{field}: {value} clamped to {MAX_DIMENSION}");
        return MAX_DIMENSION;
    }
    value
}

fn fit_lip(lip: f64, section: f64, ratio: f64, field: &str) -> f64 {
    if lip < section {
        return lip;
    }

    let mut fitted = (section * ratio).max(LIP_MIN);
    // The floor only works for sections wider than it.
    if fitted >= section {
        fitted = section * ratio;
    }
    if !(fitted > 0.0 && fitted < section) {
        fitted = section / 2.0;
    }
    log::debug!("{field}: {lip} does not fit inside {section}, using {fitted}");
    fitted
}

/// Derived sizes of an assembled frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameDimensions {
    pub inner_width: f64,
    pub inner_height: f64,
    pub horizontal_length: f64,
    pub vertical_length: f64,
    pub outer_width: f64,
    pub outer_height: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl FrameDimensions {
    #[must_use]
    pub fn from_parameters(params: &FrameParameters) -> Self {
        let inner_width = params.width + 2.0 * params.clearance;
        let inner_height = params.height + 2.0 * params.clearance;
        Self {
            inner_width,
            inner_height,
            horizontal_length: inner_width + 2.0 * params.lip_width,
            vertical_length: inner_height + 2.0 * params.lip_width,
            outer_width: inner_width + 2.0 * params.face_width,
            outer_height: inner_height + 2.0 * params.face_width,
            offset_x: inner_width / 2.0,
            offset_y: inner_height / 2.0,
        }
    }
}

/// A numeric field as typed into a form: a number or free text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawNumber {
    Number(f64),
    Text(String),
}

impl RawNumber {
    /// Numeric value; text that does not parse becomes NaN.
    #[must_use]
    pub fn value(&self) -> f64 {
        match self {
            Self::Number(value) => *value,
            Self::Text(text) => text.trim().parse::<f64>().unwrap_or(f64::NAN),
        }
    }
}

impl From<f64> for RawNumber {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for RawNumber {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

/// Unvalidated frame input from a form, a config file or the command line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawFrameInput {
    pub width: Option<RawNumber>,
    pub height: Option<RawNumber>,
    pub face_width: Option<RawNumber>,
    pub profile_depth: Option<RawNumber>,
    pub lip_width: Option<RawNumber>,
    pub lip_depth: Option<RawNumber>,
    pub clearance: Option<RawNumber>,
    pub style: Option<String>,
}

impl RawFrameInput {
    /// Fields set in `overrides` replace the ones in `self`.
    #[must_use]
    pub fn merged_with(self, overrides: RawFrameInput) -> Self {
        Self {
            width: overrides.width.or(self.width),
            height: overrides.height.or(self.height),
            face_width: overrides.face_width.or(self.face_width),
            profile_depth: overrides.profile_depth.or(self.profile_depth),
            lip_width: overrides.lip_width.or(self.lip_width),
            lip_depth: overrides.lip_depth.or(self.lip_depth),
            clearance: overrides.clearance.or(self.clearance),
            style: overrides.style.or(self.style),
        }
    }

    /// Normalized parameters for this input.
    #[must_use]
    pub fn to_parameters(&self) -> FrameParameters {
        let number = |field: &Option<RawNumber>| field.as_ref().map_or(f64::NAN, RawNumber::value);

        let style = match self.style.as_deref() {
            Some(name) => FrameStyle::from_name(name).unwrap_or_else(|| {
                log::debug!("unknown style {name:?}, using {}", FrameStyle::default());
                FrameStyle::default()
            }),
            None => FrameStyle::default(),
        };

        normalize(FrameParameters {
            width: number(&self.width),
            height: number(&self.height),
            face_width: number(&self.face_width),
            profile_depth: number(&self.profile_depth),
            lip_width: number(&self.lip_width),
            lip_depth: number(&self.lip_depth),
            clearance: number(&self.clearance),
            style,
        })
    }
}

impl From<FrameParameters> for RawFrameInput {
    fn from(params: FrameParameters) -> Self {
        Self {
            width: Some(params.width.into()),
            height: Some(params.height.into()),
            face_width: Some(params.face_width.into()),
            profile_depth: Some(params.profile_depth.into()),
            lip_width: Some(params.lip_width.into()),
            lip_depth: Some(params.lip_depth.into()),
            clearance: Some(params.clearance.into()),
            style: Some(params.style.name().to_string()),
        }
    }
}
