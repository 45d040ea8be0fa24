//! Filter and transition metadata attached to video clips.
//!
//! Pure data: nothing here computes a visual effect. Renderers and the export
//! stage read these values.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Per-clip color and stylization parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilterSet {
    /// Percent, 0–200.
    pub brightness: f32,
    /// Percent, 0–200.
    pub contrast: f32,
    /// Percent, 0–200.
    pub saturation: f32,
    /// Degrees, -180–180.
    pub hue: f32,
    /// Pixels, 0–20.
    pub blur: f32,
    pub grayscale: bool,
    pub sepia: bool,
    pub invert: bool,
}

impl Default for FilterSet {
    fn default() -> Self {
        Self {
            brightness: 100.0,
            contrast: 100.0,
            saturation: 100.0,
            hue: 0.0,
            blur: 0.0,
            grayscale: false,
            sepia: false,
            invert: false,
        }
    }
}

fn clamp_param(value: f32, min: f32, max: f32) -> f32 {
    if value.is_nan() {
        min.max(0.0).min(max)
    } else {
        value.clamp(min, max)
    }
}

impl FilterSet {
    /// Shallow merge: fields present in `patch` replace ours, clamped to range.
    pub fn merge(&mut self, patch: &FilterPatch) {
        if let Some(v) = patch.brightness {
            self.brightness = clamp_param(v, 0.0, 200.0);
        }
        if let Some(v) = patch.contrast {
            self.contrast = clamp_param(v, 0.0, 200.0);
        }
        if let Some(v) = patch.saturation {
            self.saturation = clamp_param(v, 0.0, 200.0);
        }
        if let Some(v) = patch.hue {
            self.hue = clamp_param(v, -180.0, 180.0);
        }
        if let Some(v) = patch.blur {
            self.blur = clamp_param(v, 0.0, 20.0);
        }
        if let Some(v) = patch.grayscale {
            self.grayscale = v;
        }
        if let Some(v) = patch.sepia {
            self.sepia = v;
        }
        if let Some(v) = patch.invert {
            self.invert = v;
        }
    }

    /// Restore the neutral defaults.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// True when the set leaves the image untouched.
    pub fn is_neutral(&self) -> bool {
        *self == Self::default()
    }

    /// Pull every ranged parameter back into range.
    pub fn clamped(mut self) -> Self {
        self.merge(&FilterPatch {
            brightness: Some(self.brightness),
            contrast: Some(self.contrast),
            saturation: Some(self.saturation),
            hue: Some(self.hue),
            blur: Some(self.blur),
            ..FilterPatch::default()
        });
        self
    }
}

/// Partial update for a [`FilterSet`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterPatch {
    pub brightness: Option<f32>,
    pub contrast: Option<f32>,
    pub saturation: Option<f32>,
    pub hue: Option<f32>,
    pub blur: Option<f32>,
    pub grayscale: Option<bool>,
    pub sepia: Option<bool>,
    pub invert: Option<bool>,
}

/// Transition applied at a clip edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransitionKind {
    #[default]
    None,
    Fade,
    Dissolve,
    SlideLeft,
    SlideRight,
    SlideUp,
    SlideDown,
    ZoomIn,
    ZoomOut,
    Wipe,
    Blur,
}

impl TransitionKind {
    pub const ALL: [Self; 11] = [
        Self::None,
        Self::Fade,
        Self::Dissolve,
        Self::SlideLeft,
        Self::SlideRight,
        Self::SlideUp,
        Self::SlideDown,
        Self::ZoomIn,
        Self::ZoomOut,
        Self::Wipe,
        Self::Blur,
    ];

    /// Stable identifier used in project files and the UI.
    pub fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Fade => "fade",
            Self::Dissolve => "dissolve",
            Self::SlideLeft => "slide-left",
            Self::SlideRight => "slide-right",
            Self::SlideUp => "slide-up",
            Self::SlideDown => "slide-down",
            Self::ZoomIn => "zoom-in",
            Self::ZoomOut => "zoom-out",
            Self::Wipe => "wipe",
            Self::Blur => "blur",
        }
    }
}

impl fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Raised when a transition name is not in the enumerated set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown transition: {0}")]
pub struct UnknownTransition(pub String);

impl FromStr for TransitionKind {
    type Err = UnknownTransition;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| UnknownTransition(s.to_string()))
    }
}

/// Which edge of a clip a transition sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionEdge {
    In,
    Out,
}

/// Transitions at the head and tail of a clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TransitionPair {
    #[serde(rename = "in")]
    pub incoming: TransitionKind,
    #[serde(rename = "out")]
    pub outgoing: TransitionKind,
}

impl TransitionPair {
    pub fn get(&self, edge: TransitionEdge) -> TransitionKind {
        match edge {
            TransitionEdge::In => self.incoming,
            TransitionEdge::Out => self.outgoing,
        }
    }

    pub fn set(&mut self, edge: TransitionEdge, kind: TransitionKind) {
        match edge {
            TransitionEdge::In => self.incoming = kind,
            TransitionEdge::Out => self.outgoing = kind,
        }
    }
}
