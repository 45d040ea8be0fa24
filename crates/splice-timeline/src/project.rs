//! Project settings.

use serde::{Deserialize, Serialize};
use splice_core::FrameRate;
use std::fmt;

/// Output aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "16:9")]
    Landscape,
    #[serde(rename = "9:16")]
    Portrait,
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "4:5")]
    Vertical,
}

impl AspectRatio {
    /// Resolution a new project of this aspect targets.
    pub fn default_resolution(self) -> Resolution {
        match self {
            Self::Landscape => Resolution::new(1920, 1080),
            Self::Portrait => Resolution::new(1080, 1920),
            Self::Square => Resolution::new(1080, 1080),
            Self::Vertical => Resolution::new(1080, 1350),
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Landscape => "16:9",
            Self::Portrait => "9:16",
            Self::Square => "1:1",
            Self::Vertical => "4:5",
        })
    }
}

/// Target resolution in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// User-editable project settings. The project duration is derived by the
/// timeline and is deliberately absent here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSettings {
    /// Project name
    pub name: String,
    pub aspect_ratio: AspectRatio,
    pub resolution: Resolution,
    pub frame_rate: FrameRate,
}

impl ProjectSettings {
    /// Create settings for a 16:9 project at 30 fps.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aspect_ratio: AspectRatio::Landscape,
            resolution: AspectRatio::Landscape.default_resolution(),
            frame_rate: FrameRate::FPS_30,
        }
    }

    /// Switch aspect ratio and retarget the resolution to match.
    pub fn set_aspect_ratio(&mut self, aspect: AspectRatio) {
        self.aspect_ratio = aspect;
        self.resolution = aspect.default_resolution();
    }
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self::new("Untitled Project")
    }
}
