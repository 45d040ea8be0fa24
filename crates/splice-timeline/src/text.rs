//! Text overlays.
//!
//! Overlays are not backed by media: they have a duration of their own and no
//! trims, so they only take part in move, lane change, duplicate and delete.

use serde::{Deserialize, Serialize};
use splice_core::RationalTime;
use uuid::Uuid;

use crate::clip::{ClipKind, TimelineItem};

const DURATION_MIN_SECS: i64 = 1;
const DURATION_MAX_SECS: i64 = 30;
const FONT_SIZE_MIN: f32 = 8.0;
const FONT_SIZE_MAX: f32 = 200.0;

/// Entry animation for an overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextAnimation {
    #[default]
    None,
    FadeIn,
    SlideUp,
    SlideDown,
    Typewriter,
    Bounce,
    Zoom,
}

/// Normalized position, both axes in percent of the frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextPosition {
    pub x: f32,
    pub y: f32,
}

impl TextPosition {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x: percent(x),
            y: percent(y),
        }
    }
}

impl Default for TextPosition {
    fn default() -> Self {
        Self { x: 50.0, y: 50.0 }
    }
}

fn percent(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 100.0)
    }
}

/// Clamp an overlay duration into 1–30 seconds.
pub fn clamp_text_duration(duration: RationalTime) -> RationalTime {
    duration.clamp_to(
        RationalTime::from_secs(DURATION_MIN_SECS),
        RationalTime::from_secs(DURATION_MAX_SECS),
    )
}

/// A text overlay on a text lane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextOverlay {
    pub id: Uuid,
    pub text: String,
    pub start_time: RationalTime,
    /// Seconds, 1–30.
    pub duration: RationalTime,
    pub position: TextPosition,
    pub font_size: f32,
    pub font_family: String,
    pub color: String,
    pub background_color: String,
    /// Percent, 0–100.
    pub opacity: f32,
    pub animation: TextAnimation,
    pub track: u8,
}

impl TextOverlay {
    /// Build an overlay from a request, clamping every ranged field.
    pub fn from_request(request: NewText, start_time: RationalTime) -> Self {
        let mut overlay = Self {
            id: Uuid::new_v4(),
            text: String::new(),
            start_time: start_time.non_negative(),
            duration: RationalTime::from_secs(3),
            position: TextPosition::default(),
            font_size: 48.0,
            font_family: "Inter".into(),
            color: "#ffffff".into(),
            background_color: "transparent".into(),
            opacity: 100.0,
            animation: TextAnimation::None,
            track: request.track,
        };
        overlay.apply(&request.patch);
        overlay
    }

    /// Re-clamp the ranged fields, e.g. after loading from disk.
    pub fn normalize(&mut self) {
        self.apply(&TextPatch {
            duration: Some(self.duration),
            position: Some(self.position),
            font_size: Some(self.font_size),
            opacity: Some(self.opacity),
            ..TextPatch::default()
        });
    }

    /// Apply a partial update.
    pub fn apply(&mut self, patch: &TextPatch) {
        if let Some(text) = &patch.text {
            self.text = text.clone();
        }
        if let Some(duration) = patch.duration {
            self.duration = clamp_text_duration(duration);
        }
        if let Some(position) = patch.position {
            self.position = TextPosition::new(position.x, position.y);
        }
        if let Some(size) = patch.font_size {
            self.font_size = if size.is_nan() {
                FONT_SIZE_MIN
            } else {
                size.clamp(FONT_SIZE_MIN, FONT_SIZE_MAX)
            };
        }
        if let Some(family) = &patch.font_family {
            self.font_family = family.clone();
        }
        if let Some(color) = &patch.color {
            self.color = color.clone();
        }
        if let Some(color) = &patch.background_color {
            self.background_color = color.clone();
        }
        if let Some(opacity) = patch.opacity {
            self.opacity = percent(opacity);
        }
        if let Some(animation) = patch.animation {
            self.animation = animation;
        }
    }
}

impl TimelineItem for TextOverlay {
    const KIND: ClipKind = ClipKind::Text;

    fn id(&self) -> Uuid {
        self.id
    }
    fn set_id(&mut self, id: Uuid) {
        self.id = id;
    }
    fn start_time(&self) -> RationalTime {
        self.start_time
    }
    fn set_start_time(&mut self, start: RationalTime) {
        self.start_time = start;
    }
    fn effective_duration(&self) -> RationalTime {
        self.duration
    }
    fn track(&self) -> u8 {
        self.track
    }
    fn set_track(&mut self, track: u8) {
        self.track = track;
    }
    fn locked(&self) -> bool {
        false
    }
}

/// Partial update for a [`TextOverlay`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextPatch {
    pub text: Option<String>,
    pub duration: Option<RationalTime>,
    pub position: Option<TextPosition>,
    pub font_size: Option<f32>,
    pub font_family: Option<String>,
    pub color: Option<String>,
    pub background_color: Option<String>,
    pub opacity: Option<f32>,
    pub animation: Option<TextAnimation>,
}

/// Request to append a text overlay.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewText {
    pub track: u8,
    pub patch: TextPatch,
}

impl NewText {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            track: 0,
            patch: TextPatch {
                text: Some(text.into()),
                ..Default::default()
            },
        }
    }

    pub fn on_track(mut self, track: u8) -> Self {
        self.track = track;
        self
    }

    pub fn lasting(mut self, duration: RationalTime) -> Self {
        self.patch.duration = Some(duration);
        self
    }
}
