//! Clip types for the timeline.

use serde::{Deserialize, Serialize};
use splice_core::{RationalTime, TimeRange};
use std::fmt;
use uuid::Uuid;

use crate::filter::{FilterSet, TransitionPair};
use crate::track::TrackKind;

/// Volume bounds, in percent.
pub const VOLUME_MAX: f32 = 200.0;
/// Audio fade bounds, in seconds.
pub const FADE_MAX_SECS: i64 = 5;

/// Opaque handle to the underlying media (path or URL).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaRef(String);

impl MediaRef {
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MediaRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which collection a timeline item lives in. Clip kinds and lane kinds
/// coincide: every clip kind has its own set of lanes.
pub type ClipKind = TrackKind;

/// Fields shared by video and audio clips.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipBase {
    /// Unique clip ID, never reassigned.
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Untrimmed length of the source media, never reassigned.
    pub source_duration: RationalTime,
    /// Position of the first visible frame on the timeline.
    pub start_time: RationalTime,
    /// Seconds trimmed from the head of the source.
    pub trim_start: RationalTime,
    /// Seconds trimmed from the tail of the source.
    pub trim_end: RationalTime,
    /// Lane index within the clip's track kind.
    pub track: u8,
    /// Percent, 0–200.
    pub volume: f32,
    pub muted: bool,
    /// Locked clips refuse move, trim, split and delete.
    pub locked: bool,
    /// Reference to source media
    pub media: MediaRef,
}

impl ClipBase {
    /// Create an untrimmed clip at `start_time`.
    pub fn new(
        name: impl Into<String>,
        media: MediaRef,
        source_duration: RationalTime,
        start_time: RationalTime,
        track: u8,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            source_duration,
            start_time: start_time.non_negative(),
            trim_start: RationalTime::ZERO,
            trim_end: RationalTime::ZERO,
            track,
            volume: 100.0,
            muted: false,
            locked: false,
            media,
        }
    }

    /// Source duration minus head and tail trims.
    pub fn effective_duration(&self) -> RationalTime {
        self.source_duration - self.trim_start - self.trim_end
    }

    /// End of occupancy (exclusive).
    pub fn end_time(&self) -> RationalTime {
        self.start_time + self.effective_duration()
    }

    /// The half-open interval the clip covers on the timeline.
    pub fn occupancy(&self) -> TimeRange {
        TimeRange::new(self.start_time, self.effective_duration())
    }

    /// Position inside the source media for a timeline time.
    pub fn source_position(&self, timeline_time: RationalTime) -> RationalTime {
        timeline_time - self.start_time + self.trim_start
    }

    /// Set volume, clamped to 0–200.
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = if volume.is_nan() {
            0.0
        } else {
            volume.clamp(0.0, VOLUME_MAX)
        };
    }
}

/// A video clip on the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoClip {
    #[serde(flatten)]
    pub base: ClipBase,
    pub visible: bool,
    pub filters: FilterSet,
    pub transitions: TransitionPair,
    /// Probed poster frame, if the import produced one.
    pub thumbnail: Option<String>,
}

impl VideoClip {
    pub fn new(base: ClipBase) -> Self {
        Self {
            base,
            visible: true,
            filters: FilterSet::default(),
            transitions: TransitionPair::default(),
            thumbnail: None,
        }
    }

    /// Re-clamp volume and filter parameters.
    pub fn normalize(&mut self) {
        self.base.set_volume(self.base.volume);
        self.filters = self.filters.clamped();
    }
}

/// An audio clip on the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioClip {
    #[serde(flatten)]
    pub base: ClipBase,
    /// Seconds, 0–5.
    pub fade_in: RationalTime,
    /// Seconds, 0–5.
    pub fade_out: RationalTime,
}

impl AudioClip {
    pub fn new(base: ClipBase) -> Self {
        Self {
            base,
            fade_in: RationalTime::ZERO,
            fade_out: RationalTime::ZERO,
        }
    }

    /// Set both fades, each clamped to 0–5 seconds.
    pub fn set_fades(&mut self, fade_in: RationalTime, fade_out: RationalTime) {
        let max = RationalTime::from_secs(FADE_MAX_SECS);
        self.fade_in = fade_in.clamp_to(RationalTime::ZERO, max);
        self.fade_out = fade_out.clamp_to(RationalTime::ZERO, max);
    }

    /// Re-clamp volume and fades.
    pub fn normalize(&mut self) {
        self.base.set_volume(self.base.volume);
        self.set_fades(self.fade_in, self.fade_out);
    }
}

/// Anything that occupies an interval on a lane.
pub trait TimelineItem: Clone {
    const KIND: ClipKind;

    fn id(&self) -> Uuid;
    fn set_id(&mut self, id: Uuid);
    fn start_time(&self) -> RationalTime;
    fn set_start_time(&mut self, start: RationalTime);
    fn effective_duration(&self) -> RationalTime;
    fn track(&self) -> u8;
    fn set_track(&mut self, track: u8);
    fn locked(&self) -> bool;

    fn end_time(&self) -> RationalTime {
        self.start_time() + self.effective_duration()
    }

    fn occupancy(&self) -> TimeRange {
        TimeRange::new(self.start_time(), self.effective_duration())
    }
}

/// Items backed by source media, which can be trimmed and split.
pub trait MediaClip: TimelineItem {
    fn base(&self) -> &ClipBase;
    fn base_mut(&mut self) -> &mut ClipBase;

    /// Clear the transition on the edge a split creates. `head` is the
    /// left half of the split.
    fn clear_internal_edge(&mut self, _head: bool) {}
}

macro_rules! media_clip_item {
    ($ty:ty, $kind:expr) => {
        impl TimelineItem for $ty {
            const KIND: ClipKind = $kind;

            fn id(&self) -> Uuid {
                self.base.id
            }
            fn set_id(&mut self, id: Uuid) {
                self.base.id = id;
            }
            fn start_time(&self) -> RationalTime {
                self.base.start_time
            }
            fn set_start_time(&mut self, start: RationalTime) {
                self.base.start_time = start;
            }
            fn effective_duration(&self) -> RationalTime {
                self.base.effective_duration()
            }
            fn track(&self) -> u8 {
                self.base.track
            }
            fn set_track(&mut self, track: u8) {
                self.base.track = track;
            }
            fn locked(&self) -> bool {
                self.base.locked
            }
        }
    };
}

media_clip_item!(VideoClip, ClipKind::Video);
media_clip_item!(AudioClip, ClipKind::Audio);

impl MediaClip for VideoClip {
    fn base(&self) -> &ClipBase {
        &self.base
    }
    fn base_mut(&mut self) -> &mut ClipBase {
        &mut self.base
    }
    fn clear_internal_edge(&mut self, head: bool) {
        if head {
            self.transitions.outgoing = crate::filter::TransitionKind::None;
        } else {
            self.transitions.incoming = crate::filter::TransitionKind::None;
        }
    }
}

impl MediaClip for AudioClip {
    fn base(&self) -> &ClipBase {
        &self.base
    }
    fn base_mut(&mut self) -> &mut ClipBase {
        &mut self.base
    }
}

/// Request to append a media clip, as supplied by the import boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct NewClip {
    pub name: String,
    pub media: MediaRef,
    pub probed_duration: RationalTime,
    pub thumbnail: Option<String>,
    pub track: u8,
}

impl NewClip {
    pub fn new(name: impl Into<String>, media: MediaRef, probed_duration: RationalTime) -> Self {
        Self {
            name: name.into(),
            media,
            probed_duration,
            thumbnail: None,
            track: 0,
        }
    }

    pub fn on_track(mut self, track: u8) -> Self {
        self.track = track;
        self
    }

    pub fn with_thumbnail(mut self, thumbnail: impl Into<String>) -> Self {
        self.thumbnail = Some(thumbnail.into());
        self
    }
}
