//! Track registry: fixed-arity lanes per track kind.
//!
//! Lanes do not own clips. Clips carry a lane index and the registry only
//! answers which indices exist and what they are called.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use splice_core::LaneConfig;
use std::fmt;

use crate::edit::EditError;

/// Kind of track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    Video,
    Audio,
    Text,
}

impl TrackKind {
    fn prefix(self) -> char {
        match self {
            Self::Video => 'V',
            Self::Audio => 'A',
            Self::Text => 'T',
        }
    }
}

impl fmt::Display for TrackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Text => "text",
        })
    }
}

/// One timeline row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lane {
    pub kind: TrackKind,
    pub index: u8,
    /// Display name, e.g. "V1".
    pub name: String,
}

impl Lane {
    fn new(kind: TrackKind, index: u8) -> Self {
        Self {
            kind,
            index,
            name: format!("{}{}", kind.prefix(), index as u16 + 1),
        }
    }
}

/// The lanes of a timeline. Video lane 0 is the primary lane that playback
/// follows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackRegistry {
    video: SmallVec<[Lane; 4]>,
    audio: SmallVec<[Lane; 4]>,
    text: SmallVec<[Lane; 4]>,
}

impl TrackRegistry {
    /// Primary video lane index.
    pub const PRIMARY_VIDEO_LANE: u8 = 0;

    pub fn new(config: LaneConfig) -> Self {
        let lanes = |kind: TrackKind, count: u8| (0..count).map(|i| Lane::new(kind, i)).collect();
        Self {
            video: lanes(TrackKind::Video, config.video.max(1)),
            audio: lanes(TrackKind::Audio, config.audio.max(1)),
            text: lanes(TrackKind::Text, config.text.max(1)),
        }
    }

    /// All lanes of a kind, in index order.
    pub fn lanes(&self, kind: TrackKind) -> &[Lane] {
        match kind {
            TrackKind::Video => &self.video,
            TrackKind::Audio => &self.audio,
            TrackKind::Text => &self.text,
        }
    }

    /// Number of lanes of a kind.
    pub fn count(&self, kind: TrackKind) -> u8 {
        self.lanes(kind).len() as u8
    }

    /// Look up a lane.
    pub fn lane(&self, kind: TrackKind, index: u8) -> Option<&Lane> {
        self.lanes(kind).get(index as usize)
    }

    /// Whether `index` names an existing lane of `kind`.
    pub fn contains(&self, kind: TrackKind, index: u8) -> bool {
        index < self.count(kind)
    }

    pub fn validate(&self, kind: TrackKind, index: u8) -> Result<(), EditError> {
        if self.contains(kind, index) {
            Ok(())
        } else {
            Err(EditError::TrackOutOfRange { kind, index })
        }
    }
}

impl Default for TrackRegistry {
    fn default() -> Self {
        Self::new(LaneConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lane_names() {
        let registry = TrackRegistry::default();
        let names: Vec<_> = registry
            .lanes(TrackKind::Audio)
            .iter()
            .map(|l| l.name.as_str())
            .collect();
        assert_eq!(names, ["A1", "A2", "A3"]);
        assert_eq!(registry.lane(TrackKind::Text, 0).unwrap().name, "T1");
    }

    #[test]
    fn test_arity_from_config() {
        let registry = TrackRegistry::new(LaneConfig {
            video: 1,
            audio: 2,
            text: 5,
        });
        assert_eq!(registry.count(TrackKind::Video), 1);
        assert!(registry.contains(TrackKind::Text, 4));
        assert!(!registry.contains(TrackKind::Audio, 2));
        assert_eq!(
            registry.validate(TrackKind::Video, 1),
            Err(EditError::TrackOutOfRange {
                kind: TrackKind::Video,
                index: 1
            })
        );
    }

    #[test]
    fn test_zero_lanes_still_has_primary() {
        let registry = TrackRegistry::new(LaneConfig {
            video: 0,
            audio: 0,
            text: 0,
        });
        assert!(registry.contains(TrackKind::Video, TrackRegistry::PRIMARY_VIDEO_LANE));
    }
}
