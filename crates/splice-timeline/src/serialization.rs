//! Project persistence with versioning and migration.
//!
//! JSON with a schema version field. Only user-authored state is written:
//! settings and the three clip collections. Duration, selection and history
//! are rebuilt on load.

use serde::{Deserialize, Serialize};
use splice_core::{EditorConfig, RationalTime, Result, SpliceError};
use std::path::Path;

use crate::clip::{AudioClip, ClipBase, ClipKind, TimelineItem, VideoClip};
use crate::project::ProjectSettings;
use crate::text::TextOverlay;
use crate::timeline::Timeline;
use crate::track::TrackRegistry;

/// Current schema version.
pub const CURRENT_VERSION: u32 = 1;

/// The persisted part of a timeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectDocument {
    pub settings: ProjectSettings,
    #[serde(default)]
    pub video: Vec<VideoClip>,
    #[serde(default)]
    pub audio: Vec<AudioClip>,
    #[serde(default)]
    pub text: Vec<TextOverlay>,
}

impl ProjectDocument {
    /// Reject documents with unusable settings, clips that break the trim
    /// and minimum-length invariants, or lanes the registry does not have.
    pub fn validate(&self, tracks: &TrackRegistry, config: &EditorConfig) -> Result<()> {
        check_settings(&self.settings)?;
        let min = config.min_clip_length();
        for clip in &self.video {
            check_base(&clip.base, min)?;
            check_lane(tracks, ClipKind::Video, clip.id(), clip.track())?;
        }
        for clip in &self.audio {
            check_base(&clip.base, min)?;
            check_lane(tracks, ClipKind::Audio, clip.id(), clip.track())?;
        }
        for overlay in &self.text {
            if overlay.start_time.is_negative() || overlay.duration <= RationalTime::ZERO {
                return Err(SpliceError::InvalidParameter(format!(
                    "text overlay {} has invalid placement",
                    overlay.id
                )));
            }
            check_lane(tracks, ClipKind::Text, overlay.id, overlay.track)?;
        }
        Ok(())
    }

    /// Clamp volumes, fades, filters and text fields into their ranges.
    fn normalize(&mut self) {
        self.video.iter_mut().for_each(VideoClip::normalize);
        self.audio.iter_mut().for_each(AudioClip::normalize);
        self.text.iter_mut().for_each(TextOverlay::normalize);
    }
}

fn check_settings(settings: &ProjectSettings) -> Result<()> {
    if !settings.frame_rate.is_valid() {
        return Err(SpliceError::InvalidParameter(format!(
            "frame rate {}/{} is not usable",
            settings.frame_rate.numerator, settings.frame_rate.denominator
        )));
    }
    if settings.resolution.width == 0 || settings.resolution.height == 0 {
        return Err(SpliceError::InvalidParameter(format!(
            "resolution {} is empty",
            settings.resolution
        )));
    }
    Ok(())
}

fn check_base(base: &ClipBase, min: RationalTime) -> Result<()> {
    let trims_ok = !base.trim_start.is_negative()
        && !base.trim_end.is_negative()
        && base.trim_start + base.trim_end < base.source_duration;
    if !trims_ok || base.start_time.is_negative() {
        return Err(SpliceError::InvalidParameter(format!(
            "clip {} has invalid trims or placement",
            base.id
        )));
    }
    if base.effective_duration() < min {
        return Err(SpliceError::InvalidParameter(format!(
            "clip {} plays for {}, below the {} minimum",
            base.id,
            base.effective_duration(),
            min
        )));
    }
    Ok(())
}

fn check_lane(tracks: &TrackRegistry, kind: ClipKind, id: uuid::Uuid, track: u8) -> Result<()> {
    if tracks.contains(kind, track) {
        Ok(())
    } else {
        Err(SpliceError::InvalidParameter(format!(
            "clip {id} is on {kind} lane {track}, which does not exist"
        )))
    }
}

impl Timeline {
    /// Capture the persisted state.
    pub fn document(&self) -> ProjectDocument {
        ProjectDocument {
            settings: self.settings.clone(),
            video: self.video.clone(),
            audio: self.audio.clone(),
            text: self.text.clone(),
        }
    }

    /// Rebuild a timeline from a loaded document. History starts empty.
    pub fn from_document(mut document: ProjectDocument, config: EditorConfig) -> Result<Self> {
        let mut timeline = Timeline::new(document.settings.clone(), config);
        document.validate(&timeline.tracks, &timeline.config)?;
        document.normalize();
        timeline.video = document.video;
        timeline.audio = document.audio;
        timeline.text = document.text;
        timeline.recompute_duration();
        Ok(timeline)
    }
}

/// Versioned project file wrapper.
#[derive(Debug, Serialize, Deserialize)]
pub struct ProjectFile {
    /// Schema version for migration.
    pub version: u32,
    pub project: ProjectDocument,
    /// Application version that wrote this file.
    pub app_version: String,
}

impl ProjectFile {
    pub fn new(project: ProjectDocument) -> Self {
        Self {
            version: CURRENT_VERSION,
            project,
            app_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Serialize to JSON bytes.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    /// Deserialize from JSON bytes, applying migrations if needed.
    pub fn from_json(data: &[u8]) -> Result<Self> {
        let raw: serde_json::Value = serde_json::from_slice(data)?;

        let version = raw.get("version").and_then(|v| v.as_u64()).unwrap_or(0) as u32;
        if version > CURRENT_VERSION {
            return Err(SpliceError::Serialization(format!(
                "Project file version {version} is newer than supported version {CURRENT_VERSION}"
            )));
        }

        let migrated = migrate(raw, version)?;
        Ok(serde_json::from_value(migrated)?)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_json(&data)
    }
}

/// Apply sequential migrations from `from_version` to [`CURRENT_VERSION`].
fn migrate(mut data: serde_json::Value, from_version: u32) -> Result<serde_json::Value> {
    let mut version = from_version;
    while version < CURRENT_VERSION {
        match version {
            0 => {
                // v0 files are a bare document with no wrapper.
                data = serde_json::json!({
                    "version": 1,
                    "project": data,
                    "app_version": "0.1.0",
                });
                version = 1;
            }
            _ => {
                return Err(SpliceError::Serialization(format!(
                    "No migration path from version {version}"
                )));
            }
        }
    }
    Ok(data)
}
