//! Editor configuration.
//!
//! Every field has a default, so a config file only needs to name what it
//! overrides. Times are stored as milliseconds on disk and exposed as
//! [`RationalTime`] to the engine.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, SpliceError};
use crate::time::RationalTime;

/// Which clips a ripple delete shifts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RippleScope {
    /// Only clips of the same kind on the deleted clip's lane.
    #[default]
    SameLane,
    /// Every clip and text overlay on every lane.
    AllLanes,
}

/// Fixed number of lanes per track kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaneConfig {
    pub video: u8,
    pub audio: u8,
    pub text: u8,
}

impl Default for LaneConfig {
    fn default() -> Self {
        Self {
            video: 3,
            audio: 3,
            text: 3,
        }
    }
}

/// Tunables for the timeline engine and playback coordinator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Shortest effective duration a trim or split may leave behind.
    pub min_clip_length_ms: i64,
    /// Project duration never reports less than this.
    pub duration_floor_ms: i64,
    /// Space left between a clip and its duplicate.
    pub duplicate_gap_ms: i64,
    /// Playback surface drift tolerated before a corrective seek.
    pub drift_tolerance_ms: i64,
    /// Duration assumed for media whose probe failed.
    pub fallback_probe_duration_ms: i64,
    /// Lane counts per kind.
    pub lanes: LaneConfig,
    /// Ripple delete lane scope.
    pub ripple_scope: RippleScope,
    /// Maximum undo depth.
    pub history_depth: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            min_clip_length_ms: 500,
            duration_floor_ms: 60_000,
            duplicate_gap_ms: 500,
            drift_tolerance_ms: 500,
            fallback_probe_duration_ms: 10_000,
            lanes: LaneConfig::default(),
            ripple_scope: RippleScope::SameLane,
            history_depth: 200,
        }
    }
}

impl EditorConfig {
    pub fn min_clip_length(&self) -> RationalTime {
        RationalTime::from_millis(self.min_clip_length_ms)
    }

    pub fn duration_floor(&self) -> RationalTime {
        RationalTime::from_millis(self.duration_floor_ms)
    }

    pub fn duplicate_gap(&self) -> RationalTime {
        RationalTime::from_millis(self.duplicate_gap_ms)
    }

    pub fn drift_tolerance_secs(&self) -> f64 {
        self.drift_tolerance_ms as f64 / 1000.0
    }

    pub fn fallback_probe_duration(&self) -> RationalTime {
        RationalTime::from_millis(self.fallback_probe_duration_ms)
    }

    /// Parse from JSON bytes, then validate.
    pub fn from_json(data: &[u8]) -> Result<Self> {
        let config: Self = serde_json::from_slice(data)
            .map_err(|e| SpliceError::Config(format!("Invalid config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_json(&data)
    }

    /// Reject values the engine cannot honor.
    pub fn validate(&self) -> Result<()> {
        if self.min_clip_length_ms <= 0 {
            return Err(SpliceError::Config(
                "min_clip_length_ms must be positive".into(),
            ));
        }
        if self.duration_floor_ms < 0 || self.duplicate_gap_ms < 0 || self.drift_tolerance_ms < 0 {
            return Err(SpliceError::Config(
                "duration floor, duplicate gap and drift tolerance must not be negative".into(),
            ));
        }
        if self.fallback_probe_duration_ms < self.min_clip_length_ms {
            return Err(SpliceError::Config(format!(
                "fallback_probe_duration_ms ({}) is shorter than min_clip_length_ms ({})",
                self.fallback_probe_duration_ms, self.min_clip_length_ms
            )));
        }
        if self.lanes.video == 0 || self.lanes.audio == 0 || self.lanes.text == 0 {
            return Err(SpliceError::Config(
                "every track kind needs at least one lane".into(),
            ));
        }
        Ok(())
    }
}
