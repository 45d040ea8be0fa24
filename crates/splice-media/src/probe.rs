//! Media file probing to get metadata without a full decode.

use serde::{Deserialize, Serialize};
use splice_core::{RationalTime, Result, SpliceError};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, warn};

/// Information about a media file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaProbe {
    /// File path
    pub path: String,
    pub duration: RationalTime,
    pub has_video: bool,
    pub has_audio: bool,
    /// Dimensions of the first video stream.
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Container format, as ffprobe names it.
    pub format: String,
}

impl MediaProbe {
    /// Metadata used when probing fails.
    pub fn fallback(path: &Path, duration: RationalTime) -> Self {
        Self {
            path: path.to_string_lossy().to_string(),
            duration,
            has_video: false,
            has_audio: false,
            width: None,
            height: None,
            format: String::new(),
        }
    }

    /// File name for display, falling back to the full path.
    pub fn display_name(&self) -> String {
        Path::new(&self.path)
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path.clone())
    }
}

/// Anything that can read media metadata.
pub trait Prober: Send {
    fn probe(&self, path: &Path) -> Result<MediaProbe>;
}

/// Probe through the `ffprobe` binary.
#[derive(Debug, Clone)]
pub struct FfprobeProber {
    binary: PathBuf,
}

impl FfprobeProber {
    /// Use the ffprobe that ffmpeg-sidecar resolves (next to the executable,
    /// or on `PATH`).
    pub fn new() -> Self {
        Self {
            binary: ffmpeg_sidecar::ffprobe::ffprobe_path(),
        }
    }

    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }
}

impl Default for FfprobeProber {
    fn default() -> Self {
        Self::new()
    }
}

impl Prober for FfprobeProber {
    fn probe(&self, path: &Path) -> Result<MediaProbe> {
        if !path.exists() {
            return Err(SpliceError::NotFound(format!(
                "File not found: {}",
                path.display()
            )));
        }

        let output = Command::new(&self.binary)
            .args([
                "-v",
                "quiet",
                "-print_format",
                "json",
                "-show_streams",
                "-show_format",
            ])
            .arg(path)
            .output()
            .map_err(|e| SpliceError::Probe(format!("Failed to run ffprobe: {e}")))?;

        if !output.status.success() {
            return Err(SpliceError::Probe(format!(
                "ffprobe failed: {}",
                String::from_utf8_lossy(&output.stderr)
            )));
        }

        parse_ffprobe_output(path, &String::from_utf8_lossy(&output.stdout))
    }
}

// ── ffprobe JSON ────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    streams: Vec<FfprobeStream>,
    format: Option<FfprobeFormat>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
    format_name: Option<String>,
}

fn parse_ffprobe_output(path: &Path, json: &str) -> Result<MediaProbe> {
    let parsed: FfprobeOutput = serde_json::from_str(json)
        .map_err(|e| SpliceError::Probe(format!("Invalid ffprobe output: {e}")))?;

    let format = parsed
        .format
        .ok_or_else(|| SpliceError::Probe("ffprobe reported no format".into()))?;
    let seconds = format
        .duration
        .as_deref()
        .and_then(|d| d.trim().parse::<f64>().ok())
        .filter(|d| d.is_finite() && *d > 0.0)
        .ok_or_else(|| SpliceError::Probe(format!("No usable duration for {}", path.display())))?;

    let video = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"));
    let has_audio = parsed
        .streams
        .iter()
        .any(|s| s.codec_type.as_deref() == Some("audio"));

    Ok(MediaProbe {
        path: path.to_string_lossy().to_string(),
        duration: RationalTime::from_seconds_f64(seconds),
        has_video: video.is_some(),
        has_audio,
        width: video.and_then(|v| v.width),
        height: video.and_then(|v| v.height),
        format: format.format_name.unwrap_or_default(),
    })
}

// ── Fallback ────────────────────────────────────────────────────

/// A probe result, possibly substituted.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeOutcome {
    pub probe: MediaProbe,
    /// True when probing failed and `probe` carries the fallback duration.
    pub fallback: bool,
}

/// Probe `path`, degrading to `fallback_duration` when probing fails. Import
/// never fails on a bad probe.
pub fn probe_or_fallback(
    prober: &dyn Prober,
    path: &Path,
    fallback_duration: RationalTime,
) -> ProbeOutcome {
    match prober.probe(path) {
        Ok(probe) => {
            debug!(path = %path.display(), duration = %probe.duration, "Probed media");
            ProbeOutcome {
                probe,
                fallback: false,
            }
        }
        Err(e) => {
            warn!(
                path = %path.display(),
                error = %e,
                fallback = %fallback_duration,
                "Probe failed, using fallback duration"
            );
            ProbeOutcome {
                probe: MediaProbe::fallback(path, fallback_duration),
                fallback: true,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "streams": [
            { "index": 0, "codec_type": "video", "codec_name": "h264", "width": 1920, "height": 1080 },
            { "index": 1, "codec_type": "audio", "codec_name": "aac" }
        ],
        "format": { "format_name": "mov,mp4,m4a,3gp,3g2,mj2", "duration": "12.480000" }
    }"#;

    struct Failing;

    impl Prober for Failing {
        fn probe(&self, path: &Path) -> Result<MediaProbe> {
            Err(SpliceError::Probe(format!("cannot read {}", path.display())))
        }
    }

    #[test]
    fn test_parse_ffprobe_output() {
        let probe = parse_ffprobe_output(Path::new("clips/intro.mp4"), SAMPLE).unwrap();
        assert_eq!(probe.duration, RationalTime::new(1248, 100));
        assert!(probe.has_video && probe.has_audio);
        assert_eq!((probe.width, probe.height), (Some(1920), Some(1080)));
        assert_eq!(probe.display_name(), "intro.mp4");
    }

    #[test]
    fn test_audio_only() {
        let json = r#"{"streams":[{"codec_type":"audio"}],"format":{"duration":"3.5"}}"#;
        let probe = parse_ffprobe_output(Path::new("vo.wav"), json).unwrap();
        assert!(!probe.has_video);
        assert_eq!(probe.width, None);
        assert_eq!(probe.duration, RationalTime::new(7, 2));
    }

    #[test]
    fn test_missing_or_bad_duration_is_error() {
        for json in [
            r#"{"streams":[]}"#,
            r#"{"format":{"duration":"N/A"}}"#,
            r#"{"format":{"duration":"0"}}"#,
            "not json",
        ] {
            assert!(parse_ffprobe_output(Path::new("x"), json).is_err(), "{json}");
        }
    }

    #[test]
    fn test_fallback_on_failure() {
        let outcome = probe_or_fallback(&Failing, Path::new("broken.mov"), RationalTime::from_secs(10));
        assert!(outcome.fallback);
        assert_eq!(outcome.probe.duration, RationalTime::from_secs(10));
        assert_eq!(outcome.probe.display_name(), "broken.mov");
    }

    #[test]
    fn test_missing_file_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let prober = FfprobeProber::with_binary("ffprobe");
        let result = prober.probe(&dir.path().join("nope.mp4"));
        assert!(matches!(result, Err(SpliceError::NotFound(_))));
    }
}
