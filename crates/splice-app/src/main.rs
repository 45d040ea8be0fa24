//! Splice Studio - headless timeline editor
//!
//! Loads or creates a project, imports media through the background probe
//! worker, optionally plays it through a headless surface, prints the edit
//! list and saves the result.

use anyhow::{bail, Context, Result};
use clap::Parser;
use splice_core::{EditorConfig, RationalTime, RippleScope};
use splice_media::{FfprobeProber, ProbeWorker};
use splice_playback::{EditorSession, NullSurface, PlaybackState, SystemClock};
use splice_timeline::{ClipKind, ProjectFile, ProjectSettings, Timeline};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::info;
use tracing_subscriber::EnvFilter;

const IMPORT_TIMEOUT: Duration = Duration::from_secs(30);
const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "aac", "flac", "ogg", "m4a", "opus"];

#[derive(Debug, Parser)]
#[command(name = "splice", version, about = "Headless multi-lane timeline editor")]
struct Cli {
    /// Editor configuration (JSON)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Project to open instead of starting empty
    #[arg(long, value_name = "FILE")]
    project: Option<PathBuf>,

    /// Where to save the project afterwards
    #[arg(long, value_name = "FILE")]
    save: Option<PathBuf>,

    /// Play from the start for this many seconds
    #[arg(long, value_name = "SECS")]
    play: Option<f64>,

    /// Shift clips on every lane when ripple deleting
    #[arg(long)]
    ripple_all_lanes: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Media files to append; audio files go to A1, everything else to V1
    #[arg(value_name = "MEDIA")]
    media: Vec<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    info!("Splice Studio starting...");

    let mut config = match &cli.config {
        Some(path) => EditorConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EditorConfig::default(),
    };
    if cli.ripple_all_lanes {
        config.ripple_scope = RippleScope::AllLanes;
    }

    let timeline = match &cli.project {
        Some(path) => {
            let file = ProjectFile::load_from_file(path)
                .with_context(|| format!("opening project {}", path.display()))?;
            Timeline::from_document(file.project, config.clone())?
        }
        None => Timeline::new(ProjectSettings::default(), config.clone()),
    };

    let worker = ProbeWorker::spawn(FfprobeProber::new(), config.fallback_probe_duration())?;
    let mut session =
        EditorSession::new(timeline, SystemClock::new(), NullSurface::new()).with_probe_worker(worker);

    import_all(&mut session, &cli.media)?;

    if let Some(secs) = cli.play {
        play_for(&mut session, secs);
    }

    print_edit_list(session.timeline());

    if let Some(path) = &cli.save {
        ProjectFile::new(session.timeline().document())
            .save_to_file(path)
            .with_context(|| format!("saving project {}", path.display()))?;
        info!(path = %path.display(), "Project saved");
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn kind_for(path: &Path) -> ClipKind {
    let is_audio = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| AUDIO_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()));
    if is_audio {
        ClipKind::Audio
    } else {
        ClipKind::Video
    }
}

/// Queue every file, then tick until all completions have landed. Files are
/// submitted in order and the worker answers in order, so clips append in
/// command-line order.
fn import_all(session: &mut EditorSession<SystemClock, NullSurface>, media: &[PathBuf]) -> Result<()> {
    for path in media {
        session.import(path.clone(), kind_for(path), 0)?;
    }

    let deadline = Instant::now() + IMPORT_TIMEOUT;
    while session.timeline().pending_imports() > 0 {
        if Instant::now() > deadline {
            bail!(
                "timed out waiting for {} probe(s)",
                session.timeline().pending_imports()
            );
        }
        session.tick();
        std::thread::sleep(Duration::from_millis(10));
    }
    Ok(())
}

fn play_for(session: &mut EditorSession<SystemClock, NullSurface>, secs: f64) {
    let frame = Duration::from_secs_f64(1.0 / 30.0);
    let run_for = Duration::from_secs_f64(secs.max(0.0));
    let started = Instant::now();

    session.seek_to(RationalTime::ZERO);
    session.play();
    while started.elapsed() < run_for && session.playback().state() == PlaybackState::Playing {
        std::thread::sleep(frame);
        session.tick();
    }
    session.pause();
    info!(
        playhead = %session.playback().current_time(),
        seeks = session.surface().seek_count(),
        "Playback finished"
    );
}

fn print_edit_list(timeline: &Timeline) {
    let settings = timeline.settings();
    println!(
        "{} | {} {} @ {} | duration {}",
        settings.name,
        settings.aspect_ratio,
        settings.resolution,
        settings.frame_rate,
        timeline.duration().to_timecode(settings.frame_rate)
    );

    for kind in [ClipKind::Video, ClipKind::Audio, ClipKind::Text] {
        for lane in timeline.tracks().lanes(kind) {
            for (id, range) in timeline.clips_on_lane(kind, lane.index) {
                let detail = match kind {
                    ClipKind::Video => timeline.video_clip(id).map(|c| source_span(&c.base)),
                    ClipKind::Audio => timeline.audio_clip(id).map(|c| source_span(&c.base)),
                    ClipKind::Text => timeline.text_overlay(id).map(|t| format!("\"{}\"", t.text)),
                };
                println!(
                    "{:<3} | {} | {} | {}",
                    lane.name,
                    range.start,
                    range.end(),
                    detail.unwrap_or_default()
                );
            }
        }
    }
}

fn source_span(base: &splice_timeline::ClipBase) -> String {
    format!(
        "in {} out {} | {}",
        base.trim_start,
        base.source_duration - base.trim_end,
        base.name
    )
}
