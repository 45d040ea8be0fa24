//! Integration tests for the import path: probe worker → session → timeline.

use splice_core::{RationalTime, Result, SpliceError};
use splice_media::{MediaProbe, ProbeWorker, Prober};
use splice_playback::{EditorSession, NullSurface, VirtualClock};
use splice_timeline::{ClipKind, ImportCompletion, MediaRef, Timeline};
use std::path::Path;
use std::time::{Duration, Instant};
use uuid::Uuid;

type Session = EditorSession<VirtualClock, NullSurface>;

/// Durations come from the file stem: `clip-7.mp4` is seven seconds long.
/// Anything without a number fails to probe.
struct StemProber;

impl Prober for StemProber {
    fn probe(&self, path: &Path) -> Result<MediaProbe> {
        let seconds = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .and_then(|stem| stem.rsplit('-').next())
            .and_then(|n| n.parse::<i64>().ok())
            .ok_or_else(|| SpliceError::Probe(format!("unreadable {}", path.display())))?;
        Ok(MediaProbe {
            has_video: true,
            ..MediaProbe::fallback(path, RationalTime::from_secs(seconds))
        })
    }
}

fn session() -> Session {
    let worker = ProbeWorker::spawn(StemProber, RationalTime::from_secs(10)).unwrap();
    EditorSession::new(Timeline::default(), VirtualClock::new(), NullSurface::new())
        .with_probe_worker(worker)
}

/// Tick until no import is pending. Returns every clip created on the way.
fn settle(session: &mut Session) -> Vec<Uuid> {
    let deadline = Instant::now() + Duration::from_secs(5);
    let mut created = Vec::new();
    while session.timeline().pending_imports() > 0 {
        assert!(Instant::now() < deadline, "imports never completed");
        created.extend(session.tick());
        std::thread::sleep(Duration::from_millis(1));
    }
    created
}

#[test]
fn imports_append_in_submission_order() {
    let mut session = session();
    session.import("media/intro-4.mp4", ClipKind::Video, 0).unwrap();
    session.import("media/body-6.mp4", ClipKind::Video, 0).unwrap();
    let created = settle(&mut session);
    assert_eq!(created.len(), 2);

    let timeline = session.timeline();
    let first = timeline.video_clip(created[0]).unwrap();
    let second = timeline.video_clip(created[1]).unwrap();
    assert_eq!(first.base.name, "intro-4.mp4");
    assert_eq!(first.base.source_duration, RationalTime::from_secs(4));
    assert_eq!(second.base.start_time, RationalTime::from_secs(4));
    assert_eq!(timeline.selection().id(), Some(created[1]));
}

#[test]
fn failed_probe_imports_with_fallback_duration() {
    let mut session = session();
    session.import("media/voiceover.wav", ClipKind::Audio, 1).unwrap();
    let created = settle(&mut session);

    let clip = session.timeline().audio_clip(created[0]).unwrap();
    assert_eq!(clip.base.source_duration, RationalTime::from_secs(10));
    assert_eq!(clip.base.track, 1);
}

#[test]
fn cancelled_import_never_creates_a_clip() {
    let mut session = session();
    let cancelled = session.import("media/drop-3.mp4", ClipKind::Video, 0).unwrap();
    assert!(session.cancel_import(cancelled.id));
    session.import("media/keep-5.mp4", ClipKind::Video, 0).unwrap();

    // The worker answers in order, so by the time "keep" lands the stale
    // completion for "drop" has been drained and ignored.
    let created = settle(&mut session);
    assert_eq!(created.len(), 1);
    assert_eq!(session.timeline().video_clips().len(), 1);
    assert_eq!(
        session.timeline().video_clips()[0].base.media,
        MediaRef::new("media/keep-5.mp4")
    );
}

#[test]
fn completion_after_delete_of_request_is_ignored() {
    let mut session = session();
    let ticket = session.import("media/late-2.mp4", ClipKind::Video, 0).unwrap();
    session.cancel_import(ticket.id);

    let stale = ImportCompletion {
        ticket,
        name: "late-2.mp4".into(),
        media: MediaRef::new("media/late-2.mp4"),
        duration: RationalTime::from_secs(2),
        thumbnail: None,
        fallback: false,
    };
    assert_eq!(session.deliver(stale), Ok(None));
    assert!(session.timeline().is_empty());
    assert!(!session.timeline().history().can_undo());
}

#[test]
fn import_to_missing_lane_is_rejected_up_front() {
    let mut session = session();
    let err = session.import("media/x-1.mp4", ClipKind::Video, 9).unwrap_err();
    assert!(matches!(err, SpliceError::InvalidParameter(_)));
    assert_eq!(session.timeline().pending_imports(), 0);
}

#[test]
fn imported_clip_becomes_active_under_playhead() {
    let mut session = session();
    session.import("media/a-3.mp4", ClipKind::Video, 0).unwrap();
    let created = settle(&mut session);
    assert_eq!(
        session.playback().active_clip().map(|clip| clip.id),
        created.first().copied()
    );
}
