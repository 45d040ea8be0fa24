//! Integration tests for playback driven through the editor session.

use splice_core::RationalTime;
use splice_playback::{EditorSession, NullSurface, PlaybackState, PlaybackSurface, VirtualClock};
use splice_timeline::{ClipKind, EditCommand, MediaRef, NewClip, Timeline};
use uuid::Uuid;

type Session = EditorSession<VirtualClock, NullSurface>;

fn secs(s: i64) -> RationalTime {
    RationalTime::from_secs(s)
}

fn session() -> Session {
    EditorSession::new(Timeline::default(), VirtualClock::new(), NullSurface::new())
}

fn add_video(session: &mut Session, media: &str, duration: i64) -> Uuid {
    session
        .edit(EditCommand::AddClip {
            kind: ClipKind::Video,
            clip: NewClip::new(media, MediaRef::new(media), secs(duration)),
        })
        .unwrap()
        .created
        .unwrap()
}

fn advance(session: &mut Session, by: f64) {
    session.clock_mut().advance(by);
    session.tick();
}

#[test]
fn scenario_d_seek_lands_in_split_tail() {
    let mut session = session();
    let id = add_video(&mut session, "shot.mp4", 10);
    session
        .edit(EditCommand::TrimEnd { id, trim: secs(2) })
        .unwrap();
    let tail = session
        .edit(EditCommand::Split { id, at: secs(5) })
        .unwrap()
        .created
        .unwrap();

    session.seek_to(secs(6));
    let active = session.playback().active_clip().unwrap();
    assert_eq!(active.id, tail);
    assert_eq!(active.local_position, secs(6));
    assert_eq!(session.surface().position(), 6.0);
}

#[test]
fn playback_crosses_clip_boundary() {
    let mut session = session();
    let first = add_video(&mut session, "a.mp4", 2);
    let second = add_video(&mut session, "b.mp4", 2);
    session.play();

    advance(&mut session, 1.0);
    assert_eq!(session.playback().active_clip().unwrap().id, first);

    advance(&mut session, 1.5);
    let active = session.playback().active_clip().unwrap();
    assert_eq!(active.id, second);
    assert_eq!(active.local_position, RationalTime::new(1, 2));
    assert_eq!(session.surface().source(), Some(&MediaRef::new("b.mp4")));
    assert!(session.surface().is_playing());
}

#[test]
fn playback_through_gap_then_rewinds() {
    let mut session = session();
    add_video(&mut session, "a.mp4", 2);
    session.play();

    advance(&mut session, 3.0);
    assert!(session.playback().active_clip().is_none());
    assert!(session.surface().source().is_none());
    assert_eq!(session.playback().state(), PlaybackState::Playing);

    advance(&mut session, 60.0);
    assert_eq!(session.playback().state(), PlaybackState::Stopped);
    assert_eq!(session.playback().current_time(), RationalTime::ZERO);
    assert_eq!(session.surface().source(), Some(&MediaRef::new("a.mp4")));
    assert!(!session.surface().is_playing());
}

#[test]
fn trim_under_playhead_corrects_position() {
    let mut session = session();
    let id = add_video(&mut session, "a.mp4", 10);
    session.seek_to(secs(4));
    assert_eq!(session.surface().position(), 4.0);

    // Head trim keeps the tail fixed, so the same timeline instant now maps
    // to the same source frame; a move shifts it.
    session
        .edit(EditCommand::TrimStart { id, trim: secs(1) })
        .unwrap();
    assert_eq!(session.playback().active_clip().unwrap().local_position, secs(4));

    session
        .edit(EditCommand::Move { id, start: secs(2) })
        .unwrap();
    assert_eq!(session.playback().active_clip().unwrap().local_position, secs(3));
    assert_eq!(session.surface().position(), 3.0);
}

#[test]
fn master_mute_survives_source_switch() {
    let mut session = session();
    add_video(&mut session, "a.mp4", 2);
    add_video(&mut session, "b.mp4", 2);
    session.set_master_muted(true);
    session.seek_to(secs(3));
    assert!(session.surface().is_muted());
    assert!(session.playback().master_muted());
}

#[test]
fn toggle_play_round_trip() {
    let mut session = session();
    add_video(&mut session, "a.mp4", 5);
    session.toggle_play();
    assert!(session.playback().is_playing());
    advance(&mut session, 1.0);
    session.toggle_play();
    assert!(!session.playback().is_playing());
    advance(&mut session, 1.0);
    assert_eq!(session.playback().current_time(), secs(1));
}
