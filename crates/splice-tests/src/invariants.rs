//! Property tests: clip invariants hold after arbitrary edit sequences.

use proptest::prelude::*;
use splice_core::RationalTime;
use splice_timeline::{ClipKind, EditCommand, MediaRef, NewClip, Timeline, TimelineItem};

/// An edit against the n-th clip (modulo the clip count), with times in
/// tenths of a second.
#[derive(Debug, Clone)]
enum Op {
    Add { tenths: i64, track: u8, audio: bool },
    Move { pick: usize, tenths: i64 },
    TrimStart { pick: usize, tenths: i64 },
    TrimEnd { pick: usize, tenths: i64 },
    Split { pick: usize, tenths: i64 },
    Duplicate { pick: usize },
    Delete { pick: usize },
    Ripple { pick: usize },
    Lock { pick: usize },
    Undo,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (1i64..300, 0u8..3, any::<bool>()).prop_map(|(tenths, track, audio)| Op::Add {
            tenths,
            track,
            audio
        }),
        (any::<usize>(), -50i64..600).prop_map(|(pick, tenths)| Op::Move { pick, tenths }),
        (any::<usize>(), -50i64..400).prop_map(|(pick, tenths)| Op::TrimStart { pick, tenths }),
        (any::<usize>(), -50i64..400).prop_map(|(pick, tenths)| Op::TrimEnd { pick, tenths }),
        (any::<usize>(), 0i64..600).prop_map(|(pick, tenths)| Op::Split { pick, tenths }),
        any::<usize>().prop_map(|pick| Op::Duplicate { pick }),
        any::<usize>().prop_map(|pick| Op::Delete { pick }),
        any::<usize>().prop_map(|pick| Op::Ripple { pick }),
        any::<usize>().prop_map(|pick| Op::Lock { pick }),
        Just(Op::Undo),
    ]
}

fn tenths(n: i64) -> RationalTime {
    RationalTime::new(n, 10)
}

fn media_ids(timeline: &Timeline) -> Vec<uuid::Uuid> {
    timeline
        .video_clips()
        .iter()
        .map(|c| c.id())
        .chain(timeline.audio_clips().iter().map(|c| c.id()))
        .collect()
}

fn run(timeline: &mut Timeline, op: Op) {
    let ids = media_ids(timeline);
    let target = |pick: usize| ids.get(pick % ids.len().max(1)).copied();
    let command = match op {
        Op::Add { tenths: t, track, audio } => {
            let kind = if audio { ClipKind::Audio } else { ClipKind::Video };
            Some(EditCommand::AddClip {
                kind,
                clip: NewClip::new("clip", MediaRef::new("clip.mp4"), tenths(t)).on_track(track),
            })
        }
        Op::Move { pick, tenths: t } => target(pick).map(|id| EditCommand::Move { id, start: tenths(t) }),
        Op::TrimStart { pick, tenths: t } => {
            target(pick).map(|id| EditCommand::TrimStart { id, trim: tenths(t) })
        }
        Op::TrimEnd { pick, tenths: t } => {
            target(pick).map(|id| EditCommand::TrimEnd { id, trim: tenths(t) })
        }
        Op::Split { pick, tenths: t } => target(pick).map(|id| EditCommand::Split { id, at: tenths(t) }),
        Op::Duplicate { pick } => target(pick).map(|id| EditCommand::Duplicate { id }),
        Op::Delete { pick } => target(pick).map(|id| EditCommand::Delete { id }),
        Op::Ripple { pick } => target(pick).map(|id| EditCommand::RippleDelete { id }),
        Op::Lock { pick } => target(pick).map(|id| EditCommand::ToggleLock { id }),
        Op::Undo => {
            timeline.undo();
            None
        }
    };
    if let Some(command) = command {
        // Rejections (locked, out-of-range split) are expected here.
        let _ = timeline.apply(command);
    }
}

fn check_invariants(timeline: &Timeline) -> Result<(), TestCaseError> {
    let min = timeline.config().min_clip_length();
    let bases = timeline
        .video_clips()
        .iter()
        .map(|c| &c.base)
        .chain(timeline.audio_clips().iter().map(|c| &c.base));
    let mut furthest = RationalTime::ZERO;
    for base in bases {
        prop_assert!(!base.start_time.is_negative());
        prop_assert!(!base.trim_start.is_negative());
        prop_assert!(!base.trim_end.is_negative());
        prop_assert!(base.trim_start + base.trim_end < base.source_duration);
        prop_assert!(base.effective_duration() >= min);
        furthest = furthest.max(base.end_time());
    }
    for overlay in timeline.text_overlays() {
        furthest = furthest.max(overlay.end_time());
    }
    prop_assert!(timeline.duration() >= RationalTime::from_secs(60));
    prop_assert!(timeline.duration() >= furthest);
    Ok(())
}

proptest! {
    #[test]
    fn invariants_hold_after_any_edit_sequence(ops in prop::collection::vec(op(), 1..40)) {
        let mut timeline = Timeline::default();
        for op in ops {
            run(&mut timeline, op);
            check_invariants(&timeline)?;
        }
    }

    #[test]
    fn split_is_occupancy_preserving(
        duration in 5i64..300,
        head in 0i64..100,
        tail in 0i64..100,
        at in 0i64..300,
    ) {
        let mut timeline = Timeline::default();
        let id = timeline
            .add_clip(ClipKind::Video, NewClip::new("c", MediaRef::new("c.mp4"), tenths(duration)))
            .unwrap();
        timeline.trim_start(id, tenths(head)).unwrap();
        timeline.trim_end(id, tenths(tail)).unwrap();
        let before = timeline.occupancy(id).unwrap();

        if let Ok(right) = timeline.split_at(id, tenths(at)) {
            let left = timeline.occupancy(id).unwrap();
            let right = timeline.occupancy(right).unwrap();
            prop_assert_eq!(left.duration + right.duration, before.duration);
            prop_assert_eq!(left.join(right), Some(before));
        } else {
            prop_assert_eq!(timeline.occupancy(id), Some(before));
        }
    }

    #[test]
    fn trim_start_is_reversible(
        duration in 10i64..300,
        start in 0i64..200,
        first in 0i64..50,
        second in 0i64..50,
    ) {
        let mut timeline = Timeline::default();
        let id = timeline
            .add_clip(ClipKind::Video, NewClip::new("c", MediaRef::new("c.mp4"), tenths(duration)))
            .unwrap();
        timeline.move_clip(id, tenths(start)).unwrap();
        timeline.trim_start(id, tenths(first)).unwrap();
        let original = timeline.video_clip(id).unwrap().base.clone();

        timeline.trim_start(id, tenths(second)).unwrap();
        timeline.trim_start(id, original.trim_start).unwrap();
        let restored = &timeline.video_clip(id).unwrap().base;
        prop_assert_eq!(restored.trim_start, original.trim_start);
        prop_assert_eq!(restored.start_time, original.start_time);
    }

    #[test]
    fn undo_everything_returns_to_empty(ops in prop::collection::vec(op(), 1..25)) {
        let mut timeline = Timeline::default();
        for op in ops {
            run(&mut timeline, op);
        }
        while timeline.undo() {}
        prop_assert!(timeline.is_empty());
        prop_assert_eq!(timeline.duration(), RationalTime::from_secs(60));
    }
}
