//! Integration tests for the timeline engine.
//!
//! Walks the reference editing scenarios end to end and checks the
//! cross-cutting guarantees: lock enforcement, rejected edits leaving no
//! trace, undo restoring state, and persistence.

use splice_core::{EditorConfig, RationalTime, RippleScope};
use splice_timeline::{
    ClipKind, EditCommand, EditError, FilterPatch, FilterSet, MediaRef, NewClip, NewText,
    ProjectFile, ProjectSettings, Timeline, TransitionEdge, TransitionKind,
};
use uuid::Uuid;

// ── Helpers ────────────────────────────────────────────────────

fn secs(s: i64) -> RationalTime {
    RationalTime::from_secs(s)
}

fn video(name: &str, duration: i64) -> NewClip {
    NewClip::new(name, MediaRef::new(format!("media/{name}.mp4")), secs(duration))
}

fn document_json(timeline: &Timeline) -> Vec<u8> {
    serde_json::to_vec(&timeline.document()).unwrap()
}

/// Scenarios A through C: add, trim the tail, split.
fn split_scenario() -> (Timeline, Uuid, Uuid) {
    let mut timeline = Timeline::default();
    let a = timeline.add_clip(ClipKind::Video, video("shot", 10)).unwrap();
    timeline.trim_end(a, secs(2)).unwrap();
    let b = timeline.split_at(a, secs(5)).unwrap();
    (timeline, a, b)
}

// ── Reference scenarios ────────────────────────────────────────

#[test]
fn scenario_a_add_uses_duration_floor() {
    let mut timeline = Timeline::default();
    let id = timeline.add_clip(ClipKind::Video, video("shot", 10)).unwrap();
    let range = timeline.occupancy(id).unwrap();
    assert_eq!((range.start, range.end()), (secs(0), secs(10)));
    assert_eq!(timeline.duration(), secs(60));
}

#[test]
fn scenario_b_trim_end() {
    let mut timeline = Timeline::default();
    let id = timeline.add_clip(ClipKind::Video, video("shot", 10)).unwrap();
    timeline.trim_end(id, secs(2)).unwrap();
    assert_eq!(timeline.occupancy(id).unwrap().end(), secs(8));
}

#[test]
fn scenario_c_split_preserves_occupancy() {
    let (timeline, a, b) = split_scenario();
    let left = timeline.video_clip(a).unwrap();
    let right = timeline.video_clip(b).unwrap();

    assert_eq!(left.base.start_time, secs(0));
    assert_eq!(left.base.trim_start, secs(0));
    assert_eq!(left.base.trim_end, secs(5));
    assert_eq!(right.base.start_time, secs(5));
    assert_eq!(right.base.trim_start, secs(5));
    assert_eq!(right.base.trim_end, secs(2));

    let joined = left.base.occupancy().join(right.base.occupancy()).unwrap();
    assert_eq!((joined.start, joined.end()), (secs(0), secs(8)));
    assert_eq!(
        left.base.effective_duration() + right.base.effective_duration(),
        secs(8)
    );
}

#[test]
fn scenario_e_ripple_delete() {
    let mut timeline = Timeline::default();
    let first = timeline.add_clip(ClipKind::Video, video("a", 10)).unwrap();
    timeline.trim_end(first, secs(2)).unwrap();
    let second = timeline.add_clip(ClipKind::Video, video("b", 4)).unwrap();
    timeline.move_clip(second, secs(10)).unwrap();

    timeline.ripple_delete(first).unwrap();
    assert_eq!(timeline.video_clip(second).unwrap().base.start_time, secs(2));
}

#[test]
fn ripple_all_lanes_is_configurable() {
    let config = EditorConfig {
        ripple_scope: RippleScope::AllLanes,
        ..Default::default()
    };
    let mut timeline = Timeline::new(ProjectSettings::default(), config);
    let first = timeline.add_clip(ClipKind::Video, video("a", 8)).unwrap();
    let b_roll = timeline
        .add_clip(ClipKind::Video, video("b", 4).on_track(1))
        .unwrap();
    timeline.move_clip(b_roll, secs(10)).unwrap();

    let shifted = timeline.ripple_delete(first).unwrap();
    assert_eq!(shifted, vec![b_roll]);
    assert_eq!(timeline.video_clip(b_roll).unwrap().base.start_time, secs(2));
}

// ── Duplicate and filters ──────────────────────────────────────

#[test]
fn duplicate_copies_properties() {
    let mut timeline = Timeline::default();
    let id = timeline
        .add_clip(ClipKind::Video, video("a", 10).on_track(2))
        .unwrap();
    timeline
        .apply_filters(
            id,
            FilterPatch {
                contrast: Some(140.0),
                grayscale: Some(true),
                ..Default::default()
            },
        )
        .unwrap();
    timeline
        .set_transition(id, TransitionEdge::Out, TransitionKind::Dissolve)
        .unwrap();
    timeline.set_volume(id, 35.0).unwrap();
    timeline.toggle_mute(id).unwrap();

    let copy = timeline.duplicate_clip(id).unwrap();
    let src = timeline.video_clip(id).unwrap();
    let dup = timeline.video_clip(copy).unwrap();
    assert_eq!(dup.filters, src.filters);
    assert_eq!(dup.transitions, src.transitions);
    assert_eq!(dup.base.volume, src.base.volume);
    assert_eq!(dup.base.muted, src.base.muted);
    assert_eq!(dup.base.locked, src.base.locked);
    assert_eq!(dup.base.track, 2);
    assert_eq!(
        dup.base.start_time,
        src.base.end_time() + RationalTime::new(1, 2)
    );
}

#[test]
fn filters_merge_then_reset() {
    let mut timeline = Timeline::default();
    let id = timeline.add_clip(ClipKind::Video, video("a", 10)).unwrap();
    timeline
        .apply_filters(id, FilterPatch { hue: Some(90.0), ..Default::default() })
        .unwrap();
    timeline
        .apply_filters(id, FilterPatch { invert: Some(true), ..Default::default() })
        .unwrap();
    let filters = timeline.video_clip(id).unwrap().filters;
    assert_eq!(filters.hue, 90.0);
    assert!(filters.invert);

    timeline.reset_filters(id).unwrap();
    assert_eq!(timeline.video_clip(id).unwrap().filters, FilterSet::default());
}

// ── Locks and rejected edits ───────────────────────────────────

#[test]
fn locked_clip_rejects_every_placement_edit() {
    let mut timeline = Timeline::default();
    let id = timeline.add_clip(ClipKind::Video, video("a", 10)).unwrap();
    timeline.toggle_lock(id).unwrap();
    let before = document_json(&timeline);

    let commands = [
        EditCommand::Move { id, start: secs(4) },
        EditCommand::ChangeTrack { id, track: 1 },
        EditCommand::TrimStart { id, trim: secs(1) },
        EditCommand::TrimEnd { id, trim: secs(1) },
        EditCommand::Split { id, at: secs(5) },
        EditCommand::Delete { id },
        EditCommand::RippleDelete { id },
    ];
    for command in commands {
        assert_eq!(timeline.apply(command), Err(EditError::Locked(id)));
    }
    assert_eq!(document_json(&timeline), before);
}

#[test]
fn rejected_split_leaves_no_history() {
    let mut timeline = Timeline::default();
    let id = timeline.add_clip(ClipKind::Video, video("a", 10)).unwrap();
    let before = document_json(&timeline);
    let depth = timeline.history().undo_count();

    let err = timeline.split_at(id, secs(10)).unwrap_err();
    assert!(matches!(err, EditError::OutOfRangeSplit { .. }));
    assert_eq!(document_json(&timeline), before);
    assert_eq!(timeline.history().undo_count(), depth);
}

#[test]
fn text_overlays_cannot_be_trimmed_or_split() {
    let mut timeline = Timeline::default();
    let id = timeline.add_text(NewText::new("Title")).unwrap();
    assert!(matches!(
        timeline.split_at(id, RationalTime::new(3, 2)),
        Err(EditError::NotApplicable { .. })
    ));
    assert!(matches!(
        timeline.trim_start(id, secs(1)),
        Err(EditError::NotApplicable { .. })
    ));
}

// ── Undo ───────────────────────────────────────────────────────

#[test]
fn undo_walks_back_a_whole_session() {
    let mut timeline = Timeline::default();
    let empty = document_json(&timeline);

    let a = timeline.add_clip(ClipKind::Video, video("a", 10)).unwrap();
    timeline.trim_start(a, secs(2)).unwrap();
    let b = timeline.split_at(a, secs(6)).unwrap();
    timeline.ripple_delete(b).unwrap();
    timeline.add_text(NewText::new("end")).unwrap();
    let edited = document_json(&timeline);

    while timeline.undo() {}
    assert_eq!(document_json(&timeline), empty);
    assert_eq!(timeline.duration(), secs(60));

    while timeline.redo() {}
    assert_eq!(document_json(&timeline), edited);
}

#[test]
fn delete_clears_selection_and_undo_does_not_restore_it() {
    let mut timeline = Timeline::default();
    let id = timeline.add_clip(ClipKind::Video, video("a", 10)).unwrap();
    timeline.delete_clip(id).unwrap();
    assert!(timeline.selection().is_empty());
    assert!(timeline.undo());
    assert!(timeline.contains(id));
    assert!(timeline.selection().is_empty());
}

// ── Persistence ────────────────────────────────────────────────

#[test]
fn project_file_round_trip_through_disk() {
    let (timeline, _, b) = split_scenario();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("split.json");
    ProjectFile::new(timeline.document())
        .save_to_file(&path)
        .unwrap();

    let loaded = ProjectFile::load_from_file(&path).unwrap();
    let restored = Timeline::from_document(loaded.project, EditorConfig::default()).unwrap();
    assert_eq!(restored.document(), timeline.document());
    assert_eq!(
        restored.active_video_clip(secs(6)).map(|c| c.base.id),
        Some(b)
    );
}
