//! The timeline engine.
//!
//! Owns the clip collections, the lane registry, the selection, the derived
//! project duration and the undo history. All mutation goes through
//! [`Timeline::apply`]; the named helpers below only build commands.

use splice_core::{EditorConfig, RationalTime, RippleScope, TimeRange};
use tracing::{debug, info};
use uuid::Uuid;

use crate::clip::{AudioClip, ClipBase, ClipKind, MediaClip, NewClip, TimelineItem, VideoClip};
use crate::edit::{EditCommand, EditError, EditOutcome, History, TimelineSnapshot};
use crate::filter::{FilterPatch, TransitionEdge, TransitionKind};
use crate::import::{ImportCompletion, ImportRegistry, ImportTicket};
use crate::project::ProjectSettings;
use crate::selection::Selection;
use crate::text::{NewText, TextOverlay, TextPatch};
use crate::track::TrackRegistry;

/// Run `$body` with `$item` bound to the item at `$index` in the collection
/// for `$kind`.
macro_rules! with_item {
    ($self:ident, $kind:expr, $index:expr, |$item:ident| $body:expr) => {
        match $kind {
            ClipKind::Video => {
                let $item = &mut $self.video[$index];
                $body
            }
            ClipKind::Audio => {
                let $item = &mut $self.audio[$index];
                $body
            }
            ClipKind::Text => {
                let $item = &mut $self.text[$index];
                $body
            }
        }
    };
}

/// A single-editor timeline.
#[derive(Debug)]
pub struct Timeline {
    pub(crate) config: EditorConfig,
    pub(crate) settings: ProjectSettings,
    pub(crate) tracks: TrackRegistry,
    pub(crate) video: Vec<VideoClip>,
    pub(crate) audio: Vec<AudioClip>,
    pub(crate) text: Vec<TextOverlay>,
    pub(crate) selection: Selection,
    duration: RationalTime,
    history: History,
    imports: ImportRegistry,
}

impl Timeline {
    /// Create an empty timeline.
    pub fn new(settings: ProjectSettings, config: EditorConfig) -> Self {
        let mut timeline = Self {
            tracks: TrackRegistry::new(config.lanes),
            history: History::new(config.history_depth),
            config,
            settings,
            video: Vec::new(),
            audio: Vec::new(),
            text: Vec::new(),
            selection: Selection::new(),
            duration: RationalTime::ZERO,
            imports: ImportRegistry::new(),
        };
        timeline.recompute_duration();
        timeline
    }

    // ── Single mutation entry point ─────────────────────────────

    /// Apply a command. On error nothing was mutated and no history was
    /// recorded.
    pub fn apply(&mut self, command: EditCommand) -> Result<EditOutcome, EditError> {
        let label = command.label();
        let target = match command.target() {
            Some(id) => {
                let (kind, index) = self.locate(id).ok_or(EditError::ClipNotFound(id))?;
                if command.is_lock_guarded() && self.is_locked(kind, index) {
                    debug!(clip = %id, op = label, "Edit rejected: clip is locked");
                    return Err(EditError::Locked(id));
                }
                Some((id, kind, index))
            }
            None => None,
        };

        let structural = command.is_structural();
        let before = self.snapshot();
        let result = self.execute(command, target);

        match &result {
            Ok(outcome) => {
                self.history.push(label, before);
                if structural {
                    self.recompute_duration();
                }
                debug!(
                    op = label,
                    clip = ?target.map(|(id, _, _)| id),
                    created = ?outcome.created,
                    shifted = outcome.shifted.len(),
                    duration = %self.duration,
                    "Edit applied"
                );
            }
            Err(err) => {
                debug!(op = label, error = %err, "Edit rejected");
            }
        }
        result
    }

    fn execute(
        &mut self,
        command: EditCommand,
        target: Option<(Uuid, ClipKind, usize)>,
    ) -> Result<EditOutcome, EditError> {
        let Some((id, kind, index)) = target else {
            return match command {
                EditCommand::AddClip { kind, clip } => self.add_media(kind, clip),
                EditCommand::AddText(request) => self.add_overlay(request),
                _ => Err(EditError::ClipNotFound(Uuid::nil())),
            };
        };

        match command {
            EditCommand::AddClip { .. } | EditCommand::AddText(_) => {
                Err(not_applicable(id, kind, "add"))
            }
            EditCommand::Move { start, .. } => {
                with_item!(self, kind, index, |item| item.set_start_time(start.non_negative()));
                Ok(EditOutcome::default())
            }
            EditCommand::ChangeTrack { track, .. } => {
                self.check_lane(kind, track)?;
                with_item!(self, kind, index, |item| item.set_track(track));
                Ok(EditOutcome::default())
            }
            EditCommand::TrimStart { trim, .. } => {
                let min = self.config.min_clip_length();
                let base = self.base_mut(id, kind, index, "trim")?;
                apply_trim_start(base, trim, min);
                Ok(EditOutcome::default())
            }
            EditCommand::TrimEnd { trim, .. } => {
                let min = self.config.min_clip_length();
                let base = self.base_mut(id, kind, index, "trim")?;
                apply_trim_end(base, trim, min);
                Ok(EditOutcome::default())
            }
            EditCommand::Split { at, .. } => {
                let min = self.config.min_clip_length();
                let created = match kind {
                    ClipKind::Video => split_clip(&mut self.video, index, at, min)?,
                    ClipKind::Audio => split_clip(&mut self.audio, index, at, min)?,
                    ClipKind::Text => return Err(not_applicable(id, kind, "split")),
                };
                self.selection.select(created, kind);
                Ok(EditOutcome::created(created))
            }
            EditCommand::Duplicate { .. } => {
                let gap = self.config.duplicate_gap();
                let created = match kind {
                    ClipKind::Video => duplicate_item(&mut self.video, index, gap),
                    ClipKind::Audio => duplicate_item(&mut self.audio, index, gap),
                    ClipKind::Text => duplicate_item(&mut self.text, index, gap),
                };
                Ok(EditOutcome::created(created))
            }
            EditCommand::Delete { .. } => {
                self.remove(kind, index);
                self.selection.invalidate(id);
                Ok(EditOutcome::default())
            }
            EditCommand::RippleDelete { .. } => {
                let (start, length, lane) = with_item!(self, kind, index, |item| (
                    item.start_time(),
                    item.effective_duration(),
                    item.track()
                ));
                self.remove(kind, index);
                self.selection.invalidate(id);
                let shifted = self.ripple_after(kind, lane, start, length);
                Ok(EditOutcome {
                    created: None,
                    shifted,
                })
            }
            EditCommand::ToggleLock { .. } => {
                let base = self.base_mut(id, kind, index, "lock")?;
                base.locked = !base.locked;
                Ok(EditOutcome::default())
            }
            EditCommand::ToggleMute { .. } => {
                let base = self.base_mut(id, kind, index, "mute")?;
                base.muted = !base.muted;
                Ok(EditOutcome::default())
            }
            EditCommand::SetVolume { volume, .. } => {
                self.base_mut(id, kind, index, "volume")?.set_volume(volume);
                Ok(EditOutcome::default())
            }
            EditCommand::ToggleVisible { .. } => {
                let clip = self.video_mut(id, kind, index, "visibility")?;
                clip.visible = !clip.visible;
                Ok(EditOutcome::default())
            }
            EditCommand::ApplyFilters { patch, .. } => {
                self.video_mut(id, kind, index, "filters")?
                    .filters
                    .merge(&patch);
                Ok(EditOutcome::default())
            }
            EditCommand::ResetFilters { .. } => {
                self.video_mut(id, kind, index, "filters")?.filters.reset();
                Ok(EditOutcome::default())
            }
            EditCommand::SetTransition {
                edge,
                kind: transition,
                ..
            } => {
                self.video_mut(id, kind, index, "transition")?
                    .transitions
                    .set(edge, transition);
                Ok(EditOutcome::default())
            }
            EditCommand::SetFades {
                fade_in, fade_out, ..
            } => match kind {
                ClipKind::Audio => {
                    self.audio[index].set_fades(fade_in, fade_out);
                    Ok(EditOutcome::default())
                }
                _ => Err(not_applicable(id, kind, "fades")),
            },
            EditCommand::UpdateText { patch, .. } => match kind {
                ClipKind::Text => {
                    self.text[index].apply(&patch);
                    Ok(EditOutcome::default())
                }
                _ => Err(not_applicable(id, kind, "text edit")),
            },
        }
    }

    fn add_media(&mut self, kind: ClipKind, request: NewClip) -> Result<EditOutcome, EditError> {
        self.check_lane(kind, request.track)?;

        let start = self.lane_end(kind, request.track);
        let source_duration = if request.probed_duration > RationalTime::ZERO {
            request.probed_duration
        } else {
            self.config.fallback_probe_duration()
        };
        let min = self.config.min_clip_length();
        if source_duration < min {
            return Err(EditError::SourceTooShort {
                duration: source_duration,
                min,
            });
        }
        let base = ClipBase::new(
            request.name,
            request.media,
            source_duration,
            start,
            request.track,
        );
        let id = base.id;
        match kind {
            ClipKind::Video => {
                let mut clip = VideoClip::new(base);
                clip.thumbnail = request.thumbnail;
                self.video.push(clip);
            }
            ClipKind::Audio => self.audio.push(AudioClip::new(base)),
            ClipKind::Text => return Err(not_applicable(id, kind, "add media clip")),
        }
        self.selection.select(id, kind);
        Ok(EditOutcome::created(id))
    }

    fn add_overlay(&mut self, request: NewText) -> Result<EditOutcome, EditError> {
        self.check_lane(ClipKind::Text, request.track)?;
        let start = self.lane_end(ClipKind::Text, request.track);
        let overlay = TextOverlay::from_request(request, start);
        let id = overlay.id;
        self.text.push(overlay);
        self.selection.select(id, ClipKind::Text);
        Ok(EditOutcome::created(id))
    }

    fn remove(&mut self, kind: ClipKind, index: usize) {
        match kind {
            ClipKind::Video => {
                self.video.remove(index);
            }
            ClipKind::Audio => {
                self.audio.remove(index);
            }
            ClipKind::Text => {
                self.text.remove(index);
            }
        }
    }

    fn ripple_after(
        &mut self,
        kind: ClipKind,
        lane: u8,
        after: RationalTime,
        by: RationalTime,
    ) -> Vec<Uuid> {
        let mut shifted = Vec::new();
        match self.config.ripple_scope {
            RippleScope::SameLane => match kind {
                ClipKind::Video => shift_later(&mut self.video, after, by, Some(lane), &mut shifted),
                ClipKind::Audio => shift_later(&mut self.audio, after, by, Some(lane), &mut shifted),
                ClipKind::Text => shift_later(&mut self.text, after, by, Some(lane), &mut shifted),
            },
            RippleScope::AllLanes => {
                shift_later(&mut self.video, after, by, None, &mut shifted);
                shift_later(&mut self.audio, after, by, None, &mut shifted);
                shift_later(&mut self.text, after, by, None, &mut shifted);
            }
        }
        shifted
    }

    fn base_mut(
        &mut self,
        id: Uuid,
        kind: ClipKind,
        index: usize,
        operation: &'static str,
    ) -> Result<&mut ClipBase, EditError> {
        match kind {
            ClipKind::Video => Ok(&mut self.video[index].base),
            ClipKind::Audio => Ok(&mut self.audio[index].base),
            ClipKind::Text => Err(not_applicable(id, kind, operation)),
        }
    }

    fn video_mut(
        &mut self,
        id: Uuid,
        kind: ClipKind,
        index: usize,
        operation: &'static str,
    ) -> Result<&mut VideoClip, EditError> {
        match kind {
            ClipKind::Video => Ok(&mut self.video[index]),
            _ => Err(not_applicable(id, kind, operation)),
        }
    }

    fn check_lane(&self, kind: ClipKind, track: u8) -> Result<(), EditError> {
        self.tracks.validate(kind, track)
    }

    fn is_locked(&self, kind: ClipKind, index: usize) -> bool {
        match kind {
            ClipKind::Video => self.video[index].locked(),
            ClipKind::Audio => self.audio[index].locked(),
            ClipKind::Text => self.text[index].locked(),
        }
    }

    /// End of the last occupancy on a lane, or zero for an empty lane.
    fn lane_end(&self, kind: ClipKind, track: u8) -> RationalTime {
        fn furthest<T: TimelineItem>(items: &[T], track: u8) -> RationalTime {
            items
                .iter()
                .filter(|item| item.track() == track)
                .map(|item| item.end_time())
                .max()
                .unwrap_or(RationalTime::ZERO)
        }
        match kind {
            ClipKind::Video => furthest(&self.video, track),
            ClipKind::Audio => furthest(&self.audio, track),
            ClipKind::Text => furthest(&self.text, track),
        }
    }

    /// Recompute the derived duration: the furthest occupancy end across every
    /// lane, never below the configured floor.
    pub fn recompute_duration(&mut self) -> RationalTime {
        let furthest = self
            .video
            .iter()
            .map(|c| c.end_time())
            .chain(self.audio.iter().map(|c| c.end_time()))
            .chain(self.text.iter().map(|t| t.end_time()))
            .max()
            .unwrap_or(RationalTime::ZERO);
        self.duration = std::cmp::max(furthest, self.config.duration_floor());
        self.duration
    }

    // ── Undo / redo ─────────────────────────────────────────────

    pub(crate) fn snapshot(&self) -> TimelineSnapshot {
        TimelineSnapshot {
            video: self.video.clone(),
            audio: self.audio.clone(),
            text: self.text.clone(),
        }
    }

    fn restore(&mut self, snapshot: TimelineSnapshot) {
        self.video = snapshot.video;
        self.audio = snapshot.audio;
        self.text = snapshot.text;
        self.recompute_duration();
        let video = &self.video;
        let audio = &self.audio;
        let text = &self.text;
        self.selection.retain(|id, kind| match kind {
            ClipKind::Video => video.iter().any(|c| c.base.id == id),
            ClipKind::Audio => audio.iter().any(|c| c.base.id == id),
            ClipKind::Text => text.iter().any(|t| t.id == id),
        });
    }

    /// Revert the last edit. Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let current = self.snapshot();
        match self.history.undo(current) {
            Some(entry) => {
                debug!(op = entry.label, "Undo");
                self.restore(entry.snapshot);
                true
            }
            None => false,
        }
    }

    /// Re-apply the last undone edit. Returns false when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let current = self.snapshot();
        match self.history.redo(current) {
            Some(entry) => {
                debug!(op = entry.label, "Redo");
                self.restore(entry.snapshot);
                true
            }
            None => false,
        }
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    // ── Imports ─────────────────────────────────────────────────

    /// Register an import whose probe result will arrive later.
    pub fn request_import(&mut self, kind: ClipKind, track: u8) -> Result<ImportTicket, EditError> {
        if kind == ClipKind::Text {
            return Err(not_applicable(Uuid::nil(), kind, "import"));
        }
        self.check_lane(kind, track)?;
        Ok(self.imports.issue(kind, track))
    }

    /// Withdraw a pending import so its completion is ignored.
    pub fn cancel_import(&mut self, ticket_id: Uuid) -> bool {
        self.imports.cancel(ticket_id)
    }

    /// Turn a probe completion into a clip. Completions for tickets that are
    /// no longer pending are dropped and yield `Ok(None)`.
    pub fn complete_import(
        &mut self,
        completion: ImportCompletion,
    ) -> Result<Option<Uuid>, EditError> {
        let ticket = completion.ticket;
        if self.imports.redeem(ticket.id).is_none() {
            debug!(ticket = %ticket.id, "Ignoring stale import completion");
            return Ok(None);
        }
        info!(
            ticket = %ticket.id,
            media = %completion.media,
            duration = %completion.duration,
            fallback = completion.fallback,
            "Import completed"
        );
        let outcome = self.apply(EditCommand::AddClip {
            kind: ticket.kind,
            clip: completion.into_new_clip(),
        })?;
        Ok(outcome.created)
    }

    pub fn pending_imports(&self) -> usize {
        self.imports.pending_count()
    }

    // ── Named operations ────────────────────────────────────────

    /// Append a media clip to the end of its lane and select it.
    pub fn add_clip(&mut self, kind: ClipKind, clip: NewClip) -> Result<Uuid, EditError> {
        self.apply(EditCommand::AddClip { kind, clip })?
            .created
            .ok_or(EditError::MissingCreatedClip { operation: "add clip" })
    }

    /// Append a text overlay to the end of its lane and select it.
    pub fn add_text(&mut self, text: NewText) -> Result<Uuid, EditError> {
        self.apply(EditCommand::AddText(text))?
            .created
            .ok_or(EditError::MissingCreatedClip { operation: "add text" })
    }

    pub fn move_clip(&mut self, id: Uuid, start: RationalTime) -> Result<(), EditError> {
        self.apply(EditCommand::Move { id, start }).map(drop)
    }

    pub fn change_track(&mut self, id: Uuid, track: u8) -> Result<(), EditError> {
        self.apply(EditCommand::ChangeTrack { id, track }).map(drop)
    }

    pub fn trim_start(&mut self, id: Uuid, trim: RationalTime) -> Result<(), EditError> {
        self.apply(EditCommand::TrimStart { id, trim }).map(drop)
    }

    pub fn trim_end(&mut self, id: Uuid, trim: RationalTime) -> Result<(), EditError> {
        self.apply(EditCommand::TrimEnd { id, trim }).map(drop)
    }

    /// Split at a timeline time. Returns the id of the right half; the left
    /// half keeps the original id.
    pub fn split_at(&mut self, id: Uuid, at: RationalTime) -> Result<Uuid, EditError> {
        self.apply(EditCommand::Split { id, at })?
            .created
            .ok_or(EditError::MissingCreatedClip { operation: "split" })
    }

    pub fn duplicate_clip(&mut self, id: Uuid) -> Result<Uuid, EditError> {
        self.apply(EditCommand::Duplicate { id })?
            .created
            .ok_or(EditError::MissingCreatedClip { operation: "duplicate" })
    }

    pub fn delete_clip(&mut self, id: Uuid) -> Result<(), EditError> {
        self.apply(EditCommand::Delete { id }).map(drop)
    }

    /// Delete and close the gap. Returns the ids of the clips that moved.
    pub fn ripple_delete(&mut self, id: Uuid) -> Result<Vec<Uuid>, EditError> {
        Ok(self.apply(EditCommand::RippleDelete { id })?.shifted)
    }

    pub fn toggle_lock(&mut self, id: Uuid) -> Result<(), EditError> {
        self.apply(EditCommand::ToggleLock { id }).map(drop)
    }

    pub fn toggle_mute(&mut self, id: Uuid) -> Result<(), EditError> {
        self.apply(EditCommand::ToggleMute { id }).map(drop)
    }

    pub fn toggle_visible(&mut self, id: Uuid) -> Result<(), EditError> {
        self.apply(EditCommand::ToggleVisible { id }).map(drop)
    }

    pub fn set_volume(&mut self, id: Uuid, volume: f32) -> Result<(), EditError> {
        self.apply(EditCommand::SetVolume { id, volume }).map(drop)
    }

    pub fn set_fades(
        &mut self,
        id: Uuid,
        fade_in: RationalTime,
        fade_out: RationalTime,
    ) -> Result<(), EditError> {
        self.apply(EditCommand::SetFades {
            id,
            fade_in,
            fade_out,
        })
        .map(drop)
    }

    pub fn apply_filters(&mut self, id: Uuid, patch: FilterPatch) -> Result<(), EditError> {
        self.apply(EditCommand::ApplyFilters { id, patch }).map(drop)
    }

    pub fn reset_filters(&mut self, id: Uuid) -> Result<(), EditError> {
        self.apply(EditCommand::ResetFilters { id }).map(drop)
    }

    pub fn set_transition(
        &mut self,
        id: Uuid,
        edge: TransitionEdge,
        kind: TransitionKind,
    ) -> Result<(), EditError> {
        self.apply(EditCommand::SetTransition { id, edge, kind })
            .map(drop)
    }

    pub fn update_text(&mut self, id: Uuid, patch: TextPatch) -> Result<(), EditError> {
        self.apply(EditCommand::UpdateText { id, patch }).map(drop)
    }

    // ── Selection ───────────────────────────────────────────────

    /// Bind a clip to the property panel.
    pub fn select(&mut self, id: Uuid) -> Result<(), EditError> {
        let (kind, _) = self.locate(id).ok_or(EditError::ClipNotFound(id))?;
        self.selection.select(id, kind);
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    // ── Queries ─────────────────────────────────────────────────

    /// Find which collection holds `id` and where.
    pub fn locate(&self, id: Uuid) -> Option<(ClipKind, usize)> {
        if let Some(i) = self.video.iter().position(|c| c.base.id == id) {
            return Some((ClipKind::Video, i));
        }
        if let Some(i) = self.audio.iter().position(|c| c.base.id == id) {
            return Some((ClipKind::Audio, i));
        }
        self.text
            .iter()
            .position(|t| t.id == id)
            .map(|i| (ClipKind::Text, i))
    }

    pub fn clip_kind(&self, id: Uuid) -> Option<ClipKind> {
        self.locate(id).map(|(kind, _)| kind)
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.locate(id).is_some()
    }

    pub fn video_clips(&self) -> &[VideoClip] {
        &self.video
    }

    pub fn audio_clips(&self) -> &[AudioClip] {
        &self.audio
    }

    pub fn text_overlays(&self) -> &[TextOverlay] {
        &self.text
    }

    pub fn video_clip(&self, id: Uuid) -> Option<&VideoClip> {
        self.video.iter().find(|c| c.base.id == id)
    }

    pub fn audio_clip(&self, id: Uuid) -> Option<&AudioClip> {
        self.audio.iter().find(|c| c.base.id == id)
    }

    pub fn text_overlay(&self, id: Uuid) -> Option<&TextOverlay> {
        self.text.iter().find(|t| t.id == id)
    }

    /// Occupancy of a clip of any kind.
    pub fn occupancy(&self, id: Uuid) -> Option<TimeRange> {
        let (kind, index) = self.locate(id)?;
        Some(match kind {
            ClipKind::Video => self.video[index].occupancy(),
            ClipKind::Audio => self.audio[index].occupancy(),
            ClipKind::Text => self.text[index].occupancy(),
        })
    }

    /// Items on one lane as `(id, occupancy)`, ordered by start time.
    pub fn clips_on_lane(&self, kind: ClipKind, track: u8) -> Vec<(Uuid, TimeRange)> {
        fn collect<T: TimelineItem>(items: &[T], track: u8) -> Vec<(Uuid, TimeRange)> {
            items
                .iter()
                .filter(|item| item.track() == track)
                .map(|item| (item.id(), item.occupancy()))
                .collect()
        }
        let mut items = match kind {
            ClipKind::Video => collect(&self.video, track),
            ClipKind::Audio => collect(&self.audio, track),
            ClipKind::Text => collect(&self.text, track),
        };
        items.sort_by_key(|(_, range)| range.start);
        items
    }

    /// The clip on the primary video lane whose occupancy contains `time`.
    /// Overlaps resolve to the earliest inserted clip.
    pub fn active_video_clip(&self, time: RationalTime) -> Option<&VideoClip> {
        self.video.iter().find(|clip| {
            clip.base.track == TrackRegistry::PRIMARY_VIDEO_LANE && clip.occupancy().contains(time)
        })
    }

    /// Derived project duration.
    pub fn duration(&self) -> RationalTime {
        self.duration
    }

    pub fn settings(&self) -> &ProjectSettings {
        &self.settings
    }

    /// Settings edits never touch clips or the duration.
    pub fn settings_mut(&mut self) -> &mut ProjectSettings {
        &mut self.settings
    }

    pub fn tracks(&self) -> &TrackRegistry {
        &self.tracks
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn is_empty(&self) -> bool {
        self.video.is_empty() && self.audio.is_empty() && self.text.is_empty()
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new(ProjectSettings::default(), EditorConfig::default())
    }
}

// ── Edit helpers ────────────────────────────────────────────────

fn not_applicable(id: Uuid, kind: ClipKind, operation: &'static str) -> EditError {
    EditError::NotApplicable {
        id,
        kind,
        operation,
    }
}

/// Head trim: the tail of the occupancy stays fixed while the start slides.
/// The lower bound keeps the start from crossing zero.
fn apply_trim_start(base: &mut ClipBase, requested: RationalTime, min: RationalTime) {
    let lo = (base.trim_start - base.start_time).non_negative();
    let hi = (base.source_duration - base.trim_end - min).non_negative();
    let trim = requested.clamp_to(lo, hi);
    let delta = trim - base.trim_start;
    base.trim_start = trim;
    base.start_time += delta;
}

/// Tail trim: the start stays fixed.
fn apply_trim_end(base: &mut ClipBase, requested: RationalTime, min: RationalTime) {
    let hi = (base.source_duration - base.trim_start - min).non_negative();
    base.trim_end = requested.clamp_to(RationalTime::ZERO, hi);
}

/// Replace `items[index]` with two clips meeting at `at`. Both halves must
/// keep at least `min` of effective duration.
fn split_clip<T: MediaClip>(
    items: &mut Vec<T>,
    index: usize,
    at: RationalTime,
    min: RationalTime,
) -> Result<Uuid, EditError> {
    let original = &items[index];
    let occupancy = original.occupancy();
    let fits = occupancy.contains_strictly(at)
        && at - occupancy.start >= min
        && occupancy.end() - at >= min;
    if !fits {
        return Err(EditError::OutOfRangeSplit {
            id: original.id(),
            at,
            start: occupancy.start,
            end: occupancy.end(),
        });
    }

    let split_point = original.base().source_position(at);
    let mut tail = original.clone();
    let tail_id = Uuid::new_v4();
    tail.set_id(tail_id);
    {
        let base = tail.base_mut();
        base.start_time = at;
        base.trim_start = split_point;
    }
    tail.clear_internal_edge(false);

    let head = &mut items[index];
    let source_duration = head.base().source_duration;
    head.base_mut().trim_end = source_duration - split_point;
    head.clear_internal_edge(true);

    items.insert(index + 1, tail);
    Ok(tail_id)
}

/// Deep copy placed `gap` after the original's end on the same lane.
fn duplicate_item<T: TimelineItem>(items: &mut Vec<T>, index: usize, gap: RationalTime) -> Uuid {
    let original = &items[index];
    let mut copy = original.clone();
    let id = Uuid::new_v4();
    copy.set_id(id);
    copy.set_start_time(original.end_time() + gap);
    items.push(copy);
    id
}

/// Shift items starting strictly after `after` earlier by `by`. Locked items
/// stay where they are.
fn shift_later<T: TimelineItem>(
    items: &mut [T],
    after: RationalTime,
    by: RationalTime,
    lane: Option<u8>,
    shifted: &mut Vec<Uuid>,
) {
    for item in items.iter_mut() {
        let in_scope = lane.map_or(true, |lane| item.track() == lane);
        if in_scope && !item.locked() && item.start_time() > after {
            item.set_start_time((item.start_time() - by).non_negative());
            shifted.push(item.id());
        }
    }
}

// ── Tests ───────────────────────────────────────────────────────
