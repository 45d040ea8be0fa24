//! The editor session: one context object owning the timeline, the playhead,
//! the playback surface and the probe worker.
//!
//! Every edit goes through [`EditorSession::edit`], which mutates the
//! timeline and resyncs playback in the same call, so the coordinator never
//! observes a half-applied edit.

use splice_core::{RationalTime, Result, SpliceError};
use splice_media::ProbeWorker;
use splice_timeline::{
    ClipKind, EditCommand, EditError, EditOutcome, ImportCompletion, ImportTicket, Timeline,
};
use std::path::PathBuf;
use tracing::warn;
use uuid::Uuid;

use crate::clock::FrameClock;
use crate::coordinator::PlaybackCoordinator;
use crate::surface::PlaybackSurface;

pub struct EditorSession<C, S> {
    timeline: Timeline,
    playback: PlaybackCoordinator<C>,
    surface: S,
    probes: Option<ProbeWorker>,
}

impl<C: FrameClock, S: PlaybackSurface> EditorSession<C, S> {
    pub fn new(timeline: Timeline, clock: C, surface: S) -> Self {
        let playback = PlaybackCoordinator::new(clock, timeline.config());
        let mut session = Self {
            timeline,
            playback,
            surface,
            probes: None,
        };
        session.resync();
        session
    }

    /// Attach a background probe worker for [`import`](Self::import).
    pub fn with_probe_worker(mut self, worker: ProbeWorker) -> Self {
        self.probes = Some(worker);
        self
    }

    // ── Editing ─────────────────────────────────────────────────

    /// Apply an edit and bring playback up to date with it.
    pub fn edit(&mut self, command: EditCommand) -> std::result::Result<EditOutcome, EditError> {
        let outcome = self.timeline.apply(command)?;
        self.resync();
        Ok(outcome)
    }

    pub fn undo(&mut self) -> bool {
        let undone = self.timeline.undo();
        if undone {
            self.resync();
        }
        undone
    }

    pub fn redo(&mut self) -> bool {
        let redone = self.timeline.redo();
        if redone {
            self.resync();
        }
        redone
    }

    pub fn select(&mut self, id: Uuid) -> std::result::Result<(), EditError> {
        self.timeline.select(id)
    }

    // ── Imports ─────────────────────────────────────────────────

    /// Start probing `path` in the background. The clip appears on a later
    /// [`tick`](Self::tick), unless the import is cancelled first.
    pub fn import(
        &mut self,
        path: impl Into<PathBuf>,
        kind: ClipKind,
        track: u8,
    ) -> Result<ImportTicket> {
        let worker = self
            .probes
            .as_ref()
            .ok_or_else(|| SpliceError::Internal("no probe worker attached".into()))?;
        let ticket = self.timeline.request_import(kind, track)?;
        if let Err(e) = worker.submit(ticket, path) {
            self.timeline.cancel_import(ticket.id);
            return Err(e);
        }
        Ok(ticket)
    }

    pub fn cancel_import(&mut self, ticket_id: Uuid) -> bool {
        self.timeline.cancel_import(ticket_id)
    }

    /// Hand a probe result to the timeline. Stale completions yield `Ok(None)`.
    pub fn deliver(
        &mut self,
        completion: ImportCompletion,
    ) -> std::result::Result<Option<Uuid>, EditError> {
        let created = self.timeline.complete_import(completion)?;
        if created.is_some() {
            self.resync();
        }
        Ok(created)
    }

    /// Apply every probe completion that has arrived so far. Returns the ids
    /// of the clips created.
    pub fn ingest_completions(&mut self) -> Vec<Uuid> {
        let completions: Vec<ImportCompletion> = match &self.probes {
            Some(worker) => worker.drain().collect(),
            None => return Vec::new(),
        };
        let mut created = Vec::new();
        for completion in completions {
            let ticket = completion.ticket.id;
            match self.deliver(completion) {
                Ok(Some(id)) => created.push(id),
                Ok(None) => {}
                Err(e) => warn!(ticket = %ticket, error = %e, "Import could not be placed"),
            }
        }
        created
    }

    // ── Playback ────────────────────────────────────────────────

    /// One frame: apply finished imports, then advance playback.
    pub fn tick(&mut self) -> Vec<Uuid> {
        let created = self.ingest_completions();
        self.playback.tick(&self.timeline, &mut self.surface);
        created
    }

    pub fn play(&mut self) {
        self.playback.play(&self.timeline, &mut self.surface);
    }

    pub fn pause(&mut self) {
        self.playback.pause(&mut self.surface);
    }

    pub fn toggle_play(&mut self) {
        self.playback.toggle_play(&self.timeline, &mut self.surface);
    }

    pub fn seek_to(&mut self, time: RationalTime) {
        self.playback.seek_to(&self.timeline, &mut self.surface, time);
    }

    pub fn begin_scrub(&mut self, time: RationalTime) {
        self.playback.begin_scrub(&self.timeline, &mut self.surface, time);
    }

    pub fn scrub_to(&mut self, time: RationalTime) {
        self.playback.scrub_to(&self.timeline, &mut self.surface, time);
    }

    pub fn end_scrub(&mut self) {
        self.playback.end_scrub(&self.timeline, &mut self.surface);
    }

    pub fn set_master_muted(&mut self, muted: bool) {
        self.playback
            .set_master_muted(&self.timeline, &mut self.surface, muted);
    }

    fn resync(&mut self) {
        self.playback
            .on_timeline_changed(&self.timeline, &mut self.surface);
    }

    // ── Accessors ───────────────────────────────────────────────

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn playback(&self) -> &PlaybackCoordinator<C> {
        &self.playback
    }

    pub fn clock_mut(&mut self) -> &mut C {
        self.playback.clock_mut()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Tear down the session, keeping the timeline.
    pub fn into_timeline(self) -> Timeline {
        self.timeline
    }
}
