//! Playback coordination: play/pause, scrubbing, and keeping the playback
//! surface in step with the playhead.

use serde::{Deserialize, Serialize};
use splice_core::{EditorConfig, RationalTime};
use splice_timeline::{MediaRef, Timeline};
use tracing::{debug, trace};
use uuid::Uuid;

use crate::clock::FrameClock;
use crate::surface::PlaybackSurface;

/// Current playback mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    /// The user is dragging the playhead.
    Scrubbing,
}

/// The clip the surface is showing and where inside its source.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveClip {
    pub id: Uuid,
    pub media: MediaRef,
    /// `current_time - start_time + trim_start`.
    pub local_position: RationalTime,
    pub muted: bool,
}

/// Owns the playhead and drives a [`PlaybackSurface`] from a read-only view
/// of the timeline.
#[derive(Debug)]
pub struct PlaybackCoordinator<C> {
    clock: C,
    state: PlaybackState,
    current_time: RationalTime,
    /// Clock reading at the previous tick while playing.
    last_tick: Option<f64>,
    master_muted: bool,
    drift_tolerance: f64,
    /// Whether to resume playing when the current scrub ends.
    resume_after_scrub: bool,
    active: Option<ActiveClip>,
}

impl<C: FrameClock> PlaybackCoordinator<C> {
    pub fn new(clock: C, config: &EditorConfig) -> Self {
        Self {
            clock,
            state: PlaybackState::Stopped,
            current_time: RationalTime::ZERO,
            last_tick: None,
            master_muted: false,
            drift_tolerance: config.drift_tolerance_secs(),
            resume_after_scrub: false,
            active: None,
        }
    }

    // ── Transport ───────────────────────────────────────────────

    /// Stopped → Playing.
    pub fn play(&mut self, timeline: &Timeline, surface: &mut impl PlaybackSurface) {
        if self.state != PlaybackState::Stopped {
            return;
        }
        self.state = PlaybackState::Playing;
        self.last_tick = Some(self.clock.now_secs());
        debug!(time = %self.current_time, "Playback started");
        self.sync(timeline, surface, false);
    }

    /// Playing → Stopped. The playhead stays where it is.
    pub fn pause(&mut self, surface: &mut impl PlaybackSurface) {
        if self.state != PlaybackState::Playing {
            return;
        }
        self.state = PlaybackState::Stopped;
        self.last_tick = None;
        surface.pause();
        debug!(time = %self.current_time, "Playback paused");
    }

    pub fn toggle_play(&mut self, timeline: &Timeline, surface: &mut impl PlaybackSurface) {
        match self.state {
            PlaybackState::Playing => self.pause(surface),
            PlaybackState::Stopped => self.play(timeline, surface),
            PlaybackState::Scrubbing => {}
        }
    }

    /// Advance by the wall-clock delta since the previous tick, stop and
    /// rewind at the end, then resync the surface.
    pub fn tick(&mut self, timeline: &Timeline, surface: &mut impl PlaybackSurface) {
        if self.state == PlaybackState::Playing {
            let now = self.clock.now_secs();
            let delta = self.last_tick.map_or(0.0, |last| (now - last).max(0.0));
            self.last_tick = Some(now);
            self.current_time += RationalTime::from_seconds_f64(delta);

            if self.current_time >= timeline.duration() {
                self.state = PlaybackState::Stopped;
                self.last_tick = None;
                self.current_time = RationalTime::ZERO;
                surface.pause();
                debug!(duration = %timeline.duration(), "Reached end, rewinding to start");
            }
        }
        self.sync(timeline, surface, false);
    }

    /// Re-evaluate the active clip and correct the surface only if it drifted
    /// past the tolerance.
    pub fn resync(&mut self, timeline: &Timeline, surface: &mut impl PlaybackSurface) {
        self.sync(timeline, surface, false);
    }

    /// Jump the playhead. The surface is positioned exactly.
    pub fn seek_to(
        &mut self,
        timeline: &Timeline,
        surface: &mut impl PlaybackSurface,
        time: RationalTime,
    ) {
        self.current_time = time.clamp_to(RationalTime::ZERO, timeline.duration());
        if self.state == PlaybackState::Playing {
            self.last_tick = Some(self.clock.now_secs());
        }
        debug!(time = %self.current_time, "Seeked");
        self.sync(timeline, surface, true);
    }

    // ── Scrubbing ───────────────────────────────────────────────

    pub fn begin_scrub(
        &mut self,
        timeline: &Timeline,
        surface: &mut impl PlaybackSurface,
        time: RationalTime,
    ) {
        if self.state == PlaybackState::Scrubbing {
            self.scrub_to(timeline, surface, time);
            return;
        }
        self.resume_after_scrub = self.state == PlaybackState::Playing;
        self.state = PlaybackState::Scrubbing;
        self.last_tick = None;
        surface.pause();
        self.seek_to(timeline, surface, time);
    }

    /// Move the playhead during a scrub. Ignored outside a scrub.
    pub fn scrub_to(
        &mut self,
        timeline: &Timeline,
        surface: &mut impl PlaybackSurface,
        time: RationalTime,
    ) {
        if self.state == PlaybackState::Scrubbing {
            self.seek_to(timeline, surface, time);
        }
    }

    /// Leave the scrub, resuming playback if it was playing before.
    pub fn end_scrub(&mut self, timeline: &Timeline, surface: &mut impl PlaybackSurface) {
        if self.state != PlaybackState::Scrubbing {
            return;
        }
        if std::mem::take(&mut self.resume_after_scrub) {
            self.state = PlaybackState::Playing;
            self.last_tick = Some(self.clock.now_secs());
        } else {
            self.state = PlaybackState::Stopped;
        }
        debug!(time = %self.current_time, state = ?self.state, "Scrub ended");
        self.sync(timeline, surface, false);
    }

    // ── Mute and timeline changes ───────────────────────────────

    /// Project-level mute, applied on top of the active clip's own mute.
    pub fn set_master_muted(
        &mut self,
        timeline: &Timeline,
        surface: &mut impl PlaybackSurface,
        muted: bool,
    ) {
        self.master_muted = muted;
        self.sync(timeline, surface, false);
    }

    /// Call after any timeline edit: the duration may have shrunk and the
    /// active clip may have moved.
    pub fn on_timeline_changed(&mut self, timeline: &Timeline, surface: &mut impl PlaybackSurface) {
        self.current_time = self
            .current_time
            .clamp_to(RationalTime::ZERO, timeline.duration());
        self.sync(timeline, surface, false);
    }

    fn sync(&mut self, timeline: &Timeline, surface: &mut impl PlaybackSurface, exact: bool) {
        let Some(clip) = timeline.active_video_clip(self.current_time) else {
            if self.active.take().is_some() {
                trace!(time = %self.current_time, "No active clip");
            }
            surface.pause();
            if surface.source().is_some() {
                surface.clear_source();
            }
            return;
        };

        let base = &clip.base;
        if surface.source() != Some(&base.media) {
            debug!(clip = %base.id, media = %base.media, "Switching surface source");
            surface.set_source(base.media.clone());
        }

        let local = base.source_position(self.current_time);
        let local_secs = local.to_seconds_f64();
        let drift = (surface.position() - local_secs).abs();
        if exact || drift > self.drift_tolerance {
            if !exact {
                trace!(drift, "Correcting surface drift");
            }
            surface.set_position(local_secs);
        }

        let muted = base.muted || self.master_muted;
        surface.set_muted(muted);

        match self.state {
            PlaybackState::Playing if !surface.is_playing() => surface.play(),
            PlaybackState::Stopped | PlaybackState::Scrubbing if surface.is_playing() => {
                surface.pause()
            }
            _ => {}
        }

        self.active = Some(ActiveClip {
            id: base.id,
            media: base.media.clone(),
            local_position: local,
            muted,
        });
    }

    // ── Accessors ───────────────────────────────────────────────

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    /// The playhead, always within `[0, duration]`.
    pub fn current_time(&self) -> RationalTime {
        self.current_time
    }

    pub fn active_clip(&self) -> Option<&ActiveClip> {
        self.active.as_ref()
    }

    pub fn master_muted(&self) -> bool {
        self.master_muted
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }
}
