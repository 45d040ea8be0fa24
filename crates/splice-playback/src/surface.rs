//! The media element playback is mirrored onto.

use splice_timeline::MediaRef;

/// A media element that can hold one source at a time.
///
/// Positions are seconds inside the loaded source, not timeline time.
pub trait PlaybackSurface {
    /// Currently loaded source.
    fn source(&self) -> Option<&MediaRef>;
    /// Load a new source. Position resets to the start of it.
    fn set_source(&mut self, media: MediaRef);
    fn clear_source(&mut self);
    fn position(&self) -> f64;
    fn set_position(&mut self, secs: f64);
    fn play(&mut self);
    fn pause(&mut self);
    fn is_playing(&self) -> bool;
    fn set_muted(&mut self, muted: bool);
}

/// Headless surface. Remembers what it was told and counts seeks; its
/// position only moves when set or explicitly advanced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NullSurface {
    source: Option<MediaRef>,
    position: f64,
    playing: bool,
    muted: bool,
    seeks: usize,
    switches: usize,
}

impl NullSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Let playback run on its own for `secs`, as a real element would.
    pub fn advance(&mut self, secs: f64) {
        if self.playing && self.source.is_some() {
            self.position += secs;
        }
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Number of `set_position` calls.
    pub fn seek_count(&self) -> usize {
        self.seeks
    }

    /// Number of `set_source` calls.
    pub fn source_switches(&self) -> usize {
        self.switches
    }
}

impl PlaybackSurface for NullSurface {
    fn source(&self) -> Option<&MediaRef> {
        self.source.as_ref()
    }

    fn set_source(&mut self, media: MediaRef) {
        self.source = Some(media);
        self.position = 0.0;
        self.switches += 1;
    }

    fn clear_source(&mut self) {
        self.source = None;
        self.position = 0.0;
        self.playing = false;
    }

    fn position(&self) -> f64 {
        self.position
    }

    fn set_position(&mut self, secs: f64) {
        self.position = secs;
        self.seeks += 1;
    }

    fn play(&mut self) {
        self.playing = true;
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }
}
