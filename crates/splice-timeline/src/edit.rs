//! Edit commands, edit errors, and undo/redo history.
//!
//! Every timeline mutation is an `EditCommand` applied through
//! [`Timeline::apply`](crate::Timeline::apply), which is the one place the
//! lock gate and history capture happen. History stores snapshots of the clip
//! collections taken before each successful command.

use splice_core::{RationalTime, SpliceError};
use thiserror::Error;
use uuid::Uuid;

use crate::clip::{AudioClip, ClipKind, NewClip, VideoClip};
use crate::filter::{FilterPatch, TransitionEdge, TransitionKind};
use crate::text::{NewText, TextOverlay, TextPatch};

// ── Edit commands ───────────────────────────────────────────────

/// A timeline mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum EditCommand {
    /// Append a media clip after the last clip on its lane.
    AddClip { kind: ClipKind, clip: NewClip },
    /// Append a text overlay after the last overlay on its lane.
    AddText(NewText),
    /// Set the timeline start (clamped to zero).
    Move { id: Uuid, start: RationalTime },
    /// Reassign the lane. Overlaps are allowed.
    ChangeTrack { id: Uuid, track: u8 },
    /// Set the head trim; the tail stays put.
    TrimStart { id: Uuid, trim: RationalTime },
    /// Set the tail trim; the start stays put.
    TrimEnd { id: Uuid, trim: RationalTime },
    /// Cut a clip in two at a timeline time.
    Split { id: Uuid, at: RationalTime },
    /// Copy a clip to just after its own end.
    Duplicate { id: Uuid },
    /// Remove a clip, leaving a gap.
    Delete { id: Uuid },
    /// Remove a clip and close the gap.
    RippleDelete { id: Uuid },
    ToggleLock { id: Uuid },
    ToggleMute { id: Uuid },
    ToggleVisible { id: Uuid },
    SetVolume { id: Uuid, volume: f32 },
    SetFades {
        id: Uuid,
        fade_in: RationalTime,
        fade_out: RationalTime,
    },
    ApplyFilters { id: Uuid, patch: FilterPatch },
    ResetFilters { id: Uuid },
    SetTransition {
        id: Uuid,
        edge: TransitionEdge,
        kind: TransitionKind,
    },
    UpdateText { id: Uuid, patch: TextPatch },
}

impl EditCommand {
    /// The clip this command targets, if it targets an existing one.
    pub fn target(&self) -> Option<Uuid> {
        match self {
            Self::AddClip { .. } | Self::AddText(_) => None,
            Self::Move { id, .. }
            | Self::ChangeTrack { id, .. }
            | Self::TrimStart { id, .. }
            | Self::TrimEnd { id, .. }
            | Self::Split { id, .. }
            | Self::Duplicate { id }
            | Self::Delete { id }
            | Self::RippleDelete { id }
            | Self::ToggleLock { id }
            | Self::ToggleMute { id }
            | Self::ToggleVisible { id }
            | Self::SetVolume { id, .. }
            | Self::SetFades { id, .. }
            | Self::ApplyFilters { id, .. }
            | Self::ResetFilters { id }
            | Self::SetTransition { id, .. }
            | Self::UpdateText { id, .. } => Some(*id),
        }
    }

    /// Whether a locked target refuses this command.
    pub fn is_lock_guarded(&self) -> bool {
        matches!(
            self,
            Self::Move { .. }
                | Self::ChangeTrack { .. }
                | Self::TrimStart { .. }
                | Self::TrimEnd { .. }
                | Self::Split { .. }
                | Self::Delete { .. }
                | Self::RippleDelete { .. }
        )
    }

    /// Short label for history and logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::AddClip { .. } => "Add clip",
            Self::AddText(_) => "Add text",
            Self::Move { .. } => "Move clip",
            Self::ChangeTrack { .. } => "Change track",
            Self::TrimStart { .. } => "Trim start",
            Self::TrimEnd { .. } => "Trim end",
            Self::Split { .. } => "Split clip",
            Self::Duplicate { .. } => "Duplicate clip",
            Self::Delete { .. } => "Delete clip",
            Self::RippleDelete { .. } => "Ripple delete",
            Self::ToggleLock { .. } => "Toggle lock",
            Self::ToggleMute { .. } => "Toggle mute",
            Self::ToggleVisible { .. } => "Toggle visibility",
            Self::SetVolume { .. } => "Set volume",
            Self::SetFades { .. } => "Set fades",
            Self::ApplyFilters { .. } => "Apply filters",
            Self::ResetFilters { .. } => "Reset filters",
            Self::SetTransition { .. } => "Set transition",
            Self::UpdateText { .. } => "Edit text",
        }
    }

    /// Whether the command changes clip placement (and so the duration).
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::AddClip { .. }
                | Self::AddText(_)
                | Self::Move { .. }
                | Self::ChangeTrack { .. }
                | Self::TrimStart { .. }
                | Self::TrimEnd { .. }
                | Self::Split { .. }
                | Self::Duplicate { .. }
                | Self::Delete { .. }
                | Self::RippleDelete { .. }
                | Self::UpdateText { .. }
        )
    }
}

// ── Outcomes and errors ─────────────────────────────────────────

/// What a successful command did beyond mutating its target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditOutcome {
    /// Clip created by add, split (the right half) or duplicate.
    pub created: Option<Uuid>,
    /// Clips moved earlier by a ripple delete.
    pub shifted: Vec<Uuid>,
}

impl EditOutcome {
    pub(crate) fn created(id: Uuid) -> Self {
        Self {
            created: Some(id),
            shifted: Vec::new(),
        }
    }
}

/// Invalid-operation conditions. None of them mutates the timeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("clip {0} not found")]
    ClipNotFound(Uuid),

    #[error("clip {0} is locked")]
    Locked(Uuid),

    #[error("cannot split clip {id} at {at}: outside [{start}, {end})")]
    OutOfRangeSplit {
        id: Uuid,
        at: RationalTime,
        start: RationalTime,
        end: RationalTime,
    },

    #[error("{kind} lane {index} does not exist")]
    TrackOutOfRange { kind: ClipKind, index: u8 },

    #[error("source of {duration} is shorter than the {min} minimum clip length")]
    SourceTooShort {
        duration: RationalTime,
        min: RationalTime,
    },

    #[error("{operation} completed without reporting the clip it created")]
    MissingCreatedClip { operation: &'static str },

    #[error("{operation} does not apply to {kind} clip {id}")]
    NotApplicable {
        id: Uuid,
        kind: ClipKind,
        operation: &'static str,
    },
}

impl From<EditError> for SpliceError {
    fn from(err: EditError) -> Self {
        SpliceError::InvalidParameter(err.to_string())
    }
}

// ── History ─────────────────────────────────────────────────────

/// The clip collections at one point in time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimelineSnapshot {
    pub video: Vec<VideoClip>,
    pub audio: Vec<AudioClip>,
    pub text: Vec<TextOverlay>,
}

/// A labelled history entry.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub label: &'static str,
    pub snapshot: TimelineSnapshot,
}

/// Undo/redo history stack.
#[derive(Debug)]
pub struct History {
    /// States before each executed command (most recent last).
    undo: Vec<HistoryEntry>,
    /// States replaced by undo (most recent last).
    redo: Vec<HistoryEntry>,
    /// Maximum history depth.
    max_depth: usize,
}

impl History {
    /// Create a new history with the given maximum depth.
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo: Vec::new(),
            redo: Vec::new(),
            max_depth,
        }
    }

    /// Record the state before a command.
    /// Clears the redo stack (new action invalidates redo history).
    pub fn push(&mut self, label: &'static str, before: TimelineSnapshot) {
        self.redo.clear();
        self.undo.push(HistoryEntry {
            label,
            snapshot: before,
        });
        if self.undo.len() > self.max_depth {
            self.undo.remove(0);
        }
    }

    /// Step back. `current` is the state being left; the returned snapshot is
    /// the one to restore.
    pub fn undo(&mut self, current: TimelineSnapshot) -> Option<HistoryEntry> {
        let entry = self.undo.pop()?;
        self.redo.push(HistoryEntry {
            label: entry.label,
            snapshot: current,
        });
        Some(entry)
    }

    /// Step forward again after an undo.
    pub fn redo(&mut self, current: TimelineSnapshot) -> Option<HistoryEntry> {
        let entry = self.redo.pop()?;
        self.undo.push(HistoryEntry {
            label: entry.label,
            snapshot: current,
        });
        Some(entry)
    }

    /// Check if undo is available.
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    /// Check if redo is available.
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Label of the step `undo` would revert.
    pub fn undo_label(&self) -> Option<&'static str> {
        self.undo.last().map(|e| e.label)
    }

    /// Clear all history.
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    /// Number of undo steps available.
    pub fn undo_count(&self) -> usize {
        self.undo.len()
    }

    /// Number of redo steps available.
    pub fn redo_count(&self) -> usize {
        self.redo.len()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(200)
    }
}

// ── Tests ───────────────────────────────────────────────────────
