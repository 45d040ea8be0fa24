//! Correlation of asynchronous imports with clip creation.
//!
//! Each requested import gets a ticket. Probing happens elsewhere and comes
//! back as an [`ImportCompletion`] carrying the ticket id; the timeline only
//! creates a clip for tickets that are still pending, so a completion for an
//! import the user already cancelled is dropped deterministically.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use splice_core::RationalTime;
use uuid::Uuid;

use crate::clip::{ClipKind, MediaRef, NewClip};

/// Handle for one pending import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImportTicket {
    pub id: Uuid,
    pub kind: ClipKind,
    pub track: u8,
}

/// Probe output for a ticket.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportCompletion {
    pub ticket: ImportTicket,
    pub name: String,
    pub media: MediaRef,
    pub duration: RationalTime,
    pub thumbnail: Option<String>,
    /// True when probing failed and `duration` is the fallback.
    pub fallback: bool,
}

impl ImportCompletion {
    /// The add request this completion turns into.
    pub fn into_new_clip(self) -> NewClip {
        NewClip {
            name: self.name,
            media: self.media,
            probed_duration: self.duration,
            thumbnail: self.thumbnail,
            track: self.ticket.track,
        }
    }
}

/// Tickets issued and not yet completed or cancelled.
#[derive(Debug, Default)]
pub struct ImportRegistry {
    pending: HashMap<Uuid, ImportTicket>,
}

impl ImportRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a ticket for a new import.
    pub fn issue(&mut self, kind: ClipKind, track: u8) -> ImportTicket {
        let ticket = ImportTicket {
            id: Uuid::new_v4(),
            kind,
            track,
        };
        self.pending.insert(ticket.id, ticket);
        ticket
    }

    /// Withdraw a pending import. Returns whether it was pending.
    pub fn cancel(&mut self, ticket_id: Uuid) -> bool {
        self.pending.remove(&ticket_id).is_some()
    }

    /// Consume a ticket. Returns `None` for unknown, cancelled or already
    /// completed tickets.
    pub fn redeem(&mut self, ticket_id: Uuid) -> Option<ImportTicket> {
        self.pending.remove(&ticket_id)
    }

    pub fn is_pending(&self, ticket_id: Uuid) -> bool {
        self.pending.contains_key(&ticket_id)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redeem_once() {
        let mut registry = ImportRegistry::new();
        let ticket = registry.issue(ClipKind::Video, 0);
        assert!(registry.is_pending(ticket.id));
        assert_eq!(registry.redeem(ticket.id), Some(ticket));
        assert_eq!(registry.redeem(ticket.id), None);
    }

    #[test]
    fn test_cancelled_ticket_not_redeemable() {
        let mut registry = ImportRegistry::new();
        let ticket = registry.issue(ClipKind::Audio, 1);
        assert!(registry.cancel(ticket.id));
        assert!(!registry.cancel(ticket.id));
        assert_eq!(registry.redeem(ticket.id), None);
        assert_eq!(registry.pending_count(), 0);
    }

    #[test]
    fn test_completion_keeps_ticket_lane() {
        let mut registry = ImportRegistry::new();
        let ticket = registry.issue(ClipKind::Audio, 2);
        let completion = ImportCompletion {
            ticket,
            name: "song.wav".into(),
            media: MediaRef::new("song.wav"),
            duration: RationalTime::from_secs(12),
            thumbnail: None,
            fallback: false,
        };
        let clip = completion.into_new_clip();
        assert_eq!(clip.track, 2);
        assert_eq!(clip.probed_duration, RationalTime::from_secs(12));
    }
}
