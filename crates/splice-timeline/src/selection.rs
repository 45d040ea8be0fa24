//! Single-clip selection bound to the property panel.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::clip::ClipKind;

/// At most one selected `(id, kind)` pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    current: Option<(Uuid, ClipKind)>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a clip, replacing any previous selection.
    pub fn select(&mut self, id: Uuid, kind: ClipKind) {
        self.current = Some((id, kind));
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn get(&self) -> Option<(Uuid, ClipKind)> {
        self.current
    }

    pub fn id(&self) -> Option<Uuid> {
        self.current.map(|(id, _)| id)
    }

    pub fn is_selected(&self, id: Uuid) -> bool {
        self.id() == Some(id)
    }

    /// Clear the selection if it names `id`. Returns whether it did.
    pub fn invalidate(&mut self, id: Uuid) -> bool {
        if self.is_selected(id) {
            self.current = None;
            true
        } else {
            false
        }
    }

    /// Clear the selection unless `exists` still reports the clip present.
    pub fn retain(&mut self, exists: impl FnOnce(Uuid, ClipKind) -> bool) {
        if let Some((id, kind)) = self.current {
            if !exists(id, kind) {
                self.current = None;
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_none()
    }
}
