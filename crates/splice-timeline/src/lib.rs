//! Splice Timeline - Timeline data model and edit engine
//!
//! Implements the editable multi-lane timeline:
//! - Video clips, audio clips and text overlays on numbered lanes
//! - A single command entry point with lock enforcement and undo/redo
//! - Filters and transitions on video clips
//! - Import tickets that correlate asynchronous probes with clip creation
//! - Versioned project files

pub mod clip;
pub mod edit;
pub mod filter;
pub mod import;
pub mod project;
pub mod selection;
pub mod serialization;
pub mod text;
pub mod timeline;
pub mod track;

pub use clip::{AudioClip, ClipBase, ClipKind, MediaClip, MediaRef, NewClip, TimelineItem, VideoClip};
pub use edit::{EditCommand, EditError, EditOutcome, History, TimelineSnapshot};
pub use filter::{FilterPatch, FilterSet, TransitionEdge, TransitionKind, TransitionPair};
pub use import::{ImportCompletion, ImportRegistry, ImportTicket};
pub use project::{AspectRatio, ProjectSettings, Resolution};
pub use selection::Selection;
pub use serialization::{ProjectDocument, ProjectFile};
pub use text::{NewText, TextAnimation, TextOverlay, TextPatch, TextPosition};
pub use timeline::Timeline;
pub use track::{Lane, TrackKind, TrackRegistry};
