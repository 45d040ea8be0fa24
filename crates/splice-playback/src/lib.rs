//! Splice Playback - playhead and editor session
//!
//! - A frame-driven playback coordinator mirroring the timeline onto a
//!   playback surface
//! - Clock abstraction with a virtual clock for deterministic stepping
//! - The editor session context tying timeline, playback and imports together

pub mod clock;
pub mod coordinator;
pub mod session;
pub mod surface;

pub use clock::{FrameClock, SystemClock, VirtualClock};
pub use coordinator::{ActiveClip, PlaybackCoordinator, PlaybackState};
pub use session::EditorSession;
pub use surface::{NullSurface, PlaybackSurface};
