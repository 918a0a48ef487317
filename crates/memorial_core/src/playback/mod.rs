//! Soundtrack playback mirrored from the host media element.
//!
//! # Responsibility
//! - Mirror play/pause strictly from element events.
//! - Gate the timeline reveal on sustained playback.
//!
//! # Invariants
//! - A play request never flips state by itself; only a `Play` event does.
//! - Returning to paused hides the gated section immediately.

pub mod coordinator;
pub mod gate;
pub mod session;

pub use coordinator::{
    MediaCommand, MediaEvent, PlaybackCoordinator, PlaybackSnapshot, PLAYING_MESSAGE,
    PAUSED_MESSAGE,
};
pub use gate::RevealGate;
pub use session::{MediaElement, PlaybackError, PlaybackSession};
