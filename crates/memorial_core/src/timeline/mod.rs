//! Music timeline: chronological cards with accordion expansion.
//!
//! # Responsibility
//! - Keep at most one card expanded and tie per-card media and fullscreen
//!   sub-state to that expansion.
//! - Derive the responsive layout from viewport width.
//!
//! # Invariants
//! - A fullscreen overlay is open only for the currently expanded record.
//! - Media notifications from an earlier expansion never mutate state.

pub mod expansion;
pub mod layout;

pub use expansion::{
    AutoplayRequest, CardView, ExpansionTicket, TimelineController, TimelineError, ToggleOutcome,
    VideoEvent, VideoEventOutcome, VideoStatus, VIDEO_ERROR_MESSAGE,
};
pub use layout::{LayoutMode, Side};
