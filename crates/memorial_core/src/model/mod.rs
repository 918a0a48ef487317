//! Memory records shown by the wall, the timeline and the card overlays.
//!
//! # Invariants
//! - Records are immutable once loaded.
//! - `MemoryId` is the only equality key used by selection and expansion.

pub mod memory;
