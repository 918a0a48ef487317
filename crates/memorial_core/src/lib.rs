//! Core state logic for the memorial site.
//! This crate is the single source of truth for every view-state invariant;
//! the rendering shell only forwards events and draws snapshots.

pub mod carousel;
pub mod catalog;
pub mod config;
pub mod countdown;
pub mod form;
pub mod logging;
pub mod model;
pub mod page;
pub mod playback;
pub mod scope;
pub mod timeline;

pub use carousel::{CarouselController, CarouselError, Thumbnail};
pub use catalog::{CatalogError, MemoryCatalog, WALL_THUMBNAIL_LIMIT};
pub use config::{ConfigError, SiteConfig};
pub use countdown::{
    countdown_between, Clock, CountdownEngine, CountdownState, CountdownTicker, ManualClock,
    SystemClock, TimeUnit,
};
pub use form::{
    ImagePreview, ImageUpload, MemorySink, MemorySubmission, SimulatedOutcome, SimulatedSink,
    SubmissionError, SubmissionForm, SubmissionReceipt,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::memory::{MemoryId, MemoryRecord, MemoryValidationError};
pub use page::{HomePage, Key, TimelineContent, TimelinePage};
pub use playback::{
    MediaCommand, MediaElement, MediaEvent, PlaybackError, PlaybackSession, PlaybackSnapshot,
};
pub use scope::{DocumentShell, ListenerKind, ListenerSet, ViewConfig, ViewGuard};
pub use timeline::{
    ExpansionTicket, LayoutMode, Side, TimelineController, TimelineError, ToggleOutcome,
    VideoEvent, VideoEventOutcome, VideoStatus,
};

/// Minimal health-check API for shell integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
