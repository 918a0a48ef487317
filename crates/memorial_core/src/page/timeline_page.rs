//! Music-gated timeline view.
//!
//! # Responsibility
//! - Show a spinner for the configured loading delay after entry.
//! - Keep the timeline unmounted until the soundtrack has been playing for
//!   the reveal window; unmounting drops any expansion.
//! - Unmount on every pause or end, even when playback resumes before the
//!   host asks for content again.
//! - Route resize and Escape events to the timeline controller.
//!
//! # Invariants
//! - Leaving the view pauses the soundtrack, stops the playback loop,
//!   deregisters every listener and reverts the document.

use crate::catalog::MemoryCatalog;
use crate::config::SiteConfig;
use crate::model::memory::MemoryId;
use crate::playback::{
    MediaCommand, MediaElement, MediaEvent, PlaybackError, PlaybackSession, PlaybackSnapshot,
};
use crate::scope::{DocumentShell, ListenerKind, ListenerSet, ViewConfig, ViewGuard};
use crate::timeline::{
    ExpansionTicket, LayoutMode, TimelineController, TimelineError, ToggleOutcome, VideoEvent,
    VideoEventOutcome,
};
use log::{debug, info};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::time::Instant;

pub const TIMELINE_VIEW: &str = "timeline";
pub const TIMELINE_DESCRIPTION: &str =
    "Linha do tempo de memórias e momentos especiais de Kelwin & Isabela";
pub const TIMELINE_PROMPT: &str = "Inicie a música para ver nossa linha do tempo";

/// What the main area of the page shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelineContent {
    Loading,
    /// Soundtrack not (yet) playing long enough.
    Prompt,
    Timeline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Other,
}

pub struct TimelinePage {
    soundtrack: Arc<dyn MediaElement>,
    playback: PlaybackSession,
    timeline: TimelineController,
    loaded_at: Instant,
    seen_hides: u64,
    listeners: ListenerSet,
    view: ViewGuard,
}

impl TimelinePage {
    /// Enters the view. Must be called from within a tokio runtime.
    pub fn enter(
        shell: &DocumentShell,
        catalog: Arc<MemoryCatalog>,
        config: &SiteConfig,
        soundtrack: Arc<dyn MediaElement>,
        viewport_width_px: u32,
    ) -> Self {
        let view = shell.enter_view(ViewConfig {
            view: TIMELINE_VIEW,
            dark_mode: true,
            meta_description: Some(TIMELINE_DESCRIPTION.to_string()),
        });

        let mut listeners = shell.listeners(TIMELINE_VIEW);
        for kind in [
            ListenerKind::Resize,
            ListenerKind::KeyDown,
            ListenerKind::MediaPlay,
            ListenerKind::MediaPause,
            ListenerKind::MediaEnded,
        ] {
            listeners.register(kind);
        }

        let timeline = TimelineController::new(
            catalog,
            viewport_width_px,
            config.mobile_breakpoint_px,
        );
        info!(
            "event=page_enter module=page view={TIMELINE_VIEW} layout={:?}",
            timeline.layout()
        );

        Self {
            soundtrack,
            playback: PlaybackSession::start(config.reveal_debounce),
            timeline,
            loaded_at: Instant::now() + config.loading_delay,
            seen_hides: 0,
            listeners,
            view,
        }
    }

    pub fn is_loading(&self) -> bool {
        Instant::now() < self.loaded_at
    }

    /// Main-area state. Unmounts the timeline if playback stopped.
    pub fn content(&mut self) -> TimelineContent {
        if self.is_loading() {
            return TimelineContent::Loading;
        }
        if self.sync_mount() {
            TimelineContent::Timeline
        } else {
            TimelineContent::Prompt
        }
    }

    pub fn playback(&self) -> PlaybackSnapshot {
        self.playback.snapshot()
    }

    pub fn subscribe_playback(&self) -> watch::Receiver<PlaybackSnapshot> {
        self.playback.subscribe()
    }

    /// Soundtrack element listener. Pause and end hide the timeline at once.
    pub fn on_media_event(&mut self, event: MediaEvent) -> bool {
        if event != MediaEvent::Play {
            self.unmount();
        }
        self.playback.dispatch(event)
    }

    /// Play/pause control handler.
    pub async fn toggle_music(&self) -> Result<MediaCommand, PlaybackError> {
        self.playback.toggle(self.soundtrack.as_ref()).await
    }

    pub fn on_resize(&mut self, viewport_width_px: u32) -> LayoutMode {
        self.timeline.on_resize(viewport_width_px)
    }

    /// Keyboard listener. Returns whether the key closed an overlay.
    pub fn on_key(&mut self, key: Key) -> bool {
        match key {
            Key::Escape => self.timeline.close_fullscreen(),
            Key::Other => false,
        }
    }

    pub fn toggle_memory(&mut self, id: MemoryId) -> Result<ToggleOutcome, TimelineError> {
        if !self.sync_mount() {
            return Err(TimelineError::Hidden);
        }
        self.timeline.toggle(id)
    }

    pub fn toggle_fullscreen(&mut self, id: MemoryId) -> Result<bool, TimelineError> {
        if !self.sync_mount() {
            return Err(TimelineError::Hidden);
        }
        self.timeline.toggle_fullscreen(id)
    }

    /// Card video listener.
    pub fn on_card_video_event(
        &mut self,
        ticket: ExpansionTicket,
        event: VideoEvent,
    ) -> VideoEventOutcome {
        self.sync_mount();
        self.timeline.on_video_event(ticket, event)
    }

    pub fn timeline(&self) -> &TimelineController {
        &self.timeline
    }

    pub fn listeners(&self) -> &ListenerSet {
        &self.listeners
    }

    /// Consumes and drops the page; see the `Drop` impl.
    pub fn leave(self) {
        info!("event=page_leave module=page view={}", self.view.view());
    }

    fn sync_mount(&mut self) -> bool {
        let snapshot = self.playback.snapshot();
        if !snapshot.timeline_visible || snapshot.hide_count != self.seen_hides {
            self.seen_hides = snapshot.hide_count;
            self.unmount();
        }
        snapshot.timeline_visible
    }

    fn unmount(&mut self) {
        if let Some(id) = self.timeline.collapse_all() {
            debug!("event=timeline_unmounted module=page view={TIMELINE_VIEW} expanded={id}");
        }
    }
}

impl Drop for TimelinePage {
    fn drop(&mut self) {
        self.soundtrack.pause();
    }
}
