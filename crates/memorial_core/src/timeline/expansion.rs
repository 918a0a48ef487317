//! Accordion expansion over the chronological catalog.
//!
//! Every expansion is stamped with a fresh [`ExpansionTicket`]. Media
//! callbacks carry the ticket they were issued with, so a notification that
//! arrives after the user moved on is recognised as stale and dropped.

use super::layout::{LayoutMode, Side};
use crate::catalog::MemoryCatalog;
use crate::model::memory::{MemoryId, MemoryRecord};
use log::{debug, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Inline fallback shown over a card whose clip failed.
pub const VIDEO_ERROR_MESSAGE: &str = "Não foi possível carregar o vídeo";

/// Identity of one expansion episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExpansionTicket(u64);

/// Playback state of the expanded card's clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoStatus {
    /// Record has no clip.
    NoClip,
    /// Autoplay requested, no confirmation yet.
    Pending,
    Playing,
    /// Sticky until the record is expanded again.
    Failed,
}

/// Notification from the host about an autoplay request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoEvent {
    /// The element confirmed playback.
    Started,
    /// `play()` rejected or the element raised an error.
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoEventOutcome {
    Applied(VideoStatus),
    /// Issued for an expansion that is no longer current; the host must not
    /// start or resume that clip.
    Stale,
}

/// Start-playback instruction for the host's card video element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoplayRequest {
    pub ticket: ExpansionTicket,
    pub id: MemoryId,
    pub video_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    Expanded {
        id: MemoryId,
        ticket: ExpansionTicket,
        /// Previously expanded record that this toggle closed.
        collapsed: Option<MemoryId>,
        autoplay: Option<AutoplayRequest>,
    },
    Collapsed {
        id: MemoryId,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelineError {
    UnknownMemory(MemoryId),
    NotExpanded(MemoryId),
    /// Fullscreen is only offered for image-only records.
    FullscreenUnavailable(MemoryId),
    /// The timeline is not mounted (soundtrack not playing).
    Hidden,
}

impl Display for TimelineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownMemory(id) => write!(f, "memory {id} is not in the catalog"),
            Self::NotExpanded(id) => write!(f, "memory {id} is not expanded"),
            Self::FullscreenUnavailable(id) => {
                write!(f, "memory {id} has a video and cannot open fullscreen")
            }
            Self::Hidden => write!(f, "timeline is hidden"),
        }
    }
}

impl Error for TimelineError {}

/// Render model for one timeline card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardView<'a> {
    pub position: usize,
    pub record: &'a MemoryRecord,
    pub side: Option<Side>,
    pub is_expanded: bool,
    pub video: Option<VideoStatus>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Expansion {
    id: MemoryId,
    ticket: ExpansionTicket,
    fullscreen: bool,
    video: VideoStatus,
}

pub struct TimelineController {
    catalog: Arc<MemoryCatalog>,
    expanded: Option<Expansion>,
    layout: LayoutMode,
    breakpoint_px: u32,
    next_ticket: u64,
}

impl TimelineController {
    pub fn new(catalog: Arc<MemoryCatalog>, viewport_width_px: u32, breakpoint_px: u32) -> Self {
        Self {
            catalog,
            expanded: None,
            layout: LayoutMode::for_width(viewport_width_px, breakpoint_px),
            breakpoint_px,
            next_ticket: 0,
        }
    }

    pub fn expanded_id(&self) -> Option<MemoryId> {
        self.expanded.map(|expansion| expansion.id)
    }

    pub fn is_expanded(&self, id: MemoryId) -> bool {
        self.expanded_id() == Some(id)
    }

    pub fn current_ticket(&self) -> Option<ExpansionTicket> {
        self.expanded.map(|expansion| expansion.ticket)
    }

    pub fn layout(&self) -> LayoutMode {
        self.layout
    }

    /// Viewport resize handler.
    pub fn on_resize(&mut self, viewport_width_px: u32) -> LayoutMode {
        self.layout = LayoutMode::for_width(viewport_width_px, self.breakpoint_px);
        self.layout
    }

    /// Cards in chronological order.
    pub fn cards(&self) -> Vec<CardView<'_>> {
        self.catalog
            .chronological()
            .enumerate()
            .map(|(position, record)| {
                let expansion = self.expanded.filter(|expansion| expansion.id == record.id);
                CardView {
                    position,
                    record,
                    side: self.layout.side_for(position),
                    is_expanded: expansion.is_some(),
                    video: expansion.map(|expansion| expansion.video),
                }
            })
            .collect()
    }

    /// Collapses `id` if it is open, otherwise expands it and closes any
    /// other card. State is updated before the caller animates anything.
    pub fn toggle(&mut self, id: MemoryId) -> Result<ToggleOutcome, TimelineError> {
        let record = self
            .catalog
            .find(id)
            .ok_or(TimelineError::UnknownMemory(id))?;

        if self.is_expanded(id) {
            // Dropping the expansion drops its fullscreen flag with it.
            self.expanded = None;
            debug!("event=timeline_collapse module=timeline id={id}");
            return Ok(ToggleOutcome::Collapsed { id });
        }

        self.next_ticket += 1;
        let ticket = ExpansionTicket(self.next_ticket);
        let autoplay = record.video_url.as_ref().map(|url| AutoplayRequest {
            ticket,
            id,
            video_url: url.clone(),
        });
        let video = if autoplay.is_some() {
            VideoStatus::Pending
        } else {
            VideoStatus::NoClip
        };

        let collapsed = self.expanded_id();
        self.expanded = Some(Expansion {
            id,
            ticket,
            fullscreen: false,
            video,
        });
        debug!(
            "event=timeline_expand module=timeline id={id} ticket={} replaced={:?}",
            ticket.0, collapsed
        );

        Ok(ToggleOutcome::Expanded {
            id,
            ticket,
            collapsed,
            autoplay,
        })
    }

    /// Applies a media notification if it belongs to the current expansion.
    pub fn on_video_event(
        &mut self,
        ticket: ExpansionTicket,
        event: VideoEvent,
    ) -> VideoEventOutcome {
        let current = self.current_ticket();
        let Some(expansion) = self
            .expanded
            .as_mut()
            .filter(|expansion| expansion.ticket == ticket)
        else {
            debug!(
                "event=timeline_video_stale module=timeline ticket={} current={:?}",
                ticket.0,
                current.map(|current| current.0)
            );
            return VideoEventOutcome::Stale;
        };

        if expansion.video == VideoStatus::NoClip {
            return VideoEventOutcome::Applied(VideoStatus::NoClip);
        }

        match event {
            VideoEvent::Started if expansion.video != VideoStatus::Failed => {
                expansion.video = VideoStatus::Playing;
            }
            VideoEvent::Started => {}
            VideoEvent::Failed(reason) => {
                warn!(
                    "event=timeline_video_failed module=timeline status=error id={} reason={}",
                    expansion.id,
                    crate::logging::single_line(&reason, 120)
                );
                expansion.video = VideoStatus::Failed;
            }
        }
        VideoEventOutcome::Applied(expansion.video)
    }

    pub fn video_status(&self, id: MemoryId) -> Option<VideoStatus> {
        self.expanded
            .filter(|expansion| expansion.id == id)
            .map(|expansion| expansion.video)
    }

    /// Inline message for a failed clip on the expanded card.
    pub fn video_error_message(&self, id: MemoryId) -> Option<&'static str> {
        (self.video_status(id) == Some(VideoStatus::Failed)).then_some(VIDEO_ERROR_MESSAGE)
    }

    /// Opens or closes the image overlay of the expanded record.
    pub fn toggle_fullscreen(&mut self, id: MemoryId) -> Result<bool, TimelineError> {
        let record = self
            .catalog
            .find(id)
            .ok_or(TimelineError::UnknownMemory(id))?;
        if record.has_video() {
            return Err(TimelineError::FullscreenUnavailable(id));
        }
        let expansion = self
            .expanded
            .as_mut()
            .filter(|expansion| expansion.id == id)
            .ok_or(TimelineError::NotExpanded(id))?;

        expansion.fullscreen = !expansion.fullscreen;
        debug!(
            "event=timeline_fullscreen module=timeline id={id} open={}",
            expansion.fullscreen
        );
        Ok(expansion.fullscreen)
    }

    pub fn fullscreen_id(&self) -> Option<MemoryId> {
        self.expanded
            .filter(|expansion| expansion.fullscreen)
            .map(|expansion| expansion.id)
    }

    /// Drops any expansion, as when the timeline unmounts. Tickets issued so
    /// far become stale.
    pub fn collapse_all(&mut self) -> Option<MemoryId> {
        let collapsed = self.expanded.take().map(|expansion| expansion.id);
        if let Some(id) = collapsed {
            debug!("event=timeline_reset module=timeline id={id}");
        }
        collapsed
    }

    /// Escape-key handler. Returns whether an overlay was closed.
    pub fn close_fullscreen(&mut self) -> bool {
        match self.expanded.as_mut() {
            Some(expansion) if expansion.fullscreen => {
                expansion.fullscreen = false;
                true
            }
            _ => false,
        }
    }
}
