//! Mirrored play/pause state for the soundtrack element.

use super::gate::RevealGate;
use log::{debug, warn};
use tokio::time::{Duration, Instant};

pub const PLAYING_MESSAGE: &str = "Música tocando... Aproveite a linha do tempo!";
pub const PAUSED_MESSAGE: &str = "Aperte o play para ouvir a música e ver nossa linha do tempo";

/// Event emitted by the host media element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaEvent {
    Play,
    Pause,
    Ended,
}

/// Instruction for the host media element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaCommand {
    Play,
    Pause,
}

/// Render state published to the view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaybackSnapshot {
    pub is_playing: bool,
    pub timeline_visible: bool,
    /// Reason of the last rejected play request, cleared on the next `Play`.
    pub last_play_error: Option<String>,
    /// How many times the revealed section has been hidden again.
    pub hide_count: u64,
}

impl PlaybackSnapshot {
    /// Caption under the player.
    pub fn status_message(&self) -> &'static str {
        if self.is_playing {
            PLAYING_MESSAGE
        } else {
            PAUSED_MESSAGE
        }
    }
}

pub struct PlaybackCoordinator {
    is_playing: bool,
    gate: RevealGate,
    last_play_error: Option<String>,
    hide_count: u64,
}

impl PlaybackCoordinator {
    pub fn new(reveal_debounce: Duration) -> Self {
        Self {
            is_playing: false,
            gate: RevealGate::new(reveal_debounce),
            last_play_error: None,
            hide_count: 0,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    /// What the play/pause control should ask the element to do.
    pub fn toggle_command(&self) -> MediaCommand {
        command_for(self.is_playing)
    }

    pub fn on_media_event(&mut self, event: MediaEvent, now: Instant) -> PlaybackSnapshot {
        let playing = matches!(event, MediaEvent::Play);
        if playing {
            self.last_play_error = None;
        }
        if playing != self.is_playing {
            debug!(
                "event=playback_mirrored module=playback media_event={:?} playing={}",
                event, playing
            );
        }
        self.is_playing = playing;
        let was_visible = self.gate.is_visible();
        self.gate.on_playing_changed(playing, now);
        self.gate.poll(now);
        if was_visible && !self.gate.is_visible() {
            self.hide_count += 1;
        }
        self.snapshot()
    }

    /// Records a rejected play request. Mirrored state is left as is.
    pub fn on_play_rejected(&mut self, reason: &str) -> PlaybackSnapshot {
        warn!(
            "event=playback_rejected module=playback status=error reason={}",
            crate::logging::single_line(reason, 120)
        );
        self.last_play_error = Some(reason.to_string());
        self.snapshot()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.gate.deadline()
    }

    pub fn poll(&mut self, now: Instant) -> PlaybackSnapshot {
        if self.gate.poll(now) {
            debug!("event=timeline_revealed module=playback status=ok");
        }
        self.snapshot()
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            is_playing: self.is_playing,
            timeline_visible: self.gate.is_visible(),
            last_play_error: self.last_play_error.clone(),
            hide_count: self.hide_count,
        }
    }
}

pub(crate) fn command_for(is_playing: bool) -> MediaCommand {
    if is_playing {
        MediaCommand::Pause
    } else {
        MediaCommand::Play
    }
}

#[cfg(test)]
mod tests {
    use super::{MediaCommand, MediaEvent, PlaybackCoordinator, PAUSED_MESSAGE, PLAYING_MESSAGE};
    use tokio::time::{Duration, Instant};

    #[test]
    fn mirrors_events_not_requests() {
        let now = Instant::now();
        let mut coordinator = PlaybackCoordinator::new(Duration::from_millis(800));
        assert_eq!(coordinator.toggle_command(), MediaCommand::Play);

        let snapshot = coordinator.on_play_rejected("NotAllowedError");
        assert!(!snapshot.is_playing);
        assert_eq!(snapshot.last_play_error.as_deref(), Some("NotAllowedError"));
        assert_eq!(snapshot.status_message(), PAUSED_MESSAGE);

        let snapshot = coordinator.on_media_event(MediaEvent::Play, now);
        assert!(snapshot.is_playing);
        assert_eq!(snapshot.last_play_error, None);
        assert_eq!(snapshot.status_message(), PLAYING_MESSAGE);
        assert_eq!(coordinator.toggle_command(), MediaCommand::Pause);
    }

    #[test]
    fn ended_counts_as_paused() {
        let now = Instant::now();
        let mut coordinator = PlaybackCoordinator::new(Duration::from_millis(800));
        coordinator.on_media_event(MediaEvent::Play, now);
        coordinator.poll(now + Duration::from_secs(1));
        let snapshot = coordinator.on_media_event(MediaEvent::Ended, now + Duration::from_secs(2));
        assert!(!snapshot.is_playing);
        assert!(!snapshot.timeline_visible);
        assert_eq!(snapshot.hide_count, 1);
    }

    #[test]
    fn reveal_waits_for_debounce() {
        let now = Instant::now();
        let mut coordinator = PlaybackCoordinator::new(Duration::from_millis(800));
        let snapshot = coordinator.on_media_event(MediaEvent::Play, now);
        assert!(!snapshot.timeline_visible);
        assert_eq!(
            coordinator.next_deadline(),
            Some(now + Duration::from_millis(800))
        );
        assert!(coordinator.poll(now + Duration::from_millis(800)).timeline_visible);
    }

    #[test]
    fn hide_count_only_moves_when_a_revealed_section_hides() {
        let now = Instant::now();
        let mut coordinator = PlaybackCoordinator::new(Duration::from_millis(800));
        coordinator.on_media_event(MediaEvent::Play, now);
        let snapshot = coordinator.on_media_event(MediaEvent::Pause, now);
        assert_eq!(snapshot.hide_count, 0);

        coordinator.on_media_event(MediaEvent::Play, now);
        coordinator.poll(now + Duration::from_secs(1));
        coordinator.on_media_event(MediaEvent::Pause, now + Duration::from_secs(2));
        coordinator.on_media_event(MediaEvent::Play, now + Duration::from_secs(3));
        let snapshot = coordinator.poll(now + Duration::from_secs(4));
        assert!(snapshot.timeline_visible);
        assert_eq!(snapshot.hide_count, 1);
    }
}
