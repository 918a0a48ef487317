//! Debounced reveal of the section that depends on playback.

use tokio::time::{Duration, Instant};

/// Shows a section only after playback has been sustained for `debounce`.
///
/// Time is passed in by the caller; the gate owns no timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealGate {
    debounce: Duration,
    playing_since: Option<Instant>,
    visible: bool,
}

impl RevealGate {
    pub fn new(debounce: Duration) -> Self {
        Self {
            debounce,
            playing_since: None,
            visible: false,
        }
    }

    /// Records a mirrored play state change observed at `now`.
    pub fn on_playing_changed(&mut self, playing: bool, now: Instant) {
        if playing {
            if self.playing_since.is_none() {
                self.playing_since = Some(now);
            }
        } else {
            self.playing_since = None;
            self.visible = false;
        }
    }

    /// Instant at which the pending reveal fires, if one is pending.
    pub fn deadline(&self) -> Option<Instant> {
        match self.playing_since {
            Some(since) if !self.visible => Some(since + self.debounce),
            _ => None,
        }
    }

    /// Advances the gate to `now` and returns visibility.
    pub fn poll(&mut self, now: Instant) -> bool {
        if let Some(deadline) = self.deadline() {
            if now >= deadline {
                self.visible = true;
            }
        }
        self.visible
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

#[cfg(test)]
mod tests {
    use super::RevealGate;
    use tokio::time::{Duration, Instant};

    const WINDOW: Duration = Duration::from_millis(800);

    #[test]
    fn reveals_after_window() {
        let start = Instant::now();
        let mut gate = RevealGate::new(WINDOW);
        gate.on_playing_changed(true, start);
        assert!(!gate.poll(start + Duration::from_millis(799)));
        assert!(gate.poll(start + WINDOW));
        assert_eq!(gate.deadline(), None);
    }

    #[test]
    fn pause_hides_immediately() {
        let start = Instant::now();
        let mut gate = RevealGate::new(WINDOW);
        gate.on_playing_changed(true, start);
        gate.poll(start + WINDOW);
        gate.on_playing_changed(false, start + WINDOW + Duration::from_millis(1));
        assert!(!gate.is_visible());
    }

    #[test]
    fn rapid_toggling_restarts_the_window() {
        let start = Instant::now();
        let mut gate = RevealGate::new(WINDOW);
        gate.on_playing_changed(true, start);
        gate.on_playing_changed(false, start + Duration::from_millis(300));
        gate.on_playing_changed(true, start + Duration::from_millis(500));

        assert!(!gate.poll(start + Duration::from_millis(900)));
        assert_eq!(gate.deadline(), Some(start + Duration::from_millis(1_300)));
        assert!(gate.poll(start + Duration::from_millis(1_300)));
    }

    #[test]
    fn repeated_play_does_not_postpone_reveal() {
        let start = Instant::now();
        let mut gate = RevealGate::new(WINDOW);
        gate.on_playing_changed(true, start);
        gate.on_playing_changed(true, start + Duration::from_millis(400));
        assert!(gate.poll(start + WINDOW));
    }
}
