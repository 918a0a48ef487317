//! Event loop tying the soundtrack element to the coordinator.
//!
//! The host registers element listeners that forward into
//! [`PlaybackSession::dispatch`]. The session owns the only debounce timer;
//! dropping it aborts the loop, so no callback outlives the view.

use super::coordinator::{command_for, MediaCommand, MediaEvent, PlaybackCoordinator, PlaybackSnapshot};
use async_trait::async_trait;
use log::debug;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    /// The element refused to start (autoplay policy, missing source, ...).
    Rejected(String),
    /// The owning view is gone.
    SessionClosed,
}

impl Display for PlaybackError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rejected(reason) => write!(f, "playback rejected: {reason}"),
            Self::SessionClosed => write!(f, "playback session is closed"),
        }
    }
}

impl Error for PlaybackError {}

/// Host media element.
///
/// `play` resolves once the element accepted the request; the actual state
/// change is still reported through a `Play` event.
#[async_trait]
pub trait MediaElement: Send + Sync {
    async fn play(&self) -> Result<(), PlaybackError>;
    fn pause(&self);
}

#[derive(Debug)]
enum SessionInput {
    Media(MediaEvent),
    PlayRejected(String),
}

pub struct PlaybackSession {
    inputs: mpsc::UnboundedSender<SessionInput>,
    /// Last element event as seen by `dispatch`; ahead of the published
    /// snapshot until the loop catches up.
    observed_playing: AtomicBool,
    snapshot: watch::Receiver<PlaybackSnapshot>,
    task: JoinHandle<()>,
}

impl PlaybackSession {
    /// Spawns the loop. Must be called from within a tokio runtime.
    pub fn start(reveal_debounce: Duration) -> Self {
        let (inputs, mut rx) = mpsc::unbounded_channel::<SessionInput>();
        let mut coordinator = PlaybackCoordinator::new(reveal_debounce);
        let (tx, snapshot) = watch::channel(coordinator.snapshot());

        let task = tokio::spawn(async move {
            loop {
                let deadline = coordinator.next_deadline();
                let reveal = async move {
                    match deadline {
                        Some(at) => tokio::time::sleep_until(at).await,
                        None => std::future::pending::<()>().await,
                    }
                };

                let next = tokio::select! {
                    input = rx.recv() => match input {
                        Some(SessionInput::Media(event)) => {
                            coordinator.on_media_event(event, Instant::now())
                        }
                        Some(SessionInput::PlayRejected(reason)) => {
                            coordinator.on_play_rejected(&reason)
                        }
                        None => break,
                    },
                    _ = reveal => coordinator.poll(Instant::now()),
                };
                tx.send_if_modified(|current| {
                    if *current == next {
                        return false;
                    }
                    *current = next;
                    true
                });
            }
            debug!("event=playback_session_closed module=playback status=ok");
        });

        Self {
            inputs,
            observed_playing: AtomicBool::new(false),
            snapshot,
            task,
        }
    }

    /// Forwards one element event. Returns `false` once the session is gone.
    pub fn dispatch(&self, event: MediaEvent) -> bool {
        self.observed_playing
            .store(matches!(event, MediaEvent::Play), Ordering::SeqCst);
        self.inputs.send(SessionInput::Media(event)).is_ok()
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        self.snapshot.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<PlaybackSnapshot> {
        self.snapshot.clone()
    }

    /// Play/pause control handler.
    ///
    /// Decides from the last dispatched element event. A rejected play is recorded and
    /// returned; the displayed state stays paused.
    pub async fn toggle(&self, element: &dyn MediaElement) -> Result<MediaCommand, PlaybackError> {
        if self.task.is_finished() {
            return Err(PlaybackError::SessionClosed);
        }
        let command = command_for(self.observed_playing.load(Ordering::SeqCst));
        match command {
            MediaCommand::Pause => element.pause(),
            MediaCommand::Play => {
                if let Err(err) = element.play().await {
                    let reason = match &err {
                        PlaybackError::Rejected(reason) => reason.clone(),
                        other => other.to_string(),
                    };
                    // A closed session has nothing left to display.
                    let _ = self.inputs.send(SessionInput::PlayRejected(reason));
                    return Err(err);
                }
            }
        }
        Ok(command)
    }

    pub fn is_active(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for PlaybackSession {
    fn drop(&mut self) {
        self.task.abort();
    }
}
