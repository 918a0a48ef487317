use memorial_core::{
    MediaCommand, MediaElement, MediaEvent, PlaybackError, PlaybackSession, PlaybackSnapshot,
};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, Ordering};
use tokio::time::Duration;

const WINDOW: Duration = Duration::from_millis(800);

async fn settle() {
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}

fn visible(session: &PlaybackSession) -> bool {
    session.snapshot().timeline_visible
}

#[tokio::test(start_paused = true)]
async fn play_reveals_after_window() {
    let session = PlaybackSession::start(WINDOW);
    session.dispatch(MediaEvent::Play);
    settle().await;
    assert!(session.snapshot().is_playing);
    assert!(!visible(&session));

    tokio::time::advance(Duration::from_millis(799)).await;
    settle().await;
    assert!(!visible(&session));

    tokio::time::advance(Duration::from_millis(1)).await;
    settle().await;
    assert!(visible(&session));
}

#[tokio::test(start_paused = true)]
async fn pause_hides_immediately() {
    let session = PlaybackSession::start(WINDOW);
    session.dispatch(MediaEvent::Play);
    settle().await;
    tokio::time::advance(Duration::from_secs(1)).await;
    settle().await;
    assert!(visible(&session));

    session.dispatch(MediaEvent::Pause);
    settle().await;
    assert_eq!(
        session.snapshot(),
        PlaybackSnapshot {
            is_playing: false,
            timeline_visible: false,
            last_play_error: None,
            hide_count: 1,
        }
    );
}

#[tokio::test(start_paused = true)]
async fn rapid_toggling_never_flickers() {
    let session = PlaybackSession::start(WINDOW);
    for _ in 0..5 {
        session.dispatch(MediaEvent::Play);
        settle().await;
        tokio::time::advance(Duration::from_millis(300)).await;
        settle().await;
        assert!(!visible(&session));
        session.dispatch(MediaEvent::Pause);
        settle().await;
        assert!(!visible(&session));
    }

    // Last state wins: a final sustained play still reveals.
    session.dispatch(MediaEvent::Play);
    settle().await;
    tokio::time::advance(WINDOW).await;
    settle().await;
    assert!(visible(&session));
}

#[tokio::test(start_paused = true)]
async fn ended_counts_as_pause() {
    let session = PlaybackSession::start(WINDOW);
    session.dispatch(MediaEvent::Play);
    settle().await;
    session.dispatch(MediaEvent::Ended);
    settle().await;
    tokio::time::advance(Duration::from_secs(2)).await;
    settle().await;
    assert!(!session.snapshot().is_playing);
    assert!(!visible(&session));
}

struct AcceptingElement {
    plays: AtomicU32,
}

#[async_trait]
impl MediaElement for AcceptingElement {
    async fn play(&self) -> Result<(), PlaybackError> {
        self.plays.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn pause(&self) {}
}

#[tokio::test(start_paused = true)]
async fn accepted_play_still_waits_for_the_event() {
    let session = PlaybackSession::start(WINDOW);
    let element = AcceptingElement {
        plays: AtomicU32::new(0),
    };
    assert_eq!(session.toggle(&element).await.unwrap(), MediaCommand::Play);
    settle().await;
    assert_eq!(element.plays.load(Ordering::SeqCst), 1);
    assert!(!session.snapshot().is_playing);
    assert_eq!(session.snapshot().status_message(), memorial_core::playback::PAUSED_MESSAGE);
}

#[tokio::test(start_paused = true)]
async fn click_after_play_event_pauses_even_before_the_loop_runs() {
    let session = PlaybackSession::start(WINDOW);
    let element = AcceptingElement {
        plays: AtomicU32::new(0),
    };
    session.dispatch(MediaEvent::Play);
    assert_eq!(session.toggle(&element).await.unwrap(), MediaCommand::Pause);
    assert_eq!(element.plays.load(Ordering::SeqCst), 0);
}
