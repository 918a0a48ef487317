//! One-second countdown refresh bound to a view's lifetime.

use super::{CountdownEngine, CountdownState};
use log::debug;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Background refresh task publishing [`CountdownState`].
///
/// Dropping the ticker aborts the task; no timer outlives the owning view.
/// The task ends on its own after publishing the all-zero state.
pub struct CountdownTicker {
    state: watch::Receiver<CountdownState>,
    task: JoinHandle<()>,
}

impl CountdownTicker {
    /// Publishes the current state immediately, then once per [`TICK_PERIOD`].
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(engine: CountdownEngine) -> Self {
        let initial = engine.current();
        let (tx, rx) = watch::channel(initial);

        let task = tokio::spawn(async move {
            if initial.is_finished() {
                return;
            }
            let mut interval = tokio::time::interval(TICK_PERIOD);
            // A suspended view catches up with one fresh read, not a burst.
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick completes immediately and was covered by `initial`.
            interval.tick().await;

            loop {
                interval.tick().await;
                let state = engine.current();
                tx.send_replace(state);
                if state.is_finished() {
                    debug!("event=countdown_finished module=countdown status=ok");
                    break;
                }
            }
        });

        debug!("event=countdown_started module=countdown status=ok");
        Self { state: rx, task }
    }

    pub fn current(&self) -> CountdownState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<CountdownState> {
        self.state.clone()
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Consumes the ticker; dropping it aborts the task.
    pub fn stop(self) {}
}

impl Drop for CountdownTicker {
    fn drop(&mut self) {
        self.task.abort();
    }
}
