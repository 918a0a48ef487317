//! Countdown to the configured target instant.
//!
//! # Responsibility
//! - Decompose the time left until the target into days/hours/minutes/seconds.
//! - Abstract "now" behind [`Clock`] so ticks always read the true instant.
//!
//! # Invariants
//! - State is recomputed from `(target, now)`, never decremented.
//! - Once `now >= target` every component is zero; no negative values exist.

pub mod ticker;

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::sync::{Arc, Mutex};

pub use ticker::CountdownTicker;

const SECONDS_PER_DAY: i64 = 86_400;
const SECONDS_PER_HOUR: i64 = 3_600;
const SECONDS_PER_MINUTE: i64 = 60;

/// Remaining time to the target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CountdownState {
    pub days: u64,
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
}

/// One labelled cell of the countdown grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeUnit {
    pub value: u64,
    pub label: &'static str,
}

impl TimeUnit {
    /// Zero-padded to two digits.
    pub fn padded(&self) -> String {
        format!("{:02}", self.value)
    }
}

impl CountdownState {
    pub const ZERO: CountdownState = CountdownState {
        days: 0,
        hours: 0,
        minutes: 0,
        seconds: 0,
    };

    pub fn is_finished(&self) -> bool {
        *self == Self::ZERO
    }

    /// Display cells in grid order.
    pub fn units(&self) -> [TimeUnit; 4] {
        [
            TimeUnit {
                value: self.days,
                label: "DIAS",
            },
            TimeUnit {
                value: u64::from(self.hours),
                label: "HORAS",
            },
            TimeUnit {
                value: u64::from(self.minutes),
                label: "MINUTOS",
            },
            TimeUnit {
                value: u64::from(self.seconds),
                label: "SEGUNDOS",
            },
        ]
    }
}

/// Time left from `now` until `target`, truncated to whole seconds.
pub fn countdown_between(target: DateTime<Utc>, now: DateTime<Utc>) -> CountdownState {
    if now >= target {
        return CountdownState::ZERO;
    }

    let remaining = (target - now).num_seconds();
    if remaining <= 0 {
        // Less than one whole second left.
        return CountdownState::ZERO;
    }

    CountdownState {
        days: (remaining / SECONDS_PER_DAY) as u64,
        hours: ((remaining / SECONDS_PER_HOUR) % 24) as u8,
        minutes: ((remaining / SECONDS_PER_MINUTE) % 60) as u8,
        seconds: (remaining % 60) as u8,
    }
}

/// Source of the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Externally driven clock for tests and demos.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    pub fn set(&self, instant: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = instant;
    }

    pub fn advance(&self, by: ChronoDuration) {
        let mut guard = self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Target instant bound to a clock.
#[derive(Clone)]
pub struct CountdownEngine {
    target: DateTime<Utc>,
    clock: Arc<dyn Clock>,
}

impl CountdownEngine {
    pub fn new(target: DateTime<Utc>, clock: Arc<dyn Clock>) -> Self {
        Self { target, clock }
    }

    pub fn with_system_clock(target: DateTime<Utc>) -> Self {
        Self::new(target, Arc::new(SystemClock))
    }

    pub fn target(&self) -> DateTime<Utc> {
        self.target
    }

    /// Recomputes from the clock's current instant.
    pub fn current(&self) -> CountdownState {
        countdown_between(self.target, self.clock.now())
    }
}

#[cfg(test)]
mod tests {
    use super::{countdown_between, CountdownEngine, CountdownState, ManualClock};
    use chrono::{Duration, TimeZone, Utc};
    use std::sync::Arc;

    #[test]
    fn one_of_each_unit() {
        let target = Utc.with_ymd_and_hms(2025, 10, 3, 21, 13, 0).unwrap();
        let now = target - Duration::seconds(90_061);
        assert_eq!(
            countdown_between(target, now),
            CountdownState {
                days: 1,
                hours: 1,
                minutes: 1,
                seconds: 1
            }
        );
    }

    #[test]
    fn clamps_to_zero_at_and_after_target() {
        let target = Utc.with_ymd_and_hms(2025, 10, 3, 21, 13, 0).unwrap();
        assert!(countdown_between(target, target).is_finished());
        assert!(countdown_between(target, target + Duration::days(400)).is_finished());
        assert!(countdown_between(target, target - Duration::milliseconds(400)).is_finished());
    }

    #[test]
    fn truncates_partial_seconds() {
        let target = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let now = target - Duration::milliseconds(59_999);
        let state = countdown_between(target, now);
        assert_eq!(state.minutes, 0);
        assert_eq!(state.seconds, 59);
    }

    #[test]
    fn engine_reads_clock_each_call() {
        let target = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let clock = ManualClock::new(target - Duration::hours(50));
        let engine = CountdownEngine::new(target, Arc::new(clock.clone()));
        assert_eq!(engine.current().days, 2);
        assert_eq!(engine.current().hours, 2);

        clock.advance(Duration::hours(49));
        assert_eq!(engine.current().days, 0);
        assert_eq!(engine.current().hours, 1);
    }

    #[test]
    fn units_are_padded_and_labelled() {
        let units = CountdownState {
            days: 120,
            hours: 3,
            minutes: 0,
            seconds: 9,
        }
        .units();
        let rendered = units
            .iter()
            .map(|unit| format!("{} {}", unit.padded(), unit.label))
            .collect::<Vec<_>>();
        assert_eq!(
            rendered,
            vec!["120 DIAS", "03 HORAS", "00 MINUTOS", "09 SEGUNDOS"]
        );
    }
}
