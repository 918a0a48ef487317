use chrono::{Duration, TimeZone, Utc};
use memorial_core::{countdown_between, CountdownEngine, CountdownState, CountdownTicker, ManualClock};
use std::sync::Arc;

#[test]
fn one_of_each_unit_before_target() {
    let target = Utc.with_ymd_and_hms(2025, 10, 3, 21, 13, 0).unwrap();
    let state = countdown_between(target, target - Duration::seconds(90_061));
    assert_eq!(
        state,
        CountdownState {
            days: 1,
            hours: 1,
            minutes: 1,
            seconds: 1
        }
    );
}

#[test]
fn zero_at_and_after_target() {
    let target = Utc.with_ymd_and_hms(2025, 10, 3, 21, 13, 0).unwrap();
    for offset in [0, 1, 59, 86_400, 10_000_000] {
        assert_eq!(
            countdown_between(target, target + Duration::seconds(offset)),
            CountdownState::ZERO
        );
    }
}

#[test]
fn units_render_two_digits() {
    let target = Utc.with_ymd_and_hms(2025, 10, 3, 21, 13, 0).unwrap();
    let cells = countdown_between(target, target - Duration::seconds(3 * 86_400 + 5))
        .units()
        .iter()
        .map(|unit| (unit.padded(), unit.label))
        .collect::<Vec<_>>();
    assert_eq!(
        cells,
        vec![
            ("03".to_string(), "DIAS"),
            ("00".to_string(), "HORAS"),
            ("00".to_string(), "MINUTOS"),
            ("05".to_string(), "SEGUNDOS"),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn ticker_reads_the_clock_instead_of_counting() {
    let target = Utc.with_ymd_and_hms(2025, 10, 3, 21, 13, 0).unwrap();
    let clock = Arc::new(ManualClock::new(target - Duration::seconds(120)));
    let ticker = CountdownTicker::start(CountdownEngine::new(target, clock.clone()));
    let mut rx = ticker.subscribe();

    // A long suspension: the wall clock jumps 100s while one tick elapses.
    clock.advance(Duration::seconds(100));
    tokio::time::advance(std::time::Duration::from_secs(1)).await;
    rx.changed().await.unwrap();
    assert_eq!(rx.borrow_and_update().seconds, 20);

    clock.set(target);
    tokio::time::advance(std::time::Duration::from_secs(1)).await;
    rx.changed().await.unwrap();
    assert!(rx.borrow_and_update().is_finished());
}
