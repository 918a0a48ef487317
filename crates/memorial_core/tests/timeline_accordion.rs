use memorial_core::{
    LayoutMode, MemoryCatalog, Side, TimelineController, ToggleOutcome, VideoEvent,
    VideoEventOutcome, VideoStatus,
};

fn controller() -> TimelineController {
    TimelineController::new(MemoryCatalog::builtin().unwrap(), 1280, 768)
}

fn expanded_ids(timeline: &TimelineController) -> Vec<u32> {
    timeline
        .cards()
        .iter()
        .filter(|card| card.is_expanded)
        .map(|card| card.record.id)
        .collect()
}

#[test]
fn cards_are_chronological_with_stable_ties() {
    let ids = controller()
        .cards()
        .iter()
        .map(|card| card.record.id)
        .collect::<Vec<_>>();
    assert_eq!(ids, vec![1, 3, 2, 7, 4, 5, 6]);
}

#[test]
fn desktop_alternates_sides() {
    let mut timeline = controller();
    let sides = timeline
        .cards()
        .iter()
        .take(2)
        .map(|card| card.side)
        .collect::<Vec<_>>();
    assert_eq!(sides, vec![Some(Side::Left), Some(Side::Right)]);
    assert_eq!(timeline.on_resize(500), LayoutMode::Mobile);
}

#[test]
fn expanding_b_collapses_a() {
    let mut timeline = controller();
    timeline.toggle(1).unwrap();
    let outcome = timeline.toggle(7).unwrap();
    assert!(matches!(
        outcome,
        ToggleOutcome::Expanded {
            id: 7,
            collapsed: Some(1),
            ..
        }
    ));
    assert_eq!(expanded_ids(&timeline), vec![7]);

    assert_eq!(timeline.toggle(7).unwrap(), ToggleOutcome::Collapsed { id: 7 });
    assert!(expanded_ids(&timeline).is_empty());
}

#[test]
fn collapse_closes_fullscreen_and_reexpand_keeps_it_closed() {
    let mut timeline = controller();
    timeline.toggle(1).unwrap();
    assert!(timeline.toggle_fullscreen(1).unwrap());
    assert_eq!(timeline.fullscreen_id(), Some(1));

    timeline.toggle(1).unwrap();
    assert_eq!(timeline.fullscreen_id(), None);

    timeline.toggle(1).unwrap();
    assert_eq!(timeline.fullscreen_id(), None);
}

#[test]
fn switching_records_closes_previous_fullscreen() {
    let mut timeline = controller();
    timeline.toggle(4).unwrap();
    timeline.toggle_fullscreen(4).unwrap();
    timeline.toggle(5).unwrap();
    assert_eq!(timeline.fullscreen_id(), None);
}

#[test]
fn late_video_event_for_a_does_not_touch_b() {
    let mut timeline = controller();
    let ToggleOutcome::Expanded {
        ticket: ticket_a,
        autoplay,
        ..
    } = timeline.toggle(2).unwrap()
    else {
        panic!("expected expansion");
    };
    assert_eq!(autoplay.unwrap().video_url, "/memories/ubatuba.mp4");

    timeline.toggle(3).unwrap();
    assert_eq!(
        timeline.on_video_event(ticket_a, VideoEvent::Started),
        VideoEventOutcome::Stale
    );
    assert_eq!(timeline.expanded_id(), Some(3));
    assert_eq!(timeline.video_status(3), Some(VideoStatus::Pending));
    assert_eq!(timeline.video_status(2), None);
}

#[test]
fn video_failure_shows_inline_message() {
    let mut timeline = controller();
    let ToggleOutcome::Expanded { ticket, .. } = timeline.toggle(6).unwrap() else {
        panic!("expected expansion");
    };
    assert_eq!(
        timeline.on_video_event(ticket, VideoEvent::Failed("404".to_string())),
        VideoEventOutcome::Applied(VideoStatus::Failed)
    );
    assert_eq!(
        timeline.video_error_message(6),
        Some("Não foi possível carregar o vídeo")
    );
    assert_eq!(timeline.expanded_id(), Some(6));
}
