use super::super::codes::{ABS_MT_TOUCH_MAJOR, BTN_TOUCH, EV_SYN, SYN_DROPPED};
use super::super::state::NO_CONTACT;
use super::*;

fn t(ms: u64) -> EventTime {
    EventTime::from_millis(ms)
}

fn touch_down(slot: i32, id: i32, x: i32, y: i32, z: i32, ms: u64) -> [RawEvent; 5] {
    [
        RawEvent::abs(ABS_MT_SLOT, slot, t(ms)),
        RawEvent::abs(ABS_MT_TRACKING_ID, id, t(ms)),
        RawEvent::abs(ABS_MT_POSITION_X, x, t(ms)),
        RawEvent::abs(ABS_MT_POSITION_Y, y, t(ms)),
        RawEvent::abs(ABS_MT_PRESSURE, z, t(ms)),
    ]
}

fn feed_all(reducer: &mut HwStateReducer, events: &[RawEvent]) -> Vec<HardwareState> {
    events.iter().filter_map(|ev| reducer.feed(ev)).collect()
}

#[test]
fn no_snapshot_until_report() {
    let mut reducer = HwStateReducer::new(TimestampSource::Monotonic);

    let frames = feed_all(&mut reducer, &touch_down(0, 7, 500, 600, 40, 10));
    assert!(frames.is_empty());
    assert_eq!(reducer.current().fingers_count, 1);
}

#[test]
fn report_emits_snapshot_with_event_time() {
    let mut reducer = HwStateReducer::new(TimestampSource::Monotonic);
    let _ = feed_all(&mut reducer, &touch_down(0, 7, 500, 600, 40, 10));

    let snapshot = reducer
        .feed(&RawEvent::report(EventTime::new(3, 250_000)))
        .expect("report closes the frame");

    assert_eq!(snapshot.timestamp_ms, 3_250);
    assert!(snapshot.finger[0]);
    assert_eq!((snapshot.x[0], snapshot.y[0], snapshot.z[0]), (500, 600, 40));
    assert_eq!(snapshot.fingers_count, 1);
}

#[test]
fn host_clock_stamps_snapshots_when_not_monotonic() {
    let clock = Arc::new(|| 42_000u32);
    let mut reducer = HwStateReducer::new(TimestampSource::Host(clock));

    let snapshot = reducer.feed(&RawEvent::report(t(5))).expect("frame");
    assert_eq!(snapshot.timestamp_ms, 42_000);
}

#[test]
fn multiple_slots_track_live_count() {
    let mut reducer = HwStateReducer::new(TimestampSource::Monotonic);
    let mut events = Vec::new();
    events.extend(touch_down(0, 1, 100, 100, 30, 0));
    events.extend(touch_down(3, 2, 900, 400, 35, 0));
    events.push(RawEvent::report(t(0)));

    let frames = feed_all(&mut reducer, &events);
    assert_eq!(frames.len(), 1);
    let snapshot = frames[0];
    assert_eq!(snapshot.fingers_count, 2);
    assert_eq!(snapshot.live_slots(), 2);
    for slot in 0..SLOT_COUNT {
        if snapshot.finger[slot] {
            assert_ne!(snapshot.x[slot], NO_CONTACT);
            assert_ne!(snapshot.y[slot], NO_CONTACT);
            assert_ne!(snapshot.z[slot], NO_CONTACT);
        }
    }
}

#[test]
fn negative_tracking_id_restores_empty_slot() {
    let mut reducer = HwStateReducer::new(TimestampSource::Monotonic);
    let _ = feed_all(&mut reducer, &touch_down(2, 9, 300, 300, 50, 0));
    let _ = reducer.feed(&RawEvent::report(t(0)));

    let _ = reducer.feed(&RawEvent::abs(ABS_MT_SLOT, 2, t(8)));
    let _ = reducer.feed(&RawEvent::abs(ABS_MT_TRACKING_ID, -1, t(8)));
    let snapshot = reducer.feed(&RawEvent::report(t(8))).expect("frame");

    assert_eq!(snapshot.fingers_count, 0);
    assert!(!snapshot.finger[2]);
    assert_eq!(
        (snapshot.x[2], snapshot.y[2], snapshot.z[2]),
        (NO_CONTACT, NO_CONTACT, NO_CONTACT)
    );
}

#[test]
fn duplicate_tracking_id_does_not_double_count() {
    let mut reducer = HwStateReducer::new(TimestampSource::Monotonic);
    let _ = feed_all(&mut reducer, &touch_down(1, 4, 300, 300, 50, 0));
    let _ = reducer.feed(&RawEvent::abs(ABS_MT_TRACKING_ID, 5, t(0)));
    let snapshot = reducer.feed(&RawEvent::report(t(0))).expect("frame");

    assert_eq!(snapshot.fingers_count, 1);
}

#[test]
fn release_of_empty_slot_does_not_go_negative() {
    let mut reducer = HwStateReducer::new(TimestampSource::Monotonic);
    let _ = reducer.feed(&RawEvent::abs(ABS_MT_SLOT, 4, t(0)));
    let _ = reducer.feed(&RawEvent::abs(ABS_MT_TRACKING_ID, -1, t(0)));
    let snapshot = reducer.feed(&RawEvent::report(t(0))).expect("frame");

    assert_eq!(snapshot.fingers_count, 0);
}

#[test]
fn positions_are_sticky_between_frames() {
    let mut reducer = HwStateReducer::new(TimestampSource::Monotonic);
    let _ = feed_all(&mut reducer, &touch_down(0, 1, 640, 480, 20, 0));
    let first = reducer.feed(&RawEvent::report(t(10))).expect("first");

    let _ = reducer.feed(&RawEvent::abs(ABS_MT_POSITION_X, 650, t(20)));
    let second = reducer.feed(&RawEvent::report(t(20))).expect("second");

    assert_eq!(second.x[0], 650);
    assert_eq!(second.y[0], first.y[0]);
    assert_eq!(second.z[0], first.z[0]);
}

#[test]
fn repeated_report_yields_identical_snapshot_except_time() {
    let mut reducer = HwStateReducer::new(TimestampSource::Monotonic);
    let _ = feed_all(&mut reducer, &touch_down(0, 1, 640, 480, 20, 0));
    let _ = reducer.feed(&RawEvent::key(BTN_MOUSE, true, t(0)));

    let first = reducer.feed(&RawEvent::report(t(10))).expect("first");
    let second = reducer.feed(&RawEvent::report(t(24))).expect("second");

    assert_eq!(first.timestamp_ms, 10);
    assert_eq!(second.timestamp_ms, 24);
    assert_eq!(
        HardwareState {
            timestamp_ms: 0,
            ..first
        },
        HardwareState {
            timestamp_ms: 0,
            ..second
        }
    );
}

#[test]
fn primary_button_tracks_key_value() {
    let mut reducer = HwStateReducer::new(TimestampSource::Monotonic);

    let _ = reducer.feed(&RawEvent::key(BTN_MOUSE, true, t(0)));
    assert!(reducer.feed(&RawEvent::report(t(0))).expect("frame").pressed);

    let _ = reducer.feed(&RawEvent::key(BTN_TOUCH, false, t(1)));
    assert!(reducer.feed(&RawEvent::report(t(1))).expect("frame").pressed);

    let _ = reducer.feed(&RawEvent::key(BTN_MOUSE, false, t(2)));
    assert!(!reducer.feed(&RawEvent::report(t(2))).expect("frame").pressed);
}

#[test]
fn out_of_range_slot_discards_per_slot_events() {
    let mut reducer = HwStateReducer::new(TimestampSource::Monotonic);
    let _ = reducer.feed(&RawEvent::abs(ABS_MT_SLOT, 7, t(0)));

    let err = reducer
        .try_feed(&RawEvent::abs(ABS_MT_TRACKING_ID, 3, t(0)))
        .expect_err("slot 7 is not tracked");
    assert_eq!(err, TouchpadError::MalformedSlot { slot: 7 });

    let _ = reducer.feed(&RawEvent::abs(ABS_MT_POSITION_X, 10, t(0)));
    let snapshot = reducer.feed(&RawEvent::report(t(0))).expect("frame");

    assert_eq!(snapshot, HardwareState::empty());
    assert_eq!(reducer.stats().malformed_events, 1);
    assert_eq!(reducer.stats().frames, 1);
}

#[test]
fn valid_slot_select_recovers_after_malformed_one() {
    let mut reducer = HwStateReducer::new(TimestampSource::Monotonic);
    let _ = reducer.feed(&RawEvent::abs(ABS_MT_SLOT, -3, t(0)));
    let _ = reducer.feed(&RawEvent::abs(ABS_MT_TRACKING_ID, 3, t(0)));
    let _ = feed_all(&mut reducer, &touch_down(1, 3, 200, 210, 25, 0));

    let snapshot = reducer.feed(&RawEvent::report(t(0))).expect("frame");
    assert_eq!(snapshot.fingers_count, 1);
    assert!(snapshot.finger[1]);
}

#[test]
fn unknown_axis_and_type_codes_are_ignored() {
    let mut reducer = HwStateReducer::new(TimestampSource::Monotonic);
    let _ = reducer.feed(&RawEvent::abs(ABS_MT_TOUCH_MAJOR, 12, t(0)));
    let _ = reducer.feed(&RawEvent::new(0x04, 0x04, 1, t(0)));

    let snapshot = reducer.feed(&RawEvent::report(t(0))).expect("frame");
    assert_eq!(snapshot, HardwareState::empty());
    assert_eq!(reducer.stats().ignored_events, 2);
}

#[test]
fn synthesized_frame_carries_last_sync_time() {
    let mut reducer = HwStateReducer::new(TimestampSource::Monotonic);
    let _ = reducer.feed(&RawEvent::report(t(120)));
    let _ = feed_all(&mut reducer, &touch_down(0, 1, 400, 400, 30, 130));
    let _ = reducer.feed(&RawEvent::new(EV_SYN, SYN_DROPPED, 0, t(135)));

    let snapshot = reducer.synthesize_frame();
    assert_eq!(snapshot.timestamp_ms, 135);
    assert!(snapshot.finger[0]);
    assert_eq!(reducer.stats().synthesized_frames, 1);
}

#[test]
fn reset_restores_empty_state() {
    let mut reducer = HwStateReducer::new(TimestampSource::Monotonic);
    let _ = feed_all(&mut reducer, &touch_down(3, 1, 400, 400, 30, 0));
    reducer.reset();

    assert_eq!(*reducer.current(), HardwareState::empty());
    let _ = reducer.feed(&RawEvent::abs(ABS_MT_TRACKING_ID, 2, t(0)));
    assert!(reducer.current().finger[0]);
}
