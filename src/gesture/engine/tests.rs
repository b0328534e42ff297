use super::*;

fn frame(timestamp_ms: u32, contacts: &[(usize, i32, i32)], pressed: bool) -> HardwareState {
    let mut hw = HardwareState::empty();
    hw.timestamp_ms = timestamp_ms;
    hw.pressed = pressed;
    for &(slot, x, y) in contacts {
        hw.x[slot] = x;
        hw.y[slot] = y;
        hw.z[slot] = 40;
        hw.finger[slot] = true;
        hw.fingers_count += 1;
    }
    hw
}

fn small_modifier_config() -> GestureConfig {
    let mut config = *active_config();
    config.geometry.modifier_radius = 50;
    config
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn single_finger_move_emits_one_motion() {
    let mut engine = GestureEngine::default();

    let first = engine.evaluate(&frame(0, &[(0, 500, 500)], false));
    assert!(first.actions.is_empty());
    assert_eq!(engine.finger_modes()[0], FingerMode::Move);

    let second = engine.evaluate(&frame(10, &[(0, 510, 505)], false));
    assert_eq!(second.actions.len(), 1);
    assert_eq!(second.actions.motion(), Some((10, 5)));
    assert_eq!(second.actions.scroll(ScrollAxis::Horizontal), None);
    assert_eq!(second.actions.scroll(ScrollAxis::Vertical), None);
}

#[test]
fn move_mode_survives_entering_button_row() {
    let mut engine = GestureEngine::default();
    let height = engine.config().geometry.height;
    let low = height * 9 / 10;

    let _ = engine.evaluate(&frame(0, &[(0, 500, 500)], false));
    let out = engine.evaluate(&frame(10, &[(0, 500, low)], false));

    assert_eq!(out.trace.modes[0], FingerMode::Move);
    assert_eq!(out.actions.motion(), Some((0, low - 500)));
}

#[test]
fn fractional_remainder_carries_into_next_cycle() {
    let mut engine = GestureEngine::new(&small_modifier_config());

    let _ = engine.evaluate(&frame(0, &[(0, 100, 100)], false));
    assert_eq!(engine.finger_modes()[0], FingerMode::Move);
    engine.context.frac_x = 0.6;

    let out = engine.evaluate(&frame(10, &[(0, 103, 104)], false));
    assert_eq!(out.actions.motion(), Some((3, 4)));
    assert!(approx(engine.context().frac_x, 0.6));
    assert!(approx(engine.context().frac_y, 0.0));
}

#[test]
fn modifier_contact_halves_motion_and_keeps_remainder() {
    let mut engine = GestureEngine::default();

    let _ = engine.evaluate(&frame(0, &[(0, 50, 50), (1, 500, 500)], false));
    let out = engine.evaluate(&frame(10, &[(0, 50, 50), (1, 511, 505)], false));
    assert!(out.trace.modifier_active);
    assert_eq!(out.actions.motion(), Some((5, 2)));
    assert!(approx(engine.context().frac_x, 0.5));
    assert!(approx(engine.context().frac_y, 0.5));

    let out = engine.evaluate(&frame(20, &[(0, 50, 50), (1, 512, 506)], false));
    assert_eq!(out.actions.motion(), Some((1, 1)));
}

#[test]
fn slow_motion_is_not_lost_to_truncation() {
    let mut engine = GestureEngine::default();

    let _ = engine.evaluate(&frame(0, &[(0, 50, 50), (1, 500, 500)], false));
    let first = engine.evaluate(&frame(10, &[(0, 50, 50), (1, 501, 500)], false));
    assert_eq!(first.actions.motion(), None);

    let second = engine.evaluate(&frame(20, &[(0, 50, 50), (1, 502, 500)], false));
    assert_eq!(second.actions.motion(), Some((1, 0)));
}

#[test]
fn negative_motion_floors_towards_negative_infinity() {
    let mut engine = GestureEngine::default();

    let _ = engine.evaluate(&frame(0, &[(0, 50, 50), (1, 500, 500)], false));
    let out = engine.evaluate(&frame(10, &[(0, 50, 50), (1, 497, 500)], false));

    assert_eq!(out.actions.motion(), Some((-2, 0)));
    assert!(approx(engine.context().frac_x, 0.5));
}

#[test]
fn two_moving_fingers_sum_their_deltas() {
    let mut engine = GestureEngine::default();

    let _ = engine.evaluate(&frame(0, &[(0, 400, 400), (2, 800, 600)], false));
    let out = engine.evaluate(&frame(10, &[(0, 404, 401), (2, 803, 602)], false));

    assert_eq!(out.trace.moving_fingers, 2);
    assert_eq!(out.actions.motion(), Some((7, 3)));
}

#[test]
fn right_edge_drag_scrolls_vertically() {
    let mut engine = GestureEngine::default();

    let _ = engine.evaluate(&frame(0, &[(0, 2000, 500)], false));
    let out = engine.evaluate(&frame(10, &[(0, 2005, 530)], false));

    assert_eq!(out.trace.modes[0], FingerMode::VertScroll);
    assert_eq!(out.actions.scroll(ScrollAxis::Vertical), Some(30));
    assert_eq!(out.actions.scroll(ScrollAxis::Horizontal), None);
    assert_eq!(out.actions.motion(), None);
}

#[test]
fn top_edge_drag_scrolls_horizontally() {
    let mut engine = GestureEngine::default();

    let _ = engine.evaluate(&frame(0, &[(0, 1000, 50)], false));
    let out = engine.evaluate(&frame(10, &[(0, 960, 70)], false));

    assert_eq!(out.trace.modes[0], FingerMode::HorizScroll);
    assert_eq!(out.actions.scroll(ScrollAxis::Horizontal), Some(-40));
    assert_eq!(out.actions.motion(), None);
}

#[test]
fn scroll_under_modifier_is_scaled_and_truncated() {
    let mut engine = GestureEngine::default();

    let _ = engine.evaluate(&frame(0, &[(0, 50, 50), (1, 2000, 500)], false));
    let out = engine.evaluate(&frame(10, &[(0, 50, 50), (1, 2000, 503)], false));

    assert_eq!(out.actions.scroll(ScrollAxis::Vertical), Some(1));

    let out = engine.evaluate(&frame(20, &[(0, 50, 50), (1, 2000, 506)], false));
    assert_eq!(out.actions.scroll(ScrollAxis::Vertical), Some(1));
}

#[test]
fn sub_unit_scroll_under_modifier_posts_zero_amount() {
    let mut engine = GestureEngine::default();

    let _ = engine.evaluate(&frame(0, &[(0, 50, 50), (1, 2000, 500)], false));
    let out = engine.evaluate(&frame(10, &[(0, 50, 50), (1, 2000, 501)], false));

    assert_eq!(out.trace.raw_scroll_v, 1);
    assert_eq!(
        out.actions.iter().copied().collect::<Vec<_>>(),
        [Action::Scroll {
            axis: ScrollAxis::Vertical,
            amount: 0
        }]
    );
}

#[test]
fn extreme_coordinates_on_lifted_slot_are_ignored() {
    let mut engine = GestureEngine::default();

    let _ = engine.evaluate(&frame(0, &[(0, 500, 500)], false));
    let mut hw = frame(10, &[], false);
    hw.x[0] = i32::MIN;
    hw.y[0] = i32::MIN;
    let out = engine.evaluate(&hw);

    assert_eq!(out.trace.modes[0], FingerMode::Null);
    assert!(out.actions.is_empty());

    let out = engine.evaluate(&frame(20, &[(0, 600, 600)], false));
    assert_eq!(out.trace.modes[0], FingerMode::Move);
    assert!(out.actions.is_empty());
}

#[test]
fn physical_click_without_button_zone_is_left() {
    let mut engine = GestureEngine::default();

    let press = engine.evaluate(&frame(0, &[], true));
    assert_eq!(press.actions.button(), Some((MouseButton::Left, true)));
    assert_eq!(press.trace.ongoing_button, Some(MouseButton::Left));

    let held = engine.evaluate(&frame(10, &[], true));
    assert_eq!(held.actions.button(), None);

    let release = engine.evaluate(&frame(20, &[], false));
    assert_eq!(release.actions.button(), Some((MouseButton::Left, false)));
    assert_eq!(engine.context().ongoing_button, None);
}

#[test]
fn click_with_finger_in_right_zone_is_right() {
    let mut engine = GestureEngine::default();

    let _ = engine.evaluate(&frame(0, &[(0, 1500, 1200)], false));
    let press = engine.evaluate(&frame(10, &[(0, 1500, 1200)], true));
    assert_eq!(press.actions.button(), Some((MouseButton::Right, true)));
    assert_eq!(MouseButton::Right.id(), 3);

    let release = engine.evaluate(&frame(20, &[(0, 1500, 1200)], false));
    assert_eq!(release.actions.button(), Some((MouseButton::Right, false)));
}

#[test]
fn click_with_finger_in_middle_zone_is_middle() {
    let mut engine = GestureEngine::default();

    let press = engine.evaluate(&frame(0, &[(0, 1016, 1000)], true));
    assert_eq!(press.trace.modes[0], FingerMode::MiddleBtn);
    assert_eq!(press.actions.button(), Some((MouseButton::Middle, true)));
}

#[test]
fn click_with_left_zone_and_moving_finger_is_left() {
    let mut engine = GestureEngine::default();

    let press = engine.evaluate(&frame(0, &[(0, 300, 1200), (1, 600, 500)], true));
    assert_eq!(press.trace.modes[0], FingerMode::LeftBtn);
    assert_eq!(press.trace.modes[1], FingerMode::Move);
    assert_eq!(press.actions.button(), Some((MouseButton::Left, true)));
}

#[test]
fn mixed_button_zones_synthesize_nothing() {
    let mut engine = GestureEngine::default();

    let out = engine.evaluate(&frame(0, &[(0, 300, 1200), (1, 1500, 1200)], true));
    assert_eq!(out.actions.button(), None);
    assert_eq!(engine.context().ongoing_button, None);

    let out = engine.evaluate(&frame(10, &[(0, 300, 1200), (1, 1500, 1200)], false));
    assert_eq!(out.actions.button(), None);
}

#[test]
fn release_reports_the_button_chosen_at_press_time() {
    let mut engine = GestureEngine::default();

    let press = engine.evaluate(&frame(0, &[(0, 1500, 1200)], true));
    assert_eq!(press.actions.button(), Some((MouseButton::Right, true)));

    let _ = engine.evaluate(&frame(10, &[(0, 300, 1200)], true));
    assert_eq!(engine.finger_modes()[0], FingerMode::LeftBtn);

    let release = engine.evaluate(&frame(20, &[], false));
    assert_eq!(release.actions.button(), Some((MouseButton::Right, false)));
}

#[test]
fn last_positions_track_every_slot() {
    let mut engine = GestureEngine::default();

    let _ = engine.evaluate(&frame(0, &[(1, 700, 700)], false));
    let context = engine.context();
    assert_eq!(context.last_x, [-1, 700, -1, -1, -1]);
    assert_eq!(context.last_y, [-1, 700, -1, -1, -1]);
}

#[test]
fn lifted_finger_returns_to_null_without_motion() {
    let mut engine = GestureEngine::default();

    let _ = engine.evaluate(&frame(0, &[(0, 500, 500)], false));
    let out = engine.evaluate(&frame(10, &[], false));

    assert_eq!(out.trace.modes[0], FingerMode::Null);
    assert!(out.actions.is_empty());

    let again = engine.evaluate(&frame(20, &[(0, 900, 900)], false));
    assert!(again.actions.is_empty());
}

#[test]
fn evaluation_recommends_configured_repoll_delay() {
    let mut engine = GestureEngine::default();
    let out = engine.evaluate(&frame(0, &[], false));
    assert_eq!(out.delay_ms, active_config().motion.repoll_delay_ms);
}

#[test]
fn reset_force_releases_held_button_and_clears_context() {
    let mut engine = GestureEngine::default();

    let _ = engine.evaluate(&frame(0, &[(0, 50, 50), (1, 500, 500)], true));
    let _ = engine.evaluate(&frame(10, &[(0, 50, 50), (1, 501, 500)], true));
    assert!(engine.context().frac_x > 0.0);

    let released = engine.reset();
    assert_eq!(
        released,
        Some(Action::Button {
            button: MouseButton::Left,
            pressed: false
        })
    );
    assert_eq!(*engine.context(), GestureContext::default());
    assert_eq!(engine.finger_modes(), [FingerMode::Null; SLOT_COUNT]);
    assert_eq!(engine.reset(), None);
}

#[test]
fn resized_geometry_moves_the_zones() {
    let mut engine = GestureEngine::default();
    let geometry = engine.config().geometry.with_surface(1000, 800);
    engine.set_geometry(geometry);

    let out = engine.evaluate(&frame(0, &[(0, 950, 400)], false));
    assert_eq!(out.trace.modes[0], FingerMode::VertScroll);
}
