use super::*;

fn wheel(dy: f64) -> WheelDelta {
    WheelDelta { dx: 0.0, dy }
}

fn ctrl() -> Modifiers {
    Modifiers { ctrl: true, ..Default::default() }
}

fn shift() -> Modifiers {
    Modifiers { shift: true, ..Default::default() }
}

// =============================================================
// Modifiers / InputState
// =============================================================

#[test]
fn modifiers_default_all_false() {
    let m = Modifiers::default();
    assert!(!m.shift);
    assert!(!m.ctrl);
    assert!(!m.alt);
    assert!(!m.meta);
}

#[test]
fn input_state_default_is_idle() {
    assert_eq!(InputState::default(), InputState::Idle);
}

#[test]
fn pointer_event_new_keeps_fields() {
    let ev = PointerEvent::new(Point::new(3.0, 4.0), Button::Secondary, ctrl());
    assert_eq!(ev.screen, Point::new(3.0, 4.0));
    assert_eq!(ev.button, Button::Secondary);
    assert!(ev.modifiers.ctrl);
}

// =============================================================
// wheel_gesture
// =============================================================

#[test]
fn ctrl_wheel_up_zooms_in() {
    assert_eq!(wheel_gesture(wheel(-120.0), ctrl()), WheelGesture::Zoom(ZoomDirection::Increase));
}

#[test]
fn ctrl_wheel_down_zooms_out() {
    assert_eq!(wheel_gesture(wheel(120.0), ctrl()), WheelGesture::Zoom(ZoomDirection::Decrease));
}

#[test]
fn ctrl_takes_priority_over_shift() {
    let both = Modifiers { ctrl: true, shift: true, ..Default::default() };
    assert!(matches!(wheel_gesture(wheel(-1.0), both), WheelGesture::Zoom(_)));
}

#[test]
fn shift_wheel_pans_horizontally() {
    assert_eq!(
        wheel_gesture(wheel(-120.0), shift()),
        WheelGesture::Pan(Axis::Horizontal, PanDirection::TowardStart)
    );
    assert_eq!(
        wheel_gesture(wheel(120.0), shift()),
        WheelGesture::Pan(Axis::Horizontal, PanDirection::TowardEnd)
    );
}

#[test]
fn plain_wheel_down_pans_toward_end() {
    assert_eq!(
        wheel_gesture(wheel(120.0), Modifiers::default()),
        WheelGesture::Pan(Axis::Vertical, PanDirection::TowardEnd)
    );
}

#[test]
fn plain_wheel_up_or_still_pans_toward_start() {
    for dy in [-120.0, 0.0] {
        assert_eq!(
            wheel_gesture(wheel(dy), Modifiers::default()),
            WheelGesture::Pan(Axis::Vertical, PanDirection::TowardStart)
        );
    }
}
