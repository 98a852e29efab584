#![allow(clippy::float_cmp)]

use super::*;

const PAGE_HEIGHT: f64 = 1000.0;
const ELEMENT: Size = Size { width: 250.0, height: 50.0 };

fn controller() -> DragController {
    DragController::new(DragConfig::default())
}

fn dragging_from(pointer: Point, position: Point) -> DragController {
    let mut drag = controller();
    drag.begin(pointer, position);
    drag
}

// =============================================================
// State transitions
// =============================================================

#[test]
fn new_controller_is_idle_with_zero_offset() {
    let drag = controller();
    assert_eq!(drag.state(), DragState::Idle);
    assert!(!drag.is_dragging());
    assert_eq!(drag.offset(), Point::default());
}

#[test]
fn begin_records_grab_offset() {
    let drag = dragging_from(Point::new(130.0, 220.0), Point::new(100.0, 200.0));
    assert!(drag.is_dragging());
    assert_eq!(drag.offset(), Point::new(30.0, 20.0));
}

#[test]
fn end_returns_to_idle_and_resets_offset() {
    let mut drag = dragging_from(Point::new(130.0, 220.0), Point::new(100.0, 200.0));
    drag.end();
    assert_eq!(drag.state(), DragState::Idle);
    assert_eq!(drag.offset(), Point::default());
}

#[test]
fn update_while_idle_does_nothing() {
    let drag = controller();
    assert_eq!(drag.update(Point::new(10.0, 10.0), Point::new(0.0, 50.0), ELEMENT, PAGE_HEIGHT), None);
}

// =============================================================
// Movement and containment
// =============================================================

#[test]
fn move_inside_page_follows_pointer_on_both_axes() {
    let drag = dragging_from(Point::new(130.0, 220.0), Point::new(100.0, 200.0));
    let next = drag.update(Point::new(180.0, 320.0), Point::new(100.0, 200.0), ELEMENT, PAGE_HEIGHT);
    assert_eq!(next, Some(Point::new(150.0, 300.0)));
}

#[test]
fn horizontal_axis_is_not_clamped() {
    let drag = dragging_from(Point::new(130.0, 220.0), Point::new(100.0, 200.0));
    let next = drag.update(Point::new(-5000.0, 320.0), Point::new(100.0, 200.0), ELEMENT, PAGE_HEIGHT);
    assert_eq!(next, Some(Point::new(-5030.0, 300.0)));
}

#[test]
fn candidate_past_bottom_nudges_up_from_current() {
    let current = Point::new(100.0, 940.0);
    let drag = dragging_from(Point::new(110.0, 950.0), current);
    // Candidate y = 990 - 10 = 980 >= 1000 - 50.
    let next = drag.update(Point::new(400.0, 990.0), current, ELEMENT, PAGE_HEIGHT);
    assert_eq!(next, Some(Point::new(100.0, 935.0)));
}

#[test]
fn candidate_exactly_at_bottom_limit_is_clamped() {
    let current = Point::new(0.0, 900.0);
    let drag = dragging_from(Point::new(0.0, 900.0), current);
    let next = drag.update(Point::new(0.0, 950.0), current, ELEMENT, PAGE_HEIGHT);
    assert_eq!(next, Some(Point::new(0.0, 895.0)));
}

#[test]
fn candidate_above_top_nudges_down_from_current() {
    let current = Point::new(60.0, 12.0);
    let drag = dragging_from(Point::new(70.0, 20.0), current);
    let next = drag.update(Point::new(300.0, -40.0), current, ELEMENT, PAGE_HEIGHT);
    assert_eq!(next, Some(Point::new(60.0, 17.0)));
}

#[test]
fn candidate_exactly_zero_is_clamped() {
    let current = Point::new(0.0, 3.0);
    let drag = dragging_from(Point::new(0.0, 3.0), current);
    let next = drag.update(Point::new(0.0, 0.0), current, ELEMENT, PAGE_HEIGHT);
    assert_eq!(next, Some(Point::new(0.0, 8.0)));
}

#[test]
fn containment_property_over_candidates() {
    let current = Point::new(10.0, 500.0);
    let drag = dragging_from(current, current);
    for y in [-300.0, 0.0, 1.0, 499.0, 949.0, 950.0, 2000.0] {
        let next = drag.update(Point::new(10.0, y), current, ELEMENT, PAGE_HEIGHT);
        let expected_y = if y >= PAGE_HEIGHT - ELEMENT.height {
            current.y - 5.0
        } else if y <= 0.0 {
            current.y + 5.0
        } else {
            y
        };
        assert_eq!(next.map(|p| p.y), Some(expected_y), "candidate y {y}");
    }
}

#[test]
fn custom_nudge_is_used() {
    let mut drag = DragController::new(DragConfig { nudge: 12.0 });
    let current = Point::new(0.0, 940.0);
    drag.begin(current, current);
    let next = drag.update(Point::new(0.0, 999.0), current, ELEMENT, PAGE_HEIGHT);
    assert_eq!(next, Some(Point::new(0.0, 928.0)));
}
