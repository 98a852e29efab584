//! Input model: mouse buttons, modifier keys, wheel deltas, and gesture state.
//!
//! Pointer coordinates arrive in screen space (CSS pixels relative to the
//! canvas). The wheel gesture mapping decides whether a wheel notch zooms or
//! pans, and along which axis.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::element::ElementId;
use crate::viewport::{Axis, PanDirection, Point, ZoomDirection};

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down).
    pub dy: f64,
}

/// A pointer event in screen space.
///
/// Kept by the context menu as the originating event of a session, so an
/// action like "add annotation" can be placed where the menu was opened.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub screen: Point,
    pub button: Button,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    #[must_use]
    pub fn new(screen: Point, button: Button, modifiers: Modifiers) -> Self {
        Self { screen, button, modifiers }
    }
}

/// What a wheel notch asks the viewport to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelGesture {
    Zoom(ZoomDirection),
    Pan(Axis, PanDirection),
}

/// Map a wheel event to a viewport gesture.
///
/// Ctrl zooms (scrolling up zooms in), Shift pans horizontally (scrolling up
/// pans toward the start), and a plain wheel pans vertically (scrolling down
/// moves toward the end of the document).
#[must_use]
pub fn wheel_gesture(delta: WheelDelta, modifiers: Modifiers) -> WheelGesture {
    if modifiers.ctrl {
        let direction = if delta.dy < 0.0 { ZoomDirection::Increase } else { ZoomDirection::Decrease };
        return WheelGesture::Zoom(direction);
    }
    if modifiers.shift {
        let direction = if delta.dy < 0.0 { PanDirection::TowardStart } else { PanDirection::TowardEnd };
        return WheelGesture::Pan(Axis::Horizontal, direction);
    }
    let direction = if delta.dy > 0.0 { PanDirection::TowardEnd } else { PanDirection::TowardStart };
    WheelGesture::Pan(Axis::Vertical, direction)
}

/// Gesture tracked between pointer-down and pointer-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// An annotation or embedded image is following the pointer.
    DraggingElement {
        /// Id of the element being dragged.
        id: ElementId,
    },
}
