//! Drag-to-reposition for elements attached to a page.
//!
//! A [`DragController`] is a two-state machine owned by each draggable
//! element. On pointer-down it records the grab offset between the pointer
//! and the element's position; each pointer-move then proposes
//! `pointer - offset` as the new position. Only vertical containment is
//! enforced: when the proposal would leave the page through its top or
//! bottom edge, the element is pushed back by a fixed nudge from where it is
//! now, and the horizontal axis is left alone for that tick.

#[cfg(test)]
#[path = "drag_test.rs"]
mod drag_test;

use serde::{Deserialize, Serialize};

use crate::consts::DRAG_NUDGE;
use crate::viewport::{Point, Size};

/// Drag tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragConfig {
    /// Distance an element is pushed back from a page edge.
    pub nudge: f64,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self { nudge: DRAG_NUDGE }
    }
}

/// Drag state of a single element.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        /// Pointer position minus element position at pointer-down.
        offset: Point,
    },
}

/// Per-element drag state machine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragController {
    state: DragState,
    nudge: f64,
}

impl Default for DragController {
    fn default() -> Self {
        Self::new(DragConfig::default())
    }
}

impl DragController {
    #[must_use]
    pub fn new(config: DragConfig) -> Self {
        Self { state: DragState::Idle, nudge: config.nudge }
    }

    #[must_use]
    pub fn state(&self) -> DragState {
        self.state
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Recorded grab offset; zero while idle.
    #[must_use]
    pub fn offset(&self) -> Point {
        match self.state {
            DragState::Idle => Point::default(),
            DragState::Dragging { offset } => offset,
        }
    }

    /// Idle → Dragging. `pointer` and `position` must share a coordinate space.
    pub fn begin(&mut self, pointer: Point, position: Point) {
        self.state = DragState::Dragging { offset: pointer - position };
    }

    /// Compute the element's next position for a pointer-move.
    ///
    /// Returns `None` while idle. `current` is the element's position before
    /// this move and `parent_height` the height of the page it lives on.
    #[must_use]
    pub fn update(&self, pointer: Point, current: Point, element: Size, parent_height: f64) -> Option<Point> {
        let DragState::Dragging { offset } = self.state else {
            return None;
        };
        let candidate = pointer - offset;

        if candidate.y >= parent_height - element.height {
            return Some(Point::new(current.x, current.y - self.nudge));
        }
        if candidate.y <= 0.0 {
            return Some(Point::new(current.x, current.y + self.nudge));
        }
        Some(candidate)
    }

    /// Dragging → Idle. Also used for pointer-up outside the element.
    pub fn end(&mut self) {
        self.state = DragState::Idle;
    }
}
