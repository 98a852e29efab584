//! Geometry types and the pan/zoom viewport over the page column.
//!
//! The viewport is a stepped camera: each wheel notch nudges the surface
//! offset by a fixed amount, and zoom moves in fixed additive steps. Edge
//! clamping refuses a step rather than shortening it, and records which axis
//! hit its border so the host can show feedback.

#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::consts::{
    FIRST_PAGE_DIVISOR, MAX_ZOOM, MIN_ZOOM, PAN_STEP_X, PAN_STEP_Y, UNIT_SCALE_EPSILON, ZOOM_STEP,
};

/// A point in either screen or world space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Width and height of a page, element or surface.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle given by its top-left corner and size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    #[must_use]
    pub fn new(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.origin.x + self.size.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.origin.y + self.size.height
    }

    /// Whether `pt` lies inside the rectangle. The left and top edges are
    /// inclusive, the right and bottom edges exclusive.
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        pt.x >= self.origin.x && pt.x < self.right() && pt.y >= self.origin.y && pt.y < self.bottom()
    }
}

/// Pan axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Pan direction relative to the document.
///
/// Panning toward the start moves the surface offset up by one step (content
/// slides right/down); panning toward the end moves it down by one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanDirection {
    TowardStart,
    TowardEnd,
}

/// Zoom request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    Increase,
    Decrease,
    Reset,
}

/// Result of a pan request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanOutcome {
    /// The offset moved by one step.
    Moved,
    /// The step was refused and the axis border flag is now set.
    AtBorder,
}

/// Step sizes and limits for the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub pan_step_x: f64,
    pub pan_step_y: f64,
    pub zoom_step: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// The bottom border is reached when less than `first page height / divisor`
    /// of the surface would remain below the top of the viewport.
    pub first_page_divisor: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            pan_step_x: PAN_STEP_X,
            pan_step_y: PAN_STEP_Y,
            zoom_step: ZOOM_STEP,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            first_page_divisor: FIRST_PAGE_DIVISOR,
        }
    }
}

/// Pan/zoom state of the shared canvas surface.
///
/// `offset` is the surface translation in screen pixels and `scale` the zoom
/// factor (1.0 = no zoom). `surface` is the unscaled extent of the laid-out
/// content; the border tests measure it at the current scale.
#[derive(Debug, Clone)]
pub struct Viewport {
    offset: Point,
    scale: f64,
    surface: Size,
    first_page_height: f64,
    reached_border_x: bool,
    reached_border_y: bool,
    config: ViewportConfig,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(ViewportConfig::default())
    }
}

impl Viewport {
    #[must_use]
    pub fn new(config: ViewportConfig) -> Self {
        Self {
            offset: Point::default(),
            scale: 1.0,
            surface: Size::default(),
            first_page_height: 0.0,
            reached_border_x: false,
            reached_border_y: false,
            config,
        }
    }

    #[must_use]
    pub fn offset(&self) -> Point {
        self.offset
    }

    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    #[must_use]
    pub fn surface(&self) -> Size {
        self.surface
    }

    #[must_use]
    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    /// Whether the last horizontal pan was refused at a border.
    #[must_use]
    pub fn reached_border_x(&self) -> bool {
        self.reached_border_x
    }

    /// Whether the last vertical pan was refused at a border.
    #[must_use]
    pub fn reached_border_y(&self) -> bool {
        self.reached_border_y
    }

    /// Whether positions can be computed in unscaled space.
    #[must_use]
    pub fn is_unscaled(&self) -> bool {
        (self.scale - 1.0).abs() < UNIT_SCALE_EPSILON
    }

    /// Move the surface to an explicit offset, bypassing border checks.
    pub fn set_offset(&mut self, offset: Point) {
        self.offset = offset;
    }

    /// Record the content extent and the height of the first page.
    pub fn set_surface(&mut self, surface: Size, first_page_height: f64) {
        self.surface = surface;
        self.first_page_height = first_page_height;
    }

    /// The content extent in screen pixels at the current scale.
    #[must_use]
    pub fn scaled_surface(&self) -> Size {
        Size::new(self.surface.width * self.scale, self.surface.height * self.scale)
    }

    /// Convert a screen-space point to surface (world) coordinates.
    #[must_use]
    pub fn screen_to_world(&self, screen: Point) -> Point {
        Point {
            x: (screen.x - self.offset.x) / self.scale,
            y: (screen.y - self.offset.y) / self.scale,
        }
    }

    /// Nudge the offset one step along `axis`, or refuse at the border.
    ///
    /// The offset is in screen pixels, so the surface extent is scaled before
    /// comparing. The horizontal test `width / |offset.x| > 1` is the same for
    /// both directions.
    pub fn pan(&mut self, axis: Axis, direction: PanDirection) -> PanOutcome {
        let extent = self.scaled_surface();
        let allowed = match axis {
            Axis::Horizontal => extent.width / self.offset.x.abs() > 1.0,
            Axis::Vertical => {
                let step = self.config.pan_step_y;
                match direction {
                    PanDirection::TowardEnd => {
                        (self.offset.y - step).abs()
                            <= extent.height - self.first_page_height / self.config.first_page_divisor
                    }
                    PanDirection::TowardStart => self.offset.y + step <= step,
                }
            }
        };

        let border = match axis {
            Axis::Horizontal => &mut self.reached_border_x,
            Axis::Vertical => &mut self.reached_border_y,
        };
        *border = !allowed;
        if !allowed {
            debug!(?axis, ?direction, x = self.offset.x, y = self.offset.y, "pan refused at border");
            return PanOutcome::AtBorder;
        }

        let step = match axis {
            Axis::Horizontal => self.config.pan_step_x,
            Axis::Vertical => self.config.pan_step_y,
        };
        let delta = match direction {
            PanDirection::TowardStart => step,
            PanDirection::TowardEnd => -step,
        };
        match axis {
            Axis::Horizontal => self.offset.x += delta,
            Axis::Vertical => self.offset.y += delta,
        }
        PanOutcome::Moved
    }

    /// Step the scale and return the new value, clamped to the zoom bounds.
    pub fn zoom(&mut self, direction: ZoomDirection) -> f64 {
        let requested = match direction {
            ZoomDirection::Increase => self.scale + self.config.zoom_step,
            ZoomDirection::Decrease => self.scale - self.config.zoom_step,
            ZoomDirection::Reset => 1.0,
        };
        let clamped = requested.clamp(self.config.min_zoom, self.config.max_zoom);
        if (clamped - requested).abs() > f64::EPSILON {
            debug!(requested, clamped, "zoom clamped to bounds");
        }
        self.scale = clamped;
        self.scale
    }
}
