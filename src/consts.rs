//! Default numeric constants for the canvas.

// ── Viewport ────────────────────────────────────────────────────

/// Horizontal pan step per wheel notch, in surface units.
pub const PAN_STEP_X: f64 = 50.0;

/// Vertical pan step per wheel notch, in surface units.
pub const PAN_STEP_Y: f64 = 100.0;

/// Additive zoom step.
pub const ZOOM_STEP: f64 = 0.2;

/// Smallest allowed zoom scale.
pub const MIN_ZOOM: f64 = 0.5;

/// Largest allowed zoom scale.
pub const MAX_ZOOM: f64 = 2.0;

/// Divisor applied to the first page height when testing the bottom border.
pub const FIRST_PAGE_DIVISOR: f64 = 1.5;

/// Tolerance used when checking whether the scale is exactly 1.
pub const UNIT_SCALE_EPSILON: f64 = 1e-9;

// ── Layout ──────────────────────────────────────────────────────

/// Vertical gap between stacked pages.
pub const PAGE_MARGIN: f64 = 20.0;

/// Fixed annotation box size.
pub const ANNOTATION_WIDTH: f64 = 250.0;
pub const ANNOTATION_HEIGHT: f64 = 50.0;

/// Fixed display size of an embedded image, independent of its source resolution.
pub const IMAGE_WIDTH: f64 = 300.0;
pub const IMAGE_HEIGHT: f64 = 200.0;

// ── Drag ────────────────────────────────────────────────────────

/// Distance an element is pushed back when it hits the top or bottom of its page.
pub const DRAG_NUDGE: f64 = 5.0;

// ── Context menu ────────────────────────────────────────────────

pub const MENU_WIDTH: f64 = 250.0;
pub const MENU_ROW_HEIGHT: f64 = 50.0;
pub const MENU_ROW_GAP: f64 = 3.0;

/// The menu's top-left corner sits this far up and left of the pointer.
pub const MENU_ANCHOR_INSET: f64 = 10.0;

pub const MENU_FONT_SIZE: f64 = 14.0;

// ── Colors (0xRRGGBB) ───────────────────────────────────────────

pub const MENU_BACKGROUND: u32 = 0x00_0000;
pub const MENU_BORDER: u32 = 0xff_ff00;
pub const MENU_ROW_FILL: u32 = 0x33_ff11;
pub const MENU_LABEL: u32 = 0x00_0000;
pub const ANNOTATION_FILL: u32 = 0xff_ffff;
pub const ANNOTATION_BORDER: u32 = 0x00_0000;
