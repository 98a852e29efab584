//! Context menu: one shared session across every element on the canvas.
//!
//! At most one menu is open at a time. A right-click on empty surface opens
//! the canvas-level menu; a right-click on a page, annotation or image opens
//! that element's menu and suppresses the canvas-level one until it closes.
//! Every opening rebuilds its rows from the owner's item templates under a
//! new generation, so a row handle from an earlier opening can never fire.
//!
//! Rows use a fixed height: row `i` sits at `i * (row_height + row_gap)` and
//! the menu is exactly tall enough for its rows.

#[cfg(test)]
#[path = "menu_test.rs"]
mod menu_test;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bus::{MenuBus, MenuClick, MenuOwner, MenuPayload};
use crate::consts::{
    MENU_ANCHOR_INSET, MENU_BACKGROUND, MENU_BORDER, MENU_FONT_SIZE, MENU_LABEL, MENU_ROW_FILL, MENU_ROW_GAP,
    MENU_ROW_HEIGHT, MENU_WIDTH,
};
use crate::element::ElementId;
use crate::input::PointerEvent;
use crate::scene::{NodeId, NodeSpec, Parent, Scene, Stroke};
use crate::viewport::{Point, Rect, Size};

/// What a menu item asks its owner to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    AddAnnotation,
    AddEmbeddedImage,
    Delete,
    ZoomIn,
    ZoomOut,
    ZoomReset,
}

impl ActionKind {
    #[must_use]
    pub fn default_label(self) -> &'static str {
        match self {
            Self::AddAnnotation => "Add annotation",
            Self::AddEmbeddedImage => "Upload image",
            Self::Delete => "Delete",
            Self::ZoomIn => "Zoom +",
            Self::ZoomOut => "Zoom -",
            Self::ZoomReset => "Reset zoom",
        }
    }
}

/// Menu geometry and colors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuStyle {
    pub width: f64,
    pub row_height: f64,
    pub row_gap: f64,
    /// The menu's top-left corner sits this far up and left of the pointer.
    pub anchor_inset: f64,
    pub font_size: f64,
    pub background: u32,
    pub border: u32,
    pub row_fill: u32,
    pub label_color: u32,
}

impl Default for MenuStyle {
    fn default() -> Self {
        Self {
            width: MENU_WIDTH,
            row_height: MENU_ROW_HEIGHT,
            row_gap: MENU_ROW_GAP,
            anchor_inset: MENU_ANCHOR_INSET,
            font_size: MENU_FONT_SIZE,
            background: MENU_BACKGROUND,
            border: MENU_BORDER,
            row_fill: MENU_ROW_FILL,
            label_color: MENU_LABEL,
        }
    }
}

impl MenuStyle {
    /// Top of row `index`, relative to the menu.
    #[must_use]
    pub fn row_top(&self, index: usize) -> f64 {
        index as f64 * (self.row_height + self.row_gap)
    }

    /// Total menu height for `rows` rows.
    #[must_use]
    pub fn menu_height(&self, rows: usize) -> f64 {
        if rows == 0 {
            return 0.0;
        }
        rows as f64 * self.row_height + (rows - 1) as f64 * self.row_gap
    }
}

/// One selectable action.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuItem {
    pub kind: ActionKind,
    pub label: String,
}

impl MenuItem {
    /// Item with the kind's default label.
    #[must_use]
    pub fn new(kind: ActionKind) -> Self {
        Self::with_label(kind, kind.default_label())
    }

    #[must_use]
    pub fn with_label(kind: ActionKind, label: impl Into<String>) -> Self {
        Self { kind, label: label.into() }
    }
}

/// Identifies a rendered row within one opening of the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowHandle {
    generation: u64,
    index: usize,
}

impl RowHandle {
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }
}

/// A rendered row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MenuRow {
    pub handle: RowHandle,
    /// Row rectangle in screen space.
    pub bounds: Rect,
    pub node: NodeId,
}

/// The currently displayed menu.
#[derive(Debug, Clone)]
pub struct MenuSession {
    owner: MenuOwner,
    event: PointerEvent,
    bounds: Rect,
    items: Vec<MenuItem>,
    rows: Vec<MenuRow>,
    node: NodeId,
    generation: u64,
}

impl MenuSession {
    #[must_use]
    pub fn owner(&self) -> MenuOwner {
        self.owner
    }

    /// The right-click that opened the session.
    #[must_use]
    pub fn event(&self) -> PointerEvent {
        self.event
    }

    /// Menu rectangle in screen space.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    #[must_use]
    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    #[must_use]
    pub fn rows(&self) -> &[MenuRow] {
        &self.rows
    }

    #[must_use]
    pub fn node(&self) -> NodeId {
        self.node
    }
}

/// What a right-click did to the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuTransition {
    Opened,
    /// The open canvas menu moved to the new pointer position.
    Reopened,
    Closed,
    /// Nothing changed (the canvas menu is suppressed).
    Ignored,
}

/// The single context menu state machine of a canvas.
#[derive(Debug, Default)]
pub struct ContextMenu {
    session: Option<MenuSession>,
    global_suppressed: bool,
    generation: u64,
    style: MenuStyle,
}

impl ContextMenu {
    #[must_use]
    pub fn new(style: MenuStyle) -> Self {
        Self { session: None, global_suppressed: false, generation: 0, style }
    }

    #[must_use]
    pub fn style(&self) -> &MenuStyle {
        &self.style
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    #[must_use]
    pub fn session(&self) -> Option<&MenuSession> {
        self.session.as_ref()
    }

    /// Whether an element menu is open and the canvas menu must not trigger.
    #[must_use]
    pub fn is_global_suppressed(&self) -> bool {
        self.global_suppressed
    }

    /// Right-click on empty surface.
    ///
    /// Opens the canvas menu, or moves an already open canvas menu to the new
    /// pointer position with the same items. Ignored while an element menu
    /// is open.
    pub fn on_canvas_right_click(
        &mut self,
        scene: &mut dyn Scene,
        event: PointerEvent,
        items: &[MenuItem],
    ) -> MenuTransition {
        if self.global_suppressed {
            debug!("canvas menu suppressed by an open element menu");
            return MenuTransition::Ignored;
        }
        if let Some(session) = self.session.take() {
            scene.despawn(session.node);
            self.show(scene, event, MenuOwner::Canvas, &session.items);
            return MenuTransition::Reopened;
        }
        self.show(scene, event, MenuOwner::Canvas, items);
        MenuTransition::Opened
    }

    /// Right-click on an element.
    ///
    /// Toggles the element's own menu closed if it is already open; otherwise
    /// closes whatever menu is open and opens the element's.
    pub fn on_element_right_click(
        &mut self,
        scene: &mut dyn Scene,
        event: PointerEvent,
        owner: ElementId,
        items: &[MenuItem],
    ) -> MenuTransition {
        let owner = MenuOwner::Element(owner);
        if self.session.as_ref().is_some_and(|s| s.owner == owner) {
            self.close(scene);
            return MenuTransition::Closed;
        }
        self.close(scene);
        self.show(scene, event, owner, items);
        self.global_suppressed = true;
        MenuTransition::Opened
    }

    /// Close the menu and lift canvas-menu suppression. Returns whether a
    /// session was open.
    pub fn close(&mut self, scene: &mut dyn Scene) -> bool {
        self.global_suppressed = false;
        let Some(session) = self.session.take() else {
            return false;
        };
        scene.despawn(session.node);
        true
    }

    /// Close the menu only if `owner` opened it.
    pub fn close_owned_by(&mut self, scene: &mut dyn Scene, owner: MenuOwner) -> bool {
        if self.session.as_ref().is_some_and(|s| s.owner == owner) {
            return self.close(scene);
        }
        false
    }

    /// The row under a screen-space point, if any.
    #[must_use]
    pub fn row_at(&self, screen: Point) -> Option<RowHandle> {
        let session = self.session.as_ref()?;
        session.rows.iter().find(|r| r.bounds.contains(screen)).map(|r| r.handle)
    }

    /// Whether a screen-space point falls on the open menu.
    #[must_use]
    pub fn contains(&self, screen: Point) -> bool {
        self.session.as_ref().is_some_and(|s| s.bounds.contains(screen))
    }

    /// Click a row: build the click with the session's payload, publish it on
    /// `bus`, and close.
    ///
    /// A handle from an earlier opening, or any click while closed, does
    /// nothing. Returns the click if its owner is listening.
    pub fn click(&mut self, scene: &mut dyn Scene, handle: RowHandle, bus: &MenuBus) -> Option<MenuClick> {
        let session = self.session.as_ref()?;
        if handle.generation != session.generation {
            debug!(generation = handle.generation, current = session.generation, "stale menu row ignored");
            return None;
        }
        let payload = MenuPayload { owner: session.owner, event: session.event };
        let item = session.items.get(handle.index)?;
        let click = MenuClick { kind: item.kind, label: item.label.clone(), payload };
        self.close(scene);
        bus.publish(click)
    }

    fn show(&mut self, scene: &mut dyn Scene, event: PointerEvent, owner: MenuOwner, items: &[MenuItem]) {
        self.generation += 1;
        let style = self.style;
        let origin = Point::new(event.screen.x - style.anchor_inset, event.screen.y - style.anchor_inset);
        let size = Size::new(style.width, style.menu_height(items.len()));

        let node = scene.spawn(
            Parent::Overlay,
            NodeSpec::Box {
                size,
                fill: style.background,
                stroke: Some(Stroke { width: 1.0, color: style.border }),
            },
            origin,
        );

        let rows = items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let top = style.row_top(index);
                let row_size = Size::new(style.width, style.row_height);
                let row_node = scene.spawn(
                    Parent::Node(node),
                    NodeSpec::Box { size: row_size, fill: style.row_fill, stroke: None },
                    Point::new(0.0, top),
                );
                scene.spawn(
                    Parent::Node(row_node),
                    NodeSpec::Label { text: item.label.clone(), font_size: style.font_size, color: style.label_color },
                    Point::new(0.0, style.row_height / 2.0),
                );
                MenuRow {
                    handle: RowHandle { generation: self.generation, index },
                    bounds: Rect::new(Point::new(origin.x, origin.y + top), row_size),
                    node: row_node,
                }
            })
            .collect();

        debug!(?owner, items = items.len(), x = origin.x, y = origin.y, "context menu opened");
        self.session = Some(MenuSession {
            owner,
            event,
            bounds: Rect::new(origin, size),
            items: items.to_vec(),
            rows,
            node,
            generation: self.generation,
        });
    }
}
