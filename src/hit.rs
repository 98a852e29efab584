#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::element::{ElementId, ElementKind};
use crate::menu::{ContextMenu, RowHandle};
use crate::registry::PageRegistry;
use crate::viewport::{Point, Viewport};

/// Result of a hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    /// A row of the open context menu.
    MenuRow(RowHandle),
    /// The open menu, between or around its rows.
    MenuBody,
    /// A page, annotation or embedded image.
    Element { id: ElementId, kind: ElementKind },
    /// Empty surface.
    Canvas,
}

/// Test what lies under the screen-space point `screen`.
///
/// The menu is checked first since it floats above the surface. Elements are
/// checked topmost first: later pages before earlier ones, and a page's
/// children before the page itself.
#[must_use]
pub fn hit_test(screen: Point, menu: &ContextMenu, registry: &PageRegistry, viewport: &Viewport) -> Hit {
    if let Some(row) = menu.row_at(screen) {
        return Hit::MenuRow(row);
    }
    if menu.contains(screen) {
        return Hit::MenuBody;
    }
    let world = viewport.screen_to_world(screen);
    registry
        .placed()
        .iter()
        .rev()
        .find(|p| p.bounds.contains(world))
        .map_or(Hit::Canvas, |p| Hit::Element { id: p.id, kind: p.kind })
}
