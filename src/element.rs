//! Element identity and the contract shared by pages, annotations and images.

#[cfg(test)]
#[path = "element_test.rs"]
mod element_test;

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::bus::{MenuBus, MenuOwner};
use crate::menu::{ActionKind, MenuItem};
use crate::scene::{NodeId, Parent, Scene};
use crate::viewport::{Point, Rect, Size};

/// Unique identity of a placeable element.
///
/// Menu clicks are routed by this id alone, so two live elements must never
/// share one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(Uuid);

impl ElementId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The kind of a placeable element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Page,
    Annotation,
    EmbeddedImage,
}

/// Where an element is being attached: the container node, its origin on
/// the surface and its size, plus the current viewport offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Host {
    pub parent: Parent,
    pub origin: Point,
    pub size: Size,
    pub viewport_offset: Point,
}

impl Host {
    /// The canvas surface itself: no container node, no offset.
    #[must_use]
    pub fn surface() -> Self {
        Self {
            parent: Parent::Surface,
            origin: Point::default(),
            size: Size::default(),
            viewport_offset: Point::default(),
        }
    }

    /// Convert a screen-space anchor to the host's local space.
    ///
    /// Only exact at zoom 1: the scale is not divided out.
    #[must_use]
    pub fn local_anchor(&self, anchor: Point) -> Point {
        anchor - self.origin - self.viewport_offset
    }
}

/// Capabilities every placeable element provides.
pub trait SceneElement {
    fn id(&self) -> ElementId;

    fn kind(&self) -> ElementKind;

    /// Bounding box in the host's local space.
    fn bounds(&self) -> Rect;

    /// Scene node currently representing the element, if rendered.
    fn node(&self) -> Option<NodeId>;

    /// Items of the element's own context menu.
    fn menu_items(&self) -> Vec<MenuItem>;

    /// Register for clicks on the element's own menu items.
    fn subscribe(&self, bus: &mut MenuBus) {
        let kinds: Vec<ActionKind> = self.menu_items().iter().map(|item| item.kind).collect();
        bus.subscribe(MenuOwner::Element(self.id()), &kinds);
    }

    /// Attach the element's visual under `host`, placed from `anchor`.
    ///
    /// Rendering an element that is already rendered replaces its node.
    fn render(&mut self, scene: &mut dyn Scene, host: &Host, anchor: Point);

    /// Release the visual and every menu subscription the element holds.
    ///
    /// Safe to call on an element that was never rendered or is already
    /// destroyed.
    fn destroy(&mut self, scene: &mut dyn Scene, bus: &mut MenuBus);
}
