//! Menu click routing.
//!
//! Every menu session ends in at most one click, and exactly one owner should
//! react to it. Rather than broadcasting the click and having every element
//! compare ids, owners register the action kinds they handle, and a published
//! click is delivered only when its `(owner, kind)` pair is registered.
//! Destroying an element unregisters it, so a click addressed to a destroyed
//! element is dropped here instead of reaching stale state.

#[cfg(test)]
#[path = "bus_test.rs"]
mod bus_test;

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::element::ElementId;
use crate::input::PointerEvent;
use crate::menu::ActionKind;

/// Who a menu session belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuOwner {
    /// The canvas-level menu opened on empty surface.
    Canvas,
    /// A page, annotation or embedded image.
    Element(ElementId),
}

/// Correlation data attached to a menu item when it is clicked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MenuPayload {
    pub owner: MenuOwner,
    /// The right-click that opened the menu.
    pub event: PointerEvent,
}

/// A clicked menu item.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuClick {
    pub kind: ActionKind,
    pub label: String,
    pub payload: MenuPayload,
}

/// Subscription table keyed by owner.
#[derive(Debug, Default)]
pub struct MenuBus {
    listeners: HashMap<MenuOwner, HashSet<ActionKind>>,
}

impl MenuBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `owner` for `kinds`, adding to any kinds already registered.
    pub fn subscribe(&mut self, owner: MenuOwner, kinds: &[ActionKind]) {
        self.listeners.entry(owner).or_default().extend(kinds.iter().copied());
    }

    /// Drop every registration of `owner`. Returns whether it had any.
    pub fn unsubscribe(&mut self, owner: MenuOwner) -> bool {
        self.listeners.remove(&owner).is_some()
    }

    #[must_use]
    pub fn is_subscribed(&self, owner: MenuOwner, kind: ActionKind) -> bool {
        self.listeners.get(&owner).is_some_and(|kinds| kinds.contains(&kind))
    }

    /// Number of owners with at least one registration.
    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Deliver `click` to its owner, or drop it when nobody is listening.
    pub fn publish(&self, click: MenuClick) -> Option<MenuClick> {
        if self.is_subscribed(click.payload.owner, click.kind) {
            return Some(click);
        }
        debug!(owner = ?click.payload.owner, kind = ?click.kind, "menu click has no listener; dropped");
        None
    }
}
