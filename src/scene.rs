//! Scene-graph collaborator.
//!
//! The renderer is external: the core only tells it which visual nodes exist,
//! where they sit relative to their parent, and when they go away. [`Scene`]
//! is that seam. [`MemoryScene`] is a retained in-memory tree implementing it,
//! used by headless hosts and by the tests to observe what was attached and
//! released.

#[cfg(test)]
#[path = "scene_test.rs"]
mod scene_test;

use std::collections::HashMap;

use crate::viewport::{Point, Size};

/// Handle to a node in the scene graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

/// Handle to a texture owned by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u64);

/// Border drawn around a filled box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub width: f64,
    pub color: u32,
}

/// Where a new node is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parent {
    /// The pannable/zoomable surface; positions are in surface units.
    Surface,
    /// The screen-space layer above the surface; positions are in screen pixels.
    Overlay,
    /// Another node; positions are relative to it.
    Node(NodeId),
}

/// What a node draws.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeSpec {
    /// A textured quad scaled to `size`.
    Sprite { texture: TextureHandle, size: Size },
    /// A filled rectangle with an optional border.
    Box { size: Size, fill: u32, stroke: Option<Stroke> },
    /// A single line of text whose left edge sits at the node position and
    /// whose vertical middle sits on the node's y.
    Label { text: String, font_size: f64, color: u32 },
}

/// Retained scene graph driven by the core.
pub trait Scene {
    /// Create a node under `parent` at a parent-relative position.
    fn spawn(&mut self, parent: Parent, spec: NodeSpec, position: Point) -> NodeId;

    /// Move a node. Unknown nodes are ignored.
    fn set_position(&mut self, node: NodeId, position: Point);

    /// Remove a node and all of its descendants. Unknown nodes are ignored.
    fn despawn(&mut self, node: NodeId);

    /// Turn raw image bytes into a texture the renderer can draw.
    fn create_texture(&mut self, bytes: &[u8]) -> TextureHandle;
}

/// One node of a [`MemoryScene`].
#[derive(Debug, Clone)]
pub struct SceneNode {
    pub parent: Parent,
    pub spec: NodeSpec,
    pub position: Point,
    pub children: Vec<NodeId>,
}

/// In-memory retained scene.
#[derive(Debug, Default)]
pub struct MemoryScene {
    nodes: HashMap<NodeId, SceneNode>,
    textures: HashMap<TextureHandle, usize>,
    next_node: u64,
    next_texture: u64,
}

impl MemoryScene {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, node: NodeId) -> Option<&SceneNode> {
        self.nodes.get(&node)
    }

    #[must_use]
    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(&node)
    }

    /// Number of live nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes attached directly to `layer` (`Surface` or `Overlay`), in creation order.
    #[must_use]
    pub fn layer(&self, layer: Parent) -> Vec<NodeId> {
        let mut roots: Vec<NodeId> = self
            .nodes
            .iter()
            .filter(|(_, n)| n.parent == layer)
            .map(|(id, _)| *id)
            .collect();
        roots.sort();
        roots
    }

    /// Byte length of a texture created through [`Scene::create_texture`].
    #[must_use]
    pub fn texture_len(&self, texture: TextureHandle) -> Option<usize> {
        self.textures.get(&texture).copied()
    }

    /// Position of a node in its layer's space: the sum of its own and its
    /// ancestors' positions.
    #[must_use]
    pub fn absolute_position(&self, node: NodeId) -> Option<Point> {
        let mut current = self.nodes.get(&node)?;
        let mut pos = current.position;
        while let Parent::Node(parent) = current.parent {
            current = self.nodes.get(&parent)?;
            pos = pos + current.position;
        }
        Some(pos)
    }
}

impl Scene for MemoryScene {
    fn spawn(&mut self, parent: Parent, spec: NodeSpec, position: Point) -> NodeId {
        self.next_node += 1;
        let id = NodeId(self.next_node);
        let parent = match parent {
            Parent::Node(p) => match self.nodes.get_mut(&p) {
                Some(node) => {
                    node.children.push(id);
                    parent
                }
                // A dangling parent (already despawned) leaves the node on the surface.
                None => Parent::Surface,
            },
            layer => layer,
        };
        self.nodes.insert(id, SceneNode { parent, spec, position, children: Vec::new() });
        id
    }

    fn set_position(&mut self, node: NodeId, position: Point) {
        if let Some(n) = self.nodes.get_mut(&node) {
            n.position = position;
        }
    }

    fn despawn(&mut self, node: NodeId) {
        let Some(removed) = self.nodes.remove(&node) else {
            return;
        };
        if let Parent::Node(p) = removed.parent {
            if let Some(parent) = self.nodes.get_mut(&p) {
                parent.children.retain(|c| *c != node);
            }
        }
        let mut stack = removed.children;
        while let Some(child) = stack.pop() {
            if let Some(n) = self.nodes.remove(&child) {
                stack.extend(n.children);
            }
        }
    }

    fn create_texture(&mut self, bytes: &[u8]) -> TextureHandle {
        self.next_texture += 1;
        let handle = TextureHandle(self.next_texture);
        self.textures.insert(handle, bytes.len());
        handle
    }
}
