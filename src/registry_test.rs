#![allow(clippy::float_cmp)]

use super::*;
use crate::input::{Button, Modifiers};
use crate::scene::MemoryScene;
use crate::viewport::ZoomDirection;

// =============================================================
// Helpers
// =============================================================

const WINDOW_WIDTH: f64 = 1000.0;

struct Fixture {
    scene: MemoryScene,
    bus: MenuBus,
    registry: PageRegistry,
    viewport: Viewport,
    pages: Vec<ElementId>,
}

fn sources(heights: &[f64]) -> Vec<LoadedPage> {
    heights
        .iter()
        .enumerate()
        .map(|(i, h)| LoadedPage {
            descriptor_id: i as u64 + 1,
            texture: TextureHandle(i as u64 + 1),
            size: Size::new(600.0, *h),
        })
        .collect()
}

fn fixture(heights: &[f64]) -> Fixture {
    let mut scene = MemoryScene::new();
    let mut bus = MenuBus::new();
    let mut registry = PageRegistry::default();
    let pages = registry.load(&mut scene, &mut bus, &sources(heights), WINDOW_WIDTH);
    Fixture { scene, bus, registry, viewport: Viewport::default(), pages }
}

fn right_click(x: f64, y: f64) -> PointerEvent {
    PointerEvent::new(Point::new(x, y), Button::Secondary, Modifiers::default())
}

fn placed_id(result: Result<ElementId, RegistryError>) -> ElementId {
    match result {
        Ok(id) => id,
        Err(e) => panic!("element not placed: {e}"),
    }
}

fn png() -> ImportedImage {
    ImportedImage { name: Some("cat.png".into()), bytes: vec![0x89, b'P', b'N', b'G'] }
}

impl Fixture {
    fn annotate(&mut self, page: usize, at: Point) -> Result<ElementId, RegistryError> {
        let event = PointerEvent::new(at, Button::Secondary, Modifiers::default());
        self.registry.add_annotation(&mut self.scene, &mut self.bus, self.pages[page], &event, &self.viewport)
    }

    fn embed(&mut self, page: usize, at: Point) -> Result<ElementId, RegistryError> {
        let ticket = self.registry.request_image_import(self.pages[page], right_click(at.x, at.y))?;
        self.registry.complete_image_import(&mut self.scene, &mut self.bus, &self.viewport, ticket, Ok(png()))
    }

    fn page(&self, index: usize) -> &Page {
        &self.registry.pages()[index]
    }

    fn kind_of(&self, id: ElementId) -> Option<ElementKind> {
        self.registry.placed().into_iter().find(|p| p.id == id).map(|p| p.kind)
    }
}

// =============================================================
// Layout
// =============================================================

#[test]
fn stack_offsets_add_height_and_margin() {
    assert_eq!(stack_offsets(&[100.0, 150.0, 200.0], 20.0), vec![0.0, 120.0, 290.0]);
}

#[test]
fn stack_offsets_of_nothing_is_empty() {
    assert!(stack_offsets(&[], 20.0).is_empty());
}

#[test]
fn load_stacks_pages_in_order() {
    let f = fixture(&[100.0, 150.0, 200.0]);
    let ys: Vec<f64> = f.registry.pages().iter().map(|p| p.position().y).collect();
    assert_eq!(ys, vec![0.0, 120.0, 290.0]);
    assert_eq!(f.registry.pages().iter().map(Page::descriptor_id).collect::<Vec<_>>(), vec![1, 2, 3]);
}

#[test]
fn load_centres_pages_horizontally() {
    let f = fixture(&[100.0]);
    assert_eq!(f.page(0).position().x, 200.0);
}

#[test]
fn load_spawns_one_sprite_per_page_on_surface() {
    let f = fixture(&[100.0, 150.0]);
    assert_eq!(f.scene.layer(Parent::Surface).len(), 2);
    let node = f.page(1).node().and_then(|n| f.scene.get(n));
    assert!(matches!(node.map(|n| &n.spec), Some(NodeSpec::Sprite { texture: TextureHandle(2), .. })));
}

#[test]
fn load_subscribes_page_menu_actions() {
    let f = fixture(&[100.0]);
    let owner = MenuOwner::Element(f.pages[0]);
    assert!(f.bus.is_subscribed(owner, ActionKind::AddAnnotation));
    assert!(f.bus.is_subscribed(owner, ActionKind::AddEmbeddedImage));
    assert!(!f.bus.is_subscribed(owner, ActionKind::Delete));
}

#[test]
fn reload_replaces_previous_page_set() {
    let mut f = fixture(&[100.0, 150.0]);
    f.annotate(0, Point::new(300.0, 50.0)).ok();
    let old = f.pages.clone();
    let fresh = f.registry.load(&mut f.scene, &mut f.bus, &sources(&[300.0]), WINDOW_WIDTH);
    assert_eq!(f.registry.len(), 1);
    assert_eq!(f.scene.len(), 1);
    assert!(!f.bus.is_subscribed(MenuOwner::Element(old[0]), ActionKind::AddAnnotation));
    assert!(f.bus.is_subscribed(MenuOwner::Element(fresh[0]), ActionKind::AddAnnotation));
}

#[test]
fn relayout_recentres_without_touching_y() {
    let mut f = fixture(&[100.0, 150.0]);
    f.registry.relayout(&mut f.scene, 1600.0);
    assert_eq!(f.page(1).position(), Point::new(500.0, 120.0));
    let node = f.page(1).node().and_then(|n| f.scene.get(n)).map(|n| n.position);
    assert_eq!(node, Some(Point::new(500.0, 120.0)));
}

#[test]
fn surface_extent_bounds_all_pages() {
    let f = fixture(&[100.0, 150.0, 200.0]);
    assert_eq!(f.registry.surface_extent(), Size::new(600.0, 490.0));
    assert_eq!(f.registry.first_page_height(), 100.0);
}

#[test]
fn empty_registry_has_zero_extent() {
    let registry = PageRegistry::default();
    assert_eq!(registry.surface_extent(), Size::default());
    assert_eq!(registry.first_page_height(), 0.0);
    assert!(registry.is_empty());
}

// =============================================================
// Annotations
// =============================================================

#[test]
fn annotation_overhangs_right_edge_at_pointer_height() {
    let mut f = fixture(&[800.0, 800.0]);
    let id = f.annotate(1, Point::new(400.0, 900.0));
    assert!(id.is_ok());
    let annotation = &f.page(1).annotations()[0];
    // 600 - 250 / 3, and 900 - 820
    assert!((annotation.position().x - 516.666_666).abs() < 1e-3);
    assert_eq!(annotation.position().y, 80.0);
    assert_eq!(annotation.page(), f.pages[1]);
}

#[test]
fn annotation_accounts_for_viewport_offset() {
    let mut f = fixture(&[800.0]);
    f.viewport.set_offset(Point::new(0.0, -100.0));
    f.annotate(0, Point::new(400.0, 150.0)).ok();
    assert_eq!(f.page(0).annotations()[0].position().y, 250.0);
}

#[test]
fn annotation_is_white_box_under_page_node() {
    let mut f = fixture(&[800.0]);
    f.annotate(0, Point::new(400.0, 100.0)).ok();
    let node = f.page(0).annotations()[0].node().and_then(|n| f.scene.get(n));
    let Some(node) = node else {
        panic!("annotation was not rendered");
    };
    assert_eq!(node.parent, Parent::Node(f.page(0).node().unwrap_or(NodeId(0))));
    assert!(matches!(
        node.spec,
        NodeSpec::Box { fill: ANNOTATION_FILL, stroke: Some(Stroke { color: ANNOTATION_BORDER, .. }), .. }
    ));
}

#[test]
fn annotation_refused_while_zoomed() {
    let mut f = fixture(&[800.0]);
    f.viewport.zoom(ZoomDirection::Increase);
    let err = f.annotate(0, Point::new(400.0, 100.0));
    assert!(matches!(err, Err(RegistryError::ZoomNotUnity { .. })));
    assert_eq!(err.err().map(|e| e.error_code()), Some("E_ZOOM_NOT_UNITY"));
    assert!(f.page(0).annotations().is_empty());
}

#[test]
fn annotation_subscribes_delete() {
    let mut f = fixture(&[800.0]);
    let id = placed_id(f.annotate(0, Point::new(400.0, 100.0)));
    assert!(f.bus.is_subscribed(MenuOwner::Element(id), ActionKind::Delete));
    assert_eq!(f.kind_of(id), Some(ElementKind::Annotation));
}

#[test]
fn annotation_on_unknown_page_fails() {
    let mut f = fixture(&[800.0]);
    let ghost = ElementId::new();
    let event = right_click(0.0, 0.0);
    let err = f.registry.add_annotation(&mut f.scene, &mut f.bus, ghost, &event, &f.viewport);
    assert_eq!(err, Err(RegistryError::UnknownPage(ghost)));
}

#[test]
fn annotations_keep_creation_order() {
    let mut f = fixture(&[800.0]);
    let a = placed_id(f.annotate(0, Point::new(400.0, 100.0)));
    let b = placed_id(f.annotate(0, Point::new(400.0, 300.0)));
    let ids: Vec<ElementId> = f.page(0).annotations().iter().map(SceneElement::id).collect();
    assert_eq!(ids, vec![a, b]);
}

// =============================================================
// Embedded images
// =============================================================

#[test]
fn embedded_image_sits_on_left_edge() {
    let mut f = fixture(&[800.0, 800.0]);
    let id = f.embed(1, Point::new(400.0, 900.0));
    assert!(id.is_ok());
    let image = &f.page(1).images()[0];
    assert_eq!(image.position(), Point::new(0.0, 80.0));
    assert_eq!(image.size(), Size::new(300.0, 200.0));
    assert_eq!(f.scene.texture_len(image.texture()), Some(4));
}

#[test]
fn cancelled_import_changes_nothing() {
    let mut f = fixture(&[800.0]);
    let nodes = f.scene.len();
    let ticket = f.registry.request_image_import(f.pages[0], right_click(400.0, 100.0));
    let Ok(ticket) = ticket else {
        panic!("request failed");
    };
    let cancelled = Err(ImportError::Cancelled);
    let err = f.registry.complete_image_import(&mut f.scene, &mut f.bus, &f.viewport, ticket, cancelled);
    assert_eq!(err, Err(RegistryError::Import(ImportError::Cancelled)));
    assert!(f.page(0).images().is_empty());
    assert_eq!(f.scene.len(), nodes);
    assert_eq!(f.registry.pending_imports(), 0);
}

#[test]
fn empty_import_is_rejected() {
    let mut f = fixture(&[800.0]);
    let Ok(ticket) = f.registry.request_image_import(f.pages[0], right_click(400.0, 100.0)) else {
        panic!("request failed");
    };
    let empty = ImportedImage { name: None, bytes: Vec::new() };
    let err = f.registry.complete_image_import(&mut f.scene, &mut f.bus, &f.viewport, ticket, Ok(empty));
    assert_eq!(err, Err(RegistryError::Import(ImportError::Empty)));
}

#[test]
fn ticket_resolves_once() {
    let mut f = fixture(&[800.0]);
    let Ok(ticket) = f.registry.request_image_import(f.pages[0], right_click(400.0, 100.0)) else {
        panic!("request failed");
    };
    let first = f.registry.complete_image_import(&mut f.scene, &mut f.bus, &f.viewport, ticket, Ok(png()));
    assert!(first.is_ok());
    let second = f.registry.complete_image_import(&mut f.scene, &mut f.bus, &f.viewport, ticket, Ok(png()));
    assert_eq!(second, Err(RegistryError::UnknownTicket));
}

#[test]
fn reload_drops_pending_imports() {
    let mut f = fixture(&[800.0]);
    let Ok(ticket) = f.registry.request_image_import(f.pages[0], right_click(400.0, 100.0)) else {
        panic!("request failed");
    };
    f.registry.load(&mut f.scene, &mut f.bus, &sources(&[500.0]), WINDOW_WIDTH);
    let err = f.registry.complete_image_import(&mut f.scene, &mut f.bus, &f.viewport, ticket, Ok(png()));
    assert_eq!(err, Err(RegistryError::UnknownTicket));
}

#[test]
fn import_request_for_unknown_page_fails() {
    let mut f = fixture(&[800.0]);
    let ghost = ElementId::new();
    assert_eq!(f.registry.request_image_import(ghost, right_click(0.0, 0.0)), Err(RegistryError::UnknownPage(ghost)));
}

// =============================================================
// Delete and destroy
// =============================================================

#[test]
fn delete_removes_node_and_subscription() {
    let mut f = fixture(&[800.0]);
    let id = placed_id(f.annotate(0, Point::new(400.0, 100.0)));
    let node = f.page(0).annotations()[0].node();
    assert_eq!(f.registry.delete(&mut f.scene, &mut f.bus, id), Ok(ElementKind::Annotation));
    assert!(f.page(0).annotations().is_empty());
    assert!(!node.is_some_and(|n| f.scene.contains(n)));
    assert!(!f.bus.is_subscribed(MenuOwner::Element(id), ActionKind::Delete));
}

#[test]
fn delete_embedded_image() {
    let mut f = fixture(&[800.0]);
    let id = placed_id(f.embed(0, Point::new(400.0, 100.0)));
    assert_eq!(f.registry.delete(&mut f.scene, &mut f.bus, id), Ok(ElementKind::EmbeddedImage));
    assert!(f.page(0).images().is_empty());
}

#[test]
fn delete_twice_fails_second_time() {
    let mut f = fixture(&[800.0]);
    let id = placed_id(f.annotate(0, Point::new(400.0, 100.0)));
    f.registry.delete(&mut f.scene, &mut f.bus, id).ok();
    assert_eq!(f.registry.delete(&mut f.scene, &mut f.bus, id), Err(RegistryError::UnknownElement(id)));
}

#[test]
fn pages_cannot_be_deleted() {
    let mut f = fixture(&[800.0]);
    let page = f.pages[0];
    assert_eq!(f.registry.delete(&mut f.scene, &mut f.bus, page), Err(RegistryError::UnknownElement(page)));
    assert_eq!(f.registry.len(), 1);
}

#[test]
fn destroy_all_cascades_to_children() {
    let mut f = fixture(&[800.0, 800.0]);
    let a = placed_id(f.annotate(0, Point::new(400.0, 100.0)));
    let i = placed_id(f.embed(1, Point::new(400.0, 900.0)));
    f.registry.destroy_all(&mut f.scene, &mut f.bus);
    assert!(f.scene.is_empty());
    assert!(f.bus.is_empty());
    assert_eq!(f.kind_of(a), None);
    assert_eq!(f.kind_of(i), None);
}

#[test]
fn page_destroy_is_idempotent() {
    let mut scene = MemoryScene::new();
    let mut bus = MenuBus::new();
    let mut page = Page::new(&sources(&[100.0])[0]);
    page.render(&mut scene, &Host::surface(), Point::new(10.0, 0.0));
    page.subscribe(&mut bus);
    page.destroy(&mut scene, &mut bus);
    page.destroy(&mut scene, &mut bus);
    assert!(scene.is_empty());
    assert!(bus.is_empty());
    assert_eq!(page.node(), None);
}

// =============================================================
// Drag
// =============================================================

#[test]
fn drag_moves_child_and_scene_node() {
    let mut f = fixture(&[800.0]);
    let id = placed_id(f.annotate(0, Point::new(400.0, 100.0)));
    // annotation starts at local y = 100
    assert!(f.registry.begin_drag(id, Point::new(700.0, 110.0)));
    let moved = f.registry.drag_to(&mut f.scene, id, Point::new(650.0, 310.0));
    assert_eq!(moved.map(|p| p.y), Some(300.0));
    let node = f.page(0).annotations()[0].node().and_then(|n| f.scene.get(n)).map(|n| n.position.y);
    assert_eq!(node, Some(300.0));
    f.registry.end_drag(id);
    assert!(!f.page(0).annotations()[0].is_dragging());
}

#[test]
fn drag_near_bottom_nudges_back() {
    let mut f = fixture(&[800.0]);
    let id = placed_id(f.embed(0, Point::new(400.0, 500.0)));
    f.registry.begin_drag(id, Point::new(10.0, 500.0));
    // candidate y = 650 >= 800 - 200
    let moved = f.registry.drag_to(&mut f.scene, id, Point::new(10.0, 650.0));
    assert_eq!(moved, Some(Point::new(0.0, 495.0)));
}

#[test]
fn drag_without_begin_is_ignored() {
    let mut f = fixture(&[800.0]);
    let id = placed_id(f.annotate(0, Point::new(400.0, 100.0)));
    assert_eq!(f.registry.drag_to(&mut f.scene, id, Point::new(0.0, 0.0)), None);
}

#[test]
fn pages_are_not_draggable() {
    let mut f = fixture(&[800.0]);
    assert!(!f.registry.begin_drag(f.pages[0], Point::new(0.0, 0.0)));
}

// =============================================================
// Queries
// =============================================================

#[test]
fn placed_reports_children_in_surface_space() {
    let mut f = fixture(&[100.0, 800.0]);
    let id = placed_id(f.annotate(1, Point::new(400.0, 220.0)));
    let placed = f.registry.placed();
    let child = placed.iter().find(|p| p.id == id).map(|p| p.bounds.origin.y);
    // page 1 starts at 120; annotation local y = 100
    assert_eq!(child, Some(220.0));
}

#[test]
fn menu_items_follow_element_kind() {
    let mut f = fixture(&[800.0]);
    let id = placed_id(f.annotate(0, Point::new(400.0, 100.0)));
    let page_kinds: Vec<ActionKind> =
        f.registry.menu_items(f.pages[0]).unwrap_or_default().iter().map(|i| i.kind).collect();
    assert_eq!(page_kinds, vec![ActionKind::AddEmbeddedImage, ActionKind::AddAnnotation]);
    let kinds: Vec<ActionKind> = f.registry.menu_items(id).unwrap_or_default().iter().map(|i| i.kind).collect();
    assert_eq!(kinds, vec![ActionKind::Delete]);
    assert!(f.registry.menu_items(ElementId::new()).is_none());
}

#[test]
fn registry_error_codes() {
    assert_eq!(RegistryError::UnknownTicket.error_code(), "E_UNKNOWN_TICKET");
    assert_eq!(RegistryError::Import(ImportError::Cancelled).error_code(), "E_IMPORT_CANCELLED");
    assert!(RegistryError::ZoomNotUnity { scale: 1.2 }.retryable());
    assert!(!RegistryError::UnknownElement(ElementId::new()).retryable());
}

#[test]
fn layout_config_defaults() {
    let layout = LayoutConfig::default();
    assert_eq!(layout.page_margin, 20.0);
    assert_eq!(layout.annotation, Size::new(250.0, 50.0));
    assert_eq!(layout.image, Size::new(300.0, 200.0));
}
