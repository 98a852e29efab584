//! Page registry: the tree of pages and the annotations and images on them.
//!
//! Pages are stacked in a single column in load order, separated by a fixed
//! margin, and centred horizontally in the window. Each page owns its
//! annotations and embedded images; a child refers back to its page by id
//! only, and destruction always flows from page to children. Every element
//! registers its menu actions on the [`MenuBus`] when it is rendered and
//! unregisters on destroy.

#[cfg(test)]
#[path = "registry_test.rs"]
mod registry_test;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::bus::{MenuBus, MenuOwner};
use crate::consts::{
    ANNOTATION_BORDER, ANNOTATION_FILL, ANNOTATION_HEIGHT, ANNOTATION_WIDTH, IMAGE_HEIGHT, IMAGE_WIDTH, PAGE_MARGIN,
};
use crate::drag::{DragConfig, DragController};
use crate::element::{ElementId, ElementKind, Host, SceneElement};
use crate::error::ErrorCode;
use crate::import::{ImportError, ImportQueue, ImportTicket, ImportedImage};
use crate::input::PointerEvent;
use crate::menu::{ActionKind, MenuItem};
use crate::scene::{NodeId, NodeSpec, Parent, Scene, Stroke, TextureHandle};
use crate::source::LoadedPage;
use crate::viewport::{Point, Rect, Size, Viewport};

/// Error returned by registry mutations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RegistryError {
    /// Positions are only defined in unscaled space.
    #[error("cannot place an annotation at zoom {scale}; reset zoom to 100% first")]
    ZoomNotUnity { scale: f64 },
    #[error("page not found: {0}")]
    UnknownPage(ElementId),
    #[error("element not found: {0}")]
    UnknownElement(ElementId),
    #[error("no pending image import for this ticket")]
    UnknownTicket,
    #[error(transparent)]
    Import(#[from] ImportError),
}

impl ErrorCode for RegistryError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::ZoomNotUnity { .. } => "E_ZOOM_NOT_UNITY",
            Self::UnknownPage(_) => "E_UNKNOWN_PAGE",
            Self::UnknownElement(_) => "E_UNKNOWN_ELEMENT",
            Self::UnknownTicket => "E_UNKNOWN_TICKET",
            Self::Import(e) => e.error_code(),
        }
    }

    fn retryable(&self) -> bool {
        match self {
            Self::ZoomNotUnity { .. } => true,
            Self::Import(e) => e.retryable(),
            _ => false,
        }
    }
}

/// Page stacking and fixed element sizes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Vertical gap below each page.
    pub page_margin: f64,
    pub annotation: Size,
    /// Display size of embedded images, independent of the source resolution.
    pub image: Size,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            page_margin: PAGE_MARGIN,
            annotation: Size::new(ANNOTATION_WIDTH, ANNOTATION_HEIGHT),
            image: Size::new(IMAGE_WIDTH, IMAGE_HEIGHT),
        }
    }
}

/// Top edge of each page when `heights` are stacked with `margin` between them.
#[must_use]
pub fn stack_offsets(heights: &[f64], margin: f64) -> Vec<f64> {
    let mut top = 0.0;
    heights
        .iter()
        .map(|h| {
            let this = top;
            top += h + margin;
            this
        })
        .collect()
}

/// Left edge that centres a page of `page_width` in a window of `window_width`.
#[must_use]
pub fn centered_x(window_width: f64, page_width: f64) -> f64 {
    window_width / 2.0 - page_width / 2.0
}

// =============================================================
// Attachments
// =============================================================

/// State shared by every draggable child of a page.
#[derive(Debug, Clone)]
struct Attachment {
    id: ElementId,
    page: ElementId,
    position: Point,
    size: Size,
    drag: DragController,
    node: Option<NodeId>,
}

impl Attachment {
    fn new(page: ElementId, size: Size, drag: DragConfig) -> Self {
        Self {
            id: ElementId::new(),
            page,
            position: Point::default(),
            size,
            drag: DragController::new(drag),
            node: None,
        }
    }

    fn bounds(&self) -> Rect {
        Rect::new(self.position, self.size)
    }

    fn attach(&mut self, scene: &mut dyn Scene, parent: Parent, spec: NodeSpec, position: Point) {
        if let Some(old) = self.node.take() {
            scene.despawn(old);
        }
        self.position = position;
        self.node = Some(scene.spawn(parent, spec, position));
    }

    fn release(&mut self, scene: &mut dyn Scene, bus: &mut MenuBus) {
        bus.unsubscribe(MenuOwner::Element(self.id));
        self.drag.end();
        if let Some(node) = self.node.take() {
            scene.despawn(node);
        }
    }
}

/// A fixed-size text box attached to a page.
#[derive(Debug, Clone)]
pub struct Annotation {
    base: Attachment,
}

impl Annotation {
    #[must_use]
    pub fn new(page: ElementId, size: Size, drag: DragConfig) -> Self {
        Self { base: Attachment::new(page, size, drag) }
    }

    /// Position in the page's local space.
    #[must_use]
    pub fn position(&self) -> Point {
        self.base.position
    }

    #[must_use]
    pub fn size(&self) -> Size {
        self.base.size
    }

    /// The page this annotation sits on.
    #[must_use]
    pub fn page(&self) -> ElementId {
        self.base.page
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.base.drag.is_dragging()
    }
}

impl SceneElement for Annotation {
    fn id(&self) -> ElementId {
        self.base.id
    }

    fn kind(&self) -> ElementKind {
        ElementKind::Annotation
    }

    fn bounds(&self) -> Rect {
        self.base.bounds()
    }

    fn node(&self) -> Option<NodeId> {
        self.base.node
    }

    fn menu_items(&self) -> Vec<MenuItem> {
        vec![MenuItem::new(ActionKind::Delete)]
    }

    /// Placed at the pointer's height, overhanging the page's right edge by
    /// two thirds of its width.
    fn render(&mut self, scene: &mut dyn Scene, host: &Host, anchor: Point) {
        let size = self.base.size;
        let position = Point::new(host.size.width - size.width / 3.0, host.local_anchor(anchor).y);
        let spec = NodeSpec::Box {
            size,
            fill: ANNOTATION_FILL,
            stroke: Some(Stroke { width: 1.0, color: ANNOTATION_BORDER }),
        };
        self.base.attach(scene, host.parent, spec, position);
    }

    fn destroy(&mut self, scene: &mut dyn Scene, bus: &mut MenuBus) {
        self.base.release(scene, bus);
    }
}

/// A user-imported image attached to a page.
#[derive(Debug, Clone)]
pub struct EmbeddedImage {
    base: Attachment,
    texture: TextureHandle,
}

impl EmbeddedImage {
    #[must_use]
    pub fn new(page: ElementId, texture: TextureHandle, size: Size, drag: DragConfig) -> Self {
        Self { base: Attachment::new(page, size, drag), texture }
    }

    #[must_use]
    pub fn position(&self) -> Point {
        self.base.position
    }

    #[must_use]
    pub fn size(&self) -> Size {
        self.base.size
    }

    #[must_use]
    pub fn page(&self) -> ElementId {
        self.base.page
    }

    #[must_use]
    pub fn texture(&self) -> TextureHandle {
        self.texture
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.base.drag.is_dragging()
    }
}

impl SceneElement for EmbeddedImage {
    fn id(&self) -> ElementId {
        self.base.id
    }

    fn kind(&self) -> ElementKind {
        ElementKind::EmbeddedImage
    }

    fn bounds(&self) -> Rect {
        self.base.bounds()
    }

    fn node(&self) -> Option<NodeId> {
        self.base.node
    }

    fn menu_items(&self) -> Vec<MenuItem> {
        vec![MenuItem::new(ActionKind::Delete)]
    }

    /// Placed against the page's left edge at the pointer's height.
    fn render(&mut self, scene: &mut dyn Scene, host: &Host, anchor: Point) {
        let position = Point::new(0.0, host.local_anchor(anchor).y);
        let spec = NodeSpec::Sprite { texture: self.texture, size: self.base.size };
        self.base.attach(scene, host.parent, spec, position);
    }

    fn destroy(&mut self, scene: &mut dyn Scene, bus: &mut MenuBus) {
        self.base.release(scene, bus);
    }
}

// =============================================================
// Pages
// =============================================================

/// One document page image and everything attached to it.
#[derive(Debug, Clone)]
pub struct Page {
    id: ElementId,
    descriptor_id: u64,
    texture: TextureHandle,
    position: Point,
    size: Size,
    annotations: Vec<Annotation>,
    images: Vec<EmbeddedImage>,
    node: Option<NodeId>,
}

impl Page {
    #[must_use]
    pub fn new(source: &LoadedPage) -> Self {
        Self {
            id: ElementId::new(),
            descriptor_id: source.descriptor_id,
            texture: source.texture,
            position: Point::default(),
            size: source.size,
            annotations: Vec::new(),
            images: Vec::new(),
            node: None,
        }
    }

    /// Id of the data-source descriptor this page was built from.
    #[must_use]
    pub fn descriptor_id(&self) -> u64 {
        self.descriptor_id
    }

    #[must_use]
    pub fn texture(&self) -> TextureHandle {
        self.texture
    }

    /// Top-left corner on the surface.
    #[must_use]
    pub fn position(&self) -> Point {
        self.position
    }

    #[must_use]
    pub fn size(&self) -> Size {
        self.size
    }

    /// Annotations in creation order.
    #[must_use]
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// Embedded images in creation order.
    #[must_use]
    pub fn images(&self) -> &[EmbeddedImage] {
        &self.images
    }

    /// Host context for attaching children to this page.
    #[must_use]
    pub fn host(&self, viewport_offset: Point) -> Host {
        Host {
            parent: self.node.map_or(Parent::Surface, Parent::Node),
            origin: self.position,
            size: self.size,
            viewport_offset,
        }
    }

    fn attachment_mut(&mut self, id: ElementId) -> Option<&mut Attachment> {
        if let Some(a) = self.annotations.iter_mut().find(|a| a.base.id == id) {
            return Some(&mut a.base);
        }
        self.images.iter_mut().find(|i| i.base.id == id).map(|i| &mut i.base)
    }
}

impl SceneElement for Page {
    fn id(&self) -> ElementId {
        self.id
    }

    fn kind(&self) -> ElementKind {
        ElementKind::Page
    }

    fn bounds(&self) -> Rect {
        Rect::new(self.position, self.size)
    }

    fn node(&self) -> Option<NodeId> {
        self.node
    }

    fn menu_items(&self) -> Vec<MenuItem> {
        vec![MenuItem::new(ActionKind::AddEmbeddedImage), MenuItem::new(ActionKind::AddAnnotation)]
    }

    /// Pages are positioned by layout: `anchor` is the page's top-left corner
    /// on the surface.
    fn render(&mut self, scene: &mut dyn Scene, host: &Host, anchor: Point) {
        if let Some(old) = self.node.take() {
            scene.despawn(old);
        }
        self.position = host.local_anchor(anchor);
        let spec = NodeSpec::Sprite { texture: self.texture, size: self.size };
        self.node = Some(scene.spawn(host.parent, spec, self.position));
    }

    fn destroy(&mut self, scene: &mut dyn Scene, bus: &mut MenuBus) {
        for annotation in &mut self.annotations {
            annotation.destroy(scene, bus);
        }
        for image in &mut self.images {
            image.destroy(scene, bus);
        }
        self.annotations.clear();
        self.images.clear();
        bus.unsubscribe(MenuOwner::Element(self.id));
        if let Some(node) = self.node.take() {
            scene.despawn(node);
        }
    }
}

// =============================================================
// Registry
// =============================================================

/// Hit-test view of one element, in surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placed {
    pub id: ElementId,
    pub kind: ElementKind,
    pub bounds: Rect,
}

/// Owns every page and routes mutations to them.
#[derive(Debug, Default)]
pub struct PageRegistry {
    pages: Vec<Page>,
    imports: ImportQueue,
    layout: LayoutConfig,
    drag: DragConfig,
}

impl PageRegistry {
    #[must_use]
    pub fn new(layout: LayoutConfig, drag: DragConfig) -> Self {
        Self { pages: Vec::new(), imports: ImportQueue::new(), layout, drag }
    }

    /// Pages in stacking order.
    #[must_use]
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    #[must_use]
    pub fn page(&self, id: ElementId) -> Option<&Page> {
        self.pages.iter().find(|p| p.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Number of image imports waiting on the file picker.
    #[must_use]
    pub fn pending_imports(&self) -> usize {
        self.imports.len()
    }

    /// Every live element, pages first, each page followed by its
    /// annotations and then its images.
    #[must_use]
    pub fn placed(&self) -> Vec<Placed> {
        let mut out = Vec::new();
        for page in &self.pages {
            out.push(Placed { id: page.id, kind: ElementKind::Page, bounds: page.bounds() });
            let children = page
                .annotations
                .iter()
                .map(|a| a as &dyn SceneElement)
                .chain(page.images.iter().map(|i| i as &dyn SceneElement));
            for child in children {
                let local = child.bounds();
                let bounds = Rect::new(page.position + local.origin, local.size);
                out.push(Placed { id: child.id(), kind: child.kind(), bounds });
            }
        }
        out
    }

    /// Menu items for a live element's own context menu.
    #[must_use]
    pub fn menu_items(&self, id: ElementId) -> Option<Vec<MenuItem>> {
        for page in &self.pages {
            if page.id == id {
                return Some(page.menu_items());
            }
            if let Some(a) = page.annotations.iter().find(|a| a.id() == id) {
                return Some(a.menu_items());
            }
            if let Some(i) = page.images.iter().find(|i| i.id() == id) {
                return Some(i.menu_items());
            }
        }
        None
    }

    /// Replace the whole page set.
    ///
    /// Existing pages are destroyed first, children and menu registrations
    /// included, and pending imports are dropped.
    pub fn load(
        &mut self,
        scene: &mut dyn Scene,
        bus: &mut MenuBus,
        sources: &[LoadedPage],
        window_width: f64,
    ) -> Vec<ElementId> {
        self.destroy_all(scene, bus);

        let heights: Vec<f64> = sources.iter().map(|s| s.size.height).collect();
        let tops = stack_offsets(&heights, self.layout.page_margin);
        let host = Host::surface();
        for (source, top) in sources.iter().zip(tops) {
            let mut page = Page::new(source);
            let anchor = Point::new(centered_x(window_width, source.size.width), top);
            page.render(scene, &host, anchor);
            page.subscribe(bus);
            self.pages.push(page);
        }
        info!(pages = self.pages.len(), "page set loaded");
        self.pages.iter().map(|p| p.id).collect()
    }

    /// Destroy every page and everything on it.
    pub fn destroy_all(&mut self, scene: &mut dyn Scene, bus: &mut MenuBus) {
        for page in &mut self.pages {
            page.destroy(scene, bus);
            self.imports.forget_page(page.id);
        }
        self.pages.clear();
    }

    /// Re-centre every page horizontally; vertical stacking is untouched.
    pub fn relayout(&mut self, scene: &mut dyn Scene, window_width: f64) {
        for page in &mut self.pages {
            page.position.x = centered_x(window_width, page.size.width);
            if let Some(node) = page.node {
                scene.set_position(node, page.position);
            }
        }
    }

    /// Bounding extent of all pages on the surface.
    #[must_use]
    pub fn surface_extent(&self) -> Size {
        let Some(first) = self.pages.first() else {
            return Size::default();
        };
        let init = (first.bounds().origin, Point::new(first.bounds().right(), first.bounds().bottom()));
        let (min, max) = self.pages.iter().fold(init, |(min, max), p| {
            let b = p.bounds();
            (
                Point::new(min.x.min(b.origin.x), min.y.min(b.origin.y)),
                Point::new(max.x.max(b.right()), max.y.max(b.bottom())),
            )
        });
        Size::new(max.x - min.x, max.y - min.y)
    }

    /// Height of the first page, or 0 with no pages loaded.
    #[must_use]
    pub fn first_page_height(&self) -> f64 {
        self.pages.first().map_or(0.0, |p| p.size.height)
    }

    /// Add an annotation to `page` where the menu was opened.
    ///
    /// # Errors
    ///
    /// [`RegistryError::ZoomNotUnity`] when the viewport is zoomed, and
    /// [`RegistryError::UnknownPage`] when the page is gone.
    pub fn add_annotation(
        &mut self,
        scene: &mut dyn Scene,
        bus: &mut MenuBus,
        page: ElementId,
        event: &PointerEvent,
        viewport: &Viewport,
    ) -> Result<ElementId, RegistryError> {
        if !viewport.is_unscaled() {
            info!(scale = viewport.scale(), %page, "annotation refused while zoomed");
            return Err(RegistryError::ZoomNotUnity { scale: viewport.scale() });
        }
        let size = self.layout.annotation;
        let drag = self.drag;
        let target = self.page_mut(page)?;
        let mut annotation = Annotation::new(target.id, size, drag);
        annotation.render(scene, &target.host(viewport.offset()), event.screen);
        annotation.subscribe(bus);
        let id = annotation.id();
        target.annotations.push(annotation);
        info!(%id, %page, "annotation added");
        Ok(id)
    }

    /// Park an "add embedded image" request until the file picker resolves.
    ///
    /// # Errors
    ///
    /// [`RegistryError::UnknownPage`] when the page is gone.
    pub fn request_image_import(
        &mut self,
        page: ElementId,
        event: PointerEvent,
    ) -> Result<ImportTicket, RegistryError> {
        if self.page(page).is_none() {
            return Err(RegistryError::UnknownPage(page));
        }
        Ok(self.imports.request(page, event))
    }

    /// Finish a parked image import.
    ///
    /// # Errors
    ///
    /// [`RegistryError::Import`] when the picker was cancelled or failed (state
    /// is left unchanged), [`RegistryError::UnknownTicket`] for a ticket that
    /// was never issued or already resolved, and [`RegistryError::UnknownPage`]
    /// when the page was destroyed meanwhile.
    pub fn complete_image_import(
        &mut self,
        scene: &mut dyn Scene,
        bus: &mut MenuBus,
        viewport: &Viewport,
        ticket: ImportTicket,
        outcome: Result<ImportedImage, ImportError>,
    ) -> Result<ElementId, RegistryError> {
        let pending = self.imports.take(ticket).ok_or(RegistryError::UnknownTicket)?;
        let image = outcome.inspect_err(|e| debug!(error = %e, page = %pending.page, "image import aborted"))?;
        if image.bytes.is_empty() {
            return Err(ImportError::Empty.into());
        }
        let size = self.layout.image;
        let drag = self.drag;
        let target = self.page_mut(pending.page)?;
        let texture = scene.create_texture(&image.bytes);
        let mut embedded = EmbeddedImage::new(target.id, texture, size, drag);
        embedded.render(scene, &target.host(viewport.offset()), pending.event.screen);
        embedded.subscribe(bus);
        let id = embedded.id();
        target.images.push(embedded);
        info!(%id, page = %pending.page, name = image.name.as_deref().unwrap_or(""), "embedded image added");
        Ok(id)
    }

    /// Destroy an annotation or embedded image.
    ///
    /// # Errors
    ///
    /// [`RegistryError::UnknownElement`] when no such child exists.
    pub fn delete(
        &mut self,
        scene: &mut dyn Scene,
        bus: &mut MenuBus,
        id: ElementId,
    ) -> Result<ElementKind, RegistryError> {
        for page in &mut self.pages {
            if let Some(idx) = page.annotations.iter().position(|a| a.id() == id) {
                let mut removed = page.annotations.remove(idx);
                removed.destroy(scene, bus);
                info!(%id, "annotation deleted");
                return Ok(ElementKind::Annotation);
            }
            if let Some(idx) = page.images.iter().position(|i| i.id() == id) {
                let mut removed = page.images.remove(idx);
                removed.destroy(scene, bus);
                info!(%id, "embedded image deleted");
                return Ok(ElementKind::EmbeddedImage);
            }
        }
        warn!(%id, "delete for unknown element");
        Err(RegistryError::UnknownElement(id))
    }

    /// Start dragging a child at the screen-space `pointer`. Returns whether
    /// `id` is a draggable child.
    pub fn begin_drag(&mut self, id: ElementId, pointer: Point) -> bool {
        let Some((_, base)) = self.attachment_mut(id) else {
            return false;
        };
        base.drag.begin(pointer, base.position);
        true
    }

    /// Move a dragged child toward `pointer`. Returns the new local position,
    /// or `None` when `id` is not being dragged.
    pub fn drag_to(&mut self, scene: &mut dyn Scene, id: ElementId, pointer: Point) -> Option<Point> {
        let (page_height, base) = self.attachment_mut(id)?;
        let next = base.drag.update(pointer, base.position, base.size, page_height)?;
        base.position = next;
        if let Some(node) = base.node {
            scene.set_position(node, next);
        }
        Some(next)
    }

    /// Stop dragging a child.
    pub fn end_drag(&mut self, id: ElementId) {
        if let Some((_, base)) = self.attachment_mut(id) {
            base.drag.end();
        }
    }

    fn page_mut(&mut self, id: ElementId) -> Result<&mut Page, RegistryError> {
        self.pages.iter_mut().find(|p| p.id == id).ok_or(RegistryError::UnknownPage(id))
    }

    fn attachment_mut(&mut self, id: ElementId) -> Option<(f64, &mut Attachment)> {
        self.pages.iter_mut().find_map(|page| {
            let height = page.size.height;
            page.attachment_mut(id).map(|a| (height, a))
        })
    }
}
