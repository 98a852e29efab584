use tracing::{debug, info};

use crate::bus::{MenuBus, MenuClick, MenuOwner};
use crate::config::CanvasConfig;
use crate::element::{ElementId, ElementKind};
use crate::error::ErrorCode;
use crate::hit::{Hit, hit_test};
use crate::import::{ImportError, ImportTicket, ImportedImage};
use crate::input::{Button, InputState, Modifiers, PointerEvent, WheelDelta, WheelGesture, wheel_gesture};
use crate::menu::{ActionKind, ContextMenu, MenuItem, MenuTransition};
use crate::registry::{PageRegistry, RegistryError};
use crate::scene::Scene;
use crate::source::LoadedPage;
use crate::viewport::{Axis, PanDirection, PanOutcome, Point, Size, Viewport, ZoomDirection};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions owned by the canvas-level menu, in display order.
const CANVAS_ACTIONS: [ActionKind; 3] = [ActionKind::ZoomIn, ActionKind::ZoomOut, ActionKind::ZoomReset];

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    RenderNeeded,
    ElementCreated { id: ElementId, kind: ElementKind },
    /// A dragged element moved; `position` is local to its page.
    ElementMoved { id: ElementId, position: Point },
    ElementDeleted { id: ElementId, kind: ElementKind },
    /// Open a file picker and hand the result to
    /// [`EngineCore::complete_image_import`] with this ticket.
    ImportImageRequested { ticket: ImportTicket, page: ElementId },
    MenuOpened { owner: MenuOwner },
    MenuClosed,
    /// A pan was refused at the document edge.
    BorderReached { axis: Axis },
    /// A user request was declined; `code` comes from [`ErrorCode`].
    Refused { code: &'static str, message: String },
    /// Emitted for every zoom request, clamped or not. Hosts use it to
    /// suppress native Ctrl-wheel page zoom.
    ZoomChanged { scale: f64 },
}

fn refused(err: &impl ErrorCode) -> Action {
    Action::Refused { code: err.error_code(), message: err.to_string() }
}

/// Core engine state: all interaction logic, independent of any renderer.
///
/// The host forwards pointer, wheel and resize events and applies the
/// returned [`Action`]s; everything visual goes through the [`Scene`].
pub struct EngineCore<S: Scene> {
    scene: S,
    viewport: Viewport,
    menu: ContextMenu,
    bus: MenuBus,
    registry: PageRegistry,
    input: InputState,
    window: Size,
    config: CanvasConfig,
}

/// A default engine has a zero-sized window; call
/// [`EngineCore::on_resize`] before loading pages.
impl<S: Scene + Default> Default for EngineCore<S> {
    fn default() -> Self {
        Self::new(S::default(), CanvasConfig::default(), Size::default())
    }
}

impl<S: Scene> EngineCore<S> {
    /// `window` is the host's initial window size, used to centre pages.
    #[must_use]
    pub fn new(scene: S, config: CanvasConfig, window: Size) -> Self {
        let mut bus = MenuBus::new();
        bus.subscribe(MenuOwner::Canvas, &CANVAS_ACTIONS);
        Self {
            scene,
            viewport: Viewport::new(config.viewport),
            menu: ContextMenu::new(config.menu),
            bus,
            registry: PageRegistry::new(config.layout, config.drag),
            input: InputState::default(),
            window,
            config,
        }
    }

    // --- Data inputs ---

    /// Replace the page set with freshly loaded pages.
    ///
    /// Any open menu is closed and any drag abandoned, since their owners are
    /// about to be destroyed. Pages are centred in the window last given to
    /// [`EngineCore::new`] or [`EngineCore::on_resize`].
    pub fn load_pages(&mut self, pages: &[LoadedPage]) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.menu.close(&mut self.scene) {
            actions.push(Action::MenuClosed);
        }
        self.input = InputState::Idle;
        let ids = self.registry.load(&mut self.scene, &mut self.bus, pages, self.window.width);
        self.refresh_surface();
        actions.extend(ids.into_iter().map(|id| Action::ElementCreated { id, kind: ElementKind::Page }));
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Complete an image import started by [`Action::ImportImageRequested`].
    ///
    /// A cancelled picker changes nothing and yields no actions.
    pub fn complete_image_import(
        &mut self,
        ticket: ImportTicket,
        outcome: Result<ImportedImage, ImportError>,
    ) -> Vec<Action> {
        let result =
            self.registry
                .complete_image_import(&mut self.scene, &mut self.bus, &self.viewport, ticket, outcome);
        match result {
            Ok(id) => vec![Action::ElementCreated { id, kind: ElementKind::EmbeddedImage }, Action::RenderNeeded],
            Err(RegistryError::Import(ImportError::Cancelled)) => Vec::new(),
            Err(e) => {
                info!(error = %e, "image import not applied");
                vec![refused(&e)]
            }
        }
    }

    // --- Viewport ---

    /// The host window was resized: re-centre pages horizontally.
    pub fn on_resize(&mut self, width: f64, height: f64) -> Vec<Action> {
        self.window = Size::new(width, height);
        self.registry.relayout(&mut self.scene, width);
        self.refresh_surface();
        vec![Action::RenderNeeded]
    }

    /// Step the zoom and report the resulting scale.
    pub fn zoom(&mut self, direction: ZoomDirection) -> Vec<Action> {
        let scale = self.viewport.zoom(direction);
        vec![Action::ZoomChanged { scale }, Action::RenderNeeded]
    }

    /// Step the pan, or report the border.
    pub fn pan(&mut self, axis: Axis, direction: PanDirection) -> Vec<Action> {
        match self.viewport.pan(axis, direction) {
            PanOutcome::Moved => vec![Action::RenderNeeded],
            PanOutcome::AtBorder => vec![Action::BorderReached { axis }],
        }
    }

    // --- Input events ---

    pub fn on_wheel(&mut self, delta: WheelDelta, modifiers: Modifiers) -> Vec<Action> {
        match wheel_gesture(delta, modifiers) {
            WheelGesture::Zoom(direction) => self.zoom(direction),
            WheelGesture::Pan(axis, direction) => self.pan(axis, direction),
        }
    }

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        let event = PointerEvent::new(screen_pt, button, modifiers);
        let hit = hit_test(screen_pt, &self.menu, &self.registry, &self.viewport);
        match button {
            Button::Secondary => self.right_click(event, hit),
            Button::Primary => self.left_click(event, hit),
            Button::Middle => Vec::new(),
        }
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point) -> Vec<Action> {
        let InputState::DraggingElement { id } = self.input else {
            return Vec::new();
        };
        let world = self.viewport.screen_to_world(screen_pt);
        match self.registry.drag_to(&mut self.scene, id, world) {
            Some(position) => vec![Action::ElementMoved { id, position }, Action::RenderNeeded],
            None => Vec::new(),
        }
    }

    /// Ends any drag, wherever the pointer is released.
    pub fn on_pointer_up(&mut self, _screen_pt: Point) -> Vec<Action> {
        if let InputState::DraggingElement { id } = self.input {
            self.registry.end_drag(id);
            debug!(%id, "drag ended");
        }
        self.input = InputState::Idle;
        Vec::new()
    }

    // --- Menu actions ---

    /// Act on a delivered menu click.
    pub fn dispatch(&mut self, click: MenuClick) -> Vec<Action> {
        let payload = click.payload;
        match (payload.owner, click.kind) {
            (MenuOwner::Canvas, ActionKind::ZoomIn) => self.zoom(ZoomDirection::Increase),
            (MenuOwner::Canvas, ActionKind::ZoomOut) => self.zoom(ZoomDirection::Decrease),
            (MenuOwner::Canvas, ActionKind::ZoomReset) => self.zoom(ZoomDirection::Reset),
            (MenuOwner::Element(page), ActionKind::AddAnnotation) => {
                let added =
                    self.registry
                        .add_annotation(&mut self.scene, &mut self.bus, page, &payload.event, &self.viewport);
                match added {
                    Ok(id) => vec![Action::ElementCreated { id, kind: ElementKind::Annotation }, Action::RenderNeeded],
                    Err(e) => vec![refused(&e)],
                }
            }
            (MenuOwner::Element(page), ActionKind::AddEmbeddedImage) => {
                match self.registry.request_image_import(page, payload.event) {
                    Ok(ticket) => vec![Action::ImportImageRequested { ticket, page }],
                    Err(e) => vec![refused(&e)],
                }
            }
            (MenuOwner::Element(id), ActionKind::Delete) => self.delete_element(id),
            (owner, kind) => {
                debug!(?owner, ?kind, "menu click has no handler");
                Vec::new()
            }
        }
    }

    /// Destroy an annotation or embedded image, closing its menu and
    /// abandoning any drag of it.
    pub fn delete_element(&mut self, id: ElementId) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.input == (InputState::DraggingElement { id }) {
            self.input = InputState::Idle;
        }
        if self.menu.close_owned_by(&mut self.scene, MenuOwner::Element(id)) {
            actions.push(Action::MenuClosed);
        }
        match self.registry.delete(&mut self.scene, &mut self.bus, id) {
            Ok(kind) => {
                actions.push(Action::ElementDeleted { id, kind });
                actions.push(Action::RenderNeeded);
            }
            Err(e) => actions.push(refused(&e)),
        }
        actions
    }

    // --- Queries ---

    #[must_use]
    pub fn scene(&self) -> &S {
        &self.scene
    }

    #[must_use]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    #[must_use]
    pub fn menu(&self) -> &ContextMenu {
        &self.menu
    }

    #[must_use]
    pub fn registry(&self) -> &PageRegistry {
        &self.registry
    }

    #[must_use]
    pub fn bus(&self) -> &MenuBus {
        &self.bus
    }

    #[must_use]
    pub fn input(&self) -> InputState {
        self.input
    }

    #[must_use]
    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    // --- Internals ---

    fn right_click(&mut self, event: PointerEvent, hit: Hit) -> Vec<Action> {
        let transition = match hit {
            Hit::MenuRow(_) | Hit::MenuBody => return Vec::new(),
            Hit::Element { id, .. } => {
                let Some(items) = self.registry.menu_items(id) else {
                    return Vec::new();
                };
                (MenuOwner::Element(id), self.menu.on_element_right_click(&mut self.scene, event, id, &items))
            }
            Hit::Canvas => {
                let items: Vec<MenuItem> = CANVAS_ACTIONS.into_iter().map(MenuItem::new).collect();
                (MenuOwner::Canvas, self.menu.on_canvas_right_click(&mut self.scene, event, &items))
            }
        };
        match transition {
            (owner, MenuTransition::Opened | MenuTransition::Reopened) => {
                vec![Action::MenuOpened { owner }, Action::RenderNeeded]
            }
            (_, MenuTransition::Closed) => vec![Action::MenuClosed, Action::RenderNeeded],
            (_, MenuTransition::Ignored) => Vec::new(),
        }
    }

    fn left_click(&mut self, event: PointerEvent, hit: Hit) -> Vec<Action> {
        if let Hit::MenuRow(handle) = hit {
            let click = self.menu.click(&mut self.scene, handle, &self.bus);
            let mut actions = vec![Action::MenuClosed, Action::RenderNeeded];
            if let Some(click) = click {
                actions.extend(self.dispatch(click));
            }
            return actions;
        }

        let mut actions = Vec::new();
        if self.menu.close(&mut self.scene) {
            actions.extend([Action::MenuClosed, Action::RenderNeeded]);
        }
        if let Hit::Element { id, kind: ElementKind::Annotation | ElementKind::EmbeddedImage } = hit {
            let world = self.viewport.screen_to_world(event.screen);
            if self.registry.begin_drag(id, world) {
                self.input = InputState::DraggingElement { id };
                debug!(%id, "drag started");
            }
        }
        actions
    }

    fn refresh_surface(&mut self) {
        self.viewport.set_surface(self.registry.surface_extent(), self.registry.first_page_height());
    }
}
