//! Grid canvas controller
//!
//! Owns the widget cells in the DOM: placement, selection, drag/resize
//! interaction, context menu, keyboard shortcuts, the palette drop zone,
//! and presentation zoom. All geometry decisions are delegated to the pure
//! `grid_layout` crate; committed layout changes are reported to the host
//! as the complete layout array through the event sink.
//!
//! Handlers return [`SinkAction`]s instead of calling the sink while the
//! controller is borrowed — the host callback may synchronously re-enter
//! the canvas API.

use std::collections::HashMap;
use std::rc::{Rc, Weak};

use std::cell::RefCell;
use uuid::Uuid;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement};

use config_system::WidgetConfig;
use grid_layout::{
    compact, find_free_position, move_item, normalize, resize_item, CellMetrics, DragSession,
    ResizeSession, Zoom,
};
use shared_types::events::{DropPayload, HostEventSink, Notice};
use shared_types::{LayoutEntry, PlanTier, Widget};

use crate::instance_manager::{InstanceManager, WidgetInstance};
use crate::lifecycle::SurfaceLifecycle;
use crate::scheduler::UpdateScheduler;
use crate::timers::ListenerGuard;

pub const DEFAULT_ROW_HEIGHT: f64 = 80.0;
pub const DEFAULT_GAP: f64 = 10.0;

/// Deferred host notification, dispatched after the controller borrow ends
pub enum SinkAction {
    LayoutChange(Vec<LayoutEntry>),
    Select(Option<Widget>),
    Update(String, serde_json::Value),
    Delete(String),
    Duplicate(Widget),
    AddWidget(DropPayload),
    Notice(Notice),
    Save,
    Undo,
    Redo,
}

pub fn dispatch(sink: &Rc<dyn HostEventSink>, actions: Vec<SinkAction>) {
    for action in actions {
        match action {
            SinkAction::LayoutChange(layout) => sink.on_layout_change(&layout),
            SinkAction::Select(widget) => sink.on_widget_select(widget.as_ref()),
            SinkAction::Update(id, partial) => sink.on_widget_update(&id, &partial),
            SinkAction::Delete(id) => sink.on_widget_delete(&id),
            SinkAction::Duplicate(widget) => sink.on_widget_duplicate(&widget),
            SinkAction::AddWidget(payload) => sink.on_add_widget(&payload),
            SinkAction::Notice(notice) => sink.on_notice(&notice),
            SinkAction::Save => sink.on_save(),
            SinkAction::Undo => sink.on_undo(),
            SinkAction::Redo => sink.on_redo(),
        }
    }
}

struct CellView {
    root: HtmlElement,
    title: Element,
    instance_id: Uuid,
    _listeners: Vec<ListenerGuard>,
}

struct MenuView {
    root: HtmlElement,
    _listeners: Vec<ListenerGuard>,
}

pub struct GridController {
    document: Document,
    container: HtmlElement,
    canvas: HtmlElement,
    sink: Rc<dyn HostEventSink>,
    self_ref: Weak<RefCell<GridController>>,
    plan_tier: PlanTier,
    row_height: f64,
    gap: f64,
    widgets: Vec<Widget>,
    layout: Vec<LayoutEntry>,
    selected: Option<String>,
    zoom: Zoom,
    cells: HashMap<String, CellView>,
    drag: Option<DragSession>,
    resizing: Option<ResizeSession>,
    menu: Option<MenuView>,
}

impl GridController {
    pub fn new(
        container: HtmlElement,
        sink: Rc<dyn HostEventSink>,
        plan_tier: PlanTier,
        row_height: f64,
        gap: f64,
    ) -> Result<Self, JsValue> {
        let document = container
            .owner_document()
            .ok_or_else(|| JsValue::from_str("container is not in a document"))?;
        let canvas: HtmlElement = document.create_element("div")?.dyn_into()?;
        canvas.set_class_name("gc-canvas");
        let style = canvas.style();
        style.set_property("position", "relative")?;
        style.set_property("transform-origin", "top left")?;
        container.append_child(&canvas)?;

        Ok(Self {
            document,
            container,
            canvas,
            sink,
            self_ref: Weak::new(),
            plan_tier,
            row_height,
            gap,
            widgets: Vec::new(),
            layout: Vec::new(),
            selected: None,
            zoom: Zoom::default(),
            cells: HashMap::new(),
            drag: None,
            resizing: None,
            menu: None,
        })
    }

    /// Must be called once right after the controller is wrapped in its Rc;
    /// cell listeners re-enter through this reference.
    pub fn set_self_ref(&mut self, weak: Weak<RefCell<GridController>>) {
        self.self_ref = weak;
    }

    pub fn canvas(&self) -> &HtmlElement {
        &self.canvas
    }

    fn metrics(&self) -> CellMetrics {
        CellMetrics::new(self.container.client_width() as f64, self.row_height, self.gap)
    }

    fn widget(&self, id: &str) -> Option<&Widget> {
        self.widgets.iter().find(|w| w.id == id)
    }

    pub fn instance_for(&self, widget_id: &str) -> Option<Uuid> {
        self.cells.get(widget_id).map(|c| c.instance_id)
    }

    /// Reconcile the cell set against the host-owned widget and layout
    /// arrays. Cells are persistent: an already-mounted widget keeps its
    /// DOM node and surface across layout changes.
    pub fn sync(&mut self, widgets: Vec<Widget>, layout: Vec<LayoutEntry>) -> Result<(), JsValue> {
        self.layout = compact(&normalize(&widgets, &layout), None);
        self.widgets = widgets;

        // Remove cells whose widget is gone.
        let live_ids: Vec<String> = self.widgets.iter().map(|w| w.id.clone()).collect();
        let stale: Vec<String> = self
            .cells
            .keys()
            .filter(|id| !live_ids.contains(id))
            .cloned()
            .collect();
        for id in stale {
            if let Some(cell) = self.cells.remove(&id) {
                InstanceManager::remove_instance(&cell.instance_id);
                cell.root.remove();
            }
        }
        if let Some(selected) = &self.selected {
            if !live_ids.contains(selected) {
                self.selected = None;
            }
        }

        // Mount cells for new widgets.
        let new_ids: Vec<String> = self
            .widgets
            .iter()
            .filter(|w| !self.cells.contains_key(&w.id))
            .map(|w| w.id.clone())
            .collect();
        for id in new_ids {
            let widget = self.widget(&id).cloned().expect("widget just listed");
            self.mount_cell(&widget)?;
        }

        // Refresh attributes on surviving cells: title text, and the base
        // chart kind feeding the compiler.
        for widget in &self.widgets {
            if let Some(cell) = self.cells.get(&widget.id) {
                cell.title.set_text_content(Some(&widget.title));
                InstanceManager::with_instance_mut(&cell.instance_id, |instance| {
                    instance
                        .scheduler
                        .set_base_kind(&mut instance.lifecycle, widget.kind);
                });
            }
        }

        self.apply_layout()?;
        Ok(())
    }

    fn mount_cell(&mut self, widget: &Widget) -> Result<(), JsValue> {
        let root: HtmlElement = self.document.create_element("div")?.dyn_into()?;
        root.set_class_name("gc-cell");
        root.set_attribute("data-widget-id", &widget.id)?;
        root.style().set_property("position", "absolute")?;

        let header: HtmlElement = self.document.create_element("div")?.dyn_into()?;
        header.set_class_name("gc-cell-header");
        let title = self.document.create_element("span")?;
        title.set_class_name("gc-cell-title");
        title.set_text_content(Some(&widget.title));
        header.append_child(&title)?;
        root.append_child(&header)?;

        let body: HtmlElement = self.document.create_element("div")?.dyn_into()?;
        body.set_class_name("gc-cell-body");
        body.style().set_property("width", "100%")?;
        body.style().set_property("height", "100%")?;
        root.append_child(&body)?;

        let handle: HtmlElement = self.document.create_element("div")?.dyn_into()?;
        handle.set_class_name("gc-resize-handle");
        root.append_child(&handle)?;

        self.canvas.append_child(&root)?;

        // One widget instance per cell: lifecycle owns the surface bound to
        // the body element.
        let lifecycle = SurfaceLifecycle::new(body.clone().into(), true, None);
        let scheduler = UpdateScheduler::new(widget.kind, self.plan_tier);
        let instance_id = InstanceManager::create_instance(WidgetInstance {
            widget_id: widget.id.clone(),
            lifecycle,
            scheduler,
        });
        InstanceManager::with_instance_mut(&instance_id, |instance| {
            instance.lifecycle.set_instance_id(instance_id);
            instance.scheduler.set_instance_id(instance_id);
            instance
                .scheduler
                .prime(&mut instance.lifecycle, WidgetConfig::default(), None);
            instance.lifecycle.mount();
        });

        let mut listeners = Vec::new();
        let weak = self.self_ref.clone();
        let sink = self.sink.clone();
        let id = widget.id.clone();
        listeners.push(ListenerGuard::attach(
            root.as_ref(),
            "pointerdown",
            move |event| {
                let Some(ctrl) = weak.upgrade() else { return };
                let Some(mouse) = event.dyn_ref::<web_sys::MouseEvent>() else { return };
                if mouse.button() != 0 {
                    return;
                }
                let target_is_handle = event
                    .target()
                    .and_then(|t| t.dyn_into::<Element>().ok())
                    .is_some_and(|el| el.class_name().contains("gc-resize-handle"));
                let actions = ctrl.borrow_mut().handle_cell_pointer_down(
                    &id,
                    mouse.client_x() as f64,
                    mouse.client_y() as f64,
                    target_is_handle,
                );
                dispatch(&sink, actions);
            },
        )?);

        let weak = self.self_ref.clone();
        let sink = self.sink.clone();
        let id = widget.id.clone();
        listeners.push(ListenerGuard::attach(
            root.as_ref(),
            "contextmenu",
            move |event| {
                event.prevent_default();
                event.stop_propagation();
                let Some(ctrl) = weak.upgrade() else { return };
                let Some(mouse) = event.dyn_ref::<web_sys::MouseEvent>() else { return };
                let actions = ctrl.borrow_mut().open_context_menu(
                    &id,
                    mouse.client_x() as f64,
                    mouse.client_y() as f64,
                );
                dispatch(&sink, actions);
            },
        )?);

        self.cells.insert(
            widget.id.clone(),
            CellView { root, title, instance_id, _listeners: listeners },
        );
        Ok(())
    }

    /// Position every cell from the layout array and refresh its visual
    /// state classes.
    fn apply_layout(&mut self) -> Result<(), JsValue> {
        let metrics = self.metrics();
        for entry in &self.layout {
            let Some(cell) = self.cells.get(&entry.i) else { continue };
            let rect = metrics.rect_for(entry);
            let style = cell.root.style();
            style.set_property("left", &format!("{}px", rect.left))?;
            style.set_property("top", &format!("{}px", rect.top))?;
            style.set_property("width", &format!("{}px", rect.width))?;
            style.set_property("height", &format!("{}px", rect.height))?;

            let widget = self.widgets.iter().find(|w| w.id == entry.i);
            let selected = self.selected.as_deref() == Some(entry.i.as_str());
            let locked = widget.is_some_and(|w| w.is_locked);
            let hidden = widget.is_some_and(|w| !w.is_visible);
            let mut class = String::from("gc-cell");
            if selected {
                class.push_str(" is-selected");
            }
            if locked {
                class.push_str(" is-locked");
            }
            if hidden {
                class.push_str(" is-hidden");
            }
            cell.root.set_class_name(&class);
            // Hidden widgets stay in the DOM for state continuity.
            style.set_property("opacity", if hidden { "0.45" } else { "1" })?;
        }
        // Canvas grows with the content so the container can scroll.
        let height = grid_layout::bottom(&self.layout) as f64 * (self.row_height + self.gap)
            + self.gap;
        self.canvas.style().set_property("height", &format!("{height}px"))?;
        Ok(())
    }

    fn canvas_position(&self, client_x: f64, client_y: f64) -> (f64, f64) {
        let rect = self.canvas.get_bounding_client_rect();
        let scale = self.zoom.scale();
        ((client_x - rect.left()) / scale, (client_y - rect.top()) / scale)
    }

    fn handle_cell_pointer_down(
        &mut self,
        id: &str,
        client_x: f64,
        client_y: f64,
        on_resize_handle: bool,
    ) -> Vec<SinkAction> {
        let mut actions = self.select(Some(id));
        let Some(widget) = self.widget(id) else {
            return actions;
        };
        if widget.is_locked {
            return actions;
        }
        let Some(entry) = self.layout.iter().find(|e| e.i == id).cloned() else {
            return actions;
        };
        let metrics = self.metrics();
        let (px, py) = self.canvas_position(client_x, client_y);
        if on_resize_handle {
            self.resizing = Some(ResizeSession::begin(id, &metrics, &entry));
        } else {
            self.drag = Some(DragSession::begin(id, &metrics, &entry, px, py));
        }
        actions.append(&mut self.dismiss_menu());
        actions
    }

    pub fn handle_pointer_move(&mut self, client_x: f64, client_y: f64) -> Vec<SinkAction> {
        let metrics = self.metrics();
        let (px, py) = self.canvas_position(client_x, client_y);
        if let Some(drag) = self.drag.clone() {
            let (x, y) = drag.target_cell(&metrics, px, py);
            self.layout = move_item(&self.layout, &drag.id, x, y);
            let _ = self.apply_layout();
        } else if let Some(resize) = self.resizing.clone() {
            let (w, h) = resize.target_span(&metrics, px, py);
            self.layout = resize_item(&self.layout, &resize.id, w, h);
            let _ = self.apply_layout();
        }
        Vec::new()
    }

    /// Commit an active drag or resize: the complete layout array goes to
    /// the host, which is the sole persistence authority.
    pub fn handle_pointer_up(&mut self) -> Vec<SinkAction> {
        if self.drag.take().is_some() || self.resizing.take().is_some() {
            vec![SinkAction::LayoutChange(self.layout.clone())]
        } else {
            Vec::new()
        }
    }

    /// Selection is single-widget; `None` clears it.
    pub fn select(&mut self, id: Option<&str>) -> Vec<SinkAction> {
        let next = id.map(String::from);
        if self.selected == next {
            return Vec::new();
        }
        self.selected = next;
        let _ = self.apply_layout();
        let widget = self.selected.as_deref().and_then(|id| self.widget(id)).cloned();
        vec![SinkAction::Select(widget)]
    }

    pub fn handle_document_click(&mut self, target: Option<Element>) -> Vec<SinkAction> {
        let mut actions = self.dismiss_menu();
        // Clicking empty canvas clears the selection; clicks inside a cell
        // were already handled by the cell's own pointerdown.
        let canvas_el: &Element = self.canvas.as_ref();
        let container_el: &Element = self.container.as_ref();
        let clicked_canvas =
            target.is_some_and(|el| el == *canvas_el || el == *container_el);
        if clicked_canvas {
            actions.append(&mut self.select(None));
        }
        actions
    }

    pub fn handle_key_down(&mut self, event: &web_sys::KeyboardEvent) -> Vec<SinkAction> {
        let command = event.ctrl_key() || event.meta_key();
        match event.key().as_str() {
            "s" | "S" if command => {
                event.prevent_default();
                vec![SinkAction::Save]
            }
            "z" if command => {
                event.prevent_default();
                vec![SinkAction::Undo]
            }
            "Z" if command => {
                event.prevent_default();
                vec![SinkAction::Redo]
            }
            "Delete" | "Backspace" => {
                let Some(id) = self.selected.clone() else {
                    return Vec::new();
                };
                self.confirm_delete(&id)
            }
            "Escape" => {
                let mut actions = self.dismiss_menu();
                actions.append(&mut self.select(None));
                actions
            }
            // Native copy and everything else pass through untouched.
            _ => Vec::new(),
        }
    }

    /// Destructive action gate: the delete callback fires only after the
    /// user confirms; cancellation leaves all state untouched.
    fn confirm_delete(&mut self, id: &str) -> Vec<SinkAction> {
        let title = self
            .widget(id)
            .map(|w| w.title.clone())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| id.to_string());
        let confirmed = web_sys::window()
            .and_then(|w| w.confirm_with_message(&format!("Delete widget \"{title}\"?")).ok())
            .unwrap_or(false);
        if confirmed {
            vec![SinkAction::Delete(id.to_string())]
        } else {
            Vec::new()
        }
    }

    fn open_context_menu(&mut self, id: &str, client_x: f64, client_y: f64) -> Vec<SinkAction> {
        let mut actions = self.dismiss_menu();
        let Some(widget) = self.widget(id).cloned() else {
            return actions;
        };

        let Ok(root) = self.build_menu(&widget, client_x, client_y) else {
            return actions;
        };
        actions.append(&mut self.select(Some(id)));
        self.menu = Some(root);
        actions
    }

    fn build_menu(&self, widget: &Widget, client_x: f64, client_y: f64) -> Result<MenuView, JsValue> {
        let root: HtmlElement = self.document.create_element("div")?.dyn_into()?;
        root.set_class_name("gc-context-menu");
        let style = root.style();
        style.set_property("position", "fixed")?;
        style.set_property("left", &format!("{client_x}px"))?;
        style.set_property("top", &format!("{client_y}px"))?;

        let mut listeners = Vec::new();
        let items: [(&str, MenuCommand); 5] = [
            ("Edit", MenuCommand::Edit),
            ("Duplicate", MenuCommand::Duplicate),
            (
                if widget.is_visible { "Hide" } else { "Show" },
                MenuCommand::ToggleVisibility,
            ),
            (
                if widget.is_locked { "Unlock" } else { "Lock" },
                MenuCommand::ToggleLock,
            ),
            ("Delete", MenuCommand::Delete),
        ];
        for (label, command) in items {
            let item: HtmlElement = self.document.create_element("button")?.dyn_into()?;
            item.set_class_name("gc-menu-item");
            item.set_text_content(Some(label));
            root.append_child(&item)?;

            let weak = self.self_ref.clone();
            let sink = self.sink.clone();
            let id = widget.id.clone();
            listeners.push(ListenerGuard::attach(item.as_ref(), "click", move |event| {
                event.stop_propagation();
                let Some(ctrl) = weak.upgrade() else { return };
                let actions = ctrl.borrow_mut().run_menu_command(&id, command);
                dispatch(&sink, actions);
            })?);
        }

        self.document
            .body()
            .ok_or_else(|| JsValue::from_str("no body"))?
            .append_child(&root)?;
        Ok(MenuView { root, _listeners: listeners })
    }

    fn run_menu_command(&mut self, id: &str, command: MenuCommand) -> Vec<SinkAction> {
        let mut actions = self.dismiss_menu();
        let Some(widget) = self.widget(id).cloned() else {
            return actions;
        };
        match command {
            MenuCommand::Edit => actions.append(&mut self.select(Some(id))),
            MenuCommand::Duplicate => actions.push(SinkAction::Duplicate(widget)),
            MenuCommand::ToggleVisibility => actions.push(SinkAction::Update(
                id.to_string(),
                serde_json::json!({"isVisible": !widget.is_visible}),
            )),
            MenuCommand::ToggleLock => actions.push(SinkAction::Update(
                id.to_string(),
                serde_json::json!({"isLocked": !widget.is_locked}),
            )),
            MenuCommand::Delete => actions.append(&mut self.confirm_delete(id)),
        }
        actions
    }

    pub fn dismiss_menu(&mut self) -> Vec<SinkAction> {
        if let Some(menu) = self.menu.take() {
            menu.root.remove();
        }
        Vec::new()
    }

    /// Palette drop: parse the structured payload; malformed payloads are
    /// swallowed with a warning, never propagated as a crash.
    pub fn handle_drop(&mut self, raw: &str) -> Vec<SinkAction> {
        match DropPayload::parse(raw) {
            Ok(payload) => {
                let (x, y) = find_free_position(
                    &self.layout,
                    shared_types::DEFAULT_CELL_W,
                    shared_types::DEFAULT_CELL_H,
                );
                log::debug!("palette drop of {} widget at ({x}, {y})", payload.kind);
                vec![SinkAction::AddWidget(payload)]
            }
            Err(err) => {
                log::warn!("ignoring malformed drop payload: {err}");
                vec![SinkAction::Notice(Notice::warning(
                    "Could not add widget: unrecognized drop payload",
                ))]
            }
        }
    }

    /// Presentation-only zoom; stored layout coordinates are unaffected.
    pub fn set_zoom(&mut self, zoom: Zoom) -> Result<u32, JsValue> {
        self.zoom = zoom;
        self.canvas
            .style()
            .set_property("transform", &format!("scale({})", zoom.scale()))?;
        Ok(zoom.percent())
    }

    pub fn zoom(&self) -> Zoom {
        self.zoom
    }

    pub fn set_plan_tier(&mut self, tier: PlanTier) {
        self.plan_tier = tier;
        for cell in self.cells.values() {
            InstanceManager::with_instance_mut(&cell.instance_id, |instance| {
                instance.scheduler.set_plan_tier(&mut instance.lifecycle, tier);
            });
        }
    }

    /// Route a configuration/data change into the widget's scheduler.
    pub fn update_widget_config(
        &mut self,
        id: &str,
        config: WidgetConfig,
        data: Option<serde_json::Value>,
    ) -> Result<(), JsValue> {
        let Some(instance_id) = self.instance_for(id) else {
            return Err(JsValue::from_str(&format!("unknown widget {id}")));
        };
        InstanceManager::with_instance_mut(&instance_id, |instance| {
            instance.scheduler.submit(config, data);
        });
        Ok(())
    }

    /// Full teardown: every instance disposed, every cell removed.
    pub fn dispose(&mut self) {
        self.dismiss_menu();
        for (_, cell) in self.cells.drain() {
            InstanceManager::remove_instance(&cell.instance_id);
            cell.root.remove();
        }
        self.canvas.remove();
        self.widgets.clear();
        self.layout.clear();
        self.selected = None;
    }
}

#[derive(Clone, Copy)]
enum MenuCommand {
    Edit,
    Duplicate,
    ToggleVisibility,
    ToggleLock,
    Delete,
}
