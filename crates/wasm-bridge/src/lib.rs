//! WASM bridge crate for Grid Charts
//! Central orchestration layer that bridges the host JavaScript application
//! and the Rust widget engine: the public canvas API, per-widget instances,
//! surface lifecycles, and the update scheduler.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;

// Core modules
pub mod export;
pub mod grid;
pub mod instance_manager;
pub mod lifecycle;
pub mod scheduler;
pub mod sink;
pub mod surface;
pub mod timers;

use grid::{dispatch, GridController};
use grid_layout::Zoom;
use shared_types::events::HostEventSink;
use shared_types::{ExportFormat, PlanTier};
use sink::JsEventSink;
use timers::ListenerGuard;

fn init_runtime() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        std::panic::set_hook(Box::new(console_error_panic_hook::hook));
        // Ignore failure if the host already installed a logger.
        let _ = console_log::init_with_level(log::Level::Debug);
    });
}

/// Canvas construction options
#[derive(serde::Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct CanvasOptions {
    row_height: Option<f64>,
    gap: Option<f64>,
    plan_tier: Option<PlanTier>,
}

/// The dashboard canvas: one per dashboard, hosting one cell per widget.
#[wasm_bindgen]
pub struct GridCanvas {
    controller: Rc<RefCell<GridController>>,
    sink: Rc<dyn HostEventSink>,
    _listeners: Vec<ListenerGuard>,
}

#[wasm_bindgen]
impl GridCanvas {
    /// `container_id` is the DOM id of the host element; `callbacks` is a
    /// plain object of host callback functions (`onLayoutChange`,
    /// `onWidgetSelect`, ...).
    #[wasm_bindgen(constructor)]
    pub fn new(
        container_id: &str,
        callbacks: js_sys::Object,
        options: JsValue,
    ) -> Result<GridCanvas, JsValue> {
        init_runtime();

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let container: web_sys::HtmlElement = document
            .get_element_by_id(container_id)
            .ok_or_else(|| JsValue::from_str("container not found"))?
            .dyn_into()
            .map_err(|_| JsValue::from_str("container is not an HTML element"))?;

        let options: CanvasOptions = if options.is_undefined() || options.is_null() {
            CanvasOptions::default()
        } else {
            serde_wasm_bindgen::from_value(options)
                .map_err(|e| JsValue::from_str(&e.to_string()))?
        };

        let sink: Rc<dyn HostEventSink> = Rc::new(JsEventSink::new(callbacks));
        let controller = GridController::new(
            container,
            sink.clone(),
            options.plan_tier.unwrap_or_default(),
            options.row_height.unwrap_or(grid::DEFAULT_ROW_HEIGHT),
            options.gap.unwrap_or(grid::DEFAULT_GAP),
        )?;
        let controller = Rc::new(RefCell::new(controller));
        controller
            .borrow_mut()
            .set_self_ref(Rc::downgrade(&controller));

        let listeners = Self::wire_listeners(&controller, &sink, &document)?;
        log::info!("grid canvas mounted in #{container_id}");
        Ok(GridCanvas { controller, sink, _listeners: listeners })
    }

    /// Reconcile the canvas against the host-owned widget and layout
    /// arrays. The engine never mutates them — it reports requested
    /// changes through the callbacks instead.
    pub fn sync(&self, widgets: JsValue, layout: JsValue) -> Result<(), JsValue> {
        let widgets: Vec<shared_types::Widget> = serde_wasm_bindgen::from_value(widgets)
            .map_err(|e| JsValue::from_str(&format!("bad widgets array: {e}")))?;
        let layout: Vec<shared_types::LayoutEntry> = serde_wasm_bindgen::from_value(layout)
            .map_err(|e| JsValue::from_str(&format!("bad layout array: {e}")))?;
        self.controller.borrow_mut().sync(widgets, layout)
    }

    /// Route a configuration/data change to one widget's update pipeline.
    #[wasm_bindgen(js_name = updateWidgetConfig)]
    pub fn update_widget_config(
        &self,
        widget_id: &str,
        config: JsValue,
        data: JsValue,
    ) -> Result<(), JsValue> {
        let config: config_system::WidgetConfig = if config.is_undefined() || config.is_null() {
            config_system::WidgetConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&format!("bad config object: {e}")))?
        };
        let data: Option<serde_json::Value> = if data.is_undefined() || data.is_null() {
            None
        } else {
            Some(
                serde_wasm_bindgen::from_value(data)
                    .map_err(|e| JsValue::from_str(&format!("bad data payload: {e}")))?,
            )
        };
        self.controller
            .borrow_mut()
            .update_widget_config(widget_id, config, data)
    }

    /// Programmatic selection (e.g. from the design panel).
    #[wasm_bindgen(js_name = selectWidget)]
    pub fn select_widget(&self, widget_id: Option<String>) {
        let actions = self.controller.borrow_mut().select(widget_id.as_deref());
        dispatch(&self.sink, actions);
    }

    #[wasm_bindgen(js_name = setZoom)]
    pub fn set_zoom(&self, percent: u32) -> Result<u32, JsValue> {
        self.controller.borrow_mut().set_zoom(Zoom::new(percent))
    }

    #[wasm_bindgen(js_name = zoomIn)]
    pub fn zoom_in(&self) -> Result<u32, JsValue> {
        let mut controller = self.controller.borrow_mut();
        let next = controller.zoom().zoom_in();
        controller.set_zoom(next)
    }

    #[wasm_bindgen(js_name = zoomOut)]
    pub fn zoom_out(&self) -> Result<u32, JsValue> {
        let mut controller = self.controller.borrow_mut();
        let next = controller.zoom().zoom_out();
        controller.set_zoom(next)
    }

    /// Entitlement change from the host: re-brands every widget.
    #[wasm_bindgen(js_name = setPlanTier)]
    pub fn set_plan_tier(&self, tier: JsValue) -> Result<(), JsValue> {
        let tier: PlanTier = serde_wasm_bindgen::from_value(tier)
            .map_err(|e| JsValue::from_str(&format!("bad plan tier: {e}")))?;
        self.controller.borrow_mut().set_plan_tier(tier);
        Ok(())
    }

    /// Image snapshot of one widget; `format` is `"png"` or `"svg"`.
    #[wasm_bindgen(js_name = exportWidget)]
    pub fn export_widget(&self, widget_id: &str, format: JsValue) -> Result<String, JsValue> {
        let format: ExportFormat = serde_wasm_bindgen::from_value(format)
            .map_err(|e| JsValue::from_str(&format!("bad export format: {e}")))?;
        let instance_id = self
            .controller
            .borrow()
            .instance_for(widget_id)
            .ok_or_else(|| JsValue::from_str("unknown widget"))?;
        export::export_image(&instance_id, format).map_err(|err| {
            self.sink.on_notice(&shared_types::Notice::error(format!(
                "Export failed: {err}"
            )));
            JsValue::from_str(&err.to_string())
        })
    }

    /// Copyable specification text for one widget.
    #[wasm_bindgen(js_name = specText)]
    pub fn spec_text(&self, widget_id: &str) -> Result<String, JsValue> {
        let instance_id = self
            .controller
            .borrow()
            .instance_for(widget_id)
            .ok_or_else(|| JsValue::from_str("unknown widget"))?;
        export::spec_text(&instance_id).map_err(|err| JsValue::from_str(&err.to_string()))
    }

    /// Structured snapshot of one widget's last-applied data.
    #[wasm_bindgen(js_name = dataSnapshot)]
    pub fn data_snapshot(&self, widget_id: &str) -> Result<String, JsValue> {
        let instance_id = self
            .controller
            .borrow()
            .instance_for(widget_id)
            .ok_or_else(|| JsValue::from_str("unknown widget"))?;
        export::data_snapshot(&instance_id).map_err(|err| JsValue::from_str(&err.to_string()))
    }

    /// Dispose every widget instance and detach from the DOM.
    pub fn dispose(&self) {
        self.controller.borrow_mut().dispose();
    }
}

impl GridCanvas {
    fn wire_listeners(
        controller: &Rc<RefCell<GridController>>,
        sink: &Rc<dyn HostEventSink>,
        document: &web_sys::Document,
    ) -> Result<Vec<ListenerGuard>, JsValue> {
        let mut listeners = Vec::new();
        let doc_target: &web_sys::EventTarget = document.as_ref();

        // Drag/resize tracking spans the whole document so fast pointer
        // movement cannot escape the cell.
        let ctrl = controller.clone();
        let cb_sink = sink.clone();
        listeners.push(ListenerGuard::attach(doc_target, "pointermove", move |event| {
            let Some(mouse) = event.dyn_ref::<web_sys::MouseEvent>() else { return };
            let actions = ctrl
                .borrow_mut()
                .handle_pointer_move(mouse.client_x() as f64, mouse.client_y() as f64);
            dispatch(&cb_sink, actions);
        })?);

        let ctrl = controller.clone();
        let cb_sink = sink.clone();
        listeners.push(ListenerGuard::attach(doc_target, "pointerup", move |_event| {
            let actions = ctrl.borrow_mut().handle_pointer_up();
            dispatch(&cb_sink, actions);
        })?);

        let ctrl = controller.clone();
        let cb_sink = sink.clone();
        listeners.push(ListenerGuard::attach(doc_target, "click", move |event| {
            let target = event
                .target()
                .and_then(|t| t.dyn_into::<web_sys::Element>().ok());
            let actions = ctrl.borrow_mut().handle_document_click(target);
            dispatch(&cb_sink, actions);
        })?);

        let ctrl = controller.clone();
        let cb_sink = sink.clone();
        listeners.push(ListenerGuard::attach(doc_target, "keydown", move |event| {
            let Some(key_event) = event.dyn_ref::<web_sys::KeyboardEvent>() else {
                return;
            };
            let actions = ctrl.borrow_mut().handle_key_down(key_event);
            dispatch(&cb_sink, actions);
        })?);

        // The canvas is the palette drop zone.
        let canvas_target: web_sys::EventTarget = {
            let controller = controller.borrow();
            controller.canvas().clone().into()
        };
        listeners.push(ListenerGuard::attach(&canvas_target, "dragover", move |event| {
            // Required for the element to accept drops at all.
            event.prevent_default();
        })?);

        let ctrl = controller.clone();
        let cb_sink = sink.clone();
        listeners.push(ListenerGuard::attach(&canvas_target, "drop", move |event| {
            event.prevent_default();
            let Some(drag) = event.dyn_ref::<web_sys::DragEvent>() else { return };
            let Some(transfer) = drag.data_transfer() else { return };
            let raw = transfer
                .get_data("application/json")
                .ok()
                .filter(|s| !s.is_empty())
                .or_else(|| transfer.get_data("text/plain").ok())
                .unwrap_or_default();
            let actions = ctrl.borrow_mut().handle_drop(&raw);
            dispatch(&cb_sink, actions);
        })?);

        Ok(listeners)
    }
}

impl Drop for GridCanvas {
    fn drop(&mut self) {
        self.controller.borrow_mut().dispose();
    }
}
