//! JavaScript event-sink adapter
//!
//! Adapts a plain JS object of callbacks into the [`HostEventSink`] trait.
//! Missing callbacks are no-ops; a callback that throws is logged and
//! swallowed so a host bug cannot take the canvas down.

use serde::Serialize;
use wasm_bindgen::{JsCast, JsValue};

use shared_types::events::{DropPayload, HostEventSink, Notice};
use shared_types::{LayoutEntry, Widget};

pub struct JsEventSink {
    callbacks: js_sys::Object,
}

impl JsEventSink {
    pub fn new(callbacks: js_sys::Object) -> Self {
        Self { callbacks }
    }

    fn invoke(&self, name: &str, args: &[JsValue]) {
        let Ok(callback) = js_sys::Reflect::get(&self.callbacks, &JsValue::from_str(name)) else {
            return;
        };
        let Some(function) = callback.dyn_ref::<js_sys::Function>() else {
            return;
        };
        let result = match args {
            [] => function.call0(&JsValue::NULL),
            [a] => function.call1(&JsValue::NULL, a),
            [a, b] => function.call2(&JsValue::NULL, a, b),
            _ => {
                let array = js_sys::Array::new();
                for arg in args {
                    array.push(arg);
                }
                function.apply(&JsValue::NULL, &array)
            }
        };
        if let Err(err) = result {
            log::warn!("host callback {name} threw: {err:?}");
        }
    }

    fn to_js<T: Serialize + ?Sized>(value: &T) -> JsValue {
        value
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .unwrap_or(JsValue::NULL)
    }
}

impl HostEventSink for JsEventSink {
    fn on_layout_change(&self, layout: &[LayoutEntry]) {
        self.invoke("onLayoutChange", &[Self::to_js(layout)]);
    }

    fn on_widget_select(&self, widget: Option<&Widget>) {
        self.invoke("onWidgetSelect", &[Self::to_js(&widget)]);
    }

    fn on_widget_update(&self, id: &str, partial: &serde_json::Value) {
        self.invoke(
            "onWidgetUpdate",
            &[JsValue::from_str(id), Self::to_js(partial)],
        );
    }

    fn on_widget_delete(&self, id: &str) {
        self.invoke("onWidgetDelete", &[JsValue::from_str(id)]);
    }

    fn on_widget_duplicate(&self, widget: &Widget) {
        self.invoke("onWidgetDuplicate", &[Self::to_js(widget)]);
    }

    fn on_widget_config_update(
        &self,
        id: &str,
        config: &serde_json::Map<String, serde_json::Value>,
    ) {
        self.invoke(
            "onWidgetConfigUpdate",
            &[JsValue::from_str(id), Self::to_js(config)],
        );
    }

    fn on_add_widget(&self, payload: &DropPayload) {
        self.invoke("onAddWidget", &[Self::to_js(payload)]);
    }

    fn on_notice(&self, notice: &Notice) {
        self.invoke("onNotice", &[Self::to_js(notice)]);
    }

    fn on_save(&self) {
        self.invoke("onSave", &[]);
    }

    fn on_undo(&self) {
        self.invoke("onUndo", &[]);
    }

    fn on_redo(&self) {
        self.invoke("onRedo", &[]);
    }
}
