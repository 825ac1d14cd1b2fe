//! Rendering-surface handle
//!
//! Binds one widget instance to one live chart object in the page's
//! rendering runtime. The handle is exclusively owned by its instance and
//! must be disposed before the instance unmounts or a replacement handle is
//! created; every call after disposal is a guarded no-op rather than a JS
//! exception.

use serde::Serialize;
use std::cell::Cell;
use wasm_bindgen::prelude::*;

use shared_types::{ChartSpec, GridChartsError};

#[wasm_bindgen]
extern "C" {
    pub type EChartsInstance;

    #[wasm_bindgen(catch, js_namespace = echarts, js_name = init)]
    fn echarts_init(
        element: &web_sys::Element,
        theme: Option<&str>,
        opts: &JsValue,
    ) -> Result<EChartsInstance, JsValue>;

    #[wasm_bindgen(method, catch, js_name = setOption)]
    fn set_option(this: &EChartsInstance, option: &JsValue, not_merge: bool)
        -> Result<(), JsValue>;

    #[wasm_bindgen(method, js_name = getOption)]
    fn get_option(this: &EChartsInstance) -> JsValue;

    #[wasm_bindgen(method, catch)]
    fn resize(this: &EChartsInstance) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch)]
    fn dispose(this: &EChartsInstance) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = getDataURL)]
    fn get_data_url(this: &EChartsInstance, opts: &JsValue) -> Result<String, JsValue>;

    #[wasm_bindgen(method, catch, js_name = renderToSVGString)]
    fn render_to_svg_string(this: &EChartsInstance) -> Result<String, JsValue>;
}

fn js_error(err: JsValue) -> GridChartsError {
    GridChartsError::JsInterop { message: format!("{err:?}") }
}

pub struct SurfaceHandle {
    instance: EChartsInstance,
    disposed: Cell<bool>,
}

impl SurfaceHandle {
    /// Create a surface bound to the cell element. The element must be in
    /// the document; a degenerate (zero) size is allowed — the lifecycle
    /// manager is responsible for not getting here too early.
    pub fn create(element: &web_sys::Element, theme: Option<&str>) -> Result<Self, GridChartsError> {
        let instance = echarts_init(element, theme, &JsValue::UNDEFINED).map_err(|e| {
            GridChartsError::SurfaceInit { message: format!("{e:?}") }
        })?;
        Ok(Self { instance, disposed: Cell::new(false) })
    }

    fn guard(&self) -> Result<(), GridChartsError> {
        if self.disposed.get() {
            Err(GridChartsError::SurfaceDisposed)
        } else {
            Ok(())
        }
    }

    /// Full update: discard the previous specification and replace it.
    pub fn apply_full(&self, spec: &ChartSpec) -> Result<(), GridChartsError> {
        self.guard()?;
        let option = spec
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|e| GridChartsError::Internal { message: e.to_string() })?;
        self.instance.set_option(&option, true).map_err(js_error)
    }

    /// Partial update: merge a minimal patch onto the live specification
    /// without discarding existing series state.
    pub fn apply_partial(&self, patch: &serde_json::Value) -> Result<(), GridChartsError> {
        self.guard()?;
        let patch = patch
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|e| GridChartsError::Internal { message: e.to_string() })?;
        self.instance.set_option(&patch, false).map_err(js_error)
    }

    /// The renderer's live option object, for export and inspection.
    pub fn live_option(&self) -> Result<serde_json::Value, GridChartsError> {
        self.guard()?;
        serde_wasm_bindgen::from_value(self.instance.get_option())
            .map_err(|e| GridChartsError::JsInterop { message: e.to_string() })
    }

    pub fn resize(&self) {
        if self.disposed.get() {
            return;
        }
        if let Err(err) = self.instance.resize() {
            log::warn!("surface resize failed: {err:?}");
        }
    }

    /// Raster snapshot as a PNG data URL.
    pub fn export_png(&self) -> Result<String, GridChartsError> {
        self.guard()?;
        let opts = serde_json::json!({"type": "png", "pixelRatio": 2})
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|e| GridChartsError::Internal { message: e.to_string() })?;
        self.instance
            .get_data_url(&opts)
            .map_err(|e| GridChartsError::Export { message: format!("{e:?}") })
    }

    /// Vector snapshot as SVG text.
    pub fn export_svg(&self) -> Result<String, GridChartsError> {
        self.guard()?;
        self.instance
            .render_to_svg_string()
            .map_err(|e| GridChartsError::Export { message: format!("{e:?}") })
    }

    /// Idempotent, never throws: the teardown path must always run to
    /// completion.
    pub fn dispose(&self) {
        if self.disposed.replace(true) {
            return;
        }
        if let Err(err) = self.instance.dispose() {
            log::warn!("surface dispose failed: {err:?}");
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.get()
    }
}

impl Drop for SurfaceHandle {
    fn drop(&mut self) {
        self.dispose();
    }
}
