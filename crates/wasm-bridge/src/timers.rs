//! Cancel-on-drop wrappers for browser timers, animation frames, and event
//! listeners
//!
//! Every suspension point in this crate goes through one of these guards so
//! that disposal cancels everything that is still pending — a dropped guard
//! can never fire or leak its closure.

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::EventTarget;

fn window() -> Result<web_sys::Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no window"))
}

/// One-shot `setTimeout` guard
pub struct TimeoutGuard {
    id: Option<i32>,
    _closure: Closure<dyn FnMut()>,
}

impl TimeoutGuard {
    pub fn schedule<F>(delay_ms: i32, callback: F) -> Result<Self, JsValue>
    where
        F: FnMut() + 'static,
    {
        let closure = Closure::wrap(Box::new(callback) as Box<dyn FnMut()>);
        let id = window()?.set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            delay_ms,
        )?;
        Ok(Self { id: Some(id), _closure: closure })
    }

    pub fn cancel(&mut self) {
        if let Some(id) = self.id.take() {
            if let Ok(window) = window() {
                window.clear_timeout_with_handle(id);
            }
        }
    }
}

impl Drop for TimeoutGuard {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// `requestAnimationFrame` guard
pub struct FrameGuard {
    id: Option<i32>,
    _closure: Closure<dyn FnMut(f64)>,
}

impl FrameGuard {
    pub fn schedule<F>(callback: F) -> Result<Self, JsValue>
    where
        F: FnMut(f64) + 'static,
    {
        let closure = Closure::wrap(Box::new(callback) as Box<dyn FnMut(f64)>);
        let id = window()?.request_animation_frame(closure.as_ref().unchecked_ref())?;
        Ok(Self { id: Some(id), _closure: closure })
    }

    pub fn cancel(&mut self) {
        if let Some(id) = self.id.take() {
            if let Ok(window) = window() {
                let _ = window.cancel_animation_frame(id);
            }
        }
    }
}

impl Drop for FrameGuard {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Event-listener guard: detaches on drop
pub struct ListenerGuard {
    target: EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(web_sys::Event)>,
}

impl ListenerGuard {
    pub fn attach<F>(target: &EventTarget, event: &'static str, callback: F) -> Result<Self, JsValue>
    where
        F: FnMut(web_sys::Event) + 'static,
    {
        let closure = Closure::wrap(Box::new(callback) as Box<dyn FnMut(web_sys::Event)>);
        target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
        Ok(Self { target: target.clone(), event, closure })
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref());
    }
}
