//! Rendering-surface lifecycle manager
//!
//! One manager per widget instance. Owns creation, readiness polling,
//! disposal, and size-change observation of the instance's surface handle:
//!
//! `Uninitialized → AwaitingReadySize → Initialized → Disposed`
//!
//! A surface is only created once the cell reports a usable size, but the
//! readiness poll is bounded — after the retry budget the surface is created
//! with whatever size is available so initialization can never block
//! forever. Readiness and resize gating are pure policy types so the rules
//! are testable without a DOM.

use uuid::Uuid;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

use shared_types::ChartSpec;

use crate::instance_manager::InstanceManager;
use crate::surface::SurfaceHandle;
use crate::timers::{ListenerGuard, TimeoutGuard};

/// Minimum usable viewport before a surface is created.
pub const MIN_READY_WIDTH: f64 = 200.0;
pub const MIN_READY_HEIGHT: f64 = 150.0;
/// Fixed readiness poll delay.
pub const READY_POLL_INTERVAL_MS: i32 = 200;
/// Bounded retry budget (~2s total).
pub const READY_MAX_ATTEMPTS: u32 = 10;
/// Debounce for observed size changes.
pub const RESIZE_DEBOUNCE_MS: i32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Uninitialized,
    AwaitingReadySize,
    Initialized,
    Disposed,
}

/// Decision for one readiness poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// Size is usable: create the surface now.
    Ready,
    /// Below threshold, budget remains: poll again.
    Retry,
    /// Budget exhausted: create the surface anyway with whatever size is
    /// available.
    GiveUp,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReadinessPolicy {
    pub min_width: f64,
    pub min_height: f64,
    pub max_attempts: u32,
}

impl Default for ReadinessPolicy {
    fn default() -> Self {
        Self {
            min_width: MIN_READY_WIDTH,
            min_height: MIN_READY_HEIGHT,
            max_attempts: READY_MAX_ATTEMPTS,
        }
    }
}

impl ReadinessPolicy {
    pub fn decide(&self, width: f64, height: f64, attempt: u32) -> Readiness {
        if width >= self.min_width && height >= self.min_height {
            Readiness::Ready
        } else if attempt >= self.max_attempts {
            Readiness::GiveUp
        } else {
            Readiness::Retry
        }
    }
}

/// Suppresses redundant resizes during continuous drag
///
/// A resize is issued only when the change magnitude reaches one pixel in
/// either dimension, or when the surface recovers from a zero size (a
/// hidden tab becoming visible).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ResizeGate {
    last: Option<(f64, f64)>,
}

impl ResizeGate {
    pub fn record(&mut self, width: f64, height: f64) {
        self.last = Some((width, height));
    }

    /// Whether a resize should fire for the observed size; records the size
    /// when it does.
    pub fn should_resize(&mut self, width: f64, height: f64) -> bool {
        let fire = match self.last {
            None => true,
            Some((last_w, last_h)) => {
                let was_zero = last_w == 0.0 || last_h == 0.0;
                let now_sized = width > 0.0 && height > 0.0;
                (width - last_w).abs() >= 1.0
                    || (height - last_h).abs() >= 1.0
                    || (was_zero && now_sized)
            }
        };
        if fire {
            self.last = Some((width, height));
        }
        fire
    }
}

/// Per-instance lifecycle driver
pub struct SurfaceLifecycle {
    instance_id: Uuid,
    element: web_sys::Element,
    theme: Option<String>,
    state: LifecycleState,
    policy: ReadinessPolicy,
    attempt: u32,
    responsive: bool,
    gate: ResizeGate,
    surface: Option<SurfaceHandle>,
    /// Specification to apply as soon as the surface exists.
    pending_spec: Option<ChartSpec>,
    retry_timer: Option<TimeoutGuard>,
    resize_debounce: Option<TimeoutGuard>,
    observer: Option<web_sys::ResizeObserver>,
    observer_closure: Option<Closure<dyn FnMut(js_sys::Array)>>,
    window_resize: Option<ListenerGuard>,
    visibility: Option<ListenerGuard>,
}

impl SurfaceLifecycle {
    /// `responsive` comes from the widget configuration: an explicit
    /// `responsive: false` is a hard disable — no observer, no window
    /// fallback.
    pub fn new(element: web_sys::Element, responsive: bool, theme: Option<String>) -> Self {
        Self {
            // Patched to the real id right after registration.
            instance_id: Uuid::nil(),
            element,
            theme,
            state: LifecycleState::Uninitialized,
            policy: ReadinessPolicy::default(),
            attempt: 0,
            responsive,
            gate: ResizeGate::default(),
            surface: None,
            pending_spec: None,
            retry_timer: None,
            resize_debounce: None,
            observer: None,
            observer_closure: None,
            window_resize: None,
            visibility: None,
        }
    }

    pub fn set_instance_id(&mut self, id: Uuid) {
        self.instance_id = id;
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn surface(&self) -> Option<&SurfaceHandle> {
        self.surface.as_ref()
    }

    pub fn set_pending_spec(&mut self, spec: ChartSpec) {
        self.pending_spec = Some(spec);
    }

    fn measure(&self) -> (f64, f64) {
        let rect = self.element.get_bounding_client_rect();
        (rect.width(), rect.height())
    }

    /// Begin readiness polling. Safe to call once per instance; later calls
    /// are no-ops.
    pub fn mount(&mut self) {
        if self.state != LifecycleState::Uninitialized {
            return;
        }
        self.state = LifecycleState::AwaitingReadySize;
        self.attempt = 0;
        self.poll_ready();
    }

    /// One readiness poll: initialize, retry, or give up and initialize
    /// anyway.
    pub fn poll_ready(&mut self) {
        if self.state != LifecycleState::AwaitingReadySize {
            return;
        }
        let (width, height) = self.measure();
        match self.policy.decide(width, height, self.attempt) {
            Readiness::Ready => self.initialize(),
            Readiness::GiveUp => {
                log::warn!(
                    "cell never reached {}x{} after {} attempts, initializing at {width}x{height}",
                    self.policy.min_width,
                    self.policy.min_height,
                    self.attempt
                );
                self.initialize();
            }
            Readiness::Retry => {
                self.attempt += 1;
                let id = self.instance_id;
                match TimeoutGuard::schedule(READY_POLL_INTERVAL_MS, move || {
                    InstanceManager::with_instance_mut(&id, |instance| {
                        instance.lifecycle.poll_ready();
                    });
                }) {
                    Ok(guard) => self.retry_timer = Some(guard),
                    Err(err) => {
                        // No timer available (headless teardown race):
                        // degrade to immediate init rather than stalling.
                        log::warn!("readiness timer failed ({err:?}), initializing now");
                        self.initialize();
                    }
                }
            }
        }
    }

    /// Create the surface handle. Idempotent: re-invocation while a handle
    /// already exists is a no-op.
    fn initialize(&mut self) {
        if self.surface.is_some() || self.state == LifecycleState::Disposed {
            return;
        }
        self.retry_timer = None;
        let (width, height) = self.measure();
        match SurfaceHandle::create(&self.element, self.theme.as_deref()) {
            Ok(surface) => {
                if let Some(spec) = self.pending_spec.take() {
                    if let Err(err) = surface.apply_full(&spec) {
                        log::warn!("initial specification apply failed: {err}");
                    }
                }
                self.surface = Some(surface);
                self.gate.record(width, height);
                self.state = LifecycleState::Initialized;
                if self.responsive {
                    self.attach_observers();
                }
            }
            Err(err) => {
                log::error!("surface initialization failed: {err}");
                self.state = LifecycleState::Initialized;
            }
        }
    }

    /// Flip responsive behavior after initialization (configuration edit).
    pub fn set_responsive(&mut self, responsive: bool) {
        if self.responsive == responsive {
            return;
        }
        self.responsive = responsive;
        if self.state != LifecycleState::Initialized {
            return;
        }
        if responsive {
            self.attach_observers();
        } else {
            self.detach_observers();
        }
    }

    /// Debounced entry point shared by the cell observer and the
    /// window/visibility fallback.
    pub fn on_size_event(&mut self) {
        if self.state != LifecycleState::Initialized || !self.responsive {
            return;
        }
        let id = self.instance_id;
        match TimeoutGuard::schedule(RESIZE_DEBOUNCE_MS, move || {
            InstanceManager::with_instance_mut(&id, |instance| {
                instance.lifecycle.flush_resize();
            });
        }) {
            Ok(guard) => self.resize_debounce = Some(guard),
            Err(err) => log::warn!("resize debounce timer failed: {err:?}"),
        }
    }

    fn flush_resize(&mut self) {
        self.resize_debounce = None;
        let (width, height) = self.measure();
        if !self.gate.should_resize(width, height) {
            return;
        }
        if let Some(surface) = &self.surface {
            log::debug!("resizing surface to {width}x{height}");
            surface.resize();
        }
    }

    fn attach_observers(&mut self) {
        if self.observer.is_some() {
            return;
        }
        let id = self.instance_id;
        let closure = Closure::wrap(Box::new(move |_entries: js_sys::Array| {
            InstanceManager::with_instance_mut(&id, |instance| {
                instance.lifecycle.on_size_event();
            });
        }) as Box<dyn FnMut(js_sys::Array)>);
        match web_sys::ResizeObserver::new(closure.as_ref().unchecked_ref()) {
            Ok(observer) => {
                observer.observe(&self.element);
                self.observer = Some(observer);
                self.observer_closure = Some(closure);
            }
            Err(err) => log::warn!("ResizeObserver unavailable: {err:?}"),
        }

        // Window fallback: tab re-activation can leave the per-cell
        // observer without a transition to report.
        if let Some(window) = web_sys::window() {
            let target: &web_sys::EventTarget = window.as_ref();
            let id = self.instance_id;
            self.window_resize = ListenerGuard::attach(target, "resize", move |_event| {
                InstanceManager::with_instance_mut(&id, |instance| {
                    instance.lifecycle.on_size_event();
                });
            })
            .map_err(|err| log::warn!("window resize listener failed: {err:?}"))
            .ok();

            if let Some(document) = window.document() {
                let target: &web_sys::EventTarget = document.as_ref();
                let id = self.instance_id;
                self.visibility =
                    ListenerGuard::attach(target, "visibilitychange", move |_event| {
                        InstanceManager::with_instance_mut(&id, |instance| {
                            instance.lifecycle.on_size_event();
                        });
                    })
                    .map_err(|err| log::warn!("visibility listener failed: {err:?}"))
                    .ok();
            }
        }
    }

    fn detach_observers(&mut self) {
        if let Some(observer) = self.observer.take() {
            observer.disconnect();
        }
        self.observer_closure = None;
        self.window_resize = None;
        self.visibility = None;
        self.resize_debounce = None;
    }

    /// Dispose the handle, disconnect observers, cancel timers — in that
    /// order, each step guarded so a failure in one never prevents the
    /// next. Never throws.
    pub fn teardown(&mut self) {
        if let Some(surface) = self.surface.take() {
            surface.dispose();
        }
        self.detach_observers();
        self.retry_timer = None;
        self.pending_spec = None;
        self.state = LifecycleState::Disposed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_readiness_above_threshold_is_ready() {
        let policy = ReadinessPolicy::default();
        assert_eq!(policy.decide(200.0, 150.0, 0), Readiness::Ready);
        assert_eq!(policy.decide(800.0, 600.0, 9), Readiness::Ready);
    }

    #[test]
    fn test_readiness_below_threshold_retries_within_budget() {
        let policy = ReadinessPolicy::default();
        assert_eq!(policy.decide(0.0, 0.0, 0), Readiness::Retry);
        assert_eq!(policy.decide(199.0, 600.0, 5), Readiness::Retry);
        assert_eq!(policy.decide(800.0, 149.0, 9), Readiness::Retry);
    }

    #[test]
    fn test_readiness_bounded_retry_gives_up() {
        // A cell that never reaches minimum size still completes after the
        // retry budget elapses — it must not retry forever.
        let policy = ReadinessPolicy::default();
        assert_eq!(policy.decide(0.0, 0.0, READY_MAX_ATTEMPTS), Readiness::GiveUp);
        assert_eq!(policy.decide(10.0, 10.0, READY_MAX_ATTEMPTS + 5), Readiness::GiveUp);
    }

    #[test]
    fn test_readiness_becomes_ready_mid_window() {
        // Scenario: 0x0 cell becomes visible with a valid size within the
        // retry window — ready at the first reading above threshold.
        let policy = ReadinessPolicy::default();
        let mut readings = vec![(0.0, 0.0), (0.0, 0.0), (640.0, 480.0)];
        let mut attempt = 0;
        loop {
            let (w, h) = readings.remove(0);
            match policy.decide(w, h, attempt) {
                Readiness::Ready => break,
                Readiness::Retry => attempt += 1,
                Readiness::GiveUp => panic!("gave up before the valid reading"),
            }
        }
        assert_eq!(attempt, 2);
    }

    #[test]
    fn test_resize_gate_requires_one_pixel_delta() {
        let mut gate = ResizeGate::default();
        gate.record(400.0, 300.0);
        assert!(!gate.should_resize(400.5, 300.2));
        assert!(gate.should_resize(401.0, 300.0));
    }

    #[test]
    fn test_resize_gate_zero_size_recovery() {
        let mut gate = ResizeGate::default();
        gate.record(0.0, 0.0);
        // Sub-pixel reading after a hidden tab becomes visible still fires.
        assert!(gate.should_resize(0.5, 0.5));
    }

    #[test]
    fn test_resize_gate_first_reading_fires() {
        let mut gate = ResizeGate::default();
        assert!(gate.should_resize(400.0, 300.0));
        assert!(!gate.should_resize(400.0, 300.0));
    }
}
