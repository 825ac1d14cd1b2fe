//! Safe instance management for widget instances
//! Replaces unsafe global state with a thread-local storage pattern

use std::cell::RefCell;
use std::collections::HashMap;
use uuid::Uuid;

use crate::lifecycle::SurfaceLifecycle;
use crate::scheduler::UpdateScheduler;

/// One live widget on the canvas: its surface lifecycle and its update
/// scheduler. The instance is the exclusive owner of its surface handle.
pub struct WidgetInstance {
    pub widget_id: String,
    pub lifecycle: SurfaceLifecycle,
    pub scheduler: UpdateScheduler,
}

impl WidgetInstance {
    /// Unconditional cleanup: surface first, observers next, timers last —
    /// each step guarded so one failure never blocks the rest.
    pub fn teardown(&mut self) {
        self.lifecycle.teardown();
        self.scheduler.invalidate();
    }
}

// Thread-local storage for widget instances
thread_local! {
    static INSTANCES: RefCell<HashMap<Uuid, WidgetInstance>> = RefCell::new(HashMap::new());
}

/// Manages widget instances safely without global mutable state
pub struct InstanceManager;

impl InstanceManager {
    /// Register an instance and return its id.
    pub fn create_instance(instance: WidgetInstance) -> Uuid {
        let id = Uuid::new_v4();
        INSTANCES.with(|instances| {
            instances.borrow_mut().insert(id, instance);
        });
        id
    }

    pub fn with_instance<F, R>(id: &Uuid, f: F) -> Option<R>
    where
        F: FnOnce(&WidgetInstance) -> R,
    {
        INSTANCES.with(|instances| instances.borrow().get(id).map(f))
    }

    pub fn with_instance_mut<F, R>(id: &Uuid, f: F) -> Option<R>
    where
        F: FnOnce(&mut WidgetInstance) -> R,
    {
        INSTANCES.with(|instances| instances.borrow_mut().get_mut(id).map(f))
    }

    pub fn instance_exists(id: &Uuid) -> bool {
        INSTANCES.with(|instances| instances.borrow().contains_key(id))
    }

    /// Remove an instance, tearing it down outside the registry borrow so
    /// teardown-driven callbacks cannot re-enter a locked map.
    pub fn remove_instance(id: &Uuid) {
        let instance = INSTANCES.with(|instances| instances.borrow_mut().remove(id));
        if let Some(mut instance) = instance {
            log::debug!("tearing down instance for widget {}", instance.widget_id);
            instance.teardown();
        }
    }

    pub fn instance_count() -> usize {
        INSTANCES.with(|instances| instances.borrow().len())
    }

    /// Tear down and drop every instance (canvas disposal).
    pub fn clear_all() {
        let all: Vec<WidgetInstance> = INSTANCES.with(|instances| {
            instances.borrow_mut().drain().map(|(_, v)| v).collect()
        });
        for mut instance in all {
            instance.teardown();
        }
    }
}
