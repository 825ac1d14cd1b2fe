//! Debounced update scheduler
//!
//! One scheduler per widget instance. Every configuration or data change is
//! diffed against the last-applied snapshot; empty diffs are skipped
//! outright, immediate-class changes patch the live specification in place,
//! and structural changes (or any data change) recompile on the next
//! animation-frame boundary. Rapid successive edits inside the ~50ms
//! debounce window coalesce into one applied update. A pending update is
//! invalidated — never applied — if the instance is disposed before it
//! fires.

use serde_json::json;
use uuid::Uuid;

use chart_compiler::{apply_branding, compile};
use config_system::{
    palettes, plan_update, ChangeSet, ConfigSnapshot, PropertyId, UpdatePlan, WidgetConfig,
};
use shared_types::{ChartKind, DataSet, PlanTier};

use crate::instance_manager::InstanceManager;
use crate::lifecycle::SurfaceLifecycle;
use crate::timers::{FrameGuard, TimeoutGuard};

/// Debounce window coalescing successive edits (color-picker drags).
pub const UPDATE_DEBOUNCE_MS: i32 = 50;

pub struct UpdateScheduler {
    instance_id: Uuid,
    /// Kind from the widget attributes; `chartType` in the configuration
    /// overrides it.
    base_kind: ChartKind,
    plan_tier: PlanTier,
    snapshot: ConfigSnapshot,
    /// Latest submitted but not yet processed configuration/data.
    pending: Option<(WidgetConfig, Option<serde_json::Value>)>,
    debounce: Option<TimeoutGuard>,
    frame: Option<FrameGuard>,
}

impl UpdateScheduler {
    pub fn new(base_kind: ChartKind, plan_tier: PlanTier) -> Self {
        Self {
            instance_id: Uuid::nil(),
            base_kind,
            plan_tier,
            snapshot: ConfigSnapshot::default(),
            pending: None,
            debounce: None,
            frame: None,
        }
    }

    pub fn set_instance_id(&mut self, id: Uuid) {
        self.instance_id = id;
    }

    fn effective_kind(config: &WidgetConfig, base: ChartKind) -> ChartKind {
        config
            .get("chartType")
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or(base)
    }

    /// Compile the initial specification and hand it to the lifecycle to
    /// apply the moment the surface exists. Establishes the first snapshot
    /// so a later identical submit is a no-op.
    pub fn prime(
        &mut self,
        lifecycle: &mut SurfaceLifecycle,
        config: WidgetConfig,
        data: Option<serde_json::Value>,
    ) {
        let spec = self.compile_spec(&config, data.as_ref());
        lifecycle.set_pending_spec(spec);
        self.snapshot = ConfigSnapshot::new(config, data);
    }

    /// Record a configuration/data change and (re)start the debounce
    /// window.
    pub fn submit(&mut self, config: WidgetConfig, data: Option<serde_json::Value>) {
        self.pending = Some((config, data));
        let id = self.instance_id;
        match TimeoutGuard::schedule(UPDATE_DEBOUNCE_MS, move || {
            InstanceManager::with_instance_mut(&id, |instance| {
                instance.scheduler.flush(&mut instance.lifecycle);
            });
        }) {
            Ok(guard) => self.debounce = Some(guard),
            Err(err) => log::warn!("update debounce timer failed: {err:?}"),
        }
    }

    /// Re-brand on an entitlement change.
    pub fn set_plan_tier(&mut self, lifecycle: &mut SurfaceLifecycle, tier: PlanTier) {
        if self.plan_tier == tier {
            return;
        }
        self.plan_tier = tier;
        self.schedule_full(lifecycle);
    }

    /// Widget attribute `kind` changed on the host side.
    pub fn set_base_kind(&mut self, lifecycle: &mut SurfaceLifecycle, kind: ChartKind) {
        if self.base_kind == kind {
            return;
        }
        self.base_kind = kind;
        self.schedule_full(lifecycle);
    }

    /// Process the pending change. Public so the debounce timer can
    /// re-enter through the instance manager.
    pub fn flush(&mut self, lifecycle: &mut SurfaceLifecycle) {
        self.debounce = None;
        let Some((config, data)) = self.pending.take() else {
            return;
        };
        let changes = ChangeSet::between(&self.snapshot, &config, data.as_ref());
        let plan = plan_update(&changes);
        if plan == UpdatePlan::Skip {
            log::debug!("identical configuration reapplied, skipping update");
            return;
        }

        // A responsive flip reconfigures size observation as part of the
        // same batch.
        if changes.keys.contains("responsive") {
            lifecycle.set_responsive(config.is_responsive());
        }

        // Snapshot replacement is atomic: both references swap together
        // before the update is carried out.
        self.snapshot = ConfigSnapshot::new(config, data);

        match plan {
            UpdatePlan::Skip => unreachable!("skip handled above"),
            UpdatePlan::Partial { properties, .. } => {
                let patch = build_partial_patch(&properties, &self.snapshot.config);
                if let Some(surface) = lifecycle.surface() {
                    if let Err(err) = surface.apply_partial(&patch) {
                        log::warn!("partial update failed: {err}");
                    }
                } else {
                    // Surface not up yet: fold the change into the pending
                    // full specification instead.
                    self.schedule_full(lifecycle);
                }
            }
            UpdatePlan::Full => self.schedule_full(lifecycle),
        }
    }

    /// Recompile-and-replace on the next animation-frame boundary to avoid
    /// layout thrashing.
    fn schedule_full(&mut self, lifecycle: &mut SurfaceLifecycle) {
        if lifecycle.surface().is_none() {
            // No live surface to thrash: refresh the pending specification
            // directly.
            let spec = self.compile_spec(&self.snapshot.config, self.snapshot.data.as_ref());
            lifecycle.set_pending_spec(spec);
            return;
        }
        let id = self.instance_id;
        match FrameGuard::schedule(move |_timestamp| {
            InstanceManager::with_instance_mut(&id, |instance| {
                instance.scheduler.apply_full_now(&mut instance.lifecycle);
            });
        }) {
            Ok(guard) => self.frame = Some(guard),
            Err(err) => log::warn!("animation frame scheduling failed: {err:?}"),
        }
    }

    /// Public so the animation-frame callback can re-enter through the
    /// instance manager.
    pub fn apply_full_now(&mut self, lifecycle: &mut SurfaceLifecycle) {
        self.frame = None;
        let spec = self.compile_spec(&self.snapshot.config, self.snapshot.data.as_ref());
        match lifecycle.surface() {
            Some(surface) => {
                if let Err(err) = surface.apply_full(&spec) {
                    log::warn!("full update failed: {err}");
                }
            }
            None => lifecycle.set_pending_spec(spec),
        }
    }

    fn compile_spec(
        &self,
        config: &WidgetConfig,
        data: Option<&serde_json::Value>,
    ) -> shared_types::ChartSpec {
        let kind = Self::effective_kind(config, self.base_kind);
        let dataset = data.and_then(|value| DataSet::from_value(kind, value));
        let spec = compile(kind, config, dataset.as_ref());
        apply_branding(&spec, self.plan_tier)
    }

    /// Last-applied data snapshot, for export.
    pub fn snapshot_data(&self) -> serde_json::Value {
        self.snapshot.data.clone().unwrap_or(serde_json::Value::Null)
    }

    /// Cancel pending work. A debounced update that has not fired yet is
    /// dropped, not applied.
    pub fn invalidate(&mut self) {
        self.debounce = None;
        self.frame = None;
        self.pending = None;
    }
}

/// Minimal patch for immediate-class properties, merged onto the live
/// specification without discarding existing series state.
pub fn build_partial_patch(properties: &[PropertyId], config: &WidgetConfig) -> serde_json::Value {
    let mut patch = serde_json::Map::new();
    for property in properties {
        match property {
            PropertyId::Title | PropertyId::Subtitle => {
                patch.insert(
                    "title".to_string(),
                    json!({
                        "text": config.str_or("title", ""),
                        "subtext": config.str_or("subtitle", ""),
                    }),
                );
            }
            PropertyId::ColorPalette | PropertyId::Theme => {
                let palette = palettes::resolve(config.palette_name());
                patch.insert("color".to_string(), json!(palette.colors));
            }
            PropertyId::ShowLegend | PropertyId::LegendPosition => {
                patch.insert(
                    "legend".to_string(),
                    json!({
                        "show": config.bool_or("showLegend", true),
                        "position": config.str_or("legendPosition", "top"),
                    }),
                );
            }
            PropertyId::ShowTooltip | PropertyId::TooltipTrigger => {
                patch.insert(
                    "tooltip".to_string(),
                    json!({
                        "show": config.bool_or("showTooltip", true),
                        "trigger": config.str_or("tooltipTrigger", "item"),
                    }),
                );
            }
            PropertyId::Animation | PropertyId::AnimationDuration => {
                patch.insert("animation".to_string(), json!(config.bool_or("animation", true)));
                if let Some(duration) = config.u32_opt("animationDuration") {
                    patch.insert("animationDuration".to_string(), json!(duration));
                }
            }
            PropertyId::BackgroundColor => {
                patch.insert(
                    "backgroundColor".to_string(),
                    config.get("backgroundColor").cloned().unwrap_or(serde_json::Value::Null),
                );
            }
            // Structural identifiers never reach the partial path.
            _ => log::warn!("structural property {property:?} in partial patch, ignored"),
        }
    }
    serde_json::Value::Object(patch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config(value: serde_json::Value) -> WidgetConfig {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_effective_kind_prefers_config() {
        let cfg = config(json!({"chartType": "pie"}));
        assert_eq!(
            UpdateScheduler::effective_kind(&cfg, ChartKind::Bar),
            ChartKind::Pie
        );
        assert_eq!(
            UpdateScheduler::effective_kind(&WidgetConfig::default(), ChartKind::Bar),
            ChartKind::Bar
        );
    }

    #[test]
    fn test_palette_patch_replaces_colors_only() {
        let cfg = config(json!({"colorPalette": "vibrant"}));
        let patch = build_partial_patch(&[PropertyId::ColorPalette], &cfg);
        let object = patch.as_object().unwrap();
        assert_eq!(object.len(), 1);
        let colors = object["color"].as_array().unwrap();
        assert_eq!(colors.len(), 8);
        assert_eq!(colors[0], json!(palettes::resolve("vibrant").colors[0]));
    }

    #[test]
    fn test_legend_patch() {
        let cfg = config(json!({"showLegend": false, "legendPosition": "bottom"}));
        let patch = build_partial_patch(&[PropertyId::LegendPosition], &cfg);
        assert_eq!(patch["legend"], json!({"show": false, "position": "bottom"}));
    }

    #[test]
    fn test_title_patch_carries_both_lines() {
        let cfg = config(json!({"title": "Sales", "subtitle": "Q3"}));
        let patch = build_partial_patch(&[PropertyId::Title], &cfg);
        assert_eq!(patch["title"], json!({"text": "Sales", "subtext": "Q3"}));
    }

    #[test]
    fn test_structural_property_is_ignored_in_patch() {
        let cfg = config(json!({"chartType": "pie"}));
        let patch = build_partial_patch(&[PropertyId::ChartType], &cfg);
        assert!(patch.as_object().unwrap().is_empty());
    }
}
