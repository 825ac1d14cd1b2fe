//! Update planning
//!
//! Maps a computed [`ChangeSet`] to the action the scheduler takes: skip
//! (idempotence), a partial merge of immediate-class properties, or a full
//! recompile-and-replace. When one batch carries both immediate and
//! structural changes the full recompile subsumes the partial patches —
//! exactly one full update runs, compiled from the complete latest
//! configuration, and no partial patch precedes it.

use crate::diff::ChangeSet;
use crate::property::{PropertyId, SpecRegion};

/// Action derived from one processed change batch
#[derive(Debug, Clone, PartialEq)]
pub enum UpdatePlan {
    /// Nothing changed; reapplying identical configuration is a no-op.
    Skip,
    /// Patch the live specification in place, without discarding series
    /// state or recreating the rendering handle.
    Partial {
        properties: Vec<PropertyId>,
        regions: Vec<SpecRegion>,
    },
    /// Discard and recompile on the next animation-frame boundary.
    Full,
}

pub fn plan_update(changes: &ChangeSet) -> UpdatePlan {
    if changes.is_empty() {
        return UpdatePlan::Skip;
    }
    if changes.has_structural() {
        log::debug!(
            "structural change detected (keys: {:?}, data: {}), full recompile",
            changes.keys,
            changes.data_changed
        );
        return UpdatePlan::Full;
    }
    let properties = changes.immediate_properties();
    if properties.is_empty() {
        // Every changed key mapped to a non-immediate identifier without
        // being structural — cannot happen with the current registry, but
        // degrade to a full recompile rather than dropping the update.
        return UpdatePlan::Full;
    }
    UpdatePlan::Partial {
        regions: changes.regions(),
        properties,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::ConfigSnapshot;
    use crate::WidgetConfig;
    use serde_json::json;

    fn changes(next: serde_json::Value, data: Option<serde_json::Value>) -> ChangeSet {
        let snapshot = ConfigSnapshot::default();
        let next: WidgetConfig = serde_json::from_value(next).unwrap();
        ChangeSet::between(&snapshot, &next, data.as_ref())
    }

    #[test]
    fn test_empty_diff_skips() {
        assert_eq!(plan_update(&ChangeSet::default()), UpdatePlan::Skip);
    }

    #[test]
    fn test_palette_change_is_partial() {
        let plan = plan_update(&changes(json!({"colorPalette": "vibrant"}), None));
        match plan {
            UpdatePlan::Partial { properties, regions } => {
                assert_eq!(properties, vec![PropertyId::ColorPalette]);
                assert!(regions.contains(&SpecRegion::Series));
            }
            other => panic!("expected partial plan, got {other:?}"),
        }
    }

    #[test]
    fn test_chart_type_change_is_full() {
        let plan = plan_update(&changes(json!({"chartType": "pie"}), None));
        assert_eq!(plan, UpdatePlan::Full);
    }

    #[test]
    fn test_data_change_is_full() {
        let plan = plan_update(&changes(json!({}), Some(json!([1, 2, 3]))));
        assert_eq!(plan, UpdatePlan::Full);
    }

    #[test]
    fn test_mixed_batch_collapses_to_single_full() {
        // Immediate (palette) + structural (chartType) in one window: the
        // recompile already reflects the palette, so no partial precedes it.
        let plan = plan_update(&changes(
            json!({"colorPalette": "vibrant", "chartType": "pie"}),
            None,
        ));
        assert_eq!(plan, UpdatePlan::Full);
    }
}
