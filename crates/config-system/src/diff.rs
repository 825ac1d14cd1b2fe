//! Snapshot diffing
//!
//! Computes the set of changed top-level configuration keys between the
//! last-applied snapshot and an incoming one. Equality is deep value
//! equality over the serialized form, never reference identity; keys present
//! before but absent after count as changes (removals).

use std::collections::BTreeSet;

use serde_json::{Map, Value};

use crate::property::{PropertyClass, PropertyId, SpecRegion};
use crate::WidgetConfig;

/// Top-level keys whose value differs between `previous` and `next`,
/// including keys removed in `next`.
pub fn diff_top_level(previous: &Map<String, Value>, next: &Map<String, Value>) -> BTreeSet<String> {
    let mut changed = BTreeSet::new();
    for (key, value) in next {
        match previous.get(key) {
            Some(prev) if prev == value => {}
            _ => {
                changed.insert(key.clone());
            }
        }
    }
    for key in previous.keys() {
        if !next.contains_key(key) {
            changed.insert(key.clone());
        }
    }
    changed
}

/// Previous configuration/data retained for diffing
///
/// Replaced atomically after each processed update; never partially mutated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigSnapshot {
    pub config: WidgetConfig,
    pub data: Option<Value>,
}

impl ConfigSnapshot {
    pub fn new(config: WidgetConfig, data: Option<Value>) -> Self {
        Self { config, data }
    }
}

/// Result of diffing one incoming update against the last snapshot
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeSet {
    /// Raw changed top-level keys, including unmapped names.
    pub keys: BTreeSet<String>,
    pub data_changed: bool,
}

impl ChangeSet {
    /// Diff `next` against the last-applied `snapshot`.
    pub fn between(snapshot: &ConfigSnapshot, next: &WidgetConfig, next_data: Option<&Value>) -> Self {
        let keys = diff_top_level(snapshot.config.values(), next.values());
        let data_changed = match (&snapshot.data, next_data) {
            (None, None) => false,
            (Some(prev), Some(next)) => prev != next,
            _ => true,
        };
        Self { keys, data_changed }
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty() && !self.data_changed
    }

    /// Changed keys resolved through the closed identifier set; unmapped
    /// names yield `None` alongside their raw key.
    pub fn properties(&self) -> Vec<(String, Option<PropertyId>)> {
        self.keys
            .iter()
            .map(|k| (k.clone(), PropertyId::from_name(k)))
            .collect()
    }

    /// Whether any change forces a full recompile: a structural property, an
    /// unmapped key, or a data change.
    pub fn has_structural(&self) -> bool {
        if self.data_changed {
            return true;
        }
        self.keys.iter().any(|k| match PropertyId::from_name(k) {
            Some(id) => id.class() == PropertyClass::Structural,
            None => true,
        })
    }

    /// Immediate-class properties among the changed keys.
    pub fn immediate_properties(&self) -> Vec<PropertyId> {
        self.keys
            .iter()
            .filter_map(|k| PropertyId::from_name(k))
            .filter(|id| id.class() == PropertyClass::Immediate)
            .collect()
    }

    /// Union of affected regions, ordered and deduplicated.
    pub fn regions(&self) -> Vec<SpecRegion> {
        let mut regions = BTreeSet::new();
        for key in &self.keys {
            let affected = match PropertyId::from_name(key) {
                Some(id) => id.regions(),
                None => PropertyId::unmapped_regions(),
            };
            regions.extend(affected.iter().copied());
        }
        if self.data_changed {
            regions.extend(PropertyId::Data.regions().iter().copied());
        }
        regions.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_diff_detects_value_changes() {
        let prev = map(json!({"title": "A", "showLegend": true}));
        let next = map(json!({"title": "B", "showLegend": true}));
        let changed = diff_top_level(&prev, &next);
        assert_eq!(changed.into_iter().collect::<Vec<_>>(), vec!["title"]);
    }

    #[test]
    fn test_diff_is_deep_not_reference() {
        let prev = map(json!({"style": {"border": {"width": 1}}}));
        let next_same = map(json!({"style": {"border": {"width": 1}}}));
        let next_diff = map(json!({"style": {"border": {"width": 2}}}));
        assert!(diff_top_level(&prev, &next_same).is_empty());
        assert_eq!(diff_top_level(&prev, &next_diff).len(), 1);
    }

    #[test]
    fn test_diff_includes_removals_and_additions() {
        let prev = map(json!({"a": 1, "b": 2}));
        let next = map(json!({"b": 2, "c": 3}));
        let changed = diff_top_level(&prev, &next);
        assert!(changed.contains("a"));
        assert!(changed.contains("c"));
        assert!(!changed.contains("b"));
    }

    #[test]
    fn test_change_set_empty_for_identical_snapshots() {
        let cfg: WidgetConfig = serde_json::from_value(json!({"title": "A"})).unwrap();
        let snapshot = ConfigSnapshot::new(cfg.clone(), Some(json!([1, 2])));
        let changes = ChangeSet::between(&snapshot, &cfg, Some(&json!([1, 2])));
        assert!(changes.is_empty());
    }

    #[test]
    fn test_change_set_data_change_is_structural() {
        let cfg = WidgetConfig::default();
        let snapshot = ConfigSnapshot::new(cfg.clone(), Some(json!([1])));
        let changes = ChangeSet::between(&snapshot, &cfg, Some(&json!([2])));
        assert!(changes.data_changed);
        assert!(changes.has_structural());
    }

    #[test]
    fn test_change_set_unknown_key_is_structural_series() {
        let snapshot = ConfigSnapshot::default();
        let next: WidgetConfig =
            serde_json::from_value(json!({"customFlourish": true})).unwrap();
        let changes = ChangeSet::between(&snapshot, &next, None);
        assert!(changes.has_structural());
        assert_eq!(changes.regions(), vec![SpecRegion::Series]);
    }

    #[test]
    fn test_change_set_immediate_only() {
        let snapshot = ConfigSnapshot::default();
        let next: WidgetConfig = serde_json::from_value(
            json!({"colorPalette": "vibrant", "legendPosition": "bottom"}),
        )
        .unwrap();
        let changes = ChangeSet::between(&snapshot, &next, None);
        assert!(!changes.has_structural());
        assert_eq!(
            changes.immediate_properties(),
            vec![PropertyId::ColorPalette, PropertyId::LegendPosition]
        );
    }
}
