//! Configuration system for Grid Charts
//! Widget configuration model, property impact registry, diffing, update
//! planning, palettes, and validation.

use serde::{Deserialize, Serialize};

pub mod diff;
pub mod options;
pub mod palettes;
pub mod property;
pub mod update_plan;
pub mod validation;

pub use diff::{diff_top_level, ChangeSet, ConfigSnapshot};
pub use options::ChartOptions;
pub use palettes::Palette;
pub use property::{PropertyClass, PropertyId, SpecRegion};
pub use update_plan::{plan_update, UpdatePlan};
pub use validation::{validate, ValidationResult};

/// Flat widget configuration: property name → value
///
/// Mutated by the design panel (external collaborator) and consumed
/// read-only here. The typed [`ChartOptions`] union is converted from this
/// map at the compiler boundary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(transparent)]
pub struct WidgetConfig {
    values: serde_json::Map<String, serde_json::Value>,
}

impl WidgetConfig {
    pub fn new(values: serde_json::Map<String, serde_json::Value>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &serde_json::Map<String, serde_json::Value> {
        &self.values
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.values.get(key)
    }

    pub fn str_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).and_then(|v| v.as_str()).unwrap_or(default)
    }

    pub fn bool_or(&self, key: &str, default: bool) -> bool {
        self.get(key).and_then(|v| v.as_bool()).unwrap_or(default)
    }

    pub fn f64_or(&self, key: &str, default: f64) -> f64 {
        self.get(key).and_then(|v| v.as_f64()).unwrap_or(default)
    }

    pub fn u32_opt(&self, key: &str) -> Option<u32> {
        self.get(key).and_then(|v| v.as_u64()).map(|v| v as u32)
    }

    /// Responsive behavior is opt-out: only an explicit `false` disables
    /// size observation entirely.
    pub fn is_responsive(&self) -> bool {
        self.bool_or("responsive", true)
    }

    pub fn palette_name(&self) -> &str {
        self.str_or("colorPalette", palettes::DEFAULT_PALETTE)
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for WidgetConfig {
    fn from(values: serde_json::Map<String, serde_json::Value>) -> Self {
        Self { values }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config(value: serde_json::Value) -> WidgetConfig {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_accessors_with_defaults() {
        let cfg = config(json!({"showLegend": false, "colorPalette": "vibrant"}));
        assert!(!cfg.bool_or("showLegend", true));
        assert_eq!(cfg.palette_name(), "vibrant");
        assert_eq!(cfg.str_or("legendPosition", "top"), "top");
    }

    #[test]
    fn test_responsive_is_opt_out() {
        assert!(config(json!({})).is_responsive());
        assert!(config(json!({"responsive": true})).is_responsive());
        assert!(!config(json!({"responsive": false})).is_responsive());
        // Non-boolean garbage does not disable observation.
        assert!(config(json!({"responsive": "no"})).is_responsive());
    }

    #[test]
    fn test_transparent_wire_format() {
        let cfg = config(json!({"title": "Sales"}));
        let json = serde_json::to_string(&cfg).unwrap();
        assert_eq!(json, r#"{"title":"Sales"}"#);
    }
}
