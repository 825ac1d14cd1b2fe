//! Configuration validation
//!
//! Advisory checks over a widget configuration. Nothing here blocks an
//! update — the compiler always degrades gracefully — but the design panel
//! surfaces these results to the user.

use serde::{Deserialize, Serialize};
use shared_types::ChartKind;

use crate::{palettes, WidgetConfig};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

pub fn validate(kind: ChartKind, config: &WidgetConfig) -> ValidationResult {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if let Some(name) = config.get("colorPalette").and_then(|v| v.as_str()) {
        if !palettes::is_known(name) {
            warnings.push(format!(
                "Unknown color palette '{name}', falling back to '{}'",
                palettes::DEFAULT_PALETTE
            ));
        }
    }

    if kind == ChartKind::Gauge {
        let min = config.f64_or("min", 0.0);
        let max = config.f64_or("max", 100.0);
        if min >= max {
            errors.push(format!("Gauge range is empty: min {min} >= max {max}"));
        }
    }

    if let Some(position) = config.get("legendPosition").and_then(|v| v.as_str()) {
        if !matches!(position, "top" | "bottom" | "left" | "right") {
            warnings.push(format!("Unknown legend position '{position}'"));
        }
    }

    if let Some(trigger) = config.get("tooltipTrigger").and_then(|v| v.as_str()) {
        if !matches!(trigger, "item" | "axis") {
            warnings.push(format!("Unknown tooltip trigger '{trigger}'"));
        }
    }

    ValidationResult {
        is_valid: errors.is_empty(),
        errors,
        warnings,
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
    fn test_empty_config_is_valid() {
        let result = validate(ChartKind::Bar, &config(json!({})));
        assert!(result.is_valid);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_gauge_range_error() {
        let result = validate(ChartKind::Gauge, &config(json!({"min": 50, "max": 50})));
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 1);
    }

    #[test]
    fn test_unknown_palette_warns_only() {
        let result = validate(ChartKind::Line, &config(json!({"colorPalette": "neon"})));
        assert!(result.is_valid);
        assert_eq!(result.warnings.len(), 1);
    }
}
