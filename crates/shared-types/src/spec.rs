//! Compiled chart specification
//!
//! The renderer-ready declarative object produced by the option compiler.
//! Ephemeral: recomputed from configuration + data + chart kind on every
//! full update, never persisted. Serializes to the camelCase wire shape the
//! rendering surface consumes.

use serde::{Deserialize, Serialize};

/// Complete declarative chart specification
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ChartSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<TitleSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend: Option<LegendSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<TooltipSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid: Option<GridSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_axis: Option<AxisSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_axis: Option<AxisSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radar: Option<RadarGridSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visual_map: Option<VisualMapSpec>,
    pub series: Vec<SeriesSpec>,
    /// Resolved palette applied uniformly across all series.
    pub color: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    pub animation: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animation_duration: Option<u32>,
    /// Watermark graphic added by the branding decorator.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graphic: Option<WatermarkSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct TitleSpec {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtext: Option<String>,
    pub left: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LegendSpec {
    pub show: bool,
    /// `top` | `bottom` | `left` | `right`
    pub position: String,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub data: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TooltipSpec {
    pub show: bool,
    /// `item` | `axis`
    pub trigger: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GridSpec {
    pub left: String,
    pub right: String,
    pub top: String,
    pub bottom: String,
    pub contain_label: bool,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self {
            left: "3%".to_string(),
            right: "4%".to_string(),
            top: "15%".to_string(),
            bottom: "3%".to_string(),
            contain_label: true,
        }
    }
}

/// Axis kind for cartesian charts
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AxisKind {
    Category,
    Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AxisSpec {
    #[serde(rename = "type")]
    pub kind: AxisKind,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub data: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl AxisSpec {
    pub fn category(data: Vec<String>) -> Self {
        Self { kind: AxisKind::Category, data, name: None }
    }

    pub fn value() -> Self {
        Self { kind: AxisKind::Value, data: Vec::new(), name: None }
    }
}

/// Radar coordinate grid (one indicator per spoke)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RadarGridSpec {
    pub indicator: Vec<RadarIndicatorSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RadarIndicatorSpec {
    pub name: String,
    pub max: f64,
}

/// Continuous visual map used by heatmap series
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VisualMapSpec {
    pub min: f64,
    pub max: f64,
    pub calculable: bool,
    pub orient: String,
    pub left: String,
}

/// One series in the compiled specification
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SeriesSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    pub data: SeriesData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smooth: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area_style: Option<serde_json::Value>,
    /// Pie/gauge radius, e.g. `["40%", "70%"]`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<serde_json::Value>,
}

impl SeriesSpec {
    pub fn new(kind: &str, data: SeriesData) -> Self {
        Self {
            name: None,
            kind: kind.to_string(),
            data,
            smooth: None,
            stack: None,
            area_style: None,
            radius: None,
            symbol_size: None,
            min: None,
            max: None,
            sort: None,
            label: None,
        }
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }
}

/// Series payload, shaped per chart kind
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum SeriesData {
    /// Plain values aligned with a category axis (bar/line/area).
    Values(Vec<f64>),
    /// Coordinate pairs (scatter) or (x, y, value) triples (heatmap).
    Points(Vec<Vec<f64>>),
    /// Name/value records (pie, funnel, gauge needles, radar rings).
    Named(Vec<NamedDatum>),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NamedDatum {
    pub name: String,
    pub value: serde_json::Value,
}

impl NamedDatum {
    pub fn scalar(name: &str, value: f64) -> Self {
        Self { name: name.to_string(), value: serde_json::json!(value) }
    }
}

/// Watermark graphic appended to free-tier specifications
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WatermarkSpec {
    pub text: String,
    pub right: String,
    pub bottom: String,
    pub opacity: f64,
}

impl ChartSpec {
    /// Structural validity required of every compiler output.
    pub fn is_renderable(&self) -> bool {
        !self.series.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_serializes_camel_case() {
        let spec = ChartSpec {
            x_axis: Some(AxisSpec::category(vec!["a".into()])),
            background_color: Some("#fff".into()),
            series: vec![SeriesSpec::new("bar", SeriesData::Values(vec![1.0]))],
            ..Default::default()
        };
        let json = serde_json::to_string(&spec).unwrap();
        assert!(json.contains("\"xAxis\""));
        assert!(json.contains("\"backgroundColor\""));
        assert!(json.contains("\"type\":\"bar\""));
    }

    #[test]
    fn test_empty_optionals_are_omitted() {
        let spec = ChartSpec::default();
        let json = serde_json::to_string(&spec).unwrap();
        assert!(!json.contains("title"));
        assert!(!json.contains("visualMap"));
        assert!(!json.contains("graphic"));
    }

    #[test]
    fn test_renderable_requires_series() {
        let mut spec = ChartSpec::default();
        assert!(!spec.is_renderable());
        spec.series.push(SeriesSpec::new("bar", SeriesData::Values(vec![])));
        assert!(spec.is_renderable());
    }
}
