//! Dataset shapes consumed by the option compiler
//!
//! Each chart kind binds a distinct data shape. External data arrives as
//! untyped JSON and is converted at the boundary with [`DataSet::from_value`];
//! shapes that cannot be coerced yield `None` so the compiler can substitute
//! its sample dataset instead of failing.

use serde::{Deserialize, Serialize};

use crate::ChartKind;

/// A named run of values aligned with shared categories
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NamedSeries {
    pub name: String,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NamedValue {
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RadarIndicator {
    pub name: String,
    pub max: f64,
}

/// Typed data payload, one shape per chart-kind family
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", tag = "shape")]
pub enum DataSet {
    /// Category/value pairs for bar, line, and area charts.
    Categories {
        categories: Vec<String>,
        series: Vec<NamedSeries>,
    },
    /// Coordinate pairs for scatter charts.
    Points { points: Vec<[f64; 2]> },
    /// Name/value pairs for pie and funnel charts.
    NamedValues { values: Vec<NamedValue> },
    /// Indicator/value arrays for radar charts.
    Radar {
        indicators: Vec<RadarIndicator>,
        series: Vec<NamedSeries>,
    },
    /// Single scalar reading for gauges.
    Scalar { value: f64, max: f64 },
    /// (x, y, value) triples over labeled axes for heatmaps.
    #[serde(rename_all = "camelCase")]
    Cells {
        x_labels: Vec<String>,
        y_labels: Vec<String>,
        cells: Vec<[f64; 3]>,
    },
}

impl DataSet {
    /// An empty dataset triggers the sample-data substitution.
    pub fn is_empty(&self) -> bool {
        match self {
            DataSet::Categories { categories, series } => {
                categories.is_empty() || series.iter().all(|s| s.values.is_empty())
            }
            DataSet::Points { points } => points.is_empty(),
            DataSet::NamedValues { values } => values.is_empty(),
            DataSet::Radar { indicators, series } => {
                indicators.is_empty() || series.is_empty()
            }
            DataSet::Scalar { .. } => false,
            DataSet::Cells { cells, .. } => cells.is_empty(),
        }
    }

    /// Boundary conversion from untyped external data.
    ///
    /// Accepts either the tagged wire shape or, for cartesian kinds, a bare
    /// `{categories, series}` object. Returns `None` when the payload cannot
    /// be read as the shape the chart kind expects.
    pub fn from_value(kind: ChartKind, value: &serde_json::Value) -> Option<DataSet> {
        if value.is_null() {
            return None;
        }
        if let Ok(data) = serde_json::from_value::<DataSet>(value.clone()) {
            return Some(data);
        }
        // Untagged fallbacks keyed by the chart kind.
        match kind {
            ChartKind::Bar | ChartKind::Line | ChartKind::Area | ChartKind::Other => {
                #[derive(Deserialize)]
                struct Bare {
                    categories: Vec<String>,
                    series: Vec<NamedSeries>,
                }
                serde_json::from_value::<Bare>(value.clone())
                    .ok()
                    .map(|b| DataSet::Categories { categories: b.categories, series: b.series })
            }
            ChartKind::Scatter => serde_json::from_value::<Vec<[f64; 2]>>(value.clone())
                .ok()
                .map(|points| DataSet::Points { points }),
            ChartKind::Pie | ChartKind::Funnel => {
                serde_json::from_value::<Vec<NamedValue>>(value.clone())
                    .ok()
                    .map(|values| DataSet::NamedValues { values })
            }
            ChartKind::Gauge => value
                .as_f64()
                .map(|v| DataSet::Scalar { value: v, max: 100.0 }),
            ChartKind::Radar | ChartKind::Heatmap => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_detection() {
        let empty = DataSet::Categories { categories: vec![], series: vec![] };
        assert!(empty.is_empty());
        let full = DataSet::Categories {
            categories: vec!["a".into()],
            series: vec![NamedSeries { name: "s".into(), values: vec![1.0] }],
        };
        assert!(!full.is_empty());
        assert!(!DataSet::Scalar { value: 0.0, max: 100.0 }.is_empty());
    }

    #[test]
    fn test_from_value_tagged_shape() {
        let value = serde_json::json!({
            "shape": "points",
            "points": [[1.0, 2.0], [3.0, 4.0]],
        });
        let data = DataSet::from_value(ChartKind::Scatter, &value).unwrap();
        assert_eq!(data, DataSet::Points { points: vec![[1.0, 2.0], [3.0, 4.0]] });
    }

    #[test]
    fn test_from_value_bare_cartesian() {
        let value = serde_json::json!({
            "categories": ["a", "b"],
            "series": [{"name": "s1", "values": [1.0, 2.0]}],
        });
        let data = DataSet::from_value(ChartKind::Bar, &value).unwrap();
        assert!(matches!(data, DataSet::Categories { .. }));
    }

    #[test]
    fn test_from_value_bare_scalar_gauge() {
        let data = DataSet::from_value(ChartKind::Gauge, &serde_json::json!(42.5)).unwrap();
        assert_eq!(data, DataSet::Scalar { value: 42.5, max: 100.0 });
    }

    #[test]
    fn test_from_value_rejects_mismatched_shape() {
        let value = serde_json::json!({"unexpected": true});
        assert!(DataSet::from_value(ChartKind::Scatter, &value).is_none());
        assert!(DataSet::from_value(ChartKind::Radar, &serde_json::Value::Null).is_none());
    }
}
