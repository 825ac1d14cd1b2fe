//! Built-in sample datasets
//!
//! Deterministic placeholder data keyed by chart kind, substituted whenever
//! a widget has no bound data (or the bound data is empty) so a freshly
//! dropped widget renders something meaningful immediately.

use shared_types::data::{DataSet, NamedSeries, NamedValue, RadarIndicator};
use shared_types::ChartKind;

const MONTHS: [&str; 6] = ["Jan", "Feb", "Mar", "Apr", "May", "Jun"];

/// Sample dataset for a chart kind. Always non-empty.
pub fn for_kind(kind: ChartKind) -> DataSet {
    match kind {
        ChartKind::Bar | ChartKind::Line | ChartKind::Area | ChartKind::Other => {
            DataSet::Categories {
                categories: MONTHS.iter().map(|m| m.to_string()).collect(),
                series: vec![
                    NamedSeries {
                        name: "Revenue".to_string(),
                        values: vec![120.0, 200.0, 150.0, 80.0, 170.0, 210.0],
                    },
                    NamedSeries {
                        name: "Cost".to_string(),
                        values: vec![60.0, 110.0, 95.0, 45.0, 90.0, 130.0],
                    },
                ],
            }
        }
        ChartKind::Scatter => DataSet::Points {
            points: vec![
                [10.0, 8.04],
                [8.0, 6.95],
                [13.0, 7.58],
                [9.0, 8.81],
                [11.0, 8.33],
                [14.0, 9.96],
                [6.0, 7.24],
                [4.0, 4.26],
                [12.0, 10.84],
                [7.0, 4.82],
            ],
        },
        ChartKind::Pie | ChartKind::Funnel => DataSet::NamedValues {
            values: vec![
                NamedValue { name: "Search".to_string(), value: 1048.0 },
                NamedValue { name: "Direct".to_string(), value: 735.0 },
                NamedValue { name: "Email".to_string(), value: 580.0 },
                NamedValue { name: "Ads".to_string(), value: 484.0 },
                NamedValue { name: "Video".to_string(), value: 300.0 },
            ],
        },
        ChartKind::Radar => DataSet::Radar {
            indicators: vec![
                RadarIndicator { name: "Sales".to_string(), max: 100.0 },
                RadarIndicator { name: "Marketing".to_string(), max: 100.0 },
                RadarIndicator { name: "Development".to_string(), max: 100.0 },
                RadarIndicator { name: "Support".to_string(), max: 100.0 },
                RadarIndicator { name: "Operations".to_string(), max: 100.0 },
            ],
            series: vec![NamedSeries {
                name: "Allocated".to_string(),
                values: vec![80.0, 55.0, 90.0, 60.0, 72.0],
            }],
        },
        ChartKind::Gauge => DataSet::Scalar { value: 72.0, max: 100.0 },
        ChartKind::Heatmap => {
            let x_labels: Vec<String> =
                ["Mon", "Tue", "Wed", "Thu", "Fri"].iter().map(|d| d.to_string()).collect();
            let y_labels: Vec<String> =
                ["Morning", "Afternoon", "Evening"].iter().map(|p| p.to_string()).collect();
            let mut cells = Vec::new();
            for (x, _) in x_labels.iter().enumerate() {
                for (y, _) in y_labels.iter().enumerate() {
                    // Deterministic ripple so adjacent cells differ visibly.
                    let value = ((x * 7 + y * 13) % 10) as f64;
                    cells.push([x as f64, y as f64, value]);
                }
            }
            DataSet::Cells { x_labels, y_labels, cells }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_KINDS: [ChartKind; 10] = [
        ChartKind::Bar,
        ChartKind::Line,
        ChartKind::Area,
        ChartKind::Pie,
        ChartKind::Scatter,
        ChartKind::Radar,
        ChartKind::Gauge,
        ChartKind::Heatmap,
        ChartKind::Funnel,
        ChartKind::Other,
    ];

    #[test]
    fn test_every_kind_has_nonempty_sample() {
        for kind in ALL_KINDS {
            assert!(!for_kind(kind).is_empty(), "{kind}");
        }
    }

    #[test]
    fn test_samples_are_deterministic() {
        for kind in ALL_KINDS {
            assert_eq!(for_kind(kind), for_kind(kind), "{kind}");
        }
    }

    #[test]
    fn test_shapes_match_kind() {
        assert!(matches!(for_kind(ChartKind::Bar), DataSet::Categories { .. }));
        assert!(matches!(for_kind(ChartKind::Scatter), DataSet::Points { .. }));
        assert!(matches!(for_kind(ChartKind::Pie), DataSet::NamedValues { .. }));
        assert!(matches!(for_kind(ChartKind::Radar), DataSet::Radar { .. }));
        assert!(matches!(for_kind(ChartKind::Gauge), DataSet::Scalar { .. }));
        assert!(matches!(for_kind(ChartKind::Heatmap), DataSet::Cells { .. }));
    }
}
