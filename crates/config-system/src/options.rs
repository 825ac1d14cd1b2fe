//! Typed chart options
//!
//! Tagged union over the closed set of chart kinds, converted from the raw
//! configuration map at the compiler boundary. The raw map stays the diffing
//! surface; this union is what the compiler consumes, so each kind's knobs
//! are spelled out instead of being plucked from untyped JSON mid-compile.

use shared_types::ChartKind;

use crate::WidgetConfig;

/// Options shared by every chart kind
#[derive(Debug, Clone, PartialEq)]
pub struct CommonOptions {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub palette: String,
    pub show_legend: bool,
    pub legend_position: String,
    pub show_tooltip: bool,
    pub tooltip_trigger: String,
    pub animation: bool,
    pub animation_duration: Option<u32>,
    pub background_color: Option<String>,
}

impl CommonOptions {
    fn from_config(config: &WidgetConfig) -> Self {
        Self {
            title: config.get("title").and_then(|v| v.as_str()).map(String::from),
            subtitle: config
                .get("subtitle")
                .and_then(|v| v.as_str())
                .map(String::from),
            palette: config.palette_name().to_string(),
            show_legend: config.bool_or("showLegend", true),
            legend_position: config.str_or("legendPosition", "top").to_string(),
            show_tooltip: config.bool_or("showTooltip", true),
            tooltip_trigger: config.str_or("tooltipTrigger", "item").to_string(),
            animation: config.bool_or("animation", true),
            animation_duration: config.u32_opt("animationDuration"),
            background_color: config
                .get("backgroundColor")
                .and_then(|v| v.as_str())
                .map(String::from),
        }
    }
}

/// Cartesian family knobs (bar, line, area)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CartesianOptions {
    pub smooth: bool,
    pub stacked: bool,
    pub x_field: Option<String>,
    pub y_field: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScatterOptions {
    pub symbol_size: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PieOptions {
    pub donut: bool,
    pub label_visible: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FunnelOptions {
    /// `descending` | `ascending`
    pub sort_order: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct GaugeOptions {
    pub min: f64,
    pub max: f64,
    pub unit: Option<String>,
}

/// Per-kind typed options
#[derive(Debug, Clone, PartialEq)]
pub enum KindOptions {
    Bar(CartesianOptions),
    Line(CartesianOptions),
    Area(CartesianOptions),
    Scatter(ScatterOptions),
    Pie(PieOptions),
    Funnel(FunnelOptions),
    Radar,
    Gauge(GaugeOptions),
    Heatmap,
    /// Unknown kinds compile as a bar-like best effort.
    Fallback(CartesianOptions),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartOptions {
    pub common: CommonOptions,
    pub kind: KindOptions,
}

impl ChartOptions {
    /// Boundary conversion from the untyped configuration map.
    pub fn from_config(kind: ChartKind, config: &WidgetConfig) -> Self {
        let common = CommonOptions::from_config(config);
        let cartesian = || CartesianOptions {
            smooth: config.bool_or("smooth", false),
            stacked: config.bool_or("stacked", false),
            x_field: config.get("xField").and_then(|v| v.as_str()).map(String::from),
            y_field: config.get("yField").and_then(|v| v.as_str()).map(String::from),
        };
        let kind = match kind {
            ChartKind::Bar => KindOptions::Bar(cartesian()),
            ChartKind::Line => KindOptions::Line(cartesian()),
            ChartKind::Area => KindOptions::Area(cartesian()),
            ChartKind::Scatter => KindOptions::Scatter(ScatterOptions {
                symbol_size: config.f64_or("symbolSize", 10.0),
            }),
            ChartKind::Pie => KindOptions::Pie(PieOptions {
                donut: config.bool_or("donut", false),
                label_visible: config.bool_or("labelVisible", true),
            }),
            ChartKind::Funnel => KindOptions::Funnel(FunnelOptions {
                sort_order: config.str_or("sortOrder", "descending").to_string(),
            }),
            ChartKind::Radar => KindOptions::Radar,
            ChartKind::Gauge => KindOptions::Gauge(GaugeOptions {
                min: config.f64_or("min", 0.0),
                max: config.f64_or("max", 100.0),
                unit: config.get("unit").and_then(|v| v.as_str()).map(String::from),
            }),
            ChartKind::Heatmap => KindOptions::Heatmap,
            ChartKind::Other => KindOptions::Fallback(cartesian()),
        };
        Self { common, kind }
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
    fn test_common_defaults() {
        let opts = ChartOptions::from_config(ChartKind::Bar, &config(json!({})));
        assert!(opts.common.show_legend);
        assert_eq!(opts.common.legend_position, "top");
        assert_eq!(opts.common.tooltip_trigger, "item");
        assert_eq!(opts.common.palette, "default");
    }

    #[test]
    fn test_kind_specific_conversion() {
        let opts = ChartOptions::from_config(
            ChartKind::Gauge,
            &config(json!({"min": 10, "max": 200, "unit": "rpm"})),
        );
        match opts.kind {
            KindOptions::Gauge(g) => {
                assert_eq!(g.min, 10.0);
                assert_eq!(g.max, 200.0);
                assert_eq!(g.unit.as_deref(), Some("rpm"));
            }
            other => panic!("expected gauge options, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_kind_becomes_fallback() {
        let opts = ChartOptions::from_config(ChartKind::Other, &config(json!({})));
        assert!(matches!(opts.kind, KindOptions::Fallback(_)));
    }
}
