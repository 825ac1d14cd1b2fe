//! Option compiler for Grid Charts
//!
//! Pure mapping from (chart kind, configuration, data) to a complete
//! declarative chart specification. The compiler never fails: missing or
//! empty data is replaced by a deterministic sample dataset, unknown chart
//! kinds render as a bar-like best effort, and degenerate output recovers
//! to the sample-bar fallback — a blank chart is preferable to a crashed
//! widget.

use config_system::options::{ChartOptions, KindOptions};
use config_system::{palettes, WidgetConfig};
use serde_json::json;
use shared_types::data::DataSet;
use shared_types::spec::{
    AxisSpec, ChartSpec, GridSpec, LegendSpec, NamedDatum, RadarGridSpec, RadarIndicatorSpec,
    SeriesData, SeriesSpec, TitleSpec, TooltipSpec, VisualMapSpec,
};
use shared_types::ChartKind;

pub mod branding;
pub mod sample_data;

pub use branding::apply_branding;

/// Compile a renderer-ready specification.
///
/// `data` is used only when present and non-empty and when its shape
/// matches the chart kind; otherwise the built-in sample dataset for the
/// kind is substituted.
pub fn compile(kind: ChartKind, config: &WidgetConfig, data: Option<&DataSet>) -> ChartSpec {
    let options = ChartOptions::from_config(kind, config);
    let dataset = select_dataset(kind, data);

    let mut spec = match &options.kind {
        KindOptions::Bar(opts) => cartesian_spec("bar", opts.stacked, false, &dataset),
        KindOptions::Line(opts) => cartesian_spec("line", opts.stacked, opts.smooth, &dataset),
        KindOptions::Area(opts) => {
            let mut spec = cartesian_spec("line", opts.stacked, opts.smooth, &dataset);
            for series in &mut spec.series {
                series.area_style = Some(json!({}));
            }
            spec
        }
        KindOptions::Scatter(opts) => scatter_spec(opts.symbol_size, &dataset),
        KindOptions::Pie(opts) => pie_spec(opts.donut, opts.label_visible, &dataset),
        KindOptions::Funnel(opts) => funnel_spec(&opts.sort_order, &dataset),
        KindOptions::Radar => radar_spec(&dataset),
        KindOptions::Gauge(opts) => {
            gauge_spec(opts.min, opts.max, opts.unit.as_deref(), &dataset)
        }
        KindOptions::Heatmap => heatmap_spec(&dataset),
        KindOptions::Fallback(_) => {
            log::debug!("unknown chart kind, compiling bar-like fallback");
            cartesian_spec("bar", false, false, &dataset)
        }
    };

    if spec.series.is_empty() {
        // Degenerate compile: recover locally instead of surfacing an error.
        log::warn!("compiler produced no series for kind {kind}, using bar fallback");
        spec = cartesian_spec("bar", false, false, &sample_data::for_kind(ChartKind::Bar));
    }

    decorate_common(&mut spec, &options);
    spec
}

/// Pick the bound dataset when usable for the kind, the sample otherwise.
fn select_dataset(kind: ChartKind, data: Option<&DataSet>) -> DataSet {
    match data {
        Some(d) if !d.is_empty() && shape_matches(kind, d) => d.clone(),
        Some(d) if !d.is_empty() => {
            log::debug!("dataset shape does not fit kind {kind}, substituting sample");
            sample_data::for_kind(kind)
        }
        _ => sample_data::for_kind(kind),
    }
}

fn shape_matches(kind: ChartKind, data: &DataSet) -> bool {
    match kind {
        ChartKind::Bar | ChartKind::Line | ChartKind::Area | ChartKind::Other => {
            matches!(data, DataSet::Categories { .. })
        }
        ChartKind::Scatter => matches!(data, DataSet::Points { .. }),
        ChartKind::Pie | ChartKind::Funnel => matches!(data, DataSet::NamedValues { .. }),
        ChartKind::Radar => matches!(data, DataSet::Radar { .. }),
        ChartKind::Gauge => matches!(data, DataSet::Scalar { .. }),
        ChartKind::Heatmap => matches!(data, DataSet::Cells { .. }),
    }
}

fn cartesian_spec(series_kind: &str, stacked: bool, smooth: bool, data: &DataSet) -> ChartSpec {
    let DataSet::Categories { categories, series } = data else {
        return ChartSpec::default();
    };
    let compiled = series
        .iter()
        .map(|s| {
            let mut spec =
                SeriesSpec::new(series_kind, SeriesData::Values(s.values.clone())).named(&s.name);
            if stacked {
                spec.stack = Some("total".to_string());
            }
            if smooth {
                spec.smooth = Some(true);
            }
            spec
        })
        .collect();
    ChartSpec {
        grid: Some(GridSpec::default()),
        x_axis: Some(AxisSpec::category(categories.clone())),
        y_axis: Some(AxisSpec::value()),
        series: compiled,
        ..Default::default()
    }
}

fn scatter_spec(symbol_size: f64, data: &DataSet) -> ChartSpec {
    let DataSet::Points { points } = data else {
        return ChartSpec::default();
    };
    let mut series = SeriesSpec::new(
        "scatter",
        SeriesData::Points(points.iter().map(|p| p.to_vec()).collect()),
    );
    series.symbol_size = Some(symbol_size);
    ChartSpec {
        grid: Some(GridSpec::default()),
        x_axis: Some(AxisSpec::value()),
        y_axis: Some(AxisSpec::value()),
        series: vec![series],
        ..Default::default()
    }
}

fn pie_spec(donut: bool, label_visible: bool, data: &DataSet) -> ChartSpec {
    let DataSet::NamedValues { values } = data else {
        return ChartSpec::default();
    };
    let mut series = SeriesSpec::new(
        "pie",
        SeriesData::Named(values.iter().map(|v| NamedDatum::scalar(&v.name, v.value)).collect()),
    );
    series.radius = Some(if donut { json!(["40%", "70%"]) } else { json!("65%") });
    series.label = Some(json!({"show": label_visible}));
    ChartSpec { series: vec![series], ..Default::default() }
}

fn funnel_spec(sort_order: &str, data: &DataSet) -> ChartSpec {
    let DataSet::NamedValues { values } = data else {
        return ChartSpec::default();
    };
    let mut series = SeriesSpec::new(
        "funnel",
        SeriesData::Named(values.iter().map(|v| NamedDatum::scalar(&v.name, v.value)).collect()),
    );
    series.sort = Some(sort_order.to_string());
    ChartSpec { series: vec![series], ..Default::default() }
}

fn radar_spec(data: &DataSet) -> ChartSpec {
    let DataSet::Radar { indicators, series } = data else {
        return ChartSpec::default();
    };
    let rings = series
        .iter()
        .map(|s| NamedDatum { name: s.name.clone(), value: json!(s.values) })
        .collect();
    ChartSpec {
        radar: Some(RadarGridSpec {
            indicator: indicators
                .iter()
                .map(|i| RadarIndicatorSpec { name: i.name.clone(), max: i.max })
                .collect(),
        }),
        series: vec![SeriesSpec::new("radar", SeriesData::Named(rings))],
        ..Default::default()
    }
}

fn gauge_spec(min: f64, max: f64, unit: Option<&str>, data: &DataSet) -> ChartSpec {
    let DataSet::Scalar { value, max: data_max } = data else {
        return ChartSpec::default();
    };
    let mut series = SeriesSpec::new(
        "gauge",
        SeriesData::Named(vec![NamedDatum::scalar(unit.unwrap_or("Value"), *value)]),
    );
    series.min = Some(min);
    // Configuration wins over the dataset's own bound.
    series.max = Some(if max != 100.0 { max } else { *data_max });
    ChartSpec { series: vec![series], ..Default::default() }
}

fn heatmap_spec(data: &DataSet) -> ChartSpec {
    let DataSet::Cells { x_labels, y_labels, cells } = data else {
        return ChartSpec::default();
    };
    let (mut lo, mut hi) = (f64::MAX, f64::MIN);
    for cell in cells {
        lo = lo.min(cell[2]);
        hi = hi.max(cell[2]);
    }
    if lo > hi {
        (lo, hi) = (0.0, 1.0);
    }
    let series = SeriesSpec::new(
        "heatmap",
        SeriesData::Points(cells.iter().map(|c| c.to_vec()).collect()),
    );
    ChartSpec {
        grid: Some(GridSpec::default()),
        x_axis: Some(AxisSpec::category(x_labels.clone())),
        y_axis: Some(AxisSpec::category(y_labels.clone())),
        visual_map: Some(VisualMapSpec {
            min: lo,
            max: hi,
            calculable: true,
            orient: "horizontal".to_string(),
            left: "center".to_string(),
        }),
        series: vec![series],
        ..Default::default()
    }
}

/// Title, legend, tooltip, palette, background, and animation applied the
/// same way for every kind.
fn decorate_common(spec: &mut ChartSpec, options: &ChartOptions) {
    let common = &options.common;
    if common.title.is_some() || common.subtitle.is_some() {
        spec.title = Some(TitleSpec {
            text: common.title.clone().unwrap_or_default(),
            subtext: common.subtitle.clone(),
            left: "left".to_string(),
        });
    }
    // Legend entries auto-derived from named series.
    let legend_entries: Vec<String> =
        spec.series.iter().filter_map(|s| s.name.clone()).collect();
    spec.legend = Some(LegendSpec {
        show: common.show_legend,
        position: common.legend_position.clone(),
        data: legend_entries,
    });
    spec.tooltip = Some(TooltipSpec {
        show: common.show_tooltip,
        trigger: common.tooltip_trigger.clone(),
    });
    spec.color = palettes::resolve(&common.palette)
        .colors
        .iter()
        .map(|c| c.to_string())
        .collect();
    spec.background_color = common.background_color.clone();
    spec.animation = common.animation;
    spec.animation_duration = common.animation_duration;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shared_types::data::NamedValue;

    fn config(value: serde_json::Value) -> WidgetConfig {
        serde_json::from_value(value).unwrap()
    }

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
    fn test_fallback_validity_for_every_kind() {
        // compile(kind, {}, None) always yields a renderable spec.
        for kind in ALL_KINDS {
            let spec = compile(kind, &WidgetConfig::default(), None);
            assert!(spec.is_renderable(), "{kind}");
        }
    }

    #[test]
    fn test_compile_is_pure() {
        let cfg = config(json!({"title": "Sales", "colorPalette": "warm"}));
        let a = compile(ChartKind::Line, &cfg, None);
        let b = compile(ChartKind::Line, &cfg, None);
        assert_eq!(a, b);
    }

    #[test]
    fn test_palette_applied_uniformly() {
        let cfg = config(json!({"colorPalette": "vibrant"}));
        let spec = compile(ChartKind::Bar, &cfg, None);
        let expected: Vec<String> = palettes::resolve("vibrant")
            .colors
            .iter()
            .map(|c| c.to_string())
            .collect();
        assert_eq!(spec.color, expected);
    }

    #[test]
    fn test_legend_derived_from_named_series() {
        let spec = compile(ChartKind::Bar, &WidgetConfig::default(), None);
        let legend = spec.legend.unwrap();
        assert_eq!(legend.data, vec!["Revenue", "Cost"]);
    }

    #[test]
    fn test_bound_data_overrides_sample() {
        let data = DataSet::NamedValues {
            values: vec![NamedValue { name: "Only".into(), value: 7.0 }],
        };
        let spec = compile(ChartKind::Pie, &WidgetConfig::default(), Some(&data));
        match &spec.series[0].data {
            SeriesData::Named(items) => {
                assert_eq!(items.len(), 1);
                assert_eq!(items[0].name, "Only");
            }
            other => panic!("expected named data, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_bound_data_uses_sample() {
        let data = DataSet::NamedValues { values: vec![] };
        let spec = compile(ChartKind::Pie, &WidgetConfig::default(), Some(&data));
        assert!(spec.is_renderable());
        match &spec.series[0].data {
            SeriesData::Named(items) => assert!(items.len() > 1),
            other => panic!("expected named data, got {other:?}"),
        }
    }

    #[test]
    fn test_mismatched_shape_uses_sample() {
        // Scatter data bound to a pie widget cannot be coerced.
        let data = DataSet::Points { points: vec![[1.0, 2.0]] };
        let spec = compile(ChartKind::Pie, &WidgetConfig::default(), Some(&data));
        assert_eq!(spec.series[0].kind, "pie");
    }

    #[test]
    fn test_unknown_kind_renders_bar_like() {
        let spec = compile(ChartKind::Other, &WidgetConfig::default(), None);
        assert!(spec.series.iter().all(|s| s.kind == "bar"));
        assert!(spec.x_axis.is_some());
    }

    #[test]
    fn test_area_series_carry_area_style() {
        let spec = compile(ChartKind::Area, &WidgetConfig::default(), None);
        assert!(spec.series.iter().all(|s| s.area_style.is_some()));
    }

    #[test]
    fn test_stacked_cartesian() {
        let spec = compile(ChartKind::Bar, &config(json!({"stacked": true})), None);
        assert!(spec.series.iter().all(|s| s.stack.as_deref() == Some("total")));
    }

    #[test]
    fn test_gauge_respects_configured_range() {
        let cfg = config(json!({"min": 10, "max": 200}));
        let spec = compile(ChartKind::Gauge, &cfg, None);
        assert_eq!(spec.series[0].min, Some(10.0));
        assert_eq!(spec.series[0].max, Some(200.0));
    }

    #[test]
    fn test_heatmap_visual_map_bounds() {
        let data = DataSet::Cells {
            x_labels: vec!["a".into()],
            y_labels: vec!["b".into()],
            cells: vec![[0.0, 0.0, 3.0], [0.0, 1.0, 9.0]],
        };
        let spec = compile(ChartKind::Heatmap, &WidgetConfig::default(), Some(&data));
        let vm = spec.visual_map.unwrap();
        assert_eq!((vm.min, vm.max), (3.0, 9.0));
    }

    #[test]
    fn test_tooltip_and_legend_follow_config() {
        let cfg = config(json!({
            "showLegend": false,
            "showTooltip": false,
            "tooltipTrigger": "axis",
        }));
        let spec = compile(ChartKind::Line, &cfg, None);
        assert!(!spec.legend.as_ref().unwrap().show);
        let tooltip = spec.tooltip.unwrap();
        assert!(!tooltip.show);
        assert_eq!(tooltip.trigger, "axis");
    }
}
