//! Property impact registry
//!
//! Closed identifier set for configuration properties, each carrying the
//! specification regions it can affect and its update class. Names arrive as
//! free strings from the design panel; the boundary conversion is
//! [`PropertyId::from_name`]. Unmapped names conservatively affect `series`
//! and force a full recompile rather than silently dropping the update.

use serde::{Deserialize, Serialize};

/// Region of the compiled specification a property can affect
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub enum SpecRegion {
    Title,
    Legend,
    Tooltip,
    Series,
    XAxis,
    YAxis,
    Animation,
    Grid,
    Layout,
    BackgroundColor,
}

/// Update cost class
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PropertyClass {
    /// Visual-only, applied as a partial merge without delay.
    Immediate,
    /// Forces a full recompile through the option compiler.
    Structural,
}

/// Closed configuration property identifier
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum PropertyId {
    Title,
    Subtitle,
    ChartType,
    Data,
    ColorPalette,
    Theme,
    ShowLegend,
    LegendPosition,
    ShowTooltip,
    TooltipTrigger,
    Animation,
    AnimationDuration,
    BackgroundColor,
    XField,
    YField,
    SeriesField,
    Stacked,
    Smooth,
    Donut,
    LabelVisible,
    SymbolSize,
    Min,
    Max,
    Unit,
    SortOrder,
    Responsive,
}

impl PropertyId {
    /// Boundary conversion from a raw property name.
    pub fn from_name(name: &str) -> Option<PropertyId> {
        use PropertyId::*;
        let id = match name {
            "title" => Title,
            "subtitle" => Subtitle,
            "chartType" => ChartType,
            "data" => Data,
            "colorPalette" => ColorPalette,
            "theme" => Theme,
            "showLegend" => ShowLegend,
            "legendPosition" => LegendPosition,
            "showTooltip" => ShowTooltip,
            "tooltipTrigger" => TooltipTrigger,
            "animation" => Animation,
            "animationDuration" => AnimationDuration,
            "backgroundColor" => BackgroundColor,
            "xField" => XField,
            "yField" => YField,
            "seriesField" => SeriesField,
            "stacked" => Stacked,
            "smooth" => Smooth,
            "donut" => Donut,
            "labelVisible" => LabelVisible,
            "symbolSize" => SymbolSize,
            "min" => Min,
            "max" => Max,
            "unit" => Unit,
            "sortOrder" => SortOrder,
            "responsive" => Responsive,
            _ => return None,
        };
        Some(id)
    }

    pub fn name(&self) -> &'static str {
        use PropertyId::*;
        match self {
            Title => "title",
            Subtitle => "subtitle",
            ChartType => "chartType",
            Data => "data",
            ColorPalette => "colorPalette",
            Theme => "theme",
            ShowLegend => "showLegend",
            LegendPosition => "legendPosition",
            ShowTooltip => "showTooltip",
            TooltipTrigger => "tooltipTrigger",
            Animation => "animation",
            AnimationDuration => "animationDuration",
            BackgroundColor => "backgroundColor",
            XField => "xField",
            YField => "yField",
            SeriesField => "seriesField",
            Stacked => "stacked",
            Smooth => "smooth",
            Donut => "donut",
            LabelVisible => "labelVisible",
            SymbolSize => "symbolSize",
            Min => "min",
            Max => "max",
            Unit => "unit",
            SortOrder => "sortOrder",
            Responsive => "responsive",
        }
    }

    /// Ordered set of specification regions this property can affect.
    pub fn regions(&self) -> &'static [SpecRegion] {
        use PropertyId::*;
        use SpecRegion as R;
        match self {
            Title | Subtitle => &[R::Title],
            ChartType => &[R::Series, R::XAxis, R::YAxis, R::Legend, R::Grid],
            Data => &[R::Series, R::XAxis, R::YAxis, R::Legend],
            ColorPalette | Theme => &[R::Series, R::BackgroundColor],
            ShowLegend | LegendPosition => &[R::Legend],
            ShowTooltip | TooltipTrigger => &[R::Tooltip],
            Animation | AnimationDuration => &[R::Animation],
            BackgroundColor => &[R::BackgroundColor],
            XField => &[R::XAxis, R::Series],
            YField => &[R::YAxis, R::Series],
            SeriesField | Stacked | Smooth | Donut | LabelVisible | SymbolSize | Min | Max
            | Unit | SortOrder => &[R::Series],
            Responsive => &[R::Layout],
        }
    }

    /// Update class deciding partial-merge versus full recompile.
    pub fn class(&self) -> PropertyClass {
        use PropertyId::*;
        match self {
            // Visual-only: cheap partial merges onto the live specification.
            Title | Subtitle | ColorPalette | Theme | ShowLegend | LegendPosition
            | ShowTooltip | TooltipTrigger | Animation | AnimationDuration
            | BackgroundColor => PropertyClass::Immediate,
            // Shape-changing: recompile from scratch.
            ChartType | Data | XField | YField | SeriesField | Stacked | Smooth | Donut
            | LabelVisible | SymbolSize | Min | Max | Unit | SortOrder | Responsive => {
                PropertyClass::Structural
            }
        }
    }

    /// Fallback regions for names outside the closed identifier set.
    pub fn unmapped_regions() -> &'static [SpecRegion] {
        &[SpecRegion::Series]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_names() {
        for id in [
            PropertyId::Title,
            PropertyId::ChartType,
            PropertyId::ColorPalette,
            PropertyId::TooltipTrigger,
            PropertyId::Responsive,
        ] {
            assert_eq!(PropertyId::from_name(id.name()), Some(id));
        }
        assert_eq!(PropertyId::from_name("bogus"), None);
    }

    #[test]
    fn test_immediate_class_matches_contract() {
        for id in [
            PropertyId::ColorPalette,
            PropertyId::Theme,
            PropertyId::ShowLegend,
            PropertyId::LegendPosition,
            PropertyId::ShowTooltip,
            PropertyId::TooltipTrigger,
        ] {
            assert_eq!(id.class(), PropertyClass::Immediate, "{id:?}");
        }
        for id in [
            PropertyId::ChartType,
            PropertyId::Data,
            PropertyId::XField,
            PropertyId::SeriesField,
        ] {
            assert_eq!(id.class(), PropertyClass::Structural, "{id:?}");
        }
    }

    #[test]
    fn test_regions_are_nonempty() {
        let all = [
            PropertyId::Title,
            PropertyId::Subtitle,
            PropertyId::ChartType,
            PropertyId::Data,
            PropertyId::ColorPalette,
            PropertyId::Theme,
            PropertyId::ShowLegend,
            PropertyId::LegendPosition,
            PropertyId::ShowTooltip,
            PropertyId::TooltipTrigger,
            PropertyId::Animation,
            PropertyId::AnimationDuration,
            PropertyId::BackgroundColor,
            PropertyId::XField,
            PropertyId::YField,
            PropertyId::SeriesField,
            PropertyId::Stacked,
            PropertyId::Smooth,
            PropertyId::Donut,
            PropertyId::LabelVisible,
            PropertyId::SymbolSize,
            PropertyId::Min,
            PropertyId::Max,
            PropertyId::Unit,
            PropertyId::SortOrder,
            PropertyId::Responsive,
        ];
        for id in all {
            assert!(!id.regions().is_empty(), "{id:?}");
        }
    }

    #[test]
    fn test_unmapped_defaults_to_series() {
        assert_eq!(PropertyId::unmapped_regions(), &[SpecRegion::Series]);
    }
}
