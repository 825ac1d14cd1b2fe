//! Shared types for the Grid Charts architecture
//!
//! This crate contains all types that are shared between the config-system,
//! chart-compiler, grid-layout, and wasm-bridge crates: the widget and layout
//! data model, the compiled chart specification, dataset shapes, the host
//! event contract, and the workspace error type.

use serde::{Deserialize, Serialize};

pub mod data;
pub mod errors;
pub mod events;
pub mod spec;

pub use data::DataSet;
pub use errors::{GridChartsError, Result};
pub use events::{DropPayload, ExportFormat, HostEventSink, Notice, NoticeLevel};
pub use spec::ChartSpec;

/// Chart kinds supported by the option compiler
///
/// Unknown tags deserialize to `Other` and compile to a bar-like
/// best-effort rendering instead of failing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Line,
    Area,
    Pie,
    Scatter,
    Radar,
    Gauge,
    Heatmap,
    Funnel,
    #[serde(other)]
    Other,
}

impl std::fmt::Display for ChartKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ChartKind::Bar => "bar",
            ChartKind::Line => "line",
            ChartKind::Area => "area",
            ChartKind::Pie => "pie",
            ChartKind::Scatter => "scatter",
            ChartKind::Radar => "radar",
            ChartKind::Gauge => "gauge",
            ChartKind::Heatmap => "heatmap",
            ChartKind::Funnel => "funnel",
            ChartKind::Other => "other",
        };
        write!(f, "{name}")
    }
}

/// One visual unit placed on the dashboard canvas
///
/// Owned exclusively by the host application. The rendering engine receives
/// widgets by reference and requests every mutation through the
/// [`HostEventSink`] contract.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Widget {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ChartKind,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default = "default_visible")]
    pub is_visible: bool,
    #[serde(default)]
    pub is_locked: bool,
    /// Free-form visual overrides, passed through untouched.
    #[serde(default)]
    pub style: serde_json::Value,
}

fn default_visible() -> bool {
    true
}

/// Default placement for a widget that has no layout entry
pub const DEFAULT_CELL_W: u32 = 6;
pub const DEFAULT_CELL_H: u32 = 4;
pub const DEFAULT_MIN_W: u32 = 2;
pub const DEFAULT_MIN_H: u32 = 2;

/// Geometric placement record for a widget within the grid
///
/// Layout entries are the single source of geometric truth: the widget
/// itself carries no position state, and entries are recomputed by the grid
/// engine on every drag/resize commit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LayoutEntry {
    /// Widget id this entry belongs to (foreign key).
    pub i: String,
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_w: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_h: Option<u32>,
}

impl LayoutEntry {
    /// Fallback placement for a widget with no layout entry.
    pub fn default_for(id: &str) -> Self {
        Self {
            i: id.to_string(),
            x: 0,
            y: 0,
            w: DEFAULT_CELL_W,
            h: DEFAULT_CELL_H,
            min_w: Some(DEFAULT_MIN_W),
            min_h: Some(DEFAULT_MIN_H),
        }
    }

    pub fn min_w(&self) -> u32 {
        self.min_w.unwrap_or(1)
    }

    pub fn min_h(&self) -> u32 {
        self.min_h.unwrap_or(1)
    }

    /// Whether two entries occupy overlapping cells.
    pub fn overlaps(&self, other: &LayoutEntry) -> bool {
        if self.i == other.i {
            return false;
        }
        self.x < other.x + other.w
            && other.x < self.x + self.w
            && self.y < other.y + other.h
            && other.y < self.y + self.h
    }
}

/// Entitlement tier consumed by the branding decorator
///
/// Source of truth is an external entitlement collaborator; the engine only
/// reads it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PlanTier {
    #[default]
    Free,
    Pro,
    Enterprise,
}

impl PlanTier {
    /// Free-tier specifications carry a watermark graphic.
    pub fn shows_branding(&self) -> bool {
        matches!(self, PlanTier::Free)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_kind_unknown_tag_falls_back() {
        let kind: ChartKind = serde_json::from_str("\"treemap\"").unwrap();
        assert_eq!(kind, ChartKind::Other);
        let kind: ChartKind = serde_json::from_str("\"heatmap\"").unwrap();
        assert_eq!(kind, ChartKind::Heatmap);
    }

    #[test]
    fn test_widget_defaults() {
        let widget: Widget =
            serde_json::from_str(r#"{"id":"w1","type":"bar"}"#).unwrap();
        assert!(widget.is_visible);
        assert!(!widget.is_locked);
        assert_eq!(widget.title, "");
    }

    #[test]
    fn test_layout_entry_default_placement() {
        let entry = LayoutEntry::default_for("w1");
        assert_eq!((entry.x, entry.y), (0, 0));
        assert_eq!((entry.w, entry.h), (DEFAULT_CELL_W, DEFAULT_CELL_H));
        assert_eq!(entry.min_w, Some(DEFAULT_MIN_W));
    }

    #[test]
    fn test_layout_entry_overlap() {
        let a = LayoutEntry { i: "a".into(), x: 0, y: 0, w: 4, h: 2, min_w: None, min_h: None };
        let b = LayoutEntry { i: "b".into(), x: 3, y: 1, w: 4, h: 2, min_w: None, min_h: None };
        let c = LayoutEntry { i: "c".into(), x: 4, y: 0, w: 2, h: 2, min_w: None, min_h: None };
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_layout_entry_camel_case_wire_format() {
        let entry = LayoutEntry {
            i: "w1".into(),
            x: 2,
            y: 0,
            w: 6,
            h: 4,
            min_w: Some(2),
            min_h: None,
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"minW\":2"));
        assert!(!json.contains("minH"));
    }

    #[test]
    fn test_plan_tier_branding() {
        assert!(PlanTier::Free.shows_branding());
        assert!(!PlanTier::Pro.shows_branding());
        assert!(!PlanTier::Enterprise.shows_branding());
    }
}
