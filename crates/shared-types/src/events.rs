//! Host event contract
//!
//! The engine never persists state itself: every mutation is requested
//! through this sink, passed in at construction. Components needing
//! cross-cutting notification subscribe through the sink instead of any
//! ambient global event channel.

use serde::{Deserialize, Serialize};

use crate::{GridChartsError, LayoutEntry, Widget};

/// Severity of a transient, non-blocking notification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// Transient user-facing notification (toast-style)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn warning(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Warning, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Error, message: message.into() }
    }
}

/// Structured payload dropped from an external widget palette
///
/// Malformed payloads are rejected at the boundary with a logged warning;
/// they never propagate as a crash.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DropPayload {
    #[serde(rename = "type")]
    pub kind: crate::ChartKind,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub config: Option<serde_json::Map<String, serde_json::Value>>,
}

impl DropPayload {
    /// Parse a drop payload from its wire text.
    pub fn parse(raw: &str) -> Result<Self, GridChartsError> {
        serde_json::from_str(raw).map_err(|e| GridChartsError::PayloadParse {
            message: e.to_string(),
        })
    }
}

/// Export format for on-demand widget snapshots
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Raster snapshot (PNG data URL).
    Png,
    /// Vector snapshot (SVG text).
    Svg,
}

/// Host-owned callback contract
///
/// The grid controller and update pipeline report through this trait; the
/// host is the sole persistence authority. Save/undo/redo are external
/// collaborators and default to no-ops.
pub trait HostEventSink {
    /// Fired with the complete layout array whenever a drag or resize
    /// commits — never a delta.
    fn on_layout_change(&self, layout: &[LayoutEntry]);

    fn on_widget_select(&self, widget: Option<&Widget>);

    /// Request a partial attribute mutation (visibility, lock, title).
    fn on_widget_update(&self, id: &str, partial: &serde_json::Value);

    fn on_widget_delete(&self, id: &str);

    fn on_widget_duplicate(&self, widget: &Widget);

    fn on_widget_config_update(
        &self,
        id: &str,
        config: &serde_json::Map<String, serde_json::Value>,
    );

    /// A palette drop parsed successfully.
    fn on_add_widget(&self, payload: &DropPayload);

    fn on_notice(&self, notice: &Notice);

    fn on_save(&self) {}

    fn on_undo(&self) {}

    fn on_redo(&self) {}
}

/// Sink that drops every event, for headless use and tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullEventSink;

impl HostEventSink for NullEventSink {
    fn on_layout_change(&self, _layout: &[LayoutEntry]) {}
    fn on_widget_select(&self, _widget: Option<&Widget>) {}
    fn on_widget_update(&self, _id: &str, _partial: &serde_json::Value) {}
    fn on_widget_delete(&self, _id: &str) {}
    fn on_widget_duplicate(&self, _widget: &Widget) {}
    fn on_widget_config_update(
        &self,
        _id: &str,
        _config: &serde_json::Map<String, serde_json::Value>,
    ) {
    }
    fn on_add_widget(&self, _payload: &DropPayload) {}
    fn on_notice(&self, _notice: &Notice) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ChartKind;

    #[test]
    fn test_drop_payload_parses_well_formed() {
        let payload = DropPayload::parse(r#"{"type":"pie","title":"Revenue"}"#).unwrap();
        assert_eq!(payload.kind, ChartKind::Pie);
        assert_eq!(payload.title.as_deref(), Some("Revenue"));
    }

    #[test]
    fn test_drop_payload_rejects_malformed() {
        let err = DropPayload::parse("{not json").unwrap_err();
        assert!(matches!(err, GridChartsError::PayloadParse { .. }));
    }

    #[test]
    fn test_drop_payload_unknown_kind_is_other() {
        let payload = DropPayload::parse(r#"{"type":"sunburst"}"#).unwrap();
        assert_eq!(payload.kind, ChartKind::Other);
    }
}
