//! On-demand export of widget snapshots
//!
//! Produced from the live surface handle and handed to the host as
//! downloadable content: a raster or vector image, the copyable
//! specification text, or a structured data snapshot. Failures surface as
//! errors for the caller to report — the widget stays interactive.

use uuid::Uuid;

use shared_types::{ExportFormat, GridChartsError};

use crate::instance_manager::InstanceManager;

fn with_surface<R>(
    instance_id: &Uuid,
    f: impl FnOnce(&crate::surface::SurfaceHandle) -> Result<R, GridChartsError>,
) -> Result<R, GridChartsError> {
    InstanceManager::with_instance(instance_id, |instance| {
        let surface = instance
            .lifecycle
            .surface()
            .ok_or(GridChartsError::SurfaceDisposed)?;
        f(surface)
    })
    .ok_or_else(|| GridChartsError::InstanceNotFound {
        id: instance_id.to_string(),
    })?
}

/// Image snapshot in the caller-selected format.
pub fn export_image(instance_id: &Uuid, format: ExportFormat) -> Result<String, GridChartsError> {
    with_surface(instance_id, |surface| match format {
        ExportFormat::Png => surface.export_png(),
        ExportFormat::Svg => surface.export_svg(),
    })
}

/// Copyable specification text read from the live option.
pub fn spec_text(instance_id: &Uuid) -> Result<String, GridChartsError> {
    let option = with_surface(instance_id, |surface| surface.live_option())?;
    serde_json::to_string_pretty(&option).map_err(|e| GridChartsError::Export {
        message: e.to_string(),
    })
}

/// Structured snapshot of the last-applied data, as JSON text.
pub fn data_snapshot(instance_id: &Uuid) -> Result<String, GridChartsError> {
    InstanceManager::with_instance(instance_id, |instance| {
        let data = instance.scheduler.snapshot_data();
        serde_json::to_string_pretty(&data).map_err(|e| GridChartsError::Export {
            message: e.to_string(),
        })
    })
    .ok_or_else(|| GridChartsError::InstanceNotFound {
        id: instance_id.to_string(),
    })?
}
