//! Drag/resize session math
//!
//! Converts pointer pixel positions into grid cells for the DOM controller.
//! Sessions are plain value types: the controller creates one on pointer
//! down, feeds it pointer moves, and commits the result through
//! [`crate::move_item`] / [`crate::resize_item`].

use shared_types::LayoutEntry;

use crate::GRID_COLS;

/// Pixel rectangle of one cell span inside the canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Pixel geometry of the grid at the current canvas width
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellMetrics {
    pub canvas_width: f64,
    pub row_height: f64,
    pub gap: f64,
}

impl CellMetrics {
    pub fn new(canvas_width: f64, row_height: f64, gap: f64) -> Self {
        Self { canvas_width, row_height, gap }
    }

    pub fn col_width(&self) -> f64 {
        (self.canvas_width - self.gap * (GRID_COLS as f64 + 1.0)) / GRID_COLS as f64
    }

    /// Pixel rectangle for a layout entry.
    pub fn rect_for(&self, entry: &LayoutEntry) -> PixelRect {
        let col = self.col_width();
        PixelRect {
            left: self.gap + entry.x as f64 * (col + self.gap),
            top: self.gap + entry.y as f64 * (self.row_height + self.gap),
            width: entry.w as f64 * col + (entry.w.saturating_sub(1)) as f64 * self.gap,
            height: entry.h as f64 * self.row_height
                + (entry.h.saturating_sub(1)) as f64 * self.gap,
        }
    }

    /// Nearest cell for a pixel position, clamped to the grid.
    pub fn cell_at(&self, px: f64, py: f64) -> (u32, u32) {
        let col = self.col_width();
        let x = ((px - self.gap) / (col + self.gap)).round().max(0.0) as u32;
        let y = ((py - self.gap) / (self.row_height + self.gap)).round().max(0.0) as u32;
        (x.min(GRID_COLS - 1), y)
    }

    /// Nearest cell span for a pixel size.
    pub fn span_for(&self, width_px: f64, height_px: f64) -> (u32, u32) {
        let col = self.col_width();
        let w = (width_px / (col + self.gap)).round().max(1.0) as u32;
        let h = (height_px / (self.row_height + self.gap)).round().max(1.0) as u32;
        (w.min(GRID_COLS), h)
    }
}

/// Active drag of one widget cell
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub id: String,
    /// Pointer offset from the cell's top-left corner at grab time.
    pub grab_dx: f64,
    pub grab_dy: f64,
}

impl DragSession {
    pub fn begin(id: &str, metrics: &CellMetrics, entry: &LayoutEntry, px: f64, py: f64) -> Self {
        let rect = metrics.rect_for(entry);
        Self {
            id: id.to_string(),
            grab_dx: px - rect.left,
            grab_dy: py - rect.top,
        }
    }

    /// Target cell for the current pointer position.
    pub fn target_cell(&self, metrics: &CellMetrics, px: f64, py: f64) -> (u32, u32) {
        metrics.cell_at(px - self.grab_dx, py - self.grab_dy)
    }
}

/// Active resize of one widget cell via its corner handle
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeSession {
    pub id: String,
    /// Cell origin in pixels, fixed for the whole session.
    pub origin_left: f64,
    pub origin_top: f64,
}

impl ResizeSession {
    pub fn begin(id: &str, metrics: &CellMetrics, entry: &LayoutEntry) -> Self {
        let rect = metrics.rect_for(entry);
        Self {
            id: id.to_string(),
            origin_left: rect.left,
            origin_top: rect.top,
        }
    }

    /// Target span for the current pointer position.
    pub fn target_span(&self, metrics: &CellMetrics, px: f64, py: f64) -> (u32, u32) {
        metrics.span_for(px - self.origin_left, py - self.origin_top)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics() -> CellMetrics {
        // 12 columns of 90px with 10px gaps: canvas = 12*90 + 13*10 = 1210.
        CellMetrics::new(1210.0, 60.0, 10.0)
    }

    fn entry(x: u32, y: u32, w: u32, h: u32) -> LayoutEntry {
        LayoutEntry { i: "a".into(), x, y, w, h, min_w: None, min_h: None }
    }

    #[test]
    fn test_rect_round_trips_through_cell_at() {
        let m = metrics();
        for (x, y) in [(0, 0), (3, 2), (11, 7)] {
            let rect = m.rect_for(&entry(x, y, 1, 1));
            assert_eq!(m.cell_at(rect.left, rect.top), (x, y));
        }
    }

    #[test]
    fn test_cell_at_clamps_to_grid() {
        let m = metrics();
        assert_eq!(m.cell_at(-50.0, -50.0), (0, 0));
        let (x, _) = m.cell_at(5000.0, 0.0);
        assert_eq!(x, GRID_COLS - 1);
    }

    #[test]
    fn test_drag_session_keeps_grab_offset() {
        let m = metrics();
        let e = entry(2, 1, 4, 2);
        let rect = m.rect_for(&e);
        // Grab the middle of the cell and move one column right.
        let grab = (rect.left + 30.0, rect.top + 20.0);
        let session = DragSession::begin("a", &m, &e, grab.0, grab.1);
        let col_step = m.col_width() + m.gap;
        let target = session.target_cell(&m, grab.0 + col_step, grab.1);
        assert_eq!(target, (3, 1));
    }

    #[test]
    fn test_resize_session_spans() {
        let m = metrics();
        let e = entry(0, 0, 2, 2);
        let session = ResizeSession::begin("a", &m, &e);
        let col_step = m.col_width() + m.gap;
        let row_step = 60.0 + m.gap;
        let (w, h) = session.target_span(&m, session.origin_left + 4.0 * col_step, session.origin_top + 3.0 * row_step);
        assert_eq!((w, h), (4, 3));
        // Collapsing below one cell clamps to 1x1.
        assert_eq!(session.target_span(&m, session.origin_left, session.origin_top), (1, 1));
    }
}
