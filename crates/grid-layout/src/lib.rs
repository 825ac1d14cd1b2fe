//! Pure grid geometry for the dashboard canvas
//!
//! Everything here is deterministic math over [`LayoutEntry`] values: the
//! DOM controller in the wasm-bridge crate is thin glue over these
//! functions. Collision handling is permissive — overlapping placements are
//! resolved by vertical compaction, never rejected.

use std::collections::HashSet;

use shared_types::{LayoutEntry, Widget};

pub mod interaction;
pub mod zoom;

pub use interaction::{CellMetrics, DragSession, PixelRect, ResizeSession};
pub use zoom::Zoom;

/// Grid column count used by the dashboard canvas.
pub const GRID_COLS: u32 = 12;

/// One layout entry per widget, in widget order.
///
/// Entries without a matching widget are dropped; widgets without an entry
/// get the default placement. Duplicate entries for one id keep the first.
pub fn normalize(widgets: &[Widget], layout: &[LayoutEntry]) -> Vec<LayoutEntry> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut result = Vec::with_capacity(widgets.len());
    for widget in widgets {
        if !seen.insert(widget.id.as_str()) {
            log::warn!("duplicate widget id {} ignored", widget.id);
            continue;
        }
        let entry = layout
            .iter()
            .find(|e| e.i == widget.id)
            .cloned()
            .unwrap_or_else(|| LayoutEntry::default_for(&widget.id));
        result.push(entry);
    }
    result
}

fn collides_with<'a>(
    placed: &'a [LayoutEntry],
    candidate: &LayoutEntry,
) -> Option<&'a LayoutEntry> {
    placed.iter().find(|p| p.overlaps(candidate))
}

/// Vertically compact a layout: items shift upward until they rest on
/// another item or the top edge, eliminating gaps.
///
/// When `anchor` names an entry, that entry keeps its position and the rest
/// flow around it — used while committing a drag so the dragged item stays
/// where the user put it.
pub fn compact(layout: &[LayoutEntry], anchor: Option<&str>) -> Vec<LayoutEntry> {
    let mut order: Vec<&LayoutEntry> = layout.iter().collect();
    // Anchored entry is placed first so others resolve around it.
    order.sort_by_key(|e| {
        let anchored = anchor == Some(e.i.as_str());
        (!anchored, e.y, e.x)
    });

    let mut placed: Vec<LayoutEntry> = Vec::with_capacity(layout.len());
    for entry in order {
        let mut item = entry.clone();
        if anchor != Some(item.i.as_str()) {
            // Move up while the row above is free.
            while item.y > 0 {
                let probe = LayoutEntry { y: item.y - 1, ..item.clone() };
                if collides_with(&placed, &probe).is_some() {
                    break;
                }
                item.y -= 1;
            }
        }
        // Resolve any remaining overlap by moving below the collider.
        while let Some(collider) = collides_with(&placed, &item) {
            item.y = collider.y + collider.h;
        }
        placed.push(item);
    }

    // Restore the caller's entry order.
    let mut result = Vec::with_capacity(layout.len());
    for entry in layout {
        if let Some(item) = placed.iter().find(|p| p.i == entry.i) {
            result.push(item.clone());
        }
    }
    result
}

/// Commit a drag: place `id` at the target cell, then compact around it.
pub fn move_item(layout: &[LayoutEntry], id: &str, x: u32, y: u32) -> Vec<LayoutEntry> {
    let mut moved: Vec<LayoutEntry> = layout.to_vec();
    let Some(entry) = moved.iter_mut().find(|e| e.i == id) else {
        return moved;
    };
    entry.x = x.min(GRID_COLS.saturating_sub(entry.w));
    entry.y = y;
    compact(&moved, Some(id))
}

/// Commit a resize: clamp the span to the entry's minimums and the grid
/// width, then compact around it.
pub fn resize_item(layout: &[LayoutEntry], id: &str, w: u32, h: u32) -> Vec<LayoutEntry> {
    let mut resized: Vec<LayoutEntry> = layout.to_vec();
    let Some(entry) = resized.iter_mut().find(|e| e.i == id) else {
        return resized;
    };
    entry.w = w.max(entry.min_w()).min(GRID_COLS - entry.x);
    entry.h = h.max(entry.min_h());
    compact(&resized, Some(id))
}

/// Row just below the lowest entry.
pub fn bottom(layout: &[LayoutEntry]) -> u32 {
    layout.iter().map(|e| e.y + e.h).max().unwrap_or(0)
}

/// First free cell that fits a `w`×`h` item, scanning left-to-right then
/// top-to-bottom; falls back to a new bottom row.
pub fn find_free_position(layout: &[LayoutEntry], w: u32, h: u32) -> (u32, u32) {
    let w = w.min(GRID_COLS);
    for y in 0..=bottom(layout) {
        for x in 0..=(GRID_COLS - w) {
            let probe = LayoutEntry {
                i: String::new(),
                x,
                y,
                w,
                h,
                min_w: None,
                min_h: None,
            };
            if layout.iter().all(|e| !e.overlaps(&probe)) {
                return (x, y);
            }
        }
    }
    (0, bottom(layout))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::ChartKind;

    fn entry(i: &str, x: u32, y: u32, w: u32, h: u32) -> LayoutEntry {
        LayoutEntry { i: i.into(), x, y, w, h, min_w: Some(2), min_h: Some(2) }
    }

    fn widget(id: &str) -> Widget {
        Widget {
            id: id.into(),
            kind: ChartKind::Bar,
            title: String::new(),
            subtitle: String::new(),
            is_visible: true,
            is_locked: false,
            style: serde_json::Value::Null,
        }
    }

    fn assert_no_overlaps(layout: &[LayoutEntry]) {
        for a in layout {
            for b in layout {
                assert!(
                    a.i == b.i || !a.overlaps(b),
                    "{} overlaps {} in {layout:?}",
                    a.i,
                    b.i
                );
            }
        }
    }

    #[test]
    fn test_normalize_fills_defaults_and_drops_orphans() {
        let widgets = [widget("a"), widget("b")];
        let layout = [entry("a", 2, 0, 4, 2), entry("ghost", 0, 0, 2, 2)];
        let normalized = normalize(&widgets, &layout);
        assert_eq!(normalized.len(), 2);
        assert_eq!(normalized[0], entry("a", 2, 0, 4, 2));
        assert_eq!(normalized[1], LayoutEntry::default_for("b"));
    }

    #[test]
    fn test_normalize_layout_integrity() {
        // Each entry's id matches an existing widget exactly once.
        let widgets = [widget("a"), widget("b"), widget("a")];
        let layout = [entry("a", 0, 0, 2, 2)];
        let normalized = normalize(&widgets, &layout);
        let ids: Vec<&str> = normalized.iter().map(|e| e.i.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_compact_shifts_up_to_fill_gaps() {
        let layout = [entry("a", 0, 5, 4, 2), entry("b", 4, 3, 4, 2)];
        let compacted = compact(&layout, None);
        assert!(compacted.iter().all(|e| e.y == 0));
        assert_no_overlaps(&compacted);
    }

    #[test]
    fn test_compact_stacks_on_colliding_columns() {
        let layout = [entry("a", 0, 0, 4, 2), entry("b", 0, 7, 4, 2)];
        let compacted = compact(&layout, None);
        let a = compacted.iter().find(|e| e.i == "a").unwrap();
        let b = compacted.iter().find(|e| e.i == "b").unwrap();
        assert_eq!(a.y, 0);
        assert_eq!(b.y, 2);
        assert_no_overlaps(&compacted);
    }

    #[test]
    fn test_move_item_resolves_overlap_permissively() {
        let layout = [entry("a", 0, 0, 4, 2), entry("b", 4, 0, 4, 2)];
        // Drop "b" directly onto "a": compaction resolves it, no rejection.
        let moved = move_item(&layout, "b", 0, 0);
        assert_no_overlaps(&moved);
        let ids: HashSet<&str> = moved.iter().map(|e| e.i.as_str()).collect();
        assert_eq!(ids.len(), 2);
        let b = moved.iter().find(|e| e.i == "b").unwrap();
        assert_eq!((b.x, b.y), (0, 0));
    }

    #[test]
    fn test_move_item_clamps_to_grid_width() {
        let layout = [entry("a", 0, 0, 4, 2)];
        let moved = move_item(&layout, "a", 20, 0);
        assert_eq!(moved[0].x, GRID_COLS - 4);
    }

    #[test]
    fn test_resize_respects_minimums() {
        let layout = [entry("a", 0, 0, 4, 4)];
        let resized = resize_item(&layout, "a", 1, 1);
        assert_eq!((resized[0].w, resized[0].h), (2, 2));
    }

    #[test]
    fn test_resize_pushes_lower_items_down() {
        let layout = [entry("a", 0, 0, 4, 2), entry("b", 0, 2, 4, 2)];
        let resized = resize_item(&layout, "a", 4, 4);
        let b = resized.iter().find(|e| e.i == "b").unwrap();
        assert_eq!(b.y, 4);
        assert_no_overlaps(&resized);
    }

    #[test]
    fn test_find_free_position_fills_gaps_first() {
        let layout = [entry("a", 0, 0, 6, 4)];
        assert_eq!(find_free_position(&layout, 6, 4), (6, 0));
        let full_row = [entry("a", 0, 0, 12, 4)];
        assert_eq!(find_free_position(&full_row, 6, 4), (0, 4));
    }

    #[test]
    fn test_bottom_of_empty_layout() {
        assert_eq!(bottom(&[]), 0);
        assert_eq!(find_free_position(&[], 6, 4), (0, 0));
    }
}
