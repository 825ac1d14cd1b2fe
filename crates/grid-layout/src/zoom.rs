//! Presentation zoom
//!
//! A display-only transform over the whole canvas. Stored layout
//! coordinates are never affected by the zoom level.

use serde::{Deserialize, Serialize};

pub const ZOOM_MIN: u32 = 50;
pub const ZOOM_MAX: u32 = 200;
pub const ZOOM_STEP: u32 = 25;
pub const ZOOM_DEFAULT: u32 = 100;

/// Canvas zoom percentage, stepped and clamped
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Zoom(u32);

impl Default for Zoom {
    fn default() -> Self {
        Zoom(ZOOM_DEFAULT)
    }
}

impl Zoom {
    pub fn new(percent: u32) -> Self {
        let stepped = (percent / ZOOM_STEP) * ZOOM_STEP;
        Zoom(stepped.clamp(ZOOM_MIN, ZOOM_MAX))
    }

    pub fn percent(&self) -> u32 {
        self.0
    }

    /// CSS scale factor.
    pub fn scale(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    pub fn zoom_in(&self) -> Self {
        Zoom((self.0 + ZOOM_STEP).min(ZOOM_MAX))
    }

    pub fn zoom_out(&self) -> Self {
        Zoom(self.0.saturating_sub(ZOOM_STEP).max(ZOOM_MIN))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clamps_and_steps() {
        assert_eq!(Zoom::new(10).percent(), ZOOM_MIN);
        assert_eq!(Zoom::new(500).percent(), ZOOM_MAX);
        assert_eq!(Zoom::new(130).percent(), 125);
    }

    #[test]
    fn test_step_bounds() {
        let mut zoom = Zoom::default();
        for _ in 0..10 {
            zoom = zoom.zoom_in();
        }
        assert_eq!(zoom.percent(), ZOOM_MAX);
        for _ in 0..10 {
            zoom = zoom.zoom_out();
        }
        assert_eq!(zoom.percent(), ZOOM_MIN);
    }

    #[test]
    fn test_scale() {
        assert_eq!(Zoom::new(150).scale(), 1.5);
        assert_eq!(Zoom::default().scale(), 1.0);
    }
}
