//! Reader zoom level, in percent.

use serde::{Deserialize, Serialize};

pub const ZOOM_MIN: u32 = 50;
pub const ZOOM_MAX: u32 = 200;
pub const ZOOM_DEFAULT: u32 = 100;
pub const ZOOM_STEP: u32 = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zoom(u32);

impl Default for Zoom {
    fn default() -> Self {
        Zoom(ZOOM_DEFAULT)
    }
}

impl Zoom {
    pub fn percent(&self) -> u32 {
        self.0
    }

    pub fn scale(&self) -> f32 {
        self.0 as f32 / 100.0
    }

    pub fn can_zoom_in(&self) -> bool {
        self.0 < ZOOM_MAX
    }

    pub fn can_zoom_out(&self) -> bool {
        self.0 > ZOOM_MIN
    }

    /// Returns whether the level changed.
    pub fn zoom_in(&mut self) -> bool {
        let next = (self.0 + ZOOM_STEP).min(ZOOM_MAX);
        let changed = next != self.0;
        self.0 = next;
        changed
    }

    pub fn zoom_out(&mut self) -> bool {
        let next = self.0.saturating_sub(ZOOM_STEP).max(ZOOM_MIN);
        let changed = next != self.0;
        self.0 = next;
        changed
    }

    pub fn reset(&mut self) {
        self.0 = ZOOM_DEFAULT;
    }
}
