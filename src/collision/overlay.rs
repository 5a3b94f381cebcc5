use super::index::PixelCollisionIndex;
use crate::config::OverlaySettings;

/// Map tile size in pixels, used to convert display tiles to pixel offsets
pub const TILE_SIZE: f64 = 32.0;

/// How the host should draw the collision image over the map
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebugOverlay {
    pub blend: u8,
    pub opacity: u8,
}

impl DebugOverlay {
    /// Overlay parameters, or `None` when nothing should be drawn.
    ///
    /// Only shown during test play, with the overlay enabled and an image loaded.
    pub fn for_map(
        settings: &OverlaySettings,
        index: &PixelCollisionIndex,
        test_mode: bool,
    ) -> Option<Self> {
        if !(settings.show_map && test_mode && index.has_image()) {
            return None;
        }
        Some(Self {
            blend: settings.blend,
            opacity: settings.opacity,
        })
    }

    /// Sprite origin for the current scroll position (display coords are in tiles)
    pub fn origin(display_x: f64, display_y: f64) -> (f64, f64) {
        (display_x * TILE_SIZE, display_y * TILE_SIZE)
    }
}
