use serde::{Deserialize, Serialize};

/// A point in image space: already divided by the current zoom scale and
/// independent of the pan offset.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
}

impl Coordinate {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// On-screen position of the top-left corner of the image container.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingBox {
    pub left: f64,
    pub top: f64,
}

// Calibration points and journey points must both go through here so they
// share one coordinate space.
pub fn to_image_space(screen_x: f64, screen_y: f64, bbox: &BoundingBox, scale: f64) -> Coordinate {
    Coordinate {
        x: (screen_x - bbox.left) / scale,
        y: (screen_y - bbox.top) / scale,
    }
}
