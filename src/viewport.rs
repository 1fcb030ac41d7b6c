use serde::{Deserialize, Serialize};

use crate::config::ZoomConfig;
use crate::coordinates::{BoundingBox, Coordinate};
use crate::input::{Modifiers, PointerButton};

/// The persisted part of the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportRecord {
    pub scale: f64,
    pub position: Coordinate,
}

impl Default for ViewportRecord {
    fn default() -> Self {
        Self {
            scale: 1.0,
            position: Coordinate::default(),
        }
    }
}

/// Pan and zoom applied to the displayed image.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    config: ZoomConfig,
    scale: f64,
    position: Coordinate,
    is_dragging: bool,
    drag_start: Coordinate,
    hovering_menu: bool,
}

impl Viewport {
    pub fn new(config: ZoomConfig) -> Self {
        Self {
            config,
            scale: 1.0,
            position: Coordinate::default(),
            is_dragging: false,
            drag_start: Coordinate::default(),
            hovering_menu: false,
        }
    }

    pub fn from_record(config: ZoomConfig, record: &ViewportRecord) -> Self {
        let mut viewport = Self::new(config);
        if record.scale.is_finite() && record.scale > 0.0 {
            viewport.scale = record.scale.clamp(config.min_scale, config.max_scale);
        } else {
            warn!("[viewport] invalid stored scale {}, using 1", record.scale);
        }
        if record.position.x.is_finite() && record.position.y.is_finite() {
            viewport.position = record.position;
        }
        viewport
    }

    pub fn to_record(&self) -> ViewportRecord {
        ViewportRecord {
            scale: self.scale,
            position: self.position,
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn position(&self) -> Coordinate {
        self.position
    }

    pub fn is_dragging(&self) -> bool {
        self.is_dragging
    }

    pub fn is_hovering_menu(&self) -> bool {
        self.hovering_menu
    }

    /// Screen box of an image container of the given size, anchored at the
    /// screen origin and transformed around its center.
    pub fn container_box(&self, width: f64, height: f64) -> BoundingBox {
        BoundingBox {
            left: self.position.x + width * (1.0 - self.scale) / 2.0,
            top: self.position.y + height * (1.0 - self.scale) / 2.0,
        }
    }

    /// Plain primary clicks place points, so panning needs the middle button
    /// or ctrl/cmd + primary.
    pub fn begin_drag(&mut self, x: f64, y: f64, button: PointerButton, modifiers: Modifiers) -> bool {
        let is_pan_gesture = match button {
            PointerButton::Middle => true,
            PointerButton::Primary => modifiers.ctrl || modifiers.meta,
            PointerButton::Secondary => false,
        };
        if !is_pan_gesture {
            return false;
        }
        self.is_dragging = true;
        self.drag_start = Coordinate::new(x - self.position.x, y - self.position.y);
        true
    }

    pub fn drag_to(&mut self, x: f64, y: f64) -> bool {
        if !self.is_dragging {
            return false;
        }
        self.position = Coordinate::new(x - self.drag_start.x, y - self.drag_start.y);
        true
    }

    pub fn pan(&mut self, dx: f64, dy: f64) -> bool {
        if !self.is_dragging {
            return false;
        }
        self.position = Coordinate::new(self.position.x + dx, self.position.y + dy);
        true
    }

    pub fn end_drag(&mut self) -> bool {
        std::mem::replace(&mut self.is_dragging, false)
    }

    pub fn set_menu_hover(&mut self, hovering: bool) {
        self.hovering_menu = hovering;
    }

    /// Multiplies the scale by `factor`, clamped to the configured range. The
    /// position is rescaled by the factor actually applied so the view does
    /// not jump when the clamp kicks in.
    pub fn zoom(&mut self, factor: f64) -> bool {
        if !(factor.is_finite() && factor > 0.0) {
            debug!("[viewport] ignoring zoom factor {}", factor);
            return false;
        }
        let new_scale = (self.scale * factor).clamp(self.config.min_scale, self.config.max_scale);
        if new_scale == self.scale {
            return false;
        }
        let actual_factor = new_scale / self.scale;
        self.position = Coordinate::new(
            self.position.x * actual_factor,
            self.position.y * actual_factor,
        );
        self.scale = new_scale;
        true
    }

    pub fn wheel(&mut self, delta_y: f64) -> bool {
        if self.hovering_menu {
            return false;
        }
        let factor = if delta_y > 0.0 {
            self.config.wheel_out_factor
        } else {
            self.config.wheel_in_factor
        };
        self.zoom(factor)
    }

    pub fn zoom_in(&mut self) -> bool {
        self.zoom(self.config.button_in_factor)
    }

    pub fn zoom_out(&mut self) -> bool {
        self.zoom(self.config.button_out_factor)
    }

    pub fn reset_zoom(&mut self) -> bool {
        let changed = self.scale != 1.0 || self.position != Coordinate::default();
        self.scale = 1.0;
        self.position = Coordinate::default();
        changed
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(ZoomConfig::default())
    }
}
