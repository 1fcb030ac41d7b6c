use crate::calibration::{Calibration, CalibrationStage};
use crate::config::RenderConfig;
use crate::journey::Journey;
use crate::renderer::surface::Surface;

/// Draws the journey overlay. The whole collection is redrawn from scratch on
/// every call, so the result only depends on the journeys passed in.
pub struct JourneyRenderer {
    config: RenderConfig,
}

impl JourneyRenderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn render<S: Surface + ?Sized>(&self, journeys: &[Journey], surface: &mut S) {
        surface.clear();
        for (i, journey) in journeys.iter().enumerate() {
            if journey.path().len() < 2 {
                continue;
            }
            if let Err(e) = surface.stroke_dashed_polyline(
                journey.path(),
                &journey.color_scheme().inner_color,
                self.config.line_width,
                &self.config.dash,
            ) {
                warn!("[renderer] failed to draw journey {}: {}", i + 1, e);
            }
        }
    }

    /// Dashed guide between the two calibration points while the distance
    /// is being entered. Draws on top of whatever is already there.
    pub fn render_calibration_guide<S: Surface + ?Sized>(
        &self,
        calibration: &Calibration,
        surface: &mut S,
    ) {
        if calibration.stage() != CalibrationStage::Point2Set {
            return;
        }
        if let (Some(point1), Some(point2)) = (calibration.point1, calibration.point2) {
            if let Err(e) = surface.stroke_dashed_polyline(
                &[point1, point2],
                self.config.calibration_guide_color,
                1.0,
                &self.config.dash,
            ) {
                warn!("[renderer] failed to draw calibration guide: {}", e);
            }
        }
    }
}

impl Default for JourneyRenderer {
    fn default() -> Self {
        Self::new(RenderConfig::default())
    }
}
