use anyhow::Result;
use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::config::DEFAULT_DISTANCE_INPUT;
use crate::coordinates::Coordinate;
use crate::path_geometry::distance_between;

const NEUTRAL_MAP_SCALE: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum CalibrationStage {
    Unset,
    Point1Set,
    /// Both points are placed, waiting for the real-world distance.
    Point2Set,
    Complete,
}

/// Two-point scale calibration.
///
/// The stage is derived from the stored fields rather than kept separately,
/// so a snapshot restored from disk can never disagree with itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Calibration {
    pub point1: Option<Coordinate>,
    pub point2: Option<Coordinate>,
    pub distance_input: String,
    pub map_scale: f64,
    pub complete: bool,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            point1: None,
            point2: None,
            distance_input: DEFAULT_DISTANCE_INPUT.to_string(),
            map_scale: NEUTRAL_MAP_SCALE,
            complete: false,
        }
    }
}

impl Calibration {
    pub fn stage(&self) -> CalibrationStage {
        if self.complete {
            return CalibrationStage::Complete;
        }
        match (self.point1, self.point2) {
            (None, _) => CalibrationStage::Unset,
            (Some(_), None) => CalibrationStage::Point1Set,
            (Some(_), Some(_)) => CalibrationStage::Point2Set,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.stage() == CalibrationStage::Complete
    }

    /// Scale to apply to pixel distances. Neutral until calibration is done.
    pub fn effective_map_scale(&self) -> f64 {
        if self.is_complete() {
            self.map_scale
        } else {
            NEUTRAL_MAP_SCALE
        }
    }

    /// Places the next calibration point. A third click before completing or
    /// resetting is ignored and returns `false`.
    pub fn place_point(&mut self, coordinate: Coordinate) -> bool {
        match self.stage() {
            CalibrationStage::Unset => {
                self.point1 = Some(coordinate);
                true
            }
            CalibrationStage::Point1Set => {
                self.point2 = Some(coordinate);
                true
            }
            CalibrationStage::Point2Set | CalibrationStage::Complete => false,
        }
    }

    pub fn set_distance_input(&mut self, input: &str) -> bool {
        if self.distance_input == input {
            return false;
        }
        self.distance_input = input.to_string();
        true
    }

    /// Turns the two points and the distance input into a map scale.
    ///
    /// Any error leaves the calibration exactly as it was.
    pub fn submit(&mut self) -> Result<f64> {
        let (point1, point2) = match (self.stage(), self.point1, self.point2) {
            (CalibrationStage::Point2Set, Some(point1), Some(point2)) => (point1, point2),
            (stage, _, _) => bail!("cannot calibrate in stage {}", stage),
        };

        let distance: f64 = self
            .distance_input
            .trim()
            .parse()
            .map_err(|_| anyhow!("invalid distance input: {:?}", self.distance_input))?;
        if !distance.is_finite() || distance <= 0.0 {
            bail!("distance must be a positive number, got {}", distance);
        }

        let pixel_distance = distance_between(&point2, &point1);
        if pixel_distance == 0.0 {
            bail!("calibration points are identical");
        }

        let map_scale = distance / pixel_distance;
        if !map_scale.is_finite() {
            bail!("calibration produced a non-finite scale");
        }

        self.map_scale = map_scale;
        self.complete = true;
        Ok(map_scale)
    }

    /// Back to `Unset`. The distance input is kept so the user can reuse it.
    pub fn reset(&mut self) -> bool {
        let changed = self.stage() != CalibrationStage::Unset;
        self.point1 = None;
        self.point2 = None;
        self.complete = false;
        self.map_scale = NEUTRAL_MAP_SCALE;
        changed
    }

    /// Repairs a calibration loaded from storage: `complete` without both
    /// points, or with an unusable scale, is downgraded.
    pub fn sanitized(mut self) -> Self {
        let scale_ok = self.map_scale.is_finite() && self.map_scale > 0.0;
        if self.complete && (self.point1.is_none() || self.point2.is_none() || !scale_ok) {
            warn!("[calibration] stored calibration is inconsistent, resetting it");
            self.reset();
        } else if !scale_ok {
            self.map_scale = NEUTRAL_MAP_SCALE;
        }
        if self.point1.is_none() && self.point2.is_some() {
            self.point2 = None;
        }
        self
    }
}
