use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_MILES_PER_DAY;
use crate::coordinates::Coordinate;
use crate::path_geometry::{distance_between, measure_path};

// Stored totals further than this from the recomputed value get a warning.
const TOTAL_DISTANCE_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorScheme {
    pub name: String,
    pub inner_color: String,
    pub outer_color: String,
}

impl ColorScheme {
    pub fn new(name: &str, inner_color: &str, outer_color: &str) -> Self {
        Self {
            name: name.to_string(),
            inner_color: inner_color.to_string(),
            outer_color: outer_color.to_string(),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::new("white", "white", "white")
    }
}

/// The plain stored form of a journey. It carries no behavior; convert it
/// with `Journey::from` before mutating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JourneyRecord {
    pub path: Vec<Coordinate>,
    pub total_distance: f64,
    pub miles_per_day: f64,
    pub color_scheme: ColorScheme,
}

/// One travel path drawn by the user.
///
/// `total_distance` is a cache of `measure_path(path)` in image pixels and is
/// recomputed by every mutation, so the fields stay private.
#[derive(Debug, Clone, PartialEq)]
pub struct Journey {
    path: Vec<Coordinate>,
    total_distance: f64,
    miles_per_day: f64,
    color_scheme: ColorScheme,
}

impl Journey {
    pub fn new(miles_per_day: f64, color_scheme: ColorScheme) -> Self {
        Self {
            path: Vec::new(),
            total_distance: 0.0,
            miles_per_day,
            color_scheme,
        }
    }

    pub fn path(&self) -> &[Coordinate] {
        &self.path
    }

    pub fn total_distance(&self) -> f64 {
        self.total_distance
    }

    pub fn miles_per_day(&self) -> f64 {
        self.miles_per_day
    }

    pub fn color_scheme(&self) -> &ColorScheme {
        &self.color_scheme
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    pub fn add_coordinate(&mut self, coordinate: Coordinate) {
        // same summation order as `measure_path`, so the cache stays exact
        if let Some(last) = self.path.last() {
            self.total_distance += distance_between(last, &coordinate);
        }
        self.path.push(coordinate);
    }

    /// Removes the last point. Returns `false` if the path was already empty.
    pub fn pop_coordinate(&mut self) -> bool {
        if self.path.pop().is_none() {
            return false;
        }
        self.total_distance = measure_path(&self.path);
        true
    }

    pub fn reset(&mut self) {
        self.path.clear();
        self.total_distance = 0.0;
    }

    /// Returns `false` and leaves the speed untouched unless `miles_per_day`
    /// is a positive finite number.
    pub fn set_miles_per_day(&mut self, miles_per_day: f64) -> bool {
        if !(miles_per_day.is_finite() && miles_per_day > 0.0) {
            return false;
        }
        self.miles_per_day = miles_per_day;
        true
    }

    pub fn to_record(&self) -> JourneyRecord {
        JourneyRecord {
            path: self.path.clone(),
            total_distance: self.total_distance,
            miles_per_day: self.miles_per_day,
            color_scheme: self.color_scheme.clone(),
        }
    }
}

impl Default for Journey {
    fn default() -> Self {
        Self::new(DEFAULT_MILES_PER_DAY, ColorScheme::default())
    }
}

impl From<JourneyRecord> for Journey {
    fn from(record: JourneyRecord) -> Self {
        let total_distance = measure_path(&record.path);
        if (total_distance - record.total_distance).abs() > TOTAL_DISTANCE_TOLERANCE {
            warn!(
                "[journey] stored total distance {} does not match path ({}), recomputing",
                record.total_distance, total_distance
            );
        }
        let miles_per_day = if record.miles_per_day.is_finite() && record.miles_per_day > 0.0 {
            record.miles_per_day
        } else {
            warn!(
                "[journey] invalid stored miles per day {}, using default",
                record.miles_per_day
            );
            DEFAULT_MILES_PER_DAY
        };
        Self {
            path: record.path,
            total_distance,
            miles_per_day,
            color_scheme: record.color_scheme,
        }
    }
}
