/* Owns every journey of a session plus the "current" selection.

All index based operations silently ignore stale indices: the shell is a
direct-manipulation UI and a click on a just-deleted menu entry must not take
the session down.
*/

use rand::seq::IndexedRandom;
use rand::Rng;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

use crate::calibration::Calibration;
use crate::config::DEFAULT_MILES_PER_DAY;
use crate::coordinates::{to_image_space, Coordinate};
use crate::journey::{ColorScheme, Journey};
use crate::viewport::Viewport;

lazy_static! {
    pub static ref COLOR_SCHEMES: Vec<ColorScheme> = vec![
        ColorScheme::new("red", "#ff0000", "#8b0000"),
        ColorScheme::new("blue", "#0800ff", "#0f0063"),
        ColorScheme::new("yellow", "#f0bb35", "#bf8e11"),
        ColorScheme::new("green", "#4ec43f", "#2d9120"),
        ColorScheme::new("purple", "#a22ca8", "#6e1a73"),
        ColorScheme::new("lblue", "#60d4d6", "#3babad"),
        ColorScheme::new("orange", "#db8144", "#9c5221"),
    ];
}

/// Speed presets offered by the journey menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum TravelPace {
    ShipFast,
    ShipNormal,
    ShipSlow,
    FootFast,
    FootNormal,
    FootSlow,
}

impl TravelPace {
    pub fn miles_per_day(self) -> f64 {
        match self {
            TravelPace::ShipFast => 90.0,
            TravelPace::ShipNormal => 60.0,
            TravelPace::ShipSlow => 30.0,
            TravelPace::FootFast => 30.0,
            TravelPace::FootNormal => 24.0,
            TravelPace::FootSlow => 18.0,
        }
    }

    /// Every preset with its speed, in menu order.
    pub fn presets() -> Vec<(TravelPace, f64)> {
        TravelPace::iter()
            .map(|pace| (pace, pace.miles_per_day()))
            .collect()
    }
}

/// First palette entry whose name is not taken; once the palette is used up
/// any entry may repeat.
pub fn pick_color_scheme<R: Rng + ?Sized>(existing: &[Journey], rng: &mut R) -> ColorScheme {
    let available = COLOR_SCHEMES.iter().find(|scheme| {
        !existing
            .iter()
            .any(|journey| journey.color_scheme().name == scheme.name)
    });
    match available {
        Some(scheme) => scheme.clone(),
        None => COLOR_SCHEMES
            .choose(rng)
            .cloned()
            .unwrap_or_default(),
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct JourneyManager {
    journeys: Vec<Journey>,
    // meaningless while `journeys` is empty
    current_journey: usize,
}

impl JourneyManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a manager from stored parts, pulling an out-of-range current
    /// index back into the collection.
    pub fn from_parts(journeys: Vec<Journey>, current_journey: usize) -> Self {
        let clamped = current_journey.min(journeys.len().saturating_sub(1));
        if clamped != current_journey {
            warn!(
                "[journey_manager] current journey {} out of range, using {}",
                current_journey, clamped
            );
        }
        Self {
            journeys,
            current_journey: clamped,
        }
    }

    pub fn journeys(&self) -> &[Journey] {
        &self.journeys
    }

    pub fn len(&self) -> usize {
        self.journeys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.journeys.is_empty()
    }

    pub fn current_index(&self) -> Option<usize> {
        if self.journeys.is_empty() {
            None
        } else {
            Some(self.current_journey)
        }
    }

    /// The raw stored index, 0 for an empty collection.
    pub fn stored_current_index(&self) -> usize {
        self.current_journey
    }

    pub fn current_journey(&self) -> Option<&Journey> {
        self.journeys.get(self.current_journey)
    }

    fn current_journey_mut(&mut self) -> Option<&mut Journey> {
        self.journeys.get_mut(self.current_journey)
    }

    pub fn create_journey(&mut self) -> usize {
        self.create_journey_with_rng(&mut rand::rng())
    }

    pub fn create_journey_with_rng<R: Rng + ?Sized>(&mut self, rng: &mut R) -> usize {
        let color_scheme = pick_color_scheme(&self.journeys, rng);
        info!(
            "[journey_manager] creating journey {} with color {}",
            self.journeys.len() + 1,
            color_scheme.name
        );
        self.journeys
            .push(Journey::new(DEFAULT_MILES_PER_DAY, color_scheme));
        self.current_journey = self.journeys.len() - 1;
        self.current_journey
    }

    pub fn select_journey(&mut self, index: usize) -> bool {
        if index >= self.journeys.len() || index == self.current_journey {
            return false;
        }
        self.current_journey = index;
        true
    }

    pub fn delete_journey(&mut self, index: usize) -> bool {
        if index >= self.journeys.len() {
            debug!("[journey_manager] delete of stale index {}", index);
            return false;
        }
        self.journeys.remove(index);
        if self.current_journey >= index {
            self.current_journey = self.current_journey.saturating_sub(1);
        }
        true
    }

    pub fn reset_journey(&mut self, index: usize) -> bool {
        match self.journeys.get_mut(index) {
            Some(journey) => {
                let changed = !journey.is_empty();
                journey.reset();
                changed
            }
            None => false,
        }
    }

    pub fn undo_current(&mut self) -> bool {
        match self.current_journey_mut() {
            Some(journey) => journey.pop_coordinate(),
            None => false,
        }
    }

    /// Appends `coordinate` to the current journey, creating the first
    /// journey on demand.
    pub fn add_to_current(&mut self, coordinate: Coordinate) {
        if self.journeys.is_empty() {
            self.create_journey();
        }
        if let Some(journey) = self.current_journey_mut() {
            journey.add_coordinate(coordinate);
        }
    }

    /// Places a journey point from a screen position. Does nothing until the
    /// map scale has been calibrated.
    pub fn place_coordinate(
        &mut self,
        calibration: &Calibration,
        viewport: &Viewport,
        container_size: (f64, f64),
        screen_x: f64,
        screen_y: f64,
    ) -> bool {
        if !calibration.is_complete() {
            return false;
        }
        let (width, height) = container_size;
        let bbox = viewport.container_box(width, height);
        let coordinate = to_image_space(screen_x, screen_y, &bbox, viewport.scale());
        self.add_to_current(coordinate);
        true
    }

    pub fn set_speed(&mut self, miles_per_day: f64) -> bool {
        match self.current_journey_mut() {
            Some(journey) => journey.set_miles_per_day(miles_per_day),
            None => false,
        }
    }

    pub fn set_pace(&mut self, pace: TravelPace) -> bool {
        self.set_speed(pace.miles_per_day())
    }
}

#[cfg(test)]
mod tests {
    use crate::journey_manager::*;

    #[test]
    fn paces_are_positive() {
        for (pace, miles_per_day) in TravelPace::presets() {
            assert!(miles_per_day > 0.0, "{}", pace);
        }
    }

    #[test]
    fn from_parts_clamps_index() {
        let manager = JourneyManager::from_parts(vec![Journey::default(); 2], 7);
        assert_eq!(manager.current_index(), Some(1));
        let manager = JourneyManager::from_parts(Vec::new(), 3);
        assert_eq!(manager.current_index(), None);
        assert_eq!(manager.stored_current_index(), 0);
    }

    #[test]
    fn deleting_above_current_keeps_index() {
        let mut manager = JourneyManager::new();
        manager.create_journey();
        manager.create_journey();
        manager.create_journey();
        manager.select_journey(0);
        assert!(manager.delete_journey(2));
        assert_eq!(manager.current_index(), Some(0));
    }
}
