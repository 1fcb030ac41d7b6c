use crate::journey::Journey;
use crate::journey_manager::JourneyManager;

fn real_distance(journey: &Journey, map_scale: f64) -> f64 {
    journey.total_distance() * map_scale
}

fn travel_days(journey: &Journey, map_scale: f64) -> f64 {
    real_distance(journey, map_scale) / journey.miles_per_day()
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Distance in real-world units, rounded to a whole number.
pub fn calculate_distance(journey: Option<&Journey>, map_scale: f64) -> f64 {
    match journey {
        Some(journey) => real_distance(journey, map_scale).round(),
        None => 0.0,
    }
}

/// Travel time in days, rounded to one decimal.
pub fn calculate_total_time(journey: Option<&Journey>, map_scale: f64) -> f64 {
    match journey {
        Some(journey) => round_to_tenth(travel_days(journey, map_scale)),
        None => 0.0,
    }
}

pub fn calculate_total_distance(journeys: &[Journey], map_scale: f64) -> f64 {
    journeys
        .iter()
        .map(|journey| real_distance(journey, map_scale))
        .sum::<f64>()
        .round()
}

pub fn calculate_total_time_all(journeys: &[Journey], map_scale: f64) -> f64 {
    round_to_tenth(
        journeys
            .iter()
            .map(|journey| travel_days(journey, map_scale))
            .sum(),
    )
}

#[derive(Debug, Clone, PartialEq)]
pub struct JourneySummary {
    pub title: String,
    pub color_name: String,
    pub inner_color: String,
    pub point_count: usize,
    pub distance: f64,
    pub travel_days: f64,
    pub miles_per_day: f64,
    pub selected: bool,
}

pub fn summarize(manager: &JourneyManager, map_scale: f64) -> Vec<JourneySummary> {
    let current = manager.current_index();
    manager
        .journeys()
        .iter()
        .enumerate()
        .map(|(i, journey)| JourneySummary {
            title: format!("Journey {}", i + 1),
            color_name: journey.color_scheme().name.clone(),
            inner_color: journey.color_scheme().inner_color.clone(),
            point_count: journey.path().len(),
            distance: calculate_distance(Some(journey), map_scale),
            travel_days: calculate_total_time(Some(journey), map_scale),
            miles_per_day: journey.miles_per_day(),
            selected: current == Some(i),
        })
        .collect()
}
