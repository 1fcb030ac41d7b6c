use itertools::Itertools;

use crate::coordinates::Coordinate;

pub fn distance_between(a: &Coordinate, b: &Coordinate) -> f64 {
    ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
}

// Sum of the segments in visiting order. Fewer than two points is zero.
pub fn measure_path(points: &[Coordinate]) -> f64 {
    points
        .iter()
        .tuple_windows()
        .map(|(prev, curr)| distance_between(prev, curr))
        .sum()
}
