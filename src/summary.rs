use std::collections::BTreeMap;

use itertools::{Itertools, MinMaxResult};

use crate::{
    bodies::Body,
    constants::{AstronomicalUnit, Degree, JulianDate, Magnitude},
    position::PositionSample,
};

/// Aggregate figures over the bodies of one request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateSummary {
    pub julian_date: JulianDate,
    pub body_count: usize,
    pub mean_geo_distance_au: AstronomicalUnit,
    pub mean_helio_distance_au: AstronomicalUnit,
    /// lowest magnitude, i.e. the brightest body
    pub brightest_magnitude: Magnitude,
    /// spread between the largest and smallest heliocentric longitude
    pub helio_longitude_range: Degree,
    pub max_abs_helio_latitude: Degree,
    pub farthest_helio_distance_au: AstronomicalUnit,
}

impl CoordinateSummary {
    /// Summarize a set of positions, `None` when there is nothing to summarize.
    pub fn from_positions(
        julian_date: JulianDate,
        positions: &BTreeMap<Body, PositionSample>,
    ) -> Option<Self> {
        if positions.is_empty() {
            return None;
        }
        let samples = positions.values();
        let count = positions.len() as f64;

        let helio_longitude_range = match samples
            .clone()
            .map(|s| s.helio_longitude())
            .minmax_by(f64::total_cmp)
        {
            MinMaxResult::NoElements | MinMaxResult::OneElement(_) => 0.0,
            MinMaxResult::MinMax(min, max) => max - min,
        };

        Some(CoordinateSummary {
            julian_date,
            body_count: positions.len(),
            mean_geo_distance_au: samples.clone().map(|s| s.geo_distance_au()).sum::<f64>()
                / count,
            mean_helio_distance_au: samples
                .clone()
                .map(|s| s.helio_distance_au())
                .sum::<f64>()
                / count,
            brightest_magnitude: samples
                .clone()
                .map(|s| s.magnitude())
                .fold(f64::INFINITY, f64::min),
            helio_longitude_range,
            max_abs_helio_latitude: samples
                .clone()
                .map(|s| s.helio_latitude().abs())
                .fold(0.0, f64::max),
            farthest_helio_distance_au: samples
                .map(|s| s.helio_distance_au())
                .fold(0.0, f64::max),
        })
    }
}
