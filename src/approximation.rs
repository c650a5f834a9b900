//! # Local orbital approximation
//!
//! A deliberately simple, deterministic model producing *raw* (unbounded)
//! positions for each [`Body`] at a Julian date. Every quantity is a base value
//! plus either a linear drift in `dt = jd - MODEL_EPOCH_JD` or a sinusoidal
//! perturbation in `dt`.
//!
//! The model is illustrative only. It is the fallback used whenever the remote
//! Horizons source cannot answer, and the sole source in local mode. Its outputs
//! must be passed through [`normalize`](crate::conversion::normalize) before use.

use std::collections::BTreeMap;

use crate::{
    bodies::Body,
    constants::{AstronomicalUnit, Degree, Hour, JulianDate, DAYS_PER_JULIAN_YEAR, MODEL_EPOCH_JD},
};

/// Unnormalized output of the approximation model for one body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawOrbitalParameters {
    pub ra_hours_raw: Hour,
    pub dec_degrees_raw: Degree,
    pub geo_distance_au_raw: AstronomicalUnit,
    pub helio_longitude_raw: Degree,
    pub helio_latitude_raw: Degree,
    pub helio_distance_raw: AstronomicalUnit,
}

/// `base + amplitude * sin(dt * frequency)`
#[derive(Debug, Clone, Copy)]
struct Oscillation {
    base: f64,
    amplitude: f64,
    frequency: f64,
}

impl Oscillation {
    const fn new(base: f64, amplitude: f64, frequency: f64) -> Self {
        Oscillation {
            base,
            amplitude,
            frequency,
        }
    }

    fn at(&self, dt: f64) -> f64 {
        self.base + self.amplitude * (dt * self.frequency).sin()
    }
}

#[derive(Debug, Clone, Copy)]
struct Coefficients {
    /// hours, hours/day
    ra: (f64, f64),
    /// degrees, degrees/day
    dec: (f64, f64),
    geo_distance: Oscillation,
    /// degrees, degrees/year
    helio_longitude: (f64, f64),
    helio_latitude: Oscillation,
    helio_distance: Oscillation,
}

fn coefficients(body: Body) -> Coefficients {
    match body {
        Body::Mercury => Coefficients {
            ra: (15.5, 0.1),
            dec: (-23.2, 0.05),
            geo_distance: Oscillation::new(0.72, 0.1, 0.01),
            helio_longitude: (45.2, 4.09),
            helio_latitude: Oscillation::new(0.0, 2.1, 0.02),
            helio_distance: Oscillation::new(0.387, 0.08, 0.012),
        },
        Body::Venus => Coefficients {
            ra: (22.8, 0.08),
            dec: (-15.6, 0.03),
            geo_distance: Oscillation::new(1.02, 0.05, 0.008),
            helio_longitude: (178.3, 1.6),
            helio_latitude: Oscillation::new(0.0, 1.8, 0.015),
            helio_distance: Oscillation::new(0.723, 0.007, 0.009),
        },
        Body::Mars => Coefficients {
            ra: (8.2, 0.05),
            dec: (18.5, 0.02),
            geo_distance: Oscillation::new(1.85, 0.3, 0.005),
            helio_longitude: (289.7, 0.524),
            helio_latitude: Oscillation::new(0.0, 1.2, 0.008),
            helio_distance: Oscillation::new(1.524, 0.14, 0.006),
        },
        Body::Jupiter => Coefficients {
            ra: (5.8, 0.02),
            dec: (23.1, 0.01),
            geo_distance: Oscillation::new(5.95, 0.1, 0.002),
            helio_longitude: (67.8, 0.083),
            helio_latitude: Oscillation::new(0.0, 0.8, 0.003),
            helio_distance: Oscillation::new(5.203, 0.25, 0.004),
        },
        Body::Saturn => Coefficients {
            ra: (14.2, 0.015),
            dec: (-8.5, 0.008),
            geo_distance: Oscillation::new(9.8, 0.2, 0.001),
            helio_longitude: (156.4, 0.034),
            helio_latitude: Oscillation::new(0.0, 0.6, 0.002),
            helio_distance: Oscillation::new(9.537, 0.54, 0.003),
        },
        Body::Uranus => Coefficients {
            ra: (3.1, 0.01),
            dec: (17.8, 0.005),
            geo_distance: Oscillation::new(19.2, 0.1, 0.0008),
            helio_longitude: (45.9, 0.012),
            helio_latitude: Oscillation::new(0.0, 0.4, 0.001),
            helio_distance: Oscillation::new(19.19, 1.35, 0.002),
        },
        Body::Neptune => Coefficients {
            ra: (23.9, 0.008),
            dec: (-2.1, 0.003),
            geo_distance: Oscillation::new(30.1, 0.05, 0.0006),
            helio_longitude: (324.1, 0.006),
            helio_latitude: Oscillation::new(0.0, 0.3, 0.0008),
            helio_distance: Oscillation::new(30.07, 0.82, 0.001),
        },
    }
}

/// Raw orbital parameters of one body at the given Julian date.
pub fn approximate_body(body: Body, jd: JulianDate) -> RawOrbitalParameters {
    let c = coefficients(body);
    let dt = jd - MODEL_EPOCH_JD;

    RawOrbitalParameters {
        ra_hours_raw: c.ra.0 + c.ra.1 * dt,
        dec_degrees_raw: c.dec.0 + c.dec.1 * dt,
        geo_distance_au_raw: c.geo_distance.at(dt),
        helio_longitude_raw: c.helio_longitude.0 + c.helio_longitude.1 * dt / DAYS_PER_JULIAN_YEAR,
        helio_latitude_raw: c.helio_latitude.at(dt),
        helio_distance_raw: c.helio_distance.at(dt),
    }
}

/// Raw orbital parameters of every body at the given Julian date.
pub fn approximate(jd: JulianDate) -> BTreeMap<Body, RawOrbitalParameters> {
    Body::ALL
        .into_iter()
        .map(|body| (body, approximate_body(body, jd)))
        .collect()
}
