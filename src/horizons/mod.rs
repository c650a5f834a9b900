//! # Remote ephemeris source
//!
//! The high-precision side of the arbitration: a [`RemoteEphemerisSource`] answers
//! one body at one instant for one observer, or fails with a [`FetchError`].
//! The concrete transport is [`HorizonsClient`](crate::horizons::client::HorizonsClient),
//! which queries the JPL Horizons REST API. Tests substitute scripted sources.
//!
//! A successful fetch only yields the raw payload ([`RawRemoteRecord`]); turning it
//! into a [`HorizonsRecord`] is done by [`parse_record`](crate::horizons::parser::parse_record),
//! whose failures are handled exactly like transport failures by the caller.
//!
//! ## Structure
//!
//! ```text
//! horizons
//! ├── client   (reqwest transport)
//! └── parser   (JSON envelope + $$SOE/$$EOE CSV table)
//! ```

pub mod client;
pub mod parser;

use async_trait::async_trait;
use thiserror::Error;

use crate::{
    approximation::RawOrbitalParameters,
    bodies::Body,
    constants::{AstronomicalUnit, Degree, Magnitude, HOURS_TO_DEG},
    conversion::normalize,
    magnitude::estimate_magnitude,
    planet_errors::PlanetError,
    position::{DataSource, PositionSample},
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("remote ephemeris request timed out")]
    Timeout,

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("remote ephemeris answered with status {0}: {1}")]
    BadStatus(u16, String),

    #[error("remote ephemeris answered with an empty body")]
    EmptyResult,
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::Transport(err.to_string())
        }
    }
}

/// Unparsed answer of the remote service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRemoteRecord {
    pub payload: String,
}

impl RawRemoteRecord {
    pub fn new(payload: impl Into<String>) -> Self {
        RawRemoteRecord {
            payload: payload.into(),
        }
    }
}

/// Capability consumed by the [`SourceArbitrator`](crate::arbitrator::SourceArbitrator).
#[async_trait]
pub trait RemoteEphemerisSource: Send + Sync {
    /// Fetch the ephemeris of one body.
    ///
    /// Arguments
    /// -----------------
    /// * `remote_id`: Horizons id of the body (see [`Body::remote_id`])
    /// * `instant`: UTC instant formatted as `YYYY-MM-DD HH:MM`
    /// * `observer_code`: Horizons site code, e.g. `500@399` for the geocenter
    async fn fetch(
        &self,
        remote_id: i32,
        instant: &str,
        observer_code: &str,
    ) -> Result<RawRemoteRecord, FetchError>;
}

/// One parsed row of a Horizons observer table.
///
/// Only the columns needed to fill a [`PositionSample`] are kept. The apparent
/// magnitude is optional because Horizons reports `n.a.` for barycenters.
#[derive(Debug, Clone, PartialEq)]
pub struct HorizonsRecord {
    pub ra_degrees: Degree,
    pub dec_degrees: Degree,
    pub apparent_magnitude: Option<Magnitude>,
    pub helio_longitude: Degree,
    pub helio_latitude: Degree,
    pub helio_distance_au: AstronomicalUnit,
    pub geo_distance_au: AstronomicalUnit,
}

impl HorizonsRecord {
    /// Convert the record into a [`PositionSample`] tagged [`DataSource::Remote`].
    ///
    /// Remote values go through the same normalization as the local model so the
    /// range invariants hold whatever the service returns. When the table carries
    /// no magnitude, it is estimated from the geocentric distance.
    pub fn to_position(&self, body: Body) -> Result<PositionSample, PlanetError> {
        let coordinates = normalize(&RawOrbitalParameters {
            ra_hours_raw: self.ra_degrees / HOURS_TO_DEG,
            dec_degrees_raw: self.dec_degrees,
            geo_distance_au_raw: self.geo_distance_au,
            helio_longitude_raw: self.helio_longitude,
            helio_latitude_raw: self.helio_latitude,
            helio_distance_raw: self.helio_distance_au,
        });

        let magnitude = match self.apparent_magnitude {
            Some(magnitude) => magnitude,
            None => estimate_magnitude(body, coordinates.geo_distance_au)?,
        };

        Ok(PositionSample::new(
            coordinates,
            magnitude,
            DataSource::Remote,
        ))
    }
}
