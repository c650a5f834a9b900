//! # Position samples
//!
//! [`PositionSample`] is the complete, per-body result handed back to callers. It is
//! always fully populated in all three frames (geocentric equatorial, heliocentric
//! ecliptic, heliocentric Cartesian) and carries its provenance through
//! [`DataSource`] and [`Precision`], so approximate data can never pass for
//! high-precision data.

use std::fmt;

use nalgebra::Vector3;

use crate::{
    approximation::approximate_body,
    bodies::Body,
    constants::{AstronomicalUnit, Degree, Hour, JulianDate, Magnitude},
    conversion::{normalize, NormalizedCoordinates},
    magnitude::estimate_magnitude,
    planet_errors::PlanetError,
};

/// Where a [`PositionSample`] came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataSource {
    /// answered by the remote ephemeris service (or its cache)
    Remote,
    /// the remote service was asked and failed, the local model stood in
    Fallback,
    /// the remote service was not asked
    Local,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Precision {
    High,
    Approximate,
}

impl DataSource {
    /// The precision implied by a provenance tag.
    pub fn precision(&self) -> Precision {
        match self {
            DataSource::Remote => Precision::High,
            DataSource::Fallback | DataSource::Local => Precision::Approximate,
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DataSource::Remote => "REMOTE",
            DataSource::Fallback => "FALLBACK",
            DataSource::Local => "LOCAL",
        };
        write!(f, "{s}")
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Precision::High => "HIGH",
            Precision::Approximate => "APPROXIMATE",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionSample {
    coordinates: NormalizedCoordinates,
    magnitude: Magnitude,
    data_source: DataSource,
}

impl PositionSample {
    /// Build a sample from already normalized coordinates.
    pub(crate) fn new(
        coordinates: NormalizedCoordinates,
        magnitude: Magnitude,
        data_source: DataSource,
    ) -> Self {
        PositionSample {
            coordinates,
            magnitude,
            data_source,
        }
    }

    /// Run the local pipeline (approximation → normalization → magnitude) for one body,
    /// tagged [`DataSource::Local`].
    ///
    /// Arguments
    /// -----------------
    /// * `body`: the planet to compute
    /// * `jd`: the Julian date of the request
    ///
    /// Return
    /// ----------
    /// * the sample, or [`PlanetError::InvalidDistance`] if the model produced a null distance
    pub fn local(body: Body, jd: JulianDate) -> Result<Self, PlanetError> {
        Self::from_model(body, jd, DataSource::Local)
    }

    /// Same as [`PositionSample::local`], tagged [`DataSource::Fallback`] for a body
    /// whose remote resolution failed.
    pub fn fallback(body: Body, jd: JulianDate) -> Result<Self, PlanetError> {
        Self::from_model(body, jd, DataSource::Fallback)
    }

    /// Model output is never tagged [`DataSource::Remote`]: only the two public
    /// constructors above reach this.
    fn from_model(body: Body, jd: JulianDate, data_source: DataSource) -> Result<Self, PlanetError> {
        let coordinates = normalize(&approximate_body(body, jd));
        let magnitude = estimate_magnitude(body, coordinates.geo_distance_au)?;
        Ok(PositionSample::new(coordinates, magnitude, data_source))
    }

    pub fn ra_hours(&self) -> Hour {
        self.coordinates.ra_hours
    }

    pub fn ra_degrees(&self) -> Degree {
        self.coordinates.ra_degrees
    }

    pub fn dec_degrees(&self) -> Degree {
        self.coordinates.dec_degrees
    }

    pub fn geo_distance_au(&self) -> AstronomicalUnit {
        self.coordinates.geo_distance_au
    }

    pub fn helio_longitude(&self) -> Degree {
        self.coordinates.helio_longitude
    }

    pub fn helio_latitude(&self) -> Degree {
        self.coordinates.helio_latitude
    }

    pub fn helio_distance_au(&self) -> AstronomicalUnit {
        self.coordinates.helio_distance_au
    }

    pub fn helio_x(&self) -> AstronomicalUnit {
        self.coordinates.helio_x
    }

    pub fn helio_y(&self) -> AstronomicalUnit {
        self.coordinates.helio_y
    }

    pub fn helio_z(&self) -> AstronomicalUnit {
        self.coordinates.helio_z
    }

    /// Heliocentric ecliptic position vector (AU)
    pub fn helio_vector(&self) -> Vector3<f64> {
        Vector3::new(
            self.coordinates.helio_x,
            self.coordinates.helio_y,
            self.coordinates.helio_z,
        )
    }

    pub fn magnitude(&self) -> Magnitude {
        self.magnitude
    }

    pub fn data_source(&self) -> DataSource {
        self.data_source
    }

    pub fn precision(&self) -> Precision {
        self.data_source.precision()
    }
}

#[cfg(test)]
mod position_test {
    use super::*;

    #[test]
    fn test_precision_follows_source() {
        assert_eq!(DataSource::Remote.precision(), Precision::High);
        assert_eq!(DataSource::Fallback.precision(), Precision::Approximate);
        assert_eq!(DataSource::Local.precision(), Precision::Approximate);
    }

    #[test]
    fn test_local_sample() {
        let sample = PositionSample::local(Body::Saturn, 2459945.5).unwrap();
        assert_eq!(sample.data_source(), DataSource::Local);
        assert_eq!(sample.precision(), Precision::Approximate);
        assert_eq!(sample.ra_degrees(), sample.ra_hours() * 15.0);
        assert_eq!(sample.helio_vector().z, sample.helio_z());
    }

    #[test]
    fn test_model_samples_are_never_high_precision() {
        for jd in [2451545.0, 2459945.5, 2470000.25] {
            for body in Body::ALL {
                let local = PositionSample::local(body, jd).unwrap();
                let fallback = PositionSample::fallback(body, jd).unwrap();

                assert_eq!(local.data_source(), DataSource::Local);
                assert_eq!(fallback.data_source(), DataSource::Fallback);
                for sample in [local, fallback] {
                    assert_ne!(sample.data_source(), DataSource::Remote);
                    assert_eq!(sample.precision(), Precision::Approximate);
                }

                // same model output, only the provenance differs
                assert_eq!(local.ra_hours(), fallback.ra_hours());
                assert_eq!(local.magnitude(), fallback.magnitude());
            }
        }
    }

    #[test]
    fn test_display_tags() {
        assert_eq!(DataSource::Fallback.to_string(), "FALLBACK");
        assert_eq!(Precision::High.to_string(), "HIGH");
    }
}
