use crate::{
    bodies::Body,
    constants::{AstronomicalUnit, Magnitude},
    planet_errors::PlanetError,
};

/// Reference brightness of each body at one astronomical unit from the observer
fn base_magnitude(body: Body) -> Magnitude {
    match body {
        Body::Mercury => -0.4,
        Body::Venus => -4.4,
        Body::Mars => -2.9,
        Body::Jupiter => -2.9,
        Body::Saturn => 0.4,
        Body::Uranus => 5.7,
        Body::Neptune => 7.8,
    }
}

/// Estimate the apparent visual magnitude of `body` seen from `geo_distance_au`.
///
/// `magnitude = base + 5 log10(distance)`. A non-positive or non-finite distance means
/// an upstream invariant was broken and is returned as [`PlanetError::InvalidDistance`].
pub fn estimate_magnitude(
    body: Body,
    geo_distance_au: AstronomicalUnit,
) -> Result<Magnitude, PlanetError> {
    if !geo_distance_au.is_finite() || geo_distance_au <= 0.0 {
        return Err(PlanetError::InvalidDistance(geo_distance_au));
    }
    Ok(base_magnitude(body) + 5.0 * geo_distance_au.log10())
}
