use nalgebra::Vector3;

use crate::{
    approximation::RawOrbitalParameters,
    constants::{AstronomicalUnit, Degree, Hour, HOURS_TO_DEG, RADEG},
};

/// Coordinates of one body after range normalization, in the three frames
/// exposed by [`PositionSample`](crate::position::PositionSample).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedCoordinates {
    pub ra_hours: Hour,
    pub ra_degrees: Degree,
    pub dec_degrees: Degree,
    pub geo_distance_au: AstronomicalUnit,
    pub helio_longitude: Degree,
    pub helio_latitude: Degree,
    pub helio_distance_au: AstronomicalUnit,
    pub helio_x: AstronomicalUnit,
    pub helio_y: AstronomicalUnit,
    pub helio_z: AstronomicalUnit,
}

/// Reduce `value` into `[0, modulus)`.
///
/// `rem_euclid` can round up to `modulus` itself for tiny negative inputs, which
/// would break the half-open range, so that case folds back to zero.
fn wrap(value: f64, modulus: f64) -> f64 {
    let reduced = value.rem_euclid(modulus);
    if reduced >= modulus {
        0.0
    } else {
        reduced
    }
}

/// Heliocentric ecliptic spherical coordinates to Cartesian, in the unit of `distance`.
///
/// Arguments
/// ---------
/// * `longitude`: ecliptic longitude in degrees
/// * `latitude`: ecliptic latitude in degrees
/// * `distance`: heliocentric distance
pub fn ecliptic_to_cartesian(longitude: Degree, latitude: Degree, distance: f64) -> Vector3<f64> {
    let (lon, lat) = (longitude * RADEG, latitude * RADEG);
    Vector3::new(
        distance * lat.cos() * lon.cos(),
        distance * lat.cos() * lon.sin(),
        distance * lat.sin(),
    )
}

/// Bring raw model output into canonical ranges and derive the Cartesian
/// heliocentric position.
///
/// * right ascension is reduced modulo 24 h, longitude modulo 360°
/// * declination and latitude are clamped to [-90°, 90°]
/// * distances are taken in absolute value
pub fn normalize(raw: &RawOrbitalParameters) -> NormalizedCoordinates {
    let ra_hours = wrap(raw.ra_hours_raw, 24.0);
    let helio_longitude = wrap(raw.helio_longitude_raw, 360.0);
    let helio_latitude = raw.helio_latitude_raw.clamp(-90.0, 90.0);
    let helio_distance_au = raw.helio_distance_raw.abs();

    let helio = ecliptic_to_cartesian(helio_longitude, helio_latitude, helio_distance_au);

    NormalizedCoordinates {
        ra_hours,
        ra_degrees: ra_hours * HOURS_TO_DEG,
        dec_degrees: raw.dec_degrees_raw.clamp(-90.0, 90.0),
        geo_distance_au: raw.geo_distance_au_raw.abs(),
        helio_longitude,
        helio_latitude,
        helio_distance_au,
        helio_x: helio.x,
        helio_y: helio.y,
        helio_z: helio.z,
    }
}

/// Format a right ascension as `HHh MMm SS.SSs`
pub fn format_ra_hms(ra_hours: Hour) -> String {
    let h = ra_hours.trunc();
    let minutes = (ra_hours - h) * 60.0;
    let m = minutes.trunc();
    let s = (minutes - m) * 60.0;
    format!("{:02}h {:02}m {:05.2}s", h as u32, m as u32, s)
}

/// Format a declination as `±DD° MM' SS.SS"`
pub fn format_dec_dms(dec_degrees: Degree) -> String {
    let sign = if dec_degrees >= 0.0 { '+' } else { '-' };
    let dec_abs = dec_degrees.abs();
    let d = dec_abs.trunc();
    let minutes = (dec_abs - d) * 60.0;
    let m = minutes.trunc();
    let s = (minutes - m) * 60.0;
    format!("{sign}{:02}° {:02}' {:05.2}\"", d as u32, m as u32, s)
}

/// Parse a right ascension string to degrees
///
/// Arguments
/// ---------
/// * `ra`: a string representing the right ascension in the format `HH MM SS.SS`
///
/// Returns
/// -------
/// * the right ascension in degrees, `None` if the input format is invalid
pub fn parse_ra_to_deg(ra: &str) -> Option<Degree> {
    let parts: Vec<&str> = ra.split_whitespace().collect();
    if parts.len() != 3 {
        return None;
    }

    let h: f64 = parts[0].parse().ok()?;
    let m: f64 = parts[1].parse().ok()?;
    let s: f64 = parts[2].parse().ok()?;

    Some((h + m / 60.0 + s / 3600.0) * HOURS_TO_DEG)
}

/// Parse a declination string to degrees
///
/// Arguments
/// ---------
/// * `dec`: a string representing the declination in the format `±DD MM SS.SS`
///
/// Returns
/// -------
/// * the declination in degrees, `None` if the input format is invalid
pub fn parse_dec_to_deg(dec: &str) -> Option<Degree> {
    let parts: Vec<&str> = dec.split_whitespace().collect();
    if parts.len() != 3 {
        return None;
    }

    let sign = if parts[0].starts_with('-') { -1.0 } else { 1.0 };
    let d: f64 = parts[0].trim_start_matches(&['-', '+'][..]).parse().ok()?;
    let m: f64 = parts[1].parse().ok()?;
    let s: f64 = parts[2].parse().ok()?;

    Some(sign * (d + m / 60.0 + s / 3600.0))
}

#[cfg(test)]
mod conversion_test {
    use super::*;
    use approx::assert_relative_eq;

    fn raw(ra: f64, dec: f64, lon: f64, lat: f64, r: f64) -> RawOrbitalParameters {
        RawOrbitalParameters {
            ra_hours_raw: ra,
            dec_degrees_raw: dec,
            geo_distance_au_raw: -1.5,
            helio_longitude_raw: lon,
            helio_latitude_raw: lat,
            helio_distance_raw: r,
        }
    }

    #[test]
    fn test_wrap_negative_values() {
        let norm = normalize(&raw(-1.0, 0.0, -30.0, 0.0, 1.0));
        assert_eq!(norm.ra_hours, 23.0);
        assert_eq!(norm.ra_degrees, 345.0);
        assert_eq!(norm.helio_longitude, 330.0);
    }

    #[test]
    fn test_wrap_never_reaches_modulus() {
        let norm = normalize(&raw(-1e-18, 0.0, -1e-15, 0.0, 1.0));
        assert!(norm.ra_hours < 24.0);
        assert!(norm.helio_longitude < 360.0);
    }

    #[test]
    fn test_clamp_and_abs() {
        let norm = normalize(&raw(100.0, 123.0, 720.0, -95.0, -2.0));
        assert_eq!(norm.ra_hours, 4.0);
        assert_eq!(norm.dec_degrees, 90.0);
        assert_eq!(norm.helio_longitude, 0.0);
        assert_eq!(norm.helio_latitude, -90.0);
        assert_eq!(norm.helio_distance_au, 2.0);
        assert_eq!(norm.geo_distance_au, 1.5);
    }

    #[test]
    fn test_cartesian() {
        let norm = normalize(&raw(0.0, 0.0, 90.0, 0.0, 2.0));
        assert_relative_eq!(norm.helio_x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(norm.helio_y, 2.0, epsilon = 1e-12);
        assert_relative_eq!(norm.helio_z, 0.0, epsilon = 1e-12);

        let pole = normalize(&raw(0.0, 0.0, 10.0, 90.0, 3.0));
        assert_relative_eq!(pole.helio_z, 3.0, epsilon = 1e-12);

        let norm = normalize(&raw(0.0, 0.0, 211.3, -12.7, 5.2));
        let radius = ecliptic_to_cartesian(norm.helio_longitude, norm.helio_latitude, 5.2).norm();
        assert_relative_eq!(radius, 5.2, max_relative = 1e-9);
    }

    #[test]
    fn test_format_ra_hms() {
        assert_eq!(format_ra_hms(6.5), "06h 30m 00.00s");
        assert_eq!(format_ra_hms(0.0), "00h 00m 00.00s");
        assert_eq!(format_ra_hms(23.75), "23h 45m 00.00s");
    }

    #[test]
    fn test_format_dec_dms() {
        assert_eq!(format_dec_dms(-23.5), "-23° 30' 00.00\"");
        assert_eq!(format_dec_dms(12.25), "+12° 15' 00.00\"");
        assert_eq!(format_dec_dms(0.0), "+00° 00' 00.00\"");
    }

    #[test]
    fn test_ra_to_deg() {
        assert_eq!(parse_ra_to_deg("22 52 23.37"), Some(343.097375));
        assert_eq!(parse_ra_to_deg("1 2 3.4.5"), None);
        assert_eq!(parse_ra_to_deg("1 2"), None);
    }

    #[test]
    fn test_dec_to_deg() {
        assert_eq!(parse_dec_to_deg("-00 30 14.2"), Some(-0.5039444444444444));
        assert_eq!(parse_dec_to_deg("+13 55 42.7"), Some(13.928527777777777));
        assert_eq!(parse_dec_to_deg("89 15"), None);
    }
}
