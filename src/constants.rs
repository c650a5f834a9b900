//! # Constants and type definitions for planetpos
//!
//! This module centralizes the **conversion factors**, **model epochs** and **common type
//! aliases** used throughout the crate.
//!
//! ## Overview
//!
//! - Angular unit conversions (degrees ↔ radians, hours ↔ degrees)
//! - Reference epoch of the approximation model
//! - Default settings of the JPL Horizons transport
//! - Core type aliases

// -------------------------------------------------------------------------------------------------
// Unit conversions
// -------------------------------------------------------------------------------------------------

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Hours of right ascension → degrees
pub const HOURS_TO_DEG: f64 = 15.0;

/// Number of days in a Julian year
pub const DAYS_PER_JULIAN_YEAR: f64 = 365.25;

// -------------------------------------------------------------------------------------------------
// Model epochs
// -------------------------------------------------------------------------------------------------

/// Julian date at which the approximation model coefficients are anchored
pub const MODEL_EPOCH_JD: f64 = 2_459_000.0;

// -------------------------------------------------------------------------------------------------
// Remote source defaults
// -------------------------------------------------------------------------------------------------

/// JPL Horizons REST endpoint
pub const HORIZONS_API_URL: &str = "https://ssd.jpl.nasa.gov/api/horizons.api";

/// Horizons site code of the geocenter (`500` = body center, `@399` = Earth)
pub const GEOCENTER_OBSERVER: &str = "500@399";

/// Default request budget of one remote fetch, in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Default lifetime of a cached remote result, in seconds
pub const DEFAULT_CACHE_TTL_SECS: f64 = 3600.0;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;

/// Angle in hours of right ascension
pub type Hour = f64;

/// Distance in astronomical units
pub type AstronomicalUnit = f64;

/// Julian date (days)
pub type JulianDate = f64;

/// Apparent visual magnitude
pub type Magnitude = f64;
