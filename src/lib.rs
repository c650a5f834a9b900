//! # planetpos
//!
//! Apparent and orbital positions of the planets at an arbitrary instant, in three
//! frames (geocentric equatorial, heliocentric ecliptic, heliocentric Cartesian).
//!
//! Positions come from the JPL Horizons service when it answers, and from a fast
//! local approximation model otherwise. The [`arbitrator::SourceArbitrator`] decides
//! per body, caches remote answers and tracks the health of the remote source;
//! every [`position::PositionSample`] says where it came from.

pub mod approximation;
pub mod arbitrator;
pub mod bodies;
pub mod constants;
pub mod conversion;
pub mod env_state;
pub mod ephem_cache;
pub mod horizons;
pub mod magnitude;
pub mod planet_errors;
pub mod position;
pub mod summary;
pub mod time;
