use thiserror::Error;

use crate::horizons::FetchError;

#[derive(Error, Debug)]
pub enum PlanetError {
    #[error("Invalid instant: {0}")]
    InvalidInstant(String),

    #[error("Non-positive or non-finite geocentric distance reached the magnitude estimator: {0}")]
    InvalidDistance(f64),

    #[error("Invalid body id: {0}")]
    InvalidBodyId(i32),

    #[error("Unknown body name: {0}")]
    UnknownBodyName(String),

    #[error("Unable to parse the Horizons payload: {0}")]
    Parse(String),

    #[error("Remote ephemeris fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("HTTP reqwest error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

impl PartialEq for PlanetError {
    fn eq(&self, other: &Self) -> bool {
        use PlanetError::*;
        match (self, other) {
            (InvalidInstant(a), InvalidInstant(b)) => a == b,
            (InvalidDistance(a), InvalidDistance(b)) => a.to_bits() == b.to_bits(),
            (InvalidBodyId(a), InvalidBodyId(b)) => a == b,
            (UnknownBodyName(a), UnknownBodyName(b)) => a == b,
            (Parse(a), Parse(b)) => a == b,
            (Fetch(a), Fetch(b)) => a == b,
            (InvalidConfig(a), InvalidConfig(b)) => a == b,

            // reqwest errors carry no comparable payload: same variant means equal
            (HttpClient(_), HttpClient(_)) => true,

            _ => false,
        }
    }
}
