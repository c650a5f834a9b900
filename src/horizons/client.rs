use async_trait::async_trait;
use tracing::debug;

use super::{FetchError, RawRemoteRecord, RemoteEphemerisSource};
use crate::{env_state::EphemerisConfig, planet_errors::PlanetError};

/// Quantities requested from the observer table:
/// 1 = astrometric RA/DEC, 9 = visual magnitude, 18 = heliocentric ecliptic
/// lon/lat, 19 = heliocentric range, 20 = observer range
const QUANTITIES: &str = "'1,9,18,19,20'";

/// [`RemoteEphemerisSource`] backed by the JPL Horizons REST API.
#[derive(Debug, Clone)]
pub struct HorizonsClient {
    http_client: reqwest::Client,
    api_url: String,
}

impl HorizonsClient {
    /// Build a client whose every request is bounded by `config.request_timeout`.
    pub fn new(config: &EphemerisConfig) -> Result<Self, PlanetError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(HorizonsClient {
            http_client,
            api_url: config.api_url.clone(),
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

/// Query parameters of a single-instant observer ephemeris
pub(crate) fn request_params(
    remote_id: i32,
    instant: &str,
    observer_code: &str,
) -> Vec<(&'static str, String)> {
    vec![
        ("format", "json".into()),
        ("COMMAND", format!("'{remote_id}'")),
        ("OBJ_DATA", "'NO'".into()),
        ("MAKE_EPHEM", "'YES'".into()),
        ("EPHEM_TYPE", "'OBSERVER'".into()),
        ("CENTER", format!("'{observer_code}'")),
        ("TLIST_TYPE", "'CAL'".into()),
        ("TLIST", format!("'{instant}'")),
        ("QUANTITIES", QUANTITIES.into()),
        ("ANG_FORMAT", "'DEG'".into()),
        ("CSV_FORMAT", "'YES'".into()),
    ]
}

#[async_trait]
impl RemoteEphemerisSource for HorizonsClient {
    async fn fetch(
        &self,
        remote_id: i32,
        instant: &str,
        observer_code: &str,
    ) -> Result<RawRemoteRecord, FetchError> {
        debug!(remote_id, instant, observer_code, "requesting Horizons ephemeris");

        let response = self
            .http_client
            .get(&self.api_url)
            .query(&request_params(remote_id, instant, observer_code))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(FetchError::BadStatus(status.as_u16(), body));
        }
        if body.trim().is_empty() {
            return Err(FetchError::EmptyResult);
        }

        Ok(RawRemoteRecord::new(body))
    }
}
