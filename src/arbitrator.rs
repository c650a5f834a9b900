//! # Source arbitration
//!
//! This module defines [`SourceArbitrator`](crate::arbitrator::SourceArbitrator), the entry
//! point of the crate. For one request it resolves every selected [`Body`] to a
//! [`PositionSample`], preferring the remote ephemeris and degrading to the local
//! approximation model when the remote side fails.
//!
//! ## Resolution of one body
//!
//! ```text
//! use_remote = false ──────────────────────────────► local model      LOCAL / APPROXIMATE
//! use_remote = true
//!   ├── cache hit ─────────────────────────────────► cached record    REMOTE / HIGH
//!   └── cache miss ─► fetch ─► parse ─► cache put ─► remote record    REMOTE / HIGH
//!                       │        │
//!                       └────────┴─ any failure ───► local model      FALLBACK / APPROXIMATE
//! ```
//!
//! Every body always yields a sample: a remote failure is never fatal, it is
//! recorded in the [`SourceStatus`] and counted in the [`QueryStats`]. There is no
//! retry within a request. The only hard errors are an instant outside the
//! Julian-date arithmetic ([`PlanetError::InvalidInstant`]) and a null distance
//! reaching the magnitude estimator ([`PlanetError::InvalidDistance`]).
//!
//! ## Concurrency
//!
//! The per-body resolutions of a request run concurrently inside a single future,
//! so a request costs about one fetch timeout rather than one per body. Cache and
//! status are each guarded by a mutex that is never held across an `.await`.
//! Dropping the future returned by [`SourceArbitrator::compute`] abandons the
//! in-flight fetches and discards partial results; answers already fetched stay
//! in the cache but the status is left untouched.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use planetpos::{arbitrator::SourceArbitrator, bodies::Body, env_state::EphemerisConfig, time::parse_instant};
//!
//! # async fn run() -> Result<(), planetpos::planet_errors::PlanetError> {
//! let arbitrator = SourceArbitrator::horizons(EphemerisConfig::default())?;
//! let instant = parse_instant("2023-01-01T00:00:00")?;
//!
//! let result = arbitrator.compute(&instant, &Body::ALL, true).await?;
//! for (body, sample) in &result.positions {
//!     println!("{body}: RA {:.4} h ({})", sample.ra_hours(), sample.data_source());
//! }
//! println!("success rate {:.2} %", result.stats.success_rate);
//! # Ok(())
//! # }
//! ```

use std::{
    collections::{BTreeMap, BTreeSet},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use futures_util::future::join_all;
use hifitime::Epoch;
use tracing::{debug, info, warn};

use crate::{
    bodies::Body,
    constants::JulianDate,
    env_state::EphemerisConfig,
    ephem_cache::{CacheKey, EphemerisCache},
    horizons::{
        client::HorizonsClient, parser::parse_record, FetchError, HorizonsRecord,
        RemoteEphemerisSource,
    },
    planet_errors::PlanetError,
    position::PositionSample,
    time::{horizons_timestamp, to_julian_date, Clock, SystemClock},
};

/// Health of the remote source, as seen by one arbitrator.
///
/// Within one request the outcomes are applied in [`Body`] order after every
/// fetch has settled, so `consecutive_failures` counts the failing bodies that
/// follow the last success in that order. A cancelled request applies nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceStatus {
    last_success_time: Option<Epoch>,
    last_error: Option<String>,
    consecutive_failures: u32,
}

impl SourceStatus {
    pub fn last_success_time(&self) -> Option<Epoch> {
        self.last_success_time
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    fn record_success(&mut self, now: Epoch) {
        self.last_success_time = Some(now);
        self.consecutive_failures = 0;
    }

    fn record_failure(&mut self, error: &PlanetError) {
        self.last_error = Some(error.to_string());
        self.consecutive_failures += 1;
    }
}

/// Remote outcome counts of one request
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct QueryStats {
    pub successful: usize,
    pub failed: usize,
    /// percentage in `[0, 100]`, zero when nothing was attempted
    pub success_rate: f64,
}

impl QueryStats {
    pub fn new(successful: usize, failed: usize) -> Self {
        let attempts = successful + failed;
        let success_rate = if attempts == 0 {
            0.0
        } else {
            successful as f64 / attempts as f64 * 100.0
        };
        QueryStats {
            successful,
            failed,
            success_rate,
        }
    }
}

/// Everything a caller gets back from [`SourceArbitrator::compute`]
#[derive(Debug, Clone)]
pub struct ComputationResult {
    pub julian_date: JulianDate,
    pub positions: BTreeMap<Body, PositionSample>,
    pub stats: QueryStats,
    pub status: SourceStatus,
}

/// How the remote side contributed to one body
enum RemoteOutcome {
    Cached,
    Fetched(Epoch),
    Failed(PlanetError),
}

pub struct SourceArbitrator {
    source: Arc<dyn RemoteEphemerisSource>,
    config: EphemerisConfig,
    cache: EphemerisCache,
    status: Mutex<SourceStatus>,
    clock: Arc<dyn Clock>,
}

impl SourceArbitrator {
    /// Construct an arbitrator around any remote source.
    ///
    /// Arguments
    /// -----------------
    /// * `source`: the high-precision source tried first for each body
    /// * `config`: observer code, fetch timeout and cache TTL
    pub fn new(source: Arc<dyn RemoteEphemerisSource>, config: EphemerisConfig) -> Self {
        SourceArbitrator {
            source,
            cache: EphemerisCache::new(config.cache_ttl),
            config,
            status: Mutex::new(SourceStatus::default()),
            clock: Arc::new(SystemClock),
        }
    }

    /// Construct an arbitrator querying JPL Horizons with `config`.
    pub fn horizons(config: EphemerisConfig) -> Result<Self, PlanetError> {
        let client = HorizonsClient::new(&config)?;
        Ok(SourceArbitrator::new(Arc::new(client), config))
    }

    /// Replace the wall clock used for cache expiry and status timestamps.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &EphemerisConfig {
        &self.config
    }

    pub fn cache(&self) -> &EphemerisCache {
        &self.cache
    }

    fn lock_status(&self) -> MutexGuard<'_, SourceStatus> {
        self.status.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the remote source health.
    pub fn status(&self) -> SourceStatus {
        self.lock_status().clone()
    }

    /// Compute the positions of `bodies` at `instant`.
    ///
    /// Return
    /// ----------
    /// * positions, remote statistics and a status snapshot taken after the request
    ///
    /// See also
    /// ------------
    /// * [`resolve_all`](crate::arbitrator::SourceArbitrator::resolve_all) – the resolution itself.
    pub async fn compute(
        &self,
        instant: &Epoch,
        bodies: &[Body],
        use_remote: bool,
    ) -> Result<ComputationResult, PlanetError> {
        let julian_date = to_julian_date(instant)?;
        let (positions, stats) = self.resolve_at(julian_date, instant, bodies, use_remote).await?;

        info!(
            julian_date,
            bodies = positions.len(),
            use_remote,
            successful = stats.successful,
            failed = stats.failed,
            "planetary positions computed"
        );

        Ok(ComputationResult {
            julian_date,
            positions,
            stats,
            status: self.status(),
        })
    }

    /// Resolve every body of `bodies` (duplicates are resolved once) at `instant`.
    ///
    /// Arguments
    /// -----------------
    /// * `bodies`: the selection, any order
    /// * `instant`: the UTC instant of the request
    /// * `use_remote`: `false` computes everything locally without touching the remote
    ///   source, the cache or the status
    ///
    /// Return
    /// ----------
    /// * one [`PositionSample`] per distinct body and the remote [`QueryStats`]
    pub async fn resolve_all(
        &self,
        bodies: &[Body],
        instant: &Epoch,
        use_remote: bool,
    ) -> Result<(BTreeMap<Body, PositionSample>, QueryStats), PlanetError> {
        let julian_date = to_julian_date(instant)?;
        self.resolve_at(julian_date, instant, bodies, use_remote).await
    }

    async fn resolve_at(
        &self,
        jd: JulianDate,
        instant: &Epoch,
        bodies: &[Body],
        use_remote: bool,
    ) -> Result<(BTreeMap<Body, PositionSample>, QueryStats), PlanetError> {
        let selection: BTreeSet<Body> = bodies.iter().copied().collect();

        if !use_remote {
            let positions = selection
                .into_iter()
                .map(|body| PositionSample::local(body, jd).map(|sample| (body, sample)))
                .collect::<Result<BTreeMap<_, _>, PlanetError>>()?;
            return Ok((positions, QueryStats::default()));
        }

        let timestamp = horizons_timestamp(instant);
        let resolutions = join_all(
            selection
                .iter()
                .map(|&body| self.resolve_remote(body, jd, &timestamp)),
        )
        .await;

        // status is updated in body order once every fetch has settled
        let mut positions = BTreeMap::new();
        let (mut successful, mut failed) = (0, 0);
        for (body, resolution) in selection.into_iter().zip(resolutions) {
            let (sample, outcome) = resolution?;
            match outcome {
                RemoteOutcome::Cached => successful += 1,
                RemoteOutcome::Fetched(at) => {
                    successful += 1;
                    self.lock_status().record_success(at);
                }
                RemoteOutcome::Failed(error) => {
                    failed += 1;
                    self.lock_status().record_failure(&error);
                }
            }
            positions.insert(body, sample);
        }

        Ok((positions, QueryStats::new(successful, failed)))
    }

    async fn resolve_remote(
        &self,
        body: Body,
        jd: JulianDate,
        timestamp: &str,
    ) -> Result<(PositionSample, RemoteOutcome), PlanetError> {
        let key = CacheKey::new(body.remote_id(), timestamp, self.config.observer_code.as_str());

        if let Some(record) = self.cache.get(&key, self.clock.now()) {
            debug!(%body, timestamp, "ephemeris cache hit");
            return Ok((record.to_position(body)?, RemoteOutcome::Cached));
        }

        match self.fetch_remote(body, timestamp).await {
            Ok((record, sample)) => {
                let now = self.clock.now();
                self.cache.put(key, record, now);
                Ok((sample, RemoteOutcome::Fetched(now)))
            }
            Err(error) => {
                warn!(%body, timestamp, %error, "remote ephemeris unavailable, using approximation");
                let sample = PositionSample::fallback(body, jd)?;
                Ok((sample, RemoteOutcome::Failed(error)))
            }
        }
    }

    /// One bounded fetch followed by parsing; any error here is recoverable.
    async fn fetch_remote(
        &self,
        body: Body,
        timestamp: &str,
    ) -> Result<(HorizonsRecord, PositionSample), PlanetError> {
        debug!(%body, timestamp, "fetching remote ephemeris");

        let raw = tokio::time::timeout(
            self.config.request_timeout,
            self.source
                .fetch(body.remote_id(), timestamp, &self.config.observer_code),
        )
        .await
        .map_err(|_| FetchError::Timeout)??;

        let record = parse_record(&raw)?;
        let sample = record.to_position(body)?;
        Ok((record, sample))
    }
}
