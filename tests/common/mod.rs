#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use async_trait::async_trait;
use hifitime::Epoch;
use planetpos::{
    arbitrator::SourceArbitrator,
    env_state::EphemerisConfig,
    horizons::{FetchError, RawRemoteRecord, RemoteEphemerisSource},
    time::Clock,
};

/// Minimal Horizons JSON answer carrying one observer-table row.
pub fn horizons_payload(ra: f64, dec: f64, magnitude: &str, lon: f64, lat: f64, r: f64, delta: f64) -> String {
    let table = format!(
        "
 Date__(UT)__HR:MN, , , R.A._(ICRF), DEC__(ICRF), APmag, S-brt, hEcl-Lon, hEcl-Lat, r, rdot, delta, deldot,
**********************************************************************************************************
$$SOE
 2023-Jan-01 00:00, , , {ra}, {dec}, {magnitude}, 4.3, {lon}, {lat}, {r}, 0.4, {delta}, 11.4,
$$EOE
**********************************************************************************************************
"
    );
    serde_json::json!({
        "signature": {"source": "NASA/JPL Horizons API", "version": "1.2"},
        "result": table,
    })
    .to_string()
}

pub fn mars_payload() -> String {
    horizons_payload(71.49187, 24.92003, "-1.215", 80.7316, 1.3012, 1.551345011425, 0.60963744718951)
}

/// Remote source answering from a fixed script, keyed by remote id.
/// Ids missing from the script answer with a valid generic table.
pub struct ScriptedSource {
    script: HashMap<i32, Result<String, FetchError>>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl ScriptedSource {
    pub fn new() -> Self {
        ScriptedSource {
            script: HashMap::new(),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn answer(mut self, remote_id: i32, answer: Result<String, FetchError>) -> Self {
        self.script.insert(remote_id, answer);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemoteEphemerisSource for ScriptedSource {
    async fn fetch(
        &self,
        remote_id: i32,
        _instant: &str,
        _observer_code: &str,
    ) -> Result<RawRemoteRecord, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match self.script.get(&remote_id) {
            Some(answer) => answer.clone().map(RawRemoteRecord::new),
            None => Ok(RawRemoteRecord::new(horizons_payload(
                10.0 * remote_id as f64,
                5.0,
                "1.0",
                20.0 * remote_id as f64,
                0.5,
                remote_id as f64,
                remote_id as f64 + 0.5,
            ))),
        }
    }
}

/// Clock that only moves when told to
pub struct ManualClock {
    now: Mutex<Epoch>,
}

impl ManualClock {
    pub fn new(start: Epoch) -> Self {
        ManualClock {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, seconds: f64) {
        let mut now = self.now.lock().unwrap();
        *now = *now + hifitime::Duration::from_seconds(seconds);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Epoch {
        *self.now.lock().unwrap()
    }
}

pub fn test_config() -> EphemerisConfig {
    EphemerisConfig {
        api_url: "http://127.0.0.1:9/horizons.api".into(),
        request_timeout: Duration::from_secs(2),
        ..EphemerisConfig::default()
    }
}

pub fn arbitrator(source: Arc<ScriptedSource>) -> SourceArbitrator {
    SourceArbitrator::new(source, test_config())
}

pub fn new_year_2023() -> Epoch {
    Epoch::from_gregorian_utc_at_midnight(2023, 1, 1)
}
