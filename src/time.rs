use hifitime::{Duration, Epoch};
use std::str::FromStr;
use tracing::warn;

use crate::{constants::JulianDate, planet_errors::PlanetError};

/// Source of "now" for cache expiry and status timestamps
pub trait Clock: Send + Sync {
    fn now(&self) -> Epoch;
}

/// Wall clock of the host
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    /// Current UTC epoch. When the host clock cannot be read, the failure is logged
    /// and the Unix epoch is returned.
    fn now(&self) -> Epoch {
        Epoch::now().unwrap_or_else(|err| {
            warn!(%err, "system clock unreadable, falling back to the Unix epoch");
            Epoch::from_unix_seconds(0.0)
        })
    }
}

/// Parse a civil timestamp (e.g. `2023-01-01T00:00:00`) into an [`Epoch`].
///
/// Strings without a time scale suffix are read as UTC.
///
/// Return
/// ------
/// * the parsed epoch, or [`PlanetError::InvalidInstant`] if the string is not a valid date
pub fn parse_instant(date: &str) -> Result<Epoch, PlanetError> {
    Epoch::from_str(date.trim())
        .map_err(|err| PlanetError::InvalidInstant(format!("{date}: {err}")))
}

/// Transformation from a civil UTC instant to Julian date (JD)
///
/// Uses the integer Gregorian day-number arithmetic and adds the fraction of day
/// `(hour + minute/60 + second/3600) / 24`, counted from midnight. Sub-second
/// parts and leap seconds are ignored.
///
/// Argument
/// --------
/// * `instant`: the civil instant, read on the UTC scale
///
/// Return
/// ------
/// * the Julian date, or [`PlanetError::InvalidInstant`] when the date predates the
///   validity of the day-number formula (before 1 March -4800)
pub fn to_julian_date(instant: &Epoch) -> Result<JulianDate, PlanetError> {
    let (year, month, day, hour, minute, second, _nanos) = instant.to_gregorian_utc();

    let a = (14 - i64::from(month)) / 12;
    let y = i64::from(year) + 4800 - a;
    let m = i64::from(month) + 12 * a - 3;

    if y < 0 {
        return Err(PlanetError::InvalidInstant(format!(
            "year {year} is outside the Gregorian day-number range"
        )));
    }

    let day_number = i64::from(day) + (153 * m + 2) / 5 + 365 * y + y / 4 - y / 100 + y / 400
        - 32045;

    let day_fraction =
        (f64::from(hour) + f64::from(minute) / 60.0 + f64::from(second) / 3600.0) / 24.0;

    // the day number starts at noon, civil days start half a day earlier
    Ok(day_number as f64 - 0.5 + day_fraction)
}

/// Format an instant the way the Horizons API expects its `TLIST` entries
/// (`YYYY-MM-DD HH:MM`, UTC), rounded to the nearest minute (half a minute rounds up).
/// This string is also the minute-resolution cache key.
pub fn horizons_timestamp(instant: &Epoch) -> String {
    let (_, _, _, _, _, second, _) = instant.to_gregorian_utc();
    let rounded = if second >= 30 {
        *instant + Duration::from_seconds(60.0)
    } else {
        *instant
    };
    let (year, month, day, hour, minute, _, _) = rounded.to_gregorian_utc();
    format!("{year:04}-{month:02}-{day:02} {hour:02}:{minute:02}")
}
