use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use super::{HorizonsRecord, RawRemoteRecord};
use crate::{
    conversion::{parse_dec_to_deg, parse_ra_to_deg},
    planet_errors::PlanetError,
};

/// header line, asterisk separator, then the `$$SOE ... $$EOE` data block
static TABLE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)([^\n]*)\n\*+\s*\n\$\$SOE\s*\n(.*?)\$\$EOE")
        .expect("Horizons table regex is valid")
});

/// JSON envelope of the `horizons.api` endpoint when `format=json`
#[derive(Debug, Deserialize)]
struct HorizonsEnvelope {
    result: Option<String>,
    error: Option<String>,
}

/// Column positions of the fields of interest in the CSV header
#[derive(Debug)]
struct Columns {
    ra: usize,
    dec: usize,
    apparent_magnitude: Option<usize>,
    helio_longitude: usize,
    helio_latitude: usize,
    helio_distance: usize,
    geo_distance: usize,
}

fn column(
    header: &csv::StringRecord,
    name: &str,
    matches: impl Fn(&str) -> bool,
) -> Result<usize, PlanetError> {
    header
        .iter()
        .position(matches)
        .ok_or_else(|| PlanetError::Parse(format!("missing column {name}")))
}

impl Columns {
    fn from_header(header: &csv::StringRecord) -> Result<Self, PlanetError> {
        Ok(Columns {
            ra: column(header, "R.A.", |h| h.starts_with("R.A."))?,
            dec: column(header, "DEC", |h| h.starts_with("DEC"))?,
            apparent_magnitude: header.iter().position(|h| h == "APmag"),
            helio_longitude: column(header, "hEcl-Lon", |h| h == "hEcl-Lon")?,
            helio_latitude: column(header, "hEcl-Lat", |h| h == "hEcl-Lat")?,
            helio_distance: column(header, "r", |h| h == "r")?,
            geo_distance: column(header, "delta", |h| h == "delta")?,
        })
    }
}

fn field<'a>(row: &'a csv::StringRecord, index: usize, name: &str) -> Result<&'a str, PlanetError> {
    row.get(index)
        .ok_or_else(|| PlanetError::Parse(format!("row has no value for {name}")))
}

fn number(row: &csv::StringRecord, index: usize, name: &str) -> Result<f64, PlanetError> {
    let raw = field(row, index, name)?;
    let value: f64 = raw
        .parse()
        .map_err(|_| PlanetError::Parse(format!("{name} is not a number: '{raw}'")))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(PlanetError::Parse(format!("{name} is not finite")))
    }
}

/// Angles come in decimal degrees with `ANG_FORMAT=DEG`, sexagesimal otherwise.
fn angle(
    row: &csv::StringRecord,
    index: usize,
    name: &str,
    sexagesimal: fn(&str) -> Option<f64>,
) -> Result<f64, PlanetError> {
    let raw = field(row, index, name)?;
    if raw.contains(' ') {
        sexagesimal(raw).ok_or_else(|| PlanetError::Parse(format!("{name} is malformed: '{raw}'")))
    } else {
        number(row, index, name)
    }
}

/// Extract the first ephemeris row from the text of a Horizons observer table.
///
/// The table is located with a regex (the header is the line just above the
/// asterisk separator that precedes `$$SOE`), then header and first data row are
/// read with the CSV reader.
pub(crate) fn parse_table(text: &str) -> Result<HorizonsRecord, PlanetError> {
    let captures = TABLE_REGEX
        .captures(text)
        .ok_or_else(|| PlanetError::Parse("no $$SOE/$$EOE ephemeris table".into()))?;

    let header = captures.get(1).map_or("", |m| m.as_str());
    let first_row = captures
        .get(2)
        .map_or("", |m| m.as_str())
        .lines()
        .find(|line| !line.trim().is_empty())
        .ok_or_else(|| PlanetError::Parse("ephemeris table is empty".into()))?;

    let data = format!("{header}\n{first_row}");
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(data.as_bytes());

    let mut records = csv_reader.records();
    let mut next_record = |what: &str| -> Result<csv::StringRecord, PlanetError> {
        records
            .next()
            .ok_or_else(|| PlanetError::Parse(format!("missing {what}")))?
            .map_err(|err| PlanetError::Parse(format!("{what}: {err}")))
    };
    let header = next_record("table header")?;
    let row = next_record("table row")?;

    let columns = Columns::from_header(&header)?;

    let apparent_magnitude = match columns.apparent_magnitude {
        Some(index) => field(&row, index, "APmag")?.parse::<f64>().ok().filter(|m| m.is_finite()),
        None => None,
    };

    let record = HorizonsRecord {
        ra_degrees: angle(&row, columns.ra, "R.A.", parse_ra_to_deg)?,
        dec_degrees: angle(&row, columns.dec, "DEC", parse_dec_to_deg)?,
        apparent_magnitude,
        helio_longitude: number(&row, columns.helio_longitude, "hEcl-Lon")?,
        helio_latitude: number(&row, columns.helio_latitude, "hEcl-Lat")?,
        helio_distance_au: number(&row, columns.helio_distance, "r")?,
        geo_distance_au: number(&row, columns.geo_distance, "delta")?,
    };

    if record.geo_distance_au <= 0.0 {
        return Err(PlanetError::Parse(format!(
            "non-positive geocentric distance {}",
            record.geo_distance_au
        )));
    }

    Ok(record)
}

/// Parse a raw Horizons answer (`format=json`) into a [`HorizonsRecord`].
///
/// Return
/// ------
/// * the record, or [`PlanetError::Parse`] when the envelope reports an error or the
///   ephemeris table is missing or malformed
pub fn parse_record(raw: &RawRemoteRecord) -> Result<HorizonsRecord, PlanetError> {
    let envelope: HorizonsEnvelope = serde_json::from_str(&raw.payload)
        .map_err(|err| PlanetError::Parse(format!("invalid JSON envelope: {err}")))?;

    if let Some(error) = envelope.error {
        return Err(PlanetError::Parse(format!("Horizons error: {error}")));
    }

    let text = envelope
        .result
        .ok_or_else(|| PlanetError::Parse("JSON envelope has no result field".into()))?;

    parse_table(&text)
}
