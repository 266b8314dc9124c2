//! Export normalization and row parsing
//!
//! Utility portal exports open with a multi-row account-metadata preamble
//! (sometimes behind a byte-order mark) before the actual interval table.
//! Parsing first locates the fixed header line, then reads interval rows from
//! there, deriving each record's absolute instant from the local wall-clock
//! fields.

use crate::error::{MeterstatError, Result};
use crate::timezone::Calendar;
use crate::types::UsageRecord;
use chrono::{NaiveDate, NaiveTime};
use csv::{ReaderBuilder, Trim};
use tracing::{debug, warn};

/// The interval table's header line starts with these fixed column names;
/// everything above it is preamble and is discarded.
pub const EXPORT_HEADER_PREFIX: &str = "TYPE,DATE,START TIME,END TIME,IMPORT (kWh)";

const DATE_COLUMN: &str = "DATE";
const START_TIME_COLUMN: &str = "START TIME";
const IMPORT_COLUMN: &str = "IMPORT (kWh)";

/// Strip a leading BOM and the metadata preamble, returning the text from the
/// header line onward. `None` if no header line exists.
fn normalize_export(text: &str) -> Option<&str> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut from = 0;
    while let Some(found) = text[from..].find(EXPORT_HEADER_PREFIX) {
        let at = from + found;
        if at == 0 || text.as_bytes()[at - 1] == b'\n' {
            return Some(&text[at..]);
        }
        from = at + EXPORT_HEADER_PREFIX.len();
    }
    None
}

/// Parse one export's text into interval records, ascending by instant.
///
/// Rows with an empty `DATE` or `START TIME` are dropped silently (the format
/// allows blank trailer rows); rows whose date/time fields fail to parse are
/// dropped with a warning. A missing or non-numeric import field degrades to
/// `0.0` rather than failing the row.
///
/// # Errors
///
/// [`MeterstatError::MalformedSource`] if the text contains no interval
/// header line.
pub fn parse_export(
    text: &str,
    source: &str,
    calendar: &dyn Calendar,
) -> Result<Vec<UsageRecord>> {
    let body = normalize_export(text).ok_or_else(|| MeterstatError::MalformedSource {
        file: source.to_string(),
    })?;

    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(body.as_bytes());
    let headers = reader.headers()?.clone();
    let column = |name: &str| headers.iter().position(|h| h == name);
    let (date_idx, time_idx, import_idx) =
        match (column(DATE_COLUMN), column(START_TIME_COLUMN), column(IMPORT_COLUMN)) {
            (Some(d), Some(t), Some(i)) => (d, t, i),
            _ => {
                return Err(MeterstatError::MalformedSource {
                    file: source.to_string(),
                });
            }
        };

    let mut records = Vec::new();
    for row in reader.records() {
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                warn!("skipping unreadable row in {source}: {e}");
                continue;
            }
        };

        let date_field = row.get(date_idx).unwrap_or("").trim();
        let time_field = row.get(time_idx).unwrap_or("").trim();
        if date_field.is_empty() || time_field.is_empty() {
            // Blank trailer rows are expected in these exports.
            continue;
        }

        let (civil_date, local_start_time) = match parse_local_fields(date_field, time_field) {
            Ok(fields) => fields,
            Err(e) => {
                warn!("dropping row with malformed timestamp in {source}: {e}");
                continue;
            }
        };

        let import_kwh = row.get(import_idx).map_or(0.0, parse_kwh);

        records.push(UsageRecord {
            timestamp: calendar.resolve_instant(civil_date, local_start_time),
            civil_date,
            local_start_time,
            import_kwh,
            source: source.to_string(),
            synthetic: false,
        });
    }

    // Source rows are expected to already be time-ordered; sort anyway.
    records.sort_by_key(|r| r.timestamp);
    debug!("parsed {} interval rows from {source}", records.len());
    Ok(records)
}

fn parse_local_fields(date: &str, time: &str) -> Result<(NaiveDate, NaiveTime)> {
    let civil_date = NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|e| {
        MeterstatError::InvalidTimestamp {
            field: date.to_string(),
            detail: e.to_string(),
        }
    })?;
    let local_start_time = NaiveTime::parse_from_str(time, "%H:%M").map_err(|e| {
        MeterstatError::InvalidTimestamp {
            field: time.to_string(),
            detail: e.to_string(),
        }
    })?;
    Ok((civil_date, local_start_time))
}

/// The measured quantity degrades gracefully: missing, non-numeric, or
/// non-finite values become `0.0`.
fn parse_kwh(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}
