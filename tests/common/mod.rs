#![allow(dead_code)]

//! Shared helpers for integration tests: export-text builders and direct
//! record construction against the production calendar.

use chrono::{NaiveDate, NaiveTime};
use meterstat::timezone::{Calendar, ZoneCalendar};
use meterstat::types::UsageRecord;

pub const HEADER: &str = "TYPE,DATE,START TIME,END TIME,IMPORT (kWh),EXPORT (kWh),NOTES";

/// Build a full export text: metadata preamble, header line, then rows.
pub fn export_text(rows: &[String]) -> String {
    format!(
        "Name,ACME RESIDENT\nAddress,\"1 Main St, Anytown CA\"\nService,Electric\n\n{HEADER}\n{}",
        rows.concat()
    )
}

/// One interval row in the portal's shape.
pub fn usage_row(date: &str, start: &str, kwh: f64) -> String {
    format!("Electric usage,{date},{start},,{kwh},,\n")
}

/// A record resolved through the production calendar.
pub fn record(date: NaiveDate, hour: u32, minute: u32, kwh: f64, source: &str) -> UsageRecord {
    let cal = ZoneCalendar::default();
    let time = NaiveTime::from_hms_opt(hour, minute, 0).unwrap();
    UsageRecord {
        timestamp: cal.resolve_instant(date, time),
        civil_date: date,
        local_start_time: time,
        import_kwh: kwh,
        source: source.to_string(),
        synthetic: false,
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}
