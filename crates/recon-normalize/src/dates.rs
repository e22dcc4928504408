//! Tolerant date parsing for ledger timestamps.
//!
//! Input columns arrive in two encodings: spreadsheet serial numbers
//! (days since 1899-12-30, fractional part carrying time of day) and
//! free text, parsed day-first. Unparseable cells become `None` and never
//! abort a batch.

use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};

/// Spreadsheet epoch used by the exports (Excel's day zero).
const SERIAL_EPOCH: (i32, u32, u32) = (1899, 12, 30);

/// Day-first text formats accepted, in trial order.
const TEXT_FORMATS: [&str; 8] = [
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d/%m/%Y",
    "%d-%m-%Y %H:%M:%S",
    "%d-%m-%Y",
    "%d/%m/%y",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d",
];

/// Interpret a spreadsheet serial number as a timestamp.
pub fn parse_serial_date(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let days = serial.trunc() as u64;
    let day_fraction = serial.fract();
    let (y, m, d) = SERIAL_EPOCH;
    let date = NaiveDate::from_ymd_opt(y, m, d)?.checked_add_days(Days::new(days))?;
    let seconds = (day_fraction * 86_400.0).round() as u32;
    let time = NaiveTime::from_num_seconds_from_midnight_opt(seconds.min(86_399), 0)?;
    Some(NaiveDateTime::new(date, time))
}

/// Parse a textual date cell, trying day-first formats before ISO.
pub fn parse_date_text(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    for format in TEXT_FORMATS {
        if format.contains("%H") {
            if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
                return Some(dt);
            }
        } else if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date.and_hms_opt(0, 0, 0)?);
        }
    }
    None
}

/// Parse one raw cell, deciding between serial and text encodings.
///
/// A cell that parses cleanly as a number is treated as a spreadsheet
/// serial; anything else goes through the text formats.
pub fn parse_date_cell(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(serial) = trimmed.parse::<f64>() {
        return parse_serial_date(serial);
    }
    parse_date_text(trimmed)
}

/// Parse a time-of-day cell (`HH:MM` or `HH:MM:SS`), used when the source
/// splits date and time across two columns.
pub fn parse_time_text(raw: &str) -> Option<NaiveTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    NaiveTime::parse_from_str(trimmed, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
        .ok()
}

/// Attach a time of day to a midnight timestamp. Timestamps that already
/// carry a time are left alone.
pub fn combine_date_time(date: NaiveDateTime, time: Option<NaiveTime>) -> NaiveDateTime {
    match time {
        Some(t) if date.time() == NaiveTime::MIN => NaiveDateTime::new(date.date(), t),
        _ => date,
    }
}
