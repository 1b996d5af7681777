//! Date helpers shared by the request builders.
//!
//! The backend accepts date fields as `YYYY-MM-DD HH:mm:ss` built from local
//! wall-clock components. Callers may hand the client either a native date
//! value or a string they already formatted; only native values are
//! converted.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};

pub const BACKEND_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const DATE_ONLY_FORMAT: &str = "%Y-%m-%d";

/// A value convertible to local wall-clock time.
pub trait LocalDateTime {
    fn to_local_naive(&self) -> NaiveDateTime;
}

impl LocalDateTime for NaiveDateTime {
    fn to_local_naive(&self) -> NaiveDateTime {
        *self
    }
}

impl<Tz: TimeZone> LocalDateTime for DateTime<Tz> {
    fn to_local_naive(&self) -> NaiveDateTime {
        self.with_timezone(&Local).naive_local()
    }
}

/// Format `date` as `YYYY-MM-DD HH:mm:ss`; absent input yields `""`.
pub fn format_date_to_backend<D: LocalDateTime>(date: Option<&D>) -> String {
    date.map(|d| d.to_local_naive().format(BACKEND_DATE_FORMAT).to_string())
        .unwrap_or_default()
}

/// Format `date` as `YYYY-MM-DD`; absent input yields `""`.
///
/// The calendar day is taken in local time, the same as
/// [`format_date_to_backend`], so a timestamp shortly before local midnight
/// keeps its local day even when the UTC day has already rolled over.
pub fn format_date_only<D: LocalDateTime>(date: Option<&D>) -> String {
    date.map(|d| d.to_local_naive().format(DATE_ONLY_FORMAT).to_string())
        .unwrap_or_default()
}

/// Reduce a loosely formatted date string to `YYYY-MM-DD`.
///
/// Accepts compact `YYYYMMDD`, RFC 3339 timestamps (converted to local
/// time), backend-formatted timestamps and plain dates. Input that matches
/// none of these is returned unchanged.
pub fn normalize_date_string(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    if trimmed.len() == 8 && trimmed.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y%m%d") {
            return date.format(DATE_ONLY_FORMAT).to_string();
        }
        return raw.to_string();
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return format_date_only(Some(&dt));
    }
    for format in [BACKEND_DATE_FORMAT, "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return dt.date().format(DATE_ONLY_FORMAT).to_string();
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, DATE_ONLY_FORMAT) {
        return date.format(DATE_ONLY_FORMAT).to_string();
    }

    raw.to_string()
}

/// A date field as supplied by a caller.
///
/// `Native` holds local wall-clock time and is formatted before
/// transmission; `Text` is sent exactly as given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DateValue {
    Text(String),
    Native(NaiveDateTime),
}

impl DateValue {
    pub fn to_backend(&self) -> String {
        match self {
            DateValue::Text(text) => text.clone(),
            DateValue::Native(dt) => format_date_to_backend(Some(dt)),
        }
    }
}

impl From<NaiveDateTime> for DateValue {
    fn from(value: NaiveDateTime) -> Self {
        DateValue::Native(value)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for DateValue {
    fn from(value: DateTime<Tz>) -> Self {
        DateValue::Native(value.to_local_naive())
    }
}

impl From<&str> for DateValue {
    fn from(value: &str) -> Self {
        DateValue::Text(value.to_string())
    }
}

impl From<String> for DateValue {
    fn from(value: String) -> Self {
        DateValue::Text(value)
    }
}
