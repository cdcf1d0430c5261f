// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting.
//!
//! Wheel of Life entries are keyed by a `"DD-Mon-YY"` date string (for example
//! `"04-Aug-26"`). The key doubles as the Firestore document id, so ordering
//! by it is NOT chronological; callers re-sort with [`parse_wheel_date`].

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Format a date as a wheel document key, e.g. `"04-Aug-26"`.
pub fn format_wheel_date(date: NaiveDate) -> String {
    date.format("%d-%b-%y").to_string()
}

/// Parse a wheel document key back into a date.
///
/// Returns `None` for malformed keys rather than erroring; stored data may
/// predate key validation.
pub fn parse_wheel_date(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key, "%d-%b-%y").ok()
}

/// Sort wheel date keys chronologically, oldest first.
///
/// Unparseable keys sort to the front in their original relative order.
pub fn sort_wheel_dates(keys: &mut [String]) {
    keys.sort_by_key(|k| parse_wheel_date(k));
}
