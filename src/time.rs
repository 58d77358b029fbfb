//! Time quantization.
//!
//! All solver arithmetic happens in integer minutes from the horizon
//! start. Quantization is exact: inputs must be minute-aligned (checked
//! during model construction), so the round-trip law
//! `to_instant(to_minutes(t, r), r) == t` holds for every aligned `t`.

use chrono::{DateTime, Duration, Timelike, Utc};

/// Whether an instant falls exactly on a minute boundary.
pub fn is_minute_aligned(instant: DateTime<Utc>) -> bool {
    instant.second() == 0 && instant.nanosecond() == 0
}

/// Converts an instant to whole minutes from `reference`.
///
/// Exact for minute-aligned inputs; the model builder rejects anything
/// else before this is called.
pub fn to_minutes(instant: DateTime<Utc>, reference: DateTime<Utc>) -> i64 {
    (instant - reference).num_minutes()
}

/// Converts a minute offset back to an instant.
pub fn to_instant(minutes: i64, reference: DateTime<Utc>) -> DateTime<Utc> {
    reference + Duration::minutes(minutes)
}
