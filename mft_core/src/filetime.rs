//! Windows FILETIME → calendar date-time conversion.
//!
//! A FILETIME is a 64-bit count of 100-nanosecond ticks since
//! 1601-01-01 00:00:00 UTC.

use crate::error::{MftError, Result};
use chrono::{DateTime, TimeZone, Utc};

const WINDOWS_TICK: i64 = 10_000_000;
const SEC_TO_UNIX_EPOCH: i64 = 11_644_473_600;

/// Converts a raw FILETIME tick count to a UTC calendar date-time.
///
/// Returns [`MftError::InvalidTimestamp`] if the tick count does not
/// correspond to a representable calendar date-time; it never panics and
/// never corrupts surrounding reads.
pub fn filetime_to_datetime(ticks: u64) -> Result<DateTime<Utc>> {
    // A FILETIME is only ever meaningful up to i64::MAX ticks (year 30828);
    // above that there's no valid calendar date to recover, and casting
    // straight to i64 would silently wrap into a bogus negative value.
    let ticks_signed = i64::try_from(ticks).map_err(|_| MftError::InvalidTimestamp(ticks))?;
    let seconds = (ticks_signed / WINDOWS_TICK) - SEC_TO_UNIX_EPOCH;
    let nanos = ((ticks_signed % WINDOWS_TICK) * 100) as u32;
    Utc.timestamp_opt(seconds, nanos)
        .single()
        .ok_or(MftError::InvalidTimestamp(ticks))
}

/// Encodes a UTC calendar date-time back to raw FILETIME ticks. Used by this
/// crate's own tests (and the integration tests in `tests/`) to construct
/// synthetic records with known timestamps; not `#[cfg(test)]`-gated since
/// an integration test binary links against the non-test build of this
/// crate and would otherwise be unable to see it.
pub fn datetime_to_filetime(dt: DateTime<Utc>) -> u64 {
    let seconds = dt.timestamp();
    let nanos = dt.timestamp_subsec_nanos();
    let windows_seconds = seconds + SEC_TO_UNIX_EPOCH;
    (windows_seconds as u64) * WINDOWS_TICK as u64 + (nanos / 100) as u64
}
