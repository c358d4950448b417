use crate::error::{ProcessingError, Result};
use chrono::{DateTime, Duration, FixedOffset, NaiveDateTime, TimeZone, Utc};

/// Build the fixed local offset from a whole number of hours east of UTC
pub fn fixed_offset(hours: i32) -> Result<FixedOffset> {
    FixedOffset::east_opt(hours * 3600)
        .ok_or_else(|| ProcessingError::Config(format!("Invalid UTC offset: {} hours", hours)))
}

/// Floor a timestamp to a bucket boundary measured in its own local time.
///
/// Buckets are aligned on the local epoch, so hourly and daily widths land on
/// local hour and local midnight boundaries.
pub fn floor_to(ts: DateTime<FixedOffset>, width: Duration) -> DateTime<FixedOffset> {
    let width_secs = width.num_seconds();
    if width_secs <= 0 {
        return ts;
    }

    let local_secs = ts.naive_local().and_utc().timestamp();
    let floored = local_secs - local_secs.rem_euclid(width_secs);
    let naive = DateTime::<Utc>::from_timestamp(floored, 0)
        .map(|dt| dt.naive_utc())
        .unwrap_or_else(|| ts.naive_local());

    local_to_offset(naive, ts.offset())
}

/// Start of the local calendar day containing `ts`
pub fn floor_to_midnight(ts: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    floor_to(ts, Duration::days(1))
}

/// Attach a fixed offset to a local wall-clock time
pub fn local_to_offset(naive: NaiveDateTime, offset: &FixedOffset) -> DateTime<FixedOffset> {
    let utc = naive - Duration::seconds(i64::from(offset.local_minus_utc()));
    offset.from_utc_datetime(&utc)
}

/// Interpret a naive timestamp as UTC and express it in the local offset
pub fn utc_to_offset(naive: NaiveDateTime, offset: &FixedOffset) -> DateTime<FixedOffset> {
    offset.from_utc_datetime(&naive)
}
