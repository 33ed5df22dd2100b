//! Stay pricing and duration derivation.
//!
//! Pure, total functions: malformed input degrades to zero instead of
//! raising, so a half-filled draft always has a well-defined price. The
//! reducer re-invokes these on every relevant edit; nothing here is
//! memoized.
//!
//! All currency amounts are integer cents.

use chrono::{DateTime, Utc};

const SECONDS_PER_DAY: i64 = 86_400;

/// Number of nights between two instants.
///
/// Defined as the ceiling of the day difference: a stay that runs into a
/// partial day still occupies the cabin for that night. Returns 0 when
/// either endpoint is absent or when `end <= start` - never negative,
/// never fractional.
///
/// # Example
///
/// ```
/// use cabana_reservations::stay::nights_between;
/// use chrono::{TimeZone, Utc};
///
/// let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single();
/// let end = Utc.with_ymd_and_hms(2024, 1, 4, 0, 0, 0).single();
/// assert_eq!(nights_between(start, end), 3);
/// assert_eq!(nights_between(end, start), 0);
/// assert_eq!(nights_between(start, None), 0);
/// ```
#[must_use]
pub fn nights_between(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> u32 {
    let (Some(start), Some(end)) = (start, end) else {
        return 0;
    };

    if end <= start {
        return 0;
    }

    let seconds = (end - start).num_seconds();
    u32::try_from((seconds as u64).div_ceil(SECONDS_PER_DAY as u64)).unwrap_or(u32::MAX)
}

/// Price of the extras for a stay.
///
/// Breakfast is charged per guest per night; without breakfast there are
/// no extras.
#[must_use]
pub const fn extras_price(
    has_breakfast: bool,
    nights: u32,
    guests: u32,
    breakfast_rate: u64,
) -> u64 {
    if has_breakfast {
        nights as u64 * guests as u64 * breakfast_rate
    } else {
        0
    }
}

/// Total price of a stay: the cabin's nightly rate over the stay plus
/// extras.
#[must_use]
pub const fn total_price(nights: u32, cabin_rate: u64, extras: u64) -> u64 {
    nights as u64 * cabin_rate + extras
}
