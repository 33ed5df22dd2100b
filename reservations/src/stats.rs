//! Occupancy and sales aggregation for a reporting window.
//!
//! Pure reduction over already-filtered inputs; the caller decides the
//! window and which stays count as confirmed.

use crate::state::Booking;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sales projection of a booking, as returned by the reporting reads.
///
/// Carries only what the dashboard needs, so a reporting query does not
/// have to ship every booking column.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingSales {
    /// When the booking was created.
    pub created_at: DateTime<Utc>,
    /// Total price in cents.
    pub total_price: u64,
    /// Extras price in cents.
    pub extras_price: u64,
}

/// Summary statistics over a reporting window.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OccupancySummary {
    /// Number of bookings created in the window.
    pub booking_count: usize,
    /// Sum of booking totals, in cents.
    pub total_sales: u64,
    /// Number of confirmed stays (check-ins) in the window.
    pub checkin_count: usize,
    /// Checked-in nights over the available cabin-nights; 0 when no
    /// cabin-nights are available.
    pub occupancy_rate: f64,
}

/// Reduce a window of bookings and confirmed stays to summary values.
///
/// `occupancy_rate` is checked-in nights divided by
/// `num_days * cabin_count`; a zero denominator yields 0 rather than a
/// division error.
#[must_use]
#[allow(clippy::cast_precision_loss)] // Night counts stay far below 2^52
pub fn summarize(
    bookings: &[BookingSales],
    confirmed_stays: &[Booking],
    num_days: u32,
    cabin_count: u32,
) -> OccupancySummary {
    let total_sales = bookings.iter().map(|b| b.total_price).sum();
    let booked_nights: u64 = confirmed_stays
        .iter()
        .map(|stay| u64::from(stay.num_nights))
        .sum();
    let available_nights = u64::from(num_days) * u64::from(cabin_count);

    let occupancy_rate = if available_nights == 0 {
        0.0
    } else {
        booked_nights as f64 / available_nights as f64
    };

    OccupancySummary {
        booking_count: bookings.len(),
        total_sales,
        checkin_count: confirmed_stays.len(),
        occupancy_rate,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)] // Test code can unwrap

    use super::*;
    use crate::state::{BookingId, BookingStatus, CabinId, GuestId};
    use chrono::TimeZone;

    fn sale(total_price: u64) -> BookingSales {
        BookingSales {
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).single().unwrap(),
            total_price,
            extras_price: 0,
        }
    }

    fn stay(num_nights: u32) -> Booking {
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).single().unwrap();
        Booking {
            id: BookingId(1),
            created_at: start,
            guest_id: GuestId(1),
            cabin_id: CabinId(1),
            start_date: start,
            end_date: start + chrono::Duration::days(i64::from(num_nights)),
            num_nights,
            num_guests: 2,
            cabin_price: 10_000,
            extras_price: 0,
            total_price: u64::from(num_nights) * 10_000,
            status: BookingStatus::CheckedIn,
            has_breakfast: false,
            is_paid: true,
            observations: String::new(),
        }
    }

    #[test]
    fn summarizes_a_window() {
        let summary = summarize(&[sale(20_000), sale(30_000)], &[stay(2)], 10, 5);

        assert_eq!(summary.booking_count, 2);
        assert_eq!(summary.total_sales, 50_000);
        assert_eq!(summary.checkin_count, 1);
        assert!((summary.occupancy_rate - 0.04).abs() < f64::EPSILON);
    }

    #[test]
    fn zero_denominator_never_divides() {
        assert_eq!(summarize(&[], &[stay(2)], 0, 5).occupancy_rate, 0.0);
        assert_eq!(summarize(&[], &[stay(2)], 10, 0).occupancy_rate, 0.0);
    }

    #[test]
    fn empty_window_is_all_zero() {
        let summary = summarize(&[], &[], 7, 8);
        assert_eq!(summary, OccupancySummary::default());
    }
}
