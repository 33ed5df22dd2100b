//! Data-store contract consumed by the submission and reporting paths.
//!
//! The store is an opaque collaborator with a simple CRUD surface; its
//! transport and auth are not this core's business. Operations are typed
//! per entity rather than stringly-typed by table name, so a caller cannot
//! hand a guest record to the bookings table.

use crate::error::StoreFailure;
use crate::state::{
    Booking, BookingId, BookingStatus, Cabin, Guest, GuestDetails, NewBooking, Settings,
};
use crate::stats::BookingSales;
use chrono::{DateTime, NaiveDate, Utc};
use std::future::Future;

/// Fixed page size for booking queries.
pub const PAGE_SIZE: u32 = 10;

/// Booking columns that can be filtered or sorted on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BookingField {
    /// Lifecycle status.
    Status,
    /// Payment flag.
    IsPaid,
    /// Stay start.
    StartDate,
    /// Stay end.
    EndDate,
    /// Total price.
    TotalPrice,
    /// Nights stayed.
    NumNights,
    /// Creation timestamp.
    CreatedAt,
}

/// Comparison operator for a filter; `Eq` unless stated otherwise.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FilterOp {
    /// Exact match.
    #[default]
    Eq,
    /// Greater than or equal.
    Gte,
    /// Less than or equal.
    Lte,
}

/// Sort direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDirection {
    /// Ascending.
    Asc,
    /// Descending.
    Desc,
}

/// A filter value, typed to the column it compares against.
#[derive(Clone, Debug, PartialEq)]
pub enum FilterValue {
    /// A lifecycle status.
    Status(BookingStatus),
    /// A boolean flag.
    Flag(bool),
    /// An amount in cents.
    Amount(u64),
    /// A night count.
    Nights(u32),
    /// A point in time.
    Date(DateTime<Utc>),
}

/// A single-column filter.
#[derive(Clone, Debug, PartialEq)]
pub struct Filter {
    /// Column to compare.
    pub field: BookingField,
    /// Comparison operator.
    pub op: FilterOp,
    /// Value to compare against.
    pub value: FilterValue,
}

impl Filter {
    /// Equality filter on a column.
    #[must_use]
    pub const fn new(field: BookingField, value: FilterValue) -> Self {
        Self {
            field,
            op: FilterOp::Eq,
            value,
        }
    }

    /// Override the comparison operator.
    #[must_use]
    pub const fn with_op(mut self, op: FilterOp) -> Self {
        self.op = op;
        self
    }
}

/// A single-column sort.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SortBy {
    /// Column to sort on.
    pub field: BookingField,
    /// Direction.
    pub direction: SortDirection,
}

/// Parameters of a paged booking query.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BookingQuery {
    /// Optional filter; `None` selects everything.
    pub filter: Option<Filter>,
    /// Optional sort; `None` keeps store order.
    pub sort_by: Option<SortBy>,
    /// Optional 1-indexed page; `None` returns all rows.
    pub page: Option<u32>,
}

/// One page of booking rows plus the total match count.
#[derive(Clone, Debug, PartialEq)]
pub struct BookingPage {
    /// The rows of the requested page.
    pub rows: Vec<Booking>,
    /// Matching rows across all pages.
    pub total_count: usize,
}

/// Partial update to a booking row.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BookingPatch {
    /// New lifecycle status, if changing.
    pub status: Option<BookingStatus>,
    /// New payment flag, if changing.
    pub is_paid: Option<bool>,
    /// New staff notes, if changing.
    pub observations: Option<String>,
}

impl BookingPatch {
    /// Apply the patch to a booking row in place.
    pub fn apply_to(&self, booking: &mut Booking) {
        if let Some(status) = self.status {
            booking.status = status;
        }
        if let Some(is_paid) = self.is_paid {
            booking.is_paid = is_paid;
        }
        if let Some(observations) = &self.observations {
            booking.observations.clone_from(observations);
        }
    }
}

/// Half-open row range covered by a 1-indexed page.
///
/// Page `p` covers rows `[(p-1)*PAGE_SIZE, p*PAGE_SIZE)`.
#[must_use]
pub const fn page_bounds(page: u32) -> (usize, usize) {
    let from = (page.saturating_sub(1) * PAGE_SIZE) as usize;
    (from, from + PAGE_SIZE as usize)
}

/// The abstract reservation data store.
///
/// Implementations decide the transport; the in-memory mock in
/// `crate::mocks` is the reference used by tests.
pub trait ReservationStore: Send + Sync {
    /// Insert a guest and return the row with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreFailure`] if the store rejects the write or cannot
    /// be reached.
    fn insert_guest(
        &self,
        guest: GuestDetails,
    ) -> impl Future<Output = Result<Guest, StoreFailure>> + Send;

    /// Insert a booking and return the row with its assigned id and
    /// creation timestamp.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreFailure`] if the store rejects the write or cannot
    /// be reached.
    fn insert_booking(
        &self,
        booking: NewBooking,
    ) -> impl Future<Output = Result<Booking, StoreFailure>> + Send;

    /// Fetch a single booking by id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreFailure::NotFound`] if the row does not exist.
    fn get_booking(
        &self,
        id: BookingId,
    ) -> impl Future<Output = Result<Booking, StoreFailure>> + Send;

    /// Run a filtered, sorted, paged query over bookings.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreFailure`] if the query cannot be executed.
    fn query_bookings(
        &self,
        query: BookingQuery,
    ) -> impl Future<Output = Result<BookingPage, StoreFailure>> + Send;

    /// Apply a partial update to a booking and return the updated row.
    ///
    /// # Errors
    ///
    /// Returns [`StoreFailure::NotFound`] if the row does not exist.
    fn update_booking(
        &self,
        id: BookingId,
        patch: BookingPatch,
    ) -> impl Future<Output = Result<Booking, StoreFailure>> + Send;

    /// Delete a booking row.
    ///
    /// # Errors
    ///
    /// Returns [`StoreFailure::NotFound`] if the row does not exist.
    fn delete_booking(
        &self,
        id: BookingId,
    ) -> impl Future<Output = Result<(), StoreFailure>> + Send;

    /// Sales rows for bookings created since the given instant.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreFailure`] if the query cannot be executed.
    fn bookings_since(
        &self,
        since: DateTime<Utc>,
    ) -> impl Future<Output = Result<Vec<BookingSales>, StoreFailure>> + Send;

    /// Stays whose start date falls since the given instant.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreFailure`] if the query cannot be executed.
    fn stays_since(
        &self,
        since: DateTime<Utc>,
    ) -> impl Future<Output = Result<Vec<Booking>, StoreFailure>> + Send;

    /// Today's front-desk activity: arrivals still unconfirmed and
    /// checked-in departures.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreFailure`] if the query cannot be executed.
    fn today_activity(
        &self,
        today: NaiveDate,
    ) -> impl Future<Output = Result<Vec<Booking>, StoreFailure>> + Send;

    /// The cabin catalog.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreFailure`] if the catalog cannot be loaded.
    fn list_cabins(&self) -> impl Future<Output = Result<Vec<Cabin>, StoreFailure>> + Send;

    /// The settings snapshot.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreFailure`] if the settings cannot be loaded.
    fn get_settings(&self) -> impl Future<Output = Result<Settings, StoreFailure>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_bounds_are_one_indexed() {
        assert_eq!(page_bounds(1), (0, 10));
        assert_eq!(page_bounds(2), (10, 20));
        assert_eq!(page_bounds(3), (20, 30));
    }

    #[test]
    fn filter_defaults_to_eq() {
        let filter = Filter::new(
            BookingField::Status,
            FilterValue::Status(BookingStatus::CheckedIn),
        );
        assert_eq!(filter.op, FilterOp::Eq);

        let ranged = filter.with_op(FilterOp::Gte);
        assert_eq!(ranged.op, FilterOp::Gte);
    }

    #[test]
    fn patch_applies_only_set_fields() {
        use crate::state::{BookingId, CabinId, GuestId};
        use chrono::TimeZone;

        #[allow(clippy::unwrap_used)] // Test fixture
        let start = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).single().unwrap();
        let mut booking = Booking {
            id: BookingId(1),
            created_at: start,
            guest_id: GuestId(1),
            cabin_id: CabinId(1),
            start_date: start,
            end_date: start + chrono::Duration::days(2),
            num_nights: 2,
            num_guests: 1,
            cabin_price: 10_000,
            extras_price: 0,
            total_price: 20_000,
            status: BookingStatus::Unconfirmed,
            has_breakfast: false,
            is_paid: false,
            observations: "window seat".into(),
        };

        BookingPatch {
            status: Some(BookingStatus::CheckedIn),
            is_paid: Some(true),
            observations: None,
        }
        .apply_to(&mut booking);

        assert_eq!(booking.status, BookingStatus::CheckedIn);
        assert!(booking.is_paid);
        assert_eq!(booking.observations, "window seat");
    }
}
