//! In-memory reservation store for testing.

use crate::datastore::{
    BookingField, BookingPage, BookingPatch, BookingQuery, Filter, FilterOp, ReservationStore,
    SortBy, SortDirection, page_bounds,
};
use crate::error::StoreFailure;
use crate::state::{
    Booking, BookingId, Cabin, Guest, GuestDetails, GuestId, NewBooking, Settings,
};
use crate::stats::BookingSales;
use cabana_core::environment::Clock;
use chrono::{DateTime, NaiveDate, Utc};
use std::cmp::Ordering;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering as AtomicOrdering};
use std::sync::{Arc, Mutex, PoisonError};

/// In-memory data store.
///
/// Rows live in `Arc<Mutex<..>>` tables; ids are assigned from a shared
/// sequence the way the collaborator store assigns row keys. The failure
/// toggles make one table's writes (or all reads) fail on demand.
#[derive(Clone)]
pub struct InMemoryReservationStore {
    clock: Arc<dyn Clock>,
    guests: Arc<Mutex<Vec<Guest>>>,
    bookings: Arc<Mutex<Vec<Booking>>>,
    cabins: Arc<Mutex<Vec<Cabin>>>,
    settings: Arc<Mutex<Option<Settings>>>,
    next_id: Arc<AtomicI64>,
    fail_guest_inserts: Arc<AtomicBool>,
    fail_booking_inserts: Arc<AtomicBool>,
    fail_reads: Arc<AtomicBool>,
}

impl InMemoryReservationStore {
    /// Create an empty store stamping rows with the given clock.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            guests: Arc::new(Mutex::new(Vec::new())),
            bookings: Arc::new(Mutex::new(Vec::new())),
            cabins: Arc::new(Mutex::new(Vec::new())),
            settings: Arc::new(Mutex::new(None)),
            next_id: Arc::new(AtomicI64::new(1)),
            fail_guest_inserts: Arc::new(AtomicBool::new(false)),
            fail_booking_inserts: Arc::new(AtomicBool::new(false)),
            fail_reads: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Seed the cabin table.
    #[must_use]
    pub fn with_cabins(self, cabins: Vec<Cabin>) -> Self {
        *lock(&self.cabins) = cabins;
        self
    }

    /// Seed the settings row.
    #[must_use]
    pub fn with_settings(self, settings: Settings) -> Self {
        *lock(&self.settings) = Some(settings);
        self
    }

    /// Seed the bookings table.
    #[must_use]
    pub fn with_bookings(self, bookings: Vec<Booking>) -> Self {
        *lock(&self.bookings) = bookings;
        self
    }

    /// Make guest inserts fail from now on (or stop failing).
    pub fn fail_guest_inserts(&self, fail: bool) {
        self.fail_guest_inserts.store(fail, AtomicOrdering::SeqCst);
    }

    /// Make booking inserts fail from now on (or stop failing).
    pub fn fail_booking_inserts(&self, fail: bool) {
        self.fail_booking_inserts.store(fail, AtomicOrdering::SeqCst);
    }

    /// Make all reads fail from now on (or stop failing).
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, AtomicOrdering::SeqCst);
    }

    /// Number of persisted guests.
    #[must_use]
    pub fn guest_count(&self) -> usize {
        lock(&self.guests).len()
    }

    /// Number of persisted bookings.
    #[must_use]
    pub fn booking_count(&self) -> usize {
        lock(&self.bookings).len()
    }

    /// Snapshot of the guest table.
    #[must_use]
    pub fn guests(&self) -> Vec<Guest> {
        lock(&self.guests).clone()
    }

    /// Snapshot of the bookings table.
    #[must_use]
    pub fn bookings(&self) -> Vec<Booking> {
        lock(&self.bookings).clone()
    }

    fn assign_id(&self) -> i64 {
        self.next_id.fetch_add(1, AtomicOrdering::SeqCst)
    }

    fn reads_fail(&self) -> Result<(), StoreFailure> {
        if self.fail_reads.load(AtomicOrdering::SeqCst) {
            Err(StoreFailure::Connection("injected read failure".into()))
        } else {
            Ok(())
        }
    }
}

/// Lock a table, recovering from poisoning (a panicking test thread must
/// not wedge every later assertion).
fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn filter_ordering(booking: &Booking, filter: &Filter) -> Option<Ordering> {
    use crate::datastore::FilterValue;

    match (filter.field, &filter.value) {
        (BookingField::Status, FilterValue::Status(status)) => {
            Some(booking.status.cmp(status))
        },
        (BookingField::IsPaid, FilterValue::Flag(flag)) => Some(booking.is_paid.cmp(flag)),
        (BookingField::StartDate, FilterValue::Date(date)) => {
            Some(booking.start_date.cmp(date))
        },
        (BookingField::EndDate, FilterValue::Date(date)) => Some(booking.end_date.cmp(date)),
        (BookingField::CreatedAt, FilterValue::Date(date)) => {
            Some(booking.created_at.cmp(date))
        },
        (BookingField::TotalPrice, FilterValue::Amount(amount)) => {
            Some(booking.total_price.cmp(amount))
        },
        (BookingField::NumNights, FilterValue::Nights(nights)) => {
            Some(booking.num_nights.cmp(nights))
        },
        // Value type does not fit the column; nothing can match.
        _ => None,
    }
}

fn filter_matches(booking: &Booking, filter: &Filter) -> bool {
    let Some(ordering) = filter_ordering(booking, filter) else {
        return false;
    };
    match filter.op {
        FilterOp::Eq => ordering == Ordering::Equal,
        FilterOp::Gte => ordering != Ordering::Less,
        FilterOp::Lte => ordering != Ordering::Greater,
    }
}

fn sort_cmp(a: &Booking, b: &Booking, sort: SortBy) -> Ordering {
    let ordering = match sort.field {
        BookingField::Status => a.status.cmp(&b.status),
        BookingField::IsPaid => a.is_paid.cmp(&b.is_paid),
        BookingField::StartDate => a.start_date.cmp(&b.start_date),
        BookingField::EndDate => a.end_date.cmp(&b.end_date),
        BookingField::CreatedAt => a.created_at.cmp(&b.created_at),
        BookingField::TotalPrice => a.total_price.cmp(&b.total_price),
        BookingField::NumNights => a.num_nights.cmp(&b.num_nights),
    };
    match sort.direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

impl ReservationStore for InMemoryReservationStore {
    fn insert_guest(
        &self,
        guest: GuestDetails,
    ) -> impl Future<Output = Result<Guest, StoreFailure>> + Send {
        let store = self.clone();

        async move {
            if store.fail_guest_inserts.load(AtomicOrdering::SeqCst) {
                return Err(StoreFailure::Rejected {
                    table: "guests",
                    reason: "injected insert failure".into(),
                });
            }

            let row = Guest {
                id: GuestId(store.assign_id()),
                details: guest,
            };
            lock(&store.guests).push(row.clone());
            Ok(row)
        }
    }

    fn insert_booking(
        &self,
        booking: NewBooking,
    ) -> impl Future<Output = Result<Booking, StoreFailure>> + Send {
        let store = self.clone();

        async move {
            if store.fail_booking_inserts.load(AtomicOrdering::SeqCst) {
                return Err(StoreFailure::Rejected {
                    table: "bookings",
                    reason: "injected insert failure".into(),
                });
            }

            let row = Booking {
                id: BookingId(store.assign_id()),
                created_at: store.clock.now(),
                guest_id: booking.guest_id,
                cabin_id: booking.cabin_id,
                start_date: booking.start_date,
                end_date: booking.end_date,
                num_nights: booking.num_nights,
                num_guests: booking.num_guests,
                cabin_price: booking.cabin_price,
                extras_price: booking.extras_price,
                total_price: booking.total_price,
                status: booking.status,
                has_breakfast: booking.has_breakfast,
                is_paid: booking.is_paid,
                observations: booking.observations,
            };
            lock(&store.bookings).push(row.clone());
            Ok(row)
        }
    }

    fn get_booking(
        &self,
        id: BookingId,
    ) -> impl Future<Output = Result<Booking, StoreFailure>> + Send {
        let store = self.clone();

        async move {
            store.reads_fail()?;
            lock(&store.bookings)
                .iter()
                .find(|booking| booking.id == id)
                .cloned()
                .ok_or(StoreFailure::NotFound {
                    table: "bookings",
                    id: id.0,
                })
        }
    }

    fn query_bookings(
        &self,
        query: BookingQuery,
    ) -> impl Future<Output = Result<BookingPage, StoreFailure>> + Send {
        let store = self.clone();

        async move {
            store.reads_fail()?;

            let mut rows: Vec<Booking> = lock(&store.bookings)
                .iter()
                .filter(|booking| {
                    query
                        .filter
                        .as_ref()
                        .is_none_or(|filter| filter_matches(booking, filter))
                })
                .cloned()
                .collect();

            if let Some(sort) = query.sort_by {
                rows.sort_by(|a, b| sort_cmp(a, b, sort));
            }

            let total_count = rows.len();
            if let Some(page) = query.page {
                let (from, to) = page_bounds(page);
                rows = rows
                    .into_iter()
                    .skip(from)
                    .take(to.saturating_sub(from))
                    .collect();
            }

            Ok(BookingPage { rows, total_count })
        }
    }

    fn update_booking(
        &self,
        id: BookingId,
        patch: BookingPatch,
    ) -> impl Future<Output = Result<Booking, StoreFailure>> + Send {
        let store = self.clone();

        async move {
            let mut bookings = lock(&store.bookings);
            let Some(booking) = bookings.iter_mut().find(|booking| booking.id == id) else {
                return Err(StoreFailure::NotFound {
                    table: "bookings",
                    id: id.0,
                });
            };
            patch.apply_to(booking);
            Ok(booking.clone())
        }
    }

    fn delete_booking(
        &self,
        id: BookingId,
    ) -> impl Future<Output = Result<(), StoreFailure>> + Send {
        let store = self.clone();

        async move {
            let mut bookings = lock(&store.bookings);
            let before = bookings.len();
            bookings.retain(|booking| booking.id != id);
            if bookings.len() == before {
                return Err(StoreFailure::NotFound {
                    table: "bookings",
                    id: id.0,
                });
            }
            Ok(())
        }
    }

    fn bookings_since(
        &self,
        since: DateTime<Utc>,
    ) -> impl Future<Output = Result<Vec<BookingSales>, StoreFailure>> + Send {
        let store = self.clone();

        async move {
            store.reads_fail()?;
            let now = store.clock.now();
            Ok(lock(&store.bookings)
                .iter()
                .filter(|booking| booking.created_at >= since && booking.created_at <= now)
                .map(|booking| BookingSales {
                    created_at: booking.created_at,
                    total_price: booking.total_price,
                    extras_price: booking.extras_price,
                })
                .collect())
        }
    }

    fn stays_since(
        &self,
        since: DateTime<Utc>,
    ) -> impl Future<Output = Result<Vec<Booking>, StoreFailure>> + Send {
        let store = self.clone();

        async move {
            store.reads_fail()?;
            let now = store.clock.now();
            Ok(lock(&store.bookings)
                .iter()
                .filter(|booking| booking.start_date >= since && booking.start_date <= now)
                .cloned()
                .collect())
        }
    }

    fn today_activity(
        &self,
        today: NaiveDate,
    ) -> impl Future<Output = Result<Vec<Booking>, StoreFailure>> + Send {
        let store = self.clone();

        async move {
            store.reads_fail()?;
            let mut rows: Vec<Booking> = lock(&store.bookings)
                .iter()
                .filter(|booking| booking.is_today_activity(today))
                .cloned()
                .collect();
            rows.sort_by(|a, b| a.created_at.cmp(&b.created_at));
            Ok(rows)
        }
    }

    fn list_cabins(&self) -> impl Future<Output = Result<Vec<Cabin>, StoreFailure>> + Send {
        let store = self.clone();

        async move {
            store.reads_fail()?;
            Ok(lock(&store.cabins).clone())
        }
    }

    fn get_settings(&self) -> impl Future<Output = Result<Settings, StoreFailure>> + Send {
        let store = self.clone();

        async move {
            store.reads_fail()?;
            lock(&store.settings)
                .clone()
                .ok_or(StoreFailure::NotFound {
                    table: "settings",
                    id: 1,
                })
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)] // Test code can unwrap

    use super::*;
    use crate::datastore::{FilterValue, PAGE_SIZE};
    use crate::state::{BookingStatus, CabinId};
    use cabana_core::environment::Clock;
    use cabana_testing::test_clock;
    use chrono::TimeZone;

    fn store() -> InMemoryReservationStore {
        InMemoryReservationStore::new(Arc::new(test_clock()))
    }

    fn new_booking(start_day: u32, total_price: u64, status: BookingStatus) -> NewBooking {
        let start = Utc
            .with_ymd_and_hms(2025, 1, start_day, 0, 0, 0)
            .single()
            .unwrap();
        NewBooking {
            guest_id: GuestId(1),
            cabin_id: CabinId(1),
            start_date: start,
            end_date: start + chrono::Duration::days(2),
            num_nights: 2,
            num_guests: 2,
            cabin_price: total_price / 2,
            extras_price: 0,
            total_price,
            status,
            has_breakfast: false,
            is_paid: false,
            observations: String::new(),
        }
    }

    #[tokio::test]
    async fn ids_are_assigned_sequentially() {
        let store = store();
        let first = store
            .insert_guest(GuestDetails::default())
            .await
            .unwrap();
        let second = store
            .insert_guest(GuestDetails::default())
            .await
            .unwrap();
        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn query_filters_sorts_and_pages() {
        let store = store();
        for day in 1..=25 {
            store
                .insert_booking(new_booking(day, u64::from(day) * 1_000, BookingStatus::Unconfirmed))
                .await
                .unwrap();
        }

        let page = store
            .query_bookings(BookingQuery {
                filter: Some(
                    Filter::new(BookingField::TotalPrice, FilterValue::Amount(5_000))
                        .with_op(FilterOp::Gte),
                ),
                sort_by: Some(SortBy {
                    field: BookingField::TotalPrice,
                    direction: SortDirection::Desc,
                }),
                page: Some(1),
            })
            .await
            .unwrap();

        assert_eq!(page.total_count, 21);
        assert_eq!(page.rows.len(), PAGE_SIZE as usize);
        assert_eq!(page.rows[0].total_price, 25_000);

        let page3 = store
            .query_bookings(BookingQuery {
                filter: Some(
                    Filter::new(BookingField::TotalPrice, FilterValue::Amount(5_000))
                        .with_op(FilterOp::Gte),
                ),
                sort_by: Some(SortBy {
                    field: BookingField::TotalPrice,
                    direction: SortDirection::Desc,
                }),
                page: Some(3),
            })
            .await
            .unwrap();
        assert_eq!(page3.rows.len(), 1);
        assert_eq!(page3.rows[0].total_price, 5_000);
    }

    #[tokio::test]
    async fn mismatched_filter_value_matches_nothing() {
        let store = store();
        store
            .insert_booking(new_booking(1, 10_000, BookingStatus::Unconfirmed))
            .await
            .unwrap();

        let page = store
            .query_bookings(BookingQuery {
                filter: Some(Filter::new(BookingField::Status, FilterValue::Amount(1))),
                sort_by: None,
                page: None,
            })
            .await
            .unwrap();

        assert_eq!(page.total_count, 0);
    }

    #[tokio::test]
    async fn update_and_delete_round_trip() {
        let store = store();
        let booking = store
            .insert_booking(new_booking(1, 10_000, BookingStatus::Unconfirmed))
            .await
            .unwrap();

        let updated = store
            .update_booking(
                booking.id,
                BookingPatch {
                    status: Some(BookingStatus::CheckedIn),
                    is_paid: Some(true),
                    observations: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.status, BookingStatus::CheckedIn);

        store.delete_booking(booking.id).await.unwrap();
        assert!(matches!(
            store.get_booking(booking.id).await,
            Err(StoreFailure::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn today_activity_picks_arrivals_and_departures() {
        let store = store();
        // Arrival today (2025-01-01 per the test clock)
        store
            .insert_booking(new_booking(1, 10_000, BookingStatus::Unconfirmed))
            .await
            .unwrap();
        // Departure later in the month
        store
            .insert_booking(new_booking(20, 10_000, BookingStatus::CheckedIn))
            .await
            .unwrap();

        let today = test_clock().now().date_naive();
        let activity = store.today_activity(today).await.unwrap();

        assert_eq!(activity.len(), 1);
        assert_eq!(activity[0].status, BookingStatus::Unconfirmed);
    }

    #[tokio::test]
    async fn read_failures_are_injectable() {
        let store = store();
        store.fail_reads(true);
        assert!(matches!(
            store.list_cabins().await,
            Err(StoreFailure::Connection(_))
        ));
    }
}
