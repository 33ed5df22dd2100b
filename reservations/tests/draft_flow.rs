//! Store-level tests for the draft editing flow: asynchronous catalog
//! loads interleaving with staff edits, degraded states, and the
//! dashboard reporting path.

#![allow(clippy::unwrap_used)] // Test code can unwrap

use cabana_core::environment::Clock;
use cabana_reservations::mocks::InMemoryReservationStore;
use cabana_reservations::{
    Booking, BookingId, BookingStatus, Cabin, CabinCatalog, CabinId, Country, CountryIndex,
    GuestId, ReservationAction, ReservationEnvironment, ReservationReducer, ReservationSession,
    ReservationState, Settings,
};
use cabana_runtime::Store;
use cabana_testing::test_clock;
use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;

type TestStore = ReservationSession<InMemoryReservationStore>;

fn cabin() -> Cabin {
    Cabin {
        id: CabinId(1),
        name: "001".into(),
        regular_price: 10_000,
        max_capacity: 4,
    }
}

fn date(y: i32, m: u32, d: u32) -> Option<DateTime<Utc>> {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).single()
}

fn store_with(mock: InMemoryReservationStore) -> TestStore {
    let clock = Arc::new(test_clock());
    let env = ReservationEnvironment::new(
        Arc::new(mock),
        clock,
        Arc::new(CountryIndex::new(vec![Country::new(
            "Portugal",
            "PT",
            "flags/pt.png",
        )])),
    );
    Store::new(ReservationState::default(), ReservationReducer::new(), env)
}

async fn send(store: &TestStore, action: ReservationAction) {
    let mut handle = store.send(action).await.unwrap();
    handle.wait().await;
}

#[tokio::test]
async fn catalog_load_rederives_an_already_selected_cabin() {
    let mock = InMemoryReservationStore::new(Arc::new(test_clock()))
        .with_cabins(vec![cabin()])
        .with_settings(Settings {
            breakfast_price: 1_500,
        });
    let store = store_with(mock);

    // Staff start editing before the catalog has arrived.
    send(&store, ReservationAction::SelectCabin(CabinId(1))).await;
    send(&store, ReservationAction::SetStartDate(date(2024, 1, 1))).await;
    send(&store, ReservationAction::SetEndDate(date(2024, 1, 4))).await;
    send(&store, ReservationAction::SetNumGuests(2)).await;
    send(&store, ReservationAction::SetBreakfast(true)).await;

    let degraded = store.state(|s| s.draft.total_price).await;
    assert_eq!(degraded, 0);

    // The catalog and settings arrive; the price catches up.
    send(&store, ReservationAction::LoadCatalog).await;

    let draft = store.state(|s| s.draft.clone()).await;
    assert_eq!(draft.num_nights, 3);
    assert_eq!(draft.cabin_price, 10_000);
    assert_eq!(draft.extras_price, 9_000);
    assert_eq!(draft.total_price, 39_000);
}

#[tokio::test]
async fn failed_catalog_load_leaves_the_draft_usable() {
    let mock = InMemoryReservationStore::new(Arc::new(test_clock()));
    mock.fail_reads(true);
    let store = store_with(mock);

    send(&store, ReservationAction::LoadCatalog).await;

    let (catalog_failed, error_set) = store
        .state(|s| {
            (
                matches!(s.cabins, CabinCatalog::Failed),
                s.last_error.is_some(),
            )
        })
        .await;
    assert!(catalog_failed);
    assert!(error_set);

    // Edits still work; derived values stay at the degraded zero.
    send(&store, ReservationAction::SetStartDate(date(2024, 1, 1))).await;
    send(&store, ReservationAction::SetEndDate(date(2024, 1, 3))).await;

    let draft = store.state(|s| s.draft.clone()).await;
    assert_eq!(draft.num_nights, 2);
    assert_eq!(draft.total_price, 0);
}

#[tokio::test]
async fn dashboard_summarizes_the_reporting_window() {
    let clock = test_clock();
    let now = clock.now();
    let seeded = vec![
        seeded_booking(1, now, 20_000, BookingStatus::CheckedIn, 2),
        seeded_booking(2, now, 30_000, BookingStatus::Unconfirmed, 3),
    ];
    let mock = InMemoryReservationStore::new(Arc::new(clock))
        .with_cabins(vec![cabin(), Cabin { id: CabinId(2), ..cabin() }])
        .with_settings(Settings { breakfast_price: 0 })
        .with_bookings(seeded);
    let store = store_with(mock);

    send(&store, ReservationAction::LoadCatalog).await;
    send(&store, ReservationAction::LoadDashboard { days: 7 }).await;

    let summary = store.state(|s| s.dashboard).await.unwrap();
    assert_eq!(summary.booking_count, 2);
    assert_eq!(summary.total_sales, 50_000);
    // Only the checked-in stay counts as confirmed.
    assert_eq!(summary.checkin_count, 1);
    // 2 nights over 7 days * 2 cabins
    assert!((summary.occupancy_rate - 2.0 / 14.0).abs() < f64::EPSILON);
}

fn seeded_booking(
    id: i64,
    now: DateTime<Utc>,
    total_price: u64,
    status: BookingStatus,
    num_nights: u32,
) -> Booking {
    Booking {
        id: BookingId(id),
        created_at: now - chrono::Duration::days(1),
        guest_id: GuestId(id),
        cabin_id: CabinId(1),
        start_date: now - chrono::Duration::days(1),
        end_date: now + chrono::Duration::days(i64::from(num_nights) - 1),
        num_nights,
        num_guests: 2,
        cabin_price: 10_000,
        extras_price: 0,
        total_price,
        status,
        has_breakfast: false,
        is_paid: true,
        observations: String::new(),
    }
}
