//! Domain state for the reservation feature.
//!
//! The central type is [`ReservationState`]: the in-progress draft together
//! with the catalog and settings snapshots it derives its price from, the
//! country-picker sub-state, and the submission state machine.
//!
//! The invariant the whole module is built around: the draft's derived
//! fields (`num_nights`, `cabin_price`, `extras_price`, `total_price`) are
//! always the stay calculator applied to the current raw fields and the
//! latest catalog/settings snapshot. [`ReservationState::recompute`] is the
//! single place that restores the invariant, and the reducer calls it after
//! every mutation that can affect pricing - whether the mutation came from
//! a staff edit or from a catalog load finishing late.

use crate::error::{ReservationError, SubmitError};
use crate::stats::OccupancySummary;
use crate::stay;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a cabin row, assigned by the data store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CabinId(pub i64);

/// Identifier of a guest row, assigned by the data store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GuestId(pub i64);

/// Identifier of a booking row, assigned by the data store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BookingId(pub i64);

impl std::fmt::Display for CabinId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for GuestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for BookingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A cabin, read-only reference data owned by a collaborator.
///
/// The core never mutates cabins; it only reads the nightly rate and the
/// capacity bound.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cabin {
    /// Store-assigned identifier.
    pub id: CabinId,
    /// Display name.
    pub name: String,
    /// Nightly rate in cents.
    pub regular_price: u64,
    /// Maximum number of guests the cabin sleeps.
    pub max_capacity: u32,
}

/// External settings snapshot, read-only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Breakfast rate per guest per night, in cents.
    pub breakfast_price: u64,
}

/// Lifecycle status of a booking.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BookingStatus {
    /// Booked but not yet arrived.
    #[default]
    Unconfirmed,
    /// Guest is currently staying.
    CheckedIn,
    /// Stay is over.
    CheckedOut,
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unconfirmed => write!(f, "unconfirmed"),
            Self::CheckedIn => write!(f, "checked-in"),
            Self::CheckedOut => write!(f, "checked-out"),
        }
    }
}

/// Guest fields as edited on the draft and written on submission.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestDetails {
    /// Guest full name; required for submission.
    pub full_name: String,
    /// Contact email.
    pub email: String,
    /// Nationality; matches a country-table entry or stays empty.
    pub nationality: String,
    /// National identity document number.
    pub national_id: String,
    /// Opaque flag image reference derived from the nationality.
    pub country_flag: String,
}

/// A committed guest row.
///
/// Created exactly once per booking submission; immutable thereafter from
/// this core's perspective.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guest {
    /// Store-assigned identifier.
    pub id: GuestId,
    /// The submitted guest fields.
    pub details: GuestDetails,
}

/// A persisted booking row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    /// Store-assigned identifier.
    pub id: BookingId,
    /// Store-assigned creation timestamp.
    pub created_at: DateTime<Utc>,
    /// The committed guest this booking belongs to.
    pub guest_id: GuestId,
    /// The booked cabin.
    pub cabin_id: CabinId,
    /// Stay start.
    pub start_date: DateTime<Utc>,
    /// Stay end.
    pub end_date: DateTime<Utc>,
    /// Nights stayed, captured at submission time.
    pub num_nights: u32,
    /// Number of guests staying.
    pub num_guests: u32,
    /// Nightly cabin rate in cents, captured at submission time.
    pub cabin_price: u64,
    /// Extras price in cents, captured at submission time.
    pub extras_price: u64,
    /// Total price in cents, captured at submission time.
    pub total_price: u64,
    /// Lifecycle status.
    pub status: BookingStatus,
    /// Whether breakfast is included.
    pub has_breakfast: bool,
    /// Whether the booking is already paid.
    pub is_paid: bool,
    /// Free-form staff notes.
    pub observations: String,
}

impl Booking {
    /// Whether this booking is part of today's front-desk activity: an
    /// unconfirmed booking arriving today, or a checked-in guest departing
    /// today.
    #[must_use]
    pub fn is_today_activity(&self, today: NaiveDate) -> bool {
        match self.status {
            BookingStatus::Unconfirmed => self.start_date.date_naive() == today,
            BookingStatus::CheckedIn => self.end_date.date_naive() == today,
            BookingStatus::CheckedOut => false,
        }
    }
}

/// A booking as handed to the data store, before ids are assigned.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBooking {
    /// The committed guest this booking belongs to.
    pub guest_id: GuestId,
    /// The booked cabin.
    pub cabin_id: CabinId,
    /// Stay start.
    pub start_date: DateTime<Utc>,
    /// Stay end.
    pub end_date: DateTime<Utc>,
    /// Nights stayed.
    pub num_nights: u32,
    /// Number of guests staying.
    pub num_guests: u32,
    /// Nightly cabin rate in cents.
    pub cabin_price: u64,
    /// Extras price in cents.
    pub extras_price: u64,
    /// Total price in cents.
    pub total_price: u64,
    /// Lifecycle status.
    pub status: BookingStatus,
    /// Whether breakfast is included.
    pub has_breakfast: bool,
    /// Whether the booking is already paid.
    pub is_paid: bool,
    /// Free-form staff notes.
    pub observations: String,
}

/// The in-progress reservation being edited by staff.
///
/// Raw fields are staff-supplied; the last four fields are derived and
/// never edited directly.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DraftReservation {
    /// Selected cabin, if any.
    pub cabin_id: Option<CabinId>,
    /// Stay start.
    pub start_date: Option<DateTime<Utc>>,
    /// Stay end.
    pub end_date: Option<DateTime<Utc>>,
    /// Number of guests staying.
    pub num_guests: u32,
    /// Whether breakfast is included.
    pub has_breakfast: bool,
    /// Whether the booking is already paid.
    pub is_paid: bool,
    /// Lifecycle status for the new booking.
    pub status: BookingStatus,
    /// Free-form staff notes.
    pub observations: String,
    /// Guest sub-fields.
    pub guest: GuestDetails,

    /// Derived: nights stayed.
    pub num_nights: u32,
    /// Derived: nightly cabin rate in cents (0 while the cabin is unknown).
    pub cabin_price: u64,
    /// Derived: extras price in cents.
    pub extras_price: u64,
    /// Derived: total price in cents.
    pub total_price: u64,
}

/// Snapshot of the cabin catalog, which loads after the draft opens.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum CabinCatalog {
    /// Catalog has not arrived yet; prices derive to 0.
    #[default]
    Loading,
    /// Catalog is available.
    Loaded(Vec<Cabin>),
    /// Catalog fetch failed; prices keep deriving to 0 and the draft stays
    /// usable.
    Failed,
}

impl CabinCatalog {
    /// Look up a cabin by id in the loaded catalog.
    #[must_use]
    pub fn cabin(&self, id: CabinId) -> Option<&Cabin> {
        match self {
            Self::Loaded(cabins) => cabins.iter().find(|cabin| cabin.id == id),
            Self::Loading | Self::Failed => None,
        }
    }

    /// Number of cabins in the loaded catalog, 0 otherwise.
    #[must_use]
    pub fn cabin_count(&self) -> u32 {
        match self {
            Self::Loaded(cabins) => u32::try_from(cabins.len()).unwrap_or(u32::MAX),
            Self::Loading | Self::Failed => 0,
        }
    }
}

/// Country-picker interaction state.
///
/// Open/closed is explicit state owned here; closing is triggered by an
/// explicit action, never by a global listener.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CountryPicker {
    /// Whether the picker is showing.
    pub open: bool,
    /// Current search term.
    pub term: String,
}

/// State machine for the submission workflow.
///
/// The generation token ties an in-flight submission to the draft that
/// started it: once the draft is reset, a late outcome no longer matches
/// and is dropped instead of mutating the new draft.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum SubmissionState {
    /// Nothing pending.
    #[default]
    Idle,
    /// A submission is running; no second one may start.
    InFlight {
        /// Token identifying this attempt.
        generation: Uuid,
    },
    /// The last submission committed this booking.
    Succeeded {
        /// The persisted booking.
        booking: Booking,
    },
    /// The last submission failed.
    Failed {
        /// What went wrong, by phase.
        error: SubmitError,
    },
}

/// Complete feature state: draft, snapshots, picker, submission, dashboard.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReservationState {
    /// Cabin catalog snapshot.
    pub cabins: CabinCatalog,
    /// Settings snapshot; `None` until loaded, deriving a 0 breakfast rate.
    pub settings: Option<Settings>,
    /// The draft being edited.
    pub draft: DraftReservation,
    /// Country-picker sub-state.
    pub picker: CountryPicker,
    /// Submission state machine.
    pub submission: SubmissionState,
    /// Last computed reporting summary, if any.
    pub dashboard: Option<OccupancySummary>,
    /// Most recent error surfaced to the caller.
    pub last_error: Option<ReservationError>,
}

impl ReservationState {
    /// Re-derive the draft's computed fields from its raw fields and the
    /// current catalog/settings snapshots.
    ///
    /// Total and commutative: missing dates, an unknown cabin, or a
    /// not-yet-loaded catalog derive to 0 rather than failing, and the
    /// result depends only on the current raw inputs - not on the order
    /// the mutations arrived in.
    pub fn recompute(&mut self) {
        let draft = &mut self.draft;

        let nights = stay::nights_between(draft.start_date, draft.end_date);
        let cabin_rate = draft
            .cabin_id
            .and_then(|id| self.cabins.cabin(id))
            .map_or(0, |cabin| cabin.regular_price);
        let breakfast_rate = self
            .settings
            .as_ref()
            .map_or(0, |settings| settings.breakfast_price);
        let extras =
            stay::extras_price(draft.has_breakfast, nights, draft.num_guests, breakfast_rate);

        draft.num_nights = nights;
        draft.cabin_price = cabin_rate;
        draft.extras_price = extras;
        draft.total_price = stay::total_price(nights, cabin_rate, extras);
    }

    /// Discard the draft: raw fields cleared, derived fields at 0, country
    /// picker closed. Catalog and settings snapshots survive - they belong
    /// to the session, not to one draft.
    pub fn reset_draft(&mut self) {
        self.draft = DraftReservation::default();
        self.picker = CountryPicker::default();
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)] // Test code can unwrap

    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> Option<DateTime<Utc>> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).single()
    }

    fn ts(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).single().unwrap()
    }

    fn loaded_state() -> ReservationState {
        ReservationState {
            cabins: CabinCatalog::Loaded(vec![Cabin {
                id: CabinId(1),
                name: "001".into(),
                regular_price: 10_000,
                max_capacity: 4,
            }]),
            settings: Some(Settings {
                breakfast_price: 1_500,
            }),
            ..ReservationState::default()
        }
    }

    #[test]
    fn recompute_derives_the_worked_scenario() {
        let mut state = loaded_state();
        state.draft.cabin_id = Some(CabinId(1));
        state.draft.start_date = date(2024, 1, 1);
        state.draft.end_date = date(2024, 1, 4);
        state.draft.num_guests = 2;
        state.draft.has_breakfast = true;

        state.recompute();

        assert_eq!(state.draft.num_nights, 3);
        assert_eq!(state.draft.cabin_price, 10_000);
        assert_eq!(state.draft.extras_price, 9_000);
        assert_eq!(state.draft.total_price, 39_000);
    }

    #[test]
    fn unknown_cabin_degrades_to_zero_price() {
        let mut state = loaded_state();
        state.draft.cabin_id = Some(CabinId(99));
        state.draft.start_date = date(2024, 1, 1);
        state.draft.end_date = date(2024, 1, 3);

        state.recompute();

        assert_eq!(state.draft.num_nights, 2);
        assert_eq!(state.draft.cabin_price, 0);
        assert_eq!(state.draft.total_price, 0);
    }

    #[test]
    fn reset_keeps_catalog_but_clears_draft() {
        let mut state = loaded_state();
        state.draft.num_guests = 3;
        state.picker.open = true;

        state.reset_draft();

        assert_eq!(state.draft, DraftReservation::default());
        assert!(!state.picker.open);
        assert!(matches!(state.cabins, CabinCatalog::Loaded(_)));
    }

    #[test]
    fn today_activity_matches_arrivals_and_departures() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let base = Booking {
            id: BookingId(1),
            created_at: ts(2024, 12, 1, 9),
            guest_id: GuestId(1),
            cabin_id: CabinId(1),
            start_date: ts(2025, 1, 1, 14),
            end_date: ts(2025, 1, 4, 10),
            num_nights: 3,
            num_guests: 2,
            cabin_price: 10_000,
            extras_price: 0,
            total_price: 30_000,
            status: BookingStatus::Unconfirmed,
            has_breakfast: false,
            is_paid: false,
            observations: String::new(),
        };

        assert!(base.is_today_activity(today));

        let departing = Booking {
            status: BookingStatus::CheckedIn,
            start_date: ts(2024, 12, 29, 14),
            end_date: ts(2025, 1, 1, 10),
            ..base.clone()
        };
        assert!(departing.is_today_activity(today));

        let done = Booking {
            status: BookingStatus::CheckedOut,
            ..base
        };
        assert!(!done.is_today_activity(today));
    }
}
