//! Two-phase booking submission.
//!
//! The collaborator store has no cross-record transaction primitive, so
//! the guest and booking inserts run as an explicit two-step saga:
//!
//! 1. insert the guest - a failure here stops everything, nothing partial
//!    exists, and the whole submission is safe to retry;
//! 2. insert the booking under the new guest id - a failure here leaves
//!    the guest row behind as an orphan, which is reported distinctly so
//!    an operator can reconcile.
//!
//! The booking carries the draft values captured when `Submit` was reduced,
//! not values re-derived at commit time: a catalog update that lands while
//! the writes are in flight must not change the price the staff member saw
//! when they pressed the button.

use crate::datastore::ReservationStore;
use crate::error::{SubmitError, ValidationError};
use crate::state::{
    Booking, BookingStatus, CabinCatalog, CabinId, GuestDetails, NewBooking, ReservationState,
};
use chrono::{DateTime, Utc};

/// Draft values frozen at `Submit` time, ready to be written.
#[derive(Clone, Debug, PartialEq)]
pub struct SubmissionSnapshot {
    /// Guest fields to insert.
    pub guest: GuestDetails,
    /// The booked cabin.
    pub cabin_id: CabinId,
    /// Stay start.
    pub start_date: DateTime<Utc>,
    /// Stay end.
    pub end_date: DateTime<Utc>,
    /// Derived nights at submit time.
    pub num_nights: u32,
    /// Number of guests staying.
    pub num_guests: u32,
    /// Derived nightly rate at submit time, in cents.
    pub cabin_price: u64,
    /// Derived extras at submit time, in cents.
    pub extras_price: u64,
    /// Derived total at submit time, in cents.
    pub total_price: u64,
    /// Lifecycle status for the new booking.
    pub status: BookingStatus,
    /// Whether breakfast is included.
    pub has_breakfast: bool,
    /// Whether the booking is already paid.
    pub is_paid: bool,
    /// Staff notes.
    pub observations: String,
}

/// Validate the draft and freeze it into a submission snapshot.
///
/// Runs before any write. The capacity bound is enforced when the selected
/// cabin can be resolved in the loaded catalog; while the catalog is still
/// loading the bound cannot be known and the remaining checks stand alone.
///
/// # Errors
///
/// Returns the first [`ValidationError`] encountered; the draft is left
/// untouched for correction.
pub fn validate(state: &ReservationState) -> Result<SubmissionSnapshot, ValidationError> {
    let draft = &state.draft;

    if draft.guest.full_name.trim().is_empty() {
        return Err(ValidationError::EmptyGuestName);
    }

    let Some(cabin_id) = draft.cabin_id else {
        return Err(ValidationError::MissingCabin);
    };

    let (Some(start_date), Some(end_date)) = (draft.start_date, draft.end_date) else {
        return Err(ValidationError::MissingDates);
    };

    if end_date <= start_date {
        return Err(ValidationError::EndNotAfterStart);
    }

    if draft.num_guests == 0 {
        return Err(ValidationError::NoGuests);
    }

    if let CabinCatalog::Loaded(_) = &state.cabins {
        if let Some(cabin) = state.cabins.cabin(cabin_id) {
            if draft.num_guests > cabin.max_capacity {
                return Err(ValidationError::ExceedsCapacity {
                    max: cabin.max_capacity,
                });
            }
        }
    }

    Ok(SubmissionSnapshot {
        guest: draft.guest.clone(),
        cabin_id,
        start_date,
        end_date,
        num_nights: draft.num_nights,
        num_guests: draft.num_guests,
        cabin_price: draft.cabin_price,
        extras_price: draft.extras_price,
        total_price: draft.total_price,
        status: draft.status,
        has_breakfast: draft.has_breakfast,
        is_paid: draft.is_paid,
        observations: draft.observations.clone(),
    })
}

/// Run the two-phase write against the store.
///
/// Exactly one guest row is created per call; a booking row only on full
/// success. The phases are ordered within this single future - phase 2
/// never starts before phase 1 resolves.
///
/// # Errors
///
/// - [`SubmitError::GuestCreation`] if phase 1 fails (nothing persisted)
/// - [`SubmitError::BookingCreation`] if phase 2 fails (orphan guest
///   remains; its id is carried in the error)
pub async fn submit<S>(store: &S, snapshot: SubmissionSnapshot) -> Result<Booking, SubmitError>
where
    S: ReservationStore,
{
    tracing::debug!(cabin_id = %snapshot.cabin_id, "starting two-phase submission");

    let guest = store
        .insert_guest(snapshot.guest.clone())
        .await
        .map_err(|source| {
            tracing::warn!(%source, "guest insert failed, nothing persisted");
            SubmitError::GuestCreation { source }
        })?;

    tracing::debug!(guest_id = %guest.id, "guest persisted, inserting booking");

    let booking = NewBooking {
        guest_id: guest.id,
        cabin_id: snapshot.cabin_id,
        start_date: snapshot.start_date,
        end_date: snapshot.end_date,
        num_nights: snapshot.num_nights,
        num_guests: snapshot.num_guests,
        cabin_price: snapshot.cabin_price,
        extras_price: snapshot.extras_price,
        total_price: snapshot.total_price,
        status: snapshot.status,
        has_breakfast: snapshot.has_breakfast,
        is_paid: snapshot.is_paid,
        observations: snapshot.observations,
    };

    store.insert_booking(booking).await.map_err(|source| {
        tracing::warn!(
            guest_id = %guest.id,
            %source,
            "booking insert failed, orphan guest remains"
        );
        SubmitError::BookingCreation {
            guest_id: guest.id,
            source,
        }
    })
}
