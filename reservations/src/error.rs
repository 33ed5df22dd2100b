//! Error types for the reservation core.
//!
//! The taxonomy distinguishes where in the submission workflow a failure
//! happened, because the recovery story differs: validation and first-phase
//! failures are safe to retry wholesale, a second-phase failure leaves an
//! orphan guest behind that an operator must reconcile.

use crate::state::GuestId;
use thiserror::Error;

/// Result type alias for reservation operations.
pub type Result<T> = std::result::Result<T, ReservationError>;

/// A draft that cannot be submitted as-is.
///
/// Reported before any write is attempted; the draft stays intact so staff
/// can correct the field and resubmit.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Guest full name is empty.
    #[error("guest full name must not be empty")]
    EmptyGuestName,

    /// No cabin selected.
    #[error("a cabin must be selected")]
    MissingCabin,

    /// Start or end date missing.
    #[error("start and end dates are both required")]
    MissingDates,

    /// End date does not fall strictly after the start date.
    #[error("end date must fall strictly after start date")]
    EndNotAfterStart,

    /// Zero guests on the draft.
    #[error("at least one guest must stay")]
    NoGuests,

    /// More guests than the selected cabin sleeps.
    #[error("cabin sleeps at most {max} guests")]
    ExceedsCapacity {
        /// The selected cabin's capacity.
        max: u32,
    },
}

/// Failure reported by the collaborator data store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreFailure {
    /// The store refused a write.
    #[error("{table} insert rejected: {reason}")]
    Rejected {
        /// Table the write targeted.
        table: &'static str,
        /// Store-supplied reason.
        reason: String,
    },

    /// A row addressed by id does not exist.
    #[error("{table} row {id} not found")]
    NotFound {
        /// Table that was queried.
        table: &'static str,
        /// The missing row id.
        id: i64,
    },

    /// The store could not be reached at all.
    #[error("data store unreachable: {0}")]
    Connection(String),
}

/// Outcome of a failed submission, by phase.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubmitError {
    /// The draft failed validation; nothing was written.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The guest insert failed. No booking was attempted and no partial
    /// state exists; retrying the whole submission is safe.
    #[error("guest record could not be created: {source}")]
    GuestCreation {
        /// The underlying store failure.
        source: StoreFailure,
    },

    /// The booking insert failed after the guest insert succeeded. The
    /// guest row remains persisted as an orphan; its id is carried here so
    /// an operator can reconcile or clean up. A plain retry would create a
    /// second guest.
    #[error("booking could not be created, guest {guest_id} is already persisted: {source}")]
    BookingCreation {
        /// Id of the orphan guest row.
        guest_id: GuestId,
        /// The underlying store failure.
        source: StoreFailure,
    },
}

/// A reference dataset (cabins, settings, bookings) failed to load.
///
/// The draft stays usable: derived values degrade to zero until the data
/// arrives on a later attempt.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{resource} could not be loaded: {source}")]
pub struct LoadError {
    /// Which dataset failed to load.
    pub resource: &'static str,
    /// The underlying store failure.
    pub source: StoreFailure,
}

impl LoadError {
    /// Failed cabin catalog load.
    #[must_use]
    pub const fn cabins(source: StoreFailure) -> Self {
        Self {
            resource: "cabins",
            source,
        }
    }

    /// Failed settings load.
    #[must_use]
    pub const fn settings(source: StoreFailure) -> Self {
        Self {
            resource: "settings",
            source,
        }
    }

    /// Failed bookings load.
    #[must_use]
    pub const fn bookings(source: StoreFailure) -> Self {
        Self {
            resource: "bookings",
            source,
        }
    }
}

/// Umbrella error surfaced to callers of the reservation core.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReservationError {
    /// The draft failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A submission failed partway through the two-phase write.
    #[error(transparent)]
    Submit(#[from] SubmitError),

    /// A reference dataset failed to load.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// A second submit arrived while one was still in flight. The draft is
    /// untouched; resubmit once the pending outcome lands.
    #[error("a submission for this draft is already in flight")]
    SubmissionInFlight,
}
