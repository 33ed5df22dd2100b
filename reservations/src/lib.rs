//! # Cabana Reservations
//!
//! The reservation core of the lodging back office: staff pick a cabin, a
//! guest, a date range and options, watch the derived price track every
//! edit, and commit the result as a guest-then-booking write pair.
//!
//! ## Architecture
//!
//! The feature is a reducer driven by explicit actions:
//!
//! ```text
//! Action → Reducer → (State, Effects) → Effect Execution → More Actions
//! ```
//!
//! - every mutation entry point (staff edit, catalog load finishing,
//!   submission outcome) is an action;
//! - derived price fields are recomputed synchronously inside `reduce`,
//!   so they can never be observed stale;
//! - the two-phase submission runs inside a single ordered effect and
//!   reports its phase-specific outcome even if the draft was discarded
//!   in the meantime (a stale outcome never touches the new draft).
//!
//! ## Example: deriving a price
//!
//! ```rust,ignore
//! use cabana_reservations::*;
//!
//! let effects = reducer.reduce(
//!     &mut state,
//!     ReservationAction::SelectCabin(CabinId(1)),
//!     &env,
//! );
//! // state.draft.cabin_price already reflects the catalog rate
//! assert!(effects.is_empty());
//! ```

// Public modules
pub mod actions;
pub mod countries;
pub mod datastore;
pub mod environment;
pub mod error;
pub mod reducer;
pub mod state;
pub mod stats;
pub mod stay;
pub mod submission;

#[cfg(any(test, feature = "test-utils"))]
pub mod mocks;

// Re-export main types for convenience
pub use actions::ReservationAction;
pub use countries::{Country, CountryIndex};
pub use datastore::{BookingQuery, PAGE_SIZE, ReservationStore};
pub use environment::ReservationEnvironment;
pub use error::{
    LoadError, ReservationError, Result, StoreFailure, SubmitError, ValidationError,
};
pub use reducer::ReservationReducer;
pub use state::{
    Booking, BookingId, BookingStatus, Cabin, CabinCatalog, CabinId, DraftReservation, Guest,
    GuestDetails, GuestId, ReservationState, Settings, SubmissionState,
};
pub use stats::{BookingSales, OccupancySummary, summarize};

/// A runtime store driving the reservation reducer against the data store
/// implementation `S`.
pub type ReservationSession<S> = cabana_runtime::Store<
    ReservationState,
    ReservationAction,
    ReservationEnvironment<S>,
    ReservationReducer<S>,
>;
