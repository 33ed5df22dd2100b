//! Actions of the reservation feature.
//!
//! Every mutation entry point is an action: staff edits, the catalog loads
//! finishing (in whatever order), and the submission outcomes fed back by
//! effects. Variants that change a pricing-relevant raw field cause the
//! reducer to re-derive the computed fields before it returns.

use crate::error::{LoadError, SubmitError};
use crate::state::{Booking, BookingStatus, Cabin, CabinId, Settings};
use crate::stats::BookingSales;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// All inputs the reservation reducer processes.
#[derive(Clone, Debug, PartialEq)]
pub enum ReservationAction {
    // ----- draft field edits -----
    /// Set or clear the stay start date.
    SetStartDate(Option<DateTime<Utc>>),
    /// Set or clear the stay end date.
    SetEndDate(Option<DateTime<Utc>>),
    /// Set the number of guests staying.
    SetNumGuests(u32),
    /// Toggle breakfast.
    SetBreakfast(bool),
    /// Toggle the paid flag.
    SetPaid(bool),
    /// Set the lifecycle status for the new booking.
    SetStatus(BookingStatus),
    /// Set the staff notes.
    SetObservations(String),
    /// Set the guest full name.
    SetGuestName(String),
    /// Set the guest email.
    SetGuestEmail(String),
    /// Set the guest national id.
    SetNationalId(String),

    // ----- cabin selection -----
    /// Select a cabin by id. An id the catalog does not (yet) know derives
    /// a price of 0 - a defined degraded state, not an error.
    SelectCabin(CabinId),

    // ----- country picker -----
    /// Show the country picker.
    OpenCountryPicker,
    /// Dismiss the country picker (explicit caller event).
    CloseCountryPicker,
    /// Update the picker search term.
    SearchCountries(String),
    /// Pick a country: nationality and flag are set atomically from the
    /// index and the picker closes.
    SelectCountry(String),

    // ----- catalog and settings -----
    /// Kick off the cabin catalog and settings fetches.
    LoadCatalog,
    /// Event: the cabin catalog arrived.
    CabinsLoaded(Vec<Cabin>),
    /// Event: the settings snapshot arrived.
    SettingsLoaded(Settings),
    /// Event: a reference dataset failed to load.
    CatalogLoadFailed(LoadError),

    // ----- reporting -----
    /// Load the dashboard for the trailing window of `days`.
    LoadDashboard {
        /// Window length in days.
        days: u32,
    },
    /// Event: the reporting reads finished.
    DashboardLoaded {
        /// Sales rows created in the window.
        bookings: Vec<BookingSales>,
        /// Stays starting in the window.
        stays: Vec<Booking>,
        /// Window length in days.
        num_days: u32,
    },
    /// Event: the reporting reads failed.
    DashboardLoadFailed(LoadError),

    // ----- draft lifecycle -----
    /// Discard the draft and start blank.
    Reset,
    /// Validate the draft and start the two-phase submission.
    Submit,
    /// Event: the submission committed a booking.
    SubmitSucceeded {
        /// Token of the attempt this outcome belongs to.
        generation: Uuid,
        /// The persisted booking.
        booking: Booking,
    },
    /// Event: the submission failed.
    SubmitFailed {
        /// Token of the attempt this outcome belongs to.
        generation: Uuid,
        /// What went wrong, by phase.
        error: SubmitError,
    },
}
