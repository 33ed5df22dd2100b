//! Reducer for the reservation feature.
//!
//! One `reduce` call handles one mutation entry point - a staff edit, a
//! catalog load finishing, a submission outcome arriving - and leaves the
//! state fully consistent before returning: derived price fields are
//! re-derived synchronously, never deferred to a later observer.

use crate::actions::ReservationAction;
use crate::environment::ReservationEnvironment;
use crate::error::{LoadError, ReservationError};
use crate::state::{CabinCatalog, ReservationState, SubmissionState};
use crate::submission;
use crate::{datastore::ReservationStore, stats};
use cabana_core::effect::Effect;
use cabana_core::reducer::Reducer;
use cabana_core::{SmallVec, smallvec};
use std::marker::PhantomData;
use std::sync::Arc;
use uuid::Uuid;

/// Reducer for [`ReservationState`].
pub struct ReservationReducer<S> {
    _store: PhantomData<fn() -> S>,
}

impl<S> ReservationReducer<S> {
    /// Create the reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _store: PhantomData,
        }
    }
}

impl<S> Default for ReservationReducer<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Clone for ReservationReducer<S> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<S> Reducer for ReservationReducer<S>
where
    S: ReservationStore + 'static,
{
    type State = ReservationState;
    type Action = ReservationAction;
    type Environment = ReservationEnvironment<S>;

    #[allow(clippy::too_many_lines)] // One arm per mutation entry point
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ----- draft field edits -----
            ReservationAction::SetStartDate(date) => {
                state.draft.start_date = date;
                state.recompute();
                smallvec![]
            },
            ReservationAction::SetEndDate(date) => {
                state.draft.end_date = date;
                state.recompute();
                smallvec![]
            },
            ReservationAction::SetNumGuests(guests) => {
                state.draft.num_guests = guests;
                state.recompute();
                smallvec![]
            },
            ReservationAction::SetBreakfast(has_breakfast) => {
                state.draft.has_breakfast = has_breakfast;
                state.recompute();
                smallvec![]
            },
            ReservationAction::SetPaid(is_paid) => {
                state.draft.is_paid = is_paid;
                smallvec![]
            },
            ReservationAction::SetStatus(status) => {
                state.draft.status = status;
                smallvec![]
            },
            ReservationAction::SetObservations(observations) => {
                state.draft.observations = observations;
                smallvec![]
            },
            ReservationAction::SetGuestName(full_name) => {
                state.draft.guest.full_name = full_name;
                smallvec![]
            },
            ReservationAction::SetGuestEmail(email) => {
                state.draft.guest.email = email;
                smallvec![]
            },
            ReservationAction::SetNationalId(national_id) => {
                state.draft.guest.national_id = national_id;
                smallvec![]
            },

            // ----- cabin selection -----
            ReservationAction::SelectCabin(cabin_id) => {
                if state.cabins.cabin(cabin_id).is_none() {
                    tracing::debug!(%cabin_id, "cabin not in catalog yet, price derives to 0");
                }
                state.draft.cabin_id = Some(cabin_id);
                state.recompute();
                smallvec![]
            },

            // ----- country picker -----
            ReservationAction::OpenCountryPicker => {
                state.picker.open = true;
                smallvec![]
            },
            ReservationAction::CloseCountryPicker => {
                state.picker.open = false;
                smallvec![]
            },
            ReservationAction::SearchCountries(term) => {
                state.picker.term = term;
                smallvec![]
            },
            ReservationAction::SelectCountry(name) => {
                if let Some(country) = env.countries.resolve(&name) {
                    state.draft.guest.nationality.clone_from(&country.name);
                    state.draft.guest.country_flag.clone_from(&country.flag);
                    state.picker.term.clone_from(&country.name);
                    state.picker.open = false;
                } else {
                    tracing::warn!(%name, "selected country is not in the reference table");
                }
                smallvec![]
            },

            // ----- catalog and settings -----
            ReservationAction::LoadCatalog => {
                state.cabins = CabinCatalog::Loading;
                let cabin_store = Arc::clone(&env.store);
                let settings_store = Arc::clone(&env.store);

                smallvec![Effect::merge(vec![
                    Effect::future(async move {
                        Some(match cabin_store.list_cabins().await {
                            Ok(cabins) => ReservationAction::CabinsLoaded(cabins),
                            Err(failure) => {
                                ReservationAction::CatalogLoadFailed(LoadError::cabins(failure))
                            },
                        })
                    }),
                    Effect::future(async move {
                        Some(match settings_store.get_settings().await {
                            Ok(settings) => ReservationAction::SettingsLoaded(settings),
                            Err(failure) => {
                                ReservationAction::CatalogLoadFailed(LoadError::settings(failure))
                            },
                        })
                    }),
                ])]
            },
            ReservationAction::CabinsLoaded(cabins) => {
                tracing::debug!(count = cabins.len(), "cabin catalog arrived");
                state.cabins = CabinCatalog::Loaded(cabins);
                // A cabin selected before the catalog arrived re-derives
                // against the now-known rate.
                state.recompute();
                smallvec![]
            },
            ReservationAction::SettingsLoaded(settings) => {
                state.settings = Some(settings);
                state.recompute();
                smallvec![]
            },
            ReservationAction::CatalogLoadFailed(error) => {
                tracing::warn!(%error, "reference data load failed, draft stays usable");
                if error.resource == "cabins" {
                    state.cabins = CabinCatalog::Failed;
                }
                state.last_error = Some(ReservationError::Load(error));
                state.recompute();
                smallvec![]
            },

            // ----- reporting -----
            ReservationAction::LoadDashboard { days } => {
                let now = env.clock.now();
                let since = now - chrono::Duration::days(i64::from(days));
                let store = Arc::clone(&env.store);

                smallvec![Effect::future(async move {
                    let bookings = match store.bookings_since(since).await {
                        Ok(bookings) => bookings,
                        Err(failure) => {
                            return Some(ReservationAction::DashboardLoadFailed(
                                LoadError::bookings(failure),
                            ));
                        },
                    };
                    match store.stays_since(since).await {
                        Ok(stays) => Some(ReservationAction::DashboardLoaded {
                            bookings,
                            stays,
                            num_days: days,
                        }),
                        Err(failure) => Some(ReservationAction::DashboardLoadFailed(
                            LoadError::bookings(failure),
                        )),
                    }
                })]
            },
            ReservationAction::DashboardLoaded {
                bookings,
                stays,
                num_days,
            } => {
                let confirmed: Vec<_> = stays
                    .into_iter()
                    .filter(|stay| stay.status != crate::state::BookingStatus::Unconfirmed)
                    .collect();
                let cabin_count = state.cabins.cabin_count();
                state.dashboard =
                    Some(stats::summarize(&bookings, &confirmed, num_days, cabin_count));
                smallvec![]
            },
            ReservationAction::DashboardLoadFailed(error) => {
                state.last_error = Some(ReservationError::Load(error));
                smallvec![]
            },

            // ----- draft lifecycle -----
            ReservationAction::Reset => {
                state.reset_draft();
                state.submission = SubmissionState::Idle;
                state.last_error = None;
                smallvec![]
            },
            ReservationAction::Submit => {
                if let SubmissionState::InFlight { .. } = state.submission {
                    tracing::warn!("submit rejected, another submission is in flight");
                    state.last_error = Some(ReservationError::SubmissionInFlight);
                    return smallvec![];
                }

                match submission::validate(state) {
                    Err(error) => {
                        state.last_error = Some(ReservationError::Validation(error));
                        smallvec![]
                    },
                    Ok(snapshot) => {
                        let generation = Uuid::new_v4();
                        state.submission = SubmissionState::InFlight { generation };
                        state.last_error = None;

                        let store = Arc::clone(&env.store);
                        smallvec![Effect::future(async move {
                            Some(match submission::submit(store.as_ref(), snapshot).await {
                                Ok(booking) => ReservationAction::SubmitSucceeded {
                                    generation,
                                    booking,
                                },
                                Err(error) => {
                                    ReservationAction::SubmitFailed { generation, error }
                                },
                            })
                        })]
                    },
                }
            },
            ReservationAction::SubmitSucceeded {
                generation,
                booking,
            } => {
                if !matches!(
                    state.submission,
                    SubmissionState::InFlight { generation: current } if current == generation
                ) {
                    // The draft this outcome belonged to was discarded; the
                    // write stands but must not touch the new draft.
                    tracing::warn!(booking_id = %booking.id, "dropping stale submission outcome");
                    return smallvec![];
                }

                tracing::debug!(booking_id = %booking.id, "submission committed");
                state.reset_draft();
                state.submission = SubmissionState::Succeeded { booking };
                state.last_error = None;
                smallvec![]
            },
            ReservationAction::SubmitFailed { generation, error } => {
                if !matches!(
                    state.submission,
                    SubmissionState::InFlight { generation: current } if current == generation
                ) {
                    tracing::warn!(%error, "dropping stale submission failure");
                    return smallvec![];
                }

                state.submission = SubmissionState::Failed {
                    error: error.clone(),
                };
                state.last_error = Some(ReservationError::Submit(error));
                smallvec![]
            },
        }
    }
}
