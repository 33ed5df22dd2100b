//! Reservation environment.
//!
//! All external dependencies of the reducer arrive here: the data store,
//! the clock, and the country reference table. Nothing is read from
//! process-wide state, so every collaborator can be swapped or stubbed in
//! tests.

use crate::countries::CountryIndex;
use crate::datastore::ReservationStore;
use cabana_core::environment::Clock;
use std::sync::Arc;

/// Injected dependencies for the reservation reducer.
///
/// # Type Parameters
///
/// - `S`: the data store implementation
pub struct ReservationEnvironment<S>
where
    S: ReservationStore,
{
    /// The collaborator data store.
    pub store: Arc<S>,
    /// Clock for reporting windows.
    pub clock: Arc<dyn Clock>,
    /// Injected country reference table.
    pub countries: Arc<CountryIndex>,
}

impl<S> ReservationEnvironment<S>
where
    S: ReservationStore,
{
    /// Create a new reservation environment.
    #[must_use]
    pub fn new(store: Arc<S>, clock: Arc<dyn Clock>, countries: Arc<CountryIndex>) -> Self {
        Self {
            store,
            clock,
            countries,
        }
    }
}

// Manual Clone: `S` itself need not be Clone, only the Arc handles are.
impl<S> Clone for ReservationEnvironment<S>
where
    S: ReservationStore,
{
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            clock: Arc::clone(&self.clock),
            countries: Arc::clone(&self.countries),
        }
    }
}
