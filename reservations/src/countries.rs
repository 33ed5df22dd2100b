//! Country lookup index.
//!
//! A read-only reference table over guest nationalities. The table is
//! injected at construction time (it is owned by a collaborator dataset),
//! never read from process-wide state, so tests can swap in a small table.

use serde::{Deserialize, Serialize};

/// One entry of the country reference table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    /// Full country name, as shown to staff.
    pub name: String,
    /// ISO-style short code.
    pub code: String,
    /// Opaque reference to the flag image resource.
    pub flag: String,
}

impl Country {
    /// Create a country entry.
    pub fn new(
        name: impl Into<String>,
        code: impl Into<String>,
        flag: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
            flag: flag.into(),
        }
    }
}

/// Searchable index over the injected country table.
///
/// Search preserves the source-table order and has no side effects; every
/// call starts from the full table again.
#[derive(Clone, Debug, Default)]
pub struct CountryIndex {
    countries: Vec<Country>,
}

impl CountryIndex {
    /// Build an index over the given table, preserving its order.
    #[must_use]
    pub const fn new(countries: Vec<Country>) -> Self {
        Self { countries }
    }

    /// All entries, in source order.
    #[must_use]
    pub fn all(&self) -> &[Country] {
        &self.countries
    }

    /// Case-insensitive substring search.
    ///
    /// An empty term yields the full table.
    pub fn search<'a>(&'a self, term: &str) -> impl Iterator<Item = &'a Country> {
        let needle = term.to_lowercase();
        self.countries
            .iter()
            .filter(move |country| country.name.to_lowercase().contains(&needle))
    }

    /// Exact-name lookup (case-insensitive), for nationalities set
    /// programmatically.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<&Country> {
        self.countries
            .iter()
            .find(|country| country.name.eq_ignore_ascii_case(name))
    }

    /// Number of entries in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.countries.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }
}
