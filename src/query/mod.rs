//! Structured view of a location's query string.
//!
//! [`QueryString`] is the value every update is threaded through: read the
//! current location into it, mutate it, then write the resulting [`Url`] back
//! in a single history call. Mutations follow `URLSearchParams` semantics so
//! that a page and this crate agree on the serialised result.

use std::fmt;

use url::Url;

use crate::error::SyncError;
use crate::sort::{DIRECTION_PARAM, SORT_PARAM, SortState};

/// A location plus its ordered, multi-valued query parameters.
///
/// Until the first mutation the location is written back byte for byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryString {
    url: Url,
    pairs: Vec<(String, String)>,
    mutated: bool,
}

impl QueryString {
    /// Parses an absolute URL into a query builder.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::InvalidUrl`] when the input is not an absolute URL.
    pub fn parse(input: &str) -> Result<Self, SyncError> {
        let url = Url::parse(input).map_err(|error| SyncError::InvalidUrl(error.to_string()))?;
        Ok(Self::from_url(url))
    }

    /// Builds a query builder from an already parsed location.
    #[must_use]
    pub fn from_url(url: Url) -> Self {
        let pairs = url.query_pairs().into_owned().collect();
        Self {
            url,
            pairs,
            mutated: false,
        }
    }

    /// Removes every entry for `key`.
    pub fn delete(&mut self, key: &str) {
        self.mutated = true;
        self.pairs.retain(|(existing, _)| existing != key);
    }

    /// Appends an entry for `key`, keeping any existing entries.
    pub fn append(&mut self, key: &str, value: &str) {
        self.mutated = true;
        self.pairs.push((key.to_owned(), value.to_owned()));
    }

    /// Sets `key` to a single value.
    ///
    /// The first existing entry keeps its position and takes the new value;
    /// later duplicates are dropped. Without an existing entry the value is
    /// appended.
    pub fn set(&mut self, key: &str, value: &str) {
        self.mutated = true;
        let mut found = false;
        self.pairs.retain_mut(|(existing, existing_value)| {
            if existing != key {
                return true;
            }
            if found {
                return false;
            }
            found = true;
            value.clone_into(existing_value);
            true
        });

        if !found {
            self.append(key, value);
        }
    }

    /// Returns the first value stored for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value.as_str())
    }

    /// Returns every value stored for `key`, in query order.
    #[must_use]
    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(existing, _)| existing == key)
            .map(|(_, value)| value.as_str())
            .collect()
    }

    /// Returns true when at least one entry exists for `key`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.pairs.iter().any(|(existing, _)| existing == key)
    }

    /// Reads the sort state encoded in the query string.
    ///
    /// Empty parameters are treated as absent, matching how the table
    /// attributes are written back.
    #[must_use]
    pub fn sort_state(&self) -> SortState {
        SortState::new(self.get(SORT_PARAM), self.get(DIRECTION_PARAM))
    }

    /// Reads the values selected for a filter key, in query order.
    #[must_use]
    pub fn filter_values(&self, key: &str) -> Vec<String> {
        self.get_all(key).into_iter().map(ToOwned::to_owned).collect()
    }

    /// Serialises the builder back into a full URL.
    ///
    /// An unmutated builder returns the parsed location unchanged. After a
    /// mutation the query is re-encoded and an empty parameter list drops
    /// the `?` entirely.
    #[must_use]
    pub fn to_url(&self) -> Url {
        let mut url = self.url.clone();
        if !self.mutated {
            return url;
        }
        if self.pairs.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut()
                .clear()
                .extend_pairs(self.pairs.iter());
        }
        url
    }
}

impl fmt::Display for QueryString {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.to_url().as_str())
    }
}
