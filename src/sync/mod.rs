//! URL-state synchroniser for the action table.
//!
//! The synchroniser keeps the address bar's query string consistent with the
//! table's filter and sort state. Each update reads the current location into
//! a [`QueryString`], applies the change, and pushes the result as a single
//! new history entry. The browser itself sits behind the [`History`] and
//! [`Page`] traits so the merge logic runs unchanged in tests and the CLI.

use url::Url;

use crate::filter::FilterChange;
use crate::query::QueryString;
use crate::sort::{AttributeMutation, SortState, batch_touches_sort};
use crate::telemetry::{NoopTelemetrySink, TelemetryEvent, TelemetrySink, UpdateTrigger};

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Element that dispatches filter-change events.
pub const FILTER_ELEMENT: &str = "action-table-filters";

/// Element whose `sort` and `direction` attributes are observed.
pub const TABLE_ELEMENT: &str = "action-table";

/// Browser history as seen by the synchroniser.
#[cfg_attr(test, mockall::automock)]
pub trait History {
    /// Returns the current location.
    fn location(&self) -> Url;

    /// Pushes `url` as a new entry with an empty state object, without
    /// reloading the page.
    fn push_state(&mut self, url: &Url);
}

/// Document lookups needed while installing observations.
pub trait Page {
    /// Returns true when an element matching `selector` exists.
    fn contains(&self, selector: &str) -> bool;
}

/// In-memory history that records every pushed entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingHistory {
    initial: Url,
    pushed: Vec<Url>,
}

impl RecordingHistory {
    /// Starts a history at `initial`.
    #[must_use]
    pub const fn new(initial: Url) -> Self {
        Self {
            initial,
            pushed: Vec::new(),
        }
    }

    /// Returns the entries pushed since creation, oldest first.
    #[must_use]
    pub fn pushed(&self) -> &[Url] {
        &self.pushed
    }
}

impl History for RecordingHistory {
    fn location(&self) -> Url {
        self.pushed.last().unwrap_or(&self.initial).clone()
    }

    fn push_state(&mut self, url: &Url) {
        self.pushed.push(url.clone());
    }
}

/// Which observations were installed on a page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Installation {
    /// A listener for filter-change events was attached.
    pub filter_listener: bool,
    /// A mutation observer for the sort attributes was attached.
    pub sort_observer: bool,
}

/// State read back from the query string on page load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hydration {
    query: QueryString,
}

impl Hydration {
    /// Returns the sort state to write onto the table element.
    #[must_use]
    pub fn sort(&self) -> SortState {
        self.query.sort_state()
    }

    /// Returns the selected values for a filter key, in query order.
    #[must_use]
    pub fn filter_values(&self, key: &str) -> Vec<String> {
        self.query.filter_values(key)
    }
}

/// Mirrors filter and sort state into the location's query string.
#[derive(Debug)]
pub struct UrlStateSynchronizer<H, T = NoopTelemetrySink> {
    history: H,
    telemetry: T,
}

impl<H: History> UrlStateSynchronizer<H> {
    /// Creates a synchroniser that discards telemetry.
    #[must_use]
    pub const fn new(history: H) -> Self {
        Self {
            history,
            telemetry: NoopTelemetrySink,
        }
    }
}

impl<H: History, T: TelemetrySink> UrlStateSynchronizer<H, T> {
    /// Creates a synchroniser that reports to `telemetry`.
    #[must_use]
    pub const fn with_telemetry(history: H, telemetry: T) -> Self {
        Self { history, telemetry }
    }

    /// Decides which observations to install on `page`.
    ///
    /// A missing element only skips its own observation; setup never fails.
    pub fn install(&self, page: &impl Page) -> Installation {
        Installation {
            filter_listener: self.probe(page, FILTER_ELEMENT),
            sort_observer: self.probe(page, TABLE_ELEMENT),
        }
    }

    fn probe(&self, page: &impl Page, selector: &str) -> bool {
        let present = page.contains(selector);
        if !present {
            tracing::debug!("{selector} not present; observation not installed");
            self.telemetry.record(TelemetryEvent::ObservationSkipped {
                element: selector.to_owned(),
            });
        }
        present
    }

    /// Applies a filter-change event and pushes the resulting URL.
    pub fn on_filter_changed(&mut self, change: &FilterChange) -> Url {
        let mut query = self.current_query();
        change.apply_to(&mut query);
        self.push(&query, UpdateTrigger::FilterChange)
    }

    /// Writes the table's sort state and pushes the resulting URL.
    pub fn on_sort_changed(&mut self, state: &SortState) -> Url {
        let mut query = self.current_query();
        state.apply_to(&mut query);
        self.push(&query, UpdateTrigger::SortChange)
    }

    /// Handles one mutation-observer notification.
    ///
    /// When any mutation concerns `sort` or `direction`, both attributes are
    /// read once through `read_attributes` and a single URL update is pushed.
    /// Batches without such a mutation push nothing.
    pub fn on_attribute_mutations(
        &mut self,
        mutations: &[AttributeMutation],
        read_attributes: impl FnOnce() -> SortState,
    ) -> Option<Url> {
        if !batch_touches_sort(mutations) {
            tracing::trace!("ignoring {} unrelated attribute mutations", mutations.len());
            return None;
        }
        Some(self.on_sort_changed(&read_attributes()))
    }

    /// Reads filter and sort state back from the current location.
    #[must_use]
    pub fn hydrate(&self) -> Hydration {
        Hydration {
            query: self.current_query(),
        }
    }

    /// Borrows the underlying history.
    #[must_use]
    pub const fn history(&self) -> &H {
        &self.history
    }

    /// Consumes the synchroniser, returning its history.
    #[must_use]
    pub fn into_history(self) -> H {
        self.history
    }

    fn current_query(&self) -> QueryString {
        QueryString::from_url(self.history.location())
    }

    fn push(&mut self, query: &QueryString, trigger: UpdateTrigger) -> Url {
        let url = query.to_url();
        tracing::debug!("pushing history entry {url}");
        self.history.push_state(&url);
        self.telemetry.record(TelemetryEvent::HistoryPushed {
            url: url.to_string(),
            trigger,
        });
        url
    }
}
