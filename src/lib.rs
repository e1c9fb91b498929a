//! Querysync keeps an admin table's filter and sort state in the page URL.
//!
//! The library reads the current location into a [`QueryString`], applies
//! filter-change events and sort attribute updates with `URLSearchParams`
//! semantics, and pushes each result as a new history entry through the
//! [`History`] seam. On `wasm32` the `browser` module wires the same logic to
//! the DOM; elsewhere the CLI and tests drive it directly.

pub mod admin;
#[cfg(target_arch = "wasm32")]
pub mod browser;
pub mod config;
pub mod error;
pub mod filter;
pub mod query;
pub mod sort;
pub mod sync;
pub mod telemetry;

pub use config::QuerySyncConfig;
pub use error::SyncError;
pub use filter::{FilterChange, FilterDescriptor, FilterValue};
pub use query::QueryString;
pub use sort::{AttributeMutation, SortState};
pub use sync::{History, Installation, Page, RecordingHistory, UrlStateSynchronizer};
