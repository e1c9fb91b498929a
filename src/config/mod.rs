//! Application configuration loaded from CLI, environment, and files.
//!
//! This module provides a unified configuration struct that merges values
//! from command-line arguments, environment variables, and configuration
//! files using ortho-config's layered approach.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – Built-in application defaults
//! 2. **Configuration file** – `.querysync.toml` in current directory, home
//!    directory, or XDG config directory
//! 3. **Environment variables** – `QUERYSYNC_URL`, `QUERYSYNC_SORT`, ...
//! 4. **Command-line arguments** – `--url`/`-u`, `--filter-event`/`-f`, ...
//!
//! # Configuration File
//!
//! ```toml
//! url = "https://example.org/admin/batches/?sort=name"
//! filter_event = '{"status": {"values": ["open"]}}'
//! direction = "desc"
//! telemetry = true
//! ```

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::SyncError;
use crate::filter::FilterChange;
use crate::sort::SortState;

/// Configuration for a single synchroniser run.
///
/// # Example
///
/// ```no_run
/// use ortho_config::OrthoConfig;
/// use querysync::QuerySyncConfig;
///
/// let config = QuerySyncConfig::load().expect("failed to load configuration");
/// let start = config.start_url().expect("starting URL required");
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "QUERYSYNC",
    discovery(
        dotfile_name = ".querysync.toml",
        config_file_name = "querysync.toml",
        app_name = "querysync"
    )
)]
pub struct QuerySyncConfig {
    /// Location to start from.
    ///
    /// Can be provided via:
    /// - CLI: `--url <URL>` or `-u <URL>`
    /// - Environment: `QUERYSYNC_URL`
    /// - Config file: `url = "..."`
    #[ortho_config(cli_short = 'u')]
    pub url: Option<String>,

    /// Filter-change event detail, as JSON, applied to the location.
    ///
    /// Can be provided via:
    /// - CLI: `--filter-event <JSON>` or `-f <JSON>`
    /// - Environment: `QUERYSYNC_FILTER_EVENT`
    /// - Config file: `filter_event = '...'`
    #[ortho_config(cli_short = 'f')]
    pub filter_event: Option<String>,

    /// Value of the table's `sort` attribute.
    ///
    /// Can be provided via:
    /// - CLI: `--sort <FIELD>` or `-s <FIELD>`
    /// - Environment: `QUERYSYNC_SORT`
    /// - Config file: `sort = "..."`
    #[ortho_config(cli_short = 's')]
    pub sort: Option<String>,

    /// Value of the table's `direction` attribute.
    ///
    /// Can be provided via:
    /// - CLI: `--direction <DIR>` or `-d <DIR>`
    /// - Environment: `QUERYSYNC_DIRECTION`
    /// - Config file: `direction = "..."`
    #[ortho_config(cli_short = 'd')]
    pub direction: Option<String>,

    /// Applies a sort update with both attributes removed.
    ///
    /// Can be provided via:
    /// - CLI: `--clear-sort` / `-C`
    /// - Config file: `clear_sort = true`
    #[ortho_config(cli_short = 'C')]
    pub clear_sort: bool,

    /// Streams telemetry events to stderr as JSON lines.
    ///
    /// Can be provided via:
    /// - CLI: `--telemetry`
    /// - Config file: `telemetry = true`
    #[ortho_config()]
    pub telemetry: bool,
}

impl QuerySyncConfig {
    /// Returns the configured starting URL or an error if missing.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::MissingUrl`] when no URL is configured.
    pub fn require_url(&self) -> Result<&str, SyncError> {
        self.url.as_deref().ok_or(SyncError::MissingUrl)
    }

    /// Parses the starting URL.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::MissingUrl`] when no URL is configured and
    /// [`SyncError::InvalidUrl`] when it is not an absolute URL.
    pub fn start_url(&self) -> Result<Url, SyncError> {
        let raw = self.require_url()?;
        Url::parse(raw).map_err(|error| SyncError::InvalidUrl(error.to_string()))
    }

    /// Decodes the configured filter event, if any.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::InvalidFilterEvent`] when the payload is not a
    /// JSON object.
    pub fn filter_change(&self) -> Result<Option<FilterChange>, SyncError> {
        self.filter_event
            .as_deref()
            .map(FilterChange::from_json)
            .transpose()
    }

    /// Returns the sort state to apply, if a sort update was requested.
    #[must_use]
    pub fn sort_update(&self) -> Option<SortState> {
        if self.clear_sort {
            return Some(SortState::default());
        }
        if self.sort.is_none() && self.direction.is_none() {
            return None;
        }
        Some(SortState::new(
            self.sort.as_deref(),
            self.direction.as_deref(),
        ))
    }

    /// Validates configuration consistency.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Configuration`] when `clear_sort` is combined
    /// with a `sort` or `direction` value.
    pub fn validate(&self) -> Result<(), SyncError> {
        if self.clear_sort && (self.sort.is_some() || self.direction.is_some()) {
            return Err(SyncError::Configuration {
                message: "--clear-sort cannot be combined with --sort or --direction".to_owned(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
