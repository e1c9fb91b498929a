//! Querysync CLI entrypoint for applying table state to a URL.

use std::io::{self, Write};
use std::process::ExitCode;

use ortho_config::OrthoConfig;
use querysync::telemetry::{StderrJsonlTelemetrySink, TelemetrySink};
use querysync::{History, QuerySyncConfig, RecordingHistory, SyncError, UrlStateSynchronizer};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            if writeln!(io::stderr().lock(), "{error}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), SyncError> {
    let config = load_config()?;
    config.validate()?;

    let history = RecordingHistory::new(config.start_url()?);
    let final_history = if config.telemetry {
        apply_updates(
            UrlStateSynchronizer::with_telemetry(history, StderrJsonlTelemetrySink),
            &config,
        )?
    } else {
        apply_updates(UrlStateSynchronizer::new(history), &config)?
    };

    write_location(&final_history)
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`SyncError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<QuerySyncConfig, SyncError> {
    QuerySyncConfig::load().map_err(|error| SyncError::Configuration {
        message: error.to_string(),
    })
}

/// Applies the filter event first, then the sort update, mirroring a page
/// where the user filters and then re-sorts.
fn apply_updates<T: TelemetrySink>(
    mut synchronizer: UrlStateSynchronizer<RecordingHistory, T>,
    config: &QuerySyncConfig,
) -> Result<RecordingHistory, SyncError> {
    if let Some(change) = config.filter_change()? {
        synchronizer.on_filter_changed(&change);
    }
    if let Some(state) = config.sort_update() {
        synchronizer.on_sort_changed(&state);
    }
    Ok(synchronizer.into_history())
}

fn write_location(history: &RecordingHistory) -> Result<(), SyncError> {
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", history.location()).map_err(|error| SyncError::Io {
        message: error.to_string(),
    })
}
