//! Behavioural tests for CLI configuration loading.

use ortho_config::MergeComposer;
use querysync::{QuerySyncConfig, SortState, SyncError};
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::{ScenarioState, given, scenario, then, when};
use serde_json::{Value, json};

/// State for CLI configuration scenarios.
///
/// Uses JSON values to represent configuration layers since `MergeComposer`
/// doesn't implement Clone. The composer is built fresh in `build_config`.
#[derive(ScenarioState, Default)]
struct ConfigState {
    env_layer: Slot<Value>,
    cli_layer: Slot<Value>,
    config: Slot<QuerySyncConfig>,
    url_error: Slot<SyncError>,
}

#[fixture]
fn config_state() -> ConfigState {
    ConfigState::default()
}

/// Builds and stores the configuration from the accumulated layers.
fn build_config(state: &ConfigState) {
    let mut composer = MergeComposer::new();

    // The struct needs at least one valid layer with its shape.
    composer.push_defaults(json!({"url": null}));

    if let Some(env) = state.env_layer.get() {
        composer.push_environment(env);
    }

    if let Some(cli) = state.cli_layer.get() {
        composer.push_cli(cli);
    }

    match QuerySyncConfig::merge_from_layers(composer.layers()) {
        Ok(config) => {
            state.config.set(config);
        }
        Err(error) => {
            panic!("failed to merge configuration: {error}");
        }
    }
}

fn built_config(state: &ConfigState) -> QuerySyncConfig {
    state
        .config
        .get()
        .unwrap_or_else(|| panic!("configuration not built"))
}

// --- Given steps ---

#[given("a configuration with environment url {url}")]
fn env_url_set(config_state: &ConfigState, url: String) {
    let url_clean = url.trim_matches('"');
    config_state.env_layer.set(json!({"url": url_clean}));
}

#[given("a configuration with environment direction {direction}")]
fn env_direction_set(config_state: &ConfigState, direction: String) {
    let direction_clean = direction.trim_matches('"');
    config_state
        .env_layer
        .set(json!({"direction": direction_clean}));
}

// --- When steps ---

#[when("the CLI receives url {url}")]
fn cli_receives_url(config_state: &ConfigState, url: String) {
    let url_clean = url.trim_matches('"');
    config_state.cli_layer.set(json!({"url": url_clean}));
    build_config(config_state);
}

#[when("the CLI receives sort {sort}")]
fn cli_receives_sort(config_state: &ConfigState, sort: String) {
    let sort_clean = sort.trim_matches('"');
    config_state.cli_layer.set(json!({"sort": sort_clean}));
    build_config(config_state);
}

#[when("the CLI receives no url")]
fn cli_receives_no_url(config_state: &ConfigState) {
    build_config(config_state);
}

// --- Then steps ---

#[then("the configuration url is {expected}")]
fn assert_url(config_state: &ConfigState, expected: String) {
    let expected_clean = expected.trim_matches('"');
    let config = built_config(config_state);

    assert_eq!(config.url.as_deref(), Some(expected_clean), "url mismatch");
}

#[then("the sort update has sort {sort} and direction {direction}")]
fn assert_sort_update(config_state: &ConfigState, sort: String, direction: String) {
    let config = built_config(config_state);

    assert_eq!(
        config.sort_update(),
        Some(SortState::new(
            Some(sort.trim_matches('"')),
            Some(direction.trim_matches('"'))
        )),
        "sort update mismatch"
    );
}

#[then("requiring url returns an error")]
fn assert_url_error(config_state: &ConfigState) {
    let config = built_config(config_state);

    let result = config.require_url();
    assert!(
        matches!(result, Err(SyncError::MissingUrl)),
        "expected url to return MissingUrl"
    );

    if let Err(error) = result {
        config_state.url_error.set(error);
    }
}

// --- Scenario bindings ---

#[scenario(path = "tests/features/cli_config.feature", index = 0)]
fn load_url_from_cli(config_state: ConfigState) {
    let _ = config_state;
}

#[scenario(path = "tests/features/cli_config.feature", index = 1)]
fn cli_url_overrides_env(config_state: ConfigState) {
    let _ = config_state;
}

#[scenario(path = "tests/features/cli_config.feature", index = 2)]
fn sort_combines_layers(config_state: ConfigState) {
    let _ = config_state;
}

#[scenario(path = "tests/features/cli_config.feature", index = 3)]
fn missing_url_error(config_state: ConfigState) {
    let _ = config_state;
}
