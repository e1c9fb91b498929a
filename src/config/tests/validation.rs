//! Tests for configuration consistency validation.

use rstest::rstest;

use crate::QuerySyncConfig;
use crate::error::SyncError;

#[rstest]
fn validates_default_configuration() {
    assert!(QuerySyncConfig::default().validate().is_ok());
}

#[rstest]
fn validates_sort_without_clear() {
    let config = QuerySyncConfig {
        sort: Some("name".to_owned()),
        direction: Some("asc".to_owned()),
        ..Default::default()
    };

    assert!(config.validate().is_ok(), "sort and direction may be combined");
}

#[rstest]
#[case::with_sort(Some("name"), None)]
#[case::with_direction(None, Some("asc"))]
fn rejects_clear_sort_with_values(#[case] sort: Option<&str>, #[case] direction: Option<&str>) {
    let config = QuerySyncConfig {
        sort: sort.map(ToOwned::to_owned),
        direction: direction.map(ToOwned::to_owned),
        clear_sort: true,
        ..Default::default()
    };

    assert!(
        matches!(config.validate(), Err(SyncError::Configuration { .. })),
        "clear_sort should conflict with explicit values"
    );
}
