//! Unit tests for filter payload decoding and application.

use rstest::{fixture, rstest};
use serde_json::json;

use super::{FilterChange, FilterDescriptor, FilterValue};
use crate::error::SyncError;
use crate::query::QueryString;

#[fixture]
fn colour_query() -> QueryString {
    QueryString::parse("https://x/?color=green&page=2").expect("test URL should parse")
}

fn change(value: &serde_json::Value) -> FilterChange {
    FilterChange::try_from(value.clone()).expect("payload should be an object")
}

#[rstest]
fn invalid_values_are_dropped_in_order(mut colour_query: QueryString) {
    let event = change(&json!({"color": {"values": ["a", "", null, "b"]}}));

    event.apply_to(&mut colour_query);

    assert_eq!(colour_query.get_all("color"), vec!["a", "b"]);
    assert_eq!(colour_query.to_string(), "https://x/?page=2&color=a&color=b");
}

#[rstest]
#[case::empty_list(json!({"color": {"values": []}}))]
#[case::all_invalid(json!({"color": {"values": [null, "  ", ""]}}))]
#[case::missing_values(json!({"color": {}}))]
#[case::non_array_values(json!({"color": {"values": "red"}}))]
#[case::null_descriptor(json!({"color": null}))]
fn key_without_valid_values_is_cleared(
    mut colour_query: QueryString,
    #[case] payload: serde_json::Value,
) {
    change(&payload).apply_to(&mut colour_query);

    assert!(colour_query.get_all("color").is_empty());
    assert_eq!(colour_query.to_string(), "https://x/?page=2");
}

#[rstest]
fn key_with_unusable_descriptor_is_still_cleared() {
    let mut query = QueryString::parse("https://x/?color=green").expect("test URL should parse");

    FilterChange::new()
        .with_filter("color", FilterDescriptor::default())
        .apply_to(&mut query);

    assert_eq!(query.to_string(), "https://x/");
}

#[rstest]
fn stringified_page_values_are_appended_as_text() {
    let mut query = QueryString::parse("https://x/").expect("test URL should parse");
    let descriptor = FilterDescriptor::new(vec![
        "NaN".into(),
        FilterValue::Missing,
        "Infinity".into(),
        "12345678901234567890".into(),
    ]);

    FilterChange::new()
        .with_filter("n", descriptor)
        .apply_to(&mut query);

    assert_eq!(
        query.to_string(),
        "https://x/?n=NaN&n=Infinity&n=12345678901234567890"
    );
}

#[rstest]
fn replaces_existing_values() {
    let mut query = QueryString::parse("https://x/?color=green").expect("test URL should parse");

    change(&json!({"color": {"values": ["red", "blue"]}})).apply_to(&mut query);

    assert_eq!(query.to_string(), "https://x/?color=red&color=blue");
}

#[rstest]
fn keys_outside_the_event_are_untouched(mut colour_query: QueryString) {
    change(&json!({"size": {"values": ["l"]}})).apply_to(&mut colour_query);

    assert_eq!(colour_query.to_string(), "https://x/?color=green&page=2&size=l");
}

#[rstest]
fn applying_twice_matches_applying_once(mut colour_query: QueryString) {
    let event = change(&json!({"color": {"values": ["red"]}, "size": {"values": ["s", "m"]}}));

    event.apply_to(&mut colour_query);
    let once = colour_query.to_string();
    event.apply_to(&mut colour_query);

    assert_eq!(colour_query.to_string(), once);
}

#[rstest]
fn keys_are_applied_in_event_order() {
    let mut query = QueryString::parse("https://x/").expect("test URL should parse");

    FilterChange::from_json(r#"{"zeta": {"values": ["1"]}, "alpha": {"values": ["2"]}}"#)
        .expect("payload should decode")
        .apply_to(&mut query);

    assert_eq!(query.to_string(), "https://x/?zeta=1&alpha=2");
}

#[rstest]
#[case::text(FilterValue::from("  padded "), Some("  padded "))]
#[case::blank(FilterValue::from(" \t"), None)]
#[case::byte_order_mark(FilterValue::from("\u{feff}"), None)]
#[case::next_line(FilterValue::from("\u{85}"), Some("\u{85}"))]
#[case::number(FilterValue::from(&json!(42)), Some("42"))]
#[case::integral_float(FilterValue::from(&json!(1.0)), Some("1"))]
#[case::fraction(FilterValue::from(&json!(0.1)), Some("0.1"))]
#[case::negative_zero(FilterValue::from(&json!(-0.0)), Some("0"))]
#[case::large(FilterValue::from(&json!(1e21)), Some("1e+21"))]
#[case::below_large(FilterValue::from(&json!(1.5e20)), Some("150000000000000000000"))]
#[case::tiny(FilterValue::from(&json!(1.5e-7)), Some("1.5e-7"))]
#[case::small(FilterValue::from(&json!(0.000_001)), Some("0.000001"))]
#[case::boolean(FilterValue::Bool(false), Some("false"))]
#[case::nested(FilterValue::from(&json!(["x"])), None)]
#[case::missing(FilterValue::Missing, None)]
fn query_value_validity(#[case] value: FilterValue, #[case] expected: Option<&str>) {
    assert_eq!(value.query_value().as_deref(), expected);
}

#[rstest]
fn numbers_are_written_like_a_page_would() {
    let mut query = QueryString::parse("https://x/").expect("test URL should parse");

    FilterChange::from_json(r#"{"n": {"values": [1.0, 1e21, 0.1]}}"#)
        .expect("payload should decode")
        .apply_to(&mut query);

    assert_eq!(query.to_string(), "https://x/?n=1&n=1e%2B21&n=0.1");
}

#[rstest]
#[case::flag_and_empty_pairs("https://x/?flag&a=1&&b=2")]
#[case::bare_question_mark("https://x/?")]
fn empty_change_leaves_location_untouched(#[case] start: &str) {
    let mut query = QueryString::parse(start).expect("test URL should parse");

    FilterChange::from_json("{}")
        .expect("payload should decode")
        .apply_to(&mut query);

    assert_eq!(query.to_string(), start);
}

#[rstest]
fn builder_replaces_duplicate_keys() {
    let event = FilterChange::new()
        .with_filter("color", FilterDescriptor::new(vec!["red".into()]))
        .with_filter("color", FilterDescriptor::new(vec!["blue".into()]));

    assert_eq!(event.filters().len(), 1);
    assert_eq!(
        event
            .filters()
            .first()
            .map(|(_, descriptor)| descriptor.valid_values()),
        Some(vec!["blue".to_owned()])
    );
}

#[rstest]
#[case::array("[1, 2]")]
#[case::not_json("color=red")]
fn non_object_payloads_are_rejected(#[case] text: &str) {
    let result = FilterChange::from_json(text);

    assert!(
        matches!(result, Err(SyncError::InvalidFilterEvent { .. })),
        "expected InvalidFilterEvent, got {result:?}"
    );
}
