//! Filter-change payloads emitted by the table's filter widget.
//!
//! The widget dispatches an `action-table-filter` event whose detail maps each
//! filter key to a descriptor of the form `{ "values": [...] }`. Payloads are
//! decoded leniently: a descriptor without a usable `values` array simply
//! carries no values, which clears that key from the query string.

use std::num::FpCategory;

use serde_json::{Map, Number, Value};

use crate::error::SyncError;
use crate::query::QueryString;

/// Name of the custom DOM event carrying filter changes.
pub const FILTER_EVENT: &str = "action-table-filter";

/// A candidate value from a filter descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    /// A string value, written to the query exactly as given.
    Text(String),
    /// A numeric value, written the way a page would stringify it.
    Number(Number),
    /// A boolean value, written as `true` or `false`.
    Bool(bool),
    /// `null`, `undefined`, or a nested structure.
    Missing,
}

impl FilterValue {
    /// Returns the query-string form of the value, or `None` when the value
    /// is missing or blank after trimming.
    ///
    /// The trim only decides validity; surrounding whitespace is preserved
    /// in the returned text.
    #[must_use]
    pub fn query_value(&self) -> Option<String> {
        let text = match self {
            Self::Text(text) => text.clone(),
            Self::Number(number) => number_text(number),
            Self::Bool(flag) => flag.to_string(),
            Self::Missing => return None,
        };
        (!text.trim_matches(is_page_whitespace).is_empty()).then_some(text)
    }
}

/// Whitespace as `String.prototype.trim` sees it: Unicode `White_Space`
/// without NEL, plus the byte-order mark.
fn is_page_whitespace(character: char) -> bool {
    character == '\u{feff}' || (character.is_whitespace() && character != '\u{85}')
}

/// Formats a number like `Number.prototype.toString`.
fn number_text(number: &Number) -> String {
    match number.as_f64() {
        Some(float) if number.is_f64() => float_text(float),
        _ => number.to_string(),
    }
}

fn float_text(float: f64) -> String {
    if float.classify() == FpCategory::Zero {
        return "0".to_owned();
    }
    if (1e-6..1e21).contains(&float.abs()) {
        return format!("{float}");
    }
    let scientific = format!("{float:e}");
    match scientific.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => scientific,
    }
}

impl From<&Value> for FilterValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::String(text) => Self::Text(text.clone()),
            Value::Number(number) => Self::Number(number.clone()),
            Value::Bool(flag) => Self::Bool(*flag),
            Value::Null | Value::Array(_) | Value::Object(_) => Self::Missing,
        }
    }
}

impl From<&str> for FilterValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

/// The selected values for a single filter key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterDescriptor {
    values: Vec<FilterValue>,
}

impl FilterDescriptor {
    /// Creates a descriptor from candidate values.
    #[must_use]
    pub const fn new(values: Vec<FilterValue>) -> Self {
        Self { values }
    }

    /// Decodes a descriptor from the event detail.
    ///
    /// Anything other than an object with a `values` array yields an empty
    /// descriptor.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let values = value
            .get("values")
            .and_then(Value::as_array)
            .map(|candidates| candidates.iter().map(FilterValue::from).collect())
            .unwrap_or_default();
        Self { values }
    }

    /// Returns the values that will be written to the query, in order.
    #[must_use]
    pub fn valid_values(&self) -> Vec<String> {
        self.values
            .iter()
            .filter_map(FilterValue::query_value)
            .collect()
    }
}

/// A filter-change event: descriptors keyed by filter name, in event order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterChange {
    filters: Vec<(String, FilterDescriptor)>,
}

impl FilterChange {
    /// Creates an empty filter change.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// Adds (or replaces) the descriptor for `key`.
    #[must_use]
    pub fn with_filter(mut self, key: &str, descriptor: FilterDescriptor) -> Self {
        if let Some(slot) = self
            .filters
            .iter_mut()
            .find(|(existing, _)| existing == key)
        {
            slot.1 = descriptor;
        } else {
            self.filters.push((key.to_owned(), descriptor));
        }
        self
    }

    /// Decodes a change from JSON text such as
    /// `{"color": {"values": ["red", "blue"]}}`.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::InvalidFilterEvent`] when the text is not JSON or
    /// the top-level value is not an object.
    pub fn from_json(text: &str) -> Result<Self, SyncError> {
        let value: Value =
            serde_json::from_str(text).map_err(|error| SyncError::InvalidFilterEvent {
                message: error.to_string(),
            })?;
        Self::try_from(value)
    }

    /// Builds a change from a decoded object, keeping key order.
    #[must_use]
    pub fn from_map(map: &Map<String, Value>) -> Self {
        let filters = map
            .iter()
            .map(|(key, descriptor)| (key.clone(), FilterDescriptor::from_value(descriptor)))
            .collect();
        Self { filters }
    }

    /// Returns the descriptors in event order.
    #[must_use]
    pub fn filters(&self) -> &[(String, FilterDescriptor)] {
        &self.filters
    }

    /// Rewrites `query` for every key in the change.
    ///
    /// Each key's existing entries are removed before its valid values are
    /// appended; keys absent from the change are left untouched.
    pub fn apply_to(&self, query: &mut QueryString) {
        for (key, descriptor) in &self.filters {
            query.delete(key);
            for value in descriptor.valid_values() {
                query.append(key, &value);
            }
        }
    }
}

impl TryFrom<Value> for FilterChange {
    type Error = SyncError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self::from_map(&map)),
            other => Err(SyncError::InvalidFilterEvent {
                message: format!("expected a JSON object, got {other}"),
            }),
        }
    }
}

#[cfg(test)]
mod tests;
