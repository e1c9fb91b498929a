//! Sort state mirrored from the table element's attributes.
//!
//! The table widget exposes its sort as two attributes, `sort` and
//! `direction`. Both are re-read on every mutation notification and written
//! into singleton query parameters of the same names.

use crate::query::QueryString;

/// Query parameter (and table attribute) holding the sorted field.
pub const SORT_PARAM: &str = "sort";

/// Query parameter (and table attribute) holding the sort direction.
pub const DIRECTION_PARAM: &str = "direction";

/// Attributes of the table element that feed the sort state.
pub const OBSERVED_ATTRIBUTES: [&str; 2] = [SORT_PARAM, DIRECTION_PARAM];

/// The `(sort, direction)` pair read from the table element.
///
/// An empty attribute value is stored as `None`: a cleared attribute and a
/// removed attribute both remove the query parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortState {
    sort: Option<String>,
    direction: Option<String>,
}

impl SortState {
    /// Creates a sort state from raw attribute values.
    #[must_use]
    pub fn new(sort: Option<&str>, direction: Option<&str>) -> Self {
        Self {
            sort: non_empty(sort),
            direction: non_empty(direction),
        }
    }

    /// Returns the sorted field, if any.
    #[must_use]
    pub fn sort(&self) -> Option<&str> {
        self.sort.as_deref()
    }

    /// Returns the sort direction, if any.
    #[must_use]
    pub fn direction(&self) -> Option<&str> {
        self.direction.as_deref()
    }

    /// Writes the state into `query`, setting present values and deleting
    /// absent ones.
    pub fn apply_to(&self, query: &mut QueryString) {
        set_or_delete(query, SORT_PARAM, self.sort());
        set_or_delete(query, DIRECTION_PARAM, self.direction());
    }
}

fn set_or_delete(query: &mut QueryString, key: &str, value: Option<&str>) {
    match value {
        Some(present) => query.set(key, present),
        None => query.delete(key),
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|text| !text.is_empty()).map(ToOwned::to_owned)
}

/// A single attribute change reported by the table's mutation observer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeMutation {
    attribute_name: String,
}

impl AttributeMutation {
    /// Records a change to the named attribute.
    #[must_use]
    pub fn new(attribute_name: impl Into<String>) -> Self {
        Self {
            attribute_name: attribute_name.into(),
        }
    }

    /// Returns the changed attribute's name.
    #[must_use]
    pub fn attribute_name(&self) -> &str {
        &self.attribute_name
    }

    /// Returns true when the change affects the sort state.
    #[must_use]
    pub fn touches_sort(&self) -> bool {
        OBSERVED_ATTRIBUTES.contains(&self.attribute_name.as_str())
    }
}

/// Returns true when any mutation in a notification batch affects the sort
/// state. A batch collapses into at most one URL update.
#[must_use]
pub fn batch_touches_sort(mutations: &[AttributeMutation]) -> bool {
    mutations.iter().any(AttributeMutation::touches_sort)
}
