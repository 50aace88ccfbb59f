//! Client-side sorting of an already fetched page.
//!
//! Used for columns the backend cannot order by. It only reorders the rows
//! of the current page and never triggers a fetch.

use std::cmp::Ordering;

use chrono::NaiveDate;

use super::query::SortDirection;

/// Comparable value extracted from a row.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortKey {
    /// Integer values.
    Number(i64),
    /// Calendar dates.
    Date(NaiveDate),
    /// Text, stored lowercased so ordering ignores case.
    Text(String),
    /// The row has no value for the field.
    Missing,
}

impl SortKey {
    /// Case-insensitive text key.
    #[must_use]
    pub fn text(value: &str) -> Self {
        Self::Text(value.to_lowercase())
    }
}

/// Rows that expose named fields for sorting.
pub trait RowFields {
    /// Returns the sort key for `name`, or [`SortKey::Missing`].
    fn field(&self, name: &str) -> SortKey;
}

impl RowFields for serde_json::Value {
    /// Looks up `name` as a `__`-separated path (`agency__name`).
    fn field(&self, name: &str) -> SortKey {
        let found = name
            .split("__")
            .try_fold(self, |value, segment| value.get(segment));

        match found {
            Some(serde_json::Value::Number(number)) => {
                number.as_i64().map_or(SortKey::Missing, SortKey::Number)
            }
            Some(serde_json::Value::String(text)) => NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .map_or_else(|_| SortKey::text(text), SortKey::Date),
            Some(serde_json::Value::Bool(flag)) => SortKey::Number(i64::from(*flag)),
            _ => SortKey::Missing,
        }
    }
}

/// Sorts `rows` by `field`; missing values go last in either direction.
///
/// The sort is stable, so rows with equal keys keep the backend's order.
#[must_use]
pub fn sort_rows<T: RowFields>(rows: Vec<T>, field: &str, direction: SortDirection) -> Vec<T> {
    let mut keyed: Vec<(SortKey, T)> = rows.into_iter().map(|row| (row.field(field), row)).collect();
    keyed.sort_by(|(left, _), (right, _)| match direction {
        SortDirection::Asc => left.cmp(right),
        SortDirection::Desc => compare_desc(left, right),
    });
    keyed.into_iter().map(|(_, row)| row).collect()
}

fn compare_desc(left: &SortKey, right: &SortKey) -> Ordering {
    match (left, right) {
        (SortKey::Missing, SortKey::Missing) => Ordering::Equal,
        (SortKey::Missing, _) => Ordering::Greater,
        (_, SortKey::Missing) => Ordering::Less,
        _ => right.cmp(left),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::{Value, json};

    use super::{RowFields, SortKey, sort_rows};
    use crate::table::query::SortDirection;

    fn rows() -> Vec<Value> {
        vec![
            json!({"id": 1, "address": "b street", "agency": {"name": "Zed"}}),
            json!({"id": 2, "address": "A street"}),
            json!({"id": 3, "address": "c street", "agency": {"name": "Alpha"}}),
        ]
    }

    fn ids(rows: &[Value]) -> Vec<i64> {
        rows.iter()
            .filter_map(|row| row.get("id").and_then(Value::as_i64))
            .collect()
    }

    #[rstest]
    #[case(SortDirection::Asc, vec![2, 1, 3])]
    #[case(SortDirection::Desc, vec![3, 1, 2])]
    fn sorts_text_case_insensitively(#[case] direction: SortDirection, #[case] expected: Vec<i64>) {
        let sorted = sort_rows(rows(), "address", direction);
        assert_eq!(ids(&sorted), expected);
    }

    #[rstest]
    #[case(SortDirection::Asc, vec![3, 1, 2])]
    #[case(SortDirection::Desc, vec![1, 3, 2])]
    fn missing_values_sort_last(#[case] direction: SortDirection, #[case] expected: Vec<i64>) {
        let sorted = sort_rows(rows(), "agency__name", direction);
        assert_eq!(ids(&sorted), expected);
    }

    #[rstest]
    fn date_strings_compare_as_dates() {
        let row = json!({"reported_date": "2024-02-01"});
        assert!(matches!(row.field("reported_date"), SortKey::Date(_)));
        assert_eq!(json!({"n": 4}).field("n"), SortKey::Number(4));
        assert_eq!(json!({}).field("n"), SortKey::Missing);
    }

    #[rstest]
    fn equal_keys_keep_fetched_order() {
        let rows = vec![
            json!({"id": 1, "status": "open"}),
            json!({"id": 2, "status": "open"}),
            json!({"id": 3, "status": "closed"}),
        ];
        let sorted = sort_rows(rows, "status", SortDirection::Desc);
        assert_eq!(ids(&sorted), vec![1, 2, 3]);
    }
}
