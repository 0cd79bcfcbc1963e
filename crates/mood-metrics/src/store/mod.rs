//! Row-oriented storage boundary.
//!
//! The scoring engine and check-in service only ever talk to storage through [`RowStore`]:
//! table name in, JSON objects out. Filters are plain equality/range predicates so any
//! relational or REST-backed store can implement the trait.

use std::cmp::Ordering;

use serde_json::{Map, Value};

use crate::scoring::day_bounds::parse_instant;

/// A single stored record.
pub type Row = Map<String, Value>;

/// Column predicate applied by [`RowStore::read_rows`] and [`RowStore::update_row`].
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Eq(String, Value),
    Gte(String, Value),
    Lt(String, Value),
}

impl Filter {
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Eq(column.into(), value.into())
    }

    pub fn gte(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Gte(column.into(), value.into())
    }

    pub fn lt(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Lt(column.into(), value.into())
    }

    pub fn column(&self) -> &str {
        match self {
            Filter::Eq(column, _) | Filter::Gte(column, _) | Filter::Lt(column, _) => column,
        }
    }

    /// Evaluates the predicate against a row. Missing columns never match.
    pub fn matches(&self, row: &Row) -> bool {
        let Some(actual) = row.get(self.column()) else {
            return false;
        };
        match self {
            Filter::Eq(_, expected) => {
                compare_values(actual, expected) == Some(Ordering::Equal)
            }
            Filter::Gte(_, bound) => matches!(
                compare_values(actual, bound),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            Filter::Lt(_, bound) => compare_values(actual, bound) == Some(Ordering::Less),
        }
    }
}

/// Result ordering for reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub column: String,
    pub descending: bool,
}

impl Order {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            descending: false,
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            descending: true,
        }
    }

    /// Compares two rows on the ordering column; rows lacking the column sort last.
    pub fn compare(&self, left: &Row, right: &Row) -> Ordering {
        let ordering = match (left.get(&self.column), right.get(&self.column)) {
            (Some(a), Some(b)) => compare_values(a, b).unwrap_or(Ordering::Equal),
            (Some(_), None) => return Ordering::Less,
            (None, Some(_)) => return Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        if self.descending {
            ordering.reverse()
        } else {
            ordering
        }
    }
}

/// Storage abstraction for every table the service touches.
pub trait RowStore: Send + Sync {
    fn read_rows(
        &self,
        table: &str,
        filters: &[Filter],
        order: Option<&Order>,
        limit: Option<usize>,
    ) -> Result<Vec<Row>, StoreError>;

    fn insert_row(&self, table: &str, fields: Row) -> Result<Row, StoreError>;

    /// Applies `fields` to every row matching `filters`, returning the first updated row.
    fn update_row(
        &self,
        table: &str,
        filters: &[Filter],
        fields: Row,
    ) -> Result<Option<Row>, StoreError>;
}

/// Error enumeration for storage failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Orders two JSON values: numbers and numeric strings numerically, timestamps as instants,
/// other strings lexicographically. Mismatched kinds are incomparable.
pub fn compare_values(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::String(a), Value::String(b)) => {
            if let (Some(left), Some(right)) = (parse_instant(a), parse_instant(b)) {
                return Some(left.cmp(&right));
            }
            if let (Ok(left), Ok(right)) = (a.trim().parse::<f64>(), b.trim().parse::<f64>()) {
                return left.partial_cmp(&right);
            }
            Some(a.cmp(b))
        }
        (Value::Number(a), Value::String(b)) => {
            a.as_f64()?.partial_cmp(&b.trim().parse::<f64>().ok()?)
        }
        (Value::String(a), Value::Number(b)) => {
            a.trim().parse::<f64>().ok()?.partial_cmp(&b.as_f64()?)
        }
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> Row {
        value.as_object().cloned().expect("object literal")
    }

    #[test]
    fn equality_treats_numeric_strings_as_numbers() {
        let stored = row(json!({ "userId": 42 }));
        assert!(Filter::eq("userId", "42").matches(&stored));
        assert!(!Filter::eq("userId", 7).matches(&stored));
        assert!(!Filter::eq("missing", 42).matches(&stored));
    }

    #[test]
    fn range_filters_compare_timestamps_as_instants() {
        let stored = row(json!({ "created_timestamp": "2025-09-07T01:30:00+08:00" }));
        assert!(Filter::gte("created_timestamp", "2025-09-06T16:00:00+00:00").matches(&stored));
        assert!(Filter::lt("created_timestamp", "2025-09-07T16:00:00+00:00").matches(&stored));
        assert!(!Filter::gte("created_timestamp", "2025-09-06T18:00:00Z").matches(&stored));
    }

    #[test]
    fn descending_order_puts_missing_columns_last() {
        let order = Order::desc("display_order");
        let mut rows = vec![
            row(json!({ "display_order": 1 })),
            row(json!({})),
            row(json!({ "display_order": 3 })),
        ];
        rows.sort_by(|a, b| order.compare(a, b));
        assert_eq!(rows[0].get("display_order"), Some(&json!(3)));
        assert_eq!(rows[1].get("display_order"), Some(&json!(1)));
        assert!(rows[2].is_empty());
    }

    #[test]
    fn numeric_text_sorts_by_value() {
        let order = Order::asc("display_order");
        let mut rows = vec![
            row(json!({ "display_order": "10" })),
            row(json!({ "display_order": "2" })),
            row(json!({ "display_order": "beta" })),
            row(json!({ "display_order": "alpha" })),
        ];
        rows.sort_by(|a, b| order.compare(a, b));
        assert_eq!(rows[0].get("display_order"), Some(&json!("2")));
        assert_eq!(rows[1].get("display_order"), Some(&json!("10")));
        assert_eq!(
            compare_values(&json!("alpha"), &json!("beta")),
            Some(Ordering::Less)
        );
    }
}
