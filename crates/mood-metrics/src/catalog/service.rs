use std::sync::Arc;

use axum::http::StatusCode;
use serde::Serialize;
use serde_json::Value;

use crate::config::TableNames;
use crate::store::{Filter, Order, Row, RowStore, StoreError};

const RANGE_COLUMNS: [&str; 5] = ["id", "min_value", "max_value", "step_value", "field_name"];
const LABEL_COLUMNS: [&str; 3] = ["id", "field_name", "labelvalue"];
const MASCOT_COLUMNS: [&str; 3] = ["id", "feeling", "encourageWords"];
const ENCOURAGE_WORDS: &str = "encourageWords";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogRows {
    pub rows: Vec<Row>,
    pub count: usize,
}

impl CatalogRows {
    fn new(rows: Vec<Row>) -> Self {
        let count = rows.len();
        Self { rows, count }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EncouragementWords {
    pub feeling: String,
    pub encourage_words: Vec<Value>,
}

/// Filtered lookups over the reference tables.
pub struct CatalogService<S> {
    store: Arc<S>,
    tables: TableNames,
}

impl<S> CatalogService<S>
where
    S: RowStore + 'static,
{
    pub fn new(store: Arc<S>, tables: TableNames) -> Self {
        Self { store, tables }
    }

    pub fn range_config(&self, field_name: Option<&str>) -> Result<CatalogRows, CatalogError> {
        let field_name = required_param(field_name, "field_name")?;
        let rows = self.matching(&self.tables.range_config, "field_name", field_name)?;
        Ok(CatalogRows::new(project(rows, &RANGE_COLUMNS)))
    }

    pub fn label_options(&self, field_name: Option<&str>) -> Result<CatalogRows, CatalogError> {
        let field_name = required_param(field_name, "field_name")?;
        let rows = self.matching(&self.tables.label_options, "field_name", field_name)?;
        Ok(CatalogRows::new(project(rows, &LABEL_COLUMNS)))
    }

    /// Encouragement lines for one feeling. Rows with a blank line are left out.
    pub fn mascot_words(&self, feeling: Option<&str>) -> Result<EncouragementWords, CatalogError> {
        let feeling = required_param(feeling, "feeling")?;
        let rows = self.matching(&self.tables.mascot, "feeling", feeling)?;
        let encourage_words = rows
            .into_iter()
            .filter_map(|mut row| row.remove(ENCOURAGE_WORDS))
            .filter(is_present)
            .collect();

        Ok(EncouragementWords {
            feeling: feeling.to_string(),
            encourage_words,
        })
    }

    /// Every encouragement row, newest id first. An empty table is not an error.
    pub fn all_encouragement(&self) -> Result<CatalogRows, CatalogError> {
        let rows = self
            .store
            .read_rows(&self.tables.mascot, &[], Some(&Order::desc("id")), None)?;
        Ok(CatalogRows::new(project(rows, &MASCOT_COLUMNS)))
    }

    fn matching(&self, table: &str, column: &str, value: &str) -> Result<Vec<Row>, CatalogError> {
        let rows = self
            .store
            .read_rows(table, &[Filter::eq(column, value)], None, None)?;
        if rows.is_empty() {
            return Err(CatalogError::NoRows);
        }
        Ok(rows)
    }
}

fn required_param<'a>(
    value: Option<&'a str>,
    name: &'static str,
) -> Result<&'a str, CatalogError> {
    value
        .filter(|raw| !raw.is_empty())
        .ok_or(CatalogError::MissingParam(name))
}

fn project(rows: Vec<Row>, columns: &[&str]) -> Vec<Row> {
    rows.into_iter()
        .map(|row| {
            columns
                .iter()
                .map(|column| {
                    let value = row.get(*column).cloned().unwrap_or(Value::Null);
                    (column.to_string(), value)
                })
                .collect()
        })
        .collect()
}

/// JSON truthiness: null, false, zero, and empty text or collections are blank.
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64() != Some(0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Missing {0}")]
    MissingParam(&'static str),
    #[error("No rows found")]
    NoRows,
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CatalogError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            CatalogError::MissingParam(_) => StatusCode::BAD_REQUEST,
            CatalogError::NoRows => StatusCode::NOT_FOUND,
            CatalogError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
