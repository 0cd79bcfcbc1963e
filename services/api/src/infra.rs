use metrics_exporter_prometheus::PrometheusHandle;
use mood_metrics::error::AppError;
use mood_metrics::store::{Filter, Order, Row, RowStore, StoreError};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local row store. Rows without an `id` get the next integer on insert.
#[derive(Default, Clone)]
pub(crate) struct InMemoryRowStore {
    tables: Arc<Mutex<HashMap<String, Vec<Row>>>>,
    next_id: Arc<AtomicI64>,
}

impl InMemoryRowStore {
    /// Loads `{ "<table>": [row, ...] }` from a JSON file.
    pub(crate) fn from_seed_file(path: &Path) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path)?;
        let tables: HashMap<String, Vec<Row>> = serde_json::from_str(&raw)?;
        Ok(Self::with_tables(tables))
    }

    pub(crate) fn with_tables(tables: HashMap<String, Vec<Row>>) -> Self {
        let highest_id = tables
            .values()
            .flatten()
            .filter_map(|row| row.get("id").and_then(Value::as_i64))
            .max()
            .unwrap_or(0);
        Self {
            tables: Arc::new(Mutex::new(tables)),
            next_id: Arc::new(AtomicI64::new(highest_id)),
        }
    }

    pub(crate) fn row_count(&self) -> usize {
        let guard = self.tables.lock().expect("row store mutex poisoned");
        guard.values().map(Vec::len).sum()
    }
}

impl RowStore for InMemoryRowStore {
    fn read_rows(
        &self,
        table: &str,
        filters: &[Filter],
        order: Option<&Order>,
        limit: Option<usize>,
    ) -> Result<Vec<Row>, StoreError> {
        let guard = self.tables.lock().expect("row store mutex poisoned");
        let mut rows: Vec<Row> = guard
            .get(table)
            .into_iter()
            .flatten()
            .filter(|row| filters.iter().all(|filter| filter.matches(row)))
            .cloned()
            .collect();
        if let Some(order) = order {
            rows.sort_by(|left, right| order.compare(left, right));
        }
        if let Some(limit) = limit {
            rows.truncate(limit);
        }
        Ok(rows)
    }

    fn insert_row(&self, table: &str, mut fields: Row) -> Result<Row, StoreError> {
        if !fields.contains_key("id") {
            let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
            fields.insert("id".to_string(), Value::from(id));
        }
        let mut guard = self.tables.lock().expect("row store mutex poisoned");
        guard
            .entry(table.to_string())
            .or_default()
            .push(fields.clone());
        Ok(fields)
    }

    fn update_row(
        &self,
        table: &str,
        filters: &[Filter],
        fields: Row,
    ) -> Result<Option<Row>, StoreError> {
        let mut guard = self.tables.lock().expect("row store mutex poisoned");
        let Some(rows) = guard.get_mut(table) else {
            return Ok(None);
        };
        let mut updated = None;
        for row in rows
            .iter_mut()
            .filter(|row| filters.iter().all(|filter| filter.matches(row)))
        {
            row.extend(fields.clone());
            updated.get_or_insert_with(|| row.clone());
        }
        Ok(updated)
    }
}
