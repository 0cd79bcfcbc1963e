//! Test-only row store shared by the workflow test suites.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

use serde_json::{json, Value};

use crate::store::{Filter, Order, Row, RowStore, StoreError};

/// In-memory row store that can be told to fail for specific tables.
#[derive(Default)]
pub(crate) struct MemoryStore {
    tables: Mutex<HashMap<String, Vec<Row>>>,
    failing: Mutex<HashSet<String>>,
    next_id: AtomicI64,
}

impl MemoryStore {
    pub(crate) fn seed(&self, table: &str, rows: Vec<Value>) {
        let mut guard = self.tables.lock().expect("store mutex poisoned");
        let entry = guard.entry(table.to_string()).or_default();
        for value in rows {
            entry.push(object(value));
        }
    }

    pub(crate) fn fail_table(&self, table: &str) {
        self.failing
            .lock()
            .expect("failing mutex poisoned")
            .insert(table.to_string());
    }

    pub(crate) fn rows(&self, table: &str) -> Vec<Row> {
        self.tables
            .lock()
            .expect("store mutex poisoned")
            .get(table)
            .cloned()
            .unwrap_or_default()
    }

    fn check(&self, table: &str) -> Result<(), StoreError> {
        if self
            .failing
            .lock()
            .expect("failing mutex poisoned")
            .contains(table)
        {
            return Err(StoreError::Unavailable(format!("{table} offline")));
        }
        Ok(())
    }
}

impl RowStore for MemoryStore {
    fn read_rows(
        &self,
        table: &str,
        filters: &[Filter],
        order: Option<&Order>,
        limit: Option<usize>,
    ) -> Result<Vec<Row>, StoreError> {
        self.check(table)?;
        let guard = self.tables.lock().expect("store mutex poisoned");
        let mut rows: Vec<Row> = guard
            .get(table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| filters.iter().all(|filter| filter.matches(row)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        if let Some(order) = order {
            rows.sort_by(|a, b| order.compare(a, b));
        }
        if let Some(limit) = limit {
            rows.truncate(limit);
        }
        Ok(rows)
    }

    fn insert_row(&self, table: &str, mut fields: Row) -> Result<Row, StoreError> {
        self.check(table)?;
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        fields.entry("id").or_insert(json!(id));
        self.tables
            .lock()
            .expect("store mutex poisoned")
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
        self.check(table)?;
        let mut guard = self.tables.lock().expect("store mutex poisoned");
        let mut first = None;
        for row in guard.entry(table.to_string()).or_default().iter_mut() {
            if filters.iter().all(|filter| filter.matches(row)) {
                row.extend(fields.clone());
                first.get_or_insert_with(|| row.clone());
            }
        }
        Ok(first)
    }
}

pub(crate) fn object(value: Value) -> Row {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}
