use std::sync::Arc;

use tracing::{debug, warn};

use super::bands::ScoreBand;
use super::rules::{default_weight_rules, WeightRule};
use crate::store::{Order, RowStore};

/// Reads scoring configuration from the row store on every call.
///
/// Nothing is cached: two back-to-back requests may see different configurations.
pub struct ScoringConfigProvider<S> {
    store: Arc<S>,
    weights_table: String,
    bands_table: String,
}

impl<S> ScoringConfigProvider<S>
where
    S: RowStore + 'static,
{
    pub fn new(
        store: Arc<S>,
        weights_table: impl Into<String>,
        bands_table: impl Into<String>,
    ) -> Self {
        Self {
            store,
            weights_table: weights_table.into(),
            bands_table: bands_table.into(),
        }
    }

    /// Weight rules from the store, or the built-in defaults when the store fails or yields
    /// no usable rule.
    pub fn get_weights(&self) -> Vec<WeightRule> {
        let rows = match self.store.read_rows(&self.weights_table, &[], None, None) {
            Ok(rows) => rows,
            Err(error) => {
                warn!(%error, table = %self.weights_table, "weight store unavailable, using defaults");
                return default_weight_rules().to_vec();
            }
        };

        let rules: Vec<WeightRule> = rows
            .iter()
            .filter_map(|row| match WeightRule::from_row(row) {
                Ok(rule) => Some(rule),
                Err(error) => {
                    debug!(%error, "skipping weight row");
                    None
                }
            })
            .collect();

        if rules.is_empty() {
            warn!(table = %self.weights_table, "no weight rules configured, using defaults");
            return default_weight_rules().to_vec();
        }

        rules
    }

    /// Band rules in ascending `display_order`. Failures yield no bands, never an error.
    pub fn get_bands(&self) -> Vec<ScoreBand> {
        let order = Order::asc("display_order");
        let rows = match self
            .store
            .read_rows(&self.bands_table, &[], Some(&order), None)
        {
            Ok(rows) => rows,
            Err(error) => {
                warn!(%error, table = %self.bands_table, "band store unavailable");
                return Vec::new();
            }
        };

        rows.iter()
            .filter_map(|row| match ScoreBand::from_row(row) {
                Ok(band) => Some(band),
                Err(error) => {
                    debug!(%error, "skipping band row");
                    None
                }
            })
            .collect()
    }
}
