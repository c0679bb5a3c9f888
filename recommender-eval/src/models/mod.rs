//! Core data model for the evaluation pipeline.
//!
//! The interaction list and the user-item matrix are built once during
//! ingestion and treated as read-only by every later stage.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Loosely-typed input row, as parsed from the retail CSV export.
///
/// All fields arrive as strings (possibly empty); validation happens in
/// `InteractionStore::ingest`, not here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawRow {
    #[serde(rename = "CustomerID", default)]
    pub customer_id: String,
    #[serde(rename = "StockCode", default)]
    pub stock_code: String,
    #[serde(rename = "Description", default)]
    pub description: String,
    #[serde(rename = "Quantity", default)]
    pub quantity: String,
    #[serde(rename = "InvoiceDate", default)]
    pub invoice_date: String,
}

/// A single validated purchase record. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interaction {
    pub user_id: String,
    pub item_id: String,
    pub quantity: u32,
    pub timestamp: String,
}

/// Counts produced by ingestion.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct IngestStats {
    pub users: usize,
    pub items: usize,
    pub interactions: usize,
}

/// One user's row of the matrix: item → aggregated quantity, with the
/// item insertion order kept alongside (the held-out slice depends on it).
#[derive(Debug, Clone, Default)]
pub struct UserRow {
    item_order: Vec<String>,
    quantities: HashMap<String, u64>,
}

impl UserRow {
    /// Item ids in first-seen order.
    pub fn items(&self) -> &[String] {
        &self.item_order
    }

    /// Aggregated quantity for one item.
    pub fn quantity(&self, item_id: &str) -> Option<u64> {
        self.quantities.get(item_id).copied()
    }

    /// Sparse quantity vector, for similarity computation.
    pub fn quantities(&self) -> &HashMap<String, u64> {
        &self.quantities
    }

    pub fn contains(&self, item_id: &str) -> bool {
        self.quantities.contains_key(item_id)
    }

    pub fn len(&self) -> usize {
        self.item_order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.item_order.is_empty()
    }

    fn add(&mut self, item_id: &str, quantity: u32) {
        match self.quantities.get_mut(item_id) {
            Some(total) => *total += u64::from(quantity),
            None => {
                self.item_order.push(item_id.to_string());
                self.quantities
                    .insert(item_id.to_string(), u64::from(quantity));
            }
        }
    }
}

/// Sparse user-item matrix: user → (item → summed quantity).
///
/// User order is the order of first appearance in the interaction stream;
/// the splitter's deterministic prefix cut relies on it.
#[derive(Debug, Clone, Default)]
pub struct UserItemMatrix {
    user_order: Vec<String>,
    rows: HashMap<String, UserRow>,
    catalog: HashSet<String>,
}

impl UserItemMatrix {
    pub(crate) fn record(&mut self, user_id: &str, item_id: &str, quantity: u32) {
        if !self.rows.contains_key(user_id) {
            self.user_order.push(user_id.to_string());
            self.rows.insert(user_id.to_string(), UserRow::default());
        }
        if let Some(row) = self.rows.get_mut(user_id) {
            row.add(item_id, quantity);
        }
        if !self.catalog.contains(item_id) {
            self.catalog.insert(item_id.to_string());
        }
    }

    /// User ids in first-seen order.
    pub fn users(&self) -> &[String] {
        &self.user_order
    }

    pub fn row(&self, user_id: &str) -> Option<&UserRow> {
        self.rows.get(user_id)
    }

    pub fn user_count(&self) -> usize {
        self.user_order.len()
    }

    /// Number of distinct items across the whole matrix.
    pub fn item_count(&self) -> usize {
        self.catalog.len()
    }

    /// Rows in user order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &UserRow)> {
        self.user_order
            .iter()
            .filter_map(|user| self.rows.get(user).map(|row| (user.as_str(), row)))
    }
}

/// Everything ingestion hands to the rest of the pipeline.
#[derive(Debug, Clone, Default)]
pub struct IngestOutcome {
    pub interactions: Vec<Interaction>,
    pub matrix: UserItemMatrix,
    pub stats: IngestStats,
}

/// Train/test partition plus the held-out ground truth per test user.
#[derive(Debug, Clone, Default)]
pub struct SplitOutcome {
    pub train_users: Vec<String>,
    pub test_users: Vec<String>,
    pub held_out: HashMap<String, HashSet<String>>,
}

/// The three competing strategies, in their fixed run order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strategy {
    Popularity,
    /// Frequency proxy; "content-based" in name only (no item features).
    ContentFrequency,
    Neighborhood,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Popularity => "popularity",
            Strategy::ContentFrequency => "content_frequency",
            Strategy::Neighborhood => "neighborhood_cf",
        }
    }
}

/// One strategy's scores for a whole experiment run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricRecord {
    pub algorithm: String,
    pub precision: f64,
    pub recall: f64,
    pub ndcg: f64,
    pub coverage: f64,
    pub latency_ms: u64,
}

/// Raw per-user lists for one strategy, kept only on request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyRecommendations {
    pub algorithm: String,
    pub by_user: BTreeMap<String, Vec<String>>,
}

/// Final report handed to the writer/renderer collaborators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentReport {
    pub generated_at: chrono::DateTime<chrono::Utc>,
    pub k: usize,
    pub train_ratio: f64,
    pub stats: IngestStats,
    pub evaluated_users: usize,
    pub records: Vec<MetricRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<Vec<StrategyRecommendations>>,
}
