//! Municipality adjacency dataset: parsing, indexing and neighbor queries.
//!
//! The pipeline is linear: raw text → [`parser::parse`] → records →
//! [`index`] → entity list + adjacency map → [`Dataset::neighbors_of`].
//! A [`Dataset`] is immutable once built; loading new text builds a new one.

pub mod collate;
pub mod index;
pub mod parser;
pub mod query;

use limitrofe_shared::{ColumnNames, Record, Result};
use serde::Serialize;
use tracing::{info, instrument};

pub use index::{AdjacencyMap, build_adjacency, build_index};
pub use parser::{ColumnPositions, ParseStats, ParsedTable, parse};
pub use query::{NeighborQuery, neighbors_of};

// ---------------------------------------------------------------------------
// Dataset
// ---------------------------------------------------------------------------

/// One loaded dataset: records plus the indexes derived from them.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<Record>,
    entities: Vec<String>,
    adjacency: AdjacencyMap,
    stats: ParseStats,
}

/// Size figures for a loaded dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DatasetSummary {
    pub records: usize,
    pub entities: usize,
    pub entities_with_neighbors: usize,
    #[serde(flatten)]
    pub parse: ParseStats,
}

impl Dataset {
    /// Parse `text` and build the indexes.
    #[instrument(skip_all, fields(bytes = text.len()))]
    pub fn from_text(text: &str, columns: &ColumnNames) -> Result<Self> {
        let table = parse(text, columns)?;
        let dataset = Self::from_table(table);

        info!(
            records = dataset.records.len(),
            entities = dataset.entities.len(),
            blank_lines = dataset.stats.blank_lines,
            short_rows = dataset.stats.short_rows,
            "dataset indexed"
        );

        Ok(dataset)
    }

    /// Build the indexes for an already parsed table.
    pub fn from_table(table: ParsedTable) -> Self {
        let mut dataset = Self::from_records(table.records);
        dataset.stats = table.stats;
        dataset
    }

    /// Build the indexes for records from any origin.
    pub fn from_records(records: Vec<Record>) -> Self {
        let entities = build_index(&records);
        let adjacency = build_adjacency(&records);
        Self {
            stats: ParseStats {
                data_lines: records.len(),
                ..ParseStats::default()
            },
            records,
            entities,
            adjacency,
        }
    }

    /// Records in source order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Distinct entity names in collation order, for the selector.
    pub fn entities(&self) -> &[String] {
        &self.entities
    }

    /// Counters from parsing.
    pub fn stats(&self) -> ParseStats {
        self.stats
    }

    pub fn summary(&self) -> DatasetSummary {
        DatasetSummary {
            records: self.records.len(),
            entities: self.entities.len(),
            entities_with_neighbors: self.adjacency.len(),
            parse: self.stats,
        }
    }

    /// Neighbors of `selected`, from the precomputed adjacency map.
    ///
    /// Same contract as the scanning [`neighbors_of`]: exact match, sorted
    /// result, `NoSelection` for an empty value, `NotFound` for no edges.
    pub fn neighbors_of(&self, selected: &str) -> NeighborQuery {
        if query::is_unset(selected) {
            return NeighborQuery::NoSelection;
        }

        match self.adjacency.get(selected) {
            Some(neighbors) => NeighborQuery::from_neighbors(neighbors.clone()),
            None => NeighborQuery::NotFound,
        }
    }

    /// Entities whose name contains `term`, ignoring case and accents.
    ///
    /// An empty term matches everything. Results keep collation order.
    pub fn search(&self, term: &str) -> Vec<&str> {
        let needle = collate::fold(term.trim());
        self.entities
            .iter()
            .filter(|name| needle.is_empty() || collate::fold(name).contains(&needle))
            .map(String::as_str)
            .collect()
    }
}
