//! Entity index and adjacency map built from parsed records.

use std::collections::{HashMap, HashSet};

use limitrofe_shared::Record;

use crate::collate;

/// Entity name → neighbor names in collation order.
pub type AdjacencyMap = HashMap<String, Vec<String>>;

/// Distinct, non-blank entity names in collation order.
///
/// Source order is discarded. The input is not modified.
pub fn build_index(records: &[Record]) -> Vec<String> {
    let distinct: HashSet<&str> = records
        .iter()
        .filter(|r| r.has_entity())
        .map(|r| r.entity.as_str())
        .collect();

    let mut entities: Vec<String> = distinct.into_iter().map(String::from).collect();
    collate::sort(&mut entities);
    entities
}

/// Group neighbor names by entity, each list sorted in collation order.
///
/// Rows with a blank entity or a blank neighbor contribute nothing.
/// Repeated edges are kept, as they are in the source.
pub fn build_adjacency(records: &[Record]) -> AdjacencyMap {
    let mut map: AdjacencyMap = HashMap::new();

    for record in records.iter().filter(|r| r.has_entity() && r.has_neighbor()) {
        map.entry(record.entity.clone())
            .or_default()
            .push(record.neighbor.clone());
    }

    for neighbors in map.values_mut() {
        collate::sort(neighbors);
    }

    map
}
