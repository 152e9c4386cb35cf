//! "Neighbors of X" queries.

use limitrofe_shared::Record;
use serde::Serialize;

use crate::collate;

/// Outcome of a neighbor query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "neighbors", rename_all = "snake_case")]
pub enum NeighborQuery {
    /// Nothing is selected.
    NoSelection,
    /// The selection has no recorded neighbors. Not an error.
    NotFound,
    /// Neighbor names in collation order (never empty).
    Found(Vec<String>),
}

impl NeighborQuery {
    /// Wrap a sorted neighbor list, mapping an empty one to `NotFound`.
    pub(crate) fn from_neighbors(neighbors: Vec<String>) -> Self {
        if neighbors.is_empty() {
            Self::NotFound
        } else {
            Self::Found(neighbors)
        }
    }

    /// The neighbor names, empty for the two sentinel outcomes.
    pub fn neighbors(&self) -> &[String] {
        match self {
            Self::Found(neighbors) => neighbors,
            Self::NoSelection | Self::NotFound => &[],
        }
    }
}

/// Whether `selected` means "nothing selected".
pub(crate) fn is_unset(selected: &str) -> bool {
    selected.trim().is_empty()
}

/// Scan `records` for edges whose entity is exactly `selected`.
///
/// Matching is exact: no case, whitespace or accent normalization. The
/// record slice is not modified, so repeated calls agree.
pub fn neighbors_of(records: &[Record], selected: &str) -> NeighborQuery {
    if is_unset(selected) {
        return NeighborQuery::NoSelection;
    }

    let mut neighbors: Vec<String> = records
        .iter()
        .filter(|r| r.entity == selected && r.has_neighbor())
        .map(|r| r.neighbor.clone())
        .collect();
    collate::sort(&mut neighbors);

    NeighborQuery::from_neighbors(neighbors)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> Vec<Record> {
        vec![
            Record::new("Pelotas", "Capão do Leão"),
            Record::new("Pelotas", "Arroio Grande"),
            Record::new("Capão do Leão", "Pelotas"),
            Record::new("Cerrito", ""),
        ]
    }

    #[test]
    fn found_neighbors_are_sorted() {
        assert_eq!(
            neighbors_of(&records(), "Pelotas"),
            NeighborQuery::Found(vec!["Arroio Grande".into(), "Capão do Leão".into()])
        );
    }

    #[test]
    fn empty_selection_is_no_selection() {
        assert_eq!(neighbors_of(&records(), ""), NeighborQuery::NoSelection);
    }

    #[test]
    fn unknown_entity_is_not_found() {
        assert_eq!(neighbors_of(&records(), "Arroio Grande"), NeighborQuery::NotFound);
    }

    #[test]
    fn entity_with_only_blank_neighbors_is_not_found() {
        assert_eq!(neighbors_of(&records(), "Cerrito"), NeighborQuery::NotFound);
    }

    #[test]
    fn matching_is_exact() {
        assert_eq!(neighbors_of(&records(), "pelotas"), NeighborQuery::NotFound);
        assert_eq!(neighbors_of(&records(), "Pelotas "), NeighborQuery::NotFound);
        assert_eq!(neighbors_of(&records(), "Capao do Leao"), NeighborQuery::NotFound);
    }

    #[test]
    fn query_is_idempotent() {
        let input = records();
        let first = neighbors_of(&input, "Pelotas");
        let second = neighbors_of(&input, "Pelotas");
        assert_eq!(first, second);
        assert_eq!(input, records());
    }

    #[test]
    fn serializes_with_status_tag() {
        let json = serde_json::to_string(&NeighborQuery::NotFound).unwrap();
        assert_eq!(json, r#"{"status":"not_found"}"#);
        let json = serde_json::to_string(&NeighborQuery::Found(vec!["A".into()])).unwrap();
        assert_eq!(json, r#"{"status":"found","neighbors":["A"]}"#);
    }
}
