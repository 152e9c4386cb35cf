//! Output boundaries: the selection widget and the result list.
//!
//! The core never knows which widget sits behind these traits; a plain
//! list, a searchable picker and a test recorder all work the same way.

use limitrofe_dataset::{Dataset, NeighborQuery};
use limitrofe_shared::{DisplayConfig, SelectOption};
use serde::Serialize;

/// Something that shows a list of selectable entries.
///
/// The widget reports the chosen value back through
/// [`Session::select`](crate::session::Session::select).
pub trait SelectableListSink {
    /// Replace the widget's entries.
    fn set_options(&mut self, items: &[SelectOption]);
}

/// Something that renders the result for the current selection.
pub trait ResultDisplay {
    fn show(&mut self, view: &ResultView);
}

/// What the result list should show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ResultView {
    /// Neighbor names, in order.
    Neighbors { neighbors: Vec<String> },
    /// Placeholder message: nothing is selected.
    NothingSelected { message: String },
    /// The selection has no recorded neighbors.
    NoData { message: String },
}

impl ResultView {
    /// Map a query outcome to the configured messages.
    pub fn from_query(query: NeighborQuery, messages: &DisplayConfig) -> Self {
        match query {
            NeighborQuery::Found(neighbors) => Self::Neighbors { neighbors },
            NeighborQuery::NoSelection => Self::NothingSelected {
                message: messages.nothing_selected.clone(),
            },
            NeighborQuery::NotFound => Self::NoData {
                message: messages.not_found.clone(),
            },
        }
    }

    /// Lines to render, one list item each.
    pub fn lines(&self) -> Vec<&str> {
        match self {
            Self::Neighbors { neighbors } => neighbors.iter().map(String::as_str).collect(),
            Self::NothingSelected { message } | Self::NoData { message } => vec![message.as_str()],
        }
    }
}

/// Selector entries for a ready dataset: the placeholder, then every entity.
pub fn selector_options(dataset: &Dataset, messages: &DisplayConfig) -> Vec<SelectOption> {
    std::iter::once(SelectOption::placeholder(&messages.placeholder))
        .chain(dataset.entities().iter().map(SelectOption::entity))
        .collect()
}

/// A sink that just keeps the last options it was given.
#[derive(Debug, Default)]
pub struct OptionBuffer {
    pub options: Vec<SelectOption>,
}

impl SelectableListSink for OptionBuffer {
    fn set_options(&mut self, items: &[SelectOption]) {
        self.options = items.to_vec();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use limitrofe_shared::ColumnNames;

    #[test]
    fn options_start_with_placeholder() {
        let dataset = Dataset::from_text(
            "NM_MUN,NM_LIM\nPelotas,Cerrito\nCerrito,Pelotas\n",
            &ColumnNames::default(),
        )
        .unwrap();
        let options = selector_options(&dataset, &DisplayConfig::default());

        assert_eq!(options.len(), 3);
        assert!(options[0].is_placeholder());
        assert_eq!(options[0].label, "Selecione...");
        assert_eq!(options[1], SelectOption::entity("Cerrito"));
        assert_eq!(options[2], SelectOption::entity("Pelotas"));
    }

    #[test]
    fn view_messages_come_from_config() {
        let messages = DisplayConfig::default();
        let view = ResultView::from_query(NeighborQuery::NotFound, &messages);
        assert_eq!(view.lines(), vec![messages.not_found.as_str()]);

        let view = ResultView::from_query(NeighborQuery::NoSelection, &messages);
        assert_eq!(view.lines(), vec!["Nenhum município selecionado."]);
    }

    #[test]
    fn view_serializes_with_status() {
        let view = ResultView::Neighbors {
            neighbors: vec!["Cerrito".into()],
        };
        let json = serde_json::to_string(&view).unwrap();
        assert_eq!(json, r#"{"status":"neighbors","neighbors":["Cerrito"]}"#);
    }
}
