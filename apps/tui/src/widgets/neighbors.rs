//! Result panel listing the neighbors of the chosen municipality.

use limitrofe_core::{ResultDisplay, ResultView};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph, Wrap};

pub(crate) struct NeighborPanel {
    title: String,
    view: Option<ResultView>,
}

impl NeighborPanel {
    pub(crate) fn new() -> Self {
        Self {
            title: " Limítrofes ".to_string(),
            view: None,
        }
    }

    /// Name the municipality the next view belongs to.
    pub(crate) fn set_subject(&mut self, name: &str) {
        self.title = if name.is_empty() {
            " Limítrofes ".to_string()
        } else {
            format!(" Limítrofes de {name} ")
        };
    }

    pub(crate) fn clear(&mut self) {
        self.set_subject("");
        self.view = None;
    }

    pub(crate) fn draw(&self, f: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL);

        match &self.view {
            Some(ResultView::Neighbors { neighbors }) => {
                let items: Vec<ListItem> = neighbors
                    .iter()
                    .map(|name| ListItem::new(format!("• {name}")))
                    .collect();
                let list = List::new(items)
                    .block(block.title(format!("{}({}) ", self.title, neighbors.len())));
                f.render_widget(list, area);
            }
            Some(ResultView::NothingSelected { message } | ResultView::NoData { message }) => {
                let p = Paragraph::new(message.as_str())
                    .style(
                        Style::default()
                            .fg(Color::DarkGray)
                            .add_modifier(Modifier::ITALIC),
                    )
                    .wrap(Wrap { trim: true })
                    .block(block.title(self.title.as_str()));
                f.render_widget(p, area);
            }
            None => {
                f.render_widget(block.title(self.title.as_str()), area);
            }
        }
    }
}

impl ResultDisplay for NeighborPanel {
    fn show(&mut self, view: &ResultView) {
        self.view = Some(view.clone());
    }
}
