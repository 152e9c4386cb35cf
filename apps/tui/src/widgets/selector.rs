//! Searchable municipality picker.

use limitrofe_core::SelectableListSink;
use limitrofe_dataset::collate;
use limitrofe_shared::SelectOption;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

/// Rows moved by PageUp/PageDown.
const PAGE: usize = 10;

pub(crate) struct SearchSelect {
    options: Vec<SelectOption>,
    query: String,
    /// Indices into `options` that match the query, in order.
    visible: Vec<usize>,
    /// Highlighted row, an index into `visible`.
    cursor: usize,
    /// Value of the last chosen entry.
    chosen: Option<String>,
}

impl SearchSelect {
    pub(crate) fn new() -> Self {
        Self {
            options: Vec::new(),
            query: String::new(),
            visible: Vec::new(),
            cursor: 0,
            chosen: None,
        }
    }

    pub(crate) fn query(&self) -> &str {
        &self.query
    }

    /// Number of selectable municipalities currently listed.
    pub(crate) fn match_count(&self) -> usize {
        self.visible
            .iter()
            .filter(|&&i| {
                let option = &self.options[i];
                !option.disabled && !option.is_placeholder()
            })
            .count()
    }

    pub(crate) fn push_char(&mut self, c: char) {
        self.query.push(c);
        self.refilter();
    }

    pub(crate) fn pop_char(&mut self) {
        self.query.pop();
        self.refilter();
    }

    pub(crate) fn clear_query(&mut self) {
        self.query.clear();
        self.refilter();
    }

    pub(crate) fn move_up(&mut self, rows: usize) {
        self.cursor = self.cursor.saturating_sub(rows);
    }

    pub(crate) fn move_down(&mut self, rows: usize) {
        let last = self.visible.len().saturating_sub(1);
        self.cursor = (self.cursor + rows).min(last);
    }

    pub(crate) fn page_up(&mut self) {
        self.move_up(PAGE);
    }

    pub(crate) fn page_down(&mut self) {
        self.move_down(PAGE);
    }

    /// Choose the highlighted entry and return its value.
    ///
    /// Disabled entries cannot be chosen. The placeholder yields `""`.
    pub(crate) fn choose(&mut self) -> Option<String> {
        let option = self.highlighted()?;
        if option.disabled {
            return None;
        }
        let value = option.value.clone();
        self.chosen = Some(value.clone());
        Some(value)
    }

    fn highlighted(&self) -> Option<&SelectOption> {
        self.visible.get(self.cursor).map(|&i| &self.options[i])
    }

    /// Recompute the visible rows for the current query.
    ///
    /// Status entries (loading, error) are always shown; the placeholder
    /// only while the query is empty.
    fn refilter(&mut self) {
        let needle = collate::fold(self.query.trim());

        self.visible = self
            .options
            .iter()
            .enumerate()
            .filter(|(_, option)| {
                if option.disabled || needle.is_empty() {
                    return true;
                }
                !option.is_placeholder() && collate::fold(&option.label).contains(&needle)
            })
            .map(|(i, _)| i)
            .collect();

        self.cursor = self.cursor.min(self.visible.len().saturating_sub(1));
    }

    pub(crate) fn draw(&self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Search input
                Constraint::Min(1),    // Options
            ])
            .split(area);

        let search = Paragraph::new(format!("{}▏", self.query)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Buscar ")
                .border_style(Style::default().fg(Color::Yellow)),
        );
        f.render_widget(search, chunks[0]);

        let items: Vec<ListItem> = self
            .visible
            .iter()
            .map(|&i| {
                let option = &self.options[i];
                let is_chosen = self.chosen.as_deref() == Some(option.value.as_str())
                    && !option.is_placeholder();
                let style = if option.disabled || option.is_placeholder() {
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::ITALIC)
                } else if is_chosen {
                    Style::default().fg(Color::Green)
                } else {
                    Style::default()
                };
                ListItem::new(option.label.as_str()).style(style)
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" Municípios ({}) ", self.match_count())),
            )
            .highlight_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▸ ");

        let mut state = ListState::default().with_selected(Some(self.cursor));
        f.render_stateful_widget(list, chunks[1], &mut state);
    }
}

impl SelectableListSink for SearchSelect {
    fn set_options(&mut self, items: &[SelectOption]) {
        self.options = items.to_vec();
        self.chosen = None;
        self.cursor = 0;
        self.refilter();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded() -> SearchSelect {
        let mut select = SearchSelect::new();
        select.set_options(&[
            SelectOption::placeholder("Selecione..."),
            SelectOption::entity("Água Santa"),
            SelectOption::entity("Canguçu"),
            SelectOption::entity("Capão do Leão"),
            SelectOption::entity("Pelotas"),
        ]);
        select
    }

    #[test]
    fn empty_query_shows_everything() {
        let select = loaded();
        assert_eq!(select.visible.len(), 5);
        assert_eq!(select.match_count(), 4);
    }

    #[test]
    fn query_ignores_accents_and_hides_placeholder() {
        let mut select = loaded();
        for c in "CAPAO".chars() {
            select.push_char(c);
        }
        assert_eq!(select.match_count(), 1);
        assert_eq!(select.choose().as_deref(), Some("Capão do Leão"));
    }

    #[test]
    fn backspace_widens_the_match() {
        let mut select = loaded();
        select.push_char('g');
        select.push_char('u');
        assert_eq!(select.match_count(), 2);
        select.pop_char();
        select.pop_char();
        assert_eq!(select.visible.len(), 5);
    }

    #[test]
    fn choosing_placeholder_means_no_selection() {
        let mut select = loaded();
        assert_eq!(select.choose().as_deref(), Some(""));
    }

    #[test]
    fn disabled_entries_cannot_be_chosen() {
        let mut select = SearchSelect::new();
        select.set_options(&[SelectOption::notice("Carregando...")]);
        select.push_char('x');
        assert_eq!(select.visible.len(), 1);
        assert!(select.choose().is_none());
    }

    #[test]
    fn cursor_stays_in_bounds() {
        let mut select = loaded();
        select.page_down();
        assert_eq!(select.cursor, 4);
        select.push_char('p');
        select.push_char('e');
        select.push_char('l');
        assert_eq!(select.cursor, 0);
        select.move_up(3);
        assert_eq!(select.choose().as_deref(), Some("Pelotas"));
    }

    #[test]
    fn new_options_reset_selection() {
        let mut select = loaded();
        select.move_down(2);
        select.choose();
        select.set_options(&[SelectOption::notice("Carregando...")]);
        assert!(select.chosen.is_none());
        assert_eq!(select.cursor, 0);
    }
}
