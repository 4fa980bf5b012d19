//! Move table with its filter input and detail panel.
//!
//! The filter narrows the level-up move list by name, type and category;
//! the detail panel shows the selected visible move.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

use crate::api::types::Move;
use crate::ui::components::TextInput;
use crate::ui::theme::{type_color, Theme};

/// Placeholder for absent numeric values.
const MISSING: &str = "—";

/// Move list state.
#[derive(Debug, Default)]
pub struct MoveTable {
    /// All moves in server order.
    moves: Vec<Move>,
    /// Filter text input.
    filter: TextInput,
    /// Indices into `moves` that pass the filter.
    visible: Vec<usize>,
    /// Selected position within `visible`.
    selected: usize,
}

impl MoveTable {
    pub fn new() -> Self {
        Self {
            filter: TextInput::with_placeholder("type, category or name"),
            ..Self::default()
        }
    }

    /// Replace the move list, keeping the current filter.
    pub fn set_moves(&mut self, moves: Vec<Move>) {
        self.moves = moves;
        self.selected = 0;
        self.refilter();
    }

    pub fn filter_text(&self) -> &str {
        self.filter.value()
    }

    /// Replace the filter text.
    pub fn set_filter(&mut self, text: &str) {
        self.filter.set_value(text);
        self.refilter();
    }

    /// Feed a key to the filter input. Returns true if the filter changed.
    pub fn handle_filter_key(&mut self, key: KeyEvent) -> bool {
        let changed = self.filter.handle_input(key);
        if changed {
            self.refilter();
        }
        changed
    }

    /// Handle list navigation keys. Returns true if consumed.
    pub fn handle_navigation_key(&mut self, key: KeyEvent) -> bool {
        match (key.code, key.modifiers) {
            (KeyCode::Down, _) | (KeyCode::Char('j'), KeyModifiers::NONE) => {
                self.select_next();
                true
            }
            (KeyCode::Up, _) | (KeyCode::Char('k'), KeyModifiers::NONE) => {
                self.select_previous();
                true
            }
            (KeyCode::Home, _) | (KeyCode::Char('g'), KeyModifiers::NONE) => {
                self.selected = 0;
                true
            }
            (KeyCode::End, _) | (KeyCode::Char('G'), KeyModifiers::SHIFT) => {
                self.selected = self.visible.len().saturating_sub(1);
                true
            }
            _ => false,
        }
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.visible.len() {
            self.selected += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Selected position within the visible rows, if any row is visible.
    pub fn selected_index(&self) -> Option<usize> {
        (!self.visible.is_empty()).then_some(self.selected)
    }

    pub fn selected_move(&self) -> Option<&Move> {
        self.visible
            .get(self.selected)
            .and_then(|&i| self.moves.get(i))
    }

    /// Moves passing the filter, in server order.
    pub fn visible_moves(&self) -> impl Iterator<Item = &Move> {
        self.visible.iter().filter_map(|&i| self.moves.get(i))
    }

    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    pub fn total_count(&self) -> usize {
        self.moves.len()
    }

    fn refilter(&mut self) {
        let terms = filter_terms(self.filter.value());
        self.visible = self
            .moves
            .iter()
            .enumerate()
            .filter(|(_, m)| move_matches(m, &terms))
            .map(|(i, _)| i)
            .collect();
        self.selected = self.selected.min(self.visible.len().saturating_sub(1));
    }

    /// Render filter, table and detail panel into `area`.
    pub fn render(&self, frame: &mut Frame, area: Rect, filter_focused: bool, theme: &Theme) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
            .split(area);

        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(3)])
            .split(columns[0]);

        let title = format!("Filter moves ({}/{})", self.visible_count(), self.total_count());
        self.filter
            .render(frame, left[0], &title, filter_focused, theme);
        self.render_table(frame, left[1], theme);
        self.render_detail(frame, columns[1], theme);
    }

    fn render_table(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let header = Row::new(["Lv", "Move", "Type", "Cat", "Pow", "Acc", "PP"])
            .style(theme.title());

        let rows: Vec<Row> = self
            .visible_moves()
            .map(|m| {
                let type_cell = match (&m.type_name, &m.type_identifier) {
                    (Some(name), Some(id)) => {
                        Cell::from(name.as_str()).style(Style::default().fg(type_color(id)))
                    }
                    (Some(name), None) => Cell::from(name.as_str()),
                    _ => Cell::from(MISSING),
                };
                Row::new(vec![
                    Cell::from(m.level.to_string()),
                    Cell::from(m.name.as_str()),
                    type_cell,
                    Cell::from(m.category.as_deref().unwrap_or(MISSING)),
                    Cell::from(format_power(m.power)),
                    Cell::from(format_accuracy(m.accuracy)),
                    Cell::from(format_pp(m.pp)),
                ])
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(3),
                Constraint::Min(12),
                Constraint::Length(9),
                Constraint::Length(8),
                Constraint::Length(4),
                Constraint::Length(5),
                Constraint::Length(3),
            ],
        )
        .header(header)
        .block(
            Block::default()
                .title(Span::styled(" Level-up moves ", theme.title()))
                .borders(Borders::ALL)
                .border_style(theme.border(false)),
        )
        .style(theme.base())
        .highlight_style(theme.highlight());

        let mut state = TableState::default();
        state.select(self.selected_index());
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn render_detail(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let block = Block::default()
            .title(Span::styled(" Move ", theme.title()))
            .borders(Borders::ALL)
            .border_style(theme.border(false));

        let lines = match self.selected_move() {
            Some(m) => detail_lines(m, theme),
            None if self.moves.is_empty() => {
                vec![Line::from(Span::styled("No level-up moves", theme.muted()))]
            }
            None => vec![Line::from(Span::styled(
                "No moves match the filter",
                theme.muted(),
            ))],
        };

        frame.render_widget(
            Paragraph::new(lines)
                .block(block)
                .style(theme.base())
                .wrap(Wrap { trim: true }),
            area,
        );
    }
}

/// Lowercased whitespace-separated filter terms.
fn filter_terms(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_lowercase).collect()
}

/// Every term must occur in the name, type or category.
fn move_matches(m: &Move, terms: &[String]) -> bool {
    if terms.is_empty() {
        return true;
    }

    let haystack = format!(
        "{} {} {}",
        m.name,
        m.type_name.as_deref().unwrap_or(""),
        m.category.as_deref().unwrap_or("")
    )
    .to_lowercase();

    terms.iter().all(|term| haystack.contains(term.as_str()))
}

pub fn format_power(power: Option<u32>) -> String {
    power.map_or_else(|| MISSING.to_string(), |p| p.to_string())
}

pub fn format_accuracy(accuracy: Option<u32>) -> String {
    accuracy.map_or_else(|| MISSING.to_string(), |a| format!("{}%", a))
}

pub fn format_pp(pp: Option<u32>) -> String {
    pp.map_or_else(|| MISSING.to_string(), |p| p.to_string())
}

fn detail_lines<'a>(m: &'a Move, theme: &Theme) -> Vec<Line<'a>> {
    let label = |text: &'static str| Span::styled(text, theme.muted());
    let bold = Style::default().add_modifier(Modifier::BOLD);

    let type_span = match (&m.type_name, &m.type_identifier) {
        (Some(name), Some(id)) => Span::styled(name.as_str(), Style::default().fg(type_color(id))),
        (Some(name), None) => Span::raw(name.as_str()),
        _ => Span::raw(MISSING),
    };

    let mut lines = vec![
        Line::from(Span::styled(m.name.as_str(), theme.title())),
        Line::from(""),
        Line::from(vec![label("Level     "), Span::styled(m.level.to_string(), bold)]),
        Line::from(vec![label("Type      "), type_span]),
        Line::from(vec![
            label("Category  "),
            Span::raw(m.category.as_deref().unwrap_or(MISSING)),
        ]),
        Line::from(vec![label("Power     "), Span::raw(format_power(m.power))]),
        Line::from(vec![label("Accuracy  "), Span::raw(format_accuracy(m.accuracy))]),
        Line::from(vec![label("PP        "), Span::raw(format_pp(m.pp))]),
    ];

    if !m.effect.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(m.effect.as_str()));
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mv(name: &str, type_name: &str, category: &str, power: Option<u32>) -> Move {
        Move {
            name: name.to_string(),
            level: 1,
            type_identifier: Some(type_name.to_lowercase()),
            type_name: Some(type_name.to_string()),
            category: Some(category.to_string()),
            power,
            accuracy: Some(100),
            pp: Some(10),
            effect: String::new(),
        }
    }

    fn table() -> MoveTable {
        let mut t = MoveTable::new();
        t.set_moves(vec![
            mv("Thunder Shock", "Electric", "Special", Some(40)),
            mv("Growl", "Normal", "Status", None),
            mv("Quick Attack", "Normal", "Physical", Some(40)),
            mv("Thunderbolt", "Electric", "Special", Some(95)),
            mv("Thunder Wave", "Electric", "Status", None),
        ]);
        t
    }

    fn names(t: &MoveTable) -> Vec<&str> {
        t.visible_moves().map(|m| m.name.as_str()).collect()
    }

    #[test]
    fn test_empty_filter_shows_all() {
        let t = table();
        assert_eq!(t.visible_count(), 5);
        assert_eq!(t.selected_move().unwrap().name, "Thunder Shock");
    }

    #[test]
    fn test_filter_by_name_case_insensitive() {
        let mut t = table();
        t.set_filter("THUNDER");
        assert_eq!(names(&t), ["Thunder Shock", "Thunderbolt", "Thunder Wave"]);
    }

    #[test]
    fn test_filter_terms_all_must_match() {
        let mut t = table();
        t.set_filter("electric status");
        assert_eq!(names(&t), ["Thunder Wave"]);
    }

    #[test]
    fn test_filter_by_category() {
        let mut t = table();
        t.set_filter("physical");
        assert_eq!(names(&t), ["Quick Attack"]);
    }

    #[test]
    fn test_filter_no_match() {
        let mut t = table();
        t.set_filter("dragon");
        assert_eq!(t.visible_count(), 0);
        assert!(t.selected_move().is_none());
        assert_eq!(t.selected_index(), None);
    }

    #[test]
    fn test_selection_clamped_when_filter_narrows() {
        let mut t = table();
        for _ in 0..4 {
            t.select_next();
        }
        assert_eq!(t.selected_move().unwrap().name, "Thunder Wave");

        t.set_filter("normal");
        assert_eq!(t.selected_index(), Some(1));
        assert_eq!(t.selected_move().unwrap().name, "Quick Attack");
    }

    #[test]
    fn test_navigation_does_not_wrap() {
        let mut t = table();
        t.select_previous();
        assert_eq!(t.selected_index(), Some(0));
        for _ in 0..10 {
            t.select_next();
        }
        assert_eq!(t.selected_index(), Some(4));
    }

    #[test]
    fn test_filter_key_input() {
        let mut t = table();
        for c in "bolt".chars() {
            assert!(t.handle_filter_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)));
        }
        assert_eq!(t.filter_text(), "bolt");
        assert_eq!(names(&t), ["Thunderbolt"]);

        t.handle_filter_key(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));
        assert_eq!(t.visible_count(), 5);
    }

    #[test]
    fn test_navigation_keys() {
        let mut t = table();
        assert!(t.handle_navigation_key(KeyEvent::new(KeyCode::Char('j'), KeyModifiers::NONE)));
        assert_eq!(t.selected_index(), Some(1));
        assert!(t.handle_navigation_key(KeyEvent::new(KeyCode::End, KeyModifiers::NONE)));
        assert_eq!(t.selected_index(), Some(4));
        assert!(!t.handle_navigation_key(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE)));
    }

    #[test]
    fn test_set_moves_keeps_filter() {
        let mut t = table();
        t.set_filter("growl");
        t.set_moves(vec![mv("Tackle", "Normal", "Physical", Some(40))]);
        assert_eq!(t.filter_text(), "growl");
        assert_eq!(t.visible_count(), 0);
    }

    #[test]
    fn test_formatting() {
        assert_eq!(format_power(None), "—");
        assert_eq!(format_power(Some(95)), "95");
        assert_eq!(format_accuracy(Some(100)), "100%");
        assert_eq!(format_accuracy(None), "—");
        assert_eq!(format_pp(Some(15)), "15");
    }
}
