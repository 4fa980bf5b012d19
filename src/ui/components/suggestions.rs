//! Search box with its suggestion dropdown.
//!
//! Rendering records where the input and the dropdown landed so pointer
//! events can be hit-tested against the last frame.

use ratatui::{
    layout::{Position, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState},
    Frame,
};

use super::TextInput;
use crate::suggest::{Phase, SuggestionController};
use crate::ui::theme::Theme;

/// Rows shown before the dropdown scrolls.
const MAX_DROPDOWN_ROWS: u16 = 8;

/// Screen regions of the search widgets in the last rendered frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchLayout {
    /// The input box, borders included.
    pub input: Rect,
    /// The dropdown, borders included, when open.
    pub dropdown: Option<Rect>,
    /// Index of the first candidate visible in the dropdown.
    pub first_row: usize,
    /// Whether the dropdown has a border; cramped terminals drop it.
    pub bordered: bool,
}

impl SearchLayout {
    /// Whether a point lies on the input or the dropdown.
    pub fn contains(&self, column: u16, row: u16) -> bool {
        let pos = Position::new(column, row);
        self.input.contains(pos) || self.dropdown.is_some_and(|d| d.contains(pos))
    }

    /// The candidate index under a point, if it lies on a dropdown row.
    pub fn candidate_at(&self, column: u16, row: u16) -> Option<usize> {
        let dropdown = self.dropdown?;
        let inner = if self.bordered {
            Rect::new(
                dropdown.x + 1,
                dropdown.y + 1,
                dropdown.width.saturating_sub(2),
                dropdown.height.saturating_sub(2),
            )
        } else {
            dropdown
        };
        if !inner.contains(Position::new(column, row)) {
            return None;
        }
        Some(self.first_row + (row - inner.y) as usize)
    }
}

/// Render the search input in `input_area` and, when the controller has
/// candidates, the dropdown directly beneath it (clipped to `bounds`).
///
/// Without room for a bordered box the rows are drawn bare, so an open list
/// is on screen whenever at least one row fits under the input.
pub fn render_search(
    frame: &mut Frame,
    input_area: Rect,
    bounds: Rect,
    input: &TextInput,
    controller: &SuggestionController,
    focused: bool,
    theme: &Theme,
) -> SearchLayout {
    let title = if controller.phase() == Phase::Requesting {
        "Search …"
    } else {
        "Search"
    };
    input.render(frame, input_area, title, focused, theme);

    let mut layout = SearchLayout {
        input: input_area,
        dropdown: None,
        first_row: 0,
        bordered: false,
    };

    let candidates = controller.candidates();
    if candidates.is_empty() {
        return layout;
    }

    let top = input_area.y + input_area.height;
    let available = (bounds.y + bounds.height).saturating_sub(top);
    if available == 0 {
        return layout;
    }
    let rows = (candidates.len() as u16).min(MAX_DROPDOWN_ROWS);
    let bordered = available >= 3;
    let (height, visible_rows) = if bordered {
        let height = (rows + 2).min(available);
        (height, height - 2)
    } else {
        let height = rows.min(available);
        (height, height)
    };
    let visible_rows = visible_rows as usize;
    let area = Rect::new(input_area.x, top, input_area.width, height);

    let first_row = match controller.active_index() {
        Some(i) if i >= visible_rows => i + 1 - visible_rows,
        _ => 0,
    };

    let items: Vec<ListItem> = candidates
        .iter()
        .skip(first_row)
        .take(visible_rows)
        .map(|c| {
            ListItem::new(Line::from(vec![
                Span::styled(c.name.as_str(), theme.base()),
                Span::styled(format!("  {}", c.id), theme.muted()),
            ]))
        })
        .collect();

    let borders = if bordered { Borders::ALL } else { Borders::NONE };
    let list = List::new(items)
        .block(
            Block::default()
                .borders(borders)
                .border_style(theme.border(true))
                .style(theme.base()),
        )
        .highlight_style(theme.highlight())
        .highlight_symbol("› ");

    let mut state = ListState::default();
    state.select(controller.active_index().map(|i| i - first_row));

    frame.render_widget(Clear, area);
    frame.render_stateful_widget(list, area, &mut state);

    layout.dropdown = Some(area);
    layout.first_row = first_row;
    layout.bordered = bordered;
    layout
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Candidate;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::{backend::TestBackend, Terminal};

    fn layout() -> SearchLayout {
        SearchLayout {
            input: Rect::new(0, 0, 40, 3),
            dropdown: Some(Rect::new(0, 3, 40, 6)),
            first_row: 0,
            bordered: true,
        }
    }

    #[test]
    fn test_contains() {
        let l = layout();
        assert!(l.contains(5, 1));
        assert!(l.contains(5, 7));
        assert!(!l.contains(5, 12));
        assert!(!l.contains(45, 1));
    }

    #[test]
    fn test_candidate_at_rows() {
        let l = layout();
        // Border rows are not candidates.
        assert_eq!(l.candidate_at(5, 3), None);
        assert_eq!(l.candidate_at(5, 4), Some(0));
        assert_eq!(l.candidate_at(5, 7), Some(3));
        assert_eq!(l.candidate_at(5, 8), None);
    }

    #[test]
    fn test_candidate_at_scrolled() {
        let l = SearchLayout {
            first_row: 3,
            ..layout()
        };
        assert_eq!(l.candidate_at(5, 4), Some(3));
    }

    #[test]
    fn test_candidate_at_borderless() {
        let l = SearchLayout {
            dropdown: Some(Rect::new(0, 3, 40, 2)),
            bordered: false,
            ..layout()
        };
        assert_eq!(l.candidate_at(5, 3), Some(0));
        assert_eq!(l.candidate_at(5, 4), Some(1));
        assert_eq!(l.candidate_at(5, 5), None);
    }

    fn open_controller() -> SuggestionController {
        let mut controller = SuggestionController::new();
        let ticket = controller.on_input("pi").unwrap();
        controller.apply_response(
            ticket.token,
            Ok(vec![
                Candidate::new("25", "Pikachu"),
                Candidate::new("172", "Pichu"),
                Candidate::new("26", "Raichu"),
            ]),
        );
        controller
    }

    fn draw(height: u16, controller: &SuggestionController) -> SearchLayout {
        let mut terminal = Terminal::new(TestBackend::new(40, height)).unwrap();
        let input = TextInput::new();
        let mut layout = SearchLayout::default();
        terminal
            .draw(|frame| {
                let bounds = frame.area();
                let input_area = Rect::new(0, 0, 40, 3);
                layout = render_search(
                    frame,
                    input_area,
                    bounds,
                    &input,
                    controller,
                    true,
                    &Theme::default(),
                );
            })
            .unwrap();
        layout
    }

    #[test]
    fn test_cramped_dropdown_still_drawn() {
        let controller = open_controller();
        assert!(controller.is_open());

        let layout = draw(5, &controller);
        assert_eq!(layout.dropdown, Some(Rect::new(0, 3, 40, 2)));
        assert!(!layout.bordered);
        assert_eq!(layout.candidate_at(5, 4), Some(1));

        let layout = draw(20, &controller);
        assert_eq!(layout.dropdown, Some(Rect::new(0, 3, 40, 5)));
        assert!(layout.bordered);
    }

    #[test]
    fn test_cramped_dropdown_scrolls_to_active_row() {
        let mut controller = open_controller();
        for _ in 0..3 {
            controller.on_key_down(KeyEvent::new(KeyCode::Down, KeyModifiers::NONE));
        }
        assert_eq!(controller.active_index(), Some(2));

        let layout = draw(5, &controller);
        assert_eq!(layout.first_row, 1);
        assert_eq!(layout.candidate_at(5, 4), Some(2));
    }

    #[test]
    fn test_closed_dropdown() {
        let l = SearchLayout {
            dropdown: None,
            ..layout()
        };
        assert_eq!(l.candidate_at(5, 4), None);
        assert!(!l.contains(5, 4));
    }
}
