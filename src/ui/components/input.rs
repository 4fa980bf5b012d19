//! Single-line text input.
//!
//! Backs both the search box and the move filter. The cursor is a character
//! index, so multi-byte names ("Flabébé") edit correctly; on screen it is
//! placed by display width and the text scrolls to keep it visible.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Position, Rect},
    text::Span,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use unicode_width::UnicodeWidthStr;

use crate::ui::theme::Theme;

/// A text input widget.
#[derive(Debug, Clone, Default)]
pub struct TextInput {
    /// The current input value.
    value: String,
    /// Cursor position, in characters.
    cursor: usize,
    /// Placeholder text shown when empty.
    placeholder: String,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty input with a placeholder.
    pub fn with_placeholder(placeholder: impl Into<String>) -> Self {
        Self {
            placeholder: placeholder.into(),
            ..Self::default()
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Set the value and move the cursor to the end.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor = self.value.chars().count();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn char_len(&self) -> usize {
        self.value.chars().count()
    }

    /// Byte offset of a character index.
    fn byte_index(&self, char_index: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    /// Display columns occupied by the text before the cursor.
    fn cursor_column(&self) -> usize {
        self.value[..self.byte_index(self.cursor)].width()
    }

    /// Columns scrolled off the left edge so the cursor fits in `width`.
    fn scroll_offset(&self, width: usize) -> usize {
        (self.cursor_column() + 1).saturating_sub(width)
    }

    /// Handle a key press.
    ///
    /// Returns true if the value changed.
    pub fn handle_input(&mut self, key: KeyEvent) -> bool {
        match (key.code, key.modifiers) {
            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
                let at = self.byte_index(self.cursor);
                self.value.insert(at, c);
                self.cursor += 1;
                true
            }
            (KeyCode::Backspace, _) => {
                if self.cursor == 0 {
                    return false;
                }
                self.cursor -= 1;
                let at = self.byte_index(self.cursor);
                self.value.remove(at);
                true
            }
            (KeyCode::Delete, _) => {
                if self.cursor >= self.char_len() {
                    return false;
                }
                let at = self.byte_index(self.cursor);
                self.value.remove(at);
                true
            }
            (KeyCode::Left, KeyModifiers::NONE) => {
                self.cursor = self.cursor.saturating_sub(1);
                false
            }
            (KeyCode::Right, KeyModifiers::NONE) => {
                self.cursor = (self.cursor + 1).min(self.char_len());
                false
            }
            (KeyCode::Home, _) | (KeyCode::Char('a'), KeyModifiers::CONTROL) => {
                self.cursor = 0;
                false
            }
            (KeyCode::End, _) | (KeyCode::Char('e'), KeyModifiers::CONTROL) => {
                self.cursor = self.char_len();
                false
            }
            // Ctrl+U - clear line
            (KeyCode::Char('u'), KeyModifiers::CONTROL) => {
                if self.value.is_empty() {
                    return false;
                }
                self.clear();
                true
            }
            // Ctrl+W - delete word before cursor
            (KeyCode::Char('w'), KeyModifiers::CONTROL) => {
                if self.cursor == 0 {
                    return false;
                }
                let end = self.byte_index(self.cursor);
                let before = &self.value[..end];
                let trimmed = before.trim_end();
                let start = trimmed
                    .rfind(char::is_whitespace)
                    .map(|i| i + 1)
                    .unwrap_or(0);
                self.value.replace_range(start..end, "");
                self.cursor = self.value[..start].chars().count();
                true
            }
            _ => false,
        }
    }

    /// Render the input inside a titled, bordered box.
    pub fn render(&self, frame: &mut Frame, area: Rect, title: &str, focused: bool, theme: &Theme) {
        let text = if self.value.is_empty() {
            Span::styled(self.placeholder.as_str(), theme.muted())
        } else {
            Span::styled(self.value.as_str(), theme.base())
        };

        let block = Block::default()
            .title(Span::styled(format!(" {} ", title), theme.title()))
            .borders(Borders::ALL)
            .border_style(theme.border(focused));

        let inner_width = area.width.saturating_sub(2) as usize;
        let offset = self.scroll_offset(inner_width);

        frame.render_widget(
            Paragraph::new(text)
                .style(theme.base())
                .scroll((0, offset as u16))
                .block(block),
            area,
        );

        if focused && inner_width > 0 {
            let column = (self.cursor_column() - offset) as u16;
            frame.set_cursor_position(Position::new(area.x + 1 + column, area.y + 1));
        }
    }
}
