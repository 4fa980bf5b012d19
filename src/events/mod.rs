//! Event handling for the application.
//!
//! This module turns terminal input into application events and holds the
//! key binding table.

mod handler;
mod keys;

use crossterm::event::{KeyEvent, MouseEvent};

pub use handler::EventHandler;
pub use keys::{
    get_keybindings_grouped, is_focus_search_shortcut, KeyContext, Keybinding, PageShortcut,
};

/// Application events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The tick elapsed without input.
    Tick,
    /// A key press.
    Key(KeyEvent),
    /// A mouse event.
    Mouse(MouseEvent),
    /// The terminal was resized.
    Resize(u16, u16),
}
