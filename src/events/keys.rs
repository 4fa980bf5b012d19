//! Key binding definitions.
//!
//! Holds the binding table shown in the help panel and the classifiers the
//! app uses for shortcuts that are not owned by a text input.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::Focus;

/// The context a key binding applies in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyContext {
    /// Available everywhere.
    Global,
    /// While the search input is focused.
    Search,
    /// While the page has focus and no input is active.
    Page,
    /// While the move filter is focused.
    MoveFilter,
}

impl KeyContext {
    /// Heading shown in the help panel.
    pub fn display(&self) -> &'static str {
        match self {
            KeyContext::Global => "Global",
            KeyContext::Search => "Search",
            KeyContext::Page => "Page",
            KeyContext::MoveFilter => "Move filter",
        }
    }

    const ORDER: [KeyContext; 4] = [
        KeyContext::Global,
        KeyContext::Search,
        KeyContext::Page,
        KeyContext::MoveFilter,
    ];
}

/// A single key binding entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keybinding {
    /// Human readable key combination.
    pub key: String,
    /// What the binding does.
    pub description: String,
    /// Where it applies.
    pub context: KeyContext,
}

impl Keybinding {
    fn new(key: &str, description: &str, context: KeyContext) -> Self {
        Self {
            key: key.to_string(),
            description: description.to_string(),
            context,
        }
    }
}

/// Every binding the application understands.
pub fn all_keybindings() -> Vec<Keybinding> {
    use KeyContext::*;
    vec![
        Keybinding::new("Ctrl+C", "Quit", Global),
        Keybinding::new("/ or Ctrl+K", "Focus search", Global),
        Keybinding::new("Tab", "Cycle focus", Global),
        Keybinding::new("Shift+Tab", "Cycle focus backwards", Global),
        Keybinding::new("type", "Fetch suggestions", Search),
        Keybinding::new("↓ / ↑", "Move through suggestions", Search),
        Keybinding::new("Enter", "Open highlighted or typed Pokémon", Search),
        Keybinding::new("Esc", "Close suggestions, then leave search", Search),
        Keybinding::new("click", "Open a suggestion", Search),
        Keybinding::new("← / →", "Previous / next Pokémon", Page),
        Keybinding::new("r", "Random Pokémon", Page),
        Keybinding::new("j / k", "Select move", Page),
        Keybinding::new("g / G", "First / last move", Page),
        Keybinding::new("f", "Filter moves", Page),
        Keybinding::new("t", "Toggle theme", Page),
        Keybinding::new("y", "Copy page link", Page),
        Keybinding::new("o", "Open page in browser", Page),
        Keybinding::new("?", "Toggle help", Page),
        Keybinding::new("q", "Quit", Page),
        Keybinding::new("type", "Narrow moves by name, type or category", MoveFilter),
        Keybinding::new("↓ / ↑", "Select move", MoveFilter),
        Keybinding::new("Enter / Esc", "Back to page", MoveFilter),
    ]
}

/// Bindings grouped by context, in display order.
pub fn get_keybindings_grouped() -> Vec<(KeyContext, Vec<Keybinding>)> {
    let all = all_keybindings();
    KeyContext::ORDER
        .iter()
        .map(|context| {
            let bindings = all
                .iter()
                .filter(|b| b.context == *context)
                .cloned()
                .collect();
            (*context, bindings)
        })
        .collect()
}

/// Whether a key should move focus to the search input.
///
/// `/` and Ctrl+K do so from anywhere except the search input itself and the
/// move filter, where they belong to the text being typed.
pub fn is_focus_search_shortcut(key: &KeyEvent, focus: Focus) -> bool {
    if matches!(focus, Focus::Search | Focus::MoveFilter) {
        return false;
    }
    matches!(
        (key.code, key.modifiers),
        (KeyCode::Char('/'), KeyModifiers::NONE) | (KeyCode::Char('k'), KeyModifiers::CONTROL)
    )
}

/// Shortcuts available while the page has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageShortcut {
    Quit,
    ToggleHelp,
    ToggleTheme,
    CopyLink,
    OpenInBrowser,
    FocusMoveFilter,
    PreviousPokemon,
    NextPokemon,
    RandomPokemon,
}

impl PageShortcut {
    /// Classify a key pressed while the page has focus.
    pub fn from_key(key: &KeyEvent) -> Option<Self> {
        if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
            return None;
        }
        match key.code {
            KeyCode::Char('q') => Some(PageShortcut::Quit),
            KeyCode::Char('?') => Some(PageShortcut::ToggleHelp),
            KeyCode::Char('t') => Some(PageShortcut::ToggleTheme),
            KeyCode::Char('y') => Some(PageShortcut::CopyLink),
            KeyCode::Char('o') => Some(PageShortcut::OpenInBrowser),
            KeyCode::Char('f') => Some(PageShortcut::FocusMoveFilter),
            KeyCode::Left => Some(PageShortcut::PreviousPokemon),
            KeyCode::Right => Some(PageShortcut::NextPokemon),
            KeyCode::Char('r') => Some(PageShortcut::RandomPokemon),
            _ => None,
        }
    }
}
