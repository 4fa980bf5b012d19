//! Main application state and event loop.
//!
//! This module implements The Elm Architecture (TEA) pattern for predictable
//! state management in the TUI application. `update` never performs I/O:
//! work that leaves the process is queued as [`AppCommand`]s which the main
//! loop drains with [`App::take_commands`].

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame,
};
use tracing::{debug, error, info, trace, warn};

use crate::api::PokemonPage;
use crate::config::Preferences;
use crate::error::AppError;
use crate::events::{is_focus_search_shortcut, Event, PageShortcut};
use crate::suggest::{KeyOutcome, NavigationTarget, QueryTicket, SuggestionController};
use crate::tasks::ApiMessage;
use crate::ui::{
    render_page, render_search, render_welcome, HelpAction, HelpView, MoveTable, SearchLayout,
    TextInput, Theme, ToastQueue,
};

/// Which widget receives key presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    /// The search input.
    #[default]
    Search,
    /// The move filter input.
    MoveFilter,
    /// The page itself; no text input is active.
    Page,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Focus::Search => Focus::MoveFilter,
            Focus::MoveFilter => Focus::Page,
            Focus::Page => Focus::Search,
        }
    }

    fn previous(self) -> Self {
        match self {
            Focus::Search => Focus::Page,
            Focus::MoveFilter => Focus::Search,
            Focus::Page => Focus::MoveFilter,
        }
    }
}

/// Side effects requested by `update`, executed by the main loop.
#[derive(Debug, Clone)]
pub enum AppCommand {
    /// Send a suggestion query.
    FetchSuggestions(QueryTicket),
    /// Load the page for a navigation target.
    LoadPage(NavigationTarget),
    /// Ask the server for a random Pokémon.
    PickRandom,
    /// Put text on the clipboard.
    CopyToClipboard(String),
    /// Open a URL in the system browser.
    OpenInBrowser(String),
    /// Persist UI preferences.
    SavePreferences(Preferences),
}

/// The main application struct that holds all state.
///
/// This implements the Model part of The Elm Architecture (TEA).
pub struct App {
    should_quit: bool,
    focus: Focus,
    search: TextInput,
    suggestions: SuggestionController,
    /// Where the dropdown was drawn last frame, for click hit-testing.
    search_layout: SearchLayout,
    /// The page on screen.
    page: Option<PokemonPage>,
    /// Address of the page on screen.
    location: Option<NavigationTarget>,
    /// The most recent navigation still waiting for its page.
    pending: Option<NavigationTarget>,
    /// A random pick was requested and no navigation has replaced it.
    awaiting_random: bool,
    moves: MoveTable,
    help: HelpView,
    show_help: bool,
    toasts: ToastQueue,
    theme: Theme,
    /// Server base URL without a trailing slash.
    base_url: String,
    commands: Vec<AppCommand>,
}

impl App {
    /// Create a new application instance.
    pub fn new(base_url: impl Into<String>, preferences: Preferences) -> Self {
        debug!(theme = %preferences.theme, "Creating new application instance");

        Self {
            should_quit: false,
            focus: Focus::Search,
            search: TextInput::with_placeholder("Search Pokémon…"),
            suggestions: SuggestionController::new(),
            search_layout: SearchLayout::default(),
            page: None,
            location: None,
            pending: None,
            awaiting_random: false,
            moves: MoveTable::new(),
            help: HelpView::new(),
            show_help: false,
            toasts: ToastQueue::new(),
            theme: Theme::for_name(preferences.theme),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            commands: Vec::new(),
        }
    }

    /// Whether the application should quit.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn suggestions(&self) -> &SuggestionController {
        &self.suggestions
    }

    pub fn search_text(&self) -> &str {
        self.search.value()
    }

    /// The page on screen, if any.
    pub fn page(&self) -> Option<&PokemonPage> {
        self.page.as_ref()
    }

    /// Identifier of the page being loaded, if any.
    pub fn pending_identifier(&self) -> Option<&str> {
        self.pending.as_ref().map(|t| t.identifier())
    }

    pub fn toasts(&self) -> &ToastQueue {
        &self.toasts
    }

    /// Drain queued side effects.
    pub fn take_commands(&mut self) -> Vec<AppCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Absolute URL of the page on screen.
    pub fn current_url(&self) -> Option<String> {
        self.location
            .as_ref()
            .map(|target| format!("{}{}", self.base_url, target.path()))
    }

    pub fn notify_info(&mut self, message: impl Into<String>) {
        self.toasts.info(message);
    }

    pub fn notify_success(&mut self, message: impl Into<String>) {
        self.toasts.success(message);
    }

    /// Log an error and show it as a toast.
    pub fn handle_error(&mut self, error: &AppError) {
        if error.is_recoverable() {
            warn!(error = %error, "Operation failed");
        } else {
            error!(error = %error, "Operation failed");
        }
        let message = match error.suggested_action() {
            Some(action) => format!("{} {}", error.user_message(), action),
            None => error.user_message(),
        };
        self.toasts.error(message);
    }

    /// Navigate to a target: the page is requested and replaces the current
    /// one when it arrives.
    pub fn navigate(&mut self, target: NavigationTarget) {
        info!(path = %target, "Navigating");
        self.awaiting_random = false;
        self.suggestions.clear();
        self.search.clear();
        self.set_focus(Focus::Page);
        self.pending = Some(target.clone());
        self.commands.push(AppCommand::LoadPage(target));
    }

    /// Update the application state based on an event.
    ///
    /// This implements the Update part of The Elm Architecture (TEA).
    pub fn update(&mut self, event: Event) {
        match event {
            Event::Key(key_event) => {
                trace!(key = ?key_event.code, modifiers = ?key_event.modifiers, "Key event");
                self.handle_key_event(key_event);
            }
            Event::Mouse(mouse_event) => self.handle_mouse_event(mouse_event),
            Event::Resize(width, height) => {
                trace!(width, height, "Terminal resize event");
            }
            Event::Tick => self.toasts.tick(),
        }
    }

    /// Apply the result of a background task.
    pub fn handle_api_message(&mut self, message: ApiMessage) {
        match message {
            ApiMessage::SuggestionsFetched { token, result } => {
                self.suggestions.apply_response(token, result);
            }
            ApiMessage::PageFetched { identifier, result } => {
                let is_latest = self
                    .pending
                    .as_ref()
                    .is_some_and(|t| t.identifier() == identifier);
                if !is_latest {
                    debug!(identifier = %identifier, "Dropping page for superseded navigation");
                    return;
                }
                let target = self.pending.take();

                match result {
                    Ok(mut page) => {
                        info!(identifier = %identifier, dex = page.dex, "Page loaded");
                        self.moves.set_moves(std::mem::take(&mut page.moves));
                        self.page = Some(page);
                        self.location = target;
                    }
                    Err(e) => self.handle_error(&AppError::Api(e)),
                }
            }
            ApiMessage::RandomPicked { result } => {
                if !std::mem::take(&mut self.awaiting_random) {
                    debug!("Dropping random pick superseded by another action");
                    return;
                }
                match result {
                    Ok(identifier) => self.navigate(NavigationTarget::pokemon(identifier)),
                    Err(e) => self.handle_error(&AppError::Api(e)),
                }
            }
        }
    }

    fn set_focus(&mut self, focus: Focus) {
        if self.focus == Focus::Search && focus != Focus::Search {
            // Leaving the search input counts as interacting outside it.
            self.suggestions.on_outside_interaction();
        }
        if focus == Focus::Search {
            self.awaiting_random = false;
        }
        self.focus = focus;
    }

    fn handle_key_event(&mut self, key_event: KeyEvent) {
        if key_event.code == KeyCode::Char('c') && key_event.modifiers == KeyModifiers::CONTROL {
            info!("Quit requested");
            self.should_quit = true;
            return;
        }

        if self.show_help {
            if let Some(HelpAction::Close) = self.help.handle_input(key_event) {
                self.show_help = false;
            }
            return;
        }

        if is_focus_search_shortcut(&key_event, self.focus) {
            self.set_focus(Focus::Search);
            return;
        }

        match key_event.code {
            KeyCode::Tab => {
                self.set_focus(self.focus.next());
                return;
            }
            KeyCode::BackTab => {
                self.set_focus(self.focus.previous());
                return;
            }
            _ => {}
        }

        match self.focus {
            Focus::Search => self.handle_search_key(key_event),
            Focus::MoveFilter => self.handle_move_filter_key(key_event),
            Focus::Page => self.handle_page_key(key_event),
        }
    }

    fn handle_search_key(&mut self, key_event: KeyEvent) {
        let was_open = self.suggestions.is_open();

        match self.suggestions.on_key_down(key_event) {
            KeyOutcome::Navigate(target) => self.navigate(target),
            KeyOutcome::Submit => match NavigationTarget::from_search(self.search.value()) {
                Some(target) => self.navigate(target),
                None => debug!("Ignoring empty search submit"),
            },
            KeyOutcome::Handled => {
                if key_event.code == KeyCode::Esc && !was_open {
                    self.set_focus(Focus::Page);
                }
            }
            KeyOutcome::Unhandled => {
                if self.search.handle_input(key_event) {
                    if let Some(ticket) = self.suggestions.on_input(self.search.value()) {
                        self.commands.push(AppCommand::FetchSuggestions(ticket));
                    }
                }
            }
        }
    }

    fn handle_move_filter_key(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Esc | KeyCode::Enter => self.set_focus(Focus::Page),
            KeyCode::Down => self.moves.select_next(),
            KeyCode::Up => self.moves.select_previous(),
            _ => {
                self.moves.handle_filter_key(key_event);
            }
        }
    }

    fn handle_page_key(&mut self, key_event: KeyEvent) {
        let Some(shortcut) = PageShortcut::from_key(&key_event) else {
            self.moves.handle_navigation_key(key_event);
            return;
        };

        match shortcut {
            PageShortcut::Quit => {
                info!("Quit requested");
                self.should_quit = true;
            }
            PageShortcut::ToggleHelp => {
                self.help.reset_scroll();
                self.show_help = true;
            }
            PageShortcut::ToggleTheme => self.toggle_theme(),
            PageShortcut::CopyLink => match self.current_url() {
                Some(url) => self.commands.push(AppCommand::CopyToClipboard(url)),
                None => self.notify_info("No page open"),
            },
            PageShortcut::OpenInBrowser => match self.current_url() {
                Some(url) => self.commands.push(AppCommand::OpenInBrowser(url)),
                None => self.notify_info("No page open"),
            },
            PageShortcut::FocusMoveFilter => self.set_focus(Focus::MoveFilter),
            PageShortcut::PreviousPokemon => self.follow_adjacent(true),
            PageShortcut::NextPokemon => self.follow_adjacent(false),
            PageShortcut::RandomPokemon => {
                self.awaiting_random = true;
                self.commands.push(AppCommand::PickRandom);
            }
        }
    }

    /// Follow the previous/next link when the search list is closed and the
    /// link exists and is enabled.
    fn follow_adjacent(&mut self, previous: bool) {
        if self.focus == Focus::Search || self.suggestions.is_open() {
            return;
        }
        let link = self.page.as_ref().and_then(|page| {
            if previous {
                page.nav_prev.as_ref()
            } else {
                page.nav_next.as_ref()
            }
        });
        match link {
            Some(link) if !link.disabled => {
                let target = NavigationTarget::pokemon(link.identifier.clone());
                self.navigate(target);
            }
            _ => trace!(previous, "No adjacent page to follow"),
        }
    }

    fn toggle_theme(&mut self) {
        let name = self.theme.name.toggled();
        info!(theme = %name, "Switching theme");
        self.theme = Theme::for_name(name);
        self.commands
            .push(AppCommand::SavePreferences(Preferences { theme: name }));
    }

    fn handle_mouse_event(&mut self, mouse_event: MouseEvent) {
        if mouse_event.kind != MouseEventKind::Down(MouseButton::Left) || self.show_help {
            return;
        }
        let (column, row) = (mouse_event.column, mouse_event.row);

        if let Some(index) = self.search_layout.candidate_at(column, row) {
            if let Some(target) = self.suggestions.on_suggestion_click(index) {
                self.navigate(target);
            }
        } else if self.search_layout.contains(column, row) {
            self.set_focus(Focus::Search);
        } else {
            self.suggestions.on_outside_interaction();
            if self.focus == Focus::Search {
                self.focus = Focus::Page;
            }
        }
    }

    /// Render the application UI.
    ///
    /// This implements the View part of The Elm Architecture (TEA).
    pub fn view(&mut self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Block::default().style(self.theme.base()), area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Search
                Constraint::Min(1),    // Page
                Constraint::Length(1), // Status bar
            ])
            .split(area);

        match &self.page {
            Some(page) => render_page(
                frame,
                chunks[1],
                page,
                &self.moves,
                self.focus == Focus::MoveFilter,
                &self.theme,
            ),
            None => render_welcome(frame, chunks[1], self.pending_identifier(), &self.theme),
        }

        // The dropdown overlays the page, so it is drawn after it.
        let bounds = Rect::new(
            area.x,
            area.y,
            area.width,
            chunks[0].height + chunks[1].height,
        );
        self.search_layout = render_search(
            frame,
            chunks[0],
            bounds,
            &self.search,
            &self.suggestions,
            self.focus == Focus::Search,
            &self.theme,
        );

        self.render_status_bar(frame, chunks[2]);

        if self.show_help {
            self.help.render(frame, area, &self.theme);
        }
        self.toasts.render(frame, area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![Span::styled(" PokeBase ", self.theme.title())];

        if let Some(location) = &self.location {
            spans.push(Span::styled(location.path().to_string(), self.theme.muted()));
        }
        if let Some(identifier) = self.pending_identifier() {
            spans.push(Span::styled(
                format!("  loading {}…", identifier),
                self.theme.muted(),
            ));
        } else if self.awaiting_random {
            spans.push(Span::styled("  picking a random Pokémon…", self.theme.muted()));
        }

        let hint = match self.focus {
            Focus::Search => "  ↑↓ pick · Enter open · Esc close",
            Focus::MoveFilter => "  type to filter · Enter/Esc done",
            Focus::Page => "  / search · ←→ prev/next · r random · f filter · ? help",
        };
        spans.push(Span::styled(hint, self.theme.muted()));

        frame.render_widget(
            Paragraph::new(Line::from(spans)).style(self.theme.base()),
            area,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiError, Candidate};
    use crate::suggest::{Phase, RequestToken};
    use crate::ui::theme::ThemeName;
    use ratatui::{backend::TestBackend, Terminal};

    const BASE: &str = "http://127.0.0.1:5000";

    fn app() -> App {
        App::new(BASE, Preferences::default())
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ctrl(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    fn click(column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.update(key(KeyCode::Char(c)));
        }
    }

    fn candidates() -> Vec<Candidate> {
        vec![
            Candidate::new("25", "Pikachu"),
            Candidate::new("172", "Pichu"),
            Candidate::new("26", "Raichu"),
        ]
    }

    /// The token of the last queued suggestion query.
    fn last_ticket(app: &mut App) -> RequestToken {
        app.take_commands()
            .into_iter()
            .filter_map(|c| match c {
                AppCommand::FetchSuggestions(ticket) => Some(ticket.token),
                _ => None,
            })
            .last()
            .expect("a suggestion query was queued")
    }

    fn respond(app: &mut App, token: RequestToken, result: Result<Vec<Candidate>, ApiError>) {
        app.handle_api_message(ApiMessage::SuggestionsFetched { token, result });
    }

    fn loaded_targets(app: &mut App) -> Vec<String> {
        app.take_commands()
            .into_iter()
            .filter_map(|c| match c {
                AppCommand::LoadPage(target) => Some(target.path().to_string()),
                _ => None,
            })
            .collect()
    }

    fn page(identifier: &str, prev_disabled: bool, next_disabled: bool) -> PokemonPage {
        serde_json::from_value(serde_json::json!({
            "identifier": identifier,
            "display_name": "Pikachu",
            "dex": 25,
            "moves": [{"name": "Growl", "level": 1, "effect": ""}],
            "nav_prev": {"dex": 24, "identifier": "arbok", "name": "Arbok", "disabled": prev_disabled},
            "nav_next": {"dex": 26, "identifier": "raichu", "name": "Raichu", "disabled": next_disabled}
        }))
        .unwrap()
    }

    /// An app showing the pikachu page with the page focused.
    fn app_on_page(prev_disabled: bool, next_disabled: bool) -> App {
        let mut app = app();
        app.navigate(NavigationTarget::pokemon("pikachu"));
        app.take_commands();
        app.handle_api_message(ApiMessage::PageFetched {
            identifier: "pikachu".to_string(),
            result: Ok(page("pikachu", prev_disabled, next_disabled)),
        });
        assert_eq!(app.focus(), Focus::Page);
        app
    }

    #[test]
    fn test_app_new() {
        let app = app();
        assert!(!app.should_quit());
        assert_eq!(app.focus(), Focus::Search);
        assert!(app.page().is_none());
        assert_eq!(app.theme().name, ThemeName::Dark);
    }

    #[test]
    fn test_typing_queues_suggestion_query() {
        let mut app = app();
        type_text(&mut app, "pika");
        let commands = app.take_commands();
        assert_eq!(commands.len(), 4);
        match commands.last() {
            Some(AppCommand::FetchSuggestions(ticket)) => assert_eq!(ticket.query, "pika"),
            other => panic!("unexpected command: {:?}", other),
        }
        assert_eq!(app.suggestions().phase(), Phase::Requesting);
    }

    #[test]
    fn test_response_opens_list_without_highlight() {
        let mut app = app();
        type_text(&mut app, "pi");
        let token = last_ticket(&mut app);
        respond(&mut app, token, Ok(candidates()));
        assert!(app.suggestions().is_open());
        assert_eq!(app.suggestions().active_index(), None);
    }

    #[test]
    fn test_superseded_response_is_ignored() {
        let mut app = app();
        type_text(&mut app, "p");
        let first = last_ticket(&mut app);
        type_text(&mut app, "i");
        let second = last_ticket(&mut app);

        respond(&mut app, first, Ok(vec![Candidate::new("1", "Bulbasaur")]));
        assert!(!app.suggestions().is_open());

        respond(&mut app, second, Ok(candidates()));
        assert_eq!(app.suggestions().candidates()[0].name, "Pikachu");
    }

    #[test]
    fn test_clearing_input_closes_list() {
        let mut app = app();
        type_text(&mut app, "p");
        let token = last_ticket(&mut app);
        respond(&mut app, token, Ok(candidates()));
        app.update(key(KeyCode::Backspace));
        assert!(!app.suggestions().is_open());
        assert!(app.take_commands().is_empty());
    }

    #[test]
    fn test_enter_on_highlight_navigates() {
        let mut app = app();
        type_text(&mut app, "pi");
        let token = last_ticket(&mut app);
        respond(&mut app, token, Ok(candidates()));

        app.update(key(KeyCode::Down));
        app.update(key(KeyCode::Down));
        app.update(key(KeyCode::Enter));

        assert_eq!(loaded_targets(&mut app), ["/pokemon/172"]);
        assert!(!app.suggestions().is_open());
        assert_eq!(app.pending_identifier(), Some("172"));
        assert_eq!(app.focus(), Focus::Page);
        assert_eq!(app.search_text(), "");
    }

    #[test]
    fn test_up_from_nothing_highlights_last() {
        let mut app = app();
        type_text(&mut app, "pi");
        let token = last_ticket(&mut app);
        respond(&mut app, token, Ok(candidates()));

        app.update(key(KeyCode::Up));
        assert_eq!(app.suggestions().active_index(), Some(2));
        app.update(key(KeyCode::Down));
        assert_eq!(app.suggestions().active_index(), Some(0));
    }

    #[test]
    fn test_enter_without_highlight_submits_query() {
        let mut app = app();
        type_text(&mut app, " Pika ");
        app.take_commands();
        app.update(key(KeyCode::Enter));
        assert_eq!(loaded_targets(&mut app), ["/pokemon/pika"]);
    }

    #[test]
    fn test_enter_on_blank_query_does_nothing() {
        let mut app = app();
        type_text(&mut app, "  ");
        app.update(key(KeyCode::Enter));
        assert!(app.take_commands().is_empty());
        assert_eq!(app.focus(), Focus::Search);
    }

    #[test]
    fn test_escape_closes_list_then_leaves_search() {
        let mut app = app();
        type_text(&mut app, "pi");
        let token = last_ticket(&mut app);
        respond(&mut app, token, Ok(candidates()));

        app.update(key(KeyCode::Esc));
        assert!(!app.suggestions().is_open());
        assert_eq!(app.focus(), Focus::Search);
        assert_eq!(app.search_text(), "pi");

        app.update(key(KeyCode::Esc));
        assert_eq!(app.focus(), Focus::Page);
    }

    #[test]
    fn test_escape_cancels_in_flight_query() {
        let mut app = app();
        type_text(&mut app, "pi");
        let token = last_ticket(&mut app);
        app.update(key(KeyCode::Esc));
        respond(&mut app, token, Ok(candidates()));
        assert!(!app.suggestions().is_open());
    }

    #[test]
    fn test_focus_search_shortcuts() {
        let mut app = app_on_page(false, false);
        app.update(key(KeyCode::Char('/')));
        assert_eq!(app.focus(), Focus::Search);
        assert_eq!(app.search_text(), "");

        app.update(key(KeyCode::Esc));
        assert_eq!(app.focus(), Focus::Page);
        app.update(ctrl('k'));
        assert_eq!(app.focus(), Focus::Search);
    }

    #[test]
    fn test_slash_types_into_move_filter() {
        let mut app = app_on_page(false, false);
        app.update(key(KeyCode::Char('f')));
        assert_eq!(app.focus(), Focus::MoveFilter);
        app.update(key(KeyCode::Char('/')));
        assert_eq!(app.focus(), Focus::MoveFilter);
        assert_eq!(app.moves.filter_text(), "/");
    }

    #[test]
    fn test_tab_cycles_focus_and_closes_list() {
        let mut app = app();
        type_text(&mut app, "pi");
        let token = last_ticket(&mut app);
        respond(&mut app, token, Ok(candidates()));

        app.update(key(KeyCode::Tab));
        assert_eq!(app.focus(), Focus::MoveFilter);
        assert!(!app.suggestions().is_open());
        app.update(key(KeyCode::Tab));
        assert_eq!(app.focus(), Focus::Page);
        app.update(key(KeyCode::Tab));
        assert_eq!(app.focus(), Focus::Search);
    }

    #[test]
    fn test_click_on_suggestion_navigates() {
        let mut app = app();
        type_text(&mut app, "ra");
        let token = last_ticket(&mut app);
        respond(&mut app, token, Ok(candidates()));
        app.search_layout = SearchLayout {
            input: Rect::new(0, 0, 40, 3),
            dropdown: Some(Rect::new(0, 3, 40, 5)),
            first_row: 0,
            bordered: true,
        };

        // Third row inside the dropdown border.
        app.update(click(5, 6));
        assert_eq!(loaded_targets(&mut app), ["/pokemon/26"]);
        assert!(!app.suggestions().is_open());
    }

    #[test]
    fn test_click_outside_closes_list() {
        let mut app = app();
        type_text(&mut app, "ra");
        let token = last_ticket(&mut app);
        respond(&mut app, token, Ok(candidates()));
        app.search_layout = SearchLayout {
            input: Rect::new(0, 0, 40, 3),
            dropdown: Some(Rect::new(0, 3, 40, 5)),
            first_row: 0,
            bordered: true,
        };

        app.update(click(5, 1));
        assert!(app.suggestions().is_open());

        app.update(click(60, 20));
        assert!(!app.suggestions().is_open());
        assert_eq!(app.focus(), Focus::Page);
        assert!(app.take_commands().is_empty());
    }

    #[test]
    fn test_arrow_keys_follow_adjacent_links() {
        let mut app = app_on_page(false, false);
        app.update(key(KeyCode::Left));
        assert_eq!(loaded_targets(&mut app), ["/pokemon/arbok"]);

        let mut app = app_on_page(false, false);
        app.update(key(KeyCode::Right));
        assert_eq!(loaded_targets(&mut app), ["/pokemon/raichu"]);
    }

    #[test]
    fn test_disabled_link_is_not_followed() {
        let mut app = app_on_page(true, true);
        app.update(key(KeyCode::Left));
        app.update(key(KeyCode::Right));
        assert!(loaded_targets(&mut app).is_empty());
    }

    #[test]
    fn test_arrow_keys_ignored_while_searching() {
        let mut app = app_on_page(false, false);
        app.update(key(KeyCode::Char('/')));
        type_text(&mut app, "ab");
        app.take_commands();
        app.update(key(KeyCode::Left));
        assert!(loaded_targets(&mut app).is_empty());
        assert_eq!(app.search.cursor(), 1);
    }

    #[test]
    fn test_superseded_page_is_dropped() {
        let mut app = app();
        app.navigate(NavigationTarget::pokemon("pikachu"));
        app.navigate(NavigationTarget::pokemon("raichu"));
        app.take_commands();

        app.handle_api_message(ApiMessage::PageFetched {
            identifier: "pikachu".to_string(),
            result: Ok(page("pikachu", false, false)),
        });
        assert!(app.page().is_none());
        assert_eq!(app.pending_identifier(), Some("raichu"));

        app.handle_api_message(ApiMessage::PageFetched {
            identifier: "raichu".to_string(),
            result: Ok(page("raichu", false, false)),
        });
        assert_eq!(app.page().unwrap().identifier, "raichu");
        assert_eq!(app.moves.total_count(), 1);
        assert!(app.page().unwrap().moves.is_empty());
        assert_eq!(app.pending_identifier(), None);
    }

    #[test]
    fn test_move_filter_survives_page_change() {
        let mut app = app_on_page(false, false);
        app.update(key(KeyCode::Char('f')));
        type_text(&mut app, "growl");
        app.update(key(KeyCode::Enter));
        assert_eq!(app.moves.visible_count(), 1);

        app.update(key(KeyCode::Right));
        app.take_commands();
        app.handle_api_message(ApiMessage::PageFetched {
            identifier: "raichu".to_string(),
            result: Ok(serde_json::from_value(serde_json::json!({
                "identifier": "raichu",
                "display_name": "Raichu",
                "dex": 26,
                "moves": [
                    {"name": "Thunder Shock", "level": 1, "effect": ""},
                    {"name": "Growl", "level": 1, "effect": ""}
                ]
            }))
            .unwrap()),
        });

        assert_eq!(app.page().unwrap().identifier, "raichu");
        assert_eq!(app.moves.filter_text(), "growl");
        assert_eq!(app.moves.total_count(), 2);
        assert_eq!(app.moves.visible_count(), 1);
    }

    #[test]
    fn test_random_pick_navigates() {
        let mut app = app_on_page(false, false);
        app.update(key(KeyCode::Char('r')));
        assert!(matches!(app.take_commands().as_slice(), [AppCommand::PickRandom]));

        app.handle_api_message(ApiMessage::RandomPicked {
            result: Ok("eevee".to_string()),
        });
        assert_eq!(loaded_targets(&mut app), ["/pokemon/eevee"]);
        assert_eq!(app.pending_identifier(), Some("eevee"));
    }

    #[test]
    fn test_random_pick_dropped_after_navigation() {
        let mut app = app_on_page(false, false);
        app.update(key(KeyCode::Char('r')));
        app.update(key(KeyCode::Right));
        app.take_commands();

        app.handle_api_message(ApiMessage::RandomPicked {
            result: Ok("eevee".to_string()),
        });
        assert!(app.take_commands().is_empty());
        assert_eq!(app.pending_identifier(), Some("raichu"));
    }

    #[test]
    fn test_random_pick_failure_shows_toast() {
        let mut app = app_on_page(false, false);
        app.update(key(KeyCode::Char('r')));
        app.handle_api_message(ApiMessage::RandomPicked {
            result: Err(ApiError::ServerError("HTTP 500".to_string())),
        });
        assert_eq!(app.toasts().len(), 1);
    }

    #[test]
    fn test_page_failure_shows_toast() {
        let mut app = app();
        app.navigate(NavigationTarget::pokemon("missingno"));
        app.handle_api_message(ApiMessage::PageFetched {
            identifier: "missingno".to_string(),
            result: Err(ApiError::NotFound("Pokémon 'missingno'".to_string())),
        });
        assert!(app.page().is_none());
        assert_eq!(app.pending_identifier(), None);
        assert_eq!(app.toasts().len(), 1);
        assert!(app
            .toasts()
            .iter()
            .next()
            .unwrap()
            .message
            .contains("missingno"));
    }

    #[test]
    fn test_toggle_theme_saves_preference() {
        let mut app = app_on_page(false, false);
        app.update(key(KeyCode::Char('t')));
        assert_eq!(app.theme().name, ThemeName::Light);
        match app.take_commands().as_slice() {
            [AppCommand::SavePreferences(p)] => assert_eq!(p.theme, ThemeName::Light),
            other => panic!("unexpected commands: {:?}", other),
        }
    }

    #[test]
    fn test_copy_and_open_use_absolute_url() {
        let mut app = app_on_page(false, false);
        app.update(key(KeyCode::Char('y')));
        app.update(key(KeyCode::Char('o')));
        let commands = app.take_commands();
        assert!(matches!(
            &commands[0],
            AppCommand::CopyToClipboard(url) if url == "http://127.0.0.1:5000/pokemon/pikachu"
        ));
        assert!(matches!(
            &commands[1],
            AppCommand::OpenInBrowser(url) if url == "http://127.0.0.1:5000/pokemon/pikachu"
        ));
    }

    #[test]
    fn test_copy_without_page_notifies() {
        let mut app = app();
        app.update(key(KeyCode::Esc));
        app.update(key(KeyCode::Char('y')));
        assert!(app.take_commands().is_empty());
        assert_eq!(app.toasts().len(), 1);
    }

    #[test]
    fn test_q_types_into_search_but_quits_from_page() {
        let mut app = app();
        app.update(key(KeyCode::Char('q')));
        assert!(!app.should_quit());
        assert_eq!(app.search_text(), "q");

        let mut app = app_on_page(false, false);
        app.update(key(KeyCode::Char('q')));
        assert!(app.should_quit());
    }

    #[test]
    fn test_quit_on_ctrl_c_anywhere() {
        let mut app = app();
        app.update(ctrl('c'));
        assert!(app.should_quit());
    }

    #[test]
    fn test_help_toggle() {
        let mut app = app_on_page(false, false);
        app.update(key(KeyCode::Char('?')));
        assert!(app.show_help);
        // Keys are consumed by the help panel.
        app.update(key(KeyCode::Left));
        assert!(app.take_commands().is_empty());
        app.update(key(KeyCode::Esc));
        assert!(!app.show_help);
    }

    #[test]
    fn test_view_records_dropdown_layout() {
        let mut app = app();
        type_text(&mut app, "pi");
        let token = last_ticket(&mut app);
        respond(&mut app, token, Ok(candidates()));

        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|frame| app.view(frame)).unwrap();

        let dropdown = app.search_layout.dropdown.expect("dropdown drawn");
        assert_eq!(dropdown.y, 3);
        assert_eq!(dropdown.height, 5);
    }

    #[test]
    fn test_view_renders_page() {
        let mut app = app_on_page(false, false);
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal.draw(|frame| app.view(frame)).unwrap();
        assert!(app.search_layout.dropdown.is_none());
    }
}
