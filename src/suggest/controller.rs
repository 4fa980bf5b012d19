//! Suggestion controller.
//!
//! Owns the input → query → render cycle of the search box: the current
//! candidate list, the keyboard highlight, and the single live request.
//!
//! The controller never performs I/O itself. `on_input` hands back a
//! [`QueryTicket`] that the caller dispatches (see `tasks::TaskSpawner`), and
//! the result is fed back through [`SuggestionController::apply_response`].
//! Every ticket carries a [`RequestToken`]; only the response for the most
//! recently issued token is ever applied, so a late answer to an older query
//! can never overwrite a newer one.

use std::fmt;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use super::NavigationTarget;
use crate::api::{ApiError, Candidate};

/// Identifies one issued suggestion query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestToken(u64);

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A query the caller must dispatch to the suggestion endpoint.
#[derive(Debug, Clone)]
pub struct QueryTicket {
    /// Token to hand back with the response.
    pub token: RequestToken,
    /// The trimmed query text.
    pub query: String,
    /// Fires when the query is superseded or the list is cleared.
    pub cancel: CancellationToken,
}

/// Where the controller is in its query lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No list shown, nothing in flight.
    Idle,
    /// A request is in flight (an older list may still be shown).
    Requesting,
    /// A non-empty list is shown and nothing is in flight.
    Rendered,
}

/// Result of offering a key press to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Not consumed; the caller applies its default handling.
    Unhandled,
    /// Consumed; the default behaviour must be suppressed.
    Handled,
    /// A suggestion was chosen; the list has been cleared.
    Navigate(NavigationTarget),
    /// Enter without a highlighted suggestion: submit the search form.
    Submit,
}

/// The in-flight request.
#[derive(Debug)]
struct InFlight {
    token: RequestToken,
    cancel: CancellationToken,
}

/// Autocomplete state for the search input.
#[derive(Debug, Default)]
pub struct SuggestionController {
    /// Candidates currently shown, in server order.
    candidates: Vec<Candidate>,
    /// Keyboard highlight; `None` means nothing highlighted.
    active: Option<usize>,
    /// Last token handed out.
    last_token: u64,
    /// The single live request, if any.
    in_flight: Option<InFlight>,
}

impl SuggestionController {
    /// Create an idle controller.
    pub fn new() -> Self {
        Self::default()
    }

    /// Candidates currently shown.
    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Highlighted index, if any.
    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    /// Highlighted candidate, if any.
    pub fn active_candidate(&self) -> Option<&Candidate> {
        self.active.and_then(|i| self.candidates.get(i))
    }

    /// Whether the suggestion panel is open.
    pub fn is_open(&self) -> bool {
        !self.candidates.is_empty()
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        if self.in_flight.is_some() {
            Phase::Requesting
        } else if self.is_open() {
            Phase::Rendered
        } else {
            Phase::Idle
        }
    }

    /// React to the search input's text changing.
    ///
    /// Blank text clears the list and issues nothing. Otherwise the previous
    /// request is cancelled before a new ticket is issued.
    pub fn on_input(&mut self, text: &str) -> Option<QueryTicket> {
        let query = text.trim();
        if query.is_empty() {
            self.clear();
            return None;
        }

        self.cancel_in_flight();

        self.last_token += 1;
        let token = RequestToken(self.last_token);
        let cancel = CancellationToken::new();
        self.in_flight = Some(InFlight {
            token,
            cancel: cancel.clone(),
        });

        trace!(%token, query, "Issuing suggestion query");
        Some(QueryTicket {
            token,
            query: query.to_string(),
            cancel,
        })
    }

    /// Apply the outcome of a dispatched ticket.
    ///
    /// Returns `true` when the list was replaced.
    pub fn apply_response(
        &mut self,
        token: RequestToken,
        result: Result<Vec<Candidate>, ApiError>,
    ) -> bool {
        match &self.in_flight {
            Some(live) if live.token == token => {
                self.in_flight = None;
            }
            _ => {
                trace!(%token, "Dropping superseded suggestion response");
                return false;
            }
        }

        match result {
            Ok(candidates) => {
                debug!(%token, count = candidates.len(), "Suggestions received");
                self.candidates = candidates;
                self.active = None;
                true
            }
            Err(e) if e.is_cancelled() => false,
            Err(e) => {
                // Failures leave the current list alone and are never surfaced.
                debug!(%token, "Ignoring suggestion failure: {}", e);
                false
            }
        }
    }

    /// Offer a key press from the focused search input.
    pub fn on_key_down(&mut self, key: KeyEvent) -> KeyOutcome {
        match (key.code, key.modifiers) {
            (KeyCode::Down, KeyModifiers::NONE) => self.move_active(1),
            (KeyCode::Up, KeyModifiers::NONE) => self.move_active(-1),
            (KeyCode::Enter, KeyModifiers::NONE) => match self.active_candidate() {
                Some(candidate) => {
                    let target = NavigationTarget::pokemon(candidate.id.clone());
                    self.clear();
                    KeyOutcome::Navigate(target)
                }
                None => KeyOutcome::Submit,
            },
            (KeyCode::Esc, _) => {
                self.clear();
                KeyOutcome::Handled
            }
            _ => KeyOutcome::Unhandled,
        }
    }

    /// A suggestion row was clicked.
    pub fn on_suggestion_click(&mut self, index: usize) -> Option<NavigationTarget> {
        let target = self
            .candidates
            .get(index)
            .map(|c| NavigationTarget::pokemon(c.id.clone()))?;
        self.clear();
        Some(target)
    }

    /// The user interacted outside both the input and the list.
    pub fn on_outside_interaction(&mut self) {
        self.clear();
    }

    /// Drop the list, the highlight, and any in-flight request.
    pub fn clear(&mut self) {
        self.cancel_in_flight();
        self.candidates.clear();
        self.active = None;
    }

    fn cancel_in_flight(&mut self) {
        if let Some(live) = self.in_flight.take() {
            trace!(token = %live.token, "Cancelling in-flight suggestion query");
            live.cancel.cancel();
        }
    }

    /// Move the highlight with wraparound.
    fn move_active(&mut self, delta: isize) -> KeyOutcome {
        let len = self.candidates.len();
        if len == 0 {
            return KeyOutcome::Unhandled;
        }

        self.active = Some(match (self.active, delta > 0) {
            (None, true) => 0,
            (None, false) => len - 1,
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
        });
        KeyOutcome::Handled
    }
}
