//! Search autocomplete.
//!
//! This module provides the suggestion controller that drives the search box
//! and the navigation targets it produces.

mod controller;
mod navigation;

pub use controller::{KeyOutcome, Phase, QueryTicket, RequestToken, SuggestionController};
pub use navigation::NavigationTarget;
