//! User interface components and views.
//!
//! This module contains all TUI rendering logic, including views for the
//! page and reusable components such as the search box.

pub mod components;
pub mod theme;
pub mod views;

pub use components::{render_search, SearchLayout, TextInput, ToastQueue};
pub use theme::Theme;
pub use views::{render_page, render_welcome, HelpAction, HelpView, MoveTable};
