//! Application views (screens).

mod help;
mod moves;
mod page;

pub use help::{HelpAction, HelpView};
pub use moves::MoveTable;
pub use page::{render_page, render_welcome};
