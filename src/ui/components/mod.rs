//! Reusable UI components.

mod input;
mod suggestions;
mod toast;

pub use input::TextInput;
pub use suggestions::{render_search, SearchLayout};
pub use toast::ToastQueue;
