//! Shared TUI components for PinPoint.
//!
//! The crate is organized into:
//! - `widgets` - ratatui widgets (chat transcript)
//! - `theme` - Colors and styles
//! - `utils` - Word splitting, wrapping, truncation
//!
//! Components are data-agnostic: callers pass plain structs rather than
//! session types.

pub mod theme;
pub mod utils;
pub mod widgets;

pub use theme::Theme;
pub use utils::{truncate, words, wrap_words, Word};
pub use widgets::chat::{ChatEntry, ChatRole, ChatWidget, SelectionView};
