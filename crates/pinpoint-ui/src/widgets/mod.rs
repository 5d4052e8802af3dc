//! Reusable TUI widgets.

pub mod chat;
