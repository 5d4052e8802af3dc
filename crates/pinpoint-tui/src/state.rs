//! UI state for rendering.

use pinpoint_session::SessionSnapshot;

use crate::selection::TranscriptSelection;

/// Pane that receives key presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Input,
    Transcript,
}

/// Snapshot of data for rendering (no async, no locks).
#[derive(Default)]
pub struct UiState {
    /// Latest session state published by the actor.
    pub snapshot: SessionSnapshot,

    /// Text being composed.
    pub input: String,

    /// Cursor position in `input`, in chars.
    pub input_cursor: usize,

    /// Focused pane.
    pub focus: Focus,

    /// Transcript selection while the transcript is focused.
    pub selection: Option<TranscriptSelection>,

    /// Status message to display in footer.
    pub status_message: Option<String>,

    /// Error shown in the banner until the next successful action.
    pub last_error: Option<String>,

    /// Set once the user asks to quit.
    pub quit: bool,
}

impl UiState {
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Text for the error banner: a local fault, else the last failed request.
    pub fn banner(&self) -> Option<&str> {
        self.last_error.as_deref().or_else(|| {
            self.snapshot
                .last_failure
                .as_ref()
                .map(|failure| failure.message.as_str())
        })
    }

    /// Insert a char at the cursor (unicode-safe).
    pub fn insert_char(&mut self, c: char) {
        let byte_idx = self.byte_index(self.input_cursor);
        self.input.insert(byte_idx, c);
        self.input_cursor += 1;
    }

    /// Delete the char before the cursor.
    pub fn backspace(&mut self) {
        if self.input_cursor == 0 {
            return;
        }
        self.input_cursor -= 1;
        let byte_idx = self.byte_index(self.input_cursor);
        if let Some(ch) = self.input[byte_idx..].chars().next() {
            self.input
                .replace_range(byte_idx..byte_idx + ch.len_utf8(), "");
        }
    }

    pub fn cursor_left(&mut self) {
        self.input_cursor = self.input_cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        if self.input_cursor < self.input.chars().count() {
            self.input_cursor += 1;
        }
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
        self.input_cursor = 0;
    }

    /// Focus the transcript, selecting in the newest entry.
    pub fn focus_transcript(&mut self) {
        self.selection = TranscriptSelection::at_last(self.snapshot.history.len());
        self.focus = Focus::Transcript;
    }

    /// Return to the input box, dropping any uncommitted selection.
    pub fn focus_input(&mut self) {
        self.selection = None;
        self.focus = Focus::Input;
    }

    fn byte_index(&self, char_idx: usize) -> usize {
        self.input
            .char_indices()
            .nth(char_idx)
            .map(|(idx, _)| idx)
            .unwrap_or(self.input.len())
    }
}

#[cfg(test)]
mod tests {
    use pinpoint_core::{Failure, Message};

    use super::*;

    fn typed(text: &str) -> UiState {
        let mut state = UiState::default();
        for c in text.chars() {
            state.insert_char(c);
        }
        state
    }

    #[test]
    fn test_editing_is_unicode_safe() {
        let mut state = typed("héllo");
        state.cursor_left();
        state.cursor_left();
        state.cursor_left();
        state.backspace();
        assert_eq!(state.input, "hllo");

        state.insert_char('ü');
        assert_eq!(state.input, "hüllo");
        assert_eq!(state.input_cursor, 2);
    }

    #[test]
    fn test_cursor_stays_in_bounds() {
        let mut state = typed("ab");
        state.cursor_right();
        assert_eq!(state.input_cursor, 2);
        state.clear_input();
        state.cursor_left();
        state.backspace();
        assert_eq!(state.input_cursor, 0);
        assert!(state.input.is_empty());
    }

    #[test]
    fn test_focus_transcript_without_history() {
        let mut state = UiState::default();
        state.focus_transcript();
        assert_eq!(state.focus, Focus::Transcript);
        assert!(state.selection.is_none());
    }

    #[test]
    fn test_focus_round_trip_drops_selection() {
        let mut state = UiState::default();
        state.snapshot.history = vec![Message::user("hi"), Message::assistant("hello")];

        state.focus_transcript();
        assert_eq!(state.selection.map(|s| s.entry()), Some(1));

        state.focus_input();
        assert_eq!(state.focus, Focus::Input);
        assert!(state.selection.is_none());
    }

    #[test]
    fn test_banner_prefers_local_error() {
        let mut state = UiState::default();
        assert_eq!(state.banner(), None);

        state.snapshot.last_failure = Some(Failure::upstream(503, "rate limited"));
        assert_eq!(state.banner(), Some("rate limited"));

        state.last_error = Some("Session closed".to_string());
        assert_eq!(state.banner(), Some("Session closed"));
    }
}
