//! Application state and main event loop.

use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::DefaultTerminal;
use tracing::{debug, error, warn};

use pinpoint_core::{CoreError, SessionStatus};
use pinpoint_session::{SessionError, SessionHandle, UNEXPECTED_ERROR_MESSAGE};
use pinpoint_ui::words;

use crate::state::{Focus, UiState};
use crate::ui;

/// Main application with UI state and the session handle.
pub struct App {
    /// Current UI state snapshot for rendering.
    state: UiState,

    /// Handle to the session actor.
    session: SessionHandle,
}

impl App {
    /// Create a new application instance.
    pub fn new(session: SessionHandle) -> Self {
        Self {
            state: UiState::default(),
            session,
        }
    }

    /// Run the main event loop.
    ///
    /// Each iteration runs under `catch_unwind` so a fault while drawing or
    /// handling a key shows an error banner instead of tearing down the app.
    pub fn run(&mut self, mut terminal: DefaultTerminal) -> std::io::Result<()> {
        loop {
            match panic::catch_unwind(AssertUnwindSafe(|| self.step(&mut terminal))) {
                Ok(result) => result?,
                Err(_) => {
                    error!("UI iteration panicked");
                    self.state.last_error = Some(UNEXPECTED_ERROR_MESSAGE.to_string());
                    self.state.focus_input();
                }
            }

            if self.state.should_quit() {
                break;
            }
        }

        Ok(())
    }

    /// Refresh from the session, draw, then handle at most one key.
    fn step(&mut self, terminal: &mut DefaultTerminal) -> std::io::Result<()> {
        self.state.snapshot = self.session.snapshot();

        terminal.draw(|frame| ui::render(frame, &self.state))?;

        // The failure is on screen now; let the session accept input again
        if self.state.snapshot.status == SessionStatus::Failed {
            if let Err(e) = self.session.blocking_acknowledge() {
                self.report(e);
            }
        }

        // Poll terminal events (non-blocking with short timeout)
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key);
                }
            }
        }

        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.state.quit = true;
            return;
        }

        match self.state.focus {
            Focus::Input => self.handle_input_key(key.code),
            Focus::Transcript => self.handle_transcript_key(key.code),
        }
    }

    fn handle_input_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => self.state.quit = true,
            KeyCode::Enter => self.submit(),
            KeyCode::Tab => {
                self.state.focus_transcript();
                if self.state.selection.is_none() {
                    self.state.status_message = Some("Nothing to select yet".to_string());
                    self.state.focus_input();
                }
            }
            KeyCode::Char(c) => self.state.insert_char(c),
            KeyCode::Backspace => self.state.backspace(),
            KeyCode::Left => self.state.cursor_left(),
            KeyCode::Right => self.state.cursor_right(),
            KeyCode::Home => self.state.input_cursor = 0,
            KeyCode::End => self.state.input_cursor = self.state.input.chars().count(),
            _ => {}
        }
    }

    fn handle_transcript_key(&mut self, code: KeyCode) {
        let entries = self.state.snapshot.history.len();
        let Some(selection) = self.state.selection.as_mut() else {
            self.state.focus_input();
            return;
        };
        let word_count = self
            .state
            .snapshot
            .history
            .get(selection.entry())
            .map(|message| words(message.content()).len())
            .unwrap_or(0);

        match code {
            KeyCode::Esc | KeyCode::Tab => self.state.focus_input(),
            KeyCode::Up | KeyCode::Char('k') => selection.move_entry(-1, entries),
            KeyCode::Down | KeyCode::Char('j') => selection.move_entry(1, entries),
            KeyCode::Left | KeyCode::Char('h') => selection.move_cursor(-1, word_count),
            KeyCode::Right | KeyCode::Char('l') => selection.move_cursor(1, word_count),
            KeyCode::Char('v') | KeyCode::Char(' ') => selection.toggle_anchor(),
            KeyCode::Enter => self.commit_selection(),
            _ => {}
        }
    }

    fn submit(&mut self) {
        match self.session.blocking_submit(self.state.input.clone()) {
            Ok(id) => {
                debug!(request_id = %id, "Submitted message");
                self.state.clear_input();
                self.state.last_error = None;
                self.state.status_message = Some("Sent".to_string());
            }
            Err(SessionError::Rejected(CoreError::EmptySubmission)) => {}
            Err(SessionError::Rejected(CoreError::RequestInFlight)) => {
                self.state.status_message =
                    Some("Waiting for the previous answer".to_string());
            }
            Err(SessionError::Rejected(CoreError::FailureNotAcknowledged)) => {
                self.state.status_message = Some("Showing the last error".to_string());
            }
            Err(e) => self.report(e),
        }
    }

    fn commit_selection(&mut self) {
        let Some(selection) = self.state.selection else {
            return;
        };
        let text = self
            .state
            .snapshot
            .history
            .get(selection.entry())
            .map(|message| selection.selected_text(message.content()).to_string())
            .unwrap_or_default();

        match self.session.blocking_select(text) {
            Ok(true) => {
                self.state.status_message = Some("Highlight set".to_string());
                self.state.focus_input();
            }
            Ok(false) => {
                self.state.status_message = Some("Nothing selected".to_string());
            }
            Err(e) => self.report(e),
        }
    }

    fn report(&mut self, err: SessionError) {
        warn!(error = %err, "Session command failed");
        self.state.last_error = Some(err.to_string());
    }
}
