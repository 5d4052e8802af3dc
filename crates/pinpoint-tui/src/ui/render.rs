//! Main render function for the TUI.

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use pinpoint_core::{ChatRole as CoreRole, SessionStatus};
use pinpoint_ui::{truncate, ChatEntry, ChatRole, ChatWidget, Theme};

use crate::state::{Focus, UiState};

/// Render the entire UI.
pub fn render(frame: &mut Frame, state: &UiState) {
    let area = frame.area();
    let theme = Theme::default();

    let banner_height = if state.banner().is_some() { 1 } else { 0 };
    let highlight_height = if state.snapshot.highlighted.is_some() { 1 } else { 0 };

    let [header_area, banner_area, body_area, highlight_area, input_area, footer_area] =
        Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(banner_height),
            Constraint::Fill(1),
            Constraint::Length(highlight_height),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .areas(area);

    render_header(frame, header_area, state, theme);

    if let Some(error) = state.banner() {
        let banner = Paragraph::new(Line::from(Span::styled(
            format!(" {} ", error),
            theme.error_style().add_modifier(Modifier::BOLD),
        )));
        frame.render_widget(banner, banner_area);
    }

    render_transcript(frame, body_area, state, theme);

    if let Some(highlighted) = &state.snapshot.highlighted {
        let width = (highlight_area.width as usize).saturating_sub(16);
        let line = Line::from(vec![
            Span::styled(" Highlighted: ", theme.bold()),
            Span::styled(
                truncate(&highlighted.replace('\n', " "), width),
                theme.selection_style(),
            ),
        ]);
        frame.render_widget(Paragraph::new(line), highlight_area);
    }

    render_input(frame, input_area, state, theme);
    render_footer(frame, footer_area, state, theme);
}

/// Header with session status.
fn render_header(frame: &mut Frame, area: Rect, state: &UiState, theme: Theme) {
    let (label, style) = match state.snapshot.status {
        SessionStatus::Idle => ("Idle", theme.success_style()),
        SessionStatus::Waiting => ("Waiting", theme.warning_style()),
        SessionStatus::Failed => ("Failed", theme.error_style()),
    };

    let status = Line::from(vec![
        Span::raw(" Status: "),
        Span::styled(label, style.add_modifier(Modifier::BOLD)),
    ]);

    let header = Paragraph::new(status).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" PinPoint AI Chat ")
            .title_style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)),
    );

    frame.render_widget(header, area);
}

fn render_transcript(frame: &mut Frame, area: Rect, state: &UiState, theme: Theme) {
    let entries: Vec<ChatEntry> = state
        .snapshot
        .history
        .iter()
        .filter_map(|message| {
            let role = match message.role() {
                CoreRole::User => ChatRole::User,
                CoreRole::Assistant => ChatRole::Assistant,
                CoreRole::Error => ChatRole::Error,
                CoreRole::System => return None,
            };
            Some(ChatEntry {
                role,
                content: message.content(),
            })
        })
        .collect();

    ChatWidget::new(&entries)
        .selection(state.selection.map(|s| s.view()))
        .thinking(state.snapshot.status == SessionStatus::Waiting)
        .focused(state.focus == Focus::Transcript)
        .theme(theme)
        .render(frame, area);
}

fn render_input(frame: &mut Frame, area: Rect, state: &UiState, theme: Theme) {
    let is_focused = state.focus == Focus::Input;
    let border_style = if is_focused {
        theme.focused_border()
    } else {
        theme.unfocused_border()
    };

    let title = if state.snapshot.status == SessionStatus::Waiting {
        " Waiting for answer "
    } else {
        " Message (Enter to send) "
    };

    let paragraph = if state.input.is_empty() {
        let placeholder = if state.snapshot.highlighted.is_some() {
            "Ask a follow-up question"
        } else {
            "Type your message..."
        };
        let cursor = if is_focused { "│" } else { "" };
        Paragraph::new(Line::from(vec![
            Span::raw(cursor),
            Span::styled(placeholder, theme.muted_style()),
        ]))
    } else if is_focused {
        let chars: Vec<char> = state.input.chars().collect();
        let cursor_pos = state.input_cursor.min(chars.len());
        let before: String = chars[..cursor_pos].iter().collect();
        let after: String = chars[cursor_pos..].iter().collect();
        Paragraph::new(format!("{}│{}", before, after))
    } else {
        Paragraph::new(state.input.as_str())
    };

    let input = paragraph.style(Style::default().fg(Color::White)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(title),
    );

    frame.render_widget(input, area);
}

/// Render the footer with status message.
fn render_footer(frame: &mut Frame, area: Rect, state: &UiState, theme: Theme) {
    let status = state.status_message.as_deref().unwrap_or("Ready");

    let help = match state.focus {
        Focus::Input => " Enter: send | Tab: select text | Esc/Ctrl-C: quit ",
        Focus::Transcript => {
            " j/k: message | h/l: word | v: mark | Enter: highlight | Esc/Tab: back "
        }
    };

    let footer = Line::from(vec![
        Span::styled(status, theme.success_style()),
        Span::raw(" | "),
        Span::styled(help, theme.muted_style()),
    ]);

    frame.render_widget(Paragraph::new(footer), area);
}
