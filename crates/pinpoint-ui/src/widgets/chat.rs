//! Chat widget for displaying the conversation transcript.

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::theme::Theme;
use crate::utils::wrap_words;

const INDENT: &str = "  ";

/// Role of a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
    Error,
}

/// A single transcript entry.
#[derive(Debug, Clone, Copy)]
pub struct ChatEntry<'a> {
    pub role: ChatRole,
    pub content: &'a str,
}

/// Word-level selection inside one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionView {
    /// Entry the selection lives in.
    pub entry: usize,
    /// Word under the cursor.
    pub cursor: usize,
    /// Selected words (inclusive), if an anchor is set.
    pub range: Option<(usize, usize)>,
}

/// Configuration for the chat widget.
#[derive(Debug, Clone)]
pub struct ChatWidget<'a> {
    /// Entries to display.
    entries: &'a [ChatEntry<'a>],
    /// Active selection, if the transcript has focus.
    selection: Option<SelectionView>,
    /// Show the waiting indicator after the last entry.
    thinking: bool,
    /// Whether the widget is focused.
    focused: bool,
    /// Theme for styling.
    theme: Theme,
}

impl<'a> ChatWidget<'a> {
    /// Create a new chat widget.
    pub fn new(entries: &'a [ChatEntry<'a>]) -> Self {
        Self {
            entries,
            selection: None,
            thinking: false,
            focused: false,
            theme: Theme::default(),
        }
    }

    /// Set the selection to draw.
    pub fn selection(mut self, selection: Option<SelectionView>) -> Self {
        self.selection = selection;
        self
    }

    /// Show the waiting indicator.
    pub fn thinking(mut self, thinking: bool) -> Self {
        self.thinking = thinking;
        self
    }

    /// Set whether the widget is focused.
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Set the theme.
    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    fn word_style(&self, entry: usize, word: usize, base: Style) -> Style {
        let Some(selection) = self.selection.filter(|s| s.entry == entry) else {
            return base;
        };
        if word == selection.cursor {
            return self.theme.cursor_style();
        }
        match selection.range {
            Some((first, last)) if (first..=last).contains(&word) => self.theme.selection_style(),
            _ => base,
        }
    }

    /// Render the widget.
    pub fn render(self, frame: &mut Frame, area: Rect) {
        let border_style = if self.focused {
            self.theme.focused_border()
        } else {
            self.theme.unfocused_border()
        };

        let visible_height = area.height.saturating_sub(2) as usize;
        let text_width = area.width.saturating_sub(2) as usize;
        let wrap_width = text_width.saturating_sub(INDENT.len()).max(1);

        let mut all_lines: Vec<Line> = Vec::new();
        let mut focus_line: Option<usize> = None;

        for (i, entry) in self.entries.iter().enumerate() {
            let (prefix, style, body) = match entry.role {
                ChatRole::User => ("You", self.theme.user_style(), Style::default()),
                ChatRole::Assistant => ("AI", self.theme.assistant_style(), Style::default()),
                ChatRole::Error => ("Error", self.theme.error_style(), self.theme.error_style()),
            };

            all_lines.push(Line::from(Span::styled(
                prefix,
                style.add_modifier(Modifier::BOLD),
            )));

            for words in wrap_words(entry.content, wrap_width) {
                let mut spans = vec![Span::raw(INDENT)];
                for (n, word) in words.iter().enumerate() {
                    if n > 0 {
                        spans.push(Span::raw(" "));
                    }
                    if self
                        .selection
                        .is_some_and(|s| s.entry == i && s.cursor == word.index)
                    {
                        focus_line = Some(all_lines.len());
                    }
                    spans.push(Span::styled(
                        word.text(entry.content),
                        self.word_style(i, word.index, body),
                    ));
                }
                all_lines.push(Line::from(spans));
            }

            // Blank line between messages
            all_lines.push(Line::from(""));
        }

        if self.thinking {
            all_lines.push(Line::from(Span::styled(
                "AI is thinking...",
                self.theme.muted_style().add_modifier(Modifier::ITALIC),
            )));
        }

        let total_lines = all_lines.len();

        // Keep the cursor centered while selecting, otherwise stick to the bottom
        let max_scroll = total_lines.saturating_sub(visible_height);
        let scroll_offset = focus_line
            .map(|line| line.saturating_sub(visible_height / 2).min(max_scroll))
            .unwrap_or(max_scroll);

        let lines: Vec<Line> = all_lines
            .into_iter()
            .skip(scroll_offset)
            .take(visible_height)
            .collect();

        let title = format!(" Chat [{} messages] ", self.entries.len());

        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(title),
        );

        frame.render_widget(paragraph, area);
    }
}
