//! Keyboard-driven text selection over the transcript.

use pinpoint_ui::{words, SelectionView};

/// Word-level selection inside one transcript entry.
///
/// Without an anchor the selection is collapsed: committing it yields an
/// empty string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranscriptSelection {
    entry: usize,
    cursor: usize,
    anchor: Option<usize>,
}

impl TranscriptSelection {
    /// Start on the last entry, or None when there is nothing to select.
    pub fn at_last(entries: usize) -> Option<Self> {
        entries.checked_sub(1).map(|entry| Self {
            entry,
            cursor: 0,
            anchor: None,
        })
    }

    /// Entry the selection lives in.
    pub fn entry(&self) -> usize {
        self.entry
    }

    /// Move to another entry. Resets cursor and anchor.
    pub fn move_entry(&mut self, delta: isize, entries: usize) {
        if entries == 0 {
            return;
        }
        let target = self.entry.saturating_add_signed(delta).min(entries - 1);
        if target != self.entry {
            self.entry = target;
            self.cursor = 0;
            self.anchor = None;
        }
    }

    /// Move the cursor within the current entry.
    pub fn move_cursor(&mut self, delta: isize, word_count: usize) {
        if word_count == 0 {
            return;
        }
        self.cursor = self.cursor.saturating_add_signed(delta).min(word_count - 1);
    }

    /// Set the anchor at the cursor, or drop it if one is set.
    pub fn toggle_anchor(&mut self) {
        self.anchor = match self.anchor {
            Some(_) => None,
            None => Some(self.cursor),
        };
    }

    /// Selected word range (inclusive), if anchored.
    pub fn range(&self) -> Option<(usize, usize)> {
        self.anchor
            .map(|anchor| (anchor.min(self.cursor), anchor.max(self.cursor)))
    }

    /// The selected slice of `content`, empty when collapsed.
    pub fn selected_text<'a>(&self, content: &'a str) -> &'a str {
        let Some((first, last)) = self.range() else {
            return "";
        };
        let words = words(content);
        match (words.get(first), words.get(last)) {
            (Some(start), Some(end)) => &content[start.start..end.end],
            _ => "",
        }
    }

    /// What the chat widget draws.
    pub fn view(&self) -> SelectionView {
        SelectionView {
            entry: self.entry,
            cursor: self.cursor,
            range: self.range(),
        }
    }
}
