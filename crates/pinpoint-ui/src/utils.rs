//! Text utilities for TUI rendering.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// A whitespace-delimited word and its byte range in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Word {
    /// Position of the word in the whole text.
    pub index: usize,
    /// Byte offset of the first character.
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
}

impl Word {
    /// The word's text within `source`.
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }
}

/// Split text into words, keeping byte offsets.
pub fn words(text: &str) -> Vec<Word> {
    wrap_words(text, usize::MAX).into_iter().flatten().collect()
}

/// Wrap text into lines of words that fit within `width` columns.
///
/// Newlines in the text always start a new line. A word wider than `width`
/// gets a line of its own and is left for the renderer to clip. Word indices
/// are the same as those returned by [`words`].
pub fn wrap_words(text: &str, width: usize) -> Vec<Vec<Word>> {
    let mut lines = Vec::new();
    let mut index = 0;
    let mut line_start = 0;

    for line in text.split('\n') {
        let mut current: Vec<Word> = Vec::new();
        let mut current_width = 0;
        let mut word_start: Option<usize> = None;

        let mut push_word =
            |start: usize, end: usize, current: &mut Vec<Word>, current_width: &mut usize| {
                let word_width = UnicodeWidthStr::width(&text[start..end]);
                if !current.is_empty() && current_width.saturating_add(word_width + 1) > width {
                    lines.push(std::mem::take(current));
                    *current_width = 0;
                }
                *current_width += if current.is_empty() {
                    word_width
                } else {
                    word_width + 1
                };
                current.push(Word { index, start, end });
                index += 1;
            };

        for (offset, ch) in line.char_indices() {
            let at = line_start + offset;
            if ch.is_whitespace() {
                if let Some(start) = word_start.take() {
                    push_word(start, at, &mut current, &mut current_width);
                }
            } else if word_start.is_none() {
                word_start = Some(at);
            }
        }
        if let Some(start) = word_start {
            push_word(start, line_start + line.len(), &mut current, &mut current_width);
        }

        lines.push(current);
        line_start += line.len() + 1;
    }

    lines
}

/// Truncate a string to fit within a given width, adding ellipsis if needed.
pub fn truncate(text: &str, max_width: usize) -> String {
    if max_width < 3 {
        return text.chars().take(max_width).collect();
    }
    if UnicodeWidthStr::width(text) <= max_width {
        return text.to_string();
    }

    let mut width = 0;
    let mut result = String::new();

    for ch in text.chars() {
        let ch_width = UnicodeWidthChar::width(ch).unwrap_or(1);
        if width + ch_width > max_width - 3 {
            break;
        }
        result.push(ch);
        width += ch_width;
    }

    result.push_str("...");
    result
}
