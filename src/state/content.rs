use std::ops::Range;

use ropey::Rope;

/// An immutable document snapshot backed by a rope.
///
/// All offsets are character offsets into the document. Edits return a new
/// `Content`; cloning is cheap because the rope shares structure between
/// snapshots.
#[derive(Clone, Default)]
pub struct Content {
    rope: Rope,
}

impl Content {
    /// Create an empty document.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a document from plain text.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }

    /// The full plain-text projection of the document.
    pub fn plain_text(&self) -> String {
        self.rope.to_string()
    }

    /// Total length in characters.
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// Whether the document contains no text.
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Total number of lines.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Get the content of a line (without trailing newline).
    pub fn line_at(&self, line_idx: usize) -> Option<String> {
        if line_idx >= self.rope.len_lines() {
            return None;
        }
        let s = self.rope.line(line_idx).to_string();
        Some(s.trim_end_matches('\n').trim_end_matches('\r').to_string())
    }

    /// Length of a line in characters (without trailing newline).
    pub fn line_len(&self, line_idx: usize) -> usize {
        self.line_at(line_idx).map_or(0, |s| s.chars().count())
    }

    /// The line index containing the character offset.
    pub fn line_of(&self, offset: usize) -> usize {
        self.rope.char_to_line(offset.min(self.rope.len_chars()))
    }

    /// The character offset of the start of a line.
    pub fn line_start(&self, line_idx: usize) -> usize {
        let line_idx = line_idx.min(self.rope.len_lines().saturating_sub(1));
        self.rope.line_to_char(line_idx)
    }

    /// The `(line, column)` position of a character offset.
    pub fn position_of(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.rope.len_chars());
        let line = self.rope.char_to_line(offset);
        (line, offset - self.rope.line_to_char(line))
    }

    /// Extract the text of a character range.
    pub fn slice(&self, range: Range<usize>) -> String {
        let max = self.rope.len_chars();
        let start = range.start.min(max);
        let end = range.end.clamp(start, max);
        self.rope.slice(start..end).to_string()
    }

    /// Replace a character range with `text`, returning the new document.
    ///
    /// The range is clamped to the document bounds.
    pub fn replace(&self, range: Range<usize>, text: &str) -> Self {
        let max = self.rope.len_chars();
        let start = range.start.min(max);
        let end = range.end.clamp(start, max);
        let mut rope = self.rope.clone();
        rope.remove(start..end);
        rope.insert(start, text);
        Self { rope }
    }
}

impl PartialEq for Content {
    fn eq(&self, other: &Self) -> bool {
        self.rope == other.rope
    }
}

impl Eq for Content {}

impl std::fmt::Debug for Content {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Content")
            .field(
                "rope",
                &format_args!("Rope({} lines)", self.rope.len_lines()),
            )
            .finish()
    }
}
