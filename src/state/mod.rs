//! Immutable editing-state snapshots.
//!
//! [`EditorState`] bundles the document content, the selection, and a record
//! of the change that produced it. Every operation returns a new state; a
//! state is never mutated in place. The surface replaces its state wholesale
//! on each keystroke, command, or host event and tracks replacements through
//! the revision counter.

mod content;
mod selection;

pub use content::Content;
pub use selection::Selection;

/// What kind of change produced a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// Initial state, nothing applied yet.
    Init,
    /// Characters inserted at the selection.
    Insert,
    /// A range removed (backspace, delete, cut).
    Remove,
    /// Line split with indentation continuation (Enter).
    SplitLine,
    /// Lines indented by one unit (Tab).
    Indent,
    /// Lines dedented by one unit (Shift-Tab, backspace in indentation).
    Dedent,
    /// Whole document replaced by a host `content-change` event.
    HostContentChange,
    /// Markdown links inserted by a host `file-attach` event.
    HostFileAttach,
    /// Only the selection moved.
    SelectionMove,
}

/// Direction for caret movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// An immutable snapshot of the editing session.
///
/// Cloning is cheap (the content rope shares structure), and every editing
/// operation returns a new snapshot with a bumped revision. Operations that
/// change nothing return an identical snapshot with the *same* revision, so
/// callers can compare revisions to detect real changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorState {
    content: Content,
    selection: Selection,
    last_change: ChangeKind,
    revision: u64,
}

impl EditorState {
    /// Create an empty state.
    pub fn empty() -> Self {
        Self {
            content: Content::empty(),
            selection: Selection::collapsed(0),
            last_change: ChangeKind::Init,
            revision: 0,
        }
    }

    /// Create a state holding `text` with the caret at the start.
    pub fn with_text(text: &str) -> Self {
        Self {
            content: Content::from_text(text),
            selection: Selection::collapsed(0),
            last_change: ChangeKind::Init,
            revision: 0,
        }
    }

    /// The document content.
    pub const fn content(&self) -> &Content {
        &self.content
    }

    /// The current selection.
    pub const fn selection(&self) -> Selection {
        self.selection
    }

    /// The change that produced this state.
    pub const fn last_change(&self) -> ChangeKind {
        self.last_change
    }

    /// Monotonic revision; bumped whenever a new state is installed.
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// The plain-text projection of the content.
    pub fn plain_text(&self) -> String {
        self.content.plain_text()
    }

    /// Install new content and selection, recording the change kind.
    pub fn push(&self, content: Content, selection: Selection, change: ChangeKind) -> Self {
        let selection = selection.clamp(content.len_chars());
        Self {
            content,
            selection,
            last_change: change,
            revision: self.revision + 1,
        }
    }

    /// Install a new selection without touching the content.
    pub fn force_selection(&self, selection: Selection) -> Self {
        self.push(self.content.clone(), selection, ChangeKind::SelectionMove)
    }

    /// Replace the selected range with `text`, collapsing the selection to
    /// immediately after the inserted text (the edit's selection-after).
    pub fn replace_selection(&self, text: &str, change: ChangeKind) -> Self {
        let start = self.selection.start();
        let end = self.selection.end();
        let content = self.content.replace(start..end, text);
        let after = Selection::collapsed(start + text.chars().count());
        self.push(content, after, change)
    }

    /// Replace the entire document, installing a fresh collapsed selection
    /// at the origin. Used for host-driven content replacement; the previous
    /// caret is deliberately not preserved.
    pub fn replace_all(&self, text: &str) -> Self {
        self.push(
            Content::from_text(text),
            Selection::collapsed(0),
            ChangeKind::HostContentChange,
        )
    }

    /// Insert one character at the selection.
    pub fn insert_char(&self, ch: char) -> Self {
        let mut buf = [0u8; 4];
        self.replace_selection(ch.encode_utf8(&mut buf), ChangeKind::Insert)
    }

    /// Default backspace: delete the selection, or the character before a
    /// collapsed caret. No-op at the start of the document.
    pub fn delete_back(&self) -> Self {
        if !self.selection.is_collapsed() {
            return self.replace_selection("", ChangeKind::Remove);
        }
        let offset = self.selection.focus();
        if offset == 0 {
            return self.clone();
        }
        let content = self.content.replace(offset - 1..offset, "");
        self.push(content, Selection::collapsed(offset - 1), ChangeKind::Remove)
    }

    /// Delete the selection, or the character after a collapsed caret.
    /// No-op at the end of the document.
    pub fn delete_forward(&self) -> Self {
        if !self.selection.is_collapsed() {
            return self.replace_selection("", ChangeKind::Remove);
        }
        let offset = self.selection.focus();
        if offset >= self.content.len_chars() {
            return self.clone();
        }
        let content = self.content.replace(offset..offset + 1, "");
        self.push(content, Selection::collapsed(offset), ChangeKind::Remove)
    }

    /// Move the caret one step in `direction`.
    ///
    /// With `extend` the anchor stays put and the focus moves (shift-arrow
    /// selection); otherwise a non-collapsed selection collapses to the edge
    /// in the direction of travel before moving.
    pub fn move_caret(&self, direction: Direction, extend: bool) -> Self {
        let focus = match direction {
            Direction::Left => {
                if !extend && !self.selection.is_collapsed() {
                    self.selection.start()
                } else {
                    self.selection.focus().saturating_sub(1)
                }
            }
            Direction::Right => {
                if !extend && !self.selection.is_collapsed() {
                    self.selection.end()
                } else {
                    (self.selection.focus() + 1).min(self.content.len_chars())
                }
            }
            Direction::Up | Direction::Down => self.vertical_target(direction),
        };
        self.moved_to(focus, extend)
    }

    /// Move to the start of the caret's line (Home).
    pub fn move_home(&self, extend: bool) -> Self {
        let (line, _) = self.content.position_of(self.selection.focus());
        self.moved_to(self.content.line_start(line), extend)
    }

    /// Move to the end of the caret's line (End).
    pub fn move_end(&self, extend: bool) -> Self {
        let (line, _) = self.content.position_of(self.selection.focus());
        let offset = self.content.line_start(line) + self.content.line_len(line);
        self.moved_to(offset, extend)
    }

    /// Move one word to the left (Ctrl+Left).
    pub fn move_word_left(&self, extend: bool) -> Self {
        let offset = self.selection.focus();
        let (line, col) = self.content.position_of(offset);
        if col == 0 {
            if line == 0 {
                return self.moved_to(0, extend);
            }
            let prev_end = self.content.line_start(line - 1) + self.content.line_len(line - 1);
            return self.moved_to(prev_end, extend);
        }
        let chars: Vec<char> = self
            .content
            .line_at(line)
            .unwrap_or_default()
            .chars()
            .collect();
        let mut pos = col;
        while pos > 0 && !is_word_char(chars[pos - 1]) {
            pos -= 1;
        }
        while pos > 0 && is_word_char(chars[pos - 1]) {
            pos -= 1;
        }
        self.moved_to(self.content.line_start(line) + pos, extend)
    }

    /// Move one word to the right (Ctrl+Right).
    pub fn move_word_right(&self, extend: bool) -> Self {
        let offset = self.selection.focus();
        let (line, col) = self.content.position_of(offset);
        let line_len = self.content.line_len(line);
        if col >= line_len {
            if line + 1 >= self.content.line_count() {
                return self.moved_to(self.content.len_chars(), extend);
            }
            return self.moved_to(self.content.line_start(line + 1), extend);
        }
        let chars: Vec<char> = self
            .content
            .line_at(line)
            .unwrap_or_default()
            .chars()
            .collect();
        let mut pos = col;
        while pos < chars.len() && is_word_char(chars[pos]) {
            pos += 1;
        }
        while pos < chars.len() && !is_word_char(chars[pos]) {
            pos += 1;
        }
        self.moved_to(self.content.line_start(line) + pos, extend)
    }

    /// Move to the start of the document (Ctrl+Home).
    pub fn move_to_start(&self, extend: bool) -> Self {
        self.moved_to(0, extend)
    }

    /// Move to the end of the document (Ctrl+End).
    pub fn move_to_end(&self, extend: bool) -> Self {
        self.moved_to(self.content.len_chars(), extend)
    }

    // --- Private helpers ---

    fn moved_to(&self, focus: usize, extend: bool) -> Self {
        let selection = if extend {
            Selection::new(self.selection.anchor(), focus)
        } else {
            Selection::collapsed(focus)
        };
        if selection == self.selection {
            return self.clone();
        }
        self.force_selection(selection)
    }

    fn vertical_target(&self, direction: Direction) -> usize {
        let (line, col) = self.content.position_of(self.selection.focus());
        let target_line = match direction {
            Direction::Up => {
                if line == 0 {
                    return self.selection.focus();
                }
                line - 1
            }
            Direction::Down => {
                if line + 1 >= self.content.line_count() {
                    return self.selection.focus();
                }
                line + 1
            }
            Direction::Left | Direction::Right => unreachable!("horizontal handled by caller"),
        };
        let col = col.min(self.content.line_len(target_line));
        self.content.line_start(target_line) + col
    }
}

impl Default for EditorState {
    fn default() -> Self {
        Self::empty()
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
