/// A selection range over document character offsets.
///
/// `anchor` is where the selection started, `focus` is where it currently
/// points (the caret). The two may be in either order; a collapsed selection
/// has `anchor == focus` and renders as a bare caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    anchor: usize,
    focus: usize,
}

impl Selection {
    /// Create a selection spanning from `anchor` to `focus`.
    pub const fn new(anchor: usize, focus: usize) -> Self {
        Self { anchor, focus }
    }

    /// Create a collapsed selection (a caret) at `offset`.
    pub const fn collapsed(offset: usize) -> Self {
        Self {
            anchor: offset,
            focus: offset,
        }
    }

    /// The fixed end of the selection.
    pub const fn anchor(&self) -> usize {
        self.anchor
    }

    /// The moving end of the selection (the caret).
    pub const fn focus(&self) -> usize {
        self.focus
    }

    /// Whether the selection is a bare caret.
    pub const fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    /// The lower offset of the range.
    pub const fn start(&self) -> usize {
        if self.anchor < self.focus {
            self.anchor
        } else {
            self.focus
        }
    }

    /// The upper offset of the range.
    pub const fn end(&self) -> usize {
        if self.anchor > self.focus {
            self.anchor
        } else {
            self.focus
        }
    }

    /// Length of the selected range in characters.
    pub const fn len(&self) -> usize {
        self.end() - self.start()
    }

    /// Whether the range is empty (same as [`Self::is_collapsed`]).
    pub const fn is_empty(&self) -> bool {
        self.is_collapsed()
    }

    /// Clamp both ends to `max` (the document length in characters).
    pub fn clamp(self, max: usize) -> Self {
        Self {
            anchor: self.anchor.min(max),
            focus: self.focus.min(max),
        }
    }
}

impl Default for Selection {
    fn default() -> Self {
        Self::collapsed(0)
    }
}
