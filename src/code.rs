//! Code-aware editing rules.
//!
//! These are the behaviors a code editor layers over plain text editing:
//! indentation-preserving line splits on Enter, block indent/dedent on Tab,
//! and backspace collapsing leading indentation to the previous tab stop.
//! All functions are pure: they take a state and return a new one.

use crate::state::{ChangeKind, EditorState, Selection};

/// Width of one indentation unit in spaces.
pub const INDENT_WIDTH: usize = 4;

/// One indentation unit.
pub const INDENT: &str = "    ";

/// Handle Enter: split the line at the selection and continue the current
/// line's leading indentation on the new line.
///
/// Indentation carried over is capped at the selection's column, so pressing
/// Enter at the very start of an indented line does not duplicate its indent.
pub fn handle_return(state: &EditorState) -> EditorState {
    let start = state.selection().start();
    let (line, col) = state.content().position_of(start);
    let indent_len = leading_indent(state, line).min(col);
    let mut inserted = String::with_capacity(1 + indent_len);
    inserted.push('\n');
    for _ in 0..indent_len {
        inserted.push(' ');
    }
    state.replace_selection(&inserted, ChangeKind::SplitLine)
}

/// Handle Backspace when the caret sits inside leading indentation: remove
/// spaces back to the previous tab stop.
///
/// Returns `None` when the rule does not apply (selection active, caret at
/// column zero, or non-space characters before the caret); the caller falls
/// through to the default backspace.
pub fn handle_backspace(state: &EditorState) -> Option<EditorState> {
    if !state.selection().is_collapsed() {
        return None;
    }
    let offset = state.selection().focus();
    let (line, col) = state.content().position_of(offset);
    if col == 0 || leading_indent(state, line) < col {
        return None;
    }
    let rem = col % INDENT_WIDTH;
    let remove = if rem == 0 { INDENT_WIDTH } else { rem };
    let content = state.content().replace(offset - remove..offset, "");
    Some(state.push(
        content,
        Selection::collapsed(offset - remove),
        ChangeKind::Dedent,
    ))
}

/// Handle Tab: indent every line touched by the selection by one unit.
/// With `dedent` (Shift-Tab), remove up to one unit of leading spaces
/// from each touched line instead.
pub fn handle_tab(state: &EditorState, dedent: bool) -> EditorState {
    if dedent {
        dedent_lines(state)
    } else {
        indent_lines(state)
    }
}

fn indent_lines(state: &EditorState) -> EditorState {
    let sel = state.selection();
    let first = state.content().line_of(sel.start());
    let last = state.content().line_of(sel.end());

    // Edit back-to-front so earlier line starts stay valid.
    let mut content = state.content().clone();
    for line in (first..=last).rev() {
        let start = state.content().line_start(line);
        content = content.replace(start..start, INDENT);
    }

    let shift = |offset: usize| {
        let line = state.content().line_of(offset);
        offset + INDENT_WIDTH * (line - first + 1)
    };
    let selection = Selection::new(shift(sel.anchor()), shift(sel.focus()));
    state.push(content, selection, ChangeKind::Indent)
}

fn dedent_lines(state: &EditorState) -> EditorState {
    let sel = state.selection();
    let first = state.content().line_of(sel.start());
    let last = state.content().line_of(sel.end());

    // Leading spaces removed per line, capped at one indent unit.
    let removed: Vec<usize> = (first..=last)
        .map(|line| leading_indent(state, line).min(INDENT_WIDTH))
        .collect();
    if removed.iter().all(|&n| n == 0) {
        return state.clone();
    }

    let mut content = state.content().clone();
    for (i, line) in (first..=last).enumerate().collect::<Vec<_>>().into_iter().rev() {
        let start = state.content().line_start(line);
        content = content.replace(start..start + removed[i], "");
    }

    let shift = |offset: usize| {
        let (line, col) = state.content().position_of(offset);
        let before: usize = removed[..line - first].iter().sum();
        offset - before - removed[line - first].min(col)
    };
    let selection = Selection::new(shift(sel.anchor()), shift(sel.focus()));
    state.push(content, selection, ChangeKind::Dedent)
}

/// Number of leading space characters on a line.
fn leading_indent(state: &EditorState, line: usize) -> usize {
    state
        .content()
        .line_at(line)
        .map_or(0, |s| s.chars().take_while(|&c| c == ' ').count())
}
