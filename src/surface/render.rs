use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Clear, Paragraph};
use unicode_width::UnicodeWidthChar;

use super::Model;
use crate::config::Overflow;
use crate::state::{EditorState, Selection};

/// Render the pane: styled block, visible lines, selection and caret.
pub(super) fn render(model: &mut Model, frame: &mut Frame, area: Rect) {
    let pane = model.styles.pane_rect(area);
    if pane.width == 0 || pane.height == 0 {
        return;
    }
    let block = model.styles.block();
    let inner = block.inner(pane);
    frame.render_widget(Clear, pane);
    frame.render_widget(block, pane);
    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let (caret_line, caret_col) = model
        .state
        .content()
        .position_of(model.state.selection().focus());
    let visible = inner.height as usize;
    let line_count = model.state.content().line_count();

    match model.styles.overflow {
        Overflow::Scroll => {
            // Keep the caret line in view.
            if caret_line < model.scroll_top {
                model.scroll_top = caret_line;
            } else if caret_line >= model.scroll_top + visible {
                model.scroll_top = caret_line + 1 - visible;
            }
            model.scroll_top = model.scroll_top.min(line_count.saturating_sub(visible));
        }
        Overflow::Clip => model.scroll_top = 0,
    }

    let last = (model.scroll_top + visible).min(line_count);
    let lines: Vec<Line<'static>> = (model.scroll_top..last)
        .map(|idx| render_line(&model.state, idx, caret_line, caret_col, inner.width))
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}

/// Visual role of a cell, used to group consecutive characters into spans.
#[derive(PartialEq, Eq, Clone, Copy)]
enum CellStyle {
    Normal,
    Selected,
    Caret,
}

impl CellStyle {
    fn style(self) -> Style {
        match self {
            Self::Normal => Style::default(),
            Self::Selected => Style::default().add_modifier(Modifier::REVERSED),
            Self::Caret => Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD),
        }
    }
}

fn render_line(
    state: &EditorState,
    line_idx: usize,
    caret_line: usize,
    caret_col: usize,
    width: u16,
) -> Line<'static> {
    let text = state.content().line_at(line_idx).unwrap_or_default();
    let chars: Vec<char> = text.chars().collect();
    let line_start = state.content().line_start(line_idx);
    let sel = state.selection();
    let show_caret = sel.is_collapsed() && line_idx == caret_line;

    let skip = if show_caret {
        horizontal_skip(&chars, caret_col, width)
    } else {
        0
    };

    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut run = String::new();
    let mut run_style = CellStyle::Normal;
    let mut flush = |run: &mut String, style: CellStyle, spans: &mut Vec<Span<'static>>| {
        if !run.is_empty() {
            spans.push(Span::styled(std::mem::take(run), style.style()));
        }
    };

    for (col, &ch) in chars.iter().enumerate().skip(skip) {
        let offset = line_start + col;
        let cell = if show_caret && col == caret_col {
            CellStyle::Caret
        } else if cell_selected(sel, offset) {
            CellStyle::Selected
        } else {
            CellStyle::Normal
        };
        if cell != run_style {
            flush(&mut run, run_style, &mut spans);
            run_style = cell;
        }
        run.push(ch);
    }
    flush(&mut run, run_style, &mut spans);

    // Caret past the last character renders as a highlighted cell.
    if show_caret && caret_col >= chars.len() {
        spans.push(Span::styled(" ", CellStyle::Caret.style()));
    }

    Line::from(spans)
}

fn cell_selected(sel: Selection, offset: usize) -> bool {
    !sel.is_collapsed() && offset >= sel.start() && offset < sel.end()
}

/// Leading characters to skip so the caret cell stays within `width`.
fn horizontal_skip(chars: &[char], caret_col: usize, width: u16) -> usize {
    let width = width as usize;
    let mut skip = 0;
    while skip < caret_col {
        let cells: usize = chars[skip..caret_col.min(chars.len())]
            .iter()
            .map(|&c| c.width().unwrap_or(0))
            .sum::<usize>()
            + 1;
        if cells <= width {
            break;
        }
        skip += 1;
    }
    skip
}
