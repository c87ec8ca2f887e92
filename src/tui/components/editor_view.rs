//! # EditorView Component
//!
//! The text area: a line-number gutter plus the highlighted, scrolled window
//! of the open [`Document`].
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `EditorViewState` lives in `TuiState` and remembers the scroll position
//! - `EditorView` is created each frame with borrowed state and props
//! - `EditorInput` wraps `&mut Document` to turn key events into edits
//!
//! Columns on screen are display columns (tabs expanded, wide characters
//! counted twice); columns in the document are grapheme clusters. The
//! conversion happens here and nowhere else.

use std::ops::Range;

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Paragraph};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::core::document::{Document, Motion};
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;
use crate::tui::highlight::Highlighter;

/// Persistent scroll state for the editor pane.
#[derive(Debug, Default)]
pub struct EditorViewState {
    /// First visible document row.
    pub scroll_row: usize,
    /// First visible display column.
    pub scroll_col: usize,
    /// Text rows visible in the last render (used for PageUp/PageDown).
    pub last_height: usize,
}

impl EditorViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scroll just enough to keep the cursor cell inside a `width` x `height` window.
    pub fn scroll_to_cursor(&mut self, row: usize, col: usize, width: usize, height: usize) {
        if height > 0 {
            if row < self.scroll_row {
                self.scroll_row = row;
            } else if row >= self.scroll_row + height {
                self.scroll_row = row + 1 - height;
            }
        }
        if width > 0 {
            if col < self.scroll_col {
                self.scroll_col = col;
            } else if col >= self.scroll_col + width {
                self.scroll_col = col + 1 - width;
            }
        }
    }
}

/// Display width of `text` up to grapheme column `col`, with tabs at `tab_width`.
pub fn display_col(text: &str, col: usize, tab_width: usize) -> usize {
    text.graphemes(true)
        .take(col)
        .map(|g| grapheme_width(g, tab_width))
        .sum()
}

fn grapheme_width(g: &str, tab_width: usize) -> usize {
    if g == "\t" { tab_width } else { g.width() }
}

/// Editor pane, created fresh each frame.
pub struct EditorView<'a> {
    pub state: &'a mut EditorViewState,
    pub document: &'a Document,
    pub highlighter: &'a mut Highlighter,
    pub focused: bool,
}

impl<'a> EditorView<'a> {
    pub fn new(
        state: &'a mut EditorViewState,
        document: &'a Document,
        highlighter: &'a mut Highlighter,
        focused: bool,
    ) -> Self {
        Self {
            state,
            document,
            highlighter,
            focused,
        }
    }

    fn title(&self) -> String {
        let Some(path) = self.document.path() else {
            return String::from(" Editor ");
        };
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if self.document.is_dirty() {
            format!(" {name} ● ")
        } else {
            format!(" {name} ")
        }
    }

    /// Display-column range of `row` covered by the selection, if any.
    fn selected_cols(&self, row: usize) -> Option<Range<usize>> {
        let (start, end) = self.document.selection()?;
        if row < start.row || row > end.row {
            return None;
        }
        let line = self.document.line(row);
        let tab = self.document.tab_width();
        let from = if row == start.row {
            display_col(&line, start.col, tab)
        } else {
            0
        };
        let to = if row == end.row {
            display_col(&line, end.col, tab)
        } else {
            // whole line, plus one cell standing in for the newline
            display_col(&line, usize::MAX, tab) + 1
        };
        Some(from..to)
    }
}

impl<'a> Component for EditorView<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let border_style = if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(self.title());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.document.path().is_none() {
            let hint = Paragraph::new("Select a file in the tree and press Enter")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center);
            frame.render_widget(hint, inner);
            return;
        }

        let line_count = self.document.line_count();
        let digits = line_count.to_string().len() as u16;
        let [gutter_area, text_area] =
            Layout::horizontal([Constraint::Length(digits + 1), Constraint::Min(0)]).areas(inner);

        let height = text_area.height as usize;
        let width = text_area.width as usize;
        self.state.last_height = height;

        let tab = self.document.tab_width();
        let cursor = self.document.cursor();
        let cursor_col = display_col(&self.document.line(cursor.row), cursor.col, tab);
        self.state
            .scroll_to_cursor(cursor.row, cursor_col, width, height);

        let rows = self.state.scroll_row..(self.state.scroll_row + height).min(line_count);

        // Gutter
        let numbers: Vec<Line> = rows
            .clone()
            .map(|row| {
                let style = if row == cursor.row {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default().fg(Color::DarkGray)
                };
                Line::styled(format!("{:>width$}", row + 1, width = digits as usize), style)
            })
            .collect();
        frame.render_widget(Paragraph::new(numbers), gutter_area);

        // Text
        let styled = self.highlighter.highlight(self.document, rows.clone());
        let visible: Vec<Line> = styled
            .into_iter()
            .zip(rows.clone())
            .map(|(line, row)| clip_line(line, self.state.scroll_col, width, self.selected_cols(row)))
            .collect();
        frame.render_widget(Paragraph::new(visible), text_area);

        if self.focused {
            let x = text_area.x + cursor_col.saturating_sub(self.state.scroll_col) as u16;
            let y = text_area.y + cursor.row.saturating_sub(self.state.scroll_row) as u16;
            frame.set_cursor_position((x, y));
        }
    }
}

/// Cut `line` to the columns `skip..skip + width`, reversing `selected` columns.
fn clip_line(
    line: Line<'static>,
    skip: usize,
    width: usize,
    selected: Option<Range<usize>>,
) -> Line<'static> {
    let selected = selected.unwrap_or(0..0);
    let limit = skip + width;
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut current = String::new();
    let mut current_style = Style::default();
    let mut col = 0;
    let mut truncated = false;

    'outer: for span in &line.spans {
        for g in span.content.graphemes(true) {
            let start = col;
            col += g.width();
            if start < skip {
                continue;
            }
            if col > limit {
                truncated = true;
                break 'outer;
            }
            let mut style = span.style;
            if selected.contains(&start) {
                style = style.add_modifier(Modifier::REVERSED);
            }
            if style != current_style {
                push_run(&mut spans, &mut current, current_style);
                current_style = style;
            }
            current.push_str(g);
        }
    }
    push_run(&mut spans, &mut current, current_style);

    // Selection running past the end of the text (empty lines, the newline cell)
    if !truncated {
        let pad_from = col.max(skip).max(selected.start);
        let pad_to = selected.end.min(limit);
        if pad_from < pad_to {
            spans.push(Span::styled(
                " ".repeat(pad_to - pad_from),
                Style::default().add_modifier(Modifier::REVERSED),
            ));
        }
    }
    Line::from(spans)
}

fn push_run(spans: &mut Vec<Span<'static>>, text: &mut String, style: Style) {
    if !text.is_empty() {
        spans.push(Span::styled(std::mem::take(text), style));
    }
}

/// What an edit did, for the caller's benefit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorEvent {
    Edited,
    Moved,
}

/// Routes key events to the open document.
pub struct EditorInput<'a> {
    pub document: &'a mut Document,
    /// Rows moved by PageUp/PageDown.
    pub page: usize,
}

impl<'a> EditorInput<'a> {
    pub fn new(document: &'a mut Document, page: usize) -> Self {
        Self {
            document,
            page: page.max(1),
        }
    }
}

impl<'a> EventHandler for EditorInput<'a> {
    type Event = EditorEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => {
                self.document.insert_char(*c);
                Some(EditorEvent::Edited)
            }
            TuiEvent::Submit => {
                self.document.insert_newline();
                Some(EditorEvent::Edited)
            }
            TuiEvent::Tab => {
                self.document.insert_tab();
                Some(EditorEvent::Edited)
            }
            TuiEvent::Backspace => {
                self.document.backspace();
                Some(EditorEvent::Edited)
            }
            TuiEvent::Delete => {
                self.document.delete();
                Some(EditorEvent::Edited)
            }
            TuiEvent::Move { motion, extend } => {
                self.document.move_cursor(*motion, *extend);
                Some(EditorEvent::Moved)
            }
            TuiEvent::PageUp { extend } => {
                self.document.move_cursor(Motion::PageUp(self.page), *extend);
                Some(EditorEvent::Moved)
            }
            TuiEvent::PageDown { extend } => {
                self.document
                    .move_cursor(Motion::PageDown(self.page), *extend);
                Some(EditorEvent::Moved)
            }
            _ => None,
        }
    }
}
