//! # Document
//!
//! The single open file: its path, text, cursor and selection, plus the
//! snapshot taken at the last save.
//!
//! ```text
//! Document
//! ├── path: Option<PathBuf>     // None = nothing open, save is a no-op
//! ├── rope: Rope                // file bytes as loaded, line breaks included
//! ├── cursor: Position          // row + column in grapheme clusters
//! ├── anchor: Option<Position>  // other end of the selection
//! ├── last_saved: String        // set by save() only
//! ├── dirty: bool               // edited since load or save
//! ├── changes: VecDeque         // (revision, first row touched), for renderers
//! └── language: Option<Language>
//! ```
//!
//! Columns count grapheme clusters of the line without its break, so one
//! keypress always moves over or deletes one visible character. Conversions
//! to rope char offsets happen in `char_index` and `position_at` only.
//!
//! Line breaks are stored as they were read. A file with mixed `\n` and
//! `\r\n` saves back byte-identical; new breaks copy the one of the line
//! they are typed on.

use log::info;
use ropey::{Rope, RopeSlice};
use std::borrow::Cow;
use std::collections::VecDeque;
use std::fs;
use std::io::{self, Write};
use std::ops::Range;
use std::path::{Path, PathBuf};
use unicode_segmentation::UnicodeSegmentation;

/// Openers that get their closer inserted automatically.
pub const AUTO_PAIRS: [(char, char); 5] = [
    ('(', ')'),
    ('[', ']'),
    ('{', '}'),
    ('"', '"'),
    ('\'', '\''),
];

/// Edits remembered for `first_changed_row_since`.
const CHANGE_LOG_LEN: usize = 64;

pub fn closing_pair(open: char) -> Option<char> {
    AUTO_PAIRS
        .iter()
        .find(|(o, _)| *o == open)
        .map(|(_, close)| *close)
}

/// Language mode, derived from the file extension only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Python,
    Markdown,
}

impl Language {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "py" => Some(Language::Python),
            "md" => Some(Language::Markdown),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::Markdown => "markdown",
        }
    }

    /// Extension used to look the grammar up in the syntax set.
    pub fn extension(self) -> &'static str {
        match self {
            Language::Python => "py",
            Language::Markdown => "md",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Left,
    Right,
    Up,
    Down,
    LineStart,
    LineEnd,
    DocStart,
    DocEnd,
    PageUp(usize),
    PageDown(usize),
}

pub struct Document {
    path: Option<PathBuf>,
    rope: Rope,
    cursor: Position,
    anchor: Option<Position>,
    last_saved: String,
    dirty: bool,
    language: Option<Language>,
    /// Break for lines that have no neighbour to copy one from.
    line_ending: &'static str,
    tab_width: usize,
    revision: u64,
    changes: VecDeque<(u64, usize)>,
}

impl Document {
    pub fn new(tab_width: usize) -> Self {
        Self {
            path: None,
            rope: Rope::new(),
            cursor: Position::default(),
            anchor: None,
            last_saved: String::new(),
            dirty: false,
            language: None,
            line_ending: "\n",
            tab_width: tab_width.max(1),
            revision: 0,
            changes: VecDeque::new(),
        }
    }

    // ── Accessors ───────────────────────────────────────────────────────

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn language(&self) -> Option<Language> {
        self.language
    }

    /// Never zero: an empty document has one empty line.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Text of `row` without its line break.
    pub fn line(&self, row: usize) -> Cow<'_, str> {
        let line = self.rope.line(row);
        line.slice(..content_chars(line)).into()
    }

    pub fn lines(&self) -> impl Iterator<Item = Cow<'_, str>> + '_ {
        (0..self.line_count()).map(|row| self.line(row))
    }

    pub fn cursor(&self) -> Position {
        self.cursor
    }

    pub fn tab_width(&self) -> usize {
        self.tab_width
    }

    pub fn last_saved(&self) -> &str {
        &self.last_saved
    }

    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Text differs from the last-saved snapshot.
    pub fn is_modified(&self) -> bool {
        self.rope != self.last_saved.as_str()
    }

    /// Edited since the last load or save.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Bumped by every load and every edit.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Lowest row touched by edits made after `revision`, or `None` when
    /// nothing changed since. Falls back to row 0 once the log has
    /// forgotten that far back.
    pub fn first_changed_row_since(&self, revision: u64) -> Option<usize> {
        if revision >= self.revision {
            return None;
        }
        match self.changes.front() {
            Some(&(oldest, _)) if oldest <= revision + 1 => self
                .changes
                .iter()
                .filter(|(rev, _)| *rev > revision)
                .map(|(_, row)| *row)
                .min(),
            _ => Some(0),
        }
    }

    /// Ordered `(start, end)` of the selection, `None` when empty.
    pub fn selection(&self) -> Option<(Position, Position)> {
        let anchor = self.anchor?;
        match anchor.cmp(&self.cursor) {
            std::cmp::Ordering::Less => Some((anchor, self.cursor)),
            std::cmp::Ordering::Greater => Some((self.cursor, anchor)),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Selected text with its line breaks as stored.
    pub fn selected_text(&self) -> Option<String> {
        let (start, end) = self.selection()?;
        Some(
            self.rope
                .slice(self.char_index(start)..self.char_index(end))
                .to_string(),
        )
    }

    // ── Persistence ─────────────────────────────────────────────────────

    /// Replace the buffer with the contents of `path`.
    ///
    /// Unsaved edits are dropped without asking. On error nothing changes.
    pub fn load(&mut self, path: &Path) -> io::Result<()> {
        let content = fs::read_to_string(path)?;
        self.line_ending = match content.find('\n') {
            Some(i) if content[..i].ends_with('\r') => "\r\n",
            _ => "\n",
        };
        self.rope = Rope::from_str(&content);
        self.cursor = Position::default();
        self.anchor = None;
        self.language = Language::from_path(path);
        self.path = Some(path.to_path_buf());
        self.changes.clear();
        self.record_change(0);
        self.dirty = false;
        info!(
            "Loaded {} ({} lines, language: {})",
            path.display(),
            self.line_count(),
            self.language.map_or("none", Language::name)
        );
        Ok(())
    }

    /// Truncate the file and write the whole buffer back.
    ///
    /// Returns `Ok(false)` when no file is open. Not atomic.
    pub fn save(&mut self) -> io::Result<bool> {
        let Some(path) = self.path.as_ref() else {
            return Ok(false);
        };
        let text = self.text();
        let mut file = fs::File::create(path)?;
        file.write_all(text.as_bytes())?;
        info!("Saved {} ({} bytes)", path.display(), text.len());
        self.last_saved = text;
        self.dirty = false;
        Ok(true)
    }

    // ── Editing ─────────────────────────────────────────────────────────

    /// Insert a typed character. Openers in `AUTO_PAIRS` bring their closer
    /// along and leave the cursor between the two.
    pub fn insert_char(&mut self, c: char) {
        match closing_pair(c) {
            Some(close) => {
                self.insert_str(&format!("{c}{close}"));
                let before_close = self.char_index(self.cursor) - 1;
                self.cursor = self.position_at(before_close);
            }
            None => {
                let mut buf = [0u8; 4];
                self.insert_str(c.encode_utf8(&mut buf));
            }
        }
    }

    /// Replace the selection (or insert at the cursor) with `text`.
    ///
    /// Breaks in `text` are rewritten to the break of the cursor's line.
    pub fn insert_str(&mut self, text: &str) {
        self.delete_selection();
        let row = self.cursor.row;
        let newline = self.newline_for(row);
        let mut text = text.replace("\r\n", "\n");
        if newline != "\n" {
            text = text.replace('\n', newline);
        }

        let start = self.char_index(self.cursor);
        self.rope.insert(start, &text);
        self.cursor = self.position_at(start + text.chars().count());
        self.record_change(row);
    }

    pub fn insert_newline(&mut self) {
        self.insert_str("\n");
    }

    /// Indent with spaces up to the next tab stop.
    pub fn insert_tab(&mut self) {
        self.delete_selection();
        let width = self.tab_width - (self.cursor.col % self.tab_width);
        self.insert_str(&" ".repeat(width));
    }

    pub fn backspace(&mut self) {
        if self.delete_selection() {
            return;
        }
        let Position { row, col } = self.cursor;
        let end = self.char_index(self.cursor);
        let start = if col > 0 {
            self.char_index(Position::new(row, col - 1))
        } else if row > 0 {
            self.rope.line_to_char(row - 1) + content_chars(self.rope.line(row - 1))
        } else {
            return;
        };
        self.remove_chars(start..end);
    }

    pub fn delete(&mut self) {
        if self.delete_selection() {
            return;
        }
        let Position { row, col } = self.cursor;
        let start = self.char_index(self.cursor);
        let end = if col < self.line_len(row) {
            self.char_index(Position::new(row, col + 1))
        } else if row + 1 < self.line_count() {
            self.rope.line_to_char(row + 1)
        } else {
            return;
        };
        self.remove_chars(start..end);
    }

    /// Remove the selected text. Returns `false` when nothing was selected.
    pub fn delete_selection(&mut self) -> bool {
        let Some((start, end)) = self.selection() else {
            self.anchor = None;
            return false;
        };
        self.anchor = None;
        let range = self.char_index(start)..self.char_index(end);
        self.remove_chars(range);
        true
    }

    fn remove_chars(&mut self, range: Range<usize>) {
        let start = range.start;
        self.rope.remove(range);
        self.cursor = self.position_at(start);
        self.record_change(self.cursor.row);
    }

    fn record_change(&mut self, row: usize) {
        self.revision += 1;
        self.dirty = true;
        if self.changes.len() == CHANGE_LOG_LEN {
            self.changes.pop_front();
        }
        self.changes.push_back((self.revision, row));
    }

    // ── Cursor & selection ──────────────────────────────────────────────

    pub fn select_all(&mut self) {
        let last = self.line_count() - 1;
        self.anchor = Some(Position::default());
        self.cursor = Position::new(last, self.line_len(last));
    }

    /// Move the cursor. With `extend`, the selection grows from where the
    /// cursor was; without it, any selection is dropped.
    pub fn move_cursor(&mut self, motion: Motion, extend: bool) {
        if extend {
            self.anchor.get_or_insert(self.cursor);
        } else {
            self.anchor = None;
        }

        let Position { row, col } = self.cursor;
        let last_row = self.line_count() - 1;
        self.cursor = match motion {
            Motion::Left if col > 0 => Position::new(row, col - 1),
            Motion::Left if row > 0 => Position::new(row - 1, self.line_len(row - 1)),
            Motion::Right if col < self.line_len(row) => Position::new(row, col + 1),
            Motion::Right if row < last_row => Position::new(row + 1, 0),
            Motion::Left | Motion::Right => self.cursor,
            Motion::Up => self.clamped(row.saturating_sub(1), col),
            Motion::Down => self.clamped((row + 1).min(last_row), col),
            Motion::PageUp(rows) => self.clamped(row.saturating_sub(rows), col),
            Motion::PageDown(rows) => self.clamped((row + rows).min(last_row), col),
            Motion::LineStart => Position::new(row, 0),
            Motion::LineEnd => Position::new(row, self.line_len(row)),
            Motion::DocStart => Position::default(),
            Motion::DocEnd => Position::new(last_row, self.line_len(last_row)),
        };
    }

    fn clamped(&self, row: usize, col: usize) -> Position {
        Position::new(row, col.min(self.line_len(row)))
    }

    /// Grapheme clusters in `row`, break excluded.
    fn line_len(&self, row: usize) -> usize {
        self.line(row).graphemes(true).count()
    }

    // ── Position ↔ rope offset ─────────────────────────────────────────

    fn char_index(&self, pos: Position) -> usize {
        let in_line: usize = self
            .line(pos.row)
            .graphemes(true)
            .take(pos.col)
            .map(|g| g.chars().count())
            .sum();
        self.rope.line_to_char(pos.row) + in_line
    }

    fn position_at(&self, char_idx: usize) -> Position {
        let row = self.rope.char_to_line(char_idx);
        let prefix: Cow<str> = self.rope.slice(self.rope.line_to_char(row)..char_idx).into();
        Position::new(row, prefix.graphemes(true).count())
    }

    /// `"\r\n"` or `"\n"` for `row`, `None` on the last line.
    fn break_of(&self, row: usize) -> Option<&'static str> {
        let line = self.rope.line(row);
        match line.len_chars() - content_chars(line) {
            0 => None,
            2 => Some("\r\n"),
            _ => Some("\n"),
        }
    }

    /// Break to use for text inserted on `row`.
    fn newline_for(&self, row: usize) -> &'static str {
        self.break_of(row)
            .or_else(|| row.checked_sub(1).and_then(|prev| self.break_of(prev)))
            .unwrap_or(self.line_ending)
    }
}

/// Chars in `line` before its line break.
fn content_chars(line: RopeSlice) -> usize {
    let len = line.len_chars();
    match len.checked_sub(1).map(|last| line.char(last)) {
        Some('\n') if len >= 2 && line.char(len - 2) == '\r' => len - 2,
        Some(c) if is_line_break(c) => len - 1,
        _ => len,
    }
}

/// Every break ropey splits lines on.
fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\u{000B}' | '\u{000C}' | '\u{0085}' | '\u{2028}' | '\u{2029}'
    )
}
