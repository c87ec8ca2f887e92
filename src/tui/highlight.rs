//! Syntax highlighting for the editor pane.
//!
//! Thin wrapper around `syntect` that turns document lines into styled
//! ratatui `Line`s. The grammar comes from the document's [`Language`];
//! anything without one renders plain.
//!
//! syntect parses statefully: the colors of a row depend on every row above
//! it. The highlighter keeps parser checkpoints every `CHECKPOINT_EVERY`
//! rows, so a frame only parses from the nearest checkpoint above the
//! window. Checkpoints below the first row edited since the last frame are
//! dropped.
//!
//! ```text
//! row   0 ── checkpoint 0
//!      32 ── checkpoint 1
//!      64 ── checkpoint 2   ← edit at row 70 keeps 0..=2
//!      96 ── (dropped, re-parsed on demand)
//! ```

use std::ops::Range;
use std::sync::LazyLock;

use log::{debug, warn};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use syntect::highlighting::{
    HighlightIterator, HighlightState, Highlighter as ThemeHighlighter, Theme, ThemeSet,
};
use syntect::parsing::{ParseState, ScopeStack, SyntaxReference, SyntaxSet};

use crate::core::config::DEFAULT_THEME;
use crate::core::document::{Document, Language};

static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEME_SET: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

const CHECKPOINT_EVERY: usize = 32;

/// Parser state at the start of rows `0, CHECKPOINT_EVERY, 2 * CHECKPOINT_EVERY, ..`
struct ParseCache {
    language: Language,
    /// Document revision the checkpoints were taken at.
    revision: u64,
    checkpoints: Vec<(ParseState, HighlightState)>,
}

pub struct Highlighter {
    theme_name: String,
    theme: Option<&'static Theme>,
    cache: Option<ParseCache>,
}

impl Highlighter {
    /// Look the theme up in syntect's bundled set, falling back to the default.
    pub fn new(theme_name: &str) -> Self {
        if let Some(theme) = THEME_SET.themes.get(theme_name) {
            return Self {
                theme_name: theme_name.to_string(),
                theme: Some(theme),
                cache: None,
            };
        }
        warn!(
            "Unknown theme '{}', falling back to '{}'",
            theme_name, DEFAULT_THEME
        );
        Self {
            theme_name: DEFAULT_THEME.to_string(),
            theme: THEME_SET.themes.get(DEFAULT_THEME),
            cache: None,
        }
    }

    pub fn theme_name(&self) -> &str {
        &self.theme_name
    }

    /// Styled lines for `rows` of `document`, with tabs expanded.
    pub fn highlight(&mut self, document: &Document, rows: Range<usize>) -> Vec<Line<'static>> {
        let tab_width = document.tab_width();
        let end = rows.end.min(document.line_count());
        let start = rows.start.min(end);

        let language = document.language();
        let syntax = language.and_then(|lang| SYNTAX_SET.find_syntax_by_extension(lang.extension()));
        let (Some(language), Some(syntax), Some(theme)) = (language, syntax, self.theme) else {
            return plain(document, start..end, tab_width);
        };

        let theme_hl = ThemeHighlighter::new(theme);
        let checkpoints = self.checkpoints_for(document, language, syntax, &theme_hl);
        let first = (start / CHECKPOINT_EVERY).min(checkpoints.len() - 1);
        let (mut parse_state, mut style_state) = checkpoints[first].clone();

        let mut out = Vec::with_capacity(end - start);
        let mut failed = false;
        for row in first * CHECKPOINT_EVERY..end {
            if row % CHECKPOINT_EVERY == 0 && row / CHECKPOINT_EVERY == checkpoints.len() {
                checkpoints.push((parse_state.clone(), style_state.clone()));
            }

            // The newline-aware syntax set expects each line to end with '\n'
            let line = format!("{}\n", document.line(row));
            let ops = match parse_state.parse_line(&line, &SYNTAX_SET) {
                Ok(ops) => ops,
                Err(e) => {
                    warn!("Highlighting failed at row {}: {}", row, e);
                    failed = true;
                    break;
                }
            };
            let ranges = HighlightIterator::new(&mut style_state, &ops, &line, &theme_hl);
            if row < start {
                // Still has to run: it advances the style state
                ranges.for_each(drop);
                continue;
            }
            let spans: Vec<Span<'static>> = ranges
                .filter_map(|(hl_style, frag)| {
                    let content = expand_tabs(frag.trim_end_matches('\n'), tab_width);
                    if content.is_empty() {
                        return None;
                    }
                    let fg = Color::Rgb(
                        hl_style.foreground.r,
                        hl_style.foreground.g,
                        hl_style.foreground.b,
                    );
                    Some(Span::styled(content, Style::default().fg(fg)))
                })
                .collect();
            out.push(Line::from(spans));
        }

        if failed {
            self.cache = None;
            return plain(document, start..end, tab_width);
        }
        out
    }

    /// Checkpoints still valid for `document`, with at least the one for row 0.
    fn checkpoints_for(
        &mut self,
        document: &Document,
        language: Language,
        syntax: &SyntaxReference,
        theme_hl: &ThemeHighlighter,
    ) -> &mut Vec<(ParseState, HighlightState)> {
        let keep = match &self.cache {
            Some(cache) if cache.language == language => document
                .first_changed_row_since(cache.revision)
                .map_or(usize::MAX, |row| row / CHECKPOINT_EVERY + 1),
            _ => 0,
        };

        let mut cache = match self.cache.take() {
            Some(mut cache) if keep > 0 => {
                cache.checkpoints.truncate(keep);
                cache
            }
            _ => ParseCache {
                language,
                revision: 0,
                checkpoints: Vec::new(),
            },
        };
        if cache.checkpoints.is_empty() {
            debug!("Highlight cache reset for {}", language.name());
            cache.checkpoints.push((
                ParseState::new(syntax),
                HighlightState::new(theme_hl, ScopeStack::new()),
            ));
        }
        cache.revision = document.revision();
        &mut self.cache.insert(cache).checkpoints
    }
}

fn plain(document: &Document, rows: Range<usize>, tab_width: usize) -> Vec<Line<'static>> {
    rows.map(|row| Line::raw(expand_tabs(&document.line(row), tab_width)))
        .collect()
}

/// ratatui renders `\t` as zero-width, so tabs become spaces.
pub fn expand_tabs(text: &str, tab_width: usize) -> String {
    if text.contains('\t') {
        text.replace('\t', &" ".repeat(tab_width))
    } else {
        text.to_string()
    }
}
