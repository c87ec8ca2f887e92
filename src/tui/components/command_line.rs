//! # CommandLine Component
//!
//! The single-line input at the bottom of the screen.
//!
//! ## Responsibilities
//!
//! - Capture text input (typing, paste, backspace, delete, cursor movement)
//! - Emit the line on Enter and clear itself
//! - Scroll horizontally so the cursor stays visible
//!
//! The buffer is internal state; whether the line has focus is a prop.
//! Pasted newlines become spaces since a command is one line.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, BorderType, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::core::document::Motion;
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

pub const PLACEHOLDER: &str = "Enter command";

/// Left + right borders
const BORDER_WIDTH: u16 = 2;

/// High-level events emitted by the CommandLine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandEvent {
    /// Enter pressed; the line, already cleared from the buffer
    Submit(String),
    ContentChanged,
}

pub struct CommandLine {
    /// Text buffer (Internal State)
    pub buffer: String,
    /// Whether the line has focus (Prop)
    pub focused: bool,
    /// Cursor as a byte offset into `buffer`
    pos: usize,
    /// First visible display column
    scroll: usize,
}

impl Default for CommandLine {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandLine {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            focused: false,
            pos: 0,
            scroll: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.pos = 0;
        self.scroll = 0;
    }

    fn insert(&mut self, text: &str) {
        self.buffer.insert_str(self.pos, text);
        self.pos += text.len();
    }

    /// Keep the cursor column inside a window `width` cells wide.
    fn update_scroll(&mut self, width: usize) {
        let col = self.buffer[..self.pos].width();
        if col < self.scroll {
            self.scroll = col;
        } else if width > 0 && col >= self.scroll + width {
            self.scroll = col + 1 - width;
        }
    }

    fn visible_text(&self, width: usize) -> String {
        let mut col = 0;
        self.buffer
            .chars()
            .filter(|c| {
                let start = col;
                col += unicode_width::UnicodeWidthChar::width(*c).unwrap_or(0);
                start >= self.scroll && col <= self.scroll + width
            })
            .collect()
    }
}

impl Component for CommandLine {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let width = area.width.saturating_sub(BORDER_WIDTH) as usize;
        self.update_scroll(width);

        let border_style = if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(" Command ");

        let paragraph = if self.buffer.is_empty() {
            Paragraph::new(PLACEHOLDER).style(Style::default().fg(Color::DarkGray))
        } else {
            Paragraph::new(self.visible_text(width)).style(Style::default().fg(Color::Green))
        };
        frame.render_widget(paragraph.block(block), area);

        if self.focused {
            let col = self.buffer[..self.pos].width().saturating_sub(self.scroll);
            frame.set_cursor_position((area.x + 1 + col as u16, area.y + 1));
        }
    }
}

impl EventHandler for CommandLine {
    type Event = CommandEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => {
                let mut buf = [0u8; 4];
                self.insert(c.encode_utf8(&mut buf));
                Some(CommandEvent::ContentChanged)
            }
            TuiEvent::Paste(text) => {
                let flat = text.replace("\r\n", " ").replace(['\n', '\r'], " ");
                self.insert(&flat);
                Some(CommandEvent::ContentChanged)
            }
            TuiEvent::Backspace => {
                if self.pos == 0 {
                    return None;
                }
                let prev = prev_char_boundary(&self.buffer, self.pos);
                self.buffer.drain(prev..self.pos);
                self.pos = prev;
                Some(CommandEvent::ContentChanged)
            }
            TuiEvent::Delete => {
                if self.pos >= self.buffer.len() {
                    return None;
                }
                let next = next_char_boundary(&self.buffer, self.pos);
                self.buffer.drain(self.pos..next);
                Some(CommandEvent::ContentChanged)
            }
            TuiEvent::Move { motion, .. } => {
                let target = match motion {
                    Motion::Left => prev_char_boundary(&self.buffer, self.pos),
                    Motion::Right => next_char_boundary(&self.buffer, self.pos),
                    Motion::LineStart | Motion::DocStart => 0,
                    Motion::LineEnd | Motion::DocEnd => self.buffer.len(),
                    _ => return None,
                };
                (target != self.pos).then(|| {
                    self.pos = target;
                    CommandEvent::ContentChanged
                })
            }
            TuiEvent::Submit => {
                let line = std::mem::take(&mut self.buffer);
                self.clear();
                Some(CommandEvent::Submit(line))
            }
            _ => None,
        }
    }
}

fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .char_indices()
        .nth(1)
        .map(|(i, _)| pos + i)
        .unwrap_or(text.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn type_str(line: &mut CommandLine, text: &str) {
        for c in text.chars() {
            line.handle_event(&TuiEvent::InputChar(c));
        }
    }

    fn render(line: &mut CommandLine, width: u16) -> String {
        let backend = TestBackend::new(width, 3);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| line.render(f, f.area())).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_typing_and_backspace() {
        let mut line = CommandLine::new();
        type_str(&mut line, "touch é");
        assert_eq!(line.buffer, "touch é");

        assert_eq!(line.handle_event(&TuiEvent::Backspace), Some(CommandEvent::ContentChanged));
        assert_eq!(line.buffer, "touch ");
    }

    #[test]
    fn test_submit_emits_and_clears() {
        let mut line = CommandLine::new();
        type_str(&mut line, "mkdir docs");
        assert_eq!(
            line.handle_event(&TuiEvent::Submit),
            Some(CommandEvent::Submit("mkdir docs".into()))
        );
        assert!(line.is_empty());
        type_str(&mut line, "x");
        assert_eq!(line.buffer, "x");
    }

    #[test]
    fn test_blank_submit_still_emits() {
        let mut line = CommandLine::new();
        assert_eq!(
            line.handle_event(&TuiEvent::Submit),
            Some(CommandEvent::Submit(String::new()))
        );
    }

    #[test]
    fn test_cursor_movement_and_delete() {
        let mut line = CommandLine::new();
        type_str(&mut line, "rm b");
        line.handle_event(&TuiEvent::Move { motion: Motion::LineStart, extend: false });
        line.handle_event(&TuiEvent::Delete);
        assert_eq!(line.buffer, "m b");
        line.handle_event(&TuiEvent::InputChar('r'));
        line.handle_event(&TuiEvent::Move { motion: Motion::LineEnd, extend: false });
        line.handle_event(&TuiEvent::InputChar('!'));
        assert_eq!(line.buffer, "rm b!");
        assert_eq!(
            line.handle_event(&TuiEvent::Move { motion: Motion::Up, extend: false }),
            None
        );
    }

    #[test]
    fn test_paste_flattens_newlines() {
        let mut line = CommandLine::new();
        line.handle_event(&TuiEvent::Paste("cp a\nb".into()));
        assert_eq!(line.buffer, "cp a b");
    }

    #[test]
    fn test_render_placeholder_and_text() {
        let mut line = CommandLine::new();
        let text = render(&mut line, 40);
        assert!(text.contains(PLACEHOLDER));

        type_str(&mut line, "help");
        let text = render(&mut line, 40);
        assert!(text.contains("help"));
        assert!(!text.contains(PLACEHOLDER));
    }

    #[test]
    fn test_long_line_scrolls_to_cursor() {
        let mut line = CommandLine::new();
        type_str(&mut line, "touch abcdefghijklmnopqrstuvwxyz");
        line.focused = true;
        let text = render(&mut line, 12);
        assert!(text.contains("uvwxyz"));
        assert!(!text.contains("touch"));
    }
}
