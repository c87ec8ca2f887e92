//! # TitleBar Component
//!
//! Top status bar: working directory, open file and language, and the
//! latest status message.
//!
//! Purely presentational. All fields are props set by the caller each frame:
//!
//! ```text
//! TerMan | ~/projects/demo | main.py [python] | Saved main.py
//! ```
//!
//! Segments that are empty are left out, so with nothing open the bar reads
//! `TerMan | <dir> | <status>`.

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

pub struct TitleBar {
    pub working_dir: String,
    /// Open file name, if any
    pub file_name: Option<String>,
    /// Language mode of the open file, if known
    pub language: Option<&'static str>,
    pub status_message: String,
}

impl TitleBar {
    pub fn new(
        working_dir: String,
        file_name: Option<String>,
        language: Option<&'static str>,
        status_message: String,
    ) -> Self {
        Self {
            working_dir,
            file_name,
            language,
            status_message,
        }
    }

    fn segments(&self) -> Vec<String> {
        let mut parts = vec![String::from("TerMan"), self.working_dir.clone()];
        if let Some(name) = &self.file_name {
            match self.language {
                Some(lang) => parts.push(format!("{name} [{lang}]")),
                None => parts.push(name.clone()),
            }
        }
        if !self.status_message.is_empty() {
            parts.push(self.status_message.clone());
        }
        parts
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let separator = Span::styled(" | ", Style::default().fg(Color::DarkGray));
        let mut spans = Vec::new();
        for (i, part) in self.segments().into_iter().enumerate() {
            if i > 0 {
                spans.push(separator.clone());
            }
            let span = if i == 0 {
                Span::styled(part, Style::default().add_modifier(Modifier::BOLD))
            } else {
                Span::raw(part)
            };
            spans.push(span);
        }
        frame.render_widget(Line::from(spans), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn render(title_bar: &mut TitleBar) -> String {
        let backend = TestBackend::new(80, 1);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                title_bar.render(f, f.area());
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_title_bar_with_open_file() {
        let mut title_bar = TitleBar::new(
            "/home/me/demo".to_string(),
            Some("main.py".to_string()),
            Some("python"),
            "Saved main.py".to_string(),
        );
        let text = render(&mut title_bar);
        assert!(text.starts_with("TerMan | /home/me/demo | main.py [python] | Saved main.py"));
    }

    #[test]
    fn test_title_bar_without_language() {
        let mut title_bar = TitleBar::new(
            "/tmp".to_string(),
            Some("notes.txt".to_string()),
            None,
            String::new(),
        );
        let text = render(&mut title_bar);
        assert!(text.contains("notes.txt"));
        assert!(!text.contains('['));
        assert_eq!(text.matches('|').count(), 2);
    }

    #[test]
    fn test_title_bar_nothing_open() {
        let mut title_bar =
            TitleBar::new("/tmp".to_string(), None, None, "Welcome".to_string());
        let text = render(&mut title_bar);
        assert!(text.starts_with("TerMan | /tmp | Welcome"));
    }
}
