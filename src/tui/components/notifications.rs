//! # Notifications Component
//!
//! Toasts stacked in the top-right corner of the given area, newest at the
//! bottom. Each one is drawn over a `Clear` so it hides whatever is beneath.
//! Expiry is the core's job (`App::expire_notifications`); this only draws.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Clear, Paragraph};

use crate::core::state::{Notification, Severity};
use crate::tui::component::Component;

/// Widest a toast gets, borders included.
const MAX_WIDTH: u16 = 50;

pub struct Notifications<'a> {
    pub notifications: &'a [Notification],
}

impl<'a> Notifications<'a> {
    pub fn new(notifications: &'a [Notification]) -> Self {
        Self { notifications }
    }
}

impl<'a> Component for Notifications<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let width = MAX_WIDTH.min(area.width);
        let inner_width = width.saturating_sub(2) as usize;
        if inner_width == 0 {
            return;
        }

        let mut y = area.y;
        for notification in self.notifications {
            let lines: Vec<String> = textwrap::wrap(&notification.message, inner_width)
                .into_iter()
                .map(|line| line.into_owned())
                .collect();
            let height = lines.len() as u16 + 2;
            let bottom = area.y + area.height;
            if y + height > bottom {
                break;
            }

            let color = match notification.severity {
                Severity::Error => Color::Red,
                Severity::Information => Color::Blue,
            };
            let block = Block::bordered()
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(color))
                .title(format!(" {} ", notification.title))
                .title_style(Style::default().fg(color).add_modifier(Modifier::BOLD));

            let toast = Rect::new(area.x + area.width - width, y, width, height);
            frame.render_widget(Clear, toast);
            frame.render_widget(Paragraph::new(lines.join("\n")).block(block), toast);
            y += height;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use std::time::Instant;

    fn toast(title: &str, message: &str, severity: Severity) -> Notification {
        Notification {
            title: title.to_string(),
            message: message.to_string(),
            severity,
            created: Instant::now(),
        }
    }

    fn render(notifications: &[Notification], w: u16, h: u16) -> Vec<String> {
        let backend = TestBackend::new(w, h);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| Notifications::new(notifications).render(f, f.area()))
            .unwrap();
        let buffer = terminal.backend().buffer();
        (0..h)
            .map(|y| (0..w).map(|x| buffer[(x, y)].symbol()).collect())
            .collect()
    }

    #[test]
    fn test_toast_shows_title_and_message() {
        let rows = render(
            &[toast("TerMan is angry", "Error: Command 'rm' requires an argument", Severity::Error)],
            80,
            10,
        );
        let all = rows.join("\n");
        assert!(all.contains("TerMan is angry"));
        assert!(all.contains("Error: Command 'rm' requires an argument"));
        // right-aligned: the left 30 columns stay blank
        assert!(rows.iter().all(|row| row[..30].trim().is_empty()));
    }

    #[test]
    fn test_help_wraps_one_command_per_line() {
        let help = crate::core::command::help_text();
        let rows = render(&[toast("All Commands:", &help, Severity::Information)], 60, 20);
        let all = rows.join("\n");
        assert!(all.contains("All Commands:"));
        assert!(all.contains("- cp <src> <dst>"));
        assert!(all.contains("- q/Q/quit/exit"));
    }

    #[test]
    fn test_toasts_stack_and_stop_at_bottom() {
        let many: Vec<Notification> = (0..5)
            .map(|n| toast(&format!("T{n}"), "msg", Severity::Error))
            .collect();
        let all = render(&many, 60, 7).join("\n");
        assert!(all.contains("T0"));
        assert!(all.contains("T1"));
        assert!(!all.contains("T2"));
    }
}
