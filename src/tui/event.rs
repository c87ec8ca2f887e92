use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::{debug, warn};

use crate::core::document::Motion;

/// TUI-specific input events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TuiEvent {
    // Global keys (handled regardless of focus)
    Quit,        // Ctrl+Q
    ClearOrQuit, // Ctrl+C: clears a non-empty command line, otherwise quits
    ToggleHidden,
    FocusCommand,
    FocusTree,
    CycleFocus,
    Save,
    PasteClipboard, // Ctrl+V reads the system clipboard
    Resize,

    // Routed to the focused pane
    SelectAll,
    InputChar(char),
    Paste(String), // Bracketed paste - preserves newlines
    Submit,
    Backspace,
    Delete,
    Tab,
    Move { motion: Motion, extend: bool },
    PageUp { extend: bool },
    PageDown { extend: bool },
}

/// Poll for an event without blocking (returns immediately)
pub fn poll_event_immediate() -> Option<TuiEvent> {
    poll_event_timeout(std::time::Duration::ZERO)
}

/// Poll for an event, blocking up to `timeout`
pub fn poll_event_timeout(timeout: std::time::Duration) -> Option<TuiEvent> {
    match event::poll(timeout) {
        Ok(true) => match event::read() {
            Ok(event) => map_event(event),
            Err(e) => {
                warn!("Failed to read terminal event: {}", e);
                None
            }
        },
        Ok(false) => None,
        Err(e) => {
            warn!("Failed to poll terminal events: {}", e);
            None
        }
    }
}

pub fn map_event(event: Event) -> Option<TuiEvent> {
    match event {
        Event::Key(key_event) => map_key(key_event),
        Event::Paste(data) => Some(TuiEvent::Paste(data)),
        Event::Resize(..) => Some(TuiEvent::Resize),
        _ => None,
    }
}

fn map_key(key_event: KeyEvent) -> Option<TuiEvent> {
    // Release events arrive once keyboard enhancement is on
    if key_event.kind == KeyEventKind::Release {
        return None;
    }
    debug!(
        "Key event: {:?} with modifiers {:?}",
        key_event.code, key_event.modifiers
    );

    let ctrl = key_event.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key_event.modifiers.contains(KeyModifiers::ALT);
    let extend = key_event.modifiers.contains(KeyModifiers::SHIFT);
    let moving = |motion| Some(TuiEvent::Move { motion, extend });

    match key_event.code {
        KeyCode::Char(c) if ctrl => match c.to_ascii_lowercase() {
            'q' => Some(TuiEvent::Quit),
            'c' => Some(TuiEvent::ClearOrQuit),
            'h' => Some(TuiEvent::ToggleHidden),
            'e' => Some(TuiEvent::FocusCommand),
            'a' => Some(TuiEvent::SelectAll),
            'v' => Some(TuiEvent::PasteClipboard),
            's' => Some(TuiEvent::Save),
            _ => None,
        },
        // Legacy terminals send Ctrl+H as Backspace
        KeyCode::Char('h' | 'H') if alt => Some(TuiEvent::ToggleHidden),
        KeyCode::Char(c) if !alt => Some(TuiEvent::InputChar(c)),
        KeyCode::Esc => Some(TuiEvent::FocusTree),
        KeyCode::BackTab => Some(TuiEvent::CycleFocus),
        KeyCode::Tab => Some(TuiEvent::Tab),
        KeyCode::Enter => Some(TuiEvent::Submit),
        KeyCode::Backspace => Some(TuiEvent::Backspace),
        KeyCode::Delete => Some(TuiEvent::Delete),
        KeyCode::Left => moving(Motion::Left),
        KeyCode::Right => moving(Motion::Right),
        KeyCode::Up => moving(Motion::Up),
        KeyCode::Down => moving(Motion::Down),
        KeyCode::Home if ctrl => moving(Motion::DocStart),
        KeyCode::End if ctrl => moving(Motion::DocEnd),
        KeyCode::Home => moving(Motion::LineStart),
        KeyCode::End => moving(Motion::LineEnd),
        KeyCode::PageUp => Some(TuiEvent::PageUp { extend }),
        KeyCode::PageDown => Some(TuiEvent::PageDown { extend }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn test_control_shortcuts() {
        let ctrl = KeyModifiers::CONTROL;
        assert_eq!(map_event(key(KeyCode::Char('q'), ctrl)), Some(TuiEvent::Quit));
        assert_eq!(map_event(key(KeyCode::Char('c'), ctrl)), Some(TuiEvent::ClearOrQuit));
        assert_eq!(map_event(key(KeyCode::Char('h'), ctrl)), Some(TuiEvent::ToggleHidden));
        assert_eq!(map_event(key(KeyCode::Char('e'), ctrl)), Some(TuiEvent::FocusCommand));
        assert_eq!(map_event(key(KeyCode::Char('s'), ctrl)), Some(TuiEvent::Save));
        assert_eq!(map_event(key(KeyCode::Char('x'), ctrl)), None);
    }

    #[test]
    fn test_plain_and_shifted_chars_are_input() {
        assert_eq!(
            map_event(key(KeyCode::Char('q'), KeyModifiers::NONE)),
            Some(TuiEvent::InputChar('q'))
        );
        assert_eq!(
            map_event(key(KeyCode::Char('Q'), KeyModifiers::SHIFT)),
            Some(TuiEvent::InputChar('Q'))
        );
        assert_eq!(map_event(key(KeyCode::Char('x'), KeyModifiers::ALT)), None);
    }

    #[test]
    fn test_alt_h_toggles_hidden_where_ctrl_h_is_backspace() {
        // What a terminal without keyboard enhancement reports for Ctrl+H
        assert_eq!(
            map_event(key(KeyCode::Backspace, KeyModifiers::NONE)),
            Some(TuiEvent::Backspace)
        );
        assert_eq!(
            map_event(key(KeyCode::Char('h'), KeyModifiers::ALT)),
            Some(TuiEvent::ToggleHidden)
        );
        assert_eq!(
            map_event(key(KeyCode::Char('H'), KeyModifiers::ALT | KeyModifiers::SHIFT)),
            Some(TuiEvent::ToggleHidden)
        );
    }

    #[test]
    fn test_shift_arrows_extend_selection() {
        assert_eq!(
            map_event(key(KeyCode::Right, KeyModifiers::SHIFT)),
            Some(TuiEvent::Move { motion: Motion::Right, extend: true })
        );
        assert_eq!(
            map_event(key(KeyCode::Home, KeyModifiers::NONE)),
            Some(TuiEvent::Move { motion: Motion::LineStart, extend: false })
        );
        assert_eq!(
            map_event(key(KeyCode::End, KeyModifiers::CONTROL | KeyModifiers::SHIFT)),
            Some(TuiEvent::Move { motion: Motion::DocEnd, extend: true })
        );
    }

    #[test]
    fn test_release_events_are_ignored() {
        let release = KeyEvent {
            code: KeyCode::Char('a'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(map_event(Event::Key(release)), None);
    }

    #[test]
    fn test_paste_and_resize() {
        assert_eq!(
            map_event(Event::Paste("a\nb".into())),
            Some(TuiEvent::Paste("a\nb".into()))
        );
        assert_eq!(map_event(Event::Resize(80, 24)), Some(TuiEvent::Resize));
        assert_eq!(
            map_event(key(KeyCode::BackTab, KeyModifiers::SHIFT)),
            Some(TuiEvent::CycleFocus)
        );
    }
}
