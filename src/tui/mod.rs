//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui, crossterm, and the
//! system clipboard. It also owns the two side effects the core asks for
//! through `Effect::Rewatch`: moving the process cwd and re-binding the
//! directory watcher.
//!
//! ## Focus
//!
//! Three panes take input: the tree, the editor, and the command line.
//! Global shortcuts (Ctrl+Q, Ctrl+C, Ctrl+H, Ctrl+E, Ctrl+S, Ctrl+A, Ctrl+V,
//! Esc, Shift+Tab) are handled first; everything else goes to the focused
//! pane. Ctrl+A and Ctrl+V always act on the open document, whichever pane
//! has focus. Bracketed paste goes to the focused pane.
//!
//! Terminals without the kitty keyboard protocol send Ctrl+H as the
//! backspace byte, so there it arrives as Backspace. Alt+H toggles hidden
//! files on every terminal.
//!
//! ## Redraw Strategy
//!
//! The loop only draws when something changed: a key, a resize, a message
//! from the watcher, or a toast expiring. While toasts are visible the poll
//! timeout is short so they disappear on time; otherwise it idles at 500ms.

pub mod clipboard;
mod component;
mod components;
mod event;
pub mod highlight;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::path::Path;
use std::sync::mpsc::{self, Sender};
use std::time::{Duration, Instant};

use crossterm::cursor::{SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, EnableBracketedPaste, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;

use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::state::App;
use crate::core::watcher::{DirWatcher, IgnoreList, send_on_change};
use crate::tui::clipboard::{ClipboardSource, SystemClipboard};
use crate::tui::component::EventHandler;
use crate::tui::components::{
    CommandEvent, CommandLine, EditorInput, EditorViewState, FileTreeInput, FileTreeState,
    TreeEvent,
};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};
use crate::tui::highlight::Highlighter;

/// Which pane receives keys that aren't global shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Tree,
    Editor,
    Command,
}

impl Focus {
    /// Shift+Tab order: Tree → Editor → Command → Tree.
    pub fn next(self) -> Self {
        match self {
            Focus::Tree => Focus::Editor,
            Focus::Editor => Focus::Command,
            Focus::Command => Focus::Tree,
        }
    }
}

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub focus: Focus,
    // Persistent component states
    pub file_tree: FileTreeState,
    pub editor: EditorViewState,
    pub command_line: CommandLine,
    pub highlighter: Highlighter,
    pub clipboard: Box<dyn ClipboardSource>,
}

impl TuiState {
    pub fn new(theme: &str) -> Self {
        Self {
            focus: Focus::Tree,
            file_tree: FileTreeState::new(),
            editor: EditorViewState::new(),
            command_line: CommandLine::new(),
            highlighter: Highlighter::new(theme),
            clipboard: Box::new(SystemClipboard::default()),
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Kitty keyboard protocol lets Ctrl+H arrive as Ctrl+H instead of
        // Backspace; terminals without it ignore the request
        execute!(
            stdout(),
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (bracketed paste, steady block cursor, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), PopKeyboardEnhancementFlags, DisableBracketedPaste);
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let mut app = App::new(&config);
    let mut tui = TuiState::new(&config.theme);

    // Channel for actions from the watcher thread
    let (tx, rx) = mpsc::channel();
    let mut binding = WatchBinding::new(tx, IgnoreList::new([config.log_file.clone()]));
    binding.rebind(&mut app, &config.start_dir);

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new()
        .inspect_err(|e| warn!("Failed to enable terminal modes: {}", e));

    let mut needs_redraw = true; // Force first frame

    loop {
        if app.expire_notifications(Instant::now()) {
            needs_redraw = true;
        }

        if needs_redraw {
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui))?;
            needs_redraw = false;
        }

        let timeout = if app.notifications.is_empty() {
            Duration::from_millis(500)
        } else {
            Duration::from_millis(100)
        };
        let first_event = poll_event_timeout(timeout);

        // Process first event + drain ALL pending events before next draw
        let mut should_quit = false;
        if first_event.is_some() {
            needs_redraw = true;
        }
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            let effect = handle_event(&mut app, &mut tui, event);
            if apply_effect(effect, &mut app, &mut binding) {
                should_quit = true;
                break;
            }
        }

        // Filesystem events from the watcher thread
        while !should_quit && let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            let effect = update(&mut app, action);
            should_quit = apply_effect(effect, &mut app, &mut binding);
        }

        if should_quit {
            break;
        }
    }

    info!("TerMan shutting down");
    drop(binding);
    ratatui::restore();
    Ok(())
}

/// Run a core effect. Returns `true` when the app should quit.
fn apply_effect(effect: Effect, app: &mut App, binding: &mut WatchBinding) -> bool {
    match effect {
        Effect::None => false,
        Effect::Quit => true,
        Effect::Rewatch(dir) => {
            binding.rebind(app, &dir);
            false
        }
    }
}

/// The live watcher plus what it takes to start the next one after `cd`.
struct WatchBinding {
    watcher: Option<DirWatcher>,
    tx: Sender<Action>,
    ignored: IgnoreList,
}

impl WatchBinding {
    fn new(tx: Sender<Action>, ignored: IgnoreList) -> Self {
        Self {
            watcher: None,
            tx,
            ignored,
        }
    }

    /// Point the process cwd and the watcher at `dir`.
    fn rebind(&mut self, app: &mut App, dir: &Path) {
        if let Err(e) = std::env::set_current_dir(dir) {
            warn!("Failed to change process cwd to {}: {}", dir.display(), e);
        }

        // Stop the old watcher before starting the new one
        self.watcher = None;
        match DirWatcher::watch(dir, self.ignored.clone(), send_on_change(self.tx.clone())) {
            Ok(w) => self.watcher = Some(w),
            Err(e) => {
                warn!("Live refresh disabled for {}: {}", dir.display(), e);
                app.error(
                    "Live refresh unavailable",
                    format!("Error: Cannot watch '{}': {e}", dir.display()),
                );
            }
        }
        app.live_refresh = self.watcher.is_some();
    }
}

fn handle_event(app: &mut App, tui: &mut TuiState, event: TuiEvent) -> Effect {
    match event {
        // Resize just needs a redraw (already flagged)
        TuiEvent::Resize => Effect::None,
        TuiEvent::Quit => update(app, Action::Quit),
        TuiEvent::ClearOrQuit => {
            if tui.command_line.is_empty() {
                update(app, Action::Quit)
            } else {
                tui.command_line.clear();
                Effect::None
            }
        }
        TuiEvent::ToggleHidden => update(app, Action::ToggleHidden),
        TuiEvent::Save => update(app, Action::SaveFile),
        TuiEvent::FocusCommand => {
            tui.focus = Focus::Command;
            Effect::None
        }
        TuiEvent::FocusTree => {
            tui.focus = Focus::Tree;
            Effect::None
        }
        TuiEvent::CycleFocus => {
            tui.focus = tui.focus.next();
            Effect::None
        }
        // Ctrl+A and Ctrl+V target the open document from any pane
        TuiEvent::SelectAll => {
            if app.document.path().is_some() {
                app.document.select_all();
            }
            Effect::None
        }
        TuiEvent::PasteClipboard => {
            if app.document.path().is_none() {
                return Effect::None;
            }
            match tui.clipboard.get_text() {
                Some(text) => update(app, Action::Paste(text)),
                None => Effect::None,
            }
        }
        other => route_to_focus(app, tui, other),
    }
}

fn route_to_focus(app: &mut App, tui: &mut TuiState, event: TuiEvent) -> Effect {
    match tui.focus {
        Focus::Tree => {
            let tree_event = FileTreeInput::new(&mut app.tree).handle_event(&event);
            if tree_event != Some(TreeEvent::Activate) {
                return Effect::None;
            }
            let file = app
                .tree
                .selected_node()
                .filter(|node| !node.is_dir)
                .map(|node| node.path.clone());
            let effect = update(app, Action::OpenSelected);
            if file.is_some() && app.document.path() == file.as_deref() {
                tui.editor = EditorViewState::new();
                tui.focus = Focus::Editor;
            }
            effect
        }
        Focus::Editor => {
            // Nothing open: nowhere for keystrokes to go
            if app.document.path().is_none() {
                return Effect::None;
            }
            if let TuiEvent::Paste(text) = event {
                return update(app, Action::Paste(text));
            }
            EditorInput::new(&mut app.document, tui.editor.last_height).handle_event(&event);
            Effect::None
        }
        Focus::Command => match tui.command_line.handle_event(&event) {
            Some(CommandEvent::Submit(line)) => {
                tui.focus = Focus::Editor;
                update(app, Action::SubmitCommand(line))
            }
            _ => Effect::None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::DEFAULT_THEME;
    use crate::core::document::Motion;
    use crate::test_support::test_app;
    use std::fs;
    use tempfile::tempdir;

    fn press(app: &mut App, tui: &mut TuiState, events: Vec<TuiEvent>) -> Effect {
        let mut last = Effect::None;
        for event in events {
            last = handle_event(app, tui, event);
        }
        last
    }

    fn chars(text: &str) -> Vec<TuiEvent> {
        text.chars().map(TuiEvent::InputChar).collect()
    }

    #[test]
    fn test_focus_cycles() {
        assert_eq!(Focus::Tree.next(), Focus::Editor);
        assert_eq!(Focus::Editor.next(), Focus::Command);
        assert_eq!(Focus::Command.next(), Focus::Tree);
    }

    #[test]
    fn test_command_line_submit_runs_command_and_focuses_editor() {
        let dir = tempdir().unwrap();
        let mut app = test_app(dir.path());
        let mut tui = TuiState::new(DEFAULT_THEME);

        let mut events = vec![TuiEvent::FocusCommand];
        events.extend(chars("touch new.md"));
        events.push(TuiEvent::Submit);
        assert_eq!(press(&mut app, &mut tui, events), Effect::None);

        assert!(dir.path().join("new.md").is_file());
        assert!(tui.command_line.is_empty());
        assert_eq!(tui.focus, Focus::Editor);
    }

    #[test]
    fn test_ctrl_c_clears_then_quits() {
        let dir = tempdir().unwrap();
        let mut app = test_app(dir.path());
        let mut tui = TuiState::new(DEFAULT_THEME);

        let mut events = vec![TuiEvent::FocusCommand];
        events.extend(chars("rm x"));
        press(&mut app, &mut tui, events);

        assert_eq!(handle_event(&mut app, &mut tui, TuiEvent::ClearOrQuit), Effect::None);
        assert!(tui.command_line.is_empty());
        assert_eq!(handle_event(&mut app, &mut tui, TuiEvent::ClearOrQuit), Effect::Quit);
    }

    #[test]
    fn test_typed_q_is_text_not_quit() {
        let dir = tempdir().unwrap();
        let mut app = test_app(dir.path());
        let mut tui = TuiState::new(DEFAULT_THEME);
        tui.focus = Focus::Command;
        assert_eq!(handle_event(&mut app, &mut tui, TuiEvent::InputChar('q')), Effect::None);
        assert_eq!(handle_event(&mut app, &mut tui, TuiEvent::Submit), Effect::Quit);
        assert_eq!(handle_event(&mut app, &mut tui, TuiEvent::Quit), Effect::Quit);
    }

    #[test]
    fn test_enter_on_file_opens_it_in_editor() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("pkg")).unwrap();
        fs::write(dir.path().join("pkg/mod.py"), "x = 1\n").unwrap();
        let mut app = test_app(dir.path());
        let mut tui = TuiState::new(DEFAULT_THEME);

        // Enter on a directory expands it and keeps tree focus
        handle_event(&mut app, &mut tui, TuiEvent::Submit);
        assert_eq!(tui.focus, Focus::Tree);
        assert_eq!(app.tree.rows().len(), 2);

        press(
            &mut app,
            &mut tui,
            vec![TuiEvent::Move { motion: Motion::Down, extend: false }, TuiEvent::Submit],
        );
        assert_eq!(tui.focus, Focus::Editor);
        assert_eq!(app.document.path(), Some(dir.path().join("pkg/mod.py").as_path()));

        press(&mut app, &mut tui, chars("y"));
        handle_event(&mut app, &mut tui, TuiEvent::Save);
        assert_eq!(fs::read_to_string(dir.path().join("pkg/mod.py")).unwrap(), "yx = 1\n");
    }

    #[test]
    fn test_editor_ignores_keys_with_nothing_open() {
        let dir = tempdir().unwrap();
        let mut app = test_app(dir.path());
        let mut tui = TuiState::new(DEFAULT_THEME);
        tui.focus = Focus::Editor;
        press(&mut app, &mut tui, chars("abc"));
        handle_event(&mut app, &mut tui, TuiEvent::Paste("zzz".into()));
        assert_eq!(app.document.text(), "");
    }

    #[test]
    fn test_bracketed_paste_goes_to_focused_pane() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.md"), "").unwrap();
        let mut app = test_app(dir.path());
        let mut tui = TuiState::new(DEFAULT_THEME);
        handle_event(&mut app, &mut tui, TuiEvent::Submit);
        assert_eq!(tui.focus, Focus::Editor);

        handle_event(&mut app, &mut tui, TuiEvent::Paste("one\ntwo".into()));
        assert_eq!(app.document.text(), "one\ntwo");

        handle_event(&mut app, &mut tui, TuiEvent::FocusCommand);
        handle_event(&mut app, &mut tui, TuiEvent::Paste("cd\n..".into()));
        assert_eq!(tui.command_line.buffer, "cd ..");
    }

    #[test]
    fn test_toggle_hidden_is_global() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".hidden"), "").unwrap();
        let mut app = test_app(dir.path());
        let mut tui = TuiState::new(DEFAULT_THEME);
        tui.focus = Focus::Command;
        handle_event(&mut app, &mut tui, TuiEvent::ToggleHidden);
        assert!(app.tree.rows().is_empty());
        assert!(tui.command_line.is_empty());
    }

    struct FixedClipboard(Option<&'static str>);

    impl ClipboardSource for FixedClipboard {
        fn get_text(&mut self) -> Option<String> {
            self.0.map(str::to_string)
        }
    }

    /// App with `a.md` open and focus handed back to `focus`
    fn with_open_file(dir: &Path, focus: Focus) -> (App, TuiState) {
        fs::write(dir.join("a.md"), "one\ntwo").unwrap();
        let mut app = test_app(dir);
        let mut tui = TuiState::new(DEFAULT_THEME);
        tui.clipboard = Box::new(FixedClipboard(Some("pasted ")));
        handle_event(&mut app, &mut tui, TuiEvent::Submit);
        assert_eq!(app.document.path(), Some(dir.join("a.md").as_path()));
        tui.focus = focus;
        (app, tui)
    }

    #[test]
    fn test_ctrl_a_selects_document_from_any_pane() {
        for focus in [Focus::Tree, Focus::Command] {
            let dir = tempdir().unwrap();
            let (mut app, mut tui) = with_open_file(dir.path(), focus);

            handle_event(&mut app, &mut tui, TuiEvent::SelectAll);
            assert_eq!(app.document.selected_text().as_deref(), Some("one\ntwo"));
            assert_eq!(tui.focus, focus);
            assert!(tui.command_line.is_empty());
        }
    }

    #[test]
    fn test_ctrl_v_pastes_into_document_from_any_pane() {
        for focus in [Focus::Tree, Focus::Command] {
            let dir = tempdir().unwrap();
            let (mut app, mut tui) = with_open_file(dir.path(), focus);

            handle_event(&mut app, &mut tui, TuiEvent::PasteClipboard);
            assert_eq!(app.document.text(), "pasted one\ntwo");
            assert!(tui.command_line.is_empty());
        }
    }

    #[test]
    fn test_ctrl_v_needs_an_open_file_and_clipboard_text() {
        let dir = tempdir().unwrap();
        let mut app = test_app(dir.path());
        let mut tui = TuiState::new(DEFAULT_THEME);
        tui.clipboard = Box::new(FixedClipboard(Some("x")));
        tui.focus = Focus::Command;
        handle_event(&mut app, &mut tui, TuiEvent::PasteClipboard);
        assert_eq!(app.document.text(), "");
        assert!(tui.command_line.is_empty());

        let (mut app, mut tui) = with_open_file(dir.path(), Focus::Editor);
        tui.clipboard = Box::new(FixedClipboard(None));
        handle_event(&mut app, &mut tui, TuiEvent::PasteClipboard);
        assert!(!app.document.is_dirty());
    }

    #[test]
    fn test_rewatch_moves_watcher_and_cwd() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        let mut app = test_app(dir.path());
        let (tx, _rx) = mpsc::channel();
        let log_file = dir.path().join("terman.log");
        fs::write(&log_file, "").unwrap();
        let mut binding = WatchBinding::new(tx, IgnoreList::new([log_file]));

        let target = dir.path().join("sub");
        let quit = apply_effect(Effect::Rewatch(target.clone()), &mut app, &mut binding);
        assert!(!quit);
        assert_eq!(binding.watcher.as_ref().map(|w| w.root()), Some(target.as_path()));
        assert!(app.live_refresh);
        assert_eq!(
            std::env::current_dir().unwrap().canonicalize().unwrap(),
            target.canonicalize().unwrap()
        );

        assert!(apply_effect(Effect::Quit, &mut app, &mut binding));
    }
}
