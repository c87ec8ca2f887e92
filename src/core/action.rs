//! # Actions
//!
//! Everything that can happen in TerMan becomes an `Action`.
//! User submits a command? That's `Action::SubmitCommand(line)`.
//! The watcher saw a change? That's `Action::FsChanged`.
//!
//! The `update()` function applies an action to the state and returns an
//! `Effect` for the things the core can't do itself: quitting, and moving
//! the watcher and the process cwd after a `cd`.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! Command errors stop here. They become notifications; nothing propagates.

use log::{info, warn};
use std::path::PathBuf;

use crate::core::command::{self, Command, HELP_TITLE, Outcome};
use crate::core::dir_tree::TreeSelection;
use crate::core::state::{App, Severity};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// A line submitted from the command input.
    SubmitCommand(String),
    /// Enter on the tree's selected row.
    OpenSelected,
    SaveFile,
    ToggleHidden,
    /// Posted by the watcher thread.
    FsChanged,
    /// Clipboard or bracketed-paste text for the editor.
    Paste(String),
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    Quit,
    /// The working directory moved; re-bind the watcher and the process cwd.
    Rewatch(PathBuf),
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::SubmitCommand(line) => submit_command(app, &line),
        Action::OpenSelected => {
            if let TreeSelection::File(path) = app.tree.select() {
                match app.document.load(&path) {
                    Ok(()) => {
                        app.status_message = format!("Opened {}", display_name(&path));
                    }
                    Err(e) => {
                        warn!("Failed to open {}: {}", path.display(), e);
                        app.error(
                            "TerMan couldn't read that",
                            format!("Error: Cannot open '{}': {e}", path.display()),
                        );
                    }
                }
            }
            Effect::None
        }
        Action::SaveFile => {
            match app.document.save() {
                Ok(true) => {
                    let name = app.document.path().map(display_name).unwrap_or_default();
                    app.status_message = format!("Saved {name}");
                }
                Ok(false) => app.status_message = String::from("No file open"),
                Err(e) => {
                    warn!("Save failed: {}", e);
                    app.error("TerMan couldn't save", format!("Error: {e}"));
                }
            }
            Effect::None
        }
        Action::ToggleHidden => {
            let shown = app.tree.toggle_hidden();
            app.status_message = if shown {
                String::from("Showing hidden files")
            } else {
                String::from("Hiding hidden files")
            };
            Effect::None
        }
        Action::FsChanged => {
            app.tree.rebuild();
            Effect::None
        }
        Action::Paste(text) => {
            app.document.insert_str(&text);
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}

fn submit_command(app: &mut App, line: &str) -> Effect {
    let Some(command) = Command::parse(line) else {
        return Effect::None;
    };
    info!("Command: {}", line.trim());

    match command::execute(&command, &app.working_dir) {
        Ok(Outcome::Quit) => Effect::Quit,
        Ok(Outcome::Help(text)) => {
            app.notify(HELP_TITLE, text, Severity::Information);
            Effect::None
        }
        Ok(Outcome::ChangedDir(dir)) => {
            app.working_dir = dir.clone();
            app.tree.set_root(dir.clone());
            app.status_message = format!("Now in {}", dir.display());
            Effect::Rewatch(dir)
        }
        Ok(Outcome::Done) => {
            if !app.live_refresh {
                app.tree.rebuild();
            }
            app.status_message = format!("Ran: {}", line.trim());
            Effect::None
        }
        Err(e) => {
            warn!("Command '{}' failed: {}", line.trim(), e);
            app.error(e.title(), e.to_string());
            Effect::None
        }
    }
}

fn display_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
