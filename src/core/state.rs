//! # Application State
//!
//! Core business state for TerMan. This module contains domain logic only -
//! no TUI-specific types. Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── working_dir: PathBuf              // changed by `cd` only
//! ├── tree: DirTree                     // rooted at working_dir
//! ├── document: Document                // the one open file (or none)
//! ├── notifications: Vec<Notification>  // toasts, oldest first
//! ├── status_message: String            // title bar text
//! ├── live_refresh: bool                // a watcher is feeding FsChanged
//! └── notification_timeout: Duration
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.
//! This keeps things predictable, so no surprise mutations.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::core::config::ResolvedConfig;
use crate::core::dir_tree::DirTree;
use crate::core::document::Document;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Information,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub severity: Severity,
    pub created: Instant,
}

pub struct App {
    pub working_dir: PathBuf,
    pub tree: DirTree,
    pub document: Document,
    pub notifications: Vec<Notification>,
    pub status_message: String,
    /// False when no watcher is running; the reducer then rebuilds the tree
    /// itself after mutating commands.
    pub live_refresh: bool,
    pub notification_timeout: Duration,
}

impl App {
    pub fn new(config: &ResolvedConfig) -> Self {
        let working_dir = config.start_dir.clone();
        Self {
            tree: DirTree::new(working_dir.clone(), config.show_hidden),
            working_dir,
            document: Document::new(config.tab_width),
            notifications: Vec::new(),
            status_message: String::from("Welcome to TerMan! Type 'help' below."),
            live_refresh: false,
            notification_timeout: config.notification_timeout,
        }
    }

    pub fn notify(&mut self, title: impl Into<String>, message: impl Into<String>, severity: Severity) {
        self.notifications.push(Notification {
            title: title.into(),
            message: message.into(),
            severity,
            created: Instant::now(),
        });
    }

    pub fn error(&mut self, title: impl Into<String>, message: impl Into<String>) {
        self.notify(title, message, Severity::Error);
    }

    /// Drop toasts older than the timeout. Returns `true` if any were removed.
    pub fn expire_notifications(&mut self, now: Instant) -> bool {
        let before = self.notifications.len();
        let timeout = self.notification_timeout;
        self.notifications
            .retain(|n| now.saturating_duration_since(n.created) < timeout);
        self.notifications.len() != before
    }
}
