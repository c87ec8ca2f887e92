//! # Core Application Logic
//!
//! This module contains TerMan's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (app data)     │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │  • file ops, commands   │
//!                    └───────────┬─────────────┘
//!                                │
//!               ┌────────────────┴────────────────┐
//!               ▼                                 ▼
//!        ┌────────────┐                    ┌────────────┐
//!        │    TUI     │  ◀── mpsc ──────── │  watcher   │
//!        │  Adapter   │   Action::FsChanged│  thread    │
//!        │ (ratatui)  │                    │  (notify)  │
//!        └────────────┘                    └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct, all application state in one place
//! - [`action`]: The `Action` enum and the `update()` reducer
//! - [`command`]: Command-line parsing and dispatch
//! - [`file_ops`]: The filesystem verbs
//! - [`dir_tree`]: The directory tree model
//! - [`document`]: The open file's text buffer
//! - [`watcher`]: Filesystem watcher feeding the event loop
//! - [`config`]: Settings resolution

pub mod action;
pub mod command;
pub mod config;
pub mod dir_tree;
pub mod document;
pub mod file_ops;
pub mod state;
pub mod watcher;
