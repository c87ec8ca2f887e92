//! # TUI Components
//!
//! All UI components for the terminal interface.
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Display components that receive all data as props:
//! - `TitleBar`: Top status bar with working directory, file, and status
//! - `Notifications`: Toasts in the top-right corner
//!
//! ### Stateful Components (Event-Driven)
//!
//! Components with persistent state in `TuiState` and a transient wrapper
//! created each frame:
//! - `FileTree` / `FileTreeState`: The directory pane
//! - `EditorView` / `EditorViewState`: The text pane
//! - `CommandLine`: The command input (owns its buffer)
//!
//! Key handling sits next to rendering: `FileTreeInput`, `EditorInput`, and
//! `CommandLine` implement `EventHandler` and emit high-level events the
//! event loop turns into `core::Action`s.
//!
//! ## Props-Based Data Flow
//!
//! Components receive external data as props, not by reaching into `App`:
//!
//! ```rust,ignore
//! // Dependencies are explicit
//! FileTree::new(&mut tui.file_tree, &app.tree, focused).render(frame, area);
//! ```
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs            (this file)
//! ├── title_bar.rs      (Top status bar)
//! ├── file_tree.rs      (Directory pane)
//! ├── editor_view.rs    (Editor pane + key routing)
//! ├── command_line.rs   (Command input)
//! └── notifications.rs  (Toasts)
//! ```

pub mod command_line;
pub mod editor_view;
pub mod file_tree;
pub mod notifications;
mod title_bar;

pub use command_line::{CommandEvent, CommandLine};
pub use editor_view::{EditorInput, EditorView, EditorViewState};
pub use file_tree::{FileTree, FileTreeInput, FileTreeState, TreeEvent};
pub use notifications::Notifications;
pub use title_bar::TitleBar;
