use crate::core::state::App;
use crate::tui::component::Component;
use crate::tui::components::{EditorView, FileTree, Notifications, TitleBar};
use crate::tui::{Focus, TuiState};

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

/// Screen layout:
///
/// ```text
/// ┌ title bar (1 row) ─────────────────────────────┐
/// │ tree (30%)   │ editor                 toasts → │
/// │              │                                 │
/// ├ command line (3 rows) ─────────────────────────┤
/// ```
pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState) {
    use Constraint::{Length, Min, Percentage};
    let [title_area, main_area, command_area] =
        Layout::vertical([Length(1), Min(0), Length(3)]).areas(frame.area());
    let [tree_area, editor_area] =
        Layout::horizontal([Percentage(30), Min(0)]).areas(main_area);

    let document = &app.document;
    TitleBar::new(
        app.working_dir.display().to_string(),
        document
            .path()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned()),
        document.language().map(|lang| lang.name()),
        app.status_message.clone(),
    )
    .render(frame, title_area);

    FileTree::new(&mut tui.file_tree, &app.tree, tui.focus == Focus::Tree)
        .render(frame, tree_area);

    EditorView::new(
        &mut tui.editor,
        document,
        &mut tui.highlighter,
        tui.focus == Focus::Editor,
    )
    .render(frame, editor_area);

    tui.command_line.focused = tui.focus == Focus::Command;
    tui.command_line.render(frame, command_area);

    // Toasts float over the panes
    Notifications::new(&app.notifications).render(frame, main_area);
}
