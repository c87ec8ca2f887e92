//! # FileTree Component
//!
//! The left pane: the flattened [`DirTree`] rows as a ratatui `List`.
//!
//! `FileTreeState` keeps the `ListState` between frames so the list scrolls
//! with the selection. `FileTreeInput` turns navigation keys into tree moves
//! and reports when a row was activated.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, List, ListItem, ListState};

use crate::core::dir_tree::DirTree;
use crate::core::document::Motion;
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

#[derive(Debug, Default)]
pub struct FileTreeState {
    pub list_state: ListState,
}

impl FileTreeState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Transient render wrapper for the tree pane.
pub struct FileTree<'a> {
    state: &'a mut FileTreeState,
    tree: &'a DirTree,
    focused: bool,
}

impl<'a> FileTree<'a> {
    pub fn new(state: &'a mut FileTreeState, tree: &'a DirTree, focused: bool) -> Self {
        Self {
            state,
            tree,
            focused,
        }
    }
}

impl<'a> Component for FileTree<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let border_style = if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(format!(" {} ", self.tree.root_label()));

        let items: Vec<ListItem> = self
            .tree
            .rows()
            .iter()
            .map(|node| {
                let indent = "  ".repeat(node.depth);
                let (marker, style) = match (node.is_dir, node.expanded) {
                    (true, true) => ("▾ ", Style::default().fg(Color::Blue)),
                    (true, false) => ("▸ ", Style::default().fg(Color::Blue)),
                    (false, _) => ("  ", Style::default()),
                };
                ListItem::new(Line::from(vec![
                    Span::raw(indent),
                    Span::styled(marker, style),
                    Span::styled(node.name.clone(), style),
                ]))
            })
            .collect();

        let highlight = if self.focused {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::REVERSED)
        };
        let list = List::new(items).block(block).highlight_style(highlight);

        let selected = (!self.tree.rows().is_empty()).then(|| self.tree.selected());
        self.state.list_state.select(selected);
        frame.render_stateful_widget(list, area, &mut self.state.list_state);
    }
}

/// Events emitted by the tree pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeEvent {
    /// Enter (or Right) on the selected row: open it or toggle it.
    Activate,
    Moved,
}

/// Routes navigation keys to the tree.
pub struct FileTreeInput<'a> {
    pub tree: &'a mut DirTree,
}

impl<'a> FileTreeInput<'a> {
    pub fn new(tree: &'a mut DirTree) -> Self {
        Self { tree }
    }
}

impl<'a> EventHandler for FileTreeInput<'a> {
    type Event = TreeEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::Submit => Some(TreeEvent::Activate),
            TuiEvent::Move { motion, .. } => {
                match motion {
                    Motion::Up => self.tree.select_previous(),
                    Motion::Down => self.tree.select_next(),
                    Motion::Left => self.tree.collapse(),
                    Motion::Right => {
                        // only unfolds; files are opened with Enter
                        let closed_dir = self
                            .tree
                            .selected_node()
                            .is_some_and(|node| node.is_dir && !node.expanded);
                        return closed_dir.then_some(TreeEvent::Activate);
                    }
                    Motion::LineStart | Motion::DocStart => self.tree.select_first(),
                    Motion::LineEnd | Motion::DocEnd => self.tree.select_last(),
                    Motion::PageUp(_) | Motion::PageDown(_) => return None,
                }
                Some(TreeEvent::Moved)
            }
            TuiEvent::PageUp { .. } => {
                self.tree.select_first();
                Some(TreeEvent::Moved)
            }
            TuiEvent::PageDown { .. } => {
                self.tree.select_last();
                Some(TreeEvent::Moved)
            }
            _ => None,
        }
    }
}
