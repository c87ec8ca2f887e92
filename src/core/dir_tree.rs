//! # Directory Tree
//!
//! A flattened, filterable view of the working directory.
//!
//! The tree never diffs: [`DirTree::rebuild`] throws every row away and walks
//! the disk again. The only thing that survives a rebuild is the set of
//! expanded directory *paths* and the selected path, so an external change
//! doesn't collapse what the user had open.
//!
//! ```text
//! rows (depth-first, dirs first, case-insensitive):
//!   ▾ src          depth 0, expanded
//!       core       depth 1
//!       main.rs    depth 1
//!     .gitignore   depth 0   ← dropped when show_hidden = false
//!     Cargo.toml   depth 0
//! ```

use log::{debug, warn};
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Names starting with this are hidden.
pub const HIDDEN_MARKER: char = '.';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub path: PathBuf,
    pub name: String,
    pub is_dir: bool,
    pub depth: usize,
    pub expanded: bool,
}

/// Result of activating the selected row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeSelection {
    /// A file: the caller should open it.
    File(PathBuf),
    /// A directory was expanded or collapsed in place.
    Directory { path: PathBuf, expanded: bool },
    /// The tree is empty.
    Nothing,
}

pub struct DirTree {
    root: PathBuf,
    show_hidden: bool,
    expanded: HashSet<PathBuf>,
    rows: Vec<TreeNode>,
    selected: usize,
}

impl DirTree {
    pub fn new(root: PathBuf, show_hidden: bool) -> Self {
        let mut tree = Self {
            root,
            show_hidden,
            expanded: HashSet::new(),
            rows: Vec::new(),
            selected: 0,
        };
        tree.rebuild();
        tree
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Basename of the root, shown as the pane label.
    pub fn root_label(&self) -> String {
        self.root
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.root.display().to_string())
    }

    pub fn show_hidden(&self) -> bool {
        self.show_hidden
    }

    pub fn rows(&self) -> &[TreeNode] {
        &self.rows
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_node(&self) -> Option<&TreeNode> {
        self.rows.get(self.selected)
    }

    /// Drop hidden entries unless hidden files are shown.
    pub fn filter_paths(&self, entries: Vec<PathBuf>) -> Vec<PathBuf> {
        if self.show_hidden {
            return entries;
        }
        entries.into_iter().filter(|path| !is_hidden(path)).collect()
    }

    /// Forget every row and walk the disk again.
    pub fn rebuild(&mut self) {
        let keep = self.selected_node().map(|node| node.path.clone());

        let mut rows = Vec::new();
        self.walk(&self.root, 0, &mut rows);
        self.rows = rows;

        self.selected = keep
            .and_then(|path| self.rows.iter().position(|node| node.path == path))
            .unwrap_or_else(|| self.selected.min(self.rows.len().saturating_sub(1)));

        debug!(
            "Rebuilt tree at {} ({} rows, show_hidden={})",
            self.root.display(),
            self.rows.len(),
            self.show_hidden
        );
    }

    fn walk(&self, dir: &Path, depth: usize, rows: &mut Vec<TreeNode>) {
        let entries = match read_entries(dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Cannot list {}: {}", dir.display(), e);
                return;
            }
        };

        for path in self.filter_paths(entries) {
            let is_dir = path.is_dir();
            let expanded = is_dir && self.expanded.contains(&path);
            let name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            rows.push(TreeNode {
                path: path.clone(),
                name,
                is_dir,
                depth,
                expanded,
            });
            if expanded {
                self.walk(&path, depth + 1, rows);
            }
        }
    }

    /// Flip hidden-file visibility and rebuild. Returns the new setting.
    pub fn toggle_hidden(&mut self) -> bool {
        self.show_hidden = !self.show_hidden;
        self.rebuild();
        self.show_hidden
    }

    /// Re-root the tree. Expansion state belongs to the old root and is dropped.
    pub fn set_root(&mut self, root: PathBuf) {
        self.root = root;
        self.expanded.clear();
        self.selected = 0;
        self.rebuild();
    }

    /// Activate the selected row: open a file, or fold/unfold a directory.
    pub fn select(&mut self) -> TreeSelection {
        let Some(node) = self.selected_node() else {
            return TreeSelection::Nothing;
        };
        if !node.is_dir {
            return TreeSelection::File(node.path.clone());
        }

        let path = node.path.clone();
        let expanded = if self.expanded.remove(&path) {
            false
        } else {
            self.expanded.insert(path.clone());
            true
        };
        self.rebuild();
        TreeSelection::Directory { path, expanded }
    }

    /// Collapse the selected directory, or jump to the parent row.
    pub fn collapse(&mut self) {
        let Some(node) = self.selected_node() else {
            return;
        };
        if node.expanded {
            let path = node.path.clone();
            self.expanded.remove(&path);
            self.rebuild();
            return;
        }
        let depth = node.depth;
        if depth == 0 {
            return;
        }
        if let Some(parent) = self.rows[..self.selected]
            .iter()
            .rposition(|row| row.depth + 1 == depth)
        {
            self.selected = parent;
        }
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.rows.len() {
            self.selected += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.rows.len().saturating_sub(1);
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|name| name.to_string_lossy().starts_with(HIDDEN_MARKER))
}

/// Directory entries, directories first, then by case-insensitive name.
fn read_entries(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .collect();
    entries.sort_by_cached_key(|path| {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        (!path.is_dir(), name)
    });
    Ok(entries)
}
