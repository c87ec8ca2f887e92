//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::path::Path;
use std::time::Duration;

use crate::core::config::{DEFAULT_THEME, ResolvedConfig};
use crate::core::state::App;

/// Config rooted at `dir` with defaults everywhere else.
pub fn test_config(dir: &Path) -> ResolvedConfig {
    ResolvedConfig {
        start_dir: dir.to_path_buf(),
        show_hidden: true,
        tab_width: 4,
        theme: DEFAULT_THEME.to_string(),
        notification_timeout: Duration::from_secs(5),
        log_file: std::env::temp_dir().join("terman-test.log"),
    }
}

/// Creates a test App rooted at `dir`, without a watcher.
pub fn test_app(dir: &Path) -> App {
    App::new(&test_config(dir))
}
