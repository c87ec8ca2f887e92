//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → env vars → CLI flags.
//!
//! TerMan keeps no state on disk, so there is no config file layer. Every
//! setting has a `TERMAN_*` environment variable and a command-line flag.

use log::{debug, warn};
use std::fmt;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_TAB_WIDTH: usize = 4;
pub const DEFAULT_THEME: &str = "base16-ocean.dark";
pub const DEFAULT_NOTIFICATION_TIMEOUT_SECS: u64 = 5;
pub const LOG_FILE_NAME: &str = "terman.log";

// ============================================================================
// CLI overrides (None / false = not specified)
// ============================================================================

#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub start_dir: Option<PathBuf>,
    pub hide_hidden: bool,
    pub tab_width: Option<usize>,
    pub theme: Option<String>,
    pub notification_timeout: Option<u64>,
    pub log_file: Option<PathBuf>,
}

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Absolute, existing directory the tree starts at.
    pub start_dir: PathBuf,
    pub show_hidden: bool,
    pub tab_width: usize,
    pub theme: String,
    pub notification_timeout: Duration,
    pub log_file: PathBuf,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    NotADirectory(PathBuf),
    Io(PathBuf, io::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NotADirectory(path) => {
                write!(f, "'{}' is not a directory", path.display())
            }
            ConfigError::Io(path, e) => write!(f, "cannot open '{}': {e}", path.display()),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Resolution
// ============================================================================

/// Default log location: the user cache dir, never the tree being watched.
pub fn default_log_path() -> PathBuf {
    dirs::cache_dir()
        .map(|dir| dir.join("terman"))
        .unwrap_or_else(std::env::temp_dir)
        .join(LOG_FILE_NAME)
}

/// Where the log goes: CLI → env → default. Resolved before the logger exists.
pub fn resolve_log_file(cli: &CliOverrides) -> PathBuf {
    resolve_log_file_with(cli, &env_lookup)
}

/// Resolve the final config by collapsing: defaults → env vars → CLI.
pub fn resolve(cli: &CliOverrides) -> Result<ResolvedConfig, ConfigError> {
    resolve_with(cli, &env_lookup)
}

fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn resolve_log_file_with(cli: &CliOverrides, env: &dyn Fn(&str) -> Option<String>) -> PathBuf {
    cli.log_file
        .clone()
        .or_else(|| env("TERMAN_LOG_FILE").map(PathBuf::from))
        .unwrap_or_else(default_log_path)
}

fn resolve_with(
    cli: &CliOverrides,
    env: &dyn Fn(&str) -> Option<String>,
) -> Result<ResolvedConfig, ConfigError> {
    let requested = cli.start_dir.clone().unwrap_or_else(|| PathBuf::from("."));
    let start_dir = requested
        .canonicalize()
        .map_err(|e| ConfigError::Io(requested.clone(), e))?;
    if !start_dir.is_dir() {
        return Err(ConfigError::NotADirectory(requested));
    }

    // --hide-hidden can only hide; the env var can go either way
    let show_hidden = if cli.hide_hidden {
        false
    } else {
        env("TERMAN_SHOW_HIDDEN")
            .and_then(|raw| parse_env("TERMAN_SHOW_HIDDEN", &raw, parse_bool))
            .unwrap_or(true)
    };

    let tab_width = cli
        .tab_width
        .or_else(|| {
            env("TERMAN_TAB_WIDTH")
                .and_then(|raw| parse_env("TERMAN_TAB_WIDTH", &raw, |s| s.parse().ok()))
        })
        .filter(|&width| width > 0)
        .unwrap_or(DEFAULT_TAB_WIDTH);

    let theme = cli
        .theme
        .clone()
        .or_else(|| env("TERMAN_THEME"))
        .unwrap_or_else(|| DEFAULT_THEME.to_string());

    let timeout_secs = cli
        .notification_timeout
        .or_else(|| {
            env("TERMAN_NOTIFICATION_TIMEOUT").and_then(|raw| {
                parse_env("TERMAN_NOTIFICATION_TIMEOUT", &raw, |s| s.parse().ok())
            })
        })
        .unwrap_or(DEFAULT_NOTIFICATION_TIMEOUT_SECS);

    let resolved = ResolvedConfig {
        start_dir,
        show_hidden,
        tab_width,
        theme,
        notification_timeout: Duration::from_secs(timeout_secs),
        log_file: resolve_log_file_with(cli, env),
    };
    debug!("Config: {:?}", resolved);
    Ok(resolved)
}

fn parse_env<T>(key: &str, raw: &str, parse: impl Fn(&str) -> Option<T>) -> Option<T> {
    let parsed = parse(raw.trim());
    if parsed.is_none() {
        warn!("Ignoring {}={:?}: not a valid value", key, raw);
    }
    parsed
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn in_dir(dir: &tempfile::TempDir) -> CliOverrides {
        CliOverrides {
            start_dir: Some(dir.path().to_path_buf()),
            ..Default::default()
        }
    }

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let dir = tempdir().unwrap();
        let resolved = resolve_with(&in_dir(&dir), &env_from(&[])).unwrap();
        assert!(resolved.show_hidden);
        assert_eq!(resolved.tab_width, DEFAULT_TAB_WIDTH);
        assert_eq!(resolved.theme, DEFAULT_THEME);
        assert_eq!(
            resolved.notification_timeout,
            Duration::from_secs(DEFAULT_NOTIFICATION_TIMEOUT_SECS)
        );
        assert_eq!(resolved.log_file, default_log_path());
        assert_eq!(resolved.start_dir, dir.path().canonicalize().unwrap());
    }

    #[test]
    fn test_env_overrides_defaults() {
        let dir = tempdir().unwrap();
        let env = env_from(&[
            ("TERMAN_SHOW_HIDDEN", "off"),
            ("TERMAN_TAB_WIDTH", "2"),
            ("TERMAN_THEME", "InspiredGitHub"),
            ("TERMAN_NOTIFICATION_TIMEOUT", "9"),
            ("TERMAN_LOG_FILE", "/tmp/elsewhere.log"),
        ]);
        let resolved = resolve_with(&in_dir(&dir), &env).unwrap();
        assert!(!resolved.show_hidden);
        assert_eq!(resolved.tab_width, 2);
        assert_eq!(resolved.theme, "InspiredGitHub");
        assert_eq!(resolved.notification_timeout, Duration::from_secs(9));
        assert_eq!(resolved.log_file, PathBuf::from("/tmp/elsewhere.log"));
    }

    #[test]
    fn test_cli_wins_over_env() {
        let dir = tempdir().unwrap();
        let env = env_from(&[("TERMAN_TAB_WIDTH", "2"), ("TERMAN_SHOW_HIDDEN", "yes")]);
        let cli = CliOverrides {
            tab_width: Some(8),
            hide_hidden: true,
            ..in_dir(&dir)
        };
        let resolved = resolve_with(&cli, &env).unwrap();
        assert_eq!(resolved.tab_width, 8);
        assert!(!resolved.show_hidden);
    }

    #[test]
    fn test_bad_env_values_fall_back() {
        let dir = tempdir().unwrap();
        let env = env_from(&[
            ("TERMAN_TAB_WIDTH", "wide"),
            ("TERMAN_SHOW_HIDDEN", "maybe"),
            ("TERMAN_NOTIFICATION_TIMEOUT", "-1"),
        ]);
        let resolved = resolve_with(&in_dir(&dir), &env).unwrap();
        assert_eq!(resolved.tab_width, DEFAULT_TAB_WIDTH);
        assert!(resolved.show_hidden);
        assert_eq!(
            resolved.notification_timeout,
            Duration::from_secs(DEFAULT_NOTIFICATION_TIMEOUT_SECS)
        );
    }

    #[test]
    fn test_zero_tab_width_is_rejected() {
        let dir = tempdir().unwrap();
        let cli = CliOverrides {
            tab_width: Some(0),
            ..in_dir(&dir)
        };
        let resolved = resolve_with(&cli, &env_from(&[])).unwrap();
        assert_eq!(resolved.tab_width, DEFAULT_TAB_WIDTH);
    }

    #[test]
    fn test_missing_start_dir() {
        let dir = tempdir().unwrap();
        let cli = CliOverrides {
            start_dir: Some(dir.path().join("nope")),
            ..Default::default()
        };
        let err = resolve_with(&cli, &env_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Io(..)));
        assert!(err.to_string().contains("nope"));
    }

    #[test]
    fn test_start_dir_must_be_directory() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("file.txt");
        std::fs::write(&file, "x").unwrap();
        let cli = CliOverrides {
            start_dir: Some(file),
            ..Default::default()
        };
        assert!(matches!(
            resolve_with(&cli, &env_from(&[])),
            Err(ConfigError::NotADirectory(_))
        ));
    }
}
