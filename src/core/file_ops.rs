//! # File Operations
//!
//! The filesystem verbs behind the command line: `touch`, `rm`, `mkdir`,
//! `rmdir`, `cd`, `cp` and `mv`.
//!
//! Every operation checks its preconditions (argument count, existence)
//! before it touches the disk, so a rejected call never leaves a partial
//! mutation behind. Relative arguments are resolved against the working
//! directory handed in by the caller; the process cwd is never consulted.
//!
//! ```text
//! "cp a.txt b.txt"  →  required_args::<2>  →  copy(cwd, "a.txt", "b.txt")
//!                          │                        │
//!                   MissingArgument          NotFound / Io
//! ```

use log::info;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

/// What kind of entry an error message talks about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

impl EntryKind {
    pub fn label(self) -> &'static str {
        match self {
            EntryKind::File => "File",
            EntryKind::Directory => "Directory",
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum FileOpError {
    /// The verb needs `required` arguments and got fewer.
    MissingArgument { verb: &'static str, required: usize },
    AlreadyExists { kind: EntryKind, path: String },
    NotFound { kind: EntryKind, path: String },
    /// Anything the OS refuses that we don't classify (non-empty rmdir, permissions, ...).
    Io(io::Error),
}

impl FileOpError {
    /// Notification title for this error.
    pub fn title(&self) -> &'static str {
        match self {
            FileOpError::MissingArgument { .. } => "TerMan is angry",
            FileOpError::AlreadyExists { .. } => "TerMan checked for you!",
            FileOpError::NotFound { .. } => "TerMan searched everywhere...",
            FileOpError::Io(_) => "TerMan tripped over the filesystem",
        }
    }
}

impl fmt::Display for FileOpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileOpError::MissingArgument { verb, required: 1 } => {
                write!(f, "Error: Command '{verb}' requires an argument")
            }
            FileOpError::MissingArgument { verb, .. } => {
                write!(f, "Error: Command '{verb}' requires two arguments")
            }
            FileOpError::AlreadyExists { kind, path } => {
                write!(f, "Error: {} '{path}' already exists", kind.label())
            }
            FileOpError::NotFound { kind, path } => {
                write!(f, "Error: {} '{path}' does not exist", kind.label())
            }
            FileOpError::Io(e) => write!(f, "Error: {e}"),
        }
    }
}

impl std::error::Error for FileOpError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FileOpError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for FileOpError {
    fn from(e: io::Error) -> Self {
        FileOpError::Io(e)
    }
}

// ============================================================================
// Argument validation
// ============================================================================

/// Take the first `N` arguments of `verb`, or fail with `MissingArgument`.
///
/// Extra arguments are ignored.
pub fn required_args<'a, const N: usize>(
    verb: &'static str,
    args: &'a [String],
) -> Result<[&'a str; N], FileOpError> {
    if args.len() < N {
        return Err(FileOpError::MissingArgument { verb, required: N });
    }
    Ok(std::array::from_fn(|i| args[i].as_str()))
}

// ============================================================================
// Operations
// ============================================================================

/// Create an empty file. Refuses to touch anything that already exists.
pub fn touch(cwd: &Path, file: &str) -> Result<PathBuf, FileOpError> {
    let path = cwd.join(file);
    if path.exists() {
        return Err(FileOpError::AlreadyExists {
            kind: EntryKind::File,
            path: file.to_string(),
        });
    }
    fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)?;
    info!("touch {}", path.display());
    Ok(path)
}

/// Delete a single file. Directories are `rmdir`'s job and surface as `Io`.
pub fn remove(cwd: &Path, file: &str) -> Result<PathBuf, FileOpError> {
    let path = existing(cwd, file, EntryKind::File)?;
    fs::remove_file(&path)?;
    info!("rm {}", path.display());
    Ok(path)
}

/// Create one directory. Parents are not created.
pub fn make_dir(cwd: &Path, dir: &str) -> Result<PathBuf, FileOpError> {
    let path = cwd.join(dir);
    if path.exists() {
        return Err(FileOpError::AlreadyExists {
            kind: EntryKind::Directory,
            path: dir.to_string(),
        });
    }
    fs::create_dir(&path)?;
    info!("mkdir {}", path.display());
    Ok(path)
}

/// Remove an empty directory.
pub fn remove_dir(cwd: &Path, dir: &str) -> Result<PathBuf, FileOpError> {
    let path = existing(cwd, dir, EntryKind::Directory)?;
    fs::remove_dir(&path)?;
    info!("rmdir {}", path.display());
    Ok(path)
}

/// Resolve the target of `cd`.
///
/// Expands `~` and environment variables, resolves against `cwd` and
/// normalizes the result. Returns the new absolute working directory; the
/// caller decides what to re-root.
pub fn change_dir(cwd: &Path, dir: &str) -> Result<PathBuf, FileOpError> {
    let expanded = expand_path(dir);
    let resolved = normalize(&cwd.join(expanded));
    if !resolved.exists() {
        return Err(FileOpError::NotFound {
            kind: EntryKind::Directory,
            path: resolved.display().to_string(),
        });
    }
    if !resolved.is_dir() {
        return Err(FileOpError::Io(io::Error::new(
            io::ErrorKind::NotADirectory,
            format!("'{}' is not a directory", resolved.display()),
        )));
    }
    info!("cd {}", resolved.display());
    Ok(resolved)
}

/// Byte-for-byte copy of `src` onto `dst`, overwriting `dst`.
pub fn copy(cwd: &Path, src: &str, dst: &str) -> Result<PathBuf, FileOpError> {
    let from = existing(cwd, src, EntryKind::File)?;
    let to = cwd.join(dst);
    let bytes = fs::copy(&from, &to)?;
    info!("cp {} -> {} ({bytes} bytes)", from.display(), to.display());
    Ok(to)
}

/// Move or rename `src` to `dst`.
///
/// When `dst` is an existing directory, `src` lands inside it. Regular files
/// that cannot be renamed across filesystems are copied and then removed.
pub fn move_entry(cwd: &Path, src: &str, dst: &str) -> Result<PathBuf, FileOpError> {
    let from = existing(cwd, src, EntryKind::File)?;
    let mut to = cwd.join(dst);
    if to.is_dir()
        && let Some(name) = from.file_name()
    {
        to = to.join(name);
    }

    match fs::rename(&from, &to) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices && from.is_file() => {
            fs::copy(&from, &to)?;
            fs::remove_file(&from)?;
        }
        Err(e) => return Err(e.into()),
    }
    info!("mv {} -> {}", from.display(), to.display());
    Ok(to)
}

fn existing(cwd: &Path, arg: &str, kind: EntryKind) -> Result<PathBuf, FileOpError> {
    let path = cwd.join(arg);
    if path.exists() {
        Ok(path)
    } else {
        Err(FileOpError::NotFound {
            kind,
            path: arg.to_string(),
        })
    }
}

// ============================================================================
// Path expansion
// ============================================================================

/// Expand a leading `~` and any `$VAR` / `${VAR}` references.
pub fn expand_path(raw: &str) -> String {
    expand_vars(&expand_home(raw), |name| std::env::var(name).ok())
}

fn expand_home(raw: &str) -> String {
    let rest = match raw.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
        _ => return raw.to_string(),
    };
    match dirs::home_dir() {
        Some(home) => format!("{}{rest}", home.display()),
        None => raw.to_string(),
    }
}

/// Substitute `$NAME` and `${NAME}`. Unknown variables stay verbatim.
fn expand_vars(raw: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(dollar) = rest.find('$') {
        out.push_str(&rest[..dollar]);
        let after = &rest[dollar + 1..];

        let (name, consumed) = if let Some(braced) = after.strip_prefix('{') {
            match braced.find('}') {
                Some(end) => (&braced[..end], end + 2),
                None => ("", 0),
            }
        } else {
            let end = after
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(after.len());
            (&after[..end], end)
        };

        match (!name.is_empty()).then(|| lookup(name)).flatten() {
            Some(value) => out.push_str(&value),
            None => out.push_str(&rest[dollar..dollar + 1 + consumed]),
        }
        rest = &after[consumed..];
    }

    out.push_str(rest);
    out
}

/// Lexically remove `.` and `..` components. Does not touch the disk.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
