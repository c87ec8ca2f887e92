//! # Command Dispatcher
//!
//! Parses the command line into a [`Command`] and runs it against the
//! working directory.
//!
//! ```text
//! "mv a.txt docs"  →  Command::parse  →  Command::FileOp { verb: Mv, args }
//!                                              │
//!                                       execute(cwd)
//!                                              │
//!                          Ok(Outcome)  or  Err(CommandError)
//! ```
//!
//! Errors never escape past the caller of [`execute`]: the reducer turns
//! every `CommandError` into a titled notification.

use log::debug;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::core::file_ops::{self, FileOpError};

/// Lines shown by `help`.
pub const HELP_LINES: &[&str] = &[
    "- help",
    "- q/Q/quit/exit",
    "- touch <file>",
    "- rm <file>",
    "- mkdir <dir>",
    "- rmdir <dir>",
    "- cd <dir>",
    "- cp <src> <dst>",
    "- mv <src> <dst>",
];

pub const HELP_TITLE: &str = "All Commands:";

/// Verbs that map onto a filesystem operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Touch,
    Rm,
    Mkdir,
    Rmdir,
    Cd,
    Cp,
    Mv,
}

impl Verb {
    fn from_token(token: &str) -> Option<Self> {
        match token {
            "touch" => Some(Verb::Touch),
            "rm" => Some(Verb::Rm),
            "mkdir" => Some(Verb::Mkdir),
            "rmdir" => Some(Verb::Rmdir),
            "cd" => Some(Verb::Cd),
            "cp" => Some(Verb::Cp),
            "mv" => Some(Verb::Mv),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Verb::Touch => "touch",
            Verb::Rm => "rm",
            Verb::Mkdir => "mkdir",
            Verb::Rmdir => "rmdir",
            Verb::Cd => "cd",
            Verb::Cp => "cp",
            Verb::Mv => "mv",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quit,
    Help,
    FileOp { verb: Verb, args: Vec<String> },
    Unknown(String),
}

impl Command {
    /// Split on whitespace into verb + args. Blank input yields `None`.
    ///
    /// No quoting: an argument can't contain spaces.
    pub fn parse(line: &str) -> Option<Self> {
        let mut tokens = line.split_whitespace();
        let verb = tokens.next()?;
        let args: Vec<String> = tokens.map(str::to_string).collect();

        Some(match verb {
            "q" | "Q" | "quit" | "exit" => Command::Quit,
            "help" => Command::Help,
            other => match Verb::from_token(other) {
                Some(verb) => Command::FileOp { verb, args },
                None => Command::Unknown(other.to_string()),
            },
        })
    }
}

/// What a successful command asks the application to do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Done,
    Quit,
    Help(String),
    /// `cd` succeeded; the new absolute working directory.
    ChangedDir(PathBuf),
}

#[derive(Debug)]
pub enum CommandError {
    FileOp(FileOpError),
    UnknownCommand(String),
}

impl CommandError {
    pub fn title(&self) -> &'static str {
        match self {
            CommandError::FileOp(e) => e.title(),
            CommandError::UnknownCommand(_) => "TerMan is shocked",
        }
    }
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::FileOp(e) => write!(f, "{e}"),
            CommandError::UnknownCommand(verb) => {
                write!(f, "Error: Command '{verb}' not found")
            }
        }
    }
}

impl std::error::Error for CommandError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CommandError::FileOp(e) => Some(e),
            CommandError::UnknownCommand(_) => None,
        }
    }
}

impl From<FileOpError> for CommandError {
    fn from(e: FileOpError) -> Self {
        CommandError::FileOp(e)
    }
}

pub fn help_text() -> String {
    HELP_LINES.join("\n")
}

/// Run a parsed command with `working_dir` as the base for relative paths.
pub fn execute(command: &Command, working_dir: &Path) -> Result<Outcome, CommandError> {
    debug!("Executing {:?} in {}", command, working_dir.display());
    match command {
        Command::Quit => Ok(Outcome::Quit),
        Command::Help => Ok(Outcome::Help(help_text())),
        Command::Unknown(verb) => Err(CommandError::UnknownCommand(verb.clone())),
        Command::FileOp { verb, args } => Ok(run_file_op(*verb, args, working_dir)?),
    }
}

fn run_file_op(verb: Verb, args: &[String], cwd: &Path) -> Result<Outcome, FileOpError> {
    let name = verb.name();
    match verb {
        Verb::Touch => {
            let [file] = file_ops::required_args::<1>(name, args)?;
            file_ops::touch(cwd, file)?;
        }
        Verb::Rm => {
            let [file] = file_ops::required_args::<1>(name, args)?;
            file_ops::remove(cwd, file)?;
        }
        Verb::Mkdir => {
            let [dir] = file_ops::required_args::<1>(name, args)?;
            file_ops::make_dir(cwd, dir)?;
        }
        Verb::Rmdir => {
            let [dir] = file_ops::required_args::<1>(name, args)?;
            file_ops::remove_dir(cwd, dir)?;
        }
        Verb::Cd => {
            let [dir] = file_ops::required_args::<1>(name, args)?;
            return Ok(Outcome::ChangedDir(file_ops::change_dir(cwd, dir)?));
        }
        Verb::Cp => {
            let [src, dst] = file_ops::required_args::<2>(name, args)?;
            file_ops::copy(cwd, src, dst)?;
        }
        Verb::Mv => {
            let [src, dst] = file_ops::required_args::<2>(name, args)?;
            file_ops::move_entry(cwd, src, dst)?;
        }
    }
    Ok(Outcome::Done)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn run(line: &str, cwd: &Path) -> Result<Outcome, CommandError> {
        let command = Command::parse(line).expect("non-blank command");
        execute(&command, cwd)
    }

    #[test]
    fn test_parse_blank_is_none() {
        assert_eq!(Command::parse(""), None);
        assert_eq!(Command::parse("   \t "), None);
    }

    #[test]
    fn test_parse_quit_family() {
        for line in ["q", "Q", "quit", "exit"] {
            assert_eq!(Command::parse(line), Some(Command::Quit), "{line}");
        }
        // only the quit family ignores case
        assert_eq!(Command::parse("QUIT"), Some(Command::Unknown("QUIT".into())));
        assert_eq!(Command::parse("Touch a"), Some(Command::Unknown("Touch".into())));
    }

    #[test]
    fn test_parse_collapses_whitespace() {
        assert_eq!(
            Command::parse("  cp   a.txt\tb.txt "),
            Some(Command::FileOp {
                verb: Verb::Cp,
                args: vec!["a.txt".into(), "b.txt".into()],
            })
        );
    }

    #[test]
    fn test_unknown_command_names_verb() {
        let dir = tempdir().unwrap();
        let err = run("frobnicate now", dir.path()).unwrap_err();
        assert_eq!(err.title(), "TerMan is shocked");
        assert_eq!(err.to_string(), "Error: Command 'frobnicate' not found");
    }

    #[test]
    fn test_zero_arguments_never_touch_the_filesystem() {
        let dir = tempdir().unwrap();
        for verb in ["touch", "rm", "mkdir", "rmdir", "cd", "cp", "mv"] {
            let err = run(verb, dir.path()).unwrap_err();
            assert!(
                matches!(err, CommandError::FileOp(FileOpError::MissingArgument { .. })),
                "{verb}: {err:?}"
            );
            assert_eq!(err.title(), "TerMan is angry");
        }
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_two_argument_verbs_with_one_argument() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a"), "x").unwrap();
        let err = run("mv a", dir.path()).unwrap_err();
        assert_eq!(err.to_string(), "Error: Command 'mv' requires two arguments");
        assert!(dir.path().join("a").exists());
    }

    #[test]
    fn test_help_lists_every_command() {
        let dir = tempdir().unwrap();
        let Outcome::Help(text) = run("help", dir.path()).unwrap() else {
            panic!("expected help outcome");
        };
        for verb in ["touch", "rm", "mkdir", "rmdir", "cd", "cp", "mv", "q/Q/quit/exit"] {
            assert!(text.contains(verb), "help is missing {verb}");
        }
        assert_eq!(text.lines().count(), HELP_LINES.len());
    }

    #[test]
    fn test_cd_returns_changed_dir() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("inner")).unwrap();
        assert_eq!(
            run("cd inner", dir.path()).unwrap(),
            Outcome::ChangedDir(dir.path().join("inner"))
        );
    }

    #[test]
    fn test_file_verbs_end_to_end() {
        let dir = tempdir().unwrap();
        let cwd = dir.path();

        assert_eq!(run("touch notes.md", cwd).unwrap(), Outcome::Done);
        assert_eq!(run("mkdir archive", cwd).unwrap(), Outcome::Done);
        assert_eq!(run("cp notes.md copy.md", cwd).unwrap(), Outcome::Done);
        assert_eq!(run("mv copy.md archive", cwd).unwrap(), Outcome::Done);
        assert!(cwd.join("archive/copy.md").is_file());

        assert_eq!(run("rm archive/copy.md", cwd).unwrap(), Outcome::Done);
        assert_eq!(run("rmdir archive", cwd).unwrap(), Outcome::Done);
        assert!(!cwd.join("archive").exists());
        assert!(cwd.join("notes.md").is_file());
    }
}
