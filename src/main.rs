use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::{self, File};
use std::path::PathBuf;

use terman::core::config::{self, CliOverrides};

#[derive(Parser)]
#[command(name = "terman", about = "Terminal file manager with a built-in editor")]
struct Args {
    /// Directory to open (defaults to the current directory)
    path: Option<PathBuf>,

    /// Start with hidden files filtered out (Ctrl+H toggles)
    #[arg(long)]
    hide_hidden: bool,

    /// Spaces inserted by Tab in the editor
    #[arg(long)]
    tab_width: Option<usize>,

    /// syntect theme used for highlighting
    #[arg(long)]
    theme: Option<String>,

    /// Seconds a notification stays on screen
    #[arg(long)]
    notification_timeout: Option<u64>,

    /// Where to write the log (defaults to the user cache directory)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> std::io::Result<()> {
    let args = Args::parse();
    let cli = CliOverrides {
        start_dir: args.path,
        hide_hidden: args.hide_hidden,
        tab_width: args.tab_width,
        theme: args.theme,
        notification_timeout: args.notification_timeout,
        log_file: args.log_file,
    };

    // Initialize file logger outside the watched tree so log writes don't
    // show up as filesystem events
    let log_path = config::resolve_log_file(&cli);
    if let Some(parent) = log_path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    if let Ok(log_file) = File::create(&log_path) {
        let _ = WriteLogger::init(level, log_config, log_file);
    }

    let resolved = match config::resolve(&cli) {
        Ok(resolved) => resolved,
        Err(e) => {
            log::error!("Startup failed: {}", e);
            eprintln!("terman: {e}");
            std::process::exit(2);
        }
    };

    log::info!(
        "TerMan starting in {} (log: {})",
        resolved.start_dir.display(),
        log_path.display()
    );

    terman::tui::run(resolved)
}
