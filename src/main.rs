//! celeb-directory binary entry point.
//!
//! Parses the command line, sets up file logging, loads the dataset, then runs
//! the TUI in raw mode and restores the terminal on exit.
//!
use celeb_directory::app::{self, AppState};
use celeb_directory::error::{Context, Result};
use celeb_directory::{age, data};
use chrono::NaiveDate;
use clap::Parser;
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "celeb-directory",
    version,
    about = "Browse, search and edit a directory of profile cards"
)]
struct Cli {
    /// JSON dataset to load instead of the bundled one.
    #[arg(long, env = "CELEB_DIRECTORY_DATA")]
    data: Option<PathBuf>,

    /// Directory for theme.conf and keybinds.conf.
    #[arg(long, env = "CELEB_DIRECTORY_CONFIG_DIR")]
    config_dir: Option<PathBuf>,

    /// Log file (defaults to celeb-directory.log in the config directory).
    #[arg(long, env = "CELEB_DIRECTORY_LOG")]
    log_file: Option<PathBuf>,

    /// Pin "today" (YYYY-MM-DD) for age calculations.
    #[arg(long, value_parser = parse_today)]
    today: Option<NaiveDate>,
}

fn parse_today(s: &str) -> std::result::Result<NaiveDate, String> {
    age::parse_dob(s).ok_or_else(|| format!("expected YYYY-MM-DD, got {s:?}"))
}

fn init_logging(path: &std::path::Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_ctx(|| format!("create log dir {}", parent.display()))?;
    }
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_ctx(|| format!("open log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(log_file)
        .with_ansi(false)
        .init();
    Ok(())
}

/// Initialize a Crossterm-backed `ratatui` terminal in raw mode.
fn init_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_dir = cli.config_dir.clone().unwrap_or_else(app::default_config_dir);
    let log_path = cli
        .log_file
        .clone()
        .unwrap_or_else(|| config_dir.join("celeb-directory.log"));
    init_logging(&log_path)?;

    let users = data::load_users(cli.data.as_deref())?;
    let mut state = AppState::new(users, cli.today.unwrap_or_else(age::local_today));
    state.today_pinned = cli.today.is_some();
    app::load_config(&mut state, &config_dir);

    let mut terminal = init_terminal().map_err(|e| format!("init terminal: {}", e))?;

    let res = app::run(&mut terminal, &mut state);

    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    if let Err(err) = res {
        tracing::error!(error = %err, "application error");
        eprintln!("application error: {err}");
    }
    Ok(())
}
