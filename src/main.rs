//! # tdf - TodoForMe
//!
//! A date-scoped to-do tracker with sub-tasks, per-task time tracking,
//! categories and simple statistics, usable as a scripting CLI or an
//! interactive terminal UI.
//!
//! ## Key Features
//!
//! - **Day-scoped lists**: every task belongs to one calendar day
//! - **Sub-tasks**: nest tasks under a parent; deleting a parent removes its subtree
//! - **Time tracking**: starting a task stamps a session, pausing or completing folds
//!   the whole minutes into its total
//! - **Carry-over**: copy yesterday's unfinished top-level work to today
//! - **Categories & stats**: coloured labels, daily/weekly/monthly summaries
//!
//! ## Quick Start
//!
//! ```bash
//! # Launch the terminal UI
//! tdf ui
//!
//! # Add a task for today and start it
//! tdf add "Write weekly report" --category Work
//! tdf start todo_1718000000000_1
//!
//! # Today's list, most worked-on first
//! tdf list --sort work-time --tree
//! ```
//!
//! Data lives in a single JSON document at `~/.todoforme/todoforme-data.json`
//! (override with `--db` or `TODOFORME_DB`). Every change rewrites the file
//! atomically. Set `RUST_LOG=debug` to see what the stores are doing on stderr.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub mod category;
pub mod cli;
pub mod clock;
pub mod cmd;
pub mod db;
pub mod error;
pub mod fields;
pub mod format;
pub mod stats;
pub mod store;
pub mod task;
pub mod tui {
    pub mod app;
    pub mod colors;
    pub mod enums;
    pub mod input;
    pub mod run;
    pub mod utils;
}

use cli::Cli;
use db::DATA_FILE;

fn init_tracing() {
    // Opt-in via RUST_LOG; stdout stays clean for scripts.
    let filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|raw| {
            let raw = raw.trim();
            if raw.is_empty() {
                return None;
            }
            EnvFilter::try_new(raw).ok()
        })
        .unwrap_or_else(|| EnvFilter::new("off"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn default_db_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".todoforme").join(DATA_FILE)
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let db_path = cli.db.unwrap_or_else(default_db_path);
    tracing::debug!(path = %db_path.display(), "using data file");

    if let Err(e) = cmd::run(cli.command, &db_path, cli.json) {
        eprintln!("Error: {e}");
        std::process::exit(e.exit_code());
    }
}
