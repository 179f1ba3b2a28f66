use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Date-scoped to-do tracker with sub-tasks and per-task time tracking.
/// Storage defaults to ~/.todoforme/todoforme-data.json or a path passed via --db.
#[derive(Parser)]
#[command(name = "tdf", version, about = "Daily to-do tracker with time tracking")]
pub struct Cli {
    /// Path to the JSON data file.
    #[arg(long, global = true, env = "TODOFORME_DB")]
    pub db: Option<PathBuf>,

    /// Print machine-readable JSON instead of tables.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}
