//! Process arguments for the board driver.

use assignboard_core::{BoardConfig, DEFAULT_CATALOG_SIZE, DEFAULT_HISTORY_LIMIT};
use clap::{Parser, ValueHint};
use std::path::PathBuf;

pub const DEFAULT_DB_PATH: &str = "assignboard.sqlite3";

#[derive(Parser, Debug)]
#[command(name = "assignboard")]
#[command(version, about = "Assign pool items to groups at a prompt", long_about = None)]
pub struct Cli {
    /// SQLite snapshot file; created when missing
    #[arg(default_value = DEFAULT_DB_PATH, value_hint = ValueHint::FilePath)]
    pub db_path: PathBuf,

    /// Absolute directory for rolling log files; logging is off when unset
    #[arg(long, env = "ASSIGNBOARD_LOG_DIR", value_hint = ValueHint::DirPath)]
    pub log_dir: Option<String>,

    /// Undo steps kept for one session
    #[arg(long, default_value_t = DEFAULT_HISTORY_LIMIT)]
    pub history_limit: usize,

    /// Placeholder items seeded into a board that has no snapshot
    #[arg(long, default_value_t = DEFAULT_CATALOG_SIZE)]
    pub catalog_size: usize,
}

impl Cli {
    pub fn board_config(&self) -> BoardConfig {
        BoardConfig {
            history_limit: self.history_limit,
            catalog_size: self.catalog_size,
        }
        .normalized()
    }
}
