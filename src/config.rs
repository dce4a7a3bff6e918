//! Runtime configuration read from the environment.

use anyhow::{Context, Result};
use std::path::PathBuf;

pub const DB_PATH_VAR: &str = "FINARC_DB";
pub const USER_VAR: &str = "FINARC_USER";
pub const LOG_FILTER_VAR: &str = "RUST_LOG";

const DEFAULT_USER_ID: i64 = 1;
const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub db_path: PathBuf,
    /// User whose budgets the command line operates on.
    pub user_id: i64,
    pub log_filter: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let db_path = match var(DB_PATH_VAR).filter(|p| !p.is_empty()) {
            Some(path) => PathBuf::from(path),
            None => default_db_path()?,
        };

        let user_id = match var(USER_VAR) {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("{USER_VAR} must be a user ID, got '{raw}'"))?,
            None => DEFAULT_USER_ID,
        };

        let log_filter = var(LOG_FILTER_VAR)
            .filter(|f| !f.is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Ok(Self {
            db_path,
            user_id,
            log_filter,
        })
    }
}

fn default_db_path() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "finarc", "Finarc")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    Ok(data_dir.join("finarc.db"))
}
