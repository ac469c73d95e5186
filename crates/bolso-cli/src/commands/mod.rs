//! Command implementations
//!
//! Shared helpers live here; each command family has its own submodule.

pub mod budget;
pub mod import;
pub mod recurring;
pub mod serve;
pub mod status;
pub mod transactions;

// Re-export command functions for main.rs
pub use budget::*;
pub use import::*;
pub use recurring::*;
pub use serve::*;
pub use status::*;
pub use transactions::*;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Datelike, Utc};

use bolso_core::db::Database;
use bolso_core::models::MonthRef;

/// Resolve the database path: explicit flag, or the platform data dir
pub fn resolve_db_path(explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path);
    }

    let data_dir = dirs::data_local_dir()
        .context("Could not determine the platform data directory; pass --db")?
        .join("bolso");
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create {}", data_dir.display()))?;

    Ok(data_dir.join("bolso.db"))
}

/// Open the database
pub fn open_db(path: &Path) -> Result<Database> {
    Database::new(&path.to_string_lossy())
        .with_context(|| format!("Failed to open database at {}", path.display()))
}

/// Parse a "YYYY-MM" argument, defaulting to the current month
pub fn parse_month_arg(arg: Option<&str>) -> Result<MonthRef> {
    match arg {
        Some(raw) => {
            let (year, month) = raw
                .split_once('-')
                .with_context(|| format!("Invalid month {} (use YYYY-MM)", raw))?;
            let year: i32 = year
                .parse()
                .with_context(|| format!("Invalid year in {}", raw))?;
            let month: u32 = month
                .parse()
                .with_context(|| format!("Invalid month in {}", raw))?;
            if !(1..=12).contains(&month) {
                anyhow::bail!("Month must be 1-12 (got {})", month);
            }
            Ok(MonthRef::new(year, month))
        }
        None => {
            let today = Utc::now().date_naive();
            Ok(MonthRef::new(today.year(), today.month()))
        }
    }
}
