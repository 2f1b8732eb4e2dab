//! Store configuration.

use std::path::PathBuf;

/// Environment variable overriding the database location.
pub const DB_PATH_ENV: &str = "STRATA_DB_PATH";

/// Default database file when nothing else is configured.
pub const DEFAULT_DB_PATH: &str = "strata.db";

/// Busy timeout applied to every connection (ms).
pub const BUSY_TIMEOUT_MS: u64 = 5_000;

/// Where and how the store opens its backing database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Database file path.
    pub path: PathBuf,
}

impl StoreConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Resolve the path from `STRATA_DB_PATH`, falling back to
    /// [`DEFAULT_DB_PATH`] in the working directory.
    pub fn from_env() -> Self {
        let path = std::env::var(DB_PATH_ENV).unwrap_or_else(|_| DEFAULT_DB_PATH.to_string());
        Self::new(path)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DB_PATH)
    }
}

// ============================================================================
// TESTS
// ============================================================================
