//! Store configuration.

/// Default database URL when no connection string is supplied.
///
/// Points at a local file-backed SQLite database, created on first use.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://quotes.db?mode=rwc";

/// Configuration for the SQLite store.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// SQLite connection string
    pub database_url: String,
    /// Upper bound on pooled connections
    pub max_connections: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: 5,
        }
    }
}
