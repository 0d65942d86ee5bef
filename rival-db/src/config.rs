//! Connection configuration, read from the environment.

use tracing::warn;

pub const URL_VAR: &str = "DATABASE_URL";
pub const MAX_CONNECTIONS_VAR: &str = "DATABASE_MAX_CONNECTIONS";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Settings used by [`Database::connect`](crate::Database::connect) to pick a backend.
///
/// A missing or empty `url` selects the in-memory fallback.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

impl DatabaseConfig {
    /// Loads `.env` if present, then reads `DATABASE_URL` and `DATABASE_MAX_CONNECTIONS`.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        let url = std::env::var(URL_VAR).ok();
        let max_connections = match std::env::var(MAX_CONNECTIONS_VAR) {
            Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
                warn!(
                    value = %raw,
                    "invalid {MAX_CONNECTIONS_VAR}, using {DEFAULT_MAX_CONNECTIONS}"
                );
                DEFAULT_MAX_CONNECTIONS
            }),
            Err(_) => DEFAULT_MAX_CONNECTIONS,
        };

        Self {
            url,
            max_connections,
        }
    }

    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Default::default()
        }
    }

    /// The connection string, if one is configured and non-empty.
    pub fn database_url(&self) -> Option<&str> {
        self.url.as_deref().map(str::trim).filter(|url| !url.is_empty())
    }
}
