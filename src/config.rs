use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub db_path: String,
    pub port: u16,
    pub max_request_size: usize,
    /// Persist a per-user match cursor after each match query. Off by
    /// default; the read side of pagination no longer exists.
    pub match_cursor_enabled: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            db_path: env::var("DB_PATH").unwrap_or_else(|_| "./data/matchbook.db".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3030),
            max_request_size: env::var("MAX_REQUEST_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1024 * 1024), // 1MB default
            match_cursor_enabled: env::var("MATCH_CURSOR")
                .map(|v| v != "0" && !v.is_empty())
                .unwrap_or(false),
        }
    }
}
