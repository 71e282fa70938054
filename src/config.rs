//! Service configuration, read from the environment with defaults.

use std::env;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_LABEL_MAX_LEN: usize = 50;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub bind_addr: String,
    /// Source paths longer than this are shortened in rendered citation lists.
    pub label_max_len: usize,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            bind_addr: env::var("CITATIONS_BIND").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
            label_max_len: env::var("CITATION_LABEL_MAX_LEN")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_LABEL_MAX_LEN),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            label_max_len: DEFAULT_LABEL_MAX_LEN,
        }
    }
}
