use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};

const DEFAULT_API_BASE_URL: &str = "https://jsonplaceholder.typicode.com";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api_base_url: String,
    pub request_timeout: Duration,
    pub fixtures: Option<PathBuf>,
    pub cors_allowed_origins: Vec<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_base_url = lookup("POSTS_API_BASE_URL")
            .map(|val| val.trim().to_string())
            .filter(|val| !val.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.into());

        let timeout_secs = match lookup("POSTS_API_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("invalid POSTS_API_TIMEOUT_SECS {raw:?}"))?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let fixtures = lookup("POSTS_FIXTURES")
            .filter(|val| !val.trim().is_empty())
            .map(PathBuf::from);

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|| "http://localhost:5173".into())
            .split(',')
            .filter_map(|s| {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            })
            .collect::<Vec<_>>();

        Ok(Self {
            api_base_url,
            request_timeout: Duration::from_secs(timeout_secs),
            fixtures,
            cors_allowed_origins,
        })
    }
}
