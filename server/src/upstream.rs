use anyhow::{Context, Result};
use platform_api::{
    ApiResult, Endpoint, FixtureTransport, Fixtures, HttpTransport, Transport,
};
use serde::de::DeserializeOwned;
use tracing::info;

use crate::config::AppConfig;

/// Where the page reads its data from: the live API or a fixture file.
#[derive(Clone, Debug)]
pub enum Upstream {
    Http(HttpTransport),
    Fixture(FixtureTransport),
}

impl Upstream {
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        if let Some(path) = &config.fixtures {
            let fixtures = Fixtures::from_path(path)
                .with_context(|| format!("failed to load fixtures {}", path.display()))?;
            info!(path = %path.display(), users = fixtures.users.len(), "using fixture upstream");
            return Ok(Upstream::Fixture(FixtureTransport::new(fixtures)));
        }
        let transport = HttpTransport::new(&config.api_base_url, config.request_timeout)
            .with_context(|| format!("invalid POSTS_API_BASE_URL {}", config.api_base_url))?;
        info!(base_url = %transport.base_url(), "using http upstream");
        Ok(Upstream::Http(transport))
    }
}

impl Transport for Upstream {
    async fn get_json<T>(&self, endpoint: Endpoint) -> ApiResult<T>
    where
        T: DeserializeOwned + Send,
    {
        match self {
            Upstream::Http(transport) => transport.get_json(endpoint).await,
            Upstream::Fixture(transport) => transport.get_json(endpoint).await,
        }
    }
}
