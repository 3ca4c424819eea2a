use std::{future::Future, time::Duration};

use serde::de::DeserializeOwned;
use url::Url;

use crate::{ApiError, ApiResult, Endpoint};

/// Issues one GET for an endpoint and decodes the JSON body.
pub trait Transport: Send + Sync {
    fn get_json<T>(&self, endpoint: Endpoint) -> impl Future<Output = ApiResult<T>> + Send
    where
        T: DeserializeOwned + Send;
}

/// `reqwest`-backed transport against a live API.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout: Duration) -> ApiResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("employee-posts/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ApiError::Client)?;
        Self::with_client(client, base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> ApiResult<Self> {
        let mut base_url = Url::parse(base_url.trim())?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

impl Transport for HttpTransport {
    async fn get_json<T>(&self, endpoint: Endpoint) -> ApiResult<T>
    where
        T: DeserializeOwned + Send,
    {
        let url = endpoint.url(&self.base_url)?;
        tracing::debug!(%url, "GET");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| ApiError::Transport { endpoint, source })?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                endpoint,
                status: status.as_u16(),
            });
        }
        let body = response
            .bytes()
            .await
            .map_err(|source| ApiError::Transport { endpoint, source })?;
        serde_json::from_slice(&body).map_err(|source| ApiError::Decode { endpoint, source })
    }
}
