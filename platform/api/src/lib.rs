//! Read-only access to the posts API.
//!
//! [`Gateway`] owns the four operations the page needs and turns every
//! failure into a [`FetchOutcome::Failed`]; callers collapse outcomes to the
//! "no data" fallback with [`FetchOutcome::into_items`] or
//! [`FetchOutcome::into_entity`]. The wire is abstracted by [`Transport`].

mod endpoint;
mod fixture;
mod gateway;
mod transport;

use thiserror::Error;

pub use endpoint::Endpoint;
pub use fixture::{FixtureError, FixtureTransport, Fixtures};
pub use gateway::{FetchOutcome, Gateway};
pub use transport::{HttpTransport, Transport};

/// Shared result type for transport calls.
pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid api url: {0}")]
    Url(#[from] url::ParseError),
    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: Endpoint,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} answered with status {status}")]
    Status { endpoint: Endpoint, status: u16 },
    #[error("could not decode {endpoint}: {source}")]
    Decode {
        endpoint: Endpoint,
        #[source]
        source: serde_json::Error,
    },
    #[error("no fixture record for {0}")]
    Missing(Endpoint),
}

