use std::{
    collections::HashSet,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, PoisonError},
};

use entity::{Comment, Post, User};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use thiserror::Error;

use crate::{ApiError, ApiResult, Endpoint, Transport};

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("failed to read fixtures from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid fixture json: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Records served by [`FixtureTransport`], shaped like the live API.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Fixtures {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub posts: Vec<Post>,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl Fixtures {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| FixtureError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, FixtureError> {
        Ok(serde_json::from_str(raw)?)
    }

    fn answer(&self, endpoint: Endpoint) -> ApiResult<Value> {
        let encoded = match endpoint {
            Endpoint::Users => serde_json::to_value(&self.users),
            Endpoint::UserPosts(user_id) => serde_json::to_value(
                self.posts
                    .iter()
                    .filter(|post| post.user_id == user_id)
                    .collect::<Vec<_>>(),
            ),
            Endpoint::User(user_id) => match self.users.iter().find(|user| user.id == user_id) {
                Some(user) => serde_json::to_value(user),
                None => return Err(ApiError::Missing(endpoint)),
            },
            Endpoint::PostComments(post_id) => serde_json::to_value(
                self.comments
                    .iter()
                    .filter(|comment| comment.post_id == post_id)
                    .collect::<Vec<_>>(),
            ),
        };
        encoded.map_err(|source| ApiError::Decode { endpoint, source })
    }
}

#[derive(Debug, Default)]
struct RequestLog {
    requests: Mutex<Vec<Endpoint>>,
    failing: Mutex<HashSet<Endpoint>>,
}

/// In-memory transport answering from [`Fixtures`]. Clones share the request
/// log, so a clone kept by a test observes requests made through the page.
#[derive(Clone, Debug)]
pub struct FixtureTransport {
    fixtures: Arc<Fixtures>,
    log: Arc<RequestLog>,
}

impl FixtureTransport {
    pub fn new(fixtures: Fixtures) -> Self {
        Self {
            fixtures: Arc::new(fixtures),
            log: Arc::default(),
        }
    }

    /// Makes every later request for `endpoint` fail with a 503.
    pub fn fail(&self, endpoint: Endpoint) {
        self.log
            .failing
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(endpoint);
    }

    pub fn requests(&self) -> Vec<Endpoint> {
        self.log
            .requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn request_count(&self) -> usize {
        self.log
            .requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn fixtures(&self) -> &Fixtures {
        &self.fixtures
    }

    fn record(&self, endpoint: Endpoint) -> bool {
        self.log
            .requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(endpoint);
        self.log
            .failing
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&endpoint)
    }
}

impl Transport for FixtureTransport {
    async fn get_json<T>(&self, endpoint: Endpoint) -> ApiResult<T>
    where
        T: DeserializeOwned + Send,
    {
        if self.record(endpoint) {
            return Err(ApiError::Status {
                endpoint,
                status: 503,
            });
        }
        let value = self.fixtures.answer(endpoint)?;
        serde_json::from_value(value).map_err(|source| ApiError::Decode { endpoint, source })
    }
}
