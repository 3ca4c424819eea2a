use entity::{Comment, Post, User};
use serde::de::DeserializeOwned;
use tracing::{instrument, warn};

use crate::{ApiError, Endpoint, Transport};

/// Result of a gateway call.
///
/// `Skipped` means the identifier was falsy and no request was made;
/// `Failed` means a request was made and produced no usable data.
#[derive(Debug)]
pub enum FetchOutcome<T> {
    Skipped,
    Fetched(T),
    Failed(ApiError),
}

impl<T> FetchOutcome<T> {
    pub fn is_skipped(&self) -> bool {
        matches!(self, FetchOutcome::Skipped)
    }

    pub fn fetched(self) -> Option<T> {
        match self {
            FetchOutcome::Fetched(value) => Some(value),
            FetchOutcome::Skipped | FetchOutcome::Failed(_) => None,
        }
    }

    /// Single-entity fallback: anything but a fetched value is `None`.
    pub fn into_entity(self) -> Option<T> {
        self.fetched()
    }
}

impl<T> FetchOutcome<Vec<T>> {
    /// List fallback: `None` when skipped, an empty list when the request
    /// failed.
    pub fn into_items(self) -> Option<Vec<T>> {
        match self {
            FetchOutcome::Skipped => None,
            FetchOutcome::Fetched(items) => Some(items),
            FetchOutcome::Failed(_) => Some(Vec::new()),
        }
    }
}

/// The four read operations the page needs, over any [`Transport`].
#[derive(Clone, Debug)]
pub struct Gateway<T> {
    transport: T,
}

impl<T: Transport> Gateway<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    #[instrument(name = "gateway.fetch_users", skip(self))]
    pub async fn fetch_users(&self) -> FetchOutcome<Vec<User>> {
        self.fetch(Endpoint::Users).await
    }

    #[instrument(name = "gateway.fetch_user_posts", skip(self))]
    pub async fn fetch_user_posts(&self, user_id: u64) -> FetchOutcome<Vec<Post>> {
        if user_id == 0 {
            return FetchOutcome::Skipped;
        }
        self.fetch(Endpoint::UserPosts(user_id)).await
    }

    #[instrument(name = "gateway.fetch_user", skip(self))]
    pub async fn fetch_user(&self, user_id: u64) -> FetchOutcome<User> {
        if user_id == 0 {
            return FetchOutcome::Skipped;
        }
        self.fetch(Endpoint::User(user_id)).await
    }

    #[instrument(name = "gateway.fetch_post_comments", skip(self))]
    pub async fn fetch_post_comments(&self, post_id: u64) -> FetchOutcome<Vec<Comment>> {
        if post_id == 0 {
            return FetchOutcome::Skipped;
        }
        self.fetch(Endpoint::PostComments(post_id)).await
    }

    async fn fetch<R>(&self, endpoint: Endpoint) -> FetchOutcome<R>
    where
        R: DeserializeOwned + Send,
    {
        match self.transport.get_json(endpoint).await {
            Ok(value) => FetchOutcome::Fetched(value),
            Err(error) => {
                warn!(%endpoint, %error, "fetch failed; using fallback");
                FetchOutcome::Failed(error)
            }
        }
    }
}
