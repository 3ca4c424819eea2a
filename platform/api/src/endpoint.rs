use std::fmt;

use url::Url;

/// The four read-only resources the page reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Users,
    UserPosts(u64),
    User(u64),
    PostComments(u64),
}

impl Endpoint {
    pub fn path(&self) -> String {
        match self {
            Endpoint::Users => "users".to_string(),
            Endpoint::UserPosts(_) => "posts".to_string(),
            Endpoint::User(id) => format!("users/{id}"),
            Endpoint::PostComments(_) => "comments".to_string(),
        }
    }

    pub fn query(&self) -> Option<(&'static str, u64)> {
        match self {
            Endpoint::UserPosts(user_id) => Some(("userId", *user_id)),
            Endpoint::PostComments(post_id) => Some(("postId", *post_id)),
            Endpoint::Users | Endpoint::User(_) => None,
        }
    }

    /// Resolves against `base`, which must end with a slash.
    pub fn url(&self, base: &Url) -> Result<Url, url::ParseError> {
        let mut url = base.join(&self.path())?;
        if let Some((key, value)) = self.query() {
            url.query_pairs_mut().append_pair(key, &value.to_string());
        }
        Ok(url)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.path())?;
        if let Some((key, value)) = self.query() {
            write!(f, "?{key}={value}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_follow_api_layout() {
        let base = Url::parse("https://jsonplaceholder.typicode.com/").unwrap();
        assert_eq!(
            Endpoint::UserPosts(3).url(&base).unwrap().as_str(),
            "https://jsonplaceholder.typicode.com/posts?userId=3"
        );
        assert_eq!(
            Endpoint::User(7).url(&base).unwrap().as_str(),
            "https://jsonplaceholder.typicode.com/users/7"
        );
        assert_eq!(
            Endpoint::PostComments(11).url(&base).unwrap().as_str(),
            "https://jsonplaceholder.typicode.com/comments?postId=11"
        );
    }

    #[test]
    fn base_path_is_kept() {
        let base = Url::parse("http://127.0.0.1:9000/api/").unwrap();
        assert_eq!(
            Endpoint::Users.url(&base).unwrap().as_str(),
            "http://127.0.0.1:9000/api/users"
        );
    }

    #[test]
    fn display_reads_like_a_request_line() {
        assert_eq!(Endpoint::PostComments(2).to_string(), "/comments?postId=2");
        assert_eq!(Endpoint::Users.to_string(), "/users");
    }
}
