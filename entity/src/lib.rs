//! Records returned by the upstream posts API.
//!
//! Field names follow the API's camelCase JSON; optional fields that only some
//! endpoints populate default to empty values instead of failing to decode.

pub mod comments;
pub mod posts;
pub mod users;

pub use comments::Comment;
pub use posts::Post;
pub use users::{Company, User};
