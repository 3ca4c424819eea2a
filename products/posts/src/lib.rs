//! The employee posts page.
//!
//! [`Page`] owns the document, the gateway and the listener registry. Event
//! delivery is explicit: [`Page::dispatch_change`] for the employee dropdown
//! and [`Page::dispatch_click`] for comment toggle buttons.

pub mod comments;
pub mod elements;
pub mod listeners;
pub mod page;
pub mod render;

pub use comments::{Lookup, ToggleOutcome};
pub use listeners::{ListenerRegistry, ToggleBinding};
pub use page::{ChangeEvent, ClickEvent, InitReport, Page, RefreshReport, SelectionReport};
pub use render::Rendered;

/// Dataset key tagging post buttons and comment sections.
pub const POST_ID_KEY: &str = "postId";
pub const SHOW_COMMENTS: &str = "Show Comments";
pub const HIDE_COMMENTS: &str = "Hide Comments";
pub const HIDE_CLASS: &str = "hide";
pub const PLACEHOLDER_TEXT: &str = "Select an Employee to display their posts.";
pub const PLACEHOLDER_CLASS: &str = "default-text";
pub const SELECT_MENU_ID: &str = "selectMenu";
