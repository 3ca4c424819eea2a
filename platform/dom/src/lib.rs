//! Headless document model used to build and mutate the posts page.
//!
//! Nodes live in an arena owned by [`Document`] and are addressed by
//! [`NodeId`]. Fragments behave like DOM document fragments: appending one
//! moves its children into the new parent and frees the fragment itself.

mod document;
mod html;
mod node;
mod selector;

use thiserror::Error;

pub use document::Document;
pub use html::{escape_attr, escape_text};
pub use node::{Element, NodeId, dataset_attr_name};
pub use selector::Selector;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomError {
    #[error("node {0} does not exist")]
    UnknownNode(NodeId),
    #[error("node {0} is not an element")]
    NotAnElement(NodeId),
    #[error("cannot insert node {child} under {parent}")]
    Hierarchy { parent: NodeId, child: NodeId },
}

pub type DomResult<T> = Result<T, DomError>;
