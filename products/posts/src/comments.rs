//! Per-post comment panels and the toggle button that shows or hides them.

use entity::Comment;
use platform_api::{Gateway, Transport};
use platform_dom::{Document, DomResult, NodeId, Selector};
use tracing::debug;

use crate::{
    HIDE_CLASS, HIDE_COMMENTS, POST_ID_KEY, SHOW_COMMENTS, elements::build_text_element,
    page::ClickEvent, render::build_comments_fragment,
};

/// Result of looking an element up by post id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    /// No post id was given; nothing was looked up.
    Absent,
    /// The post id is not tagged on any connected element.
    NotFound,
    Found(NodeId),
}

impl Lookup {
    pub fn found(self) -> Option<NodeId> {
        match self {
            Lookup::Found(node) => Some(node),
            Lookup::Absent | Lookup::NotFound => None,
        }
    }
}

/// Both halves of a toggle click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleOutcome {
    pub section: Lookup,
    pub button: Lookup,
}

/// One `<article>` per comment: name, body and sender.
pub fn build_comment_article(doc: &mut Document, comment: &Comment) -> DomResult<NodeId> {
    let article = doc.create_element("article");
    let name = build_text_element(doc, "h3", &comment.name, None);
    let body = build_text_element(doc, "p", &comment.body, None);
    let from = build_text_element(doc, "p", &format!("From: {}", comment.email), None);
    doc.append_children(article, &[name, body, from])?;
    Ok(article)
}

/// Builds the hidden `<section class="comments hide">` for a post and fills
/// it with the post's comments. `None` when `post_id` is 0.
pub async fn build_comment_section<T: Transport>(
    doc: &mut Document,
    gateway: &Gateway<T>,
    post_id: u64,
) -> DomResult<Option<NodeId>> {
    if post_id == 0 {
        return Ok(None);
    }
    let section = doc.create_element("section");
    if let Some(element) = doc.element_mut(section) {
        element.set_data(POST_ID_KEY, post_id.to_string());
        element.add_class("comments");
        element.add_class(HIDE_CLASS);
    }
    let comments = gateway
        .fetch_post_comments(post_id)
        .await
        .into_items()
        .unwrap_or_default();
    if let Some(fragment) = build_comments_fragment(doc, Some(comments.as_slice()))? {
        doc.append_child(section, fragment)?;
    }
    debug!(post_id, comments = comments.len(), "comment section built");
    Ok(Some(section))
}

fn tagged(tag: &str, post_id: u64) -> Selector {
    Selector::tag(tag).with_data(POST_ID_KEY, post_id)
}

pub fn toggle_section_visibility(doc: &mut Document, post_id: u64) -> Lookup {
    if post_id == 0 {
        return Lookup::Absent;
    }
    let Some(section) = doc.query(&tagged("section", post_id)) else {
        return Lookup::NotFound;
    };
    if let Some(element) = doc.element_mut(section) {
        element.toggle_class(HIDE_CLASS);
    }
    Lookup::Found(section)
}

pub fn toggle_button_label(doc: &mut Document, post_id: u64) -> DomResult<Lookup> {
    if post_id == 0 {
        return Ok(Lookup::Absent);
    }
    let Some(button) = doc.query(&tagged("button", post_id)) else {
        return Ok(Lookup::NotFound);
    };
    let label = if doc.text_content(button) == SHOW_COMMENTS {
        HIDE_COMMENTS
    } else {
        SHOW_COMMENTS
    };
    doc.set_text_content(button, label)?;
    Ok(Lookup::Found(button))
}

/// Click handler bound to a toggle button.
pub fn on_toggle_click(
    doc: &mut Document,
    event: Option<&ClickEvent>,
    post_id: u64,
) -> DomResult<Option<ToggleOutcome>> {
    if post_id == 0 {
        return Ok(None);
    }
    if let Some(event) = event {
        debug!(button = %event.target, post_id, "toggle click");
    }
    let section = toggle_section_visibility(doc, post_id);
    let button = toggle_button_label(doc, post_id)?;
    Ok(Some(ToggleOutcome { section, button }))
}
