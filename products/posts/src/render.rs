//! Post list rendering: one article per post with author info and a
//! comment panel.

use entity::{Comment, Post, User};
use platform_api::{Gateway, Transport};
use platform_dom::{Document, DomResult, NodeId};
use tracing::{debug, instrument};

use crate::{
    PLACEHOLDER_CLASS, PLACEHOLDER_TEXT, POST_ID_KEY, SHOW_COMMENTS,
    comments::{build_comment_article, build_comment_section},
    elements::build_text_element,
};

/// What [`render_posts`] inserted into the container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    Posts(Vec<NodeId>),
    Placeholder(NodeId),
}

impl Rendered {
    pub fn articles(&self) -> &[NodeId] {
        match self {
            Rendered::Posts(articles) => articles,
            Rendered::Placeholder(_) => &[],
        }
    }
}

/// A fragment holding one article per comment.
pub fn build_comments_fragment(
    doc: &mut Document,
    comments: Option<&[Comment]>,
) -> DomResult<Option<NodeId>> {
    let Some(comments) = comments else {
        return Ok(None);
    };
    let fragment = doc.create_fragment();
    for comment in comments {
        let article = build_comment_article(doc, comment)?;
        doc.append_child(fragment, article)?;
    }
    Ok(Some(fragment))
}

fn author_lines(author: Option<&User>) -> (String, String) {
    match author {
        Some(author) => (
            format!("Author: {} with {}", author.name, author.company.name),
            author.company.catch_phrase.clone(),
        ),
        None => ("Author: unknown".to_string(), String::new()),
    }
}

async fn build_post_article<T: Transport>(
    doc: &mut Document,
    gateway: &Gateway<T>,
    post: &Post,
) -> DomResult<NodeId> {
    let article = doc.create_element("article");
    let title = build_text_element(doc, "h2", &post.title, None);
    let body = build_text_element(doc, "p", &post.body, None);
    let id_line = build_text_element(doc, "p", &format!("Post ID: {}", post.id), None);

    let author = gateway.fetch_user(post.user_id).await.into_entity();
    let (author_line, catch_phrase) = author_lines(author.as_ref());
    let author_line = build_text_element(doc, "p", &author_line, None);
    let catch_phrase = build_text_element(doc, "p", &catch_phrase, None);

    let button = build_text_element(doc, "button", SHOW_COMMENTS, None);
    doc.try_element_mut(button)?
        .set_data(POST_ID_KEY, post.id.to_string());

    let section = build_comment_section(doc, gateway, post.id).await?;

    doc.append_children(
        article,
        &[title, body, id_line, author_line, catch_phrase, button],
    )?;
    if let Some(section) = section {
        doc.append_child(article, section)?;
    }
    Ok(article)
}

/// Builds the articles for `posts` one post at a time, so author and comment
/// requests are issued in post order.
pub async fn build_posts_fragment<T: Transport>(
    doc: &mut Document,
    gateway: &Gateway<T>,
    posts: Option<&[Post]>,
) -> DomResult<Option<NodeId>> {
    let Some(posts) = posts else {
        return Ok(None);
    };
    let fragment = doc.create_fragment();
    for post in posts {
        let article = build_post_article(doc, gateway, post).await?;
        doc.append_child(fragment, article)?;
    }
    Ok(Some(fragment))
}

/// Appends the posts to `container`, or the placeholder paragraph when there
/// are none.
#[instrument(name = "posts.render", skip_all, fields(posts = posts.map_or(0, <[Post]>::len)))]
pub async fn render_posts<T: Transport>(
    doc: &mut Document,
    gateway: &Gateway<T>,
    container: NodeId,
    posts: Option<&[Post]>,
) -> DomResult<Rendered> {
    let non_empty = posts.filter(|posts| !posts.is_empty());
    if let Some(fragment) = build_posts_fragment(doc, gateway, non_empty).await? {
        let articles = doc.children(fragment).to_vec();
        doc.append_child(container, fragment)?;
        debug!(articles = articles.len(), "posts rendered");
        return Ok(Rendered::Posts(articles));
    }
    let placeholder = build_text_element(doc, "p", PLACEHOLDER_TEXT, Some(PLACEHOLDER_CLASS));
    doc.append_child(container, placeholder)?;
    Ok(Rendered::Placeholder(placeholder))
}

#[cfg(test)]
mod tests {
    use super::*;
    use entity::Company;
    use platform_api::{Endpoint, FixtureTransport, Fixtures};

    fn fixtures() -> Fixtures {
        Fixtures {
            users: vec![User {
                id: 2,
                name: "Ervin Howell".into(),
                company: Company {
                    name: "Deckow-Crist".into(),
                    catch_phrase: "Proactive didactic contingency".into(),
                },
                ..User::default()
            }],
            posts: vec![post(11, 2, "et ea vero"), post(12, 2, "in quibusdam")],
            comments: vec![Comment {
                id: 51,
                post_id: 11,
                name: "molestias".into(),
                body: "ut dolorum".into(),
                email: "Emma@joanny.ca".into(),
            }],
        }
    }

    fn post(id: u64, user_id: u64, title: &str) -> Post {
        Post {
            id,
            user_id,
            title: title.into(),
            body: format!("body of {id}"),
        }
    }

    fn container(doc: &mut Document) -> NodeId {
        let main = doc.create_element("main");
        let root = doc.root();
        doc.append_child(root, main).unwrap();
        main
    }

    #[tokio::test]
    async fn article_lines_are_in_document_order() {
        let mut doc = Document::new();
        let gateway = Gateway::new(FixtureTransport::new(fixtures()));
        let posts = [post(11, 2, "et ea vero")];
        let fragment = build_posts_fragment(&mut doc, &gateway, Some(&posts[..]))
            .await
            .unwrap()
            .unwrap();

        let article = doc.element_children(fragment)[0];
        let children = doc.element_children(article);
        let tags: Vec<&str> = children
            .iter()
            .map(|node| doc.element(*node).unwrap().tag())
            .collect();
        assert_eq!(tags, ["h2", "p", "p", "p", "p", "button", "section"]);
        assert_eq!(doc.text_content(children[2]), "Post ID: 11");
        assert_eq!(doc.text_content(children[3]), "Author: Ervin Howell with Deckow-Crist");
        assert_eq!(doc.text_content(children[4]), "Proactive didactic contingency");
        assert_eq!(doc.text_content(children[5]), SHOW_COMMENTS);
        assert_eq!(doc.element(children[5]).unwrap().data(POST_ID_KEY), Some("11"));
        assert_eq!(doc.element_children(children[6]).len(), 1);
    }

    #[tokio::test]
    async fn requests_are_sequential_per_post() {
        let mut doc = Document::new();
        let gateway = Gateway::new(FixtureTransport::new(fixtures()));
        let posts = [post(11, 2, "a"), post(12, 2, "b")];
        build_posts_fragment(&mut doc, &gateway, Some(&posts[..]))
            .await
            .unwrap();
        assert_eq!(
            gateway.transport().requests(),
            vec![
                Endpoint::User(2),
                Endpoint::PostComments(11),
                Endpoint::User(2),
                Endpoint::PostComments(12),
            ]
        );
    }

    #[tokio::test]
    async fn missing_author_keeps_article_shape() {
        let mut doc = Document::new();
        let gateway = Gateway::new(FixtureTransport::new(fixtures()));
        let posts = [post(13, 99, "orphan")];
        let fragment = build_posts_fragment(&mut doc, &gateway, Some(&posts[..]))
            .await
            .unwrap()
            .unwrap();
        let article = doc.element_children(fragment)[0];
        let children = doc.element_children(article);
        assert_eq!(children.len(), 7);
        assert_eq!(doc.text_content(children[3]), "Author: unknown");
        assert!(doc.children(children[4]).is_empty());
    }

    #[tokio::test]
    async fn empty_and_absent_posts_render_placeholder() {
        for posts in [None, Some(&[][..])] {
            let mut doc = Document::new();
            let main = container(&mut doc);
            let gateway = Gateway::new(FixtureTransport::new(fixtures()));

            let rendered = render_posts(&mut doc, &gateway, main, posts).await.unwrap();

            let Rendered::Placeholder(node) = rendered else {
                panic!("expected placeholder, got {rendered:?}");
            };
            assert_eq!(doc.children(main), &[node]);
            assert_eq!(doc.text_content(node), PLACEHOLDER_TEXT);
            assert_eq!(doc.element(node).unwrap().class_name(), PLACEHOLDER_CLASS);
            assert_eq!(gateway.transport().request_count(), 0);
        }
    }

    #[tokio::test]
    async fn two_posts_render_two_articles_in_order() {
        let mut doc = Document::new();
        let main = container(&mut doc);
        let gateway = Gateway::new(FixtureTransport::new(fixtures()));
        let posts = [post(12, 2, "second"), post(11, 2, "first")];

        let rendered = render_posts(&mut doc, &gateway, main, Some(&posts[..]))
            .await
            .unwrap();

        assert_eq!(rendered.articles(), doc.children(main));
        let titles: Vec<String> = rendered
            .articles()
            .iter()
            .map(|article| doc.text_content(doc.element_children(*article)[0]))
            .collect();
        assert_eq!(titles, ["second", "first"]);
    }

    #[test]
    fn comments_fragment_is_absent_without_comments() {
        let mut doc = Document::new();
        assert_eq!(build_comments_fragment(&mut doc, None).unwrap(), None);
        let fragment = build_comments_fragment(&mut doc, Some(fixtures().comments.as_slice()))
            .unwrap()
            .unwrap();
        assert_eq!(doc.element_children(fragment).len(), 1);
        assert!(doc.to_html(fragment).starts_with("<article><h3>"));
    }
}
