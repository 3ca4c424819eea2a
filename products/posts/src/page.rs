//! Page controller: employee dropdown, post list refresh and event delivery.

use entity::{Post, User};
use platform_api::{Gateway, Transport};
use platform_dom::{Document, DomResult, NodeId, Selector};
use tracing::{debug, info, instrument};

use crate::{
    HIDE_CLASS, PLACEHOLDER_CLASS, PLACEHOLDER_TEXT, POST_ID_KEY, SELECT_MENU_ID,
    comments::{ToggleOutcome, on_toggle_click},
    elements::{build_select_options, build_text_element},
    listeners::{ListenerRegistry, attach_toggle_listeners, detach_toggle_listeners},
    render::{Rendered, render_posts},
};

const DEFAULT_USER_ID: u64 = 1;

/// A `change` on the employee dropdown carrying the selected option value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub value: String,
}

impl ChangeEvent {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// Selected user id; unparsable or zero values select employee 1.
    pub fn user_id(&self) -> u64 {
        self.value
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|id| *id != 0)
            .unwrap_or(DEFAULT_USER_ID)
    }
}

/// A `click` delivered to a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickEvent {
    pub target: NodeId,
}

#[derive(Debug)]
pub struct InitReport {
    pub users: Vec<User>,
    pub options: Vec<NodeId>,
}

#[derive(Debug)]
pub struct RefreshReport {
    pub detached: Vec<NodeId>,
    pub cleared: usize,
    pub rendered: Rendered,
    pub attached: Vec<NodeId>,
}

#[derive(Debug)]
pub struct SelectionReport {
    pub user_id: u64,
    pub posts: Vec<Post>,
    pub refresh: RefreshReport,
}

/// The whole page: document, upstream gateway and click listeners.
///
/// Refreshes take `&mut self`, so two refreshes of one page never overlap.
/// The dropdown is still marked disabled while a refresh runs, which is what
/// a rendered snapshot shows.
#[derive(Debug)]
pub struct Page<T> {
    document: Document,
    gateway: Gateway<T>,
    listeners: ListenerRegistry,
    select: NodeId,
    main: NodeId,
    change_handler: bool,
}

impl<T: Transport> Page<T> {
    /// Builds the host document: a header with the employee dropdown and a
    /// `<main>` holding the placeholder paragraph.
    pub fn new(gateway: Gateway<T>) -> DomResult<Self> {
        let mut document = Document::new();
        let root = document.root();

        let header = document.create_element("header");
        let heading = build_text_element(&mut document, "h1", "Employee Posts", None);
        let label = build_text_element(&mut document, "label", "Select an Employee", None);
        document.try_element_mut(label)?.set_attr("for", SELECT_MENU_ID);
        let select = document.create_element("select");
        document.try_element_mut(select)?.set_attr("id", SELECT_MENU_ID);
        document.append_children(header, &[heading, label, select])?;

        let main = document.create_element("main");
        let placeholder =
            build_text_element(&mut document, "p", PLACEHOLDER_TEXT, Some(PLACEHOLDER_CLASS));
        document.append_child(main, placeholder)?;
        document.append_children(root, &[header, main])?;

        let mut page = Self {
            document,
            gateway,
            listeners: ListenerRegistry::default(),
            select,
            main,
            change_handler: false,
        };
        page.reset_select_menu()?;
        Ok(page)
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn gateway(&self) -> &Gateway<T> {
        &self.gateway
    }

    pub fn listeners(&self) -> &ListenerRegistry {
        &self.listeners
    }

    pub fn main(&self) -> NodeId {
        self.main
    }

    pub fn select_menu(&self) -> NodeId {
        self.select
    }

    pub fn is_select_disabled(&self) -> bool {
        self.document
            .element(self.select)
            .is_some_and(|select| select.is_disabled())
    }

    pub fn to_html(&self) -> String {
        self.document.to_html(self.document.root())
    }

    pub fn main_html(&self) -> String {
        self.document.to_html(self.main)
    }

    fn reset_select_menu(&mut self) -> DomResult<()> {
        self.document.clear_children(self.select)?;
        let prompt = build_text_element(&mut self.document, "option", "Employees", None);
        self.document.try_element_mut(prompt)?.set_attr("value", "");
        self.document.append_child(self.select, prompt)?;
        Ok(())
    }

    /// Loads the employees into the dropdown and starts handling `change`.
    #[instrument(name = "page.initialize", skip(self))]
    pub async fn initialize(&mut self) -> DomResult<InitReport> {
        let users = self
            .gateway
            .fetch_users()
            .await
            .into_items()
            .unwrap_or_default();
        let options = self.populate_select_menu(Some(users.as_slice()))?.unwrap_or_default();
        self.change_handler = true;
        info!(employees = users.len(), "page initialized");
        Ok(InitReport { users, options })
    }

    /// Replaces the dropdown options with one option per user.
    pub fn populate_select_menu(&mut self, users: Option<&[User]>) -> DomResult<Option<Vec<NodeId>>> {
        let Some(users) = users else {
            return Ok(None);
        };
        self.reset_select_menu()?;
        let options = build_select_options(&mut self.document, Some(users)).unwrap_or_default();
        self.document.append_children(self.select, &options)?;
        Ok(Some(options))
    }

    /// Delivers a dropdown change. Ignored until [`Page::initialize`] has
    /// registered the handler.
    pub async fn dispatch_change(
        &mut self,
        value: impl Into<String>,
    ) -> DomResult<Option<SelectionReport>> {
        if !self.change_handler {
            debug!("change ignored: page not initialized");
            return Ok(None);
        }
        let event = ChangeEvent::new(value);
        self.on_selection_change(Some(&event)).await
    }

    #[instrument(name = "page.selection_change", skip(self))]
    pub async fn on_selection_change(
        &mut self,
        event: Option<&ChangeEvent>,
    ) -> DomResult<Option<SelectionReport>> {
        let Some(event) = event else {
            return Ok(None);
        };
        let user_id = event.user_id();
        self.mark_selected(user_id);
        self.set_select_disabled(true);

        let posts = self
            .gateway
            .fetch_user_posts(user_id)
            .await
            .into_items()
            .unwrap_or_default();
        let refresh = self.refresh_with(&posts).await;

        self.set_select_disabled(false);
        let refresh = refresh?;
        info!(user_id, posts = posts.len(), "posts refreshed");
        Ok(Some(SelectionReport {
            user_id,
            posts,
            refresh,
        }))
    }

    fn set_select_disabled(&mut self, disabled: bool) {
        if let Some(select) = self.document.element_mut(self.select) {
            select.set_disabled(disabled);
        }
    }

    fn mark_selected(&mut self, user_id: u64) {
        let wanted = user_id.to_string();
        for option in self.document.element_children(self.select) {
            if let Some(option) = self.document.element_mut(option) {
                if option.value() == Some(wanted.as_str()) {
                    option.set_attr("selected", "");
                } else {
                    option.remove_attr("selected");
                }
            }
        }
    }

    /// Detaches listeners, clears `<main>`, renders `posts` and reattaches.
    /// `None` when `posts` is absent; an empty list renders the placeholder.
    pub async fn refresh(&mut self, posts: Option<&[Post]>) -> DomResult<Option<RefreshReport>> {
        match posts {
            Some(posts) => self.refresh_with(posts).await.map(Some),
            None => Ok(None),
        }
    }

    async fn refresh_with(&mut self, posts: &[Post]) -> DomResult<RefreshReport> {
        let detached = detach_toggle_listeners(&self.document, self.main, &mut self.listeners);
        let cleared = self.document.clear_children(self.main)?;
        let rendered =
            render_posts(&mut self.document, &self.gateway, self.main, Some(posts)).await?;
        let attached = attach_toggle_listeners(&self.document, self.main, &mut self.listeners);
        debug!(live_nodes = self.document.live_nodes(), "main refreshed");
        Ok(RefreshReport {
            detached,
            cleared,
            rendered,
            attached,
        })
    }

    /// Delivers a click to `target`. Only buttons holding a binding react.
    pub fn dispatch_click(&mut self, target: NodeId) -> DomResult<Option<ToggleOutcome>> {
        let Some(binding) = self.listeners.binding(target) else {
            debug!(%target, "click on node without listener");
            return Ok(None);
        };
        on_toggle_click(
            &mut self.document,
            Some(&ClickEvent { target }),
            binding.post_id,
        )
    }

    /// The toggle button rendered for `post_id`, if any.
    pub fn post_button(&self, post_id: u64) -> Option<NodeId> {
        let selector = Selector::tag("button").with_data(POST_ID_KEY, post_id);
        self.document.select_first(self.main, &selector)
    }

    pub fn post_section(&self, post_id: u64) -> Option<NodeId> {
        let selector = Selector::tag("section").with_data(POST_ID_KEY, post_id);
        self.document.select_first(self.main, &selector)
    }

    /// Clicks the toggle button of `post_id`.
    pub fn click_post(&mut self, post_id: u64) -> DomResult<Option<ToggleOutcome>> {
        match self.post_button(post_id) {
            Some(button) => self.dispatch_click(button),
            None => Ok(None),
        }
    }

    pub fn comments_hidden(&self, post_id: u64) -> Option<bool> {
        let section = self.post_section(post_id)?;
        self.document
            .element(section)
            .map(|section| section.has_class(HIDE_CLASS))
    }

    pub fn button_label(&self, post_id: u64) -> Option<String> {
        self.post_button(post_id)
            .map(|button| self.document.text_content(button))
    }
}
