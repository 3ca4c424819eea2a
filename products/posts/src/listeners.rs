use std::collections::HashMap;

use platform_dom::{Document, NodeId, Selector};
use tracing::debug;

use crate::POST_ID_KEY;

/// Click binding for one toggle button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleBinding {
    pub post_id: u64,
}

/// Click listeners keyed by button node. A button holds at most one binding.
#[derive(Debug, Default)]
pub struct ListenerRegistry {
    bindings: HashMap<NodeId, ToggleBinding>,
}

impl ListenerRegistry {
    /// Binds `button`, returning the binding it replaced.
    pub fn bind(&mut self, button: NodeId, post_id: u64) -> Option<ToggleBinding> {
        self.bindings.insert(button, ToggleBinding { post_id })
    }

    pub fn unbind(&mut self, button: NodeId) -> Option<ToggleBinding> {
        self.bindings.remove(&button)
    }

    pub fn binding(&self, button: NodeId) -> Option<ToggleBinding> {
        self.bindings.get(&button).copied()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn buttons(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.bindings.keys().copied()
    }
}

fn tagged_buttons() -> Selector {
    Selector::tag("button").has_data(POST_ID_KEY)
}

fn tagged_post_id(doc: &Document, button: NodeId) -> Option<u64> {
    doc.element(button)?
        .data(POST_ID_KEY)?
        .parse::<u64>()
        .ok()
        .filter(|post_id| *post_id != 0)
}

/// Binds every post-tagged button under `scope`. Returns the bound buttons.
pub fn attach_toggle_listeners(
    doc: &Document,
    scope: NodeId,
    registry: &mut ListenerRegistry,
) -> Vec<NodeId> {
    let mut attached = Vec::new();
    for button in doc.select_all(scope, &tagged_buttons()) {
        let Some(post_id) = tagged_post_id(doc, button) else {
            continue;
        };
        registry.bind(button, post_id);
        attached.push(button);
    }
    debug!(count = attached.len(), "toggle listeners attached");
    attached
}

/// Unbinds every post-tagged button under `scope` that holds a binding.
/// Returns the unbound buttons.
pub fn detach_toggle_listeners(
    doc: &Document,
    scope: NodeId,
    registry: &mut ListenerRegistry,
) -> Vec<NodeId> {
    let mut detached = Vec::new();
    for button in doc.select_all(scope, &tagged_buttons()) {
        if tagged_post_id(doc, button).is_none() {
            continue;
        }
        if registry.unbind(button).is_some() {
            detached.push(button);
        }
    }
    debug!(count = detached.len(), "toggle listeners detached");
    detached
}

#[cfg(test)]
mod tests {
    use super::*;

    fn main_with_buttons(doc: &mut Document, tags: &[Option<&str>]) -> (NodeId, Vec<NodeId>) {
        let main = doc.create_element("main");
        let root = doc.root();
        doc.append_child(root, main).unwrap();
        let mut buttons = Vec::new();
        for tag in tags {
            let button = doc.create_text_element("button", "Show Comments");
            if let Some(tag) = tag {
                doc.element_mut(button).unwrap().set_data(POST_ID_KEY, *tag);
            }
            doc.append_child(main, button).unwrap();
            buttons.push(button);
        }
        (main, buttons)
    }

    #[test]
    fn only_tagged_buttons_are_bound() {
        let mut doc = Document::new();
        let (main, buttons) = main_with_buttons(&mut doc, &[Some("1"), None, Some("2")]);
        let mut registry = ListenerRegistry::default();

        let attached = attach_toggle_listeners(&doc, main, &mut registry);

        assert_eq!(attached, vec![buttons[0], buttons[2]]);
        assert_eq!(registry.binding(buttons[2]), Some(ToggleBinding { post_id: 2 }));
        assert_eq!(registry.binding(buttons[1]), None);
    }

    #[test]
    fn reattaching_never_duplicates() {
        let mut doc = Document::new();
        let (main, _) = main_with_buttons(&mut doc, &[Some("1"), Some("2")]);
        let mut registry = ListenerRegistry::default();

        attach_toggle_listeners(&doc, main, &mut registry);
        attach_toggle_listeners(&doc, main, &mut registry);
        assert_eq!(registry.len(), 2);

        let detached = detach_toggle_listeners(&doc, main, &mut registry);
        assert_eq!(detached.len(), 2);
        assert!(registry.is_empty());
        assert!(detach_toggle_listeners(&doc, main, &mut registry).is_empty());
    }

    #[test]
    fn buttons_outside_scope_are_ignored() {
        let mut doc = Document::new();
        let (main, _) = main_with_buttons(&mut doc, &[Some("1")]);
        let outside = doc.create_text_element("button", "Other");
        doc.element_mut(outside).unwrap().set_data(POST_ID_KEY, "5");
        let root = doc.root();
        doc.append_child(root, outside).unwrap();
        let mut registry = ListenerRegistry::default();

        attach_toggle_listeners(&doc, main, &mut registry);
        assert_eq!(registry.binding(outside), None);
        assert_eq!(registry.len(), 1);
    }
}
