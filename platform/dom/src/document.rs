use crate::{
    DomError, DomResult, Selector, html,
    node::{Element, Node, NodeId, NodeKind},
};

/// Arena-backed document. Slots of removed subtrees are recycled, so ids of
/// nodes removed through [`Document::clear_children`] or
/// [`Document::set_text_content`] must not be used afterwards.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Option<Node>>,
    free: Vec<usize>,
    root: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            nodes: vec![Some(Node::new(NodeKind::Document))],
            free: Vec::new(),
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    fn insert(&mut self, kind: NodeKind) -> NodeId {
        let node = Node::new(kind);
        match self.free.pop() {
            Some(slot) => {
                self.nodes[slot] = Some(node);
                NodeId(slot)
            }
            None => {
                self.nodes.push(Some(node));
                NodeId(self.nodes.len() - 1)
            }
        }
    }

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.insert(NodeKind::Element(Element::new(tag)))
    }

    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.insert(NodeKind::Text(text.to_string()))
    }

    pub fn create_fragment(&mut self) -> NodeId {
        self.insert(NodeKind::Fragment)
    }

    /// Creates a detached element holding `text` as its only child. An empty
    /// `text` leaves the element without children.
    pub fn create_text_element(&mut self, tag: &str, text: &str) -> NodeId {
        let element = self.create_element(tag);
        if !text.is_empty() {
            let text_node = self.create_text(text);
            self.link(element, text_node);
        }
        element
    }

    pub(crate) fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0).and_then(Option::as_mut)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match &self.node(id)?.kind {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match &mut self.node_mut(id)?.kind {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Like [`Document::element_mut`] but reports why the node is unusable.
    pub fn try_element_mut(&mut self, id: NodeId) -> DomResult<&mut Element> {
        if !self.contains(id) {
            return Err(DomError::UnknownNode(id));
        }
        self.element_mut(id).ok_or(DomError::NotAnElement(id))
    }


    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or_default()
    }

    pub fn element_children(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|child| self.element(*child).is_some())
            .collect()
    }

    fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    fn link(&mut self, parent: NodeId, child: NodeId) {
        if let Some(node) = self.node_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.node_mut(parent) {
            node.children.push(child);
        }
    }

    fn unlink(&mut self, child: NodeId) {
        let Some(parent) = self.parent(child) else {
            return;
        };
        if let Some(node) = self.node_mut(parent) {
            node.children.retain(|candidate| *candidate != child);
        }
        if let Some(node) = self.node_mut(child) {
            node.parent = None;
        }
    }

    /// Appends `child` under `parent`, moving it from any previous parent.
    /// Appending a fragment moves the fragment's children instead and
    /// releases the fragment, so its id is dead afterwards.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        let parent_kind = &self.node(parent).ok_or(DomError::UnknownNode(parent))?.kind;
        let parent_accepts = !matches!(parent_kind, NodeKind::Text(_));
        let child_kind = &self.node(child).ok_or(DomError::UnknownNode(child))?.kind;
        let child_is_document = matches!(child_kind, NodeKind::Document);
        let child_is_fragment = matches!(child_kind, NodeKind::Fragment);
        if !parent_accepts || child_is_document || self.is_inclusive_ancestor(child, parent) {
            return Err(DomError::Hierarchy { parent, child });
        }

        if child_is_fragment {
            let moved = self
                .node_mut(child)
                .map(|n| std::mem::take(&mut n.children))
                .unwrap_or_default();
            for grandchild in moved {
                if let Some(node) = self.node_mut(grandchild) {
                    node.parent = None;
                }
                self.link(parent, grandchild);
            }
            self.release(child);
        } else {
            self.unlink(child);
            self.link(parent, child);
        }
        Ok(child)
    }

    pub fn append_children(&mut self, parent: NodeId, children: &[NodeId]) -> DomResult<()> {
        for child in children {
            self.append_child(parent, *child)?;
        }
        Ok(())
    }

    /// Removes every child of `parent` and recycles the removed subtrees.
    /// Returns how many direct children were removed.
    pub fn clear_children(&mut self, parent: NodeId) -> DomResult<usize> {
        let removed = self
            .node_mut(parent)
            .map(|n| std::mem::take(&mut n.children))
            .ok_or(DomError::UnknownNode(parent))?;
        let count = removed.len();
        for child in removed {
            self.release(child);
        }
        Ok(count)
    }

    fn release(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.get_mut(current.0).and_then(Option::take) {
                stack.extend(node.children);
                self.free.push(current.0);
            }
        }
    }

    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.node(id) else {
            return;
        };
        match &node.kind {
            NodeKind::Text(text) => out.push_str(text),
            _ => {
                for child in &node.children {
                    self.collect_text(*child, out);
                }
            }
        }
    }

    /// Replaces the element's children with a single text node, or with
    /// nothing when `text` is empty.
    pub fn set_text_content(&mut self, id: NodeId, text: &str) -> DomResult<()> {
        self.try_element_mut(id)?;
        self.clear_children(id)?;
        if !text.is_empty() {
            let text_node = self.create_text(text);
            self.link(id, text_node);
        }
        Ok(())
    }

    /// Element descendants of `scope` in document order, excluding `scope`.
    pub fn descendants(&self, scope: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(scope).iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            if self.element(current).is_some() {
                out.push(current);
            }
            stack.extend(self.children(current).iter().rev().copied());
        }
        out
    }

    pub fn select_all(&self, scope: NodeId, selector: &Selector) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|id| self.element(*id).is_some_and(|el| selector.matches(el)))
            .collect()
    }

    pub fn select_first(&self, scope: NodeId, selector: &Selector) -> Option<NodeId> {
        self.select_all(scope, selector).into_iter().next()
    }

    /// First connected element matching `selector`.
    pub fn query(&self, selector: &Selector) -> Option<NodeId> {
        self.select_first(self.root, selector)
    }

    /// Serializes the node (or, for documents and fragments, its children).
    pub fn to_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        html::write_node(self, id, &mut out);
        out
    }

    /// Number of live nodes, including the document root.
    pub fn live_nodes(&self) -> usize {
        self.nodes.iter().filter(|slot| slot.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(doc: &mut Document) -> NodeId {
        let body = doc.create_element("body");
        let root = doc.root();
        doc.append_child(root, body).unwrap();
        body
    }

    #[test]
    fn text_element_skips_empty_text() {
        let mut doc = Document::new();
        let empty = doc.create_text_element("p", "");
        assert!(doc.children(empty).is_empty());
        let filled = doc.create_text_element("p", "hello");
        assert_eq!(doc.text_content(filled), "hello");
    }

    #[test]
    fn appending_fragment_moves_children_in_order() {
        let mut doc = Document::new();
        let body = body(&mut doc);
        let fragment = doc.create_fragment();
        let first = doc.create_text_element("p", "one");
        let second = doc.create_text_element("p", "two");
        doc.append_children(fragment, &[first, second]).unwrap();

        doc.append_child(body, fragment).unwrap();

        assert_eq!(doc.children(body), &[first, second]);
        assert!(!doc.contains(fragment));
        assert_eq!(doc.parent(first), Some(body));
    }

    #[test]
    fn appended_fragments_do_not_accumulate() {
        let mut doc = Document::new();
        let body = body(&mut doc);
        let mut counts = Vec::new();
        for round in 0..5 {
            doc.clear_children(body).unwrap();
            let fragment = doc.create_fragment();
            let p = doc.create_text_element("p", &round.to_string());
            doc.append_child(fragment, p).unwrap();
            doc.append_child(body, fragment).unwrap();
            counts.push(doc.live_nodes());
        }
        assert!(counts.windows(2).all(|pair| pair[0] == pair[1]), "{counts:?}");
    }

    #[test]
    fn append_rejects_cycles() {
        let mut doc = Document::new();
        let outer = doc.create_element("div");
        let inner = doc.create_element("div");
        doc.append_child(outer, inner).unwrap();
        assert_eq!(
            doc.append_child(inner, outer),
            Err(DomError::Hierarchy {
                parent: inner,
                child: outer
            })
        );
    }

    #[test]
    fn query_ignores_detached_nodes() {
        let mut doc = Document::new();
        let body = body(&mut doc);
        let detached = doc.create_element("section");
        doc.element_mut(detached).unwrap().set_data("postId", "1");
        let selector = Selector::tag("section").with_data("postId", 1);
        assert_eq!(doc.query(&selector), None);

        doc.append_child(body, detached).unwrap();
        assert_eq!(doc.query(&selector), Some(detached));
    }

    #[test]
    fn clear_children_recycles_slots() {
        let mut doc = Document::new();
        let body = body(&mut doc);
        for n in 0..3 {
            let p = doc.create_text_element("p", &n.to_string());
            doc.append_child(body, p).unwrap();
        }
        let before = doc.live_nodes();
        assert_eq!(doc.clear_children(body).unwrap(), 3);
        assert_eq!(doc.live_nodes(), before - 6);

        let reused = doc.create_element("p");
        assert!(reused.0 < before);
    }

    #[test]
    fn set_text_content_replaces_children() {
        let mut doc = Document::new();
        let button = doc.create_text_element("button", "Show Comments");
        doc.set_text_content(button, "Hide Comments").unwrap();
        assert_eq!(doc.text_content(button), "Hide Comments");
        assert_eq!(doc.children(button).len(), 1);
    }

    #[test]
    fn serializes_attributes_in_name_order() {
        let mut doc = Document::new();
        let body = body(&mut doc);
        let section = doc.create_text_element("section", "a & b");
        {
            let el = doc.element_mut(section).unwrap();
            el.set_data("postId", "4");
            el.set_class_name("comments hide");
        }
        doc.append_child(body, section).unwrap();
        let select = doc.create_element("select");
        doc.element_mut(select).unwrap().set_disabled(true);
        doc.append_child(body, select).unwrap();

        assert_eq!(
            doc.to_html(doc.root()),
            "<body><section class=\"comments hide\" data-post-id=\"4\">a &amp; b</section>\
             <select disabled></select></body>"
        );
    }

    #[test]
    fn descendants_are_in_document_order() {
        let mut doc = Document::new();
        let body = body(&mut doc);
        let article = doc.create_element("article");
        let h2 = doc.create_text_element("h2", "t");
        let p = doc.create_text_element("p", "b");
        doc.append_children(article, &[h2, p]).unwrap();
        let button = doc.create_element("button");
        doc.append_children(body, &[article, button]).unwrap();

        assert_eq!(doc.descendants(body), vec![article, h2, p, button]);
        assert_eq!(doc.select_all(body, &Selector::tag("p")), vec![p]);
    }
}
