use std::{collections::BTreeMap, fmt};

/// Handle to a node inside a [`crate::Document`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) kind: NodeKind,
}

#[derive(Debug, Clone)]
pub(crate) enum NodeKind {
    Document,
    Fragment,
    Element(Element),
    Text(String),
}

impl Node {
    pub(crate) fn new(kind: NodeKind) -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: String,
    attrs: BTreeMap<String, String>,
}

impl Element {
    pub(crate) fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attrs: BTreeMap::new(),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn attrs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attrs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        self.attrs.insert(name.to_string(), value.into());
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        self.attrs.remove(name)
    }

    pub fn value(&self) -> Option<&str> {
        self.attr("value")
    }

    pub fn class_name(&self) -> &str {
        self.attr("class").unwrap_or_default()
    }

    pub fn set_class_name(&mut self, class_name: &str) {
        let tokens = class_tokens(class_name);
        self.store_classes(&tokens);
    }

    pub fn has_class(&self, class_name: &str) -> bool {
        self.class_name().split_whitespace().any(|c| c == class_name)
    }

    pub fn add_class(&mut self, class_name: &str) {
        let mut classes = class_tokens(self.class_name());
        if !classes.iter().any(|name| name == class_name) {
            classes.push(class_name.to_string());
        }
        self.store_classes(&classes);
    }

    pub fn remove_class(&mut self, class_name: &str) {
        let mut classes = class_tokens(self.class_name());
        classes.retain(|name| name != class_name);
        self.store_classes(&classes);
    }

    /// Returns whether the class is present after the toggle.
    pub fn toggle_class(&mut self, class_name: &str) -> bool {
        if self.has_class(class_name) {
            self.remove_class(class_name);
            false
        } else {
            self.add_class(class_name);
            true
        }
    }

    /// Reads a `data-*` attribute. Accepts `postId` or `post-id`.
    pub fn data(&self, key: &str) -> Option<&str> {
        self.attr(&dataset_attr_name(key))
    }

    pub fn set_data(&mut self, key: &str, value: impl Into<String>) {
        self.set_attr(&dataset_attr_name(key), value);
    }

    pub fn is_disabled(&self) -> bool {
        self.attrs.contains_key("disabled")
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        if disabled {
            self.set_attr("disabled", "");
        } else {
            self.remove_attr("disabled");
        }
    }

    fn store_classes(&mut self, classes: &[String]) {
        if classes.is_empty() {
            self.attrs.remove("class");
        } else {
            self.attrs.insert("class".to_string(), classes.join(" "));
        }
    }
}

fn class_tokens(class_attr: &str) -> Vec<String> {
    class_attr
        .split_whitespace()
        .map(ToOwned::to_owned)
        .collect()
}

/// Maps a dataset key to its attribute name: `postId` and `post-id` both
/// become `data-post-id`.
pub fn dataset_attr_name(key: &str) -> String {
    let mut out = String::from("data-");
    for ch in key.chars() {
        if ch.is_ascii_uppercase() {
            out.push('-');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}
