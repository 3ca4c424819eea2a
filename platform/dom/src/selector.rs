use std::fmt;

use crate::node::{Element, dataset_attr_name};

/// A compound selector: tag and `data-*` constraints that must all hold on
/// one element, such as `section[data-post-id="3"]`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selector {
    tag: Option<String>,
    data: Vec<(String, Option<String>)>,
}

impl Selector {
    pub fn tag(tag: &str) -> Self {
        Self {
            tag: Some(tag.to_ascii_lowercase()),
            ..Self::default()
        }
    }

    /// Requires `data-{key}` to equal `value`.
    pub fn with_data(mut self, key: &str, value: impl ToString) -> Self {
        self.data
            .push((dataset_attr_name(key), Some(value.to_string())));
        self
    }

    /// Requires `data-{key}` to be present with any value.
    pub fn has_data(mut self, key: &str) -> Self {
        self.data.push((dataset_attr_name(key), None));
        self
    }

    pub fn matches(&self, element: &Element) -> bool {
        if let Some(tag) = &self.tag {
            if element.tag() != tag {
                return false;
            }
        }
        self.data.iter().all(|(name, expected)| match expected {
            Some(value) => element.attr(name) == Some(value.as_str()),
            None => element.attr(name).is_some(),
        })
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut wrote = false;
        if let Some(tag) = &self.tag {
            f.write_str(tag)?;
            wrote = true;
        }
        for (name, value) in &self.data {
            match value {
                Some(value) => write!(f, "[{name}=\"{value}\"]")?,
                None => write!(f, "[{name}]")?,
            }
            wrote = true;
        }
        if !wrote {
            f.write_str("*")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_constraint_matches_exact_value() {
        let mut button = Element::new("button");
        button.set_data("postId", "12");
        assert!(Selector::tag("button").with_data("postId", 12).matches(&button));
        assert!(!Selector::tag("button").with_data("postId", 1).matches(&button));
        assert!(!Selector::tag("section").has_data("postId").matches(&button));
    }

    #[test]
    fn displays_as_css() {
        let selector = Selector::tag("section").with_data("postId", 3);
        assert_eq!(selector.to_string(), "section[data-post-id=\"3\"]");
        assert_eq!(Selector::default().to_string(), "*");
    }
}
