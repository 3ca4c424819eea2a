use crate::{
    Document,
    node::{NodeId, NodeKind},
};

const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input", "link", "meta"];
const BOOLEAN_ATTRS: &[&str] = &["disabled", "hidden", "selected"];

pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

pub fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            _ => out.push(ch),
        }
    }
    out
}

pub(crate) fn write_node(doc: &Document, node_id: NodeId, out: &mut String) {
    let Some(node) = doc.node(node_id) else {
        return;
    };
    match &node.kind {
        NodeKind::Document | NodeKind::Fragment => {
            for child in &node.children {
                write_node(doc, *child, out);
            }
        }
        NodeKind::Text(text) => out.push_str(&escape_text(text)),
        NodeKind::Element(element) => {
            out.push('<');
            out.push_str(element.tag());
            for (name, value) in element.attrs() {
                out.push(' ');
                out.push_str(name);
                if !(value.is_empty() && BOOLEAN_ATTRS.contains(&name)) {
                    out.push_str("=\"");
                    out.push_str(&escape_attr(value));
                    out.push('"');
                }
            }
            out.push('>');
            if VOID_ELEMENTS.contains(&element.tag()) {
                return;
            }
            for child in &node.children {
                write_node(doc, *child, out);
            }
            out.push_str("</");
            out.push_str(element.tag());
            out.push('>');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_and_attributes_are_escaped() {
        assert_eq!(escape_text("a < b & c"), "a &lt; b &amp; c");
        assert_eq!(escape_attr("say \"hi\""), "say &quot;hi&quot;");
    }
}
