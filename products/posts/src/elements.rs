use entity::User;
use platform_dom::{Document, NodeId};

/// Creates a detached `tag` element. Text is only set when non-empty and the
/// class only when given.
pub fn build_text_element(
    doc: &mut Document,
    tag: &str,
    text: &str,
    class_name: Option<&str>,
) -> NodeId {
    let node = doc.create_text_element(tag, text);
    if let Some(class_name) = class_name {
        if let Some(element) = doc.element_mut(node) {
            element.set_class_name(class_name);
        }
    }
    node
}

/// One `<option>` per user, in input order.
pub fn build_select_options(doc: &mut Document, users: Option<&[User]>) -> Option<Vec<NodeId>> {
    let users = users?;
    let options = users
        .iter()
        .map(|user| {
            let option = doc.create_text_element("option", &user.name);
            if let Some(element) = doc.element_mut(option) {
                element.set_attr("value", user.id.to_string());
            }
            option
        })
        .collect();
    Some(options)
}
