//! Markup helpers over the kuchiki tree
//!
//! Every caller parses into its own fresh tree, so nothing here is shared
//! between classifications.

use kuchiki::traits::*;
use kuchiki::NodeRef;

/// Tag name, class attribute and shape of one element, detached from the tree
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ElementInfo {
    /// Lower-cased tag name
    pub tag: String,
    /// Raw `class` attribute, empty when absent
    pub class: String,
    /// Whether the element has at least one element child
    pub has_element_children: bool,
}

impl ElementInfo {
    /// Describe an element by tag and class alone
    pub fn new(tag: &str, class: &str) -> Self {
        Self {
            tag: tag.to_lowercase(),
            class: class.to_string(),
            has_element_children: false,
        }
    }

    /// Read the description off a tree node; `None` for non-elements
    pub fn of(node: &NodeRef) -> Option<Self> {
        let el = node.as_element()?;
        let class = el
            .attributes
            .borrow()
            .get("class")
            .map(|s| s.to_string())
            .unwrap_or_default();
        Some(Self {
            tag: el.name.local.to_lowercase(),
            class,
            has_element_children: node.children().elements().next().is_some(),
        })
    }
}

/// Parse a fragment and return its synthetic wrapper root.
///
/// The fragment is parsed inside a `<div>` so that several top-level siblings
/// form one tree. Content that a stray closing tag pushed out of the wrapper
/// is moved back in.
pub fn parse_fragment(html: &str) -> NodeRef {
    let document = kuchiki::parse_html().one(format!("<div>{html}</div>"));
    let Some(body) = document
        .descendants()
        .elements()
        .find(|el| el.name.local.as_ref() == "body")
    else {
        return document;
    };
    let body = body.as_node().clone();

    let Some(root) = body.children().elements().next() else {
        return body;
    };
    let root = root.as_node().clone();

    let strays: Vec<NodeRef> = root.following_siblings().collect();
    for stray in strays {
        stray.detach();
        root.append(stray);
    }
    root
}

/// Serialize the children of a node, without the node itself
pub fn inner_html(node: &NodeRef) -> String {
    node.children().map(|child| child.to_string()).collect()
}

/// Whether an element carries the given attribute
pub fn has_attribute(node: &NodeRef, name: &str) -> bool {
    node.as_element()
        .map(|el| el.attributes.borrow().contains(name))
        .unwrap_or(false)
}

/// Value of an attribute on an element
pub fn attribute_value(node: &NodeRef, name: &str) -> Option<String> {
    node.as_element()
        .and_then(|el| el.attributes.borrow().get(name).map(str::to_string))
}

/// The first top-level element of a fragment
pub fn root_element(html: &str) -> Option<NodeRef> {
    parse_fragment(html)
        .children()
        .elements()
        .next()
        .map(|el| el.as_node().clone())
}

/// Set `name="true"` unless the attribute is already present.
///
/// Returns whether the element changed.
pub fn mark_attribute(node: &NodeRef, name: &str) -> bool {
    let Some(el) = node.as_element() else {
        return false;
    };
    let mut attributes = el.attributes.borrow_mut();
    if attributes.contains(name) {
        return false;
    }
    attributes.insert(name, "true".to_string());
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fragment_keeps_top_level_siblings() {
        let root = parse_fragment("<h1>a</h1><p>b</p>");
        let tags: Vec<String> = root
            .children()
            .elements()
            .map(|el| el.name.local.to_lowercase())
            .collect();
        assert_eq!(tags, vec!["h1", "p"]);
    }

    #[test]
    fn test_parse_fragment_recovers_stray_close() {
        let root = parse_fragment("<p>a</p></div><p>b</p>");
        assert_eq!(root.children().elements().count(), 2);
        assert!(inner_html(&root).contains("<p>b</p>"));
    }

    #[test]
    fn test_element_info_reads_class() {
        let root = parse_fragment(r#"<DIV class="ebay-gallery"><img></DIV>"#);
        let first = root.children().elements().next().unwrap();
        let info = ElementInfo::of(first.as_node()).unwrap();
        assert_eq!(info.tag, "div");
        assert_eq!(info.class, "ebay-gallery");
        assert!(info.has_element_children);
    }

    #[test]
    fn test_mark_attribute_is_idempotent() {
        let root = parse_fragment("<span>x</span>");
        let span = root.children().elements().next().unwrap();
        assert!(mark_attribute(span.as_node(), "data-editable"));
        assert!(!mark_attribute(span.as_node(), "data-editable"));
        assert_eq!(inner_html(&root).matches("data-editable").count(), 1);
    }

    #[test]
    fn test_root_element_attribute() {
        let root = root_element(r#"text <p data-x="1"><b data-y="2">b</b></p><i></i>"#).unwrap();
        assert_eq!(attribute_value(&root, "data-x").as_deref(), Some("1"));
        assert_eq!(attribute_value(&root, "data-y"), None);
        assert!(root_element("only text").is_none());
    }
}
