//! Read-only queries over a parsed tree

use super::nodes::*;

impl Document {
    /// Every element named `name` (`local` or `ns:local`), in document order
    pub fn find_elements(&self, name: &str) -> Vec<&Element> {
        find_elements(&self.nodes, name)
    }

    /// Every curly tag named `name`, in document order
    pub fn find_curly_tags(&self, name: &str) -> Vec<&CurlyTag> {
        let mut found = Vec::new();
        walk(&self.nodes, &mut |node| {
            if let Node::CurlyTag(tag) = node {
                if tag.name.is_named(name) {
                    found.push(tag);
                }
            }
        });
        found
    }

    /// All text in the document, comments excluded
    pub fn text_content(&self) -> String {
        text_content(&self.nodes)
    }
}

impl Element {
    /// Value of the first keyed attribute named `key`
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        attribute(&self.head.attributes, key)
    }

    /// Text directly under this element
    pub fn inner_text(&self) -> String {
        inner_text(&self.children)
    }

    pub fn text_content(&self) -> String {
        text_content(&self.children)
    }
}

impl CurlyTag {
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        attribute(&self.attributes, key)
    }

    /// Values of the bare attributes, in order
    pub fn positional(&self) -> impl Iterator<Item = &Value> {
        self.attributes
            .iter()
            .filter(|attr| !attr.is_keyed())
            .map(|attr| &attr.value)
    }

    pub fn inner_text(&self) -> String {
        self.children.as_deref().map(inner_text).unwrap_or_default()
    }

    pub fn text_content(&self) -> String {
        self.children.as_deref().map(text_content).unwrap_or_default()
    }
}

/// Elements named `name` anywhere under `nodes`, including inside node-list
/// attribute values
pub fn find_elements<'a>(nodes: &'a [Node], name: &str) -> Vec<&'a Element> {
    let mut found = Vec::new();
    walk(nodes, &mut |node| {
        if let Node::Element(element) = node {
            if element.name().is_named(name) {
                found.push(element);
            }
        }
    });
    found
}

pub fn attribute<'a>(attributes: &'a [Attribute], key: &str) -> Option<&'a Value> {
    attributes
        .iter()
        .find(|attr| attr.key.as_ref().is_some_and(|k| k.is_named(key)))
        .map(|attr| &attr.value)
}

/// Concatenated direct `Text` children
pub fn inner_text(nodes: &[Node]) -> String {
    nodes.iter().filter_map(Node::as_text).collect()
}

/// Concatenated text of the whole subtree, skipping comments and attributes
pub fn text_content(nodes: &[Node]) -> String {
    let mut out = String::new();
    collect_text(nodes, &mut out);
    out
}

fn collect_text(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(&text.text),
            Node::Comment(_) => {}
            other => collect_text(other.children(), out),
        }
    }
}

/// Pre-order walk over nodes, their children and node lists held in
/// attribute values. Comment bodies are not entered.
fn walk<'a>(nodes: &'a [Node], visit: &mut dyn FnMut(&'a Node)) {
    for node in nodes {
        visit(node);
        match node {
            Node::Comment(_) => continue,
            Node::CurlyTag(tag) => walk_attributes(&tag.attributes, visit),
            Node::PointyHead(head) => walk_attributes(&head.attributes, visit),
            Node::Element(element) => walk_attributes(&element.head.attributes, visit),
            _ => {}
        }
        walk(node.children(), visit);
    }
}

fn walk_attributes<'a>(attributes: &'a [Attribute], visit: &mut dyn FnMut(&'a Node)) {
    for attr in attributes {
        walk_value(&attr.value, visit);
    }
}

fn walk_value<'a>(value: &'a Value, visit: &mut dyn FnMut(&'a Node)) {
    match value {
        Value::NodeList(nodes) => walk(nodes, visit),
        Value::Array(items) => items.iter().for_each(|item| walk_value(item, visit)),
        Value::Dict(entries) => entries.iter().for_each(|e| walk_value(&e.value, visit)),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use crate::grammar::ast::Value;

    #[test]
    fn test_find_elements_and_attributes() {
        let (document, diagnostics) =
            crate::parse(r#"<div id="a"|one <div id="b"|two|div>|div>{p; <div|x|div>}"#).unwrap();
        assert!(diagnostics.is_empty());

        let divs = document.find_elements("div");
        assert_eq!(divs.len(), 3);
        assert_eq!(divs[0].attribute("id"), Some(&Value::String("a".into())));
        assert_eq!(divs[1].attribute("id"), Some(&Value::String("b".into())));
        assert_eq!(divs[2].attribute("id"), None);
    }

    #[test]
    fn test_text_queries() {
        let (document, _) = crate::parse("<p|a {b; b} {% no %}<i|c|i>|p>").unwrap();
        let p = document.find_elements("p")[0];
        assert_eq!(p.inner_text(), "a  ");
        assert_eq!(p.text_content(), "a  b c");
        assert_eq!(document.text_content(), "a  b c");
    }

    #[test]
    fn test_curly_tag_queries() {
        let (document, _) = crate::parse("{t 1 k=2 \"s\"; <>x</>}{html:t}").unwrap();
        let tags = document.find_curly_tags("t");
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].positional().count(), 2);
        assert_eq!(tags[0].attribute("k").and_then(Value::as_number).map(|n| n.raw.as_str()), Some("2"));
        assert_eq!(tags[0].text_content(), "x");
        assert_eq!(document.find_curly_tags("html:t").len(), 1);
    }

    #[test]
    fn test_elements_inside_node_list_attributes() {
        let (document, _) = crate::parse("{t body=<><b|x|b></>}").unwrap();
        assert_eq!(document.find_elements("b").len(), 1);
    }
}
