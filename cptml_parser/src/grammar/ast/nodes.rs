//! CPTML syntax tree node definitions
//!
//! The document parser produces a flat tree: pointy heads and tails are
//! sibling nodes, and only the assembler folds matching pairs into
//! [`Element`]s. Nodes carry the span of their source text; identifiers and
//! values do not, since they are always reported through the node or
//! attribute that owns them.
//!
//! All types are closed sum types with serde support so the CLI can dump
//! either tree as JSON.

use crate::utils::Span;
use serde::{Deserialize, Serialize};

// === DOCUMENT ===

/// A parsed source buffer: the ordered top-level nodes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub nodes: Vec<Node>,
    pub span: Span,
}

impl Document {
    pub fn new(nodes: Vec<Node>, span: Span) -> Self {
        Self { nodes, span }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether any pointy head or tail in the tree is still unpaired.
    /// True for every CST containing pointy tags, and for an assembled tree
    /// that needed recovery.
    pub fn has_unpaired_tags(&self) -> bool {
        self.nodes.iter().any(Node::has_unpaired_tags)
    }
}

// === NODES ===

/// One markup node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Node {
    /// Literal text with escapes already decoded
    Text(TextNode),
    /// `{% ... %}`, possibly nested
    Comment(CommentNode),
    /// `{name attrs}` or `{name attrs; content}`
    CurlyTag(CurlyTag),
    /// `<name attrs|`
    PointyHead(PointyHead),
    /// `|name>`
    PointyTail(PointyTail),
    /// `<> ... </>` in node position
    NodeList(NodeListValue),
    /// A paired head and tail; only produced by the assembler
    Element(Element),
}

impl Node {
    pub fn span(&self) -> Span {
        match self {
            Node::Text(text) => text.span,
            Node::Comment(comment) => comment.span,
            Node::CurlyTag(tag) => tag.span,
            Node::PointyHead(head) => head.span,
            Node::PointyTail(tail) => tail.span,
            Node::NodeList(list) => list.span,
            Node::Element(element) => element.span(),
        }
    }

    /// Short lowercase name of the node kind, used in listings and logs
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Text(_) => "text",
            Node::Comment(_) => "comment",
            Node::CurlyTag(_) => "curly_tag",
            Node::PointyHead(_) => "pointy_head",
            Node::PointyTail(_) => "pointy_tail",
            Node::NodeList(_) => "node_list",
            Node::Element(_) => "element",
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Node::Text(text) => Some(&text.text),
            _ => None,
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn as_curly_tag(&self) -> Option<&CurlyTag> {
        match self {
            Node::CurlyTag(tag) => Some(tag),
            _ => None,
        }
    }

    /// Nodes nested directly under this one in the tree.
    /// Attribute values are not children.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Comment(comment) => &comment.children,
            Node::CurlyTag(tag) => tag.children.as_deref().unwrap_or(&[]),
            Node::NodeList(list) => &list.nodes,
            Node::Element(element) => &element.children,
            Node::Text(_) | Node::PointyHead(_) | Node::PointyTail(_) => &[],
        }
    }

    fn has_unpaired_tags(&self) -> bool {
        match self {
            Node::PointyHead(_) | Node::PointyTail(_) => true,
            Node::Comment(_) => false,
            Node::Element(element) => {
                attributes_have_unpaired_tags(&element.head.attributes)
                    || element.children.iter().any(Node::has_unpaired_tags)
            }
            Node::CurlyTag(tag) => {
                attributes_have_unpaired_tags(&tag.attributes)
                    || self.children().iter().any(Node::has_unpaired_tags)
            }
            other => other.children().iter().any(Node::has_unpaired_tags),
        }
    }
}

fn attributes_have_unpaired_tags(attributes: &[Attribute]) -> bool {
    attributes.iter().any(|attr| attr.value.has_unpaired_tags())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextNode {
    pub text: String,
    pub span: Span,
}

/// Comment body: `Text` and nested `Comment` nodes only
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentNode {
    pub children: Vec<Node>,
    pub span: Span,
}

impl CommentNode {
    /// Comment body with nested comments rendered back to source form
    pub fn body(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            match child {
                Node::Text(text) => out.push_str(&text.text),
                Node::Comment(nested) => {
                    out.push_str("{%");
                    out.push_str(&nested.body());
                    out.push_str("%}");
                }
                _ => {}
            }
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurlyTag {
    pub name: Identifier,
    pub attributes: Vec<Attribute>,
    /// `None` for the self-closing form; `Some` (possibly empty) after `;`
    pub children: Option<Vec<Node>>,
    pub span: Span,
}

impl CurlyTag {
    pub fn is_self_closing(&self) -> bool {
        self.children.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointyHead {
    pub view: Option<String>,
    pub name: Identifier,
    pub attributes: Vec<Attribute>,
    pub span: Span,
}

impl PointyHead {
    /// Strict pairing: view and every part of the name must agree
    pub fn matches(&self, tail: &PointyTail) -> bool {
        self.view == tail.view && self.name == tail.name
    }

    /// `(view)name` as written in source
    pub fn display_name(&self) -> String {
        display_name(self.view.as_deref(), &self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointyTail {
    pub view: Option<String>,
    pub name: Identifier,
    pub span: Span,
}

impl PointyTail {
    pub fn display_name(&self) -> String {
        display_name(self.view.as_deref(), &self.name)
    }
}

fn display_name(view: Option<&str>, name: &Identifier) -> String {
    match view {
        Some(view) => format!("({}){}", view, name),
        None => name.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeListValue {
    pub nodes: Vec<Node>,
    pub span: Span,
}

/// A pointy head and its matching tail with everything between them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    pub head: PointyHead,
    pub children: Vec<Node>,
    pub tail: PointyTail,
}

impl Element {
    pub fn name(&self) -> &Identifier {
        &self.head.name
    }

    pub fn view(&self) -> Option<&str> {
        self.head.view.as_deref()
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.head.attributes
    }

    pub fn span(&self) -> Span {
        self.head.span.merge(self.tail.span)
    }
}

// === IDENTIFIERS ===

/// `local`, `ns:local`, or either form behind one or more `!`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identifier {
    pub namespace: Option<String>,
    pub local: String,
    /// Number of leading `!` markers; 0 for an ordinary identifier
    pub special_depth: u32,
}

impl Identifier {
    pub fn new(local: impl Into<String>) -> Self {
        Self {
            namespace: None,
            local: local.into(),
            special_depth: 0,
        }
    }

    pub fn namespaced(namespace: impl Into<String>, local: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            local: local.into(),
            special_depth: 0,
        }
    }

    pub fn with_special_depth(mut self, special_depth: u32) -> Self {
        self.special_depth = special_depth;
        self
    }

    pub fn is_special(&self) -> bool {
        self.special_depth > 0
    }

    /// Compare against `local` or `ns:local` text, ignoring special depth
    pub fn is_named(&self, name: &str) -> bool {
        match (&self.namespace, name.split_once(':')) {
            (Some(ns), Some((want_ns, want_local))) => ns == want_ns && self.local == want_local,
            (None, None) => self.local == name,
            _ => false,
        }
    }
}

// === ATTRIBUTES ===

/// `key=value` or a bare positional value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub key: Option<Identifier>,
    pub value: Value,
    pub span: Span,
}

impl Attribute {
    pub fn keyed(key: Identifier, value: Value, span: Span) -> Self {
        Self {
            key: Some(key),
            value,
            span,
        }
    }

    pub fn bare(value: Value, span: Span) -> Self {
        Self {
            key: None,
            value,
            span,
        }
    }

    pub fn is_keyed(&self) -> bool {
        self.key.is_some()
    }
}

// === VALUES ===

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Value {
    Bool(bool),
    Number(NumberLiteral),
    /// Decoded string contents
    String(String),
    Array(Vec<Value>),
    /// Entries in source order; duplicate keys are kept
    Dict(Vec<DictEntry>),
    Iri(String),
    NodeList(Vec<Node>),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Dict(_) => "dict",
            Value::Iri(_) => "iri",
            Value::NodeList(_) => "node_list",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<&NumberLiteral> {
        match self {
            Value::Number(n) => Some(n),
            _ => None,
        }
    }

    /// String or IRI contents
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) | Value::Iri(s) => Some(s),
            _ => None,
        }
    }

    /// First dict entry with the given key
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Dict(entries) => entries
                .iter()
                .find(|entry| entry.key.as_str() == key)
                .map(|entry| &entry.value),
            _ => None,
        }
    }

    fn has_unpaired_tags(&self) -> bool {
        match self {
            Value::NodeList(nodes) => nodes.iter().any(Node::has_unpaired_tags),
            Value::Array(items) => items.iter().any(Value::has_unpaired_tags),
            Value::Dict(entries) => entries.iter().any(|e| e.value.has_unpaired_tags()),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictEntry {
    pub key: DictKey,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DictKey {
    /// `"quoted"` key, decoded
    String(String),
    /// Bare simple identifier
    Identifier(String),
}

impl DictKey {
    pub fn as_str(&self) -> &str {
        match self {
            DictKey::String(s) | DictKey::Identifier(s) => s,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NumberBase {
    Decimal,
    Hex,
    Binary,
}

impl NumberBase {
    pub fn radix(&self) -> u32 {
        match self {
            NumberBase::Decimal => 10,
            NumberBase::Hex => 16,
            NumberBase::Binary => 2,
        }
    }

    pub fn prefix(&self) -> &'static str {
        match self {
            NumberBase::Decimal => "",
            NumberBase::Hex => "0x",
            NumberBase::Binary => "0b",
        }
    }
}

/// A number exactly as written. Decoding is left to consumers; the helpers
/// below cover the common cases.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NumberLiteral {
    pub base: NumberBase,
    pub raw: String,
}

impl NumberLiteral {
    pub fn new(base: NumberBase, raw: impl Into<String>) -> Self {
        Self {
            base,
            raw: raw.into(),
        }
    }

    /// Decimal without fraction or exponent, or any hex/binary literal
    pub fn is_integer(&self) -> bool {
        match self.base {
            NumberBase::Decimal => !self.raw.contains(['.', 'e', 'E']),
            NumberBase::Hex | NumberBase::Binary => true,
        }
    }

    /// Integer value, if the literal is integral and fits in an `i128`
    pub fn to_i128(&self) -> Option<i128> {
        if !self.is_integer() {
            return None;
        }
        let (negative, unsigned) = match self.raw.as_bytes().first() {
            Some(b'-') => (true, &self.raw[1..]),
            Some(b'+') => (false, &self.raw[1..]),
            _ => (false, self.raw.as_str()),
        };
        let mut digits = String::with_capacity(unsigned.len() + 1);
        if negative {
            digits.push('-');
        }
        digits.extend(
            unsigned
                .strip_prefix(self.base.prefix())
                .unwrap_or(unsigned)
                .chars()
                .filter(|c| *c != '_'),
        );
        // sign and digits parse together so i128::MIN is reachable
        i128::from_str_radix(&digits, self.base.radix()).ok()
    }

    /// Floating point value; hex and binary go through [`Self::to_i128`]
    pub fn to_f64(&self) -> Option<f64> {
        match self.base {
            NumberBase::Decimal => {
                let cleaned: String = self.raw.chars().filter(|c| *c != '_').collect();
                cleaned.parse().ok()
            }
            NumberBase::Hex | NumberBase::Binary => self.to_i128().map(|v| v as f64),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::Position;

    fn span() -> Span {
        Span::point(Position::start())
    }

    #[test]
    fn test_number_integer_decoding() {
        assert_eq!(NumberLiteral::new(NumberBase::Decimal, "1_000").to_i128(), Some(1000));
        assert_eq!(NumberLiteral::new(NumberBase::Decimal, "-42").to_i128(), Some(-42));
        assert_eq!(NumberLiteral::new(NumberBase::Hex, "0xFF_ff").to_i128(), Some(0xffff));
        assert_eq!(NumberLiteral::new(NumberBase::Binary, "0b1_0_1").to_i128(), Some(5));
        assert_eq!(NumberLiteral::new(NumberBase::Decimal, "1.5").to_i128(), None);
    }

    #[test]
    fn test_number_integer_bounds() {
        let min = NumberLiteral::new(NumberBase::Decimal, "-170141183460469231731687303715884105728");
        assert_eq!(min.to_i128(), Some(i128::MIN));
        let max = NumberLiteral::new(NumberBase::Decimal, "170141183460469231731687303715884105727");
        assert_eq!(max.to_i128(), Some(i128::MAX));
        let hex_min = NumberLiteral::new(NumberBase::Hex, "-0x8000_0000_0000_0000_0000_0000_0000_0000");
        assert_eq!(hex_min.to_i128(), Some(i128::MIN));

        let past_min = NumberLiteral::new(NumberBase::Decimal, "-170141183460469231731687303715884105729");
        assert_eq!(past_min.to_i128(), None);
        assert_eq!(NumberLiteral::new(NumberBase::Decimal, "-").to_i128(), None);
    }

    #[test]
    fn test_number_float_decoding() {
        assert_eq!(NumberLiteral::new(NumberBase::Decimal, "1.").to_f64(), Some(1.0));
        assert_eq!(NumberLiteral::new(NumberBase::Decimal, ".5e1").to_f64(), Some(5.0));
        assert_eq!(NumberLiteral::new(NumberBase::Decimal, "+2_5.0E-1").to_f64(), Some(2.5));
        assert_eq!(NumberLiteral::new(NumberBase::Hex, "0x10").to_f64(), Some(16.0));
    }

    #[test]
    fn test_identifier_naming() {
        let plain = Identifier::new("p");
        let namespaced = Identifier::namespaced("tei", "s").with_special_depth(2);

        assert!(plain.is_named("p"));
        assert!(!plain.is_named("x:p"));
        assert!(namespaced.is_named("tei:s"));
        assert!(namespaced.is_special());
    }

    #[test]
    fn test_head_tail_matching_is_strict() {
        let head = PointyHead {
            view: Some("a".into()),
            name: Identifier::new("e"),
            attributes: vec![],
            span: span(),
        };
        let same = PointyTail {
            view: Some("a".into()),
            name: Identifier::new("e"),
            span: span(),
        };
        let other_view = PointyTail {
            view: Some("b".into()),
            ..same.clone()
        };
        let special = PointyTail {
            name: Identifier::new("e").with_special_depth(1),
            ..same.clone()
        };

        assert!(head.matches(&same));
        assert!(!head.matches(&other_view));
        assert!(!head.matches(&special));
        assert_eq!(head.display_name(), "(a)e");
    }

    #[test]
    fn test_dict_lookup_and_unpaired_detection() {
        let dict = Value::Dict(vec![DictEntry {
            key: DictKey::Identifier("k".into()),
            value: Value::NodeList(vec![Node::PointyTail(PointyTail {
                view: None,
                name: Identifier::new("x"),
                span: span(),
            })]),
        }]);
        assert_eq!(dict.get("k").map(Value::type_name), Some("node_list"));

        let tag = Node::CurlyTag(CurlyTag {
            name: Identifier::new("t"),
            attributes: vec![Attribute::keyed(Identifier::new("d"), dict, span())],
            children: None,
            span: span(),
        });
        let doc = Document::new(vec![tag], span());
        assert!(doc.has_unpaired_tags());
    }

    #[test]
    fn test_comment_body_renders_nested() {
        let inner = CommentNode {
            children: vec![Node::Text(TextNode {
                text: " b ".into(),
                span: span(),
            })],
            span: span(),
        };
        let outer = CommentNode {
            children: vec![
                Node::Text(TextNode {
                    text: " a ".into(),
                    span: span(),
                }),
                Node::Comment(inner),
            ],
            span: span(),
        };
        assert_eq!(outer.body(), " a {% b %}");
    }
}
