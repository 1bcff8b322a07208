//! Markup encoder
//!
//! `Display` renders every tree type back to CPTML source. Numbers keep their
//! raw text, strings are escaped minimally and text escapes only the five
//! structural characters, so parsing an encoding and encoding it again
//! yields the same text.

use super::nodes::*;
use crate::lexical::classifier::is_text_delimiter;
use std::fmt::{self, Display, Formatter, Write};

/// Quote and escape a string value. Only `\`, `"` and control characters
/// are escaped.
pub fn encode_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\0' => out.push_str("\\0"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{{{:04x}}}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Escape text for node context
pub fn encode_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if is_text_delimiter(ch) {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

fn write_nodes(f: &mut Formatter<'_>, nodes: &[Node]) -> fmt::Result {
    nodes.iter().try_for_each(|node| write!(f, "{}", node))
}

fn write_attributes(f: &mut Formatter<'_>, attributes: &[Attribute]) -> fmt::Result {
    attributes
        .iter()
        .try_for_each(|attribute| write!(f, " {}", attribute))
}

fn write_view(f: &mut Formatter<'_>, view: Option<&str>) -> fmt::Result {
    match view {
        Some(view) => write!(f, "({})", view),
        None => Ok(()),
    }
}

impl Display for Identifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for _ in 0..self.special_depth {
            f.write_char('!')?;
        }
        if let Some(namespace) = &self.namespace {
            write!(f, "{}:", namespace)?;
        }
        f.write_str(&self.local)
    }
}

impl Display for DictKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            DictKey::String(s) => f.write_str(&encode_string(s)),
            DictKey::Identifier(name) => f.write_str(name),
        }
    }
}

impl Display for NumberLiteral {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => f.write_str(&encode_string(s)),
            Value::Array(items) => {
                f.write_char('[')?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_char(']')
            }
            Value::Dict(entries) => {
                f.write_char('{')?;
                for (i, entry) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", entry.key, entry.value)?;
                }
                f.write_char('}')
            }
            Value::Iri(iri) => write!(f, "<{}>", iri),
            Value::NodeList(nodes) => {
                f.write_str("<>")?;
                write_nodes(f, nodes)?;
                f.write_str("</>")
            }
        }
    }
}

impl Display for Attribute {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.key {
            Some(key) => write!(f, "{}={}", key, self.value),
            None => write!(f, "{}", self.value),
        }
    }
}

impl Display for PointyHead {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_char('<')?;
        write_view(f, self.view.as_deref())?;
        write!(f, "{}", self.name)?;
        write_attributes(f, &self.attributes)?;
        f.write_char('|')
    }
}

impl Display for PointyTail {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_char('|')?;
        write_view(f, self.view.as_deref())?;
        write!(f, "{}>", self.name)
    }
}

impl Display for Node {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Node::Text(text) => f.write_str(&encode_text(&text.text)),
            Node::Comment(comment) => write!(f, "{{%{}%}}", comment.body()),
            Node::CurlyTag(tag) => {
                write!(f, "{{{}", tag.name)?;
                write_attributes(f, &tag.attributes)?;
                if let Some(children) = &tag.children {
                    f.write_char(';')?;
                    write_nodes(f, children)?;
                }
                f.write_char('}')
            }
            Node::PointyHead(head) => write!(f, "{}", head),
            Node::PointyTail(tail) => write!(f, "{}", tail),
            Node::NodeList(list) => {
                f.write_str("<>")?;
                write_nodes(f, &list.nodes)?;
                f.write_str("</>")
            }
            Node::Element(element) => {
                write!(f, "{}", element.head)?;
                write_nodes(f, &element.children)?;
                write!(f, "{}", element.tail)
            }
        }
    }
}

impl Display for Document {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_nodes(f, &self.nodes)
    }
}
