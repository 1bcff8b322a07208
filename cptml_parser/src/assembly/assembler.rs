//! Stack-based pairing of pointy heads and tails
//!
//! Each node sequence (document, curly content, node list) is paired on its
//! own stack, so a head never pairs with a tail from another sequence.
//! Comment bodies are left alone.
//!
//! Open heads count toward the nesting depth together with the curly tags,
//! node lists and values that enclose them, so the assembled tree is never
//! deeper than `MAX_NESTING_DEPTH`.

use super::error::PairingError;
use crate::config::compile_time::assembly::{MAX_DIAGNOSTICS, MAX_OPEN_HEADS};
use crate::config::compile_time::syntax::MAX_NESTING_DEPTH;
use crate::config::runtime::AssemblyPreferences;
use crate::grammar::ast::{Attribute, Document, Element, Node, PointyHead, PointyTail, Value};
use crate::log_warning;

/// Result of assembling one document
#[derive(Debug, Clone)]
pub struct Assembly {
    pub document: Document,
    /// Sorted by source position, capped at the configured maximum
    pub diagnostics: Vec<PairingError>,
    /// Diagnostics dropped after the cap was reached
    pub suppressed: usize,
}

impl Assembly {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty() && self.suppressed == 0
    }
}

/// A head waiting for its tail, with the nodes collected since
struct OpenHead {
    head: PointyHead,
    children: Vec<Node>,
}

pub struct Assembler {
    preferences: AssemblyPreferences,
    diagnostics: Vec<PairingError>,
    suppressed: usize,
    /// Enclosing constructs and open heads above the node being assembled
    depth: usize,
}

impl Assembler {
    pub fn new() -> Self {
        Self::with_preferences(AssemblyPreferences::default())
    }

    pub fn with_preferences(preferences: AssemblyPreferences) -> Self {
        Self {
            preferences,
            diagnostics: Vec::new(),
            suppressed: 0,
            depth: 0,
        }
    }

    pub fn assemble(mut self, document: Document) -> Assembly {
        let nodes = self.assemble_sequence(document.nodes);

        let mut diagnostics = self.diagnostics;
        diagnostics.sort_by_key(|d| d.span().start().offset);

        Assembly {
            document: Document::new(nodes, document.span),
            diagnostics,
            suppressed: self.suppressed,
        }
    }

    /// Pair the heads and tails of one sequence
    pub fn assemble_sequence(&mut self, nodes: Vec<Node>) -> Vec<Node> {
        let mut root = Vec::with_capacity(nodes.len());
        let mut stack: Vec<OpenHead> = Vec::new();
        let base = self.depth;
        let limit = MAX_OPEN_HEADS.min(MAX_NESTING_DEPTH.saturating_sub(base));

        for node in nodes {
            self.depth = base + stack.len();
            match self.assemble_node(node) {
                Node::PointyHead(head) => {
                    if stack.len() >= limit {
                        self.record(PairingError::TooManyOpenHeads {
                            head: head.display_name(),
                            max: limit,
                            span: head.span,
                        });
                        current(&mut stack, &mut root).push(Node::PointyHead(head));
                    } else {
                        stack.push(OpenHead {
                            head,
                            children: Vec::new(),
                        });
                    }
                }
                Node::PointyTail(tail) => self.close(tail, &mut stack, &mut root),
                other => current(&mut stack, &mut root).push(other),
            }
        }

        self.depth = base;
        while let Some(open) = stack.pop() {
            self.record(PairingError::UnterminatedHead {
                head: open.head.display_name(),
                span: open.head.span,
            });
            flatten(open, &mut stack, &mut root);
        }
        root
    }

    /// Pop the innermost head and compare it with `tail`. A mismatched head
    /// is flattened into its parent and the tail stays where it was found.
    /// With `recover_deep_tails`, a tail matching a deeper head first closes
    /// the heads above it as unterminated.
    fn close(&mut self, tail: PointyTail, stack: &mut Vec<OpenHead>, root: &mut Vec<Node>) {
        if self.preferences.recover_deep_tails {
            if let Some(target) = stack.iter().rposition(|open| open.head.matches(&tail)) {
                while stack.len() > target + 1 {
                    if let Some(open) = stack.pop() {
                        self.record(PairingError::UnterminatedHead {
                            head: open.head.display_name(),
                            span: open.head.span,
                        });
                        flatten(open, stack, root);
                    }
                }
            }
        }

        let Some(open) = stack.pop() else {
            self.record(PairingError::UnmatchedTail {
                tail: tail.display_name(),
                span: tail.span,
            });
            root.push(Node::PointyTail(tail));
            return;
        };

        if open.head.matches(&tail) {
            let element = Element {
                head: open.head,
                children: open.children,
                tail,
            };
            current(stack, root).push(Node::Element(element));
            return;
        }

        self.record(PairingError::MismatchedTail {
            expected: open.head.display_name(),
            found: tail.display_name(),
            head_span: open.head.span,
            span: tail.span,
        });
        flatten(open, stack, root);
        current(stack, root).push(Node::PointyTail(tail));
    }

    fn assemble_node(&mut self, node: Node) -> Node {
        match node {
            Node::CurlyTag(mut tag) => {
                self.depth += 1;
                tag.attributes = self.assemble_attributes(tag.attributes);
                tag.children = tag.children.map(|nodes| self.assemble_sequence(nodes));
                self.depth -= 1;
                Node::CurlyTag(tag)
            }
            Node::PointyHead(mut head) => {
                self.depth += 1;
                head.attributes = self.assemble_attributes(head.attributes);
                self.depth -= 1;
                Node::PointyHead(head)
            }
            Node::NodeList(mut list) => {
                self.depth += 1;
                list.nodes = self.assemble_sequence(list.nodes);
                self.depth -= 1;
                Node::NodeList(list)
            }
            other => other,
        }
    }

    fn assemble_attributes(&mut self, attributes: Vec<Attribute>) -> Vec<Attribute> {
        attributes
            .into_iter()
            .map(|mut attr| {
                attr.value = self.assemble_value(attr.value);
                attr
            })
            .collect()
    }

    fn assemble_value(&mut self, value: Value) -> Value {
        self.depth += 1;
        let value = match value {
            Value::NodeList(nodes) => Value::NodeList(self.assemble_sequence(nodes)),
            Value::Array(items) => {
                Value::Array(items.into_iter().map(|v| self.assemble_value(v)).collect())
            }
            Value::Dict(mut entries) => {
                for entry in &mut entries {
                    let value = std::mem::replace(&mut entry.value, Value::Bool(false));
                    entry.value = self.assemble_value(value);
                }
                Value::Dict(entries)
            }
            other => other,
        };
        self.depth -= 1;
        value
    }

    fn record(&mut self, error: PairingError) {
        if self.preferences.log_diagnostics {
            log_warning!(code = error.error_code(), &error.to_string(),
                span = error.span()
            );
        }
        if self.diagnostics.len() < MAX_DIAGNOSTICS {
            self.diagnostics.push(error);
        } else {
            self.suppressed += 1;
        }
    }
}

impl Default for Assembler {
    fn default() -> Self {
        Self::new()
    }
}

/// Splice an unpaired head, followed by what it collected, into the
/// enclosing sequence
fn flatten(open: OpenHead, stack: &mut [OpenHead], root: &mut Vec<Node>) {
    let target = current(stack, root);
    target.push(Node::PointyHead(open.head));
    target.extend(open.children);
}

/// Innermost open head's children, or the sequence itself
fn current<'a>(stack: &'a mut [OpenHead], root: &'a mut Vec<Node>) -> &'a mut Vec<Node> {
    match stack.last_mut() {
        Some(open) => &mut open.children,
        None => root,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::parse_document;
    use assert_matches::assert_matches;

    fn assemble(source: &str) -> Assembly {
        Assembler::new().assemble(parse_document(source).unwrap())
    }

    fn quiet() -> Assembler {
        Assembler::with_preferences(AssemblyPreferences {
            recover_deep_tails: false,
            log_diagnostics: false,
        })
    }

    fn recovering() -> Assembler {
        Assembler::with_preferences(AssemblyPreferences {
            recover_deep_tails: true,
            log_diagnostics: false,
        })
    }

    fn element_depth(nodes: &[Node]) -> usize {
        nodes
            .iter()
            .map(|node| match node {
                Node::Element(element) => 1 + element_depth(&element.children),
                other => element_depth(other.children()),
            })
            .max()
            .unwrap_or(0)
    }

    #[test]
    fn test_head_and_tail_become_one_element() {
        let assembly = assemble(r#"<x a="s"|text|x>"#);
        assert!(assembly.is_clean());
        assert_eq!(assembly.document.nodes.len(), 1);

        let element = assembly.document.nodes[0].as_element().unwrap();
        assert!(element.name().is_named("x"));
        assert_eq!(element.attribute("a"), Some(&Value::String("s".into())));
        assert_eq!(element.children.len(), 1);
        assert_eq!(element.children[0].as_text(), Some("text"));
        assert!(!assembly.document.has_unpaired_tags());
    }

    #[test]
    fn test_unterminated_head_before_node_list() {
        let assembly = assemble("<e attr=1|<>text</>");
        assert_eq!(assembly.diagnostics.len(), 1);
        assert_matches!(&assembly.diagnostics[0], PairingError::UnterminatedHead { head, .. } if head == "e");

        let kinds: Vec<&str> = assembly.document.nodes.iter().map(Node::kind).collect();
        assert_eq!(kinds, ["pointy_head", "node_list"]);
    }

    #[test]
    fn test_view_name_mismatch() {
        let assembly = assemble("<(a)e|;|(b)e>");
        assert_matches!(
            &assembly.diagnostics[..],
            [PairingError::MismatchedTail { expected, found, .. }] if expected == "(a)e" && found == "(b)e"
        );

        let kinds: Vec<&str> = assembly.document.nodes.iter().map(Node::kind).collect();
        assert_eq!(kinds, ["pointy_head", "text", "pointy_tail"]);
    }

    #[test]
    fn test_namespace_and_special_depth_must_match() {
        assert_eq!(assemble("<a:x|y|b:x>").diagnostics.len(), 1);
        assert_eq!(assemble("<!x|y|x>").diagnostics.len(), 1);
        assert!(assemble("<!a:x|y|!a:x>").is_clean());
    }

    #[test]
    fn test_unmatched_tail_is_kept_in_place() {
        let assembly = assemble("a|x>b");
        assert_matches!(&assembly.diagnostics[..], [PairingError::UnmatchedTail { tail, .. }] if tail == "x");
        let kinds: Vec<&str> = assembly.document.nodes.iter().map(Node::kind).collect();
        assert_eq!(kinds, ["text", "pointy_tail", "text"]);
    }

    #[test]
    fn test_mismatched_tail_pops_innermost_head() {
        let assembly = assemble("<a|<b|x|a>");
        assert_matches!(
            &assembly.diagnostics[..],
            [
                PairingError::UnterminatedHead { head, .. },
                PairingError::MismatchedTail { expected, found, .. },
            ] if head == "a" && expected == "b" && found == "a"
        );

        let kinds: Vec<&str> = assembly.document.nodes.iter().map(Node::kind).collect();
        assert_eq!(kinds, ["pointy_head", "pointy_head", "text", "pointy_tail"]);
    }

    #[test]
    fn test_mismatched_head_is_not_reported_twice() {
        let assembly = assemble("<a|<b|x|c>y|a>");
        assert_matches!(
            &assembly.diagnostics[..],
            [PairingError::MismatchedTail { expected, found, .. }] if expected == "b" && found == "c"
        );

        let a = assembly.document.nodes[0].as_element().unwrap();
        let kinds: Vec<&str> = a.children.iter().map(Node::kind).collect();
        assert_eq!(kinds, ["pointy_head", "text", "pointy_tail", "text"]);
    }

    #[test]
    fn test_deep_tail_recovery_closes_intermediate_heads() {
        let assembly = recovering().assemble(parse_document("<a|<b|x|a>").unwrap());
        assert_matches!(
            &assembly.diagnostics[..],
            [PairingError::UnterminatedHead { head, .. }] if head == "b"
        );

        let a = assembly.document.nodes[0].as_element().unwrap();
        let kinds: Vec<&str> = a.children.iter().map(Node::kind).collect();
        assert_eq!(kinds, ["pointy_head", "text"]);

        // Without a deeper match the innermost head is still popped
        let fallback = recovering().assemble(parse_document("<a|<b|x|c>").unwrap());
        let codes: Vec<&str> = fallback.diagnostics.iter().map(|d| d.error_code().as_str()).collect();
        assert_eq!(codes, ["W062", "W061"]);
    }

    #[test]
    fn test_nested_elements() {
        let assembly = assemble("<a|1<b|2|b>3|a>");
        assert!(assembly.is_clean());
        let a = assembly.document.nodes[0].as_element().unwrap();
        assert_eq!(a.children.len(), 3);
        assert!(a.children[1].as_element().is_some());
    }

    #[test]
    fn test_pairing_is_per_sequence() {
        let assembly = assemble("<a|{p; |a>}");
        let kinds: Vec<&str> = assembly.diagnostics.iter().map(|d| d.error_code().as_str()).collect();
        assert_eq!(kinds, ["W062", "W060"]);

        let inside = assemble("{p; <b|x|b>}<>{q v=<><i|y|i></>}</>");
        assert!(inside.is_clean());
        assert!(!inside.document.has_unpaired_tags());
    }

    #[test]
    fn test_comments_are_not_paired() {
        let assembly = assemble("{% <a| %}|a>");
        assert_eq!(assembly.diagnostics.len(), 1);
        assert_matches!(&assembly.diagnostics[0], PairingError::UnmatchedTail { .. });
    }

    #[test]
    fn test_diagnostics_are_capped() {
        let source = "|x>".repeat(MAX_DIAGNOSTICS + 5);
        let assembly = quiet().assemble(parse_document(&source).unwrap());
        assert_eq!(assembly.diagnostics.len(), MAX_DIAGNOSTICS);
        assert_eq!(assembly.suppressed, 5);
        assert!(!assembly.is_clean());
    }

    #[test]
    fn test_open_head_limit() {
        let source = "<a|".repeat(MAX_OPEN_HEADS + 1);
        let assembly = quiet().assemble(parse_document(&source).unwrap());
        let limit = MAX_OPEN_HEADS.min(MAX_NESTING_DEPTH);
        assert!(assembly
            .diagnostics
            .iter()
            .any(|d| matches!(d, PairingError::TooManyOpenHeads { max, .. } if *max == limit)));
        assert_eq!(assembly.document.nodes.len(), MAX_OPEN_HEADS + 1);
    }

    #[test]
    fn test_open_heads_count_toward_nesting_depth() {
        let levels = MAX_NESTING_DEPTH;
        let heads = 4;
        let mut source = String::new();
        for _ in 0..levels {
            source.push_str("{p;");
            source.push_str(&"<a|".repeat(heads));
        }
        for _ in 0..levels {
            source.push_str(&"|a>".repeat(heads));
            source.push('}');
        }

        let assembly = quiet().assemble(parse_document(&source).unwrap());
        assert!(assembly
            .diagnostics
            .iter()
            .any(|d| matches!(d, PairingError::TooManyOpenHeads { .. })));
        assert!(element_depth(&assembly.document.nodes) <= MAX_NESTING_DEPTH);

        // The bounded tree encodes and serializes without exhausting the stack
        let markup = assembly.document.to_string();
        assert!(markup.starts_with("{p;"));
        assert!(serde_json::to_string(&assembly.document).is_ok());
    }

    #[test]
    fn test_balanced_nesting_below_the_depth_limit_is_clean() {
        let source = format!("{{p;{}x{}}}", "<a|".repeat(8), "|a>".repeat(8));
        let assembly = quiet().assemble(parse_document(&source).unwrap());
        assert!(assembly.is_clean());
        assert_eq!(element_depth(&assembly.document.nodes), 8);
    }
}
