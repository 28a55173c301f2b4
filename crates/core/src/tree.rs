//! Arena-backed document tree.
//!
//! Nodes live in a flat `Vec` and reference their children by [`NodeId`].
//! Ids stay stable for the lifetime of the document, so a transform can
//! collect the ids it cares about first and rewrite those nodes afterwards.

use crate::error::TreeError;
use serde_json::{Map, Value};
use std::fmt;
use std::ops::{Index, IndexMut};

/// Unist properties other than `type`, `children`, and the code/html payload.
pub type Fields = Map<String, Value>;

/// Stable handle to a node inside a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in the document arena.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A fenced code block.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CodeBlock {
    /// Declared language. Never `Some("")`.
    pub lang: Option<String>,
    /// Remainder of the fence info string.
    pub meta: Option<String>,
    /// Literal text between the fences.
    pub value: String,
}

impl CodeBlock {
    /// Creates a code block without a declared language.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            lang: None,
            meta: None,
            value: value.into(),
        }
    }

    /// Sets the declared language; blank identifiers count as undeclared.
    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = normalize_lang(Some(lang.into()));
        self
    }

    /// Sets the meta string.
    pub fn with_meta(mut self, meta: impl Into<String>) -> Self {
        self.meta = Some(meta.into());
        self
    }

    /// Declared language, if any.
    pub fn language(&self) -> Option<&str> {
        self.lang.as_deref()
    }
}

/// Maps blank language annotations to `None`.
pub(crate) fn normalize_lang(lang: Option<String>) -> Option<String> {
    lang.filter(|l| !l.trim().is_empty())
}

/// What a node is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Fenced code block (`type: "code"`).
    Code(CodeBlock),
    /// Raw HTML (`type: "html"`), including pre-rendered code blocks.
    Html(String),
    /// Any other unist node, identified by its `type`.
    Other(String),
}

impl NodeKind {
    /// The unist `type` of this node.
    pub fn type_name(&self) -> &str {
        match self {
            NodeKind::Code(_) => "code",
            NodeKind::Html(_) => "html",
            NodeKind::Other(name) => name,
        }
    }
}

/// A single node in a [`Document`].
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Node kind and kind-specific payload.
    pub kind: NodeKind,
    /// Ordered children.
    pub children: Vec<NodeId>,
    /// Remaining unist properties (`position`, `depth`, `url`, ...).
    pub fields: Fields,
}

impl Node {
    /// Creates a childless node of the given kind.
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            children: Vec::new(),
            fields: Fields::new(),
        }
    }

    /// Creates a `code` node.
    pub fn code(block: CodeBlock) -> Self {
        Self::new(NodeKind::Code(block))
    }

    /// Creates an `html` node.
    pub fn html(value: impl Into<String>) -> Self {
        Self::new(NodeKind::Html(value.into()))
    }

    /// Creates a node of an arbitrary unist type.
    pub fn other(type_name: impl Into<String>) -> Self {
        Self::new(NodeKind::Other(type_name.into()))
    }

    /// Adds or replaces a unist property.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Replaces all extra properties at once.
    pub fn with_fields(mut self, fields: Fields) -> Self {
        self.fields = fields;
        self
    }

    /// The code block payload, when this is a `code` node.
    pub fn as_code(&self) -> Option<&CodeBlock> {
        match &self.kind {
            NodeKind::Code(block) => Some(block),
            _ => None,
        }
    }

    /// The HTML payload, when this is an `html` node.
    pub fn as_html(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Html(value) => Some(value),
            _ => None,
        }
    }

    /// The unist `type` of this node.
    pub fn type_name(&self) -> &str {
        self.kind.type_name()
    }
}

/// An ordered, acyclic tree of nodes with a single root.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Document {
    /// Creates a document holding only a root of the given kind.
    pub fn new(kind: NodeKind) -> Self {
        Self {
            nodes: vec![Node::new(kind)],
            root: NodeId(0),
        }
    }

    /// Creates a document with an mdast `root` node.
    pub fn root_document() -> Self {
        Self::new(NodeKind::Other("root".to_string()))
    }

    /// Id of the root node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes stored in the arena, including detached ones.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Looks up a node.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Looks up a node mutably.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Children of a node; empty for unknown ids.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Appends `node` as the last child of `parent`.
    ///
    /// Children already listed on `node` are discarded; attach them with
    /// further `append_child` calls.
    pub fn append_child(&mut self, parent: NodeId, mut node: Node) -> Result<NodeId, TreeError> {
        if parent.0 >= self.nodes.len() {
            return Err(TreeError::UnknownNode(parent));
        }
        node.children.clear();
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);
        Ok(id)
    }

    /// Swaps the node at `id` for `node`, returning the previous node.
    ///
    /// The node keeps its place among its siblings. Former children that are
    /// not listed by the replacement become unreachable from the root.
    pub fn replace(&mut self, id: NodeId, node: Node) -> Result<Node, TreeError> {
        let slot = self.get_mut(id).ok_or(TreeError::UnknownNode(id))?;
        Ok(std::mem::replace(slot, node))
    }

    /// Replaces the node at `id` with the result of `f` applied to it.
    pub fn replace_with<F>(&mut self, id: NodeId, f: F) -> Result<(), TreeError>
    where
        F: FnOnce(Node) -> Node,
    {
        let old = self.replace(id, Node::other(String::new()))?;
        self.nodes[id.0] = f(old);
        Ok(())
    }

    /// Depth-first, pre-order iterator over the nodes reachable from the root.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            doc: self,
            stack: vec![self.root],
        }
    }
}

impl Index<NodeId> for Document {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }
}

impl IndexMut<NodeId> for Document {
    fn index_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }
}

/// Pre-order traversal returned by [`Document::descendants`].
pub struct Descendants<'a> {
    doc: &'a Document,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let node = self.doc.get(id)?;
        self.stack.extend(node.children.iter().rev().copied());
        Some((id, node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Document, NodeId, NodeId) {
        let mut doc = Document::root_document();
        let root = doc.root();
        let para = doc.append_child(root, Node::other("paragraph")).unwrap();
        doc.append_child(para, Node::other("text").with_field("value", "hi"))
            .unwrap();
        let code = doc
            .append_child(root, Node::code(CodeBlock::new("x").with_lang("rust")))
            .unwrap();
        (doc, para, code)
    }

    #[test]
    fn descendants_are_preorder() {
        let (doc, _, _) = sample();
        let types: Vec<&str> = doc.descendants().map(|(_, n)| n.type_name()).collect();
        assert_eq!(types, vec!["root", "paragraph", "text", "code"]);
    }

    #[test]
    fn blank_language_is_undeclared() {
        assert_eq!(CodeBlock::new("x").with_lang("").lang, None);
        assert_eq!(CodeBlock::new("x").with_lang("  ").lang, None);
        assert_eq!(CodeBlock::new("x").with_lang("ts").language(), Some("ts"));
    }

    #[test]
    fn replace_keeps_sibling_position() {
        let (mut doc, para, code) = sample();
        let old = doc.replace(code, Node::html("<pre></pre>")).unwrap();
        assert_eq!(old.as_code().map(|c| c.value.as_str()), Some("x"));
        assert_eq!(doc.children(doc.root()), &[para, code]);
        assert_eq!(doc[code].as_html(), Some("<pre></pre>"));
    }

    #[test]
    fn replace_with_sees_previous_node() {
        let (mut doc, _, code) = sample();
        doc[code].fields.insert("position".into(), Value::from(1));
        doc.replace_with(code, |old| Node::html("done").with_fields(old.fields))
            .unwrap();
        assert_eq!(doc[code].fields.get("position"), Some(&Value::from(1)));
    }

    #[test]
    fn unknown_ids_are_rejected() {
        let (mut doc, _, _) = sample();
        let missing = NodeId(99);
        assert_eq!(
            doc.append_child(missing, Node::other("text")),
            Err(TreeError::UnknownNode(missing))
        );
        assert!(doc.replace(missing, Node::html("")).is_err());
        assert!(doc.children(missing).is_empty());
    }
}
