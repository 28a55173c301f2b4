//! Import of markdown-rs syntax trees into a [`Document`].

use crate::tree::{CodeBlock, Document, Fields, Node, NodeKind, normalize_lang};
use markdown::mdast;
use markdown::unist::{Point, Position};
use serde_json::{Value, json};

impl Document {
    /// Builds a document from an already-parsed markdown-rs tree.
    ///
    /// Scalar properties (`value`, `depth`, `url`, ...) and positions are kept
    /// as unist fields; structured MDX attributes are not carried over.
    pub fn from_mdast(root: &mdast::Node) -> Self {
        let mut doc = Document::new(NodeKind::Other(String::new()));
        let root_id = doc.root();
        doc[root_id] = convert_node(root);

        let mut pending = vec![(root_id, root)];
        while let Some((parent, node)) = pending.pop() {
            for child in node.children().into_iter().flatten() {
                // Parent ids come from this document, so appending cannot fail.
                if let Ok(id) = doc.append_child(parent, convert_node(child)) {
                    pending.push((id, child));
                }
            }
        }
        doc
    }
}

fn convert_node(node: &mdast::Node) -> Node {
    let mut fields = Fields::new();
    let kind = node_kind(node, &mut fields);
    if let Some(position) = node.position() {
        fields.insert("position".into(), position_json(position));
    }
    if node.children().is_some_and(Vec::is_empty) {
        fields.insert("children".into(), json!([]));
    }
    Node::new(kind).with_fields(fields)
}

/// Returns the node kind and records the node's scalar properties.
fn node_kind(node: &mdast::Node, fields: &mut Fields) -> NodeKind {
    use mdast::Node as N;

    let mut set = |key: &str, value: Value| {
        fields.insert(key.to_string(), value);
    };
    let other = |name: &str| NodeKind::Other(name.to_string());

    match node {
        N::Root(_) => other("root"),
        N::Blockquote(_) => other("blockquote"),
        N::FootnoteDefinition(n) => {
            set("identifier", json!(n.identifier));
            set("label", json!(n.label));
            other("footnoteDefinition")
        }
        N::MdxJsxFlowElement(n) => {
            set("name", json!(n.name));
            other("mdxJsxFlowElement")
        }
        N::List(n) => {
            set("ordered", json!(n.ordered));
            set("start", json!(n.start));
            set("spread", json!(n.spread));
            other("list")
        }
        N::MdxjsEsm(n) => {
            set("value", json!(n.value));
            other("mdxjsEsm")
        }
        N::Toml(n) => {
            set("value", json!(n.value));
            other("toml")
        }
        N::Yaml(n) => {
            set("value", json!(n.value));
            other("yaml")
        }
        N::Break(_) => other("break"),
        N::InlineCode(n) => {
            set("value", json!(n.value));
            other("inlineCode")
        }
        N::InlineMath(n) => {
            set("value", json!(n.value));
            other("inlineMath")
        }
        N::Delete(_) => other("delete"),
        N::Emphasis(_) => other("emphasis"),
        N::MdxTextExpression(n) => {
            set("value", json!(n.value));
            other("mdxTextExpression")
        }
        N::FootnoteReference(n) => {
            set("identifier", json!(n.identifier));
            set("label", json!(n.label));
            other("footnoteReference")
        }
        N::Html(n) => NodeKind::Html(n.value.clone()),
        N::Image(n) => {
            set("url", json!(n.url));
            set("alt", json!(n.alt));
            set("title", json!(n.title));
            other("image")
        }
        N::ImageReference(n) => {
            set("alt", json!(n.alt));
            set("identifier", json!(n.identifier));
            set("label", json!(n.label));
            other("imageReference")
        }
        N::MdxJsxTextElement(n) => {
            set("name", json!(n.name));
            other("mdxJsxTextElement")
        }
        N::Link(n) => {
            set("url", json!(n.url));
            set("title", json!(n.title));
            other("link")
        }
        N::LinkReference(n) => {
            set("identifier", json!(n.identifier));
            set("label", json!(n.label));
            other("linkReference")
        }
        N::Strong(_) => other("strong"),
        N::Text(n) => {
            set("value", json!(n.value));
            other("text")
        }
        N::Code(n) => NodeKind::Code(CodeBlock {
            lang: normalize_lang(n.lang.clone()),
            meta: n.meta.clone(),
            value: n.value.clone(),
        }),
        N::Math(n) => {
            set("value", json!(n.value));
            set("meta", json!(n.meta));
            other("math")
        }
        N::MdxFlowExpression(n) => {
            set("value", json!(n.value));
            other("mdxFlowExpression")
        }
        N::Heading(n) => {
            set("depth", json!(n.depth));
            other("heading")
        }
        N::Table(_) => other("table"),
        N::ThematicBreak(_) => other("thematicBreak"),
        N::TableRow(_) => other("tableRow"),
        N::TableCell(_) => other("tableCell"),
        N::ListItem(n) => {
            set("spread", json!(n.spread));
            set("checked", json!(n.checked));
            other("listItem")
        }
        N::Definition(n) => {
            set("url", json!(n.url));
            set("title", json!(n.title));
            set("identifier", json!(n.identifier));
            set("label", json!(n.label));
            other("definition")
        }
        N::Paragraph(_) => other("paragraph"),
    }
}

fn position_json(position: &Position) -> Value {
    json!({
        "start": point_json(&position.start),
        "end": point_json(&position.end),
    })
}

fn point_json(point: &Point) -> Value {
    json!({
        "line": point.line,
        "column": point.column,
        "offset": point.offset,
    })
}
