//! Conversion between [`Document`] and unist/mdast JSON.
//!
//! The JSON shape is the one remark and Gatsby hand to transform plugins:
//! every node is an object with a string `type`, parents carry a `children`
//! array, and everything else is an opaque property that must survive the
//! round trip.

use crate::error::TreeError;
use crate::tree::{CodeBlock, Document, Fields, Node, NodeKind, normalize_lang};
use serde_json::Value;

impl Document {
    /// Builds a document from a unist JSON tree.
    ///
    /// An empty or `null` `children` property is kept verbatim so that the
    /// node serializes back to the same shape.
    pub fn from_json(value: Value) -> Result<Self, TreeError> {
        let (root, children) = split_node(value, "$")?;
        let mut doc = Document::new(root.kind);
        let root_id = doc.root();
        doc[root_id].fields = root.fields;

        let mut pending = vec![(root_id, String::from("$"), children)];
        while let Some((parent, path, children)) = pending.pop() {
            for (index, child) in children.into_iter().enumerate() {
                let child_path = format!("{path}.children[{index}]");
                let (node, grandchildren) = split_node(child, &child_path)?;
                let id = doc.append_child(parent, node)?;
                if !grandchildren.is_empty() {
                    pending.push((id, child_path, grandchildren));
                }
            }
        }
        Ok(doc)
    }

    /// Serializes the tree reachable from the root as unist JSON.
    ///
    /// `children` is emitted for nodes that have children, and otherwise
    /// only if the node carries an empty `children` property of its own.
    pub fn to_json(&self) -> Value {
        let mut stack = vec![Frame::new(&self[self.root()])];
        while let Some(frame) = stack.last_mut() {
            if let Some(&child) = frame.node.children.get(frame.next) {
                frame.next += 1;
                stack.push(Frame::new(&self[child]));
                continue;
            }
            let Some(done) = stack.pop() else { break };
            let value = done.finish();
            match stack.last_mut() {
                Some(parent) => parent.children.push(value),
                None => return value,
            }
        }
        Value::Null
    }
}

/// A node whose children are being serialized.
struct Frame<'a> {
    node: &'a Node,
    next: usize,
    children: Vec<Value>,
}

impl<'a> Frame<'a> {
    fn new(node: &'a Node) -> Self {
        Self {
            node,
            next: 0,
            children: Vec::with_capacity(node.children.len()),
        }
    }

    fn finish(self) -> Value {
        let node = self.node;
        let mut map = node.fields.clone();
        map.insert("type".into(), Value::String(node.type_name().to_string()));

        match &node.kind {
            NodeKind::Code(block) => {
                map.insert("lang".into(), block.lang.clone().map_or(Value::Null, Value::String));
                map.insert("meta".into(), block.meta.clone().map_or(Value::Null, Value::String));
                map.insert("value".into(), Value::String(block.value.clone()));
            }
            NodeKind::Html(value) => {
                map.insert("value".into(), Value::String(value.clone()));
            }
            NodeKind::Other(_) => {}
        }

        if !self.children.is_empty() {
            map.insert("children".into(), Value::Array(self.children));
        }
        Value::Object(map)
    }
}

/// Splits one JSON node into its arena node and its raw children.
fn split_node(value: Value, path: &str) -> Result<(Node, Vec<Value>), TreeError> {
    let mut fields = match value {
        Value::Object(map) => map,
        other => {
            return Err(TreeError::NotAnObject {
                path: path.to_string(),
                found: json_kind(&other),
            });
        }
    };

    let type_name = match fields.remove("type") {
        Some(Value::String(name)) => name,
        _ => {
            return Err(TreeError::MissingType {
                path: path.to_string(),
            });
        }
    };

    let children = match fields.remove("children") {
        None => Vec::new(),
        Some(Value::Array(items)) if !items.is_empty() => items,
        Some(empty @ (Value::Null | Value::Array(_))) => {
            fields.insert("children".into(), empty);
            Vec::new()
        }
        Some(_) => {
            return Err(TreeError::InvalidChildren {
                path: path.to_string(),
            });
        }
    };

    let kind = match type_name.as_str() {
        "code" => NodeKind::Code(CodeBlock {
            lang: normalize_lang(take_optional_string(&mut fields, "lang", path)?),
            meta: take_optional_string(&mut fields, "meta", path)?,
            value: take_optional_string(&mut fields, "value", path)?.unwrap_or_default(),
        }),
        "html" => NodeKind::Html(
            take_optional_string(&mut fields, "value", path)?.unwrap_or_default(),
        ),
        _ => NodeKind::Other(type_name),
    };

    Ok((Node::new(kind).with_fields(fields), children))
}

fn take_optional_string(
    fields: &mut Fields,
    field: &'static str,
    path: &str,
) -> Result<Option<String>, TreeError> {
    match fields.remove(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(_) => Err(TreeError::InvalidField {
            path: path.to_string(),
            field,
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn round_trips_unknown_properties() {
        let input = json!({
            "type": "root",
            "children": [
                {
                    "type": "heading",
                    "depth": 2,
                    "children": [{ "type": "text", "value": "Title" }],
                    "position": { "start": { "line": 1, "column": 1, "offset": 0 } }
                },
                { "type": "code", "lang": "json", "meta": "title=a.json", "value": "{}" }
            ]
        });

        let doc = Document::from_json(input.clone()).unwrap();
        assert_eq!(doc.to_json(), input);
    }

    #[test]
    fn code_fields_are_typed() {
        let doc = Document::from_json(json!({
            "type": "root",
            "children": [{ "type": "code", "lang": "", "value": "echo hi" }]
        }))
        .unwrap();

        let code_id = doc.children(doc.root())[0];
        let block = doc[code_id].as_code().unwrap();
        assert_eq!(block.lang, None);
        assert_eq!(block.meta, None);
        assert_eq!(block.value, "echo hi");
    }

    #[test]
    fn reports_path_of_malformed_nodes() {
        let err = Document::from_json(json!({
            "type": "root",
            "children": [{ "type": "paragraph", "children": [{ "value": "x" }] }]
        }))
        .unwrap_err();
        assert_eq!(
            err,
            TreeError::MissingType {
                path: "$.children[0].children[0]".into()
            }
        );

        let err = Document::from_json(json!({ "type": "root", "children": 3 })).unwrap_err();
        assert_eq!(err, TreeError::InvalidChildren { path: "$".into() });

        let err = Document::from_json(json!([1, 2])).unwrap_err();
        assert_eq!(
            err,
            TreeError::NotAnObject {
                path: "$".into(),
                found: "an array"
            }
        );
    }

    #[test]
    fn rejects_non_string_code_value() {
        let err = Document::from_json(json!({
            "type": "root",
            "children": [{ "type": "code", "value": 42 }]
        }))
        .unwrap_err();
        assert_eq!(
            err,
            TreeError::InvalidField {
                path: "$.children[0]".into(),
                field: "value"
            }
        );
    }

    #[test]
    fn error_messages_name_the_node_path() {
        let err = Document::from_json(json!({
            "type": "root",
            "children": [{ "type": "list", "children": [true] }]
        }))
        .unwrap_err();
        insta::assert_snapshot!(
            err.to_string(),
            @"Expected a node object at $.children[0].children[0], found a boolean"
        );
    }

    #[test]
    fn keeps_empty_and_null_children() {
        let input = json!({
            "type": "root",
            "children": [
                { "type": "paragraph", "children": [] },
                { "type": "thematicBreak", "children": null },
                { "type": "blockquote", "children": [{ "type": "paragraph", "children": [] }] }
            ]
        });

        let doc = Document::from_json(input.clone()).unwrap();
        assert_eq!(doc.to_json(), input);

        let paragraph = doc.children(doc.root())[0];
        assert!(doc[paragraph].children.is_empty());
    }

    #[test]
    fn deeply_nested_trees_do_not_recurse() {
        let depth = 100_000;
        let mut tree = json!({ "type": "text", "value": "leaf" });
        for _ in 0..depth {
            tree = json!({ "type": "emphasis", "children": [tree] });
        }
        let input = json!({ "type": "root", "children": [tree] });

        let doc = Document::from_json(input).unwrap();
        assert_eq!(doc.node_count(), depth + 2);

        // Unwind the output one level at a time; dropping it whole would
        // recurse through serde_json's own destructor.
        let mut node = doc.to_json();
        let mut levels = 0;
        loop {
            let next = node
                .get_mut("children")
                .and_then(Value::as_array_mut)
                .and_then(Vec::pop);
            let Some(child) = next else { break };
            node = child;
            levels += 1;
        }
        assert_eq!(levels, depth + 1);
        assert_eq!(node["value"], "leaf");
    }
}
