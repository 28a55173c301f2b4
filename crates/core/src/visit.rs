//! Depth-first node selection over a [`Document`].

use crate::tree::{Document, Node, NodeId};

/// Ids of every node reachable from the root that matches `predicate`,
/// in document (pre-order) order.
pub fn select<P>(doc: &Document, predicate: P) -> Vec<NodeId>
where
    P: Fn(&Node) -> bool,
{
    doc.descendants()
        .filter(|(_, node)| predicate(node))
        .map(|(id, _)| id)
        .collect()
}

/// Ids of every reachable node whose unist `type` equals `type_name`.
pub fn select_type(doc: &Document, type_name: &str) -> Vec<NodeId> {
    select(doc, |node| node.type_name() == type_name)
}

/// Ids of every reachable `code` node.
pub fn select_code(doc: &Document) -> Vec<NodeId> {
    select(doc, |node| node.as_code().is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::CodeBlock;

    #[test]
    fn finds_nested_code_in_document_order() {
        let mut doc = Document::root_document();
        let root = doc.root();
        let first = doc
            .append_child(root, Node::code(CodeBlock::new("a")))
            .unwrap();
        let quote = doc.append_child(root, Node::other("blockquote")).unwrap();
        let nested = doc
            .append_child(quote, Node::code(CodeBlock::new("b")))
            .unwrap();

        assert_eq!(select_code(&doc), vec![first, nested]);
        assert_eq!(select_type(&doc, "blockquote"), vec![quote]);
    }

    #[test]
    fn detached_nodes_are_not_selected() {
        let mut doc = Document::root_document();
        let root = doc.root();
        let wrapper = doc.append_child(root, Node::other("paragraph")).unwrap();
        doc.append_child(wrapper, Node::code(CodeBlock::new("gone")))
            .unwrap();
        doc.replace(wrapper, Node::other("paragraph")).unwrap();

        assert!(select_code(&doc).is_empty());
    }
}
