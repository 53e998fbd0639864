//! Whole-page wrapper around a [`DomTree`]
//!
//! Remembers the page URL and where `<html>`, `<head>` and `<body>` sit so
//! callers do not have to search for them.

use crate::{DomTree, ElementQuery, NodeId};

#[derive(Debug)]
pub struct Document {
    pub tree: DomTree,
    url: String,
    // NONE until found by `finalize`
    html: NodeId,
    head: NodeId,
    body: NodeId,
}

impl Document {
    /// Create a document with the html/head/body skeleton
    pub fn new(url: &str) -> Self {
        let mut doc = Self::empty(url);
        let tree = &mut doc.tree;

        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");

        // Fresh detached nodes under the root cannot violate the hierarchy
        let _ = tree.append_child(tree.root(), html);
        let _ = tree.append_child(html, head);
        let _ = tree.append_child(html, body);

        doc.finalize();
        doc
    }

    /// Bare root, no skeleton
    pub fn empty(url: &str) -> Self {
        Self {
            tree: DomTree::new(),
            url: url.to_string(),
            html: NodeId::NONE,
            head: NodeId::NONE,
            body: NodeId::NONE,
        }
    }

    /// Re-scan the tree for the html/head/body elements.
    /// Call after building the tree by hand or through the parser.
    pub fn finalize(&mut self) {
        let find = |tree: &DomTree, parent: NodeId, tag: &str| {
            if !parent.is_valid() {
                return NodeId::NONE;
            }
            tree.element_children(parent)
                .into_iter()
                .find(|&id| tree.tag_name(id) == Some(tag))
                .unwrap_or(NodeId::NONE)
        };

        self.html = find(&self.tree, self.tree.root(), "html");
        self.head = find(&self.tree, self.html, "head");
        self.body = find(&self.tree, self.html, "body");
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Trimmed text of `<head><title>`, empty when absent
    pub fn title(&self) -> String {
        if !self.head.is_valid() {
            return String::new();
        }
        self.tree.element_children(self.head)
            .into_iter()
            .find(|&id| self.tree.tag_name(id) == Some("title"))
            .map(|id| self.tree.text_content(id).trim().to_string())
            .unwrap_or_default()
    }

    /// The `<html>` element
    pub fn document_element(&self) -> NodeId {
        self.html
    }

    pub fn head(&self) -> NodeId {
        self.head
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    /// First element in document order whose `id` matches
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.tree.descendants(self.tree.root())
            .into_iter()
            .find(|&node| self.tree.get_attribute(node, "id") == Some(id))
    }

    /// First element in the document matching `selector`; invalid selectors match nothing
    pub fn query_selector(&self, selector: &str) -> Option<NodeId> {
        self.tree.query_selector(self.tree.root(), selector).ok().flatten()
    }

    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}
