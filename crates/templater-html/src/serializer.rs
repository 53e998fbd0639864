//! Markup output
//!
//! Turns arena nodes back into HTML text. `<template>` elements write their
//! inert content; fragments and documents write only their children.

use templater_dom::{DomTree, ElementData, NodeData, NodeId};

/// Elements written without an end tag
fn is_void(tag: &str) -> bool {
    matches!(
        tag,
        "area" | "base" | "br" | "col" | "embed" | "hr" | "img" | "input" | "link" | "meta"
            | "param" | "source" | "track" | "wbr"
    )
}

/// Elements whose text children are written unescaped
fn is_raw_text(tag: &str) -> bool {
    matches!(tag, "script" | "style")
}

/// Writes nodes as HTML, compact or indented
#[derive(Debug, Clone, Default)]
pub struct HtmlSerializer {
    indent: Option<String>,
}

impl HtmlSerializer {
    /// Compact output, exactly what the tree holds
    pub fn new() -> Self {
        Self::default()
    }

    /// Each nested element on its own line, two spaces per level
    pub fn pretty() -> Self {
        Self::with_indent("  ")
    }

    pub fn with_indent(unit: &str) -> Self {
        Self { indent: Some(unit.to_owned()) }
    }

    /// The node's children (innerHTML)
    pub fn serialize_inner(&self, tree: &DomTree, node_id: NodeId) -> String {
        let mut writer = Writer::new(tree, self.indent.as_deref());
        writer.children(content_of(tree, node_id), 0);
        writer.out
    }

    /// The node and its children (outerHTML)
    pub fn serialize_outer(&self, tree: &DomTree, node_id: NodeId) -> String {
        let mut writer = Writer::new(tree, self.indent.as_deref());
        writer.node(node_id, 0);
        writer.out
    }
}

/// A `<template>`'s children live in its content fragment
fn content_of(tree: &DomTree, node_id: NodeId) -> NodeId {
    tree.template_content(node_id).unwrap_or(node_id)
}

struct Writer<'t> {
    tree: &'t DomTree,
    indent: Option<&'t str>,
    out: String,
}

impl<'t> Writer<'t> {
    fn new(tree: &'t DomTree, indent: Option<&'t str>) -> Self {
        Self { tree, indent, out: String::new() }
    }

    fn node(&mut self, id: NodeId, depth: usize) {
        let tree = self.tree;
        let Some(node) = tree.get(id) else {
            return;
        };
        match &node.data {
            NodeData::Document | NodeData::DocumentFragment => self.children(id, depth),
            NodeData::Element(element) => self.element(id, element, depth),
            NodeData::Text(text) => escape_into(&mut self.out, text, false),
            NodeData::Comment(text) => {
                self.out.push_str("<!--");
                self.out.push_str(text);
                self.out.push_str("-->");
            }
            NodeData::Doctype { name, .. } => {
                self.out.push_str("<!DOCTYPE ");
                self.out.push_str(name);
                self.out.push('>');
            }
        }
    }

    fn children(&mut self, parent: NodeId, depth: usize) {
        for child in self.tree.child_ids(parent) {
            self.node(child, depth);
        }
    }

    fn element(&mut self, id: NodeId, element: &ElementData, depth: usize) {
        let tree = self.tree;
        let tag = tree.resolve(element.name);
        if depth > 0 {
            self.line_break(depth);
        }

        self.out.push('<');
        self.out.push_str(tag);
        for attr in &element.attrs {
            self.out.push(' ');
            self.out.push_str(tree.resolve(attr.name));
            // Boolean attributes are written bare
            if !attr.value.is_empty() {
                self.out.push_str("=\"");
                escape_into(&mut self.out, &attr.value, true);
                self.out.push('"');
            }
        }
        if is_void(tag) {
            self.out.push_str(" />");
            return;
        }
        self.out.push('>');

        let content = content_of(tree, id);
        if is_raw_text(tag) {
            for (_, child) in tree.children(content) {
                self.out.push_str(child.as_text().unwrap_or_default());
            }
        } else {
            self.children(content, depth + 1);
        }

        if !tree.element_children(content).is_empty() {
            self.line_break(depth);
        }
        self.out.push_str("</");
        self.out.push_str(tag);
        self.out.push('>');
    }

    /// No-op in compact mode
    fn line_break(&mut self, depth: usize) {
        if let Some(unit) = self.indent {
            self.out.push('\n');
            self.out.push_str(&unit.repeat(depth));
        }
    }
}

/// `&`, `<` and `>` always; `"` only inside attribute values
fn escape_into(out: &mut String, text: &str, in_attribute: bool) {
    for c in text.chars() {
        let entity = match c {
            '&' => "&amp;",
            '<' => "&lt;",
            '>' => "&gt;",
            '"' if in_attribute => "&quot;",
            _ => {
                out.push(c);
                continue;
            }
        };
        out.push_str(entity);
    }
}

/// Compact innerHTML
pub fn inner_html(tree: &DomTree, node_id: NodeId) -> String {
    HtmlSerializer::new().serialize_inner(tree, node_id)
}

/// Compact outerHTML
pub fn outer_html(tree: &DomTree, node_id: NodeId) -> String {
    HtmlSerializer::new().serialize_outer(tree, node_id)
}
