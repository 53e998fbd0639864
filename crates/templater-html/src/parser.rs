//! Markup to arena tree
//!
//! Uses html5ever's RcDom and converts it into the arena tree. Template
//! contents are converted into a detached fragment owned by the `<template>`.

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};
use templater_dom::{Document, DomResult, DomTree, NodeId};

use crate::ParseError;

/// Builds a [`Document`] from markup with html5ever
pub struct HtmlParser {
    keep_whitespace: bool,
}

impl HtmlParser {
    /// Drops whitespace-only text
    pub fn new() -> Self {
        Self { keep_whitespace: false }
    }

    /// Keep whitespace-only text nodes instead of dropping them
    pub fn keep_whitespace(mut self, keep: bool) -> Self {
        self.keep_whitespace = keep;
        self
    }

    /// Parse as `about:blank`
    pub fn parse(&self, html: &str) -> Result<Document, ParseError> {
        self.parse_with_url(html, "about:blank")
    }

    pub fn parse_with_url(&self, html: &str, url: &str) -> Result<Document, ParseError> {
        tracing::debug!("Parsing markup for {}", url);

        let dom = parse_document(RcDom::default(), Default::default())
            .from_utf8()
            .read_from(&mut html.as_bytes())?;

        let mut document = Document::empty(url);
        let root = document.tree().root();
        self.convert_node(&dom.document, document.tree_mut(), root)?;
        document.finalize();

        tracing::debug!("Built {} arena nodes for {}", document.tree().len(), url);
        Ok(document)
    }

    /// Convert an RcDom node and its subtree under `parent`
    fn convert_node(&self, handle: &Handle, tree: &mut DomTree, parent: NodeId) -> DomResult<()> {
        match &handle.data {
            RcNodeData::Document => {
                self.convert_children(handle, tree, parent)?;
            }
            RcNodeData::Doctype { name, public_id, system_id } => {
                let id = tree.create_doctype(name, public_id, system_id);
                tree.append_child(parent, id)?;
            }
            RcNodeData::Text { contents } => {
                let text = contents.borrow();
                if self.keep_whitespace || !text.trim().is_empty() {
                    let id = tree.create_text(&text);
                    tree.append_child(parent, id)?;
                }
            }
            RcNodeData::Comment { contents } => {
                let id = tree.create_comment(contents);
                tree.append_child(parent, id)?;
            }
            RcNodeData::Element { name, attrs, template_contents, .. } => {
                let id = tree.create_element(&name.local);
                for attr in attrs.borrow().iter() {
                    tree.set_attribute(id, &attr.name.local, &attr.value)?;
                }
                tree.append_child(parent, id)?;

                if let Some(contents) = template_contents.borrow().as_ref() {
                    let fragment = tree.create_fragment();
                    self.convert_children(contents, tree, fragment)?;
                    tree.set_template_content(id, fragment)?;
                }

                self.convert_children(handle, tree, id)?;
            }
            RcNodeData::ProcessingInstruction { .. } => {}
        }
        Ok(())
    }

    fn convert_children(&self, handle: &Handle, tree: &mut DomTree, parent: NodeId) -> DomResult<()> {
        for child in handle.children.borrow().iter() {
            self.convert_node(child, tree, parent)?;
        }
        Ok(())
    }
}

impl Default for HtmlParser {
    fn default() -> Self {
        Self::new()
    }
}
