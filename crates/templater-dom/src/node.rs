//! Arena node layout
//!
//! Nodes link to each other through `NodeId`s (4 bytes) instead of pointers,
//! which keeps a cloned fragment a plain arena append.

use crate::{EventListener, InternedString, NodeId};

/// Reuse counter of an arena slot, bumped each time the slot is released
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct Generation(u32);

impl Generation {
    #[inline]
    pub const fn value(self) -> u32 {
        self.0
    }

    #[inline]
    pub(crate) const fn next(self) -> Self {
        Generation(self.0.wrapping_add(1))
    }
}

/// One slot in the tree arena.
///
/// Links are `NodeId::NONE` when absent. A detached node or a fragment has
/// no parent; `last_child` makes appends constant time.
#[derive(Debug)]
pub struct Node {
    pub parent: NodeId,
    pub first_child: NodeId,
    pub last_child: NodeId,
    pub prev_sibling: NodeId,
    pub next_sibling: NodeId,
    pub data: NodeData,
    pub(crate) generation: Generation,
    /// Released slot waiting on the free list
    pub(crate) vacant: bool,
}

impl Node {
    /// Create an unlinked node
    pub fn new(data: NodeData) -> Self {
        Self {
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
            data,
            generation: Generation::default(),
            vacant: false,
        }
    }

    /// How many times this slot has been released
    #[inline]
    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn element(name: InternedString) -> Self {
        Self::new(NodeData::Element(ElementData::new(name)))
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self::new(NodeData::Text(content.into()))
    }

    pub fn document() -> Self {
        Self::new(NodeData::Document)
    }

    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        if let NodeData::Element(element) = &self.data { Some(element) } else { None }
    }

    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        if let NodeData::Element(element) = &mut self.data { Some(element) } else { None }
    }

    /// Contents of a text node; `None` for every other kind
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        if let NodeData::Text(text) = &self.data { Some(text) } else { None }
    }
}

/// What kind of node a slot holds
#[derive(Debug)]
pub enum NodeData {
    Document,
    /// Parentless container, used for template contents and clones
    DocumentFragment,
    /// DOCTYPE
    Doctype {
        name: String,
        public_id: String,
        system_id: String,
    },
    Element(ElementData),
    Text(String),
    Comment(String),
}

impl NodeData {
    /// Copy this node's own data for cloning.
    ///
    /// Listeners and template content are not carried over; the tree clones
    /// template content separately.
    pub(crate) fn shallow_copy(&self) -> NodeData {
        match self {
            NodeData::Document => NodeData::Document,
            NodeData::DocumentFragment => NodeData::DocumentFragment,
            NodeData::Doctype { name, public_id, system_id } => NodeData::Doctype {
                name: name.clone(),
                public_id: public_id.clone(),
                system_id: system_id.clone(),
            },
            NodeData::Element(e) => NodeData::Element(ElementData {
                name: e.name,
                attrs: e.attrs.clone(),
                template_content: None,
                listeners: Vec::new(),
            }),
            NodeData::Text(t) => NodeData::Text(t.clone()),
            NodeData::Comment(c) => NodeData::Comment(c.clone()),
        }
    }
}

/// Tag, attributes and listeners of an element node
#[derive(Debug)]
pub struct ElementData {
    /// Tag name
    pub name: InternedString,
    /// Attributes in insertion order
    pub attrs: Vec<Attribute>,
    /// Inert content fragment of a `<template>` element
    pub template_content: Option<NodeId>,
    /// Registered event listeners, in registration order
    pub(crate) listeners: Vec<EventListener>,
}

impl ElementData {
    pub fn new(name: InternedString) -> Self {
        Self {
            name,
            attrs: Vec::new(),
            template_content: None,
            listeners: Vec::new(),
        }
    }

    fn attr_index(&self, name: InternedString) -> Option<usize> {
        self.attrs.iter().position(|attr| attr.name == name)
    }

    pub fn get_attr(&self, name: InternedString) -> Option<&str> {
        self.attr_index(name).map(|i| self.attrs[i].value.as_str())
    }

    /// Overwrite in place or append; returns the previous value
    pub fn set_attr(&mut self, name: InternedString, value: String) -> Option<String> {
        match self.attr_index(name) {
            Some(i) => Some(std::mem::replace(&mut self.attrs[i].value, value)),
            None => {
                self.attrs.push(Attribute { name, value });
                None
            }
        }
    }

    pub fn remove_attr(&mut self, name: InternedString) -> Option<String> {
        let i = self.attr_index(name)?;
        Some(self.attrs.remove(i).value)
    }

    /// Registered listeners
    pub fn listeners(&self) -> &[EventListener] {
        &self.listeners
    }
}

/// Name/value pair; an empty value is a boolean attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: InternedString,
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_attr_replaces_in_place() {
        let mut elem = ElementData::new(InternedString(1));
        assert_eq!(elem.set_attr(InternedString(2), "a".into()), None);
        elem.set_attr(InternedString(3), "b".into());
        assert_eq!(elem.set_attr(InternedString(2), "c".into()), Some("a".into()));

        assert_eq!(elem.attrs.len(), 2);
        assert_eq!(elem.attrs[0].value, "c");
        assert_eq!(elem.get_attr(InternedString(3)), Some("b"));
    }

    #[test]
    fn test_remove_attr() {
        let mut elem = ElementData::new(InternedString(1));
        elem.set_attr(InternedString(2), "a".into());
        assert_eq!(elem.remove_attr(InternedString(2)), Some("a".into()));
        assert_eq!(elem.remove_attr(InternedString(2)), None);
    }

    #[test]
    fn test_shallow_copy_drops_listeners() {
        let mut elem = ElementData::new(InternedString(1));
        elem.set_attr(InternedString(2), "x".into());
        elem.listeners.push(EventListener::new("click", std::rc::Rc::new(|_: &crate::Event| {})));
        elem.template_content = Some(NodeId(7));

        let copy = NodeData::Element(elem).shallow_copy();
        let copy = match copy {
            NodeData::Element(e) => e,
            _ => panic!("expected element"),
        };
        assert_eq!(copy.attrs.len(), 1);
        assert!(copy.listeners.is_empty());
        assert!(copy.template_content.is_none());
    }
}
