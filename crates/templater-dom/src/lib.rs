//! fOS Templater DOM
//!
//! Arena-based DOM tree used as the clonable fragment type of the templater.
//! Besides the tree itself this crate provides the host collaborators the
//! mapping engine talks to: selector queries, the classList / dataset / style
//! views, the element property table, event listeners, and the
//! [`FragmentSource`] / [`TreeSink`] seams.

mod interner;
mod node;
mod tree;
mod document;
mod selector;
mod classlist;
mod dataset;
mod style;
mod properties;
mod events;
mod operations;

pub use interner::{InternedString, StringInterner};
pub use node::{Attribute, ElementData, Generation, Node, NodeData};
pub use tree::{Children, DomTree};
pub use document::Document;
pub use selector::{ElementQuery, NthExpression, Selector, SelectorError};
pub use classlist::DOMTokenList;
pub use dataset::DOMStringMap;
pub use style::CssStyleDeclaration;
pub use properties::{ElementProperty, PropertyKind, Value};
pub use events::{Event, EventHandler, EventListener};
pub use operations::{DomError, DomResult, FragmentSource, Target, TreeSink};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root node ID (the document node)
    pub const ROOT: NodeId = NodeId(0);
    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check this is not the NONE sentinel
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    /// Arena index
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_valid() {
            write!(f, "#{}", self.0)
        } else {
            write!(f, "#none")
        }
    }
}
