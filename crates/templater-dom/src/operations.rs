//! DOM Node Operations
//!
//! Errors for tree manipulation plus the two collaborator seams the
//! templater drives: [`FragmentSource`] (find, detach and clone a template)
//! and [`TreeSink`] (place produced nodes into a container).

use crate::{DomTree, ElementQuery, NodeData, NodeId};

/// Result type for DOM operations
pub type DomResult<T> = Result<T, DomError>;

/// DOM operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// Node not found
    #[error("Node {0} not found")]
    NotFound(NodeId),
    /// Hierarchy error (e.g., inserting an ancestor into its descendant)
    #[error("Hierarchy request error: cannot insert {child} into {parent}")]
    HierarchyRequest { parent: NodeId, child: NodeId },
    /// Operation needs an element
    #[error("Node {0} is not an element")]
    NotAnElement(NodeId),
    /// Reference node is not a child of the parent
    #[error("Node {0} is not a child")]
    NotAChild(NodeId),
}

/// Identifies a node either by selector or by direct reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// First element in document order matching the selector
    Selector(String),
    /// A node handle
    Node(NodeId),
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Target::Selector(s) => write!(f, "{:?}", s),
            Target::Node(id) => write!(f, "node {}", id),
        }
    }
}

impl From<&str> for Target {
    fn from(s: &str) -> Self {
        Target::Selector(s.to_string())
    }
}

impl From<String> for Target {
    fn from(s: String) -> Self {
        Target::Selector(s)
    }
}

impl From<NodeId> for Target {
    fn from(id: NodeId) -> Self {
        Target::Node(id)
    }
}

/// Where template fragments come from
pub trait FragmentSource {
    /// Resolve a template by identifier
    fn resolve_fragment(&self, target: &Target) -> Option<NodeId>;

    /// Parent container of a fragment, if attached
    fn parent_of(&self, fragment: NodeId) -> Option<NodeId>;

    /// Remove a fragment from its tree (idempotent)
    fn detach_fragment(&mut self, fragment: NodeId);

    /// Deep-clone the fragment's content into a fresh, detached
    /// document fragment and return that fragment
    fn clone_content(&mut self, fragment: NodeId) -> DomResult<NodeId>;
}

/// Where produced nodes go
pub trait TreeSink {
    /// Append nodes, in order, as the last children of `container`
    fn append_nodes(&mut self, container: NodeId, nodes: &[NodeId]) -> DomResult<()>;

    /// Take a node and its subtree out of the tree for good. The ID must
    /// not be used afterwards.
    fn remove_node(&mut self, node: NodeId);

    /// Resolve a container by identifier
    fn resolve_container(&self, target: &Target) -> Option<NodeId>;
}

impl DomTree {
    /// Resolve a target to an element or fragment node
    fn resolve_target(&self, target: &Target) -> Option<NodeId> {
        match target {
            Target::Selector(selector) => match self.query_selector(self.root(), selector) {
                Ok(found) => found,
                Err(err) => {
                    tracing::warn!("Cannot resolve {:?}: {}", selector, err);
                    None
                }
            },
            Target::Node(id) => self.get(*id)
                .filter(|n| matches!(n.data, NodeData::Element(_) | NodeData::DocumentFragment))
                .map(|_| *id),
        }
    }
}

impl FragmentSource for DomTree {
    fn resolve_fragment(&self, target: &Target) -> Option<NodeId> {
        self.resolve_target(target).filter(|&id| self.is_element(id))
    }

    fn parent_of(&self, fragment: NodeId) -> Option<NodeId> {
        self.parent(fragment)
    }

    fn detach_fragment(&mut self, fragment: NodeId) {
        self.detach(fragment);
    }

    fn clone_content(&mut self, fragment: NodeId) -> DomResult<NodeId> {
        if self.get(fragment).is_none() {
            return Err(DomError::NotFound(fragment));
        }

        let clone = self.create_fragment();
        match self.template_content(fragment) {
            // <template>: its inert content is the instance
            Some(content) => {
                for child in self.child_ids(content) {
                    let copy = self.deep_clone(child)?;
                    self.append_child(clone, copy)?;
                }
            }
            // Any other element is its own prototype
            None => {
                let copy = self.deep_clone(fragment)?;
                self.append_child(clone, copy)?;
            }
        }
        Ok(clone)
    }
}

impl TreeSink for DomTree {
    fn append_nodes(&mut self, container: NodeId, nodes: &[NodeId]) -> DomResult<()> {
        for &node in nodes {
            self.append_child(container, node)?;
        }
        Ok(())
    }

    fn remove_node(&mut self, node: NodeId) {
        self.release(node);
    }

    fn resolve_container(&self, target: &Target) -> Option<NodeId> {
        self.resolve_target(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template_tree() -> (DomTree, NodeId, NodeId) {
        let mut tree = DomTree::new();
        let list = tree.create_element("ul");
        tree.set_attribute(list, "id", "list").unwrap();
        tree.append_child(tree.root(), list).unwrap();

        let template = tree.create_element("template");
        tree.set_attribute(template, "id", "row").unwrap();
        let content = tree.create_fragment();
        let li = tree.create_element("li");
        tree.append_child(content, li).unwrap();
        tree.set_template_content(template, content).unwrap();
        tree.append_child(list, template).unwrap();
        (tree, list, template)
    }

    #[test]
    fn test_resolve_by_selector_and_node() {
        let (tree, list, template) = template_tree();
        assert_eq!(tree.resolve_fragment(&Target::from("#row")), Some(template));
        assert_eq!(tree.resolve_fragment(&Target::from(template)), Some(template));
        assert_eq!(tree.resolve_fragment(&Target::from("#missing")), None);
        assert_eq!(tree.resolve_container(&Target::from("ul")), Some(list));
        // Invalid selectors resolve to nothing
        assert_eq!(tree.resolve_container(&Target::from("ul[")), None);
    }

    #[test]
    fn test_clone_template_content() {
        let (mut tree, list, template) = template_tree();
        assert_eq!(tree.parent_of(template), Some(list));

        let clone = tree.clone_content(template).unwrap();
        let children = tree.child_ids(clone);
        assert_eq!(children.len(), 1);
        assert_eq!(tree.tag_name(children[0]), Some("li"));
        assert!(tree.parent(clone).is_none());

        tree.detach_fragment(template);
        tree.detach_fragment(template);
        assert_eq!(tree.parent_of(template), None);
    }

    #[test]
    fn test_clone_plain_element() {
        let (mut tree, list, _) = template_tree();
        let clone = tree.clone_content(list).unwrap();
        let children = tree.child_ids(clone);
        assert_eq!(children.len(), 1);
        assert_eq!(tree.get_attribute(children[0], "id"), Some("list"));
    }

    #[test]
    fn test_append_nodes_in_order() {
        let (mut tree, list, _) = template_tree();
        let a = tree.create_element("li");
        let b = tree.create_element("li");
        tree.append_nodes(list, &[a, b]).unwrap();

        let children = tree.child_ids(list);
        assert_eq!(&children[children.len() - 2..], &[a, b]);

        let live = tree.len();
        tree.remove_node(a);
        assert!(tree.parent(a).is_none());
        assert!(tree.get(a).is_none());
        assert_eq!(tree.len(), live - 1);
        assert_eq!(tree.child_ids(list).last(), Some(&b));
    }
}
