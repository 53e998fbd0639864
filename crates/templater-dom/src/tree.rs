//! DOM Tree (arena-based allocation)
//!
//! Every node, including detached clones, lives in one arena. Detaching a
//! node only unlinks it; its ID stays valid so produced instances can be
//! moved between containers or re-attached later.
//!
//! Slots are recycled. [`DomTree::release`] frees a subtree at once and
//! new nodes reuse its slots before the arena grows. [`DomTree::discard`]
//! only detaches and queues the subtree; [`DomTree::sweep`] frees whatever
//! is still detached. IDs gathered before a discard stay valid until the
//! sweep, so a match list walked mid-pass never aliases a reused slot.

use crate::{
    CssStyleDeclaration, DOMStringMap, DOMTokenList, DomError, DomResult, ElementProperty,
    Event, EventHandler, EventListener, Generation, InternedString, Node, NodeData, NodeId,
    PropertyKind, StringInterner, Value,
};

/// Arena-based DOM tree for memory efficiency
#[derive(Debug)]
pub struct DomTree {
    nodes: Vec<Node>,
    /// Released slots, reused before the arena grows
    free: Vec<NodeId>,
    /// Discarded subtree roots and the generation they were queued at
    orphans: Vec<(NodeId, Generation)>,
    interner: StringInterner,
}

impl DomTree {
    /// Create a tree holding only the document node
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::document()],
            free: Vec::new(),
            orphans: Vec::new(),
            interner: StringInterner::new(),
        }
    }

    /// The document node
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID; released slots read as `None`
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index()).filter(|n| !n.vacant)
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index()).filter(|n| !n.vacant)
    }

    /// Number of live nodes (attached or not)
    pub fn len(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    /// Check if tree is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Arena size, live and released slots together
    pub fn capacity(&self) -> usize {
        self.nodes.len()
    }

    /// Resolve an interned string
    #[inline]
    pub fn resolve(&self, id: InternedString) -> &str {
        self.interner.get(id)
    }

    fn push(&mut self, mut node: Node) -> NodeId {
        let Some(id) = self.free.pop() else {
            let id = NodeId(self.nodes.len() as u32);
            self.nodes.push(node);
            return id;
        };
        let slot = &mut self.nodes[id.index()];
        node.generation = slot.generation;
        *slot = node;
        id
    }

    fn node(&self, id: NodeId) -> DomResult<&Node> {
        self.get(id).ok_or(DomError::NotFound(id))
    }

    fn node_mut(&mut self, id: NodeId) -> DomResult<&mut Node> {
        self.get_mut(id).ok_or(DomError::NotFound(id))
    }

    fn element(&self, id: NodeId) -> DomResult<&crate::ElementData> {
        self.node(id)?.as_element().ok_or(DomError::NotAnElement(id))
    }

    fn element_mut(&mut self, id: NodeId) -> DomResult<&mut crate::ElementData> {
        self.node_mut(id)?.as_element_mut().ok_or(DomError::NotAnElement(id))
    }

    // Creation

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        let name = self.interner.intern(tag);
        self.push(Node::element(name))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(Node::text(text))
    }

    /// Create a detached comment
    pub fn create_comment(&mut self, text: &str) -> NodeId {
        self.push(Node::new(NodeData::Comment(text.to_string())))
    }

    /// Create an empty document fragment
    pub fn create_fragment(&mut self) -> NodeId {
        self.push(Node::new(NodeData::DocumentFragment))
    }

    /// Create a detached doctype
    pub fn create_doctype(&mut self, name: &str, public_id: &str, system_id: &str) -> NodeId {
        self.push(Node::new(NodeData::Doctype {
            name: name.to_string(),
            public_id: public_id.to_string(),
            system_id: system_id.to_string(),
        }))
    }

    // Structure

    /// Append `child` as the last child of `parent`, detaching it from its
    /// current parent first
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        self.insert_before(parent, child, None)
    }

    /// Insert `child` before `reference` (or last when `None`)
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> DomResult<NodeId> {
        self.node(parent)?;
        self.node(child)?;
        if child == NodeId::ROOT || child == parent || self.is_ancestor_of(child, parent) {
            return Err(DomError::HierarchyRequest { parent, child });
        }
        if let Some(reference) = reference {
            if self.node(reference)?.parent != parent {
                return Err(DomError::NotAChild(reference));
            }
            if reference == child {
                return Ok(child);
            }
        }

        self.detach(child);

        let (prev, next) = match reference {
            Some(next) => (self.nodes[next.index()].prev_sibling, next),
            None => (self.nodes[parent.index()].last_child, NodeId::NONE),
        };

        {
            let node = &mut self.nodes[child.index()];
            node.parent = parent;
            node.prev_sibling = prev;
            node.next_sibling = next;
        }
        if prev.is_valid() {
            self.nodes[prev.index()].next_sibling = child;
        } else {
            self.nodes[parent.index()].first_child = child;
        }
        if next.is_valid() {
            self.nodes[next.index()].prev_sibling = child;
        } else {
            self.nodes[parent.index()].last_child = child;
        }
        Ok(child)
    }

    /// Unlink a node from its parent. Returns false if it had none.
    pub fn detach(&mut self, id: NodeId) -> bool {
        let Some(node) = self.get(id) else {
            return false;
        };
        let (parent, prev, next) = (node.parent, node.prev_sibling, node.next_sibling);
        if !parent.is_valid() {
            return false;
        }

        if prev.is_valid() {
            self.nodes[prev.index()].next_sibling = next;
        } else {
            self.nodes[parent.index()].first_child = next;
        }
        if next.is_valid() {
            self.nodes[next.index()].prev_sibling = prev;
        } else {
            self.nodes[parent.index()].last_child = prev;
        }

        let node = &mut self.nodes[id.index()];
        node.parent = NodeId::NONE;
        node.prev_sibling = NodeId::NONE;
        node.next_sibling = NodeId::NONE;
        true
    }

    /// Detach a subtree and return all of its slots, template content
    /// included, to the free list. Returns the number of nodes freed.
    ///
    /// Every ID inside the subtree is invalid afterwards and may be handed
    /// out again by the next created node.
    pub fn release(&mut self, id: NodeId) -> usize {
        if id == NodeId::ROOT || self.get(id).is_none() {
            return 0;
        }
        self.detach(id);

        let mut freed = 0;
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            let Some(node) = self.get(next) else {
                continue;
            };
            if let Some(content) = node.as_element().and_then(|e| e.template_content) {
                stack.push(content);
            }
            stack.extend(self.child_ids(next));

            let slot = &mut self.nodes[next.index()];
            let generation = slot.generation.next();
            *slot = Node::new(NodeData::DocumentFragment);
            slot.generation = generation;
            slot.vacant = true;
            self.free.push(next);
            freed += 1;
        }
        freed
    }

    /// Detach a subtree and queue it for the next [`sweep`](Self::sweep).
    /// Returns false for the document node or an unknown ID.
    pub fn discard(&mut self, id: NodeId) -> bool {
        let Some(node) = self.get(id) else {
            return false;
        };
        if id == NodeId::ROOT {
            return false;
        }
        let generation = node.generation;
        self.detach(id);
        self.orphans.push((id, generation));
        true
    }

    /// Release discarded subtrees that are still detached. A subtree that
    /// was re-attached since is kept. Returns the number of nodes freed.
    pub fn sweep(&mut self) -> usize {
        let mut freed = 0;
        for (id, generation) in std::mem::take(&mut self.orphans) {
            let still_orphaned = self.get(id)
                .is_some_and(|n| n.generation == generation && !n.parent.is_valid());
            if still_orphaned {
                freed += self.release(id);
            }
        }
        if freed > 0 {
            tracing::trace!("Swept {} discarded nodes", freed);
        }
        freed
    }

    /// Parent of a node
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).map(|n| n.parent).filter(|p| p.is_valid())
    }

    /// Parent if it is an element
    pub fn parent_element(&self, id: NodeId) -> Option<NodeId> {
        self.parent(id).filter(|&p| self.is_element(p))
    }

    /// Iterate over children
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            tree: self,
            next: self.get(id).map(|n| n.first_child).unwrap_or(NodeId::NONE),
        }
    }

    /// Child IDs, collected so the tree can be mutated while walking them
    pub fn child_ids(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id).map(|(child, _)| child).collect()
    }

    /// Element children
    pub fn element_children(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id)
            .filter(|(_, node)| node.is_element())
            .map(|(child, _)| child)
            .collect()
    }

    /// All descendants in document order, excluding `id` itself.
    /// Template contents are inert and not descended into.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.child_ids(id).into_iter().rev().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.child_ids(next).into_iter().rev());
        }
        out
    }

    /// Previous element sibling
    pub fn prev_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let mut cur = self.get(id)?.prev_sibling;
        while cur.is_valid() {
            if self.is_element(cur) {
                return Some(cur);
            }
            cur = self.nodes[cur.index()].prev_sibling;
        }
        None
    }

    /// Next element sibling
    pub fn next_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let mut cur = self.get(id)?.next_sibling;
        while cur.is_valid() {
            if self.is_element(cur) {
                return Some(cur);
            }
            cur = self.nodes[cur.index()].next_sibling;
        }
        None
    }

    /// Check whether `ancestor` is a proper ancestor of `id`
    pub fn is_ancestor_of(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut cur = self.parent(id);
        while let Some(p) = cur {
            if p == ancestor {
                return true;
            }
            cur = self.parent(p);
        }
        false
    }

    /// Check whether the node is reachable from the document root
    pub fn is_connected(&self, id: NodeId) -> bool {
        id == NodeId::ROOT || self.is_ancestor_of(NodeId::ROOT, id)
    }

    // Elements and attributes

    /// Check if a node is an element
    pub fn is_element(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(|n| n.is_element())
    }

    /// Tag name of an element
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.get(id)?.as_element().map(|e| self.resolve(e.name))
    }

    /// Get an attribute value
    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        let name = self.interner.lookup(name)?;
        self.get(id)?.as_element()?.get_attr(name)
    }

    /// Check if an attribute is present
    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.get_attribute(id, name).is_some()
    }

    /// Set an attribute
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> DomResult<()> {
        self.element(id)?;
        let name = self.interner.intern(name);
        self.element_mut(id)?.set_attr(name, value.to_string());
        Ok(())
    }

    /// Remove an attribute; absent attributes are a no-op
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> DomResult<Option<String>> {
        self.element(id)?;
        let Some(name) = self.interner.lookup(name) else {
            return Ok(None);
        };
        Ok(self.element_mut(id)?.remove_attr(name))
    }

    /// Attributes as (name, value) pairs in insertion order
    pub fn attributes(&self, id: NodeId) -> Vec<(&str, &str)> {
        self.get(id)
            .and_then(|n| n.as_element())
            .map(|e| {
                e.attrs.iter()
                    .map(|a| (self.resolve(a.name), a.value.as_str()))
                    .collect()
            })
            .unwrap_or_default()
    }

    // Text

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self, id: NodeId) -> String {
        let Some(node) = self.get(id) else {
            return String::new();
        };
        if let Some(text) = node.as_text() {
            return text.to_string();
        }
        self.descendants(id)
            .into_iter()
            .filter_map(|d| self.nodes[d.index()].as_text())
            .collect()
    }

    /// Replace all children with a single text node (none for "")
    pub fn set_text_content(&mut self, id: NodeId, text: &str) -> DomResult<()> {
        if let NodeData::Text(content) = &mut self.node_mut(id)?.data {
            *content = text.to_string();
            return Ok(());
        }
        for child in self.child_ids(id) {
            self.discard(child);
        }
        if !text.is_empty() {
            let text = self.create_text(text);
            self.append_child(id, text)?;
        }
        Ok(())
    }

    // classList / dataset / style views

    /// Snapshot of the element's classes
    pub fn class_list(&self, id: NodeId) -> DomResult<DOMTokenList> {
        self.element(id)?;
        Ok(DOMTokenList::from_string(self.get_attribute(id, "class").unwrap_or("")))
    }

    /// Write a class list back to the `class` attribute
    pub fn set_class_list(&mut self, id: NodeId, classes: &DOMTokenList) -> DomResult<()> {
        self.set_attribute(id, "class", &classes.value())
    }

    /// Snapshot of the element's data-* attributes
    pub fn dataset(&self, id: NodeId) -> DomResult<DOMStringMap> {
        self.element(id)?;
        Ok(DOMStringMap::from_attributes(self.attributes(id)))
    }

    /// Set (or with `None`, delete) one dataset entry by camelCase key
    pub fn set_data(&mut self, id: NodeId, key: &str, value: Option<&str>) -> DomResult<()> {
        let attr = DOMStringMap::to_attribute_name(key);
        match value {
            Some(value) => self.set_attribute(id, &attr, value),
            None => self.remove_attribute(id, &attr).map(|_| ()),
        }
    }

    /// Snapshot of the element's inline style
    pub fn style(&self, id: NodeId) -> DomResult<CssStyleDeclaration> {
        self.element(id)?;
        Ok(CssStyleDeclaration::parse(self.get_attribute(id, "style").unwrap_or("")))
    }

    /// Write declarations back to the `style` attribute
    pub fn set_style(&mut self, id: NodeId, style: &CssStyleDeclaration) -> DomResult<()> {
        if style.is_empty() {
            return self.remove_attribute(id, "style").map(|_| ());
        }
        self.set_attribute(id, "style", &style.css_text())
    }

    // Properties

    /// Read a typed property
    pub fn get_property(&self, id: NodeId, property: &ElementProperty) -> DomResult<Value> {
        self.element(id)?;
        Ok(match property.kind {
            PropertyKind::Text => Value::Str(self.text_content(id)),
            PropertyKind::FormValue if self.tag_name(id) == Some("textarea") => {
                Value::Str(self.text_content(id))
            }
            PropertyKind::FormValue => {
                Value::Str(self.get_attribute(id, "value").unwrap_or_default().to_string())
            }
            PropertyKind::Reflected(attr) => {
                Value::Str(self.get_attribute(id, attr).unwrap_or_default().to_string())
            }
            PropertyKind::Boolean(attr) => Value::Bool(self.has_attribute(id, attr)),
        })
    }

    /// Assign a typed property
    pub fn set_property(&mut self, id: NodeId, property: &ElementProperty, value: &Value) -> DomResult<()> {
        self.element(id)?;
        match property.kind {
            PropertyKind::Text => self.set_text_content(id, &value.to_string()),
            PropertyKind::FormValue if self.tag_name(id) == Some("textarea") => {
                self.set_text_content(id, &value.to_string())
            }
            PropertyKind::FormValue => self.set_attribute(id, "value", &value.to_string()),
            PropertyKind::Reflected(attr) => self.set_attribute(id, attr, &value.to_string()),
            PropertyKind::Boolean(attr) if value.as_bool() => self.set_attribute(id, attr, ""),
            PropertyKind::Boolean(attr) => self.remove_attribute(id, attr).map(|_| ()),
        }
    }

    // Templates and cloning

    /// Content fragment of a `<template>` element
    pub fn template_content(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.as_element()?.template_content
    }

    /// Attach an inert content fragment to an element
    pub fn set_template_content(&mut self, id: NodeId, content: NodeId) -> DomResult<()> {
        self.node(content)?;
        self.element_mut(id)?.template_content = Some(content);
        Ok(())
    }

    /// Deep-clone a node into a detached copy. Listeners are not copied.
    pub fn deep_clone(&mut self, id: NodeId) -> DomResult<NodeId> {
        let data = self.node(id)?.data.shallow_copy();
        let copy = self.push(Node::new(data));

        if let Some(content) = self.template_content(id) {
            let content_copy = self.deep_clone(content)?;
            self.element_mut(copy)?.template_content = Some(content_copy);
        }

        for child in self.child_ids(id) {
            let child_copy = self.deep_clone(child)?;
            self.append_child(copy, child_copy)?;
        }
        Ok(copy)
    }

    // Events

    /// Register a listener; existing listeners for the type are kept
    pub fn add_event_listener(&mut self, id: NodeId, event_type: &str, handler: EventHandler) -> DomResult<()> {
        self.element_mut(id)?
            .listeners
            .push(EventListener::new(event_type, handler));
        Ok(())
    }

    /// Number of listeners registered for a type
    pub fn listener_count(&self, id: NodeId, event_type: &str) -> usize {
        self.get(id)
            .and_then(|n| n.as_element())
            .map(|e| e.listeners.iter().filter(|l| l.event_type == event_type).count())
            .unwrap_or(0)
    }

    /// Dispatch an event at `id`, bubbling through ancestors.
    /// Returns the number of handlers invoked.
    pub fn dispatch_event(&self, id: NodeId, event: &Event) -> usize {
        let mut invoked = 0;
        let mut current = Some(id);

        while let Some(node) = current {
            let handlers: Vec<EventHandler> = self.get(node)
                .and_then(|n| n.as_element())
                .map(|e| {
                    e.listeners.iter()
                        .filter(|l| l.event_type == event.event_type)
                        .map(|l| l.handler.clone())
                        .collect()
                })
                .unwrap_or_default();

            event.current_target.set(node);
            for handler in handlers {
                handler(event);
                invoked += 1;
            }

            if !event.bubbles || event.is_propagation_stopped() {
                break;
            }
            current = self.parent(node);
        }

        tracing::trace!("Dispatched {:?} at {}: {} handlers", event.event_type, id, invoked);
        invoked
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over a node's children
pub struct Children<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl<'a> Iterator for Children<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        if !self.next.is_valid() {
            return None;
        }
        let id = self.next;
        let node = self.tree.get(id)?;
        self.next = node.next_sibling;
        Some((id, node))
    }
}
