//! Instantiation Controller
//!
//! Owns the source fragment handle and the ordered list of produced
//! instances. Every call takes the host tree explicitly; the templater
//! itself holds only node handles.

use templater_dom::{DomTree, FragmentSource, NodeId, Target, TreeSink};

use crate::engine::MappingEngine;
use crate::{MapperSource, Result, TemplaterError, TemplaterOptions};

/// Top-level nodes produced by one clone-and-map pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance {
    nodes: Vec<NodeId>,
}

impl Instance {
    /// Produced nodes in document order
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Clones a source fragment per mapper and tracks the results
#[derive(Debug)]
pub struct Templater {
    source: NodeId,
    target: Target,
    container: Option<NodeId>,
    options: TemplaterOptions,
    instances: Vec<Instance>,
}

impl Templater {
    /// Resolve `source` and prepare it for cloning.
    ///
    /// With `append_to_parent` the source must have a parent; that parent
    /// becomes the container instances are appended to. With
    /// `remove_from_dom` the source is detached once, here.
    pub fn new(tree: &mut DomTree, source: impl Into<Target>, options: TemplaterOptions) -> Result<Self> {
        let target = source.into();
        let Some(source) = tree.resolve_fragment(&target) else {
            return Err(TemplaterError::SourceNotFound { target });
        };

        let container = tree.parent_of(source);
        if options.append_to_parent && container.is_none() {
            return Err(TemplaterError::NoContainer { target });
        }

        if options.remove_from_dom {
            tree.detach_fragment(source);
        }

        tracing::debug!(
            "Templater for {} (source {}, container {:?}, {:?})",
            target, source, container, options
        );

        Ok(Self {
            source,
            target,
            container,
            options,
            instances: Vec::new(),
        })
    }

    /// Clone the source once per mapper and apply each mapper to its clone.
    ///
    /// No mappers (including an empty sequence) produce one unmodified clone.
    /// With `append_to_parent` each clone's nodes are appended to the
    /// container as they are produced; otherwise they stay detached until
    /// [`append_to`](Self::append_to).
    pub fn instantiate<'a>(&mut self, tree: &mut DomTree, mappers: impl MapperSource<'a>) -> &mut Self {
        let mappers = mappers.into_mappers();
        tracing::debug!("Instantiating {} with {} mappers", self.target, mappers.len());

        if mappers.is_empty() {
            self.produce(tree, None);
        }
        for mapper in mappers {
            self.produce(tree, Some(mapper));
        }
        self
    }

    fn produce(&mut self, tree: &mut DomTree, mapper: Option<&crate::ElementMapper>) {
        let clone = match tree.clone_content(self.source) {
            Ok(clone) => clone,
            Err(err) => {
                tracing::warn!("Cannot clone {}: {}", self.target, err);
                return;
            }
        };
        if let Some(mapper) = mapper {
            MappingEngine::apply(tree, clone, mapper);
        }

        // Instance nodes outlive the wrapper fragment
        let nodes = tree.child_ids(clone);
        for &node in &nodes {
            tree.detach(node);
        }
        tree.release(clone);
        tracing::trace!("Produced {} nodes from {}", nodes.len(), self.target);

        if self.options.append_to_parent {
            if let Some(container) = self.container {
                if let Err(err) = tree.append_nodes(container, &nodes) {
                    tracing::warn!("Cannot append instance of {}: {}", self.target, err);
                }
            }
        }
        self.instances.push(Instance { nodes });
    }

    /// Move every tracked node, in order, to the end of `target`
    pub fn append_to(&mut self, tree: &mut DomTree, target: impl Into<Target>) -> Result<&mut Self> {
        let target = target.into();
        let Some(container) = tree.resolve_container(&target) else {
            return Err(TemplaterError::TargetNotFound { target });
        };

        let nodes: Vec<NodeId> = self.nodes().collect();
        tree.append_nodes(container, &nodes)?;
        tracing::debug!("Appended {} nodes of {} to {}", nodes.len(), self.target, target);
        Ok(self)
    }

    /// Remove every tracked node and forget them. Their slots are recycled,
    /// so IDs taken from [`nodes`](Self::nodes) are stale afterwards. The
    /// source is untouched.
    pub fn clear(&mut self, tree: &mut DomTree) -> &mut Self {
        let mut removed = 0;
        for node in self.instances.drain(..).flat_map(|i| i.nodes) {
            tree.remove_node(node);
            removed += 1;
        }
        tracing::debug!("Cleared {} nodes of {}", removed, self.target);
        self
    }

    /// Instances in creation order
    pub fn instances(&self) -> &[Instance] {
        &self.instances
    }

    /// Every tracked node, in creation order
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.instances.iter().flat_map(|i| i.nodes.iter().copied())
    }

    /// The resolved source fragment
    pub fn source(&self) -> NodeId {
        self.source
    }

    /// The source's parent at construction
    pub fn container(&self) -> Option<NodeId> {
        self.container
    }

    pub fn options(&self) -> &TemplaterOptions {
        &self.options
    }
}
