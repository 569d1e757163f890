use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::TreeError;
use crate::id::{CuidGenerator, IdGenerator, NodeId};
use crate::node::Node;
use crate::traverse::{NodeFilter, Traversal};

/// Owning container of [`Node`]s plus the designated root identity.
///
/// The tree is the sole owner of an id-indexed, insertion-ordered node
/// table. Every public operation either fully succeeds or leaves the tree
/// unmodified: existence and cycle checks run before any mutation step.
pub struct Tree<D> {
    nodes: IndexMap<NodeId, Node<D>>,
    root: Option<NodeId>,
    ids: Arc<dyn IdGenerator>,
}

impl<D> Tree<D> {
    pub fn new() -> Self {
        Self::with_ids(CuidGenerator)
    }

    /// New empty tree with an injected id-generation strategy, consulted by
    /// [`create_node`](Self::create_node) when no explicit id is given.
    pub fn with_ids(ids: impl IdGenerator + 'static) -> Self {
        Self {
            nodes: IndexMap::new(),
            root: None,
            ids: Arc::new(ids),
        }
    }

    pub fn root(&self) -> Option<&NodeId> {
        self.root.as_ref()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn get(&self, id: &NodeId) -> Result<&Node<D>, TreeError> {
        self.nodes
            .get(id)
            .ok_or_else(|| TreeError::NodeNotFound(id.clone()))
    }

    pub fn get_mut(&mut self, id: &NodeId) -> Result<&mut Node<D>, TreeError> {
        self.nodes
            .get_mut(id)
            .ok_or_else(|| TreeError::NodeNotFound(id.clone()))
    }

    /// Like [`get`](Self::get), but absent ids yield `None` instead of an
    /// error.
    pub fn get_node(&self, id: &NodeId) -> Option<&Node<D>> {
        self.nodes.get(id)
    }

    /// All node ids in insertion order.
    pub fn node_ids(&self) -> impl Iterator<Item = &NodeId> {
        self.nodes.keys()
    }

    /// All nodes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Node<D>> {
        self.nodes.values()
    }

    /// All nodes passing the predicate, in insertion order.
    pub fn filter_nodes<'a, F>(&'a self, predicate: F) -> impl Iterator<Item = &'a Node<D>>
    where
        F: Fn(&Node<D>) -> bool + 'a,
    {
        self.iter().filter(move |node| predicate(node))
    }

    /// Insert a pre-built node under `parent`, or as root when `parent` is
    /// `None`.
    ///
    /// The node enters the tree as a leaf: any parent or child links it
    /// carries (a node cloned out of another tree, say) are discarded, so
    /// the tree never holds a link to an id it does not own.
    pub fn add_node(&mut self, node: Node<D>, parent: Option<&NodeId>) -> Result<(), TreeError> {
        if self.contains(node.id()) {
            return Err(TreeError::DuplicatedNode(node.id().clone()));
        }
        match parent {
            None => {
                if self.root.is_some() {
                    return Err(TreeError::MultipleRoots);
                }
            }
            Some(pid) => {
                if !self.contains(pid) {
                    return Err(TreeError::NodeNotFound(pid.clone()));
                }
            }
        }

        let id = node.id().clone();
        let mut node = node;
        node.set_parent(parent.cloned());
        node.clear_children();
        self.nodes.insert(id.clone(), node);
        match parent {
            None => self.root = Some(id),
            Some(pid) => {
                if let Ok(parent_node) = self.get_mut(pid) {
                    parent_node.add_child(id);
                }
            }
        }
        Ok(())
    }

    /// Construct and insert a node in one step, returning its id.
    ///
    /// The id is drawn from the tree's generator when absent; the tag
    /// defaults to the id's string form when absent.
    pub fn create_node(
        &mut self,
        tag: Option<&str>,
        id: Option<NodeId>,
        parent: Option<&NodeId>,
        data: Option<D>,
    ) -> Result<NodeId, TreeError> {
        let id = id.unwrap_or_else(|| self.ids.generate());
        let tag = tag.map_or_else(|| id.to_string(), str::to_owned);
        let mut node = Node::new(tag, id.clone());
        node.set_data(data);
        self.add_node(node, parent)?;
        Ok(id)
    }

    /// Delete `id` and its entire subtree, returning the number of removed
    /// nodes. Removing the root empties the tree.
    pub fn remove_node(&mut self, id: &NodeId) -> Result<usize, TreeError> {
        let removed: Vec<NodeId> = self.expand(Some(id))?.descend_collapsed(true).collect();
        let parent = self.get(id)?.parent().cloned();

        for rid in &removed {
            self.nodes.shift_remove(rid);
        }
        if let Some(pid) = parent {
            if let Ok(parent_node) = self.get_mut(&pid) {
                parent_node.remove_child(id);
            }
        }
        if self.root.as_ref() == Some(id) {
            self.root = None;
        }
        tracing::debug!("removed {} nodes under '{}'", removed.len(), id);
        Ok(removed.len())
    }

    /// Detach `id` and its subtree into a new tree owning the detached
    /// nodes, with `id` as its root.
    pub fn remove_subtree(&mut self, id: &NodeId) -> Result<Tree<D>, TreeError> {
        let detached: Vec<NodeId> = self.expand(Some(id))?.descend_collapsed(true).collect();
        let parent = self.get(id)?.parent().cloned();

        let mut subtree = Tree {
            nodes: IndexMap::new(),
            root: Some(id.clone()),
            ids: Arc::clone(&self.ids),
        };
        for rid in &detached {
            if let Some(node) = self.nodes.shift_remove(rid) {
                subtree.nodes.insert(rid.clone(), node);
            }
        }
        if let Ok(new_root) = subtree.get_mut(id) {
            new_root.set_parent(None);
        }
        if let Some(pid) = parent {
            if let Ok(parent_node) = self.get_mut(&pid) {
                parent_node.remove_child(id);
            }
        }
        if self.root.as_ref() == Some(id) {
            self.root = None;
        }
        tracing::debug!("detached {} nodes under '{}'", detached.len(), id);
        Ok(subtree)
    }

    /// Splice a single non-root node out of the hierarchy, reattaching its
    /// children to its former parent. For `a -> b -> c`, linking past `b`
    /// leaves `a -> c` with `c`'s descendants untouched.
    pub fn link_past_node(&mut self, id: &NodeId) -> Result<(), TreeError> {
        let node = self.get(id)?;
        if self.root.as_ref() == Some(id) {
            return Err(TreeError::CannotLinkPastRoot);
        }
        let Some(pid) = node.parent().cloned() else {
            return Err(TreeError::CannotLinkPastRoot);
        };
        let children: Vec<NodeId> = node.children().to_vec();

        for child in &children {
            if let Ok(child_node) = self.get_mut(child) {
                child_node.set_parent(Some(pid.clone()));
            }
        }
        let parent_node = self.get_mut(&pid)?;
        parent_node.append_children(children);
        parent_node.remove_child(id);
        self.nodes.shift_remove(id);
        Ok(())
    }

    /// Re-parent `source` under `destination`.
    ///
    /// Fails with [`TreeError::LoopDetected`] when `destination` lies inside
    /// `source`'s subtree (or equals it); the tree is left unchanged.
    pub fn move_node(&mut self, source: &NodeId, destination: &NodeId) -> Result<(), TreeError> {
        if !self.contains(source) {
            return Err(TreeError::NodeNotFound(source.clone()));
        }
        if !self.contains(destination) {
            return Err(TreeError::NodeNotFound(destination.clone()));
        }
        if source == destination || self.is_ancestor(source, destination) {
            return Err(TreeError::LoopDetected {
                node: source.clone(),
                destination: destination.clone(),
            });
        }

        let old_parent = self.get(source)?.parent().cloned();
        if let Some(pid) = old_parent {
            if let Ok(parent_node) = self.get_mut(&pid) {
                parent_node.remove_child(source);
            }
        }
        self.get_mut(destination)?.add_child(source.clone());
        self.get_mut(source)?.set_parent(Some(destination.clone()));
        tracing::trace!("moved '{}' under '{}'", source, destination);
        Ok(())
    }

    /// True iff walking `grandchild`'s parent chain upward reaches
    /// `ancestor`.
    pub fn is_ancestor(&self, ancestor: &NodeId, grandchild: &NodeId) -> bool {
        let mut current = self.get_node(grandchild).and_then(Node::parent);
        while let Some(pid) = current {
            if pid == ancestor {
                return true;
            }
            current = self.get_node(pid).and_then(Node::parent);
        }
        false
    }

    /// Merge `other`'s full node set into this tree as a child of `id`,
    /// taking ownership of the incoming nodes. Pasting an empty tree is a
    /// no-op. For a deep paste, clone `other` first.
    pub fn paste(&mut self, id: &NodeId, other: Tree<D>) -> Result<(), TreeError> {
        if !self.contains(id) {
            return Err(TreeError::NodeNotFound(id.clone()));
        }
        let Some(other_root) = other.root.clone() else {
            return Ok(());
        };

        let joint: Vec<NodeId> = other
            .nodes
            .keys()
            .filter(|key| self.contains(key))
            .cloned()
            .collect();
        if !joint.is_empty() {
            return Err(TreeError::DuplicatedNodes(joint));
        }

        let count = other.nodes.len();
        self.nodes.extend(other.nodes);
        if let Ok(anchor) = self.get_mut(id) {
            anchor.add_child(other_root.clone());
        }
        if let Ok(pasted_root) = self.get_mut(&other_root) {
            pasted_root.set_parent(Some(id.clone()));
        }
        tracing::trace!("pasted {} nodes under '{}'", count, id);
        Ok(())
    }

    /// Lazy traversal of node ids starting at `start` (the root when
    /// `None`). Configure mode, filter, sibling ordering and collapsed-node
    /// descent on the returned [`Traversal`] before iterating.
    pub fn expand(&self, start: Option<&NodeId>) -> Result<Traversal<'_, D>, TreeError> {
        let start = match start {
            Some(id) => {
                if !self.contains(id) {
                    return Err(TreeError::NodeNotFound(id.clone()));
                }
                id.clone()
            }
            None => self.root.clone().ok_or(TreeError::EmptyTree)?,
        };
        Ok(Traversal::new(self, start))
    }

    /// Lazy sequence from `id` up through its ancestors to the root,
    /// inclusive. A filter, when given, excludes single ancestors from the
    /// output without stopping the climb.
    pub fn rsearch<'a>(
        &'a self,
        id: &NodeId,
        filter: Option<&'a NodeFilter<D>>,
    ) -> Result<impl Iterator<Item = &'a NodeId>, TreeError> {
        let (start, _) = self
            .nodes
            .get_key_value(id)
            .ok_or_else(|| TreeError::NodeNotFound(id.clone()))?;

        let chain = std::iter::successors(Some(start), move |current| {
            if self.root.as_ref() == Some(*current) {
                None
            } else {
                self.get_node(current).and_then(Node::parent)
            }
        });
        Ok(chain.filter(move |id| match filter {
            None => true,
            Some(predicate) => self.get_node(id).is_some_and(|node| predicate(node)),
        }))
    }

    /// Level of `id`, the root living at level 0. Ancestors failing the
    /// filter are not counted.
    pub fn level(
        &self,
        id: &NodeId,
        filter: Option<&NodeFilter<D>>,
    ) -> Result<usize, TreeError> {
        Ok(self.rsearch(id, filter)?.count().saturating_sub(1))
    }

    /// Maximum level among all leaves, or the level of the given node.
    pub fn depth(&self, node: Option<&NodeId>) -> Result<usize, TreeError> {
        match node {
            Some(id) => self.level(id, None),
            None => {
                let mut max = 0;
                for leaf in self.leaves(None)? {
                    max = max.max(self.level(leaf.id(), None)?);
                }
                Ok(max)
            }
        }
    }

    /// Nodes with no children, tree-wide or within the subtree rooted at
    /// `start`.
    pub fn leaves(&self, start: Option<&NodeId>) -> Result<Vec<&Node<D>>, TreeError> {
        match start {
            None => Ok(self.iter().filter(|node| node.is_leaf()).collect()),
            Some(id) => {
                let ids: Vec<NodeId> = self.expand(Some(id))?.descend_collapsed(true).collect();
                Ok(ids
                    .iter()
                    .filter_map(|nid| self.get_node(nid))
                    .filter(|node| node.is_leaf())
                    .collect())
            }
        }
    }

    /// Root-to-leaf id sequence for every leaf.
    pub fn paths_to_leaves(&self) -> Vec<Vec<NodeId>> {
        let Ok(leaves) = self.leaves(None) else {
            return Vec::new();
        };
        leaves
            .into_iter()
            .filter_map(|leaf| {
                let mut path: Vec<NodeId> =
                    self.rsearch(leaf.id(), None).ok()?.cloned().collect();
                path.reverse();
                Some(path)
            })
            .collect()
    }

    /// Parent node of `id`, `None` for the root.
    pub fn parent(&self, id: &NodeId) -> Result<Option<&Node<D>>, TreeError> {
        let node = self.get(id)?;
        Ok(node.parent().and_then(|pid| self.get_node(pid)))
    }

    /// Child nodes of `id` in insertion order.
    pub fn children(&self, id: &NodeId) -> Result<Vec<&Node<D>>, TreeError> {
        Ok(self
            .child_ids(id)?
            .iter()
            .filter_map(|child| self.get_node(child))
            .collect())
    }

    /// Child ids of `id` in insertion order.
    pub fn child_ids(&self, id: &NodeId) -> Result<&[NodeId], TreeError> {
        Ok(self.get(id)?.children())
    }

    /// Other children of `id`'s parent; empty for the root.
    pub fn siblings(&self, id: &NodeId) -> Result<Vec<&Node<D>>, TreeError> {
        let node = self.get(id)?;
        let Some(pid) = node.parent() else {
            return Ok(Vec::new());
        };
        Ok(self
            .children(pid)?
            .into_iter()
            .filter(|sibling| sibling.id() != id)
            .collect())
    }

    /// Total node count, or the count of nodes living at the given level.
    pub fn size(&self, level: Option<usize>) -> usize {
        match level {
            None => self.len(),
            Some(level) => self
                .node_ids()
                .filter(|id| self.level(id, None).is_ok_and(|l| l == level))
                .count(),
        }
    }
}

impl<D: Clone> Tree<D> {
    /// Detached snapshot of the subtree rooted at `id`: a new tree owning
    /// clones of the reachable nodes. The original is unaffected by
    /// mutations of the snapshot.
    pub fn subtree(&self, id: &NodeId) -> Result<Tree<D>, TreeError> {
        let ids: Vec<NodeId> = self.expand(Some(id))?.descend_collapsed(true).collect();
        let mut result = Tree {
            nodes: IndexMap::new(),
            root: Some(id.clone()),
            ids: Arc::clone(&self.ids),
        };
        for nid in &ids {
            if let Ok(node) = self.get(nid) {
                result.nodes.insert(nid.clone(), node.clone());
            }
        }
        if let Ok(new_root) = result.get_mut(id) {
            new_root.set_parent(None);
        }
        Ok(result)
    }
}

impl<D> Default for Tree<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Clone> Clone for Tree<D> {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes.clone(),
            root: self.root.clone(),
            ids: Arc::clone(&self.ids),
        }
    }
}

impl<D: Debug> Debug for Tree<D> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("root", &self.root)
            .field("nodes", &self.nodes)
            .finish_non_exhaustive()
    }
}
