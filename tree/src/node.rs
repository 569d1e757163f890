use crate::id::NodeId;

/// Elementary record stored in a [`Tree`](crate::Tree).
///
/// A node carries its identity, a display tag, links to its parent and
/// ordered children, a visibility flag and an optional opaque payload. Nodes
/// never hold a reference back to their owning tree; the tree is the sole
/// owner of the id-indexed node table, and all structural links are plain
/// ids resolved through it.
#[derive(Debug, Clone)]
pub struct Node<D> {
    id: NodeId,
    tag: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    expanded: bool,
    data: Option<D>,
}

impl<D> Node<D> {
    pub fn new(tag: impl Into<String>, id: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            tag: tag.into(),
            parent: None,
            children: Vec::new(),
            expanded: true,
            data: None,
        }
    }

    pub fn with_data(mut self, data: D) -> Self {
        self.data = Some(data);
        self
    }

    /// Mark the node collapsed: traversal, rendering and serialization treat
    /// it as a leaf and do not descend into its children.
    pub fn collapsed(mut self) -> Self {
        self.expanded = false;
        self
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn set_tag(&mut self, tag: impl Into<String>) {
        self.tag = tag.into();
    }

    pub fn parent(&self) -> Option<&NodeId> {
        self.parent.as_ref()
    }

    pub(crate) fn set_parent(&mut self, parent: Option<NodeId>) {
        self.parent = parent;
    }

    /// Child ids in insertion order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn expanded(&self) -> bool {
        self.expanded
    }

    pub fn set_expanded(&mut self, expanded: bool) {
        self.expanded = expanded;
    }

    pub fn data(&self) -> Option<&D> {
        self.data.as_ref()
    }

    pub fn data_mut(&mut self) -> Option<&mut D> {
        self.data.as_mut()
    }

    pub fn set_data(&mut self, data: Option<D>) {
        self.data = data;
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub(crate) fn add_child(&mut self, id: NodeId) {
        if !self.children.contains(&id) {
            self.children.push(id);
        }
    }

    pub(crate) fn remove_child(&mut self, id: &NodeId) {
        self.children.retain(|child| child != id);
    }

    pub(crate) fn clear_children(&mut self) {
        self.children.clear();
    }

    pub(crate) fn append_children(&mut self, ids: impl IntoIterator<Item = NodeId>) {
        for id in ids {
            self.add_child(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_node_defaults() {
        let node: Node<()> = Node::new("Test One", "identifier 1");
        assert_eq!(node.tag(), "Test One");
        assert_eq!(node.id(), &NodeId::from("identifier 1"));
        assert!(node.expanded());
        assert!(node.parent().is_none());
        assert!(node.children().is_empty());
        assert!(node.data().is_none());
        assert!(node.is_leaf());
        assert!(node.is_root());
    }

    #[test]
    fn add_and_remove_child() {
        let mut node: Node<()> = Node::new("Test One", "id 1");
        node.add_child(NodeId::from("id 2"));
        node.add_child(NodeId::from("id 2"));
        assert_eq!(node.children(), &[NodeId::from("id 2")]);
        assert!(!node.is_leaf());

        node.remove_child(&NodeId::from("id 2"));
        assert!(node.children().is_empty());
    }

    #[test]
    fn builder_helpers() {
        let node = Node::new("Rose", "rose").with_data("red").collapsed();
        assert_eq!(node.data(), Some(&"red"));
        assert!(!node.expanded());
    }

    #[test]
    fn payload_is_mutable() {
        let mut node = Node::new("Rose", "rose").with_data(String::from("red"));
        if let Some(color) = node.data_mut() {
            *color = String::from("white");
        }
        assert_eq!(node.data(), Some(&String::from("white")));
    }
}
