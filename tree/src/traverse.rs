use std::cmp::Ordering;
use std::collections::VecDeque;
use std::mem;

use crate::id::NodeId;
use crate::node::Node;
use crate::tree::Tree;

/// Predicate deciding whether a node is visited.
///
/// A node failing the filter is pruned: it is excluded from the output and
/// its subtree is not explored beneath it.
pub type NodeFilter<D> = dyn Fn(&Node<D>) -> bool;

/// Comparator ordering siblings at each expansion step.
pub type NodeCmp<D> = dyn Fn(&Node<D>, &Node<D>) -> Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TraversalMode {
    /// Pre-order depth-first walk.
    #[default]
    Depth,
    /// Breadth-first, level by level.
    Width,
    /// Level order alternating direction per level (boustrophedon).
    ZigZag,
}

/// Apply the sibling-ordering rule shared by the traversal engine, the
/// renderer and the serializer: sort by the comparator when given (stable,
/// descending if `reverse`), otherwise reverse natural order when `reverse`
/// is set, otherwise keep insertion order.
pub fn order_siblings<D>(siblings: &mut [&Node<D>], cmp: Option<&NodeCmp<D>>, reverse: bool) {
    match cmp {
        Some(cmp) if reverse => siblings.sort_by(|a, b| cmp(b, a)),
        Some(cmp) => siblings.sort_by(|a, b| cmp(a, b)),
        None if reverse => siblings.reverse(),
        None => {}
    }
}

enum State {
    /// Depth and Width share a queue; Depth prepends expansions, Width
    /// appends them.
    Linear { queue: VecDeque<NodeId> },
    ZigZag {
        stack: VecDeque<NodeId>,
        next: VecDeque<NodeId>,
        backward: bool,
    },
    Done,
}

/// Lazy, finite, forward-only sequence of node ids.
///
/// Produced by [`Tree::expand`]; configured builder-style before the first
/// call to `next`. Each `Traversal` starts fresh from its start node. The
/// iterator borrows the tree, so mutating the tree while a traversal is
/// still being consumed is rejected at compile time.
pub struct Traversal<'a, D> {
    tree: &'a Tree<D>,
    start: NodeId,
    mode: TraversalMode,
    filter: Option<&'a NodeFilter<D>>,
    cmp: Option<&'a NodeCmp<D>>,
    reverse: bool,
    descend_collapsed: bool,
    state: Option<State>,
}

impl<'a, D> Traversal<'a, D> {
    pub(crate) fn new(tree: &'a Tree<D>, start: NodeId) -> Self {
        Self {
            tree,
            start,
            mode: TraversalMode::default(),
            filter: None,
            cmp: None,
            reverse: false,
            descend_collapsed: false,
            state: None,
        }
    }

    pub fn mode(mut self, mode: TraversalMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn filter(mut self, filter: &'a NodeFilter<D>) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn sort_by(mut self, cmp: &'a NodeCmp<D>) -> Self {
        self.cmp = Some(cmp);
        self
    }

    pub fn reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    /// Descend into collapsed nodes as well.
    ///
    /// Structural operations (remove, detach, subtree extraction) must cover
    /// the full subtree even below nodes with `expanded == false`.
    pub fn descend_collapsed(mut self, descend: bool) -> Self {
        self.descend_collapsed = descend;
        self
    }

    fn passes(&self, node: &Node<D>) -> bool {
        self.filter.is_none_or(|filter| filter(node))
    }

    /// Children of `id` passing the filter, in insertion order. Empty when
    /// the node is collapsed (unless descending into collapsed nodes).
    fn visible_children(&self, id: &NodeId) -> Vec<NodeId> {
        let Some(node) = self.tree.get_node(id) else {
            return Vec::new();
        };
        if !node.expanded() && !self.descend_collapsed {
            return Vec::new();
        }
        node.children()
            .iter()
            .filter_map(|child| self.tree.get_node(child))
            .filter(|child| self.passes(child))
            .map(|child| child.id().clone())
            .collect()
    }

    /// Visible children with the sibling-ordering rule applied.
    fn ordered_children(&self, id: &NodeId) -> Vec<NodeId> {
        let ids = self.visible_children(id);
        let mut nodes: Vec<&Node<D>> = ids
            .iter()
            .filter_map(|child| self.tree.get_node(child))
            .collect();
        order_siblings(&mut nodes, self.cmp, self.reverse);
        nodes.into_iter().map(|node| node.id().clone()).collect()
    }

    fn seed(&mut self) -> Option<NodeId> {
        let start = self.start.clone();
        let Some(node) = self.tree.get_node(&start) else {
            self.state = Some(State::Done);
            return None;
        };
        if !self.passes(node) {
            self.state = Some(State::Done);
            return None;
        }

        self.state = Some(match self.mode {
            TraversalMode::Depth | TraversalMode::Width => State::Linear {
                queue: self.ordered_children(&start).into(),
            },
            TraversalMode::ZigZag => {
                // First level is consumed back to front; expansions then
                // flip direction every time the working stack drains.
                let mut children = self.visible_children(&start);
                children.reverse();
                State::ZigZag {
                    stack: children.into(),
                    next: VecDeque::new(),
                    backward: false,
                }
            }
        });
        Some(start)
    }
}

impl<D> Iterator for Traversal<'_, D> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if self.state.is_none() {
            return self.seed();
        }

        let mut state = self.state.take()?;
        let item = match &mut state {
            State::Done => None,
            State::Linear { queue } => match queue.pop_front() {
                None => None,
                Some(id) => {
                    let expansion = self.ordered_children(&id);
                    match self.mode {
                        TraversalMode::Depth => {
                            for child in expansion.into_iter().rev() {
                                queue.push_front(child);
                            }
                        }
                        TraversalMode::Width => queue.extend(expansion),
                        // zigzag never uses the linear state
                        TraversalMode::ZigZag => {}
                    }
                    Some(id)
                }
            },
            State::ZigZag {
                stack,
                next,
                backward,
            } => {
                if stack.is_empty() && !next.is_empty() {
                    mem::swap(stack, next);
                    *backward = !*backward;
                }
                match stack.pop_front() {
                    None => None,
                    Some(id) => {
                        let mut expansion = self.visible_children(&id);
                        if *backward {
                            expansion.reverse();
                        }
                        for child in expansion.into_iter().rev() {
                            next.push_front(child);
                        }
                        Some(id)
                    }
                }
            }
        };
        self.state = Some(state);
        item
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TreeError;
    use crate::tree::Tree;

    fn family() -> Tree<()> {
        let mut tree = Tree::new();
        tree.create_node(Some("Hárry"), Some("hárry".into()), None, None)
            .unwrap();
        tree.create_node(
            Some("Jane"),
            Some("jane".into()),
            Some(&"hárry".into()),
            None,
        )
        .unwrap();
        tree.create_node(
            Some("Bill"),
            Some("bill".into()),
            Some(&"hárry".into()),
            None,
        )
        .unwrap();
        tree.create_node(
            Some("Diane"),
            Some("diane".into()),
            Some(&"jane".into()),
            None,
        )
        .unwrap();
        tree.create_node(
            Some("George"),
            Some("george".into()),
            Some(&"bill".into()),
            None,
        )
        .unwrap();
        tree
    }

    fn ids(traversal: Traversal<'_, ()>) -> Vec<String> {
        traversal.map(|id| id.to_string()).collect()
    }

    #[test]
    fn depth_is_preorder_in_insertion_order() {
        let tree = family();
        assert_eq!(
            ids(tree.expand(None).unwrap()),
            ["hárry", "jane", "diane", "bill", "george"]
        );
    }

    #[test]
    fn width_is_level_order() {
        let tree = family();
        assert_eq!(
            ids(tree.expand(None).unwrap().mode(TraversalMode::Width)),
            ["hárry", "jane", "bill", "diane", "george"]
        );
    }

    #[test]
    fn zigzag_alternates_direction_per_level() {
        let tree = family();
        assert_eq!(
            ids(tree.expand(None).unwrap().mode(TraversalMode::ZigZag)),
            ["hárry", "bill", "jane", "diane", "george"]
        );
    }

    #[test]
    fn zigzag_three_levels() {
        let mut tree = Tree::new();
        tree.create_node(Some("r"), Some("r".into()), None, None)
            .unwrap();
        for (id, parent) in [
            ("a", "r"),
            ("b", "r"),
            ("c", "r"),
            ("a1", "a"),
            ("a2", "a"),
            ("b1", "b"),
            ("c1", "c"),
        ] {
            tree.create_node(Some(id), Some(id.into()), Some(&parent.into()), None)
                .unwrap();
        }
        // level 1 backward, level 2 forward
        assert_eq!(
            ids(tree.expand(None).unwrap().mode(TraversalMode::ZigZag)),
            ["r", "c", "b", "a", "a1", "a2", "b1", "c1"]
        );
    }

    #[test]
    fn traversal_visits_every_node_once() {
        let tree = family();
        for mode in [
            TraversalMode::Depth,
            TraversalMode::Width,
            TraversalMode::ZigZag,
        ] {
            let mut visited = ids(tree.expand(None).unwrap().mode(mode));
            assert_eq!(visited.len(), tree.size(None));
            visited.sort();
            visited.dedup();
            assert_eq!(visited.len(), tree.size(None));
        }
    }

    #[test]
    fn expand_from_inner_node() {
        let tree = family();
        assert_eq!(
            ids(tree.expand(Some(&"bill".into())).unwrap()),
            ["bill", "george"]
        );
    }

    #[test]
    fn filter_prunes_whole_subtree() {
        let tree = family();
        let keep = |node: &Node<()>| node.tag() != "Jane";
        assert_eq!(
            ids(tree.expand(None).unwrap().filter(&keep)),
            ["hárry", "bill", "george"]
        );

        let none = |node: &Node<()>| node.tag() == "Bill";
        assert!(ids(tree.expand(None).unwrap().filter(&none)).is_empty());
    }

    #[test]
    fn sort_by_orders_each_level() {
        let tree = family();
        let by_tag = |a: &Node<()>, b: &Node<()>| a.tag().cmp(b.tag());
        assert_eq!(
            ids(tree.expand(None).unwrap().sort_by(&by_tag)),
            ["hárry", "bill", "george", "jane", "diane"]
        );
        assert_eq!(
            ids(tree.expand(None).unwrap().sort_by(&by_tag).reverse(true)),
            ["hárry", "jane", "diane", "bill", "george"]
        );
    }

    #[test]
    fn reverse_without_comparator_flips_insertion_order() {
        let tree = family();
        assert_eq!(
            ids(tree.expand(None).unwrap().reverse(true)),
            ["hárry", "bill", "george", "jane", "diane"]
        );
    }

    #[test]
    fn collapsed_node_blocks_descent() {
        let mut tree = family();
        tree.get_mut(&"jane".into()).unwrap().set_expanded(false);
        assert_eq!(
            ids(tree.expand(None).unwrap()),
            ["hárry", "jane", "bill", "george"]
        );
        assert_eq!(
            ids(tree.expand(None).unwrap().descend_collapsed(true)),
            ["hárry", "jane", "diane", "bill", "george"]
        );
    }

    #[test]
    fn expand_unknown_start_fails() {
        let tree = family();
        assert!(matches!(
            tree.expand(Some(&"alien".into())),
            Err(TreeError::NodeNotFound(_))
        ));
    }

    #[test]
    fn expand_empty_tree_fails() {
        let tree: Tree<()> = Tree::new();
        assert!(matches!(tree.expand(None), Err(TreeError::EmptyTree)));
    }
}
