//! Search tree with arena allocation.
//!
//! Nodes are stored in a contiguous `Vec` and referenced by `NodeId`
//! indices; parent links are plain indices, so subtrees carry no ownership
//! cycles. Backpropagation applies one score to an explicitly recorded
//! path rather than walking parent links, because the same iteration score
//! is shared by every node the select phase visited.

use maze_core::Dir;

use crate::node::{MctsNode, NodeId};

/// Arena-backed search tree.
#[derive(Debug, Clone)]
pub struct MctsTree {
    nodes: Vec<MctsNode>,
    root: NodeId,
}

impl MctsTree {
    /// Create a tree holding a single fresh root.
    pub fn new() -> Self {
        Self {
            nodes: vec![MctsNode::new_root()],
            root: NodeId(0),
        }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> &MctsNode {
        &self.nodes[id.0 as usize]
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut MctsNode {
        &mut self.nodes[id.0 as usize]
    }

    /// Total number of nodes in the arena.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn allocate(&mut self, node: MctsNode) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Add one child for `mv` under `parent` and return its id.
    pub fn add_child(&mut self, parent: NodeId, mv: Dir) -> NodeId {
        debug_assert!(
            !self.get(parent).children.iter().any(|&(m, _)| m == mv),
            "duplicate child move {mv:?}"
        );
        let child = self.allocate(MctsNode::new_child(parent, mv));
        self.get_mut(parent).children.push((mv, child));
        child
    }

    /// Expand `node` with one child per move, in the given order.
    pub fn expand(&mut self, node: NodeId, moves: &[Dir]) {
        for &mv in moves {
            self.add_child(node, mv);
        }
    }

    /// Child ids of `node` in creation order.
    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.get(node).children.iter().map(|&(_, id)| id).collect()
    }

    /// Whether any direct child of `node` eats a pill on its own move.
    pub fn any_child_eats_pill(&self, node: NodeId) -> bool {
        self.get(node)
            .children
            .iter()
            .any(|&(_, id)| self.get(id).eats_pill)
    }

    /// Apply the same score to every node on `path`, updating each node's
    /// running mean and visit count independently.
    pub fn backpropagate(&mut self, path: &[NodeId], score: f64) {
        for &id in path {
            self.get_mut(id).update_score(score);
        }
    }

    /// The root child with the highest effective value, or `None` when the
    /// root is unexpanded. Ties break to the first-created child.
    pub fn best_child(&self) -> Option<NodeId> {
        let mut best = None;
        let mut max = f64::NEG_INFINITY;
        for &(_, id) in &self.get(self.root).children {
            let value = self.get(id).effective_value();
            if value > max {
                max = value;
                best = Some(id);
            }
        }
        best
    }

    /// Transfer ownership of the subtree rooted at `new_root` into a fresh
    /// tree, discarding every sibling branch. Used to carry the chosen
    /// child across consecutive real decisions.
    pub fn promote(&self, new_root: NodeId) -> MctsTree {
        let mut tree = MctsTree {
            nodes: Vec::new(),
            root: NodeId(0),
        };

        let mut root = self.get(new_root).clone();
        root.parent = NodeId::NONE;
        root.children.clear();
        let root_id = tree.allocate(root);

        // (old id, new parent id) pairs still to copy under. Breadth-first
        // so each parent's children keep their creation order.
        let mut pending: std::collections::VecDeque<(NodeId, NodeId)> = self
            .get(new_root)
            .children
            .iter()
            .map(|&(_, id)| (id, root_id))
            .collect();

        while let Some((old_id, new_parent)) = pending.pop_front() {
            let mut node = self.get(old_id).clone();
            let old_children = std::mem::take(&mut node.children);
            node.parent = new_parent;
            let mv = node.mv;
            let new_id = tree.allocate(node);
            tree.get_mut(new_parent).children.push((mv, new_id));
            for &(_, id) in &old_children {
                pending.push_back((id, new_id));
            }
        }

        tree
    }
}

impl Default for MctsTree {
    fn default() -> Self {
        Self::new()
    }
}
