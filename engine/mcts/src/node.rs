//! Search tree node representation.
//!
//! Each node carries the statistics for one agent move: how often the
//! branch was sampled, the running mean of the scores backpropagated
//! through it, and the additive bonus assigned by the evaluator pipeline.
//! Nodes live in an arena and refer to each other by index, so the parent
//! back-reference is a plain non-owning id and no reference cycles exist.

use maze_core::Dir;

/// Index into the node arena. Using a newtype for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const NONE: NodeId = NodeId(u32::MAX);

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    pub fn is_some(self) -> bool {
        !self.is_none()
    }
}

/// A node in the search tree.
#[derive(Debug, Clone)]
pub struct MctsNode {
    /// Parent node index (`NONE` for the root). Read only to walk paths;
    /// ownership lives with the arena.
    pub parent: NodeId,

    /// The agent move this node represents. The root holds `Dir::Neutral`,
    /// which policy logic never reads.
    pub mv: Dir,

    /// Times a score has been backpropagated through this node.
    pub visits: u32,

    /// Running mean of all backpropagated scores. Only meaningful while
    /// `visits > 0`.
    pub mean: f64,

    /// Additive adjustment owned by the evaluator pipeline. Counts toward
    /// the effective value even with zero visits.
    pub bonus: f64,

    /// Set at expansion time: fast-forwarding through this move consumed a
    /// pill / power pill.
    pub eats_pill: bool,
    pub eats_power_pill: bool,

    /// Children as (move, id) pairs in creation order. Empty until the
    /// node is expanded; once created the mapping never shrinks and each
    /// move appears at most once.
    pub children: Vec<(Dir, NodeId)>,
}

impl MctsNode {
    /// Create a new root node.
    pub fn new_root() -> Self {
        Self::new_child(NodeId::NONE, Dir::Neutral)
    }

    /// Create a new child node for `mv`.
    pub fn new_child(parent: NodeId, mv: Dir) -> Self {
        Self {
            parent,
            mv,
            visits: 0,
            mean: 0.0,
            bonus: 0.0,
            eats_pill: false,
            eats_power_pill: false,
            children: Vec::new(),
        }
    }

    /// Fold one backpropagated score into the running mean:
    /// `mean' = (mean * visits + score) / (visits + 1)`.
    pub fn update_score(&mut self, score: f64) {
        self.mean = (self.mean * f64::from(self.visits) + score) / f64::from(self.visits + 1);
        self.visits += 1;
    }

    /// Add an evaluator bonus. Never touches `mean` or `visits`.
    pub fn add_bonus(&mut self, bonus: f64) {
        self.bonus += bonus;
    }

    /// Mean plus bonus; bonus alone while unvisited.
    #[inline]
    pub fn effective_value(&self) -> f64 {
        if self.visits > 0 {
            self.mean + self.bonus
        } else {
            self.bonus
        }
    }

    /// A leaf has no children yet.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_id_none() {
        assert!(NodeId::NONE.is_none());
        assert!(!NodeId::NONE.is_some());
        assert!(NodeId(0).is_some());
    }

    #[test]
    fn new_root_shape() {
        let node = MctsNode::new_root();
        assert!(node.parent.is_none());
        assert_eq!(node.mv, Dir::Neutral);
        assert_eq!(node.visits, 0);
        assert!(node.is_leaf());
        assert!(!node.eats_pill);
        assert!(!node.eats_power_pill);
    }

    #[test]
    fn update_score_tracks_arithmetic_mean() {
        let mut node = MctsNode::new_child(NodeId(0), Dir::Up);
        let scores = [120.0, -30.0, 45.0, 45.0, 0.0];
        for s in scores {
            node.update_score(s);
        }
        assert_eq!(node.visits as usize, scores.len());
        let mean = scores.iter().sum::<f64>() / scores.len() as f64;
        assert!((node.mean - mean).abs() < 1e-9);
    }

    #[test]
    fn effective_value_uses_bonus_alone_when_unvisited() {
        let mut node = MctsNode::new_child(NodeId(0), Dir::Left);
        node.add_bonus(400.0);
        assert!((node.effective_value() - 400.0).abs() < 1e-9);

        node.update_score(100.0);
        assert!((node.effective_value() - 500.0).abs() < 1e-9);
    }

    #[test]
    fn bonus_does_not_disturb_visit_stats() {
        let mut node = MctsNode::new_child(NodeId(0), Dir::Down);
        node.update_score(10.0);
        node.add_bonus(-900.0);
        assert_eq!(node.visits, 1);
        assert!((node.mean - 10.0).abs() < 1e-9);
    }
}
