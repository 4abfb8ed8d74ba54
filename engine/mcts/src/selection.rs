//! Upper-confidence child selection.
//!
//! The tree-walk phase descends through the child maximizing an
//! upper-confidence value. The confidence term uses the parent's visit
//! count, which is why nodes carry a parent back-reference at all.

use thiserror::Error;

use crate::node::NodeId;
use crate::tree::MctsTree;

/// Invariant violations raised by child selection.
#[derive(Debug, Error)]
pub enum SelectionError {
    /// Selection was invoked on a node with no selectable children.
    /// Fatal to the current search iteration only.
    #[error("child cannot be selected in a leaf node")]
    NoSelectableChild,
}

/// UCB selection policy.
///
/// Per child `c` of parent `p`:
///
/// ```text
/// ucb(c) = effective_value(c)
///        + exploration * sqrt(2 ln visits(p) / (visits(c) * min(0.25, visits(c))))
/// ```
///
/// A child with zero visits divides by zero in that formula, so it is
/// special-cased as infinitely attractive: every child gets sampled once
/// before any child is sampled twice.
#[derive(Debug, Clone, Copy)]
pub struct UcbPolicy {
    pub exploration: f64,
}

impl UcbPolicy {
    pub fn new(exploration: f64) -> Self {
        Self { exploration }
    }

    /// The best child of `node`, or an error when `node` has no
    /// selectable children. Ties break to the first-created child
    /// (strict comparison over the creation-order scan).
    pub fn select_child(&self, tree: &MctsTree, node: NodeId) -> Result<NodeId, SelectionError> {
        let mut selected = None;
        let mut max = f64::NEG_INFINITY;

        for &(_, child) in &tree.get(node).children {
            let ucb = self.ucb_value(tree, child);
            if ucb > max {
                max = ucb;
                selected = Some(child);
            }
        }

        selected.ok_or(SelectionError::NoSelectableChild)
    }

    /// The upper-confidence value of one child.
    pub fn ucb_value(&self, tree: &MctsTree, child: NodeId) -> f64 {
        let node = tree.get(child);
        if node.visits == 0 {
            return f64::INFINITY;
        }

        let parent_visits = if node.parent.is_some() {
            tree.get(node.parent).visits
        } else {
            0
        };

        let visits = f64::from(node.visits);
        let confidence = (2.0 * f64::from(parent_visits).ln() / (visits * visits.min(0.25))).sqrt();

        node.effective_value() + self.exploration * confidence
    }
}
