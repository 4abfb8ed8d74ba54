//! The simulation loop: selection, expansion, rollout, backpropagation.
//!
//! `MctsSearch` owns a search tree plus a private cursor copy of the game
//! state. Tree moves are replayed on the cursor while descending, so the
//! state at any tree node is materialized on demand instead of being
//! stored per node. A save stack brackets every excursion: `simulate()`
//! pushes on entry and pops unconditionally on the way out, aborted
//! iterations included, so the cursor is exactly as found after each call.

use std::collections::HashSet;

use rand::Rng;
use rand_chacha::ChaCha20Rng;
use thiserror::Error;
use tracing::trace;

use maze_core::{Dir, GhostModel, MazeOracle, NodeIndex};

use crate::config::MctsConfig;
use crate::node::NodeId;
use crate::rollout::{corridor_move, rollout_to_terminal};
use crate::selection::{SelectionError, UcbPolicy};
use crate::tree::MctsTree;

/// Errors raised during a search iteration. All of them abort the current
/// iteration only; the tree and cursor stay valid for the next one.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    Selection(#[from] SelectionError),
}

/// One Monte Carlo tree search over a game snapshot.
///
/// `O` is the simulator the search plans against and `G` predicts the
/// opponents' joint moves inside it.
pub struct MctsSearch<'a, O, G>
where
    O: MazeOracle,
    G: GhostModel<O>,
{
    tree: MctsTree,
    cursor: O,
    saved: Vec<O>,
    ghosts: &'a G,
    policy: UcbPolicy,
    config: MctsConfig,
    rng: &'a mut ChaCha20Rng,
    /// Every power pill index observed active at any point during the
    /// search. Grows monotonically; a pill consumed on one branch is still
    /// remembered here.
    seen_power_pills: HashSet<NodeIndex>,
}

impl<'a, O, G> MctsSearch<'a, O, G>
where
    O: MazeOracle,
    G: GhostModel<O>,
{
    /// A search over `snapshot` starting from a fresh single-node tree.
    pub fn new(snapshot: O, ghosts: &'a G, config: MctsConfig, rng: &'a mut ChaCha20Rng) -> Self {
        Self::with_tree(MctsTree::new(), snapshot, ghosts, config, rng)
    }

    /// A search continuing from `tree`, typically the promoted subtree of
    /// the previous decision.
    pub fn with_tree(
        tree: MctsTree,
        snapshot: O,
        ghosts: &'a G,
        config: MctsConfig,
        rng: &'a mut ChaCha20Rng,
    ) -> Self {
        let seen_power_pills = snapshot.active_power_pills().into_iter().collect();
        Self {
            tree,
            cursor: snapshot,
            saved: Vec::new(),
            ghosts,
            policy: UcbPolicy::new(config.exploration),
            config,
            rng,
            seen_power_pills,
        }
    }

    /// Run one search iteration: descend to a leaf, expand it when it has
    /// earned enough visits (the root always qualifies), and backpropagate
    /// a rollout score through the visited path.
    pub fn simulate(&mut self) -> Result<(), SearchError> {
        let lives = self.cursor.lives();
        self.push_state();
        let outcome = self.run_iteration(lives);
        self.pop_state();
        outcome
    }

    fn run_iteration(&mut self, lives: u32) -> Result<(), SearchError> {
        let mut path = vec![self.tree.root()];
        let mut node = self.tree.root();

        while !self.tree.get(node).is_leaf() {
            node = self.policy.select_child(&self.tree, node)?;
            path.push(node);
            let mv = self.tree.get(node).mv;
            self.advance_decision(mv);
            self.fast_forward(self.config.corridor_lookahead);
        }

        let expandable = node == self.tree.root()
            || self.tree.get(node).visits >= self.config.expansion_threshold;

        if expandable {
            let moves = self.cursor.legal_moves(self.cursor.agent_node());
            self.tree.expand(node, &moves);
            self.sample_children(node, &path, lives);

            // Descend once into the freshly sampled children and keep
            // simulating from there.
            let next = self.policy.select_child(&self.tree, node)?;
            path.push(next);
            let mv = self.tree.get(next).mv;
            self.advance_decision(mv);
        }

        let score = self.rollout_score(lives);
        self.tree.backpropagate(&path, score);
        trace!(path_len = path.len(), score, "simulation complete");
        Ok(())
    }

    /// Visit each newly created child of `node` once: replay its move,
    /// record what the branch consumed, roll out, and credit the score to
    /// the child and the whole selection path.
    fn sample_children(&mut self, node: NodeId, path: &[NodeId], lives: u32) {
        for child in self.tree.children(node) {
            let power_before = self.cursor.active_power_pill_count();
            let pills_before = self.cursor.active_pill_count();
            let level_before = self.cursor.level();
            let mv = self.tree.get(child).mv;

            self.push_state();
            self.advance_decision(mv);
            self.fast_forward(self.config.corridor_lookahead);

            if self.cursor.active_power_pill_count() < power_before {
                self.tree.get_mut(child).eats_power_pill = true;
            }
            if self.cursor.active_pill_count() < pills_before {
                self.tree.get_mut(child).eats_pill = true;
            }

            let mut score = 0.0;
            if self.cursor.level() > level_before {
                score += self.config.level_bonus;
            }
            score += self.rollout_score(lives);

            self.tree.backpropagate(path, score);
            self.tree.get_mut(child).update_score(score);
            self.pop_state();
        }
    }

    /// Advance the cursor by one agent decision. Decision points use a
    /// ghost lookahead of zero.
    pub fn advance_decision(&mut self, mv: Dir) {
        let ghost_moves = self.ghosts.ghost_moves(&self.cursor, 0);
        self.cursor.advance(mv, &ghost_moves);
        self.refresh_power_pills();
    }

    /// Fast-forward the cursor through the current corridor: follow the
    /// corridor policy until the agent stands on a junction, then take one
    /// uniformly random step off it. `lookahead` is handed to the ghost
    /// model on every advance.
    pub fn fast_forward(&mut self, lookahead: u32) {
        let mut steps = 0;
        while !self.cursor.is_over()
            && !self.cursor.is_junction(self.cursor.agent_node())
            && steps < self.config.rollout_cap
        {
            let mv = corridor_move(&self.cursor, self.rng);
            let ghost_moves = self.ghosts.ghost_moves(&self.cursor, lookahead);
            self.cursor.advance(mv, &ghost_moves);
            self.refresh_power_pills();
            steps += 1;
        }

        if self.cursor.is_over() {
            return;
        }
        let moves = self.cursor.legal_moves(self.cursor.agent_node());
        if !moves.is_empty() {
            let mv = moves[self.rng.gen_range(0..moves.len())];
            let ghost_moves = self.ghosts.ghost_moves(&self.cursor, lookahead);
            self.cursor.advance(mv, &ghost_moves);
            self.refresh_power_pills();
        }
    }

    /// Roll the cursor out to a terminal state and score it: the score
    /// delta of the rollout, minus the death penalty when the branch has
    /// already cost a life relative to `lives` at `simulate()` entry.
    fn rollout_score(&mut self, lives: u32) -> f64 {
        let mut score = 0.0;
        if self.cursor.lives() < lives {
            score -= self.config.death_penalty;
        }
        let result = rollout_to_terminal(
            &mut self.cursor,
            self.ghosts,
            self.rng,
            self.config.rollout_cap,
        );
        score + result.score_delta
    }

    fn refresh_power_pills(&mut self) {
        let active = self.cursor.active_power_pills();
        if active.len() != self.seen_power_pills.len() {
            self.seen_power_pills.extend(active);
        }
    }

    /// Save the cursor on the state stack.
    pub fn push_state(&mut self) {
        self.saved.push(self.cursor.clone());
    }

    /// Restore the cursor from the state stack.
    pub fn pop_state(&mut self) {
        debug_assert!(!self.saved.is_empty(), "state stack underflow");
        if let Some(state) = self.saved.pop() {
            self.cursor = state;
        }
    }

    pub fn cursor(&self) -> &O {
        &self.cursor
    }

    pub fn tree(&self) -> &MctsTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut MctsTree {
        &mut self.tree
    }

    /// Children of the root, in creation order.
    pub fn root_children(&self) -> Vec<NodeId> {
        self.tree.children(self.tree.root())
    }

    /// Adjust a node's evaluator bonus.
    pub fn add_bonus(&mut self, node: NodeId, bonus: f64) {
        self.tree.get_mut(node).add_bonus(bonus);
    }

    /// Power pill indices seen active at any point so far.
    pub fn seen_power_pills(&self) -> &HashSet<NodeIndex> {
        &self.seen_power_pills
    }

    /// Give up the search and keep its tree.
    pub fn into_tree(self) -> MctsTree {
        self.tree
    }
}
