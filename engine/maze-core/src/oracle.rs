//! The simulator and opponent-model seams consumed by the search.
//!
//! Both traits describe in-process simulators: every query is total, so the
//! methods return plain values rather than `Result`s. State save/restore is
//! expressed through `Clone`; a clone is a fully detached snapshot.

use crate::dir::Dir;

/// Index of a node in the maze graph.
pub type NodeIndex = usize;

/// Distance measure for pathing queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    /// Shortest-path distance along maze corridors.
    Path,
    /// Manhattan distance on the underlying grid, ignoring walls.
    Manhattan,
}

/// The game-simulator surface.
///
/// The search holds one oracle as its mutable cursor and explores branches
/// by cloning it onto a save stack before advancing, so an implementation
/// must be cheaply cloneable and must advance deterministically given the
/// same moves.
pub trait MazeOracle: Clone {
    /// Advance one tick: the agent takes `agent`, ghost `i` takes
    /// `ghosts[i]`. Missing ghost moves are treated as no-ops. Advancing a
    /// finished game is a no-op.
    fn advance(&mut self, agent: Dir, ghosts: &[Dir]);

    fn level(&self) -> u32;
    fn score(&self) -> i64;
    fn lives(&self) -> u32;
    fn is_over(&self) -> bool;

    fn agent_node(&self) -> NodeIndex;
    fn agent_last_move(&self) -> Dir;

    /// A decision point: a node with more than two legal moves.
    fn is_junction(&self, node: NodeIndex) -> bool;

    /// Legal moves out of `node`, in `Dir::ARMS` order.
    fn legal_moves(&self, node: NodeIndex) -> Vec<Dir>;

    /// Legal moves out of `node` excluding the reversal of `last`.
    fn legal_moves_after(&self, node: NodeIndex, last: Dir) -> Vec<Dir>;

    /// All pill locations for the current level, consumed or not.
    /// Index positions are stable and used by the availability queries.
    fn pill_nodes(&self) -> Vec<NodeIndex>;
    fn power_pill_nodes(&self) -> Vec<NodeIndex>;
    fn is_pill_available(&self, idx: usize) -> bool;
    fn is_power_pill_available(&self, idx: usize) -> bool;

    /// Locations of pills not yet consumed.
    fn active_pills(&self) -> Vec<NodeIndex>;
    fn active_power_pills(&self) -> Vec<NodeIndex>;

    fn active_pill_count(&self) -> usize {
        self.active_pills().len()
    }

    fn active_power_pill_count(&self) -> usize {
        self.active_power_pills().len()
    }

    /// Distance between two nodes under the given metric. Unreachable
    /// pairs under `Metric::Path` report `f64::INFINITY`.
    fn distance(&self, from: NodeIndex, to: NodeIndex, metric: Metric) -> f64;

    /// First step of a shortest path from `from` toward `to`.
    /// `Neutral` when no step helps (already there, or unreachable).
    fn next_move_towards(&self, from: NodeIndex, to: NodeIndex) -> Dir;

    /// The legal step that most increases distance from `to`.
    fn next_move_away_from(&self, from: NodeIndex, to: NodeIndex) -> Dir;

    /// The target nearest to `from` under `metric`, or `None` when
    /// `targets` is empty.
    fn closest_node(&self, from: NodeIndex, targets: &[NodeIndex], metric: Metric)
        -> Option<NodeIndex>;

    fn ghost_count(&self) -> usize;
    fn ghost_node(&self, ghost: usize) -> NodeIndex;

    /// Remaining ticks this ghost can be eaten; 0 when not edible.
    fn ghost_edible_time(&self, ghost: usize) -> u32;

    /// Remaining ticks this ghost is confined to the lair; 0 when free.
    fn ghost_lair_time(&self, ghost: usize) -> u32;
}

/// Joint opponent move oracle used only inside simulated rollouts.
///
/// `lookahead` is a tuning knob, not algorithmically significant: the
/// search asks for deeper-looking ghost play while fast-forwarding through
/// corridors than at true decision points. Implementations may ignore it.
pub trait GhostModel<O: MazeOracle> {
    /// One move per ghost, indexed like the oracle's ghost queries.
    fn ghost_moves(&self, state: &O, lookahead: u32) -> Vec<Dir>;
}
