//! Rollout and corridor-traversal policies.
//!
//! Between decision points movement is deterministic: head for the nearest
//! remaining pill. The same nearest-target heuristic doubles as the
//! default policy for full rollouts to a terminal state. Rollout play is
//! intentionally simple; its job is a cheap score signal, not strength.

use maze_core::{Dir, GhostModel, MazeOracle, Metric};
use rand::Rng;
use rand_chacha::ChaCha20Rng;

/// One corridor step: toward the nearest available pill or power pill by
/// shortest path; with no pills left, uniform over the non-reversing legal
/// moves; boxed into a dead end, reverse.
pub fn corridor_move<O: MazeOracle>(state: &O, rng: &mut ChaCha20Rng) -> Dir {
    let agent = state.agent_node();

    let mut targets = state.active_power_pills();
    targets.extend(state.active_pills());

    if !targets.is_empty() {
        if let Some(goal) = state.closest_node(agent, &targets, Metric::Path) {
            return state.next_move_towards(agent, goal);
        }
    }

    let moves = state.legal_moves_after(agent, state.agent_last_move());
    if !moves.is_empty() {
        return moves[rng.gen_range(0..moves.len())];
    }
    state.agent_last_move().opposite()
}

/// Outcome of one rollout-to-terminal.
#[derive(Debug, Clone, Copy)]
pub struct Rollout {
    /// Score earned over the rollout (end minus start).
    pub score_delta: f64,
    /// Simulated advances actually taken.
    pub steps: u32,
}

/// Play the oracle forward with the default policy for the agent and the
/// ghost model for the opponents until the step cap, a terminal state, or
/// a level change. Mutates `state` in place; the caller owns any
/// save/restore discipline.
pub fn rollout_to_terminal<O, G>(
    state: &mut O,
    ghosts: &G,
    rng: &mut ChaCha20Rng,
    cap: u32,
) -> Rollout
where
    O: MazeOracle,
    G: GhostModel<O>,
{
    let level = state.level();
    let start_score = state.score();
    let mut steps = 0;

    while steps < cap && !state.is_over() && state.level() == level {
        let mv = corridor_move(state, rng);
        let ghost_moves = ghosts.ghost_moves(state, 0);
        state.advance(mv, &ghost_moves);
        steps += 1;
    }

    Rollout {
        score_delta: (state.score() - start_score) as f64,
        steps,
    }
}
