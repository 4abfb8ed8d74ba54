//! Heuristic ghost move models.
//!
//! These implement the `GhostModel` oracle the search consults during
//! simulated rollouts. They are intentionally simple partial-information
//! heuristics, not the real opponent logic.

use maze_core::{Dir, GhostModel, MazeOracle};

/// Ghosts that head straight for the agent, or straight away from it while
/// edible. Lair'd ghosts emit `Neutral`. The lookahead depth is accepted
/// but ignored; the pursuit is a single-step greedy chase.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChaseGhostModel;

impl<O: MazeOracle> GhostModel<O> for ChaseGhostModel {
    fn ghost_moves(&self, state: &O, _lookahead: u32) -> Vec<Dir> {
        let agent = state.agent_node();
        (0..state.ghost_count())
            .map(|ghost| {
                if state.ghost_lair_time(ghost) > 0 {
                    Dir::Neutral
                } else if state.ghost_edible_time(ghost) > 0 {
                    state.next_move_away_from(state.ghost_node(ghost), agent)
                } else {
                    state.next_move_towards(state.ghost_node(ghost), agent)
                }
            })
            .collect()
    }
}

/// Ghosts that never move. Useful for deterministic tests where only the
/// agent's side of the simulation matters.
#[derive(Debug, Clone, Copy, Default)]
pub struct StationaryGhostModel;

impl<O: MazeOracle> GhostModel<O> for StationaryGhostModel {
    fn ghost_moves(&self, state: &O, _lookahead: u32) -> Vec<Dir> {
        vec![Dir::Neutral; state.ghost_count()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Maze, PursuitGame, GHOST_COUNT};

    fn open_room() -> PursuitGame {
        PursuitGame::new(Maze::parse(&[
            "######",
            "#G   #",
            "#    #",
            "#   P#",
            "######",
        ]))
    }

    #[test]
    fn chasing_ghost_closes_the_gap() {
        let mut game = open_room();
        game.set_ghost(0, game.maze().lair(), 0, 0);
        let before = game.distance(
            game.ghost_node(0),
            game.agent_node(),
            maze_core::Metric::Path,
        );

        let moves = ChaseGhostModel.ghost_moves(&game, 0);
        game.advance(Dir::Neutral, &moves);

        let after = game.distance(
            game.ghost_node(0),
            game.agent_node(),
            maze_core::Metric::Path,
        );
        assert!(after < before);
    }

    #[test]
    fn edible_ghost_retreats() {
        let mut game = open_room();
        game.set_ghost(0, game.agent_node() - 1, 10, 0);
        let before = game.distance(
            game.ghost_node(0),
            game.agent_node(),
            maze_core::Metric::Path,
        );

        let moves = ChaseGhostModel.ghost_moves(&game, 0);
        game.advance(Dir::Neutral, &moves);

        let after = game.distance(
            game.ghost_node(0),
            game.agent_node(),
            maze_core::Metric::Path,
        );
        assert!(after > before);
    }

    #[test]
    fn lair_ghost_holds_still() {
        let game = {
            let mut g = open_room();
            g.set_ghost(1, g.maze().lair(), 0, 5);
            g
        };
        let moves = ChaseGhostModel.ghost_moves(&game, 0);
        assert_eq!(moves[1], Dir::Neutral);
        assert_eq!(moves.len(), GHOST_COUNT);
    }

    #[test]
    fn stationary_model_is_all_neutral() {
        let game = open_room();
        assert_eq!(
            StationaryGhostModel.ghost_moves(&game, 10),
            vec![Dir::Neutral; GHOST_COUNT]
        );
    }
}
