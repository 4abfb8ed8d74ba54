//! The decision loop tying search and evaluators together.

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tracing::debug;

use maze_core::{Dir, GhostModel, MazeOracle};

use crate::config::MctsConfig;
use crate::evaluator::{default_pipeline, TreeEvaluator};
use crate::search::MctsSearch;
use crate::tree::MctsTree;

/// A stateful decision maker: runs one search per call, reshapes the tree
/// through the evaluator pipeline, and retains the chosen child's subtree
/// as the starting tree for the next call.
pub struct MctsAgent<O, G>
where
    O: MazeOracle,
    G: GhostModel<O>,
{
    config: MctsConfig,
    ghosts: G,
    evaluators: Vec<Box<dyn TreeEvaluator<O, G>>>,
    rng: ChaCha20Rng,
    retained: Option<MctsTree>,
}

impl<O, G> MctsAgent<O, G>
where
    O: MazeOracle,
    G: GhostModel<O>,
{
    /// An agent with the default evaluator pipeline and an entropy-seeded
    /// RNG.
    pub fn new(ghosts: G, config: MctsConfig) -> Self {
        Self::with_rng(ghosts, config, ChaCha20Rng::from_entropy())
    }

    /// An agent with an explicit RNG, for reproducible decisions.
    pub fn with_rng(ghosts: G, config: MctsConfig, rng: ChaCha20Rng) -> Self {
        Self {
            config,
            ghosts,
            evaluators: default_pipeline(),
            rng,
            retained: None,
        }
    }

    /// Replace the evaluator pipeline.
    pub fn with_evaluators(mut self, evaluators: Vec<Box<dyn TreeEvaluator<O, G>>>) -> Self {
        self.evaluators = evaluators;
        self
    }

    /// Decide the agent's next move from a snapshot of the game.
    ///
    /// Runs the configured simulation budget, applies the evaluator
    /// pipeline, and reads out the root child with the highest effective
    /// value. `None` means no child exists to choose from; the caller
    /// falls back to whatever default it has.
    pub fn choose_move(&mut self, snapshot: O) -> Option<Dir> {
        let tree = self.retained.take().unwrap_or_default();
        let mut search =
            MctsSearch::with_tree(tree, snapshot, &self.ghosts, self.config.clone(), &mut self.rng);

        for _ in 0..self.config.simulations {
            if let Err(err) = search.simulate() {
                debug!(%err, "search iteration aborted");
            }
        }

        for evaluator in &self.evaluators {
            evaluator.evaluate_tree(&mut search);
        }

        debug!(
            simulations = self.config.simulations,
            power_pills_seen = search.seen_power_pills().len(),
            "search complete"
        );

        let tree = search.into_tree();
        match tree.best_child() {
            Some(best) => {
                let mv = tree.get(best).mv;
                debug!(?mv, visits = tree.get(best).visits, "decision");
                self.retained = Some(tree.promote(best));
                Some(mv)
            }
            None => {
                debug!("no decision available");
                self.retained = None;
                None
            }
        }
    }

    /// Drop the retained subtree, e.g. after a life was lost and the
    /// previous plan no longer applies.
    pub fn reset(&mut self) {
        self.retained = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use games_pursuit::{PursuitGame, StationaryGhostModel};

    fn agent(seed: u64, simulations: u32) -> MctsAgent<PursuitGame, StationaryGhostModel> {
        MctsAgent::with_rng(
            StationaryGhostModel,
            MctsConfig::for_testing().with_simulations(simulations),
            ChaCha20Rng::seed_from_u64(seed),
        )
    }

    #[test]
    fn chooses_a_legal_move() {
        let game = PursuitGame::default_game();
        let mut agent = agent(3, 3);

        let mv = agent.choose_move(game.clone()).unwrap();
        assert!(game.legal_moves(game.agent_node()).contains(&mv));
    }

    #[test]
    fn retains_the_chosen_subtree() {
        let game = PursuitGame::default_game();
        let mut agent = agent(4, 3);

        agent.choose_move(game.clone()).unwrap();
        assert!(agent.retained.is_some());

        // The retained tree seeds the next decision.
        agent.choose_move(game).unwrap();
        assert!(agent.retained.is_some());

        agent.reset();
        assert!(agent.retained.is_none());
    }

    #[test]
    fn zero_simulations_yield_no_decision() {
        let game = PursuitGame::default_game();
        let mut agent = agent(5, 0);

        assert_eq!(agent.choose_move(game), None);
        assert!(agent.retained.is_none());
    }

    #[test]
    fn same_seed_same_decision() {
        let game = PursuitGame::default_game();
        let a = agent(6, 4).choose_move(game.clone());
        let b = agent(6, 4).choose_move(game);
        assert_eq!(a, b);
    }
}
