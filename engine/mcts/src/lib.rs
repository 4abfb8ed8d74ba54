//! Monte Carlo tree search decision engine for maze pursuit games.
//!
//! The engine plans over any simulator implementing the `maze-core`
//! oracle traits. One decision runs a fixed budget of search iterations
//! (selection by a UCB variant, expansion past a visit threshold, greedy
//! rollouts to a terminal state, path backpropagation), then a pipeline
//! of domain evaluators reshapes the root children's values before the
//! best move is read out. The chosen child's subtree is retained and
//! seeds the next decision.
//!
//! # Usage
//!
//! ```
//! use games_pursuit::{ChaseGhostModel, PursuitGame};
//! use mcts::{MctsAgent, MctsConfig};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha20Rng;
//!
//! let mut agent = MctsAgent::with_rng(
//!     ChaseGhostModel,
//!     MctsConfig::for_testing().with_simulations(2),
//!     ChaCha20Rng::seed_from_u64(1),
//! );
//! let game = PursuitGame::default_game();
//! let decision = agent.choose_move(game);
//! assert!(decision.is_some());
//! ```

pub mod agent;
pub mod config;
pub mod evaluator;
pub mod node;
pub mod rollout;
pub mod search;
pub mod selection;
pub mod tree;

pub use agent::MctsAgent;
pub use config::MctsConfig;
pub use evaluator::{
    default_pipeline, EdibleGhostEvaluator, PillProximityEvaluator, PillShapingEvaluator,
    PowerPillWasteEvaluator, TreeEvaluator,
};
pub use node::{MctsNode, NodeId};
pub use rollout::{corridor_move, rollout_to_terminal, Rollout};
pub use search::{MctsSearch, SearchError};
pub use selection::{SelectionError, UcbPolicy};
pub use tree::MctsTree;
