//! Grid maze pursuit game
//!
//! A complete reference implementation of the `maze-core` oracle traits:
//! an agent collects pills in a walled maze while four ghosts chase it.
//! Power pills make the ghosts temporarily edible; eating a ghost sends it
//! back to the lair. Clearing every pill advances the level. The crate
//! exists so the decision engine has a concrete, deterministic simulator
//! to run against in tests and examples.
//!
//! # Usage
//!
//! ```rust
//! use games_pursuit::PursuitGame;
//! use maze_core::{Dir, MazeOracle};
//!
//! let mut game = PursuitGame::default_game();
//! // One tick: the agent steps left onto a pill, ghosts stand still.
//! game.advance(Dir::Left, &[Dir::Neutral; 4]);
//! assert!(game.score() > 0);
//! ```

pub mod ghosts;
pub mod maze;

pub use ghosts::{ChaseGhostModel, StationaryGhostModel};
pub use maze::Maze;

use std::sync::Arc;

use maze_core::{Dir, MazeOracle, Metric, NodeIndex};
use tracing::trace;

/// Ticks a ghost stays edible after a power pill.
pub const EDIBLE_TIME: u32 = 30;
/// Ticks an eaten ghost is confined to the lair.
pub const LAIR_TIME: u32 = 10;
/// Starting lives.
pub const START_LIVES: u32 = 3;
/// Number of ghosts.
pub const GHOST_COUNT: usize = 4;

const PILL_SCORE: i64 = 10;
const POWER_PILL_SCORE: i64 = 50;
const GHOST_SCORE: i64 = 200;

/// Per-ghost mutable state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GhostState {
    pub node: NodeIndex,
    /// Remaining edible ticks; 0 when dangerous.
    pub edible: u32,
    /// Remaining lair confinement ticks; 0 when free.
    pub lair: u32,
}

/// Full game state. Cloning detaches a snapshot; the maze layout itself is
/// shared behind an `Arc` since it never mutates.
#[derive(Debug, Clone, PartialEq)]
pub struct PursuitGame {
    maze: Arc<Maze>,
    agent: NodeIndex,
    last_move: Dir,
    ghosts: Vec<GhostState>,
    pill_available: Vec<bool>,
    power_available: Vec<bool>,
    score: i64,
    lives: u32,
    level: u32,
    over: bool,
}

impl PursuitGame {
    pub fn new(maze: Maze) -> Self {
        let pill_available = vec![true; maze.pills().len()];
        let power_available = vec![true; maze.power_pills().len()];
        let lair = maze.lair();
        Self {
            agent: maze.agent_start(),
            ghosts: (0..GHOST_COUNT)
                .map(|_| GhostState {
                    node: lair,
                    edible: 0,
                    lair: 0,
                })
                .collect(),
            maze: Arc::new(maze),
            pill_available,
            power_available,
            last_move: Dir::Neutral,
            score: 0,
            lives: START_LIVES,
            level: 0,
            over: false,
        }
    }

    /// A game on [`Maze::default_layout`].
    pub fn default_game() -> Self {
        Self::new(Maze::default_layout())
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    /// Place the agent at `node` (test scaffolding).
    pub fn set_agent(&mut self, node: NodeIndex) {
        self.agent = node;
    }

    /// Place ghost `ghost` at `node` with the given timers (test
    /// scaffolding).
    pub fn set_ghost(&mut self, ghost: usize, node: NodeIndex, edible: u32, lair: u32) {
        self.ghosts[ghost] = GhostState { node, edible, lair };
    }

    /// Mark a pill as already consumed (test scaffolding).
    pub fn clear_pill(&mut self, idx: usize) {
        self.pill_available[idx] = false;
    }

    fn eat_at_agent_node(&mut self) {
        let pills = self.maze.pills().to_vec();
        for (idx, &node) in pills.iter().enumerate() {
            if node == self.agent && self.pill_available[idx] {
                self.pill_available[idx] = false;
                self.score += PILL_SCORE;
            }
        }
        let powers = self.maze.power_pills().to_vec();
        for (idx, &node) in powers.iter().enumerate() {
            if node == self.agent && self.power_available[idx] {
                self.power_available[idx] = false;
                self.score += POWER_PILL_SCORE;
                for ghost in &mut self.ghosts {
                    if ghost.lair == 0 {
                        ghost.edible = EDIBLE_TIME;
                    }
                }
            }
        }
    }

    fn resolve_collisions(&mut self) -> bool {
        let lair = self.maze.lair();
        let mut died = false;
        for ghost in &mut self.ghosts {
            if ghost.lair > 0 || ghost.node != self.agent {
                continue;
            }
            if ghost.edible > 0 {
                self.score += GHOST_SCORE;
                ghost.node = lair;
                ghost.edible = 0;
                ghost.lair = LAIR_TIME;
            } else {
                died = true;
            }
        }
        died
    }

    fn reset_positions(&mut self) {
        self.agent = self.maze.agent_start();
        self.last_move = Dir::Neutral;
        let lair = self.maze.lair();
        for ghost in &mut self.ghosts {
            *ghost = GhostState {
                node: lair,
                edible: 0,
                lair: LAIR_TIME,
            };
        }
    }

    fn level_cleared(&self) -> bool {
        !self.pill_available.iter().any(|&p| p)
            && !self.power_available.iter().any(|&p| p)
    }
}

impl MazeOracle for PursuitGame {
    fn advance(&mut self, agent: Dir, ghost_moves: &[Dir]) {
        if self.over {
            return;
        }

        // Agent step: illegal moves leave it in place.
        if let Some(next) = self.maze.neighbour(self.agent, agent) {
            self.agent = next;
            self.last_move = agent;
        }
        self.eat_at_agent_node();

        // Ghost steps. Lair'd ghosts sit out their confinement.
        for (idx, ghost) in self.ghosts.iter_mut().enumerate() {
            if ghost.lair > 0 {
                ghost.lair -= 1;
                continue;
            }
            let mv = ghost_moves.get(idx).copied().unwrap_or(Dir::Neutral);
            if let Some(next) = self.maze.neighbour(ghost.node, mv) {
                ghost.node = next;
            }
            if ghost.edible > 0 {
                ghost.edible -= 1;
            }
        }

        if self.resolve_collisions() {
            self.lives -= 1;
            trace!(lives = self.lives, "agent caught");
            if self.lives == 0 {
                self.over = true;
                return;
            }
            self.reset_positions();
            return;
        }

        if self.level_cleared() {
            self.level += 1;
            trace!(level = self.level, score = self.score, "level cleared");
            self.pill_available = vec![true; self.maze.pills().len()];
            self.power_available = vec![true; self.maze.power_pills().len()];
            self.reset_positions();
        }
    }

    fn level(&self) -> u32 {
        self.level
    }

    fn score(&self) -> i64 {
        self.score
    }

    fn lives(&self) -> u32 {
        self.lives
    }

    fn is_over(&self) -> bool {
        self.over
    }

    fn agent_node(&self) -> NodeIndex {
        self.agent
    }

    fn agent_last_move(&self) -> Dir {
        self.last_move
    }

    fn is_junction(&self, node: NodeIndex) -> bool {
        self.maze.is_junction(node)
    }

    fn legal_moves(&self, node: NodeIndex) -> Vec<Dir> {
        self.maze.legal_moves(node)
    }

    fn legal_moves_after(&self, node: NodeIndex, last: Dir) -> Vec<Dir> {
        let reverse = last.opposite();
        self.maze
            .legal_moves(node)
            .into_iter()
            .filter(|&dir| last == Dir::Neutral || dir != reverse)
            .collect()
    }

    fn pill_nodes(&self) -> Vec<NodeIndex> {
        self.maze.pills().to_vec()
    }

    fn power_pill_nodes(&self) -> Vec<NodeIndex> {
        self.maze.power_pills().to_vec()
    }

    fn is_pill_available(&self, idx: usize) -> bool {
        self.pill_available.get(idx).copied().unwrap_or(false)
    }

    fn is_power_pill_available(&self, idx: usize) -> bool {
        self.power_available.get(idx).copied().unwrap_or(false)
    }

    fn active_pills(&self) -> Vec<NodeIndex> {
        self.maze
            .pills()
            .iter()
            .zip(&self.pill_available)
            .filter_map(|(&node, &avail)| avail.then_some(node))
            .collect()
    }

    fn active_power_pills(&self) -> Vec<NodeIndex> {
        self.maze
            .power_pills()
            .iter()
            .zip(&self.power_available)
            .filter_map(|(&node, &avail)| avail.then_some(node))
            .collect()
    }

    fn distance(&self, from: NodeIndex, to: NodeIndex, metric: Metric) -> f64 {
        self.maze.distance(from, to, metric)
    }

    fn next_move_towards(&self, from: NodeIndex, to: NodeIndex) -> Dir {
        self.maze.next_move_towards(from, to)
    }

    fn next_move_away_from(&self, from: NodeIndex, to: NodeIndex) -> Dir {
        self.maze.next_move_away_from(from, to)
    }

    fn closest_node(
        &self,
        from: NodeIndex,
        targets: &[NodeIndex],
        metric: Metric,
    ) -> Option<NodeIndex> {
        self.maze.closest_node(from, targets, metric)
    }

    fn ghost_count(&self) -> usize {
        self.ghosts.len()
    }

    fn ghost_node(&self, ghost: usize) -> NodeIndex {
        self.ghosts[ghost].node
    }

    fn ghost_edible_time(&self, ghost: usize) -> u32 {
        self.ghosts[ghost].edible
    }

    fn ghost_lair_time(&self, ghost: usize) -> u32 {
        self.ghosts[ghost].lair
    }
}
