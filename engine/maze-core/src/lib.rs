//! Core traits and types for the maze pursuit engine
//!
//! This crate provides the fundamental abstractions the decision engine
//! builds on:
//! - `Dir`: the agent/ghost move enumeration
//! - `MazeOracle`: the game-simulator surface the search queries and advances
//! - `GhostModel`: the opponent move oracle used inside simulated rollouts
//!
//! The simulator itself is an external collaborator; any game that can
//! answer these queries can be searched.

pub mod dir;
pub mod oracle;

pub use dir::Dir;
pub use oracle::{GhostModel, MazeOracle, Metric, NodeIndex};
