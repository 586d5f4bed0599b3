//! Heuristic AI.
//!
//! ## Overview
//!
//! - `agent`: entry point and phase dispatch
//! - `moves`: action-phase move generator and compile choice
//! - `resolver`: one handler per pending-decision family, tier chain
//! - `scoring`: `card_power` and `card_threat`
//! - `context`: per-decision board view shared by all scorers
//! - `profile`: difficulty tiers and scoring weights
//!
//! ## Usage
//!
//! ```
//! use compile_ai::ai::{Agent, Difficulty};
//! use compile_ai::core::{AiAction, GameState};
//!
//! let state = GameState::new(
//!     ["Fire", "Water", "Life"].map(String::from),
//!     ["Death", "Light", "Speed"].map(String::from),
//! );
//! let mut agent = Agent::new(Difficulty::Normal).with_seed(1);
//! // Nothing in hand: the only move is to refill.
//! assert_eq!(agent.decide(&state, None), AiAction::FillHand);
//! ```

pub mod agent;
pub mod context;
pub mod moves;
pub mod profile;
pub mod resolver;
pub mod scoring;

pub use agent::{decide, decide_with, Agent};
pub use context::DecisionContext;
pub use moves::{best_move, choose_compile, rank_moves, ScoredMove};
pub use profile::{Difficulty, DifficultyProfile, DIFFICULTY_ENV};
pub use resolver::resolve;
pub use scoring::{card_power, card_threat};
