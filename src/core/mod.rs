//! Core types: card ids, sides, state snapshot, AI output, RNG, rule constants.
//!
//! These are the shapes exchanged with the rules engine. The AI reads a
//! `GameState` and answers with an `AiAction`; it never builds new states.

pub mod action;
pub mod config;
pub mod entity;
pub mod rng;
pub mod side;
pub mod state;

pub use action::{AiAction, ControlChoice, ResponseKind, RevealFollowUp};
pub use config::{RulesConfig, LANE_COUNT};
pub use entity::CardId;
pub use rng::{GameRng, RandomSource, ScriptedRandom};
pub use side::{Side, SideMap};
pub use state::{BoardCard, GameState, Lane, Phase, SideState};
