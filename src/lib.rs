//! # compile-ai
//!
//! Heuristic AI for a "compile"-style lane card game.
//!
//! Given a read-only snapshot of the game and an optional pending prompt,
//! the AI returns exactly one `AiAction`: a full-turn move, a compile
//! choice, or the answer to a forced decision.
//!
//! ## Design Principles
//!
//! 1. **Read-only**: the rules engine owns the state. The AI never applies
//!    actions; hypothetical lanes are cheap `im::Vector` clones.
//!
//! 2. **Capabilities, not protocol names**: rules that depend on card text
//!    are declarative passives evaluated through `RulesOracle`.
//!
//! 3. **One pipeline, three tiers**: easy, normal and hard share the same
//!    scorers and differ only in their `DifficultyProfile` and in the
//!    handlers tried first.
//!
//! 4. **Total**: every call answers. Invalid prompts and empty candidate
//!    sets end in a generic rescue rather than an error.
//!
//! ## Modules
//!
//! - `core`: card ids, sides, state snapshot, AI output, RNG, rule constants
//! - `cards`: card data, keywords, passives
//! - `effects`: pending prompts and target filters
//! - `rules`: `RulesOracle` value and legality queries
//! - `ai`: agent, move generator, resolver, scoring, difficulty profiles
//! - `scenario`: snapshot builder for tests and benchmarks
//! - `error`: error types

pub mod ai;
pub mod cards;
pub mod core;
pub mod effects;
pub mod error;
pub mod rules;
pub mod scenario;

// Re-export commonly used types
pub use crate::core::{
    AiAction, CardId, ControlChoice, GameRng, GameState, Lane, Phase, RandomSource,
    ResponseKind, RevealFollowUp, RulesConfig, ScriptedRandom, Side, SideState, LANE_COUNT,
};

pub use crate::cards::{Card, Keyword, Keywords, Passive};

pub use crate::effects::{
    ActionKind, ActionRequired, LaneScope, OptionalEffect, OwnerFilter, Position, TargetFilter,
    TargetQuery,
};

pub use crate::rules::{RulesOracle, StandardRules};

pub use crate::ai::{decide, decide_with, Agent, DecisionContext, Difficulty, DifficultyProfile};

pub use crate::error::{ParseDifficultyError, PlayBlock, ProfileError, PromptError};

pub use crate::scenario::ScenarioBuilder;
