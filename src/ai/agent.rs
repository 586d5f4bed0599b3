//! Decision entry point.
//!
//! The rules engine calls `Agent::decide` once per decision point. A
//! pending prompt goes to the resolver; otherwise the phase decides:
//!
//! - `Compile`: pick one of the compilable lanes
//! - `Action`: run the move generator
//! - anything else: refill the hand
//!
//! The snapshot is only read. Each call returns exactly one `AiAction`.

use tracing::debug;

use super::context::DecisionContext;
use super::moves::{best_move, choose_compile};
use super::profile::{Difficulty, DifficultyProfile};
use super::resolver;
use crate::core::{AiAction, GameRng, GameState, Phase, RandomSource};
use crate::effects::ActionRequired;
use crate::rules::{RulesOracle, StandardRules};

/// A configured AI player.
pub struct Agent {
    profile: DifficultyProfile,

    /// Value and legality queries.
    rules: Box<dyn RulesOracle>,

    /// Noise, mistakes and easy-tier random picks.
    rng: Box<dyn RandomSource>,
}

impl Agent {
    /// Create an agent with the default profile for `difficulty`, standard
    /// rules and an entropy-seeded rng.
    pub fn new(difficulty: Difficulty) -> Self {
        Self::from_profile(difficulty.profile())
    }

    /// Create an agent from an explicit profile.
    pub fn from_profile(profile: DifficultyProfile) -> Self {
        Self {
            profile,
            rules: Box::new(StandardRules::default()),
            rng: Box::new(GameRng::from_entropy()),
        }
    }

    /// Set a custom rules oracle.
    #[must_use]
    pub fn with_rules<R: RulesOracle + 'static>(mut self, rules: R) -> Self {
        self.rules = Box::new(rules);
        self
    }

    /// Set a custom random source.
    #[must_use]
    pub fn with_rng<R: RandomSource + 'static>(mut self, rng: R) -> Self {
        self.rng = Box::new(rng);
        self
    }

    /// Seed the default rng (builder pattern).
    #[must_use]
    pub fn with_seed(self, seed: u64) -> Self {
        self.with_rng(GameRng::new(seed))
    }

    #[must_use]
    pub fn profile(&self) -> &DifficultyProfile {
        &self.profile
    }

    /// Choose the next action.
    pub fn decide(&mut self, state: &GameState, action: Option<&ActionRequired>) -> AiAction {
        decide_with(
            &self.profile,
            self.rules.as_ref(),
            state,
            action,
            self.rng.as_mut(),
        )
    }
}

/// Decide with the default profile for `difficulty` and standard rules.
pub fn decide(
    difficulty: Difficulty,
    state: &GameState,
    action: Option<&ActionRequired>,
    rng: &mut dyn RandomSource,
) -> AiAction {
    let profile = difficulty.profile();
    decide_with(&profile, &StandardRules::default(), state, action, rng)
}

/// Decide with an explicit profile and oracle.
pub fn decide_with(
    profile: &DifficultyProfile,
    rules: &dyn RulesOracle,
    state: &GameState,
    action: Option<&ActionRequired>,
    rng: &mut dyn RandomSource,
) -> AiAction {
    let me = action.map_or(state.turn, |a| a.actor);
    let ctx = DecisionContext::new(state, me, profile, rules);

    let answer = match action {
        Some(action) => resolver::resolve(&ctx, action, rng),
        None => match state.phase {
            Phase::Compile => choose_compile(&ctx, &state.compilable_lanes),
            Phase::Action => best_move(&ctx, rng),
            _ => AiAction::FillHand,
        },
    };
    debug!(
        target: "compile_ai",
        side = %me,
        phase = ?state.phase,
        difficulty = %profile.difficulty,
        ?answer,
        "decision"
    );
    answer
}
