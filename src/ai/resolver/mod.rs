//! Required-action resolver.
//!
//! Answers one pending `ActionRequired`. Every `ActionKind` variant has a
//! handler; the match below is exhaustive so a new variant cannot be left
//! unanswered.
//!
//! ## Tier chain
//!
//! Each tier returns `Option<AiAction>`; `None` hands the decision to the
//! next tier:
//!
//! - hard: hard specializations, then normal, then easy
//! - normal: normal, then easy
//! - easy: easy
//!
//! Whatever is left goes to `fallback::rescue`, which always answers.
//! Answers of the wrong shape are discarded with a warning.

pub mod easy;
pub mod fallback;
pub mod hand;
pub mod hard;
pub mod lanes;
pub mod prompts;
pub mod protocols;
pub mod targets;

use std::cmp::Ordering;

use tracing::{debug, warn};

use super::context::DecisionContext;
use super::profile::Difficulty;
use crate::core::{AiAction, RandomSource};
use crate::effects::{ActionKind, ActionRequired};

/// Resolve a pending decision through the tier chain.
pub fn resolve(
    ctx: &DecisionContext<'_>,
    action: &ActionRequired,
    rng: &mut dyn RandomSource,
) -> AiAction {
    if let Err(err) = action.validate(ctx.state) {
        warn!(target: "compile_ai::resolver", prompt = action.kind.name(), %err, "invalid prompt, using rescue");
        return fallback::rescue(ctx, action);
    }

    let chain: &[Difficulty] = match ctx.profile.difficulty {
        Difficulty::Hard => &[Difficulty::Hard, Difficulty::Normal, Difficulty::Easy],
        Difficulty::Normal => &[Difficulty::Normal, Difficulty::Easy],
        Difficulty::Easy => &[Difficulty::Easy],
    };

    for tier in chain {
        let answer = match tier {
            Difficulty::Hard => hard::resolve(ctx, action, rng),
            Difficulty::Normal => resolve_normal(ctx, action, rng),
            Difficulty::Easy => easy::resolve(ctx, action, rng),
        };
        match answer {
            Some(answer) if action.accepts(&answer) => {
                debug!(target: "compile_ai::resolver", prompt = action.kind.name(), %tier, ?answer, "resolved");
                return answer;
            }
            Some(answer) => {
                warn!(target: "compile_ai::resolver", prompt = action.kind.name(), %tier, ?answer, "answer has the wrong shape");
            }
            None => {}
        }
    }

    fallback::rescue(ctx, action)
}

/// Full heuristic handlers.
pub fn resolve_normal(
    ctx: &DecisionContext<'_>,
    action: &ActionRequired,
    rng: &mut dyn RandomSource,
) -> Option<AiAction> {
    let source = action.source_card_id;
    match &action.kind {
        // === Hand ===
        ActionKind::Discard { count } => Some(hand::discard_exact(ctx, *count)),
        ActionKind::DiscardUpTo { max } => Some(hand::discard_optional(ctx, *max, 1.0)),
        ActionKind::DiscardForDraw { max } => Some(hand::discard_optional(ctx, *max, 2.5)),
        ActionKind::DiscardToPunish { max } => Some(hand::discard_optional(ctx, *max, 4.0)),
        ActionKind::SelectOpponentHandCardToDiscard { cards } => {
            hand::opponent_discard(ctx, cards)
        }
        ActionKind::SelectCardFromHandToPlay {
            lane,
            disallowed_lane,
            face_down,
        } => hand::play_from_hand(ctx, *lane, *disallowed_lane, *face_down),
        ActionKind::SelectCardFromHandToGive => {
            hand::weakest_hand_card(ctx).map(|card_id| AiAction::GiveCard { card_id })
        }
        ActionKind::SelectCardFromHandToReveal => {
            hand::weakest_hand_card(ctx).map(|card_id| AiAction::RevealCard { card_id })
        }

        // === Board targets ===
        ActionKind::SelectCardsToDelete {
            filter,
            disallowed_ids,
            scope,
            ..
        } => targets::delete(ctx, filter, source, *scope, disallowed_ids, rng),
        ActionKind::SelectCardToFlip {
            filter,
            scope,
            optional,
        } => targets::flip(ctx, filter, source, *scope, *optional, rng),
        ActionKind::SelectCoveredCardToFlip { lane, optional } => {
            targets::flip_covered(ctx, *lane, *optional, rng)
        }
        ActionKind::SelectCardToReturn {
            filter,
            scope,
            optional,
        } => targets::return_card(ctx, filter, source, *scope, *optional, rng),
        ActionKind::SelectCardToShift {
            filter,
            scope,
            optional,
            destination,
        } => targets::shift(ctx, filter, source, *scope, *optional, *destination, rng),
        ActionKind::SelectCardToReveal { filter } => targets::reveal(ctx, filter, source),

        // === Lanes ===
        ActionKind::SelectLaneForPlay {
            card_id,
            face_up,
            disallowed_lane,
        } => lanes::lane_for_play(ctx, *card_id, *face_up, *disallowed_lane),
        ActionKind::SelectLaneForShift {
            card_id,
            origin_lane,
            disallowed_lane,
        } => lanes::lane_for_shift(ctx, *card_id, *origin_lane, *disallowed_lane),
        ActionKind::SelectLaneForMassShift {
            origin_lane,
            filter,
        } => lanes::lane_for_mass_shift(ctx, *origin_lane, filter, source),
        ActionKind::SelectLaneForDeleteAll {
            filter,
            disallowed_lane,
            optional,
        } => lanes::lane_for_sweep(
            ctx,
            lanes::Sweep::Delete,
            filter,
            source,
            *disallowed_lane,
            *optional,
        ),
        ActionKind::SelectLaneForDeleteValueRange { min, max } => {
            let filter = crate::effects::TargetFilter::any()
                .at(crate::effects::Position::Any)
                .valued_between(*min, *max);
            lanes::lane_for_sweep(ctx, lanes::Sweep::Delete, &filter, source, None, false)
        }
        ActionKind::SelectLaneForReturnAll { filter, optional } => {
            lanes::lane_for_sweep(ctx, lanes::Sweep::Return, filter, source, None, *optional)
        }
        ActionKind::SelectLaneForFlipAll { filter } => {
            lanes::lane_for_sweep(ctx, lanes::Sweep::Flip, filter, source, None, false)
        }
        ActionKind::SelectLaneForDeckPlay { disallowed_lane } => {
            lanes::lane_for_deck_play(ctx, *disallowed_lane)
        }
        ActionKind::SelectLaneToCompile { lanes } => {
            Some(super::moves::choose_compile(ctx, lanes))
        }

        // === Prompts ===
        ActionKind::PromptOptionalEffect { effect } => {
            Some(prompts::optional_effect(ctx, effect, source))
        }
        ActionKind::PromptDrawThenDelete { filter, .. } => {
            Some(prompts::draw_then_delete(ctx, filter, source))
        }
        ActionKind::PromptDiscardOrDeleteSelf { count } => {
            Some(prompts::discard_or_delete_self(ctx, *count, source))
        }
        ActionKind::PromptRevealedCardFollowUp { card_id } => {
            Some(prompts::revealed_follow_up(ctx, *card_id))
        }

        // === Protocols ===
        ActionKind::PromptUseControlMechanic => Some(protocols::use_control(ctx)),
        ActionKind::PromptRearrangeProtocols {
            target,
            must_change,
        } => Some(protocols::rearrange(ctx, *target, *must_change)),
        ActionKind::PromptSwapProtocols { target } => Some(protocols::swap(ctx, *target)),
    }
}

// =============================================================================
// Ranking helpers
// =============================================================================

/// Sort candidates best first, keeping insertion order among equals.
pub(crate) fn rank<T>(mut items: Vec<(T, f64)>) -> Vec<(T, f64)> {
    items.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    items
}

/// Take the best candidate. On non-critical picks the profile's mistake
/// probability may select the runner-up instead.
pub(crate) fn pick<T: Copy>(
    ctx: &DecisionContext<'_>,
    ranked: &[(T, f64)],
    critical: bool,
    rng: &mut dyn RandomSource,
) -> Option<T> {
    let mistake = ctx.profile.mistake_probability;
    if ranked.len() >= 2 && !critical && mistake > 0.0 && rng.gen_bool(mistake) {
        debug!(target: "compile_ai::resolver", "mistake: taking runner-up");
        return Some(ranked[1].0);
    }
    ranked.first().map(|(item, _)| *item)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::DifficultyProfile;
    use crate::core::{ScriptedRandom, Side};
    use crate::rules::StandardRules;
    use crate::scenario::ScenarioBuilder;

    #[test]
    fn test_rank_is_stable() {
        let ranked = rank(vec![("a", 1.0), ("b", 3.0), ("c", 1.0)]);
        let order: Vec<_> = ranked.iter().map(|(s, _)| *s).collect();
        assert_eq!(order, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_pick_mistake_only_when_not_critical() {
        let state = ScenarioBuilder::new().build();
        let rules = StandardRules::default();
        let profile = DifficultyProfile::normal().with_mistake_probability(1.0);
        let ctx = DecisionContext::new(&state, Side::Opponent, &profile, &rules);
        let ranked = [(1, 5.0), (2, 3.0)];

        assert_eq!(pick(&ctx, &ranked, false, &mut ScriptedRandom::always()), Some(2));
        assert_eq!(pick(&ctx, &ranked, true, &mut ScriptedRandom::always()), Some(1));
        assert_eq!(pick(&ctx, &ranked[..1], false, &mut ScriptedRandom::always()), Some(1));
        assert_eq!(pick::<u8>(&ctx, &[], false, &mut ScriptedRandom::always()), None);
    }

    #[test]
    fn test_invalid_prompt_goes_to_rescue() {
        let state = ScenarioBuilder::new().build();
        let rules = StandardRules::default();
        let profile = DifficultyProfile::normal();
        let ctx = DecisionContext::new(&state, Side::Opponent, &profile, &rules);
        let action = ActionRequired::new(
            Side::Opponent,
            ActionKind::SelectLaneToCompile {
                lanes: smallvec::SmallVec::new(),
            },
        );
        let answer = resolve(&ctx, &action, &mut ScriptedRandom::never());
        assert!(action.accepts(&answer) || answer == AiAction::Skip);
    }
}
