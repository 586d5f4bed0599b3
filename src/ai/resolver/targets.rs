//! Single-card board targets: delete, flip, return, shift, reveal.
//!
//! Candidates come from `TargetQuery`, so filters, scopes and disallowed
//! ids are honored in one place. Acting against the opponent ranks by
//! threat; acting against ourselves ranks by least harm.

use tracing::{debug, trace};

use super::lanes::{best_shift_destination, outcome_score, Delta};
use super::{pick, rank};
use crate::ai::context::DecisionContext;
use crate::ai::scoring::{card_power, card_threat};
use crate::core::{AiAction, BoardCard, CardId, RandomSource, Side};
use crate::effects::{LaneScope, Position, TargetFilter, TargetQuery};

/// What is done to the chosen card.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Targeting {
    Delete,
    Flip,
    Return,
    Shift,
}

/// Build the candidate query for a prompt.
#[must_use]
pub fn query<'q>(
    ctx: &DecisionContext<'q>,
    filter: &'q TargetFilter,
    source: Option<CardId>,
    scope: LaneScope,
) -> TargetQuery<'q> {
    TargetQuery::new(filter, ctx.me)
        .with_source(source)
        .with_scope(scope)
        .with_rules(ctx.rules)
}

/// (ours, theirs) deltas for a change to `owner`'s lane total.
fn split(ctx: &DecisionContext<'_>, owner: Side, lane: usize, after: i32) -> (Delta, Delta) {
    let changed = Delta {
        before: ctx.lane_value(owner, lane),
        after,
    };
    let other = Delta::unchanged(ctx.lane_value(owner.opposite(), lane));
    if owner == ctx.me {
        (changed, other)
    } else {
        (other, changed)
    }
}

/// Whether removing `bc` stops an opposing compile.
#[must_use]
pub fn relieves_threat(ctx: &DecisionContext<'_>, bc: &BoardCard<'_>) -> bool {
    bc.owner == ctx.opp()
        && ctx.threatens_compile(ctx.opp(), bc.lane)
        && !ctx.config().compiles(
            ctx.value_without(bc.owner, bc.lane, bc.id()),
            ctx.lane_value(ctx.me, bc.lane),
        )
}

/// Deleting: opponent cards by threat, then our own least-threat card.
#[must_use]
pub fn delete_score(ctx: &DecisionContext<'_>, bc: &BoardCard<'_>) -> f64 {
    let threat = card_threat(ctx, bc.card, bc.owner, bc.lane);
    if bc.owner == ctx.me {
        return -threat;
    }
    let relief = if relieves_threat(ctx, bc) {
        ctx.profile.block_bonus / 2.0
    } else {
        0.0
    };
    100.0 + threat + relief
}

/// Flipping: the lane swing plus the effects switched on or off.
#[must_use]
pub fn flip_score(ctx: &DecisionContext<'_>, bc: &BoardCard<'_>) -> f64 {
    let after = ctx.value_with_flipped(bc.owner, bc.lane, bc.id());
    let (mine, theirs) = split(ctx, bc.owner, bc.lane, after);
    let swing = outcome_score(ctx, mine, theirs);

    let face_up_threat = card_threat(ctx, &bc.card.oriented(true), bc.owner, bc.lane);
    let effects = match (bc.owner == ctx.me, bc.card.face_up) {
        (false, true) => 0.25 * face_up_threat,
        (false, false) => -0.25 * face_up_threat,
        (true, false) if !bc.card.keywords.is_empty() => 1.0,
        (true, false) => 0.0,
        (true, true) => -0.25 * face_up_threat,
    };
    swing + effects
}

/// Returning: the lane swing, adjusted for the card going back to hand.
#[must_use]
pub fn return_score(ctx: &DecisionContext<'_>, bc: &BoardCard<'_>) -> f64 {
    let after = ctx.value_without(bc.owner, bc.lane, bc.id());
    let (mine, theirs) = split(ctx, bc.owner, bc.lane, after);
    let swing = outcome_score(ctx, mine, theirs);
    let recovered = 0.5 * card_power(bc.card, ctx.profile);
    if bc.owner == ctx.me {
        let unhidden = if bc.card.face_up {
            0.0
        } else {
            f64::from((bc.card.value - ctx.effective_value(bc)).max(0)) * ctx.profile.value_weight * 0.5
        };
        swing + recovered + unhidden
    } else {
        swing - recovered
    }
}

/// Shifting: the best destination's benefit.
#[must_use]
pub fn shift_score(
    ctx: &DecisionContext<'_>,
    bc: &BoardCard<'_>,
    destination: Option<usize>,
) -> Option<(usize, f64)> {
    best_shift_destination(ctx, bc.owner, bc.card, bc.lane, |l| {
        destination.map_or(true, |d| d == l)
    })
}

/// Candidates for `targeting`, best first.
#[must_use]
pub fn ranked(
    ctx: &DecisionContext<'_>,
    targeting: Targeting,
    query: &TargetQuery<'_>,
) -> Vec<(CardId, f64)> {
    let scored = query
        .candidates(ctx.state)
        .iter()
        .filter_map(|bc| {
            let score = match targeting {
                Targeting::Delete => delete_score(ctx, bc),
                Targeting::Flip => flip_score(ctx, bc),
                Targeting::Return => return_score(ctx, bc),
                Targeting::Shift => shift_score(ctx, bc, None)?.1,
            };
            Some((bc.id(), score))
        })
        .collect();
    let ranked = rank(scored);
    trace!(target: "compile_ai::resolver::targets", ?targeting, ?ranked, "target scores");
    ranked
}

/// Best score for an effect, if any target exists.
#[must_use]
pub fn best_score(
    ctx: &DecisionContext<'_>,
    targeting: Targeting,
    filter: &TargetFilter,
    source: Option<CardId>,
) -> Option<f64> {
    ranked(ctx, targeting, &query(ctx, filter, source, LaneScope::Any))
        .first()
        .map(|(_, score)| *score)
}

/// Re-check a pick against the query, falling through the ranking.
fn confirm(
    ctx: &DecisionContext<'_>,
    query: &TargetQuery<'_>,
    choice: CardId,
    ranked: &[(CardId, f64)],
) -> Option<CardId> {
    if query.admits(ctx.state, choice) {
        return Some(choice);
    }
    debug!(target: "compile_ai::resolver::targets", %choice, "stale target, falling through");
    ranked
        .iter()
        .map(|(id, _)| *id)
        .find(|id| query.admits(ctx.state, *id))
}

/// Whether a pick touches a lane where someone is about to compile.
fn is_critical(ctx: &DecisionContext<'_>, id: CardId) -> bool {
    ctx.state.locate(id).is_some_and(|bc| {
        ctx.threatens_compile(ctx.opp(), bc.lane) || ctx.threatens_compile(ctx.me, bc.lane)
    })
}

/// Shared pick logic for single-card prompts.
fn choose(
    ctx: &DecisionContext<'_>,
    query: &TargetQuery<'_>,
    ranked: &[(CardId, f64)],
    optional: bool,
    rng: &mut dyn RandomSource,
) -> Option<CardId> {
    let (best, best_score) = *ranked.first()?;
    if optional && best_score <= 0.0 {
        return None;
    }
    let choice = pick(ctx, ranked, is_critical(ctx, best), rng)?;
    // A mistake never turns a helpful optional pick into a harmful one.
    let choice = match ranked.iter().find(|(id, _)| *id == choice) {
        Some((_, score)) if optional && *score <= 0.0 => best,
        _ => choice,
    };
    confirm(ctx, query, choice, ranked)
}

pub fn delete(
    ctx: &DecisionContext<'_>,
    filter: &TargetFilter,
    source: Option<CardId>,
    scope: LaneScope,
    disallowed: &[CardId],
    rng: &mut dyn RandomSource,
) -> Option<AiAction> {
    let query = query(ctx, filter, source, scope).with_disallowed(disallowed.iter().copied());
    let ranked = ranked(ctx, Targeting::Delete, &query);
    choose(ctx, &query, &ranked, false, rng).map(|card_id| AiAction::DeleteCard { card_id })
}

pub fn flip(
    ctx: &DecisionContext<'_>,
    filter: &TargetFilter,
    source: Option<CardId>,
    scope: LaneScope,
    optional: bool,
    rng: &mut dyn RandomSource,
) -> Option<AiAction> {
    let query = query(ctx, filter, source, scope);
    let ranked = ranked(ctx, Targeting::Flip, &query);
    match choose(ctx, &query, &ranked, optional, rng) {
        Some(card_id) => Some(AiAction::FlipCard { card_id }),
        None if optional => Some(AiAction::Skip),
        None => None,
    }
}

pub fn flip_covered(
    ctx: &DecisionContext<'_>,
    lane: usize,
    optional: bool,
    rng: &mut dyn RandomSource,
) -> Option<AiAction> {
    let filter = TargetFilter::any().at(Position::Covered);
    flip(ctx, &filter, None, LaneScope::Lane(lane), optional, rng)
}

pub fn return_card(
    ctx: &DecisionContext<'_>,
    filter: &TargetFilter,
    source: Option<CardId>,
    scope: LaneScope,
    optional: bool,
    rng: &mut dyn RandomSource,
) -> Option<AiAction> {
    let query = query(ctx, filter, source, scope);
    let ranked = ranked(ctx, Targeting::Return, &query);
    match choose(ctx, &query, &ranked, optional, rng) {
        Some(card_id) => Some(AiAction::ReturnCard { card_id }),
        None if optional => Some(AiAction::Skip),
        None => None,
    }
}

pub fn shift(
    ctx: &DecisionContext<'_>,
    filter: &TargetFilter,
    source: Option<CardId>,
    scope: LaneScope,
    optional: bool,
    destination: Option<usize>,
    rng: &mut dyn RandomSource,
) -> Option<AiAction> {
    let query = query(ctx, filter, source, scope);
    let scored = query
        .candidates(ctx.state)
        .iter()
        .filter_map(|bc| shift_score(ctx, bc, destination).map(|(_, s)| (bc.id(), s)))
        .collect();
    let ranked = rank(scored);
    match choose(ctx, &query, &ranked, optional, rng) {
        Some(card_id) => Some(AiAction::ShiftCard { card_id }),
        None if optional => Some(AiAction::Skip),
        None => None,
    }
}

/// Reveal: hidden opponent cards first, in their strongest lane.
pub fn reveal(
    ctx: &DecisionContext<'_>,
    filter: &TargetFilter,
    source: Option<CardId>,
) -> Option<AiAction> {
    let query = query(ctx, filter, source, LaneScope::Any);
    let scored = query
        .candidates(ctx.state)
        .iter()
        .map(|bc| {
            let score = match (bc.owner == ctx.me, bc.card.face_up) {
                (false, false) => 10.0 + f64::from(ctx.lane_value(bc.owner, bc.lane)),
                (true, false) => 1.0,
                _ => 0.0,
            };
            (bc.id(), score)
        })
        .collect();
    rank(scored)
        .first()
        .map(|(card_id, _)| AiAction::RevealCard { card_id: *card_id })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::DifficultyProfile;
    use crate::cards::Card;
    use crate::core::ScriptedRandom;
    use crate::effects::OwnerFilter;
    use crate::rules::StandardRules;
    use crate::scenario::ScenarioBuilder;

    fn opponent_filter() -> TargetFilter {
        TargetFilter::any().owned_by(OwnerFilter::Opponent)
    }

    #[test]
    fn test_delete_prefers_highest_threat() {
        let state = ScenarioBuilder::new()
            .lane(Side::Player, 0, [Card::new(CardId(1), "Fire", 5)])
            .lane(Side::Player, 1, [Card::new(CardId(2), "Water", 2)])
            .build();
        let rules = StandardRules::default();
        let profile = DifficultyProfile::normal();
        let ctx = DecisionContext::new(&state, Side::Opponent, &profile, &rules);

        let action = delete(
            &ctx,
            &opponent_filter(),
            None,
            LaneScope::Any,
            &[],
            &mut ScriptedRandom::never(),
        );
        assert_eq!(action, Some(AiAction::DeleteCard { card_id: CardId(1) }));

        let action = delete(
            &ctx,
            &opponent_filter(),
            None,
            LaneScope::Any,
            &[CardId(1)],
            &mut ScriptedRandom::never(),
        );
        assert_eq!(action, Some(AiAction::DeleteCard { card_id: CardId(2) }));
    }

    #[test]
    fn test_delete_own_least_threat() {
        let state = ScenarioBuilder::new()
            .lane(Side::Opponent, 0, [Card::new(CardId(1), "Death", 5)])
            .lane(Side::Opponent, 1, [Card::new(CardId(2), "Light", 1)])
            .build();
        let rules = StandardRules::default();
        let profile = DifficultyProfile::normal();
        let ctx = DecisionContext::new(&state, Side::Opponent, &profile, &rules);

        let action = delete(
            &ctx,
            &TargetFilter::any(),
            None,
            LaneScope::Any,
            &[],
            &mut ScriptedRandom::never(),
        );
        assert_eq!(action, Some(AiAction::DeleteCard { card_id: CardId(2) }));
    }

    #[test]
    fn test_optional_flip_skips_when_harmful() {
        let state = ScenarioBuilder::new()
            .lane(Side::Opponent, 0, [Card::new(CardId(1), "Death", 5)])
            .build();
        let rules = StandardRules::default();
        let profile = DifficultyProfile::normal();
        let ctx = DecisionContext::new(&state, Side::Opponent, &profile, &rules);

        let action = flip(
            &ctx,
            &TargetFilter::any(),
            None,
            LaneScope::Any,
            true,
            &mut ScriptedRandom::never(),
        );
        assert_eq!(action, Some(AiAction::Skip));

        let forced = flip(
            &ctx,
            &TargetFilter::any(),
            None,
            LaneScope::Any,
            false,
            &mut ScriptedRandom::never(),
        );
        assert_eq!(forced, Some(AiAction::FlipCard { card_id: CardId(1) }));
    }

    #[test]
    fn test_flip_opponent_high_card() {
        let state = ScenarioBuilder::new()
            .lane(Side::Player, 2, [Card::new(CardId(1), "Life", 6)])
            .lane(Side::Opponent, 2, [Card::new(CardId(2), "Speed", 1)])
            .build();
        let rules = StandardRules::default();
        let profile = DifficultyProfile::normal();
        let ctx = DecisionContext::new(&state, Side::Opponent, &profile, &rules);

        let action = flip(
            &ctx,
            &TargetFilter::any(),
            None,
            LaneScope::Any,
            true,
            &mut ScriptedRandom::never(),
        );
        assert_eq!(action, Some(AiAction::FlipCard { card_id: CardId(1) }));
    }

    #[test]
    fn test_return_without_candidates() {
        let state = ScenarioBuilder::new().build();
        let rules = StandardRules::default();
        let profile = DifficultyProfile::normal();
        let ctx = DecisionContext::new(&state, Side::Opponent, &profile, &rules);
        let filter = TargetFilter::any();

        let mut rng = ScriptedRandom::never();

        let optional = return_card(&ctx, &filter, None, LaneScope::Any, true, &mut rng);
        assert_eq!(optional, Some(AiAction::Skip));
        let forced = return_card(&ctx, &filter, None, LaneScope::Any, false, &mut rng);
        assert_eq!(forced, None);
    }

    #[test]
    fn test_reveal_prefers_hidden_opponent_card() {
        let state = ScenarioBuilder::new()
            .lane(Side::Player, 0, [Card::new(CardId(1), "Fire", 4).face_down()])
            .lane(Side::Opponent, 0, [Card::new(CardId(2), "Death", 3).face_down()])
            .build();
        let rules = StandardRules::default();
        let profile = DifficultyProfile::normal();
        let ctx = DecisionContext::new(&state, Side::Opponent, &profile, &rules);

        assert_eq!(
            reveal(&ctx, &TargetFilter::any(), None),
            Some(AiAction::RevealCard { card_id: CardId(1) })
        );
    }
}
