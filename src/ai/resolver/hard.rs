//! Hard tier: threat-weighted specializations.
//!
//! Only a few decision families get a sharper handler here; everything
//! else returns `None` and falls through to the normal heuristics.
//!
//! - deletes weigh what the removal uncovers
//! - flips weigh the effects switched on or off at full strength
//! - discards keep cards able to block an imminent compile
//! - shifting an opponent card avoids pushing their lanes toward compiling

use tracing::trace;

use super::hand::discard_order;
use super::lanes::shift_benefit;
use super::{rank, targets};
use crate::ai::context::DecisionContext;
use crate::ai::moves::score_play;
use crate::ai::scoring::card_threat;
use crate::cards::Card;
use crate::core::{AiAction, BoardCard, CardId, RandomSource, LANE_COUNT};
use crate::effects::{ActionKind, ActionRequired, LaneScope, TargetFilter};

/// Hard-tier answer, or `None` to defer to the normal tier.
pub fn resolve(
    ctx: &DecisionContext<'_>,
    action: &ActionRequired,
    _rng: &mut dyn RandomSource,
) -> Option<AiAction> {
    let source = action.source_card_id;
    match &action.kind {
        ActionKind::SelectCardsToDelete {
            filter,
            disallowed_ids,
            scope,
            ..
        } => delete(ctx, filter, source, *scope, disallowed_ids),
        ActionKind::SelectCardToFlip {
            filter,
            scope,
            optional,
        } => flip(ctx, filter, source, *scope, *optional),
        ActionKind::Discard { count } => discard_keeping_blockers(ctx, *count),
        ActionKind::SelectLaneForShift {
            card_id,
            origin_lane,
            disallowed_lane,
        } => lane_for_opponent_shift(ctx, *card_id, *origin_lane, *disallowed_lane),
        _ => None,
    }
}

/// Threat the card directly beneath `bc` would bring back into play.
fn uncover_cost(ctx: &DecisionContext<'_>, bc: &BoardCard<'_>) -> f64 {
    if !bc.uncovered || bc.index == 0 {
        return 0.0;
    }
    ctx.side(bc.owner).lanes[bc.lane]
        .get(bc.index - 1)
        .map_or(0.0, |below| {
            let threat = card_threat(ctx, below, bc.owner, bc.lane);
            // Only effects matter here; the value is already in the lane total.
            threat - f64::from(below.value) * ctx.profile.threat_value_weight
        })
        .max(0.0)
}

fn delete_score(ctx: &DecisionContext<'_>, bc: &BoardCard<'_>) -> f64 {
    let base = targets::delete_score(ctx, bc);
    let uncovered = uncover_cost(ctx, bc);
    if bc.owner == ctx.me {
        base + uncovered
    } else {
        base + 0.5 * card_threat(ctx, bc.card, bc.owner, bc.lane) - uncovered
    }
}

fn delete(
    ctx: &DecisionContext<'_>,
    filter: &TargetFilter,
    source: Option<CardId>,
    scope: LaneScope,
    disallowed: &[CardId],
) -> Option<AiAction> {
    let query =
        targets::query(ctx, filter, source, scope).with_disallowed(disallowed.iter().copied());
    let scored = query
        .candidates(ctx.state)
        .iter()
        .map(|bc| (bc.id(), delete_score(ctx, bc)))
        .collect();
    let ranked = rank(scored);
    trace!(target: "compile_ai::resolver::targets", ?ranked, "hard delete scores");
    ranked
        .first()
        .map(|(card_id, _)| AiAction::DeleteCard { card_id: *card_id })
}

fn flip_score(ctx: &DecisionContext<'_>, bc: &BoardCard<'_>) -> f64 {
    let base = targets::flip_score(ctx, bc);
    let effects = card_threat(ctx, &bc.card.oriented(true), bc.owner, bc.lane)
        - f64::from(bc.card.value) * ctx.profile.threat_value_weight;
    // Opponent face-up effects switched off, or ours switched on.
    let switch = match (bc.owner == ctx.me, bc.card.face_up) {
        (false, true) | (true, false) => effects,
        (false, false) | (true, true) => -effects,
    };
    base + 0.75 * switch
}

fn flip(
    ctx: &DecisionContext<'_>,
    filter: &TargetFilter,
    source: Option<CardId>,
    scope: LaneScope,
    optional: bool,
) -> Option<AiAction> {
    let query = targets::query(ctx, filter, source, scope);
    let scored = query
        .candidates(ctx.state)
        .iter()
        .map(|bc| (bc.id(), flip_score(ctx, bc)))
        .collect();
    let ranked = rank(scored);
    trace!(target: "compile_ai::resolver::targets", ?ranked, "hard flip scores");
    match ranked.first() {
        Some((_, score)) if optional && *score <= 0.0 => Some(AiAction::Skip),
        Some((card_id, _)) => Some(AiAction::FlipCard { card_id: *card_id }),
        None if optional => Some(AiAction::Skip),
        None => None,
    }
}

/// Whether `card` could block an imminent opponent compile from hand.
fn can_block(ctx: &DecisionContext<'_>, card: &Card, threats: &[usize]) -> bool {
    threats.iter().any(|lane| {
        [true, false]
            .into_iter()
            .filter_map(|face_up| score_play(ctx, card, *lane, face_up))
            .any(|m| m.blocks)
    })
}

fn discard_keeping_blockers(ctx: &DecisionContext<'_>, count: usize) -> Option<AiAction> {
    let threats = ctx.imminent_compiles(ctx.opp());
    if threats.is_empty() {
        return None;
    }
    let mut order = discard_order(ctx);
    // Stable: blockers move to the back, the rest keep their order.
    order.sort_by_key(|card| can_block(ctx, card, &threats));
    Some(AiAction::discard(order.into_iter().take(count).map(|c| c.id)))
}

/// Destination for an opponent card we are shifting.
fn lane_for_opponent_shift(
    ctx: &DecisionContext<'_>,
    card_id: CardId,
    origin: usize,
    disallowed: Option<usize>,
) -> Option<AiAction> {
    let bc = ctx.state.locate(card_id)?;
    if bc.owner == ctx.me {
        return None;
    }
    let config = ctx.config();
    let margin = ctx.threshold() / 4;
    let scored = (0..LANE_COUNT)
        .filter(|dest| *dest != origin && Some(*dest) != disallowed)
        .map(|dest| {
            let mut score = shift_benefit(ctx, bc.owner, bc.card, origin, dest);
            let after = ctx.value_with_card(bc.owner, dest, bc.card);
            let near = config.compiles(after + margin, ctx.lane_value(ctx.me, dest));
            if near && !ctx.is_compiled(bc.owner, dest) {
                score -= ctx.profile.block_bonus / 4.0;
            }
            (dest, score)
        })
        .collect();
    rank(scored)
        .first()
        .map(|(lane, _)| AiAction::SelectLane { lane: *lane })
}
