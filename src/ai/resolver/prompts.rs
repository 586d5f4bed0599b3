//! Accept/decline and multiple-choice prompts.
//!
//! An optional effect is accepted only when it is computed to help. Giving
//! cards to the opponent is always declined.

use super::hand::discard_order;
use super::lanes::best_shift_destination;
use super::targets::{self, Targeting};
use crate::ai::context::DecisionContext;
use crate::ai::moves::{score_plays, PlayConstraints};
use crate::ai::scoring::{card_power, card_threat};
use crate::core::{AiAction, CardId, RevealFollowUp};
use crate::effects::{LaneScope, OptionalEffect, OwnerFilter, TargetFilter};

/// Power at or below which a hand card counts as dead weight.
const DEAD_CARD_POWER: f64 = 1.0;

fn accept(accept: bool) -> AiAction {
    AiAction::ResolveOptionalEffectPrompt { accept }
}

/// Whether `effect` helps us.
#[must_use]
pub fn effect_helps(
    ctx: &DecisionContext<'_>,
    effect: &OptionalEffect,
    source: Option<CardId>,
) -> bool {
    let hand = &ctx.mine().hand;
    let source_card = source.and_then(|id| ctx.state.locate(id));

    match effect {
        OptionalEffect::Give { .. } => false,
        OptionalEffect::Draw { .. } => {
            !ctx.mine().deck.is_empty() || !ctx.mine().discard.is_empty()
        }
        OptionalEffect::Discard { count } => {
            hand.len() > ctx.hand_limit()
                || discard_order(ctx)
                    .into_iter()
                    .take(*count)
                    .filter(|c| card_power(c, ctx.profile) <= DEAD_CARD_POWER)
                    .count()
                    >= *count
        }
        OptionalEffect::FlipSelf => {
            source_card.is_some_and(|bc| targets::flip_score(ctx, &bc) > 0.0)
        }
        OptionalEffect::ReturnSelf => {
            source_card.is_some_and(|bc| targets::return_score(ctx, &bc) > 0.0)
        }
        OptionalEffect::ShiftSelf => source_card.is_some_and(|bc| {
            best_shift_destination(ctx, bc.owner, bc.card, bc.lane, |_| true)
                .is_some_and(|(_, score)| score > 0.0)
        }),
        OptionalEffect::Flip { filter } => {
            positive(targets::best_score(ctx, Targeting::Flip, filter, source))
        }
        OptionalEffect::Delete { filter } => {
            positive(targets::best_score(ctx, Targeting::Delete, filter, source))
        }
        OptionalEffect::Return { filter } => {
            positive(targets::best_score(ctx, Targeting::Return, filter, source))
        }
        OptionalEffect::Shift { filter } => {
            positive(targets::best_score(ctx, Targeting::Shift, filter, source))
        }
        OptionalEffect::ShuffleDiscardIntoDeck => {
            let side = ctx.mine();
            !side.discard.is_empty() && side.deck.len() <= side.discard.len()
        }
        OptionalEffect::PlayFromHand => score_plays(ctx, PlayConstraints::default())
            .first()
            .is_some_and(|m| m.score > 0.0),
    }
}

fn positive(score: Option<f64>) -> bool {
    score.is_some_and(|s| s > 0.0)
}

pub fn optional_effect(
    ctx: &DecisionContext<'_>,
    effect: &OptionalEffect,
    source: Option<CardId>,
) -> AiAction {
    accept(effect_helps(ctx, effect, source))
}

/// Draw, then delete: worth it only with an opposing card to delete.
pub fn draw_then_delete(
    ctx: &DecisionContext<'_>,
    filter: &TargetFilter,
    source: Option<CardId>,
) -> AiAction {
    if filter.effective_owner() == OwnerFilter::Own {
        return accept(false);
    }
    let opposing = filter.clone().owned_by(OwnerFilter::Opponent);
    let has_opposing = !targets::query(ctx, &opposing, source, LaneScope::Any)
        .candidates(ctx.state)
        .is_empty();
    accept(has_opposing)
}

/// Discard `count` cards unless they are worth more than the source card.
pub fn discard_or_delete_self(
    ctx: &DecisionContext<'_>,
    count: usize,
    source: Option<CardId>,
) -> AiAction {
    let hand = discard_order(ctx);
    if hand.len() < count {
        return AiAction::ResolveDiscardOrDeletePrompt { discard: false };
    }
    let discard_cost: f64 = hand
        .iter()
        .take(count)
        .map(|c| card_power(c, ctx.profile))
        .sum();
    let keep_value = source
        .and_then(|id| ctx.state.locate(id))
        .map_or(0.0, |bc| {
            card_threat(ctx, bc.card, bc.owner, bc.lane)
                + f64::from(ctx.effective_value(&bc)) * ctx.profile.value_weight
        });
    AiAction::ResolveDiscardOrDeletePrompt {
        discard: discard_cost < keep_value,
    }
}

/// After a reveal: flip or shift the card when that helps, else skip.
pub fn revealed_follow_up(ctx: &DecisionContext<'_>, card_id: CardId) -> AiAction {
    let Some(bc) = ctx.state.locate(card_id) else {
        return AiAction::ResolveRevealedCardPrompt {
            choice: RevealFollowUp::Skip,
        };
    };
    let flip = targets::flip_score(ctx, &bc);
    let shift = best_shift_destination(ctx, bc.owner, bc.card, bc.lane, |_| true)
        .map_or(f64::NEG_INFINITY, |(_, s)| s);

    let choice = if flip <= 0.0 && shift <= 0.0 {
        RevealFollowUp::Skip
    } else if flip >= shift {
        RevealFollowUp::Flip
    } else {
        RevealFollowUp::Shift
    };
    AiAction::ResolveRevealedCardPrompt { choice }
}
