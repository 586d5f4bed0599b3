//! Hand decisions: discards, playing, giving and revealing hand cards.

use smallvec::SmallVec;

use crate::ai::context::DecisionContext;
use crate::ai::moves::{score_plays, PlayConstraints};
use crate::ai::scoring::card_power;
use crate::cards::Card;
use crate::core::{AiAction, CardId};

/// Hand cards ordered from most to least expendable.
///
/// Disruption cards go last whenever something else can be discarded.
#[must_use]
pub fn discard_order<'a>(ctx: &DecisionContext<'a>) -> Vec<&'a Card> {
    let mut cards: Vec<&Card> = ctx.mine().hand.iter().collect();
    cards.sort_by(|a, b| {
        a.has_disruption().cmp(&b.has_disruption()).then(
            card_power(a, ctx.profile)
                .partial_cmp(&card_power(b, ctx.profile))
                .unwrap_or(std::cmp::Ordering::Equal),
        )
    });
    cards
}

/// Discard exactly `count` cards (or the whole hand).
#[must_use]
pub fn discard_exact(ctx: &DecisionContext<'_>, count: usize) -> AiAction {
    AiAction::discard(discard_order(ctx).into_iter().take(count).map(|c| c.id))
}

/// Discard up to `max` cards whose power is at most `cutoff`.
///
/// Nothing cheap enough resolves to `Skip`.
#[must_use]
pub fn discard_optional(ctx: &DecisionContext<'_>, max: usize, cutoff: f64) -> AiAction {
    let ids: SmallVec<[CardId; 4]> = discard_order(ctx)
        .into_iter()
        .filter(|c| !c.has_disruption() && card_power(c, ctx.profile) <= cutoff)
        .take(max)
        .map(|c| c.id)
        .collect();
    if ids.is_empty() {
        AiAction::Skip
    } else {
        AiAction::DiscardCards { card_ids: ids }
    }
}

/// Choose the strongest of the offered opponent hand cards.
#[must_use]
pub fn opponent_discard(ctx: &DecisionContext<'_>, offered: &[CardId]) -> Option<AiAction> {
    let hand = &ctx.theirs().hand;
    offered
        .iter()
        .filter_map(|id| hand.iter().find(|c| c.id == *id))
        .max_by(|a, b| {
            card_power(a, ctx.profile)
                .partial_cmp(&card_power(b, ctx.profile))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|c| AiAction::discard([c.id]))
}

/// Best generator move within the prompt's constraints.
#[must_use]
pub fn play_from_hand(
    ctx: &DecisionContext<'_>,
    lane: Option<usize>,
    disallowed_lane: Option<usize>,
    face_down: bool,
) -> Option<AiAction> {
    let constraints = PlayConstraints {
        lane,
        disallowed_lane,
        face_down_only: face_down,
    };
    score_plays(ctx, constraints)
        .into_iter()
        .next()
        .map(|m| m.action)
}

/// Lowest-power hand card.
#[must_use]
pub fn weakest_hand_card(ctx: &DecisionContext<'_>) -> Option<CardId> {
    ctx.mine()
        .hand
        .iter()
        .min_by(|a, b| {
            card_power(a, ctx.profile)
                .partial_cmp(&card_power(b, ctx.profile))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|c| c.id)
}
