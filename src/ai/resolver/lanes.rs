//! Lane selection.
//!
//! Lane effects are scored by net benefit: what the opponent loses minus
//! what we lose, with compile swings and control-hunting leads on top.
//! Mandatory prompts take the least bad lane; optional ones skip when no
//! lane helps.

use smallvec::SmallVec;
use tracing::trace;

use super::rank;
use crate::ai::context::DecisionContext;
use crate::ai::moves::score_play;
use crate::ai::scoring::{card_power, card_threat};
use crate::cards::Card;
use crate::core::{AiAction, CardId, Lane, Side, LANE_COUNT};
use crate::effects::{LaneScope, TargetFilter, TargetQuery};

/// Before/after totals of one lane for one side.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Delta {
    pub before: i32,
    pub after: i32,
}

impl Delta {
    #[must_use]
    pub fn unchanged(value: i32) -> Self {
        Self {
            before: value,
            after: value,
        }
    }

    #[must_use]
    pub fn change(self) -> i32 {
        self.after - self.before
    }
}

/// Net benefit of a lane going from `before` to `after` for both sides.
#[must_use]
pub fn outcome_score(ctx: &DecisionContext<'_>, mine: Delta, theirs: Delta) -> f64 {
    let p = ctx.profile;
    let config = ctx.config();
    let mut score = p.value_weight * f64::from(mine.change() - theirs.change());

    let threat_before = config.compiles(theirs.before, mine.before);
    let threat_after = config.compiles(theirs.after, mine.after);
    if threat_before && !threat_after {
        score += p.block_bonus / 2.0;
    } else if !threat_before && threat_after {
        score -= p.block_bonus / 2.0;
    }

    let setup_before = config.compiles(mine.before, theirs.before);
    let setup_after = config.compiles(mine.after, theirs.after);
    if !setup_before && setup_after {
        score += p.compile_setup_bonus;
    } else if setup_before && !setup_after {
        score -= p.compile_setup_bonus;
    }

    if ctx.hunting_control() {
        let lead_before = mine.before > theirs.before;
        let lead_after = mine.after > theirs.after;
        if !lead_before && lead_after {
            score += p.control_lead_bonus;
        } else if lead_before && !lead_after {
            score -= p.control_lead_bonus;
        }
    }

    score
}

/// Split before/after into (ours, theirs) for a change on `owner`'s side.
fn deltas(ctx: &DecisionContext<'_>, owner: Side, lane: usize, after: i32) -> (Delta, Delta) {
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

/// Net benefit of moving `card` of `owner` from `origin` to `dest`.
#[must_use]
pub fn shift_benefit(
    ctx: &DecisionContext<'_>,
    owner: Side,
    card: &Card,
    origin: usize,
    dest: usize,
) -> f64 {
    if origin == dest || dest >= LANE_COUNT {
        return f64::NEG_INFINITY;
    }
    let origin_after = ctx.value_without(owner, origin, card.id);
    let dest_after = ctx.value_with_card(owner, dest, card);

    let (mine, theirs) = deltas(ctx, owner, origin, origin_after);
    let at_origin = outcome_score(ctx, mine, theirs);
    let (mine, theirs) = deltas(ctx, owner, dest, dest_after);
    at_origin + outcome_score(ctx, mine, theirs)
}

/// Best destination for a shift, with its benefit.
#[must_use]
pub fn best_shift_destination(
    ctx: &DecisionContext<'_>,
    owner: Side,
    card: &Card,
    origin: usize,
    allowed: impl Fn(usize) -> bool,
) -> Option<(usize, f64)> {
    let scored = (0..LANE_COUNT)
        .filter(|dest| *dest != origin && allowed(*dest))
        .map(|dest| (dest, shift_benefit(ctx, owner, card, origin, dest)))
        .collect();
    rank(scored).into_iter().next()
}

/// Lanes a prompt may pick, excluding `disallowed`.
fn lanes_except(disallowed: Option<usize>) -> SmallVec<[usize; LANE_COUNT]> {
    (0..LANE_COUNT).filter(|l| Some(*l) != disallowed).collect()
}

/// Choose the lane for playing a specific card.
#[must_use]
pub fn lane_for_play(
    ctx: &DecisionContext<'_>,
    card_id: CardId,
    face_up: bool,
    disallowed_lane: Option<usize>,
) -> Option<AiAction> {
    let card = ctx
        .mine()
        .hand_card(card_id)
        .or_else(|| ctx.state.locate(card_id).map(|bc| bc.card))?;

    let allowed = lanes_except(disallowed_lane);
    let scored = allowed
        .iter()
        .filter_map(|lane| score_play(ctx, card, *lane, face_up).map(|m| (*lane, m.score)))
        .collect();
    let lane = rank(scored)
        .first()
        .map(|(lane, _)| *lane)
        .or_else(|| allowed.first().copied())?;
    Some(AiAction::SelectLane { lane })
}

/// Choose where a card being shifted goes.
#[must_use]
pub fn lane_for_shift(
    ctx: &DecisionContext<'_>,
    card_id: CardId,
    origin: usize,
    disallowed_lane: Option<usize>,
) -> Option<AiAction> {
    let bc = ctx.state.locate(card_id)?;
    best_shift_destination(ctx, bc.owner, bc.card, origin, |l| Some(l) != disallowed_lane)
        .map(|(lane, _)| AiAction::SelectLane { lane })
}

/// Choose where every matching card of `origin` moves.
#[must_use]
pub fn lane_for_mass_shift(
    ctx: &DecisionContext<'_>,
    origin: usize,
    filter: &TargetFilter,
    source: Option<CardId>,
) -> Option<AiAction> {
    let moving: SmallVec<[(Side, CardId); 8]> = TargetQuery::new(filter, ctx.me)
        .with_rules(ctx.rules)
        .with_source(source)
        .with_scope(LaneScope::Lane(origin))
        .candidates(ctx.state)
        .iter()
        .map(|bc| (bc.owner, bc.id()))
        .collect();

    let scored = (0..LANE_COUNT)
        .filter(|dest| *dest != origin)
        .map(|dest| {
            let mut score = 0.0;
            for side in Side::BOTH {
                let ids: SmallVec<[CardId; 8]> = moving
                    .iter()
                    .filter(|(owner, _)| *owner == side)
                    .map(|(_, id)| *id)
                    .collect();
                if ids.is_empty() {
                    continue;
                }
                let stacks = &ctx.side(side).lanes;
                let origin_stack: Lane = stacks[origin]
                    .iter()
                    .filter(|c| !ids.contains(&c.id))
                    .cloned()
                    .collect();
                let mut dest_stack = stacks[dest].clone();
                dest_stack.extend(stacks[origin].iter().filter(|c| ids.contains(&c.id)).cloned());

                let origin_after = ctx.value_with_stack(side, origin, &origin_stack);
                let dest_after = ctx.value_with_stack(side, dest, &dest_stack);
                let (mine, theirs) = deltas(ctx, side, origin, origin_after);
                score += outcome_score(ctx, mine, theirs);
                let (mine, theirs) = deltas(ctx, side, dest, dest_after);
                score += outcome_score(ctx, mine, theirs);
            }
            (dest, score)
        })
        .collect();

    rank(scored)
        .first()
        .map(|(lane, _)| AiAction::SelectLane { lane: *lane })
}

/// Lane-wide effect kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sweep {
    Delete,
    Return,
    Flip,
}

/// Net benefit of applying `sweep` to every matching card in `lane`.
#[must_use]
pub fn sweep_score(
    ctx: &DecisionContext<'_>,
    sweep: Sweep,
    filter: &TargetFilter,
    source: Option<CardId>,
    lane: usize,
) -> f64 {
    let hit: SmallVec<[(Side, CardId); 8]> = TargetQuery::new(filter, ctx.me)
        .with_rules(ctx.rules)
        .with_source(source)
        .with_scope(LaneScope::Lane(lane))
        .candidates(ctx.state)
        .iter()
        .map(|bc| (bc.owner, bc.id()))
        .collect();

    let mut values = [Delta::unchanged(0); 2];
    let mut extra = 0.0;
    for side in Side::BOTH {
        let stack = &ctx.side(side).lanes[lane];
        let is_hit = |id: CardId| hit.contains(&(side, id));
        let after: Lane = match sweep {
            Sweep::Delete | Sweep::Return => stack.iter().filter(|c| !is_hit(c.id)).cloned().collect(),
            Sweep::Flip => stack
                .iter()
                .map(|c| if is_hit(c.id) { c.oriented(!c.face_up) } else { c.clone() })
                .collect(),
        };
        values[side.index()] = Delta {
            before: ctx.lane_value(side, lane),
            after: ctx.value_with_stack(side, lane, &after),
        };

        let sign = if side == ctx.me { -1.0 } else { 1.0 };
        for card in stack.iter().filter(|c| is_hit(c.id)) {
            extra += match sweep {
                Sweep::Delete => sign * 0.5 * card_threat(ctx, card, side, lane),
                Sweep::Return => -sign * 0.5 * card_power(card, ctx.profile),
                Sweep::Flip => 0.0,
            };
        }
    }

    let mine = values[ctx.me.index()];
    let theirs = values[ctx.opp().index()];
    outcome_score(ctx, mine, theirs) + extra
}

/// Choose the lane for a lane-wide delete, return or flip.
#[must_use]
pub fn lane_for_sweep(
    ctx: &DecisionContext<'_>,
    sweep: Sweep,
    filter: &TargetFilter,
    source: Option<CardId>,
    disallowed_lane: Option<usize>,
    optional: bool,
) -> Option<AiAction> {
    let scored = lanes_except(disallowed_lane)
        .into_iter()
        .map(|lane| (lane, sweep_score(ctx, sweep, filter, source, lane)))
        .collect();
    let ranked = rank(scored);
    trace!(target: "compile_ai::resolver::lanes", ?sweep, ?ranked, "lane sweep scores");

    match ranked.first() {
        Some((_, score)) if optional && *score <= 0.0 => Some(AiAction::Skip),
        Some((lane, _)) => Some(AiAction::SelectLane { lane: *lane }),
        None if optional => Some(AiAction::Skip),
        None => None,
    }
}

/// Choose the lane receiving the deck's top card face-down.
#[must_use]
pub fn lane_for_deck_play(
    ctx: &DecisionContext<'_>,
    disallowed_lane: Option<usize>,
) -> Option<AiAction> {
    let hidden = Card::new(CardId(u32::MAX), String::new(), 0).face_down();
    let allowed = lanes_except(disallowed_lane);
    let scored = allowed
        .iter()
        .filter_map(|lane| score_play(ctx, &hidden, *lane, false).map(|m| (*lane, m.score)))
        .collect();
    let lane = rank(scored)
        .first()
        .map(|(lane, _)| *lane)
        .or_else(|| allowed.first().copied())?;
    Some(AiAction::SelectLane { lane })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::DifficultyProfile;
    use crate::effects::{OwnerFilter, Position};
    use crate::rules::StandardRules;
    use crate::scenario::ScenarioBuilder;

    #[test]
    fn test_outcome_rewards_defusing_compile() {
        let state = ScenarioBuilder::new().build();
        let rules = StandardRules::default();
        let profile = DifficultyProfile::normal();
        let ctx = DecisionContext::new(&state, Side::Opponent, &profile, &rules);

        let defuse = outcome_score(
            &ctx,
            Delta::unchanged(4),
            Delta {
                before: 11,
                after: 3,
            },
        );
        let nothing = outcome_score(&ctx, Delta::unchanged(4), Delta::unchanged(3));
        assert!(defuse > nothing);
        assert_eq!(nothing, 0.0);
    }

    #[test]
    fn test_delete_all_targets_opponent_lane() {
        let state = ScenarioBuilder::new()
            .lane(Side::Player, 0, [Card::new(CardId(1), "Fire", 5)])
            .lane(Side::Opponent, 1, [Card::new(CardId(2), "Light", 5)])
            .build();
        let rules = StandardRules::default();
        let profile = DifficultyProfile::normal();
        let ctx = DecisionContext::new(&state, Side::Opponent, &profile, &rules);

        let filter = TargetFilter::any().at(Position::Any);
        assert_eq!(
            lane_for_sweep(&ctx, Sweep::Delete, &filter, None, None, false),
            Some(AiAction::SelectLane { lane: 0 })
        );
        assert_eq!(
            lane_for_sweep(&ctx, Sweep::Delete, &filter, None, Some(0), true),
            Some(AiAction::Skip)
        );
    }

    #[test]
    fn test_shift_destination_avoids_opponent_compile() {
        let state = ScenarioBuilder::new()
            .lane(Side::Player, 0, [Card::new(CardId(1), "Fire", 3)])
            .lane(
                Side::Player,
                2,
                [Card::new(CardId(2), "Life", 4), Card::new(CardId(4), "Life", 3)],
            )
            .lane(Side::Opponent, 2, [Card::new(CardId(3), "Speed", 1)])
            .build();
        let rules = StandardRules::default();
        let profile = DifficultyProfile::normal();
        let ctx = DecisionContext::new(&state, Side::Opponent, &profile, &rules);

        let action = lane_for_shift(&ctx, CardId(1), 0, None);
        assert_eq!(action, Some(AiAction::SelectLane { lane: 1 }));
    }

    #[test]
    fn test_mass_shift_moves_own_cards_to_setup() {
        let state = ScenarioBuilder::new()
            .lane(Side::Opponent, 0, [Card::new(CardId(1), "Death", 4)])
            .lane(Side::Opponent, 2, [Card::new(CardId(2), "Speed", 6)])
            .build();
        let rules = StandardRules::default();
        let profile = DifficultyProfile::normal();
        let ctx = DecisionContext::new(&state, Side::Opponent, &profile, &rules);

        let filter = TargetFilter::any().owned_by(OwnerFilter::Own);
        assert_eq!(
            lane_for_mass_shift(&ctx, 0, &filter, None),
            Some(AiAction::SelectLane { lane: 2 })
        );
    }

    #[test]
    fn test_deck_play_prefers_block() {
        let state = ScenarioBuilder::new()
            .lane_value(Side::Player, 1, 10)
            .lane_value(Side::Opponent, 1, 8)
            .build();
        let rules = StandardRules::default();
        let profile = DifficultyProfile::normal();
        let ctx = DecisionContext::new(&state, Side::Opponent, &profile, &rules);
        assert_eq!(
            lane_for_deck_play(&ctx, None),
            Some(AiAction::SelectLane { lane: 1 })
        );
    }
}
