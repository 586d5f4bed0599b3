//! Easy tier: simple legal answers.
//!
//! Every decision is made from a plain candidate list in a fixed preference
//! order (opponent cards before ours, higher values first, lanes left to
//! right). With the profile's `random_choice_probability` the candidate is
//! drawn at random instead of taken from the front. Optional board effects
//! are skipped and prompts are declined, except drawing.
//!
//! The same lists back the generic rescue, which always takes the front.

use smallvec::SmallVec;

use super::protocols::{Arrangement, PERMUTATIONS, SWAP_PAIRS};
use super::targets;
use crate::ai::context::DecisionContext;
use crate::core::{
    AiAction, CardId, ControlChoice, RandomSource, RevealFollowUp, LANE_COUNT,
};
use crate::effects::{
    ActionKind, ActionRequired, LaneScope, OptionalEffect, Position, TargetFilter,
};

/// Index chooser: given a non-zero length, return an index into it.
pub(crate) type Chooser<'r> = dyn FnMut(usize) -> usize + 'r;

/// Easy-tier answer for `action`.
pub fn resolve(
    ctx: &DecisionContext<'_>,
    action: &ActionRequired,
    rng: &mut dyn RandomSource,
) -> Option<AiAction> {
    let p = ctx.profile.random_choice_probability;
    let random = p > 0.0 && rng.gen_bool(p);
    let mut pick = |len: usize| if random { rng.gen_index(len) } else { 0 };
    simple_answer(ctx, action, &mut pick)
}

fn one<T: Copy>(items: &[T], pick: &mut Chooser<'_>) -> Option<T> {
    if items.is_empty() {
        return None;
    }
    items.get(pick(items.len())).or_else(|| items.first()).copied()
}

/// Board candidates, opponent cards first, higher shown value first.
pub(crate) fn board_candidates(
    ctx: &DecisionContext<'_>,
    filter: &TargetFilter,
    source: Option<CardId>,
    scope: LaneScope,
    disallowed: &[CardId],
) -> SmallVec<[CardId; 8]> {
    let mut found: SmallVec<[_; 8]> = targets::query(ctx, filter, source, scope)
        .with_disallowed(disallowed.iter().copied())
        .candidates(ctx.state)
        .into_iter()
        .map(|bc| (bc.owner == ctx.me, -ctx.effective_value(&bc), bc.id()))
        .collect();
    found.sort_by_key(|(own, neg_value, _)| (*own, *neg_value));
    found.into_iter().map(|(_, _, id)| id).collect()
}

/// Lanes `0..LANE_COUNT` minus the excluded ones.
fn lanes_without(excluded: &[Option<usize>]) -> SmallVec<[usize; LANE_COUNT]> {
    (0..LANE_COUNT)
        .filter(|l| !excluded.contains(&Some(*l)))
        .collect()
}

/// Legal plays under a hand-play prompt's constraints, face-up first.
pub(crate) fn legal_plays(
    ctx: &DecisionContext<'_>,
    lane: Option<usize>,
    disallowed_lane: Option<usize>,
    face_down_only: bool,
) -> Vec<AiAction> {
    let lanes: SmallVec<[usize; LANE_COUNT]> = match lane {
        Some(l) if l < LANE_COUNT => SmallVec::from_slice(&[l]),
        Some(_) => SmallVec::new(),
        None => lanes_without(&[disallowed_lane]),
    };
    let mut plays = Vec::new();
    for card in &ctx.mine().hand {
        for lane in lanes.iter().copied().filter(|l| !ctx.is_compiled(ctx.me, *l)) {
            for face_up in [true, false] {
                if face_up && face_down_only {
                    continue;
                }
                let legal = ctx
                    .rules
                    .can_play_card(ctx.state, ctx.me, lane, face_up, &card.protocol)
                    .is_ok();
                if legal {
                    plays.push(AiAction::PlayCard {
                        card_id: card.id,
                        lane,
                        face_up,
                    });
                    break;
                }
            }
        }
    }
    plays
}

/// Hand ids, lowest value first.
fn hand_by_value(ctx: &DecisionContext<'_>) -> SmallVec<[CardId; 8]> {
    let mut cards: SmallVec<[_; 8]> = ctx.mine().hand.iter().map(|c| (c.value, c.id)).collect();
    cards.sort_by_key(|(value, _)| *value);
    cards.into_iter().map(|(_, id)| id).collect()
}

/// Answer from plain candidate lists; `pick` chooses among them.
pub(crate) fn simple_answer(
    ctx: &DecisionContext<'_>,
    action: &ActionRequired,
    pick: &mut Chooser<'_>,
) -> Option<AiAction> {
    let source = action.source_card_id;
    let optional_skip = |optional: bool| optional.then_some(AiAction::Skip);

    match &action.kind {
        // === Hand ===
        ActionKind::Discard { count } => Some(AiAction::discard(
            hand_by_value(ctx).into_iter().take(*count),
        )),
        ActionKind::DiscardUpTo { .. }
        | ActionKind::DiscardForDraw { .. }
        | ActionKind::DiscardToPunish { .. } => Some(AiAction::Skip),
        ActionKind::SelectOpponentHandCardToDiscard { cards } => {
            one(cards, pick).map(|id| AiAction::discard([id]))
        }
        ActionKind::SelectCardFromHandToPlay {
            lane,
            disallowed_lane,
            face_down,
        } => {
            let plays = legal_plays(ctx, *lane, *disallowed_lane, *face_down);
            let index = (!plays.is_empty()).then(|| pick(plays.len()))?;
            plays.get(index).or_else(|| plays.first()).cloned()
        }
        ActionKind::SelectCardFromHandToGive => {
            one(&hand_by_value(ctx), pick).map(|card_id| AiAction::GiveCard { card_id })
        }
        ActionKind::SelectCardFromHandToReveal => {
            one(&hand_by_value(ctx), pick).map(|card_id| AiAction::RevealCard { card_id })
        }

        // === Board targets ===
        ActionKind::SelectCardsToDelete {
            filter,
            disallowed_ids,
            scope,
            ..
        } => one(
            &board_candidates(ctx, filter, source, *scope, disallowed_ids),
            pick,
        )
        .map(|card_id| AiAction::DeleteCard { card_id }),
        ActionKind::SelectCardToFlip {
            filter,
            scope,
            optional,
        } => optional_skip(*optional).or_else(|| {
            one(&board_candidates(ctx, filter, source, *scope, &[]), pick)
                .map(|card_id| AiAction::FlipCard { card_id })
        }),
        ActionKind::SelectCoveredCardToFlip { lane, optional } => {
            optional_skip(*optional).or_else(|| {
                let filter = TargetFilter::any().at(Position::Covered);
                one(
                    &board_candidates(ctx, &filter, None, LaneScope::Lane(*lane), &[]),
                    pick,
                )
                .map(|card_id| AiAction::FlipCard { card_id })
            })
        }
        ActionKind::SelectCardToReturn {
            filter,
            scope,
            optional,
        } => optional_skip(*optional).or_else(|| {
            one(&board_candidates(ctx, filter, source, *scope, &[]), pick)
                .map(|card_id| AiAction::ReturnCard { card_id })
        }),
        ActionKind::SelectCardToShift {
            filter,
            scope,
            optional,
            ..
        } => optional_skip(*optional).or_else(|| {
            one(&board_candidates(ctx, filter, source, *scope, &[]), pick)
                .map(|card_id| AiAction::ShiftCard { card_id })
        }),
        ActionKind::SelectCardToReveal { filter } => {
            one(&board_candidates(ctx, filter, source, LaneScope::Any, &[]), pick)
                .map(|card_id| AiAction::RevealCard { card_id })
        }

        // === Lanes ===
        ActionKind::SelectLaneForPlay {
            card_id,
            face_up,
            disallowed_lane,
        } => {
            let allowed = lanes_without(&[*disallowed_lane]);
            let legal: SmallVec<[usize; LANE_COUNT]> = match ctx.mine().hand_card(*card_id) {
                Some(card) => allowed
                    .iter()
                    .copied()
                    .filter(|l| {
                        ctx.rules
                            .can_play_card(ctx.state, ctx.me, *l, *face_up, &card.protocol)
                            .is_ok()
                    })
                    .collect(),
                None => SmallVec::new(),
            };
            let lanes = if legal.is_empty() { allowed } else { legal };
            one(&lanes, pick).map(|lane| AiAction::SelectLane { lane })
        }
        ActionKind::SelectLaneForShift {
            origin_lane,
            disallowed_lane,
            ..
        } => one(&lanes_without(&[Some(*origin_lane), *disallowed_lane]), pick)
            .map(|lane| AiAction::SelectLane { lane }),
        ActionKind::SelectLaneForMassShift { origin_lane, .. } => {
            one(&lanes_without(&[Some(*origin_lane)]), pick)
                .map(|lane| AiAction::SelectLane { lane })
        }
        ActionKind::SelectLaneForDeleteAll {
            disallowed_lane,
            optional,
            ..
        } => optional_skip(*optional).or_else(|| {
            one(&lanes_without(&[*disallowed_lane]), pick).map(|lane| AiAction::SelectLane { lane })
        }),
        ActionKind::SelectLaneForReturnAll { optional, .. } => {
            optional_skip(*optional).or_else(|| {
                one(&lanes_without(&[]), pick).map(|lane| AiAction::SelectLane { lane })
            })
        }
        ActionKind::SelectLaneForDeleteValueRange { .. } | ActionKind::SelectLaneForFlipAll { .. } => {
            one(&lanes_without(&[]), pick).map(|lane| AiAction::SelectLane { lane })
        }
        ActionKind::SelectLaneForDeckPlay { disallowed_lane } => {
            one(&lanes_without(&[*disallowed_lane]), pick).map(|lane| AiAction::SelectLane { lane })
        }
        ActionKind::SelectLaneToCompile { lanes } => {
            let eligible: SmallVec<[usize; LANE_COUNT]> =
                lanes.iter().copied().filter(|l| *l < LANE_COUNT).collect();
            one(&eligible, pick).map(|lane| AiAction::Compile { lane })
        }

        // === Prompts ===
        ActionKind::PromptOptionalEffect { effect } => Some(AiAction::ResolveOptionalEffectPrompt {
            accept: matches!(effect, OptionalEffect::Draw { .. }),
        }),
        ActionKind::PromptDrawThenDelete { .. } => {
            Some(AiAction::ResolveOptionalEffectPrompt { accept: false })
        }
        ActionKind::PromptDiscardOrDeleteSelf { count } => {
            Some(AiAction::ResolveDiscardOrDeletePrompt {
                discard: ctx.mine().hand.len() >= *count,
            })
        }
        ActionKind::PromptRevealedCardFollowUp { .. } => Some(AiAction::ResolveRevealedCardPrompt {
            choice: RevealFollowUp::Skip,
        }),

        // === Protocols ===
        ActionKind::PromptUseControlMechanic => Some(AiAction::ResolveControlMechanicPrompt {
            choice: ControlChoice::Skip,
        }),
        ActionKind::PromptRearrangeProtocols {
            target,
            must_change,
        } => {
            let perms = if *must_change {
                &PERMUTATIONS[1..]
            } else {
                &PERMUTATIONS[..1]
            };
            let perm = one(perms, pick)?;
            Some(AiAction::RearrangeProtocols {
                target: *target,
                order: Arrangement::current(ctx, *target).permuted(perm).protocols,
            })
        }
        ActionKind::PromptSwapProtocols { target } => {
            one(&SWAP_PAIRS, pick).map(|lanes| AiAction::ResolveSwapProtocols {
                target: *target,
                lanes,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::DifficultyProfile;
    use crate::cards::Card;
    use crate::core::{ScriptedRandom, Side};
    use crate::effects::OwnerFilter;
    use crate::rules::StandardRules;
    use crate::scenario::ScenarioBuilder;

    fn board() -> crate::core::GameState {
        ScenarioBuilder::new()
            .lane(Side::Player, 0, [Card::new(CardId(1), "Fire", 2)])
            .lane(Side::Player, 1, [Card::new(CardId(2), "Water", 5)])
            .lane(Side::Opponent, 2, [Card::new(CardId(3), "Speed", 6)])
            .hand(
                Side::Opponent,
                [Card::new(CardId(10), "Death", 4), Card::new(CardId(11), "Light", 1)],
            )
            .build()
    }

    #[test]
    fn test_board_candidates_prefer_opponent_high_values() {
        let state = board();
        let rules = StandardRules::default();
        let profile = DifficultyProfile::easy();
        let ctx = DecisionContext::new(&state, Side::Opponent, &profile, &rules);

        let ids = board_candidates(&ctx, &TargetFilter::any(), None, LaneScope::Any, &[]);
        assert_eq!(ids.as_slice(), &[CardId(2), CardId(1), CardId(3)]);

        let own = TargetFilter::any().owned_by(OwnerFilter::Own);
        let ids = board_candidates(&ctx, &own, None, LaneScope::Any, &[]);
        assert_eq!(ids.as_slice(), &[CardId(3)]);
    }

    #[test]
    fn test_deterministic_pick_takes_front() {
        let state = board();
        let rules = StandardRules::default();
        let profile = DifficultyProfile::easy().with_random_choice_probability(0.0);
        let ctx = DecisionContext::new(&state, Side::Opponent, &profile, &rules);

        let delete = ActionRequired::new(
            Side::Opponent,
            ActionKind::SelectCardsToDelete {
                count: 1,
                filter: TargetFilter::any(),
                disallowed_ids: SmallVec::new(),
                scope: LaneScope::Any,
            },
        );
        assert_eq!(
            resolve(&ctx, &delete, &mut ScriptedRandom::never()),
            Some(AiAction::DeleteCard { card_id: CardId(2) })
        );

        let discard = ActionRequired::new(Side::Opponent, ActionKind::Discard { count: 1 });
        assert_eq!(
            resolve(&ctx, &discard, &mut ScriptedRandom::never()),
            Some(AiAction::discard([CardId(11)]))
        );
    }

    #[test]
    fn test_random_pick_uses_index() {
        let state = board();
        let rules = StandardRules::default();
        let profile = DifficultyProfile::easy().with_random_choice_probability(1.0);
        let ctx = DecisionContext::new(&state, Side::Opponent, &profile, &rules);

        let delete = ActionRequired::new(
            Side::Opponent,
            ActionKind::SelectCardsToDelete {
                count: 1,
                filter: TargetFilter::any(),
                disallowed_ids: SmallVec::new(),
                scope: LaneScope::Any,
            },
        );
        let mut rng = ScriptedRandom::always().with_index(2);
        assert_eq!(
            resolve(&ctx, &delete, &mut rng),
            Some(AiAction::DeleteCard { card_id: CardId(3) })
        );
    }

    #[test]
    fn test_optional_effects_skipped_and_prompts_declined() {
        let state = board();
        let rules = StandardRules::default();
        let profile = DifficultyProfile::easy();
        let ctx = DecisionContext::new(&state, Side::Opponent, &profile, &rules);
        let mut rng = ScriptedRandom::never();

        let flip = ActionRequired::new(
            Side::Opponent,
            ActionKind::SelectCardToFlip {
                filter: TargetFilter::any(),
                scope: LaneScope::Any,
                optional: true,
            },
        );
        assert_eq!(resolve(&ctx, &flip, &mut rng), Some(AiAction::Skip));

        let give = ActionRequired::new(
            Side::Opponent,
            ActionKind::PromptOptionalEffect {
                effect: OptionalEffect::Give { count: 1 },
            },
        );
        assert_eq!(
            resolve(&ctx, &give, &mut rng),
            Some(AiAction::ResolveOptionalEffectPrompt { accept: false })
        );

        let draw = ActionRequired::new(
            Side::Opponent,
            ActionKind::PromptOptionalEffect {
                effect: OptionalEffect::Draw { count: 1 },
            },
        );
        assert_eq!(
            resolve(&ctx, &draw, &mut rng),
            Some(AiAction::ResolveOptionalEffectPrompt { accept: true })
        );
    }

    #[test]
    fn test_legal_plays_respect_constraints() {
        let state = board();
        let rules = StandardRules::default();
        let profile = DifficultyProfile::easy();
        let ctx = DecisionContext::new(&state, Side::Opponent, &profile, &rules);

        let plays = legal_plays(&ctx, Some(0), None, false);
        assert!(plays.iter().all(|p| p.lane() == Some(0)));
        // Death matches lane 0 face-up; Light only face-down there.
        assert_eq!(
            plays,
            vec![
                AiAction::PlayCard {
                    card_id: CardId(10),
                    lane: 0,
                    face_up: true
                },
                AiAction::PlayCard {
                    card_id: CardId(11),
                    lane: 0,
                    face_up: false
                },
            ]
        );

        let hidden = legal_plays(&ctx, None, Some(1), true);
        assert_eq!(hidden.len(), 4);
        assert!(hidden
            .iter()
            .all(|p| matches!(p, AiAction::PlayCard { face_up: false, lane, .. } if *lane != 1)));
    }

    #[test]
    fn test_rearrange_must_change() {
        let state = board();
        let rules = StandardRules::default();
        let profile = DifficultyProfile::easy();
        let ctx = DecisionContext::new(&state, Side::Opponent, &profile, &rules);
        let action = ActionRequired::new(
            Side::Opponent,
            ActionKind::PromptRearrangeProtocols {
                target: Side::Opponent,
                must_change: true,
            },
        );
        match resolve(&ctx, &action, &mut ScriptedRandom::never()) {
            Some(AiAction::RearrangeProtocols { order, .. }) => {
                assert_ne!(order, ctx.mine().protocols);
            }
            other => panic!("unexpected answer {other:?}"),
        }
    }
}
