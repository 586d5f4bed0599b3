//! Concrete decision scenarios.
//!
//! Each test builds a small board, asks the public entry points for a
//! decision and checks the exact answer.

use compile_ai::ai::{decide, Agent, Difficulty};
use compile_ai::cards::{Card, Keyword, Passive};
use compile_ai::core::{AiAction, CardId, ScriptedRandom, Side};
use compile_ai::effects::{
    ActionKind, ActionRequired, LaneScope, OptionalEffect, OwnerFilter, TargetFilter,
};
use compile_ai::scenario::ScenarioBuilder;
use smallvec::SmallVec;

const TIERS: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard];

// =============================================================================
// Move generator
// =============================================================================

/// Opponent at 9, AI at 4 with a 6 in hand: play it face-up to reach 10.
#[test]
fn test_compile_setup_play() {
    let state = ScenarioBuilder::new()
        .lane(
            Side::Player,
            0,
            [Card::new(CardId(1), "Fire", 3), Card::new(CardId(2), "Fire", 6)],
        )
        .lane(Side::Opponent, 0, [Card::new(CardId(3), "Death", 4)])
        .hand(Side::Opponent, [Card::new(CardId(10), "Death", 6)])
        .build();

    for difficulty in [Difficulty::Normal, Difficulty::Hard] {
        let answer = decide(difficulty, &state, None, &mut ScriptedRandom::never());
        assert_eq!(
            answer,
            AiAction::PlayCard {
                card_id: CardId(10),
                lane: 0,
                face_up: true
            },
            "{difficulty} should set up the compile"
        );
    }
}

/// Player at 11, AI at 6 holding only a 3 for that lane: the lane is lost,
/// so nothing is spent on it.
#[test]
fn test_hopeless_block_avoided() {
    let state = ScenarioBuilder::new()
        .lane(
            Side::Player,
            1,
            [Card::new(CardId(1), "Water", 5), Card::new(CardId(2), "Water", 6)],
        )
        .lane(Side::Opponent, 1, [Card::new(CardId(3), "Light", 6)])
        .hand(Side::Opponent, [Card::new(CardId(10), "Light", 3)])
        .build();

    for difficulty in [Difficulty::Normal, Difficulty::Hard] {
        let answer = decide(difficulty, &state, None, &mut ScriptedRandom::never());
        assert_ne!(answer.lane(), Some(1), "{difficulty} played into a lost lane");
    }
}

/// Same losing lane, but the 3 carries a passive that lowers the opposing
/// total by 3: playing it face-up leaves 9 against 8, which blocks.
#[test]
fn test_block_through_opposing_modifier() {
    let state = ScenarioBuilder::new()
        .lane(
            Side::Player,
            1,
            [Card::new(CardId(1), "Water", 5), Card::new(CardId(2), "Water", 6)],
        )
        .lane(Side::Opponent, 1, [Card::new(CardId(3), "Light", 6)])
        .hand(
            Side::Opponent,
            [
                Card::new(CardId(10), "Light", 3).with_passive(Passive::OpponentLaneModifier(-3)),
                Card::new(CardId(11), "Death", 5),
            ],
        )
        .build();

    for difficulty in [Difficulty::Normal, Difficulty::Hard] {
        for mut rng in [ScriptedRandom::never(), ScriptedRandom::always()] {
            let answer = decide(difficulty, &state, None, &mut rng);
            assert_eq!(
                answer,
                AiAction::PlayCard {
                    card_id: CardId(10),
                    lane: 1,
                    face_up: true
                },
                "{difficulty} missed the block"
            );
        }
    }
}

/// An empty hand only ever refills.
#[test]
fn test_empty_hand_refills() {
    let state = ScenarioBuilder::new()
        .lane_value(Side::Player, 0, 12)
        .build();

    for difficulty in TIERS {
        for seed in 0..8 {
            let mut agent = Agent::new(difficulty).with_seed(seed);
            assert_eq!(agent.decide(&state, None), AiAction::FillHand);
        }
    }
}

// =============================================================================
// Resolver
// =============================================================================

/// Deleting with an opponent filter takes the highest-value card.
#[test]
fn test_delete_highest_value() {
    let state = ScenarioBuilder::new()
        .lane(Side::Player, 0, [Card::new(CardId(1), "Fire", 2)])
        .lane(Side::Player, 2, [Card::new(CardId(2), "Life", 5)])
        .build();
    let prompt = ActionRequired::new(
        Side::Opponent,
        ActionKind::SelectCardsToDelete {
            count: 1,
            filter: TargetFilter::any().owned_by(OwnerFilter::Opponent),
            disallowed_ids: SmallVec::new(),
            scope: LaneScope::Any,
        },
    );

    for difficulty in [Difficulty::Normal, Difficulty::Hard] {
        let answer = decide(difficulty, &state, Some(&prompt), &mut ScriptedRandom::never());
        assert_eq!(answer, AiAction::DeleteCard { card_id: CardId(2) });
    }
}

/// Discarding two keeps the disruption card.
#[test]
fn test_discard_keeps_disruption() {
    let state = ScenarioBuilder::new()
        .hand(
            Side::Opponent,
            [
                Card::new(CardId(1), "Death", 0),
                Card::new(CardId(2), "Light", 5).with_keyword(Keyword::Delete),
                Card::new(CardId(3), "Speed", 1),
            ],
        )
        .build();
    let prompt = ActionRequired::new(Side::Opponent, ActionKind::Discard { count: 2 });

    for difficulty in [Difficulty::Normal, Difficulty::Hard] {
        let answer = decide(difficulty, &state, Some(&prompt), &mut ScriptedRandom::never());
        assert_eq!(answer, AiAction::discard([CardId(1), CardId(3)]));
    }
}

/// Giving cards away is always declined.
#[test]
fn test_give_declined() {
    let state = ScenarioBuilder::new()
        .hand(
            Side::Opponent,
            [Card::new(CardId(1), "Death", 0), Card::new(CardId(2), "Light", 1)],
        )
        .build();
    let prompt = ActionRequired::new(
        Side::Opponent,
        ActionKind::PromptOptionalEffect {
            effect: OptionalEffect::Give { count: 1 },
        },
    );

    for difficulty in TIERS {
        for seed in 0..8 {
            let mut agent = Agent::new(difficulty).with_seed(seed);
            assert_eq!(
                agent.decide(&state, Some(&prompt)),
                AiAction::ResolveOptionalEffectPrompt { accept: false }
            );
        }
    }
}
