//! Pending forced decisions.
//!
//! When a card effect needs input, the rules engine attaches an
//! `ActionRequired` to the state. Its `ActionKind` is a closed sum type with
//! one variant per decision family; every variant names the `AiAction`
//! shape it expects back.
//!
//! ## Families
//!
//! - Hand: discards, picking a hand card to play, give or reveal
//! - Board targets: delete, flip, return, shift, reveal one card
//! - Lanes: pick a lane for a play, shift, or lane-wide effect
//! - Prompts: accept/decline and multiple-choice follow-ups
//! - Protocols: control mechanic, rearrange, swap

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::targeting::{LaneScope, TargetFilter};
use crate::core::{AiAction, CardId, GameState, ResponseKind, Side, LANE_COUNT};
use crate::error::PromptError;

/// An optional effect offered through `PromptOptionalEffect`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum OptionalEffect {
    Draw { count: usize },
    Discard { count: usize },
    /// Give cards from hand to the other side.
    Give { count: usize },
    FlipSelf,
    ShiftSelf,
    ReturnSelf,
    Flip { filter: TargetFilter },
    Delete { filter: TargetFilter },
    Return { filter: TargetFilter },
    Shift { filter: TargetFilter },
    ShuffleDiscardIntoDeck,
    PlayFromHand,
}

/// Decision-specific parameters of a prompt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionKind {
    // === Hand ===

    /// Discard exactly `count` cards (or the whole hand if smaller).
    Discard { count: usize },

    /// Discard between zero and `max` cards.
    DiscardUpTo { max: usize },

    /// Discard up to `max` cards, then draw as many.
    DiscardForDraw { max: usize },

    /// Discard up to `max` cards; each one costs the other side a card.
    DiscardToPunish { max: usize },

    /// Choose which revealed opponent hand card they discard.
    SelectOpponentHandCardToDiscard { cards: SmallVec<[CardId; 8]> },

    SelectCardFromHandToPlay {
        /// Fixed destination lane, if the effect names one.
        #[serde(default)]
        lane: Option<usize>,
        #[serde(default)]
        disallowed_lane: Option<usize>,
        #[serde(default)]
        face_down: bool,
    },

    SelectCardFromHandToGive,

    SelectCardFromHandToReveal,

    // === Board targets ===

    /// Delete one card; `count` deletions remain in this effect.
    SelectCardsToDelete {
        count: usize,
        #[serde(default)]
        filter: TargetFilter,
        #[serde(default)]
        disallowed_ids: SmallVec<[CardId; 4]>,
        #[serde(default)]
        scope: LaneScope,
    },

    SelectCardToFlip {
        #[serde(default)]
        filter: TargetFilter,
        #[serde(default)]
        scope: LaneScope,
        #[serde(default)]
        optional: bool,
    },

    /// Flip a covered card in one lane.
    SelectCoveredCardToFlip {
        lane: usize,
        #[serde(default)]
        optional: bool,
    },

    SelectCardToReturn {
        #[serde(default)]
        filter: TargetFilter,
        #[serde(default)]
        scope: LaneScope,
        #[serde(default)]
        optional: bool,
    },

    SelectCardToShift {
        #[serde(default)]
        filter: TargetFilter,
        #[serde(default)]
        scope: LaneScope,
        #[serde(default)]
        optional: bool,
        /// Fixed destination lane, if the effect names one.
        #[serde(default)]
        destination: Option<usize>,
    },

    SelectCardToReveal {
        #[serde(default)]
        filter: TargetFilter,
    },

    // === Lanes ===

    /// Choose the lane a specific card is played into.
    SelectLaneForPlay {
        card_id: CardId,
        face_up: bool,
        #[serde(default)]
        disallowed_lane: Option<usize>,
    },

    /// Choose the destination of a card being shifted.
    SelectLaneForShift {
        card_id: CardId,
        origin_lane: usize,
        #[serde(default)]
        disallowed_lane: Option<usize>,
    },

    /// Move every matching card of `origin_lane` to the chosen lane.
    SelectLaneForMassShift {
        origin_lane: usize,
        #[serde(default)]
        filter: TargetFilter,
    },

    /// Delete every matching card in the chosen lane.
    SelectLaneForDeleteAll {
        #[serde(default)]
        filter: TargetFilter,
        #[serde(default)]
        disallowed_lane: Option<usize>,
        #[serde(default)]
        optional: bool,
    },

    /// Delete every face-up card valued `min..=max` in the chosen lane.
    SelectLaneForDeleteValueRange { min: i32, max: i32 },

    /// Return every matching card in the chosen lane to its owner's hand.
    SelectLaneForReturnAll {
        #[serde(default)]
        filter: TargetFilter,
        #[serde(default)]
        optional: bool,
    },

    /// Flip every matching card in the chosen lane.
    SelectLaneForFlipAll {
        #[serde(default)]
        filter: TargetFilter,
    },

    /// Play the top card of the deck face-down into the chosen lane.
    SelectLaneForDeckPlay {
        #[serde(default)]
        disallowed_lane: Option<usize>,
    },

    SelectLaneToCompile { lanes: SmallVec<[usize; LANE_COUNT]> },

    // === Prompts ===

    PromptOptionalEffect { effect: OptionalEffect },

    /// Draw cards, then delete a card matching the filter.
    PromptDrawThenDelete {
        draw: usize,
        #[serde(default)]
        filter: TargetFilter,
    },

    /// Discard `count` cards, or delete the source card instead.
    PromptDiscardOrDeleteSelf { count: usize },

    /// A revealed board card may be shifted or flipped.
    PromptRevealedCardFollowUp { card_id: CardId },

    // === Protocols ===

    PromptUseControlMechanic,

    PromptRearrangeProtocols {
        target: Side,
        /// The new order must differ from the current one.
        #[serde(default)]
        must_change: bool,
    },

    PromptSwapProtocols { target: Side },
}

impl ActionKind {
    /// The `AiAction` shape this decision expects.
    #[must_use]
    pub fn expected_response(&self) -> ResponseKind {
        use ActionKind::*;
        match self {
            Discard { .. }
            | DiscardUpTo { .. }
            | DiscardForDraw { .. }
            | DiscardToPunish { .. }
            | SelectOpponentHandCardToDiscard { .. } => ResponseKind::DiscardCards,
            SelectCardFromHandToPlay { .. } => ResponseKind::PlayCard,
            SelectCardFromHandToGive => ResponseKind::GiveCard,
            SelectCardFromHandToReveal | SelectCardToReveal { .. } => ResponseKind::RevealCard,
            SelectCardsToDelete { .. } => ResponseKind::DeleteCard,
            SelectCardToFlip { .. } | SelectCoveredCardToFlip { .. } => ResponseKind::FlipCard,
            SelectCardToReturn { .. } => ResponseKind::ReturnCard,
            SelectCardToShift { .. } => ResponseKind::ShiftCard,
            SelectLaneForPlay { .. }
            | SelectLaneForShift { .. }
            | SelectLaneForMassShift { .. }
            | SelectLaneForDeleteAll { .. }
            | SelectLaneForDeleteValueRange { .. }
            | SelectLaneForReturnAll { .. }
            | SelectLaneForFlipAll { .. }
            | SelectLaneForDeckPlay { .. } => ResponseKind::SelectLane,
            SelectLaneToCompile { .. } => ResponseKind::Compile,
            PromptOptionalEffect { .. } | PromptDrawThenDelete { .. } => {
                ResponseKind::ResolveOptionalEffectPrompt
            }
            PromptDiscardOrDeleteSelf { .. } => ResponseKind::ResolveDiscardOrDeletePrompt,
            PromptRevealedCardFollowUp { .. } => ResponseKind::ResolveRevealedCardPrompt,
            PromptUseControlMechanic => ResponseKind::ResolveControlMechanicPrompt,
            PromptRearrangeProtocols { .. } => ResponseKind::RearrangeProtocols,
            PromptSwapProtocols { .. } => ResponseKind::ResolveSwapProtocols,
        }
    }

    /// Whether `AiAction::Skip` is an acceptable answer.
    #[must_use]
    pub fn allows_skip(&self) -> bool {
        use ActionKind::*;
        match self {
            DiscardUpTo { .. } | DiscardForDraw { .. } | DiscardToPunish { .. } => true,
            SelectCardToFlip { optional, .. }
            | SelectCoveredCardToFlip { optional, .. }
            | SelectCardToReturn { optional, .. }
            | SelectCardToShift { optional, .. }
            | SelectLaneForDeleteAll { optional, .. }
            | SelectLaneForReturnAll { optional, .. } => *optional,
            _ => false,
        }
    }

    /// Short name for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        use ActionKind::*;
        match self {
            Discard { .. } => "discard",
            DiscardUpTo { .. } => "discard_up_to",
            DiscardForDraw { .. } => "discard_for_draw",
            DiscardToPunish { .. } => "discard_to_punish",
            SelectOpponentHandCardToDiscard { .. } => "select_opponent_hand_card_to_discard",
            SelectCardFromHandToPlay { .. } => "select_card_from_hand_to_play",
            SelectCardFromHandToGive => "select_card_from_hand_to_give",
            SelectCardFromHandToReveal => "select_card_from_hand_to_reveal",
            SelectCardsToDelete { .. } => "select_cards_to_delete",
            SelectCardToFlip { .. } => "select_card_to_flip",
            SelectCoveredCardToFlip { .. } => "select_covered_card_to_flip",
            SelectCardToReturn { .. } => "select_card_to_return",
            SelectCardToShift { .. } => "select_card_to_shift",
            SelectCardToReveal { .. } => "select_card_to_reveal",
            SelectLaneForPlay { .. } => "select_lane_for_play",
            SelectLaneForShift { .. } => "select_lane_for_shift",
            SelectLaneForMassShift { .. } => "select_lane_for_mass_shift",
            SelectLaneForDeleteAll { .. } => "select_lane_for_delete_all",
            SelectLaneForDeleteValueRange { .. } => "select_lane_for_delete_value_range",
            SelectLaneForReturnAll { .. } => "select_lane_for_return_all",
            SelectLaneForFlipAll { .. } => "select_lane_for_flip_all",
            SelectLaneForDeckPlay { .. } => "select_lane_for_deck_play",
            SelectLaneToCompile { .. } => "select_lane_to_compile",
            PromptOptionalEffect { .. } => "prompt_optional_effect",
            PromptDrawThenDelete { .. } => "prompt_draw_then_delete",
            PromptDiscardOrDeleteSelf { .. } => "prompt_discard_or_delete_self",
            PromptRevealedCardFollowUp { .. } => "prompt_revealed_card_follow_up",
            PromptUseControlMechanic => "prompt_use_control_mechanic",
            PromptRearrangeProtocols { .. } => "prompt_rearrange_protocols",
            PromptSwapProtocols { .. } => "prompt_swap_protocols",
        }
    }
}

/// A pending decision for one side.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRequired {
    /// Side that must answer.
    pub actor: Side,

    /// Card whose effect raised the prompt.
    #[serde(default)]
    pub source_card_id: Option<CardId>,

    #[serde(flatten)]
    pub kind: ActionKind,
}

impl ActionRequired {
    #[must_use]
    pub fn new(actor: Side, kind: ActionKind) -> Self {
        Self {
            actor,
            source_card_id: None,
            kind,
        }
    }

    /// Set the source card (builder pattern).
    #[must_use]
    pub fn with_source(mut self, source: CardId) -> Self {
        self.source_card_id = Some(source);
        self
    }

    #[must_use]
    pub fn expected_response(&self) -> ResponseKind {
        self.kind.expected_response()
    }

    #[must_use]
    pub fn allows_skip(&self) -> bool {
        self.kind.allows_skip()
    }

    /// Whether `action` has an acceptable shape for this prompt.
    #[must_use]
    pub fn accepts(&self, action: &AiAction) -> bool {
        let kind = action.kind();
        kind == self.expected_response() || (kind == ResponseKind::Skip && self.allows_skip())
    }

    /// Check the prompt's parameters against the snapshot.
    pub fn validate(&self, state: &GameState) -> Result<(), PromptError> {
        use ActionKind::*;

        let lane = |lane: usize| {
            if lane < LANE_COUNT {
                Ok(())
            } else {
                Err(PromptError::LaneOutOfRange(lane))
            }
        };
        let maybe_lane = |l: Option<usize>| l.map_or(Ok(()), lane);
        let scope = |s: &LaneScope| match s {
            LaneScope::Lane(l) => lane(*l),
            _ => Ok(()),
        };
        let on_board = |id: CardId| {
            state
                .locate(id)
                .map(|_| ())
                .ok_or(PromptError::NotOnBoard(id))
        };
        let positive = |n: usize, what: &'static str| {
            if n > 0 {
                Ok(())
            } else {
                Err(PromptError::ZeroCount(what))
            }
        };

        match &self.kind {
            Discard { count } => positive(*count, "discard"),
            DiscardUpTo { max } | DiscardForDraw { max } | DiscardToPunish { max } => {
                positive(*max, "discard")
            }
            SelectOpponentHandCardToDiscard { cards } => {
                if cards.is_empty() {
                    return Err(PromptError::NoCards);
                }
                let hand = &state.side(self.actor.opposite()).hand;
                match cards.iter().find(|id| !hand.iter().any(|c| c.id == **id)) {
                    Some(id) => Err(PromptError::NotInHand(*id)),
                    None => Ok(()),
                }
            }
            SelectCardFromHandToPlay {
                lane: fixed,
                disallowed_lane,
                ..
            } => {
                maybe_lane(*fixed)?;
                maybe_lane(*disallowed_lane)
            }
            SelectCardFromHandToGive | SelectCardFromHandToReveal => Ok(()),
            SelectCardsToDelete { count, scope: s, .. } => {
                positive(*count, "delete")?;
                scope(s)
            }
            SelectCardToFlip { scope: s, .. } | SelectCardToReturn { scope: s, .. } => scope(s),
            SelectCoveredCardToFlip { lane: l, .. } => lane(*l),
            SelectCardToShift {
                scope: s,
                destination,
                ..
            } => {
                scope(s)?;
                maybe_lane(*destination)
            }
            SelectCardToReveal { .. } => Ok(()),
            SelectLaneForPlay {
                card_id,
                disallowed_lane,
                ..
            } => {
                maybe_lane(*disallowed_lane)?;
                let in_hand = state.side(self.actor).hand_card(*card_id).is_some();
                if in_hand || state.locate(*card_id).is_some() {
                    Ok(())
                } else {
                    Err(PromptError::NotInHand(*card_id))
                }
            }
            SelectLaneForShift {
                card_id,
                origin_lane,
                disallowed_lane,
            } => {
                lane(*origin_lane)?;
                maybe_lane(*disallowed_lane)?;
                on_board(*card_id)
            }
            SelectLaneForMassShift { origin_lane, .. } => lane(*origin_lane),
            SelectLaneForDeleteAll {
                disallowed_lane, ..
            }
            | SelectLaneForDeckPlay { disallowed_lane } => maybe_lane(*disallowed_lane),
            SelectLaneForDeleteValueRange { min, max } => {
                if min <= max {
                    Ok(())
                } else {
                    Err(PromptError::EmptyRange {
                        min: *min,
                        max: *max,
                    })
                }
            }
            SelectLaneForReturnAll { .. } | SelectLaneForFlipAll { .. } => Ok(()),
            SelectLaneToCompile { lanes } => {
                if lanes.is_empty() {
                    return Err(PromptError::NoLanes);
                }
                lanes.iter().try_for_each(|l| lane(*l))
            }
            PromptOptionalEffect { .. } | PromptDrawThenDelete { .. } => Ok(()),
            PromptDiscardOrDeleteSelf { count } => positive(*count, "discard"),
            PromptRevealedCardFollowUp { card_id } => on_board(*card_id),
            PromptUseControlMechanic
            | PromptRearrangeProtocols { .. }
            | PromptSwapProtocols { .. } => Ok(()),
        }
    }
}
