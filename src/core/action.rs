//! AI output: the single intent returned per decision.
//!
//! `AiAction` is a closed set of intents the rules engine understands.
//! Each pending prompt expects one particular shape; `ResponseKind` names
//! those shapes so both sides can check the contract.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::entity::CardId;
use super::side::Side;

/// Follow-up choice after a card has been revealed on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevealFollowUp {
    Shift,
    Flip,
    Skip,
}

/// Answer to the control-mechanic prompt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlChoice {
    /// Keep control unused.
    Skip,
    /// Rearrange our own protocols.
    RearrangeOwn,
    /// Rearrange the other side's protocols.
    RearrangeOpponent,
}

/// An intent returned by the AI.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AiAction {
    /// Play a hand card into a lane.
    PlayCard {
        card_id: CardId,
        lane: usize,
        face_up: bool,
    },
    /// Refresh: draw back up to the hand limit.
    FillHand,
    /// Compile a lane.
    Compile { lane: usize },
    /// Pick a lane for a pending effect.
    SelectLane { lane: usize },
    FlipCard { card_id: CardId },
    DeleteCard { card_id: CardId },
    ReturnCard { card_id: CardId },
    ShiftCard { card_id: CardId },
    RevealCard { card_id: CardId },
    DiscardCards { card_ids: SmallVec<[CardId; 4]> },
    GiveCard { card_id: CardId },
    ResolveOptionalEffectPrompt { accept: bool },
    ResolveDiscardOrDeletePrompt { discard: bool },
    ResolveRevealedCardPrompt { choice: RevealFollowUp },
    ResolveControlMechanicPrompt { choice: ControlChoice },
    /// New protocol order, lane by lane.
    RearrangeProtocols { target: Side, order: [String; 3] },
    ResolveSwapProtocols { target: Side, lanes: [usize; 2] },
    /// Decline an optional decision.
    Skip,
}

/// Shape of an `AiAction`, without payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseKind {
    PlayCard,
    FillHand,
    Compile,
    SelectLane,
    FlipCard,
    DeleteCard,
    ReturnCard,
    ShiftCard,
    RevealCard,
    DiscardCards,
    GiveCard,
    ResolveOptionalEffectPrompt,
    ResolveDiscardOrDeletePrompt,
    ResolveRevealedCardPrompt,
    ResolveControlMechanicPrompt,
    RearrangeProtocols,
    ResolveSwapProtocols,
    Skip,
}

impl AiAction {
    /// Shape of this action.
    #[must_use]
    pub fn kind(&self) -> ResponseKind {
        match self {
            AiAction::PlayCard { .. } => ResponseKind::PlayCard,
            AiAction::FillHand => ResponseKind::FillHand,
            AiAction::Compile { .. } => ResponseKind::Compile,
            AiAction::SelectLane { .. } => ResponseKind::SelectLane,
            AiAction::FlipCard { .. } => ResponseKind::FlipCard,
            AiAction::DeleteCard { .. } => ResponseKind::DeleteCard,
            AiAction::ReturnCard { .. } => ResponseKind::ReturnCard,
            AiAction::ShiftCard { .. } => ResponseKind::ShiftCard,
            AiAction::RevealCard { .. } => ResponseKind::RevealCard,
            AiAction::DiscardCards { .. } => ResponseKind::DiscardCards,
            AiAction::GiveCard { .. } => ResponseKind::GiveCard,
            AiAction::ResolveOptionalEffectPrompt { .. } => {
                ResponseKind::ResolveOptionalEffectPrompt
            }
            AiAction::ResolveDiscardOrDeletePrompt { .. } => {
                ResponseKind::ResolveDiscardOrDeletePrompt
            }
            AiAction::ResolveRevealedCardPrompt { .. } => ResponseKind::ResolveRevealedCardPrompt,
            AiAction::ResolveControlMechanicPrompt { .. } => {
                ResponseKind::ResolveControlMechanicPrompt
            }
            AiAction::RearrangeProtocols { .. } => ResponseKind::RearrangeProtocols,
            AiAction::ResolveSwapProtocols { .. } => ResponseKind::ResolveSwapProtocols,
            AiAction::Skip => ResponseKind::Skip,
        }
    }

    /// The card this action targets, if it targets exactly one.
    #[must_use]
    pub fn target_card(&self) -> Option<CardId> {
        match self {
            AiAction::PlayCard { card_id, .. }
            | AiAction::FlipCard { card_id }
            | AiAction::DeleteCard { card_id }
            | AiAction::ReturnCard { card_id }
            | AiAction::ShiftCard { card_id }
            | AiAction::RevealCard { card_id }
            | AiAction::GiveCard { card_id } => Some(*card_id),
            _ => None,
        }
    }

    /// The lane this action names, if any.
    #[must_use]
    pub fn lane(&self) -> Option<usize> {
        match self {
            AiAction::PlayCard { lane, .. }
            | AiAction::Compile { lane }
            | AiAction::SelectLane { lane } => Some(*lane),
            _ => None,
        }
    }

    /// Build a discard intent.
    #[must_use]
    pub fn discard(card_ids: impl IntoIterator<Item = CardId>) -> Self {
        AiAction::DiscardCards {
            card_ids: card_ids.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        let play = AiAction::PlayCard {
            card_id: CardId(1),
            lane: 2,
            face_up: true,
        };
        assert_eq!(play.kind(), ResponseKind::PlayCard);
        assert_eq!(play.lane(), Some(2));
        assert_eq!(play.target_card(), Some(CardId(1)));

        assert_eq!(AiAction::Skip.kind(), ResponseKind::Skip);
        assert_eq!(AiAction::Skip.target_card(), None);
        assert_eq!(AiAction::FillHand.lane(), None);
    }

    #[test]
    fn test_discard_builder() {
        let action = AiAction::discard([CardId(3), CardId(4)]);
        match action {
            AiAction::DiscardCards { card_ids } => {
                assert_eq!(card_ids.as_slice(), &[CardId(3), CardId(4)]);
            }
            other => panic!("unexpected action {other:?}"),
        }
    }

    #[test]
    fn test_action_serialization() {
        let action = AiAction::ResolveOptionalEffectPrompt { accept: false };
        let json = serde_json::to_string(&action).unwrap();
        assert_eq!(json, r#"{"type":"resolve_optional_effect_prompt","accept":false}"#);

        let back: AiAction = serde_json::from_str(&json).unwrap();
        assert_eq!(back, action);
    }

    #[test]
    fn test_rearrange_serialization() {
        let action = AiAction::RearrangeProtocols {
            target: Side::Player,
            order: ["Fire".into(), "Water".into(), "Life".into()],
        };
        let json = serde_json::to_string(&action).unwrap();
        let back: AiAction = serde_json::from_str(&json).unwrap();
        assert_eq!(back, action);
    }
}
