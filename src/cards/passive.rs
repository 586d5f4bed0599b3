//! Declarative passive abilities.
//!
//! Instead of matching on protocol names, rules that depend on a card's
//! static text are expressed as passives attached to the card. The rules
//! oracle and the AI read them through generic predicates.

use serde::{Deserialize, Serialize};

/// A static ability in force while its card is face-up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "amount", rename_all = "snake_case")]
pub enum Passive {
    /// The other side cannot play cards into this lane.
    BlockOpponentPlayInLane,
    /// The other side cannot play face-down cards into this lane.
    BlockOpponentFaceDownInLane,
    /// The other side may only play face-down cards.
    ForceOpponentFaceDown,
    /// The owner may play face-up cards into any lane.
    PlayAnyProtocol,
    /// The owner's face-down cards in this lane are worth this much.
    FaceDownValue(i32),
    /// Shifts the owner's total in this lane.
    OwnLaneModifier(i32),
    /// Shifts the other side's total in this lane.
    OpponentLaneModifier(i32),
    /// The card deletes itself when covered.
    DeleteSelfOnCover,
    /// The card returns to hand when covered.
    ReturnSelfOnCover,
}

impl Passive {
    /// Lane blocks only apply while the card is uncovered.
    #[must_use]
    pub const fn requires_uncovered(self) -> bool {
        matches!(
            self,
            Passive::BlockOpponentPlayInLane | Passive::BlockOpponentFaceDownInLane
        )
    }

    /// Restricts where or how the other side may play.
    #[must_use]
    pub const fn restricts_opponent(self) -> bool {
        matches!(
            self,
            Passive::BlockOpponentPlayInLane
                | Passive::BlockOpponentFaceDownInLane
                | Passive::ForceOpponentFaceDown
                | Passive::OpponentLaneModifier(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_uncovered() {
        assert!(Passive::BlockOpponentPlayInLane.requires_uncovered());
        assert!(!Passive::FaceDownValue(4).requires_uncovered());
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&Passive::FaceDownValue(4)).unwrap();
        assert_eq!(json, r#"{"kind":"face_down_value","amount":4}"#);
        let back: Passive = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Passive::FaceDownValue(4));
    }
}
