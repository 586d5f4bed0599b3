//! Rules capabilities the decision core consults.
//!
//! The rules engine owns the rules. The AI only asks it a few questions:
//! what a card is worth where it sits, what a lane totals, whether a play
//! is allowed, and where a card is. Engines implement `RulesOracle`;
//! `StandardRules` answers from card passives and a `RulesConfig`.
//!
//! ## Implementation Notes
//!
//! - Lanes are passed explicitly so callers can ask about hypothetical
//!   stacks (a card added, removed or flipped) without building a state.
//! - Passives apply only while their card is face-up; lane blocks also
//!   require the blocking card to be uncovered.

use crate::cards::{Card, Passive};
use crate::core::{BoardCard, CardId, GameState, Lane, RulesConfig, Side, LANE_COUNT};
use crate::error::PlayBlock;

/// Read-only rules queries.
pub trait RulesOracle: Send + Sync {
    /// Rule constants.
    fn config(&self) -> &RulesConfig;

    /// Value of a face-down card in `lane`.
    ///
    /// The highest `FaceDownValue` passive among face-up cards in the lane
    /// wins; otherwise the configured base value.
    fn face_down_value(&self, lane: &Lane) -> i32 {
        lane.iter()
            .flat_map(Card::active_passives)
            .filter_map(|p| match p {
                Passive::FaceDownValue(n) => Some(*n),
                _ => None,
            })
            .max()
            .unwrap_or(self.config().face_down_value)
    }

    /// Effective value of `card` as part of `lane`.
    fn effective_value(&self, lane: &Lane, card: &Card) -> i32 {
        if card.face_up {
            card.value
        } else {
            self.face_down_value(lane)
        }
    }

    /// Total of `lane`, owned by `side` at `lane_index`, including lane
    /// modifiers from both sides. Never negative.
    fn lane_value(&self, state: &GameState, side: Side, lane_index: usize, lane: &Lane) -> i32 {
        let base: i32 = lane.iter().map(|c| self.effective_value(lane, c)).sum();

        let own: i32 = lane
            .iter()
            .flat_map(Card::active_passives)
            .filter_map(|p| match p {
                Passive::OwnLaneModifier(n) => Some(*n),
                _ => None,
            })
            .sum();

        let opposing: i32 = state
            .side(side.opposite())
            .lanes
            .get(lane_index)
            .into_iter()
            .flat_map(|l| l.iter())
            .flat_map(Card::active_passives)
            .filter_map(|p| match p {
                Passive::OpponentLaneModifier(n) => Some(*n),
                _ => None,
            })
            .sum();

        (base + own + opposing).max(0)
    }

    /// Whether `side` may play a `protocol` card into `lane`.
    fn can_play_card(
        &self,
        state: &GameState,
        side: Side,
        lane: usize,
        face_up: bool,
        protocol: &str,
    ) -> Result<(), PlayBlock> {
        if lane >= LANE_COUNT {
            return Err(PlayBlock::LaneOutOfRange(lane));
        }

        let me = state.side(side);
        let them = state.side(side.opposite());

        if let Some(top) = them.uncovered(lane) {
            if top.has_active_passive(|p| matches!(p, Passive::BlockOpponentPlayInLane)) {
                return Err(PlayBlock::LaneBlocked(lane));
            }
            if !face_up
                && top.has_active_passive(|p| matches!(p, Passive::BlockOpponentFaceDownInLane))
            {
                return Err(PlayBlock::FaceDownBlocked(lane));
            }
        }

        if !face_up {
            return Ok(());
        }

        let forced_down = state
            .board_cards(side.opposite())
            .any(|bc| bc.card.has_active_passive(|p| matches!(p, Passive::ForceOpponentFaceDown)));
        if forced_down {
            return Err(PlayBlock::FaceUpForbidden);
        }

        let matches_protocol = me.protocols[lane] == protocol || them.protocols[lane] == protocol;
        let any_protocol = state
            .board_cards(side)
            .any(|bc| bc.card.has_active_passive(|p| matches!(p, Passive::PlayAnyProtocol)));

        if matches_protocol || any_protocol {
            Ok(())
        } else {
            Err(PlayBlock::ProtocolMismatch(lane))
        }
    }

    /// Locate a card on the board.
    fn find_card_on_board<'s>(&self, state: &'s GameState, id: CardId) -> Option<BoardCard<'s>> {
        state.locate(id)
    }
}

/// Oracle driven entirely by card passives.
#[derive(Clone, Debug, Default)]
pub struct StandardRules {
    config: RulesConfig,
}

impl StandardRules {
    #[must_use]
    pub fn new(config: RulesConfig) -> Self {
        Self { config }
    }
}

impl RulesOracle for StandardRules {
    fn config(&self) -> &RulesConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> GameState {
        GameState::new(
            ["Fire", "Water", "Life"].map(String::from),
            ["Death", "Light", "Speed"].map(String::from),
        )
    }

    #[test]
    fn test_face_down_value_boost() {
        let rules = StandardRules::default();
        let mut lane = Lane::new();
        lane.push_back(Card::new(CardId(1), "Fire", 5).face_down());
        assert_eq!(rules.lane_value(&state(), Side::Player, 0, &lane), 2);

        lane.push_back(Card::new(CardId(2), "Darkness", 2).with_passive(Passive::FaceDownValue(4)));
        assert_eq!(rules.face_down_value(&lane), 4);
        assert_eq!(rules.lane_value(&state(), Side::Player, 0, &lane), 6);

        // Inactive while the booster is face-down.
        let flipped: Lane = lane.iter().map(|c| c.oriented(false)).collect();
        assert_eq!(rules.lane_value(&state(), Side::Player, 0, &flipped), 4);
    }

    #[test]
    fn test_lane_modifiers() {
        let rules = StandardRules::default();
        let mut state = state();
        state.side_mut(Side::Opponent).lanes[1]
            .push_back(Card::new(CardId(9), "Light", 1).with_passive(Passive::OpponentLaneModifier(-3)));

        let mut lane = Lane::new();
        lane.push_back(Card::new(CardId(1), "Water", 2));
        assert_eq!(rules.lane_value(&state, Side::Player, 1, &lane), 0);

        lane.push_back(Card::new(CardId(2), "Water", 4).with_passive(Passive::OwnLaneModifier(1)));
        assert_eq!(rules.lane_value(&state, Side::Player, 1, &lane), 4);
        assert_eq!(rules.lane_value(&state, Side::Player, 0, &lane), 7);
    }

    #[test]
    fn test_protocol_match() {
        let rules = StandardRules::default();
        let state = state();
        assert_eq!(rules.can_play_card(&state, Side::Player, 0, true, "Fire"), Ok(()));
        assert_eq!(rules.can_play_card(&state, Side::Player, 0, true, "Death"), Ok(()));
        assert_eq!(
            rules.can_play_card(&state, Side::Player, 0, true, "Speed"),
            Err(PlayBlock::ProtocolMismatch(0))
        );
        assert_eq!(rules.can_play_card(&state, Side::Player, 0, false, "Speed"), Ok(()));
        assert_eq!(
            rules.can_play_card(&state, Side::Player, 3, false, "Speed"),
            Err(PlayBlock::LaneOutOfRange(3))
        );
    }

    #[test]
    fn test_play_any_protocol() {
        let rules = StandardRules::default();
        let mut state = state();
        state.side_mut(Side::Player).lanes[2]
            .push_back(Card::new(CardId(3), "Spirit", 1).with_passive(Passive::PlayAnyProtocol));
        assert_eq!(rules.can_play_card(&state, Side::Player, 0, true, "Speed"), Ok(()));
        assert!(rules.can_play_card(&state, Side::Opponent, 0, true, "Water").is_err());
    }

    #[test]
    fn test_lane_blocks_require_uncovered() {
        let rules = StandardRules::default();
        let mut state = state();
        state.side_mut(Side::Opponent).lanes[0]
            .push_back(Card::new(CardId(4), "Plague", 0).with_passive(Passive::BlockOpponentPlayInLane));
        assert_eq!(
            rules.can_play_card(&state, Side::Player, 0, false, "Fire"),
            Err(PlayBlock::LaneBlocked(0))
        );

        state.side_mut(Side::Opponent).lanes[0].push_back(Card::new(CardId(5), "Death", 2));
        assert_eq!(rules.can_play_card(&state, Side::Player, 0, false, "Fire"), Ok(()));
    }

    #[test]
    fn test_face_down_restrictions() {
        let rules = StandardRules::default();
        let mut state = state();
        state.side_mut(Side::Opponent).lanes[1].push_back(
            Card::new(CardId(6), "Light", 3).with_passive(Passive::BlockOpponentFaceDownInLane),
        );
        assert_eq!(
            rules.can_play_card(&state, Side::Player, 1, false, "Water"),
            Err(PlayBlock::FaceDownBlocked(1))
        );
        assert_eq!(rules.can_play_card(&state, Side::Player, 1, true, "Water"), Ok(()));

        state.side_mut(Side::Opponent).lanes[2]
            .push_back(Card::new(CardId(7), "Psychic", 1).with_passive(Passive::ForceOpponentFaceDown));
        assert_eq!(
            rules.can_play_card(&state, Side::Player, 0, true, "Fire"),
            Err(PlayBlock::FaceUpForbidden)
        );
    }
}
