//! Game state snapshot.
//!
//! The rules engine owns the state; the AI receives a read-only snapshot
//! per decision. Card stacks use `im::Vector` so hypothetical lanes (a card
//! pushed, removed or flipped) are cheap structural-sharing clones.
//!
//! ## Layout
//!
//! - `GameState`: both sides, phase, turn, pending prompt, control holder
//! - `SideState`: three lanes, hand, deck, discard, protocols, compiled flags
//! - Lanes are ordered bottom to top; the last card is uncovered.

use im::Vector;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::config::LANE_COUNT;
use super::entity::CardId;
use super::side::{Side, SideMap};
use crate::cards::Card;
use crate::effects::ActionRequired;

/// A stack of cards in one lane for one side.
pub type Lane = Vector<Card>;

/// Turn phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Start,
    Control,
    Compile,
    #[default]
    Action,
    HandLimit,
    End,
}

/// A card located on the board.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoardCard<'a> {
    pub card: &'a Card,
    pub owner: Side,
    pub lane: usize,
    /// Position in the stack (0 = bottom).
    pub index: usize,
    pub uncovered: bool,
}

impl BoardCard<'_> {
    #[must_use]
    pub fn id(&self) -> CardId {
        self.card.id
    }
}

/// One side of the table.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SideState {
    pub lanes: [Lane; LANE_COUNT],
    pub hand: Vector<Card>,
    pub deck: Vector<Card>,
    pub discard: Vector<Card>,
    /// Protocol assigned to each lane.
    pub protocols: [String; LANE_COUNT],
    /// Compiled flag per lane; travels with the protocol on rearrange.
    pub compiled: [bool; LANE_COUNT],
    /// Lane totals as computed by the rules engine.
    pub lane_values: [i32; LANE_COUNT],
}

impl SideState {
    /// Create an empty side with the given protocols.
    #[must_use]
    pub fn new(protocols: [String; LANE_COUNT]) -> Self {
        Self {
            protocols,
            ..Self::default()
        }
    }

    /// The uncovered card of a lane.
    #[must_use]
    pub fn uncovered(&self, lane: usize) -> Option<&Card> {
        self.lanes.get(lane).and_then(|stack| stack.last())
    }

    /// Look up a card in hand.
    #[must_use]
    pub fn hand_card(&self, id: CardId) -> Option<&Card> {
        self.hand.iter().find(|c| c.id == id)
    }

    /// Number of cards on the board for this side.
    #[must_use]
    pub fn board_card_count(&self) -> usize {
        self.lanes.iter().map(Vector::len).sum()
    }

    /// Number of compiled protocols.
    #[must_use]
    pub fn compiled_count(&self) -> usize {
        self.compiled.iter().filter(|c| **c).count()
    }

    /// Sum of all lane values.
    #[must_use]
    pub fn total_value(&self) -> i32 {
        self.lane_values.iter().sum()
    }
}

/// Complete snapshot handed to the AI.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub sides: SideMap<SideState>,

    pub phase: Phase,

    /// Side whose turn it is.
    pub turn: Side,

    /// Turn number (starts at 1).
    pub turn_number: u32,

    /// Lanes the active side may compile this phase.
    #[serde(default)]
    pub compilable_lanes: SmallVec<[usize; LANE_COUNT]>,

    /// Pending forced decision, if any.
    #[serde(default)]
    pub action_required: Option<ActionRequired>,

    /// Side currently holding the control component.
    #[serde(default)]
    pub control_holder: Option<Side>,

    /// Whether the control mechanic is in play this game.
    #[serde(default)]
    pub use_control_mechanic: bool,
}

impl GameState {
    /// Create a state with empty boards.
    #[must_use]
    pub fn new(player: [String; LANE_COUNT], opponent: [String; LANE_COUNT]) -> Self {
        Self {
            sides: SideMap::from_parts(SideState::new(player), SideState::new(opponent)),
            phase: Phase::Action,
            turn: Side::Opponent,
            turn_number: 1,
            compilable_lanes: SmallVec::new(),
            action_required: None,
            control_holder: None,
            use_control_mechanic: false,
        }
    }

    #[must_use]
    pub fn side(&self, side: Side) -> &SideState {
        &self.sides[side]
    }

    pub fn side_mut(&mut self, side: Side) -> &mut SideState {
        &mut self.sides[side]
    }

    /// Every card on one side's board, bottom to top per lane.
    pub fn board_cards(&self, owner: Side) -> impl Iterator<Item = BoardCard<'_>> + '_ {
        self.sides[owner]
            .lanes
            .iter()
            .enumerate()
            .flat_map(move |(lane, stack)| {
                let len = stack.len();
                stack.iter().enumerate().map(move |(index, card)| BoardCard {
                    card,
                    owner,
                    lane,
                    index,
                    uncovered: index + 1 == len,
                })
            })
    }

    /// Every card on the board, player side first.
    pub fn all_board_cards(&self) -> impl Iterator<Item = BoardCard<'_>> + '_ {
        Side::BOTH
            .into_iter()
            .flat_map(move |side| self.board_cards(side))
    }

    /// Locate a card on the board.
    #[must_use]
    pub fn locate(&self, id: CardId) -> Option<BoardCard<'_>> {
        self.all_board_cards().find(|bc| bc.card.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn protocols(names: [&str; 3]) -> [String; 3] {
        names.map(String::from)
    }

    fn sample_state() -> GameState {
        let mut state = GameState::new(
            protocols(["Fire", "Water", "Life"]),
            protocols(["Death", "Light", "Speed"]),
        );
        let me = state.side_mut(Side::Opponent);
        me.lanes[0].push_back(Card::new(CardId(1), "Death", 1));
        me.lanes[0].push_back(Card::new(CardId(2), "Death", 3));
        me.lanes[2].push_back(Card::new(CardId(3), "Speed", 2).face_down());
        state
            .side_mut(Side::Player)
            .hand
            .push_back(Card::new(CardId(10), "Fire", 4));
        state
    }

    #[test]
    fn test_uncovered() {
        let state = sample_state();
        let side = state.side(Side::Opponent);
        assert_eq!(side.uncovered(0).map(|c| c.id), Some(CardId(2)));
        assert_eq!(side.uncovered(1), None);
        assert_eq!(side.uncovered(5), None);
    }

    #[test]
    fn test_board_cards_positions() {
        let state = sample_state();
        let cards: Vec<_> = state.board_cards(Side::Opponent).collect();
        assert_eq!(cards.len(), 3);
        assert_eq!(cards[0].id(), CardId(1));
        assert!(!cards[0].uncovered);
        assert!(cards[1].uncovered);
        assert_eq!(cards[2].lane, 2);
        assert!(cards[2].uncovered);
        assert!(cards.iter().all(|c| c.owner == Side::Opponent));
    }

    #[test]
    fn test_locate() {
        let state = sample_state();
        let found = state.locate(CardId(3)).unwrap();
        assert_eq!(found.owner, Side::Opponent);
        assert_eq!(found.lane, 2);
        assert!(state.locate(CardId(10)).is_none());
        assert!(state.side(Side::Player).hand_card(CardId(10)).is_some());
    }

    #[test]
    fn test_counts() {
        let mut state = sample_state();
        state.side_mut(Side::Opponent).compiled[1] = true;
        let side = state.side(Side::Opponent);
        assert_eq!(side.board_card_count(), 3);
        assert_eq!(side.compiled_count(), 1);
    }

    #[test]
    fn test_state_serialization() {
        let state = sample_state();
        let json = serde_json::to_string(&state).unwrap();
        let back: GameState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}
