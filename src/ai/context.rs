//! Per-decision view of the board.
//!
//! `DecisionContext` bundles the snapshot, the deciding side, the active
//! profile and the rules oracle. Lane totals come from the snapshot;
//! hypothetical totals add the oracle's delta between the real stack and
//! a modified copy, so engine-side modifiers the oracle cannot see are
//! preserved.

use smallvec::SmallVec;

use super::profile::DifficultyProfile;
use crate::cards::Card;
use crate::core::{BoardCard, CardId, GameState, Lane, RulesConfig, Side, SideState, LANE_COUNT};
use crate::rules::RulesOracle;

/// Everything a scorer may read.
#[derive(Clone, Copy)]
pub struct DecisionContext<'a> {
    pub state: &'a GameState,
    /// Side making the decision.
    pub me: Side,
    pub profile: &'a DifficultyProfile,
    pub rules: &'a dyn RulesOracle,
}

impl<'a> DecisionContext<'a> {
    #[must_use]
    pub fn new(
        state: &'a GameState,
        me: Side,
        profile: &'a DifficultyProfile,
        rules: &'a dyn RulesOracle,
    ) -> Self {
        Self {
            state,
            me,
            profile,
            rules,
        }
    }

    #[must_use]
    pub fn opp(&self) -> Side {
        self.me.opposite()
    }

    #[must_use]
    pub fn side(&self, side: Side) -> &'a SideState {
        self.state.side(side)
    }

    #[must_use]
    pub fn mine(&self) -> &'a SideState {
        self.side(self.me)
    }

    #[must_use]
    pub fn theirs(&self) -> &'a SideState {
        self.side(self.opp())
    }

    #[must_use]
    pub fn config(&self) -> &'a RulesConfig {
        self.rules.config()
    }

    #[must_use]
    pub fn threshold(&self) -> i32 {
        self.config().compile_threshold
    }

    #[must_use]
    pub fn hand_limit(&self) -> usize {
        self.config().hand_limit
    }

    // === Lane values ===

    /// Snapshot total of one lane.
    #[must_use]
    pub fn lane_value(&self, side: Side, lane: usize) -> i32 {
        self.side(side).lane_values.get(lane).copied().unwrap_or(0)
    }

    /// Whether `side` would compile `lane` at its current totals.
    #[must_use]
    pub fn threatens_compile(&self, side: Side, lane: usize) -> bool {
        self.config().compiles(
            self.lane_value(side, lane),
            self.lane_value(side.opposite(), lane),
        )
    }

    /// Lanes `side` compiles next compile phase if nothing changes.
    #[must_use]
    pub fn imminent_compiles(&self, side: Side) -> SmallVec<[usize; LANE_COUNT]> {
        (0..LANE_COUNT)
            .filter(|lane| self.threatens_compile(side, *lane))
            .collect()
    }

    /// Number of lanes where `side` is strictly ahead.
    #[must_use]
    pub fn lane_leads(&self, side: Side) -> usize {
        (0..LANE_COUNT)
            .filter(|lane| self.lane_value(side, *lane) > self.lane_value(side.opposite(), *lane))
            .count()
    }

    /// Total of `lane` for `side` if its stack were `stack`.
    #[must_use]
    pub fn value_with_stack(&self, side: Side, lane: usize, stack: &Lane) -> i32 {
        let Some(current) = self.side(side).lanes.get(lane) else {
            return 0;
        };
        let before = self.rules.lane_value(self.state, side, lane, current);
        let after = self.rules.lane_value(self.state, side, lane, stack);
        (self.lane_value(side, lane) + after - before).max(0)
    }

    /// Total of the lane facing `side`'s `lane` once `side`'s stack there
    /// is `stack`. Picks up opponent-lane modifiers the new stack carries.
    #[must_use]
    pub fn facing_value_with_stack(&self, side: Side, lane: usize, stack: &Lane) -> i32 {
        let other = side.opposite();
        let Some(facing) = self.side(other).lanes.get(lane) else {
            return 0;
        };
        let mut hypothetical = self.state.clone();
        if let Some(slot) = hypothetical.side_mut(side).lanes.get_mut(lane) {
            *slot = stack.clone();
        }
        let before = self.rules.lane_value(self.state, other, lane, facing);
        let after = self.rules.lane_value(&hypothetical, other, lane, facing);
        (self.lane_value(other, lane) + after - before).max(0)
    }

    /// Total of `lane` for `side` after `card` is placed on top.
    #[must_use]
    pub fn value_with_card(&self, side: Side, lane: usize, card: &Card) -> i32 {
        self.value_with_stack(side, lane, &self.stack_with_card(side, lane, card))
    }

    /// The stack of `lane` after `card` is placed on top, including a
    /// covered card that removes itself.
    #[must_use]
    pub fn stack_with_card(&self, side: Side, lane: usize, card: &Card) -> Lane {
        let mut stack = self.side(side).lanes.get(lane).cloned().unwrap_or_default();
        let leaves = stack
            .last()
            .map(|top| top.deletes_self_on_cover() || top.returns_self_on_cover())
            .unwrap_or(false);
        if leaves {
            stack.pop_back();
        }
        stack.push_back(card.clone());
        stack
    }

    /// Total of `lane` for `side` with card `id` removed.
    #[must_use]
    pub fn value_without(&self, side: Side, lane: usize, id: CardId) -> i32 {
        let stack: Lane = self.side(side).lanes.get(lane).map_or_else(Lane::new, |l| {
            l.iter().filter(|c| c.id != id).cloned().collect()
        });
        self.value_with_stack(side, lane, &stack)
    }

    /// Total of `lane` for `side` with card `id` flipped over.
    #[must_use]
    pub fn value_with_flipped(&self, side: Side, lane: usize, id: CardId) -> i32 {
        let stack: Lane = self.side(side).lanes.get(lane).map_or_else(Lane::new, |l| {
            l.iter()
                .map(|c| if c.id == id { c.oriented(!c.face_up) } else { c.clone() })
                .collect()
        });
        self.value_with_stack(side, lane, &stack)
    }

    /// Effective value of a board card where it sits.
    #[must_use]
    pub fn effective_value(&self, bc: &BoardCard<'_>) -> i32 {
        self.side(bc.owner)
            .lanes
            .get(bc.lane)
            .map_or(0, |lane| self.rules.effective_value(lane, bc.card))
    }

    /// Face-down value a new card would have in one of `side`'s lanes.
    #[must_use]
    pub fn face_down_value_in(&self, side: Side, lane: usize) -> i32 {
        self.side(side)
            .lanes
            .get(lane)
            .map_or(self.config().face_down_value, |l| self.rules.face_down_value(l))
    }

    // === Board ===

    /// Whether the opponent has anything on the board to hit.
    #[must_use]
    pub fn opponent_has_targets(&self) -> bool {
        self.theirs().board_card_count() > 0
    }

    #[must_use]
    pub fn holds_control(&self) -> bool {
        self.state.control_holder == Some(self.me)
    }

    /// Control mechanic in play and not held by us.
    #[must_use]
    pub fn hunting_control(&self) -> bool {
        self.state.use_control_mechanic && !self.holds_control()
    }

    /// Whether `side` has compiled the protocol in `lane`.
    #[must_use]
    pub fn is_compiled(&self, side: Side, lane: usize) -> bool {
        self.side(side).compiled.get(lane).copied().unwrap_or(false)
    }
}
