//! Scenario builder.

use crate::cards::Card;
use crate::core::{GameState, Phase, Side, LANE_COUNT};
use crate::rules::{RulesOracle, StandardRules};

/// Builder for board snapshots.
#[derive(Clone, Debug)]
pub struct ScenarioBuilder {
    state: GameState,
    /// Lane totals forced after derivation.
    overrides: Vec<(Side, usize, i32)>,
}

impl Default for ScenarioBuilder {
    fn default() -> Self {
        Self {
            state: GameState::new(
                ["Fire", "Water", "Life"].map(String::from),
                ["Death", "Light", "Speed"].map(String::from),
            ),
            overrides: Vec::new(),
        }
    }
}

impl ScenarioBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn protocols(mut self, side: Side, names: [&str; LANE_COUNT]) -> Self {
        self.state.side_mut(side).protocols = names.map(String::from);
        self
    }

    /// Push cards onto a lane, bottom first.
    pub fn lane(mut self, side: Side, lane: usize, cards: impl IntoIterator<Item = Card>) -> Self {
        assert!(lane < LANE_COUNT, "Lane index must be below {LANE_COUNT}");
        self.state.side_mut(side).lanes[lane].extend(cards);
        self
    }

    /// Force a lane total, as an engine-side modifier would.
    pub fn lane_value(mut self, side: Side, lane: usize, value: i32) -> Self {
        assert!(lane < LANE_COUNT, "Lane index must be below {LANE_COUNT}");
        self.overrides.push((side, lane, value));
        self
    }

    pub fn hand(mut self, side: Side, cards: impl IntoIterator<Item = Card>) -> Self {
        self.state.side_mut(side).hand.extend(cards);
        self
    }

    pub fn deck(mut self, side: Side, cards: impl IntoIterator<Item = Card>) -> Self {
        self.state.side_mut(side).deck.extend(cards);
        self
    }

    pub fn discard(mut self, side: Side, cards: impl IntoIterator<Item = Card>) -> Self {
        self.state.side_mut(side).discard.extend(cards);
        self
    }

    /// Mark the protocol in `lane` as compiled.
    pub fn compiled(mut self, side: Side, lane: usize) -> Self {
        assert!(lane < LANE_COUNT, "Lane index must be below {LANE_COUNT}");
        self.state.side_mut(side).compiled[lane] = true;
        self
    }

    pub fn phase(mut self, phase: Phase) -> Self {
        self.state.phase = phase;
        self
    }

    pub fn turn(mut self, side: Side) -> Self {
        self.state.turn = side;
        self
    }

    pub fn turn_number(mut self, turn_number: u32) -> Self {
        self.state.turn_number = turn_number;
        self
    }

    /// Enable the control mechanic with `holder` holding control.
    pub fn control(mut self, holder: Side) -> Self {
        self.state.use_control_mechanic = true;
        self.state.control_holder = Some(holder);
        self
    }

    /// Enable or disable the control mechanic without assigning it.
    pub fn use_control(mut self, enabled: bool) -> Self {
        self.state.use_control_mechanic = enabled;
        self
    }

    pub fn compilable(mut self, lanes: impl IntoIterator<Item = usize>) -> Self {
        self.state.compilable_lanes = lanes.into_iter().collect();
        self
    }

    /// Build with lane totals derived by `StandardRules`.
    pub fn build(self) -> GameState {
        self.build_with(&StandardRules::default())
    }

    /// Build with lane totals derived by `rules`.
    pub fn build_with(self, rules: &dyn RulesOracle) -> GameState {
        let mut state = self.state;
        for side in Side::BOTH {
            let values: [i32; LANE_COUNT] = std::array::from_fn(|lane| {
                rules.lane_value(&state, side, lane, &state.side(side).lanes[lane])
            });
            state.side_mut(side).lane_values = values;
        }
        for (side, lane, value) in self.overrides {
            state.side_mut(side).lane_values[lane] = value;
        }
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Passive;
    use crate::core::CardId;

    #[test]
    fn test_defaults() {
        let state = ScenarioBuilder::new().build();
        assert_eq!(state.turn, Side::Opponent);
        assert_eq!(state.phase, Phase::Action);
        assert_eq!(state.side(Side::Player).protocols[0], "Fire");
        assert_eq!(state.side(Side::Opponent).protocols[2], "Speed");
        assert!(!state.use_control_mechanic);
    }

    #[test]
    fn test_lane_values_derived() {
        let state = ScenarioBuilder::new()
            .lane(
                Side::Player,
                0,
                [
                    Card::new(CardId(1), "Fire", 3),
                    Card::new(CardId(2), "Fire", 5).face_down(),
                ],
            )
            .lane(
                Side::Opponent,
                1,
                [Card::new(CardId(3), "Light", 1).with_passive(Passive::OwnLaneModifier(2))],
            )
            .build();
        assert_eq!(state.side(Side::Player).lane_values, [5, 0, 0]);
        assert_eq!(state.side(Side::Opponent).lane_values, [0, 3, 0]);
    }

    #[test]
    fn test_override_wins() {
        let state = ScenarioBuilder::new()
            .lane(Side::Player, 0, [Card::new(CardId(1), "Fire", 3)])
            .lane_value(Side::Player, 0, 9)
            .build();
        assert_eq!(state.side(Side::Player).lane_values[0], 9);
    }

    #[test]
    #[should_panic(expected = "Lane index")]
    fn test_lane_out_of_range() {
        let _ = ScenarioBuilder::new().compiled(Side::Player, 3);
    }
}
