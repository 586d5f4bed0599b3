//! Target filter evaluation.
//!
//! Most "select a card" prompts carry a declarative `TargetFilter`. Two
//! layers evaluate it:
//!
//! - `matches`: per-card clauses (position, face state, exclude-self,
//!   value range, value equals), applied conjunctively in that order
//! - `TargetQuery`: board enumeration on top of `matches` (owner relative
//!   to the actor, lane scope, covered-in-this-line, calculation,
//!   disallowed ids)
//!
//! ## Conventions
//!
//! - An unspecified position means **uncovered**.
//! - Value clauses never match face-down cards: their value is hidden.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cards::Card;
use crate::core::{BoardCard, CardId, GameState, Side};
use crate::rules::{RulesOracle, StandardRules};

/// Whose cards a filter admits, relative to the acting side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OwnerFilter {
    Own,
    Opponent,
    Any,
}

impl OwnerFilter {
    /// Whether a card owned by `owner` passes for `actor`.
    #[must_use]
    pub fn admits(self, owner: Side, actor: Side) -> bool {
        match self {
            OwnerFilter::Own => owner == actor,
            OwnerFilter::Opponent => owner != actor,
            OwnerFilter::Any => true,
        }
    }
}

/// Stack position clause.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    Uncovered,
    Covered,
    Any,
    /// Covered, and in the same lane as the source card.
    CoveredInThisLine,
}

/// Orientation clause.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaceState {
    FaceUp,
    FaceDown,
}

impl FaceState {
    #[must_use]
    pub fn admits(self, card: &Card) -> bool {
        match self {
            FaceState::FaceUp => card.face_up,
            FaceState::FaceDown => !card.face_up,
        }
    }
}

/// Inclusive value range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: i32,
    pub max: i32,
}

/// Keep only extreme-valued candidates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Calculation {
    HighestValue,
    LowestValue,
}

/// Which lanes a prompt may reach.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "scope", content = "lane", rename_all = "snake_case")]
pub enum LaneScope {
    #[default]
    Any,
    Lane(usize),
    /// The lane holding the source card.
    SourceLane,
}

/// Declarative card filter.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetFilter {
    #[serde(default)]
    pub owner: Option<OwnerFilter>,
    #[serde(default)]
    pub position: Option<Position>,
    #[serde(default)]
    pub face_state: Option<FaceState>,
    #[serde(default)]
    pub value_range: Option<ValueRange>,
    #[serde(default)]
    pub value_equals: Option<i32>,
    #[serde(default)]
    pub exclude_self: bool,
    #[serde(default)]
    pub calculation: Option<Calculation>,
}

impl TargetFilter {
    /// Uncovered card of either side.
    #[must_use]
    pub fn any() -> Self {
        Self::default()
    }

    /// Set the owner clause (builder pattern).
    #[must_use]
    pub fn owned_by(mut self, owner: OwnerFilter) -> Self {
        self.owner = Some(owner);
        self
    }

    /// Set the position clause (builder pattern).
    #[must_use]
    pub fn at(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    /// Set the face-state clause (builder pattern).
    #[must_use]
    pub fn facing(mut self, face_state: FaceState) -> Self {
        self.face_state = Some(face_state);
        self
    }

    /// Set an inclusive value range (builder pattern).
    #[must_use]
    pub fn valued_between(mut self, min: i32, max: i32) -> Self {
        self.value_range = Some(ValueRange { min, max });
        self
    }

    /// Require an exact value (builder pattern).
    #[must_use]
    pub fn valued(mut self, value: i32) -> Self {
        self.value_equals = Some(value);
        self
    }

    /// Reject the source card (builder pattern).
    #[must_use]
    pub fn excluding_self(mut self) -> Self {
        self.exclude_self = true;
        self
    }

    /// Keep only extreme-valued candidates (builder pattern).
    #[must_use]
    pub fn with_calculation(mut self, calculation: Calculation) -> Self {
        self.calculation = Some(calculation);
        self
    }

    /// Position with the uncovered default applied.
    #[must_use]
    pub fn effective_position(&self) -> Position {
        self.position.unwrap_or(Position::Uncovered)
    }

    /// Owner with the "either side" default applied.
    #[must_use]
    pub fn effective_owner(&self) -> OwnerFilter {
        self.owner.unwrap_or(OwnerFilter::Any)
    }
}

/// Check one card against the per-card clauses of a filter.
#[must_use]
pub fn matches(
    card: &Card,
    is_uncovered: bool,
    filter: &TargetFilter,
    source: Option<CardId>,
) -> bool {
    match filter.effective_position() {
        Position::Uncovered if !is_uncovered => return false,
        Position::Covered if is_uncovered => return false,
        _ => {}
    }

    if let Some(face) = filter.face_state {
        if !face.admits(card) {
            return false;
        }
    }

    if filter.exclude_self && source == Some(card.id) {
        return false;
    }

    if let Some(range) = filter.value_range {
        if !card.face_up || card.value < range.min || card.value > range.max {
            return false;
        }
    }

    if let Some(value) = filter.value_equals {
        if !card.face_up || card.value != value {
            return false;
        }
    }

    true
}

/// Board enumeration for a filter on behalf of an acting side.
///
/// Extremes for `Calculation` use effective values from the rules oracle,
/// so a boosted face-down card counts at its boosted value.
#[derive(Clone)]
pub struct TargetQuery<'a> {
    filter: &'a TargetFilter,
    actor: Side,
    source: Option<CardId>,
    scope: LaneScope,
    disallowed: FxHashSet<CardId>,
    rules: Option<&'a dyn RulesOracle>,
}

impl<'a> TargetQuery<'a> {
    /// Create a query with no scope restriction, valued by `StandardRules`.
    #[must_use]
    pub fn new(filter: &'a TargetFilter, actor: Side) -> Self {
        Self {
            filter,
            actor,
            source: None,
            scope: LaneScope::Any,
            disallowed: FxHashSet::default(),
            rules: None,
        }
    }

    /// Set the source card (for exclude-self and source-lane scopes).
    #[must_use]
    pub fn with_source(mut self, source: Option<CardId>) -> Self {
        self.source = source;
        self
    }

    /// Restrict the lanes considered.
    #[must_use]
    pub fn with_scope(mut self, scope: LaneScope) -> Self {
        self.scope = scope;
        self
    }

    /// Exclude specific ids.
    #[must_use]
    pub fn with_disallowed(mut self, ids: impl IntoIterator<Item = CardId>) -> Self {
        self.disallowed.extend(ids);
        self
    }

    /// Oracle used for effective values.
    #[must_use]
    pub fn with_rules(mut self, rules: &'a dyn RulesOracle) -> Self {
        self.rules = Some(rules);
        self
    }

    /// All valid targets, player side first, bottom to top per lane.
    pub fn candidates<'s>(&self, state: &'s GameState) -> SmallVec<[BoardCard<'s>; 8]> {
        let source_lane = self
            .source
            .and_then(|id| state.locate(id))
            .map(|bc| bc.lane);

        let lane_allowed = |lane: usize| match self.scope {
            LaneScope::Any => true,
            LaneScope::Lane(l) => l == lane,
            LaneScope::SourceLane => source_lane == Some(lane),
        };

        let owner = self.filter.effective_owner();
        let in_this_line = self.filter.effective_position() == Position::CoveredInThisLine;

        let mut found: SmallVec<[BoardCard<'s>; 8]> = state
            .all_board_cards()
            .filter(|bc| owner.admits(bc.owner, self.actor))
            .filter(|bc| lane_allowed(bc.lane))
            .filter(|bc| {
                !in_this_line || (!bc.uncovered && source_lane.map_or(true, |l| l == bc.lane))
            })
            .filter(|bc| matches(bc.card, bc.uncovered, self.filter, self.source))
            .collect();

        // Extremes are taken before disallowed ids are removed so that
        // excluding a card can never admit new ones.
        if let Some(calc) = self.filter.calculation {
            let standard = StandardRules::default();
            let rules: &dyn RulesOracle = self.rules.unwrap_or(&standard);
            let value_of = |bc: &BoardCard<'_>| {
                state
                    .side(bc.owner)
                    .lanes
                    .get(bc.lane)
                    .map_or(bc.card.value, |lane| rules.effective_value(lane, bc.card))
            };
            let extreme = match calc {
                Calculation::HighestValue => found.iter().map(value_of).max(),
                Calculation::LowestValue => found.iter().map(value_of).min(),
            };
            if let Some(extreme) = extreme {
                found.retain(|bc| value_of(bc) == extreme);
            }
        }

        found.retain(|bc| !self.disallowed.contains(&bc.card.id));
        found
    }

    /// Whether `id` is currently a valid target.
    #[must_use]
    pub fn admits(&self, state: &GameState, id: CardId) -> bool {
        self.candidates(state).iter().any(|bc| bc.card.id == id)
    }
}
