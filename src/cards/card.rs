//! Cards as they appear in a state snapshot.
//!
//! A `Card` carries everything the decision core may read: protocol,
//! printed value, orientation, keyword flags, effect text and declarative
//! passives. The effective value of a face-down card is *not* stored here;
//! ask the rules oracle (`RulesOracle::effective_value`).

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::passive::Passive;
use crate::core::CardId;

/// Effect keyword printed on a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Keyword {
    Delete,
    Flip,
    Shift,
    Return,
    Discard,
    Draw,
    Play,
    Prevent,
}

impl Keyword {
    /// Every keyword, in bit order.
    pub const ALL: [Keyword; 8] = [
        Keyword::Delete,
        Keyword::Flip,
        Keyword::Shift,
        Keyword::Return,
        Keyword::Discard,
        Keyword::Draw,
        Keyword::Play,
        Keyword::Prevent,
    ];

    /// Keywords that act against cards already on the board or in hand.
    pub const DISRUPTION: [Keyword; 5] = [
        Keyword::Delete,
        Keyword::Flip,
        Keyword::Shift,
        Keyword::Return,
        Keyword::Discard,
    ];

    const fn bit(self) -> u16 {
        1 << (self as u16)
    }

    /// Whether the keyword needs a board target to do anything.
    #[must_use]
    pub const fn needs_board_target(self) -> bool {
        matches!(
            self,
            Keyword::Delete | Keyword::Flip | Keyword::Shift | Keyword::Return
        )
    }
}

/// Compact keyword set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Keywords(u16);

impl Keywords {
    /// Empty set.
    pub const NONE: Keywords = Keywords(0);

    /// Add a keyword (builder pattern).
    #[must_use]
    pub const fn with(self, keyword: Keyword) -> Self {
        Self(self.0 | keyword.bit())
    }

    #[must_use]
    pub const fn contains(self, keyword: Keyword) -> bool {
        self.0 & keyword.bit() != 0
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterate over the contained keywords.
    pub fn iter(self) -> impl Iterator<Item = Keyword> {
        Keyword::ALL.into_iter().filter(move |k| self.contains(*k))
    }

    /// Number of disruption keywords present.
    #[must_use]
    pub fn disruption_count(self) -> usize {
        Keyword::DISRUPTION
            .iter()
            .filter(|k| self.contains(**k))
            .count()
    }
}

impl FromIterator<Keyword> for Keywords {
    fn from_iter<I: IntoIterator<Item = Keyword>>(iter: I) -> Self {
        iter.into_iter().fold(Keywords::NONE, Keywords::with)
    }
}

/// A card instance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,

    /// Owning protocol name.
    pub protocol: String,

    /// Printed value (0..=6 in the base game).
    pub value: i32,

    pub face_up: bool,

    #[serde(default)]
    pub keywords: Keywords,

    /// Static top-box text.
    #[serde(default)]
    pub top: String,

    /// Bottom-box text; may start with `Start:` / `End:` or react to being
    /// covered.
    #[serde(default)]
    pub bottom: String,

    /// Declarative static abilities, active while face-up.
    #[serde(default)]
    pub passives: SmallVec<[Passive; 2]>,
}

impl Card {
    /// Create a face-up card with no text.
    pub fn new(id: CardId, protocol: impl Into<String>, value: i32) -> Self {
        Self {
            id,
            protocol: protocol.into(),
            value,
            face_up: true,
            keywords: Keywords::NONE,
            top: String::new(),
            bottom: String::new(),
            passives: SmallVec::new(),
        }
    }

    /// Set orientation (builder pattern).
    #[must_use]
    pub fn face_down(mut self) -> Self {
        self.face_up = false;
        self
    }

    /// Add a keyword (builder pattern).
    #[must_use]
    pub fn with_keyword(mut self, keyword: Keyword) -> Self {
        self.keywords = self.keywords.with(keyword);
        self
    }

    /// Set top text (builder pattern).
    #[must_use]
    pub fn with_top(mut self, text: impl Into<String>) -> Self {
        self.top = text.into();
        self
    }

    /// Set bottom text (builder pattern).
    #[must_use]
    pub fn with_bottom(mut self, text: impl Into<String>) -> Self {
        self.bottom = text.into();
        self
    }

    /// Add a passive (builder pattern).
    #[must_use]
    pub fn with_passive(mut self, passive: Passive) -> Self {
        self.passives.push(passive);
        self
    }

    /// Copy of this card with the given orientation.
    #[must_use]
    pub fn oriented(&self, face_up: bool) -> Self {
        Self {
            face_up,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn has_keyword(&self, keyword: Keyword) -> bool {
        self.keywords.contains(keyword)
    }

    #[must_use]
    pub fn has_disruption(&self) -> bool {
        self.keywords.disruption_count() > 0
    }

    /// Passives currently in force (face-down cards have none).
    pub fn active_passives(&self) -> impl Iterator<Item = &Passive> {
        self.passives.iter().filter(move |_| self.face_up)
    }

    /// Whether an active passive satisfies the predicate.
    #[must_use]
    pub fn has_active_passive(&self, predicate: impl Fn(&Passive) -> bool) -> bool {
        self.active_passives().any(predicate)
    }

    /// Static top effect: printed top text or any declared passive.
    #[must_use]
    pub fn has_static_top_effect(&self) -> bool {
        !self.top.trim().is_empty() || !self.passives.is_empty()
    }

    /// Bottom effect that fires every turn (`Start:` or `End:`).
    #[must_use]
    pub fn has_recurring_trigger(&self) -> bool {
        self.bottom.lines().any(|line| {
            let line = line.trim_start().to_ascii_lowercase();
            line.starts_with("start:") || line.starts_with("end:")
        })
    }

    /// Bottom effect that reacts to this card being covered.
    #[must_use]
    pub fn has_on_cover_trigger(&self) -> bool {
        let bottom = self.bottom.to_ascii_lowercase();
        bottom.contains("covered:") || bottom.contains("would be covered")
    }

    /// Deletes itself when covered.
    #[must_use]
    pub fn deletes_self_on_cover(&self) -> bool {
        self.has_active_passive(|p| matches!(p, Passive::DeleteSelfOnCover))
    }

    /// Returns to its owner's hand when covered.
    #[must_use]
    pub fn returns_self_on_cover(&self) -> bool {
        self.has_active_passive(|p| matches!(p, Passive::ReturnSelfOnCover))
    }
}
