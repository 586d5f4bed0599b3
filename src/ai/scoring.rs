//! Card heuristics.
//!
//! - `card_power`: how much a card is worth keeping in hand
//! - `card_threat`: how much a card on the board is worth removing
//!
//! Both are recomputed on every call.

use super::context::DecisionContext;
use super::profile::DifficultyProfile;
use crate::cards::{Card, Keyword};
use crate::core::Side;

/// Hand-value heuristic.
///
/// Proportional to printed value, plus a bonus per disruption keyword and
/// smaller ones for draw and play.
#[must_use]
pub fn card_power(card: &Card, profile: &DifficultyProfile) -> f64 {
    let bonus = profile.keyword_power_bonus;
    let mut power = f64::from(card.value);
    power += bonus * card.keywords.disruption_count() as f64;
    if card.has_keyword(Keyword::Draw) {
        power += bonus * 0.5;
    }
    if card.has_keyword(Keyword::Play) {
        power += bonus * 0.5;
    }
    power
}

/// Board-value heuristic for `card` in `owner`'s `lane`.
#[must_use]
pub fn card_threat(ctx: &DecisionContext<'_>, card: &Card, owner: Side, lane: usize) -> f64 {
    if !card.face_up {
        return f64::from(ctx.face_down_value_in(owner, lane));
    }

    let p = ctx.profile;
    let mut threat = f64::from(card.value) * p.threat_value_weight;
    if card.has_static_top_effect() {
        threat += p.static_effect_threat;
    }
    if card.has_recurring_trigger() {
        threat += p.recurring_trigger_threat;
    }
    if card.has_on_cover_trigger() {
        threat += p.on_cover_threat;
    }
    threat += p.disruption_threat * card.keywords.disruption_count() as f64;
    threat
}
