//! Difficulty profiles.
//!
//! All tiers share one decision pipeline. What differs between them is
//! captured here: noise and mistake probabilities plus the scoring
//! weights. None of the magnitudes are load-bearing; tests assert
//! orderings (a block outranks a non-block), not exact scores.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ParseDifficultyError, ProfileError};

/// Environment variable read by `Difficulty::from_env`.
pub const DIFFICULTY_ENV: &str = "COMPILE_AI_DIFFICULTY";

/// Difficulty tier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    /// Read the tier from `COMPILE_AI_DIFFICULTY`, defaulting to normal.
    #[must_use]
    pub fn from_env() -> Self {
        std::env::var(DIFFICULTY_ENV)
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default()
    }

    /// Default profile for this tier.
    #[must_use]
    pub fn profile(self) -> DifficultyProfile {
        match self {
            Difficulty::Easy => DifficultyProfile::easy(),
            Difficulty::Normal => DifficultyProfile::normal(),
            Difficulty::Hard => DifficultyProfile::hard(),
        }
    }
}

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "normal" | "default" => Ok(Difficulty::Normal),
            "hard" => Ok(Difficulty::Hard),
            other => Err(ParseDifficultyError(other.to_string())),
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
        };
        f.write_str(name)
    }
}

/// Tunable parameters of one tier.
///
/// Penalties are stored as positive magnitudes and subtracted by the
/// scorers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyProfile {
    /// Tier whose specialized handlers run first.
    pub difficulty: Difficulty,

    // === Randomness ===

    /// Chance of swapping the best move for the second-best positive one.
    pub move_noise: f64,

    /// Chance of taking the runner-up on a non-critical target pick.
    pub mistake_probability: f64,

    /// Chance the easy handlers pick a random legal option.
    pub random_choice_probability: f64,

    // === Move scoring ===

    /// Reward for a play that stops an opposing compile.
    pub block_bonus: f64,

    /// Penalty for playing into a lane the opponent compiles anyway.
    pub fail_to_block_penalty: f64,

    /// Reward for reaching our own compile condition.
    pub compile_setup_bonus: f64,

    /// Weight of each point of lane value gained.
    pub value_weight: f64,

    /// Weight of lane progress toward the compile threshold.
    pub lane_progress_weight: f64,

    /// Reward for opening an empty board with a strong face-up card.
    pub early_opening_bonus: f64,

    /// Reward per disruption keyword when the opponent has targets.
    pub disruption_bonus: f64,

    /// Penalty for an effect that would find no target.
    pub no_target_penalty: f64,

    /// Penalty for a draw that forces an immediate discard.
    pub forced_discard_penalty: f64,

    /// Penalty per value point given up by playing face-down.
    pub face_down_penalty: f64,

    /// Penalty per value point of an own card destroyed by covering it.
    pub cover_loss_penalty: f64,

    /// Reward for taking a lane lead while hunting for control.
    pub control_lead_bonus: f64,

    /// Penalty for adding value to a lane that already compiles.
    pub overbuild_penalty: f64,

    /// Score of refilling the hand in ordinary positions.
    pub refill_score: f64,

    /// Score of refilling in an emergency.
    pub emergency_refill_score: f64,

    // === Card heuristics ===

    /// Multiplier on printed value in `card_threat`.
    pub threat_value_weight: f64,

    /// `card_threat` bonus for a persistent top effect.
    pub static_effect_threat: f64,

    /// `card_threat` bonus for a start or end trigger.
    pub recurring_trigger_threat: f64,

    /// `card_threat` bonus for a when-covered trigger.
    pub on_cover_threat: f64,

    /// `card_threat` bonus per disruption keyword.
    pub disruption_threat: f64,

    /// `card_power` bonus per disruption keyword.
    pub keyword_power_bonus: f64,
}

impl Default for DifficultyProfile {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,
            move_noise: 0.05,
            mistake_probability: 0.05,
            random_choice_probability: 0.0,
            block_bonus: 400.0,
            fail_to_block_penalty: 200.0,
            compile_setup_bonus: 150.0,
            value_weight: 5.0,
            lane_progress_weight: 20.0,
            early_opening_bonus: 10.0,
            disruption_bonus: 15.0,
            no_target_penalty: 20.0,
            forced_discard_penalty: 15.0,
            face_down_penalty: 8.0,
            cover_loss_penalty: 6.0,
            control_lead_bonus: 25.0,
            overbuild_penalty: 30.0,
            refill_score: -5.0,
            emergency_refill_score: 50.0,
            threat_value_weight: 2.0,
            static_effect_threat: 3.0,
            recurring_trigger_threat: 4.0,
            on_cover_threat: 2.0,
            disruption_threat: 2.0,
            keyword_power_bonus: 3.0,
        }
    }
}

impl DifficultyProfile {
    /// Mostly random legal choices, frequent noise.
    #[must_use]
    pub fn easy() -> Self {
        Self {
            difficulty: Difficulty::Easy,
            move_noise: 0.2,
            mistake_probability: 0.0,
            random_choice_probability: 0.75,
            fail_to_block_penalty: 100.0,
            ..Self::default()
        }
    }

    /// Full heuristics with small noise and occasional mistakes.
    #[must_use]
    pub fn normal() -> Self {
        Self::default()
    }

    /// No noise, no mistakes, sharper penalties.
    #[must_use]
    pub fn hard() -> Self {
        Self {
            difficulty: Difficulty::Hard,
            move_noise: 0.0,
            mistake_probability: 0.0,
            fail_to_block_penalty: 300.0,
            no_target_penalty: 30.0,
            face_down_penalty: 10.0,
            overbuild_penalty: 40.0,
            threat_value_weight: 2.5,
            ..Self::default()
        }
    }

    /// Set the move noise probability.
    #[must_use]
    pub fn with_move_noise(mut self, p: f64) -> Self {
        self.move_noise = p;
        self
    }

    /// Set the mistake probability.
    #[must_use]
    pub fn with_mistake_probability(mut self, p: f64) -> Self {
        self.mistake_probability = p;
        self
    }

    /// Set the random-choice probability.
    #[must_use]
    pub fn with_random_choice_probability(mut self, p: f64) -> Self {
        self.random_choice_probability = p;
        self
    }

    /// Set the fail-to-block penalty.
    #[must_use]
    pub fn with_fail_to_block_penalty(mut self, penalty: f64) -> Self {
        self.fail_to_block_penalty = penalty;
        self
    }

    /// Disable every source of randomness.
    #[must_use]
    pub fn deterministic(self) -> Self {
        self.with_move_noise(0.0)
            .with_mistake_probability(0.0)
            .with_random_choice_probability(0.0)
    }

    /// Parse and validate a profile. Missing fields take normal defaults.
    pub fn from_json(json: &str) -> Result<Self, ProfileError> {
        let profile: Self = serde_json::from_str(json)?;
        profile.validate()?;
        Ok(profile)
    }

    /// Check probabilities and penalty magnitudes.
    pub fn validate(&self) -> Result<(), ProfileError> {
        let probabilities = [
            ("move_noise", self.move_noise),
            ("mistake_probability", self.mistake_probability),
            ("random_choice_probability", self.random_choice_probability),
        ];
        for (field, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(ProfileError::Probability { field, value });
            }
        }

        let magnitudes = [
            ("block_bonus", self.block_bonus),
            ("fail_to_block_penalty", self.fail_to_block_penalty),
            ("compile_setup_bonus", self.compile_setup_bonus),
            ("value_weight", self.value_weight),
            ("lane_progress_weight", self.lane_progress_weight),
            ("early_opening_bonus", self.early_opening_bonus),
            ("disruption_bonus", self.disruption_bonus),
            ("no_target_penalty", self.no_target_penalty),
            ("forced_discard_penalty", self.forced_discard_penalty),
            ("face_down_penalty", self.face_down_penalty),
            ("cover_loss_penalty", self.cover_loss_penalty),
            ("control_lead_bonus", self.control_lead_bonus),
            ("overbuild_penalty", self.overbuild_penalty),
            ("threat_value_weight", self.threat_value_weight),
            ("static_effect_threat", self.static_effect_threat),
            ("recurring_trigger_threat", self.recurring_trigger_threat),
            ("on_cover_threat", self.on_cover_threat),
            ("disruption_threat", self.disruption_threat),
            ("keyword_power_bonus", self.keyword_power_bonus),
        ];
        for (field, value) in magnitudes {
            if value.is_nan() || value < 0.0 {
                return Err(ProfileError::Negative { field, value });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_defaults() {
        let easy = DifficultyProfile::easy();
        let normal = DifficultyProfile::normal();
        let hard = DifficultyProfile::hard();

        assert_eq!(easy.move_noise, 0.2);
        assert_eq!(normal.move_noise, 0.05);
        assert_eq!(hard.move_noise, 0.0);
        assert_eq!(normal.mistake_probability, 0.05);
        assert_eq!(hard.mistake_probability, 0.0);
        assert!(hard.fail_to_block_penalty > normal.fail_to_block_penalty);

        for profile in [easy, normal, hard] {
            assert!(profile.validate().is_ok());
        }
    }

    #[test]
    fn test_difficulty_parse() {
        assert_eq!("Hard".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert_eq!(" easy ".parse::<Difficulty>(), Ok(Difficulty::Easy));
        assert_eq!("default".parse::<Difficulty>(), Ok(Difficulty::Normal));
        assert_eq!(
            "brutal".parse::<Difficulty>(),
            Err(ParseDifficultyError("brutal".into()))
        );
        assert_eq!(Difficulty::Hard.to_string(), "hard");
        assert_eq!(Difficulty::Easy.profile().difficulty, Difficulty::Easy);
    }

    #[test]
    fn test_builder_pattern() {
        let profile = DifficultyProfile::normal()
            .with_move_noise(0.5)
            .with_fail_to_block_penalty(1000.0);
        assert_eq!(profile.move_noise, 0.5);
        assert_eq!(profile.fail_to_block_penalty, 1000.0);

        let quiet = profile.deterministic();
        assert_eq!(quiet.move_noise, 0.0);
        assert_eq!(quiet.mistake_probability, 0.0);
    }

    #[test]
    fn test_from_json_partial() {
        let profile =
            DifficultyProfile::from_json(r#"{"difficulty":"hard","move_noise":0.1}"#).unwrap();
        assert_eq!(profile.difficulty, Difficulty::Hard);
        assert_eq!(profile.move_noise, 0.1);
        assert_eq!(profile.block_bonus, DifficultyProfile::default().block_bonus);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let err = DifficultyProfile::from_json(r#"{"move_noise":1.5}"#).unwrap_err();
        assert!(matches!(err, ProfileError::Probability { field: "move_noise", .. }));

        let err = DifficultyProfile::from_json(r#"{"block_bonus":-1.0}"#).unwrap_err();
        assert!(matches!(err, ProfileError::Negative { field: "block_bonus", .. }));

        let err = DifficultyProfile::from_json("{").unwrap_err();
        assert!(matches!(err, ProfileError::Json(_)));
    }

    #[test]
    fn test_serialization() {
        let profile = DifficultyProfile::hard();
        let json = serde_json::to_string(&profile).unwrap();
        let back: DifficultyProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(back, profile);
    }
}
