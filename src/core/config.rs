//! Game rule constants consumed by the decision core.
//!
//! The rules engine owns the real rules; these values mirror the ones the
//! AI needs for its own arithmetic (compile threshold, hand limit, base
//! face-down value). Games with house rules supply their own `RulesConfig`.

use serde::{Deserialize, Serialize};

/// Number of lanes per side.
pub const LANE_COUNT: usize = 3;

/// Rule constants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RulesConfig {
    /// Lane value required to compile (must also strictly exceed the
    /// opposing lane).
    pub compile_threshold: i32,

    /// Hand size restored by refilling; hands above it are trimmed at the
    /// end of the turn.
    pub hand_limit: usize,

    /// Value of a face-down card with no modifiers.
    pub face_down_value: i32,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            compile_threshold: 10,
            hand_limit: 5,
            face_down_value: 2,
        }
    }
}

impl RulesConfig {
    /// Set the compile threshold.
    #[must_use]
    pub fn with_compile_threshold(mut self, threshold: i32) -> Self {
        self.compile_threshold = threshold;
        self
    }

    /// Set the hand limit.
    #[must_use]
    pub fn with_hand_limit(mut self, limit: usize) -> Self {
        self.hand_limit = limit;
        self
    }

    /// True when `value` is enough to compile against `opposing`.
    #[must_use]
    pub fn compiles(&self, value: i32, opposing: i32) -> bool {
        value >= self.compile_threshold && value > opposing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RulesConfig::default();
        assert_eq!(config.compile_threshold, 10);
        assert_eq!(config.hand_limit, 5);
        assert_eq!(config.face_down_value, 2);
    }

    #[test]
    fn test_compiles_requires_strict_lead() {
        let config = RulesConfig::default();
        assert!(config.compiles(10, 9));
        assert!(!config.compiles(10, 10));
        assert!(!config.compiles(9, 0));
        assert!(config.compiles(12, 11));
    }

    #[test]
    fn test_builder() {
        let config = RulesConfig::default()
            .with_compile_threshold(12)
            .with_hand_limit(6);
        assert_eq!(config.compile_threshold, 12);
        assert_eq!(config.hand_limit, 6);
    }
}
