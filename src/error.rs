//! Error types.
//!
//! The decision path itself never fails; these errors surface from
//! configuration loading, difficulty parsing, prompt validation and the
//! legality checks of the rules oracle.

use thiserror::Error;

use crate::core::CardId;

/// Difficulty profile loading or validation failure.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("invalid profile JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{field} must be a probability in [0, 1], got {value}")]
    Probability { field: &'static str, value: f64 },

    #[error("{field} must be non-negative, got {value}")]
    Negative { field: &'static str, value: f64 },
}

/// Unknown difficulty name.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown difficulty '{0}' (expected easy, normal or hard)")]
pub struct ParseDifficultyError(pub String);

/// Structurally invalid prompt.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PromptError {
    #[error("lane {0} is out of range")]
    LaneOutOfRange(usize),

    #[error("{0} count must be positive")]
    ZeroCount(&'static str),

    #[error("{0} is not on the board")]
    NotOnBoard(CardId),

    #[error("{0} is not in the expected hand")]
    NotInHand(CardId),

    #[error("empty value range {min}..={max}")]
    EmptyRange { min: i32, max: i32 },

    #[error("no lanes offered")]
    NoLanes,

    #[error("no cards offered")]
    NoCards,
}

/// Reason a play is not allowed.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum PlayBlock {
    #[error("lane {0} is out of range")]
    LaneOutOfRange(usize),

    #[error("protocol does not match lane {0}")]
    ProtocolMismatch(usize),

    #[error("lane {0} is blocked by an opposing card")]
    LaneBlocked(usize),

    #[error("face-down plays into lane {0} are blocked")]
    FaceDownBlocked(usize),

    #[error("only face-down plays are allowed")]
    FaceUpForbidden,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            PlayBlock::ProtocolMismatch(1).to_string(),
            "protocol does not match lane 1"
        );
        assert_eq!(
            PromptError::NotOnBoard(CardId(7)).to_string(),
            "Card(7) is not on the board"
        );
        assert!(ParseDifficultyError("brutal".into())
            .to_string()
            .contains("brutal"));
    }

    #[test]
    fn test_profile_error_from_json() {
        let err: ProfileError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, ProfileError::Json(_)));
    }
}
