//! Pending decisions and the target filters they carry.
//!
//! - `ActionRequired`: the forced decision the rules engine is waiting on
//! - `TargetFilter`: declarative card filter used by "select a card" prompts
//! - `TargetQuery`: board enumeration for a filter
//!
//! Effects themselves are applied by the rules engine; this module only
//! describes what is being asked.

mod prompt;
mod targeting;

pub use prompt::{ActionKind, ActionRequired, OptionalEffect};
pub use targeting::{
    matches, Calculation, FaceState, LaneScope, OwnerFilter, Position, TargetFilter, TargetQuery,
    ValueRange,
};
