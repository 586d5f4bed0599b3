//! Rules capabilities consumed by the AI.
//!
//! The rules engine is an external collaborator. The AI never applies
//! actions; it only asks `RulesOracle` about values and legality.

pub mod oracle;

pub use oracle::{RulesOracle, StandardRules};
