//! Scenario construction for tests and benchmarks.
//!
//! Builds `GameState` snapshots the way the rules engine would hand them
//! over: cards placed per lane, lane totals derived through a
//! `RulesOracle`, optional per-lane overrides for engine-side modifiers.
//!
//! Defaults: player protocols Fire/Water/Life, opponent protocols
//! Death/Light/Speed, opponent to act, action phase.

mod builder;

pub use builder::ScenarioBuilder;
