//! Domain layer: pure race rules and ranking, no I/O.

pub mod ranking;
pub mod rules;

#[cfg(test)]
mod tests_props_rules;

pub use ranking::{rank_results, RankingEntry, RoundResult};
pub use rules::{apply_roll, RaceMode, RollOutcome, INITIAL_CONDITION, TRACK_LENGTH};
