//! Building blocks plugged into the derivation runners

pub mod errors_setter;
pub mod generator;
pub mod oracle_scorer;
pub mod selector;

pub use errors_setter::{ActionsErrorsSetter, HingeLossErrorsSetter};
pub use generator::{ActionsGenerator, LabeledActionsGenerator, UnlabeledActionsGenerator};
pub use oracle_scorer::OracleScorer;
pub use selector::{BestActionSelector, HighestScoreSelector, sort_by_score_and_priority};
