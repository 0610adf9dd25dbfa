//! Ports (trait boundaries) for external dependencies.
//!
//! This module defines the interfaces between the derivation engine and the
//! components plugged into it: the model scoring candidate actions and the
//! observers watching a training run. The engine owns these traits; models
//! and reporting adapters implement them.

pub mod observer;
pub mod scorer;

pub use observer::{Observer, StepRecord};
pub use scorer::{ActionsScorer, ActionsScorerTrainable};
