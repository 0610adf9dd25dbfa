//! Transition-system core
//!
//! A derivation starts from the initial [`State`] of a [`TransitionSystem`]
//! and repeatedly applies an [`Action`] (a scored [`Transition`]) until the
//! state is terminal. The dependency tree carried by the state is the result.
//!
//! Search and training drive derivations through an [`ExtendedState`], which
//! bundles the state with the input context, a [`ScoreAccumulator`] and an
//! optional [`Oracle`] tracking the gold tree.

pub mod accumulator;
pub mod action;
pub mod context;
pub mod extended;
pub mod kind;
pub mod oracle;
pub mod state;
pub mod system;

pub use accumulator::{AccumulatorKind, ScoreAccumulator};
pub use action::Action;
pub use context::{InputContext, ItemsContext, ItemsFactory};
pub use extended::ExtendedState;
pub use kind::{ActionKind, ArcAction, Dependency, TransitionKind};
pub use oracle::{GoldProgress, Oracle, OracleFactory};
pub use state::{StackBufferState, State};
pub use system::{Transition, TransitionSystem};
