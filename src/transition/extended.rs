//! State bundle used by search and training

use std::fmt;

use log::trace;

use super::{AccumulatorKind, Action, InputContext, Oracle, ScoreAccumulator, State, Transition};
use crate::Result;

/// A state together with everything needed to continue its derivation.
///
/// Branching an `ExtendedState` (via [`ExtendedState::clone_with`] or
/// [`ExtendedState::successor`]) deep-copies the context, the accumulator
/// and the oracle, so the branches evolve independently.
pub struct ExtendedState<T: Transition, C: InputContext> {
    pub state: T::State,
    pub context: C,
    pub accumulator: ScoreAccumulator,
    pub oracle: Option<Box<dyn Oracle<T>>>,
    applied_actions: Vec<Action<T>>,
}

impl<T: Transition, C: InputContext> ExtendedState<T, C> {
    pub fn new(
        state: T::State,
        context: C,
        accumulator: AccumulatorKind,
        oracle: Option<Box<dyn Oracle<T>>>,
    ) -> Self {
        Self {
            state,
            context,
            accumulator: ScoreAccumulator::new(accumulator),
            oracle,
            applied_actions: Vec::new(),
        }
    }

    /// A copy of this bundle around `state`, with the history carried over.
    pub fn clone_with(&self, state: T::State) -> Self {
        Self {
            state,
            context: self.context.clone(),
            accumulator: self.accumulator.clone(),
            oracle: self.oracle.clone(),
            applied_actions: self.applied_actions.clone(),
        }
    }

    /// Actions committed so far, oldest first.
    pub fn applied_actions(&self) -> &[Action<T>] {
        &self.applied_actions
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// The accumulated score of the derivation.
    pub fn score(&self) -> f64 {
        self.accumulator.current()
    }

    /// Record an already applied action and accumulate its score.
    pub fn add_action(&mut self, action: Action<T>) -> Result<()> {
        self.accumulator.accumulate(action.score)?;
        self.applied_actions.push(action);
        Ok(())
    }

    /// The derivation score if `action` were committed next.
    pub fn estimate_future_score(&self, action: &Action<T>) -> Result<f64> {
        self.accumulator.estimate(action.score)
    }

    /// Update the oracle, apply `action` to the state and record it.
    pub fn commit(&mut self, action: Action<T>) -> Result<()> {
        trace!("Committing {action} on {}", self.state);

        if let Some(oracle) = self.oracle.as_mut() {
            oracle.update_with(&action.transition, &self.state)?;
        }
        action.apply(&mut self.state)?;
        self.add_action(action)
    }

    /// A new branch in which `action` has been committed. `self` is untouched.
    pub fn successor(&self, action: &Action<T>) -> Result<Self> {
        let mut next = self.clone_with(self.state.clone());
        next.commit(action.clone())?;
        Ok(next)
    }
}

impl<T: Transition, C: InputContext> Clone for ExtendedState<T, C> {
    fn clone(&self) -> Self {
        self.clone_with(self.state.clone())
    }
}

impl<T: Transition, C: InputContext> fmt::Debug for ExtendedState<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtendedState")
            .field("state", &self.state)
            .field("accumulator", &self.accumulator)
            .field("oracle", &self.oracle)
            .field("applied_actions", &self.applied_actions.len())
            .finish()
    }
}
