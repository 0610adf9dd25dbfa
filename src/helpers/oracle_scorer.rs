//! A scorer that replays the oracle

use crate::{
    Error, Result,
    ports::{ActionsScorer, ActionsScorerTrainable},
    transition::{Action, ExtendedState, InputContext, Transition},
};

/// Scores oracle-correct actions with `correct` and the others with
/// `incorrect`, so greedy decoding follows the gold tree whenever the
/// transition system can reach it.
///
/// Useful to measure how much of a treebank a system covers, and as a
/// stand-in model in tests. It has no parameters, so `backward` only counts
/// the updates it was asked for.
#[derive(Debug, Clone, PartialEq)]
pub struct OracleScorer {
    pub correct: f64,
    pub incorrect: f64,
    updates: usize,
}

impl OracleScorer {
    pub fn new(correct: f64, incorrect: f64) -> Self {
        Self {
            correct,
            incorrect,
            updates: 0,
        }
    }

    /// Number of relevant steps reported through `backward`.
    pub fn updates(&self) -> usize {
        self.updates
    }
}

impl Default for OracleScorer {
    fn default() -> Self {
        Self::new(1.0, 0.0)
    }
}

impl<T: Transition, C: InputContext> ActionsScorer<T, C> for OracleScorer {
    fn score(
        &mut self,
        actions: &mut [Action<T>],
        extended_state: &ExtendedState<T, C>,
    ) -> Result<()> {
        let oracle = extended_state.oracle.as_ref().ok_or(Error::MissingOracle)?;
        for action in actions.iter_mut() {
            action.score = if oracle.is_correct(action, &extended_state.state) {
                self.correct
            } else {
                self.incorrect
            };
        }
        Ok(())
    }
}

impl<T: Transition, C: InputContext> ActionsScorerTrainable<T, C> for OracleScorer {
    fn backward(&mut self, _actions: &[Action<T>], _propagate_to_input: bool) -> Result<()> {
        self.updates += 1;
        Ok(())
    }
}
