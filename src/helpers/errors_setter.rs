//! Training errors for scored actions

use log::warn;

use super::sort_by_score_and_priority;
use crate::{
    Error, Result,
    transition::{Action, ExtendedState, InputContext, Transition},
};

/// Compares scored actions against the oracle and writes training errors.
pub trait ActionsErrorsSetter<T: Transition, C: InputContext> {
    /// Assign errors to `actions`. Returns whether the step is relevant,
    /// i.e. whether the scorer should learn from it.
    fn assign_errors(
        &self,
        actions: &mut [Action<T>],
        extended_state: &ExtendedState<T, C>,
    ) -> Result<bool>;
}

/// Hinge loss between the best correct and the best incorrect action.
///
/// When the correct action does not beat the incorrect one by at least
/// `threshold`, the correct action gets error `-1` and the incorrect one
/// `+1`. Every other action keeps no error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HingeLossErrorsSetter {
    pub threshold: f64,
}

impl HingeLossErrorsSetter {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }
}

impl Default for HingeLossErrorsSetter {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl<T: Transition, C: InputContext> ActionsErrorsSetter<T, C> for HingeLossErrorsSetter {
    fn assign_errors(
        &self,
        actions: &mut [Action<T>],
        extended_state: &ExtendedState<T, C>,
    ) -> Result<bool> {
        if actions.is_empty() {
            return Err(Error::NoActions);
        }
        let oracle = extended_state.oracle.as_ref().ok_or(Error::MissingOracle)?;

        if actions.len() == 1 {
            return Ok(false);
        }

        let state = &extended_state.state;
        let ranked = sort_by_score_and_priority(actions);
        let best_correct = ranked
            .iter()
            .copied()
            .find(|&i| oracle.is_correct(&actions[i], state));
        let best_incorrect = ranked
            .iter()
            .copied()
            .find(|&i| !oracle.is_correct(&actions[i], state));

        let (Some(correct), Some(incorrect)) = (best_correct, best_incorrect) else {
            warn!(
                "No {} action among {} candidates on {state}, skipping supervision",
                if best_correct.is_none() { "correct" } else { "incorrect" },
                actions.len()
            );
            return Ok(false);
        };

        if actions[correct].score - actions[incorrect].score < self.threshold {
            actions[correct].error = Some(-1.0);
            actions[incorrect].error = Some(1.0);
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{ArcHybridOracle, ArcHybridTransition},
        syntax::DependencyTree,
        transition::{AccumulatorKind, StackBufferState, State},
    };

    // gold: 0 <- 1, root 1; state: [0] | [1]
    fn setup() -> (
        ExtendedState<ArcHybridTransition, ()>,
        Vec<Action<ArcHybridTransition>>,
    ) {
        let gold = DependencyTree::from_heads(&[0, 1], &[Some(1), None], None).unwrap();
        let mut state = StackBufferState::new(&[0, 1]);
        state.stack = vec![0];
        state.buffer = [1].into_iter().collect();

        let actions = vec![
            Action::new(ArcHybridTransition::Shift, &state, 0, 0.0, None).unwrap(),
            Action::new(ArcHybridTransition::ArcLeft, &state, 1, 0.0, None).unwrap(),
        ];
        let oracle = ArcHybridOracle::new(&gold).unwrap();
        let extended = ExtendedState::new(state, (), AccumulatorKind::Sum, Some(Box::new(oracle)));
        (extended, actions)
    }

    #[test]
    fn wide_margin_is_irrelevant() {
        let (extended, mut actions) = setup();
        actions[1].score = 2.0; // correct
        actions[0].score = 0.9; // incorrect

        let relevant = HingeLossErrorsSetter::default()
            .assign_errors(&mut actions, &extended)
            .unwrap();
        assert!(!relevant);
        assert!(actions.iter().all(|action| action.error.is_none()));
    }

    #[test]
    fn narrow_margin_assigns_opposite_errors() {
        let (extended, mut actions) = setup();
        actions[1].score = 2.0;
        actions[0].score = 1.5;

        let relevant = HingeLossErrorsSetter::default()
            .assign_errors(&mut actions, &extended)
            .unwrap();
        assert!(relevant);
        assert_eq!(actions[1].error, Some(-1.0));
        assert_eq!(actions[0].error, Some(1.0));
    }

    #[test]
    fn single_action_is_never_relevant() {
        let (extended, mut actions) = setup();
        actions.truncate(1);
        let relevant = HingeLossErrorsSetter::default()
            .assign_errors(&mut actions, &extended)
            .unwrap();
        assert!(!relevant);
    }

    #[test]
    fn all_correct_candidates_skip_supervision() {
        // root 0, 0 -> 1, 0 -> 3, 3 -> 2; state: [0, 1] | [2, 3]
        let gold =
            DependencyTree::from_heads(&[0, 1, 2, 3], &[None, Some(0), Some(3), Some(0)], None)
                .unwrap();
        let mut state = StackBufferState::new(&[0, 1, 2, 3]);
        state.stack = vec![0, 1];
        state.buffer = [2, 3].into_iter().collect();

        // attaching 1 now or after 2 is gone loses nothing
        let mut actions = vec![
            Action::new(ArcHybridTransition::Shift, &state, 0, 0.5, None).unwrap(),
            Action::new(ArcHybridTransition::ArcRight, &state, 1, 0.0, None).unwrap(),
        ];
        let oracle = ArcHybridOracle::new(&gold).unwrap();
        let extended = ExtendedState::new(state, (), AccumulatorKind::Sum, Some(Box::new(oracle)));

        let relevant = HingeLossErrorsSetter::default()
            .assign_errors(&mut actions, &extended)
            .unwrap();
        assert!(!relevant);
        assert!(actions.iter().all(|action| action.error.is_none()));
    }

    #[test]
    fn missing_oracle_is_an_error() {
        let (mut extended, mut actions) = setup();
        extended.oracle = None;
        assert!(matches!(
            HingeLossErrorsSetter::default().assign_errors(&mut actions, &extended),
            Err(Error::MissingOracle)
        ));
    }
}
