//! Best-action selection

use std::cmp::Ordering;

use crate::{
    Error, Result,
    transition::{Action, ExtendedState, InputContext, Transition},
};

/// Indices of `actions` ordered by score (highest first), then priority
/// (lowest first). The sort is stable, so remaining ties keep generation
/// order.
pub fn sort_by_score_and_priority<T: Transition>(actions: &[Action<T>]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..actions.len()).collect();
    order.sort_by(|&a, &b| compare(&actions[a], &actions[b]));
    order
}

fn compare<T: Transition>(a: &Action<T>, b: &Action<T>) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.priority().cmp(&b.priority()))
}

/// Chooses the action to apply among the scored candidates of a step.
pub trait BestActionSelector<T: Transition, C: InputContext> {
    /// Index into `actions` of the selected action.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoActions`] when `actions` is empty.
    fn select(&self, actions: &[Action<T>], extended_state: &ExtendedState<T, C>)
    -> Result<usize>;
}

/// Greedy selection: highest score, ties broken by lowest priority, then
/// by generation order.
#[derive(Debug, Clone, Copy, Default)]
pub struct HighestScoreSelector;

impl<T: Transition, C: InputContext> BestActionSelector<T, C> for HighestScoreSelector {
    fn select(
        &self,
        actions: &[Action<T>],
        _extended_state: &ExtendedState<T, C>,
    ) -> Result<usize> {
        (0..actions.len())
            .min_by(|&a, &b| compare(&actions[a], &actions[b]))
            .ok_or(Error::NoActions)
    }
}
