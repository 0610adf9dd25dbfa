//! Transitions and transition systems

use std::fmt;

use super::{Dependency, State, TransitionKind};
use crate::{Result, syntax::ItemId};

/// One transition of a system, evaluated against the system's state type.
///
/// Transitions are plain values: whatever they need from the state is read
/// when they are queried or performed. [`Transition::dependency`] must be
/// resolved before [`Transition::perform`] mutates the state.
pub trait Transition: Clone + fmt::Debug + fmt::Display + Send + Sync + 'static {
    type State: State;

    fn kind(&self) -> TransitionKind;

    /// Tie-break rank among equally scored actions. Lower wins.
    fn priority(&self) -> u32;

    /// Whether this transition can be performed on `state`.
    fn is_allowed(&self, state: &Self::State) -> bool;

    /// The dependency this transition creates on `state`, if it is an arc
    /// transition and the state can support it.
    fn dependency(&self, state: &Self::State) -> Option<Dependency>;

    /// Mutate the stack/buffer of `state`. Arcs are committed into the tree
    /// by the action applying this transition, not here.
    ///
    /// # Errors
    ///
    /// Fails only when the state physically cannot support the transition
    /// (e.g. popping an empty stack). `is_allowed` is not re-checked.
    fn perform(&self, state: &mut Self::State) -> Result<()>;
}

/// A transition system: a state type plus the transitions defined over it.
pub trait TransitionSystem: Send + Sync {
    type State: State;
    type Transition: Transition<State = Self::State>;

    /// Short name used in logs and reports.
    fn name(&self) -> &'static str;

    fn initial_state(&self, item_ids: &[ItemId]) -> Self::State {
        Self::State::new(item_ids)
    }

    /// Every transition of the system that may apply to `state`, in a fixed
    /// generation order, whether or not it is currently allowed.
    fn candidate_transitions(&self, state: &Self::State) -> Vec<Self::Transition>;

    /// The candidate transitions allowed on `state`. Empty on a terminal state.
    fn valid_transitions(&self, state: &Self::State) -> Vec<Self::Transition> {
        self.candidate_transitions(state)
            .into_iter()
            .filter(|transition| transition.is_allowed(state))
            .collect()
    }
}
