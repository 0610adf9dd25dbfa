//! Scorer port - abstraction for the model that ranks candidate actions
//!
//! The decoding and training loops never look inside the model: they hand
//! it the candidate actions of a step and read back the scores it wrote.

use crate::{
    Result,
    transition::{Action, ExtendedState, InputContext, Transition},
};

/// Assigns a score to every candidate action of a step.
///
/// # Examples
///
/// ```
/// use syntaxdecoder::{
///     models::ArcHybridTransition,
///     ports::ActionsScorer,
///     transition::{Action, ExtendedState},
/// };
///
/// /// Prefers transitions with a lower priority.
/// struct PriorityScorer;
///
/// impl ActionsScorer<ArcHybridTransition, ()> for PriorityScorer {
///     fn score(
///         &mut self,
///         actions: &mut [Action<ArcHybridTransition>],
///         _extended_state: &ExtendedState<ArcHybridTransition, ()>,
///     ) -> syntaxdecoder::Result<()> {
///         for action in actions.iter_mut() {
///             action.score = -(action.priority() as f64);
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait ActionsScorer<T: Transition, C: InputContext> {
    /// Write a score into every action of `actions`.
    ///
    /// `extended_state` is the derivation the actions were generated for;
    /// it must not be mutated.
    fn score(&mut self, actions: &mut [Action<T>], extended_state: &ExtendedState<T, C>)
    -> Result<()>;
}

/// A scorer that can learn from the errors assigned to its actions.
pub trait ActionsScorerTrainable<T: Transition, C: InputContext>: ActionsScorer<T, C> {
    /// Propagate the errors of the last scored actions back into the model.
    ///
    /// Only called on relevant steps. `propagate_to_input` asks the model to
    /// also propagate errors into its input representation.
    fn backward(&mut self, actions: &[Action<T>], propagate_to_input: bool) -> Result<()>;

    /// Signal the start of a new training step.
    ///
    /// # Default Implementation
    ///
    /// Does nothing.
    fn new_example(&mut self) {}
}
