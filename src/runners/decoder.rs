//! Greedy inference

use log::{debug, trace};

use crate::{
    Error, Result,
    helpers::{ActionsGenerator, BestActionSelector, HighestScoreSelector, UnlabeledActionsGenerator},
    ports::ActionsScorer,
    syntax::{DependencyTree, ItemId},
    transition::{AccumulatorKind, ExtendedState, InputContext, Oracle, State, TransitionSystem},
};

/// Builds a tree by committing the selector's choice at every step.
pub struct SyntaxDecoder<S, M, C>
where
    S: TransitionSystem,
    M: ActionsScorer<S::Transition, C>,
    C: InputContext,
{
    system: S,
    scorer: M,
    generator: Box<dyn ActionsGenerator<S::Transition>>,
    selector: Box<dyn BestActionSelector<S::Transition, C>>,
    accumulator: AccumulatorKind,
}

impl<S, M, C> SyntaxDecoder<S, M, C>
where
    S: TransitionSystem,
    M: ActionsScorer<S::Transition, C>,
    C: InputContext,
{
    pub fn new(system: S, scorer: M) -> Self {
        Self {
            system,
            scorer,
            generator: Box::new(UnlabeledActionsGenerator),
            selector: Box::new(HighestScoreSelector),
            accumulator: AccumulatorKind::default(),
        }
    }

    pub fn with_generator(mut self, generator: Box<dyn ActionsGenerator<S::Transition>>) -> Self {
        self.generator = generator;
        self
    }

    pub fn with_selector(mut self, selector: Box<dyn BestActionSelector<S::Transition, C>>) -> Self {
        self.selector = selector;
        self
    }

    pub fn with_accumulator(mut self, accumulator: AccumulatorKind) -> Self {
        self.accumulator = accumulator;
        self
    }

    pub fn scorer(&self) -> &M {
        &self.scorer
    }

    pub fn decode(&mut self, item_ids: &[ItemId], context: C) -> Result<DependencyTree> {
        let extended = self.decode_extended(item_ids, context, None)?;
        Ok(extended.state.tree().clone())
    }

    /// Decode and return the terminal state with its history and score.
    ///
    /// An oracle, when given, is carried along and updated, which lets
    /// oracle-aware scorers drive the derivation.
    pub fn decode_extended(
        &mut self,
        item_ids: &[ItemId],
        context: C,
        oracle: Option<Box<dyn Oracle<S::Transition>>>,
    ) -> Result<ExtendedState<S::Transition, C>> {
        let mut extended = ExtendedState::new(
            self.system.initial_state(item_ids),
            context,
            self.accumulator,
            oracle,
        );

        while !extended.is_terminal() {
            let transitions = self.system.valid_transitions(&extended.state);
            if transitions.is_empty() {
                return Err(Error::NoValidTransitions {
                    state: extended.state.to_string(),
                });
            }
            let mut actions = self.generator.generate(transitions, &extended.state)?;
            self.scorer.score(&mut actions, &extended)?;

            let best = self.selector.select(&actions, &extended)?;
            let action = actions.swap_remove(best);
            trace!("{} -> {action}", extended.state);
            extended.commit(action)?;
        }

        debug!(
            "Decoded {} items with {} in {} steps, score {:.4}",
            item_ids.len(),
            self.system.name(),
            extended.applied_actions().len(),
            extended.score()
        );
        Ok(extended)
    }
}
