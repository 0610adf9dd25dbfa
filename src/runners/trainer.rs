//! Supervised derivations against gold trees

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    helpers::{
        ActionsErrorsSetter, ActionsGenerator, BestActionSelector, HighestScoreSelector,
        HingeLossErrorsSetter, UnlabeledActionsGenerator,
    },
    ports::ActionsScorerTrainable,
    syntax::{DependencyTree, ItemId},
    transition::{
        AccumulatorKind, Action, ExtendedState, InputContext, OracleFactory, State,
        TransitionSystem,
    },
};

/// Step counters of a trainer, cumulative over every `learn` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainerStats {
    pub derivations: usize,
    pub steps: usize,
    pub relevant_steps: usize,
}

/// Runs derivations under oracle supervision, training the scorer on the
/// steps where it ranks a wrong action too close to (or above) a right one.
///
/// Each step scores the valid actions, assigns hinge-loss errors against the
/// oracle, back-propagates relevant errors into the scorer, then commits the
/// action the selector picks. The oracle is updated with every committed
/// transition, so training follows the scorer's own choices rather than
/// the gold path.
pub struct ActionsScorerTrainer<S, M, C>
where
    S: TransitionSystem,
    M: ActionsScorerTrainable<S::Transition, C>,
    C: InputContext,
{
    system: S,
    scorer: M,
    oracle_factory: Box<dyn OracleFactory<S::Transition>>,
    generator: Box<dyn ActionsGenerator<S::Transition>>,
    errors_setter: Box<dyn ActionsErrorsSetter<S::Transition, C>>,
    selector: Box<dyn BestActionSelector<S::Transition, C>>,
    accumulator: AccumulatorKind,
    stats: TrainerStats,
}

impl<S, M, C> ActionsScorerTrainer<S, M, C>
where
    S: TransitionSystem,
    M: ActionsScorerTrainable<S::Transition, C>,
    C: InputContext,
{
    /// Create a trainer with unlabeled actions, hinge loss at threshold 1.0,
    /// greedy selection and a summed derivation score.
    pub fn new(system: S, scorer: M, oracle_factory: Box<dyn OracleFactory<S::Transition>>) -> Self {
        Self {
            system,
            scorer,
            oracle_factory,
            generator: Box::new(UnlabeledActionsGenerator),
            errors_setter: Box::new(HingeLossErrorsSetter::default()),
            selector: Box::new(HighestScoreSelector),
            accumulator: AccumulatorKind::default(),
            stats: TrainerStats::default(),
        }
    }

    pub fn with_generator(mut self, generator: Box<dyn ActionsGenerator<S::Transition>>) -> Self {
        self.generator = generator;
        self
    }

    pub fn with_errors_setter(
        mut self,
        errors_setter: Box<dyn ActionsErrorsSetter<S::Transition, C>>,
    ) -> Self {
        self.errors_setter = errors_setter;
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

    pub fn system(&self) -> &S {
        &self.system
    }

    pub fn scorer(&self) -> &M {
        &self.scorer
    }

    pub fn scorer_mut(&mut self) -> &mut M {
        &mut self.scorer
    }

    pub fn into_scorer(self) -> M {
        self.scorer
    }

    pub fn stats(&self) -> TrainerStats {
        self.stats
    }

    /// Derive a tree over `item_ids` while learning from `gold`.
    ///
    /// Returns the tree built by the derivation, which differs from `gold`
    /// wherever the scorer overruled the oracle.
    pub fn learn(
        &mut self,
        item_ids: &[ItemId],
        context: C,
        gold: &DependencyTree,
        propagate_to_input: bool,
    ) -> Result<DependencyTree> {
        self.learn_with(item_ids, context, gold, propagate_to_input, |_, _| Ok(()))
    }

    /// Like [`ActionsScorerTrainer::learn`], calling `before_apply` with each
    /// selected action and the state it is about to be applied to.
    pub fn learn_with<F>(
        &mut self,
        item_ids: &[ItemId],
        context: C,
        gold: &DependencyTree,
        propagate_to_input: bool,
        mut before_apply: F,
    ) -> Result<DependencyTree>
    where
        F: FnMut(&Action<S::Transition>, &ExtendedState<S::Transition, C>) -> Result<()>,
    {
        let oracle = self.oracle_factory.build(gold)?;
        let mut extended = ExtendedState::new(
            self.system.initial_state(item_ids),
            context,
            self.accumulator,
            Some(oracle),
        );
        debug!(
            "Learning {} items with {}",
            item_ids.len(),
            self.system.name()
        );

        let mut steps = 0;
        let mut relevant_steps = 0;

        while !extended.is_terminal() {
            self.scorer.new_example();

            let transitions = self.system.valid_transitions(&extended.state);
            if transitions.is_empty() {
                return Err(Error::NoValidTransitions {
                    state: extended.state.to_string(),
                });
            }
            let mut actions = self.generator.generate(transitions, &extended.state)?;

            self.scorer.score(&mut actions, &extended)?;
            if self.errors_setter.assign_errors(&mut actions, &extended)? {
                self.scorer.backward(&actions, propagate_to_input)?;
                relevant_steps += 1;
            }

            let best = self.selector.select(&actions, &extended)?;
            let action = actions.swap_remove(best);
            trace!("{} -> {action}", extended.state);

            before_apply(&action, &extended)?;
            extended.commit(action)?;
            steps += 1;
        }

        self.stats.derivations += 1;
        self.stats.steps += steps;
        self.stats.relevant_steps += relevant_steps;
        debug!(
            "Derivation done in {steps} steps ({relevant_steps} relevant), score {:.4}",
            extended.score()
        );

        Ok(extended.state.tree().clone())
    }
}
