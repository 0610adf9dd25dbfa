//! Common test utilities for the syntaxdecoder test suite.
//!
//! This module provides gold tree fixtures and scorers used across multiple tests.

#![allow(dead_code)]

use std::collections::HashMap;

use rand::{SeedableRng, rngs::StdRng, seq::IndexedRandom};
use syntaxdecoder::{
    DependencyTree, Deprel, ItemId,
    ports::{ActionsScorer, ActionsScorerTrainable},
    transition::{Action, ExtendedState, InputContext, State, Transition, TransitionSystem},
};

/// `0 <- 1 -> 3 -> 2`, rooted at 1.
pub fn projective_gold() -> DependencyTree {
    DependencyTree::from_heads(&[0, 1, 2, 3], &[Some(1), None, Some(3), Some(1)], None)
        .expect("valid gold tree")
}

/// [`projective_gold`] with dependency labels.
pub fn labeled_projective_gold() -> DependencyTree {
    let labels: Vec<Deprel> = ["nsubj", "root", "det", "obj"]
        .into_iter()
        .map(Deprel::from)
        .collect();
    DependencyTree::from_heads(
        &[0, 1, 2, 3],
        &[Some(1), None, Some(3), Some(1)],
        Some(&labels),
    )
    .expect("valid gold tree")
}

/// A seven item projective tree rooted at 3 with dependents on both sides.
pub fn wide_projective_gold() -> DependencyTree {
    DependencyTree::from_heads(
        &[0, 1, 2, 3, 4, 5, 6],
        &[Some(1), Some(3), Some(3), None, Some(5), Some(3), Some(5)],
        None,
    )
    .expect("valid gold tree")
}

/// The arc 3 -> 1 crosses the arc 0 -> 2.
pub fn non_projective_gold() -> DependencyTree {
    DependencyTree::from_heads(
        &[0, 1, 2, 3],
        &[None, Some(3), Some(0), Some(0)],
        None,
    )
    .expect("valid gold tree")
}

/// Heads of a tree in element order, for compact assertions.
pub fn heads(tree: &DependencyTree) -> Vec<Option<ItemId>> {
    tree.element_ids()
        .iter()
        .map(|&id| tree.governor(id))
        .collect()
}

/// Gives every action the same score and records what it is asked to learn.
#[derive(Debug, Default)]
pub struct ConstantScorer {
    pub score: f64,
    pub new_examples: usize,
    /// Transitions and errors of the supervised actions of every relevant step.
    pub updates: Vec<Vec<(String, f64)>>,
    pub propagated: Vec<bool>,
}

impl<T: Transition, C: InputContext> ActionsScorer<T, C> for ConstantScorer {
    fn score(
        &mut self,
        actions: &mut [Action<T>],
        _extended_state: &ExtendedState<T, C>,
    ) -> syntaxdecoder::Result<()> {
        for action in actions.iter_mut() {
            action.score = self.score;
        }
        Ok(())
    }
}

impl<T: Transition, C: InputContext> ActionsScorerTrainable<T, C> for ConstantScorer {
    fn backward(
        &mut self,
        actions: &[Action<T>],
        propagate_to_input: bool,
    ) -> syntaxdecoder::Result<()> {
        self.updates.push(
            actions
                .iter()
                .filter_map(|action| action.error.map(|e| (action.transition.to_string(), e)))
                .collect(),
        );
        self.propagated.push(propagate_to_input);
        Ok(())
    }

    fn new_example(&mut self) {
        self.new_examples += 1;
    }
}

/// A perceptron with one weight per transition name.
#[derive(Debug)]
pub struct TransitionWeights {
    pub weights: HashMap<String, f64>,
    pub learning_rate: f64,
}

impl TransitionWeights {
    pub fn new(learning_rate: f64) -> Self {
        Self {
            weights: HashMap::new(),
            learning_rate,
        }
    }

    pub fn weight(&self, transition: &str) -> f64 {
        self.weights.get(transition).copied().unwrap_or(0.0)
    }
}

impl<T: Transition, C: InputContext> ActionsScorer<T, C> for TransitionWeights {
    fn score(
        &mut self,
        actions: &mut [Action<T>],
        _extended_state: &ExtendedState<T, C>,
    ) -> syntaxdecoder::Result<()> {
        for action in actions.iter_mut() {
            action.score = self.weight(&action.transition.to_string());
        }
        Ok(())
    }
}

impl<T: Transition, C: InputContext> ActionsScorerTrainable<T, C> for TransitionWeights {
    fn backward(
        &mut self,
        actions: &[Action<T>],
        _propagate_to_input: bool,
    ) -> syntaxdecoder::Result<()> {
        for action in actions {
            if let Some(error) = action.error {
                *self
                    .weights
                    .entry(action.transition.to_string())
                    .or_insert(0.0) -= self.learning_rate * error;
            }
        }
        Ok(())
    }
}

/// Apply random valid transitions until the state is terminal.
pub fn random_walk<S: TransitionSystem>(system: &S, n: usize, seed: u64) -> S::State {
    let mut rng = StdRng::seed_from_u64(seed);
    let ids: Vec<ItemId> = (0..n).collect();
    let mut state = system.initial_state(&ids);
    let max_steps = 4 * (n + 1) * (n + 1);

    for _ in 0..max_steps {
        if state.is_terminal() {
            return state;
        }
        let transitions = system.valid_transitions(&state);
        let transition = transitions
            .choose(&mut rng)
            .unwrap_or_else(|| panic!("{} is stuck on {state}", system.name()))
            .clone();
        let action = Action::new(transition, &state, 0, 0.0, None).unwrap();
        action.apply(&mut state).unwrap();
    }
    panic!("{} did not terminate on {n} items", system.name());
}
