//! The ArcHybrid dynamic oracle against an exhaustive search

mod common;

use std::collections::HashMap;

use proptest::prelude::*;
use rand::{SeedableRng, rngs::StdRng, seq::IndexedRandom};
use syntaxdecoder::{
    DependencyTree, ItemId,
    models::{ArcHybrid, ArcHybridOracle, ArcHybridTransition, ArcStandard},
    transition::{Action, Oracle, StackBufferState, State, Transition, TransitionSystem},
};

use common::{heads, random_walk};

type Configuration = (Vec<ItemId>, Vec<ItemId>);

/// Most gold arcs any continuation of `state` can still build.
fn best_gain(
    state: &StackBufferState,
    gold: &DependencyTree,
    memo: &mut HashMap<Configuration, usize>,
) -> usize {
    if state.is_terminal() {
        return 0;
    }
    let key: Configuration = (state.stack.clone(), state.buffer.iter().copied().collect());
    if let Some(&best) = memo.get(&key) {
        return best;
    }

    let best = ArcHybrid
        .valid_transitions(state)
        .into_iter()
        .map(|transition| {
            let (gain, next) = step(transition, state, gold);
            gain + best_gain(&next, gold, memo)
        })
        .max()
        .unwrap_or(0);
    memo.insert(key, best);
    best
}

fn step(
    transition: ArcHybridTransition,
    state: &StackBufferState,
    gold: &DependencyTree,
) -> (usize, StackBufferState) {
    let gain = transition.dependency(state).is_some_and(|dependency| {
        gold.attachment(dependency.dependent)
            .is_some_and(|attachment| attachment.governor == dependency.governor)
    });
    let mut next = state.clone();
    transition.perform(&mut next).unwrap();
    (usize::from(gain), next)
}

/// Walks ArcHybrid at random over `gold`, checking every candidate against
/// the exhaustive search. Returns the number of checked actions.
fn check_walk(gold: &DependencyTree, seed: u64) -> usize {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut memo = HashMap::new();
    let mut oracle = ArcHybridOracle::new(gold).unwrap();
    let mut state = ArcHybrid.initial_state(gold.element_ids());
    let mut checked = 0;

    while !state.is_terminal() {
        let best = best_gain(&state, gold, &mut memo);
        let transitions = ArcHybrid.valid_transitions(&state);

        let mut any_correct = false;
        for &transition in &transitions {
            let action = Action::new(transition, &state, 0, 0.0, None).unwrap();
            let (gain, next) = step(transition, &state, gold);
            let optimal = gain + best_gain(&next, gold, &mut memo) == best;

            assert_eq!(
                oracle.is_correct(&action, &state),
                optimal,
                "{transition} on {state} with gold {gold}"
            );
            any_correct |= optimal;
            checked += 1;
        }
        assert!(any_correct, "no correct action on {state} with gold {gold}");

        let transition = *transitions.choose(&mut rng).unwrap();
        oracle.update_with(&transition, &state).unwrap();
        Action::new(transition, &state, 0, 0.0, None)
            .unwrap()
            .apply(&mut state)
            .unwrap();
    }

    // every lost arc was charged exactly once
    let built = heads(state.tree())
        .iter()
        .zip(heads(gold))
        .filter(|(built, expected)| **built == *expected)
        .count();
    assert_eq!(oracle.accumulated_cost(), gold.len() - built);
    checked
}

#[test]
fn derivation_that_buries_the_root_stays_supervised() {
    // 2 <- 0, 0 <- 1, root 2, 2 <- 3
    let gold =
        DependencyTree::from_heads(&[0, 1, 2, 3], &[Some(2), Some(0), None, Some(2)], None)
            .unwrap();
    for seed in 0..32 {
        assert!(check_walk(&gold, seed) > 0);
    }
}

proptest! {
    #[test]
    fn costs_match_exhaustive_search(
        n in 1usize..7,
        gold_seed in any::<u64>(),
        walk_seed in any::<u64>(),
    ) {
        let gold = random_walk(&ArcStandard, n, gold_seed).tree().clone();
        prop_assume!(gold.is_projective());
        check_walk(&gold, walk_seed);
    }
}
