//! Branching derivations with extended states

mod common;

use syntaxdecoder::{
    models::{ArcHybridOracle, ArcHybridTransition, ArcSpine, ArcSpineTransition},
    transition::{
        AccumulatorKind, Action, ExtendedState, ItemsContext, StackBufferState, State,
        TransitionSystem,
    },
};

use common::projective_gold;

fn hybrid_root() -> ExtendedState<ArcHybridTransition, ItemsContext<String>> {
    let gold = projective_gold();
    let context = ItemsContext::build(gold.element_ids(), &|id: usize| format!("w{id}"));
    let oracle = ArcHybridOracle::new(&gold).unwrap();
    ExtendedState::new(
        StackBufferState::new(gold.element_ids()),
        context,
        AccumulatorKind::Sum,
        Some(Box::new(oracle)),
    )
}

fn shift(state: &StackBufferState, score: f64) -> Action<ArcHybridTransition> {
    Action::new(ArcHybridTransition::Shift, state, 0, score, None).unwrap()
}

#[test]
fn clones_evolve_independently() {
    let original = hybrid_root();
    let mut branch = original.clone();

    let action = shift(&branch.state, 0.5);
    branch.commit(action).unwrap();
    branch.context.items[0].push_str("-changed");

    assert_eq!(original.state.stack, Vec::<usize>::new());
    assert_eq!(original.state.buffer.len(), 4);
    assert!(original.applied_actions().is_empty());
    assert_eq!(original.score(), 0.0);
    assert_eq!(original.context.items[0], "w0");

    assert_eq!(branch.state.stack, vec![0]);
    assert_eq!(branch.applied_actions().len(), 1);
    assert_eq!(branch.score(), 0.5);
}

#[test]
fn successor_leaves_its_parent_untouched() {
    let root = hybrid_root();
    let first = root.successor(&shift(&root.state, 1.0)).unwrap();
    let second = first.successor(&shift(&first.state, 2.0)).unwrap();

    assert!(root.applied_actions().is_empty());
    assert_eq!(first.applied_actions().len(), 1);
    assert_eq!(second.applied_actions().len(), 2);
    assert_eq!(second.state.stack, vec![0, 1]);
    assert_eq!(second.score(), 3.0);
    assert_eq!(first.score(), 1.0);
}

#[test]
fn branches_keep_separate_oracles() {
    let root = hybrid_root();
    let on_gold = root.successor(&shift(&root.state, 0.0)).unwrap();

    // [0] | [1, 2, 3]: attaching 0 to 1 is gold, shifting loses that arc and
    // the root arc of 1
    let arc_left =
        Action::new(ArcHybridTransition::ArcLeft, &on_gold.state, 0, 0.0, None).unwrap();
    let shift_again = shift(&on_gold.state, 0.0);

    let oracle = on_gold.oracle.as_ref().unwrap();
    assert!(oracle.is_correct(&arc_left, &on_gold.state));
    assert!(!oracle.is_correct(&shift_again, &on_gold.state));

    let off_gold = on_gold.successor(&shift_again).unwrap();
    let branch_oracle = off_gold.oracle.as_ref().unwrap();
    let still_gold = on_gold.oracle.as_ref().unwrap();
    assert!(still_gold.is_correct(&arc_left, &on_gold.state));
    assert!(format!("{branch_oracle:?}").contains("accumulated_cost: 2"));
    assert!(format!("{still_gold:?}").contains("accumulated_cost: 0"));
}

#[test]
fn estimate_matches_commit() {
    let mut extended = hybrid_root();
    let action = shift(&extended.state, 0.25);

    let estimate = extended.estimate_future_score(&action).unwrap();
    assert_eq!(extended.score(), 0.0);

    extended.commit(action).unwrap();
    assert_eq!(extended.score(), estimate);
}

#[test]
fn spine_states_branch_like_stack_states() {
    let state = ArcSpine.initial_state(&[0, 1]);
    let extended: ExtendedState<ArcSpineTransition, ()> =
        ExtendedState::new(state, (), AccumulatorKind::Average, None);

    let first = extended
        .successor(&Action::new(ArcSpineTransition::Shift, &extended.state, 0, 1.0, None).unwrap())
        .unwrap();
    let second = first
        .successor(&Action::new(ArcSpineTransition::Shift, &first.state, 1, 3.0, None).unwrap())
        .unwrap();
    let arc = Action::new(ArcSpineTransition::ArcLeft(0), &second.state, 2, 2.0, None).unwrap();
    let done = second.successor(&arc).unwrap();

    assert_eq!(extended.state.buffer.len(), 2);
    assert_eq!(second.state.stack.len(), 2);
    assert_eq!(done.state.stack.len(), 1);
    assert_eq!(done.state.tree().governor(0), Some(1));
    assert_eq!(done.score(), 2.0);
}
