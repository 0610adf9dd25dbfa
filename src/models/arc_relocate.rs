//! The ArcRelocate transition system
//!
//! ArcStandard extended with a Relocate transition that moves the second
//! stack element back to the front of the buffer. Reordering items this way
//! lets the system build non-projective trees.

use std::{collections::HashMap, fmt};

use super::{pop, remove_second, shift};
use crate::{
    Result,
    syntax::{DependencyTree, ItemId},
    transition::{
        Action, Dependency, GoldProgress, Oracle, OracleFactory, StackBufferState, Transition,
        TransitionKind, TransitionSystem,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArcRelocateTransition {
    Root,
    Shift,
    /// Move s1 to the front of the buffer.
    Relocate,
    /// s0 governs s1; s1 leaves the stack.
    ArcLeft,
    /// s1 governs s0; s0 leaves the stack.
    ArcRight,
}

impl fmt::Display for ArcRelocateTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.kind(), f)
    }
}

impl Transition for ArcRelocateTransition {
    type State = StackBufferState;

    fn kind(&self) -> TransitionKind {
        match self {
            ArcRelocateTransition::Root => TransitionKind::Root,
            ArcRelocateTransition::Shift => TransitionKind::Shift,
            ArcRelocateTransition::Relocate => TransitionKind::Relocate,
            ArcRelocateTransition::ArcLeft => TransitionKind::ArcLeft,
            ArcRelocateTransition::ArcRight => TransitionKind::ArcRight,
        }
    }

    fn priority(&self) -> u32 {
        match self {
            ArcRelocateTransition::Root => 0,
            ArcRelocateTransition::Shift => 1,
            ArcRelocateTransition::Relocate => 2,
            ArcRelocateTransition::ArcLeft => 3,
            ArcRelocateTransition::ArcRight => 4,
        }
    }

    fn is_allowed(&self, state: &StackBufferState) -> bool {
        match self {
            ArcRelocateTransition::Root => state.stack.len() == 1 && state.buffer.is_empty(),
            ArcRelocateTransition::Shift => !state.buffer.is_empty(),
            // only items still in input order may be swapped, which bounds
            // the number of relocations
            ArcRelocateTransition::Relocate => match (state.s0(), state.s1()) {
                (Some(s0), Some(s1)) => state.position(s1) < state.position(s0),
                _ => false,
            },
            ArcRelocateTransition::ArcLeft | ArcRelocateTransition::ArcRight => {
                state.stack.len() >= 2
            }
        }
    }

    fn dependency(&self, state: &StackBufferState) -> Option<Dependency> {
        match self {
            ArcRelocateTransition::Root => state.s0().map(|s0| Dependency {
                dependent: s0,
                governor: None,
            }),
            ArcRelocateTransition::Shift | ArcRelocateTransition::Relocate => None,
            ArcRelocateTransition::ArcLeft => Some(Dependency {
                dependent: state.s1()?,
                governor: Some(state.s0()?),
            }),
            ArcRelocateTransition::ArcRight => Some(Dependency {
                dependent: state.s0()?,
                governor: Some(state.s1()?),
            }),
        }
    }

    fn perform(&self, state: &mut StackBufferState) -> Result<()> {
        match self {
            ArcRelocateTransition::Root | ArcRelocateTransition::ArcRight => {
                pop(state, self).map(|_| ())
            }
            ArcRelocateTransition::Shift => shift(state, self),
            ArcRelocateTransition::Relocate => {
                let s1 = remove_second(state, self)?;
                state.buffer.push_front(s1);
                Ok(())
            }
            ArcRelocateTransition::ArcLeft => remove_second(state, self).map(|_| ()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ArcRelocate;

impl TransitionSystem for ArcRelocate {
    type State = StackBufferState;
    type Transition = ArcRelocateTransition;

    fn name(&self) -> &'static str {
        "arc-relocate"
    }

    fn candidate_transitions(&self, _state: &StackBufferState) -> Vec<ArcRelocateTransition> {
        vec![
            ArcRelocateTransition::Root,
            ArcRelocateTransition::Shift,
            ArcRelocateTransition::Relocate,
            ArcRelocateTransition::ArcLeft,
            ArcRelocateTransition::ArcRight,
        ]
    }
}

/// Position of every item in the in-order traversal of `gold`.
///
/// Reading the items in this order makes the gold tree projective.
pub fn projective_order(gold: &DependencyTree) -> HashMap<ItemId, usize> {
    fn visit(gold: &DependencyTree, node: ItemId, order: &mut HashMap<ItemId, usize>) {
        let position = gold.position(node);
        let (left, right): (Vec<ItemId>, Vec<ItemId>) = gold
            .dependents_of(node)
            .into_iter()
            .partition(|&dependent| gold.position(dependent) < position);

        for dependent in left {
            visit(gold, dependent, order);
        }
        let next = order.len();
        order.insert(node, next);
        for dependent in right {
            visit(gold, dependent, order);
        }
    }

    let mut order = HashMap::with_capacity(gold.len());
    for root in gold.roots() {
        visit(gold, root, &mut order);
    }
    order
}

/// Static oracle: ArcStandard's arc rules, then Relocate whenever the top
/// two items are out of projective order, then Shift.
#[derive(Debug, Clone)]
pub struct ArcRelocateOracle {
    progress: GoldProgress,
    order: HashMap<ItemId, usize>,
}

impl ArcRelocateOracle {
    pub fn new(gold: &DependencyTree) -> Result<Self> {
        Ok(Self {
            progress: GoldProgress::new(gold)?,
            order: projective_order(gold),
        })
    }

    pub fn is_gold_transition(
        &self,
        transition: ArcRelocateTransition,
        state: &StackBufferState,
    ) -> bool {
        if !transition.is_allowed(state) {
            return false;
        }
        match transition {
            ArcRelocateTransition::Root
            | ArcRelocateTransition::ArcLeft
            | ArcRelocateTransition::ArcRight => {
                transition.dependency(state).is_some_and(|dependency| {
                    self.progress
                        .is_gold_arc(dependency.dependent, dependency.governor)
                        && !self.progress.has_pending(dependency.dependent)
                })
            }
            ArcRelocateTransition::Relocate => {
                !self.any_gold_arc(state)
                    && match (state.s0(), state.s1()) {
                        (Some(s0), Some(s1)) => self.order.get(&s0) < self.order.get(&s1),
                        _ => false,
                    }
            }
            ArcRelocateTransition::Shift => {
                !self.any_gold_arc(state)
                    && !self.is_gold_transition(ArcRelocateTransition::Relocate, state)
            }
        }
    }

    fn any_gold_arc(&self, state: &StackBufferState) -> bool {
        self.is_gold_transition(ArcRelocateTransition::ArcLeft, state)
            || self.is_gold_transition(ArcRelocateTransition::ArcRight, state)
    }
}

impl Oracle<ArcRelocateTransition> for ArcRelocateOracle {
    fn is_correct(&self, action: &Action<ArcRelocateTransition>, state: &StackBufferState) -> bool {
        self.is_gold_transition(action.transition, state)
            && action
                .kind
                .arc()
                .is_none_or(|arc| self.progress.label_matches(arc))
    }

    fn update_with(
        &mut self,
        transition: &ArcRelocateTransition,
        state: &StackBufferState,
    ) -> Result<()> {
        if let Some(dependency) = transition.dependency(state) {
            self.progress.record_attachment(dependency.dependent);
        }
        Ok(())
    }

    fn box_clone(&self) -> Box<dyn Oracle<ArcRelocateTransition>> {
        Box::new(self.clone())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ArcRelocateOracleFactory;

impl OracleFactory<ArcRelocateTransition> for ArcRelocateOracleFactory {
    fn build(&self, gold: &DependencyTree) -> Result<Box<dyn Oracle<ArcRelocateTransition>>> {
        Ok(Box::new(ArcRelocateOracle::new(gold)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transition::State;

    fn crossing_gold() -> DependencyTree {
        // 0 root; 0 -> 2, 1 <- 3, 0 -> 3: arcs (0,2) and (3,1) cross
        DependencyTree::from_heads(&[0, 1, 2, 3], &[None, Some(3), Some(0), Some(0)], None)
            .unwrap()
    }

    #[test]
    fn relocate_moves_second_item_back_to_the_buffer() {
        let mut state = StackBufferState::new(&[0, 1, 2]);
        state.stack = vec![0, 1];
        state.buffer = [2].into_iter().collect();

        assert!(ArcRelocateTransition::Relocate.is_allowed(&state));
        ArcRelocateTransition::Relocate.perform(&mut state).unwrap();
        assert_eq!(state.stack, vec![1]);
        assert_eq!(state.buffer.iter().copied().collect::<Vec<_>>(), vec![0, 2]);

        // once swapped, the pair cannot be swapped back
        ArcRelocateTransition::Shift.perform(&mut state).unwrap();
        assert!(!ArcRelocateTransition::Relocate.is_allowed(&state));
    }

    #[test]
    fn projective_order_of_crossing_tree() {
        let order = projective_order(&crossing_gold());
        // in-order traversal: 0, 2, 1, 3
        assert_eq!(order[&0], 0);
        assert_eq!(order[&2], 1);
        assert_eq!(order[&1], 2);
        assert_eq!(order[&3], 3);
        assert!(!crossing_gold().is_projective());
    }

    #[test]
    fn oracle_relocates_out_of_order_pairs() {
        let oracle = ArcRelocateOracle::new(&crossing_gold()).unwrap();
        let mut state = StackBufferState::new(&[0, 1, 2, 3]);
        state.stack = vec![0, 1, 2];
        state.buffer = [3].into_iter().collect();

        // 2 precedes 1 in projective order
        assert!(oracle.is_gold_transition(ArcRelocateTransition::Relocate, &state));
        assert!(!oracle.is_gold_transition(ArcRelocateTransition::Shift, &state));
    }
}
