//! The ArcSpine transition system
//!
//! Stack elements are partial trees exposed through their left and right
//! spines, so a new arc can reach any node on the facing spine of the
//! neighbouring tree rather than only its root.

use std::{collections::VecDeque, fmt};

use crate::{
    Error, Result,
    syntax::{DependencyTree, ItemId},
    transition::{
        Action, Dependency, GoldProgress, Oracle, OracleFactory, State, Transition,
        TransitionKind, TransitionSystem,
    },
};

/// A partial tree on the stack.
///
/// Both spines start with the root: the left spine follows leftmost
/// dependents downwards, the right spine rightmost ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackElement {
    pub root: ItemId,
    pub left_spine: Vec<ItemId>,
    pub right_spine: Vec<ItemId>,
}

impl StackElement {
    pub fn new(root: ItemId) -> Self {
        Self {
            root,
            left_spine: vec![root],
            right_spine: vec![root],
        }
    }

    /// Keep the left spine up to index `k` and continue it with `elements`.
    pub fn add_to_left_spine(&mut self, k: usize, elements: &[ItemId]) {
        self.left_spine.truncate(k + 1);
        self.left_spine.extend_from_slice(elements);
    }

    /// Keep the right spine up to index `k` and continue it with `elements`.
    pub fn add_to_right_spine(&mut self, k: usize, elements: &[ItemId]) {
        self.right_spine.truncate(k + 1);
        self.right_spine.extend_from_slice(elements);
    }
}

impl fmt::Display for StackElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:?}, {:?})", self.left_spine, self.right_spine)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArcSpineState {
    item_ids: Vec<ItemId>,
    pub stack: Vec<StackElement>,
    pub buffer: VecDeque<ItemId>,
    tree: DependencyTree,
}

impl ArcSpineState {
    pub fn s0(&self) -> Option<&StackElement> {
        self.stack.last()
    }

    pub fn s1(&self) -> Option<&StackElement> {
        self.stack.len().checked_sub(2).map(|i| &self.stack[i])
    }
}

impl State for ArcSpineState {
    fn new(item_ids: &[ItemId]) -> Self {
        Self {
            item_ids: item_ids.to_vec(),
            stack: Vec::new(),
            buffer: item_ids.iter().copied().collect(),
            tree: DependencyTree::new(item_ids),
        }
    }

    fn item_ids(&self) -> &[ItemId] {
        &self.item_ids
    }

    fn tree(&self) -> &DependencyTree {
        &self.tree
    }

    fn tree_mut(&mut self) -> &mut DependencyTree {
        &mut self.tree
    }

    fn is_terminal(&self) -> bool {
        self.stack.is_empty() && self.buffer.is_empty()
    }
}

impl fmt::Display for ArcSpineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stack: Vec<String> = self.stack.iter().map(ToString::to_string).collect();
        write!(f, "S [{}] B {:?}", stack.join(", "), self.buffer)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArcSpineTransition {
    Root,
    Shift,
    /// The k-th node of s0's left spine governs the root of s1.
    ArcLeft(usize),
    /// The k-th node of s1's right spine governs the root of s0.
    ArcRight(usize),
}

impl fmt::Display for ArcSpineTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArcSpineTransition::ArcLeft(k) | ArcSpineTransition::ArcRight(k) => {
                write!(f, "{}({k})", self.kind())
            }
            _ => fmt::Display::fmt(&self.kind(), f),
        }
    }
}

impl Transition for ArcSpineTransition {
    type State = ArcSpineState;

    fn kind(&self) -> TransitionKind {
        match self {
            ArcSpineTransition::Root => TransitionKind::Root,
            ArcSpineTransition::Shift => TransitionKind::Shift,
            ArcSpineTransition::ArcLeft(_) => TransitionKind::ArcLeft,
            ArcSpineTransition::ArcRight(_) => TransitionKind::ArcRight,
        }
    }

    fn priority(&self) -> u32 {
        match self {
            ArcSpineTransition::Root => 0,
            ArcSpineTransition::Shift => 1,
            ArcSpineTransition::ArcLeft(_) => 2,
            ArcSpineTransition::ArcRight(_) => 3,
        }
    }

    fn is_allowed(&self, state: &ArcSpineState) -> bool {
        match *self {
            ArcSpineTransition::Root => state.stack.len() == 1 && state.buffer.is_empty(),
            ArcSpineTransition::Shift => !state.buffer.is_empty(),
            ArcSpineTransition::ArcLeft(k) => {
                state.s1().is_some() && state.s0().is_some_and(|s0| k < s0.left_spine.len())
            }
            ArcSpineTransition::ArcRight(k) => {
                state.s1().is_some_and(|s1| k < s1.right_spine.len())
            }
        }
    }

    fn dependency(&self, state: &ArcSpineState) -> Option<Dependency> {
        match *self {
            ArcSpineTransition::Root => state.s0().map(|s0| Dependency {
                dependent: s0.root,
                governor: None,
            }),
            ArcSpineTransition::Shift => None,
            ArcSpineTransition::ArcLeft(k) => Some(Dependency {
                dependent: state.s1()?.root,
                governor: Some(*state.s0()?.left_spine.get(k)?),
            }),
            ArcSpineTransition::ArcRight(k) => Some(Dependency {
                dependent: state.s0()?.root,
                governor: Some(*state.s1()?.right_spine.get(k)?),
            }),
        }
    }

    fn perform(&self, state: &mut ArcSpineState) -> Result<()> {
        let empty_stack = || Error::EmptyStack {
            transition: self.to_string(),
        };

        match *self {
            ArcSpineTransition::Root => {
                state.stack.pop().ok_or_else(empty_stack)?;
            }
            ArcSpineTransition::Shift => {
                let item = state.buffer.pop_front().ok_or_else(|| Error::EmptyBuffer {
                    transition: self.to_string(),
                })?;
                state.stack.push(StackElement::new(item));
            }
            ArcSpineTransition::ArcLeft(k) => {
                if state.stack.len() < 2 {
                    return Err(empty_stack());
                }
                let len = state.s0().map_or(0, |s0| s0.left_spine.len());
                if k >= len {
                    return Err(Error::SpineIndexOutOfRange { index: k, len });
                }
                let mut s0 = state.stack.pop().ok_or_else(empty_stack)?;
                let s1 = state.stack.pop().ok_or_else(empty_stack)?;
                s0.add_to_left_spine(k, &s1.left_spine);
                state.stack.push(s0);
            }
            ArcSpineTransition::ArcRight(k) => {
                if state.stack.len() < 2 {
                    return Err(empty_stack());
                }
                let len = state.s1().map_or(0, |s1| s1.right_spine.len());
                if k >= len {
                    return Err(Error::SpineIndexOutOfRange { index: k, len });
                }
                let s0 = state.stack.pop().ok_or_else(empty_stack)?;
                let s1 = state.stack.last_mut().ok_or_else(empty_stack)?;
                s1.add_to_right_spine(k, &s0.right_spine);
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ArcSpine;

impl TransitionSystem for ArcSpine {
    type State = ArcSpineState;
    type Transition = ArcSpineTransition;

    fn name(&self) -> &'static str {
        "arc-spine"
    }

    /// Root and Shift, then one ArcLeft per node of s0's left spine and one
    /// ArcRight per node of s1's right spine.
    fn candidate_transitions(&self, state: &ArcSpineState) -> Vec<ArcSpineTransition> {
        let mut transitions = vec![ArcSpineTransition::Root, ArcSpineTransition::Shift];

        if let (Some(s0), Some(s1)) = (state.s0(), state.s1()) {
            transitions.extend((0..s0.left_spine.len()).map(ArcSpineTransition::ArcLeft));
            transitions.extend((0..s1.right_spine.len()).map(ArcSpineTransition::ArcRight));
        }
        transitions
    }
}

/// Static oracle. Beyond the gold-head test, an arc is correct only when
/// the spine nodes it hides from later arcs need no further dependents.
#[derive(Debug, Clone)]
pub struct ArcSpineOracle {
    progress: GoldProgress,
}

impl ArcSpineOracle {
    pub fn new(gold: &DependencyTree) -> Result<Self> {
        Ok(Self {
            progress: GoldProgress::new(gold)?,
        })
    }

    pub fn is_gold_transition(&self, transition: ArcSpineTransition, state: &ArcSpineState) -> bool {
        if !transition.is_allowed(state) {
            return false;
        }
        match transition {
            ArcSpineTransition::Root => state
                .s0()
                .is_some_and(|s0| self.progress.is_gold_arc(s0.root, None)),
            ArcSpineTransition::Shift => !self.any_gold_arc(state),
            ArcSpineTransition::ArcLeft(k) => {
                let (Some(s0), Some(s1)) = (state.s0(), state.s1()) else {
                    return false;
                };
                self.progress.is_gold_arc(s1.root, Some(s0.left_spine[k]))
                    && s1
                        .right_spine
                        .iter()
                        .all(|&node| !self.progress.has_pending_right(node))
                    && s0.left_spine[k + 1..]
                        .iter()
                        .all(|&node| !self.progress.has_pending(node))
            }
            ArcSpineTransition::ArcRight(k) => {
                let (Some(s0), Some(s1)) = (state.s0(), state.s1()) else {
                    return false;
                };
                self.progress.is_gold_arc(s0.root, Some(s1.right_spine[k]))
                    && s0
                        .left_spine
                        .iter()
                        .all(|&node| !self.progress.has_pending_left(node))
                    && s1.right_spine[k + 1..]
                        .iter()
                        .all(|&node| !self.progress.has_pending(node))
            }
        }
    }

    fn any_gold_arc(&self, state: &ArcSpineState) -> bool {
        ArcSpine
            .candidate_transitions(state)
            .into_iter()
            .filter(|transition| {
                matches!(
                    transition,
                    ArcSpineTransition::ArcLeft(_) | ArcSpineTransition::ArcRight(_)
                )
            })
            .any(|transition| self.is_gold_transition(transition, state))
    }
}

impl Oracle<ArcSpineTransition> for ArcSpineOracle {
    fn is_correct(&self, action: &Action<ArcSpineTransition>, state: &ArcSpineState) -> bool {
        self.is_gold_transition(action.transition, state)
            && action
                .kind
                .arc()
                .is_none_or(|arc| self.progress.label_matches(arc))
    }

    fn update_with(&mut self, transition: &ArcSpineTransition, state: &ArcSpineState) -> Result<()> {
        if let Some(dependency) = transition.dependency(state) {
            self.progress.record_attachment(dependency.dependent);
        }
        Ok(())
    }

    fn box_clone(&self) -> Box<dyn Oracle<ArcSpineTransition>> {
        Box::new(self.clone())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ArcSpineOracleFactory;

impl OracleFactory<ArcSpineTransition> for ArcSpineOracleFactory {
    fn build(&self, gold: &DependencyTree) -> Result<Box<dyn Oracle<ArcSpineTransition>>> {
        Ok(Box::new(ArcSpineOracle::new(gold)?))
    }
}
