//! The ArcHybrid transition system
//!
//! Left arcs attach the top of the stack to the front of the buffer, right
//! arcs attach it to the element below it. Training uses a dynamic oracle:
//! an action is correct when it loses no gold arc that is still reachable.

use std::fmt;

use super::{pop, shift};
use crate::{
    Result,
    syntax::{DependencyTree, ItemId},
    transition::{
        Action, Dependency, GoldProgress, Oracle, OracleFactory, StackBufferState, Transition,
        TransitionKind, TransitionSystem,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArcHybridTransition {
    Root,
    Shift,
    /// b0 governs s0; s0 leaves the stack.
    ArcLeft,
    /// s1 governs s0; s0 leaves the stack.
    ArcRight,
}

impl fmt::Display for ArcHybridTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.kind(), f)
    }
}

impl Transition for ArcHybridTransition {
    type State = StackBufferState;

    fn kind(&self) -> TransitionKind {
        match self {
            ArcHybridTransition::Root => TransitionKind::Root,
            ArcHybridTransition::Shift => TransitionKind::Shift,
            ArcHybridTransition::ArcLeft => TransitionKind::ArcLeft,
            ArcHybridTransition::ArcRight => TransitionKind::ArcRight,
        }
    }

    fn priority(&self) -> u32 {
        match self {
            ArcHybridTransition::Root => 0,
            ArcHybridTransition::Shift => 1,
            ArcHybridTransition::ArcLeft => 2,
            ArcHybridTransition::ArcRight => 3,
        }
    }

    fn is_allowed(&self, state: &StackBufferState) -> bool {
        match self {
            ArcHybridTransition::Root => state.stack.len() == 1 && state.buffer.is_empty(),
            ArcHybridTransition::Shift => !state.buffer.is_empty(),
            ArcHybridTransition::ArcLeft => !state.stack.is_empty() && !state.buffer.is_empty(),
            ArcHybridTransition::ArcRight => state.stack.len() >= 2,
        }
    }

    fn dependency(&self, state: &StackBufferState) -> Option<Dependency> {
        match self {
            ArcHybridTransition::Root => state.s0().map(|s0| Dependency {
                dependent: s0,
                governor: None,
            }),
            ArcHybridTransition::Shift => None,
            ArcHybridTransition::ArcLeft => Some(Dependency {
                dependent: state.s0()?,
                governor: Some(state.b0()?),
            }),
            ArcHybridTransition::ArcRight => Some(Dependency {
                dependent: state.s0()?,
                governor: Some(state.s1()?),
            }),
        }
    }

    fn perform(&self, state: &mut StackBufferState) -> Result<()> {
        match self {
            ArcHybridTransition::Shift => shift(state, self),
            _ => pop(state, self).map(|_| ()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ArcHybrid;

impl TransitionSystem for ArcHybrid {
    type State = StackBufferState;
    type Transition = ArcHybridTransition;

    fn name(&self) -> &'static str {
        "arc-hybrid"
    }

    fn candidate_transitions(&self, _state: &StackBufferState) -> Vec<ArcHybridTransition> {
        vec![
            ArcHybridTransition::Root,
            ArcHybridTransition::Shift,
            ArcHybridTransition::ArcLeft,
            ArcHybridTransition::ArcRight,
        ]
    }
}

/// Dynamic oracle over the arc-decomposable cost of each transition.
#[derive(Debug, Clone)]
pub struct ArcHybridOracle {
    progress: GoldProgress,
    accumulated_cost: usize,
}

impl ArcHybridOracle {
    pub fn new(gold: &DependencyTree) -> Result<Self> {
        Ok(Self {
            progress: GoldProgress::new(gold)?,
            accumulated_cost: 0,
        })
    }

    /// Gold arcs lost by the transitions committed so far.
    pub fn accumulated_cost(&self) -> usize {
        self.accumulated_cost
    }

    fn gold_head(&self, id: ItemId) -> Option<Option<ItemId>> {
        self.progress
            .gold()
            .attachment(id)
            .map(|attachment| attachment.governor)
    }

    fn gold_dependents_in<'a>(
        &self,
        governor: ItemId,
        items: impl IntoIterator<Item = &'a ItemId>,
    ) -> usize {
        items
            .into_iter()
            .filter(|&&item| self.gold_head(item) == Some(Some(governor)))
            .count()
    }

    /// Number of reachable gold arcs `transition` makes unreachable on
    /// `state`, or `None` when the transition is not allowed.
    ///
    /// The root arc of the gold root stays reachable only while that item
    /// is in the buffer or at the bottom of the stack. Costs are exact for
    /// projective gold trees.
    pub fn cost(&self, transition: ArcHybridTransition, state: &StackBufferState) -> Option<usize> {
        if !transition.is_allowed(state) {
            return None;
        }

        let cost = match transition {
            // Root is the only legal move left, nothing else is reachable.
            ArcHybridTransition::Root => 0,
            ArcHybridTransition::Shift => {
                let b0 = state.b0()?;
                let below_top = &state.stack[..state.stack.len().saturating_sub(1)];
                let lost_head = match self.gold_head(b0) {
                    Some(None) => !state.stack.is_empty(),
                    Some(Some(head)) => below_top.contains(&head),
                    None => false,
                };
                usize::from(lost_head) + self.gold_dependents_in(b0, &state.stack)
            }
            ArcHybridTransition::ArcLeft => {
                let s0 = state.s0()?;
                let b0 = state.b0()?;
                let lost_head = match self.gold_head(s0) {
                    Some(None) => state.stack.len() == 1,
                    Some(Some(head)) => {
                        head != b0
                            && (state.s1() == Some(head)
                                || state.buffer.iter().skip(1).any(|&item| item == head))
                    }
                    None => false,
                };
                usize::from(lost_head) + self.gold_dependents_in(s0, &state.buffer)
            }
            ArcHybridTransition::ArcRight => {
                let s0 = state.s0()?;
                let lost_head = match self.gold_head(s0) {
                    Some(Some(head)) => state.buffer.contains(&head),
                    _ => false,
                };
                usize::from(lost_head) + self.gold_dependents_in(s0, &state.buffer)
            }
        };
        Some(cost)
    }
}

impl Oracle<ArcHybridTransition> for ArcHybridOracle {
    fn is_correct(&self, action: &Action<ArcHybridTransition>, state: &StackBufferState) -> bool {
        if self.cost(action.transition, state) != Some(0) {
            return false;
        }
        // A zero-cost arc that is not gold loses nothing, whatever its label.
        action.kind.arc().is_none_or(|arc| {
            !self.progress.is_gold_arc(arc.dependent, arc.governor)
                || self.progress.label_matches(arc)
        })
    }

    fn update_with(
        &mut self,
        transition: &ArcHybridTransition,
        state: &StackBufferState,
    ) -> Result<()> {
        self.accumulated_cost += self.cost(*transition, state).unwrap_or(0);
        if let Some(dependency) = transition.dependency(state) {
            self.progress.record_attachment(dependency.dependent);
        }
        Ok(())
    }

    fn box_clone(&self) -> Box<dyn Oracle<ArcHybridTransition>> {
        Box::new(self.clone())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ArcHybridOracleFactory;

impl OracleFactory<ArcHybridTransition> for ArcHybridOracleFactory {
    fn build(&self, gold: &DependencyTree) -> Result<Box<dyn Oracle<ArcHybridTransition>>> {
        Ok(Box::new(ArcHybridOracle::new(gold)?))
    }
}
