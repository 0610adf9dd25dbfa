//! The ArcStandard transition system
//!
//! Arcs are built between the two topmost stack elements; the buffer only
//! feeds the stack.

use std::fmt;

use super::{pop, remove_second, shift};
use crate::{
    Result,
    syntax::DependencyTree,
    transition::{
        Action, Dependency, GoldProgress, Oracle, OracleFactory, StackBufferState, Transition,
        TransitionKind, TransitionSystem,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArcStandardTransition {
    /// Attach the last stack element to the root.
    Root,
    Shift,
    /// s0 governs s1; s1 leaves the stack.
    ArcLeft,
    /// s1 governs s0; s0 leaves the stack.
    ArcRight,
}

impl fmt::Display for ArcStandardTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.kind(), f)
    }
}

impl Transition for ArcStandardTransition {
    type State = StackBufferState;

    fn kind(&self) -> TransitionKind {
        match self {
            ArcStandardTransition::Root => TransitionKind::Root,
            ArcStandardTransition::Shift => TransitionKind::Shift,
            ArcStandardTransition::ArcLeft => TransitionKind::ArcLeft,
            ArcStandardTransition::ArcRight => TransitionKind::ArcRight,
        }
    }

    fn priority(&self) -> u32 {
        match self {
            ArcStandardTransition::Root => 0,
            ArcStandardTransition::Shift => 1,
            ArcStandardTransition::ArcLeft => 2,
            ArcStandardTransition::ArcRight => 3,
        }
    }

    fn is_allowed(&self, state: &StackBufferState) -> bool {
        match self {
            ArcStandardTransition::Root => state.stack.len() == 1 && state.buffer.is_empty(),
            ArcStandardTransition::Shift => !state.buffer.is_empty(),
            ArcStandardTransition::ArcLeft | ArcStandardTransition::ArcRight => {
                state.stack.len() >= 2
            }
        }
    }

    fn dependency(&self, state: &StackBufferState) -> Option<Dependency> {
        match self {
            ArcStandardTransition::Root => state.s0().map(|s0| Dependency {
                dependent: s0,
                governor: None,
            }),
            ArcStandardTransition::Shift => None,
            ArcStandardTransition::ArcLeft => Some(Dependency {
                dependent: state.s1()?,
                governor: Some(state.s0()?),
            }),
            ArcStandardTransition::ArcRight => Some(Dependency {
                dependent: state.s0()?,
                governor: Some(state.s1()?),
            }),
        }
    }

    fn perform(&self, state: &mut StackBufferState) -> Result<()> {
        match self {
            ArcStandardTransition::Root | ArcStandardTransition::ArcRight => {
                pop(state, self).map(|_| ())
            }
            ArcStandardTransition::Shift => shift(state, self),
            ArcStandardTransition::ArcLeft => remove_second(state, self).map(|_| ()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ArcStandard;

impl TransitionSystem for ArcStandard {
    type State = StackBufferState;
    type Transition = ArcStandardTransition;

    fn name(&self) -> &'static str {
        "arc-standard"
    }

    fn candidate_transitions(&self, _state: &StackBufferState) -> Vec<ArcStandardTransition> {
        vec![
            ArcStandardTransition::Root,
            ArcStandardTransition::Shift,
            ArcStandardTransition::ArcLeft,
            ArcStandardTransition::ArcRight,
        ]
    }
}

/// Static oracle: an arc is correct when it is a gold arc whose dependent
/// has collected all its own gold dependents; shifting is correct only when
/// no arc is.
#[derive(Debug, Clone)]
pub struct ArcStandardOracle {
    progress: GoldProgress,
}

impl ArcStandardOracle {
    pub fn new(gold: &DependencyTree) -> Result<Self> {
        Ok(Self {
            progress: GoldProgress::new(gold)?,
        })
    }

    /// Whether `transition` builds the next gold arc on `state`, or is the
    /// gold move when no arc applies. Labels are not considered.
    pub fn is_gold_transition(
        &self,
        transition: ArcStandardTransition,
        state: &StackBufferState,
    ) -> bool {
        if !transition.is_allowed(state) {
            return false;
        }
        match transition {
            ArcStandardTransition::Shift => {
                !self.is_gold_transition(ArcStandardTransition::ArcLeft, state)
                    && !self.is_gold_transition(ArcStandardTransition::ArcRight, state)
            }
            _ => transition.dependency(state).is_some_and(|dependency| {
                self.progress
                    .is_gold_arc(dependency.dependent, dependency.governor)
                    && !self.progress.has_pending(dependency.dependent)
            }),
        }
    }
}

impl Oracle<ArcStandardTransition> for ArcStandardOracle {
    fn is_correct(&self, action: &Action<ArcStandardTransition>, state: &StackBufferState) -> bool {
        self.is_gold_transition(action.transition, state)
            && action
                .kind
                .arc()
                .is_none_or(|arc| self.progress.label_matches(arc))
    }

    fn update_with(
        &mut self,
        transition: &ArcStandardTransition,
        state: &StackBufferState,
    ) -> Result<()> {
        if let Some(dependency) = transition.dependency(state) {
            self.progress.record_attachment(dependency.dependent);
        }
        Ok(())
    }

    fn box_clone(&self) -> Box<dyn Oracle<ArcStandardTransition>> {
        Box::new(self.clone())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ArcStandardOracleFactory;

impl OracleFactory<ArcStandardTransition> for ArcStandardOracleFactory {
    fn build(&self, gold: &DependencyTree) -> Result<Box<dyn Oracle<ArcStandardTransition>>> {
        Ok(Box::new(ArcStandardOracle::new(gold)?))
    }
}
