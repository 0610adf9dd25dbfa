//! Scored transitions

use std::fmt;

use super::{ActionKind, ArcAction, State, Transition, TransitionKind};
use crate::{Error, Result, syntax::Deprel};

/// A transition plus its score, its training error and what applying it
/// commits to the tree.
///
/// The dependency of an arc transition is resolved against the state the
/// action was built from and copied into [`ActionKind::Arc`], so the action
/// stays meaningful after the state moves on.
#[derive(Debug, Clone)]
pub struct Action<T: Transition> {
    pub id: usize,
    pub score: f64,
    pub error: Option<f64>,
    pub transition: T,
    pub kind: ActionKind,
}

impl<T: Transition> Action<T> {
    /// Build an action for `transition` on `state`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingDependency`] if `transition` is an arc
    /// transition that has no dependency on `state`.
    pub fn new(
        transition: T,
        state: &T::State,
        id: usize,
        score: f64,
        deprel: Option<Deprel>,
    ) -> Result<Self> {
        let kind = match transition.kind() {
            TransitionKind::ArcLeft | TransitionKind::ArcRight | TransitionKind::Root => {
                let dependency =
                    transition
                        .dependency(state)
                        .ok_or_else(|| Error::MissingDependency {
                            transition: transition.to_string(),
                        })?;
                ActionKind::Arc(ArcAction {
                    dependent: dependency.dependent,
                    governor: dependency.governor,
                    deprel,
                })
            }
            TransitionKind::NoArc => ActionKind::NoArc,
            TransitionKind::Relocate => ActionKind::Relocate,
            TransitionKind::Shift | TransitionKind::Wait => ActionKind::Shift,
            TransitionKind::Unshift => ActionKind::Unshift,
        };

        Ok(Self {
            id,
            score,
            error: None,
            transition,
            kind,
        })
    }

    pub fn priority(&self) -> u32 {
        self.transition.priority()
    }

    pub fn is_arc(&self) -> bool {
        matches!(self.kind, ActionKind::Arc(_))
    }

    pub fn deprel(&self) -> Option<&Deprel> {
        self.kind.arc().and_then(|arc| arc.deprel.as_ref())
    }

    /// Relabel an arc action. No effect on other kinds.
    pub fn set_deprel(&mut self, deprel: Option<Deprel>) {
        if let ActionKind::Arc(arc) = &mut self.kind {
            arc.deprel = deprel;
        }
    }

    /// Perform the transition on `state`, then commit the arc (if any).
    pub fn apply(&self, state: &mut T::State) -> Result<()> {
        self.transition.perform(state)?;

        if let ActionKind::Arc(arc) = &self.kind {
            state
                .tree_mut()
                .set_arc(arc.dependent, arc.governor, arc.deprel.clone())?;
        }
        Ok(())
    }
}

impl<T: Transition> fmt::Display for Action<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.transition)?;
        if let Some(deprel) = self.deprel() {
            write!(f, "[{deprel}]")?;
        }
        write!(f, " ({:.4})", self.score)
    }
}
