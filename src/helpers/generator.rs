//! Turning valid transitions into candidate actions

use crate::{
    Result,
    syntax::Deprel,
    transition::{Action, Transition, TransitionKind},
};

/// Builds the candidate actions of a step from the valid transitions.
///
/// Action ids are assigned in generation order, starting from zero.
pub trait ActionsGenerator<T: Transition>: Send {
    fn generate(&self, transitions: Vec<T>, state: &T::State) -> Result<Vec<Action<T>>>;
}

/// One unlabeled action per transition.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnlabeledActionsGenerator;

impl<T: Transition> ActionsGenerator<T> for UnlabeledActionsGenerator {
    fn generate(&self, transitions: Vec<T>, state: &T::State) -> Result<Vec<Action<T>>> {
        transitions
            .into_iter()
            .enumerate()
            .map(|(id, transition)| Action::new(transition, state, id, 0.0, None))
            .collect()
    }
}

/// One action per label for arc transitions, one action for the rest.
///
/// Root transitions draw from `root_labels`, left and right arcs from
/// `arc_labels`. An empty label set yields a single unlabeled action.
#[derive(Debug, Clone, Default)]
pub struct LabeledActionsGenerator {
    pub arc_labels: Vec<Deprel>,
    pub root_labels: Vec<Deprel>,
}

impl LabeledActionsGenerator {
    pub fn new(arc_labels: Vec<Deprel>, root_labels: Vec<Deprel>) -> Self {
        Self {
            arc_labels,
            root_labels,
        }
    }

    fn labels_for(&self, kind: TransitionKind) -> &[Deprel] {
        match kind {
            TransitionKind::Root => self.root_labels.as_slice(),
            TransitionKind::ArcLeft | TransitionKind::ArcRight => self.arc_labels.as_slice(),
            _ => &[],
        }
    }
}

impl<T: Transition> ActionsGenerator<T> for LabeledActionsGenerator {
    fn generate(&self, transitions: Vec<T>, state: &T::State) -> Result<Vec<Action<T>>> {
        let mut actions = Vec::new();

        for transition in transitions {
            let labels = self.labels_for(transition.kind());
            if labels.is_empty() {
                actions.push(Action::new(transition, state, actions.len(), 0.0, None)?);
                continue;
            }
            for label in labels {
                actions.push(Action::new(
                    transition.clone(),
                    state,
                    actions.len(),
                    0.0,
                    Some(label.clone()),
                )?);
            }
        }
        Ok(actions)
    }
}
