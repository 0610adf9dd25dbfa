//! Oracles: knowledge of the gold tree during training

use std::{collections::HashSet, fmt};

use super::{Action, ArcAction, Transition};
use crate::{
    Error, Result,
    syntax::{DependencyTree, ItemId},
};

/// Tells which actions keep a derivation on track towards a gold tree.
///
/// An oracle follows the derivation it supervises: every committed
/// transition is reported through [`Oracle::update_with`] before it is
/// applied, so the oracle sees the same state the transition was chosen on.
pub trait Oracle<T: Transition>: fmt::Debug + Send {
    /// Whether `action` is correct on `state`.
    fn is_correct(&self, action: &Action<T>, state: &T::State) -> bool;

    /// Record that `transition` is about to be applied to `state`.
    fn update_with(&mut self, transition: &T, state: &T::State) -> Result<()>;

    fn box_clone(&self) -> Box<dyn Oracle<T>>;
}

impl<T: Transition> Clone for Box<dyn Oracle<T>> {
    fn clone(&self) -> Self {
        self.box_clone()
    }
}

/// Builds a fresh oracle for one gold tree.
pub trait OracleFactory<T: Transition>: Send {
    fn build(&self, gold: &DependencyTree) -> Result<Box<dyn Oracle<T>>>;
}

/// Gold tree plus the set of items already attached by the derivation.
///
/// Once an item is attached, its gold arc is either built or lost for good,
/// so it no longer counts as a pending dependent of its gold governor.
#[derive(Debug, Clone)]
pub struct GoldProgress {
    gold: DependencyTree,
    attached: HashSet<ItemId>,
}

impl GoldProgress {
    /// Track progress towards `gold`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTree`] unless `gold` is complete, acyclic and
    /// has exactly one root.
    pub fn new(gold: &DependencyTree) -> Result<Self> {
        if !gold.is_complete() {
            return Err(Error::InvalidTree {
                message: format!("gold tree {gold} leaves items unattached"),
            });
        }
        if gold.has_cycle() {
            return Err(Error::InvalidTree {
                message: format!("gold tree {gold} contains a cycle"),
            });
        }
        let roots = gold.roots();
        if !gold.is_empty() && roots.len() != 1 {
            return Err(Error::InvalidTree {
                message: format!("gold tree {gold} has {} roots, expected one", roots.len()),
            });
        }

        Ok(Self {
            gold: gold.clone(),
            attached: HashSet::new(),
        })
    }

    pub fn gold(&self) -> &DependencyTree {
        &self.gold
    }

    /// Whether `governor -> dependent` is a gold arc (`None` = root).
    pub fn is_gold_arc(&self, dependent: ItemId, governor: Option<ItemId>) -> bool {
        self.gold
            .attachment(dependent)
            .is_some_and(|attachment| attachment.governor == governor)
    }

    /// Whether the label of `arc` agrees with gold. Unlabeled arcs always do.
    pub fn label_matches(&self, arc: &ArcAction) -> bool {
        match &arc.deprel {
            None => true,
            Some(deprel) => self.gold.deprel(arc.dependent) == Some(deprel),
        }
    }

    /// Whether `arc` builds a gold arc with a gold label.
    pub fn is_gold_action(&self, arc: &ArcAction) -> bool {
        self.is_gold_arc(arc.dependent, arc.governor) && self.label_matches(arc)
    }

    /// Gold dependents of `governor` not yet attached, in input order.
    pub fn pending_dependents(&self, governor: ItemId) -> Vec<ItemId> {
        self.gold
            .dependents_of(governor)
            .into_iter()
            .filter(|dependent| !self.attached.contains(dependent))
            .collect()
    }

    pub fn has_pending(&self, governor: ItemId) -> bool {
        !self.pending_dependents(governor).is_empty()
    }

    /// Whether `governor` has pending gold dependents before it in input order.
    pub fn has_pending_left(&self, governor: ItemId) -> bool {
        let position = self.gold.position(governor);
        self.pending_dependents(governor)
            .into_iter()
            .any(|dependent| self.gold.position(dependent) < position)
    }

    /// Whether `governor` has pending gold dependents after it in input order.
    pub fn has_pending_right(&self, governor: ItemId) -> bool {
        let position = self.gold.position(governor);
        self.pending_dependents(governor)
            .into_iter()
            .any(|dependent| self.gold.position(dependent) > position)
    }

    pub fn is_attached(&self, id: ItemId) -> bool {
        self.attached.contains(&id)
    }

    pub fn record_attachment(&mut self, dependent: ItemId) {
        self.attached.insert(dependent);
    }
}
