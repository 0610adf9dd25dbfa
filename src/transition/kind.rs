//! Transition kinds and the data an action copies out of its transition

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::syntax::{Deprel, ItemId};

/// The behavioral class of a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransitionKind {
    Shift,
    Unshift,
    Relocate,
    Wait,
    NoArc,
    ArcLeft,
    ArcRight,
    Root,
}

impl TransitionKind {
    /// Whether transitions of this kind create a syntactic dependency.
    pub fn is_arc(self) -> bool {
        matches!(
            self,
            TransitionKind::ArcLeft | TransitionKind::ArcRight | TransitionKind::Root
        )
    }
}

impl fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransitionKind::Shift => "shift",
            TransitionKind::Unshift => "unshift",
            TransitionKind::Relocate => "relocate",
            TransitionKind::Wait => "wait",
            TransitionKind::NoArc => "no-arc",
            TransitionKind::ArcLeft => "arc-left",
            TransitionKind::ArcRight => "arc-right",
            TransitionKind::Root => "root",
        };
        f.write_str(name)
    }
}

/// A dependency resolved against a concrete state. `governor` is `None`
/// when the dependent is attached to the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dependency {
    pub dependent: ItemId,
    pub governor: Option<ItemId>,
}

/// An arc to be committed into the dependency tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArcAction {
    pub dependent: ItemId,
    pub governor: Option<ItemId>,
    pub deprel: Option<Deprel>,
}

/// What an action does beyond performing its transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionKind {
    Shift,
    Unshift,
    Relocate,
    NoArc,
    Arc(ArcAction),
}

impl ActionKind {
    pub fn arc(&self) -> Option<&ArcAction> {
        match self {
            ActionKind::Arc(arc) => Some(arc),
            _ => None,
        }
    }
}
