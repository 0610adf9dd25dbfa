//! Parser configurations

use std::{collections::VecDeque, fmt};

use crate::syntax::{DependencyTree, ItemId};

/// A parser configuration.
///
/// `Clone` produces a fully independent copy: mutating the clone's stack,
/// buffer or tree never affects the original. Search strategies rely on this
/// to branch a derivation.
pub trait State: Clone + fmt::Debug + fmt::Display + Send {
    /// The initial configuration over the given items.
    fn new(item_ids: &[ItemId]) -> Self;

    /// The items this state was initialised with, in input order.
    fn item_ids(&self) -> &[ItemId];

    fn tree(&self) -> &DependencyTree;

    fn tree_mut(&mut self) -> &mut DependencyTree;

    /// True when no further transition applies and the tree is final.
    fn is_terminal(&self) -> bool;
}

/// A stack of partially processed items and a buffer of unread ones.
///
/// Shared by the systems whose stack holds plain item ids. The top of the
/// stack is the last element of `stack`; the front of the buffer is its
/// first element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackBufferState {
    item_ids: Vec<ItemId>,
    pub stack: Vec<ItemId>,
    pub buffer: VecDeque<ItemId>,
    tree: DependencyTree,
}

impl StackBufferState {
    /// Top of the stack (s0).
    pub fn s0(&self) -> Option<ItemId> {
        self.stack.last().copied()
    }

    /// Second element from the top of the stack (s1).
    pub fn s1(&self) -> Option<ItemId> {
        self.stack.len().checked_sub(2).map(|i| self.stack[i])
    }

    /// Front of the buffer (b0).
    pub fn b0(&self) -> Option<ItemId> {
        self.buffer.front().copied()
    }

    /// Position of an item in the input order.
    pub fn position(&self, id: ItemId) -> Option<usize> {
        self.item_ids.iter().position(|&item| item == id)
    }
}

impl State for StackBufferState {
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

impl fmt::Display for StackBufferState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S {:?} B {:?}", self.stack, self.buffer)
    }
}
