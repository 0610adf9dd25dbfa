//! Input contexts handed to scorers alongside the state

use crate::syntax::ItemId;

/// Per-derivation input data (e.g. token features) visible to scorers.
///
/// Contexts are cloned together with the state when a derivation branches.
pub trait InputContext: Clone + Send + 'static {}

impl InputContext for () {}

/// Builds the item attached to an input id.
pub trait ItemsFactory {
    type Item;

    fn build(&self, id: ItemId) -> Self::Item;
}

impl<I, F> ItemsFactory for F
where
    F: Fn(ItemId) -> I,
{
    type Item = I;

    fn build(&self, id: ItemId) -> I {
        self(id)
    }
}

/// A context holding one item per input id, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemsContext<I> {
    pub items: Vec<I>,
}

impl<I> ItemsContext<I> {
    pub fn build<F>(item_ids: &[ItemId], factory: &F) -> Self
    where
        F: ItemsFactory<Item = I>,
    {
        Self {
            items: item_ids.iter().map(|&id| factory.build(id)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<I: Clone + Send + 'static> InputContext for ItemsContext<I> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_one_item_per_id() {
        let context = ItemsContext::build(&[4, 2, 7], &|id: ItemId| format!("tok{id}"));
        assert_eq!(context.items, vec!["tok4", "tok2", "tok7"]);
        assert_eq!(context.len(), 3);
    }
}
