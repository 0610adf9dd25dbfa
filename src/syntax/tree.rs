//! Dependency tree representation and basic operations

use std::{
    collections::{BTreeMap, HashMap, HashSet},
    fmt,
};

use serde::{Deserialize, Serialize};

use super::{AttachmentScore, ItemId};
use crate::{Error, Result};

/// A dependency relation label (e.g. `nsubj`, `obj`, `root`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Deprel(String);

impl Deprel {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Deprel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Deprel {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

/// The head side of one arc: the governor (`None` for the root) and its label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub governor: Option<ItemId>,
    pub deprel: Option<Deprel>,
}

/// A set of governor/dependent arcs over a fixed, ordered set of items.
///
/// Every item has at most one attachment. Setting an arc for a dependent
/// that is already attached replaces the previous attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyTree {
    element_ids: Vec<ItemId>,
    attachments: BTreeMap<ItemId, Attachment>,
}

impl DependencyTree {
    /// Create a tree over the given items with no arcs.
    pub fn new(element_ids: &[ItemId]) -> Self {
        Self {
            element_ids: element_ids.to_vec(),
            attachments: BTreeMap::new(),
        }
    }

    /// Build a complete tree from parallel `heads` and optional `deprels`.
    ///
    /// `heads[i]` is the governor of `element_ids[i]`, `None` marking a root.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTree`] if the slices have different lengths,
    /// or any error raised by [`DependencyTree::set_arc`].
    pub fn from_heads(
        element_ids: &[ItemId],
        heads: &[Option<ItemId>],
        deprels: Option<&[Deprel]>,
    ) -> Result<Self> {
        if heads.len() != element_ids.len() {
            return Err(Error::InvalidTree {
                message: format!(
                    "{} heads given for {} elements",
                    heads.len(),
                    element_ids.len()
                ),
            });
        }
        if let Some(labels) = deprels {
            if labels.len() != element_ids.len() {
                return Err(Error::InvalidTree {
                    message: format!(
                        "{} deprels given for {} elements",
                        labels.len(),
                        element_ids.len()
                    ),
                });
            }
        }

        let mut tree = Self::new(element_ids);
        for (i, (&dependent, &governor)) in element_ids.iter().zip(heads).enumerate() {
            let deprel = deprels.map(|labels| labels[i].clone());
            tree.set_arc(dependent, governor, deprel)?;
        }
        Ok(tree)
    }

    /// Attach `dependent` to `governor` (`None` = root) with an optional label.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownItem`] if either id is not an element of the
    /// tree and [`Error::SelfAttachment`] if the governor is the dependent.
    pub fn set_arc(
        &mut self,
        dependent: ItemId,
        governor: Option<ItemId>,
        deprel: Option<Deprel>,
    ) -> Result<()> {
        self.check_element(dependent)?;
        if let Some(governor) = governor {
            self.check_element(governor)?;
            if governor == dependent {
                return Err(Error::SelfAttachment { id: dependent });
            }
        }
        self.attachments
            .insert(dependent, Attachment { governor, deprel });
        Ok(())
    }

    fn check_element(&self, id: ItemId) -> Result<()> {
        if self.element_ids.contains(&id) {
            Ok(())
        } else {
            Err(Error::UnknownItem { id })
        }
    }

    /// The items covered by this tree, in input order.
    pub fn element_ids(&self) -> &[ItemId] {
        &self.element_ids
    }

    pub fn len(&self) -> usize {
        self.element_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.element_ids.is_empty()
    }

    /// Position of an item in the input order.
    pub fn position(&self, id: ItemId) -> Option<usize> {
        self.element_ids.iter().position(|&element| element == id)
    }

    pub fn attachment(&self, dependent: ItemId) -> Option<&Attachment> {
        self.attachments.get(&dependent)
    }

    pub fn is_attached(&self, dependent: ItemId) -> bool {
        self.attachments.contains_key(&dependent)
    }

    /// Governor of an attached item. `None` both for roots and for
    /// unattached items; use [`DependencyTree::attachment`] to tell them apart.
    pub fn governor(&self, dependent: ItemId) -> Option<ItemId> {
        self.attachments
            .get(&dependent)
            .and_then(|attachment| attachment.governor)
    }

    pub fn deprel(&self, dependent: ItemId) -> Option<&Deprel> {
        self.attachments
            .get(&dependent)
            .and_then(|attachment| attachment.deprel.as_ref())
    }

    /// Items attached to `governor`, in input order.
    pub fn dependents_of(&self, governor: ItemId) -> Vec<ItemId> {
        self.element_ids
            .iter()
            .copied()
            .filter(|&id| self.governor(id) == Some(governor))
            .collect()
    }

    /// Items attached as roots, in input order.
    pub fn roots(&self) -> Vec<ItemId> {
        self.element_ids
            .iter()
            .copied()
            .filter(|id| {
                self.attachments
                    .get(id)
                    .is_some_and(|attachment| attachment.governor.is_none())
            })
            .collect()
    }

    pub fn arc_count(&self) -> usize {
        self.attachments.len()
    }

    /// True when every element has exactly one attachment.
    pub fn is_complete(&self) -> bool {
        self.element_ids.iter().all(|id| self.is_attached(*id))
    }

    /// True when following governors from some item leads back to it.
    pub fn has_cycle(&self) -> bool {
        let mut acyclic: HashSet<ItemId> = HashSet::new();

        for &start in &self.element_ids {
            let mut path: HashSet<ItemId> = HashSet::new();
            let mut current = Some(start);

            while let Some(id) = current {
                if acyclic.contains(&id) {
                    break;
                }
                if !path.insert(id) {
                    return true;
                }
                current = self.governor(id);
            }
            acyclic.extend(path);
        }
        false
    }

    /// True when no two arcs cross, given the input order of the items.
    ///
    /// An arc `(g, d)` is projective when every item between `g` and `d`
    /// descends from `g`.
    pub fn is_projective(&self) -> bool {
        let positions: HashMap<ItemId, usize> = self
            .element_ids
            .iter()
            .enumerate()
            .map(|(position, &id)| (id, position))
            .collect();

        for (&dependent, attachment) in &self.attachments {
            let Some(governor) = attachment.governor else {
                continue;
            };
            let (Some(&g), Some(&d)) = (positions.get(&governor), positions.get(&dependent))
            else {
                continue;
            };
            let (low, high) = if g < d { (g, d) } else { (d, g) };
            for &between in &self.element_ids[low + 1..high] {
                if !self.descends_from(between, governor) {
                    return false;
                }
            }
        }
        true
    }

    fn descends_from(&self, item: ItemId, ancestor: ItemId) -> bool {
        let mut current = self.governor(item);
        let mut steps = 0;
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            steps += 1;
            if steps > self.element_ids.len() {
                return false;
            }
            current = self.governor(id);
        }
        false
    }

    /// Compare this (predicted) tree against a gold tree over the same items.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MismatchedTrees`] if the trees cover different items.
    pub fn attachment_score(&self, gold: &DependencyTree) -> Result<AttachmentScore> {
        if self.element_ids != gold.element_ids {
            return Err(Error::MismatchedTrees {
                expected: gold.element_ids.len(),
                got: self.element_ids.len(),
            });
        }

        let mut score = AttachmentScore::default();
        for &id in &self.element_ids {
            score.total += 1;
            let (Some(predicted), Some(expected)) = (self.attachment(id), gold.attachment(id))
            else {
                continue;
            };
            if predicted.governor == expected.governor {
                score.unlabeled_correct += 1;
                if predicted.deprel == expected.deprel {
                    score.labeled_correct += 1;
                }
            }
        }
        Ok(score)
    }
}

impl fmt::Display for DependencyTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arcs: Vec<String> = self
            .element_ids
            .iter()
            .map(|&id| match self.attachment(id) {
                Some(Attachment {
                    governor: Some(governor),
                    deprel,
                }) => match deprel {
                    Some(deprel) => format!("{governor}-{deprel}->{id}"),
                    None => format!("{governor}->{id}"),
                },
                Some(Attachment {
                    governor: None,
                    deprel,
                }) => match deprel {
                    Some(deprel) => format!("root-{deprel}->{id}"),
                    None => format!("root->{id}"),
                },
                None => format!("_->{id}"),
            })
            .collect();
        write!(f, "[{}]", arcs.join(", "))
    }
}
