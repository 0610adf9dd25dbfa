//! Syntactic output structures
//!
//! This module provides the dependency tree built by every derivation,
//! plus the labels attached to its arcs and the attachment scores used to
//! compare a predicted tree against a gold one.

pub mod evaluation;
pub mod tree;

pub use evaluation::AttachmentScore;
pub use tree::{Attachment, DependencyTree, Deprel};

/// Opaque identifier of one input item (token).
pub type ItemId = usize;
