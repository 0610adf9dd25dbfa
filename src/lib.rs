//! Transition-based dependency parsing engine
//!
//! This crate provides:
//! - Dependency trees with attachment scoring (UAS/LAS)
//! - Four transition systems (arc-standard, arc-hybrid, arc-spine, arc-relocate)
//!   with their oracles
//! - Extended parser states carrying an input context, a score accumulator and
//!   an oracle
//! - A greedy decoder and an online trainer driven by pluggable scorers
//! - A multi-epoch training pipeline with composable observers
//! - A request/response worker for running scorers on a dedicated thread

pub mod cli;
pub mod error;
pub mod helpers;
pub mod models;
pub mod pipeline;
pub mod ports;
pub mod runners;
pub mod syntax;
pub mod transition;
pub mod worker;

pub use error::{Error, Result};
pub use models::SystemKind;
pub use runners::{ActionsScorerTrainer, SyntaxDecoder};
pub use syntax::{DependencyTree, Deprel, ItemId};
pub use worker::Worker;
