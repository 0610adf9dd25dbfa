//! CLI infrastructure for the syntaxdecoder toolkit
//!
//! This module provides the command-line interface for checking how well the
//! transition systems and their oracles cover a set of gold trees.

pub mod commands;
