//! CLI subcommands

pub mod check;
