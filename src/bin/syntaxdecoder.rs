//! syntaxdecoder CLI - Toolkit for transition-based dependency parsing
//!
//! This CLI provides:
//! - Oracle coverage checks of the transition systems on gold data

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "syntaxdecoder")]
#[command(version, about = "Toolkit for transition-based dependency parsing", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay gold trees through a transition system and report UAS/LAS
    Check(syntaxdecoder::cli::commands::check::CheckArgs),
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Check(args) => syntaxdecoder::cli::commands::check::execute(args),
    }
}
