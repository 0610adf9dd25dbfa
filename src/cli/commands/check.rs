//! Check command - Replay gold trees through a transition system
//!
//! Every sentence is derived with the oracle scorer, so the reported
//! attachment scores measure how much of the data the system and its oracle
//! can reach, not the quality of a model.

use std::{
    collections::BTreeSet,
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use serde::{Deserialize, Serialize};
use serde_json::to_writer_pretty;

use crate::{
    helpers::{LabeledActionsGenerator, OracleScorer},
    models::{
        ArcHybrid, ArcHybridOracleFactory, ArcRelocate, ArcRelocateOracleFactory, ArcSpine,
        ArcSpineOracleFactory, ArcStandard, ArcStandardOracleFactory, SystemKind,
    },
    pipeline::{
        JsonlObserver, ProgressObserver, TrainingConfig, TrainingExample, TrainingPipeline,
        TrainingResult,
    },
    runners::ActionsScorerTrainer,
    syntax::{DependencyTree, Deprel, ItemId},
    transition::{AccumulatorKind, OracleFactory, TransitionSystem},
};

#[derive(Parser, Debug)]
#[command(about = "Replay gold trees through a transition system")]
pub struct CheckArgs {
    /// JSON file with gold sentences: `[{"tokens": [{"id", "head", "label"}]}]`
    pub input: PathBuf,

    /// Transition system to check
    #[arg(long, short = 's', default_value = "arc-hybrid")]
    pub system: SystemKind,

    /// Generate one action per dependency label
    #[arg(long)]
    pub labeled: bool,

    /// How action scores combine into a derivation score
    #[arg(long, default_value = "sum")]
    pub accumulator: AccumulatorKind,

    /// Number of passes over the data
    #[arg(long, short = 'e', default_value_t = 1)]
    pub epochs: usize,

    /// Shuffle the sentences at every epoch
    #[arg(long)]
    pub shuffle: bool,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Export every derivation step to a JSONL file
    #[arg(long)]
    pub observations: Option<PathBuf>,

    /// Write a JSON summary to file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Show a progress bar
    #[arg(long)]
    pub progress: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoldToken {
    pub id: ItemId,
    pub head: Option<ItemId>,
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoldSentence {
    pub tokens: Vec<GoldToken>,
}

impl GoldSentence {
    /// Build the gold tree, keeping labels only when `labeled` is set.
    pub fn to_tree(&self, labeled: bool) -> Result<DependencyTree> {
        let ids: Vec<ItemId> = self.tokens.iter().map(|t| t.id).collect();
        let heads: Vec<Option<ItemId>> = self.tokens.iter().map(|t| t.head).collect();

        let deprels = if labeled {
            let labels = self
                .tokens
                .iter()
                .map(|t| {
                    t.label
                        .as_deref()
                        .map(Deprel::from)
                        .ok_or_else(|| anyhow!("token {} has no label", t.id))
                })
                .collect::<Result<Vec<_>>>()?;
            Some(labels)
        } else {
            None
        };

        Ok(DependencyTree::from_heads(&ids, &heads, deprels.as_deref())?)
    }
}

/// Summary written by `--summary`
#[derive(Debug, Serialize)]
pub struct CheckSummary {
    pub system: SystemKind,
    pub labeled: bool,
    pub sentences: usize,
    pub non_projective: usize,
    pub uas: f64,
    pub las: f64,
    pub result: TrainingResult,
}

/// Load gold sentences from a JSON file
pub fn load_sentences(path: &Path) -> Result<Vec<GoldSentence>> {
    let file =
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let sentences = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse gold sentences from {}", path.display()))?;
    Ok(sentences)
}

/// Collect the arc and root labels of a labeled data set
fn collect_labels(sentences: &[GoldSentence]) -> (Vec<Deprel>, Vec<Deprel>) {
    let mut arc_labels = BTreeSet::new();
    let mut root_labels = BTreeSet::new();
    for token in sentences.iter().flat_map(|s| &s.tokens) {
        if let Some(label) = &token.label {
            if token.head.is_some() {
                arc_labels.insert(label.as_str());
            } else {
                root_labels.insert(label.as_str());
            }
        }
    }
    (
        arc_labels.into_iter().map(Deprel::from).collect(),
        root_labels.into_iter().map(Deprel::from).collect(),
    )
}

pub fn execute(args: CheckArgs) -> Result<()> {
    let summary = run(&args)?;

    println!("\n=== Check Results ===");
    println!("System: {}", summary.system);
    println!("Sentences: {}", summary.sentences);
    if summary.system.is_projective() && summary.non_projective > 0 {
        println!(
            "Non-projective sentences: {} (not fully reachable by {})",
            summary.non_projective, summary.system
        );
    }
    println!("Steps: {}", summary.result.steps);
    println!("UAS: {:.2}%", summary.uas * 100.0);
    if summary.labeled {
        println!("LAS: {:.2}%", summary.las * 100.0);
    }

    if let Some(path) = &args.summary {
        let file = File::create(path)
            .with_context(|| format!("Failed to create summary file {}", path.display()))?;
        to_writer_pretty(file, &summary)?;
        println!("\nSummary saved to: {}", path.display());
    }

    Ok(())
}

/// Replay the data set and summarize the scores of the last epoch
pub fn run(args: &CheckArgs) -> Result<CheckSummary> {
    let sentences = load_sentences(&args.input)?;
    let trees = sentences
        .iter()
        .enumerate()
        .map(|(i, s)| {
            s.to_tree(args.labeled)
                .with_context(|| format!("Invalid gold tree in sentence {i}"))
        })
        .collect::<Result<Vec<_>>>()?;
    let non_projective = trees.iter().filter(|t| !t.is_projective()).count();
    let examples: Vec<_> = trees
        .into_iter()
        .map(|gold| TrainingExample::new(gold, ()))
        .collect();

    let result = match args.system {
        SystemKind::ArcStandard => {
            replay(ArcStandard, Box::new(ArcStandardOracleFactory), &sentences, &examples, args)
        }
        SystemKind::ArcHybrid => {
            replay(ArcHybrid, Box::new(ArcHybridOracleFactory), &sentences, &examples, args)
        }
        SystemKind::ArcSpine => {
            replay(ArcSpine, Box::new(ArcSpineOracleFactory), &sentences, &examples, args)
        }
        SystemKind::ArcRelocate => {
            replay(ArcRelocate, Box::new(ArcRelocateOracleFactory), &sentences, &examples, args)
        }
    }?;

    let score = result.final_score();
    Ok(CheckSummary {
        system: args.system,
        labeled: args.labeled,
        sentences: examples.len(),
        non_projective,
        uas: score.uas(),
        las: score.las(),
        result,
    })
}

fn replay<S: TransitionSystem>(
    system: S,
    oracle_factory: Box<dyn OracleFactory<S::Transition>>,
    sentences: &[GoldSentence],
    examples: &[TrainingExample<()>],
    args: &CheckArgs,
) -> Result<TrainingResult> {
    let mut trainer = ActionsScorerTrainer::new(system, OracleScorer::default(), oracle_factory)
        .with_accumulator(args.accumulator);
    if args.labeled {
        let (arc_labels, root_labels) = collect_labels(sentences);
        trainer = trainer.with_generator(Box::new(LabeledActionsGenerator::new(
            arc_labels,
            root_labels,
        )));
    }

    let mut pipeline = TrainingPipeline::new(TrainingConfig {
        epochs: args.epochs,
        seed: args.seed,
        shuffle: args.shuffle,
        propagate_to_input: false,
    });
    if args.progress {
        pipeline = pipeline.with_observer(Box::new(ProgressObserver::new()));
    }
    if let Some(path) = &args.observations {
        let observer = JsonlObserver::new(path)
            .with_context(|| format!("Failed to create observations file {}", path.display()))?;
        pipeline = pipeline.with_observer(Box::new(observer));
    }

    Ok(pipeline.run(&mut trainer, examples)?)
}
