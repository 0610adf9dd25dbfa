//! Multi-epoch training over a set of gold examples

use log::info;
use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};
use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    ports::{ActionsScorerTrainable, Observer, StepRecord},
    runners::ActionsScorerTrainer,
    syntax::{AttachmentScore, DependencyTree, ItemId},
    transition::{InputContext, TransitionSystem},
};

/// Training configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Number of passes over the examples
    pub epochs: usize,

    /// Random seed for the example order
    pub seed: Option<u64>,

    /// Whether to shuffle the examples at every epoch
    pub shuffle: bool,

    /// Whether scorers should propagate errors into their input
    pub propagate_to_input: bool,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            epochs: 1,
            seed: None,
            shuffle: false,
            propagate_to_input: false,
        }
    }
}

/// One sentence to learn from.
#[derive(Debug, Clone)]
pub struct TrainingExample<C> {
    pub item_ids: Vec<ItemId>,
    pub context: C,
    pub gold: DependencyTree,
}

impl<C> TrainingExample<C> {
    /// An example whose items are exactly the elements of `gold`.
    pub fn new(gold: DependencyTree, context: C) -> Self {
        Self {
            item_ids: gold.element_ids().to_vec(),
            context,
            gold,
        }
    }
}

/// Result of a training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingResult {
    /// Number of epochs run
    pub epochs: usize,

    /// Number of examples per epoch
    pub examples: usize,

    /// Derivation steps over all epochs
    pub steps: usize,

    /// Steps on which the scorer was updated
    pub relevant_steps: usize,

    /// Attachment score of each epoch
    pub epoch_scores: Vec<AttachmentScore>,
}

impl TrainingResult {
    /// Attachment score of the last epoch
    pub fn final_score(&self) -> AttachmentScore {
        self.epoch_scores.last().copied().unwrap_or_default()
    }

    /// Save result to JSON file
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load result from JSON file
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let result = serde_json::from_reader(file)?;
        Ok(result)
    }
}

/// Training pipeline driving a trainer over a set of examples
pub struct TrainingPipeline {
    config: TrainingConfig,
    observers: Vec<Box<dyn Observer>>,
}

impl TrainingPipeline {
    /// Create a new training pipeline
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the pipeline
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Run every epoch, learning from each example once per epoch.
    pub fn run<S, M, C>(
        &mut self,
        trainer: &mut ActionsScorerTrainer<S, M, C>,
        examples: &[TrainingExample<C>],
    ) -> Result<TrainingResult>
    where
        S: TransitionSystem,
        M: ActionsScorerTrainable<S::Transition, C>,
        C: InputContext,
    {
        if self.config.epochs == 0 {
            return Err(Error::InvalidConfiguration {
                message: "epochs must be at least 1".to_string(),
            });
        }

        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let start = trainer.stats();
        let mut epoch_scores = Vec::with_capacity(self.config.epochs);

        for observer in &mut self.observers {
            observer.on_training_start(examples.len(), self.config.epochs)?;
        }

        for epoch in 0..self.config.epochs {
            for observer in &mut self.observers {
                observer.on_epoch_start(epoch)?;
            }

            let mut order: Vec<usize> = (0..examples.len()).collect();
            if self.config.shuffle {
                order.shuffle(&mut rng);
            }

            let mut score = AttachmentScore::default();
            for index in order {
                score += self.learn_example(trainer, epoch, index, &examples[index])?;
            }

            info!(
                "Epoch {}/{} on {}: {score}",
                epoch + 1,
                self.config.epochs,
                trainer.system().name()
            );
            for observer in &mut self.observers {
                observer.on_epoch_end(epoch, &score)?;
            }
            epoch_scores.push(score);
        }

        for observer in &mut self.observers {
            observer.on_training_end()?;
        }

        let end = trainer.stats();
        Ok(TrainingResult {
            epochs: self.config.epochs,
            examples: examples.len(),
            steps: end.steps - start.steps,
            relevant_steps: end.relevant_steps - start.relevant_steps,
            epoch_scores,
        })
    }

    fn learn_example<S, M, C>(
        &mut self,
        trainer: &mut ActionsScorerTrainer<S, M, C>,
        epoch: usize,
        index: usize,
        example: &TrainingExample<C>,
    ) -> Result<AttachmentScore>
    where
        S: TransitionSystem,
        M: ActionsScorerTrainable<S::Transition, C>,
        C: InputContext,
    {
        for observer in &mut self.observers {
            observer.on_example_start(epoch, index)?;
        }

        let observers = &mut self.observers;
        let predicted = trainer.learn_with(
            &example.item_ids,
            example.context.clone(),
            &example.gold,
            self.config.propagate_to_input,
            |action, extended| {
                if observers.is_empty() {
                    return Ok(());
                }
                let record = StepRecord {
                    epoch,
                    example: index,
                    step: extended.applied_actions().len(),
                    state: extended.state.to_string(),
                    action: action.to_string(),
                    score: action.score,
                    error: action.error,
                    correct: extended
                        .oracle
                        .as_ref()
                        .is_some_and(|oracle| oracle.is_correct(action, &extended.state)),
                };
                for observer in observers.iter_mut() {
                    observer.on_step(&record)?;
                }
                Ok(())
            },
        )?;

        for observer in &mut self.observers {
            observer.on_example_end(epoch, index, &predicted, &example.gold)?;
        }
        predicted.attachment_score(&example.gold)
    }
}
