//! Observer port - abstraction for training observation and data collection
//!
//! This port defines the interface for observing training events,
//! allowing composable data collection without coupling the training
//! pipeline to specific output formats or metrics.

use serde::{Deserialize, Serialize};

use crate::{
    Result,
    syntax::{AttachmentScore, DependencyTree},
};

/// One supervised step of a training derivation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    pub epoch: usize,
    pub example: usize,
    pub step: usize,
    /// Display form of the state before the action was applied.
    pub state: String,
    /// Display form of the selected action.
    pub action: String,
    pub score: f64,
    /// Training error assigned to the selected action, if any.
    pub error: Option<f64>,
    /// Whether the oracle considered the selected action correct.
    pub correct: bool,
}

/// Observer trait for monitoring training
///
/// Observers can be composed to collect different types of data during training.
/// Examples include:
/// - Progress bars for user feedback
/// - JSONL export of every supervised step
/// - Attachment score tracking per epoch
///
/// # Design Philosophy
///
/// This trait represents a **port** in hexagonal architecture - a boundary
/// between the training pipeline and external observation mechanisms.
/// Different observation strategies are **adapters** that implement this port.
///
/// # Event Sequence
///
/// The observer methods are called in the following order:
/// 1. `on_training_start(total_examples, epochs)` - Once at the beginning
/// 2. For each epoch:
///    - `on_epoch_start(epoch)`
///    - For each example:
///      - `on_example_start(epoch, example)`
///      - `on_step(record)` - For each step of the derivation
///      - `on_example_end(epoch, example, predicted, gold)`
///    - `on_epoch_end(epoch, score)`
/// 3. `on_training_end()` - Once at the end
///
/// # Examples
///
/// ```no_run
/// use syntaxdecoder::{ports::Observer, syntax::AttachmentScore};
///
/// struct BestEpoch {
///     best_uas: f64,
/// }
///
/// impl Observer for BestEpoch {
///     fn on_epoch_end(
///         &mut self,
///         _epoch: usize,
///         score: &AttachmentScore,
///     ) -> syntaxdecoder::Result<()> {
///         self.best_uas = self.best_uas.max(score.uas());
///         Ok(())
///     }
/// }
/// ```
pub trait Observer: Send {
    /// Called when training starts.
    ///
    /// # Parameters
    ///
    /// * `total_examples` - Number of examples per epoch
    /// * `epochs` - Number of epochs that will be run
    ///
    /// # Default Implementation
    ///
    /// Does nothing. Override to initialize observation state.
    fn on_training_start(&mut self, _total_examples: usize, _epochs: usize) -> Result<()> {
        Ok(())
    }

    /// Called when an epoch starts.
    fn on_epoch_start(&mut self, _epoch: usize) -> Result<()> {
        Ok(())
    }

    /// Called before the derivation of an example starts.
    ///
    /// `example` is the index of the example in the training set, not its
    /// rank in the (possibly shuffled) epoch order.
    fn on_example_start(&mut self, _epoch: usize, _example: usize) -> Result<()> {
        Ok(())
    }

    /// Called for each step of a derivation, before its action is applied.
    ///
    /// # Default Implementation
    ///
    /// Does nothing. Override to observe action selection.
    fn on_step(&mut self, _record: &StepRecord) -> Result<()> {
        Ok(())
    }

    /// Called when the derivation of an example reaches a terminal state.
    fn on_example_end(
        &mut self,
        _epoch: usize,
        _example: usize,
        _predicted: &DependencyTree,
        _gold: &DependencyTree,
    ) -> Result<()> {
        Ok(())
    }

    /// Called when an epoch ends, with the attachment score of every tree
    /// built during the epoch.
    fn on_epoch_end(&mut self, _epoch: usize, _score: &AttachmentScore) -> Result<()> {
        Ok(())
    }

    /// Called when training completes.
    ///
    /// This is the last method called in the observation lifecycle.
    /// Use this to finalize outputs, close files, or display summaries.
    ///
    /// # Default Implementation
    ///
    /// Does nothing. Override to perform cleanup or final reporting.
    fn on_training_end(&mut self) -> Result<()> {
        Ok(())
    }
}
