//! Observer pattern for training pipelines
//!
//! Observers allow composable data collection during training without coupling
//! training logic to specific output formats.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use crate::{
    Result,
    ports::{Observer, StepRecord},
    syntax::{AttachmentScore, DependencyTree},
};

/// Complete observation of one training derivation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    /// Epoch number
    pub epoch: usize,
    /// Index of the example in the training set
    pub example: usize,
    /// Steps of the derivation
    pub steps: Vec<StepRecord>,
    /// Items attached to their gold governor
    pub unlabeled_correct: usize,
    /// Items attached to their gold governor with the gold label
    pub labeled_correct: usize,
    /// Items in the example
    pub total: usize,
    /// Predicted tree
    pub predicted: String,
}

/// Progress bar observer - Shows training progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    score: AttachmentScore,
    completed: u64,
}

impl ProgressObserver {
    /// Create a new progress observer
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            score: AttachmentScore::default(),
            completed: 0,
        }
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_training_start(&mut self, total_examples: usize, epochs: usize) -> Result<()> {
        let pb = ProgressBar::new((total_examples * epochs) as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} sentences ({msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_epoch_start(&mut self, _epoch: usize) -> Result<()> {
        self.score = AttachmentScore::default();
        Ok(())
    }

    fn on_example_end(
        &mut self,
        _epoch: usize,
        _example: usize,
        predicted: &DependencyTree,
        gold: &DependencyTree,
    ) -> Result<()> {
        self.score += predicted.attachment_score(gold)?;
        self.completed += 1;

        if let Some(pb) = &self.progress_bar {
            pb.set_position(self.completed);
            pb.set_message(self.score.to_string());
        }
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(self.score.to_string());
        }
        Ok(())
    }
}

/// Metrics observer - Tracks training metrics
pub struct MetricsObserver {
    epoch_scores: Vec<AttachmentScore>,
    derivation_lengths: Vec<usize>,
    correct_steps: usize,
    total_steps: usize,
}

impl MetricsObserver {
    /// Create a new metrics observer
    pub fn new() -> Self {
        Self {
            epoch_scores: Vec::new(),
            derivation_lengths: Vec::new(),
            correct_steps: 0,
            total_steps: 0,
        }
    }

    /// Attachment score of every completed epoch
    pub fn epoch_scores(&self) -> &[AttachmentScore] {
        &self.epoch_scores
    }

    /// Share of selected actions the oracle agreed with
    pub fn oracle_agreement(&self) -> f64 {
        if self.total_steps == 0 {
            0.0
        } else {
            self.correct_steps as f64 / self.total_steps as f64
        }
    }

    /// Get average derivation length
    pub fn avg_derivation_length(&self) -> f64 {
        if self.derivation_lengths.is_empty() {
            0.0
        } else {
            self.derivation_lengths.iter().sum::<usize>() as f64
                / self.derivation_lengths.len() as f64
        }
    }

    /// Get metrics summary
    pub fn summary(&self) -> MetricsSummary {
        let last = self.epoch_scores.last().copied().unwrap_or_default();
        MetricsSummary {
            epochs: self.epoch_scores.len(),
            derivations: self.derivation_lengths.len(),
            uas: last.uas(),
            las: last.las(),
            oracle_agreement: self.oracle_agreement(),
            avg_derivation_length: self.avg_derivation_length(),
        }
    }
}

/// Summary of training metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub epochs: usize,
    pub derivations: usize,
    pub uas: f64,
    pub las: f64,
    pub oracle_agreement: f64,
    pub avg_derivation_length: f64,
}

impl Default for MetricsObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for MetricsObserver {
    fn on_example_start(&mut self, _epoch: usize, _example: usize) -> Result<()> {
        self.derivation_lengths.push(0);
        Ok(())
    }

    fn on_step(&mut self, record: &StepRecord) -> Result<()> {
        if let Some(last) = self.derivation_lengths.last_mut() {
            *last += 1;
        }
        self.total_steps += 1;
        if record.correct {
            self.correct_steps += 1;
        }
        Ok(())
    }

    fn on_epoch_end(&mut self, _epoch: usize, score: &AttachmentScore) -> Result<()> {
        self.epoch_scores.push(*score);
        Ok(())
    }
}

/// JSONL observer - Exports observations to JSON Lines format
pub struct JsonlObserver {
    writer: BufWriter<File>,
    current_steps: Vec<StepRecord>,
}

impl JsonlObserver {
    /// Create a new JSONL observer
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        Ok(Self {
            writer,
            current_steps: Vec::new(),
        })
    }
}

impl Observer for JsonlObserver {
    fn on_example_start(&mut self, _epoch: usize, _example: usize) -> Result<()> {
        self.current_steps.clear();
        Ok(())
    }

    fn on_step(&mut self, record: &StepRecord) -> Result<()> {
        self.current_steps.push(record.clone());
        Ok(())
    }

    fn on_example_end(
        &mut self,
        epoch: usize,
        example: usize,
        predicted: &DependencyTree,
        gold: &DependencyTree,
    ) -> Result<()> {
        let score = predicted.attachment_score(gold)?;
        let observation = Observation {
            epoch,
            example,
            steps: std::mem::take(&mut self.current_steps),
            unlabeled_correct: score.unlabeled_correct,
            labeled_correct: score.labeled_correct,
            total: score.total,
            predicted: predicted.to_string(),
        };

        // Write as JSONL (one JSON object per line)
        serde_json::to_writer(&mut self.writer, &observation)?;
        writeln!(&mut self.writer)?;
        self.writer.flush()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(correct: bool) -> StepRecord {
        StepRecord {
            epoch: 0,
            example: 0,
            step: 0,
            state: "S [] B [0]".to_string(),
            action: "shift (1.0000)".to_string(),
            score: 1.0,
            error: None,
            correct,
        }
    }

    #[test]
    fn metrics_track_agreement_and_lengths() {
        let mut metrics = MetricsObserver::new();
        metrics.on_example_start(0, 0).unwrap();
        metrics.on_step(&record(true)).unwrap();
        metrics.on_step(&record(false)).unwrap();
        metrics.on_example_start(0, 1).unwrap();
        metrics.on_step(&record(true)).unwrap();
        metrics
            .on_epoch_end(
                0,
                &AttachmentScore {
                    total: 4,
                    unlabeled_correct: 3,
                    labeled_correct: 2,
                },
            )
            .unwrap();

        let summary = metrics.summary();
        assert_eq!(summary.epochs, 1);
        assert_eq!(summary.derivations, 2);
        assert!((summary.oracle_agreement - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(summary.avg_derivation_length, 1.5);
        assert_eq!(summary.uas, 0.75);
    }

    #[test]
    fn empty_metrics_are_zero() {
        let summary = MetricsObserver::default().summary();
        assert_eq!(summary.oracle_agreement, 0.0);
        assert_eq!(summary.avg_derivation_length, 0.0);
    }
}
